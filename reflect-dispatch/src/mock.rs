//! An in-memory [`HostRuntime`] for exercising the unbox/dispatch protocol
//! without a live virtual machine. Object references are indices into an
//! object table, with index zero reserved for null.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::error::DispatchError;
use crate::host::{CallSite, FieldSite, HostRuntime};
use crate::value::{JavaValue, PrimitiveKind, ValueKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MockRef(pub usize);

pub const NULL: MockRef = MockRef(0);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MethodId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(pub usize);

enum ClassKind {
    Primitive(PrimitiveKind),
    Wrapper(PrimitiveKind),
    Reference { super_class: Option<ClassId> },
    Array { element: ClassId },
}

enum MockObject {
    Boxed(JavaValue<MockRef>),
    Instance {
        class: ClassId,
        constructed: bool,
        fields: HashMap<FieldId, JavaValue<MockRef>>,
    },
    PrimitiveArray {
        kind: PrimitiveKind,
        elements: Vec<JavaValue<MockRef>>,
    },
    ReferenceArray {
        element: ClassId,
        elements: Vec<MockRef>,
    },
    ReflectedMethod(usize),
    ReflectedField(usize),
}

struct MethodInfo {
    params: Vec<ClassId>,
    variadic: bool,
    result: Option<JavaValue<MockRef>>,
}

#[derive(Debug, PartialEq)]
pub enum RecordedSite {
    Constructor(ClassId),
    Virtual(MockRef),
    Nonvirtual(MockRef, ClassId),
    Static(ClassId),
}

pub struct RecordedCall {
    pub site: RecordedSite,
    pub method: MethodId,
    pub ret: Option<ValueKind>,
    pub args: Vec<JavaValue<MockRef>>,
}

struct MockState {
    classes: Vec<ClassKind>,
    objects: Vec<Option<MockObject>>,
    methods: Vec<MethodInfo>,
    field_count: usize,
    statics: HashMap<(ClassId, FieldId), JavaValue<MockRef>>,
    calls: Vec<RecordedCall>,
}

pub struct MockVm {
    state: RefCell<MockState>,
    primitives: [ClassId; 8],
    wrappers: [ClassId; 8],
    pub object_class: ClassId,
    pub fail_next_allocation: Cell<bool>,
    pub poison_method_handles: Cell<bool>,
    pub pending: Cell<bool>,
    pub metadata_queries: Cell<usize>,
}

impl MockVm {
    pub fn new() -> MockVm {
        let mut classes = Vec::new();
        let mut primitives = [ClassId(0); 8];
        let mut wrappers = [ClassId(0); 8];
        for kind in PrimitiveKind::iter() {
            primitives[kind as usize] = ClassId(classes.len());
            classes.push(ClassKind::Primitive(kind));
            wrappers[kind as usize] = ClassId(classes.len());
            classes.push(ClassKind::Wrapper(kind));
        }
        let object_class = ClassId(classes.len());
        classes.push(ClassKind::Reference { super_class: None });
        MockVm {
            state: RefCell::new(MockState {
                classes,
                objects: vec![None],
                methods: Vec::new(),
                field_count: 0,
                statics: HashMap::new(),
                calls: Vec::new(),
            }),
            primitives,
            wrappers,
            object_class,
            fail_next_allocation: Cell::new(false),
            poison_method_handles: Cell::new(false),
            pending: Cell::new(false),
            metadata_queries: Cell::new(0),
        }
    }

    pub fn primitive_class(&self, kind: PrimitiveKind) -> ClassId {
        self.primitives[kind as usize]
    }

    pub fn wrapper_class(&self, kind: PrimitiveKind) -> ClassId {
        self.wrappers[kind as usize]
    }

    pub fn class(&self, super_class: Option<ClassId>) -> ClassId {
        let mut state = self.state.borrow_mut();
        let id = ClassId(state.classes.len());
        state.classes.push(ClassKind::Reference { super_class });
        id
    }

    pub fn array_class(&self, element: ClassId) -> ClassId {
        let mut state = self.state.borrow_mut();
        let id = ClassId(state.classes.len());
        state.classes.push(ClassKind::Array { element });
        id
    }

    fn register(&self, object: MockObject) -> MockRef {
        let mut state = self.state.borrow_mut();
        let reference = MockRef(state.objects.len());
        state.objects.push(Some(object));
        reference
    }

    pub fn boxed(&self, value: JavaValue<MockRef>) -> MockRef {
        assert!(value.kind() != ValueKind::Object);
        self.register(MockObject::Boxed(value))
    }

    pub fn instance(&self, class: ClassId) -> MockRef {
        self.register(MockObject::Instance {
            class,
            constructed: true,
            fields: HashMap::new(),
        })
    }

    /// Register a reflected method and hand back the reflected object.
    pub fn method(
        &self,
        params: Vec<ClassId>,
        variadic: bool,
        result: Option<JavaValue<MockRef>>,
    ) -> MockRef {
        let index = {
            let mut state = self.state.borrow_mut();
            state.methods.push(MethodInfo { params, variadic, result });
            state.methods.len() - 1
        };
        self.register(MockObject::ReflectedMethod(index))
    }

    pub fn field(&self) -> MockRef {
        let index = {
            let mut state = self.state.borrow_mut();
            state.field_count += 1;
            state.field_count - 1
        };
        self.register(MockObject::ReflectedField(index))
    }

    pub fn calls(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn with_call<T>(&self, index: usize, f: impl FnOnce(&RecordedCall) -> T) -> T {
        f(&self.state.borrow().calls[index])
    }

    pub fn was_constructed(&self, reference: MockRef) -> bool {
        match self.state.borrow().objects[reference.0] {
            Some(MockObject::Instance { constructed, .. }) => constructed,
            _ => panic!("not an instance"),
        }
    }

    pub fn instance_class(&self, reference: MockRef) -> ClassId {
        match self.state.borrow().objects[reference.0] {
            Some(MockObject::Instance { class, .. }) => class,
            _ => panic!("not an instance"),
        }
    }

    pub fn primitive_array_elements(&self, reference: MockRef) -> Vec<JavaValue<MockRef>> {
        match &self.state.borrow().objects[reference.0] {
            Some(MockObject::PrimitiveArray { elements, .. }) => elements.clone(),
            _ => panic!("not a primitive array"),
        }
    }

    pub fn reference_array_elements(&self, reference: MockRef) -> Vec<MockRef> {
        match &self.state.borrow().objects[reference.0] {
            Some(MockObject::ReferenceArray { elements, .. }) => elements.clone(),
            _ => panic!("not a reference array"),
        }
    }

    fn guard(&self) -> Result<(), DispatchError> {
        if self.pending.get() {
            Err(DispatchError::Pending)
        } else {
            Ok(())
        }
    }

    fn metadata(&self) {
        self.metadata_queries.set(self.metadata_queries.get() + 1);
    }

    fn take_allocation_failure(&self) -> bool {
        self.fail_next_allocation.replace(false)
    }
}

impl HostRuntime for MockVm {
    type Ref = MockRef;
    type Class = ClassId;
    type Method = MethodId;
    type Field = FieldId;

    fn is_null(&self, reference: MockRef) -> bool {
        reference.0 == 0
    }

    fn method_handle(&self, reflected: MockRef) -> Result<MethodId, DispatchError> {
        self.guard()?;
        if self.poison_method_handles.get() {
            self.pending.set(true);
            return Err(DispatchError::Pending);
        }
        match self.state.borrow().objects[reflected.0] {
            Some(MockObject::ReflectedMethod(index)) => Ok(MethodId(index)),
            _ => panic!("not a reflected method"),
        }
    }

    fn field_handle(&self, reflected: MockRef) -> Result<FieldId, DispatchError> {
        self.guard()?;
        match self.state.borrow().objects[reflected.0] {
            Some(MockObject::ReflectedField(index)) => Ok(FieldId(index)),
            _ => panic!("not a reflected field"),
        }
    }

    fn parameter_types(&self, executable: MockRef) -> Result<Vec<ClassId>, DispatchError> {
        self.guard()?;
        self.metadata();
        let state = self.state.borrow();
        match state.objects[executable.0] {
            Some(MockObject::ReflectedMethod(index)) => Ok(state.methods[index].params.clone()),
            _ => panic!("not a reflected method"),
        }
    }

    fn is_variadic(&self, executable: MockRef) -> Result<bool, DispatchError> {
        self.guard()?;
        self.metadata();
        let state = self.state.borrow();
        match state.objects[executable.0] {
            Some(MockObject::ReflectedMethod(index)) => Ok(state.methods[index].variadic),
            _ => panic!("not a reflected method"),
        }
    }

    fn component_type(&self, array_class: ClassId) -> Result<ClassId, DispatchError> {
        self.guard()?;
        self.metadata();
        match self.state.borrow().classes[array_class.0] {
            ClassKind::Array { element } => Ok(element),
            _ => panic!("not an array class"),
        }
    }

    fn primitive_kind(&self, class: ClassId) -> Option<PrimitiveKind> {
        match self.state.borrow().classes[class.0] {
            ClassKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    fn is_wrapper_of(&self, kind: PrimitiveKind, class: ClassId) -> bool {
        class == self.wrappers[kind as usize]
    }

    fn class_of(&self, reference: MockRef) -> Result<ClassId, DispatchError> {
        self.guard()?;
        let state = self.state.borrow();
        match &state.objects[reference.0] {
            Some(MockObject::Boxed(value)) => {
                let kind = match value.kind().primitive() {
                    Some(kind) => kind,
                    None => panic!("boxed reference"),
                };
                Ok(self.wrappers[kind as usize])
            }
            Some(MockObject::Instance { class, .. }) => Ok(*class),
            Some(MockObject::PrimitiveArray { .. })
            | Some(MockObject::ReferenceArray { .. })
            | Some(MockObject::ReflectedMethod(_))
            | Some(MockObject::ReflectedField(_)) => Ok(self.object_class),
            None => panic!("class of null"),
        }
    }

    fn is_assignable(&self, from: ClassId, to: ClassId) -> bool {
        if to == self.object_class {
            return true;
        }
        let state = self.state.borrow();
        let mut current = Some(from);
        while let Some(class) = current {
            if class == to {
                return true;
            }
            current = match state.classes[class.0] {
                ClassKind::Reference { super_class } => super_class,
                _ => None,
            };
        }
        false
    }

    fn unbox(&self, kind: PrimitiveKind, wrapper: MockRef)
        -> Result<JavaValue<MockRef>, DispatchError> {
        self.guard()?;
        match self.state.borrow().objects[wrapper.0] {
            Some(MockObject::Boxed(value)) => {
                assert_eq!(value.kind(), ValueKind::from(kind));
                Ok(value)
            }
            _ => panic!("not a boxed value"),
        }
    }

    fn new_primitive_array(&self, kind: PrimitiveKind, len: usize)
        -> Result<MockRef, DispatchError> {
        self.guard()?;
        if self.take_allocation_failure() {
            return Err(DispatchError::OutOfMemory);
        }
        Ok(self.register(MockObject::PrimitiveArray {
            kind,
            elements: Vec::with_capacity(len),
        }))
    }

    fn store_primitive_elements(&self, array: MockRef, kind: PrimitiveKind,
        values: &[JavaValue<MockRef>]) -> Result<(), DispatchError> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        match &mut state.objects[array.0] {
            Some(MockObject::PrimitiveArray { kind: stored, elements }) => {
                assert_eq!(*stored, kind);
                elements.clear();
                elements.extend_from_slice(values);
                Ok(())
            }
            _ => panic!("not a primitive array"),
        }
    }

    fn new_reference_array(&self, element_class: ClassId, len: usize)
        -> Result<MockRef, DispatchError> {
        self.guard()?;
        if self.take_allocation_failure() {
            return Err(DispatchError::OutOfMemory);
        }
        Ok(self.register(MockObject::ReferenceArray {
            element: element_class,
            elements: vec![NULL; len],
        }))
    }

    fn store_reference_element(&self, array: MockRef, index: usize, value: MockRef)
        -> Result<(), DispatchError> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        match &mut state.objects[array.0] {
            Some(MockObject::ReferenceArray { elements, .. }) => {
                elements[index] = value;
                Ok(())
            }
            _ => panic!("not a reference array"),
        }
    }

    fn alloc_instance(&self, class: ClassId) -> Result<MockRef, DispatchError> {
        self.guard()?;
        if self.take_allocation_failure() {
            return Err(DispatchError::OutOfMemory);
        }
        Ok(self.register(MockObject::Instance {
            class,
            constructed: false,
            fields: HashMap::new(),
        }))
    }

    fn invoke(&self, site: CallSite<Self>, method: MethodId, ret: Option<ValueKind>,
        args: &[JavaValue<MockRef>]) -> Result<Option<JavaValue<MockRef>>, DispatchError> {
        self.guard()?;
        let recorded = match site {
            CallSite::Constructor { class } => RecordedSite::Constructor(class),
            CallSite::Virtual { receiver } => RecordedSite::Virtual(receiver),
            CallSite::Nonvirtual { receiver, class } => RecordedSite::Nonvirtual(receiver, class),
            CallSite::Static { class } => RecordedSite::Static(class),
        };
        let result = match &recorded {
            RecordedSite::Constructor(class) => {
                let instance = self.register(MockObject::Instance {
                    class: *class,
                    constructed: true,
                    fields: HashMap::new(),
                });
                Some(JavaValue::Object(Some(instance)))
            }
            _ => self.state.borrow().methods[method.0].result,
        };
        self.state.borrow_mut().calls.push(RecordedCall {
            site: recorded,
            method,
            ret,
            args: args.to_vec(),
        });
        Ok(result)
    }

    fn get_field(&self, site: FieldSite<Self>, field: FieldId, kind: ValueKind)
        -> Result<JavaValue<MockRef>, DispatchError> {
        self.guard()?;
        let state = self.state.borrow();
        let value = match site {
            FieldSite::Instance(reference) => match &state.objects[reference.0] {
                Some(MockObject::Instance { fields, .. }) => fields[&field],
                _ => panic!("not an instance"),
            },
            FieldSite::Static(class) => state.statics[&(class, field)],
        };
        assert_eq!(value.kind(), kind);
        Ok(value)
    }

    fn set_field(&self, site: FieldSite<Self>, field: FieldId, value: JavaValue<MockRef>)
        -> Result<(), DispatchError> {
        self.guard()?;
        let mut state = self.state.borrow_mut();
        match site {
            FieldSite::Instance(reference) => match &mut state.objects[reference.0] {
                Some(MockObject::Instance { fields, .. }) => {
                    fields.insert(field, value);
                }
                _ => panic!("not an instance"),
            },
            FieldSite::Static(class) => {
                state.statics.insert((class, field), value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use strum::IntoEnumIterator;

    use super::{MockVm, NULL};
    use crate::dispatch::{allocate, call, construct, read_field, write_field};
    use crate::error::DispatchError;
    use crate::host::{CallSite, FieldSite};
    use crate::unbox::unbox_arguments;
    use crate::value::{JavaValue, PrimitiveKind, ValueKind};

    fn sample(kind: PrimitiveKind) -> JavaValue<super::MockRef> {
        match kind {
            PrimitiveKind::Boolean => JavaValue::Boolean(true),
            PrimitiveKind::Byte => JavaValue::Byte(7),
            PrimitiveKind::Char => JavaValue::Char(u16::from(b'q')),
            PrimitiveKind::Short => JavaValue::Short(-3),
            PrimitiveKind::Int => JavaValue::Int(42),
            PrimitiveKind::Long => JavaValue::Long(1 << 40),
            PrimitiveKind::Float => JavaValue::Float(1.5),
            PrimitiveKind::Double => JavaValue::Double(-2.25),
        }
    }

    #[test]
    pub fn arity_is_checked_before_any_slot() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let method = vm.method(vec![int, int], false, None);
        let five = vm.boxed(JavaValue::Int(5));
        assert_eq!(
            unbox_arguments(&vm, method, &[five]),
            Err(DispatchError::WrongArity)
        );
        assert_eq!(
            unbox_arguments(&vm, method, &[five, five, five]),
            Err(DispatchError::WrongArity)
        );
    }

    #[test]
    pub fn wrapper_identity_is_exact_across_all_kinds() {
        let vm = MockVm::new();
        for declared in PrimitiveKind::iter() {
            let method = vm.method(vec![vm.primitive_class(declared)], false, None);
            for supplied in PrimitiveKind::iter() {
                let argument = vm.boxed(sample(supplied));
                let result = unbox_arguments(&vm, method, &[argument]);
                if supplied == declared {
                    assert_eq!(result, Ok(vec![sample(declared)]));
                } else {
                    assert_eq!(result, Err(DispatchError::WrapperMismatch(declared)));
                }
            }
            assert_eq!(
                unbox_arguments(&vm, method, &[NULL]),
                Err(DispatchError::NullUnbox(declared))
            );
        }
    }

    #[test]
    pub fn reference_parameters_accept_null_and_subtypes() {
        let vm = MockVm::new();
        let base = vm.class(Some(vm.object_class));
        let derived = vm.class(Some(base));
        let unrelated = vm.class(Some(vm.object_class));
        let method = vm.method(vec![base], false, None);

        assert_eq!(
            unbox_arguments(&vm, method, &[NULL]),
            Ok(vec![JavaValue::Object(None)])
        );
        let sub = vm.instance(derived);
        assert_eq!(
            unbox_arguments(&vm, method, &[sub]),
            Ok(vec![JavaValue::Object(Some(sub))])
        );
        let stranger = vm.instance(unrelated);
        assert_eq!(
            unbox_arguments(&vm, method, &[stranger]),
            Err(DispatchError::IncompatibleArgument)
        );
    }

    #[test]
    pub fn variadic_tail_is_packed_into_a_fresh_array() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let string = vm.class(Some(vm.object_class));
        let int_array = vm.array_class(int);
        let method = vm.method(vec![int, string, int_array], true, None);

        let five = vm.boxed(JavaValue::Int(5));
        let text = vm.instance(string);
        let tail: Vec<_> = [1, 2, 3]
            .iter()
            .map(|&n| vm.boxed(JavaValue::Int(n)))
            .collect();

        let slots = unbox_arguments(&vm, method, &[five, text, tail[0], tail[1], tail[2]])
            .unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0], JavaValue::Int(5));
        assert_eq!(slots[1], JavaValue::Object(Some(text)));
        let array = slots[2].unwrap_object().unwrap();
        assert_eq!(
            vm.primitive_array_elements(array),
            vec![JavaValue::Int(1), JavaValue::Int(2), JavaValue::Int(3)]
        );
    }

    #[test]
    pub fn variadic_tail_may_be_empty() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let int_array = vm.array_class(int);
        let method = vm.method(vec![int, int_array], true, None);

        let five = vm.boxed(JavaValue::Int(5));
        let slots = unbox_arguments(&vm, method, &[five]).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], JavaValue::Int(5));
        let array = slots[1].unwrap_object().unwrap();
        assert!(vm.primitive_array_elements(array).is_empty());
    }

    #[test]
    pub fn reference_tail_checks_elements_and_keeps_nulls() {
        let vm = MockVm::new();
        let string = vm.class(Some(vm.object_class));
        let string_array = vm.array_class(string);
        let method = vm.method(vec![string_array], true, None);

        let text = vm.instance(string);
        let slots = unbox_arguments(&vm, method, &[text, NULL]).unwrap();
        let array = slots[0].unwrap_object().unwrap();
        assert_eq!(vm.reference_array_elements(array), vec![text, NULL]);

        let unrelated = vm.instance(vm.class(Some(vm.object_class)));
        assert_eq!(
            unbox_arguments(&vm, method, &[unrelated]),
            Err(DispatchError::IncompatibleArgument)
        );
    }

    #[test]
    pub fn tail_allocation_failure_precedes_element_checks() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let int_array = vm.array_class(int);
        let method = vm.method(vec![int_array], true, None);

        // The tail argument is ill-typed, but the array allocation fails
        // first and must win.
        let wrong = vm.boxed(JavaValue::Long(9));
        vm.fail_next_allocation.set(true);
        assert_eq!(
            unbox_arguments(&vm, method, &[wrong]),
            Err(DispatchError::OutOfMemory)
        );
    }

    #[test]
    pub fn call_packs_arguments_and_returns_the_host_result() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let owner = vm.class(Some(vm.object_class));
        let method = vm.method(vec![int], false, Some(JavaValue::Long(99)));
        let receiver = vm.instance(owner);
        let five = vm.boxed(JavaValue::Int(5));

        let result = call(
            &vm,
            CallSite::Virtual { receiver },
            method,
            &[five],
            Some(ValueKind::Long),
        )
        .unwrap();
        assert_eq!(result, Some(JavaValue::Long(99)));
        assert_eq!(vm.calls(), 1);
        vm.with_call(0, |recorded| {
            assert_eq!(recorded.site, super::RecordedSite::Virtual(receiver));
            assert_eq!(recorded.ret, Some(ValueKind::Long));
            assert_eq!(recorded.args, vec![JavaValue::Int(5)]);
        });
    }

    #[test]
    pub fn construct_runs_the_constructor_but_allocate_does_not() {
        let vm = MockVm::new();
        let owner = vm.class(Some(vm.object_class));
        let ctor = vm.method(vec![], false, None);

        let built = construct(&vm, owner, ctor, &[]).unwrap().unwrap();
        assert!(vm.was_constructed(built));
        assert_eq!(vm.instance_class(built), owner);

        let raw = allocate(&vm, owner).unwrap();
        assert!(!vm.was_constructed(raw));
        assert_eq!(vm.instance_class(raw), owner);
        assert_eq!(vm.calls(), 1);

        // Running the constructor on the bare allocation afterwards, then
        // reading fields back, must be indistinguishable from the normal
        // construction path.
        let finished = call(&vm, CallSite::Nonvirtual { receiver: raw, class: owner }, ctor, &[], None)
            .unwrap();
        assert_eq!(finished, None);

        let reflected = vm.field();
        write_field(&vm, FieldSite::Instance(built), reflected, JavaValue::Int(11)).unwrap();
        write_field(&vm, FieldSite::Instance(raw), reflected, JavaValue::Int(11)).unwrap();
        assert_eq!(
            read_field(&vm, FieldSite::Instance(raw), reflected, ValueKind::Int),
            read_field(&vm, FieldSite::Instance(built), reflected, ValueKind::Int),
        );
        assert_eq!(
            read_field(&vm, FieldSite::Instance(raw), reflected, ValueKind::Int),
            Ok(JavaValue::Int(11))
        );
    }

    #[test]
    pub fn fields_round_trip_for_every_kind() {
        let vm = MockVm::new();
        let owner = vm.class(Some(vm.object_class));
        let target = vm.instance(owner);
        let holder = vm.instance(owner);

        let mut values: Vec<JavaValue<super::MockRef>> =
            PrimitiveKind::iter().map(sample).collect();
        values.push(JavaValue::Object(Some(holder)));

        for value in values {
            let reflected = vm.field();
            write_field(&vm, FieldSite::Instance(target), reflected, value).unwrap();
            assert_eq!(
                read_field(&vm, FieldSite::Instance(target), reflected, value.kind()),
                Ok(value)
            );

            let reflected_static = vm.field();
            write_field(&vm, FieldSite::Static(owner), reflected_static, value).unwrap();
            assert_eq!(
                read_field(&vm, FieldSite::Static(owner), reflected_static, value.kind()),
                Ok(value)
            );
        }
    }

    #[test]
    pub fn pending_host_signal_short_circuits_dispatch() {
        let vm = MockVm::new();
        let int = vm.primitive_class(PrimitiveKind::Int);
        let owner = vm.class(Some(vm.object_class));
        let method = vm.method(vec![int], false, None);
        let receiver = vm.instance(owner);
        let five = vm.boxed(JavaValue::Int(5));

        vm.poison_method_handles.set(true);
        let result = call(
            &vm,
            CallSite::Virtual { receiver },
            method,
            &[five],
            None,
        );
        assert_eq!(result, Err(DispatchError::Pending));
        assert_eq!(vm.metadata_queries.get(), 0);
        assert_eq!(vm.calls(), 0);
    }
}
