use crate::error::DispatchError;
use crate::value::{JavaValue, PrimitiveKind, ValueKind};

/// Where a call lands: the four invocation kinds of the dispatch engine.
pub enum CallSite<H: HostRuntime + ?Sized> {
    Constructor { class: H::Class },
    Virtual { receiver: H::Ref },
    Nonvirtual { receiver: H::Ref, class: H::Class },
    Static { class: H::Class },
}

/// Where a field access lands.
pub enum FieldSite<H: HostRuntime + ?Sized> {
    Instance(H::Ref),
    Static(H::Class),
}

/// The narrow interface consumed from the owning virtual machine: reflection
/// metadata queries, the type-relation predicates, wrapper unboxing, array
/// assembly, and the member invocation/field-access primitives.
///
/// Every fallible operation surfaces an already-pending host signal as
/// [`DispatchError::Pending`]; callers must stop at the first error rather
/// than continue with partially valid state.
pub trait HostRuntime {
    /// A nullable object reference.
    type Ref: Copy;
    /// A class identity.
    type Class: Copy;
    /// A native invocation handle derived from a reflected method object.
    type Method: Copy;
    /// A native access handle derived from a reflected field object.
    type Field: Copy;

    fn is_null(&self, reference: Self::Ref) -> bool;

    /// Convert a reflected constructor-or-method object into its native
    /// invocation handle.
    fn method_handle(&self, reflected: Self::Ref) -> Result<Self::Method, DispatchError>;
    fn field_handle(&self, reflected: Self::Ref) -> Result<Self::Field, DispatchError>;

    /// Declared parameter classes of a reflected executable, in order.
    fn parameter_types(&self, executable: Self::Ref) -> Result<Vec<Self::Class>, DispatchError>;
    fn is_variadic(&self, executable: Self::Ref) -> Result<bool, DispatchError>;
    /// Element class of an array class.
    fn component_type(&self, array_class: Self::Class) -> Result<Self::Class, DispatchError>;

    /// `Some(kind)` when the class is the primitive marker of `kind`.
    fn primitive_kind(&self, class: Self::Class) -> Option<PrimitiveKind>;
    /// Exact identity match against the wrapper class of `kind`.
    fn is_wrapper_of(&self, kind: PrimitiveKind, class: Self::Class) -> bool;
    fn class_of(&self, reference: Self::Ref) -> Result<Self::Class, DispatchError>;
    /// The host's assignability relation (subtyping allowed).
    fn is_assignable(&self, from: Self::Class, to: Self::Class) -> bool;

    /// Extract the raw primitive held by a wrapper instance. The caller has
    /// already verified that the wrapper class matches `kind` exactly.
    fn unbox(&self, kind: PrimitiveKind, wrapper: Self::Ref)
        -> Result<JavaValue<Self::Ref>, DispatchError>;

    fn new_primitive_array(&self, kind: PrimitiveKind, len: usize)
        -> Result<Self::Ref, DispatchError>;
    /// Bulk store of pre-unboxed primitives into an array obtained from
    /// [`HostRuntime::new_primitive_array`]; every value's kind is `kind`.
    fn store_primitive_elements(&self, array: Self::Ref, kind: PrimitiveKind,
        values: &[JavaValue<Self::Ref>]) -> Result<(), DispatchError>;
    fn new_reference_array(&self, element_class: Self::Class, len: usize)
        -> Result<Self::Ref, DispatchError>;
    fn store_reference_element(&self, array: Self::Ref, index: usize, value: Self::Ref)
        -> Result<(), DispatchError>;

    /// Allocate an instance without invoking any constructor.
    fn alloc_instance(&self, class: Self::Class) -> Result<Self::Ref, DispatchError>;
    /// Invoke a member by native handle with a packed, pre-unboxed argument
    /// vector. `ret` is `None` for void calls; the result is `None` exactly
    /// for void calls.
    fn invoke(&self, site: CallSite<Self>, method: Self::Method, ret: Option<ValueKind>,
        args: &[JavaValue<Self::Ref>]) -> Result<Option<JavaValue<Self::Ref>>, DispatchError>;
    /// Direct typed field read; no unboxing involved.
    fn get_field(&self, site: FieldSite<Self>, field: Self::Field, kind: ValueKind)
        -> Result<JavaValue<Self::Ref>, DispatchError>;
    /// Direct typed field write; no unboxing involved.
    fn set_field(&self, site: FieldSite<Self>, field: Self::Field, value: JavaValue<Self::Ref>)
        -> Result<(), DispatchError>;
}
