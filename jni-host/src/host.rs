//! [`JniHost`] adapts a live `JNIEnv` to the dispatch core's host trait.
//!
//! Every fallible JNI round trip is followed by an `ExceptionCheck`; a
//! pending exception becomes [`DispatchError::Pending`], which the entry
//! points propagate by returning without throwing anything on top.

use std::ffi::CString;
use std::ptr;

use jni_sys::{
    jboolean, jclass, jfieldID, jmethodID, jobject, jobjectArray, jsize, jvalue, JNIEnv, JNI_TRUE,
};

use reflect_dispatch::{
    CallSite, DispatchError, FieldSite, HostRuntime, JavaValue, PrimitiveKind, ValueKind,
};
use strum::IntoEnumIterator;

use crate::registry::{self, TypeRegistry};

pub struct JniHost {
    env: *mut JNIEnv,
    registry: &'static TypeRegistry,
}

fn to_jvalue(value: &JavaValue<jobject>) -> jvalue {
    match *value {
        JavaValue::Boolean(z) => jvalue { z: u8::from(z) },
        JavaValue::Byte(b) => jvalue { b },
        JavaValue::Char(c) => jvalue { c },
        JavaValue::Short(s) => jvalue { s },
        JavaValue::Int(i) => jvalue { i },
        JavaValue::Long(j) => jvalue { j },
        JavaValue::Float(f) => jvalue { f },
        JavaValue::Double(d) => jvalue { d },
        JavaValue::Object(l) => jvalue { l: l.unwrap_or(ptr::null_mut()) },
    }
}

fn reference(object: jobject) -> JavaValue<jobject> {
    JavaValue::Object(if object.is_null() { None } else { Some(object) })
}

impl JniHost {
    /// Bind to the current native frame. `None` until the registry has been
    /// published by the load hook.
    ///
    /// # Safety
    /// `env` must be the valid `JNIEnv` of the calling thread, and the host
    /// must not outlive the native frame it was created in.
    pub unsafe fn attach(env: *mut JNIEnv) -> Option<JniHost> {
        registry::registry().map(|registry| JniHost { env, registry })
    }

    pub fn env(&self) -> *mut JNIEnv {
        self.env
    }

    pub fn registry(&self) -> &'static TypeRegistry {
        self.registry
    }

    fn check_pending(&self) -> Result<(), DispatchError> {
        unsafe {
            if jni_call!(self.env, ExceptionCheck()) == JNI_TRUE {
                Err(DispatchError::Pending)
            } else {
                Ok(())
            }
        }
    }

    /// Copy an object-array of boxed arguments into a vector of local
    /// references. A null array stands for zero arguments.
    pub fn collect_arguments(&self, array: jobjectArray) -> Result<Vec<jobject>, DispatchError> {
        if array.is_null() {
            return Ok(Vec::new());
        }
        unsafe {
            let len = jni_call!(self.env, GetArrayLength(array));
            let mut arguments = Vec::with_capacity(len as usize);
            for index in 0..len {
                let element = jni_call!(self.env, GetObjectArrayElement(array, index));
                self.check_pending()?;
                arguments.push(element);
            }
            Ok(arguments)
        }
    }

    /// Surface a dispatch failure to the caller's frame. `Pending` throws
    /// nothing, leaving the collaborator's exception in place.
    pub fn raise(&self, error: DispatchError) {
        unsafe {
            match error {
                DispatchError::Pending => {}
                DispatchError::OutOfMemory => {
                    jni_call!(self.env, ThrowNew(self.registry.out_of_memory, ptr::null()));
                }
                other => {
                    let message = CString::new(other.to_string()).unwrap_or_default();
                    jni_call!(
                        self.env,
                        ThrowNew(self.registry.illegal_argument, message.as_ptr())
                    );
                }
            }
        }
    }

    unsafe fn object_array_to_vec(&self, array: jobjectArray) -> Result<Vec<jclass>, DispatchError> {
        let len = jni_call!(self.env, GetArrayLength(array));
        let mut classes = Vec::with_capacity(len as usize);
        for index in 0..len {
            let element = jni_call!(self.env, GetObjectArrayElement(array, index)) as jclass;
            self.check_pending()?;
            classes.push(element);
        }
        Ok(classes)
    }

    unsafe fn call_virtual(
        &self,
        receiver: jobject,
        method: jmethodID,
        ret: Option<ValueKind>,
        argv: *const jvalue,
    ) -> Option<JavaValue<jobject>> {
        let env = self.env;
        match ret {
            None => {
                jni_call!(env, CallVoidMethodA(receiver, method, argv));
                None
            }
            Some(ValueKind::Boolean) => Some(JavaValue::Boolean(
                jni_call!(env, CallBooleanMethodA(receiver, method, argv)) == JNI_TRUE,
            )),
            Some(ValueKind::Byte) => {
                Some(JavaValue::Byte(jni_call!(env, CallByteMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Char) => {
                Some(JavaValue::Char(jni_call!(env, CallCharMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Short) => {
                Some(JavaValue::Short(jni_call!(env, CallShortMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Int) => {
                Some(JavaValue::Int(jni_call!(env, CallIntMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Long) => {
                Some(JavaValue::Long(jni_call!(env, CallLongMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Float) => {
                Some(JavaValue::Float(jni_call!(env, CallFloatMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Double) => {
                Some(JavaValue::Double(jni_call!(env, CallDoubleMethodA(receiver, method, argv))))
            }
            Some(ValueKind::Object) => {
                Some(reference(jni_call!(env, CallObjectMethodA(receiver, method, argv))))
            }
        }
    }

    unsafe fn call_nonvirtual(
        &self,
        receiver: jobject,
        class: jclass,
        method: jmethodID,
        ret: Option<ValueKind>,
        argv: *const jvalue,
    ) -> Option<JavaValue<jobject>> {
        let env = self.env;
        match ret {
            None => {
                jni_call!(env, CallNonvirtualVoidMethodA(receiver, class, method, argv));
                None
            }
            Some(ValueKind::Boolean) => Some(JavaValue::Boolean(
                jni_call!(env, CallNonvirtualBooleanMethodA(receiver, class, method, argv))
                    == JNI_TRUE,
            )),
            Some(ValueKind::Byte) => Some(JavaValue::Byte(jni_call!(
                env,
                CallNonvirtualByteMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Char) => Some(JavaValue::Char(jni_call!(
                env,
                CallNonvirtualCharMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Short) => Some(JavaValue::Short(jni_call!(
                env,
                CallNonvirtualShortMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Int) => Some(JavaValue::Int(jni_call!(
                env,
                CallNonvirtualIntMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Long) => Some(JavaValue::Long(jni_call!(
                env,
                CallNonvirtualLongMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Float) => Some(JavaValue::Float(jni_call!(
                env,
                CallNonvirtualFloatMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Double) => Some(JavaValue::Double(jni_call!(
                env,
                CallNonvirtualDoubleMethodA(receiver, class, method, argv)
            ))),
            Some(ValueKind::Object) => Some(reference(jni_call!(
                env,
                CallNonvirtualObjectMethodA(receiver, class, method, argv)
            ))),
        }
    }

    unsafe fn call_static(
        &self,
        class: jclass,
        method: jmethodID,
        ret: Option<ValueKind>,
        argv: *const jvalue,
    ) -> Option<JavaValue<jobject>> {
        let env = self.env;
        match ret {
            None => {
                jni_call!(env, CallStaticVoidMethodA(class, method, argv));
                None
            }
            Some(ValueKind::Boolean) => Some(JavaValue::Boolean(
                jni_call!(env, CallStaticBooleanMethodA(class, method, argv)) == JNI_TRUE,
            )),
            Some(ValueKind::Byte) => {
                Some(JavaValue::Byte(jni_call!(env, CallStaticByteMethodA(class, method, argv))))
            }
            Some(ValueKind::Char) => {
                Some(JavaValue::Char(jni_call!(env, CallStaticCharMethodA(class, method, argv))))
            }
            Some(ValueKind::Short) => {
                Some(JavaValue::Short(jni_call!(env, CallStaticShortMethodA(class, method, argv))))
            }
            Some(ValueKind::Int) => {
                Some(JavaValue::Int(jni_call!(env, CallStaticIntMethodA(class, method, argv))))
            }
            Some(ValueKind::Long) => {
                Some(JavaValue::Long(jni_call!(env, CallStaticLongMethodA(class, method, argv))))
            }
            Some(ValueKind::Float) => {
                Some(JavaValue::Float(jni_call!(env, CallStaticFloatMethodA(class, method, argv))))
            }
            Some(ValueKind::Double) => Some(JavaValue::Double(jni_call!(
                env,
                CallStaticDoubleMethodA(class, method, argv)
            ))),
            Some(ValueKind::Object) => {
                Some(reference(jni_call!(env, CallStaticObjectMethodA(class, method, argv))))
            }
        }
    }
}

impl HostRuntime for JniHost {
    type Ref = jobject;
    type Class = jclass;
    type Method = jmethodID;
    type Field = jfieldID;

    fn is_null(&self, reference: jobject) -> bool {
        reference.is_null()
    }

    fn method_handle(&self, reflected: jobject) -> Result<jmethodID, DispatchError> {
        self.check_pending()?;
        let handle = unsafe { jni_call!(self.env, FromReflectedMethod(reflected)) };
        self.check_pending()?;
        Ok(handle)
    }

    fn field_handle(&self, reflected: jobject) -> Result<jfieldID, DispatchError> {
        self.check_pending()?;
        let handle = unsafe { jni_call!(self.env, FromReflectedField(reflected)) };
        self.check_pending()?;
        Ok(handle)
    }

    fn parameter_types(&self, executable: jobject) -> Result<Vec<jclass>, DispatchError> {
        unsafe {
            let array = jni_call!(
                self.env,
                CallObjectMethod(executable, self.registry.get_parameter_types)
            );
            self.check_pending()?;
            self.object_array_to_vec(array as jobjectArray)
        }
    }

    fn is_variadic(&self, executable: jobject) -> Result<bool, DispatchError> {
        unsafe {
            let flag: jboolean =
                jni_call!(self.env, CallBooleanMethod(executable, self.registry.is_var_args));
            self.check_pending()?;
            Ok(flag == JNI_TRUE)
        }
    }

    fn component_type(&self, array_class: jclass) -> Result<jclass, DispatchError> {
        unsafe {
            let component = jni_call!(
                self.env,
                CallObjectMethod(array_class, self.registry.get_component_type)
            ) as jclass;
            self.check_pending()?;
            Ok(component)
        }
    }

    fn primitive_kind(&self, class: jclass) -> Option<PrimitiveKind> {
        PrimitiveKind::iter().find(|&kind| unsafe {
            jni_call!(
                self.env,
                IsSameObject(class, self.registry.bindings[kind as usize].marker)
            ) == JNI_TRUE
        })
    }

    fn is_wrapper_of(&self, kind: PrimitiveKind, class: jclass) -> bool {
        unsafe {
            jni_call!(
                self.env,
                IsSameObject(class, self.registry.bindings[kind as usize].wrapper)
            ) == JNI_TRUE
        }
    }

    fn class_of(&self, reference: jobject) -> Result<jclass, DispatchError> {
        let class = unsafe { jni_call!(self.env, GetObjectClass(reference)) };
        self.check_pending()?;
        Ok(class)
    }

    fn is_assignable(&self, from: jclass, to: jclass) -> bool {
        unsafe { jni_call!(self.env, IsAssignableFrom(from, to)) == JNI_TRUE }
    }

    fn unbox(
        &self,
        kind: PrimitiveKind,
        wrapper: jobject,
    ) -> Result<JavaValue<jobject>, DispatchError> {
        let env = self.env;
        let unbox = self.registry.bindings[kind as usize].unbox_method;
        let value = unsafe {
            match kind {
                PrimitiveKind::Boolean => JavaValue::Boolean(
                    jni_call!(env, CallBooleanMethod(wrapper, unbox)) == JNI_TRUE,
                ),
                PrimitiveKind::Byte => {
                    JavaValue::Byte(jni_call!(env, CallByteMethod(wrapper, unbox)))
                }
                PrimitiveKind::Char => {
                    JavaValue::Char(jni_call!(env, CallCharMethod(wrapper, unbox)))
                }
                PrimitiveKind::Short => {
                    JavaValue::Short(jni_call!(env, CallShortMethod(wrapper, unbox)))
                }
                PrimitiveKind::Int => JavaValue::Int(jni_call!(env, CallIntMethod(wrapper, unbox))),
                PrimitiveKind::Long => {
                    JavaValue::Long(jni_call!(env, CallLongMethod(wrapper, unbox)))
                }
                PrimitiveKind::Float => {
                    JavaValue::Float(jni_call!(env, CallFloatMethod(wrapper, unbox)))
                }
                PrimitiveKind::Double => {
                    JavaValue::Double(jni_call!(env, CallDoubleMethod(wrapper, unbox)))
                }
            }
        };
        self.check_pending()?;
        Ok(value)
    }

    fn new_primitive_array(
        &self,
        kind: PrimitiveKind,
        len: usize,
    ) -> Result<jobject, DispatchError> {
        let env = self.env;
        let len = len as jsize;
        let array = unsafe {
            match kind {
                PrimitiveKind::Boolean => jni_call!(env, NewBooleanArray(len)),
                PrimitiveKind::Byte => jni_call!(env, NewByteArray(len)),
                PrimitiveKind::Char => jni_call!(env, NewCharArray(len)),
                PrimitiveKind::Short => jni_call!(env, NewShortArray(len)),
                PrimitiveKind::Int => jni_call!(env, NewIntArray(len)),
                PrimitiveKind::Long => jni_call!(env, NewLongArray(len)),
                PrimitiveKind::Float => jni_call!(env, NewFloatArray(len)),
                PrimitiveKind::Double => jni_call!(env, NewDoubleArray(len)),
            }
        };
        if array.is_null() {
            self.check_pending()?;
            return Err(DispatchError::OutOfMemory);
        }
        Ok(array as jobject)
    }

    fn store_primitive_elements(
        &self,
        array: jobject,
        kind: PrimitiveKind,
        values: &[JavaValue<jobject>],
    ) -> Result<(), DispatchError> {
        let env = self.env;
        let len = values.len() as jsize;
        unsafe {
            match kind {
                PrimitiveKind::Boolean => {
                    let buffer: Vec<jboolean> =
                        values.iter().map(|v| u8::from(v.unwrap_bool_strict())).collect();
                    jni_call!(env, SetBooleanArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Byte => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_byte_strict()).collect();
                    jni_call!(env, SetByteArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Char => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_char_strict()).collect();
                    jni_call!(env, SetCharArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Short => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_short_strict()).collect();
                    jni_call!(env, SetShortArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Int => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_int_strict()).collect();
                    jni_call!(env, SetIntArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Long => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_long_strict()).collect();
                    jni_call!(env, SetLongArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Float => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_float_strict()).collect();
                    jni_call!(env, SetFloatArrayRegion(array, 0, len, buffer.as_ptr()));
                }
                PrimitiveKind::Double => {
                    let buffer: Vec<_> = values.iter().map(|v| v.unwrap_double_strict()).collect();
                    jni_call!(env, SetDoubleArrayRegion(array, 0, len, buffer.as_ptr()));
                }
            }
        }
        self.check_pending()
    }

    fn new_reference_array(
        &self,
        element_class: jclass,
        len: usize,
    ) -> Result<jobject, DispatchError> {
        let array = unsafe {
            jni_call!(self.env, NewObjectArray(len as jsize, element_class, ptr::null_mut()))
        };
        if array.is_null() {
            self.check_pending()?;
            return Err(DispatchError::OutOfMemory);
        }
        Ok(array as jobject)
    }

    fn store_reference_element(
        &self,
        array: jobject,
        index: usize,
        value: jobject,
    ) -> Result<(), DispatchError> {
        unsafe {
            jni_call!(self.env, SetObjectArrayElement(array, index as jsize, value));
        }
        self.check_pending()
    }

    fn alloc_instance(&self, class: jclass) -> Result<jobject, DispatchError> {
        let object = unsafe { jni_call!(self.env, AllocObject(class)) };
        if object.is_null() {
            self.check_pending()?;
            return Err(DispatchError::OutOfMemory);
        }
        Ok(object)
    }

    fn invoke(
        &self,
        site: CallSite<Self>,
        method: jmethodID,
        ret: Option<ValueKind>,
        args: &[JavaValue<jobject>],
    ) -> Result<Option<JavaValue<jobject>>, DispatchError> {
        let packed: Vec<jvalue> = args.iter().map(to_jvalue).collect();
        let argv = packed.as_ptr();
        let result = unsafe {
            match site {
                CallSite::Constructor { class } => {
                    let object = jni_call!(self.env, NewObjectA(class, method, argv));
                    if object.is_null() {
                        self.check_pending()?;
                        return Err(DispatchError::OutOfMemory);
                    }
                    Some(JavaValue::Object(Some(object)))
                }
                CallSite::Virtual { receiver } => self.call_virtual(receiver, method, ret, argv),
                CallSite::Nonvirtual { receiver, class } => {
                    self.call_nonvirtual(receiver, class, method, ret, argv)
                }
                CallSite::Static { class } => self.call_static(class, method, ret, argv),
            }
        };
        self.check_pending()?;
        Ok(result)
    }

    fn get_field(
        &self,
        site: FieldSite<Self>,
        field: jfieldID,
        kind: ValueKind,
    ) -> Result<JavaValue<jobject>, DispatchError> {
        let env = self.env;
        let value = unsafe {
            match site {
                FieldSite::Instance(object) => match kind {
                    ValueKind::Boolean => JavaValue::Boolean(
                        jni_call!(env, GetBooleanField(object, field)) == JNI_TRUE,
                    ),
                    ValueKind::Byte => JavaValue::Byte(jni_call!(env, GetByteField(object, field))),
                    ValueKind::Char => JavaValue::Char(jni_call!(env, GetCharField(object, field))),
                    ValueKind::Short => {
                        JavaValue::Short(jni_call!(env, GetShortField(object, field)))
                    }
                    ValueKind::Int => JavaValue::Int(jni_call!(env, GetIntField(object, field))),
                    ValueKind::Long => JavaValue::Long(jni_call!(env, GetLongField(object, field))),
                    ValueKind::Float => {
                        JavaValue::Float(jni_call!(env, GetFloatField(object, field)))
                    }
                    ValueKind::Double => {
                        JavaValue::Double(jni_call!(env, GetDoubleField(object, field)))
                    }
                    ValueKind::Object => reference(jni_call!(env, GetObjectField(object, field))),
                },
                FieldSite::Static(class) => match kind {
                    ValueKind::Boolean => JavaValue::Boolean(
                        jni_call!(env, GetStaticBooleanField(class, field)) == JNI_TRUE,
                    ),
                    ValueKind::Byte => {
                        JavaValue::Byte(jni_call!(env, GetStaticByteField(class, field)))
                    }
                    ValueKind::Char => {
                        JavaValue::Char(jni_call!(env, GetStaticCharField(class, field)))
                    }
                    ValueKind::Short => {
                        JavaValue::Short(jni_call!(env, GetStaticShortField(class, field)))
                    }
                    ValueKind::Int => {
                        JavaValue::Int(jni_call!(env, GetStaticIntField(class, field)))
                    }
                    ValueKind::Long => {
                        JavaValue::Long(jni_call!(env, GetStaticLongField(class, field)))
                    }
                    ValueKind::Float => {
                        JavaValue::Float(jni_call!(env, GetStaticFloatField(class, field)))
                    }
                    ValueKind::Double => {
                        JavaValue::Double(jni_call!(env, GetStaticDoubleField(class, field)))
                    }
                    ValueKind::Object => {
                        reference(jni_call!(env, GetStaticObjectField(class, field)))
                    }
                },
            }
        };
        Ok(value)
    }

    fn set_field(
        &self,
        site: FieldSite<Self>,
        field: jfieldID,
        value: JavaValue<jobject>,
    ) -> Result<(), DispatchError> {
        let env = self.env;
        unsafe {
            match site {
                FieldSite::Instance(object) => match value {
                    JavaValue::Boolean(z) => {
                        jni_call!(env, SetBooleanField(object, field, u8::from(z)))
                    }
                    JavaValue::Byte(b) => jni_call!(env, SetByteField(object, field, b)),
                    JavaValue::Char(c) => jni_call!(env, SetCharField(object, field, c)),
                    JavaValue::Short(s) => jni_call!(env, SetShortField(object, field, s)),
                    JavaValue::Int(i) => jni_call!(env, SetIntField(object, field, i)),
                    JavaValue::Long(j) => jni_call!(env, SetLongField(object, field, j)),
                    JavaValue::Float(f) => jni_call!(env, SetFloatField(object, field, f)),
                    JavaValue::Double(d) => jni_call!(env, SetDoubleField(object, field, d)),
                    JavaValue::Object(l) => jni_call!(
                        env,
                        SetObjectField(object, field, l.unwrap_or(ptr::null_mut()))
                    ),
                },
                FieldSite::Static(class) => match value {
                    JavaValue::Boolean(z) => {
                        jni_call!(env, SetStaticBooleanField(class, field, u8::from(z)))
                    }
                    JavaValue::Byte(b) => jni_call!(env, SetStaticByteField(class, field, b)),
                    JavaValue::Char(c) => jni_call!(env, SetStaticCharField(class, field, c)),
                    JavaValue::Short(s) => jni_call!(env, SetStaticShortField(class, field, s)),
                    JavaValue::Int(i) => jni_call!(env, SetStaticIntField(class, field, i)),
                    JavaValue::Long(j) => jni_call!(env, SetStaticLongField(class, field, j)),
                    JavaValue::Float(f) => jni_call!(env, SetStaticFloatField(class, field, f)),
                    JavaValue::Double(d) => jni_call!(env, SetStaticDoubleField(class, field, d)),
                    JavaValue::Object(l) => jni_call!(
                        env,
                        SetStaticObjectField(class, field, l.unwrap_or(ptr::null_mut()))
                    ),
                },
            }
        }
        Ok(())
    }
}
