//! The process-wide initialization context: every class, field and method
//! the bridge touches is resolved once at load time into global references,
//! so the hot paths never run name lookups and never fail on resolution.

use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, Ordering};

use jni_sys::{jclass, jmethodID, JNIEnv};
use once_cell::sync::OnceCell;
use strum::IntoEnumIterator;
use thiserror::Error;

use reflect_dispatch::PrimitiveKind;

use crate::symbols::{locate_define_class, DefineClassFn};

#[derive(Debug, Error)]
pub enum InitError {
    #[error("required class {0} is missing")]
    MissingClass(&'static str),
    #[error("required member {0} is missing")]
    MissingMember(&'static str),
    #[error("the running VM does not export JVM_DefineClass")]
    MissingSymbol,
    #[error("native bridge initialized twice")]
    AlreadyInitialized,
}

/// One primitive kind's resolved identities: the wrapper class, the
/// primitive marker class (the wrapper's static `TYPE`), and the wrapper's
/// `xxxValue()` accessor.
#[derive(Copy, Clone)]
pub struct TypeBinding {
    pub wrapper: jclass,
    pub marker: jclass,
    pub unbox_method: jmethodID,
}

pub struct TypeRegistry {
    /// Indexed by `PrimitiveKind as usize`.
    pub bindings: [TypeBinding; 8],
    pub illegal_argument: jclass,
    pub out_of_memory: jclass,
    /// `Void.TYPE`. Resolved and released with the rest of the table; no
    /// unboxing path consults it since return kinds are fixed per entry
    /// point.
    pub void_marker: jclass,
    pub get_component_type: jmethodID,
    pub get_parameter_types: jmethodID,
    pub is_var_args: jmethodID,
    pub define_class: DefineClassFn,
}

// Global references and method ids stay valid on every attached thread.
unsafe impl Send for TypeRegistry {}
unsafe impl Sync for TypeRegistry {}

static REGISTRY: OnceCell<TypeRegistry> = OnceCell::new();
static RELEASED: AtomicBool = AtomicBool::new(false);

pub fn registry() -> Option<&'static TypeRegistry> {
    REGISTRY.get()
}

unsafe fn global_class(env: *mut JNIEnv, name: &'static CStr) -> Result<jclass, InitError> {
    let local = jni_call!(env, FindClass(name.as_ptr()));
    if local.is_null() {
        jni_call!(env, ExceptionClear());
        return Err(InitError::MissingClass(member_name(name)));
    }
    let global = jni_call!(env, NewGlobalRef(local)) as jclass;
    jni_call!(env, DeleteLocalRef(local));
    if global.is_null() {
        return Err(InitError::MissingClass(member_name(name)));
    }
    Ok(global)
}

unsafe fn method(
    env: *mut JNIEnv,
    class: jclass,
    name: &'static CStr,
    signature: &'static CStr,
) -> Result<jmethodID, InitError> {
    let id = jni_call!(env, GetMethodID(class, name.as_ptr(), signature.as_ptr()));
    if id.is_null() {
        jni_call!(env, ExceptionClear());
        return Err(InitError::MissingMember(member_name(name)));
    }
    Ok(id)
}

/// Read a wrapper's static `TYPE` field into a global reference.
unsafe fn primitive_marker(env: *mut JNIEnv, wrapper: jclass) -> Result<jclass, InitError> {
    let field = jni_call!(
        env,
        GetStaticFieldID(wrapper, c"TYPE".as_ptr(), c"Ljava/lang/Class;".as_ptr())
    );
    if field.is_null() {
        jni_call!(env, ExceptionClear());
        return Err(InitError::MissingMember("TYPE"));
    }
    let local = jni_call!(env, GetStaticObjectField(wrapper, field)) as jclass;
    if local.is_null() {
        return Err(InitError::MissingMember("TYPE"));
    }
    let global = jni_call!(env, NewGlobalRef(local)) as jclass;
    jni_call!(env, DeleteLocalRef(local));
    if global.is_null() {
        return Err(InitError::MissingMember("TYPE"));
    }
    Ok(global)
}

fn member_name(name: &'static CStr) -> &'static str {
    name.to_str().unwrap_or("<non-utf8>")
}

fn wrapper_descriptor(kind: PrimitiveKind) -> (&'static CStr, &'static CStr, &'static CStr) {
    match kind {
        PrimitiveKind::Boolean => (c"java/lang/Boolean", c"booleanValue", c"()Z"),
        PrimitiveKind::Byte => (c"java/lang/Byte", c"byteValue", c"()B"),
        PrimitiveKind::Char => (c"java/lang/Character", c"charValue", c"()C"),
        PrimitiveKind::Short => (c"java/lang/Short", c"shortValue", c"()S"),
        PrimitiveKind::Int => (c"java/lang/Integer", c"intValue", c"()I"),
        PrimitiveKind::Long => (c"java/lang/Long", c"longValue", c"()J"),
        PrimitiveKind::Float => (c"java/lang/Float", c"floatValue", c"()F"),
        PrimitiveKind::Double => (c"java/lang/Double", c"doubleValue", c"()D"),
    }
}

unsafe fn binding(env: *mut JNIEnv, kind: PrimitiveKind) -> Result<TypeBinding, InitError> {
    let (class_name, unbox_name, unbox_signature) = wrapper_descriptor(kind);
    let wrapper = global_class(env, class_name)?;
    let marker = primitive_marker(env, wrapper)?;
    let unbox_method = method(env, wrapper, unbox_name, unbox_signature)?;
    Ok(TypeBinding { wrapper, marker, unbox_method })
}

/// Resolve every JNI-side identity of the registry, in the fixed order:
/// exception classes, introspection accessor on `Class`, the void marker,
/// the eight wrapper bindings, then the `Executable` accessors.
unsafe fn resolve(env: *mut JNIEnv, define_class: DefineClassFn) -> Result<TypeRegistry, InitError> {
    let illegal_argument = global_class(env, c"java/lang/IllegalArgumentException")?;
    let out_of_memory = global_class(env, c"java/lang/OutOfMemoryError")?;

    let class_class = global_class(env, c"java/lang/Class")?;
    let get_component_type = method(env, class_class, c"getComponentType", c"()Ljava/lang/Class;")?;
    jni_call!(env, DeleteGlobalRef(class_class));

    let void_class = global_class(env, c"java/lang/Void")?;
    let void_marker = primitive_marker(env, void_class)?;
    jni_call!(env, DeleteGlobalRef(void_class));

    let bindings = [
        binding(env, PrimitiveKind::Boolean)?,
        binding(env, PrimitiveKind::Byte)?,
        binding(env, PrimitiveKind::Char)?,
        binding(env, PrimitiveKind::Short)?,
        binding(env, PrimitiveKind::Int)?,
        binding(env, PrimitiveKind::Long)?,
        binding(env, PrimitiveKind::Float)?,
        binding(env, PrimitiveKind::Double)?,
    ];

    let executable = global_class(env, c"java/lang/reflect/Executable")?;
    let get_parameter_types =
        method(env, executable, c"getParameterTypes", c"()[Ljava/lang/Class;")?;
    let is_var_args = method(env, executable, c"isVarArgs", c"()Z")?;
    jni_call!(env, DeleteGlobalRef(executable));

    Ok(TypeRegistry {
        bindings,
        illegal_argument,
        out_of_memory,
        void_marker,
        get_component_type,
        get_parameter_types,
        is_var_args,
        define_class,
    })
}

/// Resolve the whole registry and publish it. Called from the library's
/// load hook; a failure leaves nothing published and the load hook reports
/// the error to the VM.
pub unsafe fn initialize(env: *mut JNIEnv) -> Result<(), InitError> {
    let define_class = locate_define_class()?;
    let registry = resolve(env, define_class)?;
    REGISTRY.set(registry).map_err(|_| InitError::AlreadyInitialized)
}

/// Drop every global reference the registry holds. Runs at most once; the
/// registry value itself stays published since unload hooks can race late
/// native frames.
pub unsafe fn release(env: *mut JNIEnv) {
    if RELEASED.swap(true, Ordering::SeqCst) {
        return;
    }
    let registry = match REGISTRY.get() {
        Some(registry) => registry,
        None => return,
    };
    for kind in PrimitiveKind::iter() {
        let binding = &registry.bindings[kind as usize];
        jni_call!(env, DeleteGlobalRef(binding.wrapper));
        jni_call!(env, DeleteGlobalRef(binding.marker));
    }
    jni_call!(env, DeleteGlobalRef(registry.illegal_argument));
    jni_call!(env, DeleteGlobalRef(registry.out_of_memory));
    jni_call!(env, DeleteGlobalRef(registry.void_marker));
}
