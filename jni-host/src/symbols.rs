//! Locating `JVM_DefineClass` in the running VM's own binary.
//!
//! The export is not part of JNI proper; HotSpot and every derivative ship
//! it from the JVM shared object. On Unix the process-global namespace is
//! searched; on Windows the already-loaded `jvm.dll` module is queried,
//! with the stdcall-decorated 32-bit name as a fallback.

use std::mem;
use std::os::raw::c_char;

use jni_sys::{jbyte, jclass, jobject, jsize, JNIEnv};

use crate::registry::InitError;

pub type DefineClassFn = unsafe extern "system" fn(
    env: *mut JNIEnv,
    name: *const c_char,
    loader: jobject,
    buf: *const jbyte,
    len: jsize,
    protection_domain: jobject,
) -> jclass;

#[cfg(not(windows))]
pub fn locate_define_class() -> Result<DefineClassFn, InitError> {
    use libloading::os::unix::Library;

    let library = Library::this();
    let function = unsafe {
        library
            .get::<DefineClassFn>(b"JVM_DefineClass\0")
            .map_err(|_| InitError::MissingSymbol)?
    };
    let function = *function;
    // The handle refers to the process image itself; never closed.
    mem::forget(library);
    Ok(function)
}

#[cfg(windows)]
pub fn locate_define_class() -> Result<DefineClassFn, InitError> {
    use libloading::os::windows::Library;

    let library =
        unsafe { Library::open_already_loaded("jvm.dll") }.map_err(|_| InitError::MissingSymbol)?;
    let function = unsafe {
        library
            .get::<DefineClassFn>(b"JVM_DefineClass\0")
            .or_else(|_| library.get::<DefineClassFn>(b"_JVM_DefineClass@24\0"))
            .map_err(|_| InitError::MissingSymbol)?
    };
    let function = *function;
    mem::forget(library);
    Ok(function)
}
