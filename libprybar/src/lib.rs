//! Native half of `io.prybar.Prybar`.
//!
//! Every export is a thin shim: attach a [`JniHost`] to the frame, collect
//! the boxed arguments, run the shared dispatch path, and convert failures
//! into the Java exceptions the managed side documents. The per-return-kind
//! fanout lives entirely in the `calls`/`fields` macros; the semantics live
//! in `reflect-dispatch`.

use std::os::raw::c_void;
use std::ptr;

use jni_sys::{jint, JNIEnv, JavaVM, JNI_ERR, JNI_OK, JNI_VERSION_1_2};

use jni_host::{jni_call, registry, JniHost};
use reflect_dispatch::DispatchError;

mod calls;
mod define_class;
mod fields;
mod objects;

/// Run `f` against the registry-backed host, throwing on failure and
/// returning `default` whenever no value can be produced. Before
/// `JNI_OnLoad` has published the registry every export is a no-op.
pub(crate) unsafe fn with_host<T>(
    env: *mut JNIEnv,
    default: T,
    f: impl FnOnce(&JniHost) -> Result<T, DispatchError>,
) -> T {
    match JniHost::attach(env) {
        Some(host) => match f(&host) {
            Ok(value) => value,
            Err(error) => {
                host.raise(error);
                default
            }
        },
        None => default,
    }
}

#[no_mangle]
pub unsafe extern "system" fn JNI_OnLoad(vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    let mut env: *mut c_void = ptr::null_mut();
    if jni_call!(vm, GetEnv(&mut env, JNI_VERSION_1_2)) != JNI_OK {
        return JNI_ERR;
    }
    if registry::initialize(env as *mut JNIEnv).is_err() {
        return JNI_ERR;
    }
    JNI_VERSION_1_2
}

#[no_mangle]
pub unsafe extern "system" fn JNI_OnUnload(vm: *mut JavaVM, _reserved: *mut c_void) {
    let mut env: *mut c_void = ptr::null_mut();
    if jni_call!(vm, GetEnv(&mut env, JNI_VERSION_1_2)) != JNI_OK {
        return;
    }
    registry::release(env as *mut JNIEnv);
}
