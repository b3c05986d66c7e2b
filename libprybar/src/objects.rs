//! Instance creation: constructor-driven and constructor-bypassing.

use std::ptr;

use jni_sys::{jclass, jobject, jobjectArray, JNIEnv};

use reflect_dispatch::dispatch;

#[no_mangle]
pub unsafe extern "system" fn Java_io_prybar_Prybar_AllocObject(
    env: *mut JNIEnv,
    _class: jclass,
    clazz: jclass,
) -> jobject {
    crate::with_host(env, ptr::null_mut(), |host| dispatch::allocate(host, clazz))
}

#[no_mangle]
pub unsafe extern "system" fn Java_io_prybar_Prybar_NewObject(
    env: *mut JNIEnv,
    _class: jclass,
    clazz: jclass,
    constructor: jobject,
    args: jobjectArray,
) -> jobject {
    crate::with_host(env, ptr::null_mut(), |host| {
        let supplied = host.collect_arguments(args)?;
        let instance = dispatch::construct(host, clazz, constructor, &supplied)?;
        Ok(instance.unwrap_or(ptr::null_mut()))
    })
}
