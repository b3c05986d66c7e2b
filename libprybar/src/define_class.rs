//! The two class-definition exports. Distinct native names sidestep the
//! argument-signature mangling JNI demands for overloaded natives.

use std::ptr;

use jni_sys::{jbyteArray, jclass, jint, jobject, jstring, JNIEnv};

use jni_host::define_class::{define_class_from_array, define_class_from_direct};

#[no_mangle]
pub unsafe extern "system" fn Java_io_prybar_Prybar_DefineClass(
    env: *mut JNIEnv,
    _class: jclass,
    name: jstring,
    loader: jobject,
    bytes: jbyteArray,
    offset: jint,
    length: jint,
    protection_domain: jobject,
) -> jclass {
    crate::with_host(env, ptr::null_mut(), |host| unsafe {
        define_class_from_array(
            host.env(),
            host.registry(),
            name,
            loader,
            bytes,
            offset,
            length,
            protection_domain,
        )
    })
}

#[no_mangle]
pub unsafe extern "system" fn Java_io_prybar_Prybar_DefineClassBuffer(
    env: *mut JNIEnv,
    _class: jclass,
    name: jstring,
    loader: jobject,
    buffer: jobject,
    length: jint,
    protection_domain: jobject,
) -> jclass {
    crate::with_host(env, ptr::null_mut(), |host| unsafe {
        define_class_from_direct(
            host.env(),
            host.registry(),
            name,
            loader,
            buffer,
            length,
            protection_domain,
        )
    })
}
