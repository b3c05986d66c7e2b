//! The thirty `Call*Method` exports: one virtual/nonvirtual/static triple
//! per return kind, all stamped over the same dispatch call.

use jni_sys::{
    jboolean, jbyte, jchar, jclass, jdouble, jfloat, jint, jlong, jobject, jobjectArray, jshort,
    JNIEnv,
};

use reflect_dispatch::{dispatch, CallSite, JavaValue, ValueKind};

macro_rules! call_exports {
    ($(
        $virtual_name:ident / $nonvirtual_name:ident / $static_name:ident =>
            $raw:ty, $ret_kind:expr, $extract:expr, $default:expr;
    )*) => {$(
        #[no_mangle]
        pub unsafe extern "system" fn $virtual_name(
            env: *mut JNIEnv,
            _class: jclass,
            receiver: jobject,
            method: jobject,
            args: jobjectArray,
        ) -> $raw {
            crate::with_host(env, $default, |host| {
                let supplied = host.collect_arguments(args)?;
                let result = dispatch::call(
                    host,
                    CallSite::Virtual { receiver },
                    method,
                    &supplied,
                    $ret_kind,
                )?;
                Ok($extract(result))
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $nonvirtual_name(
            env: *mut JNIEnv,
            _class: jclass,
            receiver: jobject,
            clazz: jclass,
            method: jobject,
            args: jobjectArray,
        ) -> $raw {
            crate::with_host(env, $default, |host| {
                let supplied = host.collect_arguments(args)?;
                let result = dispatch::call(
                    host,
                    CallSite::Nonvirtual { receiver, class: clazz },
                    method,
                    &supplied,
                    $ret_kind,
                )?;
                Ok($extract(result))
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $static_name(
            env: *mut JNIEnv,
            _class: jclass,
            clazz: jclass,
            method: jobject,
            args: jobjectArray,
        ) -> $raw {
            crate::with_host(env, $default, |host| {
                let supplied = host.collect_arguments(args)?;
                let result = dispatch::call(
                    host,
                    CallSite::Static { class: clazz },
                    method,
                    &supplied,
                    $ret_kind,
                )?;
                Ok($extract(result))
            })
        }
    )*};
}

fn object_of(result: Option<JavaValue<jobject>>) -> jobject {
    result
        .and_then(|value| value.unwrap_object())
        .unwrap_or(std::ptr::null_mut())
}

call_exports! {
    Java_io_prybar_Prybar_CallVoidMethod
        / Java_io_prybar_Prybar_CallNonvirtualVoidMethod
        / Java_io_prybar_Prybar_CallStaticVoidMethod =>
        (), None, |_result| (), ();
    Java_io_prybar_Prybar_CallObjectMethod
        / Java_io_prybar_Prybar_CallNonvirtualObjectMethod
        / Java_io_prybar_Prybar_CallStaticObjectMethod =>
        jobject, Some(ValueKind::Object), object_of, std::ptr::null_mut();
    Java_io_prybar_Prybar_CallBooleanMethod
        / Java_io_prybar_Prybar_CallNonvirtualBooleanMethod
        / Java_io_prybar_Prybar_CallStaticBooleanMethod =>
        jboolean, Some(ValueKind::Boolean),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| u8::from(value.unwrap_bool_strict()))
        }, 0;
    Java_io_prybar_Prybar_CallByteMethod
        / Java_io_prybar_Prybar_CallNonvirtualByteMethod
        / Java_io_prybar_Prybar_CallStaticByteMethod =>
        jbyte, Some(ValueKind::Byte),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| value.unwrap_byte_strict())
        }, 0;
    Java_io_prybar_Prybar_CallCharMethod
        / Java_io_prybar_Prybar_CallNonvirtualCharMethod
        / Java_io_prybar_Prybar_CallStaticCharMethod =>
        jchar, Some(ValueKind::Char),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| value.unwrap_char_strict())
        }, 0;
    Java_io_prybar_Prybar_CallShortMethod
        / Java_io_prybar_Prybar_CallNonvirtualShortMethod
        / Java_io_prybar_Prybar_CallStaticShortMethod =>
        jshort, Some(ValueKind::Short),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| value.unwrap_short_strict())
        }, 0;
    Java_io_prybar_Prybar_CallIntMethod
        / Java_io_prybar_Prybar_CallNonvirtualIntMethod
        / Java_io_prybar_Prybar_CallStaticIntMethod =>
        jint, Some(ValueKind::Int),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| value.unwrap_int_strict())
        }, 0;
    Java_io_prybar_Prybar_CallLongMethod
        / Java_io_prybar_Prybar_CallNonvirtualLongMethod
        / Java_io_prybar_Prybar_CallStaticLongMethod =>
        jlong, Some(ValueKind::Long),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0, |value| value.unwrap_long_strict())
        }, 0;
    Java_io_prybar_Prybar_CallFloatMethod
        / Java_io_prybar_Prybar_CallNonvirtualFloatMethod
        / Java_io_prybar_Prybar_CallStaticFloatMethod =>
        jfloat, Some(ValueKind::Float),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0.0, |value| value.unwrap_float_strict())
        }, 0.0;
    Java_io_prybar_Prybar_CallDoubleMethod
        / Java_io_prybar_Prybar_CallNonvirtualDoubleMethod
        / Java_io_prybar_Prybar_CallStaticDoubleMethod =>
        jdouble, Some(ValueKind::Double),
        |result: Option<JavaValue<jobject>>| {
            result.map_or(0.0, |value| value.unwrap_double_strict())
        }, 0.0;
}
