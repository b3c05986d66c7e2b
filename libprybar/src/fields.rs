//! The thirty-six field exports: get/set, instance/static, per value kind.

use jni_sys::{
    jboolean, jbyte, jchar, jclass, jdouble, jfloat, jint, jlong, jobject, jshort, JNIEnv,
};

use reflect_dispatch::{dispatch, FieldSite, JavaValue, ValueKind};

fn wrap_object(value: jobject) -> JavaValue<jobject> {
    JavaValue::Object(if value.is_null() { None } else { Some(value) })
}

fn extract_object(value: JavaValue<jobject>) -> jobject {
    value.unwrap_object().unwrap_or(std::ptr::null_mut())
}

macro_rules! field_exports {
    ($(
        $get_name:ident / $set_name:ident / $get_static_name:ident / $set_static_name:ident =>
            $raw:ty, $kind:expr, $wrap:expr, $extract:expr, $default:expr;
    )*) => {$(
        #[no_mangle]
        pub unsafe extern "system" fn $get_name(
            env: *mut JNIEnv,
            _class: jclass,
            object: jobject,
            field: jobject,
        ) -> $raw {
            crate::with_host(env, $default, |host| {
                let value =
                    dispatch::read_field(host, FieldSite::Instance(object), field, $kind)?;
                Ok($extract(value))
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $set_name(
            env: *mut JNIEnv,
            _class: jclass,
            object: jobject,
            field: jobject,
            value: $raw,
        ) {
            crate::with_host(env, (), |host| {
                dispatch::write_field(host, FieldSite::Instance(object), field, $wrap(value))
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $get_static_name(
            env: *mut JNIEnv,
            _class: jclass,
            owner: jclass,
            field: jobject,
        ) -> $raw {
            crate::with_host(env, $default, |host| {
                let value = dispatch::read_field(host, FieldSite::Static(owner), field, $kind)?;
                Ok($extract(value))
            })
        }

        #[no_mangle]
        pub unsafe extern "system" fn $set_static_name(
            env: *mut JNIEnv,
            _class: jclass,
            owner: jclass,
            field: jobject,
            value: $raw,
        ) {
            crate::with_host(env, (), |host| {
                dispatch::write_field(host, FieldSite::Static(owner), field, $wrap(value))
            })
        }
    )*};
}

field_exports! {
    Java_io_prybar_Prybar_GetObjectField
        / Java_io_prybar_Prybar_SetObjectField
        / Java_io_prybar_Prybar_GetStaticObjectField
        / Java_io_prybar_Prybar_SetStaticObjectField =>
        jobject, ValueKind::Object, wrap_object, extract_object, std::ptr::null_mut();
    Java_io_prybar_Prybar_GetBooleanField
        / Java_io_prybar_Prybar_SetBooleanField
        / Java_io_prybar_Prybar_GetStaticBooleanField
        / Java_io_prybar_Prybar_SetStaticBooleanField =>
        jboolean, ValueKind::Boolean,
        |value: jboolean| JavaValue::Boolean(value != 0),
        |value: JavaValue<jobject>| u8::from(value.unwrap_bool_strict()), 0;
    Java_io_prybar_Prybar_GetByteField
        / Java_io_prybar_Prybar_SetByteField
        / Java_io_prybar_Prybar_GetStaticByteField
        / Java_io_prybar_Prybar_SetStaticByteField =>
        jbyte, ValueKind::Byte,
        JavaValue::Byte,
        |value: JavaValue<jobject>| value.unwrap_byte_strict(), 0;
    Java_io_prybar_Prybar_GetCharField
        / Java_io_prybar_Prybar_SetCharField
        / Java_io_prybar_Prybar_GetStaticCharField
        / Java_io_prybar_Prybar_SetStaticCharField =>
        jchar, ValueKind::Char,
        JavaValue::Char,
        |value: JavaValue<jobject>| value.unwrap_char_strict(), 0;
    Java_io_prybar_Prybar_GetShortField
        / Java_io_prybar_Prybar_SetShortField
        / Java_io_prybar_Prybar_GetStaticShortField
        / Java_io_prybar_Prybar_SetStaticShortField =>
        jshort, ValueKind::Short,
        JavaValue::Short,
        |value: JavaValue<jobject>| value.unwrap_short_strict(), 0;
    Java_io_prybar_Prybar_GetIntField
        / Java_io_prybar_Prybar_SetIntField
        / Java_io_prybar_Prybar_GetStaticIntField
        / Java_io_prybar_Prybar_SetStaticIntField =>
        jint, ValueKind::Int,
        JavaValue::Int,
        |value: JavaValue<jobject>| value.unwrap_int_strict(), 0;
    Java_io_prybar_Prybar_GetLongField
        / Java_io_prybar_Prybar_SetLongField
        / Java_io_prybar_Prybar_GetStaticLongField
        / Java_io_prybar_Prybar_SetStaticLongField =>
        jlong, ValueKind::Long,
        JavaValue::Long,
        |value: JavaValue<jobject>| value.unwrap_long_strict(), 0;
    Java_io_prybar_Prybar_GetFloatField
        / Java_io_prybar_Prybar_SetFloatField
        / Java_io_prybar_Prybar_GetStaticFloatField
        / Java_io_prybar_Prybar_SetStaticFloatField =>
        jfloat, ValueKind::Float,
        JavaValue::Float,
        |value: JavaValue<jobject>| value.unwrap_float_strict(), 0.0;
    Java_io_prybar_Prybar_GetDoubleField
        / Java_io_prybar_Prybar_SetDoubleField
        / Java_io_prybar_Prybar_GetStaticDoubleField
        / Java_io_prybar_Prybar_SetStaticDoubleField =>
        jdouble, ValueKind::Double,
        JavaValue::Double,
        |value: JavaValue<jobject>| value.unwrap_double_strict(), 0.0;
}
