//! Feeding caller-supplied bytecode into `JVM_DefineClass`.
//!
//! Two entry paths: a `byte[]` copy through an owned staging buffer, and a
//! direct `ByteBuffer` whose backing address is handed to the VM as-is.
//! Some VMs answer `GetDirectBufferAddress` with all-bits-one instead of
//! null for a heap buffer; that sentinel is normalized to null before the
//! VM sees it.

use std::os::raw::c_char;
use std::ptr;

use jni_sys::{jbyte, jbyteArray, jclass, jobject, jsize, jstring, JNIEnv, JNI_TRUE};

use reflect_dispatch::DispatchError;

use crate::registry::TypeRegistry;

/// Owned staging area for classfile bytes. Allocation failure is reported
/// as [`DispatchError::OutOfMemory`] instead of aborting the process.
pub struct BytecodeBuffer {
    bytes: Vec<jbyte>,
}

impl BytecodeBuffer {
    pub fn with_len(len: usize) -> Result<BytecodeBuffer, DispatchError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| DispatchError::OutOfMemory)?;
        bytes.resize(len, 0);
        Ok(BytecodeBuffer { bytes })
    }

    pub fn len(&self) -> jsize {
        self.bytes.len() as jsize
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_ptr(&self) -> *const jbyte {
        self.bytes.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut jbyte {
        self.bytes.as_mut_ptr()
    }
}

/// Pinned UTF-8 view of the optional class name; released on drop on every
/// exit path.
struct UtfName {
    env: *mut JNIEnv,
    string: jstring,
    chars: *const c_char,
}

impl UtfName {
    unsafe fn pin(env: *mut JNIEnv, string: jstring) -> Result<Option<UtfName>, DispatchError> {
        if string.is_null() {
            return Ok(None);
        }
        let chars = jni_call!(env, GetStringUTFChars(string, ptr::null_mut()));
        if chars.is_null() {
            return Err(DispatchError::OutOfMemory);
        }
        Ok(Some(UtfName { env, string, chars }))
    }
}

impl Drop for UtfName {
    fn drop(&mut self) {
        unsafe {
            jni_call!(self.env, ReleaseStringUTFChars(self.string, self.chars));
        }
    }
}

fn name_ptr(name: &Option<UtfName>) -> *const c_char {
    name.as_ref().map_or(ptr::null(), |pinned| pinned.chars)
}

/// Define a class from a `byte[]` range, copied into an owned buffer first.
/// The range check is the VM's: a bad offset/length pair surfaces as the
/// exception `GetByteArrayRegion` raises.
///
/// # Safety
/// `env` must be the valid `JNIEnv` of the calling thread; `bytes` must be
/// a live `byte[]` reference.
pub unsafe fn define_class_from_array(
    env: *mut JNIEnv,
    registry: &TypeRegistry,
    name: jstring,
    loader: jobject,
    bytes: jbyteArray,
    offset: jsize,
    length: jsize,
    protection_domain: jobject,
) -> Result<jclass, DispatchError> {
    let name = UtfName::pin(env, name)?;
    let mut buffer = BytecodeBuffer::with_len(length.max(0) as usize)?;
    jni_call!(env, GetByteArrayRegion(bytes, offset, length, buffer.as_mut_ptr()));
    if jni_call!(env, ExceptionCheck()) == JNI_TRUE {
        return Err(DispatchError::Pending);
    }
    let class = (registry.define_class)(
        env,
        name_ptr(&name),
        loader,
        buffer.as_ptr(),
        buffer.len(),
        protection_domain,
    );
    Ok(class)
}

/// Define a class straight from a direct `ByteBuffer`'s backing storage,
/// with the caller naming the usable length explicitly.
///
/// # Safety
/// Same as [`define_class_from_array`]; `buffer` must be a live
/// `ByteBuffer` reference.
pub unsafe fn define_class_from_direct(
    env: *mut JNIEnv,
    registry: &TypeRegistry,
    name: jstring,
    loader: jobject,
    buffer: jobject,
    length: jsize,
    protection_domain: jobject,
) -> Result<jclass, DispatchError> {
    let name = UtfName::pin(env, name)?;
    let mut address = jni_call!(env, GetDirectBufferAddress(buffer)) as *const jbyte;
    // A heap buffer answers with the all-bits-one sentinel on some VMs;
    // hand the definition hook null and let it reject the request.
    if address as isize == -1 {
        address = ptr::null();
    }
    let class = (registry.define_class)(
        env,
        name_ptr(&name),
        loader,
        address,
        length,
        protection_domain,
    );
    Ok(class)
}
