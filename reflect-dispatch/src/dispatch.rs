//! The generic dispatch operations behind every native entry point.
//!
//! One `call` handles all method shapes (the invocation kind lives in
//! [`CallSite`], the return kind in `Option<ValueKind>`), one `construct`
//! handles constructors, and one `read_field`/`write_field` pair handles
//! all field shapes. The per-kind fanout happens at the native export
//! layer, not here.

use crate::error::DispatchError;
use crate::host::{CallSite, FieldSite, HostRuntime};
use crate::unbox::unbox_arguments;
use crate::value::{JavaValue, ValueKind};

/// Invoke a reflected method: resolve its native handle, unbox the supplied
/// arguments against its declared parameters, and call through the host.
pub fn call<H: HostRuntime + ?Sized>(
    host: &H,
    site: CallSite<H>,
    reflected_method: H::Ref,
    supplied: &[H::Ref],
    ret: Option<ValueKind>,
) -> Result<Option<JavaValue<H::Ref>>, DispatchError> {
    let method = host.method_handle(reflected_method)?;
    let args = unbox_arguments(host, reflected_method, supplied)?;
    host.invoke(site, method, ret, &args)
}

/// Invoke a reflected constructor, yielding the new instance.
pub fn construct<H: HostRuntime + ?Sized>(
    host: &H,
    class: H::Class,
    reflected_ctor: H::Ref,
    supplied: &[H::Ref],
) -> Result<Option<H::Ref>, DispatchError> {
    let result = call(
        host,
        CallSite::Constructor { class },
        reflected_ctor,
        supplied,
        Some(ValueKind::Object),
    )?;
    Ok(result.and_then(|value| value.unwrap_object()))
}

pub fn read_field<H: HostRuntime + ?Sized>(
    host: &H,
    site: FieldSite<H>,
    reflected_field: H::Ref,
    kind: ValueKind,
) -> Result<JavaValue<H::Ref>, DispatchError> {
    let field = host.field_handle(reflected_field)?;
    host.get_field(site, field, kind)
}

pub fn write_field<H: HostRuntime + ?Sized>(
    host: &H,
    site: FieldSite<H>,
    reflected_field: H::Ref,
    value: JavaValue<H::Ref>,
) -> Result<(), DispatchError> {
    let field = host.field_handle(reflected_field)?;
    host.set_field(site, field, value)
}

/// Allocate an instance of `class` with every constructor bypassed.
pub fn allocate<H: HostRuntime + ?Sized>(
    host: &H,
    class: H::Class,
) -> Result<H::Ref, DispatchError> {
    host.alloc_instance(class)
}
