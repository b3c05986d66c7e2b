//! The boxed-arguments-to-raw-slots protocol.
//!
//! Callers hand every argument as an object reference. Each declared
//! primitive parameter must be matched by an instance of exactly the
//! corresponding wrapper class (no widening, no cross-wrapper coercion);
//! each declared reference parameter by null or an assignable instance.
//! A variadic tail is assembled into a freshly allocated array of the
//! declared element type.

use itertools::Itertools;

use crate::descriptor::ExecutableDescriptor;
use crate::error::DispatchError;
use crate::host::HostRuntime;
use crate::value::{JavaValue, PrimitiveKind};

/// Unbox `supplied` against the declared parameters of `executable`,
/// producing one packed slot per declared parameter. Fails fast: arity
/// first, then fixed slots left to right, then the tail array allocation,
/// then tail elements left to right.
pub fn unbox_arguments<H: HostRuntime + ?Sized>(
    host: &H,
    executable: H::Ref,
    supplied: &[H::Ref],
) -> Result<Vec<JavaValue<H::Ref>>, DispatchError> {
    let descriptor = ExecutableDescriptor::derive(host, executable)?;
    if !descriptor.arity_matches(supplied.len()) {
        return Err(DispatchError::WrongArity);
    }
    let (fixed_args, tail_args) = supplied.split_at(descriptor.fixed.len());

    let mut slots = Vec::with_capacity(descriptor.slot_count());
    for (&declared, &argument) in descriptor.fixed.iter().zip_eq(fixed_args) {
        slots.push(coerce_argument(host, declared, argument)?);
    }
    if let Some(element) = descriptor.variadic_element {
        slots.push(assemble_tail(host, element, tail_args)?);
    }
    Ok(slots)
}

/// One fixed slot: exact-wrapper unbox for a primitive parameter,
/// null-or-assignable pass-through for a reference parameter.
fn coerce_argument<H: HostRuntime + ?Sized>(
    host: &H,
    declared: H::Class,
    argument: H::Ref,
) -> Result<JavaValue<H::Ref>, DispatchError> {
    match host.primitive_kind(declared) {
        Some(kind) => unbox_exact(host, kind, argument),
        None => {
            if host.is_null(argument) {
                return Ok(JavaValue::Object(None));
            }
            let actual = host.class_of(argument)?;
            if !host.is_assignable(actual, declared) {
                return Err(DispatchError::IncompatibleArgument);
            }
            Ok(JavaValue::Object(Some(argument)))
        }
    }
}

/// Wrapper identity is matched exactly: an Integer argument satisfies only
/// an int parameter, never a long or short one.
fn unbox_exact<H: HostRuntime + ?Sized>(
    host: &H,
    kind: PrimitiveKind,
    argument: H::Ref,
) -> Result<JavaValue<H::Ref>, DispatchError> {
    if host.is_null(argument) {
        return Err(DispatchError::NullUnbox(kind));
    }
    let actual = host.class_of(argument)?;
    if !host.is_wrapper_of(kind, actual) {
        return Err(DispatchError::WrapperMismatch(kind));
    }
    host.unbox(kind, argument)
}

/// Build the trailing variadic array. The array is allocated before any
/// element is examined, so an allocation failure precedes element type
/// errors even for an ill-typed tail.
fn assemble_tail<H: HostRuntime + ?Sized>(
    host: &H,
    element: H::Class,
    tail_args: &[H::Ref],
) -> Result<JavaValue<H::Ref>, DispatchError> {
    match host.primitive_kind(element) {
        Some(kind) => {
            let array = host.new_primitive_array(kind, tail_args.len())?;
            let mut values = Vec::with_capacity(tail_args.len());
            for &argument in tail_args {
                values.push(unbox_exact(host, kind, argument)?);
            }
            host.store_primitive_elements(array, kind, &values)?;
            Ok(JavaValue::Object(Some(array)))
        }
        None => {
            let array = host.new_reference_array(element, tail_args.len())?;
            for (index, &argument) in tail_args.iter().enumerate() {
                if !host.is_null(argument) {
                    let actual = host.class_of(argument)?;
                    if !host.is_assignable(actual, element) {
                        return Err(DispatchError::IncompatibleArgument);
                    }
                }
                host.store_reference_element(array, index, argument)?;
            }
            Ok(JavaValue::Object(Some(array)))
        }
    }
}
