use thiserror::Error;

use crate::value::PrimitiveKind;

/// Failure kinds of the unboxing/dispatch protocol.
///
/// Every failure is signaled synchronously to the caller and never retried.
/// `Pending` means a collaborator operation already raised a signal in the
/// host; the remaining steps were short-circuited and the signal must be
/// propagated unchanged, not wrapped or reinterpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Wrong number of arguments")]
    WrongArity,
    #[error("Cannot unbox a null argument; expected {0}")]
    NullUnbox(PrimitiveKind),
    #[error("Cannot unbox an argument with wrong type; expected {0}")]
    WrapperMismatch(PrimitiveKind),
    #[error("Incompatible argument type")]
    IncompatibleArgument,
    #[error("Out of memory")]
    OutOfMemory,
    #[error("a host exception is already pending")]
    Pending,
}
