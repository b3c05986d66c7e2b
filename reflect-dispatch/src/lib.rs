//! Host-independent core of the reflection-bypass bridge.
//!
//! Everything here is generic over [`host::HostRuntime`], the narrow
//! capability interface to the owning virtual machine. The two pieces that
//! matter are the argument-unboxing protocol ([`unbox`]) and the generic
//! dispatch operations ([`dispatch`]) that replace what would otherwise be
//! ~70 near-identical per-return-type entry points.

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod unbox;
pub mod value;

#[cfg(test)]
pub mod mock;

pub use crate::error::DispatchError;
pub use crate::host::{CallSite, FieldSite, HostRuntime};
pub use crate::value::{JavaValue, PrimitiveKind, ValueKind};
