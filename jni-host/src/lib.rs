//! JNI backing for the dispatch core: the process-wide type registry, the
//! `JVM_DefineClass` symbol probe, and [`JniHost`], the `HostRuntime`
//! implementation that talks to the live virtual machine through `jni-sys`.

/// Resolve one member of a JNI function table and call it, passing the
/// table pointer as the implicit first argument. `jni-sys` models every
/// slot as an `Option`; the version negotiated at load guarantees the slots
/// this library touches are populated, so an empty one is a broken VM.
#[macro_export]
macro_rules! jni_call {
    ($env:expr, $name:ident ( $($arg:expr),* $(,)? )) => {{
        let env = $env;
        match (**env).$name {
            Some(function) => function(env $(, $arg)*),
            None => panic!(concat!("JNI function table has no ", stringify!($name))),
        }
    }};
}

pub mod define_class;
pub mod host;
pub mod registry;
pub mod symbols;

pub use crate::host::JniHost;
pub use crate::registry::{InitError, TypeRegistry};
