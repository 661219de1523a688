//! Engine module - registries, chain resolution, and invocation.

mod core;
mod inspect;
mod invoke;
mod resolve;

pub use self::core::Engine;
pub use invoke::{Activation, MethodFn, method};
