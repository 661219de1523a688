//! Method resolution engine.
//!
//! Builds a description of a type hierarchy (classes, modules included
//! into classes, per-instance singleton layers) and executes named method
//! calls against it. Resolution produces an ordered candidate chain; a
//! running implementation can continue into the next candidate with
//! [`Activation::call_next`], reproducing `super` semantics with an
//! explicit, inspectable chain.

mod engine;

pub use engine::{Activation, Engine, MethodFn, method};
pub use lineal_core::{ClassId, EngineError, ErrorKind, InstanceId, ModuleId, Value};
