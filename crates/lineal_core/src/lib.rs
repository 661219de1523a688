//! Core types for the lineal method resolution engine.
//!
//! This crate contains the fundamental types that are independent of the
//! engine itself:
//! - `Value` - runtime value passed to and returned from method bodies
//! - `ModuleId` / `ClassId` / `InstanceId` - engine-tagged handles
//! - `ErrorKind` / `EngineError` - the resolution error taxonomy
//! - `FastHashMap` - the shared hash map alias used for method tables

pub mod error;
pub mod handle;
pub mod map;
pub mod value;

pub use error::{EngineError, ErrorKind};
pub use handle::{ClassId, EngineId, InstanceId, ModuleId};
pub use map::{FastHashMap, fast_hasher, fast_map_new};
pub use value::Value;
