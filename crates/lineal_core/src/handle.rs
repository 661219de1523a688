//! Engine-tagged handles.
//!
//! Every handle carries the id of the engine that minted it, so an engine
//! can reject handles that belong to a sibling engine instead of silently
//! resolving against the wrong registry.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineId(u32);

impl EngineId {
    pub fn new(raw: u32) -> Self {
        EngineId(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            engine: EngineId,
            index: u32,
        }

        impl $name {
            pub fn new(engine: EngineId, index: u32) -> Self {
                Self { engine, index }
            }

            pub fn engine(self) -> EngineId {
                self.engine
            }

            pub fn index(self) -> usize {
                self.index as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index)
            }
        }
    };
}

handle_type!(
    /// Handle to a named method bundle with no instances of its own.
    ModuleId
);
handle_type!(
    /// Handle to a named type with a method table, an ordered include
    /// list, and an optional superclass.
    ClassId
);
handle_type!(
    /// Handle to an instance; the owning class is fixed at creation.
    InstanceId
);
