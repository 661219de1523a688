//! Chain computation and the version-validated chain cache.

use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashMap;
use lineal_core::{ClassId, EngineError, InstanceId, ModuleId};
use smallvec::SmallVec;

use super::core::Engine;
use super::invoke::MethodFn;

/// Where a chain entry came from; drives error messages and chain dumps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Owner {
    /// Direct singleton definition on the receiver.
    Singleton(InstanceId),
    /// Module extended onto the receiver.
    Extended(ModuleId),
    /// The class's own method table.
    Class(ClassId),
    /// Module included into a class on the superclass walk.
    Included { module: ModuleId, class: ClassId },
}

#[derive(Clone)]
pub(crate) struct ChainEntry {
    pub(crate) owner: Owner,
    pub(crate) body: MethodFn,
}

struct CachedChain {
    structure_version: u64,
    singleton_version: u64,
    chain: Rc<[ChainEntry]>,
}

/// Cache of computed chains keyed by (instance slot, method name).
/// Entries are validated against the engine's structure version and the
/// instance's singleton version rather than invalidated eagerly.
pub(crate) struct ChainCache {
    entries: HashMap<(u32, String), CachedChain, RandomState>,
}

impl ChainCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::new()),
        }
    }
}

impl Engine {
    /// Computes the full candidate chain for `(instance, name)`, cached.
    ///
    /// The returned chain is a shared snapshot: structural mutation after
    /// this point produces a new chain on the next lookup and never touches
    /// a snapshot already handed out.
    pub(crate) fn resolve_chain(
        &mut self,
        instance: InstanceId,
        name: &str,
    ) -> Result<Rc<[ChainEntry]>, EngineError> {
        let singleton_version = self.instance(instance)?.version;
        let key = (instance.index() as u32, name.to_string());
        if let Some(cached) = self.chain_cache.entries.get(&key) {
            if cached.structure_version == self.structure_version
                && cached.singleton_version == singleton_version
            {
                return Ok(cached.chain.clone());
            }
        }
        let chain = self.build_chain(instance, name)?;
        self.chain_cache.entries.insert(
            key,
            CachedChain {
                structure_version: self.structure_version,
                singleton_version,
                chain: chain.clone(),
            },
        );
        Ok(chain)
    }

    /// Uncached chain walk. Order: direct singleton definition, extended
    /// modules most-recent-first, then each class on the superclass walk
    /// (own method first, then its includes most-recently-included first).
    /// Tables that do not define `name` are skipped without disturbing the
    /// relative order of the rest.
    pub(crate) fn build_chain(
        &self,
        instance: InstanceId,
        name: &str,
    ) -> Result<Rc<[ChainEntry]>, EngineError> {
        let inst = self.instance(instance)?;
        let mut out: SmallVec<[ChainEntry; 8]> = SmallVec::new();

        if let Some(body) = inst.singleton_methods.get(name) {
            out.push(ChainEntry {
                owner: Owner::Singleton(instance),
                body: body.clone(),
            });
        }
        for &module in &inst.extended {
            if let Some(body) = self.modules[module.index()].methods.get(name) {
                out.push(ChainEntry {
                    owner: Owner::Extended(module),
                    body: body.clone(),
                });
            }
        }

        let mut cursor = Some(inst.class);
        while let Some(class_id) = cursor {
            let class = self.class(class_id)?;
            if let Some(body) = class.methods.get(name) {
                out.push(ChainEntry {
                    owner: Owner::Class(class_id),
                    body: body.clone(),
                });
            }
            for &module in &class.includes {
                if let Some(body) = self.modules[module.index()].methods.get(name) {
                    out.push(ChainEntry {
                        owner: Owner::Included {
                            module,
                            class: class_id,
                        },
                        body: body.clone(),
                    });
                }
            }
            cursor = class.superclass;
        }

        Ok(out.into_iter().collect())
    }
}
