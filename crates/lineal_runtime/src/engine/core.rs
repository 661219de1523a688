use std::sync::atomic::{AtomicU32, Ordering};

use indexmap::IndexMap;
use lineal_core::{
    ClassId, EngineError, EngineId, FastHashMap, InstanceId, ModuleId, fast_map_new,
};

use super::invoke::MethodFn;
use super::resolve::ChainCache;

static NEXT_ENGINE_ID: AtomicU32 = AtomicU32::new(1);

pub(crate) struct ModuleDef {
    pub(crate) name: String,
    pub(crate) methods: FastHashMap<String, MethodFn>,
}

pub(crate) struct ClassDef {
    pub(crate) name: String,
    pub(crate) superclass: Option<ClassId>,
    /// Most-recently-included first.
    pub(crate) includes: Vec<ModuleId>,
    pub(crate) methods: FastHashMap<String, MethodFn>,
}

pub(crate) struct InstanceDef {
    pub(crate) class: ClassId,
    pub(crate) serial: u32,
    /// Direct singleton definitions; one slot per name, last def wins.
    pub(crate) singleton_methods: FastHashMap<String, MethodFn>,
    /// Most-recently-extended first.
    pub(crate) extended: Vec<ModuleId>,
    /// Bumped on every singleton-layer mutation; validates cached chains.
    pub(crate) version: u64,
}

pub struct Engine {
    pub(crate) id: EngineId,
    pub(crate) modules: Vec<ModuleDef>,
    pub(crate) classes: Vec<ClassDef>,
    pub(crate) instances: Vec<InstanceDef>,
    pub(crate) module_names: IndexMap<String, ModuleId>,
    pub(crate) class_names: IndexMap<String, ClassId>,
    /// Bumped on every class- or module-side mutation.
    pub(crate) structure_version: u64,
    pub(crate) chain_cache: ChainCache,
    pub(crate) fallback: Option<MethodFn>,
    next_serial: u32,
    pub(crate) output: String,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            id: EngineId::new(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed)),
            modules: Vec::new(),
            classes: Vec::new(),
            instances: Vec::new(),
            module_names: IndexMap::new(),
            class_names: IndexMap::new(),
            structure_version: 0,
            chain_cache: ChainCache::new(),
            fallback: None,
            next_serial: 1,
            output: String::new(),
        }
    }

    pub fn define_module(&mut self, name: impl Into<String>) -> ModuleId {
        let name = name.into();
        let id = ModuleId::new(self.id, self.modules.len() as u32);
        self.modules.push(ModuleDef {
            name: name.clone(),
            methods: fast_map_new(),
        });
        self.module_names.insert(name, id);
        id
    }

    pub fn define_module_method(
        &mut self,
        module: ModuleId,
        name: impl Into<String>,
        body: MethodFn,
    ) -> Result<(), EngineError> {
        let def = self.module_mut(module)?;
        def.methods.insert(name.into(), body);
        self.structure_version += 1;
        Ok(())
    }

    pub fn define_class(
        &mut self,
        name: impl Into<String>,
        superclass: Option<ClassId>,
    ) -> Result<ClassId, EngineError> {
        if let Some(sup) = superclass {
            self.class(sup)?;
        }
        let name = name.into();
        let id = ClassId::new(self.id, self.classes.len() as u32);
        self.classes.push(ClassDef {
            name: name.clone(),
            superclass,
            includes: Vec::new(),
            methods: fast_map_new(),
        });
        self.class_names.insert(name, id);
        Ok(id)
    }

    pub fn define_class_method(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        body: MethodFn,
    ) -> Result<(), EngineError> {
        let def = self.class_mut(class)?;
        def.methods.insert(name.into(), body);
        self.structure_version += 1;
        Ok(())
    }

    /// Puts `module` at the front of the class's include order. Re-including
    /// a module already present moves it to the front instead of duplicating
    /// it.
    pub fn include_module(&mut self, class: ClassId, module: ModuleId) -> Result<(), EngineError> {
        self.module(module)?;
        let def = self.class_mut(class)?;
        def.includes.retain(|m| *m != module);
        def.includes.insert(0, module);
        self.structure_version += 1;
        Ok(())
    }

    pub fn define_instance(&mut self, class: ClassId) -> Result<InstanceId, EngineError> {
        self.class(class)?;
        let id = InstanceId::new(self.id, self.instances.len() as u32);
        let serial = self.next_serial;
        self.next_serial += 1;
        self.instances.push(InstanceDef {
            class,
            serial,
            singleton_methods: fast_map_new(),
            extended: Vec::new(),
            version: 0,
        });
        Ok(id)
    }

    /// A direct singleton definition always outranks modules extended onto
    /// the same instance, whichever came first. Defining the same name again
    /// replaces the earlier definition in place.
    pub fn define_singleton_method(
        &mut self,
        instance: InstanceId,
        name: impl Into<String>,
        body: MethodFn,
    ) -> Result<(), EngineError> {
        let def = self.instance_mut(instance)?;
        def.singleton_methods.insert(name.into(), body);
        def.version += 1;
        Ok(())
    }

    /// Puts `module` at the front of the instance's extended order, below
    /// any direct singleton definitions. Re-extending moves it to the front
    /// instead of duplicating it.
    pub fn extend_with_module(
        &mut self,
        instance: InstanceId,
        module: ModuleId,
    ) -> Result<(), EngineError> {
        self.module(module)?;
        let def = self.instance_mut(instance)?;
        def.extended.retain(|m| *m != module);
        def.extended.insert(0, module);
        def.version += 1;
        Ok(())
    }

    /// Engine-level catch-all, consulted only when a call resolves to an
    /// empty chain. Never reachable through `call_next`.
    pub fn set_fallback(&mut self, body: MethodFn) {
        self.fallback = Some(body);
    }

    /// Drains the transcript buffer fed by [`super::Activation::emit`].
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    // Handle validation. Every public operation goes through one of these
    // before touching a registry.

    pub(crate) fn module(&self, id: ModuleId) -> Result<&ModuleDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("module"));
        }
        self.modules
            .get(id.index())
            .ok_or_else(|| EngineError::invalid_reference("module"))
    }

    fn module_mut(&mut self, id: ModuleId) -> Result<&mut ModuleDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("module"));
        }
        self.modules
            .get_mut(id.index())
            .ok_or_else(|| EngineError::invalid_reference("module"))
    }

    pub(crate) fn class(&self, id: ClassId) -> Result<&ClassDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("class"));
        }
        self.classes
            .get(id.index())
            .ok_or_else(|| EngineError::invalid_reference("class"))
    }

    fn class_mut(&mut self, id: ClassId) -> Result<&mut ClassDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("class"));
        }
        self.classes
            .get_mut(id.index())
            .ok_or_else(|| EngineError::invalid_reference("class"))
    }

    pub(crate) fn instance(&self, id: InstanceId) -> Result<&InstanceDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("instance"));
        }
        self.instances
            .get(id.index())
            .ok_or_else(|| EngineError::invalid_reference("instance"))
    }

    fn instance_mut(&mut self, id: InstanceId) -> Result<&mut InstanceDef, EngineError> {
        if id.engine() != self.id {
            return Err(EngineError::invalid_reference("instance"));
        }
        self.instances
            .get_mut(id.index())
            .ok_or_else(|| EngineError::invalid_reference("instance"))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
