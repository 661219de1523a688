//! Read-only views over the hierarchy: chain dumps, ancestor listings,
//! module listings, and labels.

use lineal_core::{ClassId, EngineError, InstanceId, ModuleId};

use super::core::Engine;
use super::resolve::Owner;

impl Engine {
    pub fn module_name(&self, module: ModuleId) -> Result<&str, EngineError> {
        Ok(&self.module(module)?.name)
    }

    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        self.module_names.get(name).copied()
    }

    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    /// Class names in definition order.
    pub fn defined_classes(&self) -> impl Iterator<Item = &str> {
        self.class_names.keys().map(String::as_str)
    }

    /// Module names in definition order.
    pub fn defined_modules(&self) -> impl Iterator<Item = &str> {
        self.module_names.keys().map(String::as_str)
    }

    pub fn class_name(&self, class: ClassId) -> Result<&str, EngineError> {
        Ok(&self.class(class)?.name)
    }

    pub fn class_of(&self, instance: InstanceId) -> Result<ClassId, EngineError> {
        Ok(self.instance(instance)?.class)
    }

    pub fn superclass(&self, class: ClassId) -> Result<Option<ClassId>, EngineError> {
        Ok(self.class(class)?.superclass)
    }

    /// `#<B:1>` style label.
    pub fn instance_label(&self, instance: InstanceId) -> Result<String, EngineError> {
        let inst = self.instance(instance)?;
        let class = self.class(inst.class)?;
        Ok(format!("#<{}:{}>", class.name, inst.serial))
    }

    /// Owner labels of every implementation that would be consulted for
    /// `(instance, name)`, in invocation order. Uncached, so usable with
    /// `&self`; the order is identical to what `call` snapshots.
    pub fn resolution_chain(
        &self,
        instance: InstanceId,
        name: &str,
    ) -> Result<Vec<String>, EngineError> {
        let chain = self.build_chain(instance, name)?;
        Ok(chain
            .iter()
            .map(|entry| self.render_owner(&entry.owner, name))
            .collect())
    }

    /// Ancestor listing for an instance: extended modules first, then each
    /// class on the superclass walk followed by its includes.
    pub fn ancestors(&self, instance: InstanceId) -> Result<Vec<String>, EngineError> {
        let inst = self.instance(instance)?;
        let mut out = Vec::new();
        for &module in &inst.extended {
            out.push(format!("{} (extended)", self.modules[module.index()].name));
        }
        let mut cursor = Some(inst.class);
        while let Some(class_id) = cursor {
            let class = self.class(class_id)?;
            out.push(class.name.clone());
            for &module in &class.includes {
                out.push(format!(
                    "{} (included in {})",
                    self.modules[module.index()].name,
                    class.name
                ));
            }
            cursor = class.superclass;
        }
        Ok(out)
    }

    /// Module names visible from a class: its own includes and those of its
    /// ancestors, most-derived class first, most-recently-included first
    /// within each class.
    pub fn included_modules(&self, class: ClassId) -> Result<Vec<String>, EngineError> {
        let mut out = Vec::new();
        let mut cursor = Some(class);
        while let Some(class_id) = cursor {
            let def = self.class(class_id)?;
            for &module in &def.includes {
                out.push(self.modules[module.index()].name.clone());
            }
            cursor = def.superclass;
        }
        Ok(out)
    }

    /// Module names visible from an instance's singleton layer: extended
    /// modules first, then the class chain's includes.
    pub fn singleton_modules(&self, instance: InstanceId) -> Result<Vec<String>, EngineError> {
        let inst = self.instance(instance)?;
        let mut out = Vec::new();
        for &module in &inst.extended {
            out.push(self.modules[module.index()].name.clone());
        }
        out.extend(self.included_modules(inst.class)?);
        Ok(out)
    }

    pub(crate) fn render_owner(&self, owner: &Owner, method: &str) -> String {
        match owner {
            Owner::Singleton(instance) => {
                let label = self
                    .instance_label(*instance)
                    .unwrap_or_else(|_| "#<?>".to_string());
                format!("singleton({})#{}", label, method)
            }
            Owner::Extended(module) => {
                format!("{}#{} (extended)", self.modules[module.index()].name, method)
            }
            Owner::Class(class) => {
                format!("{}#{}", self.classes[class.index()].name, method)
            }
            Owner::Included { module, class } => format!(
                "{}#{} (included in {})",
                self.modules[module.index()].name,
                method,
                self.classes[class.index()].name
            ),
        }
    }
}
