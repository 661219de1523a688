//! Chain invocation with explicit `call_next` continuation.

use std::rc::Rc;

use lineal_core::{EngineError, InstanceId, Value};

use super::core::Engine;
use super::resolve::ChainEntry;

/// A method implementation. Receives the activation of the current call,
/// which exposes the receiver, the arguments, and the bound continuation.
pub type MethodFn = Rc<dyn Fn(&mut Activation<'_>) -> Result<Value, EngineError>>;

/// Wraps a closure as a [`MethodFn`].
pub fn method<F>(body: F) -> MethodFn
where
    F: Fn(&mut Activation<'_>) -> Result<Value, EngineError> + 'static,
{
    Rc::new(body)
}

/// One method call in flight: the receiver, the arguments, and the chain
/// snapshot with the current position in it.
///
/// The chain is fixed once computed for this call. A body may mutate the
/// engine (define singleton methods, extend modules); that affects future
/// lookups only, never the chain already in progress.
pub struct Activation<'rt> {
    engine: &'rt mut Engine,
    receiver: InstanceId,
    method: Rc<str>,
    args: Rc<[Value]>,
    chain: Rc<[ChainEntry]>,
    pos: usize,
}

impl<'rt> Activation<'rt> {
    pub fn receiver(&self) -> InstanceId {
        self.receiver
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn engine(&self) -> &Engine {
        &*self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut *self.engine
    }

    /// Label of the implementation currently running, e.g. `B#foo` or
    /// `M#foo (extended)`. The fallback runs outside the chain and reports
    /// itself as `fallback`.
    pub fn owner_label(&self) -> String {
        match self.chain.get(self.pos) {
            Some(entry) => self.engine.render_owner(&entry.owner, &self.method),
            None => "fallback".to_string(),
        }
    }

    /// Appends a line to the engine's transcript buffer.
    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.engine.output.push_str(line.as_ref());
        self.engine.output.push('\n');
    }

    pub fn has_next(&self) -> bool {
        self.pos + 1 < self.chain.len()
    }

    /// Runs the next entry in the chain against the same receiver.
    /// Fails with `NoSuperMethod` past the end of the chain.
    pub fn call_next(&mut self) -> Result<Value, EngineError> {
        let next = self.pos + 1;
        if next >= self.chain.len() {
            return Err(EngineError::no_super_method(
                self.owner_label(),
                &*self.method,
            ));
        }
        let body = self.chain[next].body.clone();
        let prev = std::mem::replace(&mut self.pos, next);
        let result = body(self);
        self.pos = prev;
        result
    }
}

impl Engine {
    /// Resolves and runs `name` on `instance`.
    ///
    /// An empty chain falls through to the engine fallback when one is
    /// installed, and fails with `NoMethod` otherwise.
    pub fn call(
        &mut self,
        instance: InstanceId,
        name: &str,
        args: &[Value],
    ) -> Result<Value, EngineError> {
        let chain = self.resolve_chain(instance, name)?;
        if chain.is_empty() {
            let Some(fallback) = self.fallback.clone() else {
                let receiver = self.instance_label(instance)?;
                return Err(EngineError::no_method(receiver, name));
            };
            let mut activation = Activation {
                engine: self,
                receiver: instance,
                method: Rc::from(name),
                args: Rc::from(args),
                chain,
                pos: 0,
            };
            return fallback(&mut activation);
        }
        let head = chain[0].body.clone();
        let mut activation = Activation {
            engine: self,
            receiver: instance,
            method: Rc::from(name),
            args: Rc::from(args),
            chain,
            pos: 0,
        };
        head(&mut activation)
    }
}
