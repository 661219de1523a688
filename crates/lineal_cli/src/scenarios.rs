//! Built-in hierarchies the CLI can run and dump.
//!
//! Scenarios are built programmatically through the engine's builder API;
//! there is no file format to load.

use lineal_core::Value;
use lineal_runtime::{Engine, EngineError, InstanceId, method};

pub(crate) struct ScenarioInfo {
    pub name: &'static str,
    pub summary: &'static str,
}

pub(crate) const SCENARIOS: &[ScenarioInfo] = &[
    ScenarioInfo {
        name: "defining-methods",
        summary: "module include, superclass walk, singleton defs, extend",
    },
    ScenarioInfo {
        name: "linear",
        summary: "plain three-class superclass walk",
    },
    ScenarioInfo {
        name: "fallback",
        summary: "engine-level catch-all for names nothing defines",
    },
];

/// Builds the named scenario: the engine, the receiver, and the method
/// `run` invokes on it.
pub(crate) fn build(name: &str) -> Result<Option<(Engine, InstanceId, &'static str)>, EngineError> {
    match name {
        "defining-methods" => defining_methods().map(Some),
        "linear" => linear().map(Some),
        "fallback" => fallback().map(Some),
        _ => Ok(None),
    }
}

/// Module C defines foo; class A includes C and overrides foo; B < A
/// overrides it again. The instance gets a direct singleton foo (defined
/// twice; the second replaces the first), then module M extended on top.
/// Every implementation except C's continues the chain.
fn defining_methods() -> Result<(Engine, InstanceId, &'static str), EngineError> {
    let mut rt = Engine::new();

    let c = rt.define_module("C");
    rt.define_module_method(
        c,
        "foo",
        method(|act| {
            act.emit("foo in module C (included in A)");
            Ok(Value::Unit)
        }),
    )?;

    let a = rt.define_class("A", None)?;
    rt.include_module(a, c)?;
    rt.define_class_method(
        a,
        "foo",
        method(|act| {
            act.emit("foo in class A (superclass of B)");
            act.call_next()
        }),
    )?;

    let b = rt.define_class("B", Some(a))?;
    rt.define_class_method(
        b,
        "foo",
        method(|act| {
            act.emit("foo in class B");
            act.call_next()
        }),
    )?;

    let o = rt.define_instance(b)?;

    // Defined first, replaced below; this body never runs.
    rt.define_singleton_method(
        o,
        "foo",
        method(|act| {
            let who = act.engine().instance_label(act.receiver())?;
            act.emit(format!("foo in singleton of {} (first direct definition)", who));
            act.call_next()
        }),
    )?;
    rt.define_singleton_method(
        o,
        "foo",
        method(|act| {
            let who = act.engine().instance_label(act.receiver())?;
            act.emit(format!("foo in singleton of {} (direct definition)", who));
            act.call_next()
        }),
    )?;

    let m = rt.define_module("M");
    rt.define_module_method(
        m,
        "foo",
        method(|act| {
            let who = act.engine().instance_label(act.receiver())?;
            act.emit(format!("foo in singleton of {} (extended module M)", who));
            act.call_next()
        }),
    )?;
    rt.extend_with_module(o, m)?;

    Ok((rt, o, "foo"))
}

fn linear() -> Result<(Engine, InstanceId, &'static str), EngineError> {
    let mut rt = Engine::new();
    let base = rt.define_class("Base", None)?;
    rt.define_class_method(
        base,
        "foo",
        method(|act| {
            act.emit("foo in Base");
            Ok(Value::Unit)
        }),
    )?;
    let mid = rt.define_class("Mid", Some(base))?;
    rt.define_class_method(
        mid,
        "foo",
        method(|act| {
            act.emit("foo in Mid");
            act.call_next()
        }),
    )?;
    let leaf = rt.define_class("Leaf", Some(mid))?;
    rt.define_class_method(
        leaf,
        "foo",
        method(|act| {
            act.emit("foo in Leaf");
            act.call_next()
        }),
    )?;
    let o = rt.define_instance(leaf)?;
    Ok((rt, o, "foo"))
}

fn fallback() -> Result<(Engine, InstanceId, &'static str), EngineError> {
    let mut rt = Engine::new();
    let widget = rt.define_class("Widget", None)?;
    let o = rt.define_instance(widget)?;
    rt.set_fallback(method(|act| {
        let who = act.engine().instance_label(act.receiver())?;
        let name = act.method_name().to_string();
        act.emit(format!("nothing defines '{}' for {}, improvising", name, who));
        Ok(Value::from("improvised"))
    }));
    Ok((rt, o, "render"))
}
