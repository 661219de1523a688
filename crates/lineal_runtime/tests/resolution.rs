use lineal_runtime::{Engine, ErrorKind, MethodFn, Value, method};

/// Body that emits its owner label and unconditionally continues the chain.
fn trace_and_continue() -> MethodFn {
    method(|act| {
        let label = act.owner_label();
        act.emit(label);
        act.call_next()
    })
}

/// Body that emits its owner label and stops.
fn trace_stop() -> MethodFn {
    method(|act| {
        let label = act.owner_label();
        act.emit(label);
        Ok(Value::Unit)
    })
}

/// Body that emits and continues only when a next candidate exists.
fn trace_continue_if_any() -> MethodFn {
    method(|act| {
        let label = act.owner_label();
        act.emit(label);
        if act.has_next() {
            act.call_next()
        } else {
            Ok(Value::Unit)
        }
    })
}

/// Module C defines foo; class A includes C and overrides foo; class B < A
/// overrides foo again. Every level continues the chain.
fn reference_hierarchy(rt: &mut Engine) -> lineal_runtime::InstanceId {
    let c = rt.define_module("C");
    rt.define_module_method(c, "foo", trace_stop()).unwrap();
    let a = rt.define_class("A", None).unwrap();
    rt.include_module(a, c).unwrap();
    rt.define_class_method(a, "foo", trace_and_continue())
        .unwrap();
    let b = rt.define_class("B", Some(a)).unwrap();
    rt.define_class_method(b, "foo", trace_and_continue())
        .unwrap();
    rt.define_instance(b).unwrap()
}

#[test]
fn linear_walk_is_most_derived_first() {
    let mut rt = Engine::new();
    let base = rt.define_class("Base", None).unwrap();
    rt.define_class_method(base, "foo", trace_stop()).unwrap();
    let mid = rt.define_class("Mid", Some(base)).unwrap();
    rt.define_class_method(mid, "foo", trace_and_continue())
        .unwrap();
    let leaf = rt.define_class("Leaf", Some(mid)).unwrap();
    rt.define_class_method(leaf, "foo", trace_and_continue())
        .unwrap();

    let o = rt.define_instance(leaf).unwrap();
    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(rt.take_output(), "Leaf#foo\nMid#foo\nBase#foo\n");
}

#[test]
fn class_override_runs_before_included_module_and_superclass() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(
        rt.take_output(),
        "B#foo\nA#foo\nC#foo (included in A)\n"
    );
}

#[test]
fn singleton_method_continues_into_class_method_not_past_it() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    rt.define_singleton_method(o, "foo", trace_and_continue())
        .unwrap();

    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(
        rt.take_output(),
        "singleton(#<B:1>)#foo\nB#foo\nA#foo\nC#foo (included in A)\n"
    );
}

#[test]
fn direct_singleton_def_outranks_module_extended_afterwards() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    rt.define_singleton_method(o, "foo", trace_and_continue())
        .unwrap();
    let m = rt.define_module("M");
    rt.define_module_method(m, "foo", trace_and_continue())
        .unwrap();
    rt.extend_with_module(o, m).unwrap();

    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec![
            "singleton(#<B:1>)#foo",
            "M#foo (extended)",
            "B#foo",
            "A#foo",
            "C#foo (included in A)",
        ]
    );
    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(
        rt.take_output(),
        "singleton(#<B:1>)#foo\nM#foo (extended)\nB#foo\nA#foo\nC#foo (included in A)\n"
    );
}

#[test]
fn redefining_a_singleton_method_replaces_in_place() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    rt.define_singleton_method(
        o,
        "foo",
        method(|act| {
            act.emit("first definition");
            act.call_next()
        }),
    )
    .unwrap();
    rt.define_singleton_method(
        o,
        "foo",
        method(|act| {
            act.emit("second definition");
            act.call_next()
        }),
    )
    .unwrap();

    let chain = rt.resolution_chain(o, "foo").unwrap();
    assert_eq!(chain[0], "singleton(#<B:1>)#foo");
    assert_eq!(
        chain
            .iter()
            .filter(|l| l.starts_with("singleton"))
            .count(),
        1
    );
    rt.call(o, "foo", &[]).unwrap();
    let out = rt.take_output();
    assert!(out.starts_with("second definition\n"));
    assert!(!out.contains("first definition"));
}

#[test]
fn reextending_moves_to_front_without_duplicating() {
    let mut rt = Engine::new();
    let k = rt.define_class("K", None).unwrap();
    let o = rt.define_instance(k).unwrap();
    let m1 = rt.define_module("M1");
    rt.define_module_method(m1, "foo", trace_stop()).unwrap();
    let m2 = rt.define_module("M2");
    rt.define_module_method(m2, "foo", trace_stop()).unwrap();

    rt.extend_with_module(o, m1).unwrap();
    rt.extend_with_module(o, m2).unwrap();
    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec!["M2#foo (extended)", "M1#foo (extended)"]
    );

    rt.extend_with_module(o, m1).unwrap();
    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec!["M1#foo (extended)", "M2#foo (extended)"]
    );
}

#[test]
fn reincluding_moves_to_front_without_duplicating() {
    let mut rt = Engine::new();
    let m1 = rt.define_module("M1");
    rt.define_module_method(m1, "foo", trace_stop()).unwrap();
    let m2 = rt.define_module("M2");
    rt.define_module_method(m2, "foo", trace_stop()).unwrap();
    let k = rt.define_class("K", None).unwrap();
    rt.include_module(k, m1).unwrap();
    rt.include_module(k, m2).unwrap();
    let o = rt.define_instance(k).unwrap();
    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec!["M2#foo (included in K)", "M1#foo (included in K)"]
    );

    rt.include_module(k, m1).unwrap();
    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec!["M1#foo (included in K)", "M2#foo (included in K)"]
    );
}

#[test]
fn registries_answer_by_name_in_definition_order() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    let b = rt.class_named("B").unwrap();
    assert_eq!(rt.class_of(o).unwrap(), b);
    assert_eq!(rt.class_name(b).unwrap(), "B");
    let a = rt.superclass(b).unwrap().unwrap();
    assert_eq!(rt.class_name(a).unwrap(), "A");
    assert_eq!(
        rt.module_name(rt.module_named("C").unwrap()).unwrap(),
        "C"
    );
    assert_eq!(rt.defined_classes().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(rt.defined_modules().collect::<Vec<_>>(), vec!["C"]);
    assert_eq!(rt.ancestors(o).unwrap(), vec!["B", "A", "C (included in A)"]);
}

#[test]
fn missing_method_reports_no_method_with_receiver_label() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);
    let err = rt.call(o, "quux", &[]).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::NoMethod {
            receiver: "#<B:1>".to_string(),
            method: "quux".to_string(),
        }
    );
}

#[test]
fn call_next_past_the_end_is_no_super_method() {
    let mut rt = Engine::new();
    let k = rt.define_class("K", None).unwrap();
    rt.define_class_method(k, "foo", trace_and_continue())
        .unwrap();
    let o = rt.define_instance(k).unwrap();

    let err = rt.call(o, "foo", &[]).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::NoSuperMethod {
            origin: "K#foo".to_string(),
            method: "foo".to_string(),
        }
    );
    // Effects of entries that already ran are kept.
    assert_eq!(rt.take_output(), "K#foo\n");
}

#[test]
fn handles_from_another_engine_are_rejected() {
    let mut rt = Engine::new();
    let mut other = Engine::new();
    let k = rt.define_class("K", None).unwrap();
    let foreign_module = other.define_module("M");
    let foreign_class = other.define_class("K", None).unwrap();
    let foreign_instance = other.define_instance(foreign_class).unwrap();

    assert!(
        rt.include_module(k, foreign_module)
            .unwrap_err()
            .is_invalid_reference()
    );
    assert!(
        rt.define_instance(foreign_class)
            .unwrap_err()
            .is_invalid_reference()
    );
    assert!(
        rt.call(foreign_instance, "foo", &[])
            .unwrap_err()
            .is_invalid_reference()
    );
}

#[test]
fn arguments_reach_every_entry_in_the_chain() {
    let mut rt = Engine::new();
    let base = rt.define_class("Base", None).unwrap();
    rt.define_class_method(
        base,
        "describe",
        method(|act| {
            let subject = act.arg(0).and_then(|v| v.as_str()).unwrap_or("?").to_string();
            Ok(Value::from(format!("{}...base", subject)))
        }),
    )
    .unwrap();
    let leaf = rt.define_class("Leaf", Some(base)).unwrap();
    rt.define_class_method(
        leaf,
        "describe",
        method(|act| {
            let inner = act.call_next()?;
            Ok(Value::from(format!("{}+leaf", inner)))
        }),
    )
    .unwrap();
    let o = rt.define_instance(leaf).unwrap();

    let out = rt.call(o, "describe", &[Value::from("cats")]).unwrap();
    assert_eq!(out, Value::from("cats...base+leaf"));
}

#[test]
fn mutation_during_a_call_does_not_affect_the_chain_in_progress() {
    let mut rt = Engine::new();
    let m = rt.define_module("M");
    rt.define_module_method(m, "foo", trace_stop()).unwrap();
    let k = rt.define_class("K", None).unwrap();
    rt.define_class_method(
        k,
        "foo",
        method(move |act| {
            let label = act.owner_label();
            act.emit(label);
            let receiver = act.receiver();
            act.engine_mut().extend_with_module(receiver, m)?;
            // The snapshot for this call was computed before the extend.
            assert!(!act.has_next());
            Ok(Value::Unit)
        }),
    )
    .unwrap();
    let o = rt.define_instance(k).unwrap();

    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(rt.take_output(), "K#foo\n");

    // The next lookup sees the extended module at the front.
    assert_eq!(
        rt.resolution_chain(o, "foo").unwrap(),
        vec!["M#foo (extended)", "K#foo"]
    );
    rt.call(o, "foo", &[]).unwrap();
    let out = rt.take_output();
    assert!(out.starts_with("M#foo (extended)\n"));
}

#[test]
fn repeated_calls_are_stable_and_cache_is_invalidated_by_mutation() {
    let mut rt = Engine::new();
    let o = reference_hierarchy(&mut rt);

    rt.call(o, "foo", &[]).unwrap();
    let first = rt.take_output();
    rt.call(o, "foo", &[]).unwrap();
    assert_eq!(rt.take_output(), first);

    rt.define_singleton_method(o, "foo", trace_and_continue())
        .unwrap();
    rt.call(o, "foo", &[]).unwrap();
    let after = rt.take_output();
    assert!(after.starts_with("singleton(#<B:1>)#foo\n"));
    assert_eq!(after.lines().count(), first.lines().count() + 1);
}

#[test]
fn fallback_answers_only_when_the_chain_is_empty() {
    let mut rt = Engine::new();
    let k = rt.define_class("K", None).unwrap();
    rt.define_class_method(k, "known", trace_continue_if_any())
        .unwrap();
    let o = rt.define_instance(k).unwrap();
    rt.set_fallback(method(|act| {
        let name = act.method_name().to_string();
        act.emit(format!("no handler for '{}', improvising", name));
        Ok(Value::from("improvised"))
    }));

    // Unknown name: fallback runs and reports the queried name.
    let out = rt.call(o, "missing", &[]).unwrap();
    assert_eq!(out, Value::from("improvised"));
    assert_eq!(rt.take_output(), "no handler for 'missing', improvising\n");

    // Known name: the chain answers, fallback stays out of it.
    rt.call(o, "known", &[]).unwrap();
    assert_eq!(rt.take_output(), "K#known\n");
}

#[test]
fn fallback_is_not_reachable_through_call_next() {
    let mut rt = Engine::new();
    let k = rt.define_class("K", None).unwrap();
    rt.define_class_method(k, "foo", trace_and_continue())
        .unwrap();
    let o = rt.define_instance(k).unwrap();
    rt.set_fallback(method(|_| Ok(Value::from("improvised"))));

    let err = rt.call(o, "foo", &[]).unwrap_err();
    assert!(err.is_no_super_method());
}
