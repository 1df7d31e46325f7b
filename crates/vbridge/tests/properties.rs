//! Property-based tests for component builds and call shaping.
//!
//! Random option sequences must either build a record that reflects every
//! applied option, or, when flat and typed data are mixed, fail before the
//! foreign constructor ever runs. Random arities and argument counts must
//! bind exactly `arity` arguments or fail with an out-of-range error.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use proptest::prelude::*;
use vbridge::{
    data, data_typed, el, method, new_vm, slot, template, BridgeError, ForeignContext,
    ForeignValue, Model, Object, Opt, Runtime, Signature, Vm,
};
use vbridge_engine::Engine;

// ============================================================================
// Helpers
// ============================================================================

#[derive(Model)]
struct Payload {
    object: Object,
    vm: Option<Vm>,
}

#[derive(Debug, Clone)]
enum Step {
    El(String),
    Field(String, i32),
    Template(String),
    Slot(String, bool),
}

impl Step {
    fn to_opt(&self) -> Opt {
        match self {
            Step::El(selector) => el(selector.clone()),
            Step::Field(name, value) => data(name.clone(), *value),
            Step::Template(source) => template(source.clone()),
            Step::Slot(name, value) => slot(name.clone(), *value),
        }
    }
}

fn setup() -> (Rc<Engine>, Runtime) {
    let engine = Engine::new();
    let runtime: Runtime = engine.clone();
    (engine, runtime)
}

/// Strategy: one flat data field over a small name space, so writes collide.
fn field() -> impl Strategy<Value = Step> {
    ("[a-c]", any::<i32>()).prop_map(|(name, value)| Step::Field(name, value))
}

/// Strategy: any option except typed data.
fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "#[a-z]{1,6}".prop_map(Step::El),
        field(),
        "<[a-z]{1,8}>".prop_map(Step::Template),
        ("x_[a-z]{1,4}", any::<bool>()).prop_map(|(name, value)| Step::Slot(name, value)),
    ]
}

// ============================================================================
// Build properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_single_data_form_builds(steps in prop::collection::vec(step(), 0..12)) {
        let (engine, runtime) = setup();
        new_vm(runtime, steps.iter().map(Step::to_opt)).unwrap();
        prop_assert_eq!(engine.constructed(), 1);

        let record = engine.last_record().unwrap();
        let mut fields = BTreeMap::new();
        let mut selector = None;
        let mut slots = BTreeMap::new();
        for step in &steps {
            match step {
                Step::El(s) => selector = Some(s.clone()),
                Step::Field(name, value) => {
                    fields.insert(name.clone(), *value);
                }
                Step::Slot(name, value) => {
                    slots.insert(name.clone(), *value);
                }
                Step::Template(_) => {}
            }
        }

        let data = engine.get(record, "data").unwrap();
        if fields.is_empty() {
            prop_assert!(data.is_undefined());
        } else {
            prop_assert_eq!(engine.keys(data).unwrap().len(), fields.len());
            for (name, value) in &fields {
                let stored = engine.get(data, name).unwrap();
                prop_assert_eq!(stored.as_number(), Some(*value as f64));
            }
        }

        let el = engine.get(record, "el").unwrap();
        match selector {
            Some(s) => {
                prop_assert_eq!(engine.read_string(el).unwrap(), s);
            }
            None => {
                prop_assert!(el.is_undefined());
            }
        }

        for (name, value) in &slots {
            prop_assert_eq!(engine.get(record, name).unwrap().as_bool(), Some(*value));
        }
    }

    #[test]
    fn prop_mixed_data_forms_never_construct(
        fields in prop::collection::vec(field(), 1..6),
        others in prop::collection::vec(step(), 0..4),
        position in any::<prop::sample::Index>(),
    ) {
        let (engine, runtime) = setup();
        let payload = Rc::new(RefCell::new(Payload::from_object(Object::create(
            Rc::clone(&runtime),
        ))));

        let mut opts: Vec<Opt> = others.iter().chain(&fields).map(Step::to_opt).collect();
        let at = position.index(opts.len() + 1);
        opts.insert(at, data_typed(Rc::clone(&payload)));

        let err = new_vm(runtime, opts).unwrap_err();
        let is_conflict = matches!(err, BridgeError::DataConflict { .. });
        prop_assert!(is_conflict);
        prop_assert_eq!(engine.constructed(), 0);
        prop_assert!(payload.borrow().vm.is_none());
    }
}

// ============================================================================
// Call shaping properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_plain_arity_enforced(arity in 0usize..5, supplied in 0usize..8) {
        let (engine, runtime) = setup();
        let vm = new_vm(runtime, [method("count", Signature::plain(arity), |call| {
            Ok(ForeignValue::number(call.args().len() as f64))
        })])
        .unwrap();

        let args: Vec<_> = (0..supplied).map(|i| ForeignValue::number(i as f64)).collect();
        let result = engine.invoke(vm.value(), "count", &args);
        if supplied >= arity {
            prop_assert_eq!(result.unwrap().as_number(), Some(arity as f64));
        } else {
            prop_assert_eq!(
                result,
                Err(BridgeError::ArgumentOutOfRange {
                    method: "count".to_string(),
                    index: supplied,
                    supplied,
                })
            );
        }
    }

    #[test]
    fn prop_instance_handle_shifts_nothing(
        arity in 0usize..4,
        values in prop::collection::vec(-1000i32..1000, 0..6),
    ) {
        prop_assume!(values.len() >= arity);
        let (engine, runtime) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let vm = new_vm(runtime, [method("record", Signature::with_instance(arity), move |call| {
            sink.borrow_mut()
                .extend(call.args().iter().map(|arg| arg.value()));
            Ok(call.instance()?.value())
        })])
        .unwrap();

        let args: Vec<_> = values.iter().map(|&v| ForeignValue::number(v as f64)).collect();
        let this = engine.invoke(vm.value(), "record", &args).unwrap();
        prop_assert_eq!(this, vm.value());
        let seen = seen.borrow().clone();
        prop_assert_eq!(seen, args[..arity].to_vec());
    }
}
