//! Component constructor
//!
//! Consumes a configuration record and produces an instance object:
//!
//! | instance slot | source |
//! |---|---|
//! | `$options` | the record itself |
//! | `$el` | record `el`, when present |
//! | `$data` | record `data`; a function is called with `this = instance` |
//! | one slot per method | record `methods` |
//! | `$emit` | native function appending to [`Engine::emitted`] |
//!
//! Reactivity, templates and lifecycle hooks are not modelled.

use std::rc::Rc;

use tracing::debug;
use vbridge_sdk::{BridgeError, BridgeResult, ForeignContext, ForeignFn, ForeignValue};

use crate::Engine;

/// Name the component constructor is registered under
pub const COMPONENT_CONSTRUCTOR: &str = "Vue";

pub(crate) const OPTIONS_KEY: &str = "$options";
pub(crate) const METHODS_KEY: &str = "methods";
const EL_KEY: &str = "el";
const DATA_KEY: &str = "data";

/// One `$emit` call observed by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    /// `this` of the emitting call
    pub instance: ForeignValue,
    /// Event name
    pub event: String,
    /// Payload arguments after the event name
    pub args: Vec<ForeignValue>,
}

/// Build a component instance from `args[0]`.
pub fn construct_component(engine: &Engine, args: &[ForeignValue]) -> BridgeResult<ForeignValue> {
    let record = args.first().copied().unwrap_or_default();
    if !record.is_ref() {
        return Err(BridgeError::NotAnObject(format!(
            "component options must be an object, got {}",
            record.type_name()
        )));
    }
    // Rejects strings, arrays and functions
    engine.keys(record)?;

    let instance = engine.create_object();
    engine.set(instance, OPTIONS_KEY, record)?;

    let el = engine.get(record, EL_KEY)?;
    if !el.is_undefined() {
        engine.set(instance, "$el", el)?;
    }

    let mut data = engine.get(record, DATA_KEY)?;
    if engine.is_function(data) {
        data = engine.call(data, instance, &[])?;
    }
    if data.is_undefined() {
        data = engine.create_object();
    }
    engine.set(instance, "$data", data)?;

    let methods = engine.get(record, METHODS_KEY)?;
    let mut method_count = 0;
    if methods.is_ref() {
        for name in engine.keys(methods)? {
            let func = engine.get(methods, &name)?;
            engine.set(instance, &name, func)?;
            method_count += 1;
        }
    }

    let weak = engine.weak();
    let emit: ForeignFn = Rc::new(move |this, args| {
        let engine = weak.upgrade().ok_or(BridgeError::RuntimeDropped)?;
        let (event, payload) = args
            .split_first()
            .ok_or_else(|| BridgeError::Thrown("$emit requires an event name".to_string()))?;
        let event = engine.read_string(*event)?;
        engine.record_emit(Emitted {
            instance: this,
            event,
            args: payload.to_vec(),
        });
        Ok(ForeignValue::undefined())
    });
    let emit = engine.create_function(emit);
    engine.set(instance, "$emit", emit)?;

    debug!(?instance, method_count, "component instance created");
    Ok(instance)
}
