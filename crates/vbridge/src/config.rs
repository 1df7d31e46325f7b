//! Component configuration builder
//!
//! A component is built from an ordered list of options, each a deferred
//! mutation of a [`Config`]. Once every option has applied, the record is
//! materialized as a foreign object and handed to the foreign constructor:
//!
//! ```ignore
//! let vm = new_vm(runtime, [
//!     el("#app"),
//!     data_typed(model.clone()),
//!     methods_of::<Calc>(),
//! ])?;
//! ```
//!
//! The data payload is set through either flat fields ([`data`]) or one
//! typed struct ([`data_typed`]), never both.

use std::borrow::Cow;
use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::{debug, warn};
use vbridge_sdk::{
    json_to_foreign, BridgeError, BridgeResult, ForeignValue, MethodTable, Object, Runtime,
};

use crate::bridge::{self, DataSlot, Invocation, Methods, Signature};
use crate::model::Model;
use crate::options::{BridgeOptions, SlotNames};
use crate::vm::Vm;

/// One build option: a deferred mutation of the configuration record.
pub type Opt = Box<dyn FnOnce(&mut Config) -> BridgeResult<()>>;

const FLAT_DATA: &str = "data";
const TYPED_DATA: &str = "data_typed";

/// Typed data payload: a shared native struct and its backing object.
#[derive(Clone)]
pub struct TypedData {
    model: Rc<RefCell<dyn Model>>,
    object: Object,
}

impl TypedData {
    /// The backing object the payload is materialized as
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// The shared struct
    pub fn model(&self) -> &Rc<RefCell<dyn Model>> {
        &self.model
    }
}

impl fmt::Debug for TypedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedData")
            .field("object", &self.object)
            .finish_non_exhaustive()
    }
}

/// The data slot of a configuration record.
#[derive(Debug, Clone, Default)]
pub enum DataPayload {
    /// No data option applied
    #[default]
    Absent,
    /// Fields set one at a time with [`data`]
    Fields(Map<String, Value>),
    /// Struct set with [`data_typed`]
    Typed(TypedData),
}

impl DataPayload {
    fn kind(&self) -> Option<&'static str> {
        match self {
            DataPayload::Absent => None,
            DataPayload::Fields(_) => Some(FLAT_DATA),
            DataPayload::Typed(_) => Some(TYPED_DATA),
        }
    }
}

/// Configuration record for one component build.
pub struct Config {
    runtime: Runtime,
    el: Option<String>,
    data: DataPayload,
    methods: MethodTable,
    template: Option<String>,
    slots: Vec<(String, Value)>,
    data_slot: DataSlot,
}

impl Config {
    /// Empty record for a build against `runtime`
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            el: None,
            data: DataPayload::Absent,
            methods: MethodTable::new(),
            template: None,
            slots: Vec::new(),
            data_slot: Rc::new(Cell::new(ForeignValue::undefined())),
        }
    }

    /// Apply options in order, stopping at the first failure
    pub fn apply(&mut self, opts: impl IntoIterator<Item = Opt>) -> BridgeResult<()> {
        for opt in opts {
            opt(self)?;
        }
        Ok(())
    }

    /// The runtime the record is built for
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Mount selector
    pub fn el(&self) -> Option<&str> {
        self.el.as_deref()
    }

    /// Data payload
    pub fn data(&self) -> &DataPayload {
        &self.data
    }

    /// Installed method wrappers
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Template source
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Passthrough slots in application order
    pub fn slots(&self) -> &[(String, Value)] {
        &self.slots
    }

    /// Data payload wrappers bind their receivers to
    pub fn data_slot(&self) -> &DataSlot {
        &self.data_slot
    }

    fn set_data(&mut self, payload: DataPayload) -> BridgeResult<()> {
        match (self.data.kind(), payload.kind()) {
            (Some(first), Some(second)) if first != second => {
                return Err(BridgeError::DataConflict { first, second });
            }
            (Some(TYPED_DATA), Some(TYPED_DATA)) => {
                debug!("typed data payload replaced");
            }
            _ => {}
        }
        self.data = payload;
        Ok(())
    }

    /// Write the record into a fresh foreign object.
    ///
    /// Also settles the data payload every installed wrapper binds to. When
    /// methods are installed the payload must be a foreign object.
    /// Passthrough slots are written first, so a recognized slot with the
    /// same name replaces them.
    pub fn materialize(&self, options: &BridgeOptions) -> BridgeResult<ForeignValue> {
        let ctx = &*self.runtime;
        let slots = &options.slots;

        let payload = match &self.data {
            DataPayload::Absent if self.methods.is_empty() => ForeignValue::undefined(),
            DataPayload::Absent => ctx.create_object(),
            DataPayload::Fields(fields) => object_from_fields(ctx, fields)?,
            DataPayload::Typed(typed) => typed.object.value(),
        };
        if !self.methods.is_empty() && !payload.is_ref() {
            return Err(BridgeError::InvalidBridgeTarget(format!(
                "data payload must be an object, got {}",
                payload.type_name()
            )));
        }

        for name in self.shadowed_slots(slots, !payload.is_undefined()) {
            warn!(slot = %name, "passthrough slot shadowed by a recognized slot");
        }
        let record = ctx.create_object();
        for (name, value) in &self.slots {
            ctx.set(record, name, json_to_foreign(ctx, value)?)?;
        }

        if let Some(el) = &self.el {
            ctx.set(record, &slots.el, ctx.create_string(el))?;
        }
        if let Some(template) = &self.template {
            ctx.set(record, &slots.template, ctx.create_string(template))?;
        }

        self.data_slot.set(payload);
        if !payload.is_undefined() {
            ctx.set(record, &slots.data, payload)?;
        }

        if !self.methods.is_empty() {
            let table = ctx.create_object();
            for (name, handler) in self.methods.iter() {
                ctx.set(table, name, ctx.create_function(Rc::clone(handler)))?;
            }
            ctx.set(record, &slots.methods, table)?;
        }

        debug!(
            el = self.el.as_deref(),
            data = self.data.kind(),
            methods = self.methods.len(),
            passthrough = self.slots.len(),
            "materialized configuration record"
        );
        Ok(record)
    }

    /// Passthrough slots a recognized slot overwrites during materialize
    fn shadowed_slots(&self, slots: &SlotNames, data_written: bool) -> Vec<&str> {
        let written = [
            (&slots.el, self.el.is_some()),
            (&slots.template, self.template.is_some()),
            (&slots.data, data_written),
            (&slots.methods, !self.methods.is_empty()),
        ];
        self.slots
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| written.iter().any(|(slot, set)| *set && slot.as_str() == *name))
            .collect()
    }

    /// Take exclusive access to the typed payload for the back-reference.
    ///
    /// Held across construction so the write after it cannot fail.
    fn claim_back_reference(&self) -> BridgeResult<Option<RefMut<'_, dyn Model>>> {
        let DataPayload::Typed(typed) = &self.data else {
            return Ok(None);
        };
        typed
            .model
            .try_borrow_mut()
            .map(Some)
            .map_err(|_| BridgeError::DataBorrowed)
    }
}

/// Point the typed payload's back-reference at `vm`.
fn wire_back_reference(mut model: RefMut<'_, dyn Model>, vm: &Vm) {
    if let Some(slot) = model.vm_slot() {
        if slot.is_some() {
            warn!("overwriting existing back-reference");
        }
        *slot = Some(vm.clone());
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("el", &self.el)
            .field("data", &self.data)
            .field("methods", &self.methods)
            .field("template", &self.template)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

fn object_from_fields(
    ctx: &dyn vbridge_sdk::ForeignContext,
    fields: &Map<String, Value>,
) -> BridgeResult<ForeignValue> {
    let object = ctx.create_object();
    for (name, value) in fields {
        ctx.set(object, name, json_to_foreign(ctx, value)?)?;
    }
    Ok(object)
}

/// Build a component with the default [`BridgeOptions`].
pub fn new_vm(runtime: Runtime, opts: impl IntoIterator<Item = Opt>) -> BridgeResult<Vm> {
    new_vm_with(&BridgeOptions::default(), runtime, opts)
}

/// Build a component, analogous to `new Vue({...})`.
///
/// Applies `opts` in order, materializes the record and invokes the foreign
/// constructor. A failing option aborts before the constructor runs. If the
/// data payload is typed and has a back-reference slot, the slot is set to
/// the new instance. The typed struct stays mutably borrowed while the
/// constructor runs; a struct already borrowed elsewhere fails the build
/// with `DataBorrowed` before anything is constructed.
pub fn new_vm_with(
    options: &BridgeOptions,
    runtime: Runtime,
    opts: impl IntoIterator<Item = Opt>,
) -> BridgeResult<Vm> {
    let mut config = Config::new(Rc::clone(&runtime));
    config.apply(opts)?;
    let claim = config.claim_back_reference()?;
    let record = config.materialize(options)?;

    let instance = runtime.construct(&options.constructor, &[record])?;
    let vm = Vm::new(Object::new(runtime, instance));
    if let Some(model) = claim {
        wire_back_reference(model, &vm);
    }

    debug!(
        constructor = %options.constructor,
        instance = ?vm.value(),
        "component constructed"
    );
    Ok(vm)
}

// ============================================================================
// Options
// ============================================================================

/// Set the mount selector. Last write wins.
pub fn el(selector: impl Into<String>) -> Opt {
    let selector = selector.into();
    Box::new(move |c| {
        c.el = Some(selector);
        Ok(())
    })
}

/// Set one flat data field. Fails if typed data was already set.
pub fn data(name: impl Into<String>, value: impl Into<Value>) -> Opt {
    let name = name.into();
    let value = value.into();
    Box::new(move |c| {
        if let DataPayload::Fields(fields) = &mut c.data {
            fields.insert(name, value);
            return Ok(());
        }
        let mut fields = Map::new();
        fields.insert(name, value);
        c.set_data(DataPayload::Fields(fields))
    })
}

/// Use a shared struct as the whole data payload.
///
/// Fails if a flat field was already set. After construction, the struct's
/// back-reference slot (if any) receives the instance handle.
pub fn data_typed<M: Model>(model: Rc<RefCell<M>>) -> Opt {
    Box::new(move |c| {
        let object = model
            .try_borrow()
            .map_err(|_| BridgeError::DataBorrowed)?
            .object()
            .clone();
        let model: Rc<RefCell<dyn Model>> = model;
        c.set_data(DataPayload::Typed(TypedData { model, object }))
    })
}

/// Expose the exported methods of `R`.
///
/// Receivers are bound to the record's data payload at call time.
pub fn methods_of<R: Methods>() -> Opt {
    Box::new(|c| {
        bridge::install::<R>(&mut c.methods, &c.runtime, &c.data_slot);
        Ok(())
    })
}

/// Expose one hand-written function under `name`.
pub fn method(
    name: impl Into<Cow<'static, str>>,
    signature: Signature,
    handler: impl Fn(Invocation) -> BridgeResult<ForeignValue> + 'static,
) -> Opt {
    let name = name.into();
    Box::new(move |c| {
        let func = bridge::wrap_fn(&c.runtime, name.clone(), signature, handler);
        c.methods.register(&name, func);
        Ok(())
    })
}

/// Set the template source.
pub fn template(source: impl Into<String>) -> Opt {
    let source = source.into();
    Box::new(move |c| {
        c.template = Some(source);
        Ok(())
    })
}

/// Set any other slot the foreign constructor recognizes, passed through
/// as-is.
pub fn slot(name: impl Into<String>, value: impl Into<Value>) -> Opt {
    let name = name.into();
    let value = value.into();
    Box::new(move |c| {
        c.slots.push((name, value));
        Ok(())
    })
}
