//! Instance handle for a live component.

use tracing::trace;
use vbridge_sdk::{BridgeResult, ForeignContext, ForeignValue, Object, Runtime, ToForeign};

use crate::model::Model;

const DATA_SLOT: &str = "$data";
const EL_SLOT: &str = "$el";
const EMIT_SLOT: &str = "$emit";

/// Handle to one constructed component instance.
///
/// Returned by [`new_vm`](crate::new_vm), handed to bridged methods that ask
/// for it, and written into the back-reference field of a typed data
/// payload. Holding a `Vm` does not keep the component alive on the foreign
/// side; it is a plain handle.
#[derive(Clone, Debug, PartialEq)]
pub struct Vm {
    object: Object,
}

impl Vm {
    /// Wrap an instance object
    pub fn new(object: Object) -> Self {
        Self { object }
    }

    /// The instance object
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// The raw instance handle
    pub fn value(&self) -> ForeignValue {
        self.object.value()
    }

    /// The runtime owning the instance
    pub fn runtime(&self) -> &Runtime {
        self.object.runtime()
    }

    /// Read an instance property
    pub fn get(&self, key: &str) -> BridgeResult<Object> {
        self.object.get(key)
    }

    /// Write an instance property
    pub fn set(&self, key: &str, value: impl ToForeign) -> BridgeResult<()> {
        self.object.set(key, value)
    }

    /// The instance's data object
    pub fn data(&self) -> BridgeResult<Object> {
        self.object.get(DATA_SLOT)
    }

    /// The mounted element, `undefined` when not mounted
    pub fn el(&self) -> BridgeResult<Object> {
        self.object.get(EL_SLOT)
    }

    /// Call a method of the instance with the instance as `this`
    pub fn call_method(&self, name: &str, args: &[ForeignValue]) -> BridgeResult<Object> {
        self.object.call_method(name, args)
    }

    /// Emit `event` with `args` through the instance's `$emit`.
    ///
    /// A runtime without `$emit` drops the event.
    pub fn emit(&self, event: &str, args: &[ForeignValue]) -> BridgeResult<()> {
        let emit = self.object.get(EMIT_SLOT)?;
        if emit.is_undefined() {
            trace!(event, "instance has no $emit, event dropped");
            return Ok(());
        }
        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(self.runtime().create_string(event));
        call_args.extend_from_slice(args);
        emit.call(self.value(), &call_args)?;
        Ok(())
    }
}

impl Model for Vm {
    fn from_object(object: Object) -> Self {
        Vm::new(object)
    }

    fn object(&self) -> &Object {
        &self.object
    }
}

impl ToForeign for Vm {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        self.object.value()
    }
}

impl ToForeign for &Vm {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        self.object.value()
    }
}
