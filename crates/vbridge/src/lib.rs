//! vbridge
//!
//! Builds UI components in a dynamic foreign runtime from native Rust code.
//! A component is configured with an ordered list of options (mount
//! selector, data payload, exposed methods, passthrough slots), handed to
//! the runtime's component constructor, and returned as a [`Vm`] handle.
//!
//! ```ignore
//! use vbridge::{methods, Model, Object, Vm};
//!
//! #[derive(Model)]
//! struct Counter {
//!     object: Object,
//!     vm: Option<Vm>,
//! }
//!
//! #[methods]
//! impl Counter {
//!     pub fn add(&self, vm: &Vm, by: Object) -> BridgeResult<f64> { ... }
//! }
//!
//! let counter = Rc::new(RefCell::new(Counter::from_object(Object::create(runtime.clone()))));
//! let vm = vbridge::new_vm(runtime, [
//!     vbridge::el("#app"),
//!     vbridge::data_typed(counter.clone()),
//!     vbridge::methods_of::<Counter>(),
//! ])?;
//! ```

#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod model;
pub mod options;
pub mod vm;

pub use vbridge_native::{methods, Model};
pub use vbridge_sdk::{
    json_to_foreign, BridgeError, BridgeResult, ForeignContext, ForeignFn, ForeignValue,
    FromForeign, MethodTable, Object, Runtime, ToForeign,
};

pub use bridge::{
    install, wrap_fn, DataSlot, InstanceParam, Invocation, Invoke, MethodContext,
    MethodDescriptor, MethodReturn, Methods, Signature,
};
pub use config::{
    data, data_typed, el, method, methods_of, new_vm, new_vm_with, slot, template, Config,
    DataPayload, Opt, TypedData,
};
pub use model::Model;
pub use options::{BridgeOptions, OptionsError, SlotNames};
pub use vm::Vm;
