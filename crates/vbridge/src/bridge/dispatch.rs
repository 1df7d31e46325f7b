//! Call-time binding of bridged methods.

use std::borrow::Cow;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::trace;
use vbridge_sdk::{
    BridgeError, BridgeResult, ForeignContext, ForeignFn, ForeignValue, Object, Runtime,
};

use super::{Invocation, MethodDescriptor, Methods, Signature};

/// Shared cell holding the component's data payload.
///
/// Written once the build settles on its payload; read on every call.
pub type DataSlot = Rc<Cell<ForeignValue>>;

/// Hand-written handler behind a [`FnContext`].
pub type Handler = Rc<dyn Fn(Invocation) -> BridgeResult<ForeignValue>>;

/// Everything one generated wrapper captures.
///
/// The runtime is held weakly: the runtime owns the wrapper once it is
/// installed, and a strong handle would keep both alive forever.
pub struct MethodContext<R> {
    runtime: Weak<dyn ForeignContext>,
    data: DataSlot,
    descriptor: MethodDescriptor<R>,
}

impl<R: Methods> MethodContext<R> {
    /// Capture the runtime and data slot for `descriptor`
    pub fn new(runtime: &Runtime, data: &DataSlot, descriptor: MethodDescriptor<R>) -> Self {
        Self {
            runtime: Rc::downgrade(runtime),
            data: Rc::clone(data),
            descriptor,
        }
    }

    /// The wrapped method
    pub fn descriptor(&self) -> &MethodDescriptor<R> {
        &self.descriptor
    }

    /// Run the method for one foreign call
    pub fn dispatch(&self, this: ForeignValue, args: &[ForeignValue]) -> BridgeResult<ForeignValue> {
        let runtime = self.runtime.upgrade().ok_or(BridgeError::RuntimeDropped)?;
        let name = self.descriptor.name;
        trace!(method = name, supplied = args.len(), "dispatching bridged method");

        let receiver = R::from_object(Object::new(Rc::clone(&runtime), self.data.get()));
        let call = Invocation::assemble(
            Cow::Borrowed(name),
            runtime,
            self.descriptor.signature,
            this,
            args,
        )?;
        (self.descriptor.invoke)(receiver, call)
    }

    /// Box as a foreign-callable function
    pub fn into_foreign_fn(self) -> ForeignFn {
        Rc::new(move |this, args| self.dispatch(this, args))
    }
}

/// Wrapper state for a handler registered one method at a time.
pub struct FnContext {
    runtime: Weak<dyn ForeignContext>,
    name: Cow<'static, str>,
    signature: Signature,
    handler: Handler,
}

impl FnContext {
    /// Capture the runtime for `handler`
    pub fn new(
        runtime: &Runtime,
        name: Cow<'static, str>,
        signature: Signature,
        handler: Handler,
    ) -> Self {
        Self {
            runtime: Rc::downgrade(runtime),
            name,
            signature,
            handler,
        }
    }

    /// Run the handler for one foreign call
    pub fn dispatch(&self, this: ForeignValue, args: &[ForeignValue]) -> BridgeResult<ForeignValue> {
        let runtime = self.runtime.upgrade().ok_or(BridgeError::RuntimeDropped)?;
        trace!(method = %self.name, supplied = args.len(), "dispatching handler");
        let call = Invocation::assemble(self.name.clone(), runtime, self.signature, this, args)?;
        (self.handler)(call)
    }

    /// Box as a foreign-callable function
    pub fn into_foreign_fn(self) -> ForeignFn {
        Rc::new(move |this, args| self.dispatch(this, args))
    }
}
