//! Method bridge
//!
//! Turns the exported methods of a receiver type into foreign-callable
//! functions registered by name in a [`MethodTable`].
//!
//! The method set of a type is an explicit registration table
//! ([`Methods::method_table`]), normally generated by `#[methods]`. Each
//! entry carries a [`Signature`] stating whether the method takes the
//! instance handle and how many foreign arguments it consumes. At call time
//! the wrapper:
//!
//! 1. builds a fresh receiver around the component's data payload
//! 2. wraps the call-time `this` as a [`Vm`](crate::Vm) if the signature asks for it
//! 3. hands the next `arity` foreign arguments over as [`Object`]s, failing
//!    with `ArgumentOutOfRange` if too few were supplied
//! 4. invokes the method and converts its result with [`MethodReturn`]

mod dispatch;
mod invocation;
mod returns;

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use tracing::debug;
use vbridge_sdk::{BridgeResult, ForeignFn, ForeignValue, MethodTable, Runtime};

use crate::model::Model;

pub use dispatch::{DataSlot, FnContext, Handler, MethodContext};
pub use invocation::Invocation;
pub use returns::MethodReturn;

/// Whether a bridged method wants the call-time instance handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceParam {
    /// All parameters are foreign arguments
    None,
    /// The first parameter is the instance handle; it consumes no foreign
    /// argument
    Handle,
}

/// Declared shape of a bridged method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Instance handle convention
    pub instance: InstanceParam,
    /// Number of foreign arguments consumed
    pub arity: usize,
}

impl Signature {
    /// Create a signature
    pub const fn new(instance: InstanceParam, arity: usize) -> Self {
        Self { instance, arity }
    }

    /// Signature of a method taking only foreign arguments
    pub const fn plain(arity: usize) -> Self {
        Self::new(InstanceParam::None, arity)
    }

    /// Signature of a method taking the instance handle first
    pub const fn with_instance(arity: usize) -> Self {
        Self::new(InstanceParam::Handle, arity)
    }
}

/// Typed entry point of one bridged method.
pub type Invoke<R> = fn(R, Invocation) -> BridgeResult<ForeignValue>;

/// One exported method of receiver type `R`.
pub struct MethodDescriptor<R> {
    /// Name the method is registered under
    pub name: &'static str,
    /// Declared shape
    pub signature: Signature,
    /// Typed entry point
    pub invoke: Invoke<R>,
}

impl<R> MethodDescriptor<R> {
    /// Create a descriptor
    pub fn new(name: &'static str, signature: Signature, invoke: Invoke<R>) -> Self {
        Self {
            name,
            signature,
            invoke,
        }
    }
}

impl<R> Clone for MethodDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for MethodDescriptor<R> {}

impl<R> fmt::Debug for MethodDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A receiver type whose exported methods can be bridged.
///
/// Implemented by `#[methods]`; hand-written implementations list one
/// descriptor per exported method.
pub trait Methods: Model + Sized {
    /// The exported method set
    fn method_table() -> Vec<MethodDescriptor<Self>>;
}

/// Register one wrapper per exported method of `R` in `table`.
///
/// Wrappers bind their receiver to whatever `data` holds when they run.
/// Returns the number of methods installed.
pub fn install<R: Methods>(table: &mut MethodTable, runtime: &Runtime, data: &DataSlot) -> usize {
    let descriptors = R::method_table();
    let count = descriptors.len();
    for descriptor in descriptors {
        let context = MethodContext::new(runtime, data, descriptor);
        table.register(descriptor.name, context.into_foreign_fn());
    }
    debug!(
        receiver = std::any::type_name::<R>(),
        count,
        "installed method set"
    );
    count
}

/// Wrap a hand-written handler with the bridge calling convention.
pub fn wrap_fn(
    runtime: &Runtime,
    name: impl Into<Cow<'static, str>>,
    signature: Signature,
    handler: impl Fn(Invocation) -> BridgeResult<ForeignValue> + 'static,
) -> ForeignFn {
    FnContext::new(runtime, name.into(), signature, Rc::new(handler)).into_foreign_fn()
}
