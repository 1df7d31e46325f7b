//! Per-call argument bundle handed to bridged methods.

use std::borrow::Cow;

use tracing::trace;
use vbridge_sdk::{BridgeError, BridgeResult, ForeignValue, Object, Runtime};

use super::{InstanceParam, Signature};
use crate::vm::Vm;

/// Arguments of one foreign call, already shaped to a method's [`Signature`].
///
/// Holds exactly `arity` foreign arguments, plus the instance handle when
/// the signature asks for one.
pub struct Invocation {
    method: Cow<'static, str>,
    runtime: Runtime,
    instance: Option<Vm>,
    args: Vec<Object>,
}

impl Invocation {
    /// Shape a raw foreign call to `signature`.
    ///
    /// Fails with `ArgumentOutOfRange` when fewer than `arity` arguments were
    /// supplied. Surplus arguments are ignored, the way a foreign function
    /// ignores extra call arguments; they are logged at trace level and
    /// never reach the method.
    pub fn assemble(
        method: Cow<'static, str>,
        runtime: Runtime,
        signature: Signature,
        this: ForeignValue,
        args: &[ForeignValue],
    ) -> BridgeResult<Self> {
        if args.len() < signature.arity {
            return Err(BridgeError::ArgumentOutOfRange {
                method: method.into_owned(),
                index: args.len(),
                supplied: args.len(),
            });
        }
        if args.len() > signature.arity {
            trace!(
                method = %method,
                arity = signature.arity,
                supplied = args.len(),
                "ignoring surplus arguments"
            );
        }

        let instance = match signature.instance {
            InstanceParam::Handle => Some(Vm::new(Object::new(runtime.clone(), this))),
            InstanceParam::None => None,
        };
        let args = args[..signature.arity]
            .iter()
            .map(|&value| Object::new(runtime.clone(), value))
            .collect();

        Ok(Self {
            method,
            runtime,
            instance,
            args,
        })
    }

    /// Name of the method being called
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Runtime the call came from
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// The call-time instance handle
    pub fn instance(&self) -> BridgeResult<Vm> {
        self.instance
            .clone()
            .ok_or_else(|| BridgeError::MissingInstance {
                method: self.method.to_string(),
            })
    }

    /// Foreign arguments in call order
    pub fn args(&self) -> &[Object] {
        &self.args
    }

    /// Take the foreign arguments as a fixed-size array
    pub fn into_args<const N: usize>(self) -> BridgeResult<[Object; N]> {
        let supplied = self.args.len();
        let method = self.method;
        self.args
            .try_into()
            .map_err(|_: Vec<Object>| BridgeError::ArgumentOutOfRange {
                method: method.into_owned(),
                index: supplied.min(N),
                supplied,
            })
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("method", &self.method)
            .field("instance", &self.instance)
            .field("args", &self.args)
            .finish()
    }
}
