//! Owned handle types for foreign values
//!
//! `Object` pairs a `ForeignValue` with the runtime that owns it, so native
//! code can read and write properties without threading a context through
//! every call. This is the opaque native representation bridged methods
//! receive for each foreign argument.

use std::fmt;
use std::rc::Rc;

use crate::context::{ForeignContext, Runtime};
use crate::convert::{FromForeign, ToForeign};
use crate::error::{BridgeError, BridgeResult};
use crate::value::ForeignValue;

/// A foreign value together with the runtime it lives in.
#[derive(Clone)]
pub struct Object {
    runtime: Runtime,
    value: ForeignValue,
}

impl Object {
    /// Wrap a value owned by `runtime`
    pub fn new(runtime: Runtime, value: ForeignValue) -> Self {
        Self { runtime, value }
    }

    /// Allocate a fresh empty object in `runtime`
    pub fn create(runtime: Runtime) -> Self {
        let value = runtime.create_object();
        Self { runtime, value }
    }

    /// The `undefined` value of `runtime`
    pub fn undefined(runtime: Runtime) -> Self {
        Self::new(runtime, ForeignValue::undefined())
    }

    /// Get the underlying handle
    pub fn value(&self) -> ForeignValue {
        self.value
    }

    /// Get the owning runtime
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Get a reference to the context
    pub fn context(&self) -> &dyn ForeignContext {
        &*self.runtime
    }

    /// Wrap another value from the same runtime
    pub fn sibling(&self, value: ForeignValue) -> Object {
        Object::new(Rc::clone(&self.runtime), value)
    }

    /// Check whether this handle is an object reference
    pub fn is_object(&self) -> bool {
        self.value.is_ref()
    }

    /// Check whether this handle is `undefined`
    pub fn is_undefined(&self) -> bool {
        self.value.is_undefined()
    }

    /// Read a property
    pub fn get(&self, key: &str) -> BridgeResult<Object> {
        let value = self.runtime.get(self.value, key)?;
        Ok(self.sibling(value))
    }

    /// Write a property
    pub fn set(&self, key: &str, value: impl ToForeign) -> BridgeResult<()> {
        let value = value.to_foreign(&*self.runtime);
        self.runtime.set(self.value, key, value)
    }

    /// Own property names
    pub fn keys(&self) -> BridgeResult<Vec<String>> {
        self.runtime.keys(self.value)
    }

    /// Call this value as a function with an explicit `this`
    pub fn call(&self, this: ForeignValue, args: &[ForeignValue]) -> BridgeResult<Object> {
        let result = self.runtime.call(self.value, this, args)?;
        Ok(self.sibling(result))
    }

    /// Call the function stored under `name` with this object as `this`
    pub fn call_method(&self, name: &str, args: &[ForeignValue]) -> BridgeResult<Object> {
        let func = self.runtime.get(self.value, name)?;
        if !func.is_ref() {
            return Err(BridgeError::NotCallable(name.to_string()));
        }
        let result = self.runtime.call(func, self.value, args)?;
        Ok(self.sibling(result))
    }

    /// Convert to a Rust value
    pub fn to<T: FromForeign>(&self) -> BridgeResult<T> {
        T::from_foreign(self.value, &*self.runtime)
    }

    /// Read as a string
    pub fn as_string(&self) -> BridgeResult<String> {
        self.to::<String>()
    }

    /// Read as a number
    pub fn as_number(&self) -> Option<f64> {
        self.value.as_number()
    }

    /// Read as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

/// Two handles are equal when they name the same value in the same runtime.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && Rc::ptr_eq(&self.runtime, &other.runtime)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.value).finish()
    }
}

impl ToForeign for Object {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        self.value
    }
}

impl ToForeign for &Object {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        self.value
    }
}
