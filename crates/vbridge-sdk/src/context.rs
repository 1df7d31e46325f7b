//! ForeignContext trait — abstract foreign runtime operations
//!
//! Defines the interface a foreign runtime implements. The bridge programs
//! against this trait only: object creation, property access, function
//! objects, calls, and the named constructor that turns a configuration
//! record into a live component instance.

use std::rc::Rc;

use crate::error::BridgeResult;
use crate::value::ForeignValue;

/// A native function callable from the foreign runtime.
///
/// Receives the call-time `this` handle and the ordered foreign arguments,
/// returns a foreign value (`undefined` for "no value").
pub type ForeignFn = Rc<dyn Fn(ForeignValue, &[ForeignValue]) -> BridgeResult<ForeignValue>>;

/// Shared handle to a foreign runtime.
///
/// The foreign runtime is single-threaded and cooperative, so handles are
/// reference counted without atomics.
pub type Runtime = Rc<dyn ForeignContext>;

/// Abstract foreign runtime context.
///
/// This trait is the single entry point for everything the bridge does on
/// the foreign side. Implementations must release any internal borrow
/// before invoking a function object, because bridged functions call back
/// into the same runtime.
pub trait ForeignContext {
    // ========================================================================
    // Value Creation
    // ========================================================================

    /// Allocate an empty object
    fn create_object(&self) -> ForeignValue;

    /// Allocate a string
    fn create_string(&self, s: &str) -> ForeignValue;

    /// Allocate an array holding `items`
    fn create_array(&self, items: &[ForeignValue]) -> ForeignValue;

    /// Wrap a native function as a foreign function object
    fn create_function(&self, func: ForeignFn) -> ForeignValue;

    // ========================================================================
    // Value Reading
    // ========================================================================

    /// Read string data from a string value
    fn read_string(&self, val: ForeignValue) -> BridgeResult<String>;

    /// Get array length
    fn array_len(&self, val: ForeignValue) -> BridgeResult<usize>;

    /// Get array element at index
    fn array_get(&self, val: ForeignValue, index: usize) -> BridgeResult<ForeignValue>;

    // ========================================================================
    // Object Operations
    // ========================================================================

    /// Read a property; missing properties read as `undefined`
    fn get(&self, obj: ForeignValue, key: &str) -> BridgeResult<ForeignValue>;

    /// Write a property
    fn set(&self, obj: ForeignValue, key: &str, value: ForeignValue) -> BridgeResult<()>;

    /// Own property names in insertion order
    fn keys(&self, obj: ForeignValue) -> BridgeResult<Vec<String>>;

    // ========================================================================
    // Function Execution
    // ========================================================================

    /// Call a function object with an explicit `this`
    fn call(
        &self,
        func: ForeignValue,
        this: ForeignValue,
        args: &[ForeignValue],
    ) -> BridgeResult<ForeignValue>;

    /// Invoke the named constructor (`new Name(...args)`)
    fn construct(&self, constructor: &str, args: &[ForeignValue]) -> BridgeResult<ForeignValue>;
}
