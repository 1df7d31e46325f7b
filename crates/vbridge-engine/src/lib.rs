//! vbridge engine
//!
//! An in-memory, single-threaded foreign runtime implementing
//! `vbridge_sdk::ForeignContext`. It stands in for the UI framework's object
//! model: plain objects, strings, arrays, native function objects, and a
//! registry of named constructors. `Engine::new()` registers the component
//! constructor (see [`component`]) under [`COMPONENT_CONSTRUCTOR`].
//!
//! Calls run synchronously to completion. Every heap borrow is released
//! before a function object runs, so bridged functions may call back into
//! the engine.

pub mod component;
pub mod heap;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use vbridge_sdk::{BridgeError, BridgeResult, ForeignContext, ForeignFn, ForeignValue};

use crate::heap::{Heap, HeapEntry};

pub use component::{Emitted, COMPONENT_CONSTRUCTOR};

/// A named constructor callable through `ForeignContext::construct`.
pub type Constructor = Rc<dyn Fn(&Engine, &[ForeignValue]) -> BridgeResult<ForeignValue>>;

/// In-memory foreign runtime.
pub struct Engine {
    this: Weak<Engine>,
    heap: RefCell<Heap>,
    constructors: RefCell<FxHashMap<String, Constructor>>,
    constructed: Cell<usize>,
    last_record: Cell<Option<ForeignValue>>,
    emitted: RefCell<Vec<Emitted>>,
}

impl Engine {
    /// Create an engine with the component constructor registered.
    pub fn new() -> Rc<Self> {
        let engine = Self::bare();
        let component: Constructor = Rc::new(component::construct_component);
        engine.register_constructor(COMPONENT_CONSTRUCTOR, component);
        engine
    }

    /// Create an engine with no constructors registered.
    pub fn bare() -> Rc<Self> {
        Rc::new_cyclic(|this| Engine {
            this: this.clone(),
            heap: RefCell::new(Heap::default()),
            constructors: RefCell::new(FxHashMap::default()),
            constructed: Cell::new(0),
            last_record: Cell::new(None),
            emitted: RefCell::new(Vec::new()),
        })
    }

    /// Register (or replace) a named constructor
    pub fn register_constructor(&self, name: &str, constructor: Constructor) {
        self.constructors
            .borrow_mut()
            .insert(name.to_string(), constructor);
    }

    /// Invoke method `name` of a constructed component with `this = instance`
    pub fn invoke(
        &self,
        instance: ForeignValue,
        name: &str,
        args: &[ForeignValue],
    ) -> BridgeResult<ForeignValue> {
        let options = self.get(instance, component::OPTIONS_KEY)?;
        let methods = self.get(options, component::METHODS_KEY)?;
        if !methods.is_ref() {
            return Err(BridgeError::NotCallable(name.to_string()));
        }
        let func = self.get(methods, name)?;
        if !func.is_ref() {
            return Err(BridgeError::NotCallable(name.to_string()));
        }
        self.call(func, instance, args)
    }

    /// Number of successful constructor calls
    pub fn constructed(&self) -> usize {
        self.constructed.get()
    }

    /// The record passed to the most recent constructor call
    pub fn last_record(&self) -> Option<ForeignValue> {
        self.last_record.get()
    }

    /// Events emitted through `$emit`, oldest first
    pub fn emitted(&self) -> Vec<Emitted> {
        self.emitted.borrow().clone()
    }

    /// Number of allocated heap slots
    pub fn heap_len(&self) -> usize {
        self.heap.borrow().len()
    }

    /// Check whether `val` is a function object
    pub fn is_function(&self, val: ForeignValue) -> bool {
        matches!(self.heap.borrow().entry(val), Ok(HeapEntry::Function(_)))
    }

    pub(crate) fn weak(&self) -> Weak<Engine> {
        self.this.clone()
    }

    pub(crate) fn record_emit(&self, event: Emitted) {
        self.emitted.borrow_mut().push(event);
    }
}

impl ForeignContext for Engine {
    fn create_object(&self) -> ForeignValue {
        self.heap.borrow_mut().alloc(HeapEntry::Object(Vec::new()))
    }

    fn create_string(&self, s: &str) -> ForeignValue {
        self.heap.borrow_mut().alloc(HeapEntry::Str(s.to_string()))
    }

    fn create_array(&self, items: &[ForeignValue]) -> ForeignValue {
        self.heap.borrow_mut().alloc(HeapEntry::Array(items.to_vec()))
    }

    fn create_function(&self, func: ForeignFn) -> ForeignValue {
        self.heap.borrow_mut().alloc(HeapEntry::Function(func))
    }

    fn read_string(&self, val: ForeignValue) -> BridgeResult<String> {
        match self.heap.borrow().entry(val)? {
            HeapEntry::Str(s) => Ok(s.clone()),
            other => Err(BridgeError::TypeMismatch {
                expected: "string".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    fn array_len(&self, val: ForeignValue) -> BridgeResult<usize> {
        match self.heap.borrow().entry(val)? {
            HeapEntry::Array(items) => Ok(items.len()),
            other => Err(BridgeError::TypeMismatch {
                expected: "array".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    fn array_get(&self, val: ForeignValue, index: usize) -> BridgeResult<ForeignValue> {
        match self.heap.borrow().entry(val)? {
            HeapEntry::Array(items) => Ok(items.get(index).copied().unwrap_or_default()),
            other => Err(BridgeError::TypeMismatch {
                expected: "array".to_string(),
                got: other.kind().to_string(),
            }),
        }
    }

    fn get(&self, obj: ForeignValue, key: &str) -> BridgeResult<ForeignValue> {
        let heap = self.heap.borrow();
        let props = heap.object(obj)?;
        Ok(props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .unwrap_or_default())
    }

    fn set(&self, obj: ForeignValue, key: &str, value: ForeignValue) -> BridgeResult<()> {
        let mut heap = self.heap.borrow_mut();
        let props = heap.object_mut(obj)?;
        match props.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => props.push((key.to_string(), value)),
        }
        Ok(())
    }

    fn keys(&self, obj: ForeignValue) -> BridgeResult<Vec<String>> {
        let heap = self.heap.borrow();
        Ok(heap.object(obj)?.iter().map(|(k, _)| k.clone()).collect())
    }

    fn call(
        &self,
        func: ForeignValue,
        this: ForeignValue,
        args: &[ForeignValue],
    ) -> BridgeResult<ForeignValue> {
        let callee = match self.heap.borrow().entry(func) {
            Ok(HeapEntry::Function(f)) => Rc::clone(f),
            Ok(other) => return Err(BridgeError::NotCallable(other.kind().to_string())),
            Err(_) => return Err(BridgeError::NotCallable(func.type_name().to_string())),
        };
        trace!(?func, ?this, argc = args.len(), "calling function object");
        callee(this, args)
    }

    fn construct(&self, constructor: &str, args: &[ForeignValue]) -> BridgeResult<ForeignValue> {
        let ctor = self
            .constructors
            .borrow()
            .get(constructor)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownConstructor(constructor.to_string()))?;

        let instance = ctor(self, args)?;
        self.constructed.set(self.constructed.get() + 1);
        self.last_record.set(args.first().copied());
        debug!(constructor, ?instance, "constructed instance");
        Ok(instance)
    }
}
