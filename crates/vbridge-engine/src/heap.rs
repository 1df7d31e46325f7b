//! Object heap
//!
//! Slots are never freed: the engine lives for one test or one page, and
//! handles stay valid for its whole lifetime.

use vbridge_sdk::{BridgeError, BridgeResult, ForeignFn, ForeignValue};

/// One heap slot
pub enum HeapEntry {
    /// Plain object with ordered own properties
    Object(Vec<(String, ForeignValue)>),
    /// Immutable string
    Str(String),
    /// Array
    Array(Vec<ForeignValue>),
    /// Native function exposed to the runtime
    Function(ForeignFn),
}

impl HeapEntry {
    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            HeapEntry::Object(_) => "object",
            HeapEntry::Str(_) => "string",
            HeapEntry::Array(_) => "array",
            HeapEntry::Function(_) => "function",
        }
    }
}

/// Append-only heap indexed by the id carried in `ForeignValue` references.
#[derive(Default)]
pub struct Heap {
    slots: Vec<HeapEntry>,
}

impl Heap {
    /// Allocate `entry` and return a reference to it
    pub fn alloc(&mut self, entry: HeapEntry) -> ForeignValue {
        let id = self.slots.len() as u32;
        self.slots.push(entry);
        ForeignValue::from_ref(id)
    }

    /// Resolve a reference
    pub fn entry(&self, val: ForeignValue) -> BridgeResult<&HeapEntry> {
        val.as_heap_id()
            .and_then(|id| self.slots.get(id as usize))
            .ok_or_else(|| BridgeError::NotAnObject(val.type_name().to_string()))
    }

    /// Resolve a reference mutably
    pub fn entry_mut(&mut self, val: ForeignValue) -> BridgeResult<&mut HeapEntry> {
        val.as_heap_id()
            .and_then(|id| self.slots.get_mut(id as usize))
            .ok_or_else(|| BridgeError::NotAnObject(val.type_name().to_string()))
    }

    /// Resolve an object's property list
    pub fn object(&self, val: ForeignValue) -> BridgeResult<&Vec<(String, ForeignValue)>> {
        match self.entry(val)? {
            HeapEntry::Object(props) => Ok(props),
            other => Err(BridgeError::NotAnObject(other.kind().to_string())),
        }
    }

    /// Resolve an object's property list mutably
    pub fn object_mut(&mut self, val: ForeignValue) -> BridgeResult<&mut Vec<(String, ForeignValue)>> {
        match self.entry_mut(val)? {
            HeapEntry::Object(props) => Ok(props),
            other => Err(BridgeError::NotAnObject(other.kind().to_string())),
        }
    }

    /// Number of allocated slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing has been allocated
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
