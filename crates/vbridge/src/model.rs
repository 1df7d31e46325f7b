//! Typed views over foreign objects.

use vbridge_sdk::Object;

use crate::vm::Vm;

/// A Rust struct backed by one foreign object.
///
/// The backing object doubles as the receiver binding for bridged methods:
/// each call builds a fresh receiver with [`Model::from_object`] around the
/// component's current data payload. Usually derived with
/// `#[derive(Model)]`, which takes the first field as the backing object
/// and a field named `vm` as the back-reference slot.
pub trait Model: 'static {
    /// Build a receiver around `object`, every other field zeroed
    fn from_object(object: Object) -> Self
    where
        Self: Sized;

    /// The backing object
    fn object(&self) -> &Object;

    /// Back-reference slot filled with the instance handle after the
    /// component is constructed. `None` when the type has no such field.
    fn vm_slot(&mut self) -> Option<&mut Option<Vm>> {
        None
    }
}
