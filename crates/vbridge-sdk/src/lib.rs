//! vbridge SDK - foreign runtime primitives for the method bridge
//!
//! This crate provides the minimal types and traits shared by the bridge
//! core and any foreign runtime it talks to, without depending on either.
//!
//! - [`ForeignValue`]: NaN-boxed handle for one foreign value
//! - [`ForeignContext`]: operations a foreign runtime provides
//! - [`Object`]: a value bundled with its runtime
//! - [`MethodTable`]: name → foreign-callable function
//! - [`ToForeign`] / [`FromForeign`]: conversions for method bodies
//! - [`json_to_foreign`]: fallible conversion for configuration values

#![warn(missing_docs)]

pub mod context;
pub mod convert;
pub mod error;
pub mod handler;
pub mod types;
pub mod value;

pub use context::{ForeignContext, ForeignFn, Runtime};
pub use convert::{json_to_foreign, FromForeign, ToForeign};
pub use error::{BridgeError, BridgeResult};
pub use handler::MethodTable;
pub use types::Object;
pub use value::ForeignValue;
