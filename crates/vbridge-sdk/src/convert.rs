//! Traits for converting between foreign values and Rust values.
//!
//! Bridged methods receive their arguments unconverted; these traits are
//! what a method body (or a flat data field) uses when it wants a Rust
//! value out of a foreign one, or the other way round.

use crate::context::ForeignContext;
use crate::error::{BridgeError, BridgeResult};
use crate::value::ForeignValue;

/// Convert from a Rust value to a foreign value.
pub trait ToForeign {
    /// Convert, allocating in `ctx` where needed
    fn to_foreign(self, ctx: &dyn ForeignContext) -> ForeignValue;
}

/// Convert from a foreign value to a Rust value.
pub trait FromForeign: Sized {
    /// Convert, returning `TypeMismatch` if the value has the wrong type
    fn from_foreign(value: ForeignValue, ctx: &dyn ForeignContext) -> BridgeResult<Self>;
}

fn mismatch(expected: &str, value: ForeignValue) -> BridgeError {
    BridgeError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

// ============================================================================
// ToForeign
// ============================================================================

impl ToForeign for ForeignValue {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        self
    }
}

impl ToForeign for () {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        ForeignValue::undefined()
    }
}

impl ToForeign for bool {
    fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
        ForeignValue::bool(self)
    }
}

macro_rules! number_to_foreign {
    ($($ty:ty),*) => {
        $(
            impl ToForeign for $ty {
                fn to_foreign(self, _ctx: &dyn ForeignContext) -> ForeignValue {
                    ForeignValue::number(self as f64)
                }
            }
        )*
    };
}

number_to_foreign!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl ToForeign for &str {
    fn to_foreign(self, ctx: &dyn ForeignContext) -> ForeignValue {
        ctx.create_string(self)
    }
}

impl ToForeign for String {
    fn to_foreign(self, ctx: &dyn ForeignContext) -> ForeignValue {
        ctx.create_string(&self)
    }
}

impl<T: ToForeign> ToForeign for Option<T> {
    fn to_foreign(self, ctx: &dyn ForeignContext) -> ForeignValue {
        match self {
            Some(value) => value.to_foreign(ctx),
            None => ForeignValue::null(),
        }
    }
}

impl<T: ToForeign> ToForeign for Vec<T> {
    fn to_foreign(self, ctx: &dyn ForeignContext) -> ForeignValue {
        let items: Vec<ForeignValue> = self.into_iter().map(|item| item.to_foreign(ctx)).collect();
        ctx.create_array(&items)
    }
}

/// Convert a JSON value, propagating any runtime failure.
///
/// Objects and arrays are built bottom-up; the first rejected write aborts
/// the conversion.
pub fn json_to_foreign(
    ctx: &dyn ForeignContext,
    value: &serde_json::Value,
) -> BridgeResult<ForeignValue> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(ForeignValue::null()),
        Value::Bool(b) => Ok(ForeignValue::bool(*b)),
        Value::Number(n) => Ok(ForeignValue::number(n.as_f64().unwrap_or(f64::NAN))),
        Value::String(s) => Ok(ctx.create_string(s)),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|item| json_to_foreign(ctx, item))
                .collect::<BridgeResult<Vec<_>>>()?;
            Ok(ctx.create_array(&items))
        }
        Value::Object(map) => {
            let obj = ctx.create_object();
            for (key, value) in map {
                ctx.set(obj, key, json_to_foreign(ctx, value)?)?;
            }
            Ok(obj)
        }
    }
}

// ============================================================================
// FromForeign
// ============================================================================

impl FromForeign for ForeignValue {
    fn from_foreign(value: ForeignValue, _ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        Ok(value)
    }
}

impl FromForeign for bool {
    fn from_foreign(value: ForeignValue, _ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromForeign for f64 {
    fn from_foreign(value: ForeignValue, _ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        value.as_number().ok_or_else(|| mismatch("number", value))
    }
}

impl FromForeign for i32 {
    fn from_foreign(value: ForeignValue, _ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        match value.as_number() {
            Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
                Ok(n as i32)
            }
            _ => Err(mismatch("i32", value)),
        }
    }
}

impl FromForeign for i64 {
    fn from_foreign(value: ForeignValue, _ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        match value.as_number() {
            Some(n) if n.fract() == 0.0 && n.is_finite() => Ok(n as i64),
            _ => Err(mismatch("i64", value)),
        }
    }
}

impl FromForeign for String {
    fn from_foreign(value: ForeignValue, ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        if !value.is_ref() {
            return Err(mismatch("string", value));
        }
        ctx.read_string(value)
    }
}

impl<T: FromForeign> FromForeign for Option<T> {
    fn from_foreign(value: ForeignValue, ctx: &dyn ForeignContext) -> BridgeResult<Self> {
        if value.is_nullish() {
            Ok(None)
        } else {
            T::from_foreign(value, ctx).map(Some)
        }
    }
}
