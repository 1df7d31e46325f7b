//! Conversion of bridged method results into foreign values.

use vbridge_sdk::{json_to_foreign, BridgeResult, ForeignContext, ForeignValue, Object, ToForeign};

use crate::vm::Vm;

/// Result type a bridged method may return.
///
/// `()` becomes `undefined`. Tuples return their first element only; the
/// remaining elements are dropped. A `Result` propagates its error to the
/// foreign caller.
pub trait MethodReturn {
    /// Convert into the value handed back to the foreign caller
    fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue>;
}

macro_rules! impl_return_via_to_foreign {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MethodReturn for $ty {
                fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue> {
                    Ok(self.to_foreign(ctx))
                }
            }
        )*
    };
}

impl_return_via_to_foreign!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    ForeignValue,
    Object,
    &Object,
    Vm,
    &Vm,
);

impl MethodReturn for serde_json::Value {
    fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue> {
        json_to_foreign(ctx, &self)
    }
}

impl<T: MethodReturn> MethodReturn for Option<T> {
    fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue> {
        match self {
            Some(value) => value.into_foreign(ctx),
            None => Ok(ForeignValue::null()),
        }
    }
}

impl<T: MethodReturn> MethodReturn for BridgeResult<T> {
    fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue> {
        self?.into_foreign(ctx)
    }
}

macro_rules! impl_return_first_of_tuple {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: MethodReturn $(, $rest)*> MethodReturn for ($first, $($rest,)*) {
            #[allow(non_snake_case, unused_variables)]
            fn into_foreign(self, ctx: &dyn ForeignContext) -> BridgeResult<ForeignValue> {
                let ($first, $($rest,)*) = self;
                $first.into_foreign(ctx)
            }
        }
    };
}

impl_return_first_of_tuple!(A);
impl_return_first_of_tuple!(A, B);
impl_return_first_of_tuple!(A, B, C);
impl_return_first_of_tuple!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;
    use vbridge_engine::Engine;
    use vbridge_sdk::BridgeError;

    #[test]
    fn test_unit_is_undefined() {
        let engine = Engine::new();
        assert!(().into_foreign(&*engine).unwrap().is_undefined());
    }

    #[test]
    fn test_option_none_is_null() {
        let engine = Engine::new();
        let none: Option<f64> = None;
        assert!(none.into_foreign(&*engine).unwrap().is_null());
        assert_eq!(Some(4.0_f64).into_foreign(&*engine).unwrap().as_number(), Some(4.0));
    }

    #[test]
    fn test_error_propagates() {
        let engine = Engine::new();
        let failed: BridgeResult<f64> = Err(BridgeError::Thrown("nope".into()));
        assert_eq!(
            failed.into_foreign(&*engine),
            Err(BridgeError::Thrown("nope".into()))
        );
    }

    #[test]
    fn test_tuple_returns_first_only() {
        let engine = Engine::new();
        let out = (7.0_f64, "ignored", false).into_foreign(&*engine).unwrap();
        assert_eq!(out.as_number(), Some(7.0));
    }

    #[test]
    fn test_string_allocated() {
        let engine = Engine::new();
        let out = "hi".into_foreign(&*engine).unwrap();
        assert_eq!(engine.read_string(out).unwrap(), "hi");
    }

    #[test]
    fn test_json_object_materialized() {
        let engine = Engine::new();
        let out = serde_json::json!({ "done": true }).into_foreign(&*engine).unwrap();
        assert_eq!(engine.get(out, "done").unwrap().as_bool(), Some(true));
    }
}
