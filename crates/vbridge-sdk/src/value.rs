//! ForeignValue — NaN-boxed u64 handle for one foreign runtime value
//!
//! The foreign runtime is dynamically typed: every value is a number, a
//! boolean, `null`, `undefined`, or a reference into the runtime's heap
//! (objects, strings, arrays, functions). All of them fit in one `u64`.
//!
//! # Encoding
//!
//! ```text
//! number:    Any value where upper 13 bits != 0x1FFF (raw IEEE 754)
//! Tagged:    0xFFF8 + 3-bit tag + 48-bit payload (NaN-boxed)
//!   - Ref:       0xFFF8000000000000 | heap_id          [tag=000]
//!   - bool:      0xFFF8002000000000 | (b as u64)       [tag=010]
//!   - null:      0xFFF8006000000000                    [tag=110]
//!   - undefined: 0xFFF8007000000000                    [tag=111]
//! ```
//!
//! NaN inputs are canonicalized to the positive quiet NaN so a number can
//! never alias a tagged payload.

/// NaN-boxed 64-bit handle for a value living in the foreign runtime.
///
/// Handles are `Copy`; a heap reference is only meaningful to the runtime
/// that allocated it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ForeignValue(u64);

const NAN_BOX_BASE: u64 = 0xFFF8_0000_0000_0000;
const TAG_SHIFT: u64 = 48;
const TAG_MASK: u64 = 0x7 << TAG_SHIFT;
const PAYLOAD_MASK_32: u64 = 0x0000_0000_FFFF_FFFF;

const TAG_REF: u64 = 0x0;
const TAG_BOOL: u64 = 0x2;
const TAG_NULL: u64 = 0x6;
const TAG_UNDEFINED: u64 = 0x7;

const NULL_BITS: u64 = NAN_BOX_BASE | (TAG_NULL << TAG_SHIFT);
const UNDEFINED_BITS: u64 = NAN_BOX_BASE | (TAG_UNDEFINED << TAG_SHIFT);
const TRUE_BITS: u64 = NAN_BOX_BASE | (TAG_BOOL << TAG_SHIFT) | 1;
const FALSE_BITS: u64 = NAN_BOX_BASE | (TAG_BOOL << TAG_SHIFT);

impl ForeignValue {
    // ========================================================================
    // Raw bits
    // ========================================================================

    /// Create from raw u64 bits
    #[inline(always)]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Get raw u64 bits
    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// The "no value" marker returned to the foreign runtime
    #[inline]
    pub const fn undefined() -> Self {
        Self(UNDEFINED_BITS)
    }

    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Self(NULL_BITS)
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Self(if b { TRUE_BITS } else { FALSE_BITS })
    }

    /// Create a number value
    #[inline]
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            Self(f64::NAN.to_bits())
        } else {
            Self(n.to_bits())
        }
    }

    /// Create a reference to heap slot `id` of the owning runtime
    #[inline]
    pub const fn from_ref(id: u32) -> Self {
        Self(NAN_BOX_BASE | (TAG_REF << TAG_SHIFT) | id as u64)
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    #[inline]
    const fn is_nan_boxed(&self) -> bool {
        (self.0 & NAN_BOX_BASE) == NAN_BOX_BASE
    }

    #[inline]
    const fn tag(&self) -> u64 {
        (self.0 & TAG_MASK) >> TAG_SHIFT
    }

    /// Check if value is `undefined`
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED_BITS
    }

    /// Check if value is `null`
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == NULL_BITS
    }

    /// Check if value is `null` or `undefined`
    #[inline]
    pub const fn is_nullish(&self) -> bool {
        self.is_null() || self.is_undefined()
    }

    /// Check if value is a boolean
    #[inline]
    pub const fn is_bool(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_BOOL
    }

    /// Check if value is a number (raw IEEE 754, not NaN-boxed)
    #[inline]
    pub const fn is_number(&self) -> bool {
        !self.is_nan_boxed()
    }

    /// Check if value references the runtime heap
    #[inline]
    pub const fn is_ref(&self) -> bool {
        self.is_nan_boxed() && self.tag() == TAG_REF
    }

    // ========================================================================
    // Extractors
    // ========================================================================

    /// Extract boolean value
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        if self.is_bool() {
            Some((self.0 & 1) != 0)
        } else {
            None
        }
    }

    /// Extract number value
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        if self.is_number() {
            Some(f64::from_bits(self.0))
        } else {
            None
        }
    }

    /// Extract the heap id of a reference
    #[inline]
    pub const fn as_heap_id(&self) -> Option<u32> {
        if self.is_ref() {
            Some((self.0 & PAYLOAD_MASK_32) as u32)
        } else {
            None
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        if !self.is_nan_boxed() {
            "number"
        } else {
            match self.tag() {
                TAG_REF => "reference",
                TAG_BOOL => "boolean",
                TAG_NULL => "null",
                TAG_UNDEFINED => "undefined",
                _ => "unknown",
            }
        }
    }
}

impl Default for ForeignValue {
    fn default() -> Self {
        Self::undefined()
    }
}

impl std::fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_nan_boxed() {
            return write!(f, "ForeignValue::Number({})", f64::from_bits(self.0));
        }
        match self.tag() {
            TAG_REF => write!(f, "ForeignValue::Ref({})", self.0 & PAYLOAD_MASK_32),
            TAG_BOOL => write!(f, "ForeignValue::Bool({})", (self.0 & 1) != 0),
            TAG_NULL => write!(f, "ForeignValue::Null"),
            TAG_UNDEFINED => write!(f, "ForeignValue::Undefined"),
            _ => write!(f, "ForeignValue::Unknown({:#x})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_is_default() {
        let v = ForeignValue::default();
        assert!(v.is_undefined());
        assert!(v.is_nullish());
        assert!(!v.is_null());
        assert!(!v.is_number());
    }

    #[test]
    fn test_null() {
        let v = ForeignValue::null();
        assert!(v.is_null());
        assert!(v.is_nullish());
        assert!(!v.is_undefined());
        assert!(!v.is_ref());
    }

    #[test]
    fn test_bool() {
        assert_eq!(ForeignValue::bool(true).as_bool(), Some(true));
        assert_eq!(ForeignValue::bool(false).as_bool(), Some(false));
        assert!(!ForeignValue::bool(true).is_number());
    }

    #[test]
    fn test_number() {
        let v = ForeignValue::number(3.5);
        assert_eq!(v.as_number(), Some(3.5));
        assert!(v.is_number());
        assert_eq!(ForeignValue::number(-0.25).as_number(), Some(-0.25));
    }

    #[test]
    fn test_negative_nan_does_not_alias_a_reference() {
        let negative_nan = f64::from_bits(0xFFF8_0000_0000_0000);
        let v = ForeignValue::number(negative_nan);
        assert!(v.is_number());
        assert!(!v.is_ref());
        assert!(v.as_number().map(f64::is_nan).unwrap_or(false));
    }

    #[test]
    fn test_ref() {
        let v = ForeignValue::from_ref(17);
        assert!(v.is_ref());
        assert_eq!(v.as_heap_id(), Some(17));
        assert_eq!(ForeignValue::number(17.0).as_heap_id(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ForeignValue::undefined().type_name(), "undefined");
        assert_eq!(ForeignValue::null().type_name(), "null");
        assert_eq!(ForeignValue::bool(true).type_name(), "boolean");
        assert_eq!(ForeignValue::number(1.0).type_name(), "number");
        assert_eq!(ForeignValue::from_ref(0).type_name(), "reference");
    }

    #[test]
    fn test_debug_format() {
        let s = format!("{:?}", ForeignValue::from_ref(42));
        assert!(s.contains("42"));
    }
}
