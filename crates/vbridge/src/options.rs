//! Build options
//!
//! Names the foreign constructor and the record slots a component build
//! writes. Defaults match the stock component runtime; embedders with a
//! renamed runtime load overrides from TOML or JSON.

use serde::{Deserialize, Serialize};

/// Error loading [`BridgeOptions`]
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Malformed TOML
    #[error("Invalid TOML options: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON
    #[error("Invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed but unusable
    #[error("Invalid options: {0}")]
    Invalid(String),
}

/// Record slot names used when materializing a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotNames {
    /// Mount target
    pub el: String,
    /// Data payload
    pub data: String,
    /// Method table
    pub methods: String,
    /// Template source
    pub template: String,
}

impl Default for SlotNames {
    fn default() -> Self {
        Self {
            el: "el".to_string(),
            data: "data".to_string(),
            methods: "methods".to_string(),
            template: "template".to_string(),
        }
    }
}

/// Options controlling how [`new_vm_with`](crate::new_vm_with) builds a
/// component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeOptions {
    /// Foreign constructor invoked with the materialized record
    pub constructor: String,
    /// Record slot names
    pub slots: SlotNames,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            constructor: "Vue".to_string(),
            slots: SlotNames::default(),
        }
    }
}

impl BridgeOptions {
    /// Parse from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(source)?;
        options.validate()
    }

    /// Parse from JSON
    pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(source)?;
        options.validate()
    }

    fn validate(self) -> Result<Self, OptionsError> {
        if self.constructor.is_empty() {
            return Err(OptionsError::Invalid("constructor name is empty".to_string()));
        }
        let slots = [
            &self.slots.el,
            &self.slots.data,
            &self.slots.methods,
            &self.slots.template,
        ];
        if slots.iter().any(|name| name.is_empty()) {
            return Err(OptionsError::Invalid("slot name is empty".to_string()));
        }
        for (i, name) in slots.iter().enumerate() {
            if slots[i + 1..].contains(name) {
                return Err(OptionsError::Invalid(format!("slot name '{name}' used twice")));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BridgeOptions::default();
        assert_eq!(options.constructor, "Vue");
        assert_eq!(options.slots.methods, "methods");
    }

    #[test]
    fn test_partial_toml() {
        let options = BridgeOptions::from_toml_str(
            r#"
            constructor = "Widget"

            [slots]
            data = "state"
            "#,
        )
        .unwrap();
        assert_eq!(options.constructor, "Widget");
        assert_eq!(options.slots.data, "state");
        assert_eq!(options.slots.el, "el");
    }

    #[test]
    fn test_json() {
        let options = BridgeOptions::from_json_str(r#"{"slots": {"methods": "actions"}}"#).unwrap();
        assert_eq!(options.constructor, "Vue");
        assert_eq!(options.slots.methods, "actions");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = BridgeOptions::from_toml_str("constructer = \"Vue\"").unwrap_err();
        assert!(matches!(err, OptionsError::Toml(_)));
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let err = BridgeOptions::from_json_str(r#"{"slots": {"data": "el"}}"#).unwrap_err();
        assert!(matches!(err, OptionsError::Invalid(_)));
    }

    #[test]
    fn test_empty_constructor_rejected() {
        let err = BridgeOptions::from_toml_str("constructor = \"\"").unwrap_err();
        assert!(matches!(err, OptionsError::Invalid(_)));
    }
}
