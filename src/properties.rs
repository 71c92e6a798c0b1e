//! Report property definitions with defaults from report.json
//!
//! report.json is embedded at compile time and is the single source of truth
//! for property names, kinds, defaults and allowed values. User overrides come
//! from an optional JSON config file and from command-line flags; invalid
//! values fall back to the registry default with a warning.

use crate::error::{ReportError, Result};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// report.json embedded at compile time
const REPORT_JSON: &str = include_str!("../report.json");

/// Property definition from report.json
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub default_value: String,
    /// For EnumeratedProperty, the valid values
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PropertyKind {
    String,
    Enumerated,
}

#[derive(Deserialize)]
struct ReportManifest {
    properties: Vec<RawProperty>,
}

/// One entry of the `properties` array in report.json
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    kind: String,
    name: String,
    #[serde(default)]
    default_value: String,
    #[serde(default)]
    values: Option<Vec<String>>,
}

/// Registry of all report properties with their defaults from report.json
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse report.json and build the registry
    ///
    /// Panics if report.json is malformed, which can only happen if the
    /// embedded file itself is broken.
    pub fn from_report_json() -> Self {
        let manifest: ReportManifest =
            serde_json::from_str(REPORT_JSON).expect("report.json is invalid");

        let mut properties = HashMap::new();

        for prop in manifest.properties {
            let kind = match prop.kind.as_str() {
                "StringProperty" => PropertyKind::String,
                "EnumeratedProperty" => PropertyKind::Enumerated,
                other => panic!("Unknown property kind: {}", other),
            };

            let valid_values = if kind == PropertyKind::Enumerated {
                prop.values
            } else {
                None
            };

            properties.insert(
                prop.name,
                PropertyDef {
                    default_value: prop.default_value,
                    valid_values,
                },
            );
        }

        Self { properties }
    }

    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true) // Non-enumerated properties accept any value
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(PropertyRegistry::from_report_json)
}

/// Typed property reader over user overrides, with defaults from report.json
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with no overrides (every property resolves to its default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a flat JSON object, e.g. `{"variant": "brief", "dpi": 300}`
    ///
    /// String, number and boolean values are accepted. Empty strings count as
    /// "not set". Unknown keys are kept but reported.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ReportError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ReportError::Config {
                    path: path.to_path_buf(),
                    message: source.to_string(),
                }
            }
        })?;

        Self::from_json_str(&text).map_err(|message| ReportError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_json_str(text: &str) -> std::result::Result<Self, String> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?;

        let object = json
            .as_object()
            .ok_or_else(|| "expected a JSON object of property values".to_string())?;

        let mut reader = Self::new();
        for (name, value) in object {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => continue,
                other => {
                    return Err(format!(
                        "property '{}' must be a string or number, got {}",
                        name, other
                    ))
                }
            };
            reader = reader.with_override(name, value);
        }

        Ok(reader)
    }

    /// Set a user value, replacing any previous one. Empty = not set.
    pub fn with_override(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if registry().get_property(name).is_none() {
            warn!("Unknown report property '{}' (ignored)", name);
        }
        if value.is_empty() {
            self.user_values.remove(name);
        } else {
            self.user_values.insert(name.to_string(), value);
        }
        self
    }

    /// Get string property (user value or default from report.json)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        let value = self.get_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Get enumerated property with validation
    ///
    /// Returns the user value (lowercased) if valid, otherwise the default.
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value, name, valid_values, default
            );
        }

        default.to_string()
    }

    /// Get u32 property with range validation
    pub fn get_u32_in_range(&self, name: &str, min: u32, max: u32) -> u32 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(min);

        let value = self.get_string(name);
        match value.trim().parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => v,
            Ok(v) => {
                warn!(
                    "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                    v, name, min, max, default
                );
                default
            }
            Err(_) => {
                warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    value, name, default
                );
                default
            }
        }
    }
}
