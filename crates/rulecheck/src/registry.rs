//! Named custom-rule bundles
//!
//! A registry is built once (programmatically or from a JSON/YAML file),
//! then shared read-only. Validators hold it behind an `Arc`; the optional
//! process-wide registry can be installed exactly once at startup.

use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::rules::FieldRule;

static GLOBAL_REGISTRY: OnceCell<Arc<CustomRuleRegistry>> = OnceCell::new();
static EMPTY_REGISTRY: Lazy<Arc<CustomRuleRegistry>> =
    Lazy::new(|| Arc::new(CustomRuleRegistry::new()));

/// Custom rule name to rule bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomRuleRegistry {
    bundles: IndexMap<String, FieldRule>,
}

impl CustomRuleRegistry {
    pub fn new() -> Self {
        Self {
            bundles: IndexMap::new(),
        }
    }

    /// Add a bundle while building the registry
    pub fn with_rule(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.bundles.insert(name.into(), rule);
        self
    }

    /// Look up a bundle by exact name
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.bundles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Build from a JSON object of rule objects
    pub fn from_json_value(value: &Value) -> Result<Self, RegistryError> {
        let map = value.as_object().ok_or(RegistryError::NotAnObject)?;

        let mut registry = Self::new();
        for (name, bundle) in map {
            let rule = FieldRule::from_json(name, bundle)
                .map_err(|_| RegistryError::InvalidBundle { name: name.clone() })?;
            registry.bundles.insert(name.clone(), rule);
        }
        Ok(registry)
    }

    pub fn from_json_str(input: &str) -> Result<Self, RegistryError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(&value)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, RegistryError> {
        let value: Value = serde_yaml::from_str(input)?;
        Self::from_json_value(&value)
    }

    /// Load from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let registry = if is_yaml {
            Self::from_yaml_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };

        debug!(
            "Loaded {} custom rule(s) from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Make this the process-wide registry. Fails if one is already installed.
    pub fn install_global(self) -> Result<Arc<CustomRuleRegistry>, RegistryError> {
        let registry = Arc::new(self);
        GLOBAL_REGISTRY
            .set(Arc::clone(&registry))
            .map_err(|_| RegistryError::AlreadyInstalled)?;
        info!("Installed global custom rule registry with {} rule(s)", registry.len());
        Ok(registry)
    }

    /// The installed process-wide registry, or an empty one
    pub fn global() -> Arc<CustomRuleRegistry> {
        GLOBAL_REGISTRY
            .get()
            .cloned()
            .unwrap_or_else(|| Arc::clone(&EMPTY_REGISTRY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::data_type::DataType;
    use std::io::Write;

    #[test]
    fn test_programmatic_registry() {
        let registry = CustomRuleRegistry::new()
            .with_rule("username", FieldRule::new().data_type(DataType::String).len(3, 20))
            .with_rule("age", FieldRule::new().range(0, 150));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("username"));
        assert!(registry.get("Username").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["username", "age"]);
    }

    #[test]
    fn test_from_json_str() {
        let registry = CustomRuleRegistry::from_json_str(
            r#"{"zip": {"dataType": "string", "regex": "^\\d{5}$"}}"#,
        )
        .unwrap();
        let zip = registry.get("zip").unwrap();
        assert_eq!(zip.members().count(), 2);
    }

    #[test]
    fn test_from_yaml_str() {
        let registry = CustomRuleRegistry::from_yaml_str(
            "status:\n  list: [active, inactive]\n  message:\n    list: \"{field} is not a status\"\n",
        )
        .unwrap();
        assert_eq!(
            registry.get("status").unwrap().template_for("list"),
            Some("{field} is not a status")
        );
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            CustomRuleRegistry::from_json_str("[1, 2]"),
            Err(RegistryError::NotAnObject)
        ));
        assert!(matches!(
            CustomRuleRegistry::from_json_str(r#"{"zip": "^\\d+$"}"#),
            Err(RegistryError::InvalidBundle { .. })
        ));
        assert!(matches!(
            CustomRuleRegistry::from_json_str("{"),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn test_from_path_picks_format_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "slug:\n  regex: \"^[a-z-]+$\"").unwrap();
        let registry = CustomRuleRegistry::from_path(yaml.path()).unwrap();
        assert!(registry.contains("slug"));

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"slug": {{"regex": "^[a-z-]+$"}}}}"#).unwrap();
        let registry = CustomRuleRegistry::from_path(json.path()).unwrap();
        assert!(registry.contains("slug"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            CustomRuleRegistry::from_path("/definitely/not/here.json"),
            Err(RegistryError::Io { .. })
        ));
    }
}
