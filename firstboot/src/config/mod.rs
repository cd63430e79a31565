//! Composition-root configuration.
//!
//! Loaded once from a JSON store and passed by handle into the controller,
//! runner, and sink constructors; never held as ambient global state.

use crate::context::PlaceholderContext;
use crate::errors::ProvisionError;
use crate::exec::SuccessCodes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_functions_dir() -> PathBuf {
    PathBuf::from("Functions")
}

/// Typed configuration for one provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Directory holding the per-stage catalog files.
    #[serde(default = "default_functions_dir")]
    pub functions_dir: PathBuf,

    /// Product activation key, exposed as the `product_key` placeholder.
    #[serde(default)]
    pub product_key: Option<String>,

    /// Host name, exposed as the `computer_name` placeholder and used as
    /// the host identifier on outcome records.
    #[serde(default)]
    pub computer_name: Option<String>,

    /// Extra package-manager exit codes to classify as success, replacing
    /// the default table when set.
    #[serde(default)]
    pub success_codes: Option<Vec<i32>>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            functions_dir: default_functions_dir(),
            product_key: None,
            computer_name: None,
            success_codes: None,
        }
    }
}

impl ProvisionConfig {
    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// `ProvisionError::Io` when the file cannot be read,
    /// `ProvisionError::Config` when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProvisionError> {
        let bytes = std::fs::read(path.as_ref())?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ProvisionError::Config(format!("invalid config: {err}")))
    }

    /// Builds the placeholder snapshot for a stage run.
    #[must_use]
    pub fn placeholder_context(&self) -> PlaceholderContext {
        let mut ctx = PlaceholderContext::new();
        if let Some(ref key) = self.product_key {
            ctx = ctx.with_value("product_key", key);
        }
        if let Some(ref name) = self.computer_name {
            ctx = ctx.with_value("computer_name", name);
        }
        ctx
    }

    /// The success-code table for package-manager invocations.
    #[must_use]
    pub fn success_codes(&self) -> SuccessCodes {
        match &self.success_codes {
            Some(codes) => SuccessCodes::new(codes.iter().copied()),
            None => SuccessCodes::default(),
        }
    }

    /// The host identifier used on outcome records.
    #[must_use]
    pub fn host_identifier(&self) -> String {
        self.computer_name
            .clone()
            .unwrap_or_else(|| "unknown-host".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "functions_dir": "Data/Functions",
                "product_key": "XXXXX-YYYYY",
                "computer_name": "WS-042",
                "success_codes": [3010]
            }"#,
        )
        .unwrap();

        let config = ProvisionConfig::load(&path).unwrap();
        assert_eq!(config.functions_dir, PathBuf::from("Data/Functions"));
        assert_eq!(config.host_identifier(), "WS-042");
        assert!(config.success_codes().is_success(3010));
        assert!(!config.success_codes().is_success(-1_978_335_189));
    }

    #[test]
    fn test_defaults() {
        let config: ProvisionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.functions_dir, PathBuf::from("Functions"));
        assert_eq!(config.host_identifier(), "unknown-host");
        // Default table keeps the winget known-success codes.
        assert!(config.success_codes().is_success(-1_978_335_189));
    }

    #[test]
    fn test_placeholder_context_round_trip() {
        let config = ProvisionConfig {
            product_key: Some("ABCDE".into()),
            computer_name: Some("WS-1".into()),
            ..ProvisionConfig::default()
        };
        let ctx = config.placeholder_context();
        assert_eq!(ctx.get("product_key"), Some("ABCDE"));
        assert_eq!(
            ctx.substitute("rename {computer_name}").unwrap(),
            "rename WS-1"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ProvisionConfig::load("no/such/config.json").unwrap_err();
        assert!(matches!(err, ProvisionError::Io(_)));
    }
}
