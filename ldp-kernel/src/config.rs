//! Kernel configuration
//!
//! Configuration is read from JSON. Any leaf may be given either as a plain
//! value or as a configuration-value node that indirects through an
//! environment variable:
//!
//! ```json
//! {
//!   "baseUrl": {"envVar": "LDP_BASE_URL", "defaultVal": "http://localhost:8080/rest"},
//!   "defaultWorkspace": "default",
//!   "digestAlgorithm": "SHA-1",
//!   "transactionTimeoutSecs": 180
//! }
//! ```

use crate::error::{Error, Result};
use crate::fixity::DigestAlgorithm;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/rest";
pub const DEFAULT_WORKSPACE: &str = "default";
pub const DEFAULT_TRANSACTION_TIMEOUT_SECS: u64 = 180;

/// Environment variables consulted by [`KernelConfig::from_env`]
pub const ENV_BASE_URL: &str = "LDP_BASE_URL";
pub const ENV_DEFAULT_WORKSPACE: &str = "LDP_DEFAULT_WORKSPACE";

const FIELD_ENV_VAR: &str = "envVar";
const FIELD_DEFAULT_VAL: &str = "defaultVal";

/// A leaf that may be indirected through an environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValue {
    pub env_var: Option<String>,
    pub default_val: Option<String>,
}

impl ConfigValue {
    pub fn env(var: &str, default_val: &str) -> Self {
        Self {
            env_var: Some(var.to_string()),
            default_val: Some(default_val.to_string()),
        }
    }

    /// A non-empty environment variable wins over the default.
    pub fn resolve_string(&self) -> Option<String> {
        if let Some(var) = &self.env_var {
            if let Ok(val) = std::env::var(var) {
                if !val.is_empty() {
                    return Some(val);
                }
            }
        }
        self.default_val.clone()
    }
}

/// Settings shared by every session the kernel hands out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelConfig {
    /// External base of every repository IRI, without a trailing slash
    pub base_url: String,
    /// Workspace used when a request names none
    pub default_workspace: String,
    /// Algorithm used for fixity checks
    pub digest_algorithm: DigestAlgorithm,
    /// Idle time after which an open transaction expires
    pub transaction_timeout_secs: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_workspace: DEFAULT_WORKSPACE.to_string(),
            digest_algorithm: DigestAlgorithm::default(),
            transaction_timeout_secs: DEFAULT_TRANSACTION_TIMEOUT_SECS,
        }
    }
}

impl KernelConfig {
    /// Defaults, with `LDP_BASE_URL` and `LDP_DEFAULT_WORKSPACE` applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = ConfigValue::env(ENV_BASE_URL, DEFAULT_BASE_URL).resolve_string() {
            config.base_url = normalize_base_url(&url);
        }
        if let Some(ws) =
            ConfigValue::env(ENV_DEFAULT_WORKSPACE, DEFAULT_WORKSPACE).resolve_string()
        {
            config.default_workspace = ws;
        }
        config
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Parse a JSON object. Missing fields keep their defaults.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::config("kernel configuration must be a JSON object"))?;
        let mut config = Self::default();

        if let Some(url) = leaf_string(obj.get("baseUrl"), "baseUrl")? {
            if url.is_empty() {
                return Err(Error::config("baseUrl must not be empty"));
            }
            config.base_url = normalize_base_url(&url);
        }
        if let Some(ws) = leaf_string(obj.get("defaultWorkspace"), "defaultWorkspace")? {
            config.default_workspace = ws;
        }
        if let Some(alg) = leaf_string(obj.get("digestAlgorithm"), "digestAlgorithm")? {
            config.digest_algorithm = alg.parse()?;
        }
        if let Some(secs) = leaf_string(obj.get("transactionTimeoutSecs"), "transactionTimeoutSecs")?
        {
            config.transaction_timeout_secs = secs.parse().map_err(|_| {
                Error::config(format!("transactionTimeoutSecs is not a number: {secs}"))
            })?;
        }
        Ok(config)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Read a leaf as a string, following a configuration-value node if present.
fn leaf_string(value: Option<&JsonValue>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Object(obj))
            if obj.contains_key(FIELD_ENV_VAR) || obj.contains_key(FIELD_DEFAULT_VAL) =>
        {
            let indirect: ConfigValue = serde_json::from_value(JsonValue::Object(obj.clone()))?;
            Ok(indirect.resolve_string())
        }
        Some(other) => Err(Error::config(format!(
            "unsupported value for {field}: {other}"
        ))),
    }
}
