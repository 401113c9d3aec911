// src/config/mod.rs

//! Layered configuration for the listing studio
//!
//! Settings are merged from, in increasing priority:
//! - built-in defaults
//! - configuration files (YAML, JSON, TOML)
//! - environment variables (`PRODUCT_STUDIO_` prefix, `__` between levels)
//! - in-memory overrides (command line flags)

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, ErrorKind, Result};

/// Prefix for environment overrides, e.g. `PRODUCT_STUDIO_API__BASE_URL`
pub const ENV_PREFIX: &str = "PRODUCT_STUDIO";

/// Separator between nesting levels in environment variable names
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub key: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error for '{}': {}", self.key, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigSource {
    File { path: PathBuf, format: ConfigFormat },
    Environment { prefix: String },
    Memory { data: Value },
}

#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub name: String,
    pub source: ConfigSource,
    pub priority: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub form: FormConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "Product Studio".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Where listings are posted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the listing service. Empty means same origin,
    /// which only works in the browser.
    pub base_url: String,
    pub products_path: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let base_url = if cfg!(target_arch = "wasm32") {
            String::new()
        } else {
            "http://localhost:3000".to_string()
        };

        Self {
            base_url,
            products_path: "/api/products".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl ApiConfig {
    pub fn products_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.products_path
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted image in bytes
    pub max_file_size: u64,
    /// Same syntax as the `accept` attribute of a file input
    pub accept: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            accept: "image/*".to_string(),
        }
    }
}

impl UploadConfig {
    /// Checks a MIME type against the comma separated `accept` list
    pub fn accepts(&self, mime: &str) -> bool {
        self.accept
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .any(|pattern| {
                if pattern == "*/*" || pattern == "*" {
                    return true;
                }
                match pattern.strip_suffix("/*") {
                    Some(group) => mime
                        .split('/')
                        .next()
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(group)),
                    None => pattern.eq_ignore_ascii_case(mime),
                }
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Reject submissions whose numeric fields do not parse instead of
    /// forwarding them as NaN
    pub strict_numbers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    /// Toasts disappear after this long; 0 keeps them until dismissed
    pub notification_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Add New Product".to_string(),
            notification_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub console: ConsoleLogConfig,
    pub file: Option<FileLogConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            console: ConsoleLogConfig::default(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleLogConfig {
    pub enabled: bool,
    pub colored: bool,
}

impl Default for ConsoleLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    pub path: PathBuf,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./logs/product_studio.log"),
        }
    }
}

impl AppConfig {
    /// Checks the settings that would make the form unusable
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !cfg!(target_arch = "wasm32") && self.api.base_url.trim().is_empty() {
            errors.push(ValidationError {
                key: "api.base_url".to_string(),
                message: "an absolute base URL is required outside the browser".to_string(),
            });
        }

        if !self.api.base_url.is_empty()
            && !(self.api.base_url.starts_with("http://")
                || self.api.base_url.starts_with("https://"))
        {
            errors.push(ValidationError {
                key: "api.base_url".to_string(),
                message: format!("'{}' is not an http(s) URL", self.api.base_url),
            });
        }

        if !self.api.products_path.starts_with('/') {
            errors.push(ValidationError {
                key: "api.products_path".to_string(),
                message: "must start with '/'".to_string(),
            });
        }

        if self.api.timeout_ms == 0 {
            errors.push(ValidationError {
                key: "api.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.upload.max_file_size == 0 {
            errors.push(ValidationError {
                key: "upload.max_file_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.upload.accept.trim().is_empty() {
            errors.push(ValidationError {
                key: "upload.accept".to_string(),
                message: "must name at least one MIME type".to_string(),
            });
        }

        errors
    }
}

/// Merges configuration layers into an [`AppConfig`]
#[derive(Debug, Default)]
pub struct ConfigManager {
    layers: Vec<ConfigLayer>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// File layer followed by the environment layer
    pub fn with_config_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut manager = Self::new();
        manager.add_file_layer("file", config_path, 10)?;
        manager.add_env_layer("environment", ENV_PREFIX, 20);
        Ok(manager)
    }

    /// Looks for `product_studio/config.{toml,yaml,yml,json}` in the user
    /// config directory, then adds the environment layer
    pub fn discover() -> Self {
        let mut manager = Self::new();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(dir) = dirs::config_dir() {
            let found = ["toml", "yaml", "yml", "json"]
                .iter()
                .map(|ext| dir.join("product_studio").join(format!("config.{}", ext)))
                .find(|path| path.is_file());

            if let Some(path) = found {
                tracing::debug!(path = %path.display(), "Using discovered config file");
                // Extension comes from the fixed list above
                let _ = manager.add_file_layer("discovered", path, 10);
            }
        }

        manager.add_env_layer("environment", ENV_PREFIX, 20);
        manager
    }

    pub fn add_file_layer<P: AsRef<Path>>(
        &mut self,
        name: impl Into<String>,
        path: P,
        priority: u32,
    ) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let format = ConfigFormat::from_extension(&path)
            .ok_or_else(|| Error::config("Unsupported configuration file format"))?;

        self.push_layer(ConfigLayer {
            name: name.into(),
            source: ConfigSource::File { path, format },
            priority,
        });

        Ok(())
    }

    pub fn add_env_layer(&mut self, name: impl Into<String>, prefix: impl Into<String>, priority: u32) {
        self.push_layer(ConfigLayer {
            name: name.into(),
            source: ConfigSource::Environment {
                prefix: prefix.into(),
            },
            priority,
        });
    }

    pub fn add_memory_layer(&mut self, name: impl Into<String>, data: Value, priority: u32) {
        self.push_layer(ConfigLayer {
            name: name.into(),
            source: ConfigSource::Memory { data },
            priority,
        });
    }

    fn push_layer(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
        self.layers.sort_by_key(|l| l.priority);
    }

    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Merges every layer over the defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut merged = serde_json::to_value(AppConfig::default())?;

        for layer in &self.layers {
            let layer_config = self.load_layer_config(layer)?;
            tracing::trace!(layer = %layer.name, "Merging configuration layer");
            merge_values(&mut merged, layer_config);
        }

        serde_json::from_value(merged).map_err(|e| {
            Error::new(
                ErrorKind::Configuration {
                    key: None,
                    validation_errors: vec![e.to_string()],
                },
                format!("Failed to deserialize configuration: {}", e),
            )
        })
    }

    /// Loads and rejects configurations that fail [`AppConfig::validate`]
    pub fn load_validated(&self) -> Result<AppConfig> {
        let config = self.load()?;
        let errors = config.validate();

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(Error::new(
                ErrorKind::Configuration {
                    key: errors.first().map(|e| e.key.clone()),
                    validation_errors: errors.iter().map(ToString::to_string).collect(),
                },
                format!("{} configuration error(s)", errors.len()),
            ))
        }
    }

    fn load_layer_config(&self, layer: &ConfigLayer) -> Result<Value> {
        match &layer.source {
            #[cfg(not(target_arch = "wasm32"))]
            ConfigSource::File { path, format } => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("Failed to read config file {}: {}", path.display(), e))
                })?;

                parse_config(&content, *format)
            }

            #[cfg(target_arch = "wasm32")]
            ConfigSource::File { .. } => {
                Err(Error::config("File loading not supported in web platform"))
            }

            ConfigSource::Environment { prefix } => {
                let template = serde_json::to_value(AppConfig::default())?;
                Ok(env_overrides(prefix, std::env::vars(), &template))
            }

            ConfigSource::Memory { data } => Ok(data.clone()),
        }
    }
}

pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Value> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse JSON config: {}", e))),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse YAML config: {}", e))),
        ConfigFormat::Toml => toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse TOML config: {}", e))),
    }
}

/// Builds a nested object from `PREFIX_A__B=value` pairs. Values are typed
/// after the matching entry of `template`; keys it lacks are guessed.
fn env_overrides(
    prefix: &str,
    vars: impl Iterator<Item = (String, String)>,
    template: &Value,
) -> Value {
    let mut env_config = Map::new();
    let prefix = format!("{}_", prefix);

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&prefix) else {
            continue;
        };

        let config_key = rest.to_lowercase();
        let nested_keys: Vec<&str> = config_key
            .split(ENV_SEPARATOR)
            .filter(|k| !k.is_empty())
            .collect();
        set_nested_env_value(&mut env_config, &nested_keys, value, Some(template));
    }

    Value::Object(env_config)
}

fn set_nested_env_value(
    config: &mut Map<String, Value>,
    keys: &[&str],
    value: String,
    template: Option<&Value>,
) {
    match keys {
        [] => {}
        [last] => {
            let expected = template.and_then(|t| t.get(*last));
            config.insert(last.to_string(), typed_env_value(value, expected));
        }
        [first, rest @ ..] => {
            let entry = config
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));

            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }

            if let Value::Object(nested_map) = entry {
                let nested_template = template.and_then(|t| t.get(*first));
                set_nested_env_value(nested_map, rest, value, nested_template);
            }
        }
    }
}

fn typed_env_value(value: String, expected: Option<&Value>) -> Value {
    match expected {
        Some(Value::String(_)) => Value::String(value),
        Some(Value::Bool(_)) => value
            .parse::<bool>()
            .map(Value::Bool)
            .unwrap_or(Value::String(value)),
        Some(Value::Number(_)) => value
            .parse::<u64>()
            .map(|n| Value::Number(Number::from(n)))
            .unwrap_or(Value::String(value)),
        _ => {
            if let Ok(bool_val) = value.parse::<bool>() {
                Value::Bool(bool_val)
            } else if let Ok(int_val) = value.parse::<u64>() {
                Value::Number(Number::from(int_val))
            } else {
                Value::String(value)
            }
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match target_map.get_mut(&key) {
                    Some(target_value) => merge_values(target_value, source_value),
                    None => {
                        target_map.insert(key, source_value);
                    }
                }
            }
        }
        (target, source) => {
            *target = source;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.api.products_url(), "http://localhost:3000/api/products");
        assert!(!config.form.strict_numbers);
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://shop.example.com/\"\ntimeout_ms = 1500\n\n[form]\nstrict_numbers = true"
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        manager.add_file_layer("test", file.path(), 0).unwrap();
        let config = manager.load().unwrap();

        assert_eq!(config.api.products_url(), "https://shop.example.com/api/products");
        assert_eq!(config.api.timeout_ms, 1500);
        assert!(config.form.strict_numbers);
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_yaml_layer() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "upload:\n  max_file_size: 2048\n  accept: image/png").unwrap();

        let mut manager = ConfigManager::new();
        manager.add_file_layer("test", file.path(), 0).unwrap();
        let config = manager.load().unwrap();

        assert_eq!(config.upload.max_file_size, 2048);
        assert!(config.upload.accepts("image/png"));
        assert!(!config.upload.accepts("image/jpeg"));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let mut manager = ConfigManager::new();
        assert!(manager.add_file_layer("bad", "config.ini", 0).is_err());
    }

    #[test]
    fn test_memory_layer_has_highest_priority() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"api": {{"timeout_ms": 100}}}}"#).unwrap();

        let mut manager = ConfigManager::new();
        manager.add_memory_layer("cli", serde_json::json!({"api": {"timeout_ms": 900}}), 30);
        manager.add_file_layer("file", file.path(), 10).unwrap();

        assert_eq!(manager.layers()[0].name, "file");
        assert_eq!(manager.load().unwrap().api.timeout_ms, 900);
    }

    #[test]
    fn test_env_overrides_nest_on_double_underscore() {
        let vars = vec![
            ("PRODUCT_STUDIO_API__BASE_URL".to_string(), "https://api.test".to_string()),
            ("PRODUCT_STUDIO_FORM__STRICT_NUMBERS".to_string(), "true".to_string()),
            ("PRODUCT_STUDIO_UI__NOTIFICATION_TIMEOUT_MS".to_string(), "0".to_string()),
            ("UNRELATED".to_string(), "x".to_string()),
        ];
        let template = serde_json::to_value(AppConfig::default()).unwrap();

        let value = env_overrides(ENV_PREFIX, vars.into_iter(), &template);

        assert_eq!(value["api"]["base_url"], "https://api.test");
        assert_eq!(value["form"]["strict_numbers"], true);
        assert_eq!(value["ui"]["notification_timeout_ms"], 0);
        assert!(value.get("unrelated").is_none());
    }

    #[test]
    fn test_env_text_fields_stay_text() {
        let vars = vec![
            ("PRODUCT_STUDIO_UI__TITLE".to_string(), "2024".to_string()),
            ("PRODUCT_STUDIO_UPLOAD__ACCEPT".to_string(), "true".to_string()),
            ("PRODUCT_STUDIO_API__TIMEOUT_MS".to_string(), "2500".to_string()),
        ];
        let template = serde_json::to_value(AppConfig::default()).unwrap();

        let value = env_overrides(ENV_PREFIX, vars.into_iter(), &template);
        assert_eq!(value["ui"]["title"], "2024");
        assert_eq!(value["upload"]["accept"], "true");
        assert_eq!(value["api"]["timeout_ms"], 2500);

        let mut manager = ConfigManager::new();
        manager.add_memory_layer("env", value, 20);
        let config = manager.load().unwrap();
        assert_eq!(config.ui.title, "2024");
        assert_eq!(config.api.timeout_ms, 2500);
    }

    #[test]
    fn test_validation_reports_each_problem() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://nowhere".to_string();
        config.api.timeout_ms = 0;
        config.upload.accept = " ".to_string();

        let keys: Vec<String> = config.validate().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["api.base_url", "api.timeout_ms", "upload.accept"]);
    }

    #[test]
    fn test_load_validated_rejects_invalid() {
        let mut manager = ConfigManager::new();
        manager.add_memory_layer("cli", serde_json::json!({"upload": {"max_file_size": 0}}), 0);

        let error = manager.load_validated().unwrap_err();
        match error.kind {
            ErrorKind::Configuration { key, .. } => {
                assert_eq!(key.as_deref(), Some("upload.max_file_size"))
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_accept_wildcards() {
        let upload = UploadConfig::default();
        assert!(upload.accepts("image/png"));
        assert!(upload.accepts("IMAGE/webp"));
        assert!(!upload.accepts("application/pdf"));

        let any = UploadConfig {
            accept: "*/*".to_string(),
            ..UploadConfig::default()
        };
        assert!(any.accepts("application/pdf"));
        assert!(any.accepts("image/heif"));

        let listed = UploadConfig {
            accept: "image/png, application/pdf".to_string(),
            ..UploadConfig::default()
        };
        assert!(listed.accepts("application/pdf"));
        assert!(!listed.accepts("image/jpeg"));
    }
}
