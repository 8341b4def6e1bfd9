//! Configuration loading.
//!
//! Settings come from a single YAML document with two top-level sections:
//! `services` (one sub-section per named service, keys preserved as raw
//! values) and `logging` (typed, fully defaulted). A fixed set of
//! environment variables can override individual fields; the override step
//! runs once, immediately after the file is parsed, as a pure function of
//! the parsed document and a captured environment snapshot.

use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// Filename probed when no explicit configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file resolvable.
    #[error("Configuration file not found (searched {searched:?})")]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The requested service section is absent from the document.
    #[error("Configuration for service '{0}' not found")]
    ServiceNotConfigured(String),

    /// The section exists but does not deserialize into the requested shape.
    #[error("Invalid configuration for service '{name}': {source}")]
    InvalidService {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Environment variables overriding service fields: (variable, section, field).
const SERVICE_OVERRIDES: &[(&str, &str, &str)] = &[
    ("AZURE_OPENAI_ENDPOINT", "azure_openai", "endpoint"),
    ("AZURE_OPENAI_API_KEY", "azure_openai", "api_key"),
    ("AZURE_OPENAI_DEPLOYMENT_NAME", "azure_openai", "deployment_name"),
    ("AZURE_OPENAI_API_VERSION", "azure_openai", "api_version"),
    ("CHROMADB_PERSIST_DIRECTORY", "chromadb", "persist_directory"),
    ("CHROMADB_COLLECTION_NAME", "chromadb", "collection_name"),
    ("NEO4J_URI", "neo4j", "uri"),
    ("NEO4J_USERNAME", "neo4j", "username"),
    ("NEO4J_PASSWORD", "neo4j", "password"),
];

/// Environment variables overriding logging fields: (variable, field).
const LOGGING_OVERRIDES: &[(&str, &str)] =
    &[("LOGGING_LEVEL", "level"), ("LOGGING_FORMAT", "format")];

/// A snapshot of the override environment variables.
///
/// Captured before loading so the override step never reads the process
/// environment itself. Tests build snapshots with [`EnvOverrides::from_pairs`]
/// instead of mutating environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    vars: HashMap<String, String>,
}

impl EnvOverrides {
    /// Capture the override variables currently set in the process environment.
    pub fn from_env() -> Self {
        let vars = SERVICE_OVERRIDES
            .iter()
            .map(|(var, _, _)| *var)
            .chain(LOGGING_OVERRIDES.iter().map(|(var, _)| *var))
            .filter_map(|var| env::var(var).ok().map(|value| (var.to_string(), value)))
            .collect();
        Self { vars }
    }

    /// Build a snapshot from explicit variable/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn get(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }
}

/// The loaded configuration document.
///
/// Load it once at startup and share it as an `Arc`; every component then
/// observes the same settings for the process lifetime.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    /// Raw per-service configuration sections, keyed by service name.
    #[serde(default)]
    pub services: HashMap<String, Value>,

    /// Logging configuration. Every field defaults, so an absent section is
    /// never an error.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from `path`, or probe the default locations.
    ///
    /// Without an explicit path, `config.yaml` is looked up in the current
    /// working directory and then next to the running executable. Overrides
    /// are taken from the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_overrides(path, &EnvOverrides::from_env())
    }

    /// Load settings applying an explicit override snapshot.
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: &EnvOverrides,
    ) -> ConfigResult<Self> {
        let file = resolve_config_file(path)?;
        debug!(path = %file.display(), "loading configuration");
        let contents = fs::read_to_string(&file).map_err(|source| ConfigError::Io {
            path: file.clone(),
            source,
        })?;
        Self::from_yaml(&contents, overrides)
    }

    /// Parse settings from a YAML document and apply an override snapshot.
    pub fn from_yaml(contents: &str, overrides: &EnvOverrides) -> ConfigResult<Self> {
        let mut settings: Settings = serde_yaml::from_str(contents)?;
        settings.apply_overrides(overrides);
        Ok(settings)
    }

    /// Deserialize the configuration section for service `name`.
    pub fn service<T: DeserializeOwned>(&self, name: &str) -> ConfigResult<T> {
        let value = self.service_value(name)?;
        serde_yaml::from_value(value.clone()).map_err(|source| ConfigError::InvalidService {
            name: name.to_string(),
            source,
        })
    }

    /// Raw configuration section for service `name`.
    pub fn service_value(&self, name: &str) -> ConfigResult<&Value> {
        self.services
            .get(name)
            .ok_or_else(|| ConfigError::ServiceNotConfigured(name.to_string()))
    }

    /// Overwrite fields named in the override tables with snapshot values.
    ///
    /// The standard service sections are materialized even when the file
    /// never mentions them, so an override can land in a minimal document.
    fn apply_overrides(&mut self, overrides: &EnvOverrides) {
        for (var, section, field) in SERVICE_OVERRIDES {
            let entry = self
                .services
                .entry((*section).to_string())
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if let Some(value) = overrides.get(var) {
                if let Value::Mapping(map) = entry {
                    map.insert(
                        Value::String((*field).to_string()),
                        Value::String(value.to_string()),
                    );
                    debug!(variable = var, "applied environment override");
                }
            }
        }

        for (var, field) in LOGGING_OVERRIDES {
            if let Some(value) = overrides.get(var) {
                match *field {
                    "level" => self.logging.level = value.to_string(),
                    "format" => self.logging.format = value.to_string(),
                    _ => {}
                }
                debug!(variable = var, "applied environment override");
            }
        }
    }
}

fn resolve_config_file(path: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(path) = path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::NotFound {
            searched: vec![path.to_path_buf()],
        });
    }

    let mut searched = Vec::new();

    let cwd_candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
    if cwd_candidate.exists() {
        return Ok(cwd_candidate);
    }
    searched.push(cwd_candidate);

    let exe_dir = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(dir) = exe_dir {
        let exe_candidate = dir.join(DEFAULT_CONFIG_FILE);
        if exe_candidate.exists() {
            return Ok(exe_candidate);
        }
        searched.push(exe_candidate);
    }

    Err(ConfigError::NotFound { searched })
}

/// `services.azure_openai` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AzureOpenAiSettings {
    /// Azure OpenAI resource endpoint, e.g. `https://myresource.openai.azure.com`.
    pub endpoint: Option<String>,

    pub api_key: Option<SecretString>,

    /// Deployment completions and embeddings are routed through.
    pub deployment_name: Option<String>,

    /// API version; the service falls back to its own default when unset.
    pub api_version: Option<String>,

    /// Per-request timeout. Unset waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

/// `services.chromadb` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChromaDbSettings {
    pub persist_directory: Option<String>,
    pub collection_name: Option<String>,
}

/// `services.neo4j` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Neo4jSettings {
    pub uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// `logging` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter, e.g. `info` or `yagura_core=debug,info`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output style: `full`, `compact`, `pretty`, or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Enabled handlers.
    #[serde(default = "default_log_handlers")]
    pub handlers: Vec<LogHandler>,

    /// File handler parameters, consulted when `handlers` contains `file`.
    #[serde(default)]
    pub file: FileLogSettings,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            handlers: default_log_handlers(),
            file: FileLogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogHandler {
    Console,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileLogSettings {
    /// Directory rotated log files are written to.
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Base filename; rotation appends the date.
    #[serde(default = "default_log_filename")]
    pub filename: String,

    /// Number of rotated files kept.
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

impl Default for FileLogSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            filename: default_log_filename(),
            max_files: default_log_max_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "full".to_string()
}
fn default_log_handlers() -> Vec<LogHandler> {
    vec![LogHandler::Console]
}
fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}
fn default_log_filename() -> String {
    "app.log".to_string()
}
fn default_log_max_files() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    #[test]
    fn loads_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(
            &path,
            "services:\n  azure_openai:\n    endpoint: \"http://file\"\n",
        )
        .unwrap();

        let settings =
            Settings::load_with_overrides(Some(&path), &EnvOverrides::default()).unwrap();
        let azure: AzureOpenAiSettings = settings.service("azure_openai").unwrap();
        assert_eq!(azure.endpoint.as_deref(), Some("http://file"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Settings::load_with_overrides(
            Some(Path::new("/nonexistent/config.yaml")),
            &EnvOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn environment_overrides_file_value() {
        let yaml = "services:\n  azure_openai:\n    endpoint: \"http://file\"\n";
        let overrides = EnvOverrides::from_pairs([("AZURE_OPENAI_ENDPOINT", "http://env")]);

        let settings = Settings::from_yaml(yaml, &overrides).unwrap();
        let azure: AzureOpenAiSettings = settings.service("azure_openai").unwrap();
        assert_eq!(azure.endpoint.as_deref(), Some("http://env"));
    }

    #[test]
    fn absent_variable_preserves_file_value() {
        let yaml = "services:\n  azure_openai:\n    endpoint: \"http://file\"\n";

        let settings = Settings::from_yaml(yaml, &EnvOverrides::default()).unwrap();
        let azure: AzureOpenAiSettings = settings.service("azure_openai").unwrap();
        assert_eq!(azure.endpoint.as_deref(), Some("http://file"));
    }

    #[test]
    fn override_lands_in_absent_section() {
        let overrides = EnvOverrides::from_pairs([
            ("NEO4J_URI", "bolt://env:7687"),
            ("LOGGING_LEVEL", "debug"),
        ]);

        let settings = Settings::from_yaml("services: {}\n", &overrides).unwrap();
        let neo4j: Neo4jSettings = settings.service("neo4j").unwrap();
        assert_eq!(neo4j.uri.as_deref(), Some("bolt://env:7687"));
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn standard_sections_are_materialized() {
        let settings = Settings::from_yaml("services: {}\n", &EnvOverrides::default()).unwrap();
        assert!(settings.service_value("azure_openai").is_ok());
        assert!(settings.service_value("chromadb").is_ok());
        assert!(settings.service_value("neo4j").is_ok());
    }

    #[test]
    fn unknown_section_is_not_configured() {
        let settings = Settings::from_yaml("services: {}\n", &EnvOverrides::default()).unwrap();
        let err = settings.service_value("minio").unwrap_err();
        assert!(matches!(err, ConfigError::ServiceNotConfigured(name) if name == "minio"));
    }

    #[test]
    fn absent_logging_section_defaults() {
        let settings = Settings::from_yaml("services: {}\n", &EnvOverrides::default()).unwrap();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "full");
        assert_eq!(settings.logging.handlers, vec![LogHandler::Console]);
        assert_eq!(settings.logging.file.filename, "app.log");
        assert_eq!(settings.logging.file.max_files, 5);
    }

    #[test]
    fn typed_section_access() {
        let yaml = r#"
services:
  chromadb:
    persist_directory: "./chroma"
    collection_name: "documents"
  azure_openai:
    endpoint: "http://file"
    api_key: "file-key"
    deployment_name: "deploy"
    request_timeout_secs: 30
"#;
        let settings = Settings::from_yaml(yaml, &EnvOverrides::default()).unwrap();

        let chromadb: ChromaDbSettings = settings.service("chromadb").unwrap();
        assert_eq!(chromadb.persist_directory.as_deref(), Some("./chroma"));
        assert_eq!(chromadb.collection_name.as_deref(), Some("documents"));

        let azure: AzureOpenAiSettings = settings.service("azure_openai").unwrap();
        assert_eq!(azure.api_key.unwrap().expose_secret(), "file-key");
        assert_eq!(azure.request_timeout_secs, Some(30));
        assert_eq!(azure.api_version, None);
    }

    #[test]
    fn malformed_section_is_invalid() {
        let yaml = "services:\n  azure_openai:\n    request_timeout_secs: \"soon\"\n";
        let settings = Settings::from_yaml(yaml, &EnvOverrides::default()).unwrap();
        let err = settings
            .service::<AzureOpenAiSettings>("azure_openai")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidService { .. }));
    }

    #[test]
    fn logging_file_handler_settings() {
        let yaml = r#"
logging:
  level: "warn"
  format: "json"
  handlers: ["console", "file"]
  file:
    directory: "/var/log/yagura"
    filename: "server.log"
    max_files: 9
"#;
        let settings = Settings::from_yaml(yaml, &EnvOverrides::default()).unwrap();
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, "json");
        assert_eq!(
            settings.logging.handlers,
            vec![LogHandler::Console, LogHandler::File]
        );
        assert_eq!(
            settings.logging.file.directory,
            PathBuf::from("/var/log/yagura")
        );
        assert_eq!(settings.logging.file.filename, "server.log");
        assert_eq!(settings.logging.file.max_files, 9);
    }
}
