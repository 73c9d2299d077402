//! Loader for Pulse run configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, an optional YAML file,
//! `PULSE__SECTION__KEY` environment variables, then explicit overrides (CLI flags).
//! String values may reference the environment as `${VAR}`; expansion runs before
//! overrides are applied so flag values are taken literally.
use config::{Config, Environment, File};
use pulse_common::observability::LogFormat;
use pulse_common::{EmptyOutputPolicy, PulseError};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod credentials;

pub use credentials::Credentials;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Remote ceiling on posts per search request.
pub const MAX_RESULTS_PER_REQUEST: u32 = 100;
/// Remote floor on posts per search request.
pub const MIN_RESULTS_PER_REQUEST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for PulseError {
    fn from(e: ConfigError) -> Self {
        PulseError::Configuration(e.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub credentials: CredentialsConfig,
    pub search: SearchConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub bearer_token: Option<String>,
    pub api_key: Option<String>,
    pub api_key_secret: Option<String>,
    /// Treat `api_key` and `api_key_secret` as mandatory.
    pub require_api_key: bool,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |v: &Option<String>| if v.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_struct("CredentialsConfig")
            .field("bearer_token", &mark(&self.bearer_token))
            .field("api_key", &mark(&self.api_key))
            .field("api_key_secret", &mark(&self.api_key_secret))
            .field("require_api_key", &self.require_api_key)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub query: String,
    /// Total cap on collected posts across all pages.
    pub limit: usize,
    pub page_size: u32,
    /// Fixed pause between successive page requests.
    pub page_pause_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: r#"#MyCampaignName OR "product review" lang:en -is:retweet -is:reply"#.into(),
            limit: 5000,
            page_size: MAX_RESULTS_PER_REQUEST,
            page_pause_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    /// Longest rate-limit reset the transport will sleep through before giving up.
    pub max_rate_limit_wait_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com".into(),
            timeout_secs: 15,
            max_retries: 2,
            max_rate_limit_wait_secs: 900,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub on_empty: EmptyOutputPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("campaign_sentiment_data.csv"),
            on_empty: EmptyOutputPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub emit_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            dir: None,
            emit_stderr: true,
        }
    }
}

impl PulseConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.query.trim().is_empty() {
            return Err(ConfigError::Invalid("search.query must not be empty".into()));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Invalid("search.limit must be positive".into()));
        }
        if !(MIN_RESULTS_PER_REQUEST..=MAX_RESULTS_PER_REQUEST).contains(&self.search.page_size) {
            return Err(ConfigError::Invalid(format!(
                "search.page_size must be within {MIN_RESULTS_PER_REQUEST}..={MAX_RESULTS_PER_REQUEST}, got {}",
                self.search.page_size
            )));
        }
        url::Url::parse(&self.http.base_url).map_err(|e| {
            ConfigError::Invalid(format!("http.base_url {:?}: {e}", self.http.base_url))
        })?;
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.path must not be empty".into()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Write `value` at a dotted `path`, creating intermediate objects.
fn set_path(root: &mut Value, path: &str, value: Value) {
    let mut cur = root;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        if !cur.is_object() {
            *cur = Value::Object(Default::default());
        }
        let Some(map) = cur.as_object_mut() else {
            return;
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return;
        }
        cur = map
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct PulseConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    overrides: Vec<(String, Value)>,
}

impl Default for PulseConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseConfigLoader {
    /// Start from built-in defaults. `PULSE__` env overrides are layered on at [`load`](Self::load).
    ///
    /// ```
    /// use pulse_config::PulseConfigLoader;
    ///
    /// let cfg = PulseConfigLoader::new()
    ///     .with_yaml_str("search:\n  limit: 250")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.search.limit, 250);
    /// assert_eq!(cfg.search.page_size, 100);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            overrides: Vec::new(),
        }
    }

    /// Attach a config file that must exist; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that is read only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Set a dotted key (e.g. `search.limit`) with the highest precedence.
    ///
    /// ```
    /// use pulse_config::PulseConfigLoader;
    ///
    /// let cfg = PulseConfigLoader::new()
    ///     .with_yaml_str("search:\n  query: from-file")
    ///     .with_override("search.query", "from-flag")
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(cfg.search.query, "from-flag");
    /// ```
    pub fn with_override(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, apply overrides, and validate.
    pub fn load(self) -> Result<PulseConfig, ConfigError> {
        // Env goes last so it beats every file source.
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("PULSE").separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);
        for (key, value) in self.overrides {
            set_path(&mut v, &key, value);
        }

        // Env values arrive as strings; config's deserializer coerces them per field.
        let typed: PulseConfig = Config::try_from(&v)?.try_deserialize()?;
        typed.validate()?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("PULSE_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${PULSE_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_sections() {
        temp_env::with_vars(
            [("PULSE_TEST_TOKEN", Some("abc")), ("PULSE_TEST_DIR", Some("/tmp/out"))],
            || {
                let mut v = json!({
                    "credentials": { "bearer_token": "${PULSE_TEST_TOKEN}" },
                    "output": { "path": "${PULSE_TEST_DIR}/run.csv" },
                    "search": { "limit": 10 }
                });
                expand_env_in_value(&mut v);
                assert_eq!(v["credentials"]["bearer_token"], json!("abc"));
                assert_eq!(v["output"]["path"], json!("/tmp/out/run.csv"));
                assert_eq!(v["search"]["limit"], json!(10));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars(
            [("PULSE_CYCLE_A", Some("${PULSE_CYCLE_B}")), ("PULSE_CYCLE_B", Some("${PULSE_CYCLE_A}"))],
            || {
                let mut v = json!("x=${PULSE_CYCLE_A}-y");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x=") && s.ends_with("-y"));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${PULSE_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${PULSE_DOES_NOT_EXIST}"));
    }

    #[test]
    fn set_path_creates_intermediate_objects() {
        let mut v = json!({ "search": { "limit": 5 } });
        set_path(&mut v, "search.query", json!("shoes"));
        set_path(&mut v, "output.path", json!("x.csv"));
        assert_eq!(v, json!({
            "search": { "limit": 5, "query": "shoes" },
            "output": { "path": "x.csv" }
        }));
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = PulseConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.search.limit, 5000);
        assert_eq!(cfg.search.page_pause_ms, 3000);
        assert_eq!(cfg.output.on_empty, EmptyOutputPolicy::Skip);
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let mut cfg = PulseConfig::default();
        cfg.search.page_size = 101;
        assert!(cfg.validate().is_err());
        cfg.search.page_size = 9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_query_and_zero_limit() {
        let mut cfg = PulseConfig::default();
        cfg.search.query = "   ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = PulseConfig::default();
        cfg.search.limit = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn debug_output_never_shows_secrets() {
        let c = CredentialsConfig {
            bearer_token: Some("super-secret".into()),
            ..Default::default()
        };
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
