//! Credential loading for the search API.
//!
//! The bearer token is the only hard requirement. It is read from the merged
//! configuration first and from the conventional `BEARER_TOKEN` variable second.
use crate::CredentialsConfig;
use pulse_common::{PulseError, Result};
use std::fmt;

/// Fallback variable consulted when the config carries no token.
pub const BEARER_TOKEN_ENV: &str = "BEARER_TOKEN";

#[derive(Clone)]
pub struct Credentials {
    bearer_token: String,
    api_key: Option<String>,
    api_key_secret: Option<String>,
}

impl Credentials {
    /// Resolve credentials or fail with [`PulseError::Configuration`].
    ///
    /// ```
    /// use pulse_config::{Credentials, CredentialsConfig};
    ///
    /// let cfg = CredentialsConfig {
    ///     bearer_token: Some("token-123".into()),
    ///     ..Default::default()
    /// };
    /// let creds = Credentials::load(&cfg).unwrap();
    /// assert_eq!(creds.bearer_token(), "token-123");
    /// assert!(!format!("{creds:?}").contains("token-123"));
    /// ```
    pub fn load(cfg: &CredentialsConfig) -> Result<Self> {
        let bearer_token = present(cfg.bearer_token.as_deref())
            .or_else(|| present(std::env::var(BEARER_TOKEN_ENV).ok().as_deref()))
            .ok_or_else(|| {
                PulseError::Configuration(format!(
                    "bearer token not set (credentials.bearer_token, PULSE__CREDENTIALS__BEARER_TOKEN or {BEARER_TOKEN_ENV})"
                ))
            })?;

        let api_key = present(cfg.api_key.as_deref());
        let api_key_secret = present(cfg.api_key_secret.as_deref());
        if cfg.require_api_key {
            if api_key.is_none() {
                return Err(PulseError::Configuration(
                    "credentials.api_key is required but not set".into(),
                ));
            }
            if api_key_secret.is_none() {
                return Err(PulseError::Configuration(
                    "credentials.api_key_secret is required but not set".into(),
                ));
            }
        }

        Ok(Self {
            bearer_token,
            api_key,
            api_key_secret,
        })
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn api_key(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.api_key_secret) {
            (Some(k), Some(s)) => Some((k, s)),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &"<redacted>")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_secret", &self.api_key_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Treat blanks and unexpanded `${VAR}` placeholders as absent.
fn present(raw: Option<&str>) -> Option<String> {
    let v = raw?.trim();
    if v.is_empty() || v.contains("${") {
        return None;
    }
    Some(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(token: Option<&str>) -> CredentialsConfig {
        CredentialsConfig {
            bearer_token: token.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        temp_env::with_var_unset(BEARER_TOKEN_ENV, || {
            let err = Credentials::load(&cfg(None)).unwrap_err();
            assert!(matches!(err, PulseError::Configuration(_)));
        });
    }

    #[test]
    fn unexpanded_placeholder_counts_as_missing() {
        temp_env::with_var_unset(BEARER_TOKEN_ENV, || {
            let err = Credentials::load(&cfg(Some("${TWITTER_BEARER_TOKEN}"))).unwrap_err();
            assert!(matches!(err, PulseError::Configuration(_)));
        });
    }

    #[test]
    fn falls_back_to_conventional_env_var() {
        temp_env::with_var(BEARER_TOKEN_ENV, Some("from-env"), || {
            let creds = Credentials::load(&cfg(Some("  "))).unwrap();
            assert_eq!(creds.bearer_token(), "from-env");
        });
    }

    #[test]
    fn config_value_beats_env_fallback() {
        temp_env::with_var(BEARER_TOKEN_ENV, Some("from-env"), || {
            let creds = Credentials::load(&cfg(Some("from-config"))).unwrap();
            assert_eq!(creds.bearer_token(), "from-config");
        });
    }

    #[test]
    fn required_api_key_pair_is_enforced() {
        let mut c = cfg(Some("tok"));
        c.require_api_key = true;
        c.api_key = Some("key".into());
        let err = Credentials::load(&c).unwrap_err();
        assert!(err.to_string().contains("api_key_secret"));

        c.api_key_secret = Some("secret".into());
        let creds = Credentials::load(&c).unwrap();
        assert_eq!(creds.api_key(), Some(("key", "secret")));
    }
}
