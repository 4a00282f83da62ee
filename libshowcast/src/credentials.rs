//! API credentials, read from the environment.
//!
//! The variable names match the ones the hosting environment already
//! exports for this account. All four OAuth 1.0a values are required;
//! `BEARER_TOKEN` is accepted but not used for posting.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Result};

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_API_KEY_SECRET: &str = "API_KEY_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";

/// OAuth 1.0a user-context credential set.
///
/// The key and token are identifiers and travel in request headers; the
/// secrets only ever feed the signing key and are kept behind
/// [`SecretString`] so they are redacted from debug output.
#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub consumer_key: String,
    consumer_secret: SecretString,
    pub access_token: String,
    access_token_secret: SecretString,
}

impl TwitterCredentials {
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            consumer_key,
            consumer_secret: SecretString::from(consumer_secret),
            access_token,
            access_token_secret: SecretString::from(access_token_secret),
        }
    }

    /// Read the credential set from the environment.
    ///
    /// Each missing or empty variable is a fatal configuration error that
    /// names the variable, so a misconfigured deployment fails before the
    /// posting loop starts.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            required_env(ENV_API_KEY)?,
            required_env(ENV_API_KEY_SECRET)?,
            required_env(ENV_ACCESS_TOKEN)?,
            required_env(ENV_ACCESS_TOKEN_SECRET)?,
        ))
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    pub(crate) fn access_token_secret(&self) -> &str {
        self.access_token_secret.expose_secret()
    }
}

fn required_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_all_env() {
        std::env::set_var(ENV_API_KEY, "ck");
        std::env::set_var(ENV_API_KEY_SECRET, "cs");
        std::env::set_var(ENV_ACCESS_TOKEN, "at");
        std::env::set_var(ENV_ACCESS_TOKEN_SECRET, "as");
    }

    #[test]
    #[serial]
    fn test_from_env_complete() {
        set_all_env();

        let credentials = TwitterCredentials::from_env().expect("credentials");
        assert_eq!(credentials.consumer_key, "ck");
        assert_eq!(credentials.consumer_secret(), "cs");
        assert_eq!(credentials.access_token, "at");
        assert_eq!(credentials.access_token_secret(), "as");
    }

    #[test]
    #[serial]
    fn test_missing_variable_names_it() {
        set_all_env();
        std::env::remove_var(ENV_ACCESS_TOKEN);

        let error = TwitterCredentials::from_env().unwrap_err();
        assert!(error.to_string().contains("ACCESS_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_empty_variable_rejected() {
        set_all_env();
        std::env::set_var(ENV_API_KEY_SECRET, "   ");

        let error = TwitterCredentials::from_env().unwrap_err();
        assert!(error.to_string().contains("API_KEY_SECRET"));
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let credentials = TwitterCredentials::new(
            "key".to_string(),
            "hunter2".to_string(),
            "token".to_string(),
            "hunter3".to_string(),
        );
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("hunter3"));
    }
}
