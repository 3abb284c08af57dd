use std::env;

use thiserror::Error;

use crate::auth::adapter::outgoing::jwt::JwtConfig;

const MIN_JWT_SECRET_LEN: usize = 32;
const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 86_400;
const DEFAULT_ISSUER: &str = "review_hub";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpSettings {
    /// Authenticated TLS relay.
    Relay {
        server: String,
        username: String,
        password: String,
    },
    /// Plain local relay (Mailpit, MailHog).
    Local { host: String, port: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBackend {
    Console,
    Smtp(SmtpSettings),
}

/// Everything the binary reads from the environment, validated up front.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub email_from: String,
    pub email_backend: EmailBackend,
    pub single_use_codes: bool,
}

impl AppConfig {
    /// Loads `.env.{RUST_ENV}` (falling back to `.env`) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        if dotenvy::from_filename(format!(".env.{environment}")).is_err() {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let environment = var("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let is_production = environment == "production";

        let secret_key = required("JWT_SECRET")?;
        if secret_key.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {MIN_JWT_SECRET_LEN} characters"),
            });
        }

        let access_token_expiry = match var("JWT_ACCESS_EXPIRY") {
            Some(raw) => parse_positive(&raw, "JWT_ACCESS_EXPIRY")?,
            None => DEFAULT_ACCESS_EXPIRY_SECS,
        };

        let email_backend = match var("EMAIL_BACKEND").as_deref() {
            Some("console") => EmailBackend::Console,
            Some("smtp") => EmailBackend::Smtp(smtp_settings(&var)?),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "EMAIL_BACKEND",
                    reason: format!("expected `smtp` or `console`, got `{other}`"),
                })
            }
            None if is_production => EmailBackend::Smtp(smtp_settings(&var)?),
            None => EmailBackend::Console,
        };

        let single_use_codes = match var("CONFIRMATION_CODE_SINGLE_USE") {
            Some(raw) => parse_bool(&raw, "CONFIRMATION_CODE_SINGLE_USE")?,
            None => true,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: required("HOST")?,
            port: parse_port(&required("PORT")?, "PORT")?,
            jwt: JwtConfig {
                secret_key,
                issuer: var("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
                access_token_expiry,
            },
            email_from: required("EMAIL_FROM")?,
            email_backend,
            single_use_codes,
            environment,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn smtp_settings(
    var: &impl Fn(&'static str) -> Option<String>,
) -> Result<SmtpSettings, ConfigError> {
    if let Some(server) = var("SMTP_SERVER") {
        return Ok(SmtpSettings::Relay {
            server,
            username: var("SMTP_USERNAME").ok_or(ConfigError::Missing("SMTP_USERNAME"))?,
            password: var("SMTP_PASSWORD").ok_or(ConfigError::Missing("SMTP_PASSWORD"))?,
        });
    }

    let port = match var("SMTP_PORT") {
        Some(raw) => parse_port(&raw, "SMTP_PORT")?,
        None => 1025,
    };
    Ok(SmtpSettings::Local {
        host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
        port,
    })
}

fn parse_port(raw: &str, key: &'static str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("`{raw}` is not a port number"),
    })
}

fn parse_positive(raw: &str, key: &'static str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("`{raw}` is not a positive number of seconds"),
        }),
    }
}

fn parse_bool(raw: &str, key: &'static str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("`{raw}` is not a boolean"),
        }),
    }
}
