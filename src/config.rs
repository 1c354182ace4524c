//! Runtime configuration read from `STOREFRONT_*` environment variables.

use chrono::Duration;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 24 * 60;
pub const DEFAULT_RESET_TTL_MINUTES: i64 = 30;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub bind_addr: String,
    /// `None` means a random secret is generated at startup.
    pub jwt_secret: Option<Secret>,
    pub token_ttl: Duration,
    pub reset_ttl: Duration,
    pub channel_capacity: usize,
    pub seed_file: Option<PathBuf>,
    pub admin: Option<AdminSeed>,
}

/// Account created at startup with the admin role.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: Secret,
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            jwt_secret: None,
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            reset_ttl: Duration::minutes(DEFAULT_RESET_TTL_MINUTES),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            seed_file: None,
            admin: None,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Absent or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vars = Vars(lookup);
        let admin = match (
            vars.string("STOREFRONT_ADMIN_USERNAME"),
            vars.string("STOREFRONT_ADMIN_EMAIL"),
            vars.string("STOREFRONT_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminSeed {
                username,
                email,
                password: Secret::new(password),
            }),
            _ => None,
        };
        Self {
            bind_addr: vars
                .string("STOREFRONT_BIND")
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            jwt_secret: vars.string("STOREFRONT_JWT_SECRET").map(Secret::new),
            token_ttl: vars.minutes("STOREFRONT_TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES),
            reset_ttl: vars.minutes("STOREFRONT_RESET_TTL_MINUTES", DEFAULT_RESET_TTL_MINUTES),
            channel_capacity: vars
                .parsed("STOREFRONT_CHANNEL_CAPACITY")
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            seed_file: vars.string("STOREFRONT_SEED_FILE").map(PathBuf::from),
            admin,
        }
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Trimmed value; blank counts as unset.
    fn string(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.string(name).and_then(|v| v.parse::<T>().ok())
    }

    /// Positive minutes that fit in a `Duration`, else the default.
    fn minutes(&self, name: &str, default: i64) -> Duration {
        self.parsed::<i64>(name)
            .filter(|minutes| *minutes > 0)
            .and_then(Duration::try_minutes)
            .unwrap_or_else(|| Duration::minutes(default))
    }
}
