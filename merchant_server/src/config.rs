use std::env;

use log::*;
use merchant_common::{helpers::parse_boolean_flag, Secret};

const DEFAULT_MCS_HOST: &str = "127.0.0.1";
const DEFAULT_MCS_PORT: u16 = 8380;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/merchant_console.db";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 25;
pub const DEFAULT_USER_ID_HEADER: &str = "x-merchant-user-id";
pub const DEFAULT_IDENTITY_SIGNATURE_HEADER: &str = "x-merchant-identity-signature";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_db_connections: u32,
    /// If true, the embedded migrations are run against the database before the server starts accepting requests.
    pub auto_migrate: bool,
    pub identity: IdentityConfig,
}

/// How the signed-in user is identified.
///
/// The authentication provider in front of the server forwards the user id in `user_header`, and signs it with the
/// shared `secret`. The signature (base64 HMAC-SHA256 of the user id) travels in `signature_header`.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub user_header: String,
    pub signature_header: String,
    pub secret: Secret<String>,
    /// If false, the user id header is trusted as is. **DANGER**: only do this behind a proxy that strips the header
    /// from client requests.
    pub checks: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_header: DEFAULT_USER_ID_HEADER.to_string(),
            signature_header: DEFAULT_IDENTITY_SIGNATURE_HEADER.to_string(),
            secret: Secret::default(),
            checks: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MCS_HOST.to_string(),
            port: DEFAULT_MCS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_db_connections: DEFAULT_MAX_DB_CONNECTIONS,
            auto_migrate: true,
            identity: IdentityConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MCS_HOST").ok().unwrap_or_else(|| DEFAULT_MCS_HOST.into());
        let port = env::var("MCS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MCS_PORT. {e} Using the default, {DEFAULT_MCS_PORT}, instead."
                    );
                    DEFAULT_MCS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MCS_PORT);
        let database_url = env::var("MCS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ MCS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_db_connections = env::var("MCS_MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for MCS_MAX_DB_CONNECTIONS. {e}"))
                    .ok()
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_DB_CONNECTIONS);
        let auto_migrate = parse_boolean_flag(env::var("MCS_AUTO_MIGRATE").ok(), true);
        let identity = IdentityConfig::from_env_or_default();
        Self { host, port, database_url, max_db_connections, auto_migrate, identity }
    }
}

impl IdentityConfig {
    pub fn from_env_or_default() -> Self {
        let user_header = env::var("MCS_USER_ID_HEADER").ok().unwrap_or_else(|| DEFAULT_USER_ID_HEADER.into());
        let signature_header =
            env::var("MCS_IDENTITY_SIGNATURE_HEADER").ok().unwrap_or_else(|| DEFAULT_IDENTITY_SIGNATURE_HEADER.into());
        let checks = parse_boolean_flag(env::var("MCS_IDENTITY_CHECKS").ok(), true);
        let secret = Secret::new(env::var("MCS_IDENTITY_SECRET").ok().unwrap_or_default());
        match (checks, secret.is_empty()) {
            (true, true) => error!(
                "🪛️ MCS_IDENTITY_SECRET is not set. No identity signature can be verified, so every request will be \
                 treated as anonymous and all writes will be rejected."
            ),
            (false, _) => warn!(
                "🚨️ Identity signature checks are disabled. The {user_header} header will be trusted without \
                 verification. Do not run like this unless a proxy strips that header from client requests. 🚨️"
            ),
            (true, false) => info!("🪛️ Identity signatures will be verified using the {signature_header} header"),
        }
        Self { user_header, signature_header, secret, checks }
    }
}
