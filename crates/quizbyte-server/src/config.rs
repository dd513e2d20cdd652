//! Transport/HTTP configuration for the `quizbyte-server` binary.
//!
//! Deliberately a separate struct from [`quizbyte_core::CoreConfig`],
//! mirroring `reflex::config::Config`'s own split between transport
//! settings (bind address, storage path, model paths) and the cache/model
//! tunables owned by the library crate: the server owns HTTP/DB/auth
//! settings, the core owns cache and LLM behavior.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("failed to parse '{name}' = '{value}': {source}")]
    ParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("missing required environment variable '{0}'")]
    MissingRequired(&'static str),
}

/// Server-side configuration: how to listen, and where the backing
/// Postgres/Redis instances and JWT secret live.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    /// Chat-completion model id passed to `genai::Client` for the LLM
    /// Evaluator and Batch Generator.
    pub llm_model: String,
}

impl ServerConfig {
    const ENV_BIND_ADDR: &'static str = "QUIZBYTE_BIND_ADDR";
    const ENV_PORT: &'static str = "QUIZBYTE_PORT";
    const ENV_DATABASE_URL: &'static str = "DATABASE_URL";
    const ENV_REDIS_URL: &'static str = "REDIS_URL";
    const ENV_JWT_SECRET: &'static str = "QUIZBYTE_JWT_SECRET";
    const ENV_LLM_MODEL: &'static str = "QUIZBYTE_LLM_MODEL";

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Loads configuration from the environment. `DATABASE_URL` and
    /// `QUIZBYTE_JWT_SECRET` are required; everything else has a documented
    /// default suitable for local development.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        let bind_addr = match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ServerConfigError::ParseError {
                    name: Self::ENV_BIND_ADDR,
                    value,
                    source: e,
                })?,
            Err(_) => IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
        };

        let port = env::var(Self::ENV_PORT)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let database_url = env::var(Self::ENV_DATABASE_URL)
            .map_err(|_| ServerConfigError::MissingRequired(Self::ENV_DATABASE_URL))?;

        let redis_url = env::var(Self::ENV_REDIS_URL)
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let jwt_secret = env::var(Self::ENV_JWT_SECRET)
            .map_err(|_| ServerConfigError::MissingRequired(Self::ENV_JWT_SECRET))?;

        let llm_model =
            env::var(Self::ENV_LLM_MODEL).unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Self {
            bind_addr,
            port,
            database_url,
            redis_url,
            jwt_secret,
            llm_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_addr_combines_bind_and_port() {
        let config = ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 9090,
            database_url: "postgres://localhost/quizbyte".to_string(),
            redis_url: "redis://localhost".to_string(),
            jwt_secret: "secret".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
    }
}
