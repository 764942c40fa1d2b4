//! Configuration management.
//!
//! Configuration is loaded with figment from (later sources override
//! earlier):
//! 1. Default values
//! 2. TOML config file (`skywatch.toml` unless another path is given)
//! 3. Environment variables prefixed with `SKYWATCH_`; nested keys are
//!    separated by a double underscore, e.g. `SKYWATCH_HTTP__ADDR`
//!
//! Command-line flags are applied on top by the binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "skywatch.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SKYWATCH_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// REST listener.
    pub http: HttpConfig,
    /// gRPC listener.
    pub grpc: GrpcConfig,
    /// HTTP-to-gRPC gateway listener.
    pub gateway: GatewayConfig,
    /// How long to wait for in-flight requests once shutdown starts.
    pub shutdown_timeout_secs: u64,
    /// Upper bound on one REST request or RPC.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcConfig {
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub enabled: bool,
    pub addr: String,
    /// gRPC endpoint the gateway forwards to.
    pub upstream: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            grpc: GrpcConfig::default(),
            gateway: GatewayConfig::default(),
            shutdown_timeout_secs: 10,
            request_timeout_secs: 10,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:50051".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "127.0.0.1:8081".to_string(),
            upstream: "http://127.0.0.1:50051".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let config: Config = Self::figment(&config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        parse_addr("http.addr", &self.http.addr)?;
        parse_addr("grpc.addr", &self.grpc.addr)?;

        if self.gateway.enabled {
            parse_addr("gateway.addr", &self.gateway.addr)?;
            let upstream = self.gateway.upstream.as_str();
            if !(upstream.starts_with("http://") || upstream.starts_with("https://")) {
                return Err(Error::config_validation(format!(
                    "gateway.upstream must be an http:// or https:// URI, got `{upstream}`"
                )));
            }
        }

        if self.shutdown_timeout_secs == 0 {
            return Err(Error::config_validation(
                "shutdown_timeout_secs must be greater than 0",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::config_validation(
                "request_timeout_secs must be greater than 0",
            ));
        }

        Ok(())
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        parse_addr("http.addr", &self.http.addr)
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr> {
        parse_addr("grpc.addr", &self.grpc.addr)
    }

    pub fn gateway_addr(&self) -> Result<SocketAddr> {
        parse_addr("gateway.addr", &self.gateway.addr)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_addr(key: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|_| Error::config_validation(format!("{key} is not a socket address: `{value}`")))
}
