use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use validator::Validate;

/// Environment variable prefix, e.g. `IMAGES_MCP_SERVER__PORT=5001`
pub const ENV_PREFIX: &str = "IMAGES_MCP";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_timeouts", skip_on_field_errors = false))]
pub struct Settings {
    #[validate]
    pub server: ServerSettings,
    #[validate]
    pub docker: DockerSettings,
    #[validate]
    pub log: LogSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ServerSettings {
    #[validate(custom = "validate_ip_addr")]
    pub bind_address: String,
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,
    #[validate(range(min = 1))]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct DockerSettings {
    /// Socket path or `unix://` / `tcp://` URL; `DOCKER_HOST` when unset
    pub host: Option<String>,
    /// Pins the engine API version, e.g. `1.43`
    pub api_version: Option<String>,
    #[validate(range(min = 1))]
    pub timeout_seconds: u64,
    /// Serve a canned inventory instead of talking to an engine
    pub mock: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct LogSettings {
    #[validate(custom = "validate_log_level")]
    pub level: String,
}

impl Settings {
    /// Load settings from built-in defaults, `config/default`, an optional
    /// explicit file, `config/local` and finally the environment.
    pub fn load(config_file: Option<&str>) -> Result<Self, config::ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let mut builder = config::Config::builder()
            .set_default("server.bind_address", "0.0.0.0")?
            .set_default("server.port", 12029)?
            .set_default("server.request_timeout_seconds", 10)?
            .set_default("docker.timeout_seconds", 5)?
            .set_default("docker.mock", false)?
            .set_default("log.level", "info")?
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.server.validate()?;
        self.docker.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        match self.bind_address.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.port),
            _ => format!("{}:{}", self.bind_address, self.port),
        }
    }
}

fn validate_ip_addr(addr: &str) -> Result<(), validator::ValidationError> {
    addr.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_bind_address"))
}

/// The engine call timeout must be strictly below the request timeout.
fn validate_timeouts(settings: &Settings) -> Result<(), validator::ValidationError> {
    if settings.docker.timeout_seconds < settings.server.request_timeout_seconds {
        Ok(())
    } else {
        Err(validator::ValidationError::new("engine_timeout_not_below_request_timeout"))
    }
}

fn validate_log_level(level: &str) -> Result<(), validator::ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_log_level"))
    }
}
