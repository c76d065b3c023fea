pub mod settings;

pub use settings::{DockerSettings, LogSettings, ServerSettings, Settings};
