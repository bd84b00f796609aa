use serde::Deserialize;
use tracing::metadata::LevelFilter;
use tracing_appender::rolling::Rotation;

/// `telemetry` section of the helpdesk configuration.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enable: bool,
    /// Level for targets no directive mentions.
    pub level: LoggingLevel,
    /// Extra directives, e.g. `sea_orm=warn,helpdesk_server=debug`.
    pub directives: String,
    /// Variable whose directives override the configured ones.
    pub directives_env: String,
    pub console: ConsoleConfig,
    pub file: Option<FileConfig>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: true,
            level: LoggingLevel::default(),
            directives: String::new(),
            directives_env: "RUST_LOG".to_string(),
            console: ConsoleConfig::default(),
            file: None,
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(val: LoggingLevel) -> Self {
        match val {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enable: bool,
    /// Adds file, line, thread and target to every event.
    pub verbose: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enable: true, verbose: false }
    }
}

/// Plain-text log files next to the console output.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FileConfig {
    pub directory: String,
    /// File name, or the prefix of rolled files.
    pub prefix: String,
    pub rotation: RotationLevel,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            prefix: "helpdesk.log".to_string(),
            rotation: RotationLevel::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationLevel {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl From<RotationLevel> for Rotation {
    fn from(val: RotationLevel) -> Self {
        match val {
            RotationLevel::Daily => Rotation::DAILY,
            RotationLevel::Hourly => Rotation::HOURLY,
            RotationLevel::Never => Rotation::NEVER,
        }
    }
}
