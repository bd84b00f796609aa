mod config;

pub use self::config::*;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    let level: tracing::metadata::LevelFilter = config.level.into();
    let builder = EnvFilter::builder().with_default_directive(level.into());
    let from_env = (!config.directives_env.is_empty())
        .then(|| std::env::var(&config.directives_env).ok())
        .flatten()
        .filter(|d| !d.trim().is_empty());
    builder.parse_lossy(from_env.as_deref().unwrap_or(&config.directives))
}

/// Installs the global subscriber: a console layer and an optional rolling file layer.
pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let console = config.console.enable.then(|| {
        let verbose = config.console.verbose;
        tracing_subscriber::fmt::layer()
            .with_file(verbose)
            .with_line_number(verbose)
            .with_thread_ids(verbose)
            .with_target(verbose)
            .boxed()
    });
    let file = config.file.as_ref().map(|file| {
        let appender = RollingFileAppender::new(file.rotation.into(), &file.directory, &file.prefix);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_target(true)
            .boxed()
    });
    Registry::default().with(env_filter(config)).with(console).with(file).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> TelemetryConfig {
        ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_log_info_to_the_console_only() {
        let config = TelemetryConfig::default();
        assert!(config.enable && config.console.enable);
        assert_eq!(LoggingLevel::Info, config.level);
        assert!(config.file.is_none());
    }

    #[test]
    fn file_section_turns_on_the_rolling_file() {
        let config = parse(
            r#"
level: debug
directives: "sea_orm=warn"
file:
  rotation: hourly
"#,
        );
        assert_eq!(LoggingLevel::Debug, config.level);
        let file = config.file.unwrap();
        assert_eq!(RotationLevel::Hourly, file.rotation);
        assert_eq!("helpdesk.log", file.prefix);
        assert_eq!("./logs", file.directory);
    }

    #[test]
    fn configured_directives_apply_without_the_variable() {
        let config = TelemetryConfig {
            directives: "sea_orm=warn".to_string(),
            directives_env: "HELPDESK_TEST_UNSET_LOG".to_string(),
            ..Default::default()
        };
        let filter = env_filter(&config).to_string().to_lowercase();
        assert!(filter.contains("sea_orm=warn"));
        assert!(filter.contains("info"));
    }
}
