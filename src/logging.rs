use std::fs::File;
use std::path::Path;

/// Log levels, ordered from quietest to noisiest
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer, defaulting to Info
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    /// Most verbose `log` level this setting lets through
    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Nothing => log::LevelFilter::Off,
            LogLevel::User | LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::All => log::LevelFilter::Trace,
        }
    }
}

/// Install the logger. Writes to `log_file` when given, else stderr.
pub fn log_init(level: LogLevel, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.level_filter());
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(2), LogLevel::Error);
        assert_eq!(LogLevel::from_i32(5), LogLevel::Debug);
        assert_eq!(LogLevel::from_i32(6), LogLevel::All);
    }

    #[test]
    fn test_log_level_invalid() {
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Nothing.level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::User.level_filter(), log::LevelFilter::Error);
        assert_eq!(LogLevel::Warning.level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::All.level_filter(), log::LevelFilter::Trace);
    }

    // Only test in this binary that installs the global logger.
    #[test]
    fn test_log_init_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdogs.log");
        log_init(LogLevel::Warning, Some(&path)).unwrap();

        log::error!("invalid Video Mode 1x2");
        log::info!("dropped");
        log::logger().flush();

        let out = std::fs::read_to_string(&path).unwrap();
        assert!(out.contains("invalid Video Mode 1x2"));
        assert!(out.contains("ERROR"));
        assert!(!out.contains("dropped"));
        assert!(log_init(LogLevel::Info, None).is_err());
    }
}
