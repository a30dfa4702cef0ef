use flexi_logger::{
    filter::{self, LogLineFilter},
    Age, Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};

use super::configuration::LogConfiguration;

const TRANSPORT_CRATES: [&str; 5] = ["reqwest", "hyper", "hyper_util", "cookie_store", "h2"];

/// Drops records emitted by the HTTP stack, which would otherwise drown the
/// client's own request log.
pub struct NoiseFilter {
    ignored: Vec<String>,
}

impl NoiseFilter {
    pub fn new(ignored: Vec<String>) -> Self {
        Self { ignored }
    }

    pub fn is_ignored(&self, module_path: &str) -> bool {
        self.ignored.iter().any(|prefix| {
            module_path == prefix || module_path.starts_with(&format!("{prefix}::"))
        })
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(TRANSPORT_CRATES.iter().map(|c| c.to_string()).collect())
    }
}

impl LogLineFilter for NoiseFilter {
    fn write(
        &self,
        now: &mut flexi_logger::DeferredNow,
        record: &log::Record,
        log_line_writer: &dyn filter::LogLineWriter,
    ) -> std::io::Result<()> {
        if self.is_ignored(record.module_path().unwrap_or_default()) {
            return Ok(());
        }

        log_line_writer.write(now, record)
    }
}

/// Starts file + stderr logging. The returned handle must outlive the program.
pub fn init(
    conf: &LogConfiguration,
    verbosity: Option<log::LevelFilter>,
) -> Result<LoggerHandle, flexi_logger::FlexiLoggerError> {
    let level = match verbosity {
        Some(v) => v.to_string(),
        None => conf.level.clone().unwrap_or_else(|| "info".to_string()),
    };

    let directory = conf.directory.clone().unwrap_or_else(|| "logs".to_string());

    Logger::try_with_str(level.to_lowercase())?
        .log_to_file(FileSpec::default().directory(directory))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(conf.retention.unwrap_or(7)),
        )
        .duplicate_to_stderr(Duplicate::All)
        .write_mode(WriteMode::Async)
        .filter(Box::new(NoiseFilter::default()))
        .start()
}
