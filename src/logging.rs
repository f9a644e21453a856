use anyhow::{bail, Result};
use log::{LevelFilter, Metadata, Record};

struct PluginLogger;

static LOGGER: PluginLogger = PluginLogger;

/// Logs go to stderr, stdout is reserved for the response the host reads back
pub(crate) fn init(level: LevelFilter) -> Result<()> {
    match log::set_logger(&LOGGER) {
        Ok(_) => log::set_max_level(level),
        Err(_) => bail!("Logger initalization failed"),
    };

    Ok(())
}

impl log::Log for PluginLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} - {} - {}:{}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
