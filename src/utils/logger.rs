//! Console logger for the command line tool

use super::display::{Color, ColorOutput};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr with a colored level tag
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{} {}", level_tag(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> String {
    let tag = format!("[{:<5}]", level);
    match level {
        Level::Error => ColorOutput::colored(&tag, Color::Red),
        Level::Warn => ColorOutput::colored(&tag, Color::Yellow),
        Level::Info => ColorOutput::colored(&tag, Color::Blue),
        Level::Debug => ColorOutput::colored(&tag, Color::Magenta),
        Level::Trace => tag,
    }
}

/// Map the verbosity flag to a level filter
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the console logger. Calling this more than once keeps the first
/// logger and only updates the level.
pub fn init(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level_for(verbose));
}
