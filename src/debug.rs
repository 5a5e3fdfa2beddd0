use parking_lot::Mutex;
/// Logging backend for termprof
///
/// Routes the `log` facade to stderr and, optionally, to a log file.
///
/// Level precedence:
/// - `--log-level` on the command line
/// - `RUST_LOG` (a bare level such as `debug`)
/// - `warn`
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

/// Level used when neither the command line nor the environment picks one
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

struct Logger {
    level: LevelFilter,
    file: Mutex<Option<File>>,
}

impl Logger {
    fn write_line(&self, line: &str) {
        eprintln!("{line}");
        if let Some(file) = self.file.lock().as_mut() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&format!(
            "[{}] [{:<5}] [{}] {}",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Pick the effective level: explicit > `RUST_LOG` > default
fn resolve_level(explicit: Option<LevelFilter>, env: Option<&str>) -> LevelFilter {
    explicit
        .or_else(|| env.and_then(|value| LevelFilter::from_str(value.trim()).ok()))
        .unwrap_or(DEFAULT_LEVEL)
}

/// Install the logger. Later calls keep the first configuration.
pub fn init_logging(level: Option<LevelFilter>) {
    init_logging_to(level, None);
}

/// Install the logger, also appending to `log_file` when given
pub fn init_logging_to(level: Option<LevelFilter>, log_file: Option<&Path>) {
    let env = std::env::var("RUST_LOG").ok();
    let level = resolve_level(level, env.as_deref());

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("termprof: cannot open log file {}: {e}", path.display());
                None
            }
        }
    });

    let logger = LOGGER.get_or_init(|| Logger {
        level,
        file: Mutex::new(file),
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}
