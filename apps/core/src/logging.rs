use std::any::Any;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

const LOG_FILE_NAME: &str = "rex.log";
const ARCHIVE_PREFIX: &str = "rex-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static LOGGER: OnceLock<Logger> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static MIRROR_TO_STDERR: AtomicBool = AtomicBool::new(false);

struct Logger {
    file: Mutex<File>,
}

pub fn default_logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

pub fn init(log_dir: &Path) -> Result<PathBuf, std::io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let _ = LOGGER.set(Logger {
        file: Mutex::new(file),
    });

    install_panic_hook();
    Ok(log_path)
}

/// Copies every log line to stderr as well, regardless of whether the file
/// logger was initialized.
pub fn set_stderr_mirror(enabled: bool) {
    MIRROR_TO_STDERR.store(enabled, Ordering::Relaxed);
}

pub fn info(message: &str) {
    write_line("INFO", message);
}

pub fn warn(message: &str) {
    write_line("WARN", message);
}

pub fn error(message: &str) {
    write_line("ERROR", message);
}

fn write_line(level: &str, message: &str) {
    let line = format!("[{}] [{level}] {message}\n", unix_timestamp());

    if MIRROR_TO_STDERR.load(Ordering::Relaxed) {
        eprint!("[rex] {line}");
    }

    let Some(logger) = LOGGER.get() else {
        return;
    };
    let Ok(mut file) = logger.file.lock() else {
        return;
    };

    let _ = file.write_all(line.as_bytes());
    let _ = file.flush();
}

/// Seconds since the epoch; a clock set before 1970 logs as zero.
fn unix_timestamp() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs(),
        Err(_) => 0,
    }
}

fn archive_file_name(stamp: u64) -> String {
    format!("{ARCHIVE_PREFIX}{stamp}.log")
}

fn is_archive_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log")
}

/// Moves an oversized `rex.log` aside before it is reopened for appending.
fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == ErrorKind::NotFound => 0,
        Err(err) => return Err(err),
    };
    if size < MAX_LOG_BYTES {
        return Ok(());
    }

    fs::rename(log_path, log_dir.join(archive_file_name(unix_timestamp())))?;
    prune_old_archives(log_dir)
}

/// Archive names embed the rotation time, so name order is age order.
fn prune_old_archives(log_dir: &Path) -> Result<(), std::io::Error> {
    let mut archives: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(log_dir)?.flatten() {
        if entry.file_name().to_str().is_some_and(is_archive_name) {
            archives.push(entry.path());
        }
    }
    if archives.len() <= MAX_ARCHIVES {
        return Ok(());
    }

    archives.sort();
    let excess = archives.len() - MAX_ARCHIVES;
    for stale in archives.drain(..excess) {
        if let Err(err) = fs::remove_file(&stale) {
            eprintln!("[rex] could not remove old log {}: {err}", stale.display());
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        return (*text).to_string();
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text.clone();
    }
    "non-string panic payload".to_string()
}

/// Records panics in the log file, then defers to whatever hook was set
/// before, so the usual stderr report still appears.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let at = match info.location() {
                Some(location) => format!("{}:{}", location.file(), location.line()),
                None => "<unknown>".to_string(),
            };
            error(&format!("panic at {at}: {}", panic_message(info.payload())));
            previous(info);
        }));
    });
}
