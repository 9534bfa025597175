use chrono::Utc;
use slog::Drain;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Terminal logger for a process. `process_id` is attached to every record.
pub fn create_root_logger_for_stdout(process_id: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).use_file_location().build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("ProcessId" => process_id))
}

/// File logger writing to `{directory}/{process_id}/{timestamp}_info.log`.
pub fn create_root_logger_for_file<P: AsRef<Path>>(directory: P, process_id: String) -> io::Result<slog::Logger> {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let log_dir = directory.as_ref().join(process_id.replace(':', "_"));
    fs::create_dir_all(&log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_dir.join(format!("{}_info.log", now)))?;

    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Ok(slog::Logger::root(drain, slog::o!("ProcessId" => process_id)))
}
