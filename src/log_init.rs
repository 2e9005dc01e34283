use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;

struct FileLogger {
    file_path: PathBuf,
    level: LevelFilter,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                let _ = writeln!(
                    file,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {}
}

/// Appends log records at or above `level` to the file at `path`.
///
/// The file is opened once up front so a bad path is reported here rather
/// than silently dropping every record later.
pub fn init_logger(path: impl Into<PathBuf>, level: LevelFilter) -> Result<()> {
    let file_path = path.into();
    OpenOptions::new().create(true).append(true).open(&file_path)?;

    log::set_boxed_logger(Box::new(FileLogger { file_path, level }))?;
    log::set_max_level(level);
    Ok(())
}
