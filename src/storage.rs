use chrono::NaiveDate;
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf}
};
use tracing::error;

use crate::format::Formatter;

// Utils to keep the append-only text logs on local device.
pub struct LocalSaver;

impl LocalSaver {
    pub fn append_to_file(path: &Path, content: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }

    /// Texts of every line logged for `date`, in file order, prefix removed.
    pub fn read_lines_for_date(path: &Path, date: NaiveDate) -> io::Result<Vec<String>> {
        let prefix = Formatter::line_prefix(date);
        Ok(Self::read_log(path)?
            .lines()
            .filter_map(|line| line.strip_prefix(prefix.as_str()))
            .map(String::from)
            .collect())
    }

    /// Whether any dated line of the log, regardless of date, carries `text`.
    pub fn contains_text(path: &Path, text: &str) -> io::Result<bool> {
        let wanted = Formatter::single_line(text);
        Ok(Self::read_log(path)?
            .lines()
            .filter_map(Formatter::strip_date_prefix)
            .any(|logged| logged.trim() == wanted))
    }

    /// Appends one line to each log, all or nothing. On failure every log
    /// already written is cut back to its previous length, or removed when the
    /// append created it.
    pub fn append_all(records: &[(PathBuf, String)]) -> io::Result<()> {
        let mut written: Vec<(&Path, Option<u64>)> = Vec::new();
        for (path, content) in records {
            let previous_len = match fs::metadata(path) {
                Ok(meta) => Some(meta.len()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => {
                    Self::roll_back(&written);
                    return Err(e);
                }
            };
            if let Err(e) = Self::append_to_file(path, content) {
                written.push((path.as_path(), previous_len));
                Self::roll_back(&written);
                return Err(e);
            }
            written.push((path.as_path(), previous_len));
        }
        Ok(())
    }

    fn roll_back(written: &[(&Path, Option<u64>)]) {
        for (path, previous_len) in written {
            let result = match previous_len {
                Some(len) => OpenOptions::new()
                    .write(true)
                    .open(path)
                    .and_then(|file| file.set_len(*len)),
                None => match fs::remove_file(path) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                    other => other
                }
            };
            if let Err(e) = result {
                error!("Failed to roll back {}: {}", path.display(), e);
            }
        }
    }

    fn read_log(path: &Path) -> io::Result<String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e)
        }
    }
}
