//! Пакетное чтение: сбой одного файла не останавливает остальные.

use std::path::{Path, PathBuf};

use baikal_types::BaikalError;
use log::{error, info};

use crate::file::BaikalFile;

/// Итог чтения одного файла.
#[derive(Debug)]
pub enum FileOutcome {
    Decoded(BaikalFile),
    /// Файл не прошёл проверку
    Skipped(PathBuf),
    /// Проверка прошла, чтение не удалось
    Failed(PathBuf, BaikalError),
}

/// Сводка пакетного чтения.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub decoded: Vec<BaikalFile>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, BaikalError)>,
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Decoded(f) => f.filename(),
            FileOutcome::Skipped(p) | FileOutcome::Failed(p, _) => p,
        }
    }
}

impl BatchReport {
    pub fn push(
        &mut self,
        outcome: FileOutcome,
    ) {
        match outcome {
            FileOutcome::Decoded(f) => self.decoded.push(f),
            FileOutcome::Skipped(p) => self.skipped.push(p),
            FileOutcome::Failed(p, e) => self.failed.push((p, e)),
        }
    }

    pub fn total(&self) -> usize {
        self.decoded.len() + self.skipped.len() + self.failed.len()
    }
}

/// Читает один файл, превращая любую ошибку в [`FileOutcome::Failed`].
pub fn decode_one<P: AsRef<Path>>(path: P) -> FileOutcome {
    let path = path.as_ref();

    match BaikalFile::open(path) {
        Ok(f) if f.is_valid() => FileOutcome::Decoded(f),
        Ok(_) => FileOutcome::Skipped(path.to_path_buf()),
        Err(e) => {
            error!("Failed to decode {}: {e}", path.display());
            FileOutcome::Failed(path.to_path_buf(), e)
        }
    }
}

/// Последовательно читает все файлы.
pub fn decode_batch<I, P>(paths: I) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = BatchReport::default();

    for path in paths {
        report.push(decode_one(path));
    }

    info!(
        "Batch done: {} decoded, {} skipped, {} failed",
        report.decoded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    report
}
