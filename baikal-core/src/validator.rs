//! Быстрая проверка: похож ли файл на запись Байкал.
//!
//! Читается только первое слово файла (число каналов). Полное чтение
//! выполняется отдельно и открывает файл заново.

use std::{fs::File, io::Read, path::Path};

use baikal_types::{BaikalError, BaikalResult};
use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};

use crate::format::{channel_count_plausible, TEXT_COMPANION_EXT};

/// Текстовый файл-спутник (`*.prn`), а не бинарная запись.
pub fn is_text_companion(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TEXT_COMPANION_EXT))
}

/// Читает первые 2 байта файла как число каналов.
pub fn probe_channel_count<P: AsRef<Path>>(path: P) -> BaikalResult<i16> {
    let mut file = File::open(path.as_ref())?;

    Ok(file.read_i16::<LittleEndian>()?)
}

/// Проверка без ошибок: любой сбой означает "не Байкал".
pub fn is_baikal<P: AsRef<Path>>(path: P) -> bool {
    match check(path.as_ref()) {
        Ok(()) => true,
        Err(BaikalError::Io(e)) => {
            warn!("Error in file {}: {e}", path.as_ref().display());
            false
        }
        Err(e) => {
            debug!("{} rejected: {e}", path.as_ref().display());
            false
        }
    }
}

fn check(path: &Path) -> BaikalResult<()> {
    if is_text_companion(path) {
        return Err(BaikalError::invalid_format("text companion file"));
    }

    let kan = probe_channel_count(path)?;

    if !channel_count_plausible(kan) {
        return Err(BaikalError::invalid_format(format!(
            "implausible channel count {kan}"
        )));
    }

    Ok(())
}

/// Та же проверка числа каналов для уже открытого потока.
pub fn looks_like_baikal<R: Read>(mut reader: R) -> bool {
    reader
        .read_i16::<LittleEndian>()
        .is_ok_and(channel_count_plausible)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{Builder, NamedTempFile};

    use super::*;

    fn file_with(bytes: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_accepts_plausible_counts() {
        for kan in 1i16..=6 {
            let f = file_with(&kan.to_le_bytes());
            assert!(is_baikal(f.path()), "kan={kan}");
        }
    }

    #[test]
    fn test_rejects_implausible_counts() {
        for kan in [0i16, 7, -1, 300] {
            let f = file_with(&kan.to_le_bytes());
            assert!(!is_baikal(f.path()), "kan={kan}");
        }
    }

    #[test]
    fn test_rejects_short_file() {
        let f = file_with(&[3]);
        assert!(!is_baikal(f.path()));
        assert!(matches!(
            probe_channel_count(f.path()),
            Err(BaikalError::Io(_))
        ));
    }

    #[test]
    fn test_rejects_missing_file() {
        assert!(!is_baikal("/nonexistent/definitely/missing.00"));
    }

    #[test]
    fn test_rejects_prn_extension() {
        let mut f = Builder::new().suffix(".PRN").tempfile().unwrap();
        f.write_all(&3i16.to_le_bytes()).unwrap();
        f.flush().unwrap();

        assert_eq!(probe_channel_count(f.path()).unwrap(), 3);
        assert!(!is_baikal(f.path()));
    }

    #[test]
    fn test_text_companion_ext() {
        assert!(is_text_companion(Path::new("a/b/rec.prn")));
        assert!(is_text_companion(Path::new("rec.Prn")));
        assert!(!is_text_companion(Path::new("rec.xx")));
        assert!(!is_text_companion(Path::new("prn")));
    }

    #[test]
    fn test_looks_like_baikal() {
        assert!(looks_like_baikal(&[2u8, 0, 0xFF][..]));
        assert!(!looks_like_baikal(&[9u8, 0][..]));
        assert!(!looks_like_baikal(&[][..]));
    }
}
