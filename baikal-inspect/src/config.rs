use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{InspectError, InspectResult};

/// Формат вывода отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Человекочитаемая таблица
    Text,
    /// JSON-массив отчётов по файлам
    Json,
}

/// Полная конфигурация запуска.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Файлы и каталоги для разбора
    pub inputs: Vec<PathBuf>,
    /// Формат вывода
    pub format: OutputFormat,
    /// Число потоков-декодеров
    pub workers: usize,
    /// Читать только заголовки, область данных пропускать
    pub headers_only: bool,
    /// Куда писать отчёт (None = stdout)
    pub output_path: Option<PathBuf>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl InspectConfig {
    /// Проверяет согласованность параметров.
    pub fn validate(&self) -> InspectResult<()> {
        if self.inputs.is_empty() {
            return Err(InspectError::Config("no input files given".to_string()));
        }

        if self.workers == 0 {
            return Err(InspectError::Config("workers must be > 0".to_string()));
        }

        Ok(())
    }

    /// Раскрывает каталоги в список файлов (без рекурсии, по имени).
    pub fn collect_files(&self) -> InspectResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.is_dir() {
                files.extend(list_dir(input)?);
            } else {
                files.push(input.clone());
            }
        }

        Ok(files)
    }
}

fn list_dir(dir: &Path) -> InspectResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat, InspectConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{s}'. Use: text, json")),
        }
    }
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            format: OutputFormat::Text,
            workers: 4,
            headers_only: false,
            output_path: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_output_format_fromstr() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_validate() {
        let mut cfg = InspectConfig::default();
        assert!(cfg.validate().is_err());

        cfg.inputs.push(PathBuf::from("a.00"));
        cfg.validate().unwrap();

        cfg.workers = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_collect_files_expands_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.00"), b"x").unwrap();
        fs::write(dir.path().join("a.00"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let cfg = InspectConfig {
            inputs: vec![dir.path().to_path_buf(), PathBuf::from("single.00")],
            ..InspectConfig::default()
        };
        let files = cfg.collect_files().unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("a.00"),
                dir.path().join("b.00"),
                PathBuf::from("single.00"),
            ]
        );
    }
}
