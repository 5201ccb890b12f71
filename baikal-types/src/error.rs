use thiserror::Error;

/// Результат для операций над файлами формата Байкал
pub type BaikalResult<T> = std::result::Result<T, BaikalError>;

/// Типы ошибок формата Байкал.
#[derive(Debug, Error)]
pub enum BaikalError {
    /// Файл не похож на формат Байкал (расширение, число каналов)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Не хватает байт для заголовка (главного или заголовков каналов)
    #[error("Truncated {section}: need {need} bytes, got {got}")]
    TruncatedHeader {
        section: &'static str,
        need: usize,
        got: usize,
    },

    /// Вычисленное время события раньше начала файла
    #[error("Event time {event} is not later than file start {start}")]
    TimeOrdering { event: String, start: String },

    /// Недопустимое время или дата (отрицательные секунды, 31 февраля)
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Нарушение спецификации формата
    #[error("Format violation: {0}")]
    FormatViolation(String),
}

impl BaikalError {
    /// Удобные конструкторы
    pub fn invalid_format<S: Into<String>>(s: S) -> Self {
        Self::InvalidFormat(s.into())
    }

    pub fn invalid_time<S: Into<String>>(s: S) -> Self {
        Self::InvalidTime(s.into())
    }

    pub fn format_violation<S: Into<String>>(s: S) -> Self {
        Self::FormatViolation(s.into())
    }

    pub fn truncated(
        section: &'static str,
        need: usize,
        got: usize,
    ) -> Self {
        Self::TruncatedHeader { section, need, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_message() {
        let e = BaikalError::truncated("main header", 120, 64);
        assert_eq!(
            e.to_string(),
            "Truncated main header: need 120 bytes, got 64"
        );
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: BaikalError = io.into();
        assert!(matches!(e, BaikalError::Io(_)));
        assert!(e.to_string().starts_with("I/O error"));
    }
}
