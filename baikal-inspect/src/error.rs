use thiserror::Error;

pub type InspectResult<T> = std::result::Result<T, InspectError>;

#[derive(Debug, Error)]
pub enum InspectError {
    /// Ошибка формата Байкал
    #[error("Baikal error: {0}")]
    Baikal(#[from] baikal_types::BaikalError),

    /// Ошибка чтения каталога или записи отчёта
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации отчёта
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),

    /// Ошибка пула воркеров (inter-thread)
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}
