//! Библиотека чтения формата Байкал
//!
//! Декодер устаревшего бинарного формата записей сейсмостанций Байкал:
//! главный заголовок 120 байт, заголовки каналов по 72 байта и
//! мультиплексированные целочисленные отсчёты.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use baikal_core::{traces_from_file, BaikalFile};
//!
//! let file = BaikalFile::open("record.00")?;
//! if file.is_valid() {
//!     for trace in traces_from_file(&file)? {
//!         println!("{} {} samples @ {} Hz", trace.id(), trace.npts(), trace.sampling_rate);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod binary;
pub mod demux;
pub mod file;
pub mod format;
pub mod schema;
pub mod serialization;
pub mod time;
pub mod trace;
pub mod validator;

pub use baikal_types::*;
pub use batch::*;
pub use demux::*;
pub use file::*;
pub use format::*;
pub use serialization::*;
pub use time::*;
pub use trace::*;
pub use validator::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(MAIN_HEADER_SIZE, 120);
        assert_eq!(CHANNEL_HEADER_SIZE, 72);
        assert_eq!(MAX_CHANNELS, 6);
    }
}
