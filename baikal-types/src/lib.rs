pub mod error;
pub mod header;
pub mod sample_width;

pub use error::*;
pub use header::*;
pub use sample_width::*;
