//! Примитивы чтения/записи little-endian значений по смещению.
//!
//! Все функции сдвигают `off` на ширину значения. Проверка границ лежит на
//! вызывающем коде: схема гарантирует, что поле целиком внутри буфера.

pub mod read;
pub mod write;

pub use read::*;
pub use write::*;
