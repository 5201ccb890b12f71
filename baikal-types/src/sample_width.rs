use serde::Serialize;

/// Ширина отсчёта в области данных
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleWidth {
    /// 16-битные целые со знаком (`razr == 16`)
    Int16,
    /// 32-битные целые со знаком (любое другое значение `razr`)
    Int32,
}

impl SampleWidth {
    /// Выбор ширины по полю `razr`. Только 16 даёт двухбайтовые отсчёты.
    pub fn from_bit_depth(razr: i16) -> Self {
        match razr {
            16 => SampleWidth::Int16,
            _ => SampleWidth::Int32,
        }
    }

    /// Размер одного отсчёта в байтах
    pub fn sample_size(&self) -> usize {
        match self {
            SampleWidth::Int16 => 2,
            SampleWidth::Int32 => 4,
        }
    }

    /// Помещается ли значение в отсчёт данной ширины.
    pub fn fits(
        &self,
        value: i32,
    ) -> bool {
        match self {
            SampleWidth::Int16 => i16::try_from(value).is_ok(),
            SampleWidth::Int32 => true,
        }
    }
}
