use serde::Serialize;

use crate::SampleWidth;

/// Главный заголовок файла Байкал (фиксированный размер 120 байт)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainHeader {
    /// Количество каналов ("kan"), допустимо 1..=6
    pub channel_count: i16,
    /// Флаг тестовой записи
    pub test: i16,
    /// Версия формата
    pub version: i16,
    pub day: i16,
    pub month: i16,
    /// Год (двузначные годы уже исправлены: 13 -> 2013)
    pub year: i16,
    /// Флаг спутниковой синхронизации
    pub satellite: i16,
    pub valid: u16,
    /// Признак синхронизации ("pri_synhr")
    pub sync: i16,
    /// Разрядность АЦП ("razr"): 16 или 32
    pub bit_depth: i16,
    pub reserved_short: [i16; 6],
    /// Код станции (очищенный)
    pub station: String,
    /// Интервал дискретизации ("dt"), секунды
    pub sampling_interval: f64,
    /// Время первого отсчёта ("to"), секунды от полуночи
    pub start_offset: f64,
    pub deltas: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub reserved_double: [f64; 2],
    pub reserved_long: [u32; 4],
}

/// Заголовок канала (фиксированный размер 72 байта)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelHeader {
    /// Физический номер канала ("phis_nom")
    pub phase_number: i16,
    pub reserved: [i16; 3],
    /// Имя канала (очищенное), например "Z" или "NS"
    pub name: String,
    /// Тип данных (очищенный)
    pub data_type: String,
    /// Коэффициент канала ("koef_chan")
    pub coefficient: f64,
    /// Расчётная частота ("calcfreq")
    pub calc_frequency: f64,
}

impl MainHeader {
    /// Количество каналов как индекс-пригодное число.
    ///
    /// Отрицательные значения дают 0: такой файл не проходит проверку.
    pub fn channels(&self) -> usize {
        usize::try_from(self.channel_count).unwrap_or(0)
    }

    /// Ширина одного отсчёта по полю `razr`.
    pub fn sample_width(&self) -> SampleWidth {
        SampleWidth::from_bit_depth(self.bit_depth)
    }
}

impl ChannelHeader {
    /// Канонический код канала: первый символ имени в верхнем регистре.
    pub fn channel_code(&self) -> Option<char> {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

// Значения по умолчанию совпадают с теми, что пишут полевые регистраторы
impl Default for MainHeader {
    fn default() -> Self {
        Self {
            channel_count: 3,
            test: 0,
            version: 53,
            day: 1,
            month: 1,
            year: 1980,
            satellite: 0,
            valid: 0,
            sync: 0,
            bit_depth: 32,
            reserved_short: [0; 6],
            station: "st".to_string(),
            sampling_interval: 0.01,
            start_offset: 0.0,
            deltas: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            reserved_double: [0.0; 2],
            reserved_long: [0; 4],
        }
    }
}

impl Default for ChannelHeader {
    fn default() -> Self {
        Self {
            phase_number: 0,
            reserved: [0; 3],
            name: String::new(),
            data_type: String::new(),
            coefficient: 1.0,
            calc_frequency: 0.0,
        }
    }
}
