//! Спецификация формата файлов Байкал
//!
//! Бинарное представление записей сейсмостанций Байкал. Все многобайтовые
//! числа хранятся в порядке little-endian.
//!
//! ```text
//! [0..120)                         главный заголовок
//! [120 + 72*i .. 120 + 72*(i+1))   заголовок канала i, i < kan
//! [120 + 72*kan .. EOF)            мультиплексированные отсчёты (razr)
//! ```

use baikal_types::{BaikalError, BaikalResult, ChannelHeader, MainHeader};

use crate::schema::{
    decode_fields, encode_fields, FieldValue, CHANNEL_HEADER_SCHEMA, MAIN_HEADER_SCHEMA,
};

/// Размер главного заголовка (120 байт)
pub const MAIN_HEADER_SIZE: usize = 120;

/// Размер заголовка одного канала (72 байта)
pub const CHANNEL_HEADER_SIZE: usize = 72;

/// Допустимое число каналов
pub const MIN_CHANNELS: i16 = 1;
pub const MAX_CHANNELS: i16 = 6;

/// Годы меньше этого значения записаны двузначными
pub const YEAR_CUTOFF: i16 = 1900;
pub const YEAR_BASE: i16 = 2000;

/// Расширение текстовых файлов-спутников (не бинарный формат)
pub const TEXT_COMPANION_EXT: &str = "prn";

/// Код сети для трасс, собранных из файлов Байкал
pub const DEFAULT_NETWORK: &str = "BR";

/// Декодирование/кодирование главного заголовка.
pub trait MainHeaderExt: Sized {
    /// Десериализация заголовка из первых 120 байт `buf`.
    fn deserialize(buf: &[u8]) -> BaikalResult<Self>;

    /// Сериализация заголовка в 120 байт.
    fn serialize(&self) -> BaikalResult<[u8; MAIN_HEADER_SIZE]>;

    /// Смещение начала области данных.
    fn data_offset(&self) -> usize;
}

/// Декодирование/кодирование заголовка канала.
pub trait ChannelHeaderExt: Sized {
    fn deserialize(buf: &[u8]) -> BaikalResult<Self>;

    fn serialize(&self) -> BaikalResult<[u8; CHANNEL_HEADER_SIZE]>;
}

/// Правдоподобно ли число каналов.
pub fn channel_count_plausible(kan: i16) -> bool {
    (MIN_CHANNELS..=MAX_CHANNELS).contains(&kan)
}

/// Исправление двузначного года: 13 -> 2013, 1999 -> 1999.
///
/// Год, который и после поправки меньше 1900 (исходно < -100), считается
/// повреждённым заголовком.
pub fn normalize_year(year: i16) -> BaikalResult<i16> {
    let fixed = if year < YEAR_CUTOFF {
        year + YEAR_BASE
    } else {
        year
    };

    if fixed < YEAR_CUTOFF {
        return Err(BaikalError::format_violation(format!(
            "year {year} is not a valid calendar or two-digit year"
        )));
    }

    Ok(fixed)
}

impl MainHeaderExt for MainHeader {
    fn deserialize(buf: &[u8]) -> BaikalResult<Self> {
        let mut f = decode_fields(MAIN_HEADER_SCHEMA, buf, "main header")?;

        Ok(MainHeader {
            channel_count: f.take("kan")?,
            test: f.take("test")?,
            version: f.take("vers")?,
            day: f.take("day")?,
            month: f.take("month")?,
            year: normalize_year(f.take("year")?)?,
            satellite: f.take("satellit")?,
            valid: f.take("valid")?,
            sync: f.take("pri_synhr")?,
            bit_depth: f.take("razr")?,
            reserved_short: f.take("reserv_short")?,
            station: f.take("station")?,
            sampling_interval: f.take("dt")?,
            start_offset: f.take("to")?,
            deltas: f.take("deltas")?,
            latitude: f.take("latitude")?,
            longitude: f.take("longitude")?,
            reserved_double: f.take("reserv_doubl")?,
            reserved_long: f.take("reserv_long")?,
        })
    }

    fn serialize(&self) -> BaikalResult<[u8; MAIN_HEADER_SIZE]> {
        let values = [
            FieldValue::I16(self.channel_count),
            FieldValue::I16(self.test),
            FieldValue::I16(self.version),
            FieldValue::I16(self.day),
            FieldValue::I16(self.month),
            FieldValue::I16(self.year),
            FieldValue::I16(self.satellite),
            FieldValue::U16(self.valid),
            FieldValue::I16(self.sync),
            FieldValue::I16(self.bit_depth),
            FieldValue::I16Array(self.reserved_short.to_vec()),
            FieldValue::Text(self.station.clone()),
            FieldValue::F64(self.sampling_interval),
            FieldValue::F64(self.start_offset),
            FieldValue::F64(self.deltas),
            FieldValue::F64(self.latitude),
            FieldValue::F64(self.longitude),
            FieldValue::F64Array(self.reserved_double.to_vec()),
            FieldValue::U32Array(self.reserved_long.to_vec()),
        ];

        let mut buf = [0u8; MAIN_HEADER_SIZE];
        encode_fields(MAIN_HEADER_SCHEMA, &values, &mut buf)?;

        Ok(buf)
    }

    fn data_offset(&self) -> usize {
        MAIN_HEADER_SIZE + self.channels() * CHANNEL_HEADER_SIZE
    }
}

impl ChannelHeaderExt for ChannelHeader {
    fn deserialize(buf: &[u8]) -> BaikalResult<Self> {
        let mut f = decode_fields(CHANNEL_HEADER_SCHEMA, buf, "channel header")?;

        Ok(ChannelHeader {
            phase_number: f.take("phis_nom")?,
            reserved: f.take("reserv")?,
            name: f.take("name_chan")?,
            data_type: f.take("tip_dat")?,
            coefficient: f.take("koef_chan")?,
            calc_frequency: f.take("calcfreq")?,
        })
    }

    fn serialize(&self) -> BaikalResult<[u8; CHANNEL_HEADER_SIZE]> {
        let values = [
            FieldValue::I16(self.phase_number),
            FieldValue::I16Array(self.reserved.to_vec()),
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.data_type.clone()),
            FieldValue::F64(self.coefficient),
            FieldValue::F64(self.calc_frequency),
        ];

        let mut buf = [0u8; CHANNEL_HEADER_SIZE];
        encode_fields(CHANNEL_HEADER_SCHEMA, &values, &mut buf)?;

        Ok(buf)
    }
}

/// Декодирует `count` подряд идущих заголовков каналов.
///
/// Порядок в результате совпадает с физическим порядком в файле и служит
/// индексом канала при демультиплексировании.
pub fn decode_channel_headers(
    buf: &[u8],
    count: usize,
) -> BaikalResult<Vec<ChannelHeader>> {
    let need = count * CHANNEL_HEADER_SIZE;

    if buf.len() < need {
        return Err(BaikalError::truncated("channel headers", need, buf.len()));
    }

    buf[..need]
        .chunks_exact(CHANNEL_HEADER_SIZE)
        .map(ChannelHeader::deserialize)
        .collect()
}

/// Сериализует заголовки каналов в один непрерывный блок.
pub fn encode_channel_headers(channels: &[ChannelHeader]) -> BaikalResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(channels.len() * CHANNEL_HEADER_SIZE);

    for ch in channels {
        buf.extend_from_slice(&ch.serialize()?);
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> MainHeader {
        MainHeader {
            channel_count: 3,
            day: 17,
            month: 6,
            year: 2013,
            bit_depth: 16,
            station: "ARTK".to_string(),
            sampling_interval: 0.01,
            start_offset: 3661.5,
            latitude: 52.25,
            longitude: 104.5,
            reserved_long: [1, 2, 3, 4],
            ..MainHeader::default()
        }
    }

    #[test]
    fn test_header_round_trip() {
        let header = sample_header();
        let bytes = header.serialize().unwrap();

        assert_eq!(bytes.len(), MAIN_HEADER_SIZE);

        let decoded = MainHeader::deserialize(&bytes).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_header_byte_layout() {
        let bytes = sample_header().serialize().unwrap();

        assert_eq!(&bytes[0..2], &[3, 0], "kan");
        assert_eq!(&bytes[10..12], &2013i16.to_le_bytes(), "year");
        assert_eq!(&bytes[18..20], &[16, 0], "razr");
        assert_eq!(&bytes[32..36], b"ARTK", "station");
        assert!(bytes[36..48].iter().all(|&b| b == 0), "station padding");
        assert_eq!(&bytes[48..56], &0.01f64.to_le_bytes(), "dt");
        assert_eq!(&bytes[56..64], &3661.5f64.to_le_bytes(), "to");
        assert_eq!(&bytes[104..108], &1u32.to_le_bytes(), "reserv_long[0]");
    }

    #[test]
    fn test_two_digit_year_fixed() {
        let mut bytes = sample_header().serialize().unwrap();
        bytes[10..12].copy_from_slice(&13i16.to_le_bytes());
        assert_eq!(MainHeader::deserialize(&bytes).unwrap().year, 2013);

        bytes[10..12].copy_from_slice(&1999i16.to_le_bytes());
        assert_eq!(MainHeader::deserialize(&bytes).unwrap().year, 1999);
    }

    #[test]
    fn test_normalize_year() {
        assert_eq!(normalize_year(0).unwrap(), 2000);
        assert_eq!(normalize_year(99).unwrap(), 2099);
        assert_eq!(normalize_year(-100).unwrap(), 1900);
        assert_eq!(normalize_year(1900).unwrap(), 1900);
        assert_eq!(normalize_year(2024).unwrap(), 2024);
    }

    #[test]
    fn test_year_below_cutoff_after_fix_rejected() {
        assert!(matches!(
            normalize_year(-200),
            Err(BaikalError::FormatViolation(_))
        ));

        let mut bytes = sample_header().serialize().unwrap();
        bytes[10..12].copy_from_slice(&(-200i16).to_le_bytes());
        assert!(matches!(
            MainHeader::deserialize(&bytes),
            Err(BaikalError::FormatViolation(_))
        ));
    }

    #[test]
    fn test_station_cleaned() {
        let mut bytes = sample_header().serialize().unwrap();
        bytes[32..48].copy_from_slice(b" ARTK.st\x00\x01\x00\x00\x00\x00\x00\x00");
        assert_eq!(MainHeader::deserialize(&bytes).unwrap().station, "ARTK");
    }

    #[test]
    fn test_truncated_main_header() {
        let bytes = sample_header().serialize().unwrap();
        let err = MainHeader::deserialize(&bytes[..100]).unwrap_err();

        assert!(matches!(
            err,
            BaikalError::TruncatedHeader {
                need: 120,
                got: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_data_offset() {
        assert_eq!(sample_header().data_offset(), 120 + 3 * 72);
    }

    #[test]
    fn test_channel_headers_round_trip() {
        let channels = vec![
            ChannelHeader {
                phase_number: 1,
                name: "Z".to_string(),
                data_type: "velocity".to_string(),
                coefficient: 0.5,
                calc_frequency: 100.0,
                ..ChannelHeader::default()
            },
            ChannelHeader {
                phase_number: 2,
                reserved: [7, 8, 9],
                name: "NS".to_string(),
                ..ChannelHeader::default()
            },
        ];

        let bytes = encode_channel_headers(&channels).unwrap();
        assert_eq!(bytes.len(), 2 * CHANNEL_HEADER_SIZE);
        assert_eq!(&bytes[72 + 8..72 + 10], b"NS", "имя второго канала");

        let decoded = decode_channel_headers(&bytes, 2).unwrap();
        assert_eq!(decoded, channels);
    }

    #[test]
    fn test_channel_headers_truncated() {
        let bytes = encode_channel_headers(&[ChannelHeader::default()]).unwrap();
        let err = decode_channel_headers(&bytes, 2).unwrap_err();

        assert!(matches!(
            err,
            BaikalError::TruncatedHeader {
                need: 144,
                got: 72,
                ..
            }
        ));
    }

    #[test]
    fn test_channel_count_plausible() {
        assert!(!channel_count_plausible(0));
        assert!(channel_count_plausible(1));
        assert!(channel_count_plausible(6));
        assert!(!channel_count_plausible(7));
        assert!(!channel_count_plausible(-1));
    }
}
