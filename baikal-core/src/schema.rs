//! Декларативное описание раскладки заголовков Байкал.
//!
//! Каждый заголовок задаётся таблицей [`FieldSpec`] (имя, тип, начало,
//! конец), а не кодом на каждое поле. Одна функция [`decode_fields`] читает
//! любую таблицу, одна функция [`encode_fields`] пишет её обратно.

use baikal_types::{BaikalError, BaikalResult};

use crate::binary::{
    read_bytes, read_f64_le, read_i16_le, read_i32_le, read_u16_le, read_u32_le, write_f64_le,
    write_i16_le, write_i32_le, write_padded, write_u16_le, write_u32_le,
};

/// Тип поля на проводе (все числа little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    I16,
    U16,
    I32,
    U32,
    F64,
    I16Array(usize),
    U32Array(usize),
    F64Array(usize),
    /// Строка фиксированной длины, дополненная нулями
    Bytes(usize),
}

/// Одна строка таблицы раскладки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub wire: WireType,
    pub start: usize,
    pub end: usize,
}

/// Декодированное значение поля.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F64(f64),
    I16Array(Vec<i16>),
    U32Array(Vec<u32>),
    F64Array(Vec<f64>),
    Text(String),
}

/// Главный заголовок, 120 байт.
pub const MAIN_HEADER_SCHEMA: &[FieldSpec] = &[
    field("kan", WireType::I16, 0, 2),
    field("test", WireType::I16, 2, 4),
    field("vers", WireType::I16, 4, 6),
    field("day", WireType::I16, 6, 8),
    field("month", WireType::I16, 8, 10),
    field("year", WireType::I16, 10, 12),
    field("satellit", WireType::I16, 12, 14),
    field("valid", WireType::U16, 14, 16),
    field("pri_synhr", WireType::I16, 16, 18),
    field("razr", WireType::I16, 18, 20),
    field("reserv_short", WireType::I16Array(6), 20, 32),
    field("station", WireType::Bytes(16), 32, 48),
    field("dt", WireType::F64, 48, 56),
    field("to", WireType::F64, 56, 64),
    field("deltas", WireType::F64, 64, 72),
    field("latitude", WireType::F64, 72, 80),
    field("longitude", WireType::F64, 80, 88),
    field("reserv_doubl", WireType::F64Array(2), 88, 104),
    field("reserv_long", WireType::U32Array(4), 104, 120),
];

/// Заголовок канала, 72 байта.
pub const CHANNEL_HEADER_SCHEMA: &[FieldSpec] = &[
    field("phis_nom", WireType::I16, 0, 2),
    field("reserv", WireType::I16Array(3), 2, 8),
    field("name_chan", WireType::Bytes(24), 8, 32),
    field("tip_dat", WireType::Bytes(24), 32, 56),
    field("koef_chan", WireType::F64, 56, 64),
    field("calcfreq", WireType::F64, 64, 72),
];

const fn field(
    name: &'static str,
    wire: WireType,
    start: usize,
    end: usize,
) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        start,
        end,
    }
}

impl WireType {
    /// Ширина поля в байтах.
    pub const fn width(&self) -> usize {
        match *self {
            WireType::I16 | WireType::U16 => 2,
            WireType::I32 | WireType::U32 => 4,
            WireType::F64 => 8,
            WireType::I16Array(n) => 2 * n,
            WireType::U32Array(n) => 4 * n,
            WireType::F64Array(n) => 8 * n,
            WireType::Bytes(n) => n,
        }
    }
}

/// Полный размер записи, описываемой таблицей.
pub fn schema_size(schema: &[FieldSpec]) -> usize {
    schema.iter().map(|f| f.end).max().unwrap_or(0)
}

/// Очистка строкового поля от артефактов старых регистраторов.
///
/// Удаляются байты 0x00 и 0x01, затем подстрока ".st", затем пробелы по
/// краям.
pub fn clean_text(raw: &[u8]) -> String {
    let kept: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|&b| b != 0x00 && b != 0x01)
        .collect();

    String::from_utf8_lossy(&kept)
        .replace(".st", "")
        .trim()
        .to_string()
}

/// Значения полей в порядке таблицы.
#[derive(Debug, Clone)]
pub struct DecodedFields {
    entries: Vec<(&'static str, Option<FieldValue>)>,
}

impl DecodedFields {
    /// Забирает значение поля, приводя его к нужному типу.
    pub fn take<T>(
        &mut self,
        name: &str,
    ) -> BaikalResult<T>
    where
        T: TryFrom<FieldValue, Error = BaikalError>,
    {
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.take())
            .ok_or_else(|| BaikalError::format_violation(format!("field '{name}' missing")))?;

        T::try_from(slot).map_err(|e| {
            BaikalError::format_violation(format!("field '{name}': {e}"))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Читает все поля таблицы из `buf`.
///
/// `section` попадает в текст ошибки, если байт не хватает.
pub fn decode_fields(
    schema: &[FieldSpec],
    buf: &[u8],
    section: &'static str,
) -> BaikalResult<DecodedFields> {
    let need = schema_size(schema);

    if buf.len() < need {
        return Err(BaikalError::truncated(section, need, buf.len()));
    }

    let entries = schema
        .iter()
        .map(|spec| (spec.name, Some(decode_one(spec, buf))))
        .collect();

    Ok(DecodedFields { entries })
}

fn decode_one(
    spec: &FieldSpec,
    buf: &[u8],
) -> FieldValue {
    let mut off = spec.start;

    match spec.wire {
        WireType::I16 => FieldValue::I16(read_i16_le(buf, &mut off)),
        WireType::U16 => FieldValue::U16(read_u16_le(buf, &mut off)),
        WireType::I32 => FieldValue::I32(read_i32_le(buf, &mut off)),
        WireType::U32 => FieldValue::U32(read_u32_le(buf, &mut off)),
        WireType::F64 => FieldValue::F64(read_f64_le(buf, &mut off)),
        WireType::I16Array(n) => {
            FieldValue::I16Array((0..n).map(|_| read_i16_le(buf, &mut off)).collect())
        }
        WireType::U32Array(n) => {
            FieldValue::U32Array((0..n).map(|_| read_u32_le(buf, &mut off)).collect())
        }
        WireType::F64Array(n) => {
            FieldValue::F64Array((0..n).map(|_| read_f64_le(buf, &mut off)).collect())
        }
        WireType::Bytes(n) => FieldValue::Text(clean_text(read_bytes(buf, &mut off, n))),
    }
}

/// Пишет значения (в порядке таблицы) в `buf`.
pub fn encode_fields(
    schema: &[FieldSpec],
    values: &[FieldValue],
    buf: &mut [u8],
) -> BaikalResult<()> {
    if values.len() != schema.len() {
        return Err(BaikalError::format_violation(format!(
            "expected {} values, got {}",
            schema.len(),
            values.len()
        )));
    }

    let need = schema_size(schema);
    if buf.len() < need {
        return Err(BaikalError::format_violation(format!(
            "output buffer {} bytes < record size {need}",
            buf.len()
        )));
    }

    for (spec, value) in schema.iter().zip(values) {
        encode_one(spec, value, buf)?;
    }

    Ok(())
}

fn encode_one(
    spec: &FieldSpec,
    value: &FieldValue,
    buf: &mut [u8],
) -> BaikalResult<()> {
    let mut off = spec.start;

    match (spec.wire, value) {
        (WireType::I16, FieldValue::I16(v)) => write_i16_le(buf, &mut off, *v),
        (WireType::U16, FieldValue::U16(v)) => write_u16_le(buf, &mut off, *v),
        (WireType::I32, FieldValue::I32(v)) => write_i32_le(buf, &mut off, *v),
        (WireType::U32, FieldValue::U32(v)) => write_u32_le(buf, &mut off, *v),
        (WireType::F64, FieldValue::F64(v)) => write_f64_le(buf, &mut off, *v),
        (WireType::I16Array(n), FieldValue::I16Array(v)) if v.len() == n => {
            v.iter().for_each(|x| write_i16_le(buf, &mut off, *x))
        }
        (WireType::U32Array(n), FieldValue::U32Array(v)) if v.len() == n => {
            v.iter().for_each(|x| write_u32_le(buf, &mut off, *x))
        }
        (WireType::F64Array(n), FieldValue::F64Array(v)) if v.len() == n => {
            v.iter().for_each(|x| write_f64_le(buf, &mut off, *x))
        }
        (WireType::Bytes(n), FieldValue::Text(s)) => {
            if s.len() > n {
                return Err(BaikalError::format_violation(format!(
                    "field '{}': text '{s}' is {} bytes, field holds {n}",
                    spec.name,
                    s.len()
                )));
            }

            write_padded(buf, &mut off, n, s.as_bytes())
        }
        (wire, value) => {
            return Err(BaikalError::format_violation(format!(
                "field '{}': value {value:?} does not match {wire:?}",
                spec.name
            )))
        }
    }

    Ok(())
}

macro_rules! scalar_from_field {
    ($ty:ty, $variant:ident) => {
        impl TryFrom<FieldValue> for $ty {
            type Error = BaikalError;

            fn try_from(v: FieldValue) -> Result<Self, Self::Error> {
                match v {
                    FieldValue::$variant(x) => Ok(x),
                    other => Err(BaikalError::format_violation(format!(
                        "expected {}, got {other:?}",
                        stringify!($variant)
                    ))),
                }
            }
        }
    };
}

macro_rules! array_from_field {
    ($ty:ty, $variant:ident) => {
        impl<const N: usize> TryFrom<FieldValue> for [$ty; N] {
            type Error = BaikalError;

            fn try_from(v: FieldValue) -> Result<Self, Self::Error> {
                match v {
                    FieldValue::$variant(xs) => xs.try_into().map_err(|xs: Vec<$ty>| {
                        BaikalError::format_violation(format!(
                            "expected {} elements, got {}",
                            N,
                            xs.len()
                        ))
                    }),
                    other => Err(BaikalError::format_violation(format!(
                        "expected {}, got {other:?}",
                        stringify!($variant)
                    ))),
                }
            }
        }
    };
}

scalar_from_field!(i16, I16);
scalar_from_field!(u16, U16);
scalar_from_field!(i32, I32);
scalar_from_field!(u32, U32);
scalar_from_field!(f64, F64);
scalar_from_field!(String, Text);
array_from_field!(i16, I16Array);
array_from_field!(u32, U32Array);
array_from_field!(f64, F64Array);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(schema: &[FieldSpec]) {
        let mut expected_start = 0;
        for spec in schema {
            assert_eq!(spec.start, expected_start, "gap before '{}'", spec.name);
            assert_eq!(
                spec.end - spec.start,
                spec.wire.width(),
                "width of '{}'",
                spec.name
            );
            expected_start = spec.end;
        }
    }

    #[test]
    fn test_main_schema_layout() {
        assert_contiguous(MAIN_HEADER_SCHEMA);
        assert_eq!(schema_size(MAIN_HEADER_SCHEMA), 120);
        assert_eq!(MAIN_HEADER_SCHEMA.len(), 19);
    }

    #[test]
    fn test_channel_schema_layout() {
        assert_contiguous(CHANNEL_HEADER_SCHEMA);
        assert_eq!(schema_size(CHANNEL_HEADER_SCHEMA), 72);
    }

    #[test]
    fn test_clean_text_nulls() {
        let mut raw = [0u8; 16];
        raw[..4].copy_from_slice(b"ARTK");
        assert_eq!(clean_text(&raw), "ARTK");
    }

    #[test]
    fn test_clean_text_st_artifact() {
        assert_eq!(clean_text(b"  ARTK.st\x01\x00"), "ARTK");
        assert_eq!(clean_text(b"a.stb"), "ab");
    }

    #[test]
    fn test_clean_text_strips_before_substring() {
        // 0x00 внутри ".st" удаляется раньше, чем ищется подстрока
        assert_eq!(clean_text(b"X.\x00st"), "X");
    }

    #[test]
    fn test_decode_short_buffer() {
        let err = decode_fields(CHANNEL_HEADER_SCHEMA, &[0u8; 50], "channel header").unwrap_err();
        assert!(matches!(
            err,
            BaikalError::TruncatedHeader {
                need: 72,
                got: 50,
                ..
            }
        ));
    }

    #[test]
    fn test_take_typed_values() {
        let mut buf = [0u8; 72];
        buf[0..2].copy_from_slice(&7i16.to_le_bytes());
        buf[8..10].copy_from_slice(b"ns");
        buf[56..64].copy_from_slice(&2.5f64.to_le_bytes());

        let mut fields = decode_fields(CHANNEL_HEADER_SCHEMA, &buf, "channel header").unwrap();

        assert_eq!(fields.take::<i16>("phis_nom").unwrap(), 7);
        assert_eq!(fields.take::<[i16; 3]>("reserv").unwrap(), [0, 0, 0]);
        assert_eq!(fields.take::<String>("name_chan").unwrap(), "ns");
        assert_eq!(fields.take::<f64>("koef_chan").unwrap(), 2.5);
    }

    #[test]
    fn test_take_wrong_type() {
        let buf = [0u8; 72];
        let mut fields = decode_fields(CHANNEL_HEADER_SCHEMA, &buf, "channel header").unwrap();
        assert!(fields.take::<f64>("phis_nom").is_err());
    }

    #[test]
    fn test_take_twice_fails() {
        let buf = [0u8; 72];
        let mut fields = decode_fields(CHANNEL_HEADER_SCHEMA, &buf, "channel header").unwrap();
        fields.take::<i16>("phis_nom").unwrap();
        assert!(fields.take::<i16>("phis_nom").is_err());
    }

    #[test]
    fn test_encode_type_mismatch() {
        let values = vec![
            FieldValue::F64(1.0), // должно быть I16
            FieldValue::I16Array(vec![0; 3]),
            FieldValue::Text(String::new()),
            FieldValue::Text(String::new()),
            FieldValue::F64(0.0),
            FieldValue::F64(0.0),
        ];
        let mut buf = [0u8; 72];
        let err = encode_fields(CHANNEL_HEADER_SCHEMA, &values, &mut buf).unwrap_err();
        assert!(err.to_string().contains("phis_nom"));
    }

    #[test]
    fn test_encode_wrong_array_len() {
        let values = vec![
            FieldValue::I16(0),
            FieldValue::I16Array(vec![0; 2]),
            FieldValue::Text(String::new()),
            FieldValue::Text(String::new()),
            FieldValue::F64(0.0),
            FieldValue::F64(0.0),
        ];
        let mut buf = [0u8; 72];
        assert!(encode_fields(CHANNEL_HEADER_SCHEMA, &values, &mut buf).is_err());
    }

    #[test]
    fn test_encode_rejects_oversized_text() {
        let values = vec![
            FieldValue::I16(0),
            FieldValue::I16Array(vec![0; 3]),
            FieldValue::Text("Ж".repeat(13)), // 26 байт при ширине 24
            FieldValue::Text(String::new()),
            FieldValue::F64(0.0),
            FieldValue::F64(0.0),
        ];
        let mut buf = [0u8; 72];
        let err = encode_fields(CHANNEL_HEADER_SCHEMA, &values, &mut buf).unwrap_err();

        assert!(matches!(err, BaikalError::FormatViolation(_)));
        assert!(err.to_string().contains("name_chan"));
    }

    #[test]
    fn test_encode_text_exact_width() {
        let mut buf = [0u8; 72];
        let values = vec![
            FieldValue::I16(0),
            FieldValue::I16Array(vec![0; 3]),
            FieldValue::Text("N".repeat(24)),
            FieldValue::Text(String::new()),
            FieldValue::F64(0.0),
            FieldValue::F64(0.0),
        ];
        encode_fields(CHANNEL_HEADER_SCHEMA, &values, &mut buf).unwrap();

        let mut fields = decode_fields(CHANNEL_HEADER_SCHEMA, &buf, "channel header").unwrap();
        assert_eq!(fields.take::<String>("name_chan").unwrap(), "N".repeat(24));
    }
}
