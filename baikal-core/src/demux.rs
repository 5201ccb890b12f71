//! Демультиплексирование области данных.
//!
//! Отсчёты в файле идут кадрами: отсчёт 0 всех каналов, затем отсчёт 1 всех
//! каналов и т.д. Здесь поток раскладывается в отдельный массив на канал.

use baikal_types::{BaikalError, BaikalResult, SampleWidth};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};
use serde::Serialize;

/// Результат демультиплексирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demultiplexed {
    /// По массиву на канал, все одинаковой длины
    pub channels: Vec<Vec<i32>>,
    /// Отсчётов отброшено с конца, чтобы их число делилось на число каналов
    pub dropped_samples: usize,
    /// Хвостовых байт, не образующих целый отсчёт
    pub dropped_bytes: usize,
}

impl Demultiplexed {
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Буфер разобран без усечения.
    pub fn is_aligned(&self) -> bool {
        self.dropped_samples == 0 && self.dropped_bytes == 0
    }
}

/// Разбирает сырые байты в плоскую последовательность целых.
///
/// Возвращает также число хвостовых байт, не вошедших в целый отсчёт.
pub fn decode_samples(
    raw: &[u8],
    width: SampleWidth,
) -> (Vec<i32>, usize) {
    let size = width.sample_size();
    let chunks = raw.chunks_exact(size);
    let leftover = chunks.remainder().len();

    let flat: Vec<i32> = match width {
        SampleWidth::Int16 => chunks.map(|c| i32::from(LittleEndian::read_i16(c))).collect(),
        SampleWidth::Int32 => chunks.map(LittleEndian::read_i32).collect(),
    };

    (flat, leftover)
}

/// Раскладывает плоскую последовательность по каналам.
///
/// Лишние отсчёты с конца отбрасываются, пока их число не станет кратным
/// `channel_count`. Возвращает массивы каналов и число отброшенных отсчётов.
pub fn split_channels(
    flat: &[i32],
    channel_count: usize,
) -> BaikalResult<(Vec<Vec<i32>>, usize)> {
    if channel_count == 0 {
        return Err(BaikalError::format_violation(
            "cannot demultiplex into zero channels",
        ));
    }

    let dropped = flat.len() % channel_count;
    let usable = &flat[..flat.len() - dropped];

    let channels = (0..channel_count)
        .map(|c| usable.iter().skip(c).step_by(channel_count).copied().collect())
        .collect();

    Ok((channels, dropped))
}

/// Полный путь: байты -> отсчёты -> массивы каналов.
pub fn demultiplex(
    raw: &[u8],
    channel_count: usize,
    width: SampleWidth,
) -> BaikalResult<Demultiplexed> {
    let (flat, dropped_bytes) = decode_samples(raw, width);
    let (channels, dropped_samples) = split_channels(&flat, channel_count)?;

    if dropped_samples > 0 || dropped_bytes > 0 {
        warn!(
            "Sample buffer not aligned to {channel_count} channels: dropped {dropped_samples} samples, {dropped_bytes} bytes"
        );
    }

    let result = Demultiplexed {
        channels,
        dropped_samples,
        dropped_bytes,
    };

    debug!(
        "Demultiplexed {} bytes into {} x {} ({:?})",
        raw.len(),
        channel_count,
        result.samples_per_channel(),
        width
    );

    Ok(result)
}

/// Обратная операция: массивы каналов -> мультиплексированные байты.
pub fn interleave(
    channels: &[Vec<i32>],
    width: SampleWidth,
) -> BaikalResult<Vec<u8>> {
    let Some(first) = channels.first() else {
        return Ok(Vec::new());
    };
    let len = first.len();

    if let Some((i, ch)) = channels.iter().enumerate().find(|(_, ch)| ch.len() != len) {
        return Err(BaikalError::format_violation(format!(
            "channel {i} has {} samples, channel 0 has {len}",
            ch.len()
        )));
    }

    let size = width.sample_size();
    let mut buf = vec![0u8; len * channels.len() * size];
    let mut off = 0;

    for r in 0..len {
        for ch in channels {
            let v = ch[r];

            match width {
                SampleWidth::Int16 => {
                    let v = i16::try_from(v).map_err(|_| {
                        BaikalError::format_violation(format!("sample {v} does not fit 16 bits"))
                    })?;
                    LittleEndian::write_i16(&mut buf[off..off + 2], v);
                }
                SampleWidth::Int32 => LittleEndian::write_i32(&mut buf[off..off + 4], v),
            }

            off += size;
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i16_bytes(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_split_drops_trailing() {
        let (channels, dropped) = split_channels(&[1, 2, 3, 4, 5, 6, 7], 3).unwrap();
        assert_eq!(channels, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_split_single_channel() {
        let (channels, dropped) = split_channels(&[5, 6, 7], 1).unwrap();
        assert_eq!(channels, vec![vec![5, 6, 7]]);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_split_zero_channels() {
        assert!(split_channels(&[1, 2], 0).is_err());
    }

    #[test]
    fn test_split_fewer_samples_than_channels() {
        let (channels, dropped) = split_channels(&[1, 2], 3).unwrap();
        assert_eq!(channels, vec![Vec::<i32>::new(); 3]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_demultiplex_int16() {
        let raw = i16_bytes(&[1, -2, 3, -4, 5, -6, 7]);
        let d = demultiplex(&raw, 3, SampleWidth::Int16).unwrap();

        assert_eq!(d.channels, vec![vec![1, -4], vec![-2, 5], vec![3, -6]]);
        assert_eq!(d.dropped_samples, 1);
        assert_eq!(d.dropped_bytes, 0);
        assert!(!d.is_aligned());
    }

    #[test]
    fn test_demultiplex_int32() {
        let raw: Vec<u8> = [100_000i32, -1, 200_000, -2]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let d = demultiplex(&raw, 2, SampleWidth::Int32).unwrap();

        assert_eq!(d.channels, vec![vec![100_000, 200_000], vec![-1, -2]]);
        assert!(d.is_aligned());
        assert_eq!(d.samples_per_channel(), 2);
    }

    #[test]
    fn test_demultiplex_partial_element() {
        let mut raw = i16_bytes(&[1, 2]);
        raw.push(0xFF);
        let d = demultiplex(&raw, 2, SampleWidth::Int16).unwrap();

        assert_eq!(d.channels, vec![vec![1], vec![2]]);
        assert_eq!(d.dropped_bytes, 1);
    }

    #[test]
    fn test_same_bytes_different_width() {
        let raw = i16_bytes(&[1, 0, 2, 0]);

        let narrow = demultiplex(&raw, 1, SampleWidth::Int16).unwrap();
        assert_eq!(narrow.channels[0], vec![1, 0, 2, 0]);

        let wide = demultiplex(&raw, 1, SampleWidth::Int32).unwrap();
        assert_eq!(wide.channels[0], vec![1, 2]);
    }

    #[test]
    fn test_empty_buffer() {
        let d = demultiplex(&[], 2, SampleWidth::Int32).unwrap();
        assert_eq!(d.channels, vec![Vec::<i32>::new(), Vec::new()]);
        assert!(d.is_aligned());
    }

    #[test]
    fn test_interleave_inverse() {
        let channels = vec![vec![1, 4], vec![2, 5], vec![3, 6]];
        let raw = interleave(&channels, SampleWidth::Int16).unwrap();

        assert_eq!(raw, i16_bytes(&[1, 2, 3, 4, 5, 6]));
        assert_eq!(
            demultiplex(&raw, 3, SampleWidth::Int16).unwrap().channels,
            channels
        );
    }

    #[test]
    fn test_interleave_unequal_lengths() {
        let err = interleave(&[vec![1, 2], vec![3]], SampleWidth::Int32).unwrap_err();
        assert!(err.to_string().contains("channel 1"));
    }

    #[test]
    fn test_interleave_overflow_int16() {
        assert!(interleave(&[vec![70_000]], SampleWidth::Int16).is_err());
    }
}
