//! Передача декодированных каналов во внешнюю модель трасс.

use std::path::Path;

use baikal_types::{BaikalError, BaikalResult, ChannelHeader, MainHeader};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::{
    file::BaikalFile, format::DEFAULT_NETWORK, serialization::Recording, time::file_start_time,
};

/// Стандартные имена компонент по порядку каналов в файле
pub const COMPONENT_NAMES: [&str; 6] = ["NS", "EW", "Z", "NSg", "EWg", "Zg"];

/// Одна трасса: отсчёты одного канала и их привязка ко времени.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub network: String,
    pub station: String,
    pub location: String,
    /// Однобуквенный код канала ("Z", "N", "E")
    pub channel: String,
    /// Частота дискретизации, Гц (1/dt)
    pub sampling_rate: f64,
    pub start_time: DateTime<Utc>,
    pub data: Vec<i32>,
}

impl TraceRecord {
    /// Число отсчётов.
    pub fn npts(&self) -> usize {
        self.data.len()
    }

    /// Идентификатор в виде NET.STA.LOC.CHA
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

/// Код канала: первая буква имени, а при пустом имени первая буква
/// стандартного имени компоненты с тем же индексом.
pub fn channel_code(
    index: usize,
    channel: &ChannelHeader,
) -> BaikalResult<String> {
    channel
        .channel_code()
        .or_else(|| {
            COMPONENT_NAMES
                .get(index)
                .and_then(|name| name.chars().next())
        })
        .map(String::from)
        .ok_or_else(|| BaikalError::format_violation(format!("channel {index} has no name")))
}

/// Частота дискретизации по полю `dt`.
pub fn sampling_rate(header: &MainHeader) -> BaikalResult<f64> {
    let dt = header.sampling_interval;

    if !dt.is_finite() || dt <= 0.0 {
        return Err(BaikalError::format_violation(format!(
            "sampling interval must be > 0, got {dt}"
        )));
    }

    Ok(1.0 / dt)
}

/// Трассы всех каналов записи, в порядке каналов в файле.
pub fn traces_from_recording(rec: &Recording) -> BaikalResult<Vec<TraceRecord>> {
    let start_time = file_start_time(&rec.header)?;
    let rate = sampling_rate(&rec.header)?;
    let station = rec.header.station.to_uppercase();

    rec.channels
        .iter()
        .zip(&rec.samples.channels)
        .enumerate()
        .map(|(i, (ch, data))| {
            Ok(TraceRecord {
                network: DEFAULT_NETWORK.to_string(),
                station: station.clone(),
                location: String::new(),
                channel: channel_code(i, ch)?,
                sampling_rate: rate,
                start_time,
                data: data.clone(),
            })
        })
        .collect()
}

/// Трассы файла; для файла в состоянии Invalid возвращает ошибку.
pub fn traces_from_file(file: &BaikalFile) -> BaikalResult<Vec<TraceRecord>> {
    let rec = file.recording().ok_or_else(|| {
        BaikalError::invalid_format(format!(
            "{} is not a valid Baikal file",
            file.filename().display()
        ))
    })?;

    traces_from_recording(rec)
}

/// Открывает файл и строит трассы.
///
/// `Ok(None)` означает, что файл не прошёл проверку и пропущен.
pub fn read_traces<P: AsRef<Path>>(path: P) -> BaikalResult<Option<Vec<TraceRecord>>> {
    let file = BaikalFile::open(path)?;

    if !file.is_valid() {
        info!("Skipping file {}", file.filename().display());
        return Ok(None);
    }

    traces_from_file(&file).map(Some)
}
