//! Отчёт по одному файлу: сводка заголовков и каналов.

use std::{io::Write, path::Path};

use baikal_core::{
    channel_code, file_start_time, BaikalError, BaikalFile, ChannelHeader, FileHeaders,
    FileOutcome, MainHeader,
};
use serde::Serialize;

use crate::InspectResult;

/// Итоговый статус файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Decoded,
    Skipped,
    Failed,
}

/// Сводка по одному каналу.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub index: usize,
    pub name: String,
    pub code: Option<String>,
    pub data_type: String,
    pub coefficient: f64,
    pub samples: usize,
    /// None, если отсчёты не читались или канал пуст
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub mean: Option<f64>,
}

/// Отчёт по файлу.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub channel_count: usize,
    pub bit_depth: i16,
    pub sampling_interval: f64,
    pub samples_per_channel: usize,
    pub dropped_samples: usize,
    pub channels: Vec<ChannelSummary>,
}

impl FileReport {
    /// Собирает отчёт из результата полного чтения.
    pub fn from_outcome(outcome: &FileOutcome) -> Self {
        match outcome {
            FileOutcome::Decoded(file) => Self::from_file(file),
            FileOutcome::Skipped(path) => Self::skipped(path),
            FileOutcome::Failed(path, e) => Self::failed(path, e),
        }
    }

    /// Файл не прошёл проверку.
    pub fn skipped(path: &Path) -> Self {
        Self::empty(path, FileStatus::Skipped, None)
    }

    /// Проверка прошла, чтение не удалось.
    pub fn failed(
        path: &Path,
        err: &BaikalError,
    ) -> Self {
        Self::empty(path, FileStatus::Failed, Some(err.to_string()))
    }

    /// Отчёт только по заголовкам: без статистики отсчётов.
    pub fn from_headers(
        path: &Path,
        headers: &FileHeaders,
    ) -> Self {
        let samples = headers.samples_per_channel();
        let channels = headers
            .channels
            .iter()
            .enumerate()
            .map(|(i, ch)| ChannelSummary::new(i, ch, samples, (None, None, None)))
            .collect();

        Self::decoded(
            path,
            &headers.header,
            channels,
            samples,
            headers.dropped_samples(),
        )
    }

    fn from_file(file: &BaikalFile) -> Self {
        let path = file.filename();
        let Some(rec) = file.recording() else {
            return Self::skipped(path);
        };

        let channels = rec
            .channels
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let data = rec.samples.channels.get(i).map(Vec::as_slice).unwrap_or(&[]);
                ChannelSummary::new(i, ch, data.len(), sample_stats(data))
            })
            .collect();

        Self::decoded(
            path,
            &rec.header,
            channels,
            rec.samples.samples_per_channel(),
            rec.samples.dropped_samples,
        )
    }

    fn decoded(
        path: &Path,
        header: &MainHeader,
        channels: Vec<ChannelSummary>,
        samples_per_channel: usize,
        dropped_samples: usize,
    ) -> Self {
        // Время старта может быть невалидным при корректной структуре файла
        let (start_time, error) = match file_start_time(header) {
            Ok(t) => (Some(t.to_rfc3339()), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            path: path.display().to_string(),
            status: FileStatus::Decoded,
            error,
            station: Some(header.station.clone()),
            start_time,
            channel_count: header.channels(),
            bit_depth: header.bit_depth,
            sampling_interval: header.sampling_interval,
            samples_per_channel,
            dropped_samples,
            channels,
        }
    }

    fn empty(
        path: &Path,
        status: FileStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            path: path.display().to_string(),
            status,
            error,
            station: None,
            start_time: None,
            channel_count: 0,
            bit_depth: 0,
            sampling_interval: 0.0,
            samples_per_channel: 0,
            dropped_samples: 0,
            channels: Vec::new(),
        }
    }
}

impl ChannelSummary {
    fn new(
        index: usize,
        ch: &ChannelHeader,
        samples: usize,
        (min, max, mean): (Option<i32>, Option<i32>, Option<f64>),
    ) -> Self {
        Self {
            index,
            name: ch.name.clone(),
            code: channel_code(index, ch).ok(),
            data_type: ch.data_type.clone(),
            coefficient: ch.coefficient,
            samples,
            min,
            max,
            mean,
        }
    }
}

fn sample_stats(data: &[i32]) -> (Option<i32>, Option<i32>, Option<f64>) {
    if data.is_empty() {
        return (None, None, None);
    }

    let min = data.iter().copied().min();
    let max = data.iter().copied().max();
    let sum: i64 = data.iter().map(|&v| v as i64).sum();

    (min, max, Some(sum as f64 / data.len() as f64))
}

/// Печатает отчёты таблицей.
pub fn write_text<W: Write>(
    out: &mut W,
    reports: &[FileReport],
) -> InspectResult<()> {
    for r in reports {
        match r.status {
            FileStatus::Decoded => {
                writeln!(out, "✓ {}", r.path)?;
                writeln!(out, "  Station       : {}", r.station.as_deref().unwrap_or("-"))?;
                writeln!(out, "  Start time    : {}", r.start_time.as_deref().unwrap_or("-"))?;
                writeln!(out, "  Channels      : {}", r.channel_count)?;
                writeln!(out, "  razr          : {}", r.bit_depth)?;
                writeln!(out, "  dt            : {} s", r.sampling_interval)?;
                writeln!(out, "  Samples/chan  : {}", r.samples_per_channel)?;

                if r.dropped_samples > 0 {
                    writeln!(out, "  Dropped tail  : {}", r.dropped_samples)?;
                }

                for ch in &r.channels {
                    write!(
                        out,
                        "  [{}] {:<4} code={:<2} type={:<10} koef={}",
                        ch.index,
                        ch.name,
                        ch.code.as_deref().unwrap_or("?"),
                        ch.data_type,
                        ch.coefficient
                    )?;

                    if let (Some(min), Some(max), Some(mean)) = (ch.min, ch.max, ch.mean) {
                        write!(out, " min={min} max={max} mean={mean:.2}")?;
                    }

                    writeln!(out)?;
                }
            }
            FileStatus::Skipped => writeln!(out, "- {}: not a Baikal file", r.path)?,
            FileStatus::Failed => writeln!(
                out,
                "✗ {}: {}",
                r.path,
                r.error.as_deref().unwrap_or("unknown error")
            )?,
        }
    }

    Ok(())
}

/// Пишет отчёты JSON-массивом.
pub fn write_json<W: Write>(
    out: &mut W,
    reports: &[FileReport],
) -> InspectResult<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;

    Ok(())
}
