use std::io::{BufReader, BufWriter, Read, Write};

use baikal_types::{BaikalError, BaikalResult, ChannelHeader, MainHeader};
use log::debug;

use crate::{
    demux::{demultiplex, interleave, Demultiplexed},
    format::{
        channel_count_plausible, decode_channel_headers, encode_channel_headers, MainHeaderExt,
        CHANNEL_HEADER_SIZE, MAIN_HEADER_SIZE,
    },
};

/// Полностью декодированное содержимое файла.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub header: MainHeader,
    pub channels: Vec<ChannelHeader>,
    pub samples: Demultiplexed,
}

/// Последовательный читатель файлов Байкал.
///
/// Порядок чтения жёстко задан форматом: главный заголовок (в [`new`]),
/// заголовки каналов, область данных.
///
/// [`new`]: BaikalReader::new
pub struct BaikalReader<R: Read> {
    reader: BufReader<R>,
    header: MainHeader,
    channels: Option<Vec<ChannelHeader>>,
}

/// Писатель файлов Байкал.
#[derive(Debug)]
pub struct BaikalWriter<W: Write> {
    writer: BufWriter<W>,
    header: MainHeader,
    frames_written: u64,
}

impl<R: Read> BaikalReader<R> {
    /// Создаёт читатель, читая и декодируя главный заголовок из `inner`.
    pub fn new(inner: R) -> BaikalResult<Self> {
        let mut reader = BufReader::new(inner);
        let hdr_buf = read_at_most(&mut reader, MAIN_HEADER_SIZE)?;

        let header = MainHeader::deserialize(&hdr_buf)?;

        if !channel_count_plausible(header.channel_count) {
            return Err(BaikalError::invalid_format(format!(
                "implausible channel count {}",
                header.channel_count
            )));
        }

        Ok(Self {
            reader,
            header,
            channels: None,
        })
    }

    /// Декодированный главный заголовок.
    pub fn header(&self) -> &MainHeader {
        &self.header
    }

    /// Читает блок заголовков каналов (один раз, далее из кэша).
    pub fn read_channels(&mut self) -> BaikalResult<&[ChannelHeader]> {
        if self.channels.is_none() {
            let count = self.header.channels();
            let buf = read_at_most(&mut self.reader, count * CHANNEL_HEADER_SIZE)?;
            self.channels = Some(decode_channel_headers(&buf, count)?);
        }

        Ok(self.channels.as_deref().unwrap_or_default())
    }

    /// Дочитывает файл до конца и демультиплексирует данные.
    pub fn into_recording(mut self) -> BaikalResult<Recording> {
        self.read_channels()?;

        let mut raw = Vec::new();
        self.reader.read_to_end(&mut raw)?;

        let samples = demultiplex(
            &raw,
            self.header.channels(),
            self.header.sample_width(),
        )?;

        debug!(
            "Read {} channels x {} samples ({} data bytes)",
            self.header.channel_count,
            samples.samples_per_channel(),
            raw.len()
        );

        Ok(Recording {
            header: self.header,
            channels: self.channels.unwrap_or_default(),
            samples,
        })
    }
}

impl<W: Write> BaikalWriter<W> {
    /// Создаёт писатель, немедленно записывая заголовки в поток.
    pub fn new(
        inner: W,
        header: MainHeader,
        channels: &[ChannelHeader],
    ) -> BaikalResult<Self> {
        if !channel_count_plausible(header.channel_count) {
            return Err(BaikalError::format_violation(format!(
                "channel count {} outside 1..=6",
                header.channel_count
            )));
        }

        if channels.len() != header.channels() {
            return Err(BaikalError::format_violation(format!(
                "header declares {} channels, got {} channel headers",
                header.channel_count,
                channels.len()
            )));
        }

        let mut writer = BufWriter::new(inner);

        writer.write_all(&header.serialize()?)?;
        writer.write_all(&encode_channel_headers(channels)?)?;

        Ok(Self {
            writer,
            header,
            frames_written: 0,
        })
    }

    /// Записывает очередную порцию отсчётов: по массиву на канал.
    pub fn write_samples(
        &mut self,
        channels: &[Vec<i32>],
    ) -> BaikalResult<()> {
        if channels.len() != self.header.channels() {
            return Err(BaikalError::format_violation(format!(
                "expected {} sample arrays, got {}",
                self.header.channel_count,
                channels.len()
            )));
        }

        let raw = interleave(channels, self.header.sample_width())?;

        self.writer.write_all(&raw)?;
        self.frames_written += channels.first().map_or(0, Vec::len) as u64;

        Ok(())
    }

    /// Сбрасывает буфер и возвращает внутренний поток.
    pub fn finish(self) -> BaikalResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| BaikalError::Io(e.into_error()))
    }

    /// Число записанных кадров (отсчётов на канал).
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn header(&self) -> &MainHeader {
        &self.header
    }
}

/// Convenience: собирает файл целиком в памяти.
pub fn encode_recording(
    header: &MainHeader,
    channels: &[ChannelHeader],
    samples: &[Vec<i32>],
) -> BaikalResult<Vec<u8>> {
    let mut writer = BaikalWriter::new(Vec::new(), header.clone(), channels)?;
    writer.write_samples(samples)?;
    writer.finish()
}

/// Читает до `len` байт; меньше байт только на EOF.
fn read_at_most<R: Read>(
    reader: &mut R,
    len: usize,
) -> BaikalResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
