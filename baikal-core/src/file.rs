use std::{
    fs::File,
    path::{Path, PathBuf},
};

use baikal_types::{BaikalError, BaikalResult, ChannelHeader, MainHeader};
use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::{
    format::MainHeaderExt,
    serialization::{BaikalReader, Recording},
    time::file_start_time,
    validator::is_baikal,
};

/// Файл формата Байкал, декодированный целиком при открытии.
///
/// Состояние определяется один раз и больше не меняется:
/// * Valid: заголовки и данные заполнены;
/// * Invalid: файл не прошёл проверку, доступно только имя.
#[derive(Debug, Clone)]
pub struct BaikalFile {
    filename: PathBuf,
    state: FileState,
}

#[derive(Debug, Clone)]
enum FileState {
    Invalid,
    Valid(Box<Recording>),
}

/// Заголовки файла без чтения области данных.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeaders {
    pub header: MainHeader,
    pub channels: Vec<ChannelHeader>,
    /// Размер области данных по длине файла, байт
    pub data_len: u64,
}

impl FileHeaders {
    fn element_count(&self) -> usize {
        self.data_len as usize / self.header.sample_width().sample_size()
    }

    /// Отсчётов на канал, которые даст полное чтение.
    pub fn samples_per_channel(&self) -> usize {
        self.element_count() / self.header.channels().max(1)
    }

    /// Отсчётов, которые полное чтение отбросит с конца.
    pub fn dropped_samples(&self) -> usize {
        self.element_count() % self.header.channels().max(1)
    }
}

/// Проверяет файл и читает только заголовки.
///
/// `Ok(None)` для файла, не прошедшего проверку. Область данных не читается,
/// её размер берётся из длины файла.
pub fn read_headers<P: AsRef<Path>>(path: P) -> BaikalResult<Option<FileHeaders>> {
    let path = path.as_ref();

    if !is_baikal(path) {
        warn!("Skipping file {}: not a Baikal recording", path.display());
        return Ok(None);
    }

    let file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let mut reader = BaikalReader::new(file)?;
    let channels = reader.read_channels()?.to_vec();
    let header = reader.header().clone();
    let data_len = file_len.saturating_sub(header.data_offset() as u64);

    debug!(
        "Headers of {}: kan={}, {data_len} data bytes",
        path.display(),
        header.channel_count
    );

    Ok(Some(FileHeaders {
        header,
        channels,
        data_len,
    }))
}

impl BaikalFile {
    /// Проверяет и читает файл.
    ///
    /// Непрошедший проверку файл даёт `Ok` в состоянии Invalid. Ошибка
    /// возвращается только если проверка прошла, а чтение не удалось
    /// (усечённые заголовки, ошибка ввода/вывода).
    pub fn open<P: AsRef<Path>>(path: P) -> BaikalResult<Self> {
        let filename = path.as_ref().to_path_buf();

        if !is_baikal(&filename) {
            warn!("Skipping file {}: not a Baikal recording", filename.display());
            return Ok(Self {
                filename,
                state: FileState::Invalid,
            });
        }

        let file = File::open(&filename)?;
        let recording = BaikalReader::new(file)?.into_recording()?;

        debug!(
            "Decoded {}: station={}, kan={}, razr={}",
            filename.display(),
            recording.header.station,
            recording.header.channel_count,
            recording.header.bit_depth
        );

        Ok(Self {
            filename,
            state: FileState::Valid(Box::new(recording)),
        })
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, FileState::Valid(_))
    }

    /// Полное содержимое (только для Valid).
    pub fn recording(&self) -> Option<&Recording> {
        match &self.state {
            FileState::Valid(rec) => Some(&**rec),
            FileState::Invalid => None,
        }
    }

    pub fn main_header(&self) -> Option<&MainHeader> {
        self.recording().map(|r| &r.header)
    }

    pub fn channels(&self) -> Option<&[ChannelHeader]> {
        self.recording().map(|r| r.channels.as_slice())
    }

    /// Массивы отсчётов, индекс совпадает с индексом в [`channels`].
    ///
    /// [`channels`]: BaikalFile::channels
    pub fn data(&self) -> Option<&[Vec<i32>]> {
        self.recording().map(|r| r.samples.channels.as_slice())
    }

    /// Абсолютное время первого отсчёта.
    pub fn start_time(&self) -> BaikalResult<DateTime<Utc>> {
        let header = self.main_header().ok_or_else(|| {
            BaikalError::invalid_format(format!(
                "{} is not a valid Baikal file",
                self.filename.display()
            ))
        })?;

        file_start_time(header)
    }

    pub fn into_recording(self) -> Option<Recording> {
        match self.state {
            FileState::Valid(rec) => Some(*rec),
            FileState::Invalid => None,
        }
    }
}
