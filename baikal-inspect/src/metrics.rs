use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Счётчики, обновляемые lock-free из потоков-декодеров.
#[derive(Debug, Default)]
pub struct InspectMetrics {
    pub files_decoded: AtomicU64,
    pub files_skipped: AtomicU64,
    pub files_failed: AtomicU64,
    pub samples_decoded: AtomicU64,
    pub dropped_samples: AtomicU64,
}

/// Snapshot метрик для отображения / тестирования.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub duration_secs: f64,
    pub files_decoded: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub samples_decoded: u64,
    pub dropped_samples: u64,
    pub files_per_sec: f64,
}

impl InspectMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn files_total(&self) -> u64 {
        self.files_decoded.load(Ordering::Relaxed)
            + self.files_skipped.load(Ordering::Relaxed)
            + self.files_failed.load(Ordering::Relaxed)
    }

    /// Скорость разбора, файлов в секунду.
    pub fn files_per_sec(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.files_total() as f64 / secs
    }

    /// Итоговая сводка для вывода в конце запуска.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> MetricsSummary {
        MetricsSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            files_decoded: self.files_decoded.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            samples_decoded: self.samples_decoded.load(Ordering::Relaxed),
            dropped_samples: self.dropped_samples.load(Ordering::Relaxed),
            files_per_sec: self.files_per_sec(elapsed),
        }
    }
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.2}s", self.duration_secs)?;
        writeln!(f, "  Decoded       : {}", self.files_decoded)?;
        writeln!(f, "  Skipped       : {}", self.files_skipped)?;
        writeln!(f, "  Failed        : {}", self.files_failed)?;
        writeln!(f, "  Samples       : {}", self.samples_decoded)?;
        writeln!(f, "  Dropped tail  : {}", self.dropped_samples)?;
        writeln!(f, "  Speed         : {:.1} files/s", self.files_per_sec)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
