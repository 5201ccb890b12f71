use std::{
    path::{Path, PathBuf},
    sync::{atomic::Ordering, Arc},
    thread,
};

use baikal_core::{decode_one, read_headers, FileOutcome};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

use crate::{
    metrics::InspectMetrics,
    report::FileReport,
    InspectConfig, InspectError, InspectResult,
};

/// Пул потоков-декодеров над списком файлов.
pub struct InspectPipeline {
    config: InspectConfig,
    metrics: Arc<InspectMetrics>,
}

impl InspectPipeline {
    /// Создаёт пайплайн. Возвращает также shared-ссылку на метрики.
    pub fn new(config: InspectConfig) -> (Self, Arc<InspectMetrics>) {
        let metrics = InspectMetrics::new();
        let p = Self {
            config,
            metrics: metrics.clone(),
        };

        (p, metrics)
    }

    /// Разбирает файлы параллельно. Порядок отчётов совпадает с порядком `files`.
    pub fn run(
        self,
        files: Vec<PathBuf>,
    ) -> InspectResult<Vec<FileReport>> {
        let total = files.len();
        let workers = self.config.workers.clamp(1, total.max(1));

        info!("Inspecting {total} file(s) with {workers} worker(s)");

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, PathBuf)>(workers * 2);
        let (res_tx, res_rx) = crossbeam_channel::unbounded::<(usize, FileReport)>();

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let rx = job_rx.clone();
                let tx = res_tx.clone();
                let metrics = self.metrics.clone();
                let headers_only = self.config.headers_only;

                thread::spawn(move || worker_loop(id, rx, tx, metrics, headers_only))
            })
            .collect();

        // Воркеры держат свои клоны, исходные концы больше не нужны
        drop(job_rx);
        drop(res_tx);

        for job in files.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                warn!("All workers exited early");
                break;
            }
        }
        drop(job_tx);

        let mut slots: Vec<Option<FileReport>> = vec![None; total];
        for (idx, report) in res_rx.iter() {
            slots[idx] = Some(report);
        }

        for h in handles {
            if h.join().is_err() {
                return Err(InspectError::Pipeline("worker thread panicked".to_string()));
            }
        }

        let reports: Vec<FileReport> = slots.into_iter().flatten().collect();

        if reports.len() != total {
            return Err(InspectError::Pipeline(format!(
                "expected {total} reports, got {}",
                reports.len()
            )));
        }

        Ok(reports)
    }
}

fn worker_loop(
    id: usize,
    rx: Receiver<(usize, PathBuf)>,
    tx: Sender<(usize, FileReport)>,
    metrics: Arc<InspectMetrics>,
    headers_only: bool,
) {
    for (idx, path) in rx.iter() {
        debug!("Worker {id}: {}", path.display());

        let report = if headers_only {
            inspect_headers(&path, &metrics)
        } else {
            let outcome = decode_one(&path);
            record(&metrics, &outcome);
            FileReport::from_outcome(&outcome)
        };

        if tx.send((idx, report)).is_err() {
            warn!("Worker {id}: result channel closed");
            break;
        }
    }
}

/// Только заголовки: область данных не читается.
fn inspect_headers(
    path: &Path,
    metrics: &InspectMetrics,
) -> FileReport {
    match read_headers(path) {
        Ok(Some(headers)) => {
            metrics.files_decoded.fetch_add(1, Ordering::Relaxed);
            FileReport::from_headers(path, &headers)
        }
        Ok(None) => {
            metrics.files_skipped.fetch_add(1, Ordering::Relaxed);
            FileReport::skipped(path)
        }
        Err(e) => {
            error!("Failed to read headers of {}: {e}", path.display());
            metrics.files_failed.fetch_add(1, Ordering::Relaxed);
            FileReport::failed(path, &e)
        }
    }
}

fn record(
    metrics: &InspectMetrics,
    outcome: &FileOutcome,
) {
    match outcome {
        FileOutcome::Decoded(file) => {
            metrics.files_decoded.fetch_add(1, Ordering::Relaxed);

            if let Some(rec) = file.recording() {
                let samples: usize = rec.samples.channels.iter().map(Vec::len).sum();
                metrics
                    .samples_decoded
                    .fetch_add(samples as u64, Ordering::Relaxed);
                metrics
                    .dropped_samples
                    .fetch_add(rec.samples.dropped_samples as u64, Ordering::Relaxed);
            }
        }
        FileOutcome::Skipped(_) => {
            metrics.files_skipped.fetch_add(1, Ordering::Relaxed);
        }
        FileOutcome::Failed(..) => {
            metrics.files_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}
