use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

use baikal_inspect::{
    write_json, write_text, FileStatus, InspectConfig, InspectPipeline, InspectResult,
    OutputFormat,
};
use clap::Parser;
use log::{error, info, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "baikal-inspect",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode Baikal seismograph files and report headers and channels",
    long_about = None,
)]
struct Cli {
    /// Файлы .00 или каталоги с ними
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Формат отчёта: text, json
    #[arg(short, long, default_value = "text")]
    format: String,
    /// Число потоков-декодеров
    #[arg(short, long, default_value = "4")]
    workers: usize,
    /// Читать только заголовки, область данных пропускать
    #[arg(long)]
    headers_only: bool,
    /// Файл для отчёта (по умолчанию stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
    /// Подробный лог (debug)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let format: OutputFormat = match cli.format.parse() {
        Ok(f) => f,
        Err(e) => {
            error!("--format: {e}");
            std::process::exit(1);
        }
    };

    let config = InspectConfig {
        inputs: cli.inputs,
        format,
        workers: cli.workers,
        headers_only: cli.headers_only,
        output_path: cli.output,
    };

    match run(config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            error!("Inspection failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Возвращает `false`, если хотя бы один файл не удалось прочитать.
fn run(config: InspectConfig) -> InspectResult<bool> {
    config.validate()?;

    let files = config.collect_files()?;
    let format = config.format;
    let output_path = config.output_path.clone();

    let session_start = Instant::now();
    let (pipeline, metrics) = InspectPipeline::new(config);
    let reports = pipeline.run(files)?;

    match output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(&path)?);
            write_report(&mut out, format, &reports)?;
            info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&mut stdout.lock(), format, &reports)?;
        }
    }

    // --- Итоговая статистика ---
    let summary = metrics.summary(&session_start);
    info!("\n{summary}");

    Ok(reports.iter().all(|r| r.status != FileStatus::Failed))
}

fn write_report<W: std::io::Write>(
    out: &mut W,
    format: OutputFormat,
    reports: &[baikal_inspect::FileReport],
) -> InspectResult<()> {
    match format {
        OutputFormat::Text => write_text(out, reports),
        OutputFormat::Json => write_json(out, reports),
    }
}
