//! Пример: чтение файла Байкал
//!
//! Демонстрирует:
//! - быструю проверку формата и полное чтение через BaikalFile
//! - вывод главного заголовка и заголовков каналов
//! - построение трасс

use baikal_core::{traces_from_file, BaikalFile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "baikal-core/test_output.00".to_string());

    let file = BaikalFile::open(&input_path)?;

    let Some(h) = file.main_header() else {
        eprintln!("✗ {input_path}: не файл формата Байкал");
        return Ok(());
    };

    println!("✓ Header decoded");
    println!("  Station       : {}", h.station);
    println!("  Date          : {:04}-{:02}-{:02}", h.year, h.month, h.day);
    println!("  Start (to)    : {} s", h.start_offset);
    println!("  dt            : {} s", h.sampling_interval);
    println!("  Channels      : {}", h.channel_count);
    println!("  razr          : {} ({:?})", h.bit_depth, h.sample_width());
    println!("  Start time    : {}", file.start_time()?);

    for (i, ch) in file.channels().unwrap_or_default().iter().enumerate() {
        println!(
            "  [{i}] {:<4} type={:<10} koef={}",
            ch.name, ch.data_type, ch.coefficient
        );
    }

    println!("\nTraces:");
    for trace in traces_from_file(&file)?.iter() {
        let peak = trace.data.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
        println!(
            "  {} {} samples @ {} Hz, peak={peak}",
            trace.id(),
            trace.npts(),
            trace.sampling_rate
        );
    }

    Ok(())
}
