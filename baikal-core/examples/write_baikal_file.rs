//! Пример: запись файла Байкал через BaikalWriter
//!
//! Демонстрирует:
//! - заполнение главного заголовка и заголовков каналов
//! - генерацию синтетического трёхкомпонентного сигнала
//! - запись отсчётов порциями

use std::fs::File;

use baikal_core::{BaikalWriter, ChannelHeader, MainHeader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "baikal-core/test_output.00";

    // --- Заголовки ---
    let header = MainHeader {
        channel_count: 3,
        day: 17,
        month: 6,
        year: 2013,
        bit_depth: 32,
        station: "ARTK".to_string(),
        sampling_interval: 0.01,
        start_offset: 12.0 * 3600.0,
        latitude: 52.2431,
        longitude: 104.2715,
        ..MainHeader::default()
    };

    let channels: Vec<ChannelHeader> = ["Z", "NS", "EW"]
        .iter()
        .enumerate()
        .map(|(i, name)| ChannelHeader {
            phase_number: i as i16 + 1,
            name: name.to_string(),
            data_type: "velocity".to_string(),
            ..ChannelHeader::default()
        })
        .collect();

    let file = File::create(output_path)?;
    let mut writer = BaikalWriter::new(file, header, &channels)?;

    // --- Синусоида 1.5 Гц, 10 порций по 1 с ---
    let rate = 100.0_f64;
    for chunk in 0..10 {
        let frames: Vec<Vec<i32>> = (0..3)
            .map(|c| {
                (0..100)
                    .map(|i| {
                        let t = (chunk * 100 + i) as f64 / rate;
                        let phase = c as f64 * std::f64::consts::FRAC_PI_2;
                        (10_000.0 * (2.0 * std::f64::consts::PI * 1.5 * t + phase).sin()) as i32
                    })
                    .collect()
            })
            .collect();

        writer.write_samples(&frames)?;
    }

    let frames = writer.frames_written();
    writer.finish()?;

    println!("✓ Записано: {output_path}");
    println!("  Channels : {}", channels.len());
    println!("  Frames   : {frames}");

    Ok(())
}
