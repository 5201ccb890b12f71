//! Бенчмарки демультиплексирования и полного декодирования.

use std::hint::black_box;

use baikal_core::{
    demultiplex, encode_recording, BaikalReader, ChannelHeader, MainHeader, SampleWidth,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Одна минута записи на 100 Гц.
const SAMPLES_PER_CHANNEL: usize = 6_000;

fn random_channels(
    kan: usize,
    width: SampleWidth,
) -> Vec<Vec<i32>> {
    let mut rng = StdRng::seed_from_u64(42);
    let bound = match width {
        SampleWidth::Int16 => i16::MAX as i32,
        SampleWidth::Int32 => i32::MAX,
    };

    (0..kan)
        .map(|_| {
            (0..SAMPLES_PER_CHANNEL)
                .map(|_| rng.gen_range(-bound..bound))
                .collect()
        })
        .collect()
}

fn encoded(
    kan: usize,
    bit_depth: i16,
) -> Vec<u8> {
    let header = MainHeader {
        channel_count: kan as i16,
        bit_depth,
        ..MainHeader::default()
    };
    let channels = vec![ChannelHeader::default(); kan];
    let samples = random_channels(kan, header.sample_width());

    encode_recording(&header, &channels, &samples).unwrap()
}

fn bench_demultiplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("demultiplex");

    for (kan, bit_depth) in [(3usize, 16i16), (3, 32), (6, 32)] {
        let bytes = encoded(kan, bit_depth);
        let data_offset = 120 + 72 * kan;
        let raw = &bytes[data_offset..];
        let width = SampleWidth::from_bit_depth(bit_depth);

        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("kan{kan}"), bit_depth),
            &raw,
            |b, raw| b.iter(|| demultiplex(black_box(raw), kan, width).unwrap()),
        );
    }

    group.finish();
}

fn bench_full_decode(c: &mut Criterion) {
    let bytes = encoded(3, 32);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("reader_3ch_i32", |b| {
        b.iter(|| {
            let reader = BaikalReader::new(black_box(bytes.as_slice())).unwrap();
            reader.into_recording().unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_demultiplex, bench_full_decode);
criterion_main!(benches);
