// ABOUTME: Benchmark suite for message segmentation and inbound translation
// ABOUTME: Measures splitting per coding and mode, wire encoding of segments and frame translation

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use smpp_segmenter::codec::{Encodable, Frame};
use smpp_segmenter::datatypes::{DataCoding, DeliverSm};
use smpp_segmenter::model::{Address, Coding, Request, SplitMode};
use smpp_segmenter::segment::Segmenter;
use smpp_segmenter::translate;
use std::hint::black_box;
use std::time::Duration;

fn sample_request(coding: Coding, split_mode: SplitMode, len: usize) -> Request {
    let text = match coding {
        Coding::Ucs2 => "Привет, мир! ".repeat(len / 13 + 1),
        _ => "Hello {world} ".repeat(len / 14 + 1),
    };

    Request::builder()
        .source(Address::alphanumeric("ACME"))
        .destination(Address::international("447700900123"))
        .coding(coding)
        .split_mode(split_mode)
        .message(text.chars().take(len).collect::<String>())
        .build()
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    group.measurement_time(Duration::from_secs(10));

    let segmenter = Segmenter::new();
    for coding in [Coding::Gsm7, Coding::Gsm8, Coding::Ucs2] {
        for len in [100, 1_000, 10_000] {
            let request = sample_request(coding, SplitMode::Udh, len);
            group.bench_with_input(
                BenchmarkId::new(coding.name(), len),
                &request,
                |b, request| b.iter(|| segmenter.split(black_box(request)).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_split_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_modes");
    group.measurement_time(Duration::from_secs(10));

    let segmenter = Segmenter::new();
    for (name, mode) in [
        ("udh", SplitMode::Udh),
        ("sar", SplitMode::Sar),
        ("message_payload", SplitMode::MessagePayload),
    ] {
        let request = sample_request(Coding::Gsm7, mode, 2_000);
        group.bench_function(name, |b| {
            b.iter(|| segmenter.split(black_box(&request)).unwrap())
        });
    }

    group.finish();
}

fn bench_encode_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_segments");
    group.measurement_time(Duration::from_secs(10));

    let segments = Segmenter::new()
        .split(&sample_request(Coding::Gsm7, SplitMode::Udh, 1_000))
        .unwrap();

    group.bench_function("submit_sm", |b| {
        b.iter(|| {
            for segment in black_box(&segments) {
                black_box(segment.pdu.to_bytes().unwrap());
            }
        })
    });

    group.finish();
}

fn bench_inbound(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound");
    group.measurement_time(Duration::from_secs(10));

    let frames = [
        ("gsm7", DataCoding::SmscDefault, vec![0xC8, 0x32, 0x9B, 0xFD, 0x06]),
        ("ucs2", DataCoding::Ucs2, vec![0x04, 0x1F, 0x04, 0x40, 0x04, 0x38]),
        ("base64", DataCoding::Custom(0xF5), vec![0xDE, 0xAD, 0xBE, 0xEF]),
    ];

    for (name, data_coding, short_message) in frames {
        let wire = DeliverSm {
            sequence_number: 1,
            source_addr: "447700900123".to_string(),
            data_coding,
            short_message: short_message.into(),
            ..Default::default()
        }
        .to_bytes()
        .unwrap();

        group.bench_function(name, |b| {
            b.iter(|| {
                let frame = Frame::parse(black_box(&wire)).unwrap();
                translate::inbound(&frame, Coding::Gsm7)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_split,
    bench_split_modes,
    bench_encode_segments,
    bench_inbound
);
criterion_main!(benches);
