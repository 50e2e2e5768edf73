//! Criterion benchmarks for the CR LF frame codec.
//!
//! Measures encode latency and streaming-decode throughput for payload sizes
//! around the bridge's default read buffer (1024 bytes).
//!
//! Run with:
//! ```bash
//! cargo bench --package bridge-core --bench framing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bridge_core::framing::{decode_frames, encode_frame, FrameDecoder};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A payload of `len` bytes that does not contain the delimiter.
fn make_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 | 0x01).collect()
}

/// A wire buffer of `count` frames, each `len` bytes.
fn make_wire(count: usize, len: usize) -> Vec<u8> {
    let payload = make_payload(len);
    let mut wire = Vec::with_capacity(count * (len + 2));
    for _ in 0..count {
        wire.extend_from_slice(&encode_frame(&payload));
    }
    wire
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    for size in [16usize, 256, 1024, 4096] {
        let payload = make_payload(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, p| {
            b.iter(|| encode_frame(black_box(p)));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_frames");
    for size in [16usize, 256, 1024] {
        let wire = make_wire(32, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &wire, |b, w| {
            b.iter(|| decode_frames(black_box(w)));
        });
    }
    group.finish();
}

/// Streaming decode: the wire buffer arrives in read-sized chunks, the way
/// the TCP forwarder feeds the decoder.
fn bench_streaming_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_decoder_feed");
    for chunk in [64usize, 1024] {
        let wire = make_wire(64, 200);
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &wire, |b, w| {
            b.iter(|| {
                let mut decoder = FrameDecoder::with_capacity(chunk);
                let mut total = 0usize;
                for piece in w.chunks(chunk) {
                    total += decoder.feed(black_box(piece)).len();
                }
                total
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_streaming_decode);
criterion_main!(benches);
