use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fbgpu::core::{Font, GlyphRecord, MemoryDevice};
use fbgpu::FbGpu;

const NARROW: u16 = 0x41;
const WIDE: u16 = 0x4E00;

/// Font with one narrow and one wide checkerboard glyph
fn bench_font() -> Font {
    let mut font = Font::empty();
    font.insert(NARROW, GlyphRecord::narrow([0xAA; 16]));
    font.insert(WIDE, GlyphRecord::wide([0xAAAA; 16]));
    font
}

fn gpu_at(depth: u32) -> FbGpu {
    let mut device = MemoryDevice::new(1024, 768).accepting(&[depth]);
    let mut gpu = FbGpu::start(&mut device, bench_font()).expect("memory device starts");
    gpu.set_palette(0, 0x000000);
    gpu.set_palette(1, 0xFFFFFF);
    gpu
}

/// Benchmark: single glyph blit at each depth and width
fn bench_put_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_single");
    for depth in [16, 32] {
        for (label, code) in [("narrow", NARROW), ("wide", WIDE)] {
            let mut gpu = gpu_at(depth);
            group.bench_with_input(
                BenchmarkId::new(label, depth),
                &code,
                |b, &code| {
                    b.iter(|| gpu.put(black_box(3), black_box(5), 0, 1, code as i64))
                },
            );
        }
    }
    group.finish();
}

/// Benchmark: fill the whole 128x48 grid
fn bench_full_screen(c: &mut Criterion) {
    let mut gpu = gpu_at(32);
    let (cols, rows) = (gpu.width() as i64, gpu.height() as i64);

    c.bench_function("put_full_screen_32bpp", |b| {
        b.iter(|| {
            for y in 0..rows {
                for x in 0..cols {
                    gpu.put(x, y, 0, 1, NARROW as i64);
                }
            }
            black_box(gpu.pixels()[0])
        })
    });
}

/// Benchmark: rejected calls should cost next to nothing
fn bench_rejected_put(c: &mut Criterion) {
    let mut gpu = gpu_at(32);
    c.bench_function("put_rejected", |b| {
        b.iter(|| gpu.put(black_box(-1), 0, 0, 1, NARROW as i64))
    });
}

criterion_group!(benches, bench_put_single, bench_full_screen, bench_rejected_put);
criterion_main!(benches);
