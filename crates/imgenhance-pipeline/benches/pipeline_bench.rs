// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the imgenhance-pipeline crate. Covers the
// per-pixel chain on its own, the chain with the widest blur, and a full
// render with sharpening.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use imgenhance_core::{EnhancementParams, ParamName};
use imgenhance_pipeline::{ImageBuffer, render};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A 256x256 gradient so every colour step has real work to do.
fn gradient() -> ImageBuffer {
    let (width, height) = (256u32, 256u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    ImageBuffer::from_rgba(width, height, data).expect("gradient dimensions are valid")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_colour_chain(c: &mut Criterion) {
    let source = gradient();
    let params = EnhancementParams::new(130.0, 120.0, 150.0, 0.0, 0.0);

    c.bench_function("colour chain (256x256)", |b| {
        b.iter(|| black_box(render(black_box(&source), black_box(&params))));
    });
}

fn bench_max_blur(c: &mut Criterion) {
    let source = gradient();
    let params = EnhancementParams::default().with(ParamName::BlurRadius, 10.0);

    c.bench_function("blur radius 10 (256x256)", |b| {
        b.iter(|| black_box(render(black_box(&source), black_box(&params))));
    });
}

fn bench_full_render(c: &mut Criterion) {
    let source = gradient();
    let params = EnhancementParams::new(110.0, 90.0, 120.0, 2.0, 40.0);

    c.bench_function("full render (256x256)", |b| {
        b.iter(|| black_box(render(black_box(&source), black_box(&params))));
    });
}

criterion_group!(benches, bench_colour_chain, bench_max_blur, bench_full_render);
criterion_main!(benches);
