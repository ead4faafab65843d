#[macro_use]
extern crate criterion;

use criterion::Criterion;
use image::{ImageBuffer, Rgb, RgbImage};
use seamshrink::{calculate_energy, seamcarve, SeamFinder, SeamStrategy};

fn noise(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503)) >> 7;
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    })
}

fn energy_benchmark(c: &mut Criterion) {
    let img = noise(160, 120);
    c.bench_function("energy 160x120", move |b| b.iter(|| calculate_energy(&img)));
}

fn seam_benchmark(c: &mut Criterion) {
    let energy = calculate_energy(&noise(160, 120));
    c.bench_function("vertical seam 160x120", move |b| {
        b.iter(|| SeamStrategy::DynamicProgramming.find_vertical_seam(&energy))
    });
}

fn carve_benchmark(c: &mut Criterion) {
    let img = noise(64, 48);
    c.bench_function("carve 64x48 to 48x40", move |b| {
        b.iter(|| seamcarve(&img, 48, 40))
    });
}

criterion_group!(benches, energy_benchmark, seam_benchmark, carve_benchmark);
criterion_main!(benches);
