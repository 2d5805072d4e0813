use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ubimkvol::args::parse_size;
use ubimkvol::resolve;

fn benchmark_resolution(c: &mut Criterion) {
    let tokens = [
        "ubimkvol", "/dev/ubi0", "-N", "rootfs", "-s", "120MiB", "-t", "static", "-a", "2048",
    ];

    c.bench_function("resolve_full_command_line", |b| {
        b.iter(|| resolve(black_box(tokens)).unwrap());
    });

    c.bench_function("parse_size_with_suffix", |b| {
        b.iter(|| parse_size(black_box("0x40MiB")).unwrap());
    });
}

criterion_group!(benches, benchmark_resolution);
criterion_main!(benches);
