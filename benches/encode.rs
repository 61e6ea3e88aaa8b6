use criterion::{criterion_group, criterion_main, Criterion};
use frame_convert::{convert, Plane, PlanarYuvFrame, DEFAULT_QUALITY};

pub fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg");
    for dim in [
        (320, 240),
        (640, 480),
        (960, 540),
        (1280, 720),
        (1920, 1080),
        (3840, 2160),
    ]
    .iter()
    {
        let cw = (dim.0 + 1) / 2;
        let ch = (dim.1 + 1) / 2;
        let y: Vec<u8> = (0..dim.0 * dim.1).map(|i| (i % 251) as u8).collect();
        let u = vec![110u8; cw * ch];
        let v = vec![150u8; cw * ch];
        let bufs = (y, u, v);
        group.bench_with_input(format!("{}x{}", dim.0, dim.1), &bufs, |b, (y, u, v)| {
            let planes = [
                Plane::new(y, dim.0, 1),
                Plane::new(u, cw, 1),
                Plane::new(v, cw, 1),
            ];
            let frame = PlanarYuvFrame::new(dim.0 as u32, dim.1 as u32, &planes).unwrap();
            b.iter(|| convert(&frame, DEFAULT_QUALITY).unwrap())
        });
    }
}

criterion_group!(benches, benchmark_encode);
criterion_main!(benches);
