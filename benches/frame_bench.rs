use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sort_tracker::{DetectionBox, Rect, SortTracker, TrackerConfig};

/// A grid of `n` boxes drifting right by `t` pixels per frame.
fn make_frame(n: usize, t: f32) -> Vec<DetectionBox> {
    let cols = (n as f32).sqrt().ceil() as usize;
    (0..n)
        .map(|i| {
            let x = (i % cols) as f32 * 40.0 + t;
            let y = (i / cols) as f32 * 40.0;
            DetectionBox::new(Rect::new(x, y, 30.0, 30.0), 0.9, 0)
        })
        .collect()
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for n in [10, 50, 200] {
        group.bench_function(format!("{n}_objects"), |b| {
            b.iter(|| {
                let mut tracker = SortTracker::new(TrackerConfig::default());
                // Warm up with one frame to create tracks
                tracker.update(&make_frame(n, 0.0));
                let frame = make_frame(n, 2.0);
                black_box(tracker.update(&frame));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
