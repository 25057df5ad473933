//! Benchmarks for spec parsing, axis solving, full passes and drag frames.
//!
//! Run with: cargo bench -p sash-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sash_layout::convert::solve_axis;
use sash_layout::{
    LayoutTree, NullHost, Orientation, PointerEvent, Rect, SashDragController, SashLayout,
    SashLayoutConfig, SizeSpec, SpecEncoding, WidgetId,
};
use std::hint::black_box;

fn mixed_spec(i: usize) -> &'static str {
    match i % 5 {
        0 => "50",
        1 => "120px",
        2 => "min:20px;max:40%;30",
        3 => "fixed;60px",
        _ => "10;max:300px",
    }
}

/// Alternating-orientation tree `depth` levels deep, `fanout` children per split.
fn make_tree(depth: usize, fanout: usize) -> LayoutTree {
    let mut tree = LayoutTree::new(Orientation::Horizontal);
    let mut frontier = vec![(tree.root(), Orientation::Horizontal)];
    for level in 0..depth {
        let mut next = Vec::new();
        for (parent, orientation) in frontier {
            for i in 0..fanout {
                let data = mixed_spec(i);
                if level + 1 == depth {
                    let leaf = tree.add_leaf(parent, data).unwrap();
                    tree.set_widget(leaf, Some(WidgetId(leaf.get()))).unwrap();
                } else {
                    let flipped = match orientation {
                        Orientation::Horizontal => Orientation::Vertical,
                        Orientation::Vertical => Orientation::Horizontal,
                    };
                    let split = tree.add_split(parent, flipped, data).unwrap();
                    next.push((split, flipped));
                }
            }
        }
        frontier = next;
    }
    tree
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sash/parse");
    for text in ["50", "min:20px;max:80%;50%", "weighted;10000", "fixed:120px"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), &text, |b, text| {
            b.iter(|| black_box(SizeSpec::parse(SpecEncoding::Extended, text)))
        });
    }
    group.finish();
}

fn bench_solve_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("sash/solve_axis");
    for n in [2, 5, 10, 50] {
        let specs: Vec<SizeSpec> = (0..n)
            .map(|i| SizeSpec::parse(SpecEncoding::Extended, mixed_spec(i)))
            .collect();
        group.bench_with_input(BenchmarkId::new("children", n), &specs, |b, specs| {
            b.iter(|| black_box(solve_axis(specs, 1920.0, 4.0)))
        });
    }
    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("sash/layout");
    for (depth, fanout) in [(1, 4), (2, 4), (3, 4), (4, 3)] {
        let tree = make_tree(depth, fanout);
        group.bench_with_input(
            BenchmarkId::new("tree", format!("{depth}x{fanout}")),
            &tree,
            |b, tree| {
                b.iter_batched(
                    || (tree.clone(), SashLayout::new(SashLayoutConfig::default())),
                    |(mut tree, mut layout)| {
                        black_box(layout.layout(&mut tree, &mut NullHost, Rect::from_size(1920, 1080)))
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_drag_frame(c: &mut Criterion) {
    let mut tree = make_tree(3, 4);
    let mut layout = SashLayout::new(SashLayoutConfig::default());
    layout.layout(&mut tree, &mut NullHost, Rect::from_size(1920, 1080));
    let Some(sash) = layout.sashes().first().copied() else {
        return;
    };
    let start = sash.rect.x + 1;
    let y = sash.rect.y + sash.rect.height / 2;
    let mut controller = SashDragController::new();
    controller.handle_event(&mut layout, &mut tree, &mut NullHost, &PointerEvent::down(start, y));

    let mut offset = 0;
    c.bench_function("sash/drag_frame", |b| {
        b.iter(|| {
            offset = (offset + 7) % 200;
            black_box(controller.handle_event(
                &mut layout,
                &mut tree,
                &mut NullHost,
                &PointerEvent::drag(start - 100 + offset, y),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_solve_axis,
    bench_full_pass,
    bench_drag_frame
);
criterion_main!(benches);
