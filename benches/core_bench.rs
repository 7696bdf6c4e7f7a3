use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use minemap_editor::core::{EdgeRecord, MapElement, MapSettings, NodeRecord};
use minemap_editor::labels::{Label, LabelOverlay, NodeRef};
use minemap_editor::{MapModel, RetainedScene};
use std::hint::black_box;

fn build_synthetic_model(node_count: usize) -> MapModel<RetainedScene> {
    let mut model = MapModel::new(RetainedScene::new(false), MapSettings::default());

    for index in 0..node_count {
        let column = (index % 100) as f64;
        let row = (index / 100) as f64;
        let layer = format!("Sohle {}", index % 4);
        model
            .add_element(MapElement::Node(
                NodeRecord::new(index.to_string(), column * 5.0, row * 5.0, -(row * 0.5))
                    .in_layer(layer.clone()),
            ))
            .expect("gueltiger Node");
        if index >= 4 {
            model
                .add_element(MapElement::Edge(
                    EdgeRecord::new(
                        format!("e{}", index),
                        (index - 4).to_string(),
                        index.to_string(),
                    )
                    .in_layer(layer),
                ))
                .expect("gueltige Kante");
        }
    }

    model
}

fn build_overlay(label_count: usize) -> LabelOverlay {
    let mut overlay = LabelOverlay::new();
    for index in 0..label_count {
        let mut label = Label::new(NodeRef::new("L", index.to_string()), vec![index.to_string()])
            .with_size(DVec2::new(80.0, 24.0));
        // Dicht gepackte Anker, damit fast jedes Paar kollidiert
        label.anchor = DVec2::new((index % 20) as f64 * 12.0, (index / 20) as f64 * 8.0);
        label.visible = true;
        overlay.add(label);
    }
    overlay
}

fn bench_map_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_draw");

    for &node_count in &[1_000usize, 10_000usize] {
        group.bench_with_input(
            BenchmarkId::new("draw_map", node_count),
            &node_count,
            |b, &count| {
                b.iter_batched(
                    || build_synthetic_model(count),
                    |mut model| {
                        let report = pollster::block_on(model.draw_map());
                        black_box(report.primitives())
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    for &node_count in &[1_000usize, 10_000usize] {
        group.bench_with_input(
            BenchmarkId::new("redraw_map", node_count),
            &node_count,
            |b, &count| {
                b.iter_batched(
                    || {
                        let mut model = build_synthetic_model(count);
                        pollster::block_on(model.draw_map());
                        model
                    },
                    |mut model| {
                        let report = pollster::block_on(model.draw_map());
                        model.destroy_map();
                        black_box(report.primitives())
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_label_spread(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_spread");

    for &label_count in &[50usize, 200usize] {
        group.bench_with_input(
            BenchmarkId::new("spread", label_count),
            &label_count,
            |b, &count| {
                b.iter_batched(
                    || build_overlay(count),
                    |mut overlay| black_box(overlay.spread(5.0, 20.0)),
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(core_benches, bench_map_draw, bench_label_spread);
criterion_main!(core_benches);
