//! Benchmarks for dialog spawn/hide churn and layout.
//!
//! Run with: cargo bench -p ftui-dialog

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ftui_dialog::{
    ButtonSpec, CheckBoxSpec, Delegate, DialogConfig, DialogManager, EditBoxSpec, Payload,
};
use ftui_harness::HeadlessToolkit;
use ftui_layout::{EditBoxMetrics, LayoutMetrics, LayoutSnapshot, plan_width};

fn delegate(buttons: usize, editboxes: usize, checkboxes: usize) -> Rc<Delegate> {
    let mut d = Delegate::new("Are you sure you want to leave the group?");
    for n in 0..buttons {
        d = d.button(ButtonSpec::new(format!("Choice {n}"), |_, _, _| false));
    }
    for n in 0..editboxes {
        d = d.editbox(EditBoxSpec::new().label(format!("Field {n}")));
    }
    for n in 0..checkboxes {
        d = d.checkbox(CheckBoxSpec::new(format!("Option {n}")));
    }
    Rc::new(d)
}

// ============================================================================
// Spawn/hide churn
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialog/churn");

    for (name, widgets) in [("plain", (0, 0, 0)), ("buttons", (3, 0, 0)), ("form", (2, 2, 3))] {
        let d = delegate(widgets.0, widgets.1, widgets.2);
        let mut m = DialogManager::new(HeadlessToolkit::new(), DialogConfig::default());

        group.bench_with_input(BenchmarkId::new("spawn_hide", name), &(), |b, _| {
            b.iter(|| {
                let shown = m.spawn(&d, Payload::none());
                if let Ok(outcome) = shown
                    && let Some(id) = outcome.dialog()
                {
                    m.hide(black_box(id));
                }
            })
        });
    }

    group.finish();
}

fn bench_queue_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialog/queue");

    for backlog in [1usize, 4, 16] {
        let delegates: Vec<_> = (0..4 + backlog).map(|_| delegate(1, 0, 0)).collect();
        let mut m = DialogManager::new(HeadlessToolkit::new(), DialogConfig::default());

        group.bench_with_input(BenchmarkId::new("fill_and_dismiss", backlog), &(), |b, _| {
            b.iter(|| {
                for d in &delegates {
                    let _ = m.spawn(d, Payload::none());
                }
                while !m.active_dialogs().is_empty() {
                    black_box(m.dismiss_all());
                }
            })
        });
    }

    group.finish();
}

// ============================================================================
// Layout
// ============================================================================

fn bench_plan_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/plan_width");
    let metrics = LayoutMetrics::default();

    for count in [0usize, 2, 8] {
        let snap = LayoutSnapshot {
            button_count: 2,
            editboxes: (0..count)
                .map(|n| EditBoxMetrics {
                    width: 100.0 + 40.0 * n as f32,
                    label_width: 30.0,
                })
                .collect(),
            ..LayoutSnapshot::default()
        };
        group.bench_with_input(BenchmarkId::new("editboxes", count), &snap, |b, snap| {
            b.iter(|| black_box(plan_width(&metrics, black_box(snap))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_churn, bench_queue_drain, bench_plan_width);
criterion_main!(benches);
