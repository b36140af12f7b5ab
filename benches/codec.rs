//! Encode/decode throughput.
//!
//! Run with: `cargo bench --bench codec`
//!
//! Documents scale by task count; each task has two benefits, a dependency
//! on its predecessor and a stakeholder drawn from a fixed pool of persons.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;

use canvas_crate::types::{Agent, Governance, GovernanceStage, Stakeholder};
use canvas_crate::{
    decode, encode, import_container, normalize, Benefit, BenefitKind, CanvasDocument, Direction,
    EncodeOptions, Person, Task,
};

const PERSONS: usize = 12;

/// Create a document with `task_count` tasks.
fn make_document(task_count: usize) -> CanvasDocument {
    let mut doc = CanvasDocument::new("Benchmark project", "Synthetic workload");
    for i in 0..PERSONS {
        doc.persons.push(
            Person::new(format!("p{}", i), format!("Person {}", i))
                .with_external_id(format!("https://orcid.org/0000-0000-0000-{:04}", i)),
        );
    }
    for i in 0..task_count {
        let mut task = Task::new(format!("req-{}", i), format!("Task {}", i))
            .with_benefit(Benefit::numeric(
                BenefitKind::Time,
                "processingTime",
                Direction::DecreaseIsBetter,
                10.0,
                2.0,
            ))
            .with_benefit(
                Benefit::numeric(BenefitKind::Quality, "accuracy", Direction::TargetIsBetter, 80.0, 92.0)
                    .with_target(95.0),
            );
        if i > 0 {
            task = task.depending_on(format!("req-{}", i - 1));
        }
        task.stakeholders.push(format!("p{}", i % PERSONS));
        doc.tasks_mut().push(task);
    }
    if let Some(expectations) = doc.user_expectations.as_mut() {
        expectations.stakeholders.push(Stakeholder {
            person_id: "p0".into(),
            role: Some("Sponsor".into()),
            ..Default::default()
        });
    }
    doc.governance = Some(Governance {
        stages: (0..4)
            .map(|s| {
                GovernanceStage::new(format!("stage-{}", s), format!("Stage {}", s))
                    .with_agent(Agent::person(format!("p{}", s), "Reviewer"))
            })
            .collect(),
    });
    doc
}

fn bench_encode(c: &mut Criterion) {
    let options = EncodeOptions::default();
    let mut group = c.benchmark_group("encode");

    for task_count in [1, 10, 50, 200] {
        let doc = make_document(task_count);
        group.throughput(Throughput::Elements(task_count as u64));
        group.bench_with_input(BenchmarkId::new("tasks", task_count), &doc, |b, doc| {
            b.iter(|| encode(black_box(doc), &options))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let options = EncodeOptions::default();
    let mut group = c.benchmark_group("decode");

    for task_count in [1, 10, 50, 200] {
        let container = encode(&make_document(task_count), &options).container;
        group.throughput(Throughput::Elements(task_count as u64));
        group.bench_with_input(BenchmarkId::new("tasks", task_count), &container, |b, container| {
            b.iter(|| {
                let doc = decode(black_box(container)).unwrap();
                assert_eq!(doc.tasks().len(), task_count);
                doc
            })
        });
    }

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let options = EncodeOptions::default();
    let side_files = HashMap::new();
    let mut group = c.benchmark_group("import");

    for task_count in [10, 200] {
        let container = encode(&make_document(task_count), &options).container;
        group.bench_with_input(BenchmarkId::new("tasks", task_count), &container, |b, container| {
            b.iter(|| import_container(black_box(container), &side_files).unwrap())
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let doc = make_document(200);
    c.bench_function("normalize/200", |b| b.iter(|| normalize(black_box(&doc))));
}

criterion_group!(benches, bench_encode, bench_decode, bench_import, bench_normalize);
criterion_main!(benches);
