//! Benchmarks for list and calendar derivations.
//!
//! These run on every render, so they are measured over a collection larger
//! than a personal list usually gets.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fake::{Fake, Faker};
use flow::model::sort::{build_task_map, group_for_list, sort_for_list};
use flow::model::Task;

fn tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| {
            let mut task: Task = Faker.fake();
            task.date = match i % 4 {
                0 => None,
                n => Some(format!("2024-01-{:02}", (i % 28) + n)),
            };
            task.start_time = if i % 3 == 0 {
                None
            } else {
                Some(format!("{:02}:{:02}", 7 + i % 14, (i * 7) % 60))
            };
            task
        })
        .collect()
}

fn bench_sort_for_list(c: &mut Criterion) {
    let tasks = tasks(1000);
    c.bench_function("sort_for_list_1000", |b| {
        b.iter(|| sort_for_list(black_box(&tasks)).len())
    });
}

fn bench_group_for_list(c: &mut Criterion) {
    let tasks = tasks(1000);
    c.bench_function("group_for_list_1000", |b| {
        b.iter(|| group_for_list(black_box(&tasks)).len())
    });
}

fn bench_build_task_map(c: &mut Criterion) {
    let tasks = tasks(1000);
    c.bench_function("build_task_map_1000", |b| {
        b.iter(|| build_task_map(black_box(&tasks)).len())
    });
}

criterion_group!(
    benches,
    bench_sort_for_list,
    bench_group_for_list,
    bench_build_task_map
);
criterion_main!(benches);
