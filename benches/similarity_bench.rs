use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

use course_sync::{CourseSnapshot, rank, score};

const CATEGORIES: [&str; 6] = ["programming", "design", "business", "music", "math", "languages"];
const TAGS: [&str; 12] = [
    "rust", "go", "web", "async", "ui", "figma", "finance", "guitar", "algebra", "spanish",
    "databases", "testing",
];
const WORDS: [&str; 16] = [
    "learn", "build", "intro", "advanced", "practical", "course", "the", "and", "for", "with",
    "projects", "from", "scratch", "modern", "systems", "fundamentals",
];

fn random_course(rng: &mut StdRng, id: usize) -> CourseSnapshot {
    let tag_count = rng.gen_range(0..5);
    let tags: Vec<&str> = (0..tag_count).map(|_| TAGS[rng.gen_range(0..TAGS.len())]).collect();
    let word_count = rng.gen_range(0..20);
    let description: Vec<&str> = (0..word_count)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect();

    CourseSnapshot::new(format!("course-{}", id), format!("Course {}", id))
        .with_category(CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
        .with_tags(tags)
        .with_description(description.join(" "))
}

fn catalog(size: usize) -> Vec<CourseSnapshot> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size).map(|id| random_course(&mut rng, id)).collect()
}

fn bench_score(c: &mut Criterion) {
    let courses = catalog(2);
    c.bench_function("score_pair", |b| {
        b.iter(|| score(black_box(&courses[0]), black_box(&courses[1])))
    });
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_catalog");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let courses = catalog(size);
            let target = courses[0].clone();
            b.iter(|| rank(black_box(&target), black_box(courses.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_score, bench_rank);
criterion_main!(benches);
