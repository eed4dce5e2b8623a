use criterion::{black_box, criterion_group, criterion_main, Criterion};
use youtube_digest::{
    extract_chapters, format_timestamp, interleave_digest, reconcile, ChapterOrigin,
    ContentSection, KeyPoint, KeyPoints, StructuredDigest, Tangent,
};

/// A raw model digest with duplicates, tangent-only sections and shuffled order
fn raw_digest(sections: u32) -> StructuredDigest {
    let mut out = Vec::new();
    for i in (0..sections).rev() {
        let start = i * 120;
        let points = if i % 5 == 3 {
            vec![KeyPoint::tangent("aside", format_timestamp(start + 10))]
        } else {
            (0..4)
                .rev()
                .map(|p| KeyPoint::new(format!("point {}", p), format_timestamp(start + p * 20)))
                .collect()
        };
        out.push(ContentSection {
            title: format!("Section {}", i % (sections - 2).max(1)),
            timestamp_start: format_timestamp(start),
            timestamp_end: format_timestamp(start + 120),
            key_points: KeyPoints::Timestamped(points),
        });
    }
    StructuredDigest {
        summary: "bench".to_string(),
        sections: out,
        ..StructuredDigest::default()
    }
}

fn description(chapters: u32) -> String {
    (0..chapters)
        .flat_map(|i| {
            let start = i * 90;
            [
                format!("{} Chapter {}", format_timestamp(start), i),
                format!("{} Chapter {} again", format_timestamp(start + 1), i),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark the full reconciliation pipeline
fn bench_reconcile(c: &mut Criterion) {
    let raw = raw_digest(40);

    c.bench_function("reconcile_inferred_40", |b| {
        b.iter(|| reconcile(black_box(raw.clone()), ChapterOrigin::Inferred))
    });

    c.bench_function("reconcile_creator_40", |b| {
        b.iter(|| reconcile(black_box(raw.clone()), ChapterOrigin::Creator))
    });
}

/// Benchmark chapter extraction from a long description
fn bench_chapter_extraction(c: &mut Criterion) {
    let text = description(60);

    c.bench_function("extract_chapters_60", |b| {
        b.iter(|| extract_chapters(black_box(&text), black_box("PT1H35M")))
    });
}

/// Benchmark interleaving tangents into sections
fn bench_interleave(c: &mut Criterion) {
    let digest = reconcile(raw_digest(40), ChapterOrigin::Creator).unwrap();
    let tangents: Vec<Tangent> = (0..20)
        .map(|i| Tangent {
            title: format!("Tangent {}", i),
            timestamp_start: format_timestamp(i * 230 + 7),
            timestamp_end: format_timestamp(i * 230 + 30),
            summary: "detour".to_string(),
        })
        .collect();

    c.bench_function("interleave_40_sections", |b| {
        b.iter(|| interleave_digest(black_box(&digest.sections), black_box(&tangents)))
    });
}

criterion_group!(benches, bench_reconcile, bench_chapter_extraction, bench_interleave);
criterion_main!(benches);
