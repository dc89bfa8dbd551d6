// Criterion benchmarks for symspell-engine, run against the fixture corpus in data/.
//
// Run:
//   cargo bench

use std::hint::black_box;
use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use symspell_engine::{DamerauLevenshteinOsa, StringDistance, SymSpell, SymSpellConfig, Verbosity};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn build(max_dictionary_edit_distance: usize) -> SymSpell {
    let config = SymSpellConfig::builder()
        .max_dictionary_edit_distance(max_dictionary_edit_distance)
        .build()
        .expect("valid config");
    let mut symspell = SymSpell::new(config).expect("valid config");
    symspell
        .load_dictionary_file(data("words.txt"), 0, 1, " ")
        .expect("words.txt");
    symspell
        .load_bigram_dictionary_file(data("bigrams.txt"), 0, 2, " ")
        .expect("bigrams.txt");
    symspell
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_dictionary", |b| b.iter(|| black_box(build(2))));
}

fn bench_lookup(c: &mut Criterion) {
    let symspell = build(3);
    let inputs = ["hous", "sumarized", "questionaire", "absolutly", "qwxzv"];

    let mut group = c.benchmark_group("lookup");
    for verbosity in [Verbosity::Top, Verbosity::Closest, Verbosity::All] {
        for max_edit_distance in [1, 2, 3] {
            group.bench_with_input(
                BenchmarkId::new(format!("{verbosity:?}"), max_edit_distance),
                &max_edit_distance,
                |b, &max_edit_distance| {
                    b.iter(|| {
                        for input in inputs {
                            black_box(
                                symspell
                                    .lookup(input, verbosity, max_edit_distance, false)
                                    .expect("lookup"),
                            );
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_lookup_compound(c: &mut Criterion) {
    let symspell = build(2);
    c.bench_function("lookup_compound", |b| {
        b.iter(|| {
            black_box(
                symspell
                    .lookup_compound("whereis th elove absolutely notmine", 2, false)
                    .expect("lookup_compound"),
            )
        })
    });
}

fn bench_distance(c: &mut Criterion) {
    let osa: DamerauLevenshteinOsa = DamerauLevenshteinOsa::default();
    c.bench_function("distance_with_early_stop", |b| {
        b.iter(|| {
            black_box(osa.distance_with_early_stop(
                black_box("questionnaire"),
                black_box("questionaires"),
                2,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_lookup,
    bench_lookup_compound,
    bench_distance
);
criterion_main!(benches);
