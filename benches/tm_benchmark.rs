use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use tempfile::TempDir;
use transmem::{Config, Language, TranslationMemory};

const WORDS: [&str; 16] = [
    "open", "file", "folder", "save", "changes", "close", "window", "print",
    "document", "settings", "export", "import", "project", "recent", "undo", "redo",
];

/// Helper to create a random UI-like source string
fn random_source(rng: &mut impl Rng, words: usize) -> String {
    (0..words)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn open_memory(dir: &TempDir) -> TranslationMemory {
    let config = Config {
        sync_writes: false,
        ..Config::with_storage_path(dir.path())
    };
    TranslationMemory::open(config).unwrap()
}

fn filled_memory(dir: &TempDir, entries: usize) -> TranslationMemory {
    let tm = open_memory(dir);
    let en = Language::parse("en").unwrap();
    let fr = Language::parse("fr").unwrap();
    let mut rng = rand::thread_rng();

    let writer = tm.get_writer().unwrap();
    for i in 0..entries {
        let source = random_source(&mut rng, rng.gen_range(2..8));
        writer.insert(&en, &fr, &source, &format!("traduction {}", i)).unwrap();
    }
    writer.commit().unwrap();
    tm
}

/// Benchmark buffered inserts followed by one commit
fn bench_insert_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_commit");
    let en = Language::parse("en").unwrap();
    let de = Language::parse("de").unwrap();

    for batch_size in [10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                let dir = TempDir::new().unwrap();
                let tm = open_memory(&dir);
                let writer = tm.get_writer().unwrap();
                let mut rng = rand::thread_rng();
                let mut round = 0;

                b.iter(|| {
                    for i in 0..batch_size {
                        let source = format!("{} {}", random_source(&mut rng, 4), round * batch_size + i);
                        writer.insert(&en, &de, &source, "Übersetzung").unwrap();
                    }
                    black_box(writer.commit().unwrap());
                    round += 1;
                });
            },
        );
    }
    group.finish();
}

/// Benchmark fuzzy search against stores of growing size
fn bench_fuzzy_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy_search");
    let en = Language::parse("en").unwrap();
    let fr = Language::parse("fr").unwrap();

    for entries in [1_000, 10_000].iter() {
        let dir = TempDir::new().unwrap();
        let tm = filled_memory(&dir, *entries);

        group.bench_with_input(BenchmarkId::from_parameter(entries), entries, |b, _| {
            b.iter(|| {
                black_box(tm.search(&en, &fr, "save changes to document").unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark substring lookups with and without a trigram prefilter
fn bench_substring_search(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let tm = filled_memory(&dir, 10_000);
    let en = Language::parse("en").unwrap();
    let fr = Language::parse("fr").unwrap();
    let sink = |_: &Language, _: &Language, _: &str, _: &str, _: chrono::DateTime<chrono::Utc>| -> transmem::Result<()> { Ok(()) };

    c.bench_function("substring_search_phrase", |b| {
        b.iter(|| black_box(tm.search_substring(&sink, &en, &fr, "open file").unwrap()));
    });

    c.bench_function("substring_search_short", |b| {
        b.iter(|| black_box(tm.search_substring(&sink, &en, &fr, "do").unwrap()));
    });
}

criterion_group!(
    benches,
    bench_insert_commit,
    bench_fuzzy_search,
    bench_substring_search
);
criterion_main!(benches);
