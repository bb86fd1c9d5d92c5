//! Benchmarks for sidebar resolution.

use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wm_config::Config;
use wm_site::{ContentIndex, resolve};
use wm_storage::Document;

/// Content index with `sections` directories of `pages` pages each.
fn create_index(sections: usize, pages: usize) -> ContentIndex {
    (0..sections)
        .flat_map(|s| {
            (0..pages).map(move |p| {
                Document::new(format!("section-{s}/page-{p}"), format!("Page {p}"))
                    .with_order(i32::try_from(pages - p).unwrap_or(i32::MAX))
            })
        })
        .collect()
}

/// Sidebar with one autogenerate section and one explicit group per directory.
fn create_sidebar(sections: usize, pages: usize) -> String {
    let mut toml_src = String::new();
    for s in 0..sections {
        toml_src.push_str(&format!(
            "[[sidebar]]\nlabel = \"Auto {s}\"\nautogenerate = {{ directory = \"section-{s}\" }}\n\n"
        ));
        toml_src.push_str(&format!("[[sidebar]]\nlabel = \"Explicit {s}\"\nitems = [\n"));
        for p in 0..pages {
            toml_src.push_str(&format!(
                "  {{ label = \"Page {p}\", link = \"/section-{s}/page-{p}/\" }},\n"
            ));
        }
        toml_src.push_str("]\n\n");
    }
    toml_src
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for (sections, pages) in [(5, 10), (20, 50), (50, 100)] {
        let index = create_index(sections, pages);
        let config = Config::from_toml_str(&create_sidebar(sections, pages), Path::new(".")).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{sections}x{pages}")),
            &(index, config),
            |b, (index, config)| b.iter(|| resolve(&config.sidebar_resolved, index).unwrap()),
        );
    }

    group.finish();
}

fn bench_entries(c: &mut Criterion) {
    let index = create_index(20, 50);
    let config = Config::from_toml_str(&create_sidebar(20, 50), Path::new(".")).unwrap();
    let nav = resolve(&config.sidebar_resolved, &index).unwrap();

    c.bench_function("entries_20x50", |b| b.iter(|| nav.entries()));
}

criterion_group!(benches, bench_resolve, bench_entries);
criterion_main!(benches);
