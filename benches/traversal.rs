//! Path compilation and traversal benchmarks
//!
//! Measures compile cost and query throughput over generated XML documents.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use docpath::compile;
use docpath::xml::XmlDocument;
use std::hint::black_box;

/// A document of nested sections, `width` children per level, `depth` levels deep.
fn sections_document(width: usize, depth: usize) -> String {
    fn section(xml: &mut String, name: &str, width: usize, depth: usize) {
        xml.push_str(&format!(
            "<section names=\"{0}\"><title>{0}</title><paragraph>Text of {0}</paragraph>",
            name
        ));
        if depth > 0 {
            for i in 0..width {
                section(xml, &format!("{}.{}", name, i), width, depth - 1);
            }
        }
        xml.push_str("</section>");
    }

    let mut xml = String::from("<document>");
    for i in 0..width {
        section(&mut xml, &i.to_string(), width, depth);
    }
    xml.push_str("</document>");
    xml
}

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for path in [
        "section",
        "//section/.././following_sibling::*",
        "(following-sibling::section|preceding-sibling::section)[last()]",
        "//section[./title == \"1.2\" and count(./section) > 1][1]",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(path), path, |b, path| {
            b.iter(|| compile(black_box(path)).expect("Failed to compile path"));
        });
    }
    group.finish();
}

fn benchmark_descendants(c: &mut Criterion) {
    let mut group = c.benchmark_group("descendants");
    let path = compile("//section").expect("Failed to compile path");

    for depth in [2, 4] {
        let xml = sections_document(4, depth);
        let doc = XmlDocument::parse(&xml).expect("Failed to parse document");
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, _| {
            b.iter(|| path.findall(doc.root_node()).expect("Failed to run query"));
        });
    }

    group.finish();
}

fn benchmark_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicates");
    let xml = sections_document(4, 3);
    let doc = XmlDocument::parse(&xml).expect("Failed to parse document");

    for path in [
        "//section[1]/title",
        "//section[last()]",
        "//section[./title == \"2.1.3\"]",
        "//section[count(./section) == 4 and @names != \"0\"]",
    ] {
        let compiled = compile(path).expect("Failed to compile path");
        group.bench_with_input(BenchmarkId::from_parameter(path), &compiled, |b, compiled| {
            b.iter(|| compiled.findall(doc.root_node()).expect("Failed to run query"));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compile,
    benchmark_descendants,
    benchmark_predicates
);
criterion_main!(benches);
