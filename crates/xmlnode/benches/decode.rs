use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xmlnode::{from_str, parse_element, Options};

const SIMPLE_XML: &str = "<root><child>text</child></root>";
const ATTR_XML: &str = "<root id=\"1\" name='test'><item value=\"42\" /><item value=\"43\"/></root>";
const MIXED_XML: &str = "<a>000<b>123</b>6666<c>&lt;escaped&gt; &amp; &#128640;</c></a>";

fn wide_xml(count: usize) -> String {
    let mut xml = String::from("<root>");
    for i in 0..count {
        xml.push_str(&format!("<user id=\"{i}\"><name>user{i}</name><tags>a</tags><tags>b</tags></user>"));
    }
    xml.push_str("</root>");
    xml
}

fn bench_simple(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("decode_simple", |b| {
        b.iter(|| from_str(black_box(SIMPLE_XML), &options))
    });
}

fn bench_attr(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("decode_attr", |b| {
        b.iter(|| from_str(black_box(ATTR_XML), &options))
    });
}

fn bench_mixed(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("decode_mixed", |b| {
        b.iter(|| from_str(black_box(MIXED_XML), &options))
    });
}

fn bench_wide(c: &mut Criterion) {
    let options = Options::default();
    let xml = wide_xml(1000);
    c.bench_function("decode_wide_1000", |b| {
        b.iter(|| from_str(black_box(&xml), &options))
    });
    c.bench_function("parse_element_wide_1000", |b| {
        b.iter(|| parse_element(black_box(&xml), &options))
    });
}

criterion_group!(benches, bench_simple, bench_attr, bench_mixed, bench_wide);
criterion_main!(benches);
