use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use xmlnode::{from_str, to_string, Node, Object, Options};

fn user(i: u32) -> Node {
    let tags = Node::from(vec![Node::from("a"), Node::from("b")]);
    let object: Object = [
        ("id", Node::from(i)),
        ("name", Node::from(format!("user{i}"))),
        ("active", Node::from(i % 2 == 0)),
        ("tags", tags),
        ("note", Node::Null),
    ]
    .into_iter()
    .collect();
    Node::Object(object)
}

fn bench_scalar(c: &mut Criterion) {
    let options = Options::default();
    let node = Node::from("a < b & c");
    c.bench_function("encode_scalar", |b| {
        b.iter(|| to_string(black_box(&node), &options))
    });
}

fn bench_users(c: &mut Criterion) {
    let options = Options::default();
    let node = Node::from((0..1000).map(user).collect::<Vec<_>>());
    c.bench_function("encode_users_1000", |b| {
        b.iter(|| to_string(black_box(&node), &options))
    });
}

fn bench_roundtrip(c: &mut Criterion) {
    let options = Options::default();
    let xml = "<root><user id=\"1\"><name>jack</name><tags>a</tags><tags>b</tags></user></root>";
    c.bench_function("roundtrip_small", |b| {
        b.iter(|| from_str(black_box(xml), &options).and_then(|node| to_string(&node, &options)))
    });
}

criterion_group!(benches, bench_scalar, bench_users, bench_roundtrip);
criterion_main!(benches);
