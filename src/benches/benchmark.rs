use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use luares::{DescriptionTable, ItemIndex, LuaresParser, ParserSettings};

/// A synthetic blob of `count` well-formed entries with distinct ids.
fn synthetic_items(count: u32) -> String {
    let mut blob = String::from("return {\n");
    for i in 0..count {
        writeln!(
            blob,
            r#"    [{i}] = {{id={i},en="Item {i}",ja="アイテム{i}",enl="item {i}",jal="アイテム{i}",category="Weapon",damage=5,delay=186,flags=32768,jobs=4194303,level=1,races=511,skill=2,slots=3,stack=1,type=4}},"#
        )
        .expect("writing to a string cannot fail");
    }
    blob.push('}');
    blob
}

fn build_index(items: &str, descriptions: &str) -> ItemIndex {
    let parser = LuaresParser::from_string(items.to_string())
        .with_configuration(ParserSettings::new().num_threads(1));

    ItemIndex::build(&parser, &DescriptionTable::parse(descriptions))
}

fn criterion_benchmark(c: &mut Criterion) {
    let sample = include_str!("../../samples/items.lua");
    let descriptions = include_str!("../../samples/item_descriptions.lua");

    c.bench_function("index the regular sample", |b| {
        b.iter(|| build_index(sample, descriptions))
    });

    let large = synthetic_items(10_000);
    c.bench_function("index 10k synthetic items", |b| {
        b.iter(|| build_index(&large, descriptions))
    });

    let index = build_index(&large, descriptions);
    c.bench_function("render 10k items to compact json", |b| {
        b.iter(|| index.to_json(false).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
