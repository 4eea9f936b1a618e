//! Parser benchmarks.
//!
//! Run with: `cargo bench --package mdel-par`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mdel_par::parse_source;

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let flat = "(op a b c d e f g h)";
    let nested = "(define_insn \"addsi3\" [(set (match_operand:SI 0) (plus:SI (match_operand:SI 1) (match_operand:SI 2)))] \"\" \"add %0,%1,%2\")";

    group.throughput(Throughput::Bytes(nested.len() as u64));

    group.bench_function("flat_list", |b| {
        b.iter(|| parse_source(black_box(flat)).unwrap())
    });

    group.bench_function("nested_insn", |b| {
        b.iter(|| parse_source(black_box(nested)).unwrap())
    });

    group.finish();
}

fn bench_parser_many_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_file");

    let form = "(define_mode_attr size [(QI \"1\") (HI \"2\") (SI \"4\") (DI \"8\")])\n";
    let source = form.repeat(200);
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("200_forms", |b| {
        b.iter(|| parse_source(black_box(&source)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parser, bench_parser_many_forms);
criterion_main!(benches);
