//! Benchmarks for the diagram to script pipeline.
//!
//! Tests:
//! - Decoding each diagram container format
//! - Building the schema model (tables, relations)
//! - DDL and sboot generation including dependency ordering

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schema2script::diagnostics::Diagnostics;
use schema2script::diagram::decode;
use schema2script::pipeline::schema_from_bytes;
use schema2script::render::{DdlGenerator, SbootGenerator, SqlDialect, StackEnv};
use std::hint::black_box;
use test_data_gen::{Format, Generator, Scale};

const SEED: u64 = 42;

fn diagram_text(scale: Scale, format: Format) -> String {
    Generator::new(SEED)
        .generate(scale.tables())
        .render(format)
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for format in [Format::Plain, Format::MxFile, Format::Compressed, Format::Svg] {
        let text = diagram_text(Scale::Medium, format);
        let hint = format!("bench.{}", format.extension());
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("format", format!("{:?}", format)),
            &text,
            |b, text| b.iter(|| decode(black_box(text.as_bytes()), &hint).unwrap()),
        );
    }

    group.finish();
}

fn bench_build_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_schema");

    for scale in [Scale::Small, Scale::Medium, Scale::Large] {
        let text = diagram_text(scale, Format::Plain);
        group.throughput(Throughput::Elements(scale.tables() as u64));
        group.bench_with_input(
            BenchmarkId::new("tables", scale.tables()),
            &text,
            |b, text| b.iter(|| schema_from_bytes(black_box(text.as_bytes()), "bench.xml").unwrap()),
        );
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for scale in [Scale::Medium, Scale::Large] {
        let text = diagram_text(scale, Format::Plain);
        let (schema, _) = schema_from_bytes(text.as_bytes(), "bench.xml").unwrap();
        group.throughput(Throughput::Elements(scale.tables() as u64));

        for dialect in [SqlDialect::H2, SqlDialect::Oracle] {
            let generator = DdlGenerator::new(dialect);
            group.bench_with_input(
                BenchmarkId::new(format!("ddl_{}", dialect), scale.tables()),
                &schema,
                |b, schema| {
                    b.iter(|| {
                        let mut diags = Diagnostics::new();
                        generator.validate(schema, &mut diags);
                        black_box(generator.generate(schema, &mut diags))
                    })
                },
            );
        }

        let sboot = SbootGenerator::new(StackEnv::Fullstack);
        group.bench_with_input(
            BenchmarkId::new("sboot", scale.tables()),
            &schema,
            |b, schema| {
                b.iter(|| {
                    let mut diags = Diagnostics::new();
                    black_box(sboot.generate(schema, &mut diags))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_build_schema, bench_generate);
criterion_main!(benches);
