use std::{fmt::Write, hint::black_box};

use cew::{
    code_generator::generate,
    orchestrator::rewrite_source,
    parser::parse,
    transformations::TransformOptions,
    types::UnitId,
};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

/// A class with `methods` checked methods and as many plain ones
fn synthetic_class(methods: usize) -> String {
    let mut source = String::from(
        "package bench;\n\nimport java.io.IOException;\n\n/** Synthetic. */\npublic class Subject {\n",
    );
    for index in 0..methods {
        let _ = write!(
            source,
            "    /**\n     * Reads.\n     *\n     * @throws IOException on failure\n     */\n    \
             public int read{index}(byte[] buffer, int offset) throws IOException {{\n        \
             int n = fill(buffer, offset);\n        if (n < 0) {{\n            return -1;\n        \
             }}\n        return n + {index};\n    }}\n\n    public int size{index}() {{\n        \
             return {index};\n    }}\n\n"
        );
    }
    source.push_str("}\n");
    source
}

fn benchmark_pipeline(c: &mut Criterion) {
    let source = synthetic_class(200);
    let unit = UnitId::new("bench/Subject");
    let options = TransformOptions::default();

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| parse(black_box(&source)));
    });

    let tree = parse(&source).ok();
    group.bench_function("generate", |b| {
        b.iter(|| tree.as_ref().map(|tree| generate(black_box(tree))));
    });

    group.bench_function("rewrite", |b| {
        b.iter(|| rewrite_source(&unit, black_box(&source), &options));
    });

    group.finish();
}

criterion_group!(benches, benchmark_pipeline);
criterion_main!(benches);
