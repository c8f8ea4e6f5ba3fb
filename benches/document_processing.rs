//! Performance benchmarks for document processing
//!
//! These benchmarks run a generated multi-generation file through:
//! - Line grammar and tree building
//! - Serialization back to text
//! - Continuation encoding of long values
//! - Ancestor queries
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use gedcom_core::{pedigree::Pedigree, query::ParentType, Database};
use std::hint::black_box;

/// A binary pedigree `depth` generations deep: individual `n` has parents `2n` and `2n + 1`.
fn generate_pedigree(depth: u32) -> String {
    let count = (1usize << depth) - 1;
    let mut text = String::from("0 HEAD\n1 CHAR UTF-8\n");
    for n in 1..=count {
        text.push_str(&format!(
            "0 @I{n}@ INDI\n1 NAME Person{n} /Family{}/\n1 BIRT\n2 DATE {}\n2 PLAC Somewhere\n",
            n % 97,
            2000 - 25 * (usize::BITS - n.leading_zeros()) as usize
        ));
        if 2 * n + 1 <= count {
            text.push_str(&format!("1 FAMC @F{n}@\n"));
        }
        if n > 1 {
            text.push_str(&format!("1 FAMS @F{}@\n", n / 2));
        }
    }
    for n in 1..=count {
        if 2 * n + 1 > count {
            break;
        }
        text.push_str(&format!(
            "0 @F{n}@ FAM\n1 HUSB @I{}@\n1 WIFE @I{}@\n1 CHIL @I{n}@\n2 _FREL Natural\n2 _MREL Natural\n",
            2 * n,
            2 * n + 1
        ));
    }
    text.push_str("0 TRLR\n");
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = generate_pedigree(12);

    c.bench_function("parse_pedigree", |b| {
        b.iter(|| black_box(Database::parse_str(black_box(&text)).unwrap()))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let db = Database::parse_str(&generate_pedigree(12)).unwrap();

    c.bench_function("serialize_pedigree", |b| {
        b.iter(|| black_box(db.to_gedcom_string()))
    });
}

fn bench_encode_long_values(c: &mut Criterion) {
    let value = "lorem ipsum dolor sit amet consectetur ".repeat(250);

    c.bench_function("encode_long_values", |b| {
        b.iter(|| {
            let mut db = Database::new();
            let note = db
                .add_record(db.root(), "@N1@", "NOTE", black_box(&value))
                .unwrap();
            black_box(db.multi_line_value(note).unwrap())
        })
    });
}

fn bench_ancestor_queries(c: &mut Criterion) {
    let db = Database::parse_str(&generate_pedigree(10)).unwrap();
    let root = db.get("@I1@").unwrap();

    c.bench_function("ancestors_natural", |b| {
        b.iter(|| black_box(db.relations().ancestors(root, ParentType::Natural).unwrap()))
    });

    c.bench_function("pedigree_build", |b| {
        b.iter(|| black_box(Pedigree::build(&db, ParentType::Natural).unwrap()))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(50);
    targets =
        bench_parse,
        bench_serialize,
        bench_encode_long_values,
        bench_ancestor_queries
}

criterion_main!(benches);
