//! Benchmarks for atom reads, writes, and update propagation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quark_core::atom::{use_atom, Atom, SetValue};
use quark_core::reactive::RenderScope;

fn atom_reads(c: &mut Criterion) {
    let atom = Atom::new(1u64);

    c.bench_function("atom_get_untracked", |b| {
        b.iter(|| black_box(atom.get_untracked()))
    });
}

fn atom_writes(c: &mut Criterion) {
    let atom = Atom::new(0u64);

    c.bench_function("atom_set_direct", |b| {
        b.iter(|| atom.set(black_box(7u64)))
    });

    c.bench_function("atom_set_update", |b| {
        b.iter(|| atom.set(SetValue::update(|prev| prev.wrapping_add(1))))
    });
}

fn update_propagation(c: &mut Criterion) {
    let atom = Atom::new(0u64);

    let atom_clone = atom.clone();
    let scope = RenderScope::mount(move || {
        let (value, _set) = use_atom(&atom_clone);
        black_box(value);
    });

    c.bench_function("set_with_one_subscriber", |b| {
        b.iter(|| atom.set(black_box(3u64)))
    });

    drop(scope);
}

criterion_group!(benches, atom_reads, atom_writes, update_propagation);
criterion_main!(benches);
