// Use codspeed-criterion-compat when running on CodSpeed (CI), real criterion otherwise (for flamegraphs)
use std::cell::RefCell;

#[cfg(codspeed)]
use codspeed_criterion_compat::{Bencher, Criterion, black_box, criterion_group, criterion_main};
#[cfg(not(codspeed))]
use criterion::{Bencher, Criterion, black_box, criterion_group, criterion_main};
use functional::{Function, bind, bind_method, by_ref, placeholders::*, shared};

fn add(a: i64, b: i64) -> i64 {
    a + b
}

struct Counter {
    count: i64,
}

impl Counter {
    fn increment(&mut self, by: i64) -> i64 {
        self.count += by;
        self.count
    }
}

/// Calls `add` directly, as the baseline for the other benchmarks.
fn direct_call(bench: &mut Bencher) {
    bench.iter(|| black_box(add(black_box(5), 10)));
}

/// Calls `add` through a binding with one captured slot and one placeholder.
fn bound_call(bench: &mut Bencher) {
    let add_ten = bind(add, (_1, 10_i64));
    assert_eq!(add_ten.call((5,)).unwrap(), 15);

    bench.iter(|| black_box(add_ten.call((black_box(5),)).unwrap()));
}

/// Calls the same binding through a type-erased wrapper.
fn wrapper_call(bench: &mut Bencher) {
    let add_ten: Function<'_, (i64,), i64> = Function::from(bind(add, (_1, 10_i64)));
    assert_eq!(add_ten.call((5,)).unwrap(), 15);

    bench.iter(|| black_box(add_ten.call((black_box(5),)).unwrap()));
}

/// Calls a method through a binding that captured its receiver by reference.
fn bound_method_call(bench: &mut Bencher) {
    let counter = RefCell::new(Counter { count: 0 });
    let bump = bind_method(Counter::increment, (by_ref(&counter), _1));

    bench.iter(|| black_box(bump.call((black_box(1),)).unwrap()));
}

/// Calls a method through a wrapper holding a shared receiver.
fn wrapper_method_call(bench: &mut Bencher) {
    let bump: Function<'_, (i64,), i64> = Function::from_method_with(Counter::increment, shared(Counter { count: 0 }));

    bench.iter(|| black_box(bump.call((black_box(1),)).unwrap()));
}

/// Clones a wrapper, which deep-copies its core.
fn wrapper_clone(bench: &mut Bencher) {
    let add_ten: Function<'_, (i64,), i64> = Function::from(bind(add, (_1, 10_i64)));

    bench.iter(|| black_box(add_ten.clone()));
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("add__direct", direct_call);
    c.bench_function("add__bound", bound_call);
    c.bench_function("add__wrapper", wrapper_call);
    c.bench_function("increment__bound_method", bound_method_call);
    c.bench_function("increment__wrapper_method", wrapper_method_call);
    c.bench_function("wrapper_clone", wrapper_clone);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
