//! Ownership policy laws of `OneOf`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use one_of::{Cloned, Exclusive, OneOf, Shared, when, when_ref};
use static_assertions::{assert_impl_all, assert_not_impl_any};

#[derive(Clone, Debug, Eq, PartialEq)]
struct Celsius(i32);

#[derive(Clone, Debug, Eq, PartialEq)]
struct Kelvin(i32);

#[one_of::variants]
#[derive(Clone, Debug)]
enum Reading {
    Celsius(Celsius),
    Kelvin(Kelvin),
}

assert_not_impl_any!(OneOf<Reading, Exclusive>: Clone);
assert_impl_all!(OneOf<Reading, Shared>: Clone, Send, Sync);
assert_impl_all!(OneOf<Reading, Cloned>: Clone, Send, Sync);

fn warm_up<P: one_of::Policy>(reading: &mut OneOf<Reading, P>) {
    when!(reading, {
        Celsius => |c| c.0 += 1,
        Kelvin => |k| k.0 += 1,
    });
}

fn degrees<P: one_of::Policy>(reading: &OneOf<Reading, P>) -> i32 {
    when_ref!(reading, {
        Celsius => |c| c.0,
        Kelvin => |k| k.0 - 273,
    })
}

#[test]
fn shared_clones_alias_the_same_value() {
    let mut first = OneOf::<Reading, Shared>::new(Celsius(20));
    let second = first.clone();

    warm_up(&mut first);

    assert_eq!(degrees(&second), 21);
    assert_eq!(first.handle_count(), 2);
    assert!(first.shares_value_with(&second));
}

#[test]
fn cloned_copies_are_independent() {
    let mut first = OneOf::<Reading, Cloned>::new(Celsius(20));
    let second = first.clone();

    warm_up(&mut first);

    assert_eq!(degrees(&first), 21);
    assert_eq!(degrees(&second), 20);
}

#[test]
fn move_keeps_the_value() {
    let source = OneOf::<Reading>::new(Kelvin(300));
    let destination = source;

    assert_eq!(degrees(&destination), 27);
}

#[test]
fn set_on_shared_detaches_only_that_handle() {
    let mut first = OneOf::<Reading, Shared>::new(Celsius(5));
    let second = first.clone();

    first.set(Kelvin(373));

    assert_eq!(degrees(&first), 100);
    assert_eq!(degrees(&second), 5);
    assert!(!first.shares_value_with(&second));
}

#[test]
fn shared_handles_count_atomically_across_threads() {
    let reading = OneOf::<Reading, Shared>::new(Celsius(0));
    let dispatches = Arc::new(AtomicUsize::new(0));

    thread::scope(|s| {
        for _ in 0..8 {
            let mut handle = reading.clone();
            let dispatches = Arc::clone(&dispatches);

            s.spawn(move || {
                for _ in 0..100 {
                    warm_up(&mut handle);
                    dispatches.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(reading.handle_count(), 1);
    assert_eq!(dispatches.load(Ordering::Relaxed), 800);
    assert_eq!(degrees(&reading), 800);
}

#[test]
fn debug_includes_value() {
    let reading = OneOf::<Reading, Shared>::new(Kelvin(1));

    let output = format!("{reading:?}");

    assert!(output.contains("Kelvin(1)"));
}
