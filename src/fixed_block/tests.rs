use super::*;
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

#[test]
fn creation() {
    let b: FixedBlock<i32> = FixedBlock::new();
    assert_eq!(b.len(), 0);
    assert_eq!(b.capacity(), 0);
    assert!(b.is_empty());
}

#[test]
fn capacity_hint_is_exact() {
    let b: FixedBlock<i16> = FixedBlock::with_capacity(7);
    assert_eq!(b.capacity(), 7);
    assert_eq!(b.len(), 0);
}

#[test]
fn add_then_get() {
    let mut b: FixedBlock<i8> = FixedBlock::new();
    for v in [-128, -1, 0, 1, 127] {
        b.add(v).unwrap();
    }
    assert_eq!(b.len(), 5);
    assert_eq!(b.entries().collect::<Vec<_>>(), vec![-128, -1, 0, 1, 127]);
}

#[test]
fn set_extends_only_at_population() {
    let mut b: FixedBlock<i32> = FixedBlock::new();
    b.set(0, 10).unwrap();
    b.set(1, 20).unwrap();
    b.set(0, 30).unwrap(); // overwrite, no growth
    assert_eq!(b.len(), 2);
    assert_eq!(b.get(0), 30);
    assert_eq!(b.get(1), 20);
}

#[test]
fn overflow_is_signalled_without_mutation() {
    let mut b: FixedBlock<i8> = FixedBlock::new();
    b.add(7).unwrap();
    assert_eq!(b.set(1, 128), Err(Error::ValueBeyondLimit(128)));
    assert_eq!(b.set(0, -129), Err(Error::ValueBeyondLimit(-129)));
    assert_eq!(b.len(), 1);
    assert_eq!(b.get(0), 7);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn get_past_population_panics() {
    let b: FixedBlock<i64> = FixedBlock::new();
    b.get(0);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn set_past_population_panics() {
    let mut b: FixedBlock<i64> = FixedBlock::new();
    b.set(1, 0).unwrap();
}

#[test]
fn growth_ladder() {
    let mut b: FixedBlock<i64> = FixedBlock::new();
    b.accommodate(0);
    assert_eq!(b.capacity(), 5);
    b.accommodate(4);
    assert_eq!(b.capacity(), 5);
    b.accommodate(5);
    assert_eq!(b.capacity(), 10);
    b.accommodate(20);
    assert_eq!(b.capacity(), 40);
    b.accommodate(39);
    assert_eq!(b.capacity(), 40);
    b.accommodate(40);
    assert_eq!(b.capacity(), 80);
}

#[test]
fn shrinkwrap_keeps_headroom() {
    let mut b: FixedBlock<i32> = FixedBlock::new();
    for v in 0..10 {
        b.add(v).unwrap();
    }
    b.shrinkwrap(0);
    assert_eq!(b.capacity(), 10);
    b.shrinkwrap(50);
    assert_eq!(b.capacity(), 15);
    b.shrinkwrap(25); // ceil(10 * 1.25) = 13
    assert_eq!(b.capacity(), 13);
    assert_eq!(b.entries().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
}

#[test]
fn shrinkwrap_capacity_saturates() {
    assert_eq!(shrinkwrap_capacity(0, 0), 0);
    assert_eq!(shrinkwrap_capacity(3, 10), 4); // ceil(3.3)
    assert_eq!(
        shrinkwrap_capacity(i32::MAX as usize, 100),
        i32::MAX as usize
    );
}

#[test]
fn clear_releases_buffer() {
    let mut b: FixedBlock<i16> = FixedBlock::with_capacity(20);
    b.add(3).unwrap();
    b.clear();
    assert_eq!(b.len(), 0);
    assert_eq!(b.capacity(), 0);
}

#[quickcheck]
fn added_values_read_back(values: Vec<i32>) -> bool {
    let mut b: FixedBlock<i32> = FixedBlock::new();
    for &v in &values {
        b.add(v as i64).unwrap();
    }
    b.len() == values.len()
        && values
            .iter()
            .enumerate()
            .all(|(i, &v)| b.get(i) == v as i64)
}
