use super::*;
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;

fn width_of(b: &InflatableBlock) -> (u32, bool) {
    match b.storage() {
        Storage::Bits(bits) => (bits.bits_per_entry(), true),
        fixed => (fixed.bits_per_entry(), false),
    }
}

#[test]
fn starts_at_one_bit() {
    let b = InflatableBlock::new(1);
    assert_eq!(width_of(&b), (1, true));
    assert_eq!(b.len(), 0);
}

#[test]
fn inflation_sequence() {
    // Each add is out of range for the current width and forces one
    // promotion; every earlier value must survive each promotion.
    let mut b = InflatableBlock::new(1);
    let stages: [(i64, u32, bool); 5] = [
        (0, 1, true),
        (1, 2, true),
        (255, 9, true),
        (70_000, 21, true),
        (5_000_000_000, 64, false),
    ];
    for (step, &(value, width, packed)) in stages.iter().enumerate() {
        b.add(value).unwrap();
        assert_eq!(width_of(&b), (width, packed), "after add #{step}");
        for (i, &(v, _, _)) in stages.iter().enumerate().take(step + 1) {
            assert_eq!(b.get(i), v);
        }
    }
    assert_eq!(b.len(), 5);
}

#[test]
fn overwrite_can_inflate_too() {
    let mut b = InflatableBlock::new(4);
    for v in [0, 1, 0, 1] {
        b.add(v).unwrap();
    }
    b.set(2, 1_000_000).unwrap();
    assert_eq!(b.entries().collect::<Vec<_>>(), vec![0, 1, 1_000_000, 1]);
}

#[test]
fn null_sentinel_survives_growth() {
    let mut b = InflatableBlock::new(4);
    b.add(-1).unwrap();
    b.add(3).unwrap();
    b.add(40_000).unwrap();
    assert_eq!(b.entries().collect::<Vec<_>>(), vec![-1, 3, 40_000]);
}

#[test]
fn negative_values_fall_back_to_fixed64() {
    let mut b = InflatableBlock::new(2);
    b.add(0).unwrap();
    b.add(-17).unwrap();
    assert_eq!(width_of(&b), (64, false));
    assert_eq!(b.entries().collect::<Vec<_>>(), vec![0, -17]);
}

#[test]
fn byte_aligned_ladder() {
    let mut b = InflatableBlock::with_factory(0, byte_aligned);
    b.add(100).unwrap();
    assert_eq!(width_of(&b), (8, false));
    b.add(1_000).unwrap();
    assert_eq!(width_of(&b), (16, false));
    b.add(100_000).unwrap();
    assert_eq!(width_of(&b), (32, false));
    b.add(10_000_000_000).unwrap();
    assert_eq!(width_of(&b), (64, false));
    assert_eq!(
        b.entries().collect::<Vec<_>>(),
        vec![100, 1_000, 100_000, 10_000_000_000]
    );
}

#[test]
fn snug_renarrows_after_shrink() {
    let mut b = InflatableBlock::new(0);
    b.add(300).unwrap(); // nine-bit entries
    assert_eq!(width_of(&b), (9, true));
    b.set(0, 2).unwrap();
    b.add(1).unwrap();
    b.snug(0);
    assert_eq!(width_of(&b), (2, true));
    assert_eq!(b.entries().collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn clear_keeps_the_block_usable() {
    let mut b = InflatableBlock::new(3);
    b.add(9_999_999).unwrap();
    b.clear();
    assert_eq!(b.len(), 0);
    b.add(5).unwrap();
    assert_eq!(b.get(0), 5);
}

#[quickcheck]
fn inflation_preserves_history(values: Vec<i64>) -> bool {
    let mut b = InflatableBlock::new(0);
    for &v in &values {
        b.add(v).unwrap();
    }
    b.len() == values.len() && values.iter().enumerate().all(|(i, &v)| b.get(i) == v)
}

#[quickcheck]
fn last_set_wins(values: Vec<(u8, i64)>) -> bool {
    // Arbitrary in-range overwrites with arbitrarily wide values.
    let mut b = InflatableBlock::new(0);
    let mut shadow: Vec<i64> = Vec::new();
    for &(slot, v) in &values {
        let index = (slot as usize).min(shadow.len());
        b.set(index, v).unwrap();
        if index == shadow.len() {
            shadow.push(v);
        } else {
            shadow[index] = v;
        }
    }
    shadow.iter().enumerate().all(|(i, &v)| b.get(i) == v)
}
