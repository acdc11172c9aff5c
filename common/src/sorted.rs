//! Helpers for keeping buffers ordered under a caller supplied comparator.
//!
//! Both helpers are stable: an element never moves ahead of an element it
//! compares equal to and which was already present (or, for merges, which came
//! from the left input). Neither knows anything about timestamps; callers pass
//! the ordering they need.
use std::cmp::Ordering;
use std::collections::VecDeque;

use itertools::Itertools;

/// Inserts `item` into `buf`, which must already be sorted under `compare`, keeping it sorted.
///
/// Ties are broken by placing `item` after every element that compares equal to it.
/// The sortedness of `buf` is a precondition and only checked in debug builds.
pub fn insert_sorted_by<T, F>(buf: &mut VecDeque<T>, item: T, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert!(is_sorted_by(buf.iter(), &mut compare));
    let index = buf.partition_point(|probe| compare(probe, &item) != Ordering::Greater);
    buf.insert(index, item);
}

/// Merges two sorted sequences into a new buffer.
///
/// On ties elements of `a` are emitted before those of `b`, and the relative order inside
/// each input is preserved. The inputs are only borrowed.
pub fn merge_sorted_by<'a, T, A, B, F>(a: A, b: B, mut compare: F) -> VecDeque<T>
where
    T: Clone + 'a,
    A: IntoIterator<Item = &'a T>,
    B: IntoIterator<Item = &'a T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let a = a.into_iter();
    let b = b.into_iter();
    let mut res = VecDeque::with_capacity(a.size_hint().0 + b.size_hint().0);
    res.extend(
        a.merge_by(b, |x, y| compare(*x, *y) != Ordering::Greater)
            .cloned(),
    );
    res
}

/// Returns true if no element of `iter` compares greater than its successor.
pub fn is_sorted_by<'a, T, I, F>(iter: I, mut compare: F) -> bool
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T, &T) -> Ordering,
{
    iter.into_iter()
        .tuple_windows()
        .all(|(prev, next)| compare(prev, next) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    use super::*;

    fn by_key(a: &(i64, &'static str), b: &(i64, &'static str)) -> Ordering {
        a.0.cmp(&b.0)
    }

    #[test_case(&[], 5, &[5] ; "empty")]
    #[test_case(&[1, 3, 5], 0, &[0, 1, 3, 5] ; "front")]
    #[test_case(&[1, 3, 5], 4, &[1, 3, 4, 5] ; "middle")]
    #[test_case(&[1, 3, 5], 9, &[1, 3, 5, 9] ; "back")]
    #[test_case(&[2, 2, 2], 2, &[2, 2, 2, 2] ; "all equal")]
    fn test_insert_sorted(initial: &[i32], item: i32, expected: &[i32]) {
        let mut buf: VecDeque<i32> = initial.iter().copied().collect();
        insert_sorted_by(&mut buf, item, |a, b| a.cmp(b));
        assert_eq!(buf.into_iter().collect::<Vec<_>>(), expected.to_vec());
    }

    #[test]
    fn test_insert_sorted_places_after_equal_items() {
        let mut buf: VecDeque<(i64, &str)> = VecDeque::from(vec![(1, "a"), (2, "b"), (2, "c"), (3, "d")]);
        insert_sorted_by(&mut buf, (2, "new"), by_key);
        assert_eq!(
            buf.into_iter().collect::<Vec<_>>(),
            vec![(1, "a"), (2, "b"), (2, "c"), (2, "new"), (3, "d")]
        );
    }

    #[test]
    fn test_merge_sorted() {
        let a = VecDeque::from(vec![(1, "a1"), (3, "a3")]);
        let b = VecDeque::from(vec![(2, "b2")]);
        let merged = merge_sorted_by(&a, &b, by_key);
        assert_eq!(
            merged.into_iter().collect::<Vec<_>>(),
            vec![(1, "a1"), (2, "b2"), (3, "a3")]
        );
        // inputs are left untouched
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_merge_sorted_is_stable() {
        let a = vec![(1, "a1"), (2, "a2"), (2, "a2'")];
        let b = vec![(0, "b0"), (2, "b2"), (2, "b2'"), (7, "b7")];
        let merged: Vec<_> = merge_sorted_by(&a, &b, by_key).into_iter().collect();
        assert_eq!(
            merged,
            vec![
                (0, "b0"),
                (1, "a1"),
                (2, "a2"),
                (2, "a2'"),
                (2, "b2"),
                (2, "b2'"),
                (7, "b7")
            ]
        );
    }

    #[test]
    fn test_merge_sorted_with_empty_side() {
        let empty: Vec<i32> = vec![];
        let other = vec![1, 2, 3];
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert_eq!(merge_sorted_by(&empty, &other, cmp), VecDeque::from(other.clone()));
        assert_eq!(merge_sorted_by(&other, &empty, cmp), VecDeque::from(other.clone()));
        assert!(merge_sorted_by(&empty, &empty, cmp).is_empty());
    }

    #[test]
    fn test_random_inserts_and_merges_stay_sorted() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let cmp = |a: &(i64, usize), b: &(i64, usize)| a.0.cmp(&b.0);
        for _ in 0..50 {
            let mut left = VecDeque::new();
            let mut right = VecDeque::new();
            for seq in 0..rng.gen_range(0..40) {
                let item = (rng.gen_range(0..10), seq);
                if rng.gen_bool(0.5) {
                    insert_sorted_by(&mut left, item, cmp);
                } else {
                    insert_sorted_by(&mut right, item, cmp);
                }
            }
            assert!(is_sorted_by(&left, cmp));
            assert!(is_sorted_by(&right, cmp));
            // insertion order is kept for equal keys
            assert!(is_sorted_by(&left, |a: &(i64, usize), b: &(i64, usize)| a.cmp(b)));

            let merged = merge_sorted_by(&left, &right, cmp);
            assert_eq!(merged.len(), left.len() + right.len());
            assert!(is_sorted_by(&merged, cmp));
        }
    }

    #[test]
    fn test_is_sorted_by() {
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert!(is_sorted_by(&Vec::<i32>::new(), cmp));
        assert!(is_sorted_by(&vec![1], cmp));
        assert!(is_sorted_by(&vec![1, 1, 2], cmp));
        assert!(!is_sorted_by(&vec![2, 1], cmp));
    }
}
