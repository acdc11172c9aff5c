use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::functions::aggregate::AggFunc;
use crate::Timestamp;

pub(crate) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Records with distinct values and timestamps drawn from a small range, so that
/// timestamp ties are common. Returned in random (arrival) order.
pub(crate) fn random_records(rng: &mut StdRng, max_len: usize) -> Vec<(i64, Timestamp)> {
    let len = rng.gen_range(0..=max_len);
    let mut records: Vec<(i64, Timestamp)> = (0..len as i64)
        .map(|value| (value, rng.gen_range(0..20)))
        .collect();
    records.shuffle(rng);
    records
}

pub(crate) fn feed<F: AggFunc>(
    func: &F,
    records: impl IntoIterator<Item = (F::Input, Timestamp)>,
) -> F::Accumulator {
    let mut acc = func.create_accumulator();
    for (value, ts) in records {
        func.add(&mut acc, value, ts);
    }
    acc
}
