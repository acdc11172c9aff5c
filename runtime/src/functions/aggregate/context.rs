use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use ahash::AHashMap;
use aggfunc_common::time::Timestamp;
use tracing::{field, trace_span};

use crate::functions::aggregate::agg_func::contract_violation;
use crate::functions::aggregate::AggFunc;
use crate::runtime_error::RuntimeResult;

type PartialMap<K, A> = BTreeMap<u64, AHashMap<K, A>>;

/// Per-key aggregation state, partitioned by the worker that produced it.
///
/// Every worker owns its own accumulator per key, so workers never contend on the same
/// accumulator. [`KeyedAggrContext::finalize`] merges the partial accumulators of all
/// workers, in ascending worker id order, into a single result per key.
pub struct KeyedAggrContext<F: AggFunc, K> {
    func: F,
    partials: RwLock<PartialMap<K, F::Accumulator>>,
}

impl<F, K> KeyedAggrContext<F, K>
where
    F: AggFunc,
    K: Hash + Eq + Clone,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            partials: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn add(&self, worker_id: u64, key: K, value: F::Input, timestamp: Timestamp) {
        let mut partials = self.partials.write().unwrap_or_else(PoisonError::into_inner);
        let m = partials.entry(worker_id).or_default();
        let acc = match m.entry(key) {
            Vacant(entry) => entry.insert(self.func.create_accumulator()),
            Occupied(entry) => entry.into_mut(),
        };
        self.func.add(acc, value, timestamp);
    }

    pub fn retract(&self, worker_id: u64, key: &K, value: &F::Input) -> RuntimeResult<()>
    where
        K: Debug,
    {
        let mut partials = self.partials.write().unwrap_or_else(PoisonError::into_inner);
        match partials.get_mut(&worker_id).and_then(|m| m.get_mut(key)) {
            Some(acc) => self.func.retract(acc, value),
            None => Err(contract_violation(format!(
                "worker {} holds no records for key {:?}",
                worker_id, key
            ))),
        }
    }

    /// Number of (worker, key) partial accumulators.
    pub fn partial_count(&self) -> usize {
        let partials = self.partials.read().unwrap_or_else(PoisonError::into_inner);
        partials.values().map(|m| m.len()).sum()
    }

    /// Merges the partial accumulators of every worker and returns the result for each key.
    ///
    /// Partials are left in place, so more records may be added and `finalize` called again.
    pub fn finalize(&self) -> Vec<(K, F::Output)> {
        let span = trace_span!(
            "keyed_finalize",
            workers = field::Empty,
            keys = field::Empty
        )
        .entered();

        let partials = self.partials.read().unwrap_or_else(PoisonError::into_inner);
        let mut m_global: AHashMap<&K, F::Accumulator> = AHashMap::new();
        for m in partials.values() {
            for (key, acc) in m.iter() {
                match m_global.entry(key) {
                    Occupied(mut entry) => self.func.merge(entry.get_mut(), acc),
                    Vacant(entry) => {
                        let mut global = self.func.create_accumulator();
                        self.func.merge(&mut global, acc);
                        entry.insert(global);
                    }
                }
            }
        }
        span.record("workers", partials.len());
        span.record("keys", m_global.len());

        m_global
            .into_iter()
            .map(|(key, acc)| (key.clone(), self.func.get_result(&acc)))
            .collect()
    }

    pub fn clear(&self) {
        self.partials
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
