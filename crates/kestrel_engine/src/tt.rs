//! Bucketed transposition table.
//!
//! Four 16-byte entries share one 64-byte, cache-line aligned bucket. The
//! low bits of the hash select the bucket and the upper 32 bits are stored
//! for verification.

use kestrel_core::Move;
use tracing::info;

use crate::eval::MATE_BOUND;

const ENTRIES_PER_BUCKET: usize = 4;
const HASHFULL_SAMPLE: usize = 1000;

/// How a stored score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    Exact = 1,
    /// Failed high: the true score is at least this
    Lower = 2,
    /// Failed low: the true score is at most this
    Upper = 3,
}

impl Bound {
    fn from_raw(raw: u8) -> Option<Bound> {
        match raw {
            1 => Some(Bound::Exact),
            2 => Some(Bound::Lower),
            3 => Some(Bound::Upper),
            _ => None,
        }
    }
}

/// A successful probe, with the score already adjusted to the probing ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtHit {
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
    pub mv: Move,
}

#[derive(Clone, Copy, Default)]
#[repr(C)]
struct Entry {
    key: u32,
    score: i32,
    mv: u16,
    depth: u8,
    /// 0 marks an empty slot
    bound: u8,
    age: u8,
}

#[derive(Clone, Copy, Default)]
#[repr(C, align(64))]
struct Bucket {
    entries: [Entry; ENTRIES_PER_BUCKET],
}

const _: () = assert!(std::mem::size_of::<Entry>() == 16);
const _: () = assert!(std::mem::size_of::<Bucket>() == 64);

#[inline]
fn verification_key(key: u64) -> u32 {
    (key >> 32) as u32
}

/// Mate scores are stored relative to the node, not the root.
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    age: u8,
}

impl TranspositionTable {
    /// Largest power-of-two bucket count fitting in `size_mb` megabytes, at least one.
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.saturating_mul(1024 * 1024);
        let fit = (bytes / std::mem::size_of::<Bucket>()).max(1);
        let count = if fit.is_power_of_two() {
            fit
        } else {
            fit.next_power_of_two() >> 1
        };
        Self {
            buckets: vec![Bucket::default(); count],
            mask: count - 1,
            age: 0,
        }
    }

    pub fn resize(&mut self, size_mb: usize) {
        *self = Self::new(size_mb);
        info!(size_mb, buckets = self.buckets.len(), "transposition table resized");
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total entry slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * ENTRIES_PER_BUCKET
    }

    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::default());
        self.age = 0;
    }

    /// Marks the start of a new top-level search; older entries become replaceable.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&self, key: u64, ply: usize) -> Option<TtHit> {
        let check = verification_key(key);
        self.buckets[self.bucket_index(key)]
            .entries
            .iter()
            .find(|e| e.bound != 0 && e.key == check)
            .and_then(|e| {
                Some(TtHit {
                    score: score_from_tt(e.score, ply),
                    depth: e.depth,
                    bound: Bound::from_raw(e.bound)?,
                    mv: Move::from_raw(e.mv),
                })
            })
    }

    /// Records a search result. A store without a move keeps the move of a
    /// previous entry for the same position.
    pub fn store(&mut self, key: u64, score: i32, depth: i32, bound: Bound, mv: Move, ply: usize) {
        let check = verification_key(key);
        let age = self.age;
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];

        let slot = match bucket.entries.iter().position(|e| e.bound != 0 && e.key == check) {
            Some(same) => same,
            None => match bucket.entries.iter().position(|e| e.bound == 0) {
                Some(empty) => empty,
                None => victim(&bucket.entries, age),
            },
        };

        let entry = &mut bucket.entries[slot];
        let keep_move = mv.is_null() && entry.bound != 0 && entry.key == check;
        *entry = Entry {
            key: check,
            score: score_to_tt(score, ply),
            mv: if keep_move { entry.mv } else { mv.raw() },
            depth: depth.clamp(0, u8::MAX as i32) as u8,
            bound: bound as u8,
            age,
        };
    }

    /// Occupied slots per thousand over a sample of the first buckets.
    pub fn hashfull(&self) -> usize {
        let sample = self.buckets.len().min(HASHFULL_SAMPLE);
        let used: usize = self.buckets[..sample]
            .iter()
            .map(|b| b.entries.iter().filter(|e| e.bound != 0).count())
            .sum();
        used * 1000 / (sample * ENTRIES_PER_BUCKET)
    }
}

/// Slot with the lowest replacement value: shallow and stale entries go
/// first, exact entries are kept a little longer.
fn victim(entries: &[Entry; ENTRIES_PER_BUCKET], age: u8) -> usize {
    let value = |e: &Entry| {
        let staleness = age.wrapping_sub(e.age) as i32;
        let exact = if e.bound == Bound::Exact as u8 { 2 } else { 0 };
        e.depth as i32 - 8 * staleness + exact
    };
    (0..ENTRIES_PER_BUCKET)
        .min_by_key(|&i| value(&entries[i]))
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
