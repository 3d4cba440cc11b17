//! Sliding-piece attack lookup.
//!
//! Each square gets a [`Magic`] entry mapping the relevant blockers to an
//! index into one shared attack array. With BMI2 available the index is the
//! PEXT of the occupancy; otherwise it is the classic multiply-and-shift,
//! with multipliers found by a seeded random search the first time the
//! tables are touched.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::trace;

use crate::attacks::{Direction, sliding_attacks_slow};
use crate::bitboard::Bitboard;
use crate::types::Square;

const USE_PEXT: bool = cfg!(all(target_arch = "x86_64", target_feature = "bmi2"));
const MAGIC_SEED: u64 = 0x4B45_5354_5245_4C21;

/// Per-square lookup record.
#[derive(Clone, Copy, Debug, Default)]
pub struct Magic {
    /// Relevant occupancy: the empty-board rays without their final edge square.
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u32,
    pub offset: usize,
}

impl Magic {
    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    #[inline(always)]
    pub fn index(&self, occupied: Bitboard) -> usize {
        // SAFETY: the bmi2 target feature is enabled for this build.
        let bits = unsafe { core::arch::x86_64::_pext_u64(occupied.0, self.mask.0) };
        self.offset + bits as usize
    }

    #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
    #[inline(always)]
    pub fn index(&self, occupied: Bitboard) -> usize {
        let hash = (occupied.0 & self.mask.0).wrapping_mul(self.magic) >> self.shift;
        self.offset + hash as usize
    }
}

pub struct SliderTable {
    magics: [Magic; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(dirs: &[Direction], rng: &mut StdRng) -> SliderTable {
        let mut magics = [Magic::default(); 64];
        let mut attacks = Vec::new();
        let mut occupancies = Vec::with_capacity(4096);
        let mut reference = Vec::with_capacity(4096);
        let mut scratch = Vec::with_capacity(4096);

        for sq in 0..64u8 {
            let mask = relevant_mask(dirs, sq);
            let bits = mask.popcount();

            occupancies.clear();
            reference.clear();
            for subset in subsets(mask) {
                occupancies.push(subset);
                reference.push(sliding_attacks_slow(dirs, sq, subset));
            }

            let magic = if USE_PEXT {
                0
            } else {
                find_magic(mask, bits, &occupancies, &reference, &mut scratch, rng)
            };
            let entry = Magic {
                mask,
                magic,
                shift: 64 - bits,
                offset: attacks.len(),
            };

            attacks.resize(attacks.len() + (1usize << bits), Bitboard::EMPTY);
            for (occ, att) in occupancies.iter().zip(&reference) {
                attacks[entry.index(*occ)] = *att;
            }
            magics[sq as usize] = entry;
        }

        SliderTable { magics, attacks }
    }

    #[inline(always)]
    pub fn attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.magics[sq as usize];
        self.attacks[entry.index(occupied)]
    }

    pub fn magic(&self, sq: Square) -> &Magic {
        &self.magics[sq as usize]
    }

    /// Number of entries in the shared attack array.
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

/// Rays from `sq` on an empty board, minus edge squares the ray ends on.
pub fn relevant_mask(dirs: &[Direction], sq: Square) -> Bitboard {
    let own_rank = Bitboard::rank(sq / 8);
    let own_file = Bitboard::file(sq % 8);
    let edges = ((Bitboard::RANK_1 | Bitboard::RANK_8) & !own_rank)
        | ((Bitboard::FILE_A | Bitboard::FILE_H) & !own_file);
    sliding_attacks_slow(dirs, sq, Bitboard::EMPTY) & !edges & !Bitboard::from_square(sq)
}

/// Every subset of `mask`, starting with the empty set (carry-rippler).
pub fn subsets(mask: Bitboard) -> impl Iterator<Item = Bitboard> {
    let mut subset = 0u64;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = Bitboard(subset);
        subset = subset.wrapping_sub(mask.0) & mask.0;
        done = subset == 0;
        Some(current)
    })
}

fn find_magic(
    mask: Bitboard,
    bits: u32,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
    used: &mut Vec<Bitboard>,
    rng: &mut StdRng,
) -> u64 {
    let shift = 64 - bits;
    loop {
        // Sparse candidates hash well.
        let magic = rng.next_u64() & rng.next_u64() & rng.next_u64();
        if (mask.0.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        used.clear();
        used.resize(1usize << bits, Bitboard::EMPTY);
        // Slider attack sets are never empty, so EMPTY marks a free slot.
        let collision = occupancies.iter().zip(reference).any(|(occ, att)| {
            let idx = (occ.0.wrapping_mul(magic) >> shift) as usize;
            if used[idx].is_empty() {
                used[idx] = *att;
                false
            } else {
                used[idx] != *att
            }
        });
        if !collision {
            return magic;
        }
    }
}

static TABLES: LazyLock<(SliderTable, SliderTable)> = LazyLock::new(|| {
    let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
    let bishops = SliderTable::build(&Direction::BISHOP, &mut rng);
    let rooks = SliderTable::build(&Direction::ROOK, &mut rng);
    trace!(
        pext = USE_PEXT,
        bishop_entries = bishops.len(),
        rook_entries = rooks.len(),
        "slider attack tables built"
    );
    (bishops, rooks)
});

pub fn bishop_table() -> &'static SliderTable {
    &TABLES.0
}

pub fn rook_table() -> &'static SliderTable {
    &TABLES.1
}

#[inline(always)]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    TABLES.0.attacks(sq, occupied)
}

#[inline(always)]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    TABLES.1.attacks(sq, occupied)
}

#[cfg(test)]
#[path = "magic_tests.rs"]
mod magic_tests;
