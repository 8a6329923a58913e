//! Candidate masks: subset encoding, canonical rendering, random generation.

use std::fmt::Write as _;

use rand::prelude::*;

use crate::schema::{CrossoverType, PatternCatalog};

/// Boolean selection over the pattern catalog, one bit per pattern.
///
/// Produced by the search engine, consumed but never mutated by the
/// evaluation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateMask {
    bits: Vec<bool>,
}

impl CandidateMask {
    /// Wrap a bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All-zero mask of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// All-one mask of the given length.
    pub fn ones(len: usize) -> Self {
        Self {
            bits: vec![true; len],
        }
    }

    /// Mask length N.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the zero-length mask.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at position `i`. Out-of-range positions read as unselected.
    pub fn get(&self, i: usize) -> bool {
        self.bits.get(i).copied().unwrap_or(false)
    }

    /// Set bit `i`.
    pub fn set(&mut self, i: usize, value: bool) {
        self.bits[i] = value;
    }

    /// The underlying bit slice, bit `i` selecting catalog entry `i`.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of selected patterns.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Selected subset of the catalog, preserving catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Selected pattern descriptors in catalog order.
    pub patterns: Vec<&'a str>,
    /// Number of selected patterns.
    pub count: usize,
}

/// Materialize the patterns a mask selects.
///
/// Any mask of the catalog's length is valid input, including all-zero and
/// all-one. Bits beyond the catalog length are ignored.
pub fn encode<'a>(mask: &CandidateMask, catalog: &'a PatternCatalog) -> Selection<'a> {
    let mut patterns = Vec::with_capacity(mask.count_ones());
    for (i, pattern) in catalog.iter().enumerate() {
        if mask.get(i) {
            patterns.push(pattern);
        }
    }
    let count = patterns.len();
    Selection { patterns, count }
}

/// Canonical fixed-width hexadecimal rendering of a mask.
///
/// Bit 0 is the least significant digit; the result is left-padded with
/// zeros to one character per byte of mask length. Cosmetic only: used for
/// progress display and log deduplication, never fed back into the search.
pub fn render_hex(mask: &CandidateMask) -> String {
    let n = mask.len();
    let min_width = n.div_ceil(8);
    let nibbles = n.div_ceil(4);

    let mut digits = String::with_capacity(nibbles.max(1));
    for j in (0..nibbles).rev() {
        let mut value = 0u8;
        for b in 0..4 {
            if mask.get(j * 4 + b) {
                value |= 1 << b;
            }
        }
        let _ = write!(digits, "{value:x}");
    }

    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{digits:0>min_width$}")
}

/// Seeded random-mask generator.
///
/// Used by the engine for population initialization, crossover, and
/// mutation, and by the driver's random-search baseline. Injectable so
/// tests can pin the sequence.
pub struct MaskRng {
    rng: StdRng,
}

impl MaskRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with an entropy seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform random mask: each bit set with probability 0.5.
    pub fn random_mask(&mut self, len: usize) -> CandidateMask {
        CandidateMask::new((0..len).map(|_| self.rng.gen_bool(0.5)).collect())
    }

    /// Recombine two equal-length parents according to the crossover style.
    pub fn crossover(
        &mut self,
        a: &CandidateMask,
        b: &CandidateMask,
        style: CrossoverType,
    ) -> CandidateMask {
        debug_assert_eq!(a.len(), b.len());
        let n = a.len();
        let bits = match style {
            CrossoverType::Uniform => (0..n)
                .map(|i| {
                    if self.rng.gen_bool(0.5) {
                        a.get(i)
                    } else {
                        b.get(i)
                    }
                })
                .collect(),
            CrossoverType::OnePoint => {
                let cut = self.rng.gen_range(0..=n);
                (0..n)
                    .map(|i| if i < cut { a.get(i) } else { b.get(i) })
                    .collect()
            }
            CrossoverType::TwoPoint => {
                let mut lo = self.rng.gen_range(0..=n);
                let mut hi = self.rng.gen_range(0..=n);
                if lo > hi {
                    std::mem::swap(&mut lo, &mut hi);
                }
                (0..n)
                    .map(|i| if i >= lo && i < hi { b.get(i) } else { a.get(i) })
                    .collect()
            }
        };
        CandidateMask::new(bits)
    }

    /// Flip each bit independently with probability `rate`.
    pub fn mutate(&mut self, mask: &mut CandidateMask, rate: f64) {
        for i in 0..mask.len() {
            if self.rng.gen_bool(rate) {
                let flipped = !mask.get(i);
                mask.set(i, flipped);
            }
        }
    }

    /// Uniform index into `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Bernoulli draw with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new(vec![
            "p0".to_string(),
            "p1".to_string(),
            "p2".to_string(),
            "p3".to_string(),
            "p4".to_string(),
        ])
    }

    #[test]
    fn encode_all_ones_returns_catalog_order() {
        let catalog = catalog();
        let selection = encode(&CandidateMask::ones(5), &catalog);
        assert_eq!(selection.patterns, vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(selection.count, 5);
    }

    #[test]
    fn encode_all_zeros_is_empty() {
        let catalog = catalog();
        let selection = encode(&CandidateMask::zeros(5), &catalog);
        assert!(selection.patterns.is_empty());
        assert_eq!(selection.count, 0);
    }

    #[test]
    fn encode_preserves_order() {
        let mask = CandidateMask::new(vec![true, false, false, true, true]);
        let catalog = catalog();
        let selection = encode(&mask, &catalog);
        assert_eq!(selection.patterns, vec!["p0", "p3", "p4"]);
        assert_eq!(selection.count, 3);
    }

    #[test]
    fn encode_empty_catalog() {
        let catalog = PatternCatalog::default();
        let selection = encode(&CandidateMask::zeros(0), &catalog);
        assert!(selection.patterns.is_empty());
    }

    #[test]
    fn render_hex_basic() {
        // bits 0 and 4 set -> 0b10001 = 0x11
        let mask = CandidateMask::new(vec![true, false, false, false, true]);
        assert_eq!(render_hex(&mask), "11");
    }

    #[test]
    fn render_hex_pads_to_byte_width() {
        // 9 bits -> minimum width 2, value 1
        let mut mask = CandidateMask::zeros(9);
        mask.set(0, true);
        assert_eq!(render_hex(&mask), "01");
    }

    #[test]
    fn render_hex_zero_masks() {
        assert_eq!(render_hex(&CandidateMask::zeros(0)), "0");
        assert_eq!(render_hex(&CandidateMask::zeros(4)), "0");
        assert_eq!(render_hex(&CandidateMask::zeros(16)), "00");
    }

    #[test]
    fn render_hex_all_ones() {
        assert_eq!(render_hex(&CandidateMask::ones(8)), "ff");
        assert_eq!(render_hex(&CandidateMask::ones(10)), "3ff");
    }

    #[test]
    fn random_mask_is_reproducible() {
        let a = MaskRng::new(7).random_mask(64);
        let b = MaskRng::new(7).random_mask(64);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn crossover_preserves_length_and_sources() {
        let mut rng = MaskRng::new(1);
        let a = CandidateMask::ones(32);
        let b = CandidateMask::zeros(32);
        for style in [
            CrossoverType::Uniform,
            CrossoverType::OnePoint,
            CrossoverType::TwoPoint,
        ] {
            let child = rng.crossover(&a, &b, style);
            assert_eq!(child.len(), 32);
        }
    }

    #[test]
    fn one_point_crossover_is_prefix_suffix() {
        let mut rng = MaskRng::new(3);
        let a = CandidateMask::ones(16);
        let b = CandidateMask::zeros(16);
        let child = rng.crossover(&a, &b, CrossoverType::OnePoint);
        // all ones, then all zeros
        let cut = child.bits().iter().filter(|&&bit| bit).count();
        assert!(child.bits()[..cut].iter().all(|&bit| bit));
        assert!(child.bits()[cut..].iter().all(|&bit| !bit));
    }

    #[test]
    fn mutation_rate_extremes() {
        let mut rng = MaskRng::new(5);
        let mut mask = CandidateMask::zeros(20);
        rng.mutate(&mut mask, 0.0);
        assert_eq!(mask.count_ones(), 0);
        rng.mutate(&mut mask, 1.0);
        assert_eq!(mask.count_ones(), 20);
    }

    #[test]
    fn crossover_handles_zero_length() {
        let mut rng = MaskRng::new(9);
        let empty = CandidateMask::zeros(0);
        let child = rng.crossover(&empty, &empty, CrossoverType::TwoPoint);
        assert!(child.is_empty());
    }
}
