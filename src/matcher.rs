// SPDX-License-Identifier: MIT

//! Longest-matching-block sequence comparison.
//!
//! [`SequenceMatcher`] compares two ordered sequences of tokens (typically
//! text lines) by repeatedly finding the longest contiguous run of equal
//! tokens, recursing into the regions before and after it. The result is a
//! set of non-overlapping matching blocks from which a complete edit script
//! of [`Opcode`]s is derived.
//!
//! The match search is driven by a position index over the target sequence
//! (see [`TargetIndex`]). Two kinds of token are kept out of that index:
//!
//! - *junk* tokens, classified by a caller-supplied predicate, which carry
//!   no alignment information (e.g. blank lines);
//! - *popular* tokens, which occur so frequently in a large target sequence
//!   that anchoring matches on them degenerates towards quadratic runtime
//!   without improving alignment quality.
//!
//! Both kinds still participate in matches: once a run has been anchored on
//! indexed tokens, it is extended across adjacent equal tokens that were
//! filtered from the index.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use itertools::Itertools;

mod index;
mod opcodes;

pub use index::TargetIndex;
pub use opcodes::{group_opcodes, opcodes_from_blocks, OpTag, Opcode};

/// A run of `size` equal tokens starting at `base` in the base sequence and
/// at `target` in the target sequence.
///
/// The matching blocks of a comparison are non-overlapping, strictly
/// increasing in both coordinates, and terminated by a synthetic zero-size
/// block at `(base_len, target_len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub base: usize,
    pub target: usize,
    pub size: usize,
}

impl Match {
    pub fn base_range(&self) -> Range<usize> {
        self.base..self.base + self.size
    }

    pub fn target_range(&self) -> Range<usize> {
        self.target..self.target + self.size
    }
}

/// Compares a base sequence against a target sequence.
///
/// All derived data (matching blocks, opcodes, target token counts) is
/// computed lazily on first request and cached. Re-binding a sequence via
/// [`set_base`](Self::set_base) or [`set_target`](Self::set_target) drops
/// the caches that depend on it; re-binding the target also rebuilds the
/// token index. Instances are independent and own all of their state, so
/// separate comparisons can run in parallel without sharing anything.
pub struct SequenceMatcher<'a, T: Eq + Hash> {
    base: &'a [T],
    target: &'a [T],
    junk: Option<Box<dyn Fn(&T) -> bool + 'a>>,
    index: TargetIndex<'a, T>,
    matching_blocks: Option<Vec<Match>>,
    opcodes: Option<Vec<Opcode>>,
    target_counts: Option<HashMap<&'a T, usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Compare `base` against `target` without a junk classifier.
    pub fn new(base: &'a [T], target: &'a [T]) -> Self {
        Self::construct(base, target, None)
    }

    /// Compare `base` against `target`, treating tokens for which `junk`
    /// returns true as unimportant for alignment.
    ///
    /// The predicate must be deterministic and side-effect-free; it is
    /// consulted during index construction and match extension.
    pub fn with_junk<F>(base: &'a [T], target: &'a [T], junk: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        Self::construct(base, target, Some(Box::new(junk)))
    }

    fn construct(
        base: &'a [T],
        target: &'a [T],
        junk: Option<Box<dyn Fn(&T) -> bool + 'a>>,
    ) -> Self {
        let index = TargetIndex::build(target, junk.as_deref());
        SequenceMatcher {
            base,
            target,
            junk,
            index,
            matching_blocks: None,
            opcodes: None,
            target_counts: None,
        }
    }

    pub fn base(&self) -> &'a [T] {
        self.base
    }

    pub fn target(&self) -> &'a [T] {
        self.target
    }

    /// Re-bind the base sequence, invalidating all results derived from it.
    /// Re-binding the identical slice is a no-op and keeps the caches.
    pub fn set_base(&mut self, base: &'a [T]) {
        if std::ptr::eq(base, self.base) {
            return;
        }
        self.base = base;
        self.matching_blocks = None;
        self.opcodes = None;
    }

    /// Re-bind the target sequence, invalidating all results derived from it
    /// and rebuilding the token index.
    /// Re-binding the identical slice is a no-op and keeps the caches.
    pub fn set_target(&mut self, target: &'a [T]) {
        if std::ptr::eq(target, self.target) {
            return;
        }
        self.target = target;
        self.matching_blocks = None;
        self.opcodes = None;
        self.target_counts = None;
        self.index = TargetIndex::build(target, self.junk.as_deref());
    }

    /// Find the longest contiguous run of equal tokens with its base start
    /// in `base_range` and its target start in `target_range`, contained in
    /// both ranges.
    ///
    /// Among runs of equal length, the one found first in a left-to-right
    /// scan of base positions wins: earliest base start, then earliest
    /// target start. If the ranges have no common token, the returned match
    /// is empty and positioned at the range starts.
    ///
    /// Both ranges must lie within the respective sequence bounds; zero
    /// length ranges are legal.
    pub fn find_longest_match(
        &self,
        base_range: Range<usize>,
        target_range: Range<usize>,
    ) -> Match {
        let Range { start: alo, end: ahi } = base_range;
        let Range { start: blo, end: bhi } = target_range;
        assert!(alo <= ahi && ahi <= self.base.len());
        assert!(blo <= bhi && bhi <= self.target.len());

        let a = self.base;
        let b = self.target;

        let mut best = Match {
            base: alo,
            target: blo,
            size: 0,
        };

        // run_len[j] is the length of the run ending at (i, j), for the base
        // position i handled most recently. Entries not refreshed while
        // handling the next base position implicitly reset to zero, which is
        // what enforces contiguity: a run breaks the moment a base token
        // fails to extend it.
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        let mut next_run_len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            next_run_len.clear();
            for &j in self.index.positions(&a[i]) {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = match j.checked_sub(1) {
                    Some(pred) => run_len.get(&pred).copied().unwrap_or(0) + 1,
                    None => 1,
                };
                next_run_len.insert(j, k);
                if k > best.size {
                    best = Match {
                        base: i + 1 - k,
                        target: j + 1 - k,
                        size: k,
                    };
                }
            }
            std::mem::swap(&mut run_len, &mut next_run_len);
        }

        // Extend the run across equal tokens that the index search could not
        // see. The pass order is a fixed contract: first across non-junk
        // tokens (popular tokens that were elided from the index), then
        // across junk tokens, each time on the left boundary before the
        // right one. Consuming junk first could mask a longer non-junk
        // extension.
        for junk_pass in [false, true] {
            while best.base > alo
                && best.target > blo
                && self.index.is_junk(&b[best.target - 1]) == junk_pass
                && a[best.base - 1] == b[best.target - 1]
            {
                best.base -= 1;
                best.target -= 1;
                best.size += 1;
            }
            while best.base + best.size < ahi
                && best.target + best.size < bhi
                && self.index.is_junk(&b[best.target + best.size]) == junk_pass
                && a[best.base + best.size] == b[best.target + best.size]
            {
                best.size += 1;
            }
        }

        #[cfg(feature = "debug-match")]
        println!(
            "find_longest_match({}..{}, {}..{}) -> ({}, {}, {})",
            alo, ahi, blo, bhi, best.base, best.target, best.size
        );

        best
    }

    /// The ordered set of non-overlapping matching blocks, including the
    /// terminal zero-size block at `(base_len, target_len)`.
    pub fn matching_blocks(&mut self) -> &[Match] {
        if self.matching_blocks.is_none() {
            self.matching_blocks = Some(self.compute_matching_blocks());
        }
        self.matching_blocks.as_deref().unwrap()
    }

    fn compute_matching_blocks(&self) -> Vec<Match> {
        let base_len = self.base.len();
        let target_len = self.target.len();

        // Depth-first over the regions surrounding each discovered match.
        // The traversal order does not affect the outcome since the blocks
        // are sorted and merged afterwards.
        let mut queue = vec![(0, base_len, 0, target_len)];
        let mut raw: Vec<Match> = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo..ahi, blo..bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.base && blo < m.target {
                queue.push((alo, m.base, blo, m.target));
            }
            if m.base + m.size < ahi && m.target + m.size < bhi {
                queue.push((m.base + m.size, ahi, m.target + m.size, bhi));
            }
            raw.push(m);
        }
        raw.sort_unstable_by_key(|m| (m.base, m.target, m.size));

        let mut blocks: Vec<Match> = Vec::new();
        for m in raw {
            match blocks.last_mut() {
                // Merge blocks that are adjacent in both coordinate spaces.
                Some(prev)
                    if prev.base + prev.size == m.base
                        && prev.target + prev.size == m.target =>
                {
                    prev.size += m.size;
                }
                _ => blocks.push(m),
            }
        }

        blocks.push(Match {
            base: base_len,
            target: target_len,
            size: 0,
        });
        blocks
    }

    /// The full edit script: opcodes jointly partitioning both sequences,
    /// each opcode's end positions equal to the next one's start positions.
    pub fn opcodes(&mut self) -> &[Opcode] {
        if self.opcodes.is_none() {
            self.matching_blocks();
            let blocks = self.matching_blocks.as_deref().unwrap();
            self.opcodes = Some(opcodes_from_blocks(blocks));
        }
        self.opcodes.as_deref().unwrap()
    }

    /// Group the opcodes into display-sized hunks with at most `context`
    /// unchanged tokens of context on each side of a change.
    pub fn grouped_opcodes(&mut self, context: usize) -> Vec<Vec<Opcode>> {
        self.opcodes();
        group_opcodes(self.opcodes.as_deref().unwrap(), context)
    }

    /// Similarity of the sequences in [0.0, 1.0], computed from the
    /// matching blocks: `2 * matched / (base_len + target_len)`.
    ///
    /// This is the most expensive of the three ratios; use
    /// [`quick_ratio`](Self::quick_ratio) and
    /// [`real_quick_ratio`](Self::real_quick_ratio) as cheaper upper bounds
    /// when filtering candidates.
    pub fn ratio(&mut self) -> f64 {
        let total = self.base.len() + self.target.len();
        let matched: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        calculate_ratio(matched, total)
    }

    /// Upper bound on [`ratio`](Self::ratio) from multiset token overlap;
    /// does not compute matching blocks.
    pub fn quick_ratio(&mut self) -> f64 {
        if self.target_counts.is_none() {
            self.target_counts = Some(self.target.iter().counts());
        }
        let full_counts = self.target_counts.as_ref().unwrap();

        // avail[token] is the number of target occurrences not yet consumed
        // by the scan over the base sequence; going negative means the base
        // side has more copies than the target side.
        let mut avail: HashMap<&T, isize> = HashMap::new();
        let mut matched = 0;
        for token in self.base {
            let remaining = match avail.get(token) {
                Some(&remaining) => remaining,
                None => full_counts.get(token).copied().unwrap_or(0) as isize,
            };
            avail.insert(token, remaining - 1);
            if remaining > 0 {
                matched += 1;
            }
        }
        calculate_ratio(matched, self.base.len() + self.target.len())
    }

    /// Upper bound on [`quick_ratio`](Self::quick_ratio) from the sequence
    /// lengths alone, ignoring content entirely.
    pub fn real_quick_ratio(&self) -> f64 {
        let base_len = self.base.len();
        let target_len = self.target.len();
        calculate_ratio(base_len.min(target_len), base_len + target_len)
    }
}

fn calculate_ratio(matched: usize, total: usize) -> f64 {
    if total != 0 {
        2.0 * matched as f64 / total as f64
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_in_middle() {
        let base = ["a", "b", "c", "d", "e"];
        let target = ["a", "x", "c", "d", "e"];
        let mut m = SequenceMatcher::new(&base, &target);

        assert_eq!(
            m.matching_blocks(),
            &[
                Match { base: 0, target: 0, size: 1 },
                Match { base: 2, target: 2, size: 3 },
                Match { base: 5, target: 5, size: 0 },
            ]
        );
        assert_eq!(
            m.opcodes(),
            &[
                Opcode::new(OpTag::Equal, 0, 1, 0, 1),
                Opcode::new(OpTag::Replace, 1, 2, 1, 2),
                Opcode::new(OpTag::Equal, 2, 5, 2, 5),
            ]
        );
    }

    #[test]
    fn insert_into_empty() {
        let base: [&str; 0] = [];
        let target = ["a"];
        let mut m = SequenceMatcher::new(&base, &target);

        assert_eq!(m.opcodes(), &[Opcode::new(OpTag::Insert, 0, 0, 0, 1)]);
        assert_eq!(m.ratio(), 0.0);
    }

    #[test]
    fn both_empty() {
        let base: [&str; 0] = [];
        let target: [&str; 0] = [];
        let mut m = SequenceMatcher::new(&base, &target);

        assert_eq!(m.matching_blocks(), &[Match { base: 0, target: 0, size: 0 }]);
        assert_eq!(m.opcodes(), &[] as &[Opcode]);
        assert_eq!(m.ratio(), 1.0);
    }

    #[test]
    fn longest_match_without_junk() {
        let base: Vec<&str> = " abcd".split("").filter(|s| !s.is_empty()).collect();
        let target: Vec<&str> = "abcd abcd".split("").filter(|s| !s.is_empty()).collect();
        let m = SequenceMatcher::new(&base, &target);

        assert_eq!(
            m.find_longest_match(0..5, 0..9),
            Match { base: 0, target: 4, size: 5 }
        );
    }

    #[test]
    fn longest_match_with_junk() {
        let base: Vec<&str> = " abcd".split("").filter(|s| !s.is_empty()).collect();
        let target: Vec<&str> = "abcd abcd".split("").filter(|s| !s.is_empty()).collect();
        let m = SequenceMatcher::with_junk(&base, &target, |token: &&str| *token == " ");

        // The junk blank cannot anchor a match, so the leading copy of
        // "abcd" wins even though the trailing " abcd" run is longer.
        assert_eq!(
            m.find_longest_match(0..5, 0..9),
            Match { base: 1, target: 0, size: 4 }
        );
    }

    #[test]
    fn empty_ranges_yield_empty_match() {
        let base = ["a", "b"];
        let target = ["a", "b"];
        let m = SequenceMatcher::new(&base, &target);

        assert_eq!(
            m.find_longest_match(1..1, 2..2),
            Match { base: 1, target: 2, size: 0 }
        );
    }

    #[test]
    fn scan_order_tie_break() {
        // Two candidate matches of length 1; the earliest base position must
        // win, and for equal base positions the earliest target position.
        let base = ["a", "b"];
        let target = ["b", "a"];
        let m = SequenceMatcher::new(&base, &target);

        assert_eq!(
            m.find_longest_match(0..2, 0..2),
            Match { base: 0, target: 1, size: 1 }
        );
    }

    #[test]
    fn cached_results_are_stable() {
        let base = ["a", "b", "c"];
        let target = ["a", "c"];
        let mut m = SequenceMatcher::new(&base, &target);

        let blocks: Vec<Match> = m.matching_blocks().to_vec();
        assert_eq!(m.matching_blocks(), &blocks[..]);
        let ops: Vec<Opcode> = m.opcodes().to_vec();
        assert_eq!(m.opcodes(), &ops[..]);
    }

    #[test]
    fn rebinding_invalidates_caches() {
        let base = ["a", "b"];
        let target = ["a", "b"];
        let new_base = ["x", "y"];
        let new_target = ["x", "y"];
        let mut m = SequenceMatcher::new(&base, &target);
        assert_eq!(m.ratio(), 1.0);

        m.set_base(&new_base);
        assert_eq!(m.ratio(), 0.0);

        m.set_target(&new_target);
        assert_eq!(m.ratio(), 1.0);
    }

    #[test]
    fn ratio_bounds_chain() {
        let pairs: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["a", "b", "c"], vec!["a", "x", "c"]),
            (vec!["a", "a", "a"], vec!["a"]),
            (vec![], vec!["a"]),
            (vec!["x"], vec!["y"]),
            (vec!["a", "b"], vec!["b", "a"]),
        ];

        for (base, target) in &pairs {
            let mut m = SequenceMatcher::new(base, target);
            let real_quick = m.real_quick_ratio();
            let quick = m.quick_ratio();
            let exact = m.ratio();
            assert!(real_quick >= quick, "{} < {}", real_quick, quick);
            assert!(quick >= exact, "{} < {}", quick, exact);
        }
    }

    #[test]
    fn exact_ratio_of_identical_sequences() {
        let seq = ["a", "b", "c", "d"];
        let mut m = SequenceMatcher::new(&seq, &seq);
        assert_eq!(m.ratio(), 1.0);
    }

    #[test]
    fn popular_tokens_are_elided_but_still_match() {
        // A target of 250 lines where every tenth line is the same token:
        // 25 occurrences, and 25 * 100 > 250, so it is popular.
        let target: Vec<String> = (0..250)
            .map(|i| {
                if i % 10 == 0 {
                    "popular".to_string()
                } else {
                    format!("line {}", i)
                }
            })
            .collect();
        let base = target.clone();
        let mut m = SequenceMatcher::new(&base, &target);

        assert!(m.index.is_popular(&"popular".to_string()));
        assert!(m.index.positions(&"popular".to_string()).is_empty());

        // The popular token still appears inside equal opcodes when it is
        // surrounded by exact matches.
        assert_eq!(m.opcodes(), &[Opcode::new(OpTag::Equal, 0, 250, 0, 250)]);
        assert_eq!(m.ratio(), 1.0);
    }

    #[test]
    fn popularity_requires_large_target() {
        // Same relative frequency, but below the length-200 threshold the
        // token stays indexed.
        let target: Vec<String> = (0..100)
            .map(|i| {
                if i % 10 == 0 {
                    "popular".to_string()
                } else {
                    format!("line {}", i)
                }
            })
            .collect();
        let base = target.clone();
        let m = SequenceMatcher::new(&base, &target);

        assert!(!m.index.is_popular(&"popular".to_string()));
        assert_eq!(m.index.positions(&"popular".to_string()).len(), 10);
    }

    #[test]
    fn junk_predicate_moves_tokens_out_of_the_index() {
        let base = ["x", "", "y"];
        let target = ["x", "", "y"];
        let m = SequenceMatcher::with_junk(&base, &target, |token: &&str| token.is_empty());

        assert!(m.index.is_junk(&""));
        assert!(m.index.positions(&"").is_empty());
        assert_eq!(m.index.positions(&"x"), &[0]);
    }
}
