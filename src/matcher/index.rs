// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Popularity filtering only applies to targets of at least this length.
const POPULAR_MIN_LEN: usize = 200;

/// Position index over the target sequence.
///
/// Maps each distinct token value to the ordered list of positions where it
/// occurs in the target. Junk tokens and popular tokens are kept out of the
/// index; their membership sets are retained because the match-extension
/// passes need to distinguish the two.
#[derive(Debug)]
pub struct TargetIndex<'a, T: Eq + Hash> {
    positions: HashMap<&'a T, Vec<usize>>,
    popular: HashSet<&'a T>,
    junk: HashSet<&'a T>,
}

impl<'a, T: Eq + Hash> TargetIndex<'a, T> {
    /// Build the index in two phases: tally positions per distinct token
    /// value, then partition the values into indexed, popular and junk.
    ///
    /// A token is popular when the target has at least [`POPULAR_MIN_LEN`]
    /// tokens and the token accounts for more than 1% of them. Junk
    /// classification wins over popularity: a junk token lands in the junk
    /// set no matter how frequent it is. Either way the token is absent
    /// from the index and cannot anchor a match.
    pub fn build(target: &'a [T], junk: Option<&dyn Fn(&T) -> bool>) -> Self {
        let len = target.len();

        let mut positions: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (i, token) in target.iter().enumerate() {
            positions.entry(token).or_default().push(i);
        }

        let mut popular = HashSet::new();
        let mut junk_set = HashSet::new();
        positions.retain(|&token, occurrences| {
            if junk.is_some_and(|is_junk| is_junk(token)) {
                junk_set.insert(token);
                false
            } else if len >= POPULAR_MIN_LEN && occurrences.len() * 100 > len {
                popular.insert(token);
                false
            } else {
                true
            }
        });

        TargetIndex {
            positions,
            popular,
            junk: junk_set,
        }
    }

    /// Positions in the target where `token` occurs, in increasing order.
    /// Empty for junk and popular tokens.
    pub fn positions(&self, token: &T) -> &[usize] {
        self.positions
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_junk(&self, token: &T) -> bool {
        self.junk.contains(token)
    }

    pub fn is_popular(&self, token: &T) -> bool {
        self.popular.contains(token)
    }
}
