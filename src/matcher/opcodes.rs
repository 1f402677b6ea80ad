// SPDX-License-Identifier: MIT

use std::ops::Range;

use super::Match;

/// Edit operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One edit operation covering a contiguous span of both sequences.
///
/// The opcodes of a comparison jointly partition `0..base_len` and
/// `0..target_len`: each opcode's end positions equal the next opcode's
/// start positions, and the last opcode ends at the sequence lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub base_start: usize,
    pub base_end: usize,
    pub target_start: usize,
    pub target_end: usize,
}

impl Opcode {
    pub fn new(
        tag: OpTag,
        base_start: usize,
        base_end: usize,
        target_start: usize,
        target_end: usize,
    ) -> Self {
        Opcode {
            tag,
            base_start,
            base_end,
            target_start,
            target_end,
        }
    }

    pub fn base_range(&self) -> Range<usize> {
        self.base_start..self.base_end
    }

    pub fn target_range(&self) -> Range<usize> {
        self.target_start..self.target_end
    }
}

/// Convert sorted matching blocks into a full edit script.
///
/// The gap before each block is classified by which sides are non-empty:
/// both yield a replace, only the base side a delete, only the target side
/// an insert. The block itself follows as an equal opcode, except for the
/// zero-size terminal block.
pub fn opcodes_from_blocks(blocks: &[Match]) -> Vec<Opcode> {
    let mut base_pos = 0;
    let mut target_pos = 0;
    let mut script = Vec::new();
    for m in blocks {
        let tag = if base_pos < m.base && target_pos < m.target {
            Some(OpTag::Replace)
        } else if base_pos < m.base {
            Some(OpTag::Delete)
        } else if target_pos < m.target {
            Some(OpTag::Insert)
        } else {
            None
        };
        if let Some(tag) = tag {
            script.push(Opcode::new(tag, base_pos, m.base, target_pos, m.target));
        }
        base_pos = m.base + m.size;
        target_pos = m.target + m.size;
        if m.size != 0 {
            script.push(Opcode::new(
                OpTag::Equal,
                m.base,
                base_pos,
                m.target,
                target_pos,
            ));
        }
    }
    script
}

/// Collapse long equal runs into bounded context windows, producing the
/// opcode groups ("hunks") of a display-sized diff.
///
/// Leading unchanged content is trimmed to the trailing `context` tokens,
/// trailing unchanged content to the leading `context` tokens. An equal
/// opcode spanning more than `2 * context` tokens is split: its head closes
/// out the current group and its tail seeds the next one. A final group
/// consisting of a single equal opcode is suppressed, so unchanged inputs
/// produce no groups at all.
pub fn group_opcodes(opcodes: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes = opcodes.to_vec();
    if codes.is_empty() {
        codes.push(Opcode::new(OpTag::Equal, 0, 1, 0, 1));
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == OpTag::Equal {
            first.base_start = first.base_start.max(first.base_end.saturating_sub(context));
            first.target_start = first
                .target_start
                .max(first.target_end.saturating_sub(context));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == OpTag::Equal {
            last.base_end = last.base_end.min(last.base_start + context);
            last.target_end = last.target_end.min(last.target_start + context);
        }
    }

    let mut groups: Vec<Vec<Opcode>> = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();
    for mut code in codes {
        if code.tag == OpTag::Equal && code.base_end - code.base_start > 2 * context {
            group.push(Opcode::new(
                code.tag,
                code.base_start,
                code.base_end.min(code.base_start + context),
                code.target_start,
                code.target_end.min(code.target_start + context),
            ));
            groups.push(std::mem::take(&mut group));
            code.base_start = code.base_start.max(code.base_end - context);
            code.target_start = code.target_start.max(code.target_end - context);
        }
        group.push(code);
    }
    if !group.is_empty() && !(group.len() == 1 && group[0].tag == OpTag::Equal) {
        groups.push(group);
    }
    groups
}
