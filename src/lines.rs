// SPDX-License-Identifier: MIT

//! Splitting raw text into line tokens for comparison.

/// Split `text` into line tokens.
///
/// LF is the separator whenever the text contains one (CRLF input is
/// handled by the trimming below); a text that only uses CR is split on CR.
/// Leading and trailing line-break characters are stripped from each token
/// so that the line-break convention never influences token equality.
pub fn split_lines(text: &str) -> Vec<&str> {
    let has_lf = text.contains('\n');
    let has_cr = text.contains('\r');
    let separator = if has_lf || !has_cr { '\n' } else { '\r' };

    text.split(separator)
        .map(|line| line.trim_matches(|ch| ch == '\n' || ch == '\r'))
        .collect()
}

/// Junk classifier for line or character tokens: a token consisting of a
/// single whitespace character carries no alignment information.
pub fn default_junk(token: &&str) -> bool {
    matches!(*token, " " | "\t" | "\n" | "\x0c" | "\r")
}
