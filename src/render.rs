// SPDX-License-Identifier: MIT

//! Text rendering of grouped opcodes as unified-style hunks.

use std::io;
use std::io::Write;

use lazy_static::lazy_static;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::matcher::{OpTag, Opcode};

#[derive(Default)]
struct Colors {
    hunk_header: ColorSpec,
    inserted: ColorSpec,
    deleted: ColorSpec,
}
impl Colors {
    fn new() -> Self {
        let mut colors = Colors {
            ..Default::default()
        };
        colors.hunk_header.set_fg(Some(Color::Cyan));
        colors.inserted.set_fg(Some(Color::Green));
        colors.deleted.set_fg(Some(Color::Red));
        colors
    }
}
lazy_static! {
    static ref COLORS: Colors = Colors::new();
}

/// Format one side of a hunk header: 1-based start and count, with the
/// count omitted when it is 1 and the raw offset used when it is 0.
fn format_range(start: usize, end: usize) -> String {
    let count = end - start;
    if count == 1 {
        format!("{}", start + 1)
    } else if count == 0 {
        format!("{},0", start)
    } else {
        format!("{},{}", start + 1, count)
    }
}

fn write_span(
    out: &mut dyn WriteColor,
    prefix: char,
    color: Option<&ColorSpec>,
    lines: &[&str],
) -> io::Result<()> {
    if let Some(color) = color {
        out.set_color(color)?;
    }
    for line in lines {
        writeln!(out, "{}{}", prefix, line)?;
    }
    if color.is_some() {
        out.reset()?;
    }
    Ok(())
}

/// Write the grouped opcodes of a comparison as unified-style hunks.
///
/// `base` and `target` must be the token sequences the opcodes were
/// computed from.
pub fn write_groups(
    out: &mut dyn WriteColor,
    base: &[&str],
    target: &[&str],
    groups: &[Vec<Opcode>],
) -> io::Result<()> {
    for group in groups {
        let first = group.first().unwrap();
        let last = group.last().unwrap();

        out.set_color(&COLORS.hunk_header)?;
        writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(first.base_start, last.base_end),
            format_range(first.target_start, last.target_end)
        )?;
        out.reset()?;

        for code in group {
            match code.tag {
                OpTag::Equal => {
                    write_span(out, ' ', None, &base[code.base_range()])?;
                }
                OpTag::Delete => {
                    write_span(out, '-', Some(&COLORS.deleted), &base[code.base_range()])?;
                }
                OpTag::Insert => {
                    write_span(out, '+', Some(&COLORS.inserted), &target[code.target_range()])?;
                }
                OpTag::Replace => {
                    write_span(out, '-', Some(&COLORS.deleted), &base[code.base_range()])?;
                    write_span(out, '+', Some(&COLORS.inserted), &target[code.target_range()])?;
                }
            }
        }
    }
    Ok(())
}

/// Print the three similarity ratios, cheapest first.
pub fn write_ratios(
    out: &mut dyn WriteColor,
    real_quick: f64,
    quick: f64,
    exact: f64,
) -> io::Result<()> {
    writeln!(out, "real-quick ratio: {:.3}", real_quick)?;
    writeln!(out, "quick ratio:      {:.3}", quick)?;
    writeln!(out, "ratio:            {:.3}", exact)?;
    Ok(())
}
