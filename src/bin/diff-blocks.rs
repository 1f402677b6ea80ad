// SPDX-License-Identifier: MIT

use clap::Parser;
use regex::Regex;

use diff_blocks::*;
use utils::Result;

/// Compare two text files and print the differences as bounded-context
/// hunks, or report how similar the files are.
#[derive(Parser, Debug)]
struct Cli {
    base: std::path::PathBuf,
    target: std::path::PathBuf,

    /// Number of unchanged context lines around each change
    #[clap(short = 'U', long, default_value_t = 3)]
    context: usize,

    /// Print similarity ratios instead of a diff
    #[clap(long)]
    ratio: bool,

    /// Treat lines matching the regex as junk when aligning
    #[clap(short = 'I', long, value_name = "REGEX")]
    ignore_matching_lines: Option<String>,

    #[clap(flatten)]
    output: cli::Options,
}

fn do_main() -> Result<()> {
    let args = Cli::parse();

    let base_text = utils::try_forward(|| utils::read_text(&args.base), || "base input")?;
    let target_text = utils::try_forward(|| utils::read_text(&args.target), || "target input")?;

    let base_lines = lines::split_lines(&base_text);
    let target_lines = lines::split_lines(&target_text);

    let mut matcher = match &args.ignore_matching_lines {
        Some(pattern) => {
            let junk = Regex::new(pattern)?;
            matcher::SequenceMatcher::with_junk(&base_lines, &target_lines, move |line: &&str| {
                junk.is_match(line)
            })
        }
        None => matcher::SequenceMatcher::with_junk(&base_lines, &target_lines, lines::default_junk),
    };

    let mut output = cli::Output::new(&args.output);
    if args.ratio {
        let real_quick = matcher.real_quick_ratio();
        let quick = matcher.quick_ratio();
        let exact = matcher.ratio();
        render::write_ratios(output.stream(), real_quick, quick, exact)?;
    } else {
        let groups = matcher.grouped_opcodes(args.context);
        render::write_groups(output.stream(), &base_lines, &target_lines, &groups)?;
    }

    Ok(())
}

fn main() {
    if let Err(err) = do_main() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
