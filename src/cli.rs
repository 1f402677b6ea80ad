// SPDX-License-Identifier: MIT

use std::io::IsTerminal;
use std::process::{Child, Command, Stdio};

use clap::Args;
use termcolor::{ColorChoice, StandardStream, WriteColor};

#[derive(Debug, Clone, Default, Args)]
pub struct Options {
    /// Whether the output should be run through a pager
    #[clap(long)]
    pub pager: Option<bool>,

    /// Whether the output should be colored
    #[clap(long)]
    pub color: Option<bool>,
}

/// Output sink of the command-line tool: stdout, optionally colored and
/// optionally piped through a pager.
pub struct Output {
    stream: Option<Box<dyn WriteColor>>,
    pager: Option<Child>,
}

impl Output {
    pub fn new(options: &Options) -> Output {
        let is_terminal = std::io::stdout().is_terminal();
        let use_pager = options.pager.unwrap_or(is_terminal);
        let use_color = options.color.unwrap_or(is_terminal);

        let mut pager = use_pager.then(spawn_pager).flatten();

        let stream: Box<dyn WriteColor> = match &mut pager {
            Some(pager) => {
                let stdin = pager.stdin.take().unwrap();
                if use_color {
                    Box::new(termcolor::Ansi::new(stdin))
                } else {
                    Box::new(termcolor::NoColor::new(stdin))
                }
            }
            None => {
                let choice = if use_color {
                    ColorChoice::Always
                } else {
                    ColorChoice::Never
                };
                Box::new(StandardStream::stdout(choice))
            }
        };

        Output {
            stream: Some(stream),
            pager,
        }
    }

    pub fn stream(&mut self) -> &mut dyn WriteColor {
        self.stream.as_mut().unwrap()
    }
}

fn spawn_pager() -> Option<Child> {
    let pager = std::env::var("PAGER").unwrap_or_else(|_| "less -FR".into());
    let mut words = pager.split_whitespace();
    let program = words.next()?;

    Command::new(program)
        .args(words)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .ok()
}

impl Drop for Output {
    fn drop(&mut self) {
        // Close the stream to signal EOF to the pager, if any.
        self.stream = None;

        // Wait for the pager to exit, otherwise it ends up killed by the
        // shell and leaves the terminal in a bad state.
        if let Some(pager) = &mut self.pager {
            // We don't *really* care if the wait failed -- it's best effort.
            pager.wait().unwrap_or_default();
        }
    }
}
