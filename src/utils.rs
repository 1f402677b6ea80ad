// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub fn err_from_str(msg: &str) -> Box<dyn std::error::Error> {
    msg.into()
}

/// Run `f` and prefix any errors with the string returned by `prefix`.
pub fn try_forward<'a, F, R, C, S>(f: F, prefix: C) -> Result<R>
where
    F: FnOnce() -> Result<R>,
    C: 'a + Fn() -> S,
    S: Into<String>,
{
    #[derive(Debug)]
    struct PrefixedError {
        prefix: String,
        cause: Box<dyn std::error::Error>,
    }
    impl std::fmt::Display for PrefixedError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}: {}", self.prefix, self.cause)
        }
    }
    impl std::error::Error for PrefixedError {}

    f().map_err(|cause| {
        Box::new(PrefixedError {
            prefix: prefix().into(),
            cause,
        }) as Box<dyn std::error::Error>
    })
}

fn read_text_impl(path: &Path) -> Result<String> {
    try_forward(
        || -> Result<String> {
            let mut file = File::open(path)?;
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            Ok(text)
        },
        || path.display().to_string(),
    )
}

/// Read a whole file as UTF-8 text, prefixing errors with the path.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    read_text_impl(path.as_ref())
}
