// SPDX-License-Identifier: MIT

pub mod cli;
pub mod lines;
pub mod matcher;
pub mod render;
pub mod utils;
