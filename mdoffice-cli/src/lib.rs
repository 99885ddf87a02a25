//! Library half of the `mdoffice` command: the command definition, the conversion tools
//! and inspect transforms.

pub mod cli;
pub mod tools;
pub mod transforms;
