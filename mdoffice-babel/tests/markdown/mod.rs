//! Markdown dialect tests
//!
//! Block structure of the line parser, plus property tests for inline spans and
//! list nesting.

mod blocks;
mod properties;
