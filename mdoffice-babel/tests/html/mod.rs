//! HTML reader tests

mod import;
