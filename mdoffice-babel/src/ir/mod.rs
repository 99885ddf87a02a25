//! Intermediate Representation (IR) for markup documents.
//!
//! Every input flavor (markdown dialect, CommonMark, HTML) lands in the same
//! block/inline taxonomy, and every renderer consumes it through exhaustive
//! matches, so adding a variant flags each renderer that must handle it.

pub mod nodes;
