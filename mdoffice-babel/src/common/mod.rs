//! Format-agnostic helpers shared by several readers and writers.

pub mod package;
pub mod table;
pub mod xml;
