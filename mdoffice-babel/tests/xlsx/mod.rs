//! XLSX writer tests

mod export;
