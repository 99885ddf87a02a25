//! DOCX writer tests, read back through the zip package.

mod export;
