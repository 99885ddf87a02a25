//! PPTX writer tests

mod deck;
