//! EML draft tests

mod draft;
