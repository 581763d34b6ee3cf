//! Unit test suite for the translation pipeline.
//!
//! These tests build source query models by hand, run them through the
//! translator and formatter, and check the emitted SQL end to end.

mod support;

mod statement_formatting_tests;
mod translation_tests;
