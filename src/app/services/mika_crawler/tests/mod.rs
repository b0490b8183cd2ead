//! Tests for the Mika directory source handler

mod parser_tests;
