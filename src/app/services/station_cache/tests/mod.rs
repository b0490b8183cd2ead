//! Tests for the SQLite station cache
