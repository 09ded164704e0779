//! Shared helpers for the end-to-end tests

pub mod init_pure_tests;
