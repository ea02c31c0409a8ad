//! UI tests for compile-time error checking.
//!
//! This package uses the `trybuild` test harness to verify that misuse of the `one_of` API is
//! rejected while the program is built, and that the compiler explains why.
//!
//! # Important limitations
//!
//! This package contains only a single test function to prevent parallel test execution.
//! `trybuild` does not support parallel test execution safely, so all UI tests are
//! consolidated into a single test function that runs sequentially.
//!
//! When adding new UI tests:
//! - Add the test file to `tests/ui/{package}/`
//! - Add the expected compiler output next to it as a `.stderr` file
//! - The test discovery uses wildcards, so new files will be picked up automatically
//! - Do NOT add additional `#[test]` functions to this package
