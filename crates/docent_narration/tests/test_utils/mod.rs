//! Test utilities for Docent narration tests.
//!
//! This module provides a scripted generator and Chinese text fixtures.

pub mod fixtures;
pub mod mock_generator;

#[allow(unused_imports)]
pub use fixtures::{chinese_paragraph, chinese_sentence, script_json};
#[allow(unused_imports)]
pub use mock_generator::{MockBehavior, MockGenerator, MockResponse, RecordedCall};
