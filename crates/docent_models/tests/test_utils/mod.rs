//! Test utilities for Docent provider adapter tests.

pub mod stub_provider;

#[allow(unused_imports)]
pub use stub_provider::{StubProvider, StubReply};
