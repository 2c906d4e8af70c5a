//! Critic OpenAI - analysis service over an OpenAI-compatible API
//!
//! This crate implements [`critic_core::AnalysisService`] by sending chat
//! completion requests with capability-specific prompts.

mod client;
mod error;
pub mod prompts;

pub use client::{endpoint_url, OpenAiAnalyzer};
pub use error::{Error, Result};
