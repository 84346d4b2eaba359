//! Text-generation backend: client and prompt assembly

pub mod client;
pub mod prompt;

pub use client::LlmClient;
