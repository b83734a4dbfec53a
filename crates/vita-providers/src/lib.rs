//! vita-providers: completion-service implementations for vita
//!
//! This crate provides implementations of the Provider trait. Any
//! OpenAI-compatible endpoint works; the vendor is a deployment detail.

pub mod openai;

pub use openai::OpenAIProvider;
