//! email-triage adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `llm`: Chat provider adapters (OpenAI-compatible HTTP, stub)
//! - `document`: Text extraction from uploaded files

pub mod document;
pub mod llm;
