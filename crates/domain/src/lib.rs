//! email-triage domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `normalize`: Whitespace and stop-word normalization
//! - `prompt`: Prompt construction for the chat provider
//! - `interpret`: Best-effort interpretation of model output
//! - `usecases`: Application use cases / business logic

pub mod interpret;
pub mod model;
pub mod normalize;
pub mod ports;
pub mod prompt;
pub mod usecases;

pub use model::*;
pub use ports::*;
