//! Application use cases / business logic

pub mod process;

pub use process::{
    CLASSIFICATION_TEMPERATURE, EMPTY_CONTENT_MESSAGE, ProcessConfig, ProcessEmailUseCase,
    ProcessError, Processed,
};
