// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod logging;
pub mod timer;
pub mod validation;

pub use timer::StepTimer;
pub use validation::Validator;
