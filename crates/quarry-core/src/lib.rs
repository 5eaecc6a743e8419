//! Code-aware question answering over an indexed project.
//!
//! The pipeline is a linear state machine: retrieve candidate chunks,
//! augment them with dependency-graph context, grade each chunk for
//! relevance, then generate a grounded answer from whatever survived.

pub mod augment;
pub mod error;
pub mod generate;
pub mod grade;
pub mod persona;
pub mod pipeline;
pub mod state;

pub use augment::augment;
pub use error::{PipelineError, Result};
pub use generate::{AnswerGenerator, NO_CONTEXT_ANSWER};
pub use grade::RelevanceGrader;
pub use persona::stack_persona;
pub use pipeline::{Pipeline, PipelineOutcome};
pub use state::{PipelineRequest, PipelineState, Stage, StateUpdate};
