//! skillcheck-core: Assessment model, scoring engine, and submission pipeline.
//!
//! This crate defines the question bank data model, the pure scoring
//! function that turns a submission into a graded result, and the seams
//! (result sinks, notifiers) the surrounding application plugs into.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod scoring;
pub mod session;
pub mod sink;
pub mod statistics;
pub mod submission;
pub mod traits;

pub use model::{AnswerOption, Assessment, Question, QuestionType};
pub use results::{Grade, ScoreResult, ScoredAnswer, ScoringOutcome};
pub use scoring::score;
pub use submission::Submission;
