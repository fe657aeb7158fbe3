//! Evaluation of a classifier against sampled test files.
//!
//! - **verdict**: argmax of a confidence vector vs. the ground truth
//! - **results**: per-label result collections
//! - **evaluator**: sequential run over the sampled files
//! - **aggregate**: parallel prediction / truth / confidence arrays
//! - **store**: JSON persistence of result sets

pub mod aggregate;
pub mod evaluator;
pub mod results;
pub mod store;
pub mod verdict;

pub use aggregate::{aggregate, extract_class, Aggregate};
pub use evaluator::{EvaluationOptions, EvaluationRun, Evaluator};
pub use results::{ClassResults, ResultSet};
pub use store::ResultStore;
pub use verdict::eval_result;
