//! Search side of the Kestrel chess engine: move ordering, the
//! transposition table, principal variation search and the facade the
//! protocol adapter drives.

pub mod config;
pub mod engine;
pub mod eval;
pub mod ordering;
pub mod search;
pub mod tt;

pub use config::{ConfigError, EngineConfig, SearchParams};
pub use engine::{Engine, SearchRequest};
pub use eval::{Evaluator, MATE, MaterialEvaluator, is_mate_score};
pub use search::{IterationInfo, ScoreReport, SearchOutcome, Searcher};
pub use tt::{Bound, TranspositionTable};
