pub mod bootstrap;
pub mod pacing;
pub mod runner;

pub use bootstrap::run;
pub use pacing::{Pacer, PauseReason, TokioPacer};
pub use runner::{BatchRunner, RunReport, TickerOutcome, TickerReport};
