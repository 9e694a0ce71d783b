pub mod attempt;
pub mod engine;
pub mod error;
pub mod export;
pub mod hashcat;
pub mod hashes;
pub mod io;
pub mod ledger;
pub mod modes;
pub mod pot;
pub mod report;
pub mod scratch;
pub mod signal;
pub mod stats;

pub mod prelude {
    pub use crate::attempt::{AttemptRecord, ModeId, Outcome};
    pub use crate::engine::{DetectStrategy, Engine, RunConfig, RunReport};
    pub use crate::hashcat::{Cracker, Hashcat};
    pub use crate::ledger::Ledger;
}
