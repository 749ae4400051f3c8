pub mod convergence;
pub mod outcome;
pub mod phase;
pub mod session;
pub mod settle;
pub mod status;
pub mod wallet;

pub use outcome::SpinOutcome;
pub use phase::SpinPhase;
pub use session::{SessionEvent, SpinSession, SpinTicket};
pub use status::StatusMessage;
pub use wallet::{BetSelection, History, HistoryEntry, Wallet};
