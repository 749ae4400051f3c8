use thiserror::Error;

use crate::wheel::layout::SectorColor;

/// Why a spin request was not started. Recoverable UI conditions, not failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpinRejection {
    #[error("a spin is already in progress")]
    Busy,
    #[error("no color or number selected")]
    NoSelection,
    #[error("no bet amount selected")]
    NoBet,
    #[error("insufficient balance (balance={balance}, bet={bet})")]
    InsufficientBalance { balance: u64, bet: u64 },
}

/// Failure of the result authority round trip. Always aborts the spin.
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("result service unreachable: {0}")]
    Transport(String),
    #[error("result service timed out after {waited_secs:.1}s")]
    Timeout { waited_secs: f32 },
    #[error("result service refused the spin: {0}")]
    Rejected(String),
    #[error("malformed result: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("winning index {index} out of range (sectors={sector_count})")]
    IndexOutOfRange { index: i64, sector_count: usize },
    #[error("invalid wheel order ({len} sectors)")]
    InvalidWheel { len: usize },
    #[error("winning number {number} does not match sector {index} ({expected})")]
    NumberMismatch { index: usize, number: u32, expected: u32 },
    #[error("unknown color class {0:?}")]
    UnknownColor(String),
    #[error("color {color} does not match number {number} ({expected})")]
    ColorMismatch { number: u32, color: SectorColor, expected: SectorColor },
    /// Reply for a request that is no longer waiting. Does not abort anything.
    #[error("no spin is waiting for ticket {0}")]
    StaleTicket(u32),
}

impl AuthorityError {
    /// Transport-level problems (as opposed to a refusal by the authority).
    pub fn is_connection_error(&self) -> bool {
        matches!(self, AuthorityError::Transport(_) | AuthorityError::Timeout { .. })
    }
}

/// Invalid tuning values in a `SpinConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be in (0, 1) (got {value})")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("{field} must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("chip_values must be non-empty and > 0")]
    InvalidChips,
    #[error("default_chip {index} out of range (chips={count})")]
    DefaultChipOutOfRange { index: usize, count: usize },
}
