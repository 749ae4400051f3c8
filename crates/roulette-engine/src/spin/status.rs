use std::fmt;

use crate::error::{AuthorityError, SpinRejection};
use crate::spin::outcome::SpinOutcome;
use crate::wheel::layout::SectorColor;

/// The single line of status text shown under the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusMessage {
    #[default]
    ChooseBet,
    Rejected(SpinRejection),
    Spinning,
    ConnectionError,
    /// The authority refused the spin and said why.
    Refused(String),
    InvalidResult,
    Won { payout: u64, number: u32, color: SectorColor },
    Lost { number: u32, color: SectorColor },
    NextBet,
}

impl StatusMessage {
    pub fn for_outcome(outcome: &SpinOutcome) -> Self {
        if outcome.is_win() {
            StatusMessage::Won {
                payout: outcome.payout,
                number: outcome.number,
                color: outcome.color,
            }
        } else {
            StatusMessage::Lost {
                number: outcome.number,
                color: outcome.color,
            }
        }
    }

    pub fn for_error(err: &AuthorityError) -> Self {
        match err {
            AuthorityError::Transport(_) | AuthorityError::Timeout { .. } => StatusMessage::ConnectionError,
            AuthorityError::Rejected(reason) => StatusMessage::Refused(reason.clone()),
            _ => StatusMessage::InvalidResult,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusMessage::Rejected(_)
                | StatusMessage::ConnectionError
                | StatusMessage::Refused(_)
                | StatusMessage::InvalidResult
        )
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::ChooseBet => f.write_str("Choose a color and a bet..."),
            StatusMessage::Rejected(SpinRejection::NoSelection) => f.write_str("Choose a color first"),
            StatusMessage::Rejected(SpinRejection::NoBet) => f.write_str("Choose a chip first"),
            StatusMessage::Rejected(SpinRejection::InsufficientBalance { .. }) => {
                f.write_str("Insufficient balance")
            }
            StatusMessage::Rejected(SpinRejection::Busy) => f.write_str("Spinning..."),
            StatusMessage::Spinning => f.write_str("Spinning..."),
            StatusMessage::ConnectionError => f.write_str("Connection error. Try again."),
            StatusMessage::Refused(reason) => f.write_str(reason),
            StatusMessage::InvalidResult => f.write_str("The server sent an invalid result. Try again."),
            StatusMessage::Won { payout, number, color } => {
                write!(f, "You won ${payout}! Landed on {number} {color}.")
            }
            StatusMessage::Lost { number, color } => write!(f, "You lost. Landed on {number} {color}."),
            StatusMessage::NextBet => f.write_str("Place your next bet..."),
        }
    }
}
