use serde::Serialize;

use crate::bridge::protocol::SpinResponse;
use crate::error::AuthorityError;
use crate::wheel::layout::{SectorColor, SectorLayout};

/// Authoritative result of one spin. Immutable once accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpinOutcome {
    pub winning_index: usize,
    pub number: u32,
    pub color: SectorColor,
    pub payout: u64,
    pub new_balance: u64,
}

impl SpinOutcome {
    pub fn label(&self) -> String {
        self.number.to_string()
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

/// An accepted reply: the outcome and the layout to animate it on.
#[derive(Debug, Clone)]
pub struct AcceptedResult {
    pub outcome: SpinOutcome,
    pub layout: SectorLayout,
}

/// Check a reply against the wheel before anything is animated.
///
/// A `wheel` order in the reply replaces `current`, and the session keeps it
/// for later spins until another reply carries a new order. The winning index
/// must address a sector of that layout, the reported number must be the value
/// printed on that sector, and the color must be that number's color.
pub fn accept(response: &SpinResponse, current: &SectorLayout) -> Result<AcceptedResult, AuthorityError> {
    let layout = match &response.wheel {
        Some(values) => current
            .with_values(values.clone())
            .ok_or(AuthorityError::InvalidWheel { len: values.len() })?,
        None => current.clone(),
    };

    let sector_count = layout.sector_count();
    if response.index < 0 || response.index as u64 >= sector_count as u64 {
        return Err(AuthorityError::IndexOutOfRange {
            index: response.index,
            sector_count,
        });
    }
    let winning_index = response.index as usize;

    let expected = layout.value_at(winning_index).unwrap_or(response.number);
    if expected != response.number {
        return Err(AuthorityError::NumberMismatch {
            index: winning_index,
            number: response.number,
            expected,
        });
    }

    let color = SectorColor::parse(&response.color)
        .ok_or_else(|| AuthorityError::UnknownColor(response.color.clone()))?;
    let expected = layout.color_of(winning_index).unwrap_or(color);
    if color != expected {
        return Err(AuthorityError::ColorMismatch {
            number: response.number,
            color,
            expected,
        });
    }

    Ok(AcceptedResult {
        outcome: SpinOutcome {
            winning_index,
            number: response.number,
            color,
            payout: response.win,
            new_balance: response.new_balance,
        },
        layout,
    })
}
