use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SpinRejection;
use crate::spin::outcome::SpinOutcome;
use crate::wheel::layout::SectorColor;

/// What the player bets on. Travels on the wire as a single string:
/// a color name or a decimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetSelection {
    Color(SectorColor),
    Number(u32),
}

impl fmt::Display for BetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSelection::Color(c) => f.write_str(c.wire_name()),
            BetSelection::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<BetSelection> for String {
    fn from(selection: BetSelection) -> Self {
        selection.to_string()
    }
}

impl TryFrom<String> for BetSelection {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if let Some(color) = SectorColor::parse(&s) {
            return Ok(BetSelection::Color(color));
        }
        s.trim()
            .parse::<u32>()
            .map(BetSelection::Number)
            .map_err(|_| format!("unknown bet selection {s:?}"))
    }
}

/// Balance, chip choice and current selection.
#[derive(Debug, Clone)]
pub struct Wallet {
    balance: u64,
    chip_values: Vec<u64>,
    chip: usize,
    selection: Option<BetSelection>,
}

impl Wallet {
    pub fn new(balance: u64, chip_values: Vec<u64>, chip: usize) -> Self {
        let chip = chip.min(chip_values.len().saturating_sub(1));
        Self {
            balance,
            chip_values,
            chip,
            selection: None,
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// The authority owns the balance; this only mirrors what it reports.
    pub fn set_balance(&mut self, balance: u64) {
        self.balance = balance;
    }

    pub fn bet(&self) -> u64 {
        self.chip_values.get(self.chip).copied().unwrap_or(0)
    }

    pub fn chip_index(&self) -> usize {
        self.chip
    }

    pub fn chip_values(&self) -> &[u64] {
        &self.chip_values
    }

    /// Returns false for an unknown chip.
    pub fn select_chip(&mut self, index: usize) -> bool {
        if index < self.chip_values.len() {
            self.chip = index;
            true
        } else {
            false
        }
    }

    pub fn selection(&self) -> Option<BetSelection> {
        self.selection
    }

    pub fn select(&mut self, selection: Option<BetSelection>) {
        self.selection = selection;
    }

    /// Select, or clear when the same selection is picked again.
    pub fn toggle(&mut self, selection: BetSelection) {
        if self.selection == Some(selection) {
            self.selection = None;
        } else {
            self.selection = Some(selection);
        }
    }

    /// Preconditions for starting a spin.
    pub fn check_bet(&self) -> Result<(BetSelection, u64), SpinRejection> {
        let selection = self.selection.ok_or(SpinRejection::NoSelection)?;
        let bet = self.bet();
        if bet == 0 {
            return Err(SpinRejection::NoBet);
        }
        if self.balance < bet {
            return Err(SpinRejection::InsufficientBalance {
                balance: self.balance,
                bet,
            });
        }
        Ok((selection, bet))
    }

    pub fn can_cover_bet(&self) -> bool {
        self.check_bet().is_ok()
    }
}

/// One past result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub number: u32,
    pub color: SectorColor,
}

/// Most recent outcomes, newest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, outcome: &SpinOutcome) {
        self.entries.push_front(HistoryEntry {
            number: outcome.number,
            color: outcome.color,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
