//! JSON wire format of the result authority.
//!
//! Request body (POST):
//! ```text
//! { "balance": 1000, "bet": 10, "color": "rojo" }
//! ```
//! Success reply (both spellings of each field are accepted):
//! ```text
//! { "index" | "winningIndex": 12, "number" | "winningNumber": 36,
//!   "color" | "colorClass": "rojo", "win" | "payout": 20,
//!   "newBalance": 1010, "wheel": [0, 32, ...] }
//! ```
//! Failure reply: `{ "error": "..." }`.

use serde::{Deserialize, Serialize};

use crate::error::AuthorityError;
use crate::spin::wallet::BetSelection;

/// Body sent to the result authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRequest {
    #[serde(rename = "balance")]
    pub current_balance: u64,
    #[serde(rename = "bet")]
    pub bet_amount: u64,
    #[serde(rename = "color")]
    pub bet_selection: BetSelection,
}

impl SpinRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Successful reply, before validation against the wheel layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResponse {
    /// Signed so a negative index is reported as out of range, not as a parse error.
    #[serde(alias = "winningIndex")]
    pub index: i64,
    #[serde(alias = "winningNumber")]
    pub number: u32,
    #[serde(alias = "colorClass")]
    pub color: String,
    #[serde(alias = "payout", default)]
    pub win: u64,
    #[serde(rename = "newBalance")]
    pub new_balance: u64,
    /// Ring order for this spin, when the authority supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorityReply {
    Failure { error: String },
    Success(SpinResponse),
}

/// Parse a reply body into a response or the matching `AuthorityError`.
pub fn parse_reply(json: &str) -> Result<SpinResponse, AuthorityError> {
    match serde_json::from_str::<AuthorityReply>(json)? {
        AuthorityReply::Failure { error } => Err(AuthorityError::Rejected(error)),
        AuthorityReply::Success(response) => Ok(response),
    }
}
