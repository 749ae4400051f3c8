// extensions/mod.rs
//
// Optional helpers decoupled from the spin state machine.

pub mod easing;

pub use easing::{Easing, ease, lerp};
