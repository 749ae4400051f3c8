pub mod api;
pub mod core;
pub mod wheel;
pub mod spin;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::SpinConfig;
pub use api::types::{event_kind, GameEvent};
pub use crate::core::angle::{normalize_angle, wrap_to_pi, AngleModel, RotatingBody};
pub use crate::core::integrator::Integrator;
pub use crate::core::time::FixedTimestep;
pub use wheel::{SectorColor, SectorLayout, EUROPEAN_WHEEL};
pub use spin::{
    BetSelection, History, HistoryEntry, SessionEvent, SpinOutcome, SpinPhase, SpinSession,
    SpinTicket, StatusMessage, Wallet,
};
pub use spin::convergence::{frame_bound, ConvergenceController, ConvergenceStep};
pub use spin::settle::{SettleController, SettleStep};
pub use systems::pose::WheelPose;
pub use bridge::protocol::{parse_reply, SpinRequest, SpinResponse};
pub use input::queue::{input_kind, InputEvent, InputQueue};
pub use error::{AuthorityError, ConfigError, SpinRejection};

// Extensions: decoupled optional helpers
pub use extensions::{ease, lerp, Easing};
