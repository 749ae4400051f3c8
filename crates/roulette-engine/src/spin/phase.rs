/// Spin state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    /// Waiting for the result authority. Nothing is animated toward a target yet.
    Requesting,
    FreeSpin,
    Converging,
    Settling,
    Done,
}

impl SpinPhase {
    /// Whether a new spin may start from this phase.
    pub fn accepts_spin(self) -> bool {
        matches!(self, SpinPhase::Idle | SpinPhase::Done)
    }

    /// Whether bet controls should be disabled.
    pub fn is_busy(self) -> bool {
        !self.accepts_spin()
    }

    pub fn code(self) -> u32 {
        match self {
            SpinPhase::Idle => 0,
            SpinPhase::Requesting => 1,
            SpinPhase::FreeSpin => 2,
            SpinPhase::Converging => 3,
            SpinPhase::Settling => 4,
            SpinPhase::Done => 5,
        }
    }
}
