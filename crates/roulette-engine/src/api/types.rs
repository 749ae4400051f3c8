use bytemuck::{Pod, Zeroable};

/// A session event flattened for the browser: `kind` identifies the event,
/// `a/b/c` carry payload. Kinds are listed in `event_kind`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Event kinds written into `GameEvent::kind`.
pub mod event_kind {
    /// a = previous phase code, b = new phase code.
    pub const PHASE_CHANGED: f32 = 1.0;
    /// a = ticket; the JSON body is fetched separately.
    pub const AUTHORITY_REQUEST: f32 = 2.0;
    /// a = winning index, b = winning number, c = color code.
    pub const OUTCOME: f32 = 3.0;
    /// a = 1 when the failure was a connection problem.
    pub const ABORTED: f32 = 4.0;
    /// a = 1 when auto spin is on.
    pub const AUTO_SPIN_CHANGED: f32 = 5.0;
}
