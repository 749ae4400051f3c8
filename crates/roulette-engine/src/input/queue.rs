use crate::wheel::layout::SectorColor;

/// Player actions the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Toggle a color bet.
    SelectColor(SectorColor),
    /// Toggle a straight-up number bet.
    SelectNumber(u32),
    ClearSelection,
    /// Pick a chip by index into the configured chip values.
    SelectChip(usize),
    Spin,
    ToggleAutoSpin,
}

/// Numeric input codes used by the JS bridge.
pub mod input_kind {
    pub const SELECT_COLOR: u32 = 1;
    pub const SELECT_NUMBER: u32 = 2;
    pub const CLEAR_SELECTION: u32 = 3;
    pub const SELECT_CHIP: u32 = 4;
    pub const SPIN: u32 = 5;
    pub const TOGGLE_AUTO_SPIN: u32 = 6;
}

impl InputEvent {
    /// Decode a `(kind, arg)` pair sent from the UI layer.
    /// Returns `None` for unknown kinds or arguments.
    pub fn from_code(kind: u32, arg: u32) -> Option<Self> {
        match kind {
            input_kind::SELECT_COLOR => SectorColor::from_code(arg).map(InputEvent::SelectColor),
            input_kind::SELECT_NUMBER => Some(InputEvent::SelectNumber(arg)),
            input_kind::CLEAR_SELECTION => Some(InputEvent::ClearSelection),
            input_kind::SELECT_CHIP => Some(InputEvent::SelectChip(arg as usize)),
            input_kind::SPIN => Some(InputEvent::Spin),
            input_kind::TOGGLE_AUTO_SPIN => Some(InputEvent::ToggleAutoSpin),
            _ => None,
        }
    }
}

/// A queue of input events.
/// JS pushes events as the player clicks; the runner drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
