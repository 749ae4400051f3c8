use std::collections::VecDeque;

use roulette_engine::{
    event_kind, AuthorityError, ConfigError, FixedTimestep, GameEvent, InputEvent, InputQueue,
    SessionEvent, SpinConfig, SpinRequest, SpinSession, SpinTicket, WheelPose,
};

/// Wires a `SpinSession` to the browser frame loop.
///
/// JS calls `tick` once per animation frame with the real frame time; the
/// runner turns that into fixed steps, flattens session events into a
/// `GameEvent` buffer, and queues authority requests until JS picks them up.
pub struct SpinRunner {
    session: SpinSession,
    input: InputQueue,
    timestep: FixedTimestep,
    /// Flat event buffer for the current frame.
    events: Vec<GameEvent>,
    /// Authority requests not yet taken by JS, oldest first.
    outbox: VecDeque<(SpinTicket, SpinRequest)>,
    pose: WheelPose,
}

impl SpinRunner {
    pub fn new(config: SpinConfig) -> Result<Self, ConfigError> {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let session = SpinSession::new(config)?;
        let pose = session.pose();
        Ok(Self {
            session,
            input: InputQueue::new(),
            timestep,
            events: Vec::with_capacity(16),
            outbox: VecDeque::new(),
            pose,
        })
    }

    pub fn session(&self) -> &SpinSession {
        &self.session
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input, step the session, pack events.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear();
        // Replies resolved between frames left events behind.
        self.collect_events();

        for event in self.input.drain() {
            self.session.apply_input(event);
        }
        self.collect_events();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.session.tick(self.timestep.dt());
            self.collect_events();
        }

        self.pose = self.session.pose();
    }

    /// Next request for the result authority as `{"ticket": n, "body": {...}}`.
    pub fn take_request_json(&mut self) -> Option<String> {
        let (ticket, request) = self.outbox.pop_front()?;
        let json = serde_json::json!({ "ticket": ticket.0, "body": request });
        Some(json.to_string())
    }

    /// Apply a reply body. Returns false when the reply was rejected or stale.
    pub fn resolve(&mut self, ticket: u32, body: &str) -> bool {
        match self.session.resolve_json(SpinTicket(ticket), body) {
            Ok(_) => true,
            Err(AuthorityError::StaleTicket(t)) => {
                log::warn!("dropping reply for stale ticket {t}");
                false
            }
            Err(err) => {
                log::error!("spin {ticket} rejected: {err}");
                false
            }
        }
    }

    /// Report a transport failure (fetch rejected, non-2xx, timeout on the JS side).
    pub fn fail(&mut self, ticket: u32, message: &str) -> bool {
        self.session
            .fail(SpinTicket(ticket), AuthorityError::Transport(message.to_string()))
    }

    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            let packed = match event {
                SessionEvent::PhaseChanged { from, to } => {
                    GameEvent::new(event_kind::PHASE_CHANGED, from.code() as f32, to.code() as f32, 0.0)
                }
                SessionEvent::AuthorityRequest { ticket, request } => {
                    self.outbox.push_back((ticket, request));
                    GameEvent::new(event_kind::AUTHORITY_REQUEST, ticket.0 as f32, 0.0, 0.0)
                }
                SessionEvent::Outcome(outcome) => GameEvent::new(
                    event_kind::OUTCOME,
                    outcome.winning_index as f32,
                    outcome.number as f32,
                    outcome.color.code() as f32,
                ),
                SessionEvent::Aborted { connection, .. } => {
                    // Whatever was queued for the aborted spin is dead.
                    self.outbox.clear();
                    GameEvent::new(event_kind::ABORTED, connection as u8 as f32, 0.0, 0.0)
                }
                SessionEvent::AutoSpinChanged(on) => {
                    GameEvent::new(event_kind::AUTO_SPIN_CHANGED, on as u8 as f32, 0.0, 0.0)
                }
            };
            self.events.push(packed);
        }
    }

    // ---- Accessors for the JS side ----

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn pose(&self) -> &WheelPose {
        &self.pose
    }

    pub fn pose_floats(&self) -> &[f32] {
        self.pose.as_floats()
    }

    pub fn phase_code(&self) -> u32 {
        self.session.phase().code()
    }

    pub fn status_text(&self) -> String {
        self.session.status().to_string()
    }

    pub fn status_is_error(&self) -> bool {
        self.session.status().is_error()
    }

    pub fn balance(&self) -> f64 {
        self.session.wallet().balance() as f64
    }

    pub fn bet(&self) -> f64 {
        self.session.wallet().bet() as f64
    }

    pub fn chip_index(&self) -> u32 {
        self.session.wallet().chip_index() as u32
    }

    /// Current selection in wire form, or an empty string.
    pub fn selection(&self) -> String {
        self.session
            .wallet()
            .selection()
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    pub fn auto_spin(&self) -> bool {
        self.session.auto_spin()
    }

    pub fn chip_values_json(&self) -> String {
        to_json_or(&self.session.wallet().chip_values(), "[]")
    }

    pub fn wheel_json(&self) -> String {
        to_json_or(&self.session.layout().sector_values(), "[]")
    }

    pub fn history_json(&self) -> String {
        let entries: Vec<_> = self.session.history().iter().collect();
        to_json_or(&entries, "[]")
    }

    pub fn last_outcome_json(&self) -> String {
        to_json_or(&self.session.last_outcome(), "null")
    }
}

fn to_json_or<T: serde::Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to serialize for JS: {err}");
        fallback.to_string()
    })
}
