use glam::Vec2;

use crate::api::config::SpinConfig;
use crate::bridge::protocol::{self, SpinRequest, SpinResponse};
use crate::core::angle::AngleModel;
use crate::core::integrator::Integrator;
use crate::error::{AuthorityError, ConfigError, SpinRejection};
use crate::input::queue::InputEvent;
use crate::spin::convergence::{ConvergenceController, ConvergenceStep};
use crate::spin::outcome::{self, AcceptedResult, SpinOutcome};
use crate::spin::phase::SpinPhase;
use crate::spin::settle::{max_amplitude, SettleController, SettleStep};
use crate::spin::status::StatusMessage;
use crate::spin::wallet::{BetSelection, History, Wallet};
use crate::systems::pose::WheelPose;
use crate::wheel::layout::{SectorColor, SectorLayout};

/// Identifies one authority round trip. Replies carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpinTicket(pub u32);

/// Something the host should react to, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged { from: SpinPhase, to: SpinPhase },
    /// A request must be sent to the result authority.
    AuthorityRequest { ticket: SpinTicket, request: SpinRequest },
    /// The marker has come to rest on this outcome.
    Outcome(SpinOutcome),
    Aborted { reason: String, connection: bool },
    AutoSpinChanged(bool),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: SpinTicket,
    waited: f32,
}

/// One wheel, one marker and the spin state machine that drives them.
///
/// Nothing moves toward a target until the authority has answered: the
/// outcome is fixed before the animation starts, and the animation is then
/// steered so the marker comes to rest on that outcome's sector.
pub struct SpinSession {
    config: SpinConfig,
    layout: SectorLayout,
    angles: AngleModel,
    integrator: Integrator,
    phase: SpinPhase,
    wallet: Wallet,
    history: History,
    auto_spin: bool,
    next_ticket: u32,
    in_flight: Option<InFlight>,
    /// Outcome being animated.
    current: Option<SpinOutcome>,
    last_outcome: Option<SpinOutcome>,
    free_spin_elapsed: f32,
    convergence: Option<ConvergenceController>,
    settle: Option<SettleController>,
    /// Wheel-relative angle of a marker resting in a pocket.
    captured: Option<f64>,
    /// Time left before leaving Done.
    done_timer: f32,
    status: StatusMessage,
    events: Vec<SessionEvent>,
}

impl SpinSession {
    pub fn new(config: SpinConfig) -> Result<Self, ConfigError> {
        let layout = SectorLayout::european(config.rotation_offset);
        Self::with_layout(config, layout)
    }

    pub fn with_layout(config: SpinConfig, layout: SectorLayout) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            angles: AngleModel::new(config.wheel_friction, config.marker_friction),
            integrator: Integrator::new(config.fixed_dt, config.rest_velocity),
            phase: SpinPhase::Idle,
            wallet: Wallet::new(config.starting_balance, config.chip_values.clone(), config.default_chip),
            history: History::new(config.history_len),
            auto_spin: false,
            next_ticket: 0,
            in_flight: None,
            current: None,
            last_outcome: None,
            free_spin_elapsed: 0.0,
            convergence: None,
            settle: None,
            captured: None,
            done_timer: 0.0,
            status: StatusMessage::ChooseBet,
            events: Vec::new(),
            layout,
            config,
        })
    }

    // -- Accessors --

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn angles(&self) -> &AngleModel {
        &self.angles
    }

    pub fn layout(&self) -> &SectorLayout {
        &self.layout
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn auto_spin(&self) -> bool {
        self.auto_spin
    }

    /// Ticket of the request still waiting on the authority.
    pub fn pending_ticket(&self) -> Option<SpinTicket> {
        self.in_flight.map(|f| f.ticket)
    }

    /// Marker angle in the wheel's frame, in [0, 2π).
    pub fn marker_relative(&self) -> f64 {
        self.angles.marker_relative()
    }

    /// Sector currently under the marker.
    pub fn sector_under_marker(&self) -> usize {
        self.layout.index_at(self.marker_relative())
    }

    pub fn pose(&self) -> WheelPose {
        let center = Vec2::splat(self.config.world_size / 2.0);
        WheelPose::from_angles(&self.angles, center, self.config.track_radius)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Betting controls (ignored while a spin is running) --

    pub fn select_color(&mut self, color: SectorColor) -> bool {
        self.toggle_selection(BetSelection::Color(color))
    }

    /// Select a straight-up number. Numbers not on the wheel are ignored.
    pub fn select_number(&mut self, number: u32) -> bool {
        if !self.layout.sector_values().contains(&number) {
            return false;
        }
        self.toggle_selection(BetSelection::Number(number))
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.phase.is_busy() {
            return false;
        }
        self.wallet.select(None);
        true
    }

    pub fn toggle_selection(&mut self, selection: BetSelection) -> bool {
        if self.phase.is_busy() {
            return false;
        }
        self.wallet.toggle(selection);
        true
    }

    pub fn select_chip(&mut self, index: usize) -> bool {
        if self.phase.is_busy() {
            return false;
        }
        self.wallet.select_chip(index)
    }

    pub fn set_auto_spin(&mut self, on: bool) {
        if self.auto_spin == on {
            return;
        }
        self.auto_spin = on;
        log::info!("auto spin {}", if on { "on" } else { "off" });
        self.events.push(SessionEvent::AutoSpinChanged(on));
    }

    /// Flip auto spin. Turning it on while idle starts a spin right away;
    /// if that spin cannot start, auto spin turns back off.
    pub fn toggle_auto_spin(&mut self) {
        let on = !self.auto_spin;
        self.set_auto_spin(on);
        if on && self.phase.accepts_spin() && self.request_spin().is_err() {
            self.set_auto_spin(false);
        }
    }

    pub fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::SelectColor(color) => {
                self.select_color(color);
            }
            InputEvent::SelectNumber(number) => {
                self.select_number(number);
            }
            InputEvent::ClearSelection => {
                self.clear_selection();
            }
            InputEvent::SelectChip(index) => {
                self.select_chip(index);
            }
            InputEvent::Spin => {
                let _ = self.request_spin();
            }
            InputEvent::ToggleAutoSpin => self.toggle_auto_spin(),
        }
    }

    // -- Spin lifecycle --

    /// Start a spin by asking the authority for its outcome.
    ///
    /// While a spin is running this is a no-op returning `Busy`. Any other
    /// rejection leaves the session idle with an explanatory status.
    pub fn request_spin(&mut self) -> Result<SpinTicket, SpinRejection> {
        if !self.phase.accepts_spin() {
            log::debug!("spin ignored in {:?}", self.phase);
            return Err(SpinRejection::Busy);
        }
        if self.phase == SpinPhase::Done {
            self.set_phase(SpinPhase::Idle);
        }

        let (selection, bet) = match self.wallet.check_bet() {
            Ok(bet) => bet,
            Err(rejection) => {
                log::info!("spin rejected: {rejection}");
                self.status = StatusMessage::Rejected(rejection.clone());
                return Err(rejection);
            }
        };

        let ticket = SpinTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let request = SpinRequest {
            current_balance: self.wallet.balance(),
            bet_amount: bet,
            bet_selection: selection,
        };
        log::info!("spin {}: betting {bet} on {selection}", ticket.0);

        self.in_flight = Some(InFlight { ticket, waited: 0.0 });
        self.status = StatusMessage::Spinning;
        self.events.push(SessionEvent::AuthorityRequest { ticket, request });
        self.set_phase(SpinPhase::Requesting);
        Ok(ticket)
    }

    /// Apply the authority's reply for `ticket`.
    ///
    /// A reply that fails validation aborts the spin. A stale ticket is
    /// reported as `StaleTicket` and changes nothing.
    pub fn resolve(&mut self, ticket: SpinTicket, response: &SpinResponse) -> Result<SpinOutcome, AuthorityError> {
        self.take_in_flight(ticket)?;
        match outcome::accept(response, &self.layout) {
            Ok(accepted) => {
                let outcome = accepted.outcome;
                self.launch(accepted);
                Ok(outcome)
            }
            Err(err) => {
                self.abort(&err);
                Err(err)
            }
        }
    }

    /// Parse and apply a raw reply body.
    pub fn resolve_json(&mut self, ticket: SpinTicket, body: &str) -> Result<SpinOutcome, AuthorityError> {
        if self.pending_ticket() != Some(ticket) {
            return Err(stale(ticket));
        }
        match protocol::parse_reply(body) {
            Ok(response) => self.resolve(ticket, &response),
            Err(err) => {
                self.in_flight = None;
                self.abort(&err);
                Err(err)
            }
        }
    }

    /// Abort the spin waiting on `ticket`. Returns false for a stale ticket.
    pub fn fail(&mut self, ticket: SpinTicket, error: AuthorityError) -> bool {
        if self.take_in_flight(ticket).is_err() {
            log::warn!("ignoring failure for stale ticket {}: {error}", ticket.0);
            return false;
        }
        self.abort(&error);
        true
    }

    /// Advance the simulation by one fixed step.
    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            SpinPhase::Idle => self.coast(dt),
            SpinPhase::Requesting => {
                self.coast(dt);
                self.tick_request(dt);
            }
            SpinPhase::FreeSpin => self.tick_free_spin(dt),
            SpinPhase::Converging => self.tick_converging(dt),
            SpinPhase::Settling => self.tick_settling(dt),
            SpinPhase::Done => {
                self.coast(dt);
                self.tick_done(dt);
            }
        }
        debug_assert!(self.angles.is_finite(), "non-finite angles: {:?}", self.angles);
    }

    // -- Phase steps --

    /// Wheel turns on its own; a captured marker rides along.
    fn coast(&mut self, dt: f32) {
        self.integrator.advance(&mut self.angles.wheel, dt);
        match self.captured {
            Some(rel) => {
                self.angles.marker.angle = self.angles.wheel.angle + rel;
                self.angles.marker.angular_velocity = self.angles.wheel.angular_velocity;
            }
            None => self.integrator.advance(&mut self.angles.marker, dt),
        }
    }

    /// Simulated time only; see `SpinConfig::authority_timeout`.
    fn tick_request(&mut self, dt: f32) {
        let Some(flight) = self.in_flight.as_mut() else {
            return;
        };
        flight.waited += dt;
        if flight.waited >= self.config.authority_timeout {
            let waited_secs = flight.waited;
            self.in_flight = None;
            self.abort(&AuthorityError::Timeout { waited_secs });
        }
    }

    fn tick_free_spin(&mut self, dt: f32) {
        self.integrator.advance_all(&mut self.angles, dt);
        self.free_spin_elapsed += dt;

        let slow = self.angles.marker.angular_velocity.abs() < self.config.convergence_epsilon;
        let over_budget = self.free_spin_elapsed >= self.config.max_free_spin;
        if over_budget && !slow {
            log::warn!(
                "free spin budget spent at {:.2} rad/s, forcing convergence",
                self.angles.marker.angular_velocity
            );
        }
        if slow || over_budget {
            self.begin_convergence();
        }
    }

    fn tick_converging(&mut self, dt: f32) {
        self.integrator.advance(&mut self.angles.wheel, dt);
        let aligned = match self.convergence.as_mut() {
            Some(ctl) => ctl.step(&mut self.angles, dt) == ConvergenceStep::Aligned,
            None => true,
        };
        if aligned {
            self.begin_settle();
        }
    }

    fn tick_settling(&mut self, dt: f32) {
        self.integrator.advance(&mut self.angles.wheel, dt);
        let finished = match self.settle.as_mut() {
            Some(settle) => settle.step(&mut self.angles, dt) == SettleStep::Finished,
            None => true,
        };
        if finished {
            self.finish_spin();
        }
    }

    fn tick_done(&mut self, dt: f32) {
        self.done_timer -= dt;
        if self.done_timer > 0.0 {
            return;
        }
        self.set_phase(SpinPhase::Idle);
        if self.auto_spin && !self.wallet.can_cover_bet() {
            log::info!("auto spin stopped: bet no longer covered");
            self.set_auto_spin(false);
        }
        if !self.auto_spin {
            self.status = StatusMessage::NextBet;
            return;
        }
        if let Err(rejection) = self.request_spin() {
            log::info!("auto spin stopped: {rejection}");
            self.set_auto_spin(false);
        }
    }

    // -- Transitions --

    fn launch(&mut self, accepted: AcceptedResult) {
        let AcceptedResult { outcome, layout } = accepted;
        log::info!(
            "outcome: sector {} ({} {})",
            outcome.winning_index,
            outcome.number,
            outcome.color
        );
        // Kept for later spins until a reply brings a new order.
        self.layout = layout;
        self.current = Some(outcome);
        self.captured = None;
        self.free_spin_elapsed = 0.0;
        self.angles.wheel.angular_velocity = self.config.wheel_launch_velocity;
        self.angles.marker.angular_velocity = self.config.marker_launch_velocity;
        self.set_phase(SpinPhase::FreeSpin);
    }

    fn begin_convergence(&mut self) {
        let Some(outcome) = self.current else {
            log::error!("converging without an outcome");
            self.set_phase(SpinPhase::Idle);
            return;
        };
        let target = self.layout.sector_center(outcome.winning_index);
        let ctl = ConvergenceController::new(
            target,
            &self.angles,
            self.config.blend_factor,
            self.config.align_tolerance,
        );
        log::debug!(
            "converging onto sector {} ({:.3} rad away, cap {} frames)",
            outcome.winning_index,
            ctl.remaining(),
            ctl.max_frames()
        );
        self.convergence = Some(ctl);
        self.set_phase(SpinPhase::Converging);
    }

    fn begin_settle(&mut self) {
        let rest = match self.convergence.take() {
            Some(ctl) => ctl.relative(),
            None => self.angles.marker_relative_unwrapped(),
        };
        let amplitude = self
            .config
            .bounce_amplitude
            .min(max_amplitude(self.layout.sector_angle(), self.config.align_tolerance));
        self.settle = Some(SettleController::new(
            rest,
            amplitude,
            self.config.bounce_count,
            self.config.settle_duration,
            self.config.settle_easing,
        ));
        self.set_phase(SpinPhase::Settling);
    }

    fn finish_spin(&mut self) {
        let rest = match self.settle.take() {
            Some(settle) => settle.rest(),
            None => self.angles.marker_relative_unwrapped(),
        };
        self.captured = Some(rest);
        self.angles.marker.angle = self.angles.wheel.angle + rest;
        self.angles.marker.angular_velocity = self.angles.wheel.angular_velocity;

        if let Some(outcome) = self.current.take() {
            self.wallet.set_balance(outcome.new_balance);
            self.history.record(&outcome);
            self.status = StatusMessage::for_outcome(&outcome);
            self.last_outcome = Some(outcome);
            self.events.push(SessionEvent::Outcome(outcome));
            log::info!("{} (balance {})", self.status, outcome.new_balance);
        }
        self.done_timer = self.config.auto_spin_delay;
        self.set_phase(SpinPhase::Done);
    }

    /// Drop the spin and return to idle. Auto spin is always switched off.
    fn abort(&mut self, err: &AuthorityError) {
        log::warn!("spin aborted: {err}");
        self.in_flight = None;
        self.current = None;
        self.convergence = None;
        self.settle = None;
        self.set_auto_spin(false);
        self.status = StatusMessage::for_error(err);
        self.events.push(SessionEvent::Aborted {
            reason: err.to_string(),
            connection: err.is_connection_error(),
        });
        self.set_phase(SpinPhase::Idle);
    }

    fn take_in_flight(&mut self, ticket: SpinTicket) -> Result<(), AuthorityError> {
        match self.in_flight {
            Some(flight) if flight.ticket == ticket => {
                self.in_flight = None;
                Ok(())
            }
            _ => Err(stale(ticket)),
        }
    }

    fn set_phase(&mut self, to: SpinPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::debug!("phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(SessionEvent::PhaseChanged { from, to });
    }
}

fn stale(ticket: SpinTicket) -> AuthorityError {
    AuthorityError::StaleTicket(ticket.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> SpinSession {
        SpinSession::new(SpinConfig::default()).unwrap()
    }

    fn reply(index: i64, number: u32, color: &str, win: u64, new_balance: u64) -> SpinResponse {
        SpinResponse {
            index,
            number,
            color: color.to_string(),
            win,
            new_balance,
            wheel: None,
        }
    }

    fn run_until(s: &mut SpinSession, phase: SpinPhase, max_ticks: u32) {
        for _ in 0..max_ticks {
            if s.phase() == phase {
                return;
            }
            s.tick(DT);
        }
        assert_eq!(s.phase(), phase, "did not reach {phase:?} in {max_ticks} ticks");
    }

    fn start_red_spin(s: &mut SpinSession) -> SpinTicket {
        s.select_color(SectorColor::Red);
        s.request_spin().unwrap()
    }

    #[test]
    fn request_emits_authority_request() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        assert_eq!(s.phase(), SpinPhase::Requesting);
        assert_eq!(s.pending_ticket(), Some(ticket));
        let events = s.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::AuthorityRequest { request, .. }
                if request.bet_amount == 10 && request.current_balance == 1000
        )));
    }

    #[test]
    fn full_spin_lands_on_reported_sector() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        s.resolve(ticket, &reply(1, 32, "rojo", 20, 1010)).unwrap();
        assert_eq!(s.phase(), SpinPhase::FreeSpin);

        run_until(&mut s, SpinPhase::Done, 2000);
        assert_eq!(s.sector_under_marker(), 1);
        assert_eq!(s.wallet().balance(), 1010);
        assert_eq!(s.history().latest().map(|e| e.number), Some(32));
        assert_eq!(s.status().to_string(), "You won $20! Landed on 32 red.");
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::Outcome(o) if o.winning_index == 1)));
    }

    #[test]
    fn captured_marker_rides_the_wheel() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        s.resolve(ticket, &reply(5, 21, "rojo", 0, 990)).unwrap();
        run_until(&mut s, SpinPhase::Done, 2000);
        for _ in 0..300 {
            s.tick(DT);
            assert_eq!(s.sector_under_marker(), 5);
        }
        assert_eq!(s.phase(), SpinPhase::Idle);
        assert_eq!(s.status(), &StatusMessage::NextBet);
    }

    #[test]
    fn busy_request_is_a_no_op() {
        let mut s = session();
        start_red_spin(&mut s);
        s.drain_events();
        assert_eq!(s.request_spin(), Err(SpinRejection::Busy));
        assert!(s.drain_events().is_empty());
        assert_eq!(s.status(), &StatusMessage::Spinning);
    }

    #[test]
    fn controls_locked_while_busy() {
        let mut s = session();
        start_red_spin(&mut s);
        assert!(!s.select_chip(0));
        assert!(!s.select_color(SectorColor::Black));
        assert_eq!(s.wallet().selection(), Some(BetSelection::Color(SectorColor::Red)));
        assert_eq!(s.wallet().bet(), 10);
    }

    #[test]
    fn no_selection_is_rejected() {
        let mut s = session();
        assert_eq!(s.request_spin(), Err(SpinRejection::NoSelection));
        assert_eq!(s.phase(), SpinPhase::Idle);
        assert_eq!(s.status().to_string(), "Choose a color first");
    }

    #[test]
    fn numbers_off_the_wheel_are_ignored() {
        let mut s = session();
        assert!(!s.select_number(37));
        assert!(s.select_number(17));
        assert_eq!(s.wallet().selection(), Some(BetSelection::Number(17)));
    }

    #[test]
    fn stale_ticket_changes_nothing() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let old = SpinTicket(ticket.0.wrapping_add(7));
        let err = s.resolve(old, &reply(0, 0, "verde", 0, 990)).unwrap_err();
        assert!(matches!(err, AuthorityError::StaleTicket(_)));
        assert!(!s.fail(old, AuthorityError::Transport("late".into())));
        assert_eq!(s.phase(), SpinPhase::Requesting);
        assert_eq!(s.pending_ticket(), Some(ticket));
    }

    #[test]
    fn invalid_index_aborts() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let err = s.resolve(ticket, &reply(37, 0, "verde", 0, 990)).unwrap_err();
        assert!(matches!(err, AuthorityError::IndexOutOfRange { index: 37, .. }));
        assert_eq!(s.phase(), SpinPhase::Idle);
        assert_eq!(s.status(), &StatusMessage::InvalidResult);
        assert_eq!(s.wallet().balance(), 1000);
    }

    #[test]
    fn contradictory_color_aborts() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let body = r#"{"index":1,"number":32,"color":"negro","win":20,"newBalance":1010}"#;
        let err = s.resolve_json(ticket, body).unwrap_err();
        assert!(matches!(err, AuthorityError::ColorMismatch { number: 32, .. }));
        assert_eq!(s.phase(), SpinPhase::Idle);
        assert_eq!(s.status(), &StatusMessage::InvalidResult);
        assert!(s.history().is_empty());
        assert_eq!(s.wallet().balance(), 1000);
    }

    #[test]
    fn refusal_json_aborts_with_server_message() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let err = s.resolve_json(ticket, r#"{"error":"Apuesta inválida"}"#).unwrap_err();
        assert!(matches!(err, AuthorityError::Rejected(_)));
        assert_eq!(s.status().to_string(), "Apuesta inválida");
        assert_eq!(s.phase(), SpinPhase::Idle);
    }

    #[test]
    fn authority_timeout_aborts() {
        let config = SpinConfig {
            authority_timeout: 0.5,
            ..SpinConfig::default()
        };
        let mut s = SpinSession::new(config).unwrap();
        start_red_spin(&mut s);
        run_until(&mut s, SpinPhase::Idle, 60);
        assert_eq!(s.status(), &StatusMessage::ConnectionError);
        assert_eq!(s.pending_ticket(), None);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::Aborted { connection: true, .. })));
    }

    #[test]
    fn auto_spin_chains_spins() {
        let config = SpinConfig {
            auto_spin_delay: 0.5,
            ..SpinConfig::default()
        };
        let mut s = SpinSession::new(config).unwrap();
        s.select_color(SectorColor::Black);
        s.toggle_auto_spin();
        assert!(s.auto_spin());
        let first = s.pending_ticket().unwrap();

        s.resolve(first, &reply(2, 15, "negro", 20, 1010)).unwrap();
        run_until(&mut s, SpinPhase::Done, 2000);
        run_until(&mut s, SpinPhase::Requesting, 60);
        let second = s.pending_ticket().unwrap();
        assert_ne!(first, second);
        assert!(s.auto_spin());
    }

    #[test]
    fn auto_spin_stops_when_balance_runs_out() {
        let config = SpinConfig {
            auto_spin_delay: 0.5,
            ..SpinConfig::default()
        };
        let mut s = SpinSession::new(config).unwrap();
        s.select_color(SectorColor::Red);
        s.toggle_auto_spin();
        let ticket = s.pending_ticket().unwrap();
        s.resolve(ticket, &reply(2, 15, "negro", 0, 5)).unwrap();
        run_until(&mut s, SpinPhase::Done, 2000);
        s.drain_events();

        run_until(&mut s, SpinPhase::Idle, 60);
        for _ in 0..5 {
            s.tick(DT);
        }
        assert!(!s.auto_spin());
        assert_eq!(s.pending_ticket(), None);
        assert_eq!(s.status(), &StatusMessage::NextBet);
        let events = s.drain_events();
        assert!(events.contains(&SessionEvent::AutoSpinChanged(false)));
        assert!(events
            .iter()
            .all(|e| !matches!(e, SessionEvent::AuthorityRequest { .. })));
    }

    #[test]
    fn auto_spin_needs_a_valid_bet() {
        let mut s = session();
        s.toggle_auto_spin();
        assert!(!s.auto_spin());
        assert_eq!(s.phase(), SpinPhase::Idle);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![SessionEvent::AutoSpinChanged(true), SessionEvent::AutoSpinChanged(false)]
        );
    }

    #[test]
    fn abort_turns_auto_spin_off() {
        let mut s = session();
        s.select_color(SectorColor::Red);
        s.toggle_auto_spin();
        let ticket = s.pending_ticket().unwrap();
        assert!(s.fail(ticket, AuthorityError::Transport("offline".into())));
        assert!(!s.auto_spin());
        assert_eq!(s.phase(), SpinPhase::Idle);
    }

    #[test]
    fn reply_wheel_order_is_used_for_the_spin() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let mut r = reply(3, 4, "negro", 0, 990);
        r.wheel = Some(vec![9, 8, 7, 4, 2, 1]);
        s.resolve(ticket, &r).unwrap();
        assert_eq!(s.layout().sector_count(), 6);
        run_until(&mut s, SpinPhase::Done, 2000);
        assert_eq!(s.sector_under_marker(), 3);
    }

    #[test]
    fn reply_wheel_order_persists_for_later_spins() {
        let mut s = session();
        let ticket = start_red_spin(&mut s);
        let mut r = reply(3, 4, "negro", 0, 990);
        r.wheel = Some(vec![9, 8, 7, 4, 2, 1]);
        s.resolve(ticket, &r).unwrap();
        run_until(&mut s, SpinPhase::Done, 2000);

        let ticket = s.request_spin().unwrap();
        // No order in this reply: index 2 is checked against the replaced ring.
        let outcome = s.resolve(ticket, &reply(2, 7, "rojo", 0, 980)).unwrap();
        assert_eq!(outcome.number, 7);
        assert_eq!(s.layout().sector_values(), &[9, 8, 7, 4, 2, 1]);
        run_until(&mut s, SpinPhase::Done, 2000);
        assert_eq!(s.sector_under_marker(), 2);
    }

    #[test]
    fn input_events_drive_the_session() {
        let mut s = session();
        s.apply_input(InputEvent::SelectColor(SectorColor::Green));
        s.apply_input(InputEvent::SelectChip(0));
        s.apply_input(InputEvent::Spin);
        assert_eq!(s.phase(), SpinPhase::Requesting);
        assert_eq!(s.wallet().bet(), 1);
    }
}
