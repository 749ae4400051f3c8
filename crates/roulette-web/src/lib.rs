//! wasm-bindgen exports for the roulette spin engine.
//!
//! The page owns the frame loop and the network: it calls `roulette_tick`
//! from `requestAnimationFrame`, reads events and the wheel pose back, and
//! when an `AUTHORITY_REQUEST` event appears it takes the request, POSTs it,
//! and hands the reply (or the failure) back with the same ticket.

pub mod runner;

pub use runner::SpinRunner;

use std::cell::RefCell;

use roulette_engine::{InputEvent, SectorColor, SpinConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SpinRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner, or return `fallback` before `roulette_init`.
fn with_runner<R>(fallback: R, f: impl FnOnce(&mut SpinRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            web_sys::console::warn_1(&"roulette: call roulette_init() first".into());
            fallback
        }
    })
}

/// Initialize with a JSON config. Empty or invalid JSON falls back to defaults.
#[wasm_bindgen]
pub fn roulette_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        SpinConfig::default()
    } else {
        SpinConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("roulette: {err}, using default config");
            SpinConfig::default()
        })
    };

    let runner = match SpinRunner::new(config) {
        Ok(runner) => runner,
        Err(err) => {
            log::error!("roulette: {err}");
            return;
        }
    };
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("roulette: initialized");
}

#[wasm_bindgen]
pub fn roulette_tick(dt: f32) {
    with_runner((), |r| r.tick(dt));
}

// ---- Input ----

/// Queue a UI action. `kind` is one of the `input_kind` codes.
#[wasm_bindgen]
pub fn roulette_input(kind: u32, arg: u32) {
    match InputEvent::from_code(kind, arg) {
        Some(event) => with_runner((), |r| r.push_input(event)),
        None => log::warn!("roulette: unknown input {kind}/{arg}"),
    }
}

/// Toggle a color bet by name (`"rojo"`, `"red"`, ...).
#[wasm_bindgen]
pub fn roulette_select_color(name: &str) {
    match SectorColor::parse(name) {
        Some(color) => with_runner((), |r| r.push_input(InputEvent::SelectColor(color))),
        None => log::warn!("roulette: unknown color {name:?}"),
    }
}

#[wasm_bindgen]
pub fn roulette_select_number(number: u32) {
    with_runner((), |r| r.push_input(InputEvent::SelectNumber(number)));
}

#[wasm_bindgen]
pub fn roulette_select_chip(index: u32) {
    with_runner((), |r| r.push_input(InputEvent::SelectChip(index as usize)));
}

#[wasm_bindgen]
pub fn roulette_spin() {
    with_runner((), |r| r.push_input(InputEvent::Spin));
}

#[wasm_bindgen]
pub fn roulette_toggle_auto() {
    with_runner((), |r| r.push_input(InputEvent::ToggleAutoSpin));
}

// ---- Result authority ----

/// Next request to send, as `{"ticket": n, "body": {...}}`, or undefined.
#[wasm_bindgen]
pub fn roulette_take_request() -> Option<String> {
    with_runner(None, |r| r.take_request_json())
}

/// Hand back the reply body for `ticket`. Returns false if it was not applied.
#[wasm_bindgen]
pub fn roulette_resolve(ticket: u32, body: &str) -> bool {
    with_runner(false, |r| {
        let applied = r.resolve(ticket, body);
        if !applied {
            web_sys::console::warn_1(&format!("roulette: reply for ticket {ticket} not applied").into());
        }
        applied
    })
}

/// Report that the request for `ticket` failed in transport.
#[wasm_bindgen]
pub fn roulette_fail(ticket: u32, message: &str) -> bool {
    with_runner(false, |r| r.fail(ticket, message))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(std::ptr::null(), |r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(0, |r| r.game_events_len())
}

/// `[wheel_rotation, marker_angle, marker_x, marker_y]`.
#[wasm_bindgen]
pub fn get_pose() -> js_sys::Float32Array {
    with_runner(js_sys::Float32Array::new_with_length(0), |r| {
        js_sys::Float32Array::from(r.pose_floats())
    })
}

#[wasm_bindgen]
pub fn get_phase() -> u32 {
    with_runner(0, |r| r.phase_code())
}

#[wasm_bindgen]
pub fn get_status_text() -> String {
    with_runner(String::new(), |r| r.status_text())
}

#[wasm_bindgen]
pub fn get_status_is_error() -> bool {
    with_runner(false, |r| r.status_is_error())
}

#[wasm_bindgen]
pub fn get_balance() -> f64 {
    with_runner(0.0, |r| r.balance())
}

#[wasm_bindgen]
pub fn get_bet() -> f64 {
    with_runner(0.0, |r| r.bet())
}

#[wasm_bindgen]
pub fn get_chip_index() -> u32 {
    with_runner(0, |r| r.chip_index())
}

#[wasm_bindgen]
pub fn get_selection() -> String {
    with_runner(String::new(), |r| r.selection())
}

#[wasm_bindgen]
pub fn get_auto_spin() -> bool {
    with_runner(false, |r| r.auto_spin())
}

#[wasm_bindgen]
pub fn get_chip_values_json() -> String {
    with_runner("[]".to_string(), |r| r.chip_values_json())
}

#[wasm_bindgen]
pub fn get_wheel_json() -> String {
    with_runner("[]".to_string(), |r| r.wheel_json())
}

#[wasm_bindgen]
pub fn get_history_json() -> String {
    with_runner("[]".to_string(), |r| r.history_json())
}

#[wasm_bindgen]
pub fn get_last_outcome_json() -> String {
    with_runner("null".to_string(), |r| r.last_outcome_json())
}
