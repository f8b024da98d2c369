pub mod runner;

pub use runner::ToyRunner;

use std::cell::RefCell;

use domino_core::{Glyph, InputEvent, PropKind, SizeClass, ToyConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<ToyRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut ToyRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Toy not initialized. Call toy_init() first.");
        f(runner)
    })
}

fn install(config: ToyConfig) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(ToyRunner::new(config));
    });
}

#[wasm_bindgen]
pub fn toy_init() {
    install(ToyConfig::default());
    log::info!("domino: initialized");
}

/// (Re)start the toy with a JSON config. On a bad config the defaults are
/// used and false is returned.
#[wasm_bindgen]
pub fn toy_load_config(json: &str) -> bool {
    match ToyConfig::from_json(json) {
        Ok(config) => {
            install(config);
            log::info!("domino: initialized from config");
            true
        }
        Err(err) => {
            install(ToyConfig::default());
            log::warn!("domino: {}; using defaults", err);
            false
        }
    }
}

#[wasm_bindgen]
pub fn toy_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

/// Place a tile using the selected size class.
/// `category` is 0 for letters, 1 for digits.
#[wasm_bindgen]
pub fn toy_place_tile(code_point: u32, category: u32) {
    let Some(glyph) = Glyph::from_codes(code_point, category) else {
        log::debug!("rejected glyph {} in category {}", code_point, category);
        return;
    };
    with_runner(|r| r.push_input(InputEvent::PlaceTile { glyph, size: None }));
}

#[wasm_bindgen]
pub fn toy_place_tile_sized(code_point: u32, category: u32, size: u32) {
    let (Some(glyph), Some(size)) = (Glyph::from_codes(code_point, category), SizeClass::from_code(size)) else {
        log::debug!("rejected tile {}/{}/{}", code_point, category, size);
        return;
    };
    with_runner(|r| r.push_input(InputEvent::PlaceTile { glyph, size: Some(size) }));
}

#[wasm_bindgen]
pub fn toy_select_size(size: u32) {
    let Some(size) = SizeClass::from_code(size) else {
        log::debug!("unknown size class {}", size);
        return;
    };
    with_runner(|r| r.push_input(InputEvent::SelectSizeClass(size)));
}

#[wasm_bindgen]
pub fn toy_place_prop(kind: u32) {
    let Some(kind) = PropKind::from_code(kind) else {
        log::debug!("unknown prop {}", kind);
        return;
    };
    with_runner(|r| r.push_input(InputEvent::PlaceProp(kind)));
}

#[wasm_bindgen]
pub fn toy_remove_at(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::RemoveAt { x, y }));
}

#[wasm_bindgen]
pub fn toy_trigger() {
    with_runner(|r| r.push_input(InputEvent::TriggerRound));
}

#[wasm_bindgen]
pub fn toy_reset() {
    with_runner(|r| r.push_input(InputEvent::Reset));
}

#[wasm_bindgen]
pub fn toy_rewind() {
    with_runner(|r| r.push_input(InputEvent::Rewind));
}

#[wasm_bindgen]
pub fn toy_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

// ---- Narration ----

/// The next phrase to speak, or nothing while a phrase is still playing.
#[wasm_bindgen]
pub fn toy_next_phrase() -> Option<String> {
    with_runner(|r| r.next_phrase())
}

/// Call from the utterance's `onend` and `onerror`.
#[wasm_bindgen]
pub fn toy_phrase_finished() {
    with_runner(|r| r.phrase_finished());
}

#[wasm_bindgen]
pub fn toy_set_narration(enabled: bool) {
    with_runner(|r| r.set_narration(enabled));
}

/// `{ rate, pitch, volume, lang }` for configuring each utterance.
#[wasm_bindgen]
pub fn toy_voice_settings() -> JsValue {
    with_runner(|r| {
        let voice = r.voice();
        let obj = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&obj, &"rate".into(), &JsValue::from_f64(voice.rate as f64));
        let _ = js_sys::Reflect::set(&obj, &"pitch".into(), &JsValue::from_f64(voice.pitch as f64));
        let _ = js_sys::Reflect::set(&obj, &"volume".into(), &JsValue::from_f64(voice.volume as f64));
        let _ = js_sys::Reflect::set(&obj, &"lang".into(), &JsValue::from_str(&voice.lang));
        obj.into()
    })
}

// ---- Diagnostics ----

/// Gaps the chain cannot cross, flattened as `[index, distance, ...]`.
#[wasm_bindgen]
pub fn toy_break_points() -> Vec<f32> {
    with_runner(|r| {
        r.break_points()
            .iter()
            .flat_map(|b| [b.index as f32, b.distance])
            .collect()
    })
}

#[wasm_bindgen]
pub fn toy_round_state() -> u8 {
    with_runner(|r| r.round_state())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_overlay_split() -> u32 {
    with_runner(|r| r.overlay_split())
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(|r| r.sound_events_ptr())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}
