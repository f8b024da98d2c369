use glam::Vec2;

use crate::api::config::ToyConfig;
use crate::api::types::{SoundEffect, ToyEvent};
use crate::components::glyph::Glyph;
use crate::components::prop::PropKind;
use crate::components::tile::SizeClass;
use crate::core::fall::{break_points, BreakPoint, FallEvent, FallSimulation};
use crate::core::scene::{Removed, RoundState, Scene};
use crate::core::scheduler::Scheduler;
use crate::input::queue::{InputEvent, InputQueue, KEY_RESET, KEY_TRIGGER};
use crate::systems::narration::{NarrationQueue, CELEBRATION_PHRASES};
use crate::systems::rng::Rng;

/// A delayed beat of the round choreography.
#[derive(Debug, Clone, PartialEq)]
enum Cue {
    Speak(String),
    ExplodeProp,
    Celebrate,
    Chime,
    Cheer,
}

/// How the chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    all_fallen: bool,
    fallen: usize,
    total: usize,
}

/// The whole toy: scene, chain reaction, explosion choreography and narration.
///
/// Headless. The caller feeds [`InputEvent`]s, calls [`DominoToy::update`]
/// once per fixed step, then drains `sounds`, `events` and the narration queue.
pub struct DominoToy {
    config: ToyConfig,
    scene: Scene,
    fall: FallSimulation,
    scheduler: Scheduler<Cue>,
    narration: NarrationQueue,
    rng: Rng,
    selected_size: SizeClass,
    outcome: Option<Outcome>,
    awaiting_settle: bool,
    /// Sound cues emitted this frame.
    pub sounds: Vec<SoundEffect>,
    /// Toy events emitted this frame, in order.
    pub events: Vec<ToyEvent>,
}

impl DominoToy {
    pub fn new(config: ToyConfig) -> Self {
        let scene = Scene::new(config.layout.clone(), config.world.width, config.world.height);
        let fall = FallSimulation::new(config.fall.clone(), config.world.fixed_dt);
        let rng = Rng::new(config.seed);
        Self {
            config,
            scene,
            fall,
            scheduler: Scheduler::new(),
            narration: NarrationQueue::new(),
            rng,
            selected_size: SizeClass::default(),
            outcome: None,
            awaiting_settle: false,
            sounds: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &ToyConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> RoundState {
        self.scene.state()
    }

    pub fn selected_size(&self) -> SizeClass {
        self.selected_size
    }

    pub fn narration(&self) -> &NarrationQueue {
        &self.narration
    }

    pub fn narration_mut(&mut self) -> &mut NarrationQueue {
        &mut self.narration
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Apply queued input, then run one fixed step.
    pub fn update(&mut self, input: &InputQueue) {
        for event in input.iter() {
            self.apply(*event);
        }
        self.step(self.config.world.fixed_dt);
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PlaceTile { glyph, size } => {
                self.place_tile(glyph, size);
            }
            InputEvent::SelectSizeClass(size) => self.select_size(size),
            InputEvent::PlaceProp(kind) => {
                self.place_prop(kind);
            }
            InputEvent::RemoveAt { x, y } => {
                self.remove_at(Vec2::new(x, y));
            }
            InputEvent::TriggerRound => {
                self.trigger_round();
            }
            InputEvent::Reset => self.reset(),
            InputEvent::Rewind => self.rewind(),
            InputEvent::KeyDown { key_code: KEY_TRIGGER } => {
                self.trigger_round();
            }
            InputEvent::KeyDown { key_code: KEY_RESET } => self.reset(),
            InputEvent::KeyDown { key_code } => log::debug!("unmapped key {}", key_code),
        }
    }

    /// Append a tile after the row. `None` uses the selected size class.
    pub fn place_tile(&mut self, glyph: Glyph, size: Option<SizeClass>) -> Option<usize> {
        let size = size.unwrap_or(self.selected_size);
        let Some(index) = self.scene.place_tile(glyph, size) else {
            log::debug!("ignored tile placement while {:?}", self.scene.state());
            return None;
        };
        self.sounds.push(SoundEffect::TilePlaced);
        self.events.push(ToyEvent::TilePlaced { index, glyph });
        self.narration.enqueue(glyph.spoken());
        Some(index)
    }

    pub fn select_size(&mut self, size: SizeClass) {
        self.selected_size = size;
    }

    /// Place the landmark, replacing any previous one.
    pub fn place_prop(&mut self, kind: PropKind) -> bool {
        if !self.scene.place_prop(kind) {
            log::debug!("ignored prop placement while {:?}", self.scene.state());
            return false;
        }
        self.sounds.push(SoundEffect::PropPlaced);
        self.events.push(ToyEvent::PropPlaced { kind });
        true
    }

    pub fn remove_at(&mut self, point: Vec2) -> Option<Removed> {
        let removed = self.scene.remove_at(point);
        if removed.is_none() {
            log::debug!("nothing to remove at ({}, {})", point.x, point.y);
        }
        removed
    }

    /// Gaps the chain will not cross, in left-to-right order.
    pub fn break_points(&self) -> Vec<BreakPoint> {
        let mut tiles = self.scene.tiles().to_vec();
        tiles.sort_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        break_points(&tiles, self.fall.config())
    }

    /// Sort the row and push over the first tile.
    ///
    /// A finished round is rewound first. Returns false if the row is empty
    /// or a round is still playing.
    pub fn trigger_round(&mut self) -> bool {
        if self.scene.state() == RoundState::Complete {
            self.rewind();
        }
        if !self.scene.is_idle() {
            log::debug!("round already in progress");
            return false;
        }
        if self.scene.is_empty() {
            log::debug!("nothing to knock over");
            return false;
        }

        self.scene.sort_tiles();
        for gap in break_points(self.scene.tiles(), self.fall.config()) {
            log::info!("chain breaks after tile {} (gap {:.0})", gap.index, gap.distance);
        }

        self.outcome = None;
        self.awaiting_settle = false;
        self.scene.set_state(RoundState::Running);
        log::info!("round started with {} tiles", self.scene.len());

        let events = self.fall.begin(self.scene.tiles_mut());
        for event in events {
            self.on_fall_event(event);
        }
        true
    }

    /// Clear tiles, prop, pending cues and narration. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.fall.stop();
        self.scene.clear();
        self.stop_round();
    }

    /// Keep the layout, stand it back up and rebuild the prop.
    pub fn rewind(&mut self) {
        self.fall.stop();
        self.scene.rewind();
        self.stop_round();
    }

    fn stop_round(&mut self) {
        self.scheduler.clear();
        self.narration.clear();
        self.outcome = None;
        self.awaiting_settle = false;
    }

    /// Run one step of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let scale = dt / self.config.world.fixed_dt;

        if self.fall.is_running() {
            let events = self.fall.advance(self.scene.tiles_mut(), dt);
            self.check_prop_contact();
            for event in events {
                self.on_fall_event(event);
            }
        }

        for cue in self.scheduler.advance(dt * 1000.0) {
            self.run_cue(cue);
        }

        if let Some(prop) = self.scene.prop_mut() {
            let was_settled = prop.is_settled(&self.config.explosion);
            prop.advance_explosion(&self.config.explosion, scale);
            if !was_settled && prop.is_settled(&self.config.explosion) {
                let kind = prop.kind;
                self.events.push(ToyEvent::PropSettled { kind });
                log::debug!("{:?} explosion settled", kind);
                if self.awaiting_settle {
                    self.awaiting_settle = false;
                    self.celebrate();
                }
            }
        }
    }

    fn on_fall_event(&mut self, event: FallEvent) {
        match event {
            FallEvent::Fell { index, .. } => {
                let Some(glyph) = self.scene.tile(index).map(|t| t.glyph) else {
                    return;
                };
                self.sounds.push(SoundEffect::TileFell);
                self.events.push(ToyEvent::TileFell { index, glyph });
                self.scheduler
                    .schedule(self.config.timing.narrate_delay_ms, Cue::Speak(glyph.spoken()));
                if index + 1 == self.scene.len() && self.scene.prop().is_some() {
                    self.scheduler
                        .schedule(self.config.timing.explosion_delay_ms, Cue::ExplodeProp);
                }
            }
            FallEvent::Halted { all_fallen } => {
                let total = self.scene.len();
                let fallen = self.scene.tiles().iter().filter(|t| t.has_fallen()).count();
                self.outcome = Some(Outcome { all_fallen, fallen, total });
                self.events.push(ToyEvent::ChainHalted { all_fallen, fallen, total });
                log::info!("chain halted: {}/{} tiles fell", fallen, total);

                let cfg = &self.config.explosion;
                let exploding = self.scene.prop().map(|p| (p.is_exploding(), p.is_settled(cfg)));
                match exploding {
                    Some((true, true)) => self.celebrate(),
                    Some((true, false)) => {
                        self.scene.set_state(RoundState::Settling);
                        self.awaiting_settle = true;
                    }
                    Some((false, _)) => {
                        self.scene.set_state(RoundState::Settling);
                        // A chain that stalled never reached the prop.
                        if all_fallen {
                            self.explode_prop();
                        }
                        self.scheduler.schedule(
                            self.config.timing.unexploded_celebration_delay_ms,
                            Cue::Celebrate,
                        );
                    }
                    None => self.celebrate(),
                }
            }
        }
    }

    /// The fallen last tile lying across the prop sets it off at once.
    fn check_prop_contact(&mut self) {
        if self.scene.state() != RoundState::Running {
            return;
        }
        let touched = match (self.scene.last_tile(), self.scene.prop()) {
            (Some(last), Some(prop)) => {
                last.has_fallen() && prop.touched_by(last, &self.config.explosion)
            }
            _ => false,
        };
        if touched {
            self.explode_prop();
        }
    }

    fn explode_prop(&mut self) -> bool {
        let Some(prop) = self.scene.prop_mut() else {
            return false;
        };
        if !prop.start_explosion(&self.config.explosion, &mut self.rng) {
            return false;
        }
        let kind = prop.kind;
        self.sounds.push(SoundEffect::PropDestroyed);
        self.events.push(ToyEvent::PropExploded { kind });
        log::info!("{:?} exploded", kind);
        true
    }

    fn celebrate(&mut self) {
        if self.scene.state() == RoundState::Complete {
            return;
        }
        let Some(Outcome { all_fallen, fallen, total }) = self.outcome else {
            return;
        };
        self.scene.set_state(RoundState::Complete);
        self.awaiting_settle = false;
        self.events.push(ToyEvent::RoundComplete { all_fallen, fallen, total });
        log::info!("round complete");
        self.scheduler.schedule(self.config.timing.banner_delay_ms, Cue::Chime);
    }

    fn run_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Speak(text) => self.narration.enqueue(text),
            Cue::ExplodeProp => {
                self.explode_prop();
            }
            Cue::Celebrate => self.celebrate(),
            Cue::Chime => {
                self.sounds.push(SoundEffect::Celebrate);
                self.events.push(ToyEvent::Celebration);
                self.scheduler.schedule(self.config.timing.cheer_delay_ms, Cue::Cheer);
            }
            Cue::Cheer => {
                let pick = self.rng.next_int(CELEBRATION_PHRASES.len() as u32) as usize;
                self.narration.enqueue(CELEBRATION_PHRASES[pick]);
            }
        }
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    /// Take this frame's events, leaving the list empty.
    pub fn take_events(&mut self) -> Vec<ToyEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tile::Tile;

    fn toy() -> DominoToy {
        DominoToy::new(ToyConfig::default())
    }

    fn letter(c: char) -> Glyph {
        Glyph::letter(c).unwrap()
    }

    fn run_until(toy: &mut DominoToy, max_steps: usize, mut done: impl FnMut(&DominoToy) -> bool) -> Vec<ToyEvent> {
        let mut all = Vec::new();
        for _ in 0..max_steps {
            toy.step(toy.config().world.fixed_dt);
            all.extend(toy.take_events());
            if done(toy) {
                break;
            }
        }
        all
    }

    #[test]
    fn placement_emits_cues() {
        let mut t = toy();
        assert_eq!(t.place_tile(letter('a'), None), Some(0));
        assert!(t.place_prop(PropKind::BigBen));
        assert_eq!(t.sounds, vec![SoundEffect::TilePlaced, SoundEffect::PropPlaced]);
        assert_eq!(t.narration_mut().next_phrase().as_deref(), Some("a"));
        assert_eq!(
            t.events,
            vec![
                ToyEvent::TilePlaced { index: 0, glyph: letter('A') },
                ToyEvent::PropPlaced { kind: PropKind::BigBen },
            ]
        );
        t.clear_frame_data();
        assert!(t.sounds.is_empty() && t.events.is_empty());
    }

    #[test]
    fn selected_size_is_the_default_for_new_tiles() {
        let mut t = toy();
        t.apply(InputEvent::SelectSizeClass(SizeClass::Large));
        t.apply(InputEvent::PlaceTile { glyph: letter('b'), size: None });
        t.apply(InputEvent::PlaceTile { glyph: letter('c'), size: Some(SizeClass::Small) });
        let tiles = t.scene().tiles();
        assert_eq!(tiles[0].size, SizeClass::Large);
        assert_eq!(tiles[1].size, SizeClass::Small);
    }

    #[test]
    fn trigger_on_empty_scene_is_ignored() {
        let mut t = toy();
        assert!(!t.trigger_round());
        assert!(t.state() == RoundState::Idle);
        assert!(t.events.is_empty());
    }

    #[test]
    fn single_tile_round_completes_and_celebrates() {
        let mut t = toy();
        t.place_tile(letter('x'), None);
        t.clear_frame_data();

        assert!(t.trigger_round());
        assert_eq!(t.take_events(), vec![ToyEvent::TileFell { index: 0, glyph: letter('X') }]);
        assert_eq!(t.state(), RoundState::Running);

        let events = run_until(&mut t, 600, |t| t.scheduler.is_empty() && t.state() == RoundState::Complete);
        assert!(events.contains(&ToyEvent::ChainHalted { all_fallen: true, fallen: 1, total: 1 }));
        assert!(events.contains(&ToyEvent::RoundComplete { all_fallen: true, fallen: 1, total: 1 }));
        assert!(events.contains(&ToyEvent::Celebration));
        assert_eq!(t.state(), RoundState::Complete);

        // Once when placed, once when it fell.
        for _ in 0..2 {
            assert_eq!(t.narration_mut().next_phrase().as_deref(), Some("x"));
            t.narration_mut().phrase_finished();
        }
        let cheer = t.narration_mut().next_phrase().unwrap();
        assert!(CELEBRATION_PHRASES.contains(&cheer.as_str()));
    }

    #[test]
    fn edits_are_ignored_mid_round() {
        let mut t = toy();
        t.place_tile(letter('a'), None);
        t.trigger_round();
        assert_eq!(t.place_tile(letter('b'), None), None);
        assert!(!t.place_prop(PropKind::Pisa));
        assert!(!t.trigger_round());
        assert_eq!(t.scene().len(), 1);
    }

    #[test]
    fn touching_prop_explodes_and_waits_for_settle() {
        let mut t = toy();
        t.place_tile(letter('a'), None);
        t.place_prop(PropKind::Pyramid);
        t.trigger_round();

        let events = run_until(&mut t, 2000, |t| t.state() == RoundState::Complete);
        let exploded = events.iter().position(|e| *e == ToyEvent::PropExploded { kind: PropKind::Pyramid });
        let settled = events.iter().position(|e| *e == ToyEvent::PropSettled { kind: PropKind::Pyramid });
        let halted = events.iter().position(|e| matches!(e, ToyEvent::ChainHalted { .. }));
        let complete = events.iter().position(|e| matches!(e, ToyEvent::RoundComplete { .. }));

        assert!(exploded.unwrap() <= halted.unwrap());
        assert!(settled.unwrap() < complete.unwrap());
        assert!(t.scene().prop().unwrap().is_settled(&t.config().explosion));
    }

    #[test]
    fn explosion_settled_before_halt_still_completes() {
        let config = ToyConfig::from_json(
            r#"{ "timing": { "explosion_delay_ms": 0 },
                 "explosion": { "progress_step": 0.6, "burst_decay": [0.9, 0.95], "ribbon_decay": 0.9 } }"#,
        )
        .unwrap();
        let mut t = DominoToy::new(config);
        t.place_tile(letter('a'), None);
        t.place_prop(PropKind::Pisa);
        t.trigger_round();

        let events = run_until(&mut t, 3000, |t| t.state() == RoundState::Complete);
        let settled = events.iter().position(|e| matches!(e, ToyEvent::PropSettled { .. }));
        let halted = events.iter().position(|e| matches!(e, ToyEvent::ChainHalted { .. }));
        assert!(settled.unwrap() < halted.unwrap());
        assert!(events.iter().any(|e| matches!(e, ToyEvent::RoundComplete { .. })));
        assert_eq!(t.state(), RoundState::Complete);
    }

    #[test]
    fn exempt_prop_never_explodes() {
        let mut t = toy();
        t.place_tile(letter('e'), None);
        t.place_prop(PropKind::Eiffel);
        t.trigger_round();

        let events = run_until(&mut t, 600, |t| t.state() == RoundState::Complete);
        assert!(!events.iter().any(|e| matches!(e, ToyEvent::PropExploded { .. })));
        assert!(!t.sounds.contains(&SoundEffect::PropDestroyed));
        assert!(!t.scene().prop().unwrap().is_exploding());
        assert_eq!(t.state(), RoundState::Complete);
    }

    #[test]
    fn reset_mid_round_clears_everything() {
        let mut t = toy();
        for c in ['a', 'b', 'c'] {
            t.place_tile(letter(c), None);
        }
        t.place_prop(PropKind::Taj);
        t.trigger_round();
        run_until(&mut t, 30, |_| false);

        t.apply(InputEvent::KeyDown { key_code: KEY_RESET });
        assert!(t.scene().is_empty());
        assert!(t.scene().prop().is_none());
        assert_eq!(t.state(), RoundState::Idle);
        assert!(t.scheduler.is_empty());
        assert!(t.narration().is_empty());
        assert!(!t.narration().is_speaking());

        t.reset();
        assert!(t.scene().is_empty());
        run_until(&mut t, 60, |_| false);
        assert!(t.narration().is_empty());
    }

    #[test]
    fn rewind_keeps_layout_upright() {
        let mut t = toy();
        t.place_tile(letter('a'), None);
        t.place_tile(letter('b'), None);
        t.apply(InputEvent::KeyDown { key_code: KEY_TRIGGER });
        run_until(&mut t, 120, |_| false);

        t.apply(InputEvent::Rewind);
        assert_eq!(t.state(), RoundState::Idle);
        assert_eq!(t.scene().len(), 2);
        assert!(t.scene().tiles().iter().all(Tile::is_upright));
    }

    #[test]
    fn trigger_after_completion_replays() {
        let mut t = toy();
        t.place_tile(letter('z'), None);
        t.trigger_round();
        run_until(&mut t, 600, |t| t.state() == RoundState::Complete);
        assert!(t.trigger_round());
        assert_eq!(t.state(), RoundState::Running);
        assert!(t.scene().tiles()[0].is_falling());
    }

    #[test]
    fn break_points_report_gaps() {
        let mut t = toy();
        for c in ['a', 'b', 'c'] {
            t.place_tile(letter(c), None);
        }
        assert!(t.break_points().is_empty());

        // Middle tile spans x 125..157; removing it leaves 80 -> 189.5.
        assert_eq!(
            t.remove_at(Vec2::new(141.0, 290.0)),
            Some(Removed::Tile { index: 1, glyph: letter('b') })
        );
        let gaps = t.break_points();
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].index, 0);
        assert_eq!(gaps[0].distance, 109.5);
    }
}
