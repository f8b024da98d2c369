use domino_core::systems::render::build_render_buffer;
use domino_core::{
    BreakPoint, DominoToy, FixedTimestep, GameEvent, InputEvent, InputQueue, RenderBuffer,
    RoundState, ToyConfig, VoiceSettings,
};

/// Wires the toy into the browser frame loop.
///
/// `lib.rs` keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, which cannot export this struct directly.
pub struct ToyRunner {
    toy: DominoToy,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    /// Flat buffer of sound cue codes for direct reads from wasm memory.
    sound_buffer: Vec<u8>,
    event_buffer: Vec<GameEvent>,
}

impl ToyRunner {
    pub fn new(config: ToyConfig) -> Self {
        let timestep =
            FixedTimestep::with_max_steps(config.world.fixed_dt, config.world.max_steps_per_frame);
        Self {
            toy: DominoToy::new(config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(),
            timestep,
            sound_buffer: Vec::with_capacity(32),
            event_buffer: Vec::with_capacity(32),
        }
    }

    /// Push an input event into the queue. Applied at the start of the next step.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one browser frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        // Clear per-frame transient data
        self.toy.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            // Input applies once, on the first step of the frame.
            self.toy.update(&self.input);
            self.input.drain();
            for _ in 1..steps {
                self.toy.step(self.timestep.dt());
            }
        }

        build_render_buffer(self.toy.scene(), &self.toy.config().explosion, &mut self.render_buffer);

        self.sound_buffer.clear();
        self.sound_buffer.extend(self.toy.sounds.iter().map(|s| s.code()));

        self.event_buffer.clear();
        self.event_buffer.extend(self.toy.events.iter().map(|e| e.to_game_event()));
    }

    pub fn toy(&self) -> &DominoToy {
        &self.toy
    }

    pub fn next_phrase(&mut self) -> Option<String> {
        self.toy.narration_mut().next_phrase()
    }

    pub fn phrase_finished(&mut self) {
        self.toy.narration_mut().phrase_finished();
    }

    pub fn set_narration(&mut self, enabled: bool) {
        self.toy.narration_mut().set_enabled(enabled);
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.toy.config().voice
    }

    pub fn break_points(&self) -> Vec<BreakPoint> {
        self.toy.break_points()
    }

    /// 0 idle, 1 running, 2 settling, 3 complete.
    pub fn round_state(&self) -> u8 {
        match self.toy.state() {
            RoundState::Idle => 0,
            RoundState::Running => 1,
            RoundState::Settling => 2,
            RoundState::Complete => 3,
        }
    }

    // ---- Pointer accessors for direct reads from wasm memory ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn overlay_split(&self) -> u32 {
        self.render_buffer.overlay_split
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.toy.config().world.width
    }

    pub fn world_height(&self) -> f32 {
        self.toy.config().world.height
    }
}
