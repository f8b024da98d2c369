use crate::components::glyph::Glyph;
use crate::components::prop::PropKind;
use crate::components::tile::SizeClass;

/// Key code that starts a round.
pub const KEY_TRIGGER: u32 = 32;
/// Key code that clears the layout ('R').
pub const KEY_RESET: u32 = 82;

/// Commands the toy understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Append a tile. `None` uses the currently selected size class.
    PlaceTile { glyph: Glyph, size: Option<SizeClass> },
    /// Change the size class used for later tiles.
    SelectSizeClass(SizeClass),
    /// Place or replace the landmark at the end of the row.
    PlaceProp(PropKind),
    /// Remove whatever sits at world coordinates (x, y).
    RemoveAt { x: f32, y: f32 },
    /// Push over the first tile.
    TriggerRound,
    /// Clear tiles and prop.
    Reset,
    /// Stand the same layout back up.
    Rewind,
    /// A key was pressed.
    KeyDown { key_code: u32 },
}

/// Commands collected between frames.
///
/// The runner fills it from the page's handlers and the toy applies the
/// whole batch on the first step of the next frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Queue a command for the next frame.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every pending command, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending commands in arrival order.
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
