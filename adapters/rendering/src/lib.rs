#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bertha Knockout adapters.

use anyhow::Result as AnyResult;
use bertha_knockout_core::{
    CharacterKind, Outcome, PopId, PopSnapshot, RoundPhase, RoundSnapshot, ScreenPoint, SlotId,
    SlotRect, GAME_TITLE,
};
use bertha_knockout_system_feedback::{AudioCue, TextMood, VisualEffect};
use glam::Vec2;
use std::{error::Error, f32::consts::PI, fmt, time::Duration};

const POP_BOB_HEIGHT: f32 = 16.0;
const HAMMER_SETTLE_RATE: f32 = 6.0;
const HAMMER_RAISED_THRESHOLD: f32 = 0.2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Hallway backdrop drawn behind the doors.
    #[must_use]
    pub fn backdrop() -> Self {
        Self::from_rgb_u8(0x2e, 0x2e, 0x2e)
    }

    /// Tint used for floating text of the provided mood.
    #[must_use]
    pub fn for_mood(mood: TextMood) -> Self {
        match mood {
            TextMood::Cheer => Self::from_rgb_u8(0x72, 0xff, 0xa6),
            TextMood::Warning => Self::from_rgb_u8(0xff, 0x6b, 0x6b),
        }
    }
}

/// Keyboard shortcuts understood by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Pause or resume the running round.
    TogglePause,
    /// Discard the round and return to the title.
    Reset,
    /// Switch audio cues on or off.
    ToggleSound,
}

impl KeyAction {
    /// Maps a key name reported by an adapter onto its action, ignoring case.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            " " | "space" => Some(Self::TogglePause),
            "r" => Some(Self::Reset),
            "m" => Some(Self::ToggleSound),
            _ => None,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in screen units, if the pointer is over the canvas.
    pub cursor: Option<Vec2>,
    /// Whether the pointer was pressed on this frame.
    pub pressed: bool,
    /// Whether the pointer was released on this frame.
    pub released: bool,
    /// Keyboard shortcuts triggered on this frame, in order.
    pub keys: Vec<KeyAction>,
}

impl FrameInput {
    /// Pointer position converted to the core's screen point.
    #[must_use]
    pub fn cursor_point(&self) -> Option<ScreenPoint> {
        self.cursor.map(|cursor| ScreenPoint::new(cursor.x, cursor.y))
    }
}

/// Heads-up display values shown around the play area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hud {
    /// Points earned this round.
    pub score: u32,
    /// Best score across sessions.
    pub best: u32,
    /// Strikes charged this round.
    pub strikes: u32,
    /// Strikes that end the round.
    pub strike_limit: u32,
    /// Whole seconds left on the clock, rounded up.
    pub seconds_left: u32,
    /// Consecutive target hits since the last strike.
    pub streak: u32,
    /// Score that wins the round.
    pub goal: u32,
    /// Progress towards the goal in `0.0..=1.0`.
    pub goal_fill: f32,
    /// Whether audio cues are enabled.
    pub sound_enabled: bool,
}

impl Hud {
    /// Derives the HUD values from a round snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &RoundSnapshot) -> Self {
        let goal_fill = if snapshot.goal == 0 {
            0.0
        } else {
            (snapshot.score as f32 / snapshot.goal as f32).clamp(0.0, 1.0)
        };
        Self {
            score: snapshot.score,
            best: snapshot.best_score,
            strikes: snapshot.strikes,
            strike_limit: snapshot.strike_limit,
            seconds_left: snapshot.remaining.as_secs_f64().ceil() as u32,
            streak: snapshot.streak,
            goal: snapshot.goal,
            goal_fill,
            sound_enabled: snapshot.sound_enabled,
        }
    }
}

/// Full screen message drawn over the play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Title card shown before the first press.
    Title,
    /// Pause card.
    Paused,
    /// Win card.
    Won,
    /// Loss card.
    Lost,
}

impl Overlay {
    /// Overlay matching the round phase, `None` while the round runs.
    #[must_use]
    pub const fn for_phase(phase: RoundPhase) -> Option<Self> {
        match phase {
            RoundPhase::Idle => Some(Self::Title),
            RoundPhase::Running => None,
            RoundPhase::Paused => Some(Self::Paused),
            RoundPhase::Ended(Outcome::Win) => Some(Self::Won),
            RoundPhase::Ended(Outcome::Loss) => Some(Self::Lost),
        }
    }

    /// Headline of the overlay.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Title => GAME_TITLE,
            Self::Paused => "Paused",
            Self::Won => "Rent Paid!",
            Self::Lost => "Game Over",
        }
    }

    /// Secondary line of the overlay.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Title => {
                "Whack Ms. Bertha when she pops out of a door. Hitting anyone else is a strike. \
                 Reach the goal before the clock runs out!"
            }
            Self::Paused => "Press Space to resume",
            Self::Won => "You paid the rent!",
            Self::Lost => "Too many strikes or time ran out.",
        }
    }
}

/// Live pop positioned and animated for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopPresentation {
    /// Identifier of the pop.
    pub id: PopId,
    /// Door the pop occupies.
    pub slot: SlotId,
    /// Character shown by the pop.
    pub kind: CharacterKind,
    /// Door rectangle the sprite is drawn into.
    pub door: SlotRect,
    /// Vertical bob applied to the sprite, negative values lift it.
    pub y_offset: f32,
    /// Sprite opacity in `0.25..=1.0`.
    pub alpha: f32,
}

impl PopPresentation {
    /// Animates a pop snapshot at the provided round time.
    #[must_use]
    pub fn from_snapshot(pop: &PopSnapshot, door: SlotRect, elapsed: Duration) -> Self {
        let t = pop.progress(elapsed);
        Self {
            id: pop.id,
            slot: pop.slot,
            kind: pop.kind,
            door,
            y_offset: (t.min(1.0) * PI).sin() * -POP_BOB_HEIGHT,
            alpha: 0.25 + 0.75 * (t * PI).sin(),
        }
    }
}

/// Hammer cursor that follows the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorIndicator {
    /// Pointer position in screen units.
    pub position: Vec2,
    /// Whether the pointer is held down.
    pub down: bool,
    /// Swing animation level, 1.0 right after a press, settling to 0.0.
    pub swing: f32,
}

impl CursorIndicator {
    /// Applies the pointer part of a frame input and settles the swing by `dt`.
    pub fn update(&mut self, dt: Duration, input: &FrameInput) {
        if let Some(cursor) = input.cursor {
            self.position = cursor;
        }
        if self.swing > 0.0 {
            self.swing = (self.swing - dt.as_secs_f32() * HAMMER_SETTLE_RATE).max(0.0);
        }
        if input.pressed {
            self.down = true;
            self.swing = 1.0;
        }
        if input.released {
            self.down = false;
        }
    }

    /// Rotation of the hammer sprite in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        if self.down || self.swing > HAMMER_RAISED_THRESHOLD {
            PI / 5.0
        } else {
            -PI / 12.0
        }
    }
}

/// Scene description combining the doors, the pops and the round chrome.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Door rectangles indexed by slot.
    pub doors: Vec<SlotRect>,
    /// Pops visible on this frame, oldest first.
    pub pops: Vec<PopPresentation>,
    /// Heads-up display values.
    pub hud: Hud,
    /// Message drawn over the play area, if any.
    pub overlay: Option<Overlay>,
    /// Hammer cursor.
    pub cursor: CursorIndicator,
    /// Effects started on this frame.
    pub effects: Vec<VisualEffect>,
    /// Audio cues started on this frame.
    pub cues: Vec<AudioCue>,
    /// Screen shake magnitude in screen units.
    pub screen_shake: f32,
}

impl Scene {
    /// Creates a scene showing the provided doors and nothing else.
    #[must_use]
    pub fn new(doors: Vec<SlotRect>) -> Self {
        Self {
            doors,
            ..Self::default()
        }
    }

    /// Topmost pop under the provided point, mirroring the world's hit test.
    #[must_use]
    pub fn pop_at(&self, point: ScreenPoint) -> Option<&PopPresentation> {
        self.pops.iter().rev().find(|pop| pop.door.contains(point))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Canvas the scene is laid out on.
    pub canvas: CanvasSize,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, canvas: CanvasSize, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            canvas,
            scene,
        }
    }
}

/// Validated canvas dimensions in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    width: f32,
    height: f32,
}

impl CanvasSize {
    /// Creates a canvas size, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(width) || !valid(height) {
            return Err(RenderingError::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    /// Canvas width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Rendering backend capable of presenting Bertha Knockout scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Canvas dimensions must be positive and finite.
    InvalidCanvas {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCanvas { width, height } => {
                write!(f, "canvas must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(remaining_ms: u64, score: u32) -> RoundSnapshot {
        RoundSnapshot {
            phase: RoundPhase::Running,
            score,
            best_score: 40,
            strikes: 1,
            strike_limit: 3,
            streak: 2,
            goal: 100,
            elapsed: Duration::from_millis(30_000 - remaining_ms),
            remaining: Duration::from_millis(remaining_ms),
            target_appearances: 4,
            sound_enabled: true,
        }
    }

    #[test]
    fn key_names_map_to_actions() {
        assert_eq!(KeyAction::from_key(" "), Some(KeyAction::TogglePause));
        assert_eq!(KeyAction::from_key("Space"), Some(KeyAction::TogglePause));
        assert_eq!(KeyAction::from_key("R"), Some(KeyAction::Reset));
        assert_eq!(KeyAction::from_key("m"), Some(KeyAction::ToggleSound));
        assert_eq!(KeyAction::from_key("q"), None);
    }

    #[test]
    fn hud_rounds_seconds_up_and_clamps_goal_fill() {
        let hud = Hud::from_snapshot(&snapshot(12_001, 30));
        assert_eq!(hud.seconds_left, 13);
        assert!((hud.goal_fill - 0.3).abs() < 1e-6);

        let hud = Hud::from_snapshot(&snapshot(0, 120));
        assert_eq!(hud.seconds_left, 0);
        assert_eq!(hud.goal_fill, 1.0);
    }

    #[test]
    fn overlay_follows_phase() {
        assert_eq!(Overlay::for_phase(RoundPhase::Idle), Some(Overlay::Title));
        assert_eq!(Overlay::for_phase(RoundPhase::Running), None);
        assert_eq!(
            Overlay::for_phase(RoundPhase::Ended(Outcome::Win)).map(Overlay::headline),
            Some("Rent Paid!")
        );
        assert_eq!(Overlay::Title.headline(), GAME_TITLE);
    }

    #[test]
    fn pops_bob_and_fade_over_their_lifetime() {
        let pop = PopSnapshot {
            id: PopId::new(0),
            slot: SlotId::new(0),
            kind: CharacterKind::Target,
            spawned_at: Duration::ZERO,
            lifetime: Duration::from_millis(1_000),
            hit: false,
        };
        let door = SlotRect::from_center(ScreenPoint::new(100.0, 100.0), 120.0, 180.0);

        let fresh = PopPresentation::from_snapshot(&pop, door, Duration::ZERO);
        assert_eq!(fresh.y_offset, 0.0);
        assert!((fresh.alpha - 0.25).abs() < 1e-6);

        let peak = PopPresentation::from_snapshot(&pop, door, Duration::from_millis(500));
        assert!((peak.y_offset + 16.0).abs() < 1e-4);
        assert!((peak.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hammer_swings_on_press_and_settles() {
        let mut cursor = CursorIndicator::default();
        let press = FrameInput {
            cursor: Some(Vec2::new(10.0, 20.0)),
            pressed: true,
            ..FrameInput::default()
        };
        cursor.update(Duration::from_millis(16), &press);
        assert_eq!(cursor.position, Vec2::new(10.0, 20.0));
        assert_eq!(cursor.angle(), PI / 5.0);

        let release = FrameInput {
            released: true,
            ..FrameInput::default()
        };
        cursor.update(Duration::from_millis(100), &release);
        assert!(cursor.swing > 0.2);
        assert_eq!(cursor.angle(), PI / 5.0);

        cursor.update(Duration::from_millis(100), &FrameInput::default());
        assert_eq!(cursor.swing, 0.0);
        assert_eq!(cursor.angle(), -PI / 12.0);
    }

    #[test]
    fn canvas_rejects_degenerate_sizes() {
        assert!(CanvasSize::new(820.0, 1_093.0).is_ok());
        assert_eq!(
            CanvasSize::new(0.0, 10.0),
            Err(RenderingError::InvalidCanvas {
                width: 0.0,
                height: 10.0,
            })
        );
        assert!(CanvasSize::new(f32::NAN, 10.0).is_err());
    }

    #[test]
    fn scene_hit_test_prefers_newest_pop() {
        let door = SlotRect::from_center(ScreenPoint::new(50.0, 50.0), 100.0, 100.0);
        let pop = |id| PopPresentation {
            id: PopId::new(id),
            slot: SlotId::new(0),
            kind: CharacterKind::Target,
            door,
            y_offset: 0.0,
            alpha: 1.0,
        };
        let scene = Scene {
            pops: vec![pop(1), pop(2)],
            ..Scene::new(vec![door])
        };

        assert_eq!(
            scene.pop_at(ScreenPoint::new(50.0, 50.0)).map(|pop| pop.id),
            Some(PopId::new(2))
        );
        assert!(scene.pop_at(ScreenPoint::new(500.0, 50.0)).is_none());
    }
}
