//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! globals. The renderer and HUD only ever borrow it immutably.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::feeding::Feeding;
use super::geom::Rect;
use crate::tuning::{FallerTuning, Tuning};

/// Which screen is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Falling-object catching screen
    Active,
    /// Drag-and-drop feeding screen
    Feeding,
}

/// Kinds of falling entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Orange,
    Bomb,
    Bone,
    Heart,
}

impl EntityKind {
    pub fn tuning(self, tuning: &Tuning) -> &FallerTuning {
        match self {
            EntityKind::Orange => &tuning.orange,
            EntityKind::Bomb => &tuning.bomb,
            EntityKind::Bone => &tuning.bone,
            EntityKind::Heart => &tuning.heart,
        }
    }
}

/// A falling orange, bomb, bone or heart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    pub kind: EntityKind,
    pub rect: Rect,
    /// Pixels per tick
    pub speed: f32,
    /// Ticks since spawn, bombs only (sprite flicker)
    pub anim_frame: u32,
}

impl FallingEntity {
    /// New entity of `kind` whose left edge is at `x`, just above the playfield
    pub fn new(kind: EntityKind, x: f32, tuning: &Tuning) -> Self {
        let t = kind.tuning(tuning);
        Self {
            kind,
            rect: Rect::new(x, -t.height, t.width, t.height),
            speed: t.speed,
            anim_frame: 0,
        }
    }

    /// Advance one tick
    pub fn fall(&mut self) {
        self.rect.y += self.speed;
        if self.kind == EntityKind::Bomb {
            self.anim_frame += 1;
        }
    }
}

/// The player's basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub rect: Rect,
    /// Pixels per tick
    pub speed: f32,
}

impl Basket {
    /// Basket centered horizontally near the bottom of the playfield
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.playfield_width / 2.0 - tuning.basket_width / 2.0,
                tuning.playfield_height - tuning.basket_bottom_offset,
                tuning.basket_width,
                tuning.basket_height,
            ),
            speed: tuning.basket_speed,
        }
    }

    /// Apply held directions (left first, then right), then clamp to the playfield
    pub fn steer(&mut self, left: bool, right: bool, playfield_width: f32) {
        let max_x = playfield_width - self.rect.width;
        if left && self.rect.x > 0.0 {
            self.rect.x -= self.speed;
        }
        if right && self.rect.x < max_x {
            self.rect.x += self.speed;
        }
        self.rect.x = self.rect.x.clamp(0.0, max_x.max(0.0));
    }
}

/// Expanding, fading blast left by a bomb hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub opacity: f32,
}

impl Explosion {
    pub fn new(center: Vec2, tuning: &Tuning) -> Self {
        Self {
            center,
            radius: tuning.explosion_start_radius,
            max_radius: tuning.explosion_max_radius,
            opacity: 1.0,
        }
    }

    /// Grow and fade; returns false once the blast is spent
    pub fn advance(&mut self, growth: f32, fade: f32) -> bool {
        self.radius += growth;
        self.opacity -= fade;
        self.radius < self.max_radius && self.opacity > 0.0
    }
}

/// Mood shown by the capybara portrait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodKind {
    Neutral,
    Happy,
    Scared,
}

/// Two independent mood countdowns; scared outranks happy for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Mood {
    pub happy_ticks: u32,
    pub scared_ticks: u32,
}

impl Mood {
    pub fn make_happy(&mut self, ticks: u32) {
        self.happy_ticks = ticks;
    }

    pub fn make_scared(&mut self, ticks: u32) {
        self.scared_ticks = ticks;
    }

    /// Both timers run down every tick, whichever is visible
    pub fn tick(&mut self) {
        self.happy_ticks = self.happy_ticks.saturating_sub(1);
        self.scared_ticks = self.scared_ticks.saturating_sub(1);
    }

    pub fn current(&self) -> MoodKind {
        if self.scared_ticks > 0 {
            MoodKind::Scared
        } else if self.happy_ticks > 0 {
            MoodKind::Happy
        } else {
            MoodKind::Neutral
        }
    }
}

/// One-shot notifications for the frontend (drained each frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    OrangeCaught,
    BoneCaught,
    /// `gained` is false when lives were already full
    HeartCaught { gained: bool },
    BombHit { at: Vec2 },
    GameOver,
    FeedingStarted { items: usize },
    /// An item was eaten; `coins` is the new count
    Fed { coins: u32 },
    SessionReset,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance sheet this session runs with
    pub tuning: Tuning,
    /// Session RNG (spawn rolls and positions)
    pub rng: Pcg32,
    pub coins: u32,
    pub lives: u8,
    pub game_over: bool,
    /// Ticks left before the automatic reset
    pub game_over_ticks: u32,
    pub screen: Screen,
    /// Ticks left on the catching screen
    pub session_ticks: u32,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    pub mood: Mood,
    pub basket: Basket,
    pub oranges: Vec<FallingEntity>,
    pub bombs: Vec<FallingEntity>,
    pub bones: Vec<FallingEntity>,
    pub hearts: Vec<FallingEntity>,
    pub explosion: Option<Explosion>,
    pub feeding: Feeding,
    /// Events raised since the frontend last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session. `tuning` is expected to be validated.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            basket: Basket::new(&tuning),
            coins: 0,
            lives: tuning.max_lives,
            game_over: false,
            game_over_ticks: 0,
            screen: Screen::Active,
            session_ticks: tuning.session_ticks,
            time_ticks: 0,
            mood: Mood::default(),
            oranges: Vec::new(),
            bombs: Vec::new(),
            bones: Vec::new(),
            hearts: Vec::new(),
            explosion: None,
            feeding: Feeding::new(&tuning),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Back to the initial session values. The RNG stream carries on.
    pub fn reset(&mut self) {
        self.coins = 0;
        self.lives = self.tuning.max_lives;
        self.game_over = false;
        self.game_over_ticks = 0;
        self.screen = Screen::Active;
        self.session_ticks = self.tuning.session_ticks;
        self.mood = Mood::default();
        self.basket = Basket::new(&self.tuning);
        self.oranges.clear();
        self.bombs.clear();
        self.bones.clear();
        self.hearts.clear();
        self.explosion = None;
        self.feeding = Feeding::new(&self.tuning);
        self.events.push(GameEvent::SessionReset);
        log::info!("Session reset");
    }

    /// The sequence holding entities of `kind`
    pub fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<FallingEntity> {
        match kind {
            EntityKind::Orange => &mut self.oranges,
            EntityKind::Bomb => &mut self.bombs,
            EntityKind::Bone => &mut self.bones,
            EntityKind::Heart => &mut self.hearts,
        }
    }

    /// Total falling entities on screen
    pub fn entity_count(&self) -> usize {
        self.oranges.len() + self.bombs.len() + self.bones.len() + self.hearts.len()
    }

    /// Hand the accumulated events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
