//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to [`tick`] per frame, timers count frames
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod feeding;
pub mod geom;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionPolicy, catch_zone, center_zone_hit, hits_basket, overlap_hit};
pub use feeding::{Feeding, FeedingItem, FeedingTarget};
pub use geom::Rect;
pub use state::{
    Basket, EntityKind, Explosion, FallingEntity, GameEvent, GameState, Mood, MoodKind, Screen,
};
pub use tick::{TickInput, tick};
