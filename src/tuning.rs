//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override a subset of them
//! with a JSON blob. Missing fields fall back to the defaults.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Size, speed and spawn chance of one falling kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallerTuning {
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Probability of spawning one per tick
    pub spawn_chance: f32,
}

impl FallerTuning {
    pub const ORANGE: Self = Self::new(40.0, 2.0, 0.02);
    pub const BOMB: Self = Self::new(50.0, 2.5, 0.005);
    pub const BONE: Self = Self::new(45.0, 2.0, 0.01);
    pub const HEART: Self = Self::new(40.0, 1.5, 0.0008);

    const fn new(size: f32, speed: f32, spawn_chance: f32) -> Self {
        Self {
            width: size,
            height: size,
            speed,
            spawn_chance,
        }
    }
}

/// Any subset of a faller's fields, laid over that kind's defaults
#[derive(Deserialize)]
struct FallerPatch {
    width: Option<f32>,
    height: Option<f32>,
    speed: Option<f32>,
    spawn_chance: Option<f32>,
}

impl FallerPatch {
    fn apply(self, base: FallerTuning) -> FallerTuning {
        FallerTuning {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            speed: self.speed.unwrap_or(base.speed),
            spawn_chance: self.spawn_chance.unwrap_or(base.spawn_chance),
        }
    }
}

fn faller_over<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: FallerTuning,
) -> Result<FallerTuning, D::Error> {
    Ok(FallerPatch::deserialize(deserializer)?.apply(base))
}

fn orange<'de, D: Deserializer<'de>>(d: D) -> Result<FallerTuning, D::Error> {
    faller_over(d, FallerTuning::ORANGE)
}

fn bomb<'de, D: Deserializer<'de>>(d: D) -> Result<FallerTuning, D::Error> {
    faller_over(d, FallerTuning::BOMB)
}

fn bone<'de, D: Deserializer<'de>>(d: D) -> Result<FallerTuning, D::Error> {
    faller_over(d, FallerTuning::BONE)
}

fn heart<'de, D: Deserializer<'de>>(d: D) -> Result<FallerTuning, D::Error> {
    faller_over(d, FallerTuning::HEART)
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Basket ===
    pub basket_width: f32,
    pub basket_height: f32,
    /// Gap between the basket's top edge and the bottom of the playfield
    pub basket_bottom_offset: f32,
    pub basket_speed: f32,
    /// Catch zone as a fraction of the basket size
    pub catch_zone_width: f32,
    pub catch_zone_height: f32,

    // === Fallers (partial objects merge over each kind's defaults) ===
    #[serde(deserialize_with = "orange")]
    pub orange: FallerTuning,
    #[serde(deserialize_with = "bomb")]
    pub bomb: FallerTuning,
    #[serde(deserialize_with = "bone")]
    pub bone: FallerTuning,
    #[serde(deserialize_with = "heart")]
    pub heart: FallerTuning,

    // === Session ===
    pub max_lives: u8,
    pub session_ticks: u32,
    pub game_over_ticks: u32,
    pub happy_ticks: u32,
    pub scared_ticks: u32,
    pub fed_happy_ticks: u32,

    // === Explosion ===
    pub explosion_start_radius: f32,
    pub explosion_max_radius: f32,
    pub explosion_growth: f32,
    pub explosion_fade: f32,

    // === Feeding ===
    pub feeding_item_cap: u32,
    pub feeding_item_size: f32,
    pub mouth_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,

            basket_width: 150.0,
            basket_height: 120.0,
            basket_bottom_offset: 140.0,
            basket_speed: 5.0,
            catch_zone_width: 0.6,
            catch_zone_height: 0.4,

            orange: FallerTuning::ORANGE,
            bomb: FallerTuning::BOMB,
            bone: FallerTuning::BONE,
            heart: FallerTuning::HEART,

            max_lives: 5,
            session_ticks: 60 * TICKS_PER_SECOND,
            game_over_ticks: 3 * TICKS_PER_SECOND,
            happy_ticks: TICKS_PER_SECOND / 2,
            scared_ticks: TICKS_PER_SECOND,
            fed_happy_ticks: TICKS_PER_SECOND,

            explosion_start_radius: 10.0,
            explosion_max_radius: 80.0,
            explosion_growth: 3.0,
            explosion_fade: 0.033,

            feeding_item_cap: 12,
            feeding_item_size: 40.0,
            mouth_radius: 40.0,
        }
    }
}

/// Why a tuning blob was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for a `Tuning`
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "tuning is not valid JSON: {}", err),
            TuningError::Invalid { field, reason } => write!(f, "tuning field `{}` {}", field, reason),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the ranges the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(invalid("playfield", "must have a positive size"));
        }
        if !(self.basket_width > 0.0 && self.basket_height > 0.0) {
            return Err(invalid("basket", "must have a positive size"));
        }
        if self.basket_width > self.playfield_width {
            return Err(invalid("basket_width", "must fit inside the playfield"));
        }
        if !(0.0..=1.0).contains(&self.catch_zone_width) || !(0.0..=1.0).contains(&self.catch_zone_height) {
            return Err(invalid("catch_zone", "fractions must be within 0..=1"));
        }

        for (field, faller) in [
            ("orange", &self.orange),
            ("bomb", &self.bomb),
            ("bone", &self.bone),
            ("heart", &self.heart),
        ] {
            if !(faller.width > 0.0 && faller.height > 0.0) {
                return Err(invalid(field, "must have a positive size"));
            }
            if faller.width > self.playfield_width {
                return Err(invalid(field, "must fit inside the playfield"));
            }
            if !(0.0..=1.0).contains(&faller.spawn_chance) {
                return Err(invalid(field, "spawn chance must be within 0..=1"));
            }
        }

        if self.max_lives == 0 {
            return Err(invalid("max_lives", "must be at least 1"));
        }
        if self.session_ticks == 0 {
            return Err(invalid("session_ticks", "must be at least 1"));
        }
        if self.game_over_ticks == 0 {
            return Err(invalid("game_over_ticks", "must be at least 1"));
        }
        if self.explosion_growth <= 0.0 && self.explosion_fade <= 0.0 {
            return Err(invalid("explosion", "must grow or fade to terminate"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.session_ticks, 3600);
        assert_eq!(tuning.game_over_ticks, 180);
        assert_eq!(tuning.happy_ticks, 30);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "playfield_width": 1024, "max_lives": 3 }"#).unwrap();
        assert_eq!(tuning.playfield_width, 1024.0);
        assert_eq!(tuning.max_lives, 3);
        assert_eq!(tuning.playfield_height, 600.0);
        assert_eq!(tuning.orange, Tuning::default().orange);
    }

    #[test]
    fn test_partial_faller_merges_over_its_own_defaults() {
        let tuning = Tuning::from_json(r#"{ "orange": { "spawn_chance": 0.05 }, "bomb": { "speed": 4 } }"#).unwrap();
        assert_eq!(tuning.orange.spawn_chance, 0.05);
        assert_eq!(tuning.orange.width, 40.0);
        assert_eq!(tuning.orange.speed, 2.0);
        assert_eq!(tuning.bomb.speed, 4.0);
        assert_eq!(tuning.bomb.width, 50.0);
        assert_eq!(tuning.bomb.spawn_chance, 0.005);
        assert_eq!(tuning.bone, FallerTuning::BONE);
        assert_eq!(tuning.heart, FallerTuning::HEART);
    }

    #[test]
    fn test_partial_faller_still_validated() {
        let err = Tuning::from_json(r#"{ "heart": { "spawn_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "heart", .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Tuning::from_json(r#"{ "max_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_lives", .. }));

        let err = Tuning::from_json(r#"{ "basket_width": 2000 }"#).unwrap_err();
        assert!(err.to_string().contains("basket_width"));
    }
}
