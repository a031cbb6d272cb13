//! HUD values derived from the simulation state
//!
//! Pure projection: the frontend writes these into DOM elements each frame.

use serde::Serialize;

use crate::consts::TICKS_PER_SECOND;
use crate::sim::{GameEvent, GameState, MoodKind, Screen};

/// Everything the HUD overlay shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub coins: u32,
    pub lives: u8,
    pub max_lives: u8,
    /// `Time: M:SS`
    pub timer: String,
    pub screen: Screen,
    pub mood: MoodKind,
    pub game_over: bool,
    /// Whole seconds until the automatic restart, while game over
    pub restart_in: Option<u32>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            coins: state.coins,
            lives: state.lives,
            max_lives: state.tuning.max_lives,
            timer: format_timer(state.session_ticks),
            screen: state.screen,
            mood: state.mood.current(),
            game_over: state.game_over,
            restart_in: state
                .game_over
                .then(|| state.game_over_ticks.div_ceil(TICKS_PER_SECOND)),
        }
    }

    pub fn coins_text(&self) -> String {
        format!("Coins: {}", self.coins)
    }

    /// Headline for the feeding screen
    pub fn collected_text(&self) -> String {
        format!("Oranges Collected: {}", self.coins)
    }

    pub fn final_score_text(&self) -> String {
        format!("Final Score: {} coins", self.coins)
    }

    pub fn restart_text(&self) -> Option<String> {
        self.restart_in
            .map(|secs| format!("Restarting in {} seconds...", secs))
    }

    /// Portrait expression
    pub fn face(&self) -> &'static str {
        match self.mood {
            MoodKind::Neutral => "🙂",
            MoodKind::Happy => "😊",
            MoodKind::Scared => "😱",
        }
    }

    /// Hearts float around the portrait when a catch starts a happy pulse
    /// that is actually showing. The portrait is hidden while feeding.
    pub fn floats_hearts(&self, event: &GameEvent) -> bool {
        self.screen == Screen::Active
            && self.mood == MoodKind::Happy
            && matches!(event, GameEvent::OrangeCaught | GameEvent::HeartCaught { gained: true })
    }
}

/// Format remaining ticks as `Time: M:SS`
pub fn format_timer(ticks: u32) -> String {
    let ticks_per_minute = 60 * TICKS_PER_SECOND;
    let minutes = ticks / ticks_per_minute;
    let seconds = (ticks % ticks_per_minute) / TICKS_PER_SECOND;
    format!("Time: {}:{:02}", minutes, seconds)
}
