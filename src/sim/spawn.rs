//! Probabilistic spawning of falling entities

use rand::Rng;

use super::state::{EntityKind, FallingEntity, GameState};

/// Roll the spawn chance for `kind`; on success append one entity to its sequence.
///
/// Hearts only roll while a life is missing. Returns whether something spawned.
pub fn try_spawn(state: &mut GameState, kind: EntityKind) -> bool {
    if kind == EntityKind::Heart && state.lives >= state.tuning.max_lives {
        return false;
    }

    let faller = *kind.tuning(&state.tuning);
    let roll: f32 = state.rng.random();
    if roll >= faller.spawn_chance {
        return false;
    }

    let span = (state.tuning.playfield_width - faller.width).max(0.0);
    let x = state.rng.random::<f32>() * span;
    let entity = FallingEntity::new(kind, x, &state.tuning);
    state.entities_mut(kind).push(entity);
    true
}
