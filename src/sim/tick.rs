//! Fixed-rate simulation tick
//!
//! One call advances the whole session by one frame. Timers are frame counts,
//! so a slow host makes the game run slow rather than skip state.

use glam::Vec2;

use super::collision::{CollisionPolicy, hits_basket};
use super::spawn::try_spawn;
use super::state::{EntityKind, Explosion, GameEvent, GameState, Screen};

/// Input sampled at the start of a tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move basket left (held)
    pub move_left: bool,
    /// Move basket right (held)
    pub move_right: bool,
    /// Latest pointer position
    pub pointer: Option<Vec2>,
    /// Pointer pressed this tick, at this position
    pub pointer_down: Option<Vec2>,
    /// Pointer released this tick, at this position
    pub pointer_up: Option<Vec2>,
    /// Throw the session away and start over
    pub restart: bool,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if input.restart {
        state.reset();
        return;
    }

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    // Moods run down on every screen, game over included
    state.mood.tick();

    match state.screen {
        Screen::Active if state.game_over => tick_game_over(state),
        Screen::Active => tick_active(state, &input),
        Screen::Feeding => tick_feeding(state, &input),
    }
}

fn tick_game_over(state: &mut GameState) {
    state.game_over_ticks = state.game_over_ticks.saturating_sub(1);
    if state.game_over_ticks == 0 {
        state.reset();
    }
}

fn tick_active(state: &mut GameState, input: &TickInput) {
    state.session_ticks = state.session_ticks.saturating_sub(1);

    let width = state.tuning.playfield_width;
    state.basket.steer(input.move_left, input.move_right, width);

    for kind in [EntityKind::Orange, EntityKind::Bone, EntityKind::Bomb] {
        try_spawn(state, kind);
        update_entities(state, kind);
    }

    let (growth, fade) = (state.tuning.explosion_growth, state.tuning.explosion_fade);
    if state.explosion.as_mut().is_some_and(|e| !e.advance(growth, fade)) {
        state.explosion = None;
    }

    // A heart caught after the last life is gone must not revive the session
    if !state.game_over {
        try_spawn(state, EntityKind::Heart);
        update_entities(state, EntityKind::Heart);
    }

    if state.session_ticks == 0 && state.lives > 0 && !state.game_over {
        enter_feeding(state);
    }
}

/// Move every entity of `kind`, resolve catches, drop the ones that fell out
fn update_entities(state: &mut GameState, kind: EntityKind) {
    let basket = state.basket.rect;
    let policy = CollisionPolicy::for_kind(kind);
    let (zone_w, zone_h) = (state.tuning.catch_zone_width, state.tuning.catch_zone_height);
    let floor = state.tuning.playfield_height;

    let mut hits: Vec<Vec2> = Vec::new();
    state.entities_mut(kind).retain_mut(|entity| {
        entity.fall();
        // Collision wins over falling out on the same tick
        if hits_basket(policy, &entity.rect, &basket, zone_w, zone_h) {
            hits.push(entity.rect.center());
            false
        } else {
            entity.rect.y <= floor
        }
    });

    // Newest first, so the oldest bomb's blast is the one left standing
    for at in hits.into_iter().rev() {
        apply_hit(state, kind, at);
    }
}

/// Score/lives consequences of one entity reaching the basket
fn apply_hit(state: &mut GameState, kind: EntityKind, at: Vec2) {
    match kind {
        EntityKind::Orange => {
            state.coins = state.coins.saturating_add(1);
            state.mood.make_happy(state.tuning.happy_ticks);
            state.events.push(GameEvent::OrangeCaught);
            log::debug!("Orange caught, coins: {}", state.coins);
        }
        EntityKind::Bone => {
            state.coins = state.coins.saturating_sub(1);
            state.events.push(GameEvent::BoneCaught);
            log::debug!("Bone caught, coins: {}", state.coins);
        }
        EntityKind::Heart => {
            let gained = state.lives < state.tuning.max_lives;
            if gained {
                state.lives += 1;
                state.mood.make_happy(state.tuning.happy_ticks);
            }
            state.events.push(GameEvent::HeartCaught { gained });
            log::debug!("Heart caught, lives: {}", state.lives);
        }
        EntityKind::Bomb => {
            state.explosion = Some(Explosion::new(at, &state.tuning));
            state.lives = state.lives.saturating_sub(1);
            state.mood.make_scared(state.tuning.scared_ticks);
            state.events.push(GameEvent::BombHit { at });
            log::debug!("Bomb hit, lives: {}", state.lives);

            if state.lives == 0 && !state.game_over {
                state.game_over = true;
                state.game_over_ticks = state.tuning.game_over_ticks;
                state.events.push(GameEvent::GameOver);
                log::info!("Game over with {} coins", state.coins);
            }
        }
    }
}

fn enter_feeding(state: &mut GameState) {
    state.screen = Screen::Feeding;
    let items = state.feeding.deal(state.coins);
    state.events.push(GameEvent::FeedingStarted { items });
    log::info!("Time up, feeding with {} coins ({} items)", state.coins, items);
}

fn tick_feeding(state: &mut GameState, input: &TickInput) {
    if let Some(point) = input.pointer_down {
        state.feeding.press(point);
    }
    if let Some(point) = input.pointer {
        state.feeding.drag_to(point);
    }
    if let Some(point) = input.pointer_up {
        if state.feeding.release(point) {
            state.coins = state.coins.saturating_sub(1);
            state.mood.make_happy(state.tuning.fed_happy_ticks);
            state.events.push(GameEvent::Fed { coins: state.coins });
            log::debug!("Capybara fed, coins left: {}", state.coins);
        }
    }

    // More than a batch was collected: deal the next one
    if state.feeding.items.is_empty() && state.coins > 0 {
        let items = state.feeding.deal(state.coins);
        log::debug!("Dealt {} more items", items);
    }
}

/// How far above the basket a bomb counts as a threat
const BOMB_LOOKAHEAD: f32 = 160.0;

/// Synthesize input for demo mode
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = TickInput {
        restart: input.restart,
        autopilot: true,
        ..Default::default()
    };

    match state.screen {
        Screen::Active => {
            let basket = state.basket.rect;
            let basket_x = basket.center().x;
            let zone_bottom = basket.center().y + basket.height * state.tuning.catch_zone_height / 2.0;

            // Dodge first: any bomb about to land on the basket
            let threat = state
                .bombs
                .iter()
                .filter(|b| b.rect.bottom() > basket.y - BOMB_LOOKAHEAD && b.rect.y < basket.bottom())
                .filter(|b| b.rect.right() > basket.x - 20.0 && b.rect.x < basket.right() + 20.0)
                .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y));

            let target_x = if let Some(bomb) = threat {
                let bomb_x = bomb.rect.center().x;
                if bomb_x >= basket_x {
                    basket_x - basket.width
                } else {
                    basket_x + basket.width
                }
            } else {
                // Lowest orange (or heart, when one is useful) still above the catch line
                let want_hearts = state.lives < state.tuning.max_lives;
                state
                    .oranges
                    .iter()
                    .chain(state.hearts.iter().filter(|_| want_hearts))
                    .filter(|e| e.rect.center().y <= zone_bottom)
                    .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
                    .map(|e| e.rect.center().x)
                    .unwrap_or(basket_x)
            };

            let deadband = state.basket.speed;
            input.move_left = target_x < basket_x - deadband;
            input.move_right = target_x > basket_x + deadband;
        }
        Screen::Feeding => {
            let feeding = &state.feeding;
            if feeding.dragged.is_some() {
                input.pointer_up = Some(feeding.target.mouth);
            } else if let Some(item) = feeding.items.last() {
                input.pointer_down = Some(item.rect.center());
            }
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FallingEntity;
    use crate::tuning::Tuning;

    /// Nothing spawns on its own
    fn quiet() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.orange.spawn_chance = 0.0;
        tuning.bomb.spawn_chance = 0.0;
        tuning.bone.spawn_chance = 0.0;
        tuning.heart.spawn_chance = 0.0;
        tuning
    }

    /// Entity whose center lands on `center` after one fall
    fn about_to_land(state: &GameState, kind: EntityKind, center: Vec2) -> FallingEntity {
        let mut entity = FallingEntity::new(kind, 0.0, &state.tuning);
        entity.rect.set_center(center - Vec2::new(0.0, entity.speed));
        entity
    }

    #[test]
    fn test_orange_catch_increments_coins() {
        let mut state = GameState::new(quiet(), 1);
        state.coins = 4;
        let center = state.basket.rect.center();
        let caught = about_to_land(&state, EntityKind::Orange, center);
        let mut missed = FallingEntity::new(EntityKind::Orange, 10.0, &state.tuning);
        missed.rect.y = 100.0;
        state.oranges = vec![missed.clone(), caught];

        tick(&mut state, &TickInput::default());

        assert_eq!(state.coins, 5);
        assert_eq!(state.oranges.len(), 1);
        assert_eq!(state.oranges[0].rect.x, missed.rect.x);
        assert_eq!(state.mood.happy_ticks, 30);
        assert_eq!(state.drain_events(), vec![GameEvent::OrangeCaught]);
    }

    #[test]
    fn test_graze_is_not_caught_and_keeps_falling() {
        let mut state = GameState::new(quiet(), 1);
        let basket = state.basket.rect;
        // Inside the basket, left of the 60% catch zone
        let center = Vec2::new(basket.x + 10.0, basket.center().y);
        state.oranges.push(about_to_land(&state, EntityKind::Orange, center));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.coins, 0);
        assert_eq!(state.oranges.len(), 1);
        assert_eq!(state.oranges[0].rect.center(), center);
    }

    #[test]
    fn test_bomb_graze_costs_a_life() {
        let mut state = GameState::new(quiet(), 1);
        let basket = state.basket.rect;
        // Center outside the basket entirely, corner overlapping
        let center = Vec2::new(basket.x - 20.0, basket.y - 20.0);
        state.bombs.push(about_to_land(&state, EntityKind::Bomb, center));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 4);
        assert!(state.bombs.is_empty());
        let explosion = state.explosion.as_ref().unwrap();
        assert_eq!(explosion.center, center);
        // Advanced once in the tick it was created
        assert_eq!(explosion.radius, 13.0);
        assert_eq!(state.mood.scared_ticks, 60);
    }

    #[test]
    fn test_new_bomb_hit_replaces_running_explosion() {
        let mut state = GameState::new(quiet(), 1);
        let mut old = Explosion::new(Vec2::new(100.0, 100.0), &state.tuning);
        old.radius = 50.0;
        old.opacity = 0.4;
        state.explosion = Some(old);
        let center = state.basket.rect.center();
        state.bombs.push(about_to_land(&state, EntityKind::Bomb, center));

        tick(&mut state, &TickInput::default());

        let explosion = state.explosion.as_ref().unwrap();
        assert_eq!(explosion.center, center);
        assert_eq!(explosion.radius, 13.0);
        assert!(explosion.opacity > 0.9);
    }

    #[test]
    fn test_two_bombs_on_last_life_end_once() {
        let mut state = GameState::new(quiet(), 1);
        state.lives = 1;
        let center = state.basket.rect.center();
        let first = center - Vec2::new(30.0, 0.0);
        let second = center + Vec2::new(30.0, 0.0);
        state.bombs.push(about_to_land(&state, EntityKind::Bomb, first));
        state.bombs.push(about_to_land(&state, EntityKind::Bomb, second));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 0);
        assert!(state.game_over);
        assert_eq!(state.game_over_ticks, 180);
        assert!(state.bombs.is_empty());
        // Oldest bomb's blast is the one left standing
        assert_eq!(state.explosion.as_ref().unwrap().center, first);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::BombHit { at: second },
                GameEvent::GameOver,
                GameEvent::BombHit { at: first },
            ]
        );
    }

    #[test]
    fn test_bone_never_takes_coins_below_zero() {
        let mut state = GameState::new(quiet(), 1);
        let center = state.basket.rect.center();
        state.bones.push(about_to_land(&state, EntityKind::Bone, center));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.coins, 0);
        assert!(state.bones.is_empty());

        state.coins = 3;
        state.bones.push(about_to_land(&state, EntityKind::Bone, center));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.coins, 2);
    }

    #[test]
    fn test_heart_at_full_lives_is_consumed() {
        let mut state = GameState::new(quiet(), 1);
        let center = state.basket.rect.center();
        state.hearts.push(about_to_land(&state, EntityKind::Heart, center));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 5);
        assert!(state.hearts.is_empty());
        assert_eq!(state.mood.happy_ticks, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::HeartCaught { gained: false }]);
    }

    #[test]
    fn test_heart_restores_a_life() {
        let mut state = GameState::new(quiet(), 1);
        state.lives = 2;
        let center = state.basket.rect.center();
        state.hearts.push(about_to_land(&state, EntityKind::Heart, center));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 3);
        assert_eq!(state.mood.happy_ticks, 30);
    }

    #[test]
    fn test_offscreen_entities_despawn() {
        let mut state = GameState::new(quiet(), 1);
        let mut orange = FallingEntity::new(EntityKind::Orange, 0.0, &state.tuning);
        orange.rect.y = 599.0;
        state.oranges.push(orange);

        tick(&mut state, &TickInput::default());

        assert!(state.oranges.is_empty());
        assert_eq!(state.coins, 0);
    }

    #[test]
    fn test_catch_wins_over_falling_out() {
        let mut tuning = quiet();
        // Basket hangs past the floor so the catch zone straddles it
        tuning.basket_bottom_offset = 60.0;
        let mut state = GameState::new(tuning, 1);
        let mut orange = FallingEntity::new(EntityKind::Orange, 0.0, &state.tuning);
        orange.rect.x = state.basket.rect.center().x - 20.0;
        orange.rect.y = 600.0;
        state.oranges.push(orange);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.coins, 1);
        assert!(state.oranges.is_empty());
    }

    #[test]
    fn test_last_life_game_over_then_full_reset() {
        let mut state = GameState::new(quiet(), 1);
        state.lives = 1;
        state.coins = 9;
        state.session_ticks = 1000;
        let center = state.basket.rect.center();
        state.bombs.push(about_to_land(&state, EntityKind::Bomb, center));
        state.bombs.push(FallingEntity::new(EntityKind::Bomb, 700.0, &state.tuning));
        state.oranges.push(FallingEntity::new(EntityKind::Orange, 0.0, &state.tuning));

        tick(&mut state, &TickInput::default());

        assert!(state.game_over);
        assert_eq!(state.lives, 0);
        assert_eq!(state.game_over_ticks, 180);

        // Entities are frozen during the countdown
        let frozen = state.oranges[0].rect;
        for _ in 0..179 {
            tick(&mut state, &TickInput::default());
            assert!(state.game_over);
        }
        assert_eq!(state.oranges[0].rect, frozen);

        tick(&mut state, &TickInput::default());
        let fresh = GameState::new(quiet(), 1);
        assert!(!state.game_over);
        assert_eq!(state.coins, 0);
        assert_eq!(state.lives, 5);
        assert_eq!(state.entity_count(), 0);
        assert!(state.explosion.is_none());
        assert_eq!(state.screen, Screen::Active);
        assert_eq!(state.session_ticks, fresh.session_ticks);
        assert_eq!(state.basket, fresh.basket);
        assert_eq!(state.mood, fresh.mood);
    }

    #[test]
    fn test_timer_expiry_switches_to_feeding() {
        let mut state = GameState::new(quiet(), 1);
        state.coins = 15;
        state.session_ticks = 2;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::Active);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.screen, Screen::Feeding);
        assert_eq!(state.feeding.items.len(), 12);
        assert!(state.events.contains(&GameEvent::FeedingStarted { items: 12 }));
    }

    #[test]
    fn test_feeding_freezes_fallers() {
        let mut state = GameState::new(quiet(), 1);
        state.screen = Screen::Feeding;
        state.oranges.push(FallingEntity::new(EntityKind::Orange, 0.0, &state.tuning));
        let before = state.oranges[0].rect;
        let session = state.session_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.oranges[0].rect, before);
        assert_eq!(state.session_ticks, session);
    }

    #[test]
    fn test_feeding_drag_and_drop() {
        let mut state = GameState::new(quiet(), 1);
        state.coins = 2;
        state.session_ticks = 1;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::Feeding);

        let grab = state.feeding.items[0].rect.center();
        let mouth = state.feeding.target.mouth;
        tick(&mut state, &TickInput { pointer_down: Some(grab), ..Default::default() });
        assert_eq!(state.feeding.dragged, Some(0));

        // Miss
        tick(&mut state, &TickInput { pointer_up: Some(Vec2::new(50.0, 50.0)), ..Default::default() });
        assert_eq!(state.coins, 2);
        assert_eq!(state.feeding.items.len(), 2);

        // Hit
        tick(&mut state, &TickInput { pointer_down: Some(Vec2::new(50.0, 50.0)), ..Default::default() });
        tick(&mut state, &TickInput { pointer: Some(mouth), ..Default::default() });
        tick(&mut state, &TickInput { pointer_up: Some(mouth), ..Default::default() });
        assert_eq!(state.coins, 1);
        assert_eq!(state.feeding.items.len(), 1);
        assert_eq!(state.mood.happy_ticks, 60);
    }

    #[test]
    fn test_feeding_refills_past_the_cap() {
        let mut state = GameState::new(quiet(), 1);
        state.coins = 13;
        state.session_ticks = 1;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.feeding.items.len(), 12);

        let auto = TickInput { autopilot: true, ..Default::default() };
        for _ in 0..24 {
            tick(&mut state, &auto);
        }
        assert_eq!(state.coins, 1);
        assert_eq!(state.feeding.items.len(), 1);

        for _ in 0..2 {
            tick(&mut state, &auto);
        }
        assert_eq!(state.coins, 0);
        assert!(state.feeding.items.is_empty());
    }

    #[test]
    fn test_restart_leaves_feeding() {
        let mut state = GameState::new(quiet(), 1);
        state.coins = 3;
        state.screen = Screen::Feeding;
        tick(&mut state, &TickInput { restart: true, ..Default::default() });
        assert_eq!(state.screen, Screen::Active);
        assert_eq!(state.coins, 0);
        assert!(state.events.contains(&GameEvent::SessionReset));
    }

    #[test]
    fn test_basket_follows_input() {
        let mut state = GameState::new(quiet(), 1);
        let x = state.basket.rect.x;
        tick(&mut state, &TickInput { move_left: true, ..Default::default() });
        assert_eq!(state.basket.rect.x, x - 5.0);
        tick(&mut state, &TickInput { move_right: true, ..Default::default() });
        tick(&mut state, &TickInput { move_right: true, ..Default::default() });
        assert_eq!(state.basket.rect.x, x + 5.0);
    }

    #[test]
    fn test_autopilot_steers_toward_orange() {
        let mut state = GameState::new(quiet(), 1);
        let mut orange = FallingEntity::new(EntityKind::Orange, 50.0, &state.tuning);
        orange.rect.y = 100.0;
        state.oranges.push(orange);
        let x = state.basket.rect.x;
        tick(&mut state, &TickInput { autopilot: true, ..Default::default() });
        assert!(state.basket.rect.x < x);
    }

    #[test]
    fn test_autopilot_dodges_bombs() {
        let mut state = GameState::new(quiet(), 1);
        let basket = state.basket.rect;
        let mut bomb = FallingEntity::new(EntityKind::Bomb, 0.0, &state.tuning);
        // Slightly right of center, just above the basket
        bomb.rect.set_center(Vec2::new(basket.center().x + 10.0, basket.y - 60.0));
        state.bombs.push(bomb);
        tick(&mut state, &TickInput { autopilot: true, ..Default::default() });
        assert!(state.basket.rect.x < basket.x);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(Tuning::default(), 99999);
        let mut state2 = GameState::new(Tuning::default(), 99999);

        let inputs = [
            TickInput { move_left: true, ..Default::default() },
            TickInput::default(),
            TickInput { move_right: true, ..Default::default() },
            TickInput { autopilot: true, ..Default::default() },
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.coins, state2.coins);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.oranges, state2.oranges);
        assert_eq!(state1.bombs, state2.bombs);
        assert_eq!(state1.basket, state2.basket);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::tuning::Tuning;

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), 0u8..100).prop_map(
            |(move_left, move_right, autopilot, roll)| TickInput {
                move_left,
                move_right,
                autopilot,
                restart: roll == 0,
                ..Default::default()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_session_stays_in_bounds(
            seed in any::<u64>(),
            inputs in prop::collection::vec(input_strategy(), 1..400),
        ) {
            let mut state = GameState::new(Tuning::default(), seed);
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!(state.lives <= state.tuning.max_lives);
                prop_assert!(state.basket.rect.x >= 0.0);
                prop_assert!(state.basket.rect.right() <= state.tuning.playfield_width);
                prop_assert!(state.feeding.items.len() <= state.tuning.feeding_item_cap as usize);
            }
        }

        #[test]
        fn prop_feeding_deals_capped_coins(coins in 0u32..40) {
            let mut tuning = Tuning::default();
            tuning.orange.spawn_chance = 0.0;
            tuning.bomb.spawn_chance = 0.0;
            tuning.bone.spawn_chance = 0.0;
            tuning.heart.spawn_chance = 0.0;
            tuning.session_ticks = 5;
            let mut state = GameState::new(tuning, 7);
            state.coins = coins;

            for _ in 0..5 {
                tick(&mut state, &TickInput::default());
            }
            prop_assert_eq!(state.screen, Screen::Feeding);
            prop_assert_eq!(state.feeding.items.len(), coins.min(12) as usize);
        }

        #[test]
        fn prop_same_seed_same_session(seed in any::<u64>(), ticks in 1usize..600) {
            let mut a = GameState::new(Tuning::default(), seed);
            let mut b = GameState::new(Tuning::default(), seed);
            let input = TickInput { autopilot: true, ..Default::default() };
            for _ in 0..ticks {
                tick(&mut a, &input);
                tick(&mut b, &input);
            }
            prop_assert_eq!(a.coins, b.coins);
            prop_assert_eq!(a.lives, b.lives);
            prop_assert_eq!(&a.oranges, &b.oranges);
            prop_assert_eq!(&a.bombs, &b.bombs);
            prop_assert_eq!(a.drain_events(), b.drain_events());
        }
    }
}
