//! Scene assembly: turn a `GameState` into one triangle list per frame
//!
//! Pure and platform independent, so it can be unit tested natively.

use std::f32::consts::TAU;

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::sim::{EntityKind, Explosion, FallingEntity, GameState, Rect, Screen};

/// Height of the ground strip on the catching screen
const GROUND_HEIGHT: f32 = 100.0;

/// Bomb sprite alternates every this many ticks
const BOMB_FLICKER_TICKS: u32 = 10;

/// (x, y, scale, lobes) - kept clear of the portrait in the top-left corner
const CLOUDS: [(f32, f32, f32, &[(f32, f32, f32)]); 5] = [
    (400.0, 70.0, 0.8, &MEDIUM_CLOUD),
    (600.0, 50.0, 1.0, &LARGE_CLOUD),
    (750.0, 90.0, 0.7, &SMALL_CLOUD),
    (500.0, 130.0, 0.9, &MEDIUM_CLOUD),
    (300.0, 45.0, 0.6, &SMALL_CLOUD),
];

const LARGE_CLOUD: [(f32, f32, f32); 7] = [
    (0.0, 0.0, 30.0),
    (35.0, 0.0, 25.0),
    (60.0, 0.0, 28.0),
    (85.0, 0.0, 22.0),
    (20.0, -20.0, 25.0),
    (45.0, -25.0, 30.0),
    (70.0, -20.0, 24.0),
];

const MEDIUM_CLOUD: [(f32, f32, f32); 5] = [
    (0.0, 0.0, 25.0),
    (30.0, 0.0, 20.0),
    (50.0, 0.0, 23.0),
    (15.0, -18.0, 20.0),
    (35.0, -20.0, 25.0),
];

const SMALL_CLOUD: [(f32, f32, f32); 4] = [
    (0.0, 0.0, 20.0),
    (25.0, 0.0, 18.0),
    (12.0, -15.0, 18.0),
    (30.0, -12.0, 15.0),
];

/// Build the full frame for the current screen
pub fn build(state: &GameState) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    match state.screen {
        Screen::Active => build_catching(state, &mut out),
        Screen::Feeding => build_feeding(state, &mut out),
    }
    out
}

fn build_catching(state: &GameState, out: &mut Vec<Vertex>) {
    let (w, h) = (state.tuning.playfield_width, state.tuning.playfield_height);

    out.extend(shapes::gradient_rect(
        &Rect::new(0.0, 0.0, w, h - GROUND_HEIGHT),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));
    for (x, y, scale, lobes) in CLOUDS {
        for &(dx, dy, r) in lobes {
            out.extend(shapes::circle(
                Vec2::new(x + dx * scale, y + dy * scale),
                r * scale,
                colors::CLOUD,
                16,
            ));
        }
    }
    out.extend(shapes::gradient_rect(
        &Rect::new(0.0, h - GROUND_HEIGHT, w, GROUND_HEIGHT),
        colors::GROUND_TOP,
        colors::GROUND_BOTTOM,
    ));

    basket(&state.basket.rect, out);
    for entity in state
        .oranges
        .iter()
        .chain(&state.bones)
        .chain(&state.bombs)
        .chain(&state.hearts)
    {
        faller(entity, out);
    }
    if let Some(explosion) = &state.explosion {
        blast(explosion, out);
    }

    if state.game_over {
        out.extend(shapes::rect(&Rect::new(0.0, 0.0, w, h), colors::GAME_OVER_SHADE));
    }
}

fn basket(r: &Rect, out: &mut Vec<Vertex>) {
    let rim = r.height * 0.15;
    out.extend(shapes::rect(
        &Rect::new(r.x + r.width * 0.05, r.y + rim, r.width * 0.9, r.height - rim),
        colors::BASKET,
    ));
    out.extend(shapes::rect(&Rect::new(r.x, r.y, r.width, rim), colors::BASKET_RIM));
}

fn faller(entity: &FallingEntity, out: &mut Vec<Vertex>) {
    let r = &entity.rect;
    let center = r.center();
    match entity.kind {
        EntityKind::Orange => {
            orange(r, out);
        }
        EntityKind::Bone => {
            let shaft = Rect::centered(center, r.width * 0.7, r.height * 0.25);
            out.extend(shapes::rect(&shaft, colors::BONE));
            let knob = r.height * 0.16;
            for x in [shaft.x, shaft.right()] {
                out.extend(shapes::circle(Vec2::new(x, center.y - knob), knob, colors::BONE, 10));
                out.extend(shapes::circle(Vec2::new(x, center.y + knob), knob, colors::BONE, 10));
            }
        }
        EntityKind::Bomb => {
            let body = if (entity.anim_frame / BOMB_FLICKER_TICKS) % 2 == 0 {
                colors::BOMB
            } else {
                colors::BOMB_FLASH
            };
            let radius = r.width * 0.4;
            let body_center = center + Vec2::new(0.0, r.height * 0.1);
            out.extend(shapes::circle(body_center, radius, body, 20));
            out.extend(shapes::circle(Vec2::new(center.x + radius * 0.5, r.y + 4.0), 4.0, colors::FUSE, 8));
        }
        EntityKind::Heart => {
            out.extend(shapes::heart(r, colors::HEART));
        }
    }
}

fn orange(r: &Rect, out: &mut Vec<Vertex>) {
    out.extend(shapes::circle(r.center(), r.width / 2.0, colors::ORANGE, 20));
    out.extend(shapes::circle(
        Vec2::new(r.center().x + r.width * 0.15, r.y + r.height * 0.08),
        r.width * 0.12,
        colors::LEAF,
        8,
    ));
}

fn blast(explosion: &Explosion, out: &mut Vec<Vertex>) {
    let a = explosion.opacity.clamp(0.0, 1.0);
    out.extend(shapes::radial_gradient(
        explosion.center,
        explosion.radius,
        with_alpha(colors::EXPLOSION_MID, a),
        with_alpha(colors::EXPLOSION_EDGE, a),
        32,
    ));
    out.extend(shapes::radial_gradient(
        explosion.center,
        explosion.radius * 0.3,
        with_alpha(colors::EXPLOSION_CORE, a),
        with_alpha(colors::EXPLOSION_MID, a),
        16,
    ));
    for i in 0..8 {
        let angle = i as f32 * TAU / 8.0;
        let spark = explosion.center + Vec2::new(angle.cos(), angle.sin()) * explosion.radius * 0.8;
        out.extend(shapes::circle(spark, 3.0, with_alpha(colors::SPARK, a), 8));
    }
}

fn build_feeding(state: &GameState, out: &mut Vec<Vertex>) {
    let (w, h) = (state.tuning.playfield_width, state.tuning.playfield_height);
    let feeding = &state.feeding;

    out.extend(shapes::rect(&Rect::new(0.0, 0.0, w, h), colors::ROOM));

    // Table
    out.extend(shapes::rect(&Rect::new(w / 2.0 - 200.0, h / 2.0 + 50.0, 400.0, 20.0), colors::TABLE_TOP));
    for x in [w / 2.0 - 180.0, w / 2.0 + 165.0] {
        out.extend(shapes::rect(&Rect::new(x, h / 2.0 + 70.0, 15.0, 100.0), colors::TABLE_LEG));
    }
    basket(&feeding.table_basket, out);

    for (i, item) in feeding.items.iter().enumerate() {
        if feeding.dragged == Some(i) {
            let r = item.rect.width / 2.0;
            out.extend(shapes::ring(item.rect.center(), r, r + 5.0, colors::HIGHLIGHT, 20));
        }
        orange(&item.rect, out);
    }

    // Capybara
    let target = &feeding.target;
    let body = target.rect;
    out.extend(shapes::circle(body.center() + Vec2::new(10.0, 20.0), body.width * 0.42, colors::CAPYBARA, 32));
    out.extend(shapes::circle(target.mouth + Vec2::new(5.0, -15.0), body.width * 0.25, colors::CAPYBARA, 24));
    out.extend(shapes::circle(target.mouth + Vec2::new(-5.0, 2.0), 8.0, colors::CAPYBARA_DARK, 12));
    out.extend(shapes::circle(target.mouth + Vec2::new(15.0, -30.0), 4.0, colors::CAPYBARA_DARK, 8));

    if feeding.dragged.is_some() {
        out.extend(shapes::ring(target.mouth, target.mouth_radius - 2.0, target.mouth_radius, colors::MOUTH_HINT, 32));
    }
}
