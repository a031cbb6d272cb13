//! Collision detection between falling entities and the basket
//!
//! Two policies on purpose: good things must land in the middle of the
//! basket, bombs only need to graze it.

use super::geom::Rect;
use super::state::EntityKind;

/// How a falling entity is tested against the basket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Entity center must lie inside the basket's catch zone
    CenterZone,
    /// Any overlap with the full basket rectangle
    FullOverlap,
}

impl CollisionPolicy {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Bomb => CollisionPolicy::FullOverlap,
            EntityKind::Orange | EntityKind::Bone | EntityKind::Heart => CollisionPolicy::CenterZone,
        }
    }
}

/// The reduced region of the basket that counts as a catch
///
/// `zone_w` / `zone_h` are fractions of the basket size (0.6 / 0.4 by default).
#[inline]
pub fn catch_zone(basket: &Rect, zone_w: f32, zone_h: f32) -> Rect {
    basket.scaled_about_center(zone_w, zone_h)
}

/// Center-zone policy: entity center inside the catch zone (edges inclusive)
pub fn center_zone_hit(entity: &Rect, basket: &Rect, zone_w: f32, zone_h: f32) -> bool {
    catch_zone(basket, zone_w, zone_h).contains(entity.center())
}

/// Full-overlap policy: strict AABB intersection with the whole basket
#[inline]
pub fn overlap_hit(entity: &Rect, basket: &Rect) -> bool {
    entity.intersects(basket)
}

/// Dispatch on policy
pub fn hits_basket(policy: CollisionPolicy, entity: &Rect, basket: &Rect, zone_w: f32, zone_h: f32) -> bool {
    match policy {
        CollisionPolicy::CenterZone => center_zone_hit(entity, basket, zone_w, zone_h),
        CollisionPolicy::FullOverlap => overlap_hit(entity, basket),
    }
}
