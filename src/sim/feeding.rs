//! Feeding screen: drag collected oranges to the capybara's mouth

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::tuning::Tuning;

/// Table basket size on the feeding screen
pub const TABLE_BASKET_WIDTH: f32 = 150.0;
pub const TABLE_BASKET_HEIGHT: f32 = 90.0;

/// Capybara portrait size on the feeding screen
pub const TARGET_SIZE: f32 = 150.0;

/// A draggable orange token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingItem {
    pub rect: Rect,
}

/// The capybara waiting to be fed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingTarget {
    pub rect: Rect,
    pub mouth: Vec2,
    pub mouth_radius: f32,
}

impl FeedingTarget {
    pub fn new(tuning: &Tuning) -> Self {
        let x = tuning.playfield_width / 2.0 + 200.0;
        let y = tuning.playfield_height / 2.0 - 50.0;
        Self {
            rect: Rect::new(x, y, TARGET_SIZE, TARGET_SIZE),
            mouth: Vec2::new(x + 40.0, y + 50.0),
            mouth_radius: tuning.mouth_radius,
        }
    }

    /// Strictly inside the capture radius
    pub fn accepts(&self, point: Vec2) -> bool {
        point.distance(self.mouth) < self.mouth_radius
    }
}

/// Feeding screen state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding {
    pub items: Vec<FeedingItem>,
    /// Index into `items` of the token under the pointer
    pub dragged: Option<usize>,
    pub target: FeedingTarget,
    /// Where the basket sits on the table
    pub table_basket: Rect,
    item_size: f32,
    item_cap: u32,
}

impl Feeding {
    pub fn new(tuning: &Tuning) -> Self {
        let table_y = tuning.playfield_height / 2.0 + 50.0;
        Self {
            items: Vec::new(),
            dragged: None,
            target: FeedingTarget::new(tuning),
            table_basket: Rect::new(
                tuning.playfield_width / 2.0 - TABLE_BASKET_WIDTH / 2.0,
                table_y - TABLE_BASKET_HEIGHT,
                TABLE_BASKET_WIDTH,
                TABLE_BASKET_HEIGHT,
            ),
            item_size: tuning.feeding_item_size,
            item_cap: tuning.feeding_item_cap,
        }
    }

    /// Lay out `min(coins, cap)` items on an ellipse inside the table basket.
    /// Replaces whatever was there; returns how many were dealt.
    pub fn deal(&mut self, coins: u32) -> usize {
        self.items.clear();
        self.dragged = None;

        let n = coins.min(self.item_cap) as usize;
        let anchor = Vec2::new(self.table_basket.x + 75.0, self.table_basket.y + 60.0);
        for i in 0..n {
            let angle = i as f32 / n as f32 * TAU;
            let radius = 30.0 + (i % 3) as f32 * 15.0;
            let center = anchor + Vec2::new(angle.cos() * radius, angle.sin() * radius * 0.5);
            self.items.push(FeedingItem {
                rect: Rect::centered(center, self.item_size, self.item_size),
            });
        }
        n
    }

    /// Start dragging the top-most item under `point`
    pub fn press(&mut self, point: Vec2) -> bool {
        self.dragged = self.items.iter().rposition(|item| item.rect.contains(point));
        self.dragged.is_some()
    }

    /// Keep the dragged item centered on the pointer
    pub fn drag_to(&mut self, point: Vec2) {
        if let Some(item) = self.dragged.and_then(|i| self.items.get_mut(i)) {
            item.rect.set_center(point);
        }
    }

    /// Drop the dragged item at `point`. Returns true if the capybara ate it.
    pub fn release(&mut self, point: Vec2) -> bool {
        let Some(index) = self.dragged.take() else {
            return false;
        };
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        item.rect.set_center(point);

        if self.target.accepts(item.rect.center()) {
            self.items.remove(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feeding() -> Feeding {
        Feeding::new(&Tuning::default())
    }

    #[test]
    fn test_layout_positions() {
        let mut f = feeding();
        assert_eq!(f.table_basket, Rect::new(325.0, 260.0, 150.0, 90.0));
        assert_eq!(f.target.mouth, Vec2::new(640.0, 300.0));

        assert_eq!(f.deal(3), 3);
        // First item at angle 0, ring radius 30
        let first = f.items[0].rect;
        assert!((first.x - (400.0 + 30.0 - 20.0)).abs() < 1e-3);
        assert!((first.y - (320.0 - 20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_deal_is_capped() {
        let mut f = feeding();
        assert_eq!(f.deal(40), 12);
        assert_eq!(f.items.len(), 12);
        assert_eq!(f.deal(0), 0);
        assert!(f.items.is_empty());
    }

    #[test]
    fn test_press_picks_topmost() {
        let mut f = feeding();
        f.items.push(FeedingItem { rect: Rect::new(0.0, 0.0, 40.0, 40.0) });
        f.items.push(FeedingItem { rect: Rect::new(10.0, 10.0, 40.0, 40.0) });
        assert!(f.press(Vec2::new(20.0, 20.0)));
        assert_eq!(f.dragged, Some(1));
        assert!(!f.press(Vec2::new(500.0, 500.0)));
        assert_eq!(f.dragged, None);
    }

    #[test]
    fn test_drop_on_mouth_eats_item() {
        let mut f = feeding();
        f.deal(2);
        let grab = f.items[0].rect.center();
        assert!(f.press(grab));
        f.drag_to(Vec2::new(300.0, 300.0));
        assert_eq!(f.items[0].rect.center(), Vec2::new(300.0, 300.0));

        let mouth = f.target.mouth;
        assert!(f.release(mouth + Vec2::new(10.0, 10.0)));
        assert_eq!(f.items.len(), 1);
        assert_eq!(f.dragged, None);
    }

    #[test]
    fn test_drop_elsewhere_leaves_item_where_dropped() {
        let mut f = feeding();
        f.deal(1);
        let grab = f.items[0].rect.center();
        f.press(grab);
        let mouth = f.target.mouth;
        // Exactly on the radius is not a capture
        let drop = mouth + Vec2::new(f.target.mouth_radius, 0.0);
        assert!(!f.release(drop));
        assert_eq!(f.items.len(), 1);
        assert_eq!(f.items[0].rect.center(), drop);
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut f = feeding();
        f.deal(1);
        let mouth = f.target.mouth;
        assert!(!f.release(mouth));
        assert_eq!(f.items.len(), 1);
    }
}
