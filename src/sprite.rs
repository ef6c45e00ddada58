//! Sprite entities and collision queries.
//!
//! A [`Sprite`] is a named textured quad with a world-space centre and a
//! uniform scale.  Collision is axis-aligned box overlap of the scaled
//! rectangles — generous for round coins, but exactly how the game plays.

use glam::Vec2;

#[derive(Clone, Debug)]
pub struct Sprite {
    /// Name of the texture in the sprite atlas (file stem of the PNG).
    pub name: String,
    /// World-space centre in pixels, y-down.
    pub center: Vec2,
    /// Uniform scale applied to the base pixel size.
    pub scale: f32,
    /// Unscaled pixel dimensions of the texture.
    pub size: Vec2,
}

impl Sprite {
    pub fn new(name: &str, size: Vec2) -> Self {
        Self {
            name: name.to_string(),
            center: Vec2::ZERO,
            scale: 1.0,
            size,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.center = Vec2::new(x, y);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Half of the scaled width/height — the extent from centre to edge.
    pub fn half_extents(&self) -> Vec2 {
        self.size * self.scale * 0.5
    }

    /// Scaled axis-aligned bounds as (min, max) corners.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let he = self.half_extents();
        (self.center - he, self.center + he)
    }

    /// Axis-aligned overlap test.  Touching edges do not count as contact;
    /// a zero-sized sprite can never collide.
    pub fn collides_with(&self, other: &Sprite) -> bool {
        let (min_a, max_a) = self.bounds();
        let (min_b, max_b) = other.bounds();
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }
}

/// Indices of every sprite in `list` overlapping `sprite`, in list order.
/// Returned indices let the caller remove hits without re-testing.
pub fn collisions_with(sprite: &Sprite, list: &[Sprite]) -> Vec<usize> {
    list.iter()
        .enumerate()
        .filter(|(_, s)| sprite.collides_with(s))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: f32, y: f32, size: f32) -> Sprite {
        Sprite::new("test", Vec2::splat(size)).at(x, y)
    }

    #[test]
    fn overlapping_sprites_collide() {
        assert!(sq(0.0, 0.0, 10.0).collides_with(&sq(5.0, 5.0, 10.0)));
    }

    #[test]
    fn distant_sprites_do_not_collide() {
        assert!(!sq(0.0, 0.0, 10.0).collides_with(&sq(100.0, 0.0, 10.0)));
    }

    #[test]
    fn edge_touching_is_not_contact() {
        // Centres 10 apart, each 10 wide: edges meet exactly at x = 5.
        assert!(!sq(0.0, 0.0, 10.0).collides_with(&sq(10.0, 0.0, 10.0)));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_contact() {
        assert!(!sq(0.0, 0.0, 10.0).collides_with(&sq(2.0, 50.0, 10.0)));
    }

    #[test]
    fn scale_shrinks_the_hitbox() {
        let a = sq(0.0, 0.0, 10.0);
        let b = sq(7.0, 0.0, 10.0);
        assert!(a.collides_with(&b));
        let b_small = b.with_scale(0.2);
        assert!(!a.collides_with(&b_small));
    }

    #[test]
    fn half_extents_respect_scale() {
        let s = Sprite::new("coin", Vec2::new(24.0, 24.0)).with_scale(0.5);
        assert_eq!(s.half_extents(), Vec2::new(6.0, 6.0));
    }

    #[test]
    fn collisions_with_reports_indices_in_order() {
        let player = sq(0.0, 0.0, 20.0);
        let coins = vec![
            sq(5.0, 0.0, 10.0),   // hit
            sq(200.0, 0.0, 10.0), // miss
            sq(0.0, 8.0, 10.0),   // hit
        ];
        assert_eq!(collisions_with(&player, &coins), vec![0, 2]);
    }

    #[test]
    fn collisions_with_empty_list() {
        assert!(collisions_with(&sq(0.0, 0.0, 10.0), &[]).is_empty());
    }

    #[test]
    fn zero_sized_sprite_never_collides() {
        let point = sq(0.0, 0.0, 0.0);
        assert!(!point.collides_with(&sq(0.0, 0.0, 10.0)));
    }
}
