//! Collision primitives for axis-aligned boxes and circles
//!
//! Every gameplay collision in the simulation reduces to one of these three
//! checks. Rectangles are passed as (min, max) corner pairs.

use glam::Vec2;

/// Axis-aligned rectangle overlap (strict, touching edges do not count)
#[inline]
pub fn aabb_overlap(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> bool {
    a.0.x < b.1.x && a.1.x > b.0.x && a.0.y < b.1.y && a.1.y > b.0.y
}

/// Point containment in a rectangle
#[inline]
pub fn point_in_rect(p: Vec2, rect: (Vec2, Vec2)) -> bool {
    p.x > rect.0.x && p.x < rect.1.x && p.y > rect.0.y && p.y < rect.1.y
}

/// Circle vs rectangle overlap via the closest point on the box
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: (Vec2, Vec2)) -> bool {
    let closest = center.clamp(rect.0, rect.1);
    (center - closest).length_squared() < radius * radius
}
