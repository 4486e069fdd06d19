use bevy_math::Vec3;

use crate::constants::{DEFAULT_WALL_HEIGHT, DEFAULT_WALL_WIDTH, PHYSICS_EPSILON};

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Obstruction Query
// ============================================================================

/// Line-of-sight query against level geometry: is there anything solid on the
/// straight segment between two points?
///
/// Implementations must be pure; the controller may call this several times
/// per tick.
pub trait Obstruction: Send + Sync {
    fn is_obstructed(&self, from: Vec3, to: Vec3) -> bool;
}

impl<F> Obstruction for F
where
    F: Fn(Vec3, Vec3) -> bool + Send + Sync,
{
    fn is_obstructed(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

// Open field: nothing ever blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Obstruction for OpenField {
    fn is_obstructed(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

// ============================================================================
// Walls
// ============================================================================

// Axis-aligned wall segment standing on the floor. The long axis runs from
// (x1, z1) to (x2, z2); `width` is the thickness across it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Wall {
    pub x1: f32,
    pub z1: f32,
    pub x2: f32,
    pub z2: f32,
    #[cfg_attr(feature = "json", serde(default = "default_wall_width"))]
    pub width: f32,
    #[cfg_attr(feature = "json", serde(default = "default_wall_height"))]
    pub height: f32,
}

#[cfg(feature = "json")]
const fn default_wall_width() -> f32 {
    DEFAULT_WALL_WIDTH
}

#[cfg(feature = "json")]
const fn default_wall_height() -> f32 {
    DEFAULT_WALL_HEIGHT
}

impl Wall {
    #[must_use]
    pub const fn new(x1: f32, z1: f32, x2: f32, z2: f32) -> Self {
        Self {
            x1,
            z1,
            x2,
            z2,
            width: DEFAULT_WALL_WIDTH,
            height: DEFAULT_WALL_HEIGHT,
        }
    }

    // Center and half extents of the wall footprint in the XZ plane.
    #[must_use]
    pub fn footprint(&self) -> (f32, f32, f32, f32) {
        let center_x = f32::midpoint(self.x1, self.x2);
        let center_z = f32::midpoint(self.z1, self.z2);

        let dx = (self.x2 - self.x1).abs();
        let dz = (self.z2 - self.z1).abs();
        let half_width = self.width / 2.0;

        let (half_x, half_z) = if dx > dz {
            (dx / 2.0, half_width)
        } else {
            (half_width, dz / 2.0)
        };

        (center_x, center_z, half_x, half_z)
    }

    // Does the segment from `from` to `to` pass through this wall?
    #[must_use]
    pub fn blocks_segment(&self, from: Vec3, to: Vec3) -> bool {
        let (center_x, center_z, half_x, half_z) = self.footprint();
        let half_y = self.height / 2.0;
        let dir = to - from;

        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        if let Some((min_x, max_x)) = slab_interval(from.x - center_x, dir.x, half_x, t_min, t_max) {
            t_min = min_x;
            t_max = max_x;
        } else {
            return false;
        }

        if let Some((min_z, max_z)) = slab_interval(from.z - center_z, dir.z, half_z, t_min, t_max) {
            t_min = min_z;
            t_max = max_z;
        } else {
            return false;
        }

        if let Some((min_y, max_y)) = slab_interval(from.y - half_y, dir.y, half_y, t_min, t_max) {
            t_min = min_y;
            t_max = max_y;
        } else {
            return false;
        }

        t_min <= t_max && t_max >= 0.0 && t_min <= 1.0
    }
}

// Compute the intersection interval of a ray with a slab (used in ray-AABB tests)
#[must_use]
pub fn slab_interval(local_coord: f32, ray_dir: f32, half_extent: f32, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
    if ray_dir.abs() > PHYSICS_EPSILON {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        if new_min <= new_max {
            Some((new_min, new_max))
        } else {
            None
        }
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}

// Static wall geometry of a level, queried segment by segment.
#[derive(Debug, Clone, Default)]
pub struct WallSet {
    pub walls: Vec<Wall>,
}

impl WallSet {
    #[must_use]
    pub const fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }
}

impl Obstruction for WallSet {
    fn is_obstructed(&self, from: Vec3, to: Vec3) -> bool {
        self.walls.iter().any(|wall| wall.blocks_segment(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wall along the Z axis at x = 2, spanning z in [-3, 3]
    fn fence() -> Wall {
        Wall::new(2.0, -3.0, 2.0, 3.0)
    }

    #[test]
    fn segment_crossing_wall_is_blocked() {
        let wall = fence();
        assert!(wall.blocks_segment(Vec3::new(0.0, 0.5, 0.0), Vec3::new(4.0, 0.5, 0.0)));
        assert!(wall.blocks_segment(Vec3::new(4.0, 0.5, 1.0), Vec3::new(0.0, 0.5, -1.0)));
    }

    #[test]
    fn segment_stopping_short_is_clear() {
        let wall = fence();
        assert!(!wall.blocks_segment(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.5, 0.5, 0.0)));
    }

    #[test]
    fn segment_passing_around_the_end_is_clear() {
        let wall = fence();
        assert!(!wall.blocks_segment(Vec3::new(0.0, 0.5, 5.0), Vec3::new(4.0, 0.5, 5.0)));
    }

    #[test]
    fn segment_above_the_wall_is_clear() {
        let wall = fence();
        assert!(!wall.blocks_segment(Vec3::new(0.0, 5.0, 0.0), Vec3::new(4.0, 5.0, 0.0)));
    }

    #[test]
    fn parallel_segment_beside_wall_is_clear() {
        let wall = fence();
        assert!(!wall.blocks_segment(Vec3::new(1.0, 0.5, -5.0), Vec3::new(1.0, 0.5, 5.0)));
    }

    #[test]
    fn wall_set_and_closures_implement_obstruction() {
        let walls = WallSet::new(vec![fence()]);
        let from = Vec3::new(0.0, 0.5, 0.0);
        let to = Vec3::new(4.0, 0.5, 0.0);
        assert!(walls.is_obstructed(from, to));
        assert!(!OpenField.is_obstructed(from, to));

        let never = |_: Vec3, _: Vec3| false;
        assert!(!never.is_obstructed(from, to));
    }
}
