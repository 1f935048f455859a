//! Collision detection and response for solid obstacles
//!
//! Resolution uses the shallowest penetration axis as a cheap stand-in for
//! swept AABB: whichever axis overlaps least is assumed to be the side the
//! player came in from.

use super::entity::Bounds;
use super::player::Player;

/// Penetration depths of the player box into an obstacle box, per side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Player's right edge past the obstacle's left face
    pub left: f32,
    /// Obstacle's right face past the player's left edge
    pub right: f32,
    /// Player's top past the obstacle's underside
    pub top: f32,
    /// Obstacle's top past the player's bottom
    pub bottom: f32,
}

impl Overlap {
    pub fn between(player: &Bounds, obstacle: &Bounds) -> Self {
        Self {
            left: player.right() - obstacle.left(),
            right: obstacle.right() - player.left(),
            top: player.top() - obstacle.bottom(),
            bottom: obstacle.top() - player.bottom(),
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.left.min(self.right)
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.top.min(self.bottom)
    }
}

/// Outcome of resolving one player-vs-solid overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidContact {
    /// Fell onto the top face; player snapped on top and grounded
    Landed,
    /// Rose into the underside; player snapped below, vertical speed zeroed
    HeadBump,
    /// Ran into the left face deeper than the tolerance
    WallHit,
    /// Touched the left face within tolerance (corner graze during landing)
    Grazed,
    /// Trailing edge contact; player pushed out to the right face
    PushedOut,
    /// Vertical overlap with velocity pointing away; nothing to do
    Ignored,
}

impl SolidContact {
    /// Whether the player ended up standing on the obstacle
    pub fn is_standing(&self) -> bool {
        matches!(self, SolidContact::Landed)
    }
}

/// Resolve a solid obstacle the player overlaps.
///
/// `bounds` is the player's box as it was after integration; every solid
/// in a frame is measured against that same box. Adjusts the player's
/// position and velocity in place. A `WallHit` is reported but not acted
/// on; the caller owns the death transition.
pub fn resolve_solid(
    player: &mut Player,
    bounds: &Bounds,
    obstacle: &Bounds,
    wall_tolerance: f32,
) -> SolidContact {
    let overlap = Overlap::between(bounds, obstacle);
    let vy = player.vy();

    if overlap.min_y() < overlap.min_x() {
        // Vertical collision
        if overlap.bottom < overlap.top && vy < 0.0 {
            player.set_y(obstacle.top());
            player.set_on_ground(true);
            SolidContact::Landed
        } else if overlap.top < overlap.bottom && vy > 0.0 {
            player.set_y(obstacle.bottom() - bounds.height);
            player.set_vy(0.0);
            SolidContact::HeadBump
        } else {
            SolidContact::Ignored
        }
    } else if overlap.left < overlap.right {
        // Leading edge into the obstacle's left face
        if overlap.min_x() > wall_tolerance {
            SolidContact::WallHit
        } else {
            SolidContact::Grazed
        }
    } else {
        player.set_x(obstacle.right());
        SolidContact::PushedOut
    }
}
