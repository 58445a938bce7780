//! Collision channels for brush filtering.

use serde::{Deserialize, Serialize};

/// Which queries a brush responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Nothing.
    pub const EMPTY: Self = Self(0);

    /// World geometry: floors, walls, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Invisible wall that blocks characters only.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Blocks the camera but never the character.
    pub const CAMERA_CLIP: Self = Self(1 << 2);

    /// Overlap-only volume.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Everything a character capsule or probe collides with.
    pub const MASK_CHARACTER: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
