//! Pixel rectangles
//!
//! A `Region` is a zero-based pixel rectangle whose origin may be negative
//! (requests are allowed to hang off the top-left of an image). Right and
//! bottom edges are exclusive; `lr_x`/`lr_y` give the inclusive corner.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// X-coordinate of the top-left corner
    pub x: i32,
    /// Y-coordinate of the top-left corner
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// Builds a region from inclusive corners
    pub fn from_corners(ul_x: i32, ul_y: i32, lr_x: i32, lr_y: i32) -> Self {
        if lr_x < ul_x || lr_y < ul_y {
            return Region::new(ul_x, ul_y, 0, 0);
        }
        Region::new(ul_x, ul_y, (lr_x - ul_x + 1) as u32, (lr_y - ul_y + 1) as u32)
    }

    /// One past the rightmost column
    pub fn end_x(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// One past the bottom row
    pub fn end_y(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Rightmost column (inclusive)
    pub fn lr_x(&self) -> i32 {
        (self.end_x() - 1) as i32
    }

    /// Bottom row (inclusive)
    pub fn lr_y(&self) -> i32 {
        (self.end_y() - 1) as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (x as i64) >= self.x as i64 && (x as i64) < self.end_x()
            && (y as i64) >= self.y as i64 && (y as i64) < self.end_y()
    }

    /// Whether the two regions share at least one pixel
    pub fn intersects(&self, other: &Region) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && (self.x as i64) < other.end_x()
            && (other.x as i64) < self.end_x()
            && (self.y as i64) < other.end_y()
            && (other.y as i64) < self.end_y()
    }

    /// Intersection of the two regions; empty when they are disjoint
    pub fn clip_to(&self, other: &Region) -> Region {
        if !self.intersects(other) {
            return Region::new(self.x, self.y, 0, 0);
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let end_x = self.end_x().min(other.end_x());
        let end_y = self.end_y().min(other.end_y());

        Region::new(x, y, (end_x - x as i64) as u32, (end_y - y as i64) as u32)
    }

    /// Whether every pixel of `self` lies inside `other`
    pub fn completely_within(&self, other: &Region) -> bool {
        !self.is_empty()
            && self.x >= other.x
            && self.y >= other.y
            && self.end_x() <= other.end_x()
            && self.end_y() <= other.end_y()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Snaps a coordinate outward to the start of its tile
///
/// Negative coordinates snap to the tile that contains them, so `-1`
/// with a tile size of 256 becomes `-256`.
pub fn adjust_to_start_of_tile(value: i32, tile_size: u32) -> i32 {
    if tile_size == 0 {
        return value;
    }

    let t = tile_size as i64;
    let v = value as i64;
    let snapped = if v >= 0 {
        (v / t) * t
    } else if -v < t {
        -t
    } else {
        // Outward for negative values means rounding toward -infinity.
        v.div_euclid(t) * t
    };

    snapped as i32
}
