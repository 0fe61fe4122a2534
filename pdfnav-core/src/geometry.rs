//! Basic geometric types for PDF

use crate::objects::Object;
use std::fmt;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle defined by two points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rectangle {
    /// Lower-left corner
    pub lower_left: Point,
    /// Upper-right corner
    pub upper_right: Point,
}

impl Rectangle {
    /// Create a new rectangle from two points
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Reads a `[x1 y1 x2 y2]` array, as found in `/Rect` entries.
    pub fn from_array(values: &[Object]) -> Option<Self> {
        match values {
            [x1, y1, x2, y2] => Some(Self::new(
                Point::new(x1.as_real()?, y1.as_real()?),
                Point::new(x2.as_real()?, y2.as_real()?),
            )),
            _ => None,
        }
    }

    /// Get the width
    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    /// Get the height
    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }
}

/// Coordinates in array order: `x1 y1 x2 y2`
impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.lower_left.x, self.lower_left.y, self.upper_right.x, self.upper_right.y
        )
    }
}
