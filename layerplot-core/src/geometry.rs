use serde::{Deserialize, Serialize};

/// A 2D point in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned bounding box in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Bounding box of the finite points; NaN and infinite samples are skipped.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut finite = points.iter().filter(|p| p.is_finite());
        let first = finite.next()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for p in finite {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow each side by `fraction` of the extent. Degenerate extents grow by
    /// `fraction` of one unit so a single point still gets a visible range.
    pub fn expanded(&self, fraction: f64) -> Self {
        let pad_x = if self.width() > 0.0 { self.width() * fraction } else { fraction.max(0.5) };
        let pad_y = if self.height() > 0.0 { self.height() * fraction } else { fraction.max(0.5) };
        Self {
            min: Point::new(self.min.x - pad_x, self.min.y - pad_y),
            max: Point::new(self.max.x + pad_x, self.max.y + pad_y),
        }
    }
}
