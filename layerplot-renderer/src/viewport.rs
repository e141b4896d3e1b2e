use layerplot_core::{BBox, Point};
use serde::{Deserialize, Serialize};

/// Fraction of the data extent added on each side when fitting a view.
pub const DATA_MARGIN: f64 = 0.05;

/// Maps the shown data range onto a pixel canvas.
///
/// Screen y grows downwards; data y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Data range mapped onto the plot area.
    pub view: BBox,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Inset of the plot area from each canvas edge, in pixels.
    pub inset: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            view: BBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            canvas_width,
            canvas_height,
            inset: 0.0,
        }
    }

    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset.max(0.0);
        self
    }

    pub fn with_view(mut self, view: BBox) -> Self {
        self.view = view;
        self
    }

    /// Plot area as `(left, top, width, height)` in pixels.
    pub fn plot_area(&self) -> (f64, f64, f64, f64) {
        let w = (self.canvas_width - 2.0 * self.inset).max(1.0);
        let h = (self.canvas_height - 2.0 * self.inset).max(1.0);
        (self.inset, self.inset, w, h)
    }

    /// Pixels per data unit along x.
    pub fn scale_x(&self) -> f64 {
        let (_, _, w, _) = self.plot_area();
        w / self.view.width()
    }

    /// Pixels per data unit along y.
    pub fn scale_y(&self) -> f64 {
        let (_, _, _, h) = self.plot_area();
        h / self.view.height()
    }

    pub fn data_to_screen_x(&self, x: f64) -> f64 {
        let (left, _, _, _) = self.plot_area();
        left + (x - self.view.min.x) * self.scale_x()
    }

    pub fn data_to_screen_y(&self, y: f64) -> f64 {
        let (_, top, _, h) = self.plot_area();
        top + h - (y - self.view.min.y) * self.scale_y()
    }

    pub fn data_to_screen(&self, p: &Point) -> Point {
        Point::new(self.data_to_screen_x(p.x), self.data_to_screen_y(p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_plot_area() {
        let mut vp = Viewport::new(640.0, 480.0).with_inset(40.0);
        vp.view = BBox::new(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        let ll = vp.data_to_screen(&Point::new(0.0, 0.0));
        let ur = vp.data_to_screen(&Point::new(10.0, 5.0));
        assert!((ll.x - 40.0).abs() < 1e-10);
        assert!((ll.y - 440.0).abs() < 1e-10);
        assert!((ur.x - 600.0).abs() < 1e-10);
        assert!((ur.y - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_y_axis_points_up() {
        let vp = Viewport::new(100.0, 100.0)
            .with_view(BBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        assert!(vp.data_to_screen_y(0.9) < vp.data_to_screen_y(0.1));
        assert!(vp.data_to_screen_x(0.9) > vp.data_to_screen_x(0.1));
    }
}
