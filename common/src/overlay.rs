use crate::Error;
use crate::result::{BoundingBox, Point, Shape};
use std::fmt::Display;
use std::str::FromStr;


const MARKER_RADIUS: f64 = 6.0;
const STROKE: &str = "red";
const STROKE_WIDTH: f64 = 3.0;

/// Rendered size of the image on screen, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Result<Self, Error> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(height) {
            return Err(Error::InvalidDisplaySize(format!("{width}x{height}")));
        }
        Ok(Self { width, height })
    }
}

impl Display for DisplaySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for DisplaySize {
    type Err = Error;

    /// Parses `WIDTHxHEIGHT`, e.g. `400x300`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidDisplaySize(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: f64 = w.trim().parse().map_err(|_| invalid())?;
        let height: f64 = h.trim().parse().map_err(|_| invalid())?;
        DisplaySize::new(width, height).map_err(|_| invalid())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Point {
    pub fn to_pixels(&self, size: DisplaySize) -> PixelPoint {
        PixelPoint {
            x: self.x * size.width,
            y: self.y * size.height,
        }
    }
}

impl BoundingBox {
    pub fn to_pixels(&self, size: DisplaySize) -> PixelRect {
        PixelRect {
            x: self.x_min * size.width,
            y: self.y_min * size.height,
            width: (self.x_max - self.x_min) * size.width,
            height: (self.y_max - self.y_min) * size.height,
        }
    }
}

/// A shape scaled for one particular display size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mark {
    Circle(PixelPoint),
    Rect(PixelRect),
}

impl Shape {
    pub fn to_mark(&self, size: DisplaySize) -> Mark {
        match self {
            Shape::Point(p) => Mark::Circle(p.to_pixels(size)),
            Shape::Box(b) => Mark::Rect(b.to_pixels(size)),
        }
    }
}

/// Normalized shapes waiting to be drawn.
///
/// Only normalized coordinates are stored. Every call to [`Overlay::render`]
/// scales them against the size it is given, so a resize never leaves stale
/// pixel positions behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    shapes: Vec<Shape>,
}

impl Overlay {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn render(&self, size: DisplaySize) -> Vec<Mark> {
        self.shapes.iter().map(|s| s.to_mark(size)).collect()
    }

    /// Draws the overlay as a standalone SVG document of the display size.
    pub fn to_svg(&self, size: DisplaySize) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height,
        );
        svg.push('\n');
        for mark in self.render(size) {
            let line = match mark {
                Mark::Circle(p) => format!(
                    r#"  <circle cx="{}" cy="{}" r="{MARKER_RADIUS}" fill="none" stroke="{STROKE}" stroke-width="{STROKE_WIDTH}"/>"#,
                    p.x, p.y,
                ),
                Mark::Rect(r) => format!(
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{STROKE}" stroke-width="{STROKE_WIDTH}"/>"#,
                    r.x, r.y, r.width, r.height,
                ),
            };
            svg.push_str(&line);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}
