//! Crop rectangle kept in two synchronized forms.
//!
//! - pixel space: absolute offsets inside the reference image, 1 decimal
//! - coord space: offsets normalized to `[0, 1]`, 4 decimals
//!
//! Whichever form the user edited last is authoritative; the other one is
//! projected from it through the image size.

use std::fmt;

use thiserror::Error;

use super::data::ImageSize;

/// Errors raised while converting between the two clip forms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    /// The reference image has a zero side, so no coordinate can be derived
    #[error("cannot convert pixels to coordinates for a {width}x{height} image")]
    DegenerateGeometry { width: u32, height: u32 },
}

/// One side of the clip rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    /// Top and bottom scale with the height, left and right with the width
    fn is_vertical(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    /// Position inside [`Edge::ALL`]
    pub fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Left => 1,
            Edge::Bottom => 2,
            Edge::Right => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Edge::Top => "Top",
            Edge::Left => "Left",
            Edge::Bottom => "Bottom",
            Edge::Right => "Right",
        }
    }
}

/// Which form of the rectangle was edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSource {
    Pixel,
    Coord,
}

/// Four edge offsets, shared by both forms
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Edges {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self { top, left, bottom, right }
    }

    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Left => self.left,
            Edge::Bottom => self.bottom,
            Edge::Right => self.right,
        }
    }

    pub fn set(&mut self, edge: Edge, value: f64) {
        match edge {
            Edge::Top => self.top = value,
            Edge::Left => self.left = value,
            Edge::Bottom => self.bottom = value,
            Edge::Right => self.right = value,
        }
    }

    fn map(&self, f: impl Fn(Edge, f64) -> f64) -> Self {
        let mut out = *self;
        for edge in Edge::ALL {
            out.set(edge, f(edge, self.get(edge)));
        }
        out
    }

    /// `top <= bottom` and `left <= right`
    pub fn is_ordered(&self) -> bool {
        self.top <= self.bottom && self.left <= self.right
    }

    /// Coordinate rectangle spanned by two normalized corner points,
    /// in any order. Values are clamped to `[0, 1]` and rounded to 4 decimals.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        let norm = |v: f64| round_to(v.clamp(0.0, 1.0), 10_000.0);
        let (x0, x1) = (norm(a.0.min(b.0)), norm(a.0.max(b.0)));
        let (y0, y1) = (norm(a.1.min(b.1)), norm(a.1.max(b.1)));
        Self::new(y0, x0, y1, x1)
    }
}

/// Pixel rectangle for a coordinate rectangle, rounded to 1 decimal
pub fn from_coord(coord: &Edges, size: ImageSize) -> Edges {
    coord.map(|edge, value| {
        let dim = if edge.is_vertical() { size.height } else { size.width };
        round_to(value * f64::from(dim), 10.0)
    })
}

/// Coordinate rectangle for a pixel rectangle, rounded to 4 decimals
pub fn from_pixel(pixel: &Edges, size: ImageSize) -> Result<Edges, ClipError> {
    if size.is_degenerate() {
        return Err(ClipError::DegenerateGeometry {
            width: size.width,
            height: size.height,
        });
    }

    Ok(pixel.map(|edge, value| {
        let dim = if edge.is_vertical() { size.height } else { size.width };
        round_to(value / f64::from(dim), 10_000.0)
    }))
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Clip rectangle of one preview session
#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub size: ImageSize,
    pub pixel: Edges,
    pub coord: Edges,
    /// The form that was edited last
    pub source: ClipSource,
}

impl ClipState {
    /// Full-image clip for a freshly loaded reference image
    pub fn new(size: ImageSize) -> Self {
        let coord = Edges::new(0.0, 0.0, 1.0, 1.0);
        Self {
            size,
            pixel: from_coord(&coord, size),
            coord,
            source: ClipSource::Coord,
        }
    }

    /// Replace the coordinate form (rounded to 4 decimals) and project it to pixels
    pub fn set_coord(&mut self, coord: Edges) {
        self.coord = coord.map(|_, value| round_to(value, 10_000.0));
        self.pixel = from_coord(&self.coord, self.size);
        self.source = ClipSource::Coord;
    }

    /// Change one edge of the coordinate form. Never fails.
    pub fn set_coord_edge(&mut self, edge: Edge, value: f64) {
        let mut coord = self.coord;
        coord.set(edge, value);
        self.set_coord(coord);
    }

    /// Replace the pixel form and project it to coordinates.
    /// On error nothing is modified.
    pub fn set_pixel(&mut self, pixel: Edges) -> Result<(), ClipError> {
        self.coord = from_pixel(&pixel, self.size)?;
        self.pixel = pixel;
        self.source = ClipSource::Pixel;
        Ok(())
    }

    /// Change a single edge of one form; only that direction is recomputed
    pub fn edit(&mut self, source: ClipSource, edge: Edge, value: f64) -> Result<(), ClipError> {
        match source {
            ClipSource::Coord => {
                self.set_coord_edge(edge, value);
                Ok(())
            }
            ClipSource::Pixel => {
                let mut pixel = self.pixel;
                pixel.set(edge, value);
                self.set_pixel(pixel)
            }
        }
    }

    /// CSS clip rectangle: `rect(top, right, bottom, left)` in pixels
    pub fn to_clip_path(&self) -> String {
        format!(
            "rect({}px, {}px, {}px, {}px)",
            self.pixel.top, self.pixel.right, self.pixel.bottom, self.pixel.left
        )
    }

    /// Texture coordinate call in `left, right, top, bottom` order
    pub fn to_tex_coords(&self) -> String {
        format!(
            "SetTexCoord({}, {}, {}, {})",
            self.coord.left, self.coord.right, self.coord.top, self.coord.bottom
        )
    }
}

impl fmt::Display for ClipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_clip_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Edges, b: &Edges, tolerance: f64) {
        for edge in Edge::ALL {
            let (x, y) = (a.get(edge), b.get(edge));
            assert!((x - y).abs() <= tolerance, "{:?}: {} vs {}", edge, x, y);
        }
    }

    #[test]
    fn test_from_coord() {
        let size = ImageSize::new(200, 100);
        let pixel = from_coord(&Edges::new(0.1, 0.2, 0.9, 0.8), size);

        assert_eq!(pixel, Edges::new(10.0, 40.0, 90.0, 160.0));
    }

    #[test]
    fn test_rounding_precision() {
        let size = ImageSize::new(3, 7);
        let pixel = from_coord(&Edges::new(0.33333, 0.33333, 1.0, 1.0), size);
        assert_eq!(pixel.top, 2.3);
        assert_eq!(pixel.left, 1.0);

        let coord = from_pixel(&Edges::new(1.0, 1.0, 7.0, 3.0), size).unwrap();
        assert_eq!(coord.top, 0.1429);
        assert_eq!(coord.left, 0.3333);
        assert_eq!(coord.bottom, 1.0);
    }

    #[test]
    fn test_round_trip() {
        let size = ImageSize::new(200, 100);
        let coord = Edges::new(0.1, 0.2, 0.9, 0.8);

        let pixel = from_coord(&coord, size);
        let back = from_pixel(&pixel, size).unwrap();

        assert_close(&coord, &back, 0.0001);
    }

    #[test]
    fn test_zero_size_guard() {
        let pixel = Edges::new(1.0, 1.0, 2.0, 2.0);

        assert_eq!(
            from_pixel(&pixel, ImageSize::new(10, 0)),
            Err(ClipError::DegenerateGeometry { width: 10, height: 0 })
        );
        assert!(from_pixel(&pixel, ImageSize::new(0, 10)).is_err());
    }

    #[test]
    fn test_edit_runs_one_direction() {
        let mut clip = ClipState::new(ImageSize::new(256, 128));
        assert_eq!(clip.pixel, Edges::new(0.0, 0.0, 128.0, 256.0));

        clip.edit(ClipSource::Pixel, Edge::Left, 64.0).unwrap();
        assert_eq!(clip.source, ClipSource::Pixel);
        assert_eq!(clip.coord.left, 0.25);
        assert_eq!(clip.pixel.left, 64.0);

        clip.edit(ClipSource::Coord, Edge::Bottom, 0.5).unwrap();
        assert_eq!(clip.source, ClipSource::Coord);
        assert_eq!(clip.pixel.bottom, 64.0);
    }

    #[test]
    fn test_failed_edit_keeps_state() {
        let mut clip = ClipState::new(ImageSize::new(0, 0));
        let before = clip.clone();

        assert!(clip.edit(ClipSource::Pixel, Edge::Top, 5.0).is_err());
        assert_eq!(clip, before);
    }

    #[test]
    fn test_slider_steps_print_four_decimals() {
        let mut clip = ClipState::new(ImageSize::new(512, 256));

        for steps in 0..=10_000u32 {
            clip.set_coord_edge(Edge::Left, f64::from(steps) * 0.0001);

            let left = clip.coord.left.to_string();
            let decimals = left.split('.').nth(1).map_or(0, str::len);
            assert!(decimals <= 4, "step {}: {}", steps, clip.to_tex_coords());
        }
        assert_eq!(clip.to_tex_coords(), "SetTexCoord(1, 1, 0, 1)");

        clip.set_coord_edge(Edge::Left, 3.0 * 0.0001);
        assert_eq!(clip.to_tex_coords(), "SetTexCoord(0.0003, 1, 0, 1)");
    }

    #[test]
    fn test_from_corners() {
        let edges = Edges::from_corners((0.8, 0.95), (0.25, -0.5));
        assert_eq!(edges, Edges::new(0.0, 0.25, 0.95, 0.8));
        assert!(edges.is_ordered());

        let edges = Edges::from_corners((0.123456, 0.5), (1.5, 0.5));
        assert_eq!(edges.left, 0.1235);
        assert_eq!(edges.right, 1.0);
        assert_eq!(edges.top, edges.bottom);
    }

    #[test]
    fn test_clip_path_order() {
        let mut clip = ClipState::new(ImageSize::new(200, 100));
        clip.set_coord(Edges::new(0.1, 0.2, 0.9, 0.8));

        assert_eq!(clip.to_clip_path(), "rect(10px, 160px, 90px, 40px)");
        assert_eq!(clip.to_tex_coords(), "SetTexCoord(0.2, 0.8, 0.1, 0.9)");
        assert!(clip.coord.is_ordered());
    }
}
