//! 2D drawing surface capability and a recording implementation

use serde::{Deserialize, Serialize};

/// Point in logical (density independent) pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Opaque colour, serialized as `"#rrggbb"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim().strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Rgb::parse(&text).ok_or_else(|| format!("invalid colour {:?}, expected #rrggbb", text))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// Logical size of a surface plus the device pixel density behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per logical pixel
    pub pixel_density: f32,
}

impl SurfaceGeometry {
    pub fn new(width: f32, height: f32, pixel_density: f32) -> Self {
        let pixel_density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// Resolution of the backing store in physical pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_density).ceil().max(0.0) as u32,
            (self.height * self.pixel_density).ceil().max(0.0) as u32,
        )
    }

    /// Centre of the physical pixel containing `logical`, so one-pixel
    /// strokes cover a single pixel row or column. The result stays on a
    /// pixel inside `[0, extent]`.
    pub fn align(&self, logical: f32, extent: f32) -> f32 {
        let half = 0.5 / self.pixel_density;
        if extent < 2.0 * half {
            return extent.max(0.0) / 2.0;
        }
        let centre = ((logical * self.pixel_density).floor() + 0.5) / self.pixel_density;
        centre.clamp(half, extent - half)
    }
}

/// Raster drawing capability required by the trace renderer
pub trait DrawingSurface {
    /// Resize the backing store for `geometry` and clear it
    fn configure(&mut self, geometry: SurfaceGeometry);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: StrokeStyle);

    fn stroke_polyline(&mut self, points: &[Point], stroke: StrokeStyle);

    fn fill_rect(&mut self, min: Point, max: Point, color: Rgb);

    fn fill_text(&mut self, at: Point, text: &str, style: TextStyle);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line { from: Point, to: Point, stroke: StrokeStyle },
    Polyline { points: Vec<Point>, stroke: StrokeStyle },
    Rect { min: Point, max: Point, color: Rgb },
    Text { at: Point, text: String, style: TextStyle },
}

/// Surface that records commands instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    geometry: Option<SurfaceGeometry>,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> Option<SurfaceGeometry> {
        self.geometry
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was configured (full repaints)
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[Point]> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&Point, &str, &TextStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { at, text, style } => Some((at, text.as_str(), style)),
            _ => None,
        })
    }
}

impl DrawingSurface for DisplayList {
    fn configure(&mut self, geometry: SurfaceGeometry) {
        self.geometry = Some(geometry);
        self.commands.clear();
        self.frames += 1;
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: StrokeStyle) {
        self.commands.push(DrawCommand::Line { from, to, stroke });
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: StrokeStyle) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_rect(&mut self, min: Point, max: Point, color: Rgb) {
        self.commands.push(DrawCommand::Rect { min, max, color });
    }

    fn fill_text(&mut self, at: Point, text: &str, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        let color = Rgb::from_hex(0x3b82f6);
        assert_eq!(color, Rgb::new(0x3b, 0x82, 0xf6));
        assert_eq!(String::from(color), "#3b82f6");
        assert_eq!(Rgb::parse("#FF4757"), Some(Rgb::from_hex(0xff4757)));
        assert_eq!(Rgb::parse("ff4757"), None);
        assert_eq!(Rgb::parse("#ff47"), None);
    }

    #[test]
    fn test_backing_size_scales_with_density() {
        let geometry = SurfaceGeometry::new(300.0, 200.0, 2.0);
        assert_eq!(geometry.backing_size(), (600, 400));

        let geometry = SurfaceGeometry::new(300.0, 200.0, 1.25);
        assert_eq!(geometry.backing_size(), (375, 250));

        // Nonsense densities fall back to 1
        assert_eq!(SurfaceGeometry::new(10.0, 10.0, 0.0).pixel_density, 1.0);
    }

    #[test]
    fn test_align_to_pixel_centre() {
        let geometry = SurfaceGeometry::new(100.0, 100.0, 1.0);
        assert_eq!(geometry.align(10.0, 100.0), 10.5);
        assert_eq!(geometry.align(10.7, 100.0), 10.5);

        let geometry = SurfaceGeometry::new(100.0, 100.0, 2.0);
        assert_eq!(geometry.align(10.0, 100.0), 10.25);
    }

    #[test]
    fn test_align_keeps_edges_on_surface() {
        let geometry = SurfaceGeometry::new(300.0, 300.0, 1.0);
        assert_eq!(geometry.align(0.0, 300.0), 0.5);
        assert_eq!(geometry.align(300.0, 300.0), 299.5);
        assert_eq!(geometry.align(-3.0, 300.0), 0.5);

        let geometry = SurfaceGeometry::new(300.0, 300.0, 2.0);
        assert_eq!(geometry.align(300.0, 300.0), 299.75);

        // Narrower than one physical pixel
        assert_eq!(geometry.align(0.2, 0.3), 0.15);
    }

    #[test]
    fn test_configure_clears_previous_frame() {
        let mut list = DisplayList::new();
        list.configure(SurfaceGeometry::new(10.0, 10.0, 1.0));
        list.stroke_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), StrokeStyle {
            width: 1.0,
            color: Rgb::new(0, 0, 0),
        });
        assert_eq!(list.commands().len(), 1);

        list.configure(SurfaceGeometry::new(10.0, 10.0, 1.0));
        assert!(list.commands().is_empty());
        assert_eq!(list.frames(), 2);
    }
}
