//! `DrawingSurface` over an egui painter

use ecg_render::{DrawingSurface, HAlign, Point, Rgb, StrokeStyle, SurfaceGeometry, TextStyle, VAlign};
use egui::{Align, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

/// Paints into the rectangle egui allocated for one trace card
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            origin: rect.min,
        }
    }

    fn pos(&self, point: Point) -> Pos2 {
        Pos2::new(self.origin.x + point.x, self.origin.y + point.y)
    }
}

pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn stroke(style: StrokeStyle) -> Stroke {
    Stroke::new(style.width, color(style.color))
}

fn anchor(style: &TextStyle) -> Align2 {
    let h = match style.h_align {
        HAlign::Left => Align::LEFT,
        HAlign::Center => Align::Center,
        HAlign::Right => Align::RIGHT,
    };
    let v = match style.v_align {
        VAlign::Top => Align::TOP,
        VAlign::Middle => Align::Center,
        VAlign::Bottom => Align::BOTTOM,
    };
    Align2([h, v])
}

/// Horizontal offsets at which a label is painted. The default fonts carry
/// no bold face, so bold text is overstruck half a point to the right.
fn text_passes(style: &TextStyle) -> &'static [f32] {
    if style.bold {
        &[0.0, 0.5]
    } else {
        &[0.0]
    }
}

impl DrawingSurface for EguiSurface<'_> {
    // egui repaints every frame and scales by pixels_per_point itself
    fn configure(&mut self, _geometry: SurfaceGeometry) {}

    fn stroke_line(&mut self, from: Point, to: Point, style: StrokeStyle) {
        self.painter
            .line_segment([self.pos(from), self.pos(to)], stroke(style));
    }

    fn stroke_polyline(&mut self, points: &[Point], style: StrokeStyle) {
        let points = points.iter().map(|p| self.pos(*p)).collect();
        self.painter.add(Shape::line(points, stroke(style)));
    }

    fn fill_rect(&mut self, min: Point, max: Point, fill: Rgb) {
        let rect = Rect::from_min_max(self.pos(min), self.pos(max));
        self.painter.rect_filled(rect, 0.0, color(fill));
    }

    fn fill_text(&mut self, at: Point, text: &str, style: TextStyle) {
        for dx in text_passes(&style) {
            self.painter.text(
                self.pos(at) + egui::vec2(*dx, 0.0),
                anchor(&style),
                text,
                FontId::proportional(style.size),
                color(style.color),
            );
        }
    }
}
