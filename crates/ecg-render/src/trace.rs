//! Single-trace renderer: grid, synthesized trace and feature labels

use ecg_core::CardiacCondition;
use ecg_synthesis::{locate, LabelPlacement, SynthesizedSignal};

use crate::surface::{
    DrawingSurface, HAlign, Point, Rgb, StrokeStyle, SurfaceGeometry, TextStyle, VAlign,
};

/// Pixel layout of one trace card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceLayout {
    /// Logical width in pixels
    pub width: f32,
    /// Logical height in pixels
    pub height: f32,
    /// Downward offset of the baseline from the vertical centre
    pub vertical_offset: f32,
    /// Pixels per mV
    pub scale_y: f32,
    pub pixel_density: f32,
}

impl TraceLayout {
    /// Layout of the comparison cards: baseline 41 px below centre, a third
    /// of the height per mV
    pub fn card(width: f32, height: f32, pixel_density: f32) -> Self {
        Self {
            width,
            height,
            vertical_offset: 41.0,
            scale_y: height / 3.0,
            pixel_density,
        }
    }

    pub fn mid_y(&self) -> f32 {
        self.height / 2.0 + self.vertical_offset
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::new(self.width, self.height, self.pixel_density)
    }

    /// Pixel position of sample `index` of a `length`-sample signal
    pub fn project(&self, index: usize, voltage: f64, length: usize) -> Point {
        let step_x = self.width / length.max(1) as f32;
        Point::new(
            index as f32 * step_x,
            self.mid_y() - voltage as f32 * self.scale_y,
        )
    }
}

/// Colours, strokes and label offsets of a trace card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    pub background: Option<Rgb>,
    pub grid: StrokeStyle,
    /// Number of bands between horizontal grid lines
    pub horizontal_divisions: usize,
    /// Number of bands between vertical grid lines
    pub vertical_divisions: usize,
    pub trace: StrokeStyle,
    pub label: TextStyle,
    /// Gap between the trace and labels drawn above it
    pub label_gap_above: f32,
    /// Gap between the trace and labels drawn below it
    pub label_gap_below: f32,
}

impl TraceStyle {
    pub fn for_condition(condition: CardiacCondition) -> Self {
        let color = Rgb::from_hex(condition.trace_rgb());
        Self {
            background: None,
            grid: StrokeStyle {
                width: 0.5,
                color: Rgb::from_hex(0xe0e0e0),
            },
            horizontal_divisions: 10,
            vertical_divisions: 5,
            trace: StrokeStyle { width: 2.0, color },
            label: TextStyle {
                size: 14.0,
                bold: true,
                color,
                h_align: HAlign::Center,
                v_align: VAlign::Bottom,
            },
            label_gap_above: 15.0,
            label_gap_below: 20.0,
        }
    }
}

/// Paints a synthesized signal onto a drawing surface
#[derive(Debug, Clone, Copy)]
pub struct TraceRenderer {
    pub layout: TraceLayout,
    pub style: TraceStyle,
}

impl TraceRenderer {
    pub fn new(layout: TraceLayout, style: TraceStyle) -> Self {
        Self { layout, style }
    }

    /// Card renderer styled for the signal's condition
    pub fn card(signal: &SynthesizedSignal, width: f32, height: f32, pixel_density: f32) -> Self {
        Self::new(
            TraceLayout::card(width, height, pixel_density),
            TraceStyle::for_condition(signal.condition()),
        )
    }

    /// Repaint the whole surface
    pub fn render(&self, surface: &mut impl DrawingSurface, signal: &SynthesizedSignal) {
        let geometry = self.layout.geometry();
        surface.configure(geometry);

        if let Some(background) = self.style.background {
            surface.fill_rect(
                Point::new(0.0, 0.0),
                Point::new(self.layout.width, self.layout.height),
                background,
            );
        }

        self.draw_grid(surface, &geometry);

        if signal.is_empty() {
            return;
        }
        self.draw_trace(surface, signal);
        self.draw_labels(surface, signal);
    }

    fn draw_grid(&self, surface: &mut impl DrawingSurface, geometry: &SurfaceGeometry) {
        let TraceLayout { width, height, .. } = self.layout;

        let rows = self.style.horizontal_divisions.max(1);
        for k in 0..=rows {
            let y = geometry.align(k as f32 * height / rows as f32, height);
            surface.stroke_line(Point::new(0.0, y), Point::new(width, y), self.style.grid);
        }

        let columns = self.style.vertical_divisions.max(1);
        for k in 0..=columns {
            let x = geometry.align(k as f32 * width / columns as f32, width);
            surface.stroke_line(Point::new(x, 0.0), Point::new(x, height), self.style.grid);
        }
    }

    fn draw_trace(&self, surface: &mut impl DrawingSurface, signal: &SynthesizedSignal) {
        let length = signal.len();
        let points: Vec<Point> = signal
            .samples()
            .iter()
            .enumerate()
            .map(|(i, &v)| self.layout.project(i, v, length))
            .collect();
        surface.stroke_polyline(&points, self.style.trace);
    }

    fn draw_labels(&self, surface: &mut impl DrawingSurface, signal: &SynthesizedSignal) {
        for located in locate(signal) {
            let anchor = self.layout.project(located.sample_index, located.voltage, signal.len());
            let (at, v_align) = match located.placement() {
                LabelPlacement::Above => (
                    Point::new(anchor.x, anchor.y - self.style.label_gap_above),
                    VAlign::Bottom,
                ),
                LabelPlacement::Below => (
                    Point::new(anchor.x, anchor.y + self.style.label_gap_below),
                    VAlign::Top,
                ),
            };
            let style = TextStyle {
                v_align,
                ..self.style.label
            };
            surface.fill_text(at, located.label.as_str(), style);
        }
    }
}
