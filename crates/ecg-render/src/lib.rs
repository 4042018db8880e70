//! ECG-Render: drawing-surface agnostic rendering of ECG traces
//!
//! The single-trace renderer paints synthesized cycles onto any
//! [`DrawingSurface`]; the chart manager owns one chart per visible lead on
//! any [`ChartBackend`].

pub mod chart_manager;
pub mod surface;
pub mod trace;
pub mod viewport;

pub use chart_manager::{ChartBackend, ChartConfig, ChartManager, ChartSlot, SyncReport};
pub use surface::*;
pub use trace::{TraceLayout, TraceRenderer, TraceStyle};
pub use viewport::{Gesture, XViewport};
