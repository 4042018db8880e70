//! ECG-Synthesis: parametric ECG cycle generation
//!
//! Piecewise waveform model, circular phase-shifted cycle synthesis,
//! annotation placement and a seeded 12-lead demo recording.

pub mod annotation;
pub mod demo_recording;
pub mod synthesizer;
pub mod waveform;

pub use annotation::*;
pub use demo_recording::*;
pub use synthesizer::*;
pub use waveform::*;
