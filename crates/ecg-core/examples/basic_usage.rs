//! Basic usage of the ECG core types
//!
//! Builds a recording from a raw lead matrix, inspects it, and walks the
//! visible-lead selection through a few toggles.

use ecg_core::{
    EcgRecording, Lead, Prediction, SegmentTiming, Segment, ToggleOutcome, VisibleLeadSet,
    DEFAULT_SAMPLE_RATE,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ECG Core Basic Usage");
    println!("====================");

    // Three seconds of a slow sine on every lead, as a predictor might send it
    let rows: Vec<Vec<f32>> = (0..12)
        .map(|lead| {
            (0..300)
                .map(|i| ((i as f32 / 100.0) * std::f32::consts::TAU).sin() * (1.0 + lead as f32 * 0.1))
                .collect()
        })
        .collect();

    let recording = EcgRecording::from_matrix(rows, DEFAULT_SAMPLE_RATE)?;
    println!("Recording {} with {} leads, {:.1}s", recording.id, recording.lead_count(), recording.duration());

    for lead in [Lead::I, Lead::AVr, Lead::V6] {
        let series = recording.non_empty_series(lead)?;
        if let Some((min, max)) = series.amplitude_range() {
            println!("  {:>7}: {} samples, range [{:.2}, {:.2}] mV", lead.title(), series.len(), min, max);
        }
    }

    let prediction = Prediction::new("MI", 0.91)?;
    println!("\nPrediction: {} -> reference trace {:?}", prediction, prediction.condition());

    println!("\nSegment timing:");
    let timing = SegmentTiming::STANDARD;
    for segment in Segment::ALL {
        println!("  {}", timing.heading(segment));
    }

    println!("\nLead selection:");
    let mut visible = VisibleLeadSet::single(Lead::II);
    for lead in [Lead::V1, Lead::II, Lead::V1] {
        let outcome = visible.toggle(lead);
        println!("  toggle {} -> {:?}, visible: {}", lead, outcome, visible.len());
        if outcome == ToggleOutcome::Rejected {
            println!("    (last visible lead stays on)");
        }
    }

    Ok(())
}
