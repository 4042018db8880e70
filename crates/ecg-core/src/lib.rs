//! ECG-Core: Foundation types for ECG synthesis and visualization
//!
//! Shared vocabulary for the synthesis, rendering and desktop crates.

pub mod condition;
pub mod error;
pub mod leads;
pub mod selection;
pub mod timing;

pub use condition::*;
pub use error::{EcgError, EcgResult};
pub use leads::*;
pub use selection::*;
pub use timing::*;
