/// Shared reactive building blocks
pub mod common;
/// Waveform player session
pub mod waveform;

pub use waveform::{ObservableState, WaveformSession};
