//! wavecontrol - reactive session state for waveform players.
//!
//! A [`WaveformSession`](services::waveform::WaveformSession) owns one
//! player, publishes it through watchable properties and exposes
//! transport controls. The player library itself sits behind the
//! [`WaveformPlayer`](services::waveform::WaveformPlayer) trait.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wavecontrol::services::waveform::{HeadlessBackend, SurfaceId, WaveformSession};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HeadlessBackend::new().with_media("take.wav", 30.0);
//! let mut session = WaveformSession::new(Arc::new(backend));
//!
//! session.initialize(SurfaceId::new("waveform"))?;
//! let _ = session.load("take.wav");
//! let _ = session.play();
//! println!("{:.2}s of {:.2}s", session.state().current_time.get(), session.state().duration.get());
//! # Ok(())
//! # }
//! ```

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface.
pub mod cli;

/// Reactive services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{Result, WavecontrolError};
