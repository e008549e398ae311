//! Capture resolution: direct and chain flips after a placement.

pub mod resolver;

pub use resolver::{Capture, CaptureDiff, CaptureResolver};
