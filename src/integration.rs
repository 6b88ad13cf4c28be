//! Integration module for connecting object detection backends with the tracker.
//!
//! No inference backend ships with this crate. Implement [`DetectionSource`]
//! for your detector and drive it through a [`TrackerPipeline`].

mod detector;
mod pipeline;

pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::TrackerPipeline;
