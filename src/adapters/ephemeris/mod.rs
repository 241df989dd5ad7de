//! Astro snapshot adapters.
//!
//! ## Available Adapters
//!
//! - `InMemorySnapshotProvider` - Precomputed snapshots by date
//! - `MeanMotionEphemeris` - Approximate Sun and Moon with lunar phase

mod in_memory;
mod mean_motion;

pub use in_memory::InMemorySnapshotProvider;
pub use mean_motion::MeanMotionEphemeris;
