//! VGSync Project Model
//!
//! Defines the core data contracts for VGSync projects:
//! - **Intervals:** Cut ranges in global time and the ordered cut list
//! - **Mapping:** Global (raw sources) to final (post-cut) time conversion
//! - **Marks:** The pending B/E selection for the next cut
//! - **Playlist / Keyframes / Track:** Source clips, keyframe index, GPX point times
//! - **Project:** Top-level metadata, overlays, and export settings
//!
//! All times are seconds as `f64`. "Global" time is a position in the
//! concatenation of all source clips before any cut is applied.

pub mod interval;
pub mod keyframes;
pub mod mapping;
pub mod marks;
pub mod overlay;
pub mod playlist;
pub mod project;
pub mod track;

pub use interval::*;
pub use keyframes::*;
pub use mapping::*;
pub use marks::*;
pub use overlay::*;
pub use playlist::*;
pub use project::*;
pub use track::*;
