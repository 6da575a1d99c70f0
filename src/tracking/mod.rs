//! Landmark Geometry Extraction
//!
//! Pure per-frame geometry: from the detector's normalized landmark points to
//! eye regions, eyelid positions, a gaze point and a distance proxy. Nothing
//! here keeps state between frames.
//!
//! # Architecture
//!
//! ```text
//! LandmarkFrame ──> GazeExtractor::track()
//!                     ├─> eye_region()        (80% inset bounding box)
//!                     ├─> eyelid_landmarks()  (min/max Y)
//!                     ├─> pupil_estimate()    (iris landmark → contour centroid)
//!                     └─> FallbackChain       (first estimate that exists)
//!                               ↓
//!                        TrackingResult
//! ```
//!
//! Missing landmarks are never an error: every step yields `Option` and the
//! [`FallbackChain`] picks the best estimate available.

pub mod extractor;
pub mod fallback;
pub mod geometry;
pub mod landmarks;

pub use extractor::{
    distance_proxy, EyeObservation, GazeExtractor, TrackingResult, MAX_EXPECTED_EYE_AREA,
    PUPIL_BLEND_WEIGHT,
};
pub use fallback::FallbackChain;
pub use geometry::{EyeRegion, EyelidLandmarks, EYE_REGION_INSET};
pub use landmarks::{EyeSchema, EyeSide, LandmarkFrame, LandmarkSchema, NormalizedPoint};
