//! Gaze Extraction
//!
//! Turns one [`LandmarkFrame`] into a [`TrackingResult`]: per-eye regions and
//! eyelids, a gaze point, a distance proxy and the position-effect input used
//! by the mapper.
//!
//! # Eye selection
//!
//! `use_one_eye` only affects the gaze point and the combined eyelids. The
//! distance proxy and the position-effect input always use both eyes so that
//! range amplification behaves the same whichever eye drives the cursor.
//!
//! ```text
//! gaze point (both eyes)     = 0.6 * pupil centroid + 0.4 * region centroid
//! gaze point (one eye)       = primary pupil → other pupil → region center
//! distance                   = (MAX - min(area, MAX)) / MAX
//! position-effect input      = mean of both region centers → fallbacks
//! ```

use tracing::trace;

use super::fallback::FallbackChain;
use super::geometry::{eye_region, eyelid_landmarks, pupil_estimate, EyeRegion, EyelidLandmarks};
use super::landmarks::{EyeSide, LandmarkFrame, LandmarkSchema, NormalizedPoint};

/// Eye area (normalized units²) treated as "as close as it gets"
pub const MAX_EXPECTED_EYE_AREA: f32 = 0.01;

/// Weight of the pupil centroid when blending with the region centroid
pub const PUPIL_BLEND_WEIGHT: f32 = 0.6;

/// Geometry observed for one eye in one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeObservation {
    /// Inset contour rectangle
    pub region: Option<EyeRegion>,
    /// Lid extremes
    pub eyelids: Option<EyelidLandmarks>,
    /// Pupil estimate
    pub pupil: Option<NormalizedPoint>,
}

/// Everything the rest of the pipeline needs from one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingResult {
    /// Image-left eye
    pub left: EyeObservation,
    /// Image-right eye
    pub right: EyeObservation,
    /// Eyelids feeding the blink detector (respects `use_one_eye`)
    pub eyelids: Option<EyelidLandmarks>,
    /// Where the user is looking, if any eye was found
    pub gaze_point: Option<NormalizedPoint>,
    /// Average eye-region area, 0 when no eye was found
    pub eye_area: f32,
    /// Distance proxy in `[0, 1]`; 0 = closest (or no eyes)
    pub distance: f32,
    /// Input of the position mapper, always from both eyes when possible
    pub position_effect_input: Option<NormalizedPoint>,
}

/// Stateless landmark → gaze extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct GazeExtractor {
    schema: LandmarkSchema,
}

impl GazeExtractor {
    /// Extractor for a detector's landmark layout
    pub fn new(schema: LandmarkSchema) -> Self {
        Self { schema }
    }

    /// Inset eye rectangle for one eye
    pub fn eye_region(&self, frame: &LandmarkFrame, side: EyeSide) -> Option<EyeRegion> {
        eye_region(frame, self.schema.eye(side).contour)
    }

    /// Eyelid extremes for one eye
    pub fn eyelid_landmarks(&self, frame: &LandmarkFrame, side: EyeSide) -> Option<EyelidLandmarks> {
        eyelid_landmarks(frame, self.schema.eye(side).contour)
    }

    /// Pupil estimate for one eye
    pub fn pupil_estimate(&self, frame: &LandmarkFrame, side: EyeSide) -> Option<NormalizedPoint> {
        pupil_estimate(frame, self.schema.eye(side))
    }

    fn observe(&self, frame: &LandmarkFrame, side: EyeSide) -> EyeObservation {
        EyeObservation {
            region: self.eye_region(frame, side),
            eyelids: self.eyelid_landmarks(frame, side),
            pupil: self.pupil_estimate(frame, side),
        }
    }

    /// Run the full extraction for one frame
    pub fn track(&self, frame: &LandmarkFrame, use_one_eye: bool) -> TrackingResult {
        let left = self.observe(frame, EyeSide::Left);
        let right = self.observe(frame, EyeSide::Right);
        let primary = self.schema.primary;

        let (gaze_point, eyelids) = if use_one_eye {
            let (first, second) = match primary {
                EyeSide::Left => (&left, &right),
                EyeSide::Right => (&right, &left),
            };
            (
                single_eye_gaze(first, second),
                first.eyelids.or(second.eyelids),
            )
        } else {
            (
                both_eye_gaze(&left, &right),
                either_or_both(left.eyelids, right.eyelids, EyelidLandmarks::average),
            )
        };

        let eye_area = average_area(&left, &right);
        let distance = distance_proxy(eye_area);
        let position_effect_input = position_effect_input(&left, &right, gaze_point);

        trace!(
            "Tracked frame: gaze={:?}, area={:.5}, distance={:.3}, effect_input={:?}",
            gaze_point,
            eye_area,
            distance,
            position_effect_input
        );

        TrackingResult {
            left,
            right,
            eyelids,
            gaze_point,
            eye_area,
            distance,
            position_effect_input,
        }
    }
}

fn either_or_both<T: Copy>(a: Option<T>, b: Option<T>, combine: impl Fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(combine(a, b)),
        (a, b) => a.or(b),
    }
}

fn region_center(eye: &EyeObservation) -> Option<NormalizedPoint> {
    eye.region.map(|r| r.center)
}

fn single_eye_gaze(first: &EyeObservation, second: &EyeObservation) -> Option<NormalizedPoint> {
    FallbackChain::new("single-eye gaze")
        .then_value("primary pupil", first.pupil)
        .then_value("secondary pupil", second.pupil)
        .then_value("primary region", region_center(first))
        .then_value("secondary region", region_center(second))
        .resolve()
}

fn both_eye_gaze(left: &EyeObservation, right: &EyeObservation) -> Option<NormalizedPoint> {
    let region_centroid = either_or_both(
        region_center(left),
        region_center(right),
        NormalizedPoint::midpoint,
    );

    FallbackChain::new("gaze")
        .then("blended pupils", || {
            let pupils = left.pupil?.midpoint(right.pupil?);
            Some(match region_centroid {
                Some(center) => pupils.blend(center, PUPIL_BLEND_WEIGHT),
                None => pupils,
            })
        })
        .then_value("left pupil", left.pupil)
        .then_value("right pupil", right.pupil)
        .then_value("region centroid", region_centroid)
        .resolve()
}

fn average_area(left: &EyeObservation, right: &EyeObservation) -> f32 {
    either_or_both(
        left.region.map(|r| r.area()),
        right.region.map(|r| r.area()),
        |a, b| (a + b) / 2.0,
    )
    .unwrap_or(0.0)
}

/// Map an eye area onto `[0, 1]`: 0 for areas at or above
/// [`MAX_EXPECTED_EYE_AREA`], approaching 1 as the eyes shrink. No area
/// (no eyes, degenerate boxes) maps to 0.
pub fn distance_proxy(eye_area: f32) -> f32 {
    if eye_area <= 0.0 {
        return 0.0;
    }
    (MAX_EXPECTED_EYE_AREA - eye_area.min(MAX_EXPECTED_EYE_AREA)) / MAX_EXPECTED_EYE_AREA
}

fn position_effect_input(
    left: &EyeObservation,
    right: &EyeObservation,
    gaze_point: Option<NormalizedPoint>,
) -> Option<NormalizedPoint> {
    FallbackChain::new("position effect input")
        .then("both regions", || {
            Some(region_center(left)?.midpoint(region_center(right)?))
        })
        .then("both pupils", || Some(left.pupil?.midpoint(right.pupil?)))
        .then_value("left region", region_center(left))
        .then_value("right region", region_center(right))
        .then_value("left pupil", left.pupil)
        .then_value("right pupil", right.pupil)
        .then_value("gaze point", gaze_point)
        .resolve()
}
