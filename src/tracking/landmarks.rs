//! Landmark Frames and Schemas
//!
//! A [`LandmarkFrame`] is the opaque output of the face-landmark detector: an
//! ordered list of normalized 2-D points. Which index means what is decided by
//! a [`LandmarkSchema`], fixed per detector model.

use serde::{Deserialize, Serialize};

/// A point in normalized image coordinates (both axes in `[0, 1]`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// Horizontal position (0 = left edge)
    pub x: f32,
    /// Vertical position (0 = top edge)
    pub y: f32,
}

impl NormalizedPoint {
    /// Create a point without clamping
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Image center
    pub const CENTER: Self = Self::new(0.5, 0.5);

    /// Clamp both axes into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }

    /// Component-wise midpoint of two points
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Linear blend: `self * weight + other * (1 - weight)`
    pub fn blend(self, other: Self, weight: f32) -> Self {
        Self {
            x: self.x * weight + other.x * (1.0 - weight),
            y: self.y * weight + other.y * (1.0 - weight),
        }
    }
}

impl From<[f32; 2]> for NormalizedPoint {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// Landmarks produced for one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct LandmarkFrame {
    points: Vec<NormalizedPoint>,
}

impl LandmarkFrame {
    /// Wrap a detector's point list
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    /// Point at `index`, clamped into `[0, 1]`, or `None` if the detector
    /// did not produce that many landmarks
    pub fn point(&self, index: usize) -> Option<NormalizedPoint> {
        self.points.get(index).map(|p| p.clamped())
    }

    /// Resolve a subset of indices, silently skipping missing ones
    pub fn resolve<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = NormalizedPoint> + 'a {
        indices.iter().filter_map(move |&i| self.point(i))
    }

    /// Number of landmarks in the frame
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the detector produced no landmarks
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<[f32; 2]>> for LandmarkFrame {
    fn from(raw: Vec<[f32; 2]>) -> Self {
        Self::new(raw.into_iter().map(NormalizedPoint::from).collect())
    }
}

impl From<LandmarkFrame> for Vec<[f32; 2]> {
    fn from(frame: LandmarkFrame) -> Self {
        frame.points.into_iter().map(|p| [p.x, p.y]).collect()
    }
}

/// Which eye, from the camera's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSide {
    /// Left side of the image (the user's right eye)
    Left,
    /// Right side of the image (the user's left eye)
    Right,
}

impl EyeSide {
    /// The opposite eye
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Landmark indices describing one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeSchema {
    /// Contour landmarks around the eye opening
    pub contour: &'static [usize],
    /// Dedicated pupil/iris-center landmark, present only on models that
    /// refine the iris
    pub pupil: Option<usize>,
}

/// Per-detector landmark layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkSchema {
    /// Left eye (image left)
    pub left: EyeSchema,
    /// Right eye (image right)
    pub right: EyeSchema,
    /// Eye used first when tracking with a single eye
    pub primary: EyeSide,
}

// MediaPipe face mesh, 468 landmarks (+10 iris points with refinement)
const FACE_MESH_LEFT_CONTOUR: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];
const FACE_MESH_RIGHT_CONTOUR: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

impl LandmarkSchema {
    /// MediaPipe face mesh layout. Iris centers 468/473 only exist when the
    /// model runs with iris refinement; otherwise pupils fall back to the
    /// contour centroid.
    pub const FACE_MESH: Self = Self {
        left: EyeSchema {
            contour: &FACE_MESH_LEFT_CONTOUR,
            pupil: Some(468),
        },
        right: EyeSchema {
            contour: &FACE_MESH_RIGHT_CONTOUR,
            pupil: Some(473),
        },
        primary: EyeSide::Right,
    };

    /// Schema for the given eye
    pub fn eye(&self, side: EyeSide) -> &EyeSchema {
        match side {
            EyeSide::Left => &self.left,
            EyeSide::Right => &self.right,
        }
    }
}

impl Default for LandmarkSchema {
    fn default() -> Self {
        Self::FACE_MESH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_is_clamped_on_read() {
        let frame = LandmarkFrame::from(vec![[-0.2, 1.4], [0.3, 0.6]]);
        assert_eq!(frame.point(0), Some(NormalizedPoint::new(0.0, 1.0)));
        assert_eq!(frame.point(1), Some(NormalizedPoint::new(0.3, 0.6)));
        assert_eq!(frame.point(2), None);
    }

    #[test]
    fn test_resolve_skips_missing_indices() {
        let frame = LandmarkFrame::from(vec![[0.1, 0.1], [0.2, 0.2]]);
        let resolved: Vec<_> = frame.resolve(&[0, 5, 1]).collect();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_frame_deserializes_from_pairs() {
        let frame: LandmarkFrame = serde_json::from_str("[[0.25, 0.5], [1.0, 0.0]]").unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.point(0), Some(NormalizedPoint::new(0.25, 0.5)));
    }

    #[test]
    fn test_face_mesh_primary_is_right() {
        let schema = LandmarkSchema::default();
        assert_eq!(schema.primary, EyeSide::Right);
        assert_eq!(schema.eye(EyeSide::Left).pupil, Some(468));
        assert_eq!(schema.primary.other(), EyeSide::Left);
    }
}
