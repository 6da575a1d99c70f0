//! Eye geometry derived from landmark subsets
//!
//! All functions here are pure and return `None` when none of the requested
//! landmarks exist in the frame.

use super::landmarks::{EyeSchema, LandmarkFrame, NormalizedPoint};

/// Fraction of the raw contour bounding box kept by [`eye_region`].
/// Contour landmarks sit on the lid edge and jitter; the inset box is stabler.
pub const EYE_REGION_INSET: f32 = 0.8;

/// Inset rectangle around the center of an eye's contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRegion {
    /// Center of the contour bounding box
    pub center: NormalizedPoint,
    /// Left edge of the inset rectangle
    pub left: f32,
    /// Top edge of the inset rectangle
    pub top: f32,
    /// Right edge of the inset rectangle
    pub right: f32,
    /// Bottom edge of the inset rectangle
    pub bottom: f32,
    /// Inset width
    pub width: f32,
    /// Inset height
    pub height: f32,
}

impl EyeRegion {
    /// Inset area, 0 for degenerate boxes
    pub fn area(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }
}

/// Topmost and bottommost Y of an eye's contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyelidLandmarks {
    /// Upper lid (smaller Y)
    pub upper_lid_y: f32,
    /// Lower lid (larger Y)
    pub lower_lid_y: f32,
}

impl EyelidLandmarks {
    /// Lid separation clamped into `[0, 1]`
    pub fn openness(&self) -> f32 {
        (self.lower_lid_y - self.upper_lid_y).clamp(0.0, 1.0)
    }

    /// Average two eyes' lids
    pub fn average(self, other: Self) -> Self {
        Self {
            upper_lid_y: (self.upper_lid_y + other.upper_lid_y) / 2.0,
            lower_lid_y: (self.lower_lid_y + other.lower_lid_y) / 2.0,
        }
    }
}

struct Bounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

fn bounds(points: impl Iterator<Item = NormalizedPoint>) -> Option<Bounds> {
    points.fold(None, |acc: Option<Bounds>, p| {
        Some(match acc {
            None => Bounds {
                left: p.x,
                top: p.y,
                right: p.x,
                bottom: p.y,
            },
            Some(b) => Bounds {
                left: b.left.min(p.x),
                top: b.top.min(p.y),
                right: b.right.max(p.x),
                bottom: b.bottom.max(p.y),
            },
        })
    })
}

/// Bounding box of the subset, shrunk to [`EYE_REGION_INSET`] around its center
pub fn eye_region(frame: &LandmarkFrame, indices: &[usize]) -> Option<EyeRegion> {
    let b = bounds(frame.resolve(indices))?;

    let center = NormalizedPoint::new((b.left + b.right) / 2.0, (b.top + b.bottom) / 2.0);
    let width = (b.right - b.left) * EYE_REGION_INSET;
    let height = (b.bottom - b.top) * EYE_REGION_INSET;

    Some(EyeRegion {
        center,
        left: center.x - width / 2.0,
        top: center.y - height / 2.0,
        right: center.x + width / 2.0,
        bottom: center.y + height / 2.0,
        width,
        height,
    })
}

/// Min/max Y of the subset
pub fn eyelid_landmarks(frame: &LandmarkFrame, indices: &[usize]) -> Option<EyelidLandmarks> {
    let b = bounds(frame.resolve(indices))?;
    Some(EyelidLandmarks {
        upper_lid_y: b.top,
        lower_lid_y: b.bottom,
    })
}

/// Mean of the resolved subset
pub fn centroid(frame: &LandmarkFrame, indices: &[usize]) -> Option<NormalizedPoint> {
    let (sum_x, sum_y, n) = frame
        .resolve(indices)
        .fold((0.0f32, 0.0f32, 0usize), |(sx, sy, n), p| {
            (sx + p.x, sy + p.y, n + 1)
        });
    if n == 0 {
        return None;
    }
    Some(NormalizedPoint::new(sum_x / n as f32, sum_y / n as f32))
}

/// Dedicated pupil landmark if the model produced it, else the contour centroid
pub fn pupil_estimate(frame: &LandmarkFrame, eye: &EyeSchema) -> Option<NormalizedPoint> {
    eye.pupil
        .and_then(|index| frame.point(index))
        .or_else(|| centroid(frame, eye.contour))
}
