//! Position Mapping
//!
//! Maps the normalized position-effect input onto screen pixels. The mapping
//! amplifies the *range* of motion around the screen center; it never shifts
//! the center itself, so with every effect at 0 and every multiplier at 1 it
//! is a plain scale to screen size.
//!
//! # Algorithm
//!
//! ```text
//! movement       = input - 0.5                       (per axis, -0.5..0.5)
//! range          = effect == 0 ? 1 : 1 + effect * effect_multiplier
//! distance_range = dist_mult == 0 ? 1 : 1 + distance * dist_mult
//! offset         = movement * range * distance_range * movement_multiplier * screen_size
//! position       = clamp(screen_center + offset, 0, screen_size)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::MappingConfig;
use crate::tracking::NormalizedPoint;

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ScreenSize {
    /// New screen size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the screen
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point into `[0, width] x [0, height]`
    pub fn clamp(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }
}

/// A position in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate
    pub x: f32,
    /// Vertical pixel coordinate
    pub y: f32,
}

impl ScreenPoint {
    /// New screen point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Sentinel for "no detection": hides the pointer and is never actuated
    pub const HIDDEN: Self = Self::new(-1.0, -1.0);

    /// False for the negative "no detection" sentinel
    pub fn is_visible(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0
    }
}

/// Range multiplier for one axis: exactly 1 when the effect is disabled
pub fn range_multiplier(effect: f32, multiplier: f32) -> f32 {
    if effect == 0.0 {
        1.0
    } else {
        1.0 + effect * multiplier
    }
}

/// Distance amplification for one axis: exactly 1 when disabled
pub fn distance_range(distance: f32, multiplier: f32) -> f32 {
    if multiplier == 0.0 {
        1.0
    } else {
        1.0 + distance * multiplier
    }
}

/// Amplified movement around the center for one axis, before screen scaling
pub fn amplified_movement(
    input: f32,
    effect: f32,
    effect_multiplier: f32,
    distance: f32,
    distance_multiplier: f32,
) -> f32 {
    let movement = input.clamp(0.0, 1.0) - 0.5;
    movement * range_multiplier(effect, effect_multiplier) * distance_range(distance, distance_multiplier)
}

/// Map a normalized position-effect input to a clamped screen position.
///
/// Pure: identical inputs always give bit-identical outputs.
pub fn map_to_screen(
    input: NormalizedPoint,
    distance: f32,
    screen: ScreenSize,
    config: &MappingConfig,
) -> ScreenPoint {
    let distance = distance.clamp(0.0, 1.0);

    let movement_x = amplified_movement(
        input.x,
        config.eye_position_x_effect,
        config.eye_position_x_multiplier,
        distance,
        config.distance_x_multiplier,
    );
    let movement_y = amplified_movement(
        input.y,
        config.eye_position_y_effect,
        config.eye_position_y_multiplier,
        distance,
        config.distance_y_multiplier,
    );

    let center = screen.center();
    let target = ScreenPoint::new(
        center.x + movement_x * config.x_movement_multiplier * screen.width,
        center.y + movement_y * config.y_movement_multiplier * screen.height,
    );

    screen.clamp(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCREEN: ScreenSize = ScreenSize::new(1080.0, 2400.0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_default_config_is_pass_through() {
        let config = MappingConfig::default();
        let p = map_to_screen(NormalizedPoint::new(0.25, 0.75), 0.4, SCREEN, &config);
        assert!(approx(p.x, 270.0));
        assert!(approx(p.y, 1800.0));
    }

    #[test]
    fn test_zero_effect_ignores_multiplier() {
        assert_eq!(range_multiplier(0.0, 37.0), 1.0);
        assert_eq!(range_multiplier(0.0, -5.0), 1.0);
        assert_eq!(range_multiplier(0.5, 2.0), 2.0);
    }

    #[test]
    fn test_distance_amplification() {
        assert_eq!(distance_range(0.25, 0.0), 1.0);
        assert!(approx(distance_range(0.25, 2.0), 1.5));

        // 0.7 - 0.5 = 0.2 base movement
        let movement = amplified_movement(0.7, 0.0, 1.0, 0.25, 2.0);
        assert!(approx(movement, 0.3), "movement = {}", movement);
    }

    #[test]
    fn test_range_amplification_keeps_center() {
        let config = MappingConfig {
            eye_position_x_effect: 1.0,
            eye_position_x_multiplier: 3.0,
            eye_position_y_effect: 0.5,
            eye_position_y_multiplier: 2.0,
            ..MappingConfig::default()
        };
        let p = map_to_screen(NormalizedPoint::CENTER, 0.9, SCREEN, &config);
        assert_eq!(p, SCREEN.center());
    }

    #[test]
    fn test_out_of_range_is_clamped_not_dropped() {
        let config = MappingConfig {
            x_movement_multiplier: 10.0,
            y_movement_multiplier: 10.0,
            ..MappingConfig::default()
        };
        let p = map_to_screen(NormalizedPoint::new(0.9, 0.1), 0.0, SCREEN, &config);
        assert_eq!(p, ScreenPoint::new(SCREEN.width, 0.0));
    }

    #[test]
    fn test_hidden_sentinel() {
        assert!(!ScreenPoint::HIDDEN.is_visible());
        assert!(ScreenPoint::new(0.0, 0.0).is_visible());
    }

    fn mapping_config() -> impl Strategy<Value = MappingConfig> {
        (
            (-2.0f32..2.0, -5.0f32..5.0, -2.0f32..2.0, -5.0f32..5.0),
            (-3.0f32..3.0, -3.0f32..3.0, 0.0f32..4.0, 0.0f32..4.0),
        )
            .prop_map(|((xe, xm, ye, ym), (dx, dy, mx, my))| MappingConfig {
                eye_position_x_effect: xe,
                eye_position_x_multiplier: xm,
                eye_position_y_effect: ye,
                eye_position_y_multiplier: ym,
                distance_x_multiplier: dx,
                distance_y_multiplier: dy,
                x_movement_multiplier: mx,
                y_movement_multiplier: my,
            })
    }

    proptest! {
        #[test]
        fn prop_mapping_is_idempotent(
            x in -0.5f32..1.5, y in -0.5f32..1.5, d in 0.0f32..1.0, config in mapping_config()
        ) {
            let input = NormalizedPoint::new(x, y);
            let a = map_to_screen(input, d, SCREEN, &config);
            let b = map_to_screen(input, d, SCREEN, &config);
            prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
            prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
        }

        #[test]
        fn prop_mapping_stays_on_screen(
            x in -0.5f32..1.5, y in -0.5f32..1.5, d in -1.0f32..2.0, config in mapping_config()
        ) {
            let p = map_to_screen(NormalizedPoint::new(x, y), d, SCREEN, &config);
            prop_assert!(p.x >= 0.0 && p.x <= SCREEN.width);
            prop_assert!(p.y >= 0.0 && p.y <= SCREEN.height);
        }
    }
}
