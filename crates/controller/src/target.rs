//! Classification of a Down position against the range.

use serde::{Deserialize, Serialize};

use trimview_gesture::Point;
use trimview_range_model::Bounds;

/// What part of the trimmer a gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTarget {
    LeftHandle,
    RightHandle,
    /// The span between the handles.
    Body,
    /// Outside the range; gestures pass through.
    None,
}

impl GestureTarget {
    pub fn is_handle(&self) -> bool {
        matches!(self, Self::LeftHandle | Self::RightHandle)
    }
}

/// Classify `point` against `bounds`.
///
/// Anything beyond `handle_radius` of either bound is `None`. Points strictly
/// between the two handle bands are `Body`. Inside a handle band, the point
/// must also be within `handle_radius` of `handle_center_y` to grab the handle.
pub fn hit_test(
    point: Point,
    bounds: Bounds,
    handle_radius: f64,
    handle_center_y: f64,
) -> GestureTarget {
    let Point { x, y } = point;

    if x < bounds.left - handle_radius || x > bounds.right + handle_radius {
        return GestureTarget::None;
    }

    if x > bounds.left + handle_radius && x < bounds.right - handle_radius {
        return GestureTarget::Body;
    }

    if (y - handle_center_y).abs() < handle_radius {
        if x < bounds.left + handle_radius {
            GestureTarget::LeftHandle
        } else {
            GestureTarget::RightHandle
        }
    } else {
        GestureTarget::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        left: 100.0,
        right: 400.0,
    };

    fn at(x: f64, y: f64) -> GestureTarget {
        hit_test(Point::new(x, y), BOUNDS, 15.0, 30.0)
    }

    #[test]
    fn test_outside_range_is_none() {
        assert_eq!(at(84.0, 30.0), GestureTarget::None);
        assert_eq!(at(416.0, 30.0), GestureTarget::None);
    }

    #[test]
    fn test_between_bands_is_body_at_any_height() {
        assert_eq!(at(250.0, 30.0), GestureTarget::Body);
        assert_eq!(at(116.0, 0.0), GestureTarget::Body);
        assert_eq!(at(384.0, 59.0), GestureTarget::Body);
    }

    #[test]
    fn test_handles_need_vertical_proximity() {
        assert_eq!(at(100.0, 30.0), GestureTarget::LeftHandle);
        assert_eq!(at(86.0, 40.0), GestureTarget::LeftHandle);
        assert_eq!(at(400.0, 20.0), GestureTarget::RightHandle);
        assert_eq!(at(414.0, 30.0), GestureTarget::RightHandle);
        assert_eq!(at(100.0, 50.0), GestureTarget::None);
        assert_eq!(at(400.0, 10.0), GestureTarget::None);
    }

    #[test]
    fn test_narrow_range_prefers_left_handle_in_overlap() {
        let narrow = Bounds::new(100.0, 110.0);
        let target = hit_test(Point::new(105.0, 30.0), narrow, 15.0, 30.0);
        assert_eq!(target, GestureTarget::LeftHandle);
        let target = hit_test(Point::new(118.0, 30.0), narrow, 15.0, 30.0);
        assert_eq!(target, GestureTarget::RightHandle);
    }

    #[test]
    fn test_is_handle() {
        assert!(GestureTarget::LeftHandle.is_handle());
        assert!(!GestureTarget::Body.is_handle());
        assert!(!GestureTarget::None.is_handle());
    }
}
