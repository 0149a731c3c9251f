//! Pure mapping from a card's drag offset to how the card is drawn.

/// Rotation at a full-width horizontal offset, in degrees.
pub const MAX_ROTATION_DEG: f64 = 15.0;

/// Card opacity once the horizontal offset reaches the commit threshold.
pub const THRESHOLD_OPACITY: f64 = 0.5;

/// Fraction of the surface width a drag must exceed to commit.
pub const THRESHOLD_RATIO: f64 = 0.3;

/// Displacement of a card from its resting position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Which way a card leaves the deck. Cosmetic only: both directions advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction of a horizontal offset; zero counts as right.
    pub fn from_offset(x: f64) -> Self {
        if x < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }
}

/// Size of the surface the card is dragged across.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGeometry {
    pub width: f64,
    pub height: f64,
}

impl SwipeGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal distance a release must exceed (strictly) to commit.
    pub fn threshold(&self) -> f64 {
        THRESHOLD_RATIO * self.width
    }

    pub fn crosses_threshold(&self, offset: Offset) -> bool {
        offset.x.abs() > self.threshold()
    }
}

/// Everything the renderer needs to draw a card for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub offset: Offset,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl VisualState {
    pub const REST: VisualState = VisualState {
        offset: Offset::ZERO,
        rotation_deg: 0.0,
        opacity: 1.0,
    };
}

/// Piecewise-linear interpolation over ascending control points.
///
/// Inputs outside `domain` clamp to the first or last `range` value.
/// `domain` and `range` must be the same non-zero length.
pub fn interpolate(input: f64, domain: &[f64], range: &[f64]) -> f64 {
    debug_assert_eq!(domain.len(), range.len());
    debug_assert!(!domain.is_empty());

    let last = domain.len() - 1;
    if input <= domain[0] {
        return range[0];
    }
    if input >= domain[last] {
        return range[last];
    }

    for i in 0..last {
        let (d0, d1) = (domain[i], domain[i + 1]);
        if input <= d1 {
            let span = d1 - d0;
            if span <= 0.0 {
                return range[i + 1];
            }
            let t = (input - d0) / span;
            return range[i] + t * (range[i + 1] - range[i]);
        }
    }

    range[last]
}

/// Rotation and opacity for a card dragged to `offset`.
pub fn derive_visual_state(offset: Offset, geometry: SwipeGeometry) -> VisualState {
    let w = geometry.width;
    let rotation_deg = interpolate(
        offset.x,
        &[-w, 0.0, w],
        &[-MAX_ROTATION_DEG, 0.0, MAX_ROTATION_DEG],
    );
    let opacity = interpolate(
        offset.x.abs(),
        &[0.0, geometry.threshold()],
        &[1.0, THRESHOLD_OPACITY],
    );

    VisualState {
        offset,
        rotation_deg,
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GEOMETRY: SwipeGeometry = SwipeGeometry {
        width: 400.0,
        height: 800.0,
    };

    #[test]
    fn test_threshold_is_thirty_percent() {
        assert!((GEOMETRY.threshold() - 120.0).abs() < 1e-9);
        assert!(!GEOMETRY.crosses_threshold(Offset::new(120.0, 0.0)));
        assert!(!GEOMETRY.crosses_threshold(Offset::new(-120.0, 0.0)));
        assert!(GEOMETRY.crosses_threshold(Offset::new(120.001, 0.0)));
        assert!(!GEOMETRY.crosses_threshold(Offset::new(0.0, 5000.0)));
    }

    #[test]
    fn test_rest_state() {
        assert_eq!(derive_visual_state(Offset::ZERO, GEOMETRY), VisualState::REST);
    }

    #[test]
    fn test_interpolate_midpoints() {
        let v = derive_visual_state(Offset::new(200.0, 0.0), GEOMETRY);
        assert!((v.rotation_deg - 7.5).abs() < 1e-9);
        assert!((v.opacity - 0.5).abs() < 1e-9);

        let v = derive_visual_state(Offset::new(-60.0, 0.0), GEOMETRY);
        assert!((v.rotation_deg + 2.25).abs() < 1e-9);
        assert!((v.opacity - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_clamps_outside_domain() {
        assert_eq!(interpolate(-10.0, &[0.0, 1.0], &[3.0, 5.0]), 3.0);
        assert_eq!(interpolate(10.0, &[0.0, 1.0], &[3.0, 5.0]), 5.0);
    }

    #[test]
    fn test_direction_from_offset() {
        assert_eq!(SwipeDirection::from_offset(-1.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_offset(1.0), SwipeDirection::Right);
    }

    proptest! {
        #[test]
        fn prop_rotation_monotonic(a in -1000.0f64..1000.0, b in -1000.0f64..1000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r_lo = derive_visual_state(Offset::new(lo, 0.0), GEOMETRY).rotation_deg;
            let r_hi = derive_visual_state(Offset::new(hi, 0.0), GEOMETRY).rotation_deg;
            prop_assert!(r_lo <= r_hi);
        }

        #[test]
        fn prop_rotation_clamped_beyond_width(extra in 0.0f64..10_000.0) {
            let right = derive_visual_state(Offset::new(GEOMETRY.width + extra, 0.0), GEOMETRY);
            let left = derive_visual_state(Offset::new(-GEOMETRY.width - extra, 0.0), GEOMETRY);
            prop_assert_eq!(right.rotation_deg, MAX_ROTATION_DEG);
            prop_assert_eq!(left.rotation_deg, -MAX_ROTATION_DEG);
        }

        #[test]
        fn prop_opacity_within_bounds(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
            let v = derive_visual_state(Offset::new(x, y), GEOMETRY);
            prop_assert!(v.opacity >= THRESHOLD_OPACITY && v.opacity <= 1.0);
            prop_assert_eq!(v.offset.y, y);
        }
    }
}
