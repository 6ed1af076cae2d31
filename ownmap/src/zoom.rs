#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid scale extent")]
pub struct InvalidScale;

/// Range of scales the camera is allowed to use. Scale `1` means the whole world fits the viewport
/// horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleExtent {
    min: f64,
    max: f64,
}

impl ScaleExtent {
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidScale> {
        if !min.is_finite() || !max.is_finite() || min <= 0. || min > max {
            Err(InvalidScale)
        } else {
            Ok(Self { min, max })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Bring `scale` into the extent. Non-finite values fall back to the minimum.
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            self.min
        } else {
            scale.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self { min: 1., max: 8. }
    }
}

impl TryFrom<(f64, f64)> for ScaleExtent {
    type Error = InvalidScale;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructing_extent() {
        let extent = ScaleExtent::default();
        assert_eq!(1., extent.min());
        assert_eq!(8., extent.max());

        assert!(ScaleExtent::new(1., 1.).is_ok());
        assert_eq!(Err(InvalidScale), ScaleExtent::new(2., 1.));
        assert_eq!(Err(InvalidScale), ScaleExtent::new(0., 1.));
        assert_eq!(Err(InvalidScale), ScaleExtent::try_from((1., f64::INFINITY)));
    }

    #[test]
    fn test_clamping() {
        let extent = ScaleExtent::default();
        assert_eq!(8., extent.clamp(100.));
        assert_eq!(1., extent.clamp(0.01));
        assert_eq!(3.5, extent.clamp(3.5));
        assert_eq!(1., extent.clamp(f64::NAN));
        assert_eq!(8., extent.clamp(f64::INFINITY));
    }

    #[test]
    fn test_contains() {
        let extent = ScaleExtent::default();
        assert!(extent.contains(1.));
        assert!(extent.contains(8.));
        assert!(!extent.contains(8.01));
    }
}
