//! Distance-compression functions.

/// Monotonic transform applied to magnitudes before measuring distance.
///
/// Large counts differ by large absolute amounts even when they are "about the
/// same size"; compressing them first lets `1, 2, 3` and `1000, 1100` both read
/// as tight groups.
///
/// Values are shifted by one before smoothing (`smooth(x + 1)`), so zero is a
/// valid input for [`Smoothing::Ln`].
#[derive(Debug, Clone, Copy, Default)]
pub enum Smoothing {
    /// Natural logarithm.
    #[default]
    Ln,
    /// Square root.
    Sqrt,
    /// No compression; plain absolute difference.
    Identity,
    /// Caller-supplied transform. Should be monotonic on the data's domain.
    Custom(fn(f64) -> f64),
}

impl Smoothing {
    /// Apply the raw transform.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Smoothing::Ln => x.ln(),
            Smoothing::Sqrt => x.sqrt(),
            Smoothing::Identity => x,
            Smoothing::Custom(f) => f(x),
        }
    }

    /// Distance between two magnitudes after smoothing.
    #[inline]
    pub fn distance(&self, a: f64, b: f64) -> f64 {
        (self.apply(a + 1.0) - self.apply(b + 1.0)).abs()
    }

    /// Whether the transform is known to be monotonic.
    ///
    /// Custom transforms are not assumed to be.
    pub fn is_monotonic(&self) -> bool {
        !matches!(self, Smoothing::Custom(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_shifts_by_one() {
        assert_eq!(Smoothing::Ln.distance(0.0, 0.0), 0.0);
        assert!((Smoothing::Ln.distance(0.0, 1.0) - 2f64.ln()).abs() < 1e-12);
        assert!((Smoothing::Sqrt.distance(3.0, 0.0) - 1.0).abs() < 1e-12);
        assert_eq!(Smoothing::Identity.distance(2.0, 7.0), 5.0);
    }

    #[test]
    fn test_custom() {
        let cube = Smoothing::Custom(|x| x * x * x);
        assert_eq!(cube.apply(2.0), 8.0);
        assert!(!cube.is_monotonic());
        assert!(Smoothing::default().is_monotonic());
    }
}
