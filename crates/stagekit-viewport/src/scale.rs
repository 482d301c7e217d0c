//! One-dimensional linear scales.
//!
//! A [`LinearScale`] maps a world-space domain onto a pixel range. Its
//! [`inverse`](LinearScale::inverse) swaps the two, so the four maps a
//! viewport needs are always built from the same pair of spans.

use stagekit_core::MapperError;

/// Linear map from `domain` onto `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

fn check_span(axis: &'static str, [start, end]: [f64; 2]) -> Result<(), MapperError> {
    let span = end - start;
    if span == 0.0 || !span.is_finite() {
        return Err(MapperError::DegenerateSpan { axis, start, end });
    }
    Ok(())
}

impl LinearScale {
    /// Build a scale; both spans must be non-zero and finite.
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Result<Self, MapperError> {
        check_span("domain", domain)?;
        check_span("range", range)?;
        Ok(Self { domain, range })
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Domain value to range value.
    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        r0 + (v - d0) * (r1 - r0) / (d1 - d0)
    }

    /// Range value back to domain value.
    #[inline]
    pub fn invert(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        d0 + (v - r0) * (d1 - d0) / (r1 - r0)
    }

    /// The scale with domain and range swapped.
    pub fn inverse(&self) -> Self {
        Self {
            domain: self.range,
            range: self.domain,
        }
    }

    /// Mapped length of a domain distance, always non-negative.
    pub fn length(&self, distance: f64) -> f64 {
        (self.map(0.0) - self.map(distance)).abs()
    }

    /// Tick step of the form 1, 2, or 5 times a power of ten.
    ///
    /// Chooses the step whose tick count lands closest to `count` over
    /// `span`.
    pub fn tick_step(span: f64, count: usize) -> f64 {
        let count = count.max(1) as f64;
        let span = span.abs();
        let mut step = 10f64.powi((span / count).log10().floor() as i32);
        let err = count / span * step;
        if err <= 0.15 {
            step *= 10.0;
        } else if err <= 0.35 {
            step *= 5.0;
        } else if err <= 0.75 {
            step *= 2.0;
        }
        step
    }

    /// Roughly `count` evenly spaced round values inside the domain, ascending.
    ///
    /// Values are integer multiples of the step so they do not drift.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        let step = Self::tick_step(hi - lo, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_and_invert() {
        let scale = LinearScale::new([-1_000_000.0, 1_000_000.0], [0.0, 500.0]).unwrap();
        assert_eq!(scale.map(0.0), 250.0);
        assert_eq!(scale.map(-1_000_000.0), 0.0);
        assert_eq!(scale.invert(500.0), 1_000_000.0);
        assert_eq!(scale.inverse().map(250.0), 0.0);
    }

    #[test]
    fn test_reversed_domain() {
        let scale = LinearScale::new([1_000_000.0, -1_000_000.0], [0.0, 500.0]).unwrap();
        assert_eq!(scale.map(1_000_000.0), 0.0);
        assert_eq!(scale.map(-1_000_000.0), 500.0);
    }

    #[test]
    fn test_degenerate_spans_fail() {
        assert!(matches!(
            LinearScale::new([1.0, 1.0], [0.0, 500.0]),
            Err(MapperError::DegenerateSpan { axis: "domain", .. })
        ));
        assert!(matches!(
            LinearScale::new([0.0, 1.0], [0.0, 0.0]),
            Err(MapperError::DegenerateSpan { axis: "range", .. })
        ));
        assert!(LinearScale::new([0.0, f64::INFINITY], [0.0, 1.0]).is_err());
    }

    #[test]
    fn test_length() {
        let scale = LinearScale::new([-1_000_000.0, 1_000_000.0], [0.0, 500.0]).unwrap();
        assert_eq!(scale.length(400_000.0), 100.0);
        assert_eq!(scale.length(-400_000.0), 100.0);
    }

    #[test]
    fn test_default_ticks() {
        let scale = LinearScale::new([-1_000_000.0, 1_000_000.0], [0.0, 500.0]).unwrap();
        let ticks = scale.ticks(8);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], -1_000_000.0);
        assert_eq!(ticks[10], 1_000_000.0);
        assert_eq!(ticks[1] - ticks[0], 200_000.0);
    }

    #[test]
    fn test_ticks_odd_domain() {
        let scale = LinearScale::new([-130.0, 870.0], [0.0, 100.0]).unwrap();
        let ticks = scale.ticks(8);
        assert_eq!(ticks.first(), Some(&-100.0));
        assert_eq!(ticks.last(), Some(&800.0));
        assert!(ticks.windows(2).all(|w| w[1] > w[0]));
    }
}
