//! Value-to-pixel scales

/// Maps a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        self.range.0 + (self.range.1 - self.range.0) * t as f32
    }

    pub fn invert(&self, px: f32) -> f64 {
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { ((px - r0) / span) as f64 };
        self.domain.0 + (self.domain.1 - self.domain.0) * t
    }

    /// Domain visible after the pixel range is scaled by `k` and shifted by `offset`
    pub fn rescale(&self, k: f32, offset: f32) -> Self {
        let r0 = (self.range.0 - offset) / k;
        let r1 = (self.range.1 - offset) / k;
        Self {
            domain: (self.invert(r0), self.invert(r1)),
            range: self.range,
        }
    }

    /// Extend the domain outward to round tick values
    pub fn nice(mut self, count: usize) -> Self {
        let (lo, hi) = self.domain;
        let step = tick_step(lo, hi, count);
        if step > 0.0 && step.is_finite() {
            self.domain = ((lo / step).floor() * step, (hi / step).ceil() * step);
        }
        self
    }

    /// Roughly `count` round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let step = tick_step(lo, hi, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` intervals
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let span = (hi - lo).abs();
    if span == 0.0 || count == 0 {
        return 0.0;
    }
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let err = raw / power;
    let factor = if err >= 7.07 {
        10.0
    } else if err >= 3.16 {
        5.0
    } else if err >= 1.41 {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Evenly spaced bands for categorical axes
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    pub domain: Vec<String>,
    pub range: (f32, f32),
    /// Fraction of each step left empty between bands
    pub padding: f32,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f32, f32), padding: f32) -> Self {
        Self {
            domain,
            range,
            padding: padding.clamp(0.0, 0.95),
        }
    }

    pub fn step(&self) -> f32 {
        let n = self.domain.len().max(1) as f32;
        (self.range.1 - self.range.0) / n
    }

    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding)
    }

    /// Start of the band at `index`
    pub fn position(&self, index: usize) -> f32 {
        self.range.0 + self.step() * index as f32 + self.step() * self.padding / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map_and_invert() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 500.0));
        assert_eq!(s.map(50.0), 250.0);
        assert_eq!(s.invert(250.0), 50.0);

        let inverted = LinearScale::new((0.0, 10.0), (400.0, 0.0));
        assert_eq!(inverted.map(10.0), 0.0);
    }

    #[test]
    fn test_rescale_under_zoom() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 100.0));
        let zoomed = s.rescale(2.0, -50.0);
        assert!((zoomed.domain.0 - 25.0).abs() < 1e-9);
        assert!((zoomed.domain.1 - 75.0).abs() < 1e-9);
        assert_eq!(s.rescale(1.0, 0.0), s);
    }

    #[test]
    fn test_ticks_are_round() {
        let s = LinearScale::new((0.0, 97.0), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain, (0.0, 100.0));
        assert_eq!(s.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_degenerate_domain() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(s.map(5.0), 5.0);
        assert_eq!(s.ticks(5), vec![5.0]);
    }

    #[test]
    fn test_band_positions() {
        let b = BandScale::new(vec!["a".into(), "b".into()], (0.0, 100.0), 0.2);
        assert_eq!(b.step(), 50.0);
        assert_eq!(b.bandwidth(), 40.0);
        assert_eq!(b.position(1), 55.0);
    }
}
