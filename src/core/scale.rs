use crate::core::domain::NumericDomain;
use crate::error::{ChartError, ChartResult};

/// Continuous linear mapping from a numeric domain onto a pixel range.
///
/// The range may be reversed (`[bottom, top]`) for upward-growing value axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    pub fn from_domain(domain: NumericDomain, range_start: f64, range_end: f64) -> ChartResult<Self> {
        Self::new(domain.min, domain.max, range_start, range_end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Inverse of `domain_to_pixel`. A zero-width range maps to the domain start.
    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Extends the domain outwards to round tick boundaries.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (start, end) = nice_bounds(self.domain_start, self.domain_end, count);
        Self {
            domain_start: start,
            domain_end: end,
            ..self
        }
    }

    /// Round tick values inside the domain, roughly `count` of them.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        tick_values(self.domain_start, self.domain_end, count)
    }

    #[must_use]
    pub fn tick_step(self, count: usize) -> f64 {
        let (lo, hi) = ordered(self.domain_start, self.domain_end);
        tick_increment(lo, hi, count)
    }
}

/// Square-root mapping used for area-proportional symbols.
///
/// Visual area, not radius, grows linearly with the input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl SqrtScale {
    /// Domain `[0, domain_max]` onto `[range_min, range_max]`.
    pub fn new(domain_max: f64, range_min: f64, range_max: f64) -> ChartResult<Self> {
        if !domain_max.is_finite() || domain_max <= 0.0 {
            return Err(ChartError::InvalidData(
                "sqrt scale domain max must be finite and > 0".to_owned(),
            ));
        }
        if !range_min.is_finite() || !range_max.is_finite() || range_min < 0.0 {
            return Err(ChartError::InvalidData(
                "sqrt scale range must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            domain_max,
            range_min,
            range_max,
        })
    }

    #[must_use]
    pub fn domain_max(self) -> f64 {
        self.domain_max
    }

    /// Maps a value; negative inputs clamp to the range start.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let normalized = (value.max(0.0) / self.domain_max).sqrt();
        self.range_min + normalized * (self.range_max - self.range_min)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Step between round ticks: `1`, `2` or `5` times a power of ten.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start).abs() / count.max(1) as f64;
    if !step.is_finite() || step == 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * 10_f64.powf(power)
}

/// Round tick values within `[start, stop]`, ordered like the inputs.
#[must_use]
pub fn tick_values(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = ordered(start, stop);
    let step = tick_increment(lo, hi, count);
    if step == 0.0 {
        return vec![lo];
    }

    // Dividing by the inverse step keeps fractional ticks exact (0.1, 0.2, ...).
    let inverse = if step < 1.0 { Some((1.0 / step).round()) } else { None };
    let to_index = |value: f64| match inverse {
        Some(inv) => value * inv,
        None => value / step,
    };
    let from_index = |index: i64| match inverse {
        Some(inv) => index as f64 / inv,
        None => index as f64 * step,
    };

    let first = to_index(lo).ceil() as i64;
    let last = to_index(hi).floor() as i64;
    let mut ticks: Vec<f64> = (first..=last).map(from_index).collect();
    if start > stop {
        ticks.reverse();
    }
    ticks
}

/// Widens `[start, stop]` to tick boundaries, iterating until stable.
#[must_use]
pub fn nice_bounds(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let reversed = start > stop;
    let (mut lo, mut hi) = ordered(start, stop);
    let mut previous_step = None;
    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if step == 0.0 || previous_step == Some(step) {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
        previous_step = Some(step);
    }
    if reversed { (hi, lo) } else { (lo, hi) }
}
