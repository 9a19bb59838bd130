use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, finite};
use crate::error::{ChartError, ChartResult};

/// Span used when every observed value is identical.
pub const DEGENERATE_DOMAIN_SPAN: f64 = 1.0;

/// Explicit bounds that replace the automatically derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainOverrides {
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

impl DomainOverrides {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_value: None,
            max_value: None,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [("min_value", self.min_value), ("max_value", self.max_value)] {
            if matches!(value, Some(v) if !v.is_finite()) {
                return Err(ChartError::InvalidSettings(format!(
                    "`{name}` must be finite when set"
                )));
            }
        }
        Ok(self)
    }
}

/// Closed numeric interval fed to a scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    /// Builds a domain from explicit bounds, padding a zero-width interval.
    pub fn from_bounds(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "domain bounds must be finite".to_owned(),
            ));
        }
        let (min, max) = pad_degenerate(min, max);
        Ok(Self { min, max })
    }

    /// Zero-anchored domain over the present values.
    ///
    /// Lower bound is `0` when every value is `>= 0`, otherwise the observed
    /// minimum. Upper bound is the observed maximum, or `0` when every value
    /// is `<= 0`. Overrides win unconditionally. Returns `None` when nothing
    /// is observed and the overrides do not pin both bounds.
    pub fn zero_anchored<I>(values: I, overrides: DomainOverrides) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let observed = observed_extent(values);
        let (min, max) = match (observed, overrides.min_value, overrides.max_value) {
            (_, Some(min), Some(max)) => (min, max),
            (Some((lo, hi)), min, max) => (
                min.unwrap_or(if lo >= 0.0 { 0.0 } else { lo }),
                max.unwrap_or(if hi <= 0.0 { 0.0 } else { hi }),
            ),
            (None, _, _) => return None,
        };
        Self::from_bounds(min, max).ok()
    }

    /// Extent of the present values without zero anchoring.
    pub fn observed<I>(values: I, overrides: DomainOverrides) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let observed = observed_extent(values);
        let (min, max) = match (observed, overrides.min_value, overrides.max_value) {
            (_, Some(min), Some(max)) => (min, max),
            (Some((lo, hi)), min, max) => (min.unwrap_or(lo), max.unwrap_or(hi)),
            (None, _, _) => return None,
        };
        Self::from_bounds(min, max).ok()
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Clamps `value` into the domain, whichever way round its bounds are.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min.min(self.max), self.min.max(self.max))
    }
}

fn observed_extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .filter_map(finite)
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

fn pad_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }
    if min == 0.0 {
        return (0.0, DEGENERATE_DOMAIN_SPAN);
    }
    let half = (min.abs() * 0.5).max(DEGENERATE_DOMAIN_SPAN * 0.5);
    if min > 0.0 {
        (0.0_f64.max(min - half), max + half)
    } else {
        (min - half, 0.0_f64.min(max + half))
    }
}

/// Ordered, de-duplicated list of category keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoricalDomain {
    keys: IndexSet<String>,
}

impl CategoricalDomain {
    #[must_use]
    pub fn explicit<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Distinct `color` keys in first-seen order.
    #[must_use]
    pub fn from_colors(points: &[DataPoint]) -> Self {
        Self::explicit(points.iter().filter_map(|point| point.color.clone()))
    }

    /// Explicit keys when supplied, otherwise keys derived from the data.
    #[must_use]
    pub fn resolve(explicit: Option<&[String]>, points: &[DataPoint]) -> Self {
        match explicit {
            Some(keys) => Self::explicit(keys.iter().cloned()),
            None => Self::from_colors(points),
        }
    }

    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.keys.get_index(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }
}
