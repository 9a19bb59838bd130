use serde::{Deserialize, Serialize};

use crate::core::types::PlotArea;
use crate::error::{ChartError, ChartResult};

/// Mercator is undefined at the poles; latitudes are clamped to this.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_78;

const EQUAL_EARTH_A1: f64 = 1.340_264;
const EQUAL_EARTH_A2: f64 = -0.081_106;
const EQUAL_EARTH_A3: f64 = 0.000_893;
const EQUAL_EARTH_A4: f64 = 0.003_796;

/// Cartographic projection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Equal-area pseudocylindrical projection used for whole-world maps.
    #[default]
    EqualEarth,
    Mercator,
}

impl Projection {
    /// Projects degrees onto the unit plane, y pointing north.
    #[must_use]
    pub fn raw(self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = lon.to_radians();
        match self {
            Self::EqualEarth => {
                let m = 3_f64.sqrt() / 2.0;
                let theta = (m * lat.to_radians().sin()).asin();
                let t2 = theta * theta;
                let t6 = t2 * t2 * t2;
                let x = lambda * theta.cos()
                    / (m * (EQUAL_EARTH_A1
                        + 3.0 * EQUAL_EARTH_A2 * t2
                        + t6 * (7.0 * EQUAL_EARTH_A3 + 9.0 * EQUAL_EARTH_A4 * t2)));
                let y = theta
                    * (EQUAL_EARTH_A1 + EQUAL_EARTH_A2 * t2 + t6 * (EQUAL_EARTH_A3 + EQUAL_EARTH_A4 * t2));
                (x, y)
            }
            Self::Mercator => {
                let phi = lat
                    .clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE)
                    .to_radians();
                let y = (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln();
                (lambda, y)
            }
        }
    }
}

/// A projection scaled and translated to fit a plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedProjection {
    kind: Projection,
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl FittedProjection {
    /// Fits the projected bounds of `coordinates` into `plot`, preserving
    /// aspect ratio and centering the result.
    pub fn fit_extent<I>(kind: Projection, coordinates: I, plot: PlotArea) -> ChartResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (lon, lat) in coordinates {
            if !lon.is_finite() || !lat.is_finite() {
                continue;
            }
            let (x, y) = kind.raw(lon, lat);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        let Some((x0, y0, x1, y1)) = bounds else {
            return Err(ChartError::InvalidData(
                "cannot fit a projection to empty geometry".to_owned(),
            ));
        };

        let (width, height) = (x1 - x0, y1 - y0);
        let scale = match (width > 0.0, height > 0.0) {
            (true, true) => (plot.width / width).min(plot.height / height),
            (true, false) => plot.width / width,
            (false, true) => plot.height / height,
            (false, false) => 1.0,
        };
        let (center_x, center_y) = plot.center();
        Ok(Self {
            kind,
            scale,
            translate_x: center_x - scale * (x0 + x1) / 2.0,
            translate_y: center_y + scale * (y0 + y1) / 2.0,
        })
    }

    #[must_use]
    pub fn kind(self) -> Projection {
        self.kind
    }

    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// Degrees to pixels (y grows downwards).
    #[must_use]
    pub fn project(self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.kind.raw(lon, lat);
        (
            self.translate_x + x * self.scale,
            self.translate_y - y * self.scale,
        )
    }
}
