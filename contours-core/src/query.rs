//! The coordinate and radius a building search is centred on.

use std::fmt;

use geo::Coord;
use thiserror::Error;

/// Search radius used when callers do not supply one.
pub const DEFAULT_RADIUS_METRES: f64 = 800.0;

/// A validated search centre with its radius.
///
/// Geographic coordinates follow the `geo` convention used across the
/// workspace: `x` is the longitude and `y` is the latitude.
///
/// # Examples
///
/// ```
/// use contours_core::QueryPoint;
///
/// # fn main() -> Result<(), contours_core::QueryPointError> {
/// let point = QueryPoint::new(32.0853, 34.7818)?;
/// assert_eq!(point.radius_metres(), 800.0);
/// assert_eq!(point.to_string(), "(32.0853, 34.7818) within 800 m");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    lat: f64,
    lon: f64,
    radius_metres: f64,
}

/// Errors returned by [`QueryPoint::new`] and [`QueryPoint::with_radius`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueryPointError {
    /// Latitude was not finite or outside `[-90, 90]`.
    #[error("latitude {0} must be a finite value between -90 and 90")]
    InvalidLatitude(f64),
    /// Longitude was not finite or outside `[-180, 180]`.
    #[error("longitude {0} must be a finite value between -180 and 180")]
    InvalidLongitude(f64),
    /// Radius was not a finite, strictly positive distance.
    #[error("search radius {0} must be a positive number of metres")]
    InvalidRadius(f64),
}

impl QueryPoint {
    /// Validates and constructs a [`QueryPoint`] with the default radius.
    pub fn new(lat: f64, lon: f64) -> Result<Self, QueryPointError> {
        Self::with_radius(lat, lon, DEFAULT_RADIUS_METRES)
    }

    /// Validates and constructs a [`QueryPoint`] with an explicit radius.
    pub fn with_radius(lat: f64, lon: f64, radius_metres: f64) -> Result<Self, QueryPointError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(QueryPointError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(QueryPointError::InvalidLongitude(lon));
        }
        if !radius_metres.is_finite() || radius_metres <= 0.0 {
            return Err(QueryPointError::InvalidRadius(radius_metres));
        }
        Ok(Self {
            lat,
            lon,
            radius_metres,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius_metres(&self) -> f64 {
        self.radius_metres
    }

    /// The centre as a `geo` coordinate (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

impl fmt::Display for QueryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}) within {} m",
            self.lat, self.lon, self.radius_metres
        )
    }
}
