//! # Geo Module
//!
//! Great-circle distances between buyers and shops.
//!
//! ## Haversine Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)                   │
//! │  c = 2·atan2(√a, √(1−a))                                               │
//! │  d = R·c            R = 6371.0 km                                      │
//! │                                                                         │
//! │  `a` is clamped to [0, 1]: floating-point overshoot near antipodal     │
//! │  points would otherwise make √(1−a) NaN.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Degree ranges are not validated. A latitude of 120° goes through the
//! formula and yields a well-defined but geographically meaningless number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Haversine
// =============================================================================

/// Great-circle distance in kilometres between two points given in decimal
/// degrees.
///
/// Never panics. Non-finite inputs produce a non-finite result.
///
/// ## Example
/// ```rust
/// use shopcart_core::geo::haversine_km;
///
/// let d = haversine_km(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111.19).abs() < 0.01);
/// assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

// =============================================================================
// GeoPoint
// =============================================================================

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point without any checks.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting NaN and infinite coordinates.
    ///
    /// Out-of-range degrees are still accepted.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "latitude".to_string(),
            });
        }
        if !longitude.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "longitude".to_string(),
            });
        }
        Ok(GeoPoint::new(latitude, longitude))
    }

    /// Haversine distance to another point in kilometres.
    #[inline]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"`.
impl FromStr for GeoPoint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| ValidationError::InvalidFormat {
            field: "point".to_string(),
            reason: "expected 'lat,lon'".to_string(),
        })?;

        let parse = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: e.to_string(),
                })
        };

        GeoPoint::try_new(parse("latitude", lat)?, parse("longitude", lon)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
