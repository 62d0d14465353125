//! Great-circle geometry.
//!
//! Distances are computed on a sphere with the mean Earth radius. This ignores
//! roads entirely; use a road-network [`DistanceSource`] when that matters.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::traits::DistanceSource;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Check the range, reporting `index` as the offending position.
    pub fn validate(&self, index: usize) -> Result<(), EngineError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(EngineError::InvalidCoordinate {
                index,
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1.0 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Straight-line distance source. Every pair of points is connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistances;

impl DistanceSource for HaversineDistances {
    fn distances_for(&self, locations: &[Coordinate]) -> Result<Vec<Vec<Option<f64>>>, EngineError> {
        let n = locations.len();
        let mut matrix = vec![vec![Some(0.0); n]; n];

        for i in 0..n {
            for j in i + 1..n {
                let km = distance_km(locations[i], locations[j]);
                matrix[i][j] = Some(km);
                matrix[j][i] = Some(km);
            }
        }

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAN_FRANCISCO: Coordinate = Coordinate::new(37.7749, -122.4194);
    const OAKLAND: Coordinate = Coordinate::new(37.8044, -122.2712);

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(SAN_FRANCISCO, SAN_FRANCISCO), 0.0);
        let pole = Coordinate::new(90.0, 0.0);
        assert_eq!(distance_km(pole, pole), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let there = distance_km(SAN_FRANCISCO, OAKLAND);
        let back = distance_km(OAKLAND, SAN_FRANCISCO);
        assert!((there - back).abs() < 1e-12);
    }

    #[test]
    fn test_known_distance() {
        // Las Vegas to Los Angeles is roughly 370 km
        let dist = distance_km(Coordinate::new(36.17, -115.14), Coordinate::new(34.05, -118.24));
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        let dist = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(dist.is_finite());
        assert!((dist - half).abs() < 1e-6, "got {}", dist);

        let poles = distance_km(Coordinate::new(90.0, 0.0), Coordinate::new(-90.0, 0.0));
        assert!((poles - half).abs() < 1e-6, "got {}", poles);
    }

    #[test]
    fn test_pole_longitude_is_irrelevant() {
        let a = Coordinate::new(90.0, 0.0);
        let b = Coordinate::new(90.0, 135.0);
        assert!(distance_km(a, b) < 1e-6);
    }

    #[test]
    fn test_validate_rejects_nan_and_out_of_range() {
        assert!(SAN_FRANCISCO.validate(0).is_ok());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());

        let err = Coordinate::new(91.0, 0.0).validate(3).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCoordinate { index: 3, .. }));
        assert!(Coordinate::new(0.0, -180.5).validate(0).is_err());
    }

    #[test]
    fn test_matrix_diagonal_is_zero_and_symmetric() {
        let locations = vec![SAN_FRANCISCO, OAKLAND, Coordinate::new(37.3861, -122.0839)];
        let matrix = HaversineDistances.distances_for(&locations).unwrap();

        for i in 0..locations.len() {
            assert_eq!(matrix[i][i], Some(0.0), "Diagonal should be zero");
            for j in 0..locations.len() {
                assert_eq!(matrix[i][j], matrix[j][i], "Matrix should be symmetric");
            }
        }
    }

    #[test]
    fn test_matrix_of_nothing_is_empty() {
        assert!(HaversineDistances.distances_for(&[]).unwrap().is_empty());
    }
}
