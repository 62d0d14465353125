//! Named real-world locations.
//!
//! Bay Area points are the depot/customer set used for distance checks.
//! Las Vegas points match the Nevada OSRM extract used by the road-network
//! integration test.

use fleet_router::job::Destination;
use fleet_router::traits::Waypoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.name, self.lat, self.lng)
    }

    pub fn destination(&self, demand: f64) -> Destination {
        Destination::new(self.name, self.lat, self.lng, demand)
    }
}

// ============================================================================
// San Francisco Bay Area
// ============================================================================

pub const SAN_FRANCISCO: Location = Location::new("San Francisco", 37.7749, -122.4194);
pub const OAKLAND: Location = Location::new("Oakland", 37.8044, -122.2712);
pub const MOUNTAIN_VIEW: Location = Location::new("Mountain View", 37.3861, -122.0839);
pub const DALY_CITY: Location = Location::new("Daly City", 37.6879, -122.4702);

/// Depot first, then the three customers.
pub const BAY_AREA: &[Location] = &[SAN_FRANCISCO, OAKLAND, MOUNTAIN_VIEW, DALY_CITY];

pub const BAY_AREA_EXTRA: &[Location] = &[
    Location::new("Berkeley", 37.8715, -122.2730),
    Location::new("San Mateo", 37.5630, -122.3255),
    Location::new("Palo Alto", 37.4419, -122.1430),
    Location::new("Fremont", 37.5485, -121.9886),
    Location::new("San Jose", 37.3382, -121.8863),
    Location::new("Richmond", 37.9358, -122.3477),
    Location::new("Hayward", 37.6688, -122.0808),
    Location::new("Sausalito", 37.8591, -122.4853),
];

// ============================================================================
// Las Vegas (Nevada OSRM extract)
// ============================================================================

pub const LAS_VEGAS: &[Location] = &[
    Location::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Location::new("MGM Grand", 36.1023654, -115.1688720),
    Location::new("Bellagio", 36.1126, -115.1767),
    Location::new("Beers and Bets", 36.1428945, -115.1573836),
    Location::new("Bootlegger Bistro", 36.0492047, -115.1715744),
    Location::new("Sunset Station Area", 36.0614, -115.0631),
];

/// All Bay Area locations, depot first.
pub fn bay_area_all() -> Vec<Location> {
    let mut all = BAY_AREA.to_vec();
    all.extend_from_slice(BAY_AREA_EXTRA);
    all
}

pub fn waypoints(locations: &[Location]) -> Vec<Waypoint> {
    locations.iter().map(Location::waypoint).collect()
}
