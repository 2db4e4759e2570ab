//! Approximate locations in Pune and Mumbai.
//!
//! Coordinates are rounded neighbourhood centres, close enough for
//! great-circle tests. The two cities sit roughly 120 km apart, so a
//! two-volunteer plan should split them cleanly.

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

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Pune
// ============================================================================

pub const PUNE_NGOS: &[Location] = &[
    Location::new("Shivajinagar Food Bank", 18.5308, 73.8475),
    Location::new("Kothrud Community Kitchen", 18.5074, 73.8077),
    Location::new("Hadapsar Relief Trust", 18.5089, 73.9260),
];

pub const PUNE_SHELTERS: &[Location] = &[
    Location::new("Swargate Night Shelter", 18.5018, 73.8636),
    Location::new("Yerawada Settlement", 18.5529, 73.8868),
    Location::new("Katraj Colony", 18.4575, 73.8677),
    Location::new("Aundh Camp", 18.5590, 73.8077),
];

pub const PUNE_DEPOT: Location = Location::new("Pune Station", 18.5286, 73.8743);

// ============================================================================
// Mumbai
// ============================================================================

pub const MUMBAI_NGOS: &[Location] = &[
    Location::new("Dadar Food Bank", 19.0178, 72.8478),
    Location::new("Andheri Community Kitchen", 19.1136, 72.8697),
];

pub const MUMBAI_SHELTERS: &[Location] = &[
    Location::new("Dharavi Relief Point", 19.0380, 72.8538),
    Location::new("Kurla Shelter", 19.0726, 72.8845),
    Location::new("Colaba Camp", 18.9067, 72.8147),
];

pub const MUMBAI_DEPOT: Location = Location::new("Mumbai Central", 18.9690, 72.8205);
