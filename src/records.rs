//! Plain record types for donors, recipients and volunteers.

use serde::{Deserialize, Serialize};

use crate::traits::{Donor, Recipient, Volunteer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub food_availability: f64,
}

impl DonorRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: (f64, f64), food_availability: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: location.0,
            longitude: location.1,
            food_availability,
        }
    }
}

impl Donor for DonorRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    fn food_availability(&self) -> f64 {
        self.food_availability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub people_in_need: u32,
}

impl RecipientRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: (f64, f64), people_in_need: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: location.0,
            longitude: location.1,
            people_in_need,
        }
    }
}

impl Recipient for RecipientRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    fn people_in_need(&self) -> u32 {
        self.people_in_need
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
}

fn default_vehicle_type() -> String {
    "car".to_string()
}

impl VolunteerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: location.0,
            longitude: location.1,
            vehicle_type: default_vehicle_type(),
        }
    }

    pub fn with_vehicle(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = vehicle_type.into();
        self
    }
}

impl Volunteer for VolunteerRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn start_location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_location_is_lat_lng() {
        let donor = DonorRecord::new("n1", "Annapurna Trust", (18.52, 73.85), 120.0);
        assert_eq!(donor.location(), (18.52, 73.85));
        assert_eq!(donor.food_availability(), 120.0);
    }

    #[test]
    fn test_volunteer_defaults_to_car() {
        let volunteer = VolunteerRecord::new("v1", "Asha", (18.5, 73.8));
        assert_eq!(volunteer.vehicle_type(), "car");

        let volunteer = volunteer.with_vehicle("scooter");
        assert_eq!(volunteer.vehicle_type(), "scooter");
    }
}
