//! Builder-style test records with sensible defaults.

use relief_planner::traits::{Donor, Recipient, Volunteer};

#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct TestId(pub String);

impl TestId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct TestDonor {
    pub id: TestId,
    pub location: (f64, f64),
    pub supply: f64,
}

impl TestDonor {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            location: (0.0, 0.0),
            supply: 10.0,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = (lat, lng);
        self
    }

    pub fn supply(mut self, supply: f64) -> Self {
        self.supply = supply;
        self
    }
}

impl Donor for TestDonor {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        self.location
    }

    fn food_availability(&self) -> f64 {
        self.supply
    }
}

#[derive(Clone, Debug)]
pub struct TestRecipient {
    pub id: TestId,
    pub location: (f64, f64),
    pub need: u32,
}

impl TestRecipient {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            location: (0.0, 0.0),
            need: 10,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = (lat, lng);
        self
    }

    pub fn need(mut self, need: u32) -> Self {
        self.need = need;
        self
    }
}

impl Recipient for TestRecipient {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn location(&self) -> (f64, f64) {
        self.location
    }

    fn people_in_need(&self) -> u32 {
        self.need
    }
}

#[derive(Clone, Debug)]
pub struct TestVolunteer {
    pub id: TestId,
    pub location: (f64, f64),
}

impl TestVolunteer {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            location: (0.0, 0.0),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = (lat, lng);
        self
    }
}

impl Volunteer for TestVolunteer {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn start_location(&self) -> (f64, f64) {
        self.location
    }

    fn vehicle_type(&self) -> &str {
        "bicycle"
    }
}
