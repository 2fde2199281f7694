use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

pub const RESTAURANT: GeoPoint = GeoPoint {
    lat: 12.9279,
    lng: 77.6271,
};
pub const DROPOFF: GeoPoint = GeoPoint {
    lat: 12.9716,
    lng: 77.5946,
};

pub const ROUTE_STEPS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            origin: RESTAURANT,
            destination: DROPOFF,
        }
    }
}

impl Route {
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            origin,
            destination,
        }
    }

    pub fn lat_step(&self) -> f64 {
        (self.destination.lat - self.origin.lat) / ROUTE_STEPS as f64
    }

    pub fn lng_step(&self) -> f64 {
        (self.destination.lng - self.origin.lng) / ROUTE_STEPS as f64
    }

    pub fn position_at(&self, step: u32) -> GeoPoint {
        GeoPoint {
            lat: self.origin.lat + step as f64 * self.lat_step(),
            lng: self.origin.lng + step as f64 * self.lng_step(),
        }
    }

    pub fn progress_index(&self, position: GeoPoint) -> u32 {
        ((position.lat - self.origin.lat) / self.lat_step()).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    EnRoute(GeoPoint),
    Arrived(GeoPoint),
}

impl Step {
    pub fn position(&self) -> GeoPoint {
        match self {
            Step::EnRoute(point) | Step::Arrived(point) => *point,
        }
    }

    pub fn is_arrived(&self) -> bool {
        matches!(self, Step::Arrived(_))
    }
}

pub fn advance(current: GeoPoint, route: &Route) -> Step {
    if route.progress_index(current) >= ROUTE_STEPS - 1 {
        return Step::Arrived(route.destination);
    }

    Step::EnRoute(GeoPoint {
        lat: current.lat + route.lat_step(),
        lng: current.lng + route.lng_step(),
    })
}
