use serde::Serialize;

use crate::geo::{GeoPoint, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Restaurant,
    Dropoff,
    Agent,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub title: &'static str,
    pub position: GeoPoint,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    pub markers: Vec<Marker>,
    pub route_line: [GeoPoint; 2],
}

pub fn track_view(route: &Route, agent: Option<GeoPoint>) -> TrackView {
    let mut markers = vec![
        Marker {
            kind: MarkerKind::Restaurant,
            title: "Restaurant",
            position: route.origin,
        },
        Marker {
            kind: MarkerKind::Dropoff,
            title: "Your Location",
            position: route.destination,
        },
    ];
    if let Some(position) = agent {
        markers.push(Marker {
            kind: MarkerKind::Agent,
            title: "Delivery Agent",
            position,
        });
    }

    TrackView {
        markers,
        route_line: [route.origin, route.destination],
    }
}
