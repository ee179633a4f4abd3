//! Conversion from Mapbox response types to domain types.

use crate::domain::{Directions, LngLat, NO_ADDRESS, NO_POSTCODE, NO_SUBURB, PlaceCandidate};

use super::error::MapboxError;
use super::types::{DirectionsResponse, Feature, GeocodeResponse};

/// Text of the first context entry whose id contains `kind`.
fn context_text<'a>(feature: &'a Feature, kind: &str) -> Option<&'a str> {
    feature
        .context
        .iter()
        .find(|c| c.id.contains(kind))
        .map(|c| c.text.as_str())
        .filter(|t| !t.is_empty())
}

/// Convert one geocoding feature into a search candidate.
///
/// Missing address, suburb or postcode become placeholder text.
pub fn convert_feature(feature: &Feature) -> PlaceCandidate {
    let address = feature
        .properties
        .address
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(NO_ADDRESS);

    PlaceCandidate {
        display_name: feature.text.clone(),
        address: address.to_string(),
        suburb: context_text(feature, "locality")
            .unwrap_or(NO_SUBURB)
            .to_string(),
        postcode: context_text(feature, "postcode")
            .unwrap_or(NO_POSTCODE)
            .to_string(),
        coordinates: LngLat::from(feature.geometry.coordinates),
    }
}

/// Convert a geocoding response, keeping at most `limit` candidates.
pub fn convert_geocode(response: &GeocodeResponse, limit: usize) -> Vec<PlaceCandidate> {
    response
        .features
        .iter()
        .take(limit)
        .map(convert_feature)
        .collect()
}

/// Convert a directions response using its first route.
pub fn convert_directions(response: DirectionsResponse) -> Result<Directions, MapboxError> {
    let Some(route) = response.routes.into_iter().next() else {
        return Err(MapboxError::NoRoute {
            code: response.code.unwrap_or_else(|| "NoRoute".to_string()),
        });
    };

    let steps = route
        .legs
        .into_iter()
        .next()
        .map(|leg| {
            leg.steps
                .into_iter()
                .map(|s| s.maneuver.instruction)
                .filter(|i| !i.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(Directions {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry: route
            .geometry
            .coordinates
            .into_iter()
            .map(LngLat::from)
            .collect(),
        steps,
    })
}
