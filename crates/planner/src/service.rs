use std::sync::Arc;

use async_trait::async_trait;
use tripweave_shared::{
    DayPlan, District, Error, Itinerary, MapImage, MapPoint, PoiListing, Result, TripConfig,
};

use crate::SelectionSet;

/// Network-bound generation backend.
///
/// Every call may be slow and may fail. The planner never issues two calls
/// for the same logical key at once (destination and district for listings,
/// cache key for maps).
#[async_trait]
pub trait TravelService: Send + Sync {
    async fn list_districts(&self, city: &str) -> Result<Vec<District>>;

    async fn list_pois(&self, city: &str, district: &str) -> Result<PoiListing>;

    /// Turns the trip and the chosen points of interest into a day-keyed
    /// schedule. Malformed output is an `Error::Parse`, never a partial plan.
    async fn build_itinerary(
        &self,
        trip: &TripConfig,
        selections: &SelectionSet,
    ) -> Result<Itinerary>;

    /// Fails with `Error::EmptyInput` when the day has no activities.
    async fn render_day_map(&self, day: &DayPlan) -> Result<MapImage>;

    async fn render_overall_map(&self, itinerary: &Itinerary) -> Result<MapImage>;

    /// Raw answer of the model, `"Unknown"` when nothing is near the point.
    /// Use [`identify_city`] to get the distinguished `NotFound` error.
    async fn identify_location(&self, map: &MapImage, point: MapPoint) -> Result<String>;

    /// Clickable base map of a region, used to pick destinations.
    async fn render_region_map(&self, region: &str) -> Result<MapImage>;
}

#[async_trait]
impl TravelService for Arc<dyn TravelService> {
    async fn list_districts(&self, city: &str) -> Result<Vec<District>> {
        (**self).list_districts(city).await
    }

    async fn list_pois(&self, city: &str, district: &str) -> Result<PoiListing> {
        (**self).list_pois(city, district).await
    }

    async fn build_itinerary(
        &self,
        trip: &TripConfig,
        selections: &SelectionSet,
    ) -> Result<Itinerary> {
        (**self).build_itinerary(trip, selections).await
    }

    async fn render_day_map(&self, day: &DayPlan) -> Result<MapImage> {
        (**self).render_day_map(day).await
    }

    async fn render_overall_map(&self, itinerary: &Itinerary) -> Result<MapImage> {
        (**self).render_overall_map(itinerary).await
    }

    async fn identify_location(&self, map: &MapImage, point: MapPoint) -> Result<String> {
        (**self).identify_location(map, point).await
    }

    async fn render_region_map(&self, region: &str) -> Result<MapImage> {
        (**self).render_region_map(region).await
    }
}

pub async fn identify_city(
    service: &dyn TravelService,
    map: &MapImage,
    point: MapPoint,
) -> Result<String> {
    let answer = service.identify_location(map, point).await?;
    let city = answer.trim().trim_matches(|c| c == '\'' || c == '"' || c == '.');

    if city.is_empty() || city.eq_ignore_ascii_case("unknown") {
        return Err(Error::NotFound);
    }

    Ok(city.to_owned())
}
