use time::Date;
use tripweave_shared::{Destination, MapImage, MapPoint, Result};

use crate::{Event, TravelService};

/// Destinations and dates collected before the trip is submitted.
#[derive(Debug, Default)]
pub struct TripDraft {
    destinations: Vec<Destination>,
    start: Option<Date>,
    end: Option<Date>,
}

impl TripDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a destination. Blank names are ignored and return `None`.
    pub fn add_destination(&mut self, name: &str) -> Result<Option<&Destination>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if self.destinations.iter().any(|d| d.same_name(name)) {
            tripweave_shared::validation!("{name} is already in your itinerary.");
        }

        self.destinations.push(Destination::new(name));

        Ok(self.destinations.last())
    }

    /// Identifies the city under a click on the base map and adds it.
    pub async fn add_from_map(
        &mut self,
        service: &dyn TravelService,
        map: &MapImage,
        point: MapPoint,
    ) -> Result<&Destination> {
        let city = crate::identify_city(service, map, point).await?;
        tracing::debug!(%city, x = point.x, y = point.y, "identified city on map");

        match self.add_destination(&city)? {
            Some(destination) => Ok(destination),
            None => Err(tripweave_shared::Error::NotFound),
        }
    }

    pub fn remove_destination(&mut self, id: &str) {
        self.destinations.retain(|d| d.id != id);
    }

    pub fn set_dates(&mut self, start: Option<Date>, end: Option<Date>) {
        self.start = start;
        self.end = end;
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn into_event(self) -> Event {
        Event::SubmitConfig {
            destinations: self.destinations,
            start: self.start,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_case_insensitive() {
        let mut draft = TripDraft::new();
        draft.add_destination("Beijing").unwrap();

        let err = draft.add_destination("  beijing ").unwrap_err();
        assert_eq!(err.to_string(), "beijing is already in your itinerary.");
        assert_eq!(draft.destinations().len(), 1);
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let mut draft = TripDraft::new();
        assert!(draft.add_destination("   ").unwrap().is_none());
        assert!(draft.destinations().is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let mut draft = TripDraft::new();
        let id = draft.add_destination("Xi'an").unwrap().unwrap().id.to_owned();
        draft.add_destination("Chengdu").unwrap();

        draft.remove_destination(&id);
        draft.remove_destination("missing");

        let names: Vec<_> = draft.destinations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Chengdu"]);
    }
}
