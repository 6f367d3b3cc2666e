use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::Date;

use crate::DateRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.into(),
        }
    }

    pub fn same_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Ordered destinations plus the travel dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripConfig {
    destinations: Vec<Destination>,
    dates: DateRange,
}

impl TripConfig {
    pub fn new(
        destinations: Vec<Destination>,
        start: Option<Date>,
        end: Option<Date>,
    ) -> crate::Result<Self> {
        if destinations.is_empty() {
            crate::validation!("Please add at least one destination.");
        }

        for (i, destination) in destinations.iter().enumerate() {
            if destination.name.trim().is_empty() {
                crate::validation!("Destination names cannot be empty.");
            }

            if destinations[..i]
                .iter()
                .any(|d| d.same_name(&destination.name))
            {
                crate::validation!("{} is already in your itinerary.", destination.name);
            }
        }

        let dates = DateRange::new(start, end)?;

        Ok(Self {
            destinations,
            dates,
        })
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.destinations.iter().map(|d| d.name.as_str())
    }

    pub fn dates(&self) -> DateRange {
        self.dates
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub description: String,
    /// Estimated visit duration, e.g. "1-2 hours".
    pub duration: String,
    /// Out of 5.
    pub rating: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    /// "$", "$$" or "$$$".
    pub price: String,
    pub reservations: String,
}

/// Attractions and restaurants of one district.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiListing {
    pub attractions: Vec<Attraction>,
    pub restaurants: Vec<Restaurant>,
}

impl PoiListing {
    pub fn find(&self, name: &str) -> Option<PointOfInterest> {
        self.attractions
            .iter()
            .find(|a| a.name == name)
            .map(PointOfInterest::from)
            .or_else(|| {
                self.restaurants
                    .iter()
                    .find(|r| r.name == name)
                    .map(PointOfInterest::from)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty() && self.restaurants.is_empty()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PoiKind {
    Attraction,
    Restaurant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PoiKind,
}

impl PointOfInterest {
    pub fn attraction(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PoiKind::Attraction,
        }
    }

    pub fn restaurant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PoiKind::Restaurant,
        }
    }
}

impl From<&Attraction> for PointOfInterest {
    fn from(value: &Attraction) -> Self {
        PointOfInterest::attraction(&value.name)
    }
}

impl From<&Restaurant> for PointOfInterest {
    fn from(value: &Restaurant) -> Self {
        PointOfInterest::restaurant(&value.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_trip_requires_a_destination() {
        let err = TripConfig::new(vec![], Some(date!(2025 - 01 - 01)), Some(date!(2025 - 01 - 02)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_trip_rejects_case_insensitive_duplicates() {
        let err = TripConfig::new(
            vec![Destination::new("Paris"), Destination::new("paris")],
            Some(date!(2025 - 01 - 01)),
            Some(date!(2025 - 01 - 02)),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "paris is already in your itinerary.");
    }

    #[test]
    fn test_empty_destination_list_is_reported_before_dates() {
        let err = TripConfig::new(vec![], None, None).unwrap_err();
        assert_eq!(err.to_string(), "Please add at least one destination.");
    }

    #[test]
    fn test_listing_find_resolves_kind() {
        let listing = PoiListing {
            attractions: vec![Attraction {
                name: "Louvre".to_owned(),
                description: "Museum".to_owned(),
                duration: "3 hours".to_owned(),
                rating: 4.8,
            }],
            restaurants: vec![Restaurant {
                name: "Le Comptoir".to_owned(),
                cuisine: "French".to_owned(),
                price: "$$".to_owned(),
                reservations: "Recommended".to_owned(),
            }],
        };

        assert_eq!(
            listing.find("Le Comptoir"),
            Some(PointOfInterest::restaurant("Le Comptoir"))
        );
        assert_eq!(listing.find("Louvre"), Some(PointOfInterest::attraction("Louvre")));
        assert_eq!(listing.find("Eiffel Tower"), None);
    }

    #[test]
    fn test_poi_kind_serializes_lowercase() {
        let json = serde_json::to_string(&PointOfInterest::attraction("Louvre")).unwrap();
        assert_eq!(json, r#"{"name":"Louvre","type":"attraction"}"#);
    }
}
