use std::{collections::HashMap, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tripweave_planner::TripDraft;
use tripweave_shared::parse_date;

/// Trip description read by `tripweave plan`.
///
/// ```json
/// {
///   "destinations": ["Paris", "Rome"],
///   "start": "2025-05-01",
///   "end": "2025-05-04",
///   "picks": {
///     "Paris": [{"district": "Le Marais", "attractions": ["Musée Picasso"]}]
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TripFile {
    pub destinations: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub picks: HashMap<String, Vec<Pick>>,
}

/// Points of interest to select inside one district.
#[derive(Debug, Clone, Deserialize)]
pub struct Pick {
    pub district: String,
    #[serde(default)]
    pub attractions: Vec<String>,
    #[serde(default)]
    pub restaurants: Vec<String>,
}

impl Pick {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attractions
            .iter()
            .chain(self.restaurants.iter())
            .map(String::as_str)
    }
}

impl TripFile {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read trip file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("invalid trip file {}", path.display()))
    }

    pub fn picks(&self, destination: &str) -> &[Pick] {
        self.picks
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether any listed destination names at least one point of interest.
    pub fn has_picks(&self) -> bool {
        self.destinations
            .iter()
            .flat_map(|d| self.picks(d))
            .any(|p| p.names().next().is_some())
    }

    /// Destinations and dates as a draft ready to submit.
    pub fn draft(&self) -> tripweave_shared::Result<TripDraft> {
        let mut draft = TripDraft::new();
        for name in &self.destinations {
            draft.add_destination(name)?;
        }

        let start = self.start.as_deref().map(parse_date).transpose()?;
        let end = self.end.as_deref().map(parse_date).transpose()?;
        draft.set_dates(start, end);

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_default_to_empty() {
        let trip: TripFile = serde_json::from_str(
            r#"{
                "destinations": ["Paris", "Rome"],
                "start": "2025-05-01",
                "end": "2025-05-04",
                "picks": {"Paris": [{"district": "Le Marais", "restaurants": ["Chez Janou"]}]}
            }"#,
        )
        .unwrap();

        assert!(trip.picks("Rome").is_empty());
        let names: Vec<_> = trip.picks("Paris")[0].names().collect();
        assert_eq!(names, vec!["Chez Janou"]);
    }

    #[test]
    fn test_has_picks_needs_a_named_point_of_interest() {
        let trip = |picks: &str| -> TripFile {
            serde_json::from_str(&format!(
                r#"{{"destinations": ["Paris"], "start": "2025-05-01", "end": "2025-05-02", "picks": {picks}}}"#
            ))
            .unwrap()
        };

        assert!(!trip("{}").has_picks());
        assert!(!trip(r#"{"Paris": [{"district": "Le Marais"}]}"#).has_picks());
        assert!(
            !trip(r#"{"Rome": [{"district": "Trastevere", "attractions": ["Villa Farnesina"]}]}"#)
                .has_picks()
        );
        assert!(
            trip(r#"{"Paris": [{"district": "Le Marais", "attractions": ["Musée Picasso"]}]}"#)
                .has_picks()
        );
    }

    #[test]
    fn test_draft_rejects_duplicate_destinations() {
        let trip: TripFile = serde_json::from_str(
            r#"{"destinations": ["Rome", "rome"], "start": "2025-05-01", "end": "2025-05-02"}"#,
        )
        .unwrap();

        let err = trip.draft().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_draft_rejects_malformed_dates() {
        let trip: TripFile = serde_json::from_str(
            r#"{"destinations": ["Rome"], "start": "05/01/2025", "end": "2025-05-02"}"#,
        )
        .unwrap();

        assert!(trip.draft().is_err());
    }
}
