use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transit {
    pub mode: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Travel to the next activity of the day.
    #[serde(
        default,
        rename = "travelToNext",
        skip_serializing_if = "Option::is_none"
    )]
    pub transit: Option<Transit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub morning: Vec<Activity>,
    #[serde(default)]
    pub afternoon: Vec<Activity>,
    #[serde(default)]
    pub evening: Vec<Activity>,
}

impl DayPlan {
    /// Morning, afternoon then evening activities.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.morning
            .iter()
            .chain(self.afternoon.iter())
            .chain(self.evening.iter())
    }

    pub fn has_activities(&self) -> bool {
        self.activities().next().is_some()
    }

    /// City a day takes place in, read from titles shaped like
    /// "Art and Cafés in Paris". Falls back to the whole title.
    pub fn city(&self) -> &str {
        self.title
            .split_once(" in ")
            .map(|(_, city)| city.split(" in ").next().unwrap_or(city))
            .unwrap_or(&self.title)
            .trim()
    }
}

/// Day-by-day schedule keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(BTreeMap<String, DayPlan>);

impl Itinerary {
    /// Parses and validates a generated schedule: at least one day, every key
    /// an ISO calendar date and every value a complete day plan.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        let days: BTreeMap<String, DayPlan> = crate::parse_generated(raw)?;
        Self::try_from(days)
    }

    pub fn get(&self, date: &str) -> Option<&DayPlan> {
        self.0.get(date)
    }

    pub fn contains(&self, date: &str) -> bool {
        self.0.contains_key(date)
    }

    /// Days in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = (&str, &DayPlan)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails with `Parse` on the first day that falls outside `range`.
    pub fn check_within(&self, range: crate::DateRange) -> crate::Result<()> {
        for key in self.0.keys() {
            if !range.contains(crate::parse_date(key)?) {
                return Err(crate::Error::Parse(format!(
                    "`{key}` is outside the trip dates ({range})"
                )));
            }
        }

        Ok(())
    }

    /// Cities visited, in the order they first appear.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = vec![];
        for day in self.0.values() {
            let city = day.city();
            if !cities.contains(&city) {
                cities.push(city);
            }
        }

        cities
    }
}

impl TryFrom<BTreeMap<String, DayPlan>> for Itinerary {
    type Error = crate::Error;

    fn try_from(days: BTreeMap<String, DayPlan>) -> Result<Self, Self::Error> {
        if days.is_empty() {
            return Err(crate::Error::Parse("itinerary contains no days".to_owned()));
        }

        for key in days.keys() {
            if crate::parse_date(key).is_err() {
                return Err(crate::Error::Parse(format!(
                    "`{key}` is not a YYYY-MM-DD date"
                )));
            }
        }

        Ok(Self(days))
    }
}
