use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::oneshot;
use tripweave_planner::{BrowserEvent, Event, SelectionSet, Session, Step, TravelService};
use tripweave_shared::{
    Activity, Attraction, DayPlan, Destination, District, Error, Itinerary, MapImage, MapPoint,
    PoiListing, Restaurant, Result, TripConfig, format_date,
};

/// Scripted service. Calls are counted per key, can be held on a gate until
/// the test releases them, and can be made to fail a number of times.
///
/// Keys: `districts:<city>`, `pois:<city>/<district>`, `itinerary`,
/// `overall`, `day:<title>`, `identify`, `region:<name>`.
#[derive(Default)]
pub struct FakeService {
    calls: Mutex<HashMap<String, usize>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failures: Mutex<HashMap<String, usize>>,
    identify_answer: Mutex<String>,
}

#[allow(dead_code)]
impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            identify_answer: Mutex::new("Beijing".to_owned()),
            ..Default::default()
        })
    }

    /// Holds the next call for `key` until the returned sender fires.
    pub fn gate(&self, key: impl Into<String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.into(), rx);
        tx
    }

    pub fn fail(&self, key: impl Into<String>, times: usize) {
        self.failures.lock().unwrap().insert(key.into(), times);
    }

    pub fn answer_identify(&self, answer: impl Into<String>) {
        *self.identify_answer.lock().unwrap() = answer.into();
    }

    pub fn calls(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or_default()
    }

    async fn enter(&self, key: String) -> Result<()> {
        *self.calls.lock().unwrap().entry(key.clone()).or_default() += 1;

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut failures = self.failures.lock().unwrap();
        if let Some(left) = failures.get_mut(&key).filter(|left| **left > 0) {
            *left -= 1;
            return Err(Error::Generation(format!("{key} unavailable")));
        }

        Ok(())
    }
}

pub fn districts_of(city: &str) -> Vec<District> {
    ["Old Town", "Harbour"]
        .iter()
        .map(|n| District {
            name: format!("{city} {n}"),
            description: format!("The {n} of {city}"),
        })
        .collect()
}

pub fn listing_of(district: &str) -> PoiListing {
    PoiListing {
        attractions: vec![Attraction {
            name: format!("{district} Museum"),
            description: "Local history".to_owned(),
            duration: "1-2 hours".to_owned(),
            rating: 4.5,
        }],
        restaurants: vec![Restaurant {
            name: format!("{district} Bistro"),
            cuisine: "Local".to_owned(),
            price: "$$".to_owned(),
            reservations: "Recommended".to_owned(),
        }],
    }
}

#[async_trait]
impl TravelService for FakeService {
    async fn list_districts(&self, city: &str) -> Result<Vec<District>> {
        self.enter(format!("districts:{city}")).await?;
        Ok(districts_of(city))
    }

    async fn list_pois(&self, city: &str, district: &str) -> Result<PoiListing> {
        self.enter(format!("pois:{city}/{district}")).await?;
        Ok(listing_of(district))
    }

    async fn build_itinerary(
        &self,
        trip: &TripConfig,
        selections: &SelectionSet,
    ) -> Result<Itinerary> {
        self.enter("itinerary".to_owned()).await?;

        let cities: Vec<&str> = trip.names().collect();
        let mut days = BTreeMap::new();
        for (i, date) in trip.dates().dates().enumerate() {
            let city = cities[i % cities.len()];
            let morning = selections
                .get(city)
                .unwrap_or_default()
                .iter()
                .map(|poi| Activity {
                    time: "10:00 AM".to_owned(),
                    activity: poi.name.to_owned(),
                    description: format!("Visit {}", poi.name),
                    location: city.to_owned(),
                    details: None,
                    transit: None,
                })
                .collect();

            days.insert(
                format_date(date),
                DayPlan {
                    title: format!("Day {} in {city}", i + 1),
                    summary: format!("Exploring {city}"),
                    morning,
                    afternoon: vec![],
                    evening: vec![],
                },
            );
        }

        Itinerary::try_from(days)
    }

    async fn render_day_map(&self, day: &DayPlan) -> Result<MapImage> {
        self.enter(format!("day:{}", day.title)).await?;
        if !day.has_activities() {
            return Err(Error::EmptyInput(
                "No locations available for this day to generate a map.".to_owned(),
            ));
        }

        Ok(MapImage::png(format!("day:{}", day.title)))
    }

    async fn render_overall_map(&self, itinerary: &Itinerary) -> Result<MapImage> {
        self.enter("overall".to_owned()).await?;
        Ok(MapImage::png(itinerary.cities().join(",")))
    }

    async fn identify_location(&self, _map: &MapImage, _point: MapPoint) -> Result<String> {
        self.enter("identify".to_owned()).await?;
        Ok(self.identify_answer.lock().unwrap().clone())
    }

    async fn render_region_map(&self, region: &str) -> Result<MapImage> {
        self.enter(format!("region:{region}")).await?;
        Ok(MapImage::png(region.to_owned()))
    }
}

#[allow(dead_code)]
pub fn submit(destinations: &[&str], start: &str, end: &str) -> Event {
    Event::SubmitConfig {
        destinations: destinations.iter().map(|d| Destination::new(*d)).collect(),
        start: Some(tripweave_shared::parse_date(start).unwrap()),
        end: Some(tripweave_shared::parse_date(end).unwrap()),
    }
}

#[allow(dead_code)]
pub fn activate(city: &str) -> Event {
    Event::Browser(BrowserEvent::ActivateDestination(city.to_owned()))
}

#[allow(dead_code)]
pub fn select_district(name: &str) -> Event {
    Event::Browser(BrowserEvent::SelectDistrict(name.to_owned()))
}

/// Session with Paris (2 days) and Tokyo selected, one Paris museum picked.
#[allow(dead_code)]
pub async fn selecting(service: Arc<FakeService>) -> anyhow::Result<Session> {
    let mut session = Session::new(service);
    session.dispatch(submit(&["Paris", "Tokyo"], "2025-01-01", "2025-01-03"))?;
    session.settle().await;

    session.dispatch(select_district("Paris Old Town"))?;
    session.settle().await;

    let poi = session
        .wizard()
        .browser()
        .and_then(|b| b.listing())
        .and_then(|l| l.find("Paris Old Town Museum"))
        .ok_or_else(|| anyhow::anyhow!("museum not listed"))?;

    session.dispatch(Event::Toggle {
        destination: "Paris".to_owned(),
        poi,
    })?;

    Ok(session)
}

/// Session that reached the review step. The overall map request may still
/// be held by a gate set up by the caller.
#[allow(dead_code)]
pub async fn reviewing(service: Arc<FakeService>) -> anyhow::Result<Session> {
    let mut session = selecting(service).await?;
    session.dispatch(Event::Generate)?;
    while session.wizard().step() != Step::Reviewing {
        if !session.next().await {
            anyhow::bail!("generation did not complete");
        }
    }

    Ok(session)
}
