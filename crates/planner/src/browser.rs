use tripweave_shared::{Destination, District, PoiListing, Result, TripConfig};

use crate::{Token, Tokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Loading {
    Districts,
    Pois,
}

#[derive(Debug)]
pub enum BrowserEvent {
    ActivateDestination(String),
    SelectDistrict(String),
    DistrictsLoaded {
        token: Token,
        result: Result<Vec<District>>,
    },
    PoisLoaded {
        token: Token,
        result: Result<PoiListing>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEffect {
    FetchDistricts {
        token: Token,
        city: String,
    },
    FetchPois {
        token: Token,
        city: String,
        district: String,
    },
}

/// Destination → district → point of interest drill-down.
///
/// Each fetch is tagged with a token. A completion is applied only when its
/// token is still the current one for its level, so a response that arrives
/// after the user moved on is dropped.
#[derive(Debug)]
pub struct Browser {
    destinations: Vec<Destination>,
    active: usize,
    districts: Vec<District>,
    active_district: Option<District>,
    listing: Option<PoiListing>,
    loading: Option<Loading>,
    error: Option<String>,
    district_token: Option<Token>,
    poi_token: Option<Token>,
}

impl Browser {
    /// Opens the browser on the first destination of the trip.
    pub fn open(trip: &TripConfig, tokens: &mut Tokens) -> (Self, BrowserEffect) {
        let mut browser = Self {
            destinations: trip.destinations().to_vec(),
            active: 0,
            districts: vec![],
            active_district: None,
            listing: None,
            loading: None,
            error: None,
            district_token: None,
            poi_token: None,
        };

        let effect = browser.activate(0, tokens);

        (browser, effect)
    }

    pub fn handle(
        &mut self,
        event: BrowserEvent,
        tokens: &mut Tokens,
    ) -> Result<Option<BrowserEffect>> {
        match event {
            BrowserEvent::ActivateDestination(name) => {
                let Some(index) = self.destinations.iter().position(|d| d.name == name) else {
                    tripweave_shared::validation!("{name} is not part of this trip.");
                };

                if index == self.active && self.loading == Some(Loading::Districts) {
                    tracing::debug!(city = %name, "districts already loading");
                    return Ok(None);
                }

                Ok(Some(self.activate(index, tokens)))
            }
            BrowserEvent::SelectDistrict(name) => {
                let Some(district) = self.districts.iter().find(|d| d.name == name).cloned()
                else {
                    tripweave_shared::validation!(
                        "{name} is not a district of {}.",
                        self.active_destination().name
                    );
                };

                let pending = self.loading == Some(Loading::Pois)
                    && self.active_district.as_ref().is_some_and(|d| d.name == name);
                if pending {
                    tracing::debug!(district = %name, "points of interest already loading");
                    return Ok(None);
                }

                Ok(Some(self.select_district(district, tokens)))
            }
            BrowserEvent::DistrictsLoaded { token, result } => {
                self.districts_loaded(token, result);
                Ok(None)
            }
            BrowserEvent::PoisLoaded { token, result } => {
                self.pois_loaded(token, result);
                Ok(None)
            }
        }
    }

    fn activate(&mut self, index: usize, tokens: &mut Tokens) -> BrowserEffect {
        self.active = index;
        self.districts.clear();
        self.active_district = None;
        self.listing = None;
        self.error = None;
        self.loading = Some(Loading::Districts);
        self.poi_token = None;

        let token = tokens.next();
        self.district_token = Some(token);

        let city = self.active_destination().name.to_owned();
        tracing::debug!(%token, %city, "fetching districts");

        BrowserEffect::FetchDistricts { token, city }
    }

    fn select_district(&mut self, district: District, tokens: &mut Tokens) -> BrowserEffect {
        self.listing = None;
        self.error = None;
        self.loading = Some(Loading::Pois);

        let token = tokens.next();
        self.poi_token = Some(token);

        let city = self.active_destination().name.to_owned();
        let name = district.name.to_owned();
        self.active_district = Some(district);
        tracing::debug!(%token, %city, district = %name, "fetching points of interest");

        BrowserEffect::FetchPois {
            token,
            city,
            district: name,
        }
    }

    fn districts_loaded(&mut self, token: Token, result: Result<Vec<District>>) {
        if self.district_token != Some(token) {
            tracing::debug!(%token, "discarding stale district listing");
            return;
        }

        self.loading = None;
        match result {
            Ok(districts) => self.districts = districts,
            Err(err) => {
                let city = self.active_destination().name.to_owned();
                tracing::warn!(%token, %city, error = %err, "failed to load districts");
                self.districts.clear();
                self.error = Some(format!("Failed to load districts for {city}."));
            }
        }
    }

    fn pois_loaded(&mut self, token: Token, result: Result<PoiListing>) {
        if self.poi_token != Some(token) {
            tracing::debug!(%token, "discarding stale points of interest");
            return;
        }

        self.loading = None;
        match result {
            Ok(listing) => self.listing = Some(listing),
            Err(err) => {
                let district = self
                    .active_district
                    .as_ref()
                    .map(|d| d.name.as_str())
                    .unwrap_or_default();
                tracing::warn!(%token, %district, error = %err, "failed to load points of interest");
                self.listing = None;
                self.error = Some(format!(
                    "Failed to load points of interest for {district}."
                ));
            }
        }
    }

    pub fn active_destination(&self) -> &Destination {
        &self.destinations[self.active]
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn active_district(&self) -> Option<&District> {
        self.active_district.as_ref()
    }

    pub fn listing(&self) -> Option<&PoiListing> {
        self.listing.as_ref()
    }

    pub fn loading(&self) -> Option<Loading> {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
