use time::Date;
use tripweave_shared::{
    DayPlan, Destination, Itinerary, MapImage, PointOfInterest, Result, TripConfig,
};

use crate::{
    ArtifactCache, ArtifactKey, Browser, BrowserEffect, BrowserEvent, SelectionSet, Token, Tokens,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Step {
    Configuring,
    Selecting,
    Reviewing,
}

#[derive(Debug)]
pub enum Event {
    SubmitConfig {
        destinations: Vec<Destination>,
        start: Option<Date>,
        end: Option<Date>,
    },
    Browser(BrowserEvent),
    Toggle {
        destination: String,
        poi: PointOfInterest,
    },
    Generate,
    SelectView(ArtifactKey),
    Reset,
    ItineraryBuilt {
        token: Token,
        result: Result<Itinerary>,
    },
    MapRendered {
        key: ArtifactKey,
        token: Token,
        result: Result<MapImage>,
    },
}

/// Request the wizard wants issued. Its completion comes back as an
/// [`Event`] carrying the same token.
#[derive(Debug, Clone)]
pub enum Effect {
    Browser(BrowserEffect),
    BuildItinerary {
        token: Token,
        trip: TripConfig,
        selections: SelectionSet,
    },
    RenderOverallMap {
        token: Token,
        itinerary: Itinerary,
    },
    RenderDayMap {
        token: Token,
        date: String,
        day: DayPlan,
    },
}

/// Configuring → Selecting → Reviewing, with reset back to Configuring from
/// anywhere.
#[derive(Debug)]
pub struct Wizard {
    step: Step,
    tokens: Tokens,
    trip: Option<TripConfig>,
    selections: SelectionSet,
    browser: Option<Browser>,
    generating: Option<Token>,
    itinerary: Option<Itinerary>,
    artifacts: ArtifactCache,
    active_view: ArtifactKey,
    validation_error: Option<String>,
    generation_error: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            step: Step::Configuring,
            tokens: Tokens::default(),
            trip: None,
            selections: SelectionSet::default(),
            browser: None,
            generating: None,
            itinerary: None,
            artifacts: ArtifactCache::default(),
            active_view: ArtifactKey::Overall,
            validation_error: None,
            generation_error: None,
        }
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event and returns the requests it starts.
    ///
    /// Validation errors are returned and also kept for display until the
    /// next event that succeeds.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>> {
        let is_input = !matches!(
            event,
            Event::ItineraryBuilt { .. }
                | Event::MapRendered { .. }
                | Event::Browser(BrowserEvent::DistrictsLoaded { .. })
                | Event::Browser(BrowserEvent::PoisLoaded { .. })
        );

        let result = self.apply(event);

        if is_input {
            self.validation_error = match &result {
                Err(err) if err.is_validation() => Some(err.to_string()),
                _ => None,
            };
        }

        result
    }

    fn apply(&mut self, event: Event) -> Result<Vec<Effect>> {
        match event {
            Event::SubmitConfig {
                destinations,
                start,
                end,
            } => self.submit_config(destinations, start, end),
            Event::Browser(event) => self.browse(event),
            Event::Toggle { destination, poi } => self.toggle(&destination, poi),
            Event::Generate => self.generate(),
            Event::SelectView(key) => self.select_view(key),
            Event::Reset => {
                self.reset();
                Ok(vec![])
            }
            Event::ItineraryBuilt { token, result } => Ok(self.itinerary_built(token, result)),
            Event::MapRendered { key, token, result } => {
                if self.step == Step::Reviewing {
                    self.artifacts.complete(&key, token, result);
                } else {
                    tracing::debug!(%key, %token, "discarding map outside review");
                }

                Ok(vec![])
            }
        }
    }

    fn submit_config(
        &mut self,
        destinations: Vec<Destination>,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<Vec<Effect>> {
        self.expect_step(Step::Configuring)?;

        let trip = TripConfig::new(destinations, start, end)?;
        let (browser, effect) = Browser::open(&trip, &mut self.tokens);

        self.selections = SelectionSet::for_trip(&trip);
        self.browser = Some(browser);
        self.trip = Some(trip);
        self.step = Step::Selecting;
        tracing::info!(step = %self.step, "trip configured");

        Ok(vec![Effect::Browser(effect)])
    }

    fn browse(&mut self, event: BrowserEvent) -> Result<Vec<Effect>> {
        let is_completion = matches!(
            event,
            BrowserEvent::DistrictsLoaded { .. } | BrowserEvent::PoisLoaded { .. }
        );

        let Some(browser) = self.browser.as_mut() else {
            if is_completion {
                tracing::debug!("discarding listing, browser is closed");
                return Ok(vec![]);
            }

            tripweave_shared::validation!("Destinations can only be browsed while selecting.");
        };

        Ok(browser
            .handle(event, &mut self.tokens)?
            .map(Effect::Browser)
            .into_iter()
            .collect())
    }

    fn toggle(&mut self, destination: &str, poi: PointOfInterest) -> Result<Vec<Effect>> {
        self.expect_step(Step::Selecting)?;
        self.selections.toggle(destination, poi)?;

        Ok(vec![])
    }

    fn generate(&mut self) -> Result<Vec<Effect>> {
        self.expect_step(Step::Selecting)?;

        if let Some(token) = self.generating {
            tracing::warn!(%token, "itinerary generation already in progress");
            return Ok(vec![]);
        }

        if self.selections.total_count() == 0 {
            tripweave_shared::validation!(
                "Select at least one point of interest to generate an itinerary."
            );
        }

        let Some(trip) = self.trip.clone() else {
            tripweave_shared::validation!("Please configure your trip first.");
        };

        let token = self.tokens.next();
        self.generating = Some(token);
        self.generation_error = None;
        tracing::info!(%token, selections = self.selections.total_count(), "generating itinerary");

        Ok(vec![Effect::BuildItinerary {
            token,
            trip,
            selections: self.selections.clone(),
        }])
    }

    fn itinerary_built(&mut self, token: Token, result: Result<Itinerary>) -> Vec<Effect> {
        if self.generating != Some(token) {
            tracing::debug!(%token, "discarding stale itinerary");
            return vec![];
        }

        self.generating = None;

        let result = result.and_then(|itinerary| match &self.trip {
            Some(trip) => itinerary.check_within(trip.dates()).map(|()| itinerary),
            None => Ok(itinerary),
        });

        let itinerary = match result {
            Ok(itinerary) => itinerary,
            Err(err) => {
                tracing::warn!(%token, error = %err, "itinerary generation failed");
                self.generation_error = Some(format!(
                    "Sorry, something went wrong while generating your itinerary. Please try again. ({err})"
                ));
                return vec![];
            }
        };

        self.artifacts = ArtifactCache::for_itinerary(&itinerary);
        self.itinerary = Some(itinerary);
        self.browser = None;
        self.step = Step::Reviewing;
        tracing::info!(step = %self.step, days = self.days().len(), "itinerary ready");

        self.select_view(ArtifactKey::Overall)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "could not request the overall map");
                vec![]
            })
    }

    fn select_view(&mut self, key: ArtifactKey) -> Result<Vec<Effect>> {
        self.expect_step(Step::Reviewing)?;

        let Some(token) = self.artifacts.ensure(&key, &mut self.tokens)? else {
            self.active_view = key;
            return Ok(vec![]);
        };

        let Some(itinerary) = self.itinerary.as_ref() else {
            tripweave_shared::validation!("There is no itinerary to review.");
        };

        let effect = match &key {
            ArtifactKey::Overall => Effect::RenderOverallMap {
                token,
                itinerary: itinerary.clone(),
            },
            ArtifactKey::Day(date) => {
                let Some(day) = itinerary.get(date).cloned() else {
                    tripweave_shared::validation!("`{date}` is not a day of this itinerary.");
                };

                Effect::RenderDayMap {
                    token,
                    date: date.to_owned(),
                    day,
                }
            }
        };

        self.active_view = key;

        Ok(vec![effect])
    }

    fn reset(&mut self) {
        self.step = Step::Configuring;
        self.trip = None;
        self.selections = SelectionSet::default();
        self.browser = None;
        self.generating = None;
        self.itinerary = None;
        self.artifacts = ArtifactCache::default();
        self.active_view = ArtifactKey::Overall;
        self.validation_error = None;
        self.generation_error = None;
        tracing::info!(step = %self.step, "planner reset");
    }

    fn expect_step(&self, step: Step) -> Result<()> {
        if self.step != step {
            tripweave_shared::validation!(
                "This action is only available while {}, the planner is {}.",
                step.to_string().to_lowercase(),
                self.step.to_string().to_lowercase()
            );
        }

        Ok(())
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Percent of the wizard completed.
    pub fn progress(&self) -> u8 {
        match self.step {
            Step::Configuring => 25,
            Step::Selecting => 50,
            Step::Reviewing => 100,
        }
    }

    pub fn trip(&self) -> Option<&TripConfig> {
        self.trip.as_ref()
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn browser(&self) -> Option<&Browser> {
        self.browser.as_ref()
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.itinerary.as_ref()
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.artifacts
    }

    pub fn active_view(&self) -> &ArtifactKey {
        &self.active_view
    }

    /// Itinerary days in date order with their 1-based day number.
    pub fn days(&self) -> Vec<(usize, &str, &DayPlan)> {
        self.itinerary
            .iter()
            .flat_map(|i| i.days())
            .enumerate()
            .map(|(i, (date, day))| (i + 1, date, day))
            .collect()
    }

    pub fn can_generate(&self) -> bool {
        self.step == Step::Selecting && self.generating.is_none() && self.selections.total_count() > 0
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_some()
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }
}
