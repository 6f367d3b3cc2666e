use std::sync::Arc;

use tokio::task::JoinSet;
use tripweave_shared::Result;

use crate::{ArtifactKey, BrowserEffect, BrowserEvent, Effect, Event, TravelService, Wizard};

/// Drives a [`Wizard`] against a [`TravelService`].
///
/// User events are applied synchronously in call order. Requests run as
/// tokio tasks and their completions are fed back to the wizard one at a
/// time, in completion order, by [`Session::next`] or [`Session::settle`].
/// Nothing times out: a hung request keeps its scope pending.
pub struct Session {
    wizard: Wizard,
    service: Arc<dyn TravelService>,
    in_flight: JoinSet<Event>,
}

impl Session {
    pub fn new(service: Arc<dyn TravelService>) -> Self {
        Self {
            wizard: Wizard::new(),
            service,
            in_flight: JoinSet::new(),
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn service(&self) -> &dyn TravelService {
        self.service.as_ref()
    }

    /// Number of requests whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let effects = self.wizard.handle(event)?;
        for effect in effects {
            self.spawn(effect);
        }

        Ok(())
    }

    /// Waits for the next request to finish and applies its completion.
    /// Returns `false` when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        let Some(joined) = self.in_flight.join_next().await else {
            return false;
        };

        match joined {
            Ok(event) => {
                if let Err(err) = self.dispatch(event) {
                    tracing::error!(error = %err, "failed to apply completion");
                }
            }
            Err(err) => tracing::error!(error = %err, "request task aborted"),
        }

        true
    }

    /// Applies completions until no request is left in flight.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn spawn(&mut self, effect: Effect) {
        let service = self.service.clone();

        match effect {
            Effect::Browser(BrowserEffect::FetchDistricts { token, city }) => {
                self.in_flight.spawn(async move {
                    let result = service.list_districts(&city).await;
                    Event::Browser(BrowserEvent::DistrictsLoaded { token, result })
                });
            }
            Effect::Browser(BrowserEffect::FetchPois {
                token,
                city,
                district,
            }) => {
                self.in_flight.spawn(async move {
                    let result = service.list_pois(&city, &district).await;
                    Event::Browser(BrowserEvent::PoisLoaded { token, result })
                });
            }
            Effect::BuildItinerary {
                token,
                trip,
                selections,
            } => {
                self.in_flight.spawn(async move {
                    let result = service.build_itinerary(&trip, &selections).await;
                    Event::ItineraryBuilt { token, result }
                });
            }
            Effect::RenderOverallMap { token, itinerary } => {
                self.in_flight.spawn(async move {
                    let result = service.render_overall_map(&itinerary).await;
                    Event::MapRendered {
                        key: ArtifactKey::Overall,
                        token,
                        result,
                    }
                });
            }
            Effect::RenderDayMap { token, date, day } => {
                self.in_flight.spawn(async move {
                    let result = service.render_day_map(&day).await;
                    Event::MapRendered {
                        key: ArtifactKey::Day(date),
                        token,
                        result,
                    }
                });
            }
        }
    }
}
