use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use tripweave::{Pick, TripFile, config::Config};
use tripweave_gemini::GeminiClient;
use tripweave_planner::{ArtifactKey, ArtifactState, BrowserEvent, Event, Session, Step, Wizard};
use tripweave_shared::{PoiListing, PointOfInterest};

#[tracing::instrument(skip(config))]
pub async fn plan(config: Config, trip_path: &Path) -> Result<()> {
    let trip = TripFile::load(trip_path)?;
    if !trip.has_picks() {
        anyhow::bail!("Select at least one point of interest to generate an itinerary.");
    }

    let client = GeminiClient::new(config.gemini.client_config())?;
    let mut session = Session::new(Arc::new(client));

    session.dispatch(trip.draft()?.into_event())?;
    session.settle().await;

    let destinations: Vec<String> = session
        .wizard()
        .trip()
        .map(|t| t.names().map(str::to_owned).collect())
        .unwrap_or_default();

    for destination in &destinations {
        select_picks(&mut session, destination, trip.picks(destination)).await?;
    }

    session.dispatch(Event::Generate)?;
    session.settle().await;

    let wizard = session.wizard();
    if wizard.step() != Step::Reviewing {
        anyhow::bail!(
            "{}",
            wizard
                .generation_error()
                .unwrap_or("itinerary generation did not complete")
        );
    }

    let dates: Vec<String> = wizard
        .itinerary()
        .map(|i| i.dates().map(str::to_owned).collect())
        .unwrap_or_default();

    for date in dates {
        session.dispatch(Event::SelectView(ArtifactKey::Day(date)))?;
    }
    session.settle().await;

    write_output(session.wizard(), &config.output.dir)
}

async fn select_picks(session: &mut Session, destination: &str, picks: &[Pick]) -> Result<()> {
    if picks.is_empty() {
        tracing::info!(%destination, "no picks for this destination");
        return Ok(());
    }

    let active = session
        .wizard()
        .browser()
        .map(|b| b.active_destination().name.to_owned());

    if active.as_deref() != Some(destination) {
        session.dispatch(Event::Browser(BrowserEvent::ActivateDestination(
            destination.to_owned(),
        )))?;
        session.settle().await;
    }

    for pick in picks {
        let district = find_district(session.wizard(), &pick.district)?;
        session.dispatch(Event::Browser(BrowserEvent::SelectDistrict(district)))?;
        session.settle().await;

        let browser = session.wizard().browser().context("browser is closed")?;
        if let Some(err) = browser.error() {
            anyhow::bail!("{err}");
        }

        let listing = browser.listing().cloned().unwrap_or_default();
        for name in pick.names() {
            let Some(poi) = find_poi(&listing, name) else {
                tracing::warn!(%destination, district = %pick.district, %name, "not listed, skipped");
                continue;
            };

            if !session.wizard().selections().is_selected(destination, &poi.name) {
                session.dispatch(Event::Toggle {
                    destination: destination.to_owned(),
                    poi,
                })?;
            }
        }
    }

    tracing::info!(
        %destination,
        selected = session.wizard().selections().count(destination),
        "points of interest selected"
    );

    Ok(())
}

/// Generated names rarely match the trip file letter for letter.
fn find_district(wizard: &Wizard, wanted: &str) -> Result<String> {
    let browser = wizard.browser().context("browser is closed")?;
    if let Some(err) = browser.error() {
        anyhow::bail!("{err}");
    }

    let districts = browser.districts();
    if let Some(district) = districts.iter().find(|d| d.name.eq_ignore_ascii_case(wanted)) {
        return Ok(district.name.to_owned());
    }

    let available: Vec<&str> = districts.iter().map(|d| d.name.as_str()).collect();
    anyhow::bail!(
        "{wanted} is not a district of {}, available: {}",
        browser.active_destination().name,
        available.join(", ")
    )
}

fn find_poi(listing: &PoiListing, name: &str) -> Option<PointOfInterest> {
    listing.find(name).or_else(|| {
        listing
            .attractions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(PointOfInterest::from)
            .or_else(|| {
                listing
                    .restaurants
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(name))
                    .map(PointOfInterest::from)
            })
    })
}

fn write_output(wizard: &Wizard, dir: &Path) -> Result<()> {
    let itinerary = wizard.itinerary().context("no itinerary was generated")?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    std::fs::write(
        dir.join("itinerary.json"),
        serde_json::to_string_pretty(itinerary)?,
    )?;

    let keys = std::iter::once(ArtifactKey::Overall)
        .chain(itinerary.dates().map(|d| ArtifactKey::Day(d.to_owned())));

    for key in keys {
        match wizard.artifacts().state(&key) {
            ArtifactState::Ready(image) => {
                super::save_image(&image, &dir.join(format!("{key}.{}", image.extension())))?
            }
            ArtifactState::Failed(reason) => tracing::warn!(%key, %reason, "map not rendered"),
            ArtifactState::Absent | ArtifactState::Pending => {
                tracing::warn!(%key, "map missing")
            }
        }
    }

    for (number, date, day) in wizard.days() {
        println!("Day {number} ({date}): {}", day.title);
    }
    println!("Written to {}", dir.display());

    Ok(())
}
