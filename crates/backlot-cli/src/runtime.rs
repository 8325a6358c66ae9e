// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use backlot_api::Client;
use backlot_app::{
    FormPayload, MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId, SeriesStatus,
    SeriesUpdate,
};
use backlot_tui::{AppRuntime, InternalEvent};
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use std::thread;
use time::{Date, Month, OffsetDateTime};

/// Runtime backed by the catalog service. Saves run on their own thread so
/// the event loop keeps drawing while the request is in flight.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for ApiRuntime {
    fn load_series(&mut self, id: SeriesId) -> Result<SeriesDetails> {
        self.client.get_series(id)
    }

    fn update_series(&mut self, id: SeriesId, update: &SeriesUpdate) -> Result<SeriesDetails> {
        self.client.update_series(id, update)
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<()> {
        payload.validate()?;
        match payload {
            FormPayload::Series(form) => {
                self.client.create_series(form)?;
            }
            FormPayload::Season(form) => {
                self.client.create_season(form)?;
            }
            FormPayload::Episode(form) => {
                self.client.create_episode(form)?;
            }
        }
        Ok(())
    }

    fn spawn_update(
        &mut self,
        id: SeriesId,
        update: &SeriesUpdate,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let update = update.clone();
        thread::spawn(move || {
            let outcome = client
                .update_series(id, &update)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(InternalEvent::SaveFinished {
                series_id: id,
                outcome,
            });
        });
        Ok(())
    }
}

/// In-memory runtime for `--demo`: a small fixed catalog, no network. Updates
/// behave like the real service, returning the stored copy with the patch
/// applied.
pub struct DemoRuntime {
    catalog: BTreeMap<i64, SeriesDetails>,
    next_id: i64,
}

impl DemoRuntime {
    pub fn seeded() -> Self {
        let mut catalog = BTreeMap::new();
        for series in demo_catalog() {
            catalog.insert(series.id.get(), series);
        }
        Self {
            catalog,
            next_id: 100,
        }
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl AppRuntime for DemoRuntime {
    fn load_series(&mut self, id: SeriesId) -> Result<SeriesDetails> {
        self.catalog
            .get(&id.get())
            .cloned()
            .ok_or_else(|| anyhow!("series {} is not in the demo catalog", id.get()))
    }

    fn update_series(&mut self, id: SeriesId, update: &SeriesUpdate) -> Result<SeriesDetails> {
        let series = self
            .catalog
            .get_mut(&id.get())
            .ok_or_else(|| anyhow!("series {} is not in the demo catalog", id.get()))?;
        apply_update(series, update)?;
        Ok(series.clone())
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<()> {
        payload.validate()?;
        match payload {
            FormPayload::Series(form) => {
                let id = self.take_id();
                self.catalog.insert(
                    id,
                    SeriesDetails {
                        id: SeriesId::new(id),
                        title: form.title.clone(),
                        plot_summary: form.plot_summary.clone(),
                        release_date: form.release_date.unwrap_or_else(today),
                        image_url: form.image_url.clone(),
                        genre: form.genre,
                        status: form.status,
                        original_language: form.original_language,
                        origin_country: form.origin_country,
                        budget_cents: form.budget_cents.unwrap_or(0),
                        net_profit_cents: form.net_profit_cents.unwrap_or(0),
                        revenue_cents: form.revenue_cents.unwrap_or(0),
                    },
                );
            }
            FormPayload::Season(form) => {
                if !self.catalog.contains_key(&form.series_id.get()) {
                    return Err(anyhow!(
                        "series {} is not in the demo catalog",
                        form.series_id.get()
                    ));
                }
                self.take_id();
            }
            FormPayload::Episode(_) => {
                self.take_id();
            }
        }
        Ok(())
    }
}

fn apply_update(series: &mut SeriesDetails, update: &SeriesUpdate) -> Result<()> {
    if let Some(title) = &update.title {
        series.title = title.clone();
    }
    if let Some(plot_summary) = &update.plot_summary {
        series.plot_summary = plot_summary.clone();
    }
    if let Some(millis) = update.release_date {
        series.release_date = date_from_epoch_millis(millis)?;
    }
    if let Some(url) = update.image.as_ref().and_then(|image| image.url.as_ref()) {
        series.image_url = url.clone();
    }
    if let Some(info) = &update.additional_info {
        if let Some(genre) = &info.genre {
            series.genre = MediaGenre::parse(genre)
                .ok_or_else(|| anyhow!("unknown genre {genre:?}"))?;
        }
        if let Some(status) = &info.status {
            series.status = SeriesStatus::parse(status)
                .ok_or_else(|| anyhow!("unknown status {status:?}"))?;
        }
        if let Some(language) = &info.original_language {
            series.original_language = MediaLanguage::parse(language)
                .ok_or_else(|| anyhow!("unknown language {language:?}"))?;
        }
        if let Some(country) = &info.origin_country {
            series.origin_country = MediaCountry::parse(country)
                .ok_or_else(|| anyhow!("unknown country {country:?}"))?;
        }
    }
    if let Some(info) = &update.financial_info {
        if let Some(budget) = info.budget {
            series.budget_cents = budget;
        }
        if let Some(net_profit) = info.net_profit {
            series.net_profit_cents = net_profit;
        }
        if let Some(revenue) = info.revenue {
            series.revenue_cents = revenue;
        }
    }
    Ok(())
}

fn date_from_epoch_millis(millis: i64) -> Result<Date> {
    let timestamp = OffsetDateTime::from_unix_timestamp(millis.div_euclid(1000))
        .with_context(|| format!("release date {millis} is out of range"))?;
    Ok(timestamp.date())
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn demo_series(
    id: i64,
    title: &str,
    plot_summary: &str,
    year: i32,
    month: Month,
    day: u8,
    genre: MediaGenre,
    status: SeriesStatus,
) -> SeriesDetails {
    SeriesDetails {
        id: SeriesId::new(id),
        title: title.to_owned(),
        plot_summary: plot_summary.to_owned(),
        release_date: Date::from_calendar_date(year, month, day)
            .unwrap_or_else(|_| today()),
        image_url: format!("https://img.example.com/series/{id}.jpg"),
        genre,
        status,
        original_language: MediaLanguage::English,
        origin_country: MediaCountry::UnitedStates,
        budget_cents: 180_000_00 * id,
        net_profit_cents: 40_000_00 * id,
        revenue_cents: 220_000_00 * id,
    }
}

fn demo_catalog() -> Vec<SeriesDetails> {
    vec![
        demo_series(
            1,
            "Harbor Lights",
            "A port town rebuilds after the storm of the century.",
            2022,
            Month::June,
            9,
            MediaGenre::Drama,
            SeriesStatus::Airing,
        ),
        demo_series(
            2,
            "Night Shift",
            "An ER team holds the line through the city's worst year.",
            2019,
            Month::September,
            24,
            MediaGenre::Thriller,
            SeriesStatus::Ended,
        ),
        demo_series(
            3,
            "Paper Trail",
            "A forensic accountant unwinds a shell-company empire.",
            2025,
            Month::February,
            2,
            MediaGenre::Crime,
            SeriesStatus::InProduction,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{DemoRuntime, apply_update, date_from_epoch_millis};
    use anyhow::Result;
    use backlot_app::{
        AdditionalInfoUpdate, FinancialInfoUpdate, FormKind, FormPayload, MediaGenre, SeriesId,
        SeriesUpdate,
    };
    use backlot_tui::AppRuntime;
    use time::{Date, Month};

    #[test]
    fn demo_catalog_serves_seeded_series() -> Result<()> {
        let mut runtime = DemoRuntime::seeded();
        let series = runtime.load_series(SeriesId::new(1))?;
        assert_eq!(series.title, "Harbor Lights");

        let error = runtime
            .load_series(SeriesId::new(999))
            .expect_err("unknown id should fail");
        assert!(error.to_string().contains("not in the demo catalog"));
        Ok(())
    }

    #[test]
    fn demo_update_applies_the_patch_and_persists() -> Result<()> {
        let mut runtime = DemoRuntime::seeded();
        let update = SeriesUpdate {
            title: Some("Harbor Dark".to_owned()),
            additional_info: Some(AdditionalInfoUpdate {
                genre: Some("horror".to_owned()),
                ..AdditionalInfoUpdate::default()
            }),
            financial_info: Some(FinancialInfoUpdate {
                budget: Some(5500),
                ..FinancialInfoUpdate::default()
            }),
            ..SeriesUpdate::default()
        };

        let updated = runtime.update_series(SeriesId::new(1), &update)?;
        assert_eq!(updated.title, "Harbor Dark");
        assert_eq!(updated.genre, MediaGenre::Horror);
        assert_eq!(updated.budget_cents, 5500);

        // Survives a reload.
        let reloaded = runtime.load_series(SeriesId::new(1))?;
        assert_eq!(reloaded.title, "Harbor Dark");
        Ok(())
    }

    #[test]
    fn demo_update_rejects_unknown_wire_strings() {
        let mut runtime = DemoRuntime::seeded();
        let update = SeriesUpdate {
            additional_info: Some(AdditionalInfoUpdate {
                genre: Some("polka".to_owned()),
                ..AdditionalInfoUpdate::default()
            }),
            ..SeriesUpdate::default()
        };
        let error = runtime
            .update_series(SeriesId::new(1), &update)
            .expect_err("unknown genre should fail");
        assert!(error.to_string().contains("unknown genre"));
    }

    #[test]
    fn release_date_round_trips_through_epoch_millis() -> Result<()> {
        // 2022-06-09T00:00:00Z
        let date = date_from_epoch_millis(1_654_732_800_000)?;
        assert_eq!(date, Date::from_calendar_date(2022, Month::June, 9)?);

        let mut series = DemoRuntime::seeded().load_series(SeriesId::new(2))?;
        let update = SeriesUpdate {
            release_date: Some(1_654_732_800_000),
            ..SeriesUpdate::default()
        };
        apply_update(&mut series, &update)?;
        assert_eq!(
            series.release_date,
            Date::from_calendar_date(2022, Month::June, 9)?
        );
        Ok(())
    }

    #[test]
    fn demo_submit_adds_a_series_to_the_catalog() -> Result<()> {
        let mut runtime = DemoRuntime::seeded();
        let FormPayload::Series(mut form) = FormPayload::blank_for(FormKind::Series) else {
            unreachable!();
        };
        form.title = "Static Garden".to_owned();
        runtime.submit_form(&FormPayload::Series(form))?;

        let created = runtime.load_series(SeriesId::new(100))?;
        assert_eq!(created.title, "Static Garden");
        Ok(())
    }

    #[test]
    fn demo_season_requires_a_known_series() {
        let mut runtime = DemoRuntime::seeded();
        let FormPayload::Season(mut form) = FormPayload::blank_for(FormKind::Season) else {
            unreachable!();
        };
        form.series_id = SeriesId::new(999);
        let error = runtime
            .submit_form(&FormPayload::Season(form))
            .expect_err("unknown series should fail");
        assert!(error.to_string().contains("not in the demo catalog"));
    }
}
