// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;
use url::Url;

use crate::{MediaCountry, MediaGenre, MediaLanguage, SeasonId, SeriesId, SeriesStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Series,
    Season,
    Episode,
}

impl FormKind {
    pub const ALL: [Self; 3] = [Self::Series, Self::Season, Self::Episode];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Series => "New Series",
            Self::Season => "New Season",
            Self::Episode => "New Episode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFormInput {
    pub title: String,
    pub plot_summary: String,
    pub release_date: Option<Date>,
    pub image_url: String,
    pub genre: MediaGenre,
    pub status: SeriesStatus,
    pub original_language: MediaLanguage,
    pub origin_country: MediaCountry,
    pub budget_cents: Option<i64>,
    pub net_profit_cents: Option<i64>,
    pub revenue_cents: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFormInput {
    pub series_id: SeriesId,
    pub number: i32,
    pub title: String,
    pub release_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFormInput {
    pub season_id: SeasonId,
    pub number: i32,
    pub title: String,
    pub plot_summary: String,
    pub runtime_minutes: Option<i32>,
    pub air_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Series(SeriesFormInput),
    Season(SeasonFormInput),
    Episode(EpisodeFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Series(_) => FormKind::Series,
            Self::Season(_) => FormKind::Season,
            Self::Episode(_) => FormKind::Episode,
        }
    }

    pub fn blank_for(kind: FormKind) -> Self {
        match kind {
            FormKind::Series => Self::Series(SeriesFormInput {
                title: String::new(),
                plot_summary: String::new(),
                release_date: None,
                image_url: String::new(),
                genre: MediaGenre::Drama,
                status: SeriesStatus::Announced,
                original_language: MediaLanguage::English,
                origin_country: MediaCountry::UnitedStates,
                budget_cents: None,
                net_profit_cents: None,
                revenue_cents: None,
            }),
            FormKind::Season => Self::Season(SeasonFormInput {
                series_id: SeriesId::new(0),
                number: 1,
                title: String::new(),
                release_date: None,
            }),
            FormKind::Episode => Self::Episode(EpisodeFormInput {
                season_id: SeasonId::new(0),
                number: 1,
                title: String::new(),
                plot_summary: String::new(),
                runtime_minutes: None,
                air_date: None,
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Series(series) => series.validate(),
            Self::Season(season) => season.validate(),
            Self::Episode(episode) => episode.validate(),
        }
    }
}

impl SeriesFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("series title is required -- enter a title and retry");
        }
        if !self.image_url.trim().is_empty() && Url::parse(self.image_url.trim()).is_err() {
            bail!("series image URL is not a valid URL -- fix it and retry");
        }
        for cents in [self.budget_cents, self.revenue_cents]
            .into_iter()
            .flatten()
        {
            if cents < 0 {
                bail!("series budget and revenue cannot be negative");
            }
        }
        Ok(())
    }
}

impl SeasonFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.series_id.get() <= 0 {
            bail!("season series is required -- choose a series and retry");
        }
        if self.number <= 0 {
            bail!("season number must be at least 1");
        }
        Ok(())
    }
}

impl EpisodeFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.season_id.get() <= 0 {
            bail!("episode season is required -- choose a season and retry");
        }
        if self.number <= 0 {
            bail!("episode number must be at least 1");
        }
        if self.title.trim().is_empty() {
            bail!("episode title is required -- enter a title and retry");
        }
        if let Some(runtime) = self.runtime_minutes
            && runtime <= 0
        {
            bail!("episode runtime must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EpisodeFormInput, FormKind, FormPayload, SeasonFormInput};
    use crate::{SeasonId, SeriesId};

    #[test]
    fn blank_payloads_match_their_kind() {
        for kind in FormKind::ALL {
            assert_eq!(FormPayload::blank_for(kind).kind(), kind);
        }
    }

    #[test]
    fn series_validation_rejects_empty_title() {
        let payload = FormPayload::blank_for(FormKind::Series);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn series_validation_rejects_malformed_image_url() {
        let FormPayload::Series(mut input) = FormPayload::blank_for(FormKind::Series) else {
            unreachable!();
        };
        input.title = "Test Pattern".to_owned();
        input.image_url = "not a url".to_owned();
        assert!(input.validate().is_err());

        input.image_url = "https://img.example.com/poster.jpg".to_owned();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn series_validation_rejects_negative_money() {
        let FormPayload::Series(mut input) = FormPayload::blank_for(FormKind::Series) else {
            unreachable!();
        };
        input.title = "Test Pattern".to_owned();
        input.budget_cents = Some(-1);
        assert!(input.validate().is_err());
    }

    #[test]
    fn season_validation_requires_a_series_and_positive_number() {
        let mut input = SeasonFormInput {
            series_id: SeriesId::new(0),
            number: 1,
            title: String::new(),
            release_date: None,
        };
        assert!(input.validate().is_err());

        input.series_id = SeriesId::new(5);
        assert!(input.validate().is_ok());

        input.number = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn episode_validation_rejects_non_positive_runtime() {
        let input = EpisodeFormInput {
            season_id: SeasonId::new(2),
            number: 3,
            title: "Pilot Redux".to_owned(),
            plot_summary: String::new(),
            runtime_minutes: Some(0),
            air_date: None,
        };
        assert!(input.validate().is_err());
    }
}
