// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaGenre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    Horror,
    Romance,
    SciFi,
    Thriller,
}

impl MediaGenre {
    pub const ALL: [Self; 12] = [
        Self::Action,
        Self::Adventure,
        Self::Animation,
        Self::Comedy,
        Self::Crime,
        Self::Documentary,
        Self::Drama,
        Self::Fantasy,
        Self::Horror,
        Self::Romance,
        Self::SciFi,
        Self::Thriller,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Adventure => "adventure",
            Self::Animation => "animation",
            Self::Comedy => "comedy",
            Self::Crime => "crime",
            Self::Documentary => "documentary",
            Self::Drama => "drama",
            Self::Fantasy => "fantasy",
            Self::Horror => "horror",
            Self::Romance => "romance",
            Self::SciFi => "sci_fi",
            Self::Thriller => "thriller",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "action" => Some(Self::Action),
            "adventure" => Some(Self::Adventure),
            "animation" => Some(Self::Animation),
            "comedy" => Some(Self::Comedy),
            "crime" => Some(Self::Crime),
            "documentary" => Some(Self::Documentary),
            "drama" => Some(Self::Drama),
            "fantasy" => Some(Self::Fantasy),
            "horror" => Some(Self::Horror),
            "romance" => Some(Self::Romance),
            "sci_fi" => Some(Self::SciFi),
            "thriller" => Some(Self::Thriller),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Animation => "Animation",
            Self::Comedy => "Comedy",
            Self::Crime => "Crime",
            Self::Documentary => "Documentary",
            Self::Drama => "Drama",
            Self::Fantasy => "Fantasy",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::SciFi => "Sci-Fi",
            Self::Thriller => "Thriller",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    Announced,
    InProduction,
    Airing,
    OnHiatus,
    Ended,
    Canceled,
}

impl SeriesStatus {
    pub const ALL: [Self; 6] = [
        Self::Announced,
        Self::InProduction,
        Self::Airing,
        Self::OnHiatus,
        Self::Ended,
        Self::Canceled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Announced => "announced",
            Self::InProduction => "in_production",
            Self::Airing => "airing",
            Self::OnHiatus => "on_hiatus",
            Self::Ended => "ended",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "announced" => Some(Self::Announced),
            "in_production" => Some(Self::InProduction),
            "airing" => Some(Self::Airing),
            "on_hiatus" => Some(Self::OnHiatus),
            "ended" => Some(Self::Ended),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Announced => "Announced",
            Self::InProduction => "In Production",
            Self::Airing => "Airing",
            Self::OnHiatus => "On Hiatus",
            Self::Ended => "Ended",
            Self::Canceled => "Canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaLanguage {
    English,
    Arabic,
    Hindi,
    Urdu,
    Spanish,
    French,
    Korean,
    Japanese,
}

impl MediaLanguage {
    pub const ALL: [Self; 8] = [
        Self::English,
        Self::Arabic,
        Self::Hindi,
        Self::Urdu,
        Self::Spanish,
        Self::French,
        Self::Korean,
        Self::Japanese,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
            Self::Urdu => "ur",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::Korean => "ko",
            Self::Japanese => "ja",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Self::English),
            "ar" => Some(Self::Arabic),
            "hi" => Some(Self::Hindi),
            "ur" => Some(Self::Urdu),
            "es" => Some(Self::Spanish),
            "fr" => Some(Self::French),
            "ko" => Some(Self::Korean),
            "ja" => Some(Self::Japanese),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
            Self::Urdu => "Urdu",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::Korean => "Korean",
            Self::Japanese => "Japanese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCountry {
    UnitedStates,
    UnitedKingdom,
    India,
    Pakistan,
    Palestine,
    France,
    SouthKorea,
    Japan,
}

impl MediaCountry {
    pub const ALL: [Self; 8] = [
        Self::UnitedStates,
        Self::UnitedKingdom,
        Self::India,
        Self::Pakistan,
        Self::Palestine,
        Self::France,
        Self::SouthKorea,
        Self::Japan,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnitedStates => "US",
            Self::UnitedKingdom => "GB",
            Self::India => "IN",
            Self::Pakistan => "PK",
            Self::Palestine => "PS",
            Self::France => "FR",
            Self::SouthKorea => "KR",
            Self::Japan => "JP",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "US" => Some(Self::UnitedStates),
            "GB" => Some(Self::UnitedKingdom),
            "IN" => Some(Self::India),
            "PK" => Some(Self::Pakistan),
            "PS" => Some(Self::Palestine),
            "FR" => Some(Self::France),
            "KR" => Some(Self::SouthKorea),
            "JP" => Some(Self::Japan),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::UnitedKingdom => "United Kingdom",
            Self::India => "India",
            Self::Pakistan => "Pakistan",
            Self::Palestine => "Palestine",
            Self::France => "France",
            Self::SouthKorea => "South Korea",
            Self::Japan => "Japan",
        }
    }
}

/// Last server-confirmed state of one series' editable attributes.
/// Replaced wholesale on every successful refetch or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: SeriesId,
    pub title: String,
    pub plot_summary: String,
    pub release_date: Date,
    pub image_url: String,
    pub genre: MediaGenre,
    pub status: SeriesStatus,
    pub original_language: MediaLanguage,
    pub origin_country: MediaCountry,
    pub budget_cents: i64,
    pub net_profit_cents: i64,
    pub revenue_cents: i64,
}
