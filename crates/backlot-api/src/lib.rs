// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

use backlot_app::{
    EpisodeFormInput, EpisodeId, MediaCountry, MediaGenre, MediaLanguage, SeasonFormInput,
    SeasonId, SeriesDetails, SeriesFormInput, SeriesId, SeriesStatus, SeriesUpdate,
};

/// Blocking client for the catalog service. One instance is shared for the
/// life of the program; reqwest pools connections underneath.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            token: token.map(str::to_owned),
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub fn ping(&self) -> Result<()> {
        let response = self
            .authorize(self.http.get(format!("{}/health", self.base_url)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }

    pub fn get_series(&self, id: SeriesId) -> Result<SeriesDetails> {
        let response = self
            .authorize(self.http.get(format!("{}/series/{}", self.base_url, id.get())))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: SeriesDto = response.json().context("decode series")?;
        parsed.into_details()
    }

    /// Sends a partial update and returns the server's fresh copy, which the
    /// caller adopts as the new snapshot.
    pub fn update_series(&self, id: SeriesId, update: &SeriesUpdate) -> Result<SeriesDetails> {
        if update.is_empty() {
            bail!("series update has no fields");
        }

        let response = self
            .authorize(
                self.http
                    .patch(format!("{}/series/{}", self.base_url, id.get())),
            )
            .json(update)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: SeriesDto = response.json().context("decode updated series")?;
        parsed.into_details()
    }

    pub fn create_series(&self, form: &SeriesFormInput) -> Result<SeriesDetails> {
        let body = CreateSeriesRequest::from_form(form);
        let response = self
            .authorize(self.http.post(format!("{}/series", self.base_url)))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: SeriesDto = response.json().context("decode created series")?;
        parsed.into_details()
    }

    pub fn create_season(&self, form: &SeasonFormInput) -> Result<SeasonId> {
        let body = CreateSeasonRequest::from_form(form);
        let response = self
            .authorize(self.http.post(format!(
                "{}/series/{}/seasons",
                self.base_url,
                form.series_id.get()
            )))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: CreatedDto = response.json().context("decode created season")?;
        Ok(SeasonId::new(parsed.id))
    }

    pub fn create_episode(&self, form: &EpisodeFormInput) -> Result<EpisodeId> {
        let body = CreateEpisodeRequest::from_form(form);
        let response = self
            .authorize(self.http.post(format!(
                "{}/seasons/{}/episodes",
                self.base_url,
                form.season_id.get()
            )))
            .json(&body)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: CreatedDto = response.json().context("decode created episode")?;
        Ok(EpisodeId::new(parsed.id))
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach catalog service at {} -- check api.base_url ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.message.is_empty()
    {
        return anyhow!("catalog error ({}): {}", status.as_u16(), error.message);
    }

    if let Ok(parsed) = serde_json::from_str::<FlatErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("catalog error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') {
        return anyhow!("catalog error ({}): {}", status.as_u16(), body);
    }

    anyhow!("catalog service returned {}", status.as_u16())
}

fn epoch_millis(date: time::Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp() * 1000
}

fn date_from_epoch_millis(millis: i64) -> Result<time::Date> {
    let timestamp = OffsetDateTime::from_unix_timestamp(millis / 1000)
        .with_context(|| format!("release date {millis} out of range"))?;
    Ok(timestamp.date())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct FlatErrorEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedDto {
    id: i64,
}

/// Series as the catalog service returns it. The read shape mirrors the
/// update shape: scalars at the top level, the rest in nested groups.
#[derive(Debug, Deserialize)]
struct SeriesDto {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "PlotSummary", default)]
    plot_summary: String,
    #[serde(rename = "ReleaseDate")]
    release_date: i64,
    #[serde(rename = "Image", default)]
    image: Option<ImageDto>,
    #[serde(rename = "AdditionalInfo")]
    additional_info: AdditionalInfoDto,
    #[serde(rename = "FinancialInfo", default)]
    financial_info: Option<FinancialInfoDto>,
}

#[derive(Debug, Deserialize)]
struct ImageDto {
    #[serde(rename = "Url", default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct AdditionalInfoDto {
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "OriginalLanguage")]
    original_language: String,
    #[serde(rename = "OriginCountry")]
    origin_country: String,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialInfoDto {
    #[serde(rename = "Budget", default)]
    budget: i64,
    #[serde(rename = "NetProfit", default)]
    net_profit: i64,
    #[serde(rename = "Revenue", default)]
    revenue: i64,
}

impl SeriesDto {
    fn into_details(self) -> Result<SeriesDetails> {
        let genre = MediaGenre::parse(&self.additional_info.genre)
            .ok_or_else(|| anyhow!("unknown genre {:?}", self.additional_info.genre))?;
        let status = SeriesStatus::parse(&self.additional_info.status)
            .ok_or_else(|| anyhow!("unknown status {:?}", self.additional_info.status))?;
        let original_language = MediaLanguage::parse(&self.additional_info.original_language)
            .ok_or_else(|| {
                anyhow!(
                    "unknown language {:?}",
                    self.additional_info.original_language
                )
            })?;
        let origin_country = MediaCountry::parse(&self.additional_info.origin_country)
            .ok_or_else(|| anyhow!("unknown country {:?}", self.additional_info.origin_country))?;
        let financial = self.financial_info.unwrap_or_default();

        Ok(SeriesDetails {
            id: SeriesId::new(self.id),
            title: self.title,
            plot_summary: self.plot_summary,
            release_date: date_from_epoch_millis(self.release_date)?,
            image_url: self.image.map(|image| image.url).unwrap_or_default(),
            genre,
            status,
            original_language,
            origin_country,
            budget_cents: financial.budget,
            net_profit_cents: financial.net_profit,
            revenue_cents: financial.revenue,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateSeriesRequest {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "PlotSummary")]
    plot_summary: String,
    #[serde(rename = "ReleaseDate", skip_serializing_if = "Option::is_none")]
    release_date: Option<i64>,
    #[serde(rename = "Image", skip_serializing_if = "Option::is_none")]
    image: Option<CreateImageRequest>,
    #[serde(rename = "AdditionalInfo")]
    additional_info: CreateAdditionalInfoRequest,
    #[serde(rename = "FinancialInfo")]
    financial_info: CreateFinancialInfoRequest,
}

#[derive(Debug, Serialize)]
struct CreateImageRequest {
    #[serde(rename = "Url")]
    url: String,
}

#[derive(Debug, Serialize)]
struct CreateAdditionalInfoRequest {
    #[serde(rename = "Genre")]
    genre: &'static str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "OriginalLanguage")]
    original_language: &'static str,
    #[serde(rename = "OriginCountry")]
    origin_country: &'static str,
}

#[derive(Debug, Serialize)]
struct CreateFinancialInfoRequest {
    #[serde(rename = "Budget")]
    budget: i64,
    #[serde(rename = "NetProfit")]
    net_profit: i64,
    #[serde(rename = "Revenue")]
    revenue: i64,
}

impl CreateSeriesRequest {
    fn from_form(form: &SeriesFormInput) -> Self {
        let image_url = form.image_url.trim();
        Self {
            title: form.title.trim().to_owned(),
            plot_summary: form.plot_summary.clone(),
            release_date: form.release_date.map(epoch_millis),
            image: (!image_url.is_empty()).then(|| CreateImageRequest {
                url: image_url.to_owned(),
            }),
            additional_info: CreateAdditionalInfoRequest {
                genre: form.genre.as_str(),
                status: form.status.as_str(),
                original_language: form.original_language.as_str(),
                origin_country: form.origin_country.as_str(),
            },
            financial_info: CreateFinancialInfoRequest {
                budget: form.budget_cents.unwrap_or(0),
                net_profit: form.net_profit_cents.unwrap_or(0),
                revenue: form.revenue_cents.unwrap_or(0),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateSeasonRequest {
    #[serde(rename = "Number")]
    number: i32,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "ReleaseDate", skip_serializing_if = "Option::is_none")]
    release_date: Option<i64>,
}

impl CreateSeasonRequest {
    fn from_form(form: &SeasonFormInput) -> Self {
        Self {
            number: form.number,
            title: form.title.trim().to_owned(),
            release_date: form.release_date.map(epoch_millis),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateEpisodeRequest {
    #[serde(rename = "Number")]
    number: i32,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "PlotSummary")]
    plot_summary: String,
    #[serde(rename = "RuntimeMinutes", skip_serializing_if = "Option::is_none")]
    runtime_minutes: Option<i32>,
    #[serde(rename = "AirDate", skip_serializing_if = "Option::is_none")]
    air_date: Option<i64>,
}

impl CreateEpisodeRequest {
    fn from_form(form: &EpisodeFormInput) -> Self {
        Self {
            number: form.number,
            title: form.title.trim().to_owned(),
            plot_summary: form.plot_summary.clone(),
            runtime_minutes: form.runtime_minutes,
            air_date: form.air_date.map(epoch_millis),
        }
    }
}
