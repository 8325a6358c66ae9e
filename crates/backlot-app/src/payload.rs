// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::form::{FieldId, FieldValue, SeriesForm};

/// Partial update for one series, shaped the way the catalog service expects
/// it: scalar attributes at the top level, the rest bucketed into nested
/// groups. Only fields the user actually touched are present; everything else
/// is omitted from the serialized body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesUpdate {
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "PlotSummary", skip_serializing_if = "Option::is_none")]
    pub plot_summary: Option<String>,
    /// Epoch milliseconds at UTC midnight of the chosen day.
    #[serde(rename = "ReleaseDate", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<i64>,
    #[serde(rename = "Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageUpdate>,
    #[serde(rename = "AdditionalInfo", skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfoUpdate>,
    #[serde(rename = "FinancialInfo", skip_serializing_if = "Option::is_none")]
    pub financial_info: Option<FinancialInfoUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageUpdate {
    #[serde(rename = "Url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdditionalInfoUpdate {
    #[serde(rename = "Genre", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "OriginalLanguage", skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(rename = "OriginCountry", skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinancialInfoUpdate {
    #[serde(rename = "Budget", skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(rename = "NetProfit", skip_serializing_if = "Option::is_none")]
    pub net_profit: Option<i64>,
    #[serde(rename = "Revenue", skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,
}

fn epoch_millis(date: time::Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp() * 1000
}

impl SeriesUpdate {
    /// Builds the update from the form's override overlay. Every overridden
    /// field is carried, routed to its payload group; a group with no
    /// overridden members never appears in the body.
    pub fn from_form(form: &SeriesForm) -> Self {
        let mut update = Self::default();
        for field in form.overridden_fields() {
            update.apply(field, form.current_value(field));
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, field: FieldId, value: FieldValue) {
        match (field, value) {
            (FieldId::Title, FieldValue::Text(text)) => self.title = Some(text),
            (FieldId::PlotSummary, FieldValue::Text(text)) => self.plot_summary = Some(text),
            (FieldId::ReleaseDate, FieldValue::Date(date)) => {
                self.release_date = Some(epoch_millis(date));
            }
            (FieldId::ImageUrl, FieldValue::Text(url)) => {
                self.image.get_or_insert_with(ImageUpdate::default).url = Some(url);
            }
            (FieldId::Genre, FieldValue::Genre(genre)) => {
                self.additional_info
                    .get_or_insert_with(AdditionalInfoUpdate::default)
                    .genre = Some(genre.as_str().to_owned());
            }
            (FieldId::Status, FieldValue::Status(status)) => {
                self.additional_info
                    .get_or_insert_with(AdditionalInfoUpdate::default)
                    .status = Some(status.as_str().to_owned());
            }
            (FieldId::OriginalLanguage, FieldValue::Language(language)) => {
                self.additional_info
                    .get_or_insert_with(AdditionalInfoUpdate::default)
                    .original_language = Some(language.as_str().to_owned());
            }
            (FieldId::OriginCountry, FieldValue::Country(country)) => {
                self.additional_info
                    .get_or_insert_with(AdditionalInfoUpdate::default)
                    .origin_country = Some(country.as_str().to_owned());
            }
            (FieldId::Budget, FieldValue::Money(cents)) => {
                self.financial_info
                    .get_or_insert_with(FinancialInfoUpdate::default)
                    .budget = Some(cents);
            }
            (FieldId::NetProfit, FieldValue::Money(cents)) => {
                self.financial_info
                    .get_or_insert_with(FinancialInfoUpdate::default)
                    .net_profit = Some(cents);
            }
            (FieldId::Revenue, FieldValue::Money(cents)) => {
                self.financial_info
                    .get_or_insert_with(FinancialInfoUpdate::default)
                    .revenue = Some(cents);
            }
            // SeriesForm::set_override enforces kind agreement, so a
            // mismatched pairing cannot reach this point.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesUpdate;
    use crate::form::{FieldId, FieldValue, SeriesForm};
    use crate::{
        MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId, SeriesStatus,
    };
    use anyhow::Result;
    use time::{Date, Month};

    fn sample_snapshot() -> SeriesDetails {
        SeriesDetails {
            id: SeriesId::new(3),
            title: "Signal Lost".to_owned(),
            plot_summary: "A station goes quiet.".to_owned(),
            release_date: Date::from_calendar_date(2023, Month::October, 1).expect("valid date"),
            image_url: "https://img.example.com/3.jpg".to_owned(),
            genre: MediaGenre::Thriller,
            status: SeriesStatus::Ended,
            original_language: MediaLanguage::Korean,
            origin_country: MediaCountry::SouthKorea,
            budget_cents: 120_000_00,
            net_profit_cents: 20_000_00,
            revenue_cents: 140_000_00,
        }
    }

    #[test]
    fn untouched_form_serializes_to_empty_object() {
        let form = SeriesForm::new(sample_snapshot());
        let update = SeriesUpdate::from_form(&form);
        assert!(update.is_empty());
        assert_eq!(
            serde_json::to_string(&update).expect("serializable"),
            "{}"
        );
    }

    #[test]
    fn overridden_fields_route_to_their_groups() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Title, FieldValue::Text("Signal Found".to_owned()))?;
        form.set_override(FieldId::Genre, FieldValue::Genre(MediaGenre::Drama))?;
        form.set_override(FieldId::Budget, FieldValue::Money(99_00))?;
        form.set_override(
            FieldId::ImageUrl,
            FieldValue::Text("https://img.example.com/3-v2.jpg".to_owned()),
        )?;

        let update = SeriesUpdate::from_form(&form);
        let body: serde_json::Value = serde_json::to_value(&update)?;
        assert_eq!(body["Title"], "Signal Found");
        assert_eq!(body["Image"]["Url"], "https://img.example.com/3-v2.jpg");
        assert_eq!(body["AdditionalInfo"]["Genre"], "drama");
        assert_eq!(body["FinancialInfo"]["Budget"], 99_00);
        // Groups with no touched members stay absent.
        assert!(body.get("PlotSummary").is_none());
        assert!(body.get("ReleaseDate").is_none());
        assert!(body["AdditionalInfo"].get("Status").is_none());
        assert!(body["FinancialInfo"].get("Revenue").is_none());
        Ok(())
    }

    #[test]
    fn release_date_becomes_epoch_millis_at_utc_midnight() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        let date = Date::from_calendar_date(2024, Month::March, 14)?;
        form.set_override(FieldId::ReleaseDate, FieldValue::Date(date))?;

        let update = SeriesUpdate::from_form(&form);
        // 2024-03-14T00:00:00Z
        assert_eq!(update.release_date, Some(1_710_374_400_000));
        Ok(())
    }

    #[test]
    fn enum_fields_serialize_their_wire_strings() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Status, FieldValue::Status(SeriesStatus::OnHiatus))?;
        form.set_override(
            FieldId::OriginalLanguage,
            FieldValue::Language(MediaLanguage::Urdu),
        )?;
        form.set_override(
            FieldId::OriginCountry,
            FieldValue::Country(MediaCountry::Pakistan),
        )?;

        let body = serde_json::to_value(SeriesUpdate::from_form(&form))?;
        assert_eq!(body["AdditionalInfo"]["Status"], "on_hiatus");
        assert_eq!(body["AdditionalInfo"]["OriginalLanguage"], "ur");
        assert_eq!(body["AdditionalInfo"]["OriginCountry"], "PK");
        Ok(())
    }
}
