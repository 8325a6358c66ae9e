// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::BTreeMap;
use time::Date;

use crate::{MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesStatus};

/// One editable attribute of the series details card. The enum is closed, so
/// an unknown field name is unrepresentable; `parse` is the lookup for
/// externally supplied names and returns `None` for anything it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldId {
    Title,
    ReleaseDate,
    Genre,
    OriginCountry,
    OriginalLanguage,
    Status,
    NetProfit,
    Revenue,
    Budget,
    PlotSummary,
    ImageUrl,
}

/// Where a field lands in the update payload. The grouping is a fixed wire
/// contract; see `payload::SeriesUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadGroup {
    TopLevel,
    Image,
    AdditionalInfo,
    FinancialInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Money,
    Genre,
    Status,
    Language,
    Country,
}

impl FieldId {
    pub const ALL: [Self; 11] = [
        Self::Title,
        Self::ReleaseDate,
        Self::Genre,
        Self::OriginCountry,
        Self::OriginalLanguage,
        Self::Status,
        Self::NetProfit,
        Self::Revenue,
        Self::Budget,
        Self::PlotSummary,
        Self::ImageUrl,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ReleaseDate => "release_date",
            Self::Genre => "genre",
            Self::OriginCountry => "origin_country",
            Self::OriginalLanguage => "original_language",
            Self::Status => "status",
            Self::NetProfit => "net_profit",
            Self::Revenue => "revenue",
            Self::Budget => "budget",
            Self::PlotSummary => "plot_summary",
            Self::ImageUrl => "image_url",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::ReleaseDate => "Release Date",
            Self::Genre => "Genre",
            Self::OriginCountry => "Origin Country",
            Self::OriginalLanguage => "Original Language",
            Self::Status => "Status",
            Self::NetProfit => "Net Profit",
            Self::Revenue => "Revenue",
            Self::Budget => "Budget",
            Self::PlotSummary => "Plot Summary",
            Self::ImageUrl => "Image URL",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Title | Self::PlotSummary | Self::ImageUrl => FieldKind::Text,
            Self::ReleaseDate => FieldKind::Date,
            Self::NetProfit | Self::Revenue | Self::Budget => FieldKind::Money,
            Self::Genre => FieldKind::Genre,
            Self::Status => FieldKind::Status,
            Self::OriginalLanguage => FieldKind::Language,
            Self::OriginCountry => FieldKind::Country,
        }
    }

    pub const fn group(self) -> PayloadGroup {
        match self {
            Self::Title | Self::PlotSummary | Self::ReleaseDate => PayloadGroup::TopLevel,
            Self::ImageUrl => PayloadGroup::Image,
            Self::Genre | Self::Status | Self::OriginalLanguage | Self::OriginCountry => {
                PayloadGroup::AdditionalInfo
            }
            Self::NetProfit | Self::Revenue | Self::Budget => PayloadGroup::FinancialInfo,
        }
    }
}

/// A field value in the representation its edit widget produces. Display
/// formatting (date rendering, money suffixing) happens at the render
/// boundary, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(Date),
    Money(i64),
    Genre(MediaGenre),
    Status(SeriesStatus),
    Language(MediaLanguage),
    Country(MediaCountry),
}

impl FieldValue {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Date(_) => FieldKind::Date,
            Self::Money(_) => FieldKind::Money,
            Self::Genre(_) => FieldKind::Genre,
            Self::Status(_) => FieldKind::Status,
            Self::Language(_) => FieldKind::Language,
            Self::Country(_) => FieldKind::Country,
        }
    }
}

/// The shared form state for one series card: the last server-confirmed
/// snapshot plus an overlay of pending edits. Each mounted card owns exactly
/// one of these; it is never shared across entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesForm {
    snapshot: SeriesDetails,
    overrides: BTreeMap<FieldId, FieldValue>,
}

impl SeriesForm {
    pub fn new(snapshot: SeriesDetails) -> Self {
        Self {
            snapshot,
            overrides: BTreeMap::new(),
        }
    }

    pub fn snapshot(&self) -> &SeriesDetails {
        &self.snapshot
    }

    pub fn snapshot_value(&self, field: FieldId) -> FieldValue {
        match field {
            FieldId::Title => FieldValue::Text(self.snapshot.title.clone()),
            FieldId::PlotSummary => FieldValue::Text(self.snapshot.plot_summary.clone()),
            FieldId::ImageUrl => FieldValue::Text(self.snapshot.image_url.clone()),
            FieldId::ReleaseDate => FieldValue::Date(self.snapshot.release_date),
            FieldId::Genre => FieldValue::Genre(self.snapshot.genre),
            FieldId::Status => FieldValue::Status(self.snapshot.status),
            FieldId::OriginalLanguage => FieldValue::Language(self.snapshot.original_language),
            FieldId::OriginCountry => FieldValue::Country(self.snapshot.origin_country),
            FieldId::Budget => FieldValue::Money(self.snapshot.budget_cents),
            FieldId::NetProfit => FieldValue::Money(self.snapshot.net_profit_cents),
            FieldId::Revenue => FieldValue::Money(self.snapshot.revenue_cents),
        }
    }

    /// The value the card renders: the pending override when present, else
    /// the snapshot value.
    pub fn current_value(&self, field: FieldId) -> FieldValue {
        self.overrides
            .get(&field)
            .cloned()
            .unwrap_or_else(|| self.snapshot_value(field))
    }

    pub fn override_value(&self, field: FieldId) -> Option<&FieldValue> {
        self.overrides.get(&field)
    }

    pub fn set_override(&mut self, field: FieldId, value: FieldValue) -> Result<()> {
        if value.kind() != field.kind() {
            bail!(
                "field {} expects a {:?} value, got {:?}",
                field.as_str(),
                field.kind(),
                value.kind()
            );
        }
        self.overrides.insert(field, value);
        Ok(())
    }

    pub fn clear_override(&mut self, field: FieldId) {
        self.overrides.remove(&field);
    }

    /// Dirtiness is value equality against the snapshot, not override
    /// presence: an override set back to the original value contributes
    /// nothing.
    pub fn is_dirty(&self) -> bool {
        self.overrides
            .iter()
            .any(|(field, value)| *value != self.snapshot_value(*field))
    }

    pub fn dirty_fields(&self) -> Vec<FieldId> {
        self.overrides
            .iter()
            .filter(|(field, value)| **value != self.snapshot_value(**field))
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn overridden_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.overrides.keys().copied()
    }

    pub fn reset(&mut self) {
        self.overrides.clear();
    }

    /// Replaces the snapshot (post-save or post-refetch) and clears the
    /// overlay; the new snapshot is the server's word and already encodes any
    /// saved edits.
    pub fn commit_snapshot(&mut self, snapshot: SeriesDetails) {
        self.snapshot = snapshot;
        self.overrides.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldId, FieldValue, SeriesForm};
    use crate::{
        MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId, SeriesStatus,
    };
    use anyhow::Result;
    use time::{Date, Month};

    fn sample_snapshot() -> SeriesDetails {
        SeriesDetails {
            id: SeriesId::new(7),
            title: "Foo".to_owned(),
            plot_summary: "A retrospective.".to_owned(),
            release_date: Date::from_calendar_date(2024, Month::March, 14).expect("valid date"),
            image_url: "https://img.example.com/7.jpg".to_owned(),
            genre: MediaGenre::Drama,
            status: SeriesStatus::Airing,
            original_language: MediaLanguage::English,
            origin_country: MediaCountry::UnitedStates,
            budget_cents: 100,
            net_profit_cents: 40,
            revenue_cents: 250,
        }
    }

    #[test]
    fn unoverridden_fields_read_through_to_snapshot() {
        let form = SeriesForm::new(sample_snapshot());
        for field in FieldId::ALL {
            assert_eq!(form.current_value(field), form.snapshot_value(field));
        }
        assert!(!form.is_dirty());
    }

    #[test]
    fn override_differing_from_snapshot_marks_dirty() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Title, FieldValue::Text("Bar".to_owned()))?;
        assert!(form.is_dirty());
        assert_eq!(
            form.current_value(FieldId::Title),
            FieldValue::Text("Bar".to_owned())
        );
        assert_eq!(form.current_value(FieldId::Budget), FieldValue::Money(100));
        Ok(())
    }

    #[test]
    fn override_equal_to_snapshot_does_not_count_as_dirty() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Title, FieldValue::Text("Bar".to_owned()))?;
        form.set_override(FieldId::Budget, FieldValue::Money(9_000))?;
        assert_eq!(form.dirty_fields(), vec![FieldId::Title, FieldId::Budget]);

        form.set_override(FieldId::Title, FieldValue::Text("Foo".to_owned()))?;
        assert!(form.is_dirty());
        assert_eq!(form.dirty_fields(), vec![FieldId::Budget]);

        form.set_override(FieldId::Budget, FieldValue::Money(100))?;
        assert!(!form.is_dirty());
        Ok(())
    }

    #[test]
    fn reset_restores_snapshot_reads() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Title, FieldValue::Text("Bar".to_owned()))?;
        form.set_override(FieldId::Genre, FieldValue::Genre(MediaGenre::Horror))?;

        form.reset();
        assert!(!form.is_dirty());
        for field in FieldId::ALL {
            assert_eq!(form.current_value(field), form.snapshot_value(field));
        }
        Ok(())
    }

    #[test]
    fn commit_snapshot_replaces_baseline_and_clears_overlay() -> Result<()> {
        let mut form = SeriesForm::new(sample_snapshot());
        form.set_override(FieldId::Title, FieldValue::Text("Bar".to_owned()))?;

        let mut saved = sample_snapshot();
        saved.title = "Bar".to_owned();
        form.commit_snapshot(saved);

        assert!(!form.is_dirty());
        assert_eq!(form.overridden_fields().count(), 0);
        assert_eq!(
            form.current_value(FieldId::Title),
            FieldValue::Text("Bar".to_owned())
        );
        Ok(())
    }

    #[test]
    fn set_override_rejects_mismatched_value_kind() {
        let mut form = SeriesForm::new(sample_snapshot());
        let error = form
            .set_override(FieldId::Budget, FieldValue::Text("lots".to_owned()))
            .expect_err("kind mismatch should fail");
        assert!(error.to_string().contains("budget"));
        assert!(!form.is_dirty());
    }

    #[test]
    fn field_lookup_by_name_returns_absent_for_unknown() {
        assert_eq!(FieldId::parse("title"), Some(FieldId::Title));
        assert_eq!(FieldId::parse("net_profit"), Some(FieldId::NetProfit));
        assert_eq!(FieldId::parse("director"), None);
    }
}
