// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::editor::EditController;
use crate::form::{FieldId, FieldValue, SeriesForm};
use crate::model::SeriesDetails;
use crate::payload::SeriesUpdate;

/// Save lifecycle of one details card. `Saving` gates `begin_save`, so at
/// most one update per card is in flight; editing and cancel stay available
/// throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    Clean,
    Dirty,
    Saving,
}

/// One mounted series details card: the shared form, the edit controller, and
/// the save lifecycle. The TUI owns one of these per displayed series.
#[derive(Debug, Clone)]
pub struct DetailsCard {
    form: SeriesForm,
    editor: EditController,
    saving: bool,
    last_error: Option<String>,
}

impl DetailsCard {
    pub fn new(snapshot: SeriesDetails) -> Self {
        Self {
            form: SeriesForm::new(snapshot),
            editor: EditController::new(),
            saving: false,
            last_error: None,
        }
    }

    pub fn form(&self) -> &SeriesForm {
        &self.form
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditController {
        &mut self.editor
    }

    pub fn phase(&self) -> CardPhase {
        if self.saving {
            CardPhase::Saving
        } else if self.form.is_dirty() {
            CardPhase::Dirty
        } else {
            CardPhase::Clean
        }
    }

    /// The save/cancel bar shows exactly while there is something to save
    /// and no save is running.
    pub fn shows_action_bar(&self) -> bool {
        self.phase() == CardPhase::Dirty
    }

    /// The message of the most recent failed save, until the next save
    /// attempt, cancel, or refetch.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Editing stays available while a save is in flight; the response
    /// replaces the snapshot wholesale either way.
    pub fn set_field(&mut self, field: FieldId, value: FieldValue) -> Result<()> {
        self.form.set_override(field, value)
    }

    /// Starts a save: returns the partial update to send and moves the card
    /// into `Saving`. Fails when there is nothing dirty or a save is already
    /// running; the caller must not issue a request in either case.
    pub fn begin_save(&mut self) -> Result<SeriesUpdate> {
        if self.saving {
            bail!("a save is already in flight for this series");
        }
        if !self.form.is_dirty() {
            bail!("no changes to save");
        }
        self.editor.dismiss();
        let update = SeriesUpdate::from_form(&self.form);
        self.saving = true;
        self.last_error = None;
        Ok(update)
    }

    /// Save succeeded: the server's fresh copy becomes the new baseline and
    /// the overlay is dropped.
    pub fn complete_save(&mut self, snapshot: SeriesDetails) {
        self.form.commit_snapshot(snapshot);
        self.saving = false;
        self.last_error = None;
    }

    /// Save failed: the overlay stays intact so the user can retry or keep
    /// editing, and the message stays on the card for display.
    pub fn fail_save(&mut self, message: impl Into<String>) {
        self.saving = false;
        self.last_error = Some(message.into());
    }

    /// Cancel: drop every pending edit and fall back to the snapshot. Valid
    /// even while a save is in flight; the response still lands through
    /// `complete_save` or `fail_save` when it arrives.
    pub fn cancel(&mut self) {
        self.editor.dismiss();
        self.form.reset();
        self.last_error = None;
    }

    /// A refetch landed: adopt the server copy as the new baseline. Any
    /// unsaved overlay is discarded with it.
    pub fn refresh(&mut self, snapshot: SeriesDetails) {
        self.editor.dismiss();
        self.form.commit_snapshot(snapshot);
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{CardPhase, DetailsCard};
    use crate::form::{FieldId, FieldValue};
    use crate::{
        MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId, SeriesStatus,
    };
    use anyhow::Result;
    use time::{Date, Month};

    fn sample_snapshot() -> SeriesDetails {
        SeriesDetails {
            id: SeriesId::new(11),
            title: "Harbor Lights".to_owned(),
            plot_summary: "A port town after the storm.".to_owned(),
            release_date: Date::from_calendar_date(2022, Month::June, 9).expect("valid date"),
            image_url: "https://img.example.com/11.jpg".to_owned(),
            genre: MediaGenre::Drama,
            status: SeriesStatus::Airing,
            original_language: MediaLanguage::English,
            origin_country: MediaCountry::UnitedKingdom,
            budget_cents: 100,
            net_profit_cents: 0,
            revenue_cents: 100,
        }
    }

    #[test]
    fn action_bar_tracks_dirtiness() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        assert_eq!(card.phase(), CardPhase::Clean);
        assert!(!card.shows_action_bar());

        card.set_field(FieldId::Title, FieldValue::Text("Harbor Dark".to_owned()))?;
        assert_eq!(card.phase(), CardPhase::Dirty);
        assert!(card.shows_action_bar());

        // Setting the field back to the snapshot value hides the bar again.
        card.set_field(FieldId::Title, FieldValue::Text("Harbor Lights".to_owned()))?;
        assert_eq!(card.phase(), CardPhase::Clean);
        assert!(!card.shows_action_bar());
        Ok(())
    }

    #[test]
    fn edit_two_fields_save_then_clean() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Title, FieldValue::Text("Harbor Dark".to_owned()))?;
        card.set_field(FieldId::Budget, FieldValue::Money(55_00))?;

        let update = card.begin_save()?;
        assert_eq!(update.title.as_deref(), Some("Harbor Dark"));
        assert_eq!(
            update.financial_info.as_ref().and_then(|f| f.budget),
            Some(55_00)
        );
        assert_eq!(card.phase(), CardPhase::Saving);

        let mut saved = sample_snapshot();
        saved.title = "Harbor Dark".to_owned();
        saved.budget_cents = 55_00;
        card.complete_save(saved);

        assert_eq!(card.phase(), CardPhase::Clean);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Harbor Dark".to_owned())
        );
        Ok(())
    }

    #[test]
    fn begin_save_refuses_clean_and_in_flight_cards() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        assert!(card.begin_save().is_err());

        card.set_field(FieldId::Revenue, FieldValue::Money(999))?;
        card.begin_save()?;
        let error = card.begin_save().expect_err("second save must be refused");
        assert!(error.to_string().contains("in flight"));
        Ok(())
    }

    #[test]
    fn failed_save_keeps_the_overlay_for_retry() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Status, FieldValue::Status(SeriesStatus::Ended))?;
        let first = card.begin_save()?;

        card.fail_save("catalog is down".to_owned());
        assert_eq!(card.phase(), CardPhase::Dirty);
        assert_eq!(card.last_error(), Some("catalog is down"));

        let retry = card.begin_save()?;
        assert_eq!(retry, first);
        assert_eq!(card.last_error(), None);
        Ok(())
    }

    #[test]
    fn cancel_discards_every_pending_edit() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Title, FieldValue::Text("Scrapped".to_owned()))?;
        card.set_field(FieldId::Genre, FieldValue::Genre(MediaGenre::Horror))?;

        card.cancel();
        assert_eq!(card.phase(), CardPhase::Clean);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Harbor Lights".to_owned())
        );
        assert_eq!(
            card.form().current_value(FieldId::Genre),
            FieldValue::Genre(MediaGenre::Drama)
        );
        Ok(())
    }

    #[test]
    fn cancel_works_while_a_save_is_in_flight() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Title, FieldValue::Text("Mid-save".to_owned()))?;
        card.begin_save()?;

        card.cancel();
        assert_eq!(card.phase(), CardPhase::Saving);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Harbor Lights".to_owned())
        );

        // The in-flight response still lands and becomes the baseline.
        let mut saved = sample_snapshot();
        saved.title = "Mid-save".to_owned();
        card.complete_save(saved);
        assert_eq!(card.phase(), CardPhase::Clean);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Mid-save".to_owned())
        );
        Ok(())
    }

    #[test]
    fn refresh_adopts_server_copy_and_drops_unsaved_edits() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Title, FieldValue::Text("Local Draft".to_owned()))?;

        let mut remote = sample_snapshot();
        remote.title = "Server Title".to_owned();
        card.refresh(remote);

        assert_eq!(card.phase(), CardPhase::Clean);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Server Title".to_owned())
        );
        Ok(())
    }

    #[test]
    fn editing_continues_while_a_save_is_in_flight() -> Result<()> {
        let mut card = DetailsCard::new(sample_snapshot());
        card.set_field(FieldId::Budget, FieldValue::Money(1))?;
        card.begin_save()?;

        card.set_field(FieldId::Title, FieldValue::Text("Mid-save".to_owned()))?;
        assert_eq!(card.phase(), CardPhase::Saving);
        assert_eq!(
            card.form().current_value(FieldId::Title),
            FieldValue::Text("Mid-save".to_owned())
        );
        Ok(())
    }
}
