// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::form::FieldId;

/// Screen position the popover editor is pinned to, measured from the cell of
/// the edit affordance that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub x: u16,
    pub y: u16,
}

/// Tracks which field is eligible for editing (hovered) and which field, if
/// any, has its popover editor open. At most one editor is open at a time;
/// opening a field's editor replaces any other open editor.
#[derive(Debug, Clone, Default)]
pub struct EditController {
    hovered: Option<FieldId>,
    open: Option<(FieldId, Anchor)>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<FieldId> {
        self.hovered
    }

    pub fn hover(&mut self, field: FieldId) {
        self.hovered = Some(field);
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// The affordance shows for the hovered field even while another field's
    /// editor is open.
    pub fn shows_affordance(&self, field: FieldId) -> bool {
        self.hovered == Some(field)
    }

    pub fn open_editor(&self) -> Option<(FieldId, Anchor)> {
        self.open
    }

    pub fn is_open(&self, field: FieldId) -> bool {
        matches!(self.open, Some((open, _)) if open == field)
    }

    pub fn open(&mut self, field: FieldId, anchor: Anchor) -> Result<()> {
        if self.hovered != Some(field) {
            bail!(
                "cannot open an editor for {} while it is not the active field",
                field.as_str()
            );
        }
        self.open = Some((field, anchor));
        Ok(())
    }

    /// Dismissal discards nothing by itself; whatever the editor already
    /// wrote into the form overlay stays there.
    pub fn dismiss(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{Anchor, EditController};
    use crate::form::FieldId;
    use anyhow::Result;

    #[test]
    fn affordance_follows_hover() {
        let mut controller = EditController::new();
        assert!(!controller.shows_affordance(FieldId::Title));

        controller.hover(FieldId::Title);
        assert!(controller.shows_affordance(FieldId::Title));
        assert!(!controller.shows_affordance(FieldId::Budget));

        controller.hover(FieldId::Budget);
        assert!(!controller.shows_affordance(FieldId::Title));

        controller.clear_hover();
        assert!(!controller.shows_affordance(FieldId::Budget));
    }

    #[test]
    fn open_requires_hover_on_the_same_field() {
        let mut controller = EditController::new();
        controller.hover(FieldId::Genre);
        assert!(controller.open(FieldId::Title, Anchor::default()).is_err());
        assert!(controller.open_editor().is_none());

        controller
            .open(FieldId::Genre, Anchor { x: 12, y: 3 })
            .expect("hovered field should open");
        assert!(controller.is_open(FieldId::Genre));
    }

    #[test]
    fn opening_a_second_editor_replaces_the_first() -> Result<()> {
        let mut controller = EditController::new();
        controller.hover(FieldId::Title);
        controller.open(FieldId::Title, Anchor { x: 4, y: 2 })?;

        controller.hover(FieldId::Status);
        controller.open(FieldId::Status, Anchor { x: 30, y: 8 })?;

        assert!(!controller.is_open(FieldId::Title));
        assert_eq!(
            controller.open_editor(),
            Some((FieldId::Status, Anchor { x: 30, y: 8 }))
        );
        Ok(())
    }

    #[test]
    fn dismiss_closes_without_touching_hover() -> Result<()> {
        let mut controller = EditController::new();
        controller.hover(FieldId::PlotSummary);
        controller.open(FieldId::PlotSummary, Anchor::default())?;

        controller.dismiss();
        assert!(controller.open_editor().is_none());
        assert_eq!(controller.hovered(), Some(FieldId::PlotSummary));
        Ok(())
    }
}
