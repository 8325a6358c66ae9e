// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use backlot_app::{
    Anchor, AppCommand, AppMode, AppState, CardPhase, DetailsCard, FieldId, FieldKind, FieldValue,
    FormKind, FormPayload, MediaCountry, MediaGenre, MediaLanguage, SeriesDetails, SeriesId,
    SeriesStatus, SeriesUpdate,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{Date, Month};

const EDIT_MARK: &str = "✎";
const OPEN_MARK: &str = "▸";
const VALUE_COLUMN: u16 = 24;
const CARD_TOP_ROWS: u16 = 1;
const POPOVER_WIDTH: u16 = 36;

/// Everything the TUI needs from the outside world. The catalog client and
/// the demo runtime both implement this; tests use a scripted stand-in.
pub trait AppRuntime {
    fn load_series(&mut self, id: SeriesId) -> Result<SeriesDetails>;
    fn update_series(&mut self, id: SeriesId, update: &SeriesUpdate) -> Result<SeriesDetails>;
    fn submit_form(&mut self, payload: &FormPayload) -> Result<()>;

    /// Runs the update and reports the outcome on the internal channel. The
    /// default implementation is synchronous; runtimes backed by a real
    /// network move it onto a thread.
    fn spawn_update(
        &mut self,
        id: SeriesId,
        update: &SeriesUpdate,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self
            .update_series(id, update)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::SaveFinished {
            series_id: id,
            outcome,
        })
        .map_err(|_| anyhow::anyhow!("save event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    SaveFinished {
        series_id: SeriesId,
        outcome: Result<SeriesDetails, String>,
    },
}

/// Widget state of the one open popover editor. The committed value lives in
/// the card's form overlay; this is only the in-progress input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorUiState {
    Text { buffer: String },
    Date { value: Date },
    Money { digits: String },
    Picker { query: String, selected: usize },
}

#[derive(Debug, Clone)]
struct FormFieldUi {
    label: &'static str,
    buffer: String,
}

#[derive(Debug, Clone)]
struct FormUiState {
    kind: FormKind,
    focus: usize,
    fields: Vec<FormFieldUi>,
}

impl FormUiState {
    fn blank(kind: FormKind) -> Self {
        let labels: &[&'static str] = match kind {
            FormKind::Series => &["title", "plot summary", "image url"],
            FormKind::Season => &["series id", "number", "title"],
            FormKind::Episode => &["season id", "number", "title", "runtime minutes"],
        };
        Self {
            kind,
            focus: 0,
            fields: labels
                .iter()
                .map(|label| FormFieldUi {
                    label,
                    buffer: String::new(),
                })
                .collect(),
        }
    }

    fn field(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.buffer.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct ViewData {
    card: Option<DetailsCard>,
    editor: Option<EditorUiState>,
    form: Option<FormUiState>,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    series_id: SeriesId,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    match runtime.load_series(series_id) {
        Ok(snapshot) => {
            let mut card = DetailsCard::new(snapshot);
            card.editor_mut().hover(FieldId::Title);
            view_data.card = Some(card);
        }
        Err(error) => {
            emit_status(
                state,
                &mut view_data,
                &internal_tx,
                format!("load failed: {error:#}"),
            );
        }
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::SaveFinished { series_id, outcome } => {
                handle_save_finished(state, view_data, series_id, outcome);
            }
        }
    }
}

fn handle_save_finished(
    state: &mut AppState,
    view_data: &mut ViewData,
    series_id: SeriesId,
    outcome: Result<SeriesDetails, String>,
) {
    let message = {
        let Some(card) = view_data.card.as_mut() else {
            return;
        };
        if card.form().snapshot().id != series_id {
            return;
        }
        match outcome {
            Ok(snapshot) => {
                card.complete_save(snapshot);
                format!("saved series {}", series_id.get())
            }
            Err(error) => {
                let message = format!("save failed: {error}");
                card.fail_save(error);
                message
            }
        }
    };
    set_status(state, view_data, message);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn set_status(state: &mut AppState, view_data: &mut ViewData, message: impl Into<String>) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    set_status(state, view_data, message);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.editor.is_some() {
        handle_editor_key(state, view_data, internal_tx, key);
        return false;
    }

    if matches!(state.mode, AppMode::Form(_)) {
        handle_form_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('?') => {
            view_data.help_visible = true;
        }
        KeyCode::Char('j') | KeyCode::Down => move_hover(view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_hover(view_data, -1),
        KeyCode::Char('g') => hover_to(view_data, 0),
        KeyCode::Char('G') => hover_to(view_data, FieldId::ALL.len() - 1),
        KeyCode::Enter => open_hovered_editor(state, view_data, internal_tx),
        KeyCode::Char('s') => trigger_save(state, runtime, view_data, internal_tx),
        KeyCode::Char('c') => cancel_edits(state, view_data, internal_tx),
        KeyCode::Char('r') => refetch(state, runtime, view_data, internal_tx),
        KeyCode::Char('n') => open_form(state, view_data, FormKind::Series),
        KeyCode::Char('o') => open_form(state, view_data, FormKind::Season),
        KeyCode::Char('O') => open_form(state, view_data, FormKind::Episode),
        _ => {}
    }
    false
}

fn move_hover(view_data: &mut ViewData, delta: isize) {
    let Some(card) = view_data.card.as_mut() else {
        return;
    };
    let fields = FieldId::ALL;
    let current = card
        .editor()
        .hovered()
        .and_then(|field| fields.iter().position(|entry| *entry == field))
        .unwrap_or(0) as isize;
    let len = fields.len() as isize;
    let next = (current + delta).rem_euclid(len) as usize;
    card.editor_mut().hover(fields[next]);
}

fn hover_to(view_data: &mut ViewData, index: usize) {
    if let Some(card) = view_data.card.as_mut() {
        card.editor_mut().hover(FieldId::ALL[index]);
    }
}

fn field_anchor(field: FieldId) -> Anchor {
    let row = FieldId::ALL
        .iter()
        .position(|entry| *entry == field)
        .unwrap_or(0) as u16;
    Anchor {
        x: VALUE_COLUMN,
        y: CARD_TOP_ROWS + row,
    }
}

fn open_hovered_editor(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let opened = {
        let Some(card) = view_data.card.as_mut() else {
            return;
        };
        let Some(field) = card.editor().hovered() else {
            return;
        };
        match card.editor_mut().open(field, field_anchor(field)) {
            Ok(()) => Ok(editor_state_for(field, card.form().current_value(field))),
            Err(error) => Err(format!("{error:#}")),
        }
    };
    match opened {
        Ok(editor) => view_data.editor = Some(editor),
        Err(message) => emit_status(state, view_data, internal_tx, message),
    }
}

fn editor_state_for(field: FieldId, current: FieldValue) -> EditorUiState {
    match current {
        FieldValue::Text(text) => EditorUiState::Text { buffer: text },
        FieldValue::Date(value) => EditorUiState::Date { value },
        FieldValue::Money(cents) => EditorUiState::Money {
            digits: money_input_from_cents(cents),
        },
        FieldValue::Genre(_)
        | FieldValue::Status(_)
        | FieldValue::Language(_)
        | FieldValue::Country(_) => {
            let options = picker_options(field);
            let selected = options
                .iter()
                .position(|(_, value)| *value == current)
                .unwrap_or(0);
            EditorUiState::Picker {
                query: String::new(),
                selected,
            }
        }
    }
}

fn handle_editor_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(field) = view_data
        .card
        .as_ref()
        .and_then(|card| card.editor().open_editor())
        .map(|(field, _)| field)
    else {
        view_data.editor = None;
        return;
    };
    let Some(mut editor) = view_data.editor.take() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            if let Some(card) = view_data.card.as_mut() {
                card.editor_mut().dismiss();
            }
        }
        KeyCode::Enter => {
            let value = match editor_value(field, &editor) {
                Ok(value) => value,
                Err(message) => {
                    view_data.editor = Some(editor);
                    emit_status(state, view_data, internal_tx, message);
                    return;
                }
            };
            let commit = view_data.card.as_mut().map(|card| {
                let result = card.set_field(field, value);
                card.editor_mut().dismiss();
                result
            });
            if let Some(Err(error)) = commit {
                emit_status(state, view_data, internal_tx, format!("{error:#}"));
            }
        }
        _ => {
            apply_editor_key(&mut editor, field, key);
            view_data.editor = Some(editor);
        }
    }
}

fn apply_editor_key(editor: &mut EditorUiState, field: FieldId, key: KeyEvent) {
    match editor {
        EditorUiState::Text { buffer } => match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            _ => {}
        },
        EditorUiState::Date { value } => {
            let shifted = match key.code {
                KeyCode::Char('h') | KeyCode::Left => value.previous_day(),
                KeyCode::Char('l') | KeyCode::Right => value.next_day(),
                KeyCode::Char('j') | KeyCode::Down => shift_date_by_days(*value, -7),
                KeyCode::Char('k') | KeyCode::Up => shift_date_by_days(*value, 7),
                KeyCode::Char('H') => shift_date_by_months(*value, -1),
                KeyCode::Char('L') => shift_date_by_months(*value, 1),
                KeyCode::Char('[') => shift_date_by_years(*value, -1),
                KeyCode::Char(']') => shift_date_by_years(*value, 1),
                _ => None,
            };
            if let Some(date) = shifted {
                *value = date;
            }
        }
        EditorUiState::Money { digits } => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => digits.push(c),
            KeyCode::Char('.') if !digits.contains('.') => digits.push('.'),
            KeyCode::Backspace => {
                digits.pop();
            }
            _ => {}
        },
        EditorUiState::Picker { query, selected } => {
            let option_count = filtered_picker_indices(&picker_options(field), query).len();
            match key.code {
                KeyCode::Char(c) => {
                    query.push(c);
                    *selected = 0;
                }
                KeyCode::Backspace => {
                    query.pop();
                    *selected = 0;
                }
                KeyCode::Down => {
                    if option_count > 0 {
                        *selected = (*selected + 1).min(option_count - 1);
                    }
                }
                KeyCode::Up => {
                    *selected = selected.saturating_sub(1);
                }
                _ => {}
            }
        }
    }
}

fn editor_value(field: FieldId, editor: &EditorUiState) -> Result<FieldValue, String> {
    match editor {
        EditorUiState::Text { buffer } => Ok(FieldValue::Text(buffer.clone())),
        EditorUiState::Date { value } => Ok(FieldValue::Date(*value)),
        EditorUiState::Money { digits } => parse_money_input(digits)
            .map(FieldValue::Money)
            .ok_or_else(|| format!("{:?} is not a money amount", digits)),
        EditorUiState::Picker { query, selected } => {
            let options = picker_options(field);
            let filtered = filtered_picker_indices(&options, query);
            filtered
                .get(*selected)
                .map(|index| options[*index].1.clone())
                .ok_or_else(|| format!("nothing matches {query:?}"))
        }
    }
}

fn picker_options(field: FieldId) -> Vec<(&'static str, FieldValue)> {
    match field.kind() {
        FieldKind::Genre => MediaGenre::ALL
            .into_iter()
            .map(|genre| (genre.label(), FieldValue::Genre(genre)))
            .collect(),
        FieldKind::Status => SeriesStatus::ALL
            .into_iter()
            .map(|status| (status.label(), FieldValue::Status(status)))
            .collect(),
        FieldKind::Language => MediaLanguage::ALL
            .into_iter()
            .map(|language| (language.label(), FieldValue::Language(language)))
            .collect(),
        FieldKind::Country => MediaCountry::ALL
            .into_iter()
            .map(|country| (country.label(), FieldValue::Country(country)))
            .collect(),
        FieldKind::Text | FieldKind::Date | FieldKind::Money => Vec::new(),
    }
}

fn filtered_picker_indices(options: &[(&'static str, FieldValue)], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, (label, _))| label.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

fn trigger_save<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let prepared = {
        let Some(card) = view_data.card.as_mut() else {
            return;
        };
        match card.begin_save() {
            Ok(update) => Ok((card.form().snapshot().id, update)),
            Err(error) => Err(format!("{error:#}")),
        }
    };
    view_data.editor = None;

    match prepared {
        Err(message) => emit_status(state, view_data, internal_tx, message),
        Ok((id, update)) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("saving series {}", id.get()),
            );
            if let Err(error) = runtime.spawn_update(id, &update, internal_tx.clone()) {
                if let Some(card) = view_data.card.as_mut() {
                    card.fail_save(format!("{error:#}"));
                }
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("save failed: {error:#}"),
                );
            }
        }
    }
}

fn cancel_edits(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(card) = view_data.card.as_mut() else {
        return;
    };
    card.cancel();
    view_data.editor = None;
    emit_status(state, view_data, internal_tx, "edits discarded");
}

fn refetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let message = {
        let Some(card) = view_data.card.as_mut() else {
            return;
        };
        if card.phase() == CardPhase::Saving {
            "a save is in flight; refresh after it finishes".to_owned()
        } else {
            let id = card.form().snapshot().id;
            match runtime.load_series(id) {
                Ok(snapshot) => {
                    card.refresh(snapshot);
                    format!("refreshed series {}", id.get())
                }
                Err(error) => format!("refresh failed: {error:#}"),
            }
        }
    };
    view_data.editor = None;
    emit_status(state, view_data, internal_tx, message);
}

fn open_form(state: &mut AppState, view_data: &mut ViewData, kind: FormKind) {
    state.dispatch(AppCommand::OpenForm(kind));
    view_data.form = Some(FormUiState::blank(kind));
    view_data.editor = None;
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(mut form) = view_data.form.take() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };

    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        match build_payload(&form) {
            Ok(payload) => match runtime.submit_form(&payload) {
                Ok(()) => {
                    state.dispatch(AppCommand::ExitToNav);
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("submitted {}", form.kind.label().to_lowercase()),
                    );
                }
                Err(error) => {
                    view_data.form = Some(form);
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("submit failed: {error:#}"),
                    );
                }
            },
            Err(error) => {
                view_data.form = Some(form);
                emit_status(state, view_data, internal_tx, format!("{error:#}"));
            }
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, "form dismissed");
        }
        KeyCode::Tab | KeyCode::Enter => {
            form.focus = (form.focus + 1) % form.fields.len();
            view_data.form = Some(form);
        }
        KeyCode::BackTab => {
            form.focus = form.focus.checked_sub(1).unwrap_or(form.fields.len() - 1);
            view_data.form = Some(form);
        }
        KeyCode::Char(c) => {
            form.fields[form.focus].buffer.push(c);
            view_data.form = Some(form);
        }
        KeyCode::Backspace => {
            form.fields[form.focus].buffer.pop();
            view_data.form = Some(form);
        }
        _ => {
            view_data.form = Some(form);
        }
    }
}

fn build_payload(form: &FormUiState) -> Result<FormPayload> {
    let mut payload = FormPayload::blank_for(form.kind);
    match &mut payload {
        FormPayload::Series(input) => {
            input.title = form.field("title").to_owned();
            input.plot_summary = form.field("plot summary").to_owned();
            input.image_url = form.field("image url").to_owned();
        }
        FormPayload::Season(input) => {
            input.series_id = parse_id(form.field("series id"), "series id")?.into();
            input.number = parse_number(form.field("number"), "season number")?;
            input.title = form.field("title").to_owned();
        }
        FormPayload::Episode(input) => {
            input.season_id = parse_id(form.field("season id"), "season id")?.into();
            input.number = parse_number(form.field("number"), "episode number")?;
            input.title = form.field("title").to_owned();
            let runtime_minutes = form.field("runtime minutes").trim();
            if !runtime_minutes.is_empty() {
                input.runtime_minutes = Some(parse_number(runtime_minutes, "runtime minutes")?);
            }
        }
    }
    payload.validate()?;
    Ok(payload)
}

fn parse_id(raw: &str, label: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("{label} is required -- enter an id and retry");
    }
    trimmed
        .parse::<i64>()
        .with_context(|| format!("{label} {trimmed:?} is not a number"))
}

fn parse_number(raw: &str, label: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .with_context(|| format!("{label} {:?} is not a number", raw.trim()))
}

fn shift_date_by_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(time::Duration::days(days))
}

fn shift_date_by_years(date: Date, years: i32) -> Option<Date> {
    shift_date_by_months(date, years.saturating_mul(12))
}

fn shift_date_by_months(date: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month_number = (total_month.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).ok()?;
    let max_day = last_day_of_month(year, month)?;
    Date::from_calendar_date(year, month, date.day().min(max_day)).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        let next = Month::try_from((month as u8) + 1).ok()?;
        (year, next)
    };

    let first_next_month = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    Some(first_next_month.previous_day()?.day())
}

fn money_input_from_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

fn parse_money_input(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed),
    };
    if unsigned.is_empty() {
        return None;
    }

    let (dollars_part, cents_part) = match unsigned.split_once('.') {
        Some((dollars, cents)) => (dollars, cents),
        None => (unsigned, ""),
    };
    if cents_part.len() > 2 || !cents_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let dollars: i64 = if dollars_part.is_empty() {
        0
    } else if dollars_part.chars().all(|c| c.is_ascii_digit()) {
        dollars_part.parse().ok()?
    } else {
        return None;
    };

    let mut cents = 0_i64;
    if !cents_part.is_empty() {
        cents = cents_part.parse().ok()?;
        if cents_part.len() == 1 {
            cents *= 10;
        }
    }
    // Amounts past i64 cents are unrepresentable, not a panic.
    let total = dollars.checked_mul(100)?.checked_add(cents)?;
    total.checked_mul(sign)
}

fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = (absolute / 100).to_string();
    let mut grouped = String::new();
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{:02}", absolute % 100)
}

fn display_value(card: &DetailsCard, field: FieldId) -> String {
    match card.form().current_value(field) {
        FieldValue::Text(text) => text,
        FieldValue::Date(date) => date.to_string(),
        FieldValue::Money(cents) => format_money(cents),
        FieldValue::Genre(genre) => genre.label().to_owned(),
        FieldValue::Status(status) => status.label().to_owned(),
        FieldValue::Language(language) => language.label().to_owned(),
        FieldValue::Country(country) => country.label().to_owned(),
    }
}

fn card_lines(card: &DetailsCard) -> Vec<String> {
    let mut lines = Vec::with_capacity(FieldId::ALL.len() + 2);
    for field in FieldId::ALL {
        let marker = if card.editor().is_open(field) {
            OPEN_MARK
        } else if card.editor().shows_affordance(field) {
            EDIT_MARK
        } else {
            " "
        };
        let changed = card
            .form()
            .override_value(field)
            .is_some_and(|value| *value != card.form().snapshot_value(field));
        let dirty_mark = if changed { "*" } else { " " };
        lines.push(format!(
            "{marker}{dirty_mark} {:<18} {}",
            field.label(),
            display_value(card, field)
        ));
    }

    lines.push(String::new());
    lines.push(match card.phase() {
        CardPhase::Clean => "clean".to_owned(),
        CardPhase::Dirty => "unsaved changes | s save | c cancel".to_owned(),
        CardPhase::Saving => "saving...".to_owned(),
    });
    if let Some(error) = card.last_error() {
        lines.push(format!("save failed: {error}"));
    }
    lines
}

fn editor_overlay_text(field: FieldId, editor: &EditorUiState) -> String {
    match editor {
        EditorUiState::Text { buffer } => format!("{}\n> {buffer}_", field.label()),
        EditorUiState::Date { value } => format!(
            "{}\n< {value} >\nh/l day  j/k week  H/L month  [/] year",
            field.label()
        ),
        EditorUiState::Money { digits } => format!("{}\n$ {digits}_", field.label()),
        EditorUiState::Picker { query, selected } => {
            let options = picker_options(field);
            let filtered = filtered_picker_indices(&options, query);
            let mut out = format!("{}\n/ {query}_\n", field.label());
            for (row, index) in filtered.iter().enumerate() {
                let marker = if row == *selected { ">" } else { " " };
                out.push_str(&format!("{marker} {}\n", options[*index].0));
            }
            if filtered.is_empty() {
                out.push_str("  (no match)\n");
            }
            out
        }
    }
}

fn form_overlay_text(form: &FormUiState) -> String {
    let mut out = format!("{}\n\n", form.kind.label());
    for (index, field) in form.fields.iter().enumerate() {
        let marker = if index == form.focus { ">" } else { " " };
        out.push_str(&format!("{marker} {:<16} {}\n", field.label, field.buffer));
    }
    out.push_str("\ntab next field | ctrl+s submit | esc cancel");
    out
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k field | g/G first/last | enter edit | s save | c cancel | r refresh\n\
nav: n new series | o new season | O new episode\n\
editor: enter apply | esc dismiss\n\
date editor: h/l day j/k week H/L month [/] year\n\
picker: type filter | up/down | enter choose\n\
form: tab/enter next field | ctrl+s submit | esc cancel"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Form(_) => "FORM",
    };
    let phase = view_data
        .card
        .as_ref()
        .map(|card| match card.phase() {
            CardPhase::Clean => "clean",
            CardPhase::Dirty => "dirty",
            CardPhase::Saving => "saving",
        })
        .unwrap_or("no series");
    let default = "j/k enter | s save c cancel r refresh | n/o/O new | ? help | ctrl+q";
    match &state.status_line {
        Some(status) => format!("{mode} [{phase}] | {status} | {default}"),
        None => format!("{mode} [{phase}] | {default}"),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    let title = view_data
        .card
        .as_ref()
        .map(|card| format!("series {}", card.form().snapshot().id.get()))
        .unwrap_or_else(|| "backlot".to_owned());
    let body = view_data
        .card
        .as_ref()
        .map(|card| card_lines(card).join("\n"))
        .unwrap_or_else(|| "no series loaded".to_owned());
    let card_widget =
        Paragraph::new(body).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(card_widget, layout[0]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(status, layout[1]);

    if let (Some(editor), Some(card)) = (&view_data.editor, &view_data.card)
        && let Some((field, anchor)) = card.editor().open_editor()
    {
        let text = editor_overlay_text(field, editor);
        let height = (text.lines().count() as u16).saturating_add(2);
        let area = anchored_rect(anchor, POPOVER_WIDTH, height, layout[0]);
        frame.render_widget(Clear, area);
        let popover =
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("edit"));
        frame.render_widget(popover, area);
    }

    if let Some(form) = &view_data.form {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(form_overlay_text(form))
            .block(Block::default().borders(Borders::ALL).title("new"));
        frame.render_widget(widget, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(help_overlay_text())
            .block(Block::default().borders(Borders::ALL).title("help"));
        frame.render_widget(widget, area);
    }
}

/// Pins the popover next to its anchor, pulled back inside the area when it
/// would overflow an edge.
fn anchored_rect(anchor: Anchor, width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let max_x = area.x + area.width - width;
    let max_y = area.y + area.height - height;
    Rect {
        x: (area.x + anchor.x).min(max_x),
        y: (area.y + anchor.y + 1).min(max_y),
        width,
        height,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
