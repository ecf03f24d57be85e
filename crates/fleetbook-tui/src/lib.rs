// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod ticker;

pub use ticker::NotificationTicker;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use fleetbook_app::{
    AppCommand, AppError, AppEvent, AppState, CarId, DatePicker, FormField, FormMode,
    NavigationRequest, Notification, NotificationBoard, NotificationWindow, Overlay, RecordStore,
    Screen, TableCommand, TableEvent, TableView, Text, VehicleRole, format_date,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{info, warn};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const PASSWORD_MASK: char = '*';

/// Everything the UI needs from its host: the record store, a clock, and the
/// notification settings.
pub trait AppRuntime {
    fn store(&self) -> &RecordStore;
    fn store_mut(&mut self) -> &mut RecordStore;
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
    fn notification_window(&self) -> NotificationWindow;
    fn poll_interval(&self) -> Duration;
    /// Called whenever the notification list changes.
    fn publish_notifications(&mut self, notifications: &[Notification]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    NotificationTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct LoginUiState {
    email: String,
    password: String,
    focus: LoginField,
    remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FormUiState {
    field_index: usize,
    buffer: String,
}

impl FormUiState {
    fn field(&self) -> FormField {
        FormField::ALL[self.field_index % FormField::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modal {
    SelectRowAlert,
    RecordDetail { car_id: CarId, body: String },
}

#[derive(Debug, Default)]
struct ViewData {
    login: LoginUiState,
    table: TableView,
    board: NotificationBoard,
    cursor: usize,
    notice_cursor: usize,
    search_input: Option<String>,
    form: Option<FormUiState>,
    modal: Option<Modal>,
    status_token: u64,
    ticker: Option<NotificationTicker>,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_rx);

        if let Err(error) =
            terminal.draw(|frame| render(frame, state, &view_data, runtime.store()))
        {
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

    view_data.ticker = None;
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::NotificationTick => {
                let today = runtime.now().date();
                state.dispatch(AppCommand::SetToday(today));
                refresh_notifications(state, runtime, view_data, true);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Rescans when the store changed, or unconditionally when `force` is set
/// (the clock moved). Publishes only when the list actually changed.
fn refresh_notifications<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    force: bool,
) {
    if state.screen == Screen::Login {
        return;
    }
    let now = runtime.now();
    let window = runtime.notification_window();
    let changed = if force {
        view_data.board.refresh(runtime.store(), now, window)
    } else {
        view_data.board.refresh_if_stale(runtime.store(), now, window)
    };
    if changed && let Err(error) = runtime.publish_notifications(view_data.board.items()) {
        warn!(%error, "publish notifications failed");
    }
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

    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.dispatch(AppCommand::ToggleLanguage);
        let code = state.language.code();
        emit_status(state, view_data, internal_tx, format!("language {code}"));
        return false;
    }

    match state.screen {
        Screen::Login => handle_login_key(state, runtime, view_data, internal_tx, key),
        Screen::Vehicles => handle_vehicles_key(state, runtime, view_data, internal_tx, key),
        Screen::Form(_) => handle_form_key(state, runtime, view_data, internal_tx, key),
    }

    refresh_notifications(state, runtime, view_data, false);
    clamp_cursor(runtime.store(), view_data);
    false
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let login = &mut view_data.login;
    let target = match login.focus {
        LoginField::Email => &mut login.email,
        LoginField::Password => &mut login.password,
    };
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            login.focus = match login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
        }
        KeyCode::Backspace => {
            target.pop();
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            login.remember = !login.remember;
        }
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let notice = Text::PasswordResetUnavailable.get(state.language);
            emit_status(state, view_data, internal_tx, notice);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => target.push(ch),
        KeyCode::Enter => sign_in(state, runtime, view_data, internal_tx),
        _ => {}
    }
}

fn sign_in<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(AppCommand::SignIn);
    if !events.contains(&AppEvent::ScreenChanged(Screen::Vehicles)) {
        return;
    }
    info!(email = %view_data.login.email, "session started");
    view_data.login.password.clear();
    view_data.table = TableView::new();
    view_data.cursor = 0;
    view_data.notice_cursor = 0;
    view_data.board = NotificationBoard::new();

    match NotificationTicker::start(runtime.poll_interval(), internal_tx.clone()) {
        Ok(ticker) => view_data.ticker = Some(ticker),
        Err(error) => {
            warn!(%error, "notification ticker unavailable");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("notifications paused: {error}"),
            );
        }
    }
    state.dispatch(AppCommand::SetToday(runtime.now().date()));
    refresh_notifications(state, runtime, view_data, true);
    let user = state.user_name.clone();
    emit_status(state, view_data, internal_tx, format!("signed in as {user}"));
}

fn sign_out(state: &mut AppState, view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.ticker = None;
    view_data.board = NotificationBoard::new();
    view_data.modal = None;
    view_data.search_input = None;
    view_data.form = None;
    state.dispatch(AppCommand::SignOut);
    emit_status(state, view_data, internal_tx, "signed out");
}

fn handle_vehicles_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.modal.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
            view_data.modal = None;
        }
        return;
    }

    match view_data.table.overlay() {
        Overlay::ConfirmingDelete => {
            let command = match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(TableCommand::ConfirmDelete),
                KeyCode::Char('n') | KeyCode::Esc => Some(TableCommand::CancelDelete),
                _ => None,
            };
            if let Some(command) = command {
                dispatch_table(state, runtime, view_data, internal_tx, command);
            }
            return;
        }
        Overlay::WarningNoSelection => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                dispatch_table(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    TableCommand::DismissWarning,
                );
            }
            return;
        }
        Overlay::None => {}
    }

    if view_data.search_input.is_some() {
        handle_search_key(state, runtime, view_data, internal_tx, key);
        return;
    }

    if let KeyCode::Char(ch @ '1'..='9') = key.code {
        let index = (ch as usize) - ('1' as usize);
        open_notification(state, runtime, view_data, internal_tx, index);
        return;
    }

    match key.code {
        KeyCode::Char('n') => {
            move_notice_cursor(view_data, 1);
            return;
        }
        KeyCode::Char('N') => {
            move_notice_cursor(view_data, -1);
            return;
        }
        KeyCode::Char('o') => {
            let index = view_data.notice_cursor;
            open_notification(state, runtime, view_data, internal_tx, index);
            return;
        }
        _ => {}
    }

    if let Some(command) = table_command_for_key(runtime.store(), view_data, key) {
        dispatch_table(state, runtime, view_data, internal_tx, command);
        return;
    }

    match key.code {
        KeyCode::Char('/') => {
            view_data.search_input = Some(view_data.table.search().to_owned());
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(runtime.store(), view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(runtime.store(), view_data, -1),
        KeyCode::Char('L') => sign_out(state, view_data, internal_tx),
        _ => {}
    }
}

fn table_command_for_key(
    store: &RecordStore,
    view_data: &ViewData,
    key: KeyEvent,
) -> Option<TableCommand> {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            cursor_row(store, view_data).map(TableCommand::SelectRow)
        }
        KeyCode::Char('l') | KeyCode::Char(']') | KeyCode::Right | KeyCode::PageDown => {
            Some(TableCommand::NextPage)
        }
        KeyCode::Char('h') | KeyCode::Char('[') | KeyCode::Left | KeyCode::PageUp => {
            Some(TableCommand::PreviousPage)
        }
        KeyCode::Char('a') => Some(TableCommand::ClickAdd),
        KeyCode::Char('e') => Some(TableCommand::ClickEdit),
        KeyCode::Char('d') => Some(TableCommand::ClickDelete),
        _ => None,
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(buffer) = view_data.search_input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Enter => {
            view_data.search_input = None;
            return;
        }
        KeyCode::Esc => {
            view_data.search_input = None;
            dispatch_table(
                state,
                runtime,
                view_data,
                internal_tx,
                TableCommand::Search(String::new()),
            );
            return;
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(ch) => buffer.push(ch),
        _ => return,
    }
    let text = buffer.clone();
    dispatch_table(state, runtime, view_data, internal_tx, TableCommand::Search(text));
}

fn dispatch_table<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: TableCommand,
) {
    let events = view_data.table.dispatch(runtime.store_mut(), command);
    for event in events {
        match event {
            TableEvent::SearchChanged(_) | TableEvent::PageChanged(_) => view_data.cursor = 0,
            TableEvent::RecordRemoved(car_id) => {
                emit_status(state, view_data, internal_tx, format!("deleted car {car_id}"));
            }
            TableEvent::NavigationRequested(request) => {
                state.dispatch(AppCommand::Navigate(request));
                sync_form_ui_state(state, view_data);
            }
            TableEvent::Rejected(AppError::InvalidSelection) => {
                view_data.modal = Some(Modal::SelectRowAlert);
            }
            TableEvent::Rejected(error) => {
                emit_status(state, view_data, internal_tx, error.to_string());
            }
            TableEvent::SelectionChanged(_) | TableEvent::OverlayChanged(_) => {}
        }
    }
}

fn cursor_row(store: &RecordStore, view_data: &ViewData) -> Option<CarId> {
    view_data
        .table
        .page(store)
        .rows
        .get(view_data.cursor)
        .map(|record| record.car_id)
}

fn move_cursor(store: &RecordStore, view_data: &mut ViewData, delta: isize) {
    let rows = view_data.table.page(store).rows.len();
    if rows == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor.saturating_add_signed(delta);
    view_data.cursor = next.min(rows - 1);
}

fn move_notice_cursor(view_data: &mut ViewData, delta: isize) {
    let last = view_data.board.len().saturating_sub(1);
    view_data.notice_cursor = view_data.notice_cursor.saturating_add_signed(delta).min(last);
}

fn clamp_cursor(store: &RecordStore, view_data: &mut ViewData) {
    let rows = view_data.table.page(store).rows.len();
    view_data.cursor = view_data.cursor.min(rows.saturating_sub(1));
    view_data.notice_cursor = view_data
        .notice_cursor
        .min(view_data.board.len().saturating_sub(1));
}

/// Selects `car_id` in the table and parks the cursor on it.
fn reveal_record(store: &RecordStore, view_data: &mut ViewData, car_id: CarId) -> bool {
    let events = view_data.table.reveal(store, car_id);
    if events
        .iter()
        .any(|event| matches!(event, TableEvent::Rejected(_)))
    {
        return false;
    }
    view_data.cursor = view_data
        .table
        .page(store)
        .rows
        .iter()
        .position(|record| record.car_id == car_id)
        .unwrap_or(0);
    true
}

fn open_notification<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    index: usize,
) {
    let Some(car_id) = view_data.board.get(index).map(|item| item.car_id) else {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("no notification #{}", index + 1),
        );
        return;
    };
    if !reveal_record(runtime.store(), view_data, car_id) {
        emit_status(state, view_data, internal_tx, format!("car {car_id} is gone"));
        return;
    }
    if let Some(record) = runtime.store().find(car_id) {
        view_data.modal = Some(Modal::RecordDetail {
            car_id,
            body: record.to_pretty_json(),
        });
    }
}

fn sync_form_ui_state(state: &AppState, view_data: &mut ViewData) {
    match &state.form {
        Some(form) => {
            if view_data.form.is_none() {
                view_data.form = Some(FormUiState {
                    field_index: 0,
                    buffer: form.field_text(FormField::ALL[0]),
                });
            }
        }
        None => view_data.form = None,
    }
}

/// Parses the edit buffer into the draft. The buffer is rewritten with the
/// normalized value on success.
fn commit_form_buffer(state: &mut AppState, view_data: &mut ViewData) -> Result<(), AppError> {
    let (Some(form), Some(ui)) = (state.form.as_mut(), view_data.form.as_mut()) else {
        return Ok(());
    };
    let field = ui.field();
    form.patch_field(field, &ui.buffer)?;
    ui.buffer = form.field_text(field);
    Ok(())
}

fn move_form_field(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) {
    if let Err(error) = commit_form_buffer(state, view_data) {
        emit_status(state, view_data, internal_tx, error.to_string());
        return;
    }
    let (Some(form), Some(ui)) = (state.form.as_ref(), view_data.form.as_mut()) else {
        return;
    };
    let len = FormField::ALL.len() as isize;
    ui.field_index = (ui.field_index as isize + delta).rem_euclid(len) as usize;
    ui.buffer = form.field_text(ui.field());
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    sync_form_ui_state(state, view_data);

    if state
        .form
        .as_ref()
        .is_some_and(|form| form.date_picker().is_some())
    {
        handle_date_picker_key(state, view_data, internal_tx, key);
        return;
    }

    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        submit_form(state, runtime, view_data, internal_tx);
        return;
    }

    let Some(field) = view_data.form.as_ref().map(FormUiState::field) else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::Navigate(NavigationRequest::Back));
            sync_form_ui_state(state, view_data);
            emit_status(state, view_data, internal_tx, "edit discarded");
        }
        KeyCode::Tab | KeyCode::Down => move_form_field(state, view_data, internal_tx, 1),
        KeyCode::BackTab | KeyCode::Up => move_form_field(state, view_data, internal_tx, -1),
        KeyCode::Enter if field == FormField::Date => {
            if let Err(error) = commit_form_buffer(state, view_data) {
                emit_status(state, view_data, internal_tx, error.to_string());
                return;
            }
            let today = state.today;
            if let Some(form) = state.form.as_mut() {
                form.open_date_picker(today);
            }
        }
        KeyCode::Enter => move_form_field(state, view_data, internal_tx, 1),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if field == FormField::Role => {
            cycle_role(state, view_data);
        }
        KeyCode::Backspace if field != FormField::Role => {
            if let Some(ui) = view_data.form.as_mut() {
                ui.buffer.pop();
            }
        }
        KeyCode::Char(ch) if field != FormField::Role => {
            if let Some(ui) = view_data.form.as_mut() {
                ui.buffer.push(ch);
            }
        }
        _ => {}
    }
}

fn cycle_role(state: &mut AppState, view_data: &mut ViewData) {
    let (Some(form), Some(ui)) = (state.form.as_mut(), view_data.form.as_mut()) else {
        return;
    };
    let next = match form.draft().role {
        VehicleRole::Vm => VehicleRole::User,
        VehicleRole::User => VehicleRole::Vm,
    };
    form.set_role(next);
    ui.buffer = next.as_str().to_owned();
}

fn handle_date_picker_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(form) = state.form.as_mut() else {
        return;
    };

    let message = match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            form.cancel_date_picker();
            "date edit canceled".to_owned()
        }
        (KeyCode::Enter, _) => match form.pick_date() {
            Some(date) => format!("date set to {}", format_date(date)),
            None => return,
        },
        (KeyCode::Char('x'), _) => {
            form.clear_date();
            "date cleared".to_owned()
        }
        _ => {
            let Some(picker) = form.date_picker_mut() else {
                return;
            };
            shift_date_picker(picker, key.code);
            return;
        }
    };

    let text = form.field_text(FormField::Date);
    if let Some(ui) = view_data.form.as_mut()
        && ui.field() == FormField::Date
    {
        ui.buffer = text;
    }
    emit_status(state, view_data, internal_tx, message);
}

fn shift_date_picker(picker: &mut DatePicker, code: KeyCode) {
    match code {
        KeyCode::Char('h') | KeyCode::Left => picker.shift_days(-1),
        KeyCode::Char('l') | KeyCode::Right => picker.shift_days(1),
        KeyCode::Char('j') | KeyCode::Down => picker.shift_days(7),
        KeyCode::Char('k') | KeyCode::Up => picker.shift_days(-7),
        KeyCode::Char('H') => picker.shift_months(-1),
        KeyCode::Char('L') => picker.shift_months(1),
        KeyCode::Char('[') => picker.shift_years(-1),
        KeyCode::Char(']') => picker.shift_years(1),
        _ => {}
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = commit_form_buffer(state, view_data) {
        emit_status(state, view_data, internal_tx, error.to_string());
        return;
    }
    let Some(form) = state.form.as_ref() else {
        return;
    };
    let warnings = form.warnings();
    let result = form.submit(runtime.store_mut());

    match result {
        Ok(car_id) => {
            state.dispatch(AppCommand::Navigate(NavigationRequest::Back));
            sync_form_ui_state(state, view_data);
            view_data.table.reconcile(runtime.store());
            reveal_record(runtime.store(), view_data, car_id);

            let mut message = format!("saved car {car_id}");
            if !warnings.is_empty() {
                message.push_str(&format!(" ({})", warnings.join("; ")));
            }
            emit_status(state, view_data, internal_tx, message);
        }
        Err(error) => {
            warn!(%error, "form submit rejected");
            emit_status(state, view_data, internal_tx, format!("save failed: {error}"));
        }
    }
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    store: &RecordStore,
) {
    match state.screen {
        Screen::Login => render_login(frame, state, view_data),
        Screen::Vehicles => render_vehicles(frame, state, view_data, store),
        Screen::Form(_) => render_form(frame, state, view_data),
    }
}

fn render_login(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let login = Paragraph::new(login_text(state, view_data)).block(
        Block::default()
            .title("fleetbook")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(login, area);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow));
    let footer = Rect {
        y: frame.area().bottom().saturating_sub(1),
        height: 1,
        ..frame.area()
    };
    frame.render_widget(status, footer);
}

fn login_text(state: &AppState, view_data: &ViewData) -> String {
    let language = state.language;
    let marker = |field: LoginField| {
        if view_data.login.focus == field {
            ">"
        } else {
            " "
        }
    };
    let masked: String = view_data
        .login
        .password
        .chars()
        .map(|_| PASSWORD_MASK)
        .collect();

    [
        Text::Welcome.get(language).to_owned(),
        String::new(),
        format!(
            "{} {}: {}",
            marker(LoginField::Email),
            Text::Email.get(language),
            view_data.login.email
        ),
        format!(
            "{} {}: {masked}",
            marker(LoginField::Password),
            Text::Password.get(language)
        ),
        format!(
            "  [{}] {}  (ctrl+r)",
            if view_data.login.remember { "x" } else { " " },
            Text::RememberMe.get(language)
        ),
        String::new(),
        format!("enter {}", Text::SignIn.get(language)),
        format!("ctrl+f {}", Text::ForgotPassword.get(language)),
        format!("ctrl+l {}", Text::LanguageToggle.get(language)),
    ]
    .join("\n")
}

fn render_vehicles(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    store: &RecordStore,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data)).block(
        Block::default()
            .title(format!("fleetbook  [{}]", state.user_name))
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(layout[1]);
    render_table(frame, body[0], view_data, store);

    // One line per notice, scrolled so the notice cursor stays visible.
    let visible = usize::from(body[1].height.saturating_sub(2)).max(1);
    let offset = view_data.notice_cursor.saturating_sub(visible - 1);
    let notices = Paragraph::new(notifications_text(view_data))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .title(Text::UpcomingDeadline.get(state.language))
                .borders(Borders::ALL),
        );
    frame.render_widget(notices, body[1]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[2]);

    render_table_overlays(frame, state, view_data);
}

fn header_text(state: &AppState, view_data: &ViewData) -> String {
    let search = match &view_data.search_input {
        Some(buffer) => format!("/{buffer}_"),
        None if view_data.table.search().is_empty() => {
            Text::SearchPlaceholder.get(state.language).to_owned()
        }
        None => format!("/{}", view_data.table.search()),
    };
    format!("{search}   a add | e edit | d delete | / search | n/N/o notices | L sign out")
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view_data: &ViewData,
    store: &RecordStore,
) {
    let page = view_data.table.page(store);
    let header = Row::new(["Car ID", "Car Name", "Year", "Role", "Date"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let selected = view_data.table.selected();
    let rows = page.rows.iter().enumerate().map(|(index, record)| {
        let mut style = Style::default();
        if index == view_data.cursor {
            style = style.bg(Color::DarkGray);
        }
        if Some(record.car_id) == selected {
            style = style
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        Row::new([
            record.car_id.to_string(),
            record.car_name.clone(),
            record.year.to_string(),
            record.role.as_str().to_owned(),
            record.date.map(format_date).unwrap_or_default(),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(page_title(page.index, page.count, page.filtered_len))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn page_title(index: usize, count: usize, filtered_len: usize) -> String {
    format!(
        "vehicles  page {}/{}  {filtered_len} rows",
        index + 1,
        count.max(1)
    )
}

fn notifications_text(view_data: &ViewData) -> String {
    if view_data.board.is_empty() {
        return "-".to_owned();
    }
    view_data
        .board
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = if index == view_data.notice_cursor { ">" } else { " " };
            let label = if index < 9 {
                (index + 1).to_string()
            } else {
                " ".to_owned()
            };
            format!("{marker}{label} {}", item.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table_overlays(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let language = state.language;
    let dialog = match view_data.table.overlay() {
        Overlay::ConfirmingDelete => Some((
            Text::ConfirmDeleteTitle.get(language),
            format!("{}\n\ny yes | n no", Text::ConfirmDeleteBody.get(language)),
        )),
        Overlay::WarningNoSelection => Some((
            Text::NoRowSelectedTitle.get(language),
            format!("{}\n\nenter ok", Text::NoRowSelectedBody.get(language)),
        )),
        Overlay::None => None,
    };
    if let Some((title, body)) = dialog {
        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    match &view_data.modal {
        Some(Modal::SelectRowAlert) => {
            let area = centered_rect(40, 20, frame.area());
            frame.render_widget(Clear, area);
            let alert = Paragraph::new(Text::SelectRowAlert.get(language))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(alert, area);
        }
        Some(Modal::RecordDetail { car_id, body }) => {
            let area = centered_rect(60, 55, frame.area());
            frame.render_widget(Clear, area);
            let detail = Paragraph::new(body.as_str()).block(
                Block::default()
                    .title(format!("car {car_id}"))
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(detail, area);
        }
        None => {}
    }
}

fn render_form(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());

    let title = match state.screen {
        Screen::Form(FormMode::Edit(car_id)) => format!("edit car {car_id}"),
        _ => "new car".to_owned(),
    };
    let form = Paragraph::new(form_text(state, view_data))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(form, layout[0]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[1]);

    if let Some(picker) = state.form.as_ref().and_then(|form| form.date_picker()) {
        let area = centered_rect(48, 30, frame.area());
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(render_date_picker_overlay_text(picker))
            .block(Block::default().title("date").borders(Borders::ALL));
        frame.render_widget(widget, area);
    }
}

fn form_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(form) = state.form.as_ref() else {
        return String::new();
    };
    let active = view_data.form.as_ref().map(FormUiState::field);

    let mut lines: Vec<String> = FormField::ALL
        .iter()
        .map(|field| {
            if Some(*field) == active {
                let buffer = view_data
                    .form
                    .as_ref()
                    .map(|ui| ui.buffer.as_str())
                    .unwrap_or_default();
                format!("> {:<9} {buffer}_", field.label())
            } else {
                format!("  {:<9} {}", field.label(), form.field_text(*field))
            }
        })
        .collect();

    let warnings = form.warnings();
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.extend(warnings.into_iter().map(|warning| format!("! {warning}")));
    }
    lines.push(String::new());
    lines.push("tab next | space role | enter on date opens picker".to_owned());
    lines.push("ctrl+s save | esc back".to_owned());
    lines.join("\n")
}

fn render_date_picker_overlay_text(picker: &DatePicker) -> String {
    let original = picker
        .original()
        .map(format_date)
        .unwrap_or_else(|| "(empty)".to_owned());

    [
        format!("orig: {original}"),
        format!("pick: {}", format_date(picker.cursor())),
        String::new(),
        "h/l day | j/k week | H/L month | [/] year".to_owned(),
        "enter pick | x clear | esc cancel".to_owned(),
    ]
    .join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    match state.screen {
        Screen::Login => "tab switch field | ctrl+q quit".to_owned(),
        Screen::Vehicles => {
            let selected = view_data
                .table
                .selected()
                .map(|car_id| format!("selected car {car_id}"))
                .unwrap_or_else(|| "no selection".to_owned());
            format!("{selected} | j/k move | space select | h/l page | 1-9 open notice")
        }
        Screen::Form(_) => "editing".to_owned(),
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
