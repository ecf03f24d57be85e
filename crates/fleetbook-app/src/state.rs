// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use tracing::info;

use crate::{CarId, DetailForm, FormMode, Language, Screen, VehicleRecord};

pub const DEFAULT_USER_NAME: &str = "A- san";

/// Where the table wants to go next. Resolved by [`AppState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationRequest {
    CreateForm { suggested_id: CarId },
    EditForm(VehicleRecord),
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub language: Language,
    pub user_name: String,
    pub today: Date,
    pub form: Option<DetailForm>,
    pub status_line: Option<String>,
}

impl AppState {
    pub fn new(today: Date) -> Self {
        Self {
            screen: Screen::Login,
            language: Language::English,
            user_name: DEFAULT_USER_NAME.to_owned(),
            today,
            form: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SignIn,
    SignOut,
    ToggleLanguage,
    Navigate(NavigationRequest),
    SetToday(Date),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    LanguageChanged(Language),
    FormOpened(FormMode),
    FormClosed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SignIn => {
                if self.screen != Screen::Login {
                    return Vec::new();
                }
                info!(user = %self.user_name, "signed in");
                self.screen = Screen::Vehicles;
                vec![AppEvent::ScreenChanged(self.screen)]
            }
            AppCommand::SignOut => {
                info!(user = %self.user_name, "signed out");
                let mut events = self.close_form();
                self.screen = Screen::Login;
                events.push(AppEvent::ScreenChanged(self.screen));
                events
            }
            AppCommand::ToggleLanguage => {
                self.language = self.language.toggled();
                vec![AppEvent::LanguageChanged(self.language)]
            }
            AppCommand::Navigate(request) => self.navigate(request),
            AppCommand::SetToday(today) => {
                self.today = today;
                Vec::new()
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn navigate(&mut self, request: NavigationRequest) -> Vec<AppEvent> {
        let form = match request {
            NavigationRequest::CreateForm { suggested_id } => {
                DetailForm::create(suggested_id, self.today.year())
            }
            NavigationRequest::EditForm(record) => DetailForm::edit(&record),
            NavigationRequest::Back => {
                let mut events = self.close_form();
                if self.screen != Screen::Login {
                    self.screen = Screen::Vehicles;
                    events.push(AppEvent::ScreenChanged(self.screen));
                }
                return events;
            }
        };

        let mode = form.mode();
        self.form = Some(form);
        self.screen = Screen::Form(mode);
        vec![
            AppEvent::FormOpened(mode),
            AppEvent::ScreenChanged(self.screen),
        ]
    }

    fn close_form(&mut self) -> Vec<AppEvent> {
        match self.form.take() {
            Some(_) => vec![AppEvent::FormClosed],
            None => Vec::new(),
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
