// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, warn};

use crate::{AppError, CarId, NavigationRequest, RecordStore, VehicleRecord};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    ConfirmingDelete,
    WarningNoSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Search(String),
    SelectRow(CarId),
    NextPage,
    PreviousPage,
    ClickAdd,
    ClickEdit,
    ClickDelete,
    ConfirmDelete,
    CancelDelete,
    DismissWarning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SearchChanged(String),
    PageChanged(usize),
    SelectionChanged(Option<CarId>),
    OverlayChanged(Overlay),
    RecordRemoved(CarId),
    NavigationRequested(NavigationRequest),
    Rejected(AppError),
}

/// One rendered page of the filtered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub rows: Vec<&'a VehicleRecord>,
    pub index: usize,
    pub count: usize,
    pub filtered_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    search: String,
    page: usize,
    selected: Option<CarId>,
    overlay: Overlay,
}

pub fn matches_search(record: &VehicleRecord, term: &str) -> bool {
    record
        .car_name
        .to_lowercase()
        .contains(&term.to_lowercase())
}

pub fn filter_records<'a>(records: &'a [VehicleRecord], term: &str) -> Vec<&'a VehicleRecord> {
    records
        .iter()
        .filter(|record| matches_search(record, term))
        .collect()
}

pub fn page_count(filtered_len: usize) -> usize {
    filtered_len.div_ceil(PAGE_SIZE)
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn selected(&self) -> Option<CarId> {
        self.selected
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn page<'a>(&self, store: &'a RecordStore) -> Page<'a> {
        let filtered = filter_records(store.list(), &self.search);
        let filtered_len = filtered.len();
        let rows = filtered
            .into_iter()
            .skip(self.page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect();
        Page {
            rows,
            index: self.page,
            count: page_count(filtered_len),
            filtered_len,
        }
    }

    pub fn dispatch(&mut self, store: &mut RecordStore, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::Search(text) => {
                self.search = text;
                self.page = 0;
                vec![
                    TableEvent::SearchChanged(self.search.clone()),
                    TableEvent::PageChanged(0),
                ]
            }
            TableCommand::SelectRow(car_id) => {
                if !store.contains(car_id) {
                    return Vec::new();
                }
                self.selected = Some(car_id);
                vec![TableEvent::SelectionChanged(self.selected)]
            }
            TableCommand::NextPage => {
                let count = self.filtered_page_count(store);
                if self.page + 1 >= count {
                    return Vec::new();
                }
                self.page += 1;
                vec![TableEvent::PageChanged(self.page)]
            }
            TableCommand::PreviousPage => {
                if self.page == 0 {
                    return Vec::new();
                }
                self.page -= 1;
                vec![TableEvent::PageChanged(self.page)]
            }
            TableCommand::ClickAdd => vec![TableEvent::NavigationRequested(
                NavigationRequest::CreateForm {
                    suggested_id: store.next_car_id(),
                },
            )],
            TableCommand::ClickEdit => {
                let Some(record) = self.selected.and_then(|car_id| store.find(car_id)) else {
                    warn!("edit requested without a selected row");
                    return vec![TableEvent::Rejected(AppError::InvalidSelection)];
                };
                vec![TableEvent::NavigationRequested(NavigationRequest::EditForm(
                    record.clone(),
                ))]
            }
            TableCommand::ClickDelete => {
                if self.selected.is_some() {
                    self.set_overlay(Overlay::ConfirmingDelete)
                } else {
                    self.set_overlay(Overlay::WarningNoSelection)
                }
            }
            TableCommand::ConfirmDelete => self.confirm_delete(store),
            TableCommand::CancelDelete | TableCommand::DismissWarning => {
                self.set_overlay(Overlay::None)
            }
        }
    }

    /// Re-establishes the invariants after the store changed elsewhere: the
    /// page stays in range and the selection points at an existing record.
    pub fn reconcile(&mut self, store: &RecordStore) -> Vec<TableEvent> {
        let mut events = Vec::new();
        if let Some(car_id) = self.selected
            && !store.contains(car_id)
        {
            self.selected = None;
            events.push(TableEvent::SelectionChanged(None));
        }

        let last_page = self.filtered_page_count(store).saturating_sub(1);
        if self.page > last_page {
            self.page = last_page;
            events.push(TableEvent::PageChanged(self.page));
        }
        events
    }

    /// Selects `car_id` and moves to the page that shows it. Used for
    /// notification click-through and after saving a form. Clears the search
    /// when the row is hidden by it.
    pub fn reveal(&mut self, store: &RecordStore, car_id: CarId) -> Vec<TableEvent> {
        if !store.contains(car_id) {
            return vec![TableEvent::Rejected(AppError::NotFound(car_id))];
        }

        let mut events = Vec::new();
        let position = |search: &str| {
            filter_records(store.list(), search)
                .iter()
                .position(|record| record.car_id == car_id)
        };
        let index = match position(&self.search) {
            Some(index) => index,
            None => {
                self.search.clear();
                events.push(TableEvent::SearchChanged(String::new()));
                position("").unwrap_or(0)
            }
        };

        let page = index / PAGE_SIZE;
        if page != self.page {
            self.page = page;
            events.push(TableEvent::PageChanged(page));
        }
        self.selected = Some(car_id);
        events.push(TableEvent::SelectionChanged(self.selected));
        events
    }

    fn confirm_delete(&mut self, store: &mut RecordStore) -> Vec<TableEvent> {
        if self.overlay != Overlay::ConfirmingDelete {
            return Vec::new();
        }
        let Some(car_id) = self.selected.take() else {
            return self.set_overlay(Overlay::None);
        };

        let mut events = match store.remove(car_id) {
            Ok(_) => vec![TableEvent::RecordRemoved(car_id)],
            Err(error) => {
                warn!(%car_id, %error, "delete failed");
                vec![TableEvent::Rejected(error)]
            }
        };
        events.push(TableEvent::SelectionChanged(None));
        events.extend(self.set_overlay(Overlay::None));
        events.extend(self.reconcile(store));
        debug!(%car_id, remaining = store.len(), "delete confirmed");
        events
    }

    fn set_overlay(&mut self, overlay: Overlay) -> Vec<TableEvent> {
        self.overlay = overlay;
        vec![TableEvent::OverlayChanged(overlay)]
    }

    fn filtered_page_count(&self, store: &RecordStore) -> usize {
        page_count(
            store
                .list()
                .iter()
                .filter(|record| matches_search(record, &self.search))
                .count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Overlay, PAGE_SIZE, TableCommand, TableEvent, TableView, filter_records, page_count,
    };
    use crate::{AppError, CarId, NavigationRequest, RecordStore, VehicleRecord, VehicleRole};

    fn record(id: i64, name: &str) -> VehicleRecord {
        VehicleRecord {
            car_id: CarId::new(id),
            car_name: name.to_owned(),
            year: 2018,
            role: VehicleRole::User,
            date: None,
        }
    }

    fn store_with(count: i64) -> RecordStore {
        RecordStore::from_records((1..=count).map(|id| record(id, &format!("Car {id}"))).collect())
            .expect("seed")
    }

    #[test]
    fn search_is_case_insensitive_on_car_name_only() {
        let records = vec![record(1, "Civic"), record(2, "Accord"), record(3, "CIVIC Type R")];
        let names: Vec<&str> = filter_records(&records, "civ")
            .iter()
            .map(|r| r.car_name.as_str())
            .collect();
        assert_eq!(names, vec!["Civic", "CIVIC Type R"]);
        assert!(filter_records(&records, "2").is_empty());
        assert_eq!(filter_records(&records, "").len(), records.len());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(PAGE_SIZE), 1);
        assert_eq!(page_count(PAGE_SIZE + 1), 2);
    }

    #[test]
    fn pagination_clamps_at_both_ends() {
        let mut store = store_with(25);
        let mut table = TableView::new();

        assert!(table.dispatch(&mut store, TableCommand::PreviousPage).is_empty());
        assert_eq!(table.page_index(), 0);

        assert_eq!(
            table.dispatch(&mut store, TableCommand::NextPage),
            vec![TableEvent::PageChanged(1)]
        );
        table.dispatch(&mut store, TableCommand::NextPage);
        assert_eq!(table.page_index(), 2);
        assert!(table.dispatch(&mut store, TableCommand::NextPage).is_empty());
        assert_eq!(table.page_index(), 2);

        let page = table.page(&store);
        assert_eq!(page.count, 3);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0].car_id, CarId::new(21));
    }

    #[test]
    fn next_page_is_noop_when_everything_fits() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        assert!(table.dispatch(&mut store, TableCommand::NextPage).is_empty());

        let mut empty = RecordStore::new();
        assert!(table.dispatch(&mut empty, TableCommand::NextPage).is_empty());
        assert_eq!(table.page(&empty).count, 0);
    }

    #[test]
    fn search_resets_page_and_keeps_selection() {
        let mut store = store_with(25);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(3)));
        table.dispatch(&mut store, TableCommand::NextPage);

        let events = table.dispatch(&mut store, TableCommand::Search("car 1".to_owned()));
        assert_eq!(table.page_index(), 0);
        assert_eq!(table.selected(), Some(CarId::new(3)));
        assert!(events.contains(&TableEvent::PageChanged(0)));
    }

    #[test]
    fn reselecting_the_same_row_keeps_it_selected() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(2)));
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(2)));
        assert_eq!(table.selected(), Some(CarId::new(2)));
    }

    #[test]
    fn selecting_unknown_row_is_ignored() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        assert!(
            table
                .dispatch(&mut store, TableCommand::SelectRow(CarId::new(99)))
                .is_empty()
        );
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn delete_without_selection_shows_warning_and_keeps_store() {
        let mut store = store_with(3);
        let mut table = TableView::new();

        let events = table.dispatch(&mut store, TableCommand::ClickDelete);
        assert_eq!(
            events,
            vec![TableEvent::OverlayChanged(Overlay::WarningNoSelection)]
        );
        assert_eq!(store.len(), 3);

        table.dispatch(&mut store, TableCommand::DismissWarning);
        assert_eq!(table.overlay(), Overlay::None);
    }

    #[test]
    fn confirm_delete_removes_selected_row_and_clears_selection() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(2)));
        table.dispatch(&mut store, TableCommand::ClickDelete);
        assert_eq!(table.overlay(), Overlay::ConfirmingDelete);

        let events = table.dispatch(&mut store, TableCommand::ConfirmDelete);
        assert!(events.contains(&TableEvent::RecordRemoved(CarId::new(2))));
        assert_eq!(table.selected(), None);
        assert_eq!(table.overlay(), Overlay::None);
        assert!(store.find(CarId::new(2)).is_none());
    }

    #[test]
    fn cancel_delete_leaves_store_and_selection() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(1)));
        table.dispatch(&mut store, TableCommand::ClickDelete);
        table.dispatch(&mut store, TableCommand::CancelDelete);
        assert_eq!(table.overlay(), Overlay::None);
        assert_eq!(table.selected(), Some(CarId::new(1)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn confirm_without_open_dialog_does_nothing() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(1)));
        assert!(table.dispatch(&mut store, TableCommand::ConfirmDelete).is_empty());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn deleting_last_row_of_last_page_moves_back_a_page() {
        let mut store = store_with(11);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::NextPage);
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(11)));
        table.dispatch(&mut store, TableCommand::ClickDelete);
        let events = table.dispatch(&mut store, TableCommand::ConfirmDelete);
        assert_eq!(table.page_index(), 0);
        assert!(events.contains(&TableEvent::PageChanged(0)));
    }

    #[test]
    fn edit_without_selection_is_rejected() {
        let mut store = store_with(2);
        let mut table = TableView::new();
        assert_eq!(
            table.dispatch(&mut store, TableCommand::ClickEdit),
            vec![TableEvent::Rejected(AppError::InvalidSelection)]
        );
    }

    #[test]
    fn edit_and_add_emit_navigation_requests() {
        let mut store = store_with(2);
        let mut table = TableView::new();

        assert_eq!(
            table.dispatch(&mut store, TableCommand::ClickAdd),
            vec![TableEvent::NavigationRequested(
                NavigationRequest::CreateForm {
                    suggested_id: CarId::new(3)
                }
            )]
        );
        assert_eq!(table.selected(), None);

        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(2)));
        let events = table.dispatch(&mut store, TableCommand::ClickEdit);
        assert_eq!(
            events,
            vec![TableEvent::NavigationRequested(NavigationRequest::EditForm(
                record(2, "Car 2")
            ))]
        );
    }

    #[test]
    fn reconcile_drops_selection_of_vanished_record() {
        let mut store = store_with(3);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::SelectRow(CarId::new(3)));
        store.remove(CarId::new(3)).expect("remove");

        let events = table.reconcile(&store);
        assert_eq!(events, vec![TableEvent::SelectionChanged(None)]);
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn reveal_jumps_to_page_and_clears_hiding_search() {
        let mut store = store_with(25);
        let mut table = TableView::new();
        table.dispatch(&mut store, TableCommand::Search("car 1".to_owned()));

        let events = table.reveal(&store, CarId::new(23));
        assert!(events.contains(&TableEvent::SearchChanged(String::new())));
        assert_eq!(table.search(), "");
        assert_eq!(table.page_index(), 2);
        assert_eq!(table.selected(), Some(CarId::new(23)));

        assert_eq!(
            table.reveal(&store, CarId::new(99)),
            vec![TableEvent::Rejected(AppError::NotFound(CarId::new(99)))]
        );
    }
}
