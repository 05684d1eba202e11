use bookdash_core::{DashboardData, DashboardService, FilterSelection};
use ratatui::widgets::TableState;

/// Which filter list currently receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Hotels,
    Years,
}

pub struct App {
    pub service: DashboardService,
    pub selection: FilterSelection,
    pub data: DashboardData,
    pub focus: Focus,
    pub hotels_state: TableState,
    pub years_state: TableState,
}

impl App {
    pub fn new(service: DashboardService) -> App {
        let selection = FilterSelection::all(service.table());
        let data = service.snapshot(&selection);

        let mut hotels_state = TableState::default();
        if !service.table().hotels.is_empty() {
            hotels_state.select(Some(0));
        }
        let mut years_state = TableState::default();
        if !service.table().years.is_empty() {
            years_state.select(Some(0));
        }

        App {
            service,
            selection,
            data,
            focus: Focus::Hotels,
            hotels_state,
            years_state,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Hotels => Focus::Years,
            Focus::Years => Focus::Hotels,
        };
    }

    pub fn next(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    /// Toggle the highlighted filter entry and recompute the dashboard.
    pub fn toggle_selected(&mut self) {
        match self.focus {
            Focus::Hotels => {
                if let Some(i) = self.hotels_state.selected() {
                    if let Some(hotel) = self.service.table().hotels.get(i).cloned() {
                        self.selection.toggle_hotel(&hotel);
                    }
                }
            }
            Focus::Years => {
                if let Some(i) = self.years_state.selected() {
                    if let Some(&year) = self.service.table().years.get(i) {
                        self.selection.toggle_year(year);
                    }
                }
            }
        }
        self.recompute();
    }

    /// Back to the startup default: everything selected.
    pub fn select_all(&mut self) {
        self.selection = FilterSelection::all(self.service.table());
        self.recompute();
    }

    fn recompute(&mut self) {
        self.data = self.service.snapshot(&self.selection);
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Hotels => self.service.table().hotels.len(),
            Focus::Years => self.service.table().years.len(),
        }
    }

    fn focused_state(&mut self) -> &mut TableState {
        match self.focus {
            Focus::Hotels => &mut self.hotels_state,
            Focus::Years => &mut self.years_state,
        }
    }
}
