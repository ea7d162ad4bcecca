//! Application state for the TUI.
//!
//! Trade data, flow progress, and the notification live in the
//! [`TradeController`]; `App` only holds what the terminal adds on top:
//! the open overlay, list selection, search and filter, and the
//! create-trade form being edited.

use crate::controller::TradeController;
use crate::models::{Pair, SideFilter, TradeData, TradeFilter, TradeForm, TradeSide};

use super::input::TextInput;

/// Central application state container.
pub struct App {
    pub controller: TradeController,

    // -- UI State --
    /// Modal drawn over the dashboard, if any.
    pub overlay: Overlay,
    /// Current input mode.
    pub mode: Mode,
    /// Text typed into the trade search box.
    pub search: TextInput,
    /// Buy/sell filter applied to the trade list.
    pub side_filter: SideFilter,
    /// Index into the filtered trade list.
    pub selected: usize,
    /// The create-trade form.
    pub form: FormState,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: TradeController) -> Self {
        Self {
            controller,
            overlay: Overlay::None,
            mode: Mode::Normal,
            search: TextInput::new(),
            side_filter: SideFilter::All,
            selected: 0,
            form: FormState::default(),
            should_quit: false,
        }
    }

    /// Which screen the current session state calls for.
    pub fn screen(&self) -> Screen {
        if !self.controller.is_connected() {
            Screen::Connect
        } else if self.controller.state().compute.is_ready() {
            Screen::Dashboard
        } else {
            Screen::Initializing
        }
    }

    /// The active list filter.
    pub fn filter(&self) -> TradeFilter {
        TradeFilter {
            search: self.search.as_str().to_string(),
            side: self.side_filter,
        }
    }

    /// Clones the trades that pass the current filter.
    pub fn visible_trades(&self) -> Vec<TradeData> {
        let filter = self.filter();
        let state = self.controller.state();
        filter.apply(&state.trades).into_iter().cloned().collect()
    }

    /// Id of the highlighted trade in the filtered list.
    pub fn selected_trade_id(&self) -> Option<String> {
        self.visible_trades()
            .get(self.selected)
            .map(|t| t.id.clone())
    }

    pub fn select_next(&mut self) {
        let count = self.visible_trades().len();
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside the filtered list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_trades().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    /// Opens the create-trade modal with the form as it was last left.
    pub fn open_create(&mut self) {
        self.form.field = FormField::Pair;
        self.overlay = Overlay::CreateTrade;
    }

    /// Opens the detail modal for the highlighted trade.
    pub fn open_selected_detail(&mut self) {
        if let Some(id) = self.selected_trade_id() {
            self.overlay = Overlay::TradeDetail(id);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }
}

/// Top-level screens, picked from the session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// No wallet connected.
    Connect,
    /// Wallet connected, confidential-compute client not ready.
    Initializing,
    Dashboard,
}

/// Modal drawn over the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    CreateTrade,
    /// Detail view of the trade with this id.
    TradeDetail(String),
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Keys edit the search box.
    Search,
}

/// Fields of the create-trade form, in tab order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Pair,
    Side,
    Amount,
    Price,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Pair => FormField::Side,
            FormField::Side => FormField::Amount,
            FormField::Amount => FormField::Price,
            FormField::Price => FormField::Pair,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Pair => FormField::Price,
            FormField::Side => FormField::Pair,
            FormField::Amount => FormField::Side,
            FormField::Price => FormField::Amount,
        }
    }
}

/// The create-trade form as edited in the modal.
#[derive(Clone, Debug)]
pub struct FormState {
    pub pair: Pair,
    pub side: TradeSide,
    pub amount: TextInput,
    pub price: TextInput,
    pub field: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            pair: Pair::default(),
            side: TradeSide::Buy,
            amount: TextInput::numeric(),
            price: TextInput::numeric(),
            field: FormField::Pair,
        }
    }
}

impl FormState {
    /// Snapshot of the form for submission.
    pub fn to_form(&self) -> TradeForm {
        TradeForm {
            pair: self.pair,
            side: self.side,
            amount: self.amount.as_str().to_string(),
            price: self.price.as_str().to_string(),
        }
    }

    /// The text field under focus, if the focused field is one.
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.field {
            FormField::Amount => Some(&mut self.amount),
            FormField::Price => Some(&mut self.price),
            FormField::Pair | FormField::Side => None,
        }
    }

    /// Clears the form back to its initial values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
