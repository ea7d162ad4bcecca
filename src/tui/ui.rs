//! Main UI rendering coordinator.

use ratatui::Frame;

use super::app::{App, Overlay, Screen};
use super::components::toast;
use super::views::{connect, create_modal, dashboard, detail_modal};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let screen = app.screen();
    let state = app.controller.state();

    match screen {
        Screen::Connect => connect::render_connect(frame),
        Screen::Initializing => connect::render_initializing(frame, &state.compute),
        Screen::Dashboard => {
            dashboard::render(frame, app, &state);
            match &app.overlay {
                Overlay::None => {}
                Overlay::CreateTrade => create_modal::render(frame, &app.form, &state.create),
                Overlay::TradeDetail(id) => {
                    if let Some(trade) = state.trade(id) {
                        detail_modal::render(frame, trade, &state.decrypt);
                    }
                }
            }
        }
    }

    if let Some(notification) = state.notification.current() {
        toast::render(frame, frame.area(), notification);
    }
}
