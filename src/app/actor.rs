//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        Self::with_state(AppState::default(), network_tx, render_tx)
    }

    pub fn with_state(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Screen mount: categories plus the first bill page
        for cmd in self.state.mount() {
            self.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::warn!("Network actor is gone, command dropped");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // List gestures
            UiEvent::PullRefresh => self.state.pull_refresh(),
            UiEvent::ScrollUp => {
                self.state.scroll_up();
                None
            }
            UiEvent::ScrollDown { load_more } => self.state.scroll_down(load_more),

            // Filters
            UiEvent::OpenCategoryPicker => {
                self.state.open_category_picker();
                None
            }
            UiEvent::OpenMonthPicker => {
                self.state.open_month_picker();
                None
            }
            UiEvent::PickerNext => {
                self.state.picker_next();
                None
            }
            UiEvent::PickerPrev => {
                self.state.picker_prev();
                None
            }
            UiEvent::PickerConfirm => self.state.picker_confirm(),
            UiEvent::PickerCancel => {
                self.state.picker_cancel();
                None
            }

            // Add bill
            UiEvent::OpenAddBill => {
                self.state.open_add_bill();
                None
            }
            UiEvent::FormChar(c) => {
                self.state.form_char(c);
                None
            }
            UiEvent::FormBackspace => {
                self.state.form_backspace();
                None
            }
            UiEvent::FormNextField => {
                self.state.form_next_field();
                None
            }
            UiEvent::FormToggleKind => {
                self.state.form_toggle_kind();
                None
            }
            UiEvent::FormNextCategory => {
                self.state.form_next_category();
                None
            }
            UiEvent::FormPrevCategory => {
                self.state.form_prev_category();
                None
            }
            UiEvent::FormSubmit => self.state.form_submit(),
            UiEvent::FormCancel => {
                self.state.form_cancel();
                None
            }

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Some(cmd) = cmd {
            self.send(cmd);
        }
        false
    }
}
