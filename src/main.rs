//! Billfold - Actor-based terminal bill book
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering and gesture detection
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the bill service

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use billfold::app::form::FormField;
use billfold::config::Config;
use billfold::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use billfold::messages::ui_events::{key_to_ui_event, Popup};
use billfold::ui::{day_lines, format_money, load_label, refresh_label, render_picker, status_color};
use billfold::{AppActor, BillClient, NetworkActor, NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(api_url = %config.api_url, version = APP_VERSION, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(BillClient::new(&config), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let list_len = if current_state.show_list {
                    current_state.bills.len()
                } else {
                    0
                };
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.popup,
                    list_len,
                    current_state.selected,
                    current_state.load_threshold,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Totals + filters
            Constraint::Min(0),     // Bill list
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_header(f, state, chunks[0]);
    if state.show_list {
        draw_bill_list(f, state, chunks[1]);
    } else {
        draw_empty(f, state, chunks[1]);
    }
    draw_status_bar(f, state, chunks[2]);

    match state.popup {
        Popup::CategoryPicker | Popup::MonthPicker => draw_picker_popup(f, state, area),
        Popup::AddBill => draw_add_bill_popup(f, state, area),
        Popup::Help => draw_help_popup(f, area),
        Popup::None => {}
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let totals = Line::from(vec![
        Span::raw(" Expense: "),
        Span::styled(format_money(state.total_expense), Style::default().fg(Color::Red).bold()),
        Span::raw("   Income: "),
        Span::styled(format_money(state.total_income), Style::default().fg(Color::Green).bold()),
    ]);
    let filters = Line::from(vec![
        Span::styled(format!(" [t] {} ▾", state.category_label), Style::default().fg(Color::Cyan)),
        Span::raw("    "),
        Span::styled(format!("[m] {} ▾", state.month_label), Style::default().fg(Color::Cyan)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", APP_NAME))
        .title_style(Style::default().fg(Color::Yellow).bold());
    f.render_widget(Paragraph::new(vec![totals, filters]).block(block), area);
}

fn draw_bill_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Refresh indicator
            Constraint::Min(0),     // Days
            Constraint::Length(1),  // Load indicator
        ])
        .split(area);

    let refresh = Paragraph::new(refresh_label(state.refresh_status))
        .style(Style::default().fg(status_color(state.refresh_status)))
        .alignment(Alignment::Center);
    f.render_widget(refresh, chunks[0]);

    let items: Vec<ListItem> = state
        .bills
        .iter()
        .enumerate()
        .map(|(i, day)| ListItem::new(Text::from(day_lines(day, i == state.selected))))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .title_bottom(
                Line::from(format!(" page {}/{} ", state.current_page, state.total_pages))
                    .right_aligned(),
            ),
    );
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    let load = Paragraph::new(load_label(state.load_status, state.current_page, state.total_pages))
        .style(Style::default().fg(status_color(state.load_status)))
        .alignment(Alignment::Center);
    f.render_widget(load, chunks[2]);
}

fn draw_empty(f: &mut Frame, state: &RenderState, area: Rect) {
    let text = match state.refresh_status {
        billfold::GestureStatus::InProgress => "Loading bills...",
        billfold::GestureStatus::Failed => "Could not load bills. Change a filter or press 'a' to add one.",
        _ => "No bills this month. Press 'a' to add one.",
    };
    let empty = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(empty, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match &state.notice {
        Some(notice) => format!(" {} ", notice),
        None => String::from(" ↑/↓:scroll | r:refresh | t:type | m:month | a:add | ?:help | q:quit "),
    };
    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_picker_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(40, 60, area);
    let list = render_picker(state.picker_title, &state.picker_labels);
    let mut list_state = ListState::default();
    list_state.select(Some(state.picker_cursor));

    f.render_widget(Clear, popup_area);
    f.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_add_bill_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 45, area);
    let form = &state.form;

    let field_style = |field: FormField| {
        if form.active_field == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw(" Kind:     "),
            Span::styled(form.kind.as_str(), Style::default().fg(billfold::ui::kind_color(form.kind))),
            Span::styled("  (↑/↓)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw(" Type:     "),
            Span::raw(state.form_category.clone()),
            Span::styled("  (←/→)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw(" Amount:   "),
            Span::styled(
                if form.amount.is_empty() { String::from("0.00") } else { form.amount.clone() },
                field_style(FormField::Amount),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Date:     "),
            Span::raw(form.date.format("%Y-%m-%d").to_string()),
        ]),
        Line::from(vec![
            Span::raw(" Remark:   "),
            Span::styled(form.remark.clone(), field_style(FormField::Remark)),
        ]),
        Line::from(""),
    ];

    if form.submitting {
        lines.push(Line::from(Span::styled(" Saving...", Style::default().fg(Color::Yellow))));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(format!(" {}", error), Style::default().fg(Color::Red))));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add bill (Tab:field Enter:save Esc:cancel) ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 BILLFOLD - Keyboard Shortcuts

 LIST
   ↑ / k              Scroll up (on the first day: refresh)
   ↓ / j              Scroll down (near the end: load more)
   r                  Refresh

 FILTERS
   t                  Filter by type
   m                  Filter by month
   ↑ / ↓, Enter, Esc  Pick, confirm, cancel

 ADD BILL
   a                  Open the add-bill form
   ↑ / ↓              Switch expense / income
   ← / →              Change type
   Tab                Switch amount / remark

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
