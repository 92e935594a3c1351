use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
};
use safai_core::model::{PickupStatus, WasteType};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("safai – ward pickup dispatch")
        .block(Block::default().borders(Borders::ALL).title("Safai"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::Board => draw_board(frame, app, *content_area),
        Screen::RouteView => draw_route(frame, app, *content_area),
        Screen::Incentives => draw_incentives(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::Board => {
            "↑/↓ move · v verify · a assign · c complete · r refresh · 2 route · 3 points · q quit"
        }
        Screen::RouteView => "r regenerate · Esc/b board · 3 points · q quit",
        Screen::Incentives => "r reload · Esc/b board · 2 route · q quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else if let Some(msg) = &app.notice {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else if app.notice.is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_board(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "Pickups for collector {} (↑/↓, v/a/c act on the marked row)",
        app.collector.id
    );

    if app.pickups.is_empty() {
        let paragraph = Paragraph::new("No pickup requests. Press r to refresh.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.pickups.iter().enumerate().map(|(index, pickup)| {
        let marker = if index == app.board_index { "> " } else { "  " };
        let slot = pickup
            .pickup_time
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        let verified = if pickup.segregation_verified {
            "yes"
        } else {
            "no"
        };
        let bin = if pickup.overflow { "overflow" } else { "" };

        let mut style = Style::default().fg(status_color(pickup.status));
        if index == app.board_index {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(format!("{marker}{}", pickup.household_id)),
            Cell::from(pickup.waste_type.to_string()),
            Cell::from(slot),
            Cell::from(pickup.status.to_string()),
            Cell::from(verified),
            Cell::from(bin),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Min(8),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Household", "Waste", "Slot", "Status", "Segregated", "Bin"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_route(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(route) = &app.route else {
        let paragraph = Paragraph::new("No route yet. Press r to generate one.")
            .block(Block::default().borders(Borders::ALL).title("Shift route"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, meta_area] = chunks else {
        return;
    };

    if route.steps.is_empty() {
        let paragraph = Paragraph::new("Nothing pending, the shift is clear.")
            .block(Block::default().borders(Borders::ALL).title("Shift route"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *table_area);
    } else {
        let rows = route.steps.iter().map(|step| {
            let slot = step
                .pickup_time
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string();
            let flag = if step.overflow { "overflow" } else { "" };

            let mut style = Style::default().fg(waste_color(&step.waste_type));
            if step.overflow {
                // Priority stops are emphasized, not re-ordered.
                style = style.add_modifier(Modifier::BOLD);
            }

            Row::new(vec![
                Cell::from(format!("#{}", step.sequence)),
                Cell::from(step.area.clone()),
                Cell::from(step.household_id.to_string()),
                Cell::from(step.waste_type.to_string()),
                Cell::from(slot),
                Cell::from(flag),
            ])
            .style(style)
        });

        let column_widths = [
            Constraint::Length(4),
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, column_widths)
            .header(
                Row::new(vec!["Stop", "Area", "Household", "Waste", "Slot", "Flag"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Shift route (area loop, earliest slot first)"),
            )
            .column_spacing(1);

        frame.render_widget(table, *table_area);
    }

    let meta = Paragraph::new(route.explanation.as_str())
        .block(Block::default().borders(Borders::ALL).title("Why this order"))
        .wrap(Wrap { trim: true });
    frame.render_widget(meta, *meta_area);
}

fn draw_incentives(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = if app.balances.is_empty() {
        vec![ListItem::new(
            "No balances yet. Complete a verified pickup to award points.",
        )]
    } else {
        app.balances
            .iter()
            .map(|incentive| {
                let line = format!("{:<10} {:>6} pts", incentive.household_id, incentive.points);
                let style = if incentive.points > 0 {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(line).style(style)
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Incentive balances (r to reload)"),
    );

    frame.render_widget(list, area);
}

fn status_color(status: PickupStatus) -> Color {
    match status {
        PickupStatus::Pending => Color::Yellow,
        PickupStatus::Assigned => Color::Cyan,
        PickupStatus::Completed => Color::Green,
    }
}

fn waste_color(waste_type: &WasteType) -> Color {
    match waste_type {
        WasteType::Wet => Color::Green,
        WasteType::Dry => Color::Blue,
        WasteType::EWaste => Color::Magenta,
        WasteType::Other(_) => Color::Gray,
    }
}
