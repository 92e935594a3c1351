//! Terminal dashboard for ward collectors: pickup board, shift route, and
//! incentive balances, over a seeded demo ward or a live ward registry.

mod app;
mod demo;
mod input;
mod ui;

use std::collections::HashSet;
use std::{env, fs, io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use safai_core::{
    backend::WardBackend,
    dispatch::{DispatchEngine, WardLoop},
    model::{Incentive, Principal, Role},
    ports::{HouseholdDirectory, IncentiveStore, PickupFilter, PickupStore},
    service::SafaiService,
};
use safai_registry_http::WardRegistryDirectory;
use safai_store_memory::{MemoryIncentiveStore, MemoryPickupStore, StaticDirectory};

use crate::app::App;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    // Storage + registry wiring
    let pickups: Arc<dyn PickupStore> = Arc::new(MemoryPickupStore::new());
    let incentives: Arc<dyn IncentiveStore> = Arc::new(MemoryIncentiveStore::new());
    let directory: Arc<dyn HouseholdDirectory> = match env::var("SAFAI_REGISTRY_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let client = Client::builder().user_agent("safai/0.1").build()?;
            Arc::new(WardRegistryDirectory::new(client, url))
        }
        _ => Arc::new(StaticDirectory::new(demo::demo_households())),
    };

    let ward_backend = WardBackend::new(
        Arc::clone(&pickups),
        Arc::clone(&incentives),
        Arc::clone(&directory),
    );
    let service = Arc::new(SafaiService::new(ward_backend));
    let dispatch = Arc::new(DispatchEngine::new(
        pickups,
        directory,
        WardLoop::new(ward_loop_from_env()),
    ));

    demo::seed_pickups(&service).await?;
    tracing::info!("demo ward seeded");

    let collector = Principal {
        id: String::from("collector-demo"),
        role: Role::Collector,
    };

    // App state, pre-loaded with the current board
    let mut app = App::new(service, dispatch, collector);
    app.pickups = app.service.list_pickups(&PickupFilter::all()).await?;

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::RefreshBoard => {
                    begin_call(terminal, &mut app)?;
                    let res = app.service.list_pickups(&PickupFilter::all()).await;
                    app.is_loading = false;
                    match res {
                        Ok(pickups) => {
                            app.pickups = pickups;
                            app.clamp_board_index();
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Refresh failed: {err}"));
                        }
                    }
                }
                Action::ToggleVerify => {
                    let Some(selected) = app.selected_pickup() else {
                        app.error_message = Some("No pickup selected".into());
                        continue;
                    };
                    let pickup_id = selected.id.clone();
                    let target = !selected.segregation_verified;

                    begin_call(terminal, &mut app)?;
                    let res = app.service.verify_segregation(&pickup_id, target).await;
                    app.is_loading = false;
                    match res {
                        Ok(updated) => {
                            app.notice = Some(format!(
                                "Segregation for household {} marked {}",
                                updated.household_id,
                                if updated.segregation_verified { "correct" } else { "not done" }
                            ));
                            reload_board(&mut app).await;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Verify failed: {err}"));
                        }
                    }
                }
                Action::AssignSelected => {
                    let Some(selected) = app.selected_pickup() else {
                        app.error_message = Some("No pickup selected".into());
                        continue;
                    };
                    let pickup_id = selected.id.clone();
                    let collector = app.collector.clone();

                    begin_call(terminal, &mut app)?;
                    let res = app.service.assign_pickup(&pickup_id, &collector).await;
                    app.is_loading = false;
                    match res {
                        Ok(updated) => {
                            app.notice =
                                Some(format!("Claimed pickup for household {}", updated.household_id));
                            reload_board(&mut app).await;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Assign failed: {err}"));
                        }
                    }
                }
                Action::CompleteSelected => {
                    let Some(selected) = app.selected_pickup() else {
                        app.error_message = Some("No pickup selected".into());
                        continue;
                    };
                    let pickup_id = selected.id.clone();
                    let collector = app.collector.clone();

                    begin_call(terminal, &mut app)?;
                    let res = app.service.complete_pickup(&pickup_id, &collector).await;
                    app.is_loading = false;
                    match res {
                        Ok(outcome) => {
                            app.notice = Some(match &outcome.incentive {
                                Some(incentive) => format!(
                                    "Completed; household {} now has {} pts",
                                    incentive.household_id, incentive.points
                                ),
                                None => format!(
                                    "Completed; no points (segregation unverified) for household {}",
                                    outcome.pickup.household_id
                                ),
                            });
                            reload_board(&mut app).await;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Complete failed: {err}"));
                        }
                    }
                }
                Action::GenerateRoute => {
                    begin_call(terminal, &mut app)?;
                    let res = app.dispatch.generate_route().await;
                    app.is_loading = false;
                    match res {
                        Ok(route) => {
                            app.route = Some(route);
                        }
                        Err(err) => {
                            app.route = None;
                            app.error_message = Some(format!("Route failed: {err}"));
                        }
                    }
                }
                Action::LoadIncentives => {
                    begin_call(terminal, &mut app)?;
                    let res = load_balances(&app).await;
                    app.is_loading = false;
                    match res {
                        Ok(balances) => {
                            app.balances = balances;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Balances failed: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Mark the app busy and repaint before an await point.
fn begin_call(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    app.notice = None;
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(())
}

/// Refresh the board after a mutation; failures here only surface as an
/// error message, the mutation itself already succeeded.
async fn reload_board(app: &mut App) {
    match app.service.list_pickups(&PickupFilter::all()).await {
        Ok(pickups) => {
            app.pickups = pickups;
            app.clamp_board_index();
        }
        Err(err) => {
            app.error_message = Some(format!("Refresh failed: {err}"));
        }
    }
}

/// Current balances for every household on the board, in id order.
async fn load_balances(app: &App) -> Result<Vec<Incentive>> {
    let pickups = app.service.list_pickups(&PickupFilter::all()).await?;

    let mut seen = HashSet::new();
    let mut households: Vec<_> = pickups
        .into_iter()
        .map(|pickup| pickup.household_id)
        .filter(|household| seen.insert(household.clone()))
        .collect();
    households.sort_by(|left, right| left.0.cmp(&right.0));

    let mut balances = Vec::with_capacity(households.len());
    for household in &households {
        balances.push(app.service.incentive_for(household).await?);
    }
    Ok(balances)
}

fn ward_loop_from_env() -> Vec<String> {
    match env::var("SAFAI_WARD_LOOP") {
        Ok(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(|area| area.trim().to_owned())
            .filter(|area| !area.is_empty())
            .collect(),
        _ => demo::DEFAULT_WARD_LOOP
            .iter()
            .map(|area| (*area).to_owned())
            .collect(),
    }
}

/// Send tracing output to a file when `RUST_LOG` is set; the alternate
/// screen owns stdout/stderr while the dashboard runs.
fn init_tracing() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        return Ok(());
    }
    let log_file = fs::File::create("safai-tui.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
