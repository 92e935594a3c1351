use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Reload the pickup board via `service.list_pickups`(...)
    RefreshBoard,
    /// Flip the segregation flag of the selected pickup
    ToggleVerify,
    /// Claim the selected pickup for the collector
    AssignSelected,
    /// Complete the selected pickup (may award points)
    CompleteSelected,
    /// Run `dispatch.generate_route`(...)
    GenerateRoute,
    /// Reload per-household balances via `service.incentive_for`(...)
    LoadIncentives,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Esc, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    // Screen switching works everywhere
    match key.code {
        Char('1') => {
            app.screen = Screen::Board;
            return Action::RefreshBoard;
        }
        Char('2') => {
            app.screen = Screen::RouteView;
            return Action::GenerateRoute;
        }
        Char('3') => {
            app.screen = Screen::Incentives;
            return Action::LoadIncentives;
        }
        _ => {}
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Board => match key.code {
            Up | Char('k') => {
                if app.board_index > 0 {
                    app.board_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.board_index + 1 < app.pickups.len() {
                    app.board_index += 1;
                }
            }
            Char('r') => {
                action = Action::RefreshBoard;
            }
            Char('v') => {
                action = Action::ToggleVerify;
            }
            Char('a') => {
                action = Action::AssignSelected;
            }
            Char('c') => {
                action = Action::CompleteSelected;
            }
            _ => {}
        },

        Screen::RouteView => match key.code {
            Char('r') => {
                action = Action::GenerateRoute;
            }
            Esc | Char('b') => {
                app.screen = Screen::Board;
                action = Action::RefreshBoard;
            }
            _ => {}
        },

        Screen::Incentives => match key.code {
            Char('r') => {
                action = Action::LoadIncentives;
            }
            Esc | Char('b') => {
                app.screen = Screen::Board;
                action = Action::RefreshBoard;
            }
            _ => {}
        },
    }
    action
}
