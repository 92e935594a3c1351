use std::sync::Arc;

use safai_core::{
    dispatch::DispatchEngine,
    model::{Incentive, PickupRequest, Principal, Route},
    service::SafaiService,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    Board,
    RouteView,
    Incentives,
}

pub(crate) struct App {
    pub service: Arc<SafaiService>,
    pub dispatch: Arc<DispatchEngine>,
    pub collector: Principal,

    pub screen: Screen,

    pub pickups: Vec<PickupRequest>,
    pub board_index: usize,

    pub route: Option<Route>,
    pub balances: Vec<Incentive>,

    pub is_loading: bool,
    pub error_message: Option<String>,
    pub notice: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<SafaiService>,
        dispatch: Arc<DispatchEngine>,
        collector: Principal,
    ) -> Self {
        Self {
            service,
            dispatch,
            collector,
            screen: Screen::Board,
            pickups: Vec::new(),
            board_index: 0,
            route: None,
            balances: Vec::new(),
            is_loading: false,
            error_message: None,
            notice: None,
        }
    }

    pub(crate) fn selected_pickup(&self) -> Option<&PickupRequest> {
        self.pickups.get(self.board_index)
    }

    /// Keep the cursor on the board after a refresh shrinks the list.
    pub(crate) fn clamp_board_index(&mut self) {
        if self.pickups.is_empty() {
            self.board_index = 0;
        } else if self.board_index >= self.pickups.len() {
            self.board_index = self.pickups.len() - 1;
        }
    }
}
