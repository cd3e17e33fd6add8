//! Route composer: builds the ordered stop sequence of a new bus route from
//! map clicks and submits it to the stop catalog.
//!
//! Clicking a stop that is not yet part of the draft appends it. Clicking a
//! stop that already is truncates the draft back to before that stop, so the
//! user can undo to any point of the route by tapping it again.

mod draft;
mod submission;

pub use draft::*;
pub use submission::*;

use futures_util::{
    FutureExt,
    future::{AbortHandle, Abortable},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    catalog::{self, StopCatalog},
    map::MapSurface,
    model::{self, Direction, RouteSummary, Stop},
    shared::geo::Distance,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route composition is not active")]
    NotComposing,
    #[error("A route is being saved")]
    SubmissionPending,
    #[error("No stop at position {index}, route has {len} stops")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid route: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Failed to save route: {0}")]
    Catalog(#[from] catalog::Error),
    #[error("Submission was cancelled or replaced")]
    Superseded,
}

/// User facing messages emitted by the composer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// `length` is the straight line length through the saved stops.
    RouteCreated { route_id: String, length: Distance },
    Invalid(ValidationError),
    SaveFailed(String),
}

/// The composer's side panel: the sequence list, the form controls and user messages.
pub trait ComposerView {
    /// Receives the whole sequence every time, the list is rebuilt from scratch.
    fn render_sequence(&mut self, rows: &[SequenceRow]);

    /// Enables or disables stop removal, the form fields and the save control.
    fn set_input_enabled(&mut self, enabled: bool);

    fn notify(&mut self, notice: Notice);

    /// Stored routes for the routes page.
    fn render_routes(&mut self, routes: &[RouteSummary]);

    /// Inline error shown in place of content that failed to load.
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Inactive,
    Composing,
}

struct Pending {
    ticket: u64,
    abort: AbortHandle,
}

enum State {
    Inactive,
    Composing {
        draft: RouteDraft,
        pending: Option<Pending>,
    },
}

pub struct RouteComposer<C, M, V> {
    catalog: C,
    map: M,
    view: V,
    state: State,
    next_ticket: u64,
}

impl<C, M, V> RouteComposer<C, M, V>
where
    C: StopCatalog + Clone + 'static,
    M: MapSurface,
    V: ComposerView,
{
    pub fn new(catalog: C, map: M, view: V) -> Self {
        Self {
            catalog,
            map,
            view,
            state: State::Inactive,
            next_ticket: 0,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Inactive => Mode::Inactive,
            State::Composing { .. } => Mode::Composing,
        }
    }

    pub fn draft(&self) -> Option<&RouteDraft> {
        match &self.state {
            State::Inactive => None,
            State::Composing { draft, .. } => Some(draft),
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self.state,
            State::Composing {
                pending: Some(_),
                ..
            }
        )
    }

    /// Starts a new empty draft. Calling it while composing throws the current draft away.
    pub fn enter_composition(&mut self) {
        if self.mode() == Mode::Composing {
            debug!("Restarting route composition");
            self.discard();
        }
        self.state = State::Composing {
            draft: RouteDraft::new(),
            pending: None,
        };
        self.map.set_selection_forwarding(true);
        self.view.set_input_enabled(true);
        info!("Route composition started");
        self.render();
    }

    /// Appends `stop`, or truncates the draft back to before it when it is already selected.
    pub fn toggle_stop(&mut self, stop: &Stop) -> Result<(), self::Error> {
        let draft = editable(&mut self.state)?;
        match draft.position_of(stop.id) {
            None => {
                draft.push(stop.clone());
                debug!("Selected stop {} at position {}", stop.id, draft.len() - 1);
                self.map.mark(stop.id, true);
            }
            Some(position) => {
                let removed = draft.truncate_from(position);
                debug!(
                    "Stop {} reselected, removed {} stops from position {position}",
                    stop.id,
                    removed.len()
                );
                for stop in removed.iter() {
                    self.map.mark(stop.id, false);
                }
            }
        }
        self.render();
        Ok(())
    }

    /// Removes the stop at `index` and every stop after it.
    pub fn remove_at(&mut self, index: usize) -> Result<(), self::Error> {
        let draft = editable(&mut self.state)?;
        if index >= draft.len() {
            return Err(self::Error::IndexOutOfRange {
                index,
                len: draft.len(),
            });
        }
        let removed = draft.truncate_from(index);
        debug!("Removed {} stops from position {index}", removed.len());
        for stop in removed.iter() {
            self.map.mark(stop.id, false);
        }
        self.render();
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<(), self::Error> {
        let draft = editable(&mut self.state)?;
        let removed = draft.clear();
        debug!("Cleared {} stops", removed.len());
        for stop in removed.iter() {
            self.map.mark(stop.id, false);
        }
        self.render();
        Ok(())
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), self::Error> {
        editable(&mut self.state)?.set_label(label.into());
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), self::Error> {
        editable(&mut self.state)?.set_direction(direction);
        Ok(())
    }

    /// Validates the draft and starts the create-route request.
    ///
    /// Input stays disabled until the returned submission is passed to
    /// [`RouteComposer::complete`] or the composer is cancelled.
    pub fn submit(&mut self) -> Result<Submission, self::Error> {
        let draft = editable(&mut self.state)?;
        let request = match draft.to_request() {
            Ok(request) => request,
            Err(err) => {
                warn!("Route not submitted: {err}");
                self.view.notify(Notice::Invalid(err.clone()));
                return Err(err.into());
            }
        };
        let direction = Direction::from_code(request.direction).unwrap_or_default();
        let route_id = model::route_id(&request.bus_number, direction);

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let (abort, registration) = AbortHandle::new_pair();
        if let State::Composing { pending, .. } = &mut self.state {
            *pending = Some(Pending { ticket, abort });
        }
        self.map.set_selection_forwarding(false);
        self.view.set_input_enabled(false);

        info!(
            "Submitting route {route_id} with {} stops",
            request.stop_ids.len()
        );
        let catalog = self.catalog.clone();
        let payload = request.clone();
        let call = async move { catalog.add_route(&payload).await }.boxed_local();
        Ok(Submission {
            ticket,
            route_id,
            request,
            call: Abortable::new(call, registration),
        })
    }

    /// Applies the outcome of a submission. Outcomes of submissions that were
    /// cancelled or replaced are dropped.
    pub fn complete(&mut self, outcome: Outcome) -> Result<String, self::Error> {
        let current = matches!(
            &self.state,
            State::Composing { pending: Some(pending), .. } if pending.ticket == outcome.ticket
        );
        if !current {
            debug!("Dropping outcome of submission {}", outcome.ticket);
            return Err(self::Error::Superseded);
        }

        match outcome.result {
            Some(Ok(())) => {
                let length = self.draft().map(RouteDraft::length).unwrap_or_default();
                info!("Route {} created ({length})", outcome.route_id);
                self.view.notify(Notice::RouteCreated {
                    route_id: outcome.route_id.clone(),
                    length,
                });
                self.cancel();
                Ok(outcome.route_id)
            }
            Some(Err(err)) => {
                error!("Failed to save route {}: {err}", outcome.route_id);
                self.reopen();
                self.view.notify(Notice::SaveFailed(err.to_string()));
                Err(err.into())
            }
            None => {
                self.reopen();
                Err(self::Error::Superseded)
            }
        }
    }

    /// Submits the draft and waits for the catalog's answer.
    pub async fn save(&mut self) -> Result<String, self::Error> {
        let submission = self.submit()?;
        let outcome = submission.wait().await;
        self.complete(outcome)
    }

    /// Leaves composition mode, dropping the draft and any request in flight.
    pub fn cancel(&mut self) {
        if self.mode() == Mode::Inactive {
            return;
        }
        self.discard();
        self.state = State::Inactive;
        self.map.set_selection_forwarding(false);
        self.view.set_input_enabled(true);
        info!("Route composition ended");
        self.render();
    }

    fn discard(&mut self) {
        if let State::Composing { draft, pending } = &mut self.state {
            if let Some(pending) = pending.take() {
                debug!("Aborting submission {}", pending.ticket);
                pending.abort.abort();
            }
            for stop in draft.clear().iter() {
                self.map.mark(stop.id, false);
            }
        }
    }

    fn reopen(&mut self) {
        if let State::Composing { pending, .. } = &mut self.state {
            *pending = None;
        }
        self.map.set_selection_forwarding(true);
        self.view.set_input_enabled(true);
    }

    fn render(&mut self) {
        let (rows, line) = match &self.state {
            State::Inactive => (Vec::new(), Vec::new()),
            State::Composing { draft, .. } => (draft.rows(), draft.line()),
        };
        self.view.render_sequence(&rows);
        self.map.draw_sequence(&line);
    }
}

fn editable(state: &mut State) -> Result<&mut RouteDraft, self::Error> {
    match state {
        State::Inactive => Err(self::Error::NotComposing),
        State::Composing {
            pending: Some(_), ..
        } => Err(self::Error::SubmissionPending),
        State::Composing {
            draft,
            pending: None,
        } => Ok(draft),
    }
}
