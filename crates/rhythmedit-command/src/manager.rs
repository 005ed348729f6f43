//! The undo/redo history and the one place actions get run.

use std::{collections::VecDeque, fmt};

use crossbeam_channel::{Receiver, Sender};
use rhythmedit_lib::WorkingMap;
use tracing::{debug, error, trace};

use crate::{
    ActionDirection, ActionEvent, ActionKind, EditorAction, EventBus, EventSink, HistoryConfig,
    ListenerId, MapCommand,
};

/// Owns the map being edited along with its undo and redo stacks.
///
/// Performing a new action clears the redo stack. Listeners are called once the action has
/// finished running, in the order its events were fired. Listeners only get a look at the
/// event, never the manager, so they can't start another action while one is in flight; they
/// can queue one through [`DeferredActions`] instead.
pub struct ActionManager {
    map: WorkingMap,
    undo_stack: VecDeque<EditorAction>,
    redo_stack: Vec<EditorAction>,
    /// How many undos (positive) or redos (negative) away the last save is. `None` if it can't
    /// be reached anymore.
    save_distance: Option<i64>,
    config: HistoryConfig,
    bus: EventBus,
    deferred_tx: Sender<EditorAction>,
    deferred_rx: Receiver<EditorAction>,
}

impl ActionManager {
    pub fn new(map: WorkingMap) -> Self {
        Self::with_config(map, HistoryConfig::default())
    }

    pub fn with_config(map: WorkingMap, config: HistoryConfig) -> Self {
        let (deferred_tx, deferred_rx) = crossbeam_channel::unbounded();
        Self {
            map,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            save_distance: Some(0),
            config,
            bus: EventBus::new(),
            deferred_tx,
            deferred_rx,
        }
    }

    pub fn map(&self) -> &WorkingMap {
        &self.map
    }
    pub fn into_map(self) -> WorkingMap {
        self.map
    }
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn perform(&mut self, action: impl Into<EditorAction>) {
        let mut action = action.into();
        let kind = action.kind();

        let mut events = EventSink::new();
        action.execute(&mut self.map, &mut events);
        self.redo_stack.clear();
        self.save_distance = match self.save_distance {
            // the save point was somewhere on the redo stack we just threw away
            Some(distance) if distance < 0 => None,
            other => other.map(|distance| distance + 1),
        };
        self.undo_stack.push_back(action);
        self.trim_undo_stack();
        debug!("performed {kind:?} (undo: {})", self.undo_stack.len());

        self.finish(kind, events, ActionDirection::Perform);
    }

    /// Undoes the most recent action. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mut action) = self.undo_stack.pop_back() else {
            trace!("nothing to undo");
            return false;
        };
        let kind = action.kind();

        let mut events = EventSink::new();
        action.rollback(&mut self.map, &mut events);
        self.redo_stack.push(action);
        debug!(
            "undid {kind:?} (undo: {}, redo: {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        if let Some(distance) = &mut self.save_distance {
            *distance -= 1;
        }

        self.finish(kind, events, ActionDirection::Undo);
        true
    }

    /// Redoes the most recently undone action. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(mut action) = self.redo_stack.pop() else {
            trace!("nothing to redo");
            return false;
        };
        let kind = action.kind();

        let mut events = EventSink::new();
        action.execute(&mut self.map, &mut events);
        self.undo_stack.push_back(action);
        if let Some(distance) = &mut self.save_distance {
            *distance += 1;
        }
        self.trim_undo_stack();
        debug!(
            "redid {kind:?} (undo: {}, redo: {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );

        self.finish(kind, events, ActionDirection::Redo);
        true
    }

    /// Forgets the whole history. The map stays as it is.
    pub fn clear(&mut self) {
        debug!(
            "clearing history ({} undo, {} redo)",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }

    fn trim_undo_stack(&mut self) {
        let Some(max_undo) = self.config.max_undo() else {
            return;
        };
        while self.undo_stack.len() > max_undo {
            self.undo_stack.pop_front();
            if self
                .save_distance
                .is_some_and(|distance| distance > self.undo_stack.len() as i64)
            {
                self.save_distance = None;
            }
        }
    }

    fn finish(&mut self, kind: ActionKind, mut events: EventSink, direction: ActionDirection) {
        if self.config.validate() {
            if let Err(err) = self.map.validate() {
                error!("map is invalid after {direction:?} of {kind:?}: {err:#}");
            }
        }
        for event in events.take() {
            self.trigger_event(&event, direction);
        }
    }

    /// Sends `event` to every listener subscribed to its kind, then to the catch-all listeners.
    pub fn trigger_event(&mut self, event: &ActionEvent, direction: ActionDirection) {
        trace!(kind = ?event.kind(), ?direction, "dispatching event");
        self.bus.dispatch(event, direction);
    }

    pub fn subscribe(
        &mut self,
        kind: ActionKind,
        listener: impl FnMut(&ActionEvent, ActionDirection) + 'static,
    ) -> ListenerId {
        self.bus.subscribe(kind, listener)
    }
    pub fn subscribe_all(
        &mut self,
        listener: impl FnMut(&ActionEvent, ActionDirection) + 'static,
    ) -> ListenerId {
        self.bus.subscribe_all(listener)
    }
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Kinds of the actions on the undo stack, most recent first.
    pub fn undo_kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.undo_stack.iter().rev().map(MapCommand::kind)
    }
    /// Kinds of the actions on the redo stack, next to be redone first.
    pub fn redo_kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.redo_stack.iter().rev().map(MapCommand::kind)
    }

    /// Marks the map as it is now as saved.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }
    /// Whether the map differs from the last time [`Self::mark_saved`] was called (or from when
    /// the manager was created, if it never was).
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// A handle for queueing actions from places that can't call [`Self::perform`], like
    /// listeners.
    pub fn deferred(&self) -> DeferredActions {
        DeferredActions {
            sender: self.deferred_tx.clone(),
        }
    }

    /// Performs everything queued through [`DeferredActions`] so far, in the order it was queued.
    /// Actions queued while these run wait for the next call. Returns how many were performed.
    pub fn process_deferred(&mut self) -> usize {
        let pending: Vec<EditorAction> = self.deferred_rx.try_iter().collect();
        for action in &pending {
            trace!("performing deferred {:?}", action.kind());
        }
        let count = pending.len();
        for action in pending {
            self.perform(action);
        }
        count
    }
}

impl fmt::Debug for ActionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("save_distance", &self.save_distance)
            .field("config", &self.config)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

/// Queues actions for an [`ActionManager`] to perform on its next
/// [`process_deferred`](ActionManager::process_deferred).
#[derive(Clone, Debug)]
pub struct DeferredActions {
    sender: Sender<EditorAction>,
}

impl DeferredActions {
    pub fn push(&self, action: impl Into<EditorAction>) {
        if self.sender.send(action.into()).is_err() {
            debug!("dropping deferred action, its manager is gone");
        }
    }
}
