//! Undoable editing for `rhythmedit-lib`. Separate from it because the document model doesn't
//! need to know how it's edited.
//!
//! Every change to a [`WorkingMap`] is an [`EditorAction`] performed through an
//! [`ActionManager`], which keeps the undo/redo history and tells listeners what happened.

use rhythmedit_lib::WorkingMap;

pub mod bookmark;
pub mod composite;
pub mod hit_object;
pub mod layer;
pub mod misc;
pub mod scroll;
pub mod timing_group;
pub mod timing_point;

mod action;
mod config;
mod event;
mod manager;
mod ordered;

pub use action::EditorAction;
pub use composite::Composite;
pub use config::HistoryConfig;
pub use event::{ActionDirection, ActionEvent, ActionKind, EventBus, EventSink, IdList, ListenerId};
pub use manager::{ActionManager, DeferredActions};

/// A reversible change to a [`WorkingMap`].
///
/// `execute` is called once when the action is performed and again on every redo. `rollback`
/// is only ever called on a map in exactly the state the preceding `execute` left it in, and has
/// to put it back the way it was before. Both push the event describing what they did into
/// `events`, even if nothing ended up changing.
pub trait MapCommand: 'static + Send {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink);
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink);

    fn kind(&self) -> ActionKind;
}
