use ahash::HashMap;
use rhythmedit_lib::{
    Bookmark, Color, GroupId, HitObject, HitSounds, Id, Layer, ScrollPoint, ScrollTarget,
    TimingPoint,
};
use smallvec::SmallVec;

use crate::{layer::LayerProperty, scroll::ScrollPointProperty, timing_point::TimingPointProperty};

/// Ids carried in event payloads. Most edits touch a handful of entities at a time.
pub type IdList<T> = SmallVec<[Id<T>; 8]>;

/// Which way an action just ran.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum ActionDirection {
    Perform,
    Undo,
    Redo,
}

/// Discriminant of every [`ActionEvent`]. Listeners subscribe to one of these.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum ActionKind {
    AddHitObjects,
    RemoveHitObjects,
    MoveHitObjects,
    ResizeLongNote,
    FlipLanes,
    SwapLanes,
    ReverseHitObjects,
    ResnapHitObjects,
    AddHitSounds,
    RemoveHitSounds,
    ChangeHitObjectColor,
    MoveToLayer,
    MoveToTimingGroup,

    AddTimingPoints,
    RemoveTimingPoints,
    ChangeTimingPointOffsetBatch,
    ChangeTimingPointStartTime,
    ChangeTimingPointBpm,
    ChangeTimingPointSignature,
    ChangeTimingPointHidden,

    AddScrollVelocities,
    RemoveScrollVelocities,
    ChangeScrollVelocityOffsetBatch,
    ChangeScrollVelocities,
    MoveScrollVelocitiesToGroup,
    AddScrollSpeedFactors,
    RemoveScrollSpeedFactors,
    ChangeScrollSpeedFactorOffsetBatch,
    ChangeScrollSpeedFactors,
    MoveScrollSpeedFactorsToGroup,

    AddBookmarks,
    RemoveBookmarks,
    ChangeBookmarkOffsetBatch,
    EditBookmark,

    CreateLayer,
    RemoveLayer,
    RenameLayer,
    ChangeLayerColor,
    ToggleLayerVisibility,
    MergeLayers,

    CreateTimingGroup,
    RemoveTimingGroup,
    ChangeTimingGroupColor,
    RenameTimingGroup,

    ChangePreviewTime,
    ApplyOffset,
    Composite,
}

impl ActionKind {
    pub(crate) const fn scroll(target: ScrollTarget, velocity: Self, speed_factor: Self) -> Self {
        match target {
            ScrollTarget::Velocity => velocity,
            ScrollTarget::SpeedFactor => speed_factor,
        }
    }
}

/// What an action did.
///
/// Payloads always describe the action as it was performed, so undoing a move by +100ms still
/// reports `time_offset: 100`. The [`ActionDirection`] handed to listeners says which way it
/// went.
#[derive(PartialEq, Clone, Debug)]
pub enum ActionEvent {
    HitObjectsAdded(IdList<HitObject>),
    HitObjectsRemoved(IdList<HitObject>),
    HitObjectsMoved {
        ids: IdList<HitObject>,
        time_offset: i32,
        lane_offset: i32,
    },
    LongNoteResized {
        id: Id<HitObject>,
        old_end: i32,
        new_end: i32,
    },
    LanesFlipped(IdList<HitObject>),
    LanesSwapped {
        ids: IdList<HitObject>,
        lanes: (u32, u32),
    },
    HitObjectsReversed(IdList<HitObject>),
    HitObjectsResnapped {
        ids: IdList<HitObject>,
        divisor: u32,
    },
    HitSoundsAdded {
        ids: IdList<HitObject>,
        sounds: HitSounds,
    },
    HitSoundsRemoved {
        ids: IdList<HitObject>,
        sounds: HitSounds,
    },
    HitObjectColorChanged {
        ids: IdList<HitObject>,
        color: Option<Color>,
    },
    MovedToLayer {
        ids: IdList<HitObject>,
        layer: Option<Id<Layer>>,
    },
    MovedToTimingGroup {
        ids: IdList<HitObject>,
        group: Option<GroupId>,
    },

    TimingPointsAdded(IdList<TimingPoint>),
    TimingPointsRemoved(IdList<TimingPoint>),
    TimingPointsShifted {
        ids: IdList<TimingPoint>,
        offset: f32,
    },
    TimingPointsChanged {
        ids: IdList<TimingPoint>,
        change: TimingPointProperty,
        /// Parallel to `ids`.
        previous: Vec<TimingPointProperty>,
    },

    ScrollPointsAdded {
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: IdList<ScrollPoint>,
    },
    ScrollPointsRemoved {
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: IdList<ScrollPoint>,
    },
    ScrollPointsShifted {
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: IdList<ScrollPoint>,
        offset: f32,
    },
    ScrollPointsChanged {
        target: ScrollTarget,
        group: Option<GroupId>,
        ids: IdList<ScrollPoint>,
        change: ScrollPointProperty,
        /// Parallel to `ids`.
        previous: Vec<ScrollPointProperty>,
    },
    ScrollPointsMovedToGroup {
        target: ScrollTarget,
        ids: IdList<ScrollPoint>,
        group: Option<GroupId>,
    },

    BookmarksAdded(IdList<Bookmark>),
    BookmarksRemoved(IdList<Bookmark>),
    BookmarksShifted {
        ids: IdList<Bookmark>,
        offset: i32,
    },
    BookmarkEdited {
        id: Id<Bookmark>,
        old_note: String,
        new_note: String,
    },

    LayerCreated(Id<Layer>),
    LayerRemoved(Id<Layer>),
    LayerChanged {
        id: Id<Layer>,
        old: LayerProperty,
        new: LayerProperty,
    },
    LayersMerged {
        source: Id<Layer>,
        destination: Id<Layer>,
    },

    TimingGroupCreated(GroupId),
    TimingGroupRemoved(GroupId),
    TimingGroupColorChanged {
        id: GroupId,
        old: Color,
        new: Color,
    },
    TimingGroupRenamed {
        old: GroupId,
        new: GroupId,
    },

    PreviewTimeChanged {
        old: i32,
        new: i32,
    },
    OffsetApplied {
        offset: i32,
    },
    Composite {
        actions: usize,
    },
}

impl ActionEvent {
    pub fn kind(&self) -> ActionKind {
        use ActionKind as K;

        match self {
            Self::HitObjectsAdded(_) => K::AddHitObjects,
            Self::HitObjectsRemoved(_) => K::RemoveHitObjects,
            Self::HitObjectsMoved { .. } => K::MoveHitObjects,
            Self::LongNoteResized { .. } => K::ResizeLongNote,
            Self::LanesFlipped(_) => K::FlipLanes,
            Self::LanesSwapped { .. } => K::SwapLanes,
            Self::HitObjectsReversed(_) => K::ReverseHitObjects,
            Self::HitObjectsResnapped { .. } => K::ResnapHitObjects,
            Self::HitSoundsAdded { .. } => K::AddHitSounds,
            Self::HitSoundsRemoved { .. } => K::RemoveHitSounds,
            Self::HitObjectColorChanged { .. } => K::ChangeHitObjectColor,
            Self::MovedToLayer { .. } => K::MoveToLayer,
            Self::MovedToTimingGroup { .. } => K::MoveToTimingGroup,

            Self::TimingPointsAdded(_) => K::AddTimingPoints,
            Self::TimingPointsRemoved(_) => K::RemoveTimingPoints,
            Self::TimingPointsShifted { .. } => K::ChangeTimingPointOffsetBatch,
            Self::TimingPointsChanged { change, .. } => change.kind(),

            Self::ScrollPointsAdded { target, .. } => {
                K::scroll(*target, K::AddScrollVelocities, K::AddScrollSpeedFactors)
            }
            Self::ScrollPointsRemoved { target, .. } => {
                K::scroll(*target, K::RemoveScrollVelocities, K::RemoveScrollSpeedFactors)
            }
            Self::ScrollPointsShifted { target, .. } => K::scroll(
                *target,
                K::ChangeScrollVelocityOffsetBatch,
                K::ChangeScrollSpeedFactorOffsetBatch,
            ),
            Self::ScrollPointsChanged { target, .. } => {
                K::scroll(*target, K::ChangeScrollVelocities, K::ChangeScrollSpeedFactors)
            }
            Self::ScrollPointsMovedToGroup { target, .. } => K::scroll(
                *target,
                K::MoveScrollVelocitiesToGroup,
                K::MoveScrollSpeedFactorsToGroup,
            ),

            Self::BookmarksAdded(_) => K::AddBookmarks,
            Self::BookmarksRemoved(_) => K::RemoveBookmarks,
            Self::BookmarksShifted { .. } => K::ChangeBookmarkOffsetBatch,
            Self::BookmarkEdited { .. } => K::EditBookmark,

            Self::LayerCreated(_) => K::CreateLayer,
            Self::LayerRemoved(_) => K::RemoveLayer,
            Self::LayerChanged { new, .. } => new.kind(),
            Self::LayersMerged { .. } => K::MergeLayers,

            Self::TimingGroupCreated(_) => K::CreateTimingGroup,
            Self::TimingGroupRemoved(_) => K::RemoveTimingGroup,
            Self::TimingGroupColorChanged { .. } => K::ChangeTimingGroupColor,
            Self::TimingGroupRenamed { .. } => K::RenameTimingGroup,

            Self::PreviewTimeChanged { .. } => K::ChangePreviewTime,
            Self::OffsetApplied { .. } => K::ApplyOffset,
            Self::Composite { .. } => K::Composite,
        }
    }
}

/// Collects the events an action fires while it runs. The manager dispatches them once the
/// action has finished, so listeners never see a half-applied map.
#[derive(Default, Debug)]
pub struct EventSink {
    events: Vec<ActionEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ActionEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ActionEvent, ActionDirection)>;

/// Synchronous fan-out of [`ActionEvent`]s.
///
/// Listeners for a specific kind run first, in the order they subscribed, followed by the
/// listeners subscribed to everything.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    by_kind: HashMap<ActionKind, Vec<(ListenerId, Listener)>>,
    all: Vec<(ListenerId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn subscribe(
        &mut self,
        kind: ActionKind,
        listener: impl FnMut(&ActionEvent, ActionDirection) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.by_kind
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    pub fn subscribe_all(
        &mut self,
        listener: impl FnMut(&ActionEvent, ActionDirection) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.all.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was actually removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        fn remove_from(listeners: &mut Vec<(ListenerId, Listener)>, id: ListenerId) -> bool {
            let before = listeners.len();
            listeners.retain(|(listener_id, _)| *listener_id != id);
            listeners.len() != before
        }

        if remove_from(&mut self.all, id) {
            return true;
        }
        self.by_kind
            .values_mut()
            .any(|listeners| remove_from(listeners, id))
    }

    pub fn listener_count(&self) -> usize {
        self.all.len() + self.by_kind.values().map(Vec::len).sum::<usize>()
    }

    pub fn dispatch(&mut self, event: &ActionEvent, direction: ActionDirection) {
        if let Some(listeners) = self.by_kind.get_mut(&event.kind()) {
            for (_, listener) in listeners {
                listener(event, direction);
            }
        }
        for (_, listener) in &mut self.all {
            listener(event, direction);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn preview_event() -> ActionEvent {
        ActionEvent::PreviewTimeChanged { old: 0, new: 100 }
    }

    #[test]
    fn kind_specific_listeners_run_before_catch_all() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        bus.subscribe_all(move |_, _| l.borrow_mut().push("all"));
        let l = log.clone();
        bus.subscribe(ActionKind::ChangePreviewTime, move |_, _| {
            l.borrow_mut().push("preview")
        });
        let l = log.clone();
        bus.subscribe(ActionKind::CreateLayer, move |_, _| {
            l.borrow_mut().push("layer")
        });

        bus.dispatch(&preview_event(), ActionDirection::Perform);
        assert_eq!(*log.borrow(), ["preview", "all"]);
    }

    #[test]
    fn unsubscribe() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let id = bus.subscribe(ActionKind::ChangePreviewTime, move |_, _| {
            *c.borrow_mut() += 1
        });
        bus.dispatch(&preview_event(), ActionDirection::Perform);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.dispatch(&preview_event(), ActionDirection::Undo);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn scroll_kinds_follow_target() {
        let event = ActionEvent::ScrollPointsAdded {
            target: ScrollTarget::SpeedFactor,
            group: None,
            ids: IdList::new(),
        };
        assert_eq!(event.kind(), ActionKind::AddScrollSpeedFactors);
    }
}
