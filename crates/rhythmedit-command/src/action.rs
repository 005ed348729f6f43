use rhythmedit_lib::WorkingMap;

use crate::{
    ActionKind, EventSink, MapCommand,
    bookmark::{BookmarkAddOrRemove, BookmarkEdit, BookmarkOffsetBatch},
    composite::Composite,
    hit_object::{
        FlipLanes, HitObjectAddOrRemove, HitObjectColorChange, HitObjectMove, HitSoundChange,
        LongNoteResize,
        MoveToLayer, MoveToTimingGroup, Resnap, ReverseHitObjects, SwapLanes,
    },
    layer::{LayerAddOrRemove, LayerChange, LayerMerge},
    misc::{GlobalOffset, PreviewTimeChange},
    scroll::{
        ScrollPointAddOrRemove, ScrollPointChange, ScrollPointMoveToGroup, ScrollPointOffsetBatch,
    },
    timing_group::{TimingGroupAddOrRemove, TimingGroupColorChange, TimingGroupRename},
    timing_point::{TimingPointAddOrRemove, TimingPointChange, TimingPointOffsetBatch},
};

macro_rules! editor_actions {
    ($($action:ident,)*) => {
        /// Every action the editor knows how to perform.
        ///
        /// Each variant wraps the action struct of the same name. Anything that converts into
        /// this can be handed to [`ActionManager::perform`](crate::ActionManager::perform).
        #[derive(Clone, Debug)]
        pub enum EditorAction {
            $($action($action),)*
        }

        $(
            impl From<$action> for EditorAction {
                fn from(action: $action) -> Self {
                    Self::$action(action)
                }
            }
        )*

        impl MapCommand for EditorAction {
            fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
                match self {
                    $(Self::$action(action) => action.execute(map, events),)*
                }
            }
            fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
                match self {
                    $(Self::$action(action) => action.rollback(map, events),)*
                }
            }

            fn kind(&self) -> ActionKind {
                match self {
                    $(Self::$action(action) => action.kind(),)*
                }
            }
        }
    };
}

editor_actions! {
    HitObjectAddOrRemove,
    HitObjectMove,
    LongNoteResize,
    FlipLanes,
    SwapLanes,
    ReverseHitObjects,
    Resnap,
    HitSoundChange,
    HitObjectColorChange,
    MoveToLayer,
    MoveToTimingGroup,

    TimingPointAddOrRemove,
    TimingPointOffsetBatch,
    TimingPointChange,

    ScrollPointAddOrRemove,
    ScrollPointOffsetBatch,
    ScrollPointChange,
    ScrollPointMoveToGroup,

    BookmarkAddOrRemove,
    BookmarkOffsetBatch,
    BookmarkEdit,

    LayerAddOrRemove,
    LayerChange,
    LayerMerge,

    TimingGroupAddOrRemove,
    TimingGroupColorChange,
    TimingGroupRename,

    PreviewTimeChange,
    GlobalOffset,
    Composite,
}
