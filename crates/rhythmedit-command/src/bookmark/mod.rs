use rhythmedit_lib::{Bookmark, Id, WorkingMap};
use tracing::warn;

use crate::{
    ActionEvent, ActionKind, EventSink, MapCommand,
    ordered::{Batch, capture, restore},
};

#[derive(Clone, Debug)]
pub struct BookmarkAddOrRemove {
    batch: Batch<Bookmark>,
    is_removal: bool,
}

impl BookmarkAddOrRemove {
    pub fn addition(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            batch: Batch::with_data(bookmarks),
            is_removal: false,
        }
    }
    pub fn removal(ids: Vec<Id<Bookmark>>) -> Self {
        Self {
            batch: Batch::with_ids(ids),
            is_removal: true,
        }
    }

    pub fn ids(&self) -> &[Id<Bookmark>] {
        self.batch.ids()
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    fn event(&self) -> ActionEvent {
        if self.is_removal {
            ActionEvent::BookmarksRemoved(self.batch.id_list())
        } else {
            ActionEvent::BookmarksAdded(self.batch.id_list())
        }
    }
}

impl MapCommand for BookmarkAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.remove_from(&mut map.bookmarks);
        } else {
            self.batch.add_to(&mut map.bookmarks);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.batch.add_to(&mut map.bookmarks);
        } else {
            self.batch.remove_from(&mut map.bookmarks);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveBookmarks
        } else {
            ActionKind::AddBookmarks
        }
    }
}

/// Shifts bookmarks by `offset` milliseconds, saturating at the ends of the `i32` range. Undo
/// puts back each bookmark's previous time.
#[derive(Clone, Debug)]
pub struct BookmarkOffsetBatch {
    ids: Vec<Id<Bookmark>>,
    offset: i32,
    previous: Vec<(Id<Bookmark>, i32)>,
}

impl BookmarkOffsetBatch {
    pub fn new(ids: Vec<Id<Bookmark>>, offset: i32) -> Self {
        Self {
            ids,
            offset,
            previous: Vec::new(),
        }
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::BookmarksShifted {
            ids: self.ids.iter().copied().collect(),
            offset: self.offset,
        }
    }
}

impl MapCommand for BookmarkOffsetBatch {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let offset = self.offset;
        self.previous = capture(&mut map.bookmarks, &self.ids, |bookmark| {
            let previous = bookmark.start_time;
            bookmark.start_time = previous.saturating_add(offset);
            previous
        });
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        restore(&mut map.bookmarks, &self.previous, |bookmark, &previous| {
            bookmark.start_time = previous;
        });
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::ChangeBookmarkOffsetBatch
    }
}

/// Replaces a bookmark's note. Running it again swaps the old note back in.
#[derive(Clone, Debug)]
pub struct BookmarkEdit {
    id: Id<Bookmark>,
    note: String,
}

impl BookmarkEdit {
    pub fn new(id: Id<Bookmark>, note: impl Into<String>) -> Self {
        Self {
            id,
            note: note.into(),
        }
    }

    /// Swaps the stored note with the bookmark's and returns the one the bookmark has now.
    fn swap_note(&mut self, map: &mut WorkingMap) -> Option<String> {
        let note = &mut self.note;
        let swapped = map.bookmarks.update_one(self.id, |bookmark| {
            std::mem::swap(note, &mut bookmark.note);
            bookmark.note.clone()
        });
        if swapped.is_none() {
            warn!("tried to edit nonexistent bookmark {:?}", self.id);
        }
        swapped
    }
}

impl MapCommand for BookmarkEdit {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let new_note = self.swap_note(map).unwrap_or_else(|| self.note.clone());
        events.push(ActionEvent::BookmarkEdited {
            id: self.id,
            old_note: self.note.clone(),
            new_note,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let old_note = self.swap_note(map).unwrap_or_else(|| self.note.clone());
        events.push(ActionEvent::BookmarkEdited {
            id: self.id,
            old_note,
            new_note: self.note.clone(),
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::EditBookmark
    }
}
