use rhythmedit_lib::WorkingMap;

use crate::{ActionEvent, ActionKind, EditorAction, EventSink, MapCommand};

/// Several actions that are performed, undone and redone as one.
///
/// Steps run in order and are rolled back in reverse order, so a step can rely on whatever the
/// steps before it did (create a timing group, then move hit objects into it).
#[derive(Clone, Debug, Default)]
pub struct Composite {
    steps: Vec<EditorAction>,
}

impl Composite {
    pub fn new(steps: Vec<EditorAction>) -> Self {
        Self { steps }
    }

    pub fn push(&mut self, step: impl Into<EditorAction>) {
        self.steps.push(step.into());
    }
    pub fn with(mut self, step: impl Into<EditorAction>) -> Self {
        self.push(step);
        self
    }

    pub fn steps(&self) -> &[EditorAction] {
        &self.steps
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs the steps without firing this composite's own event. For actions that are built out
    /// of other actions.
    pub(crate) fn execute_steps(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        for step in &mut self.steps {
            step.execute(map, events);
        }
    }
    pub(crate) fn rollback_steps(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        for step in self.steps.iter_mut().rev() {
            step.rollback(map, events);
        }
    }
}

impl MapCommand for Composite {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.execute_steps(map, events);
        events.push(ActionEvent::Composite {
            actions: self.steps.len(),
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        self.rollback_steps(map, events);
        events.push(ActionEvent::Composite {
            actions: self.steps.len(),
        });
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Composite
    }
}
