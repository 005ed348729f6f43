use rhythmedit_lib::{Color, HitObject, Id, Layer, WorkingMap};
use tracing::warn;

use crate::{
    ActionEvent, ActionKind, Composite, EventSink, MapCommand, hit_object::MoveToLayer,
};

/// Creates or removes a layer.
///
/// Creating a layer can pull hit objects into it in the same step. Removing one always sends
/// its hit objects back to the default layer first, so nothing is left pointing at it.
#[derive(Clone, Debug)]
pub struct LayerAddOrRemove {
    id: Id<Layer>,
    data: Option<Layer>,
    cascade: Option<MoveToLayer>,
    is_removal: bool,
}

impl LayerAddOrRemove {
    pub fn addition(id: Id<Layer>, layer: Layer, members: Vec<Id<HitObject>>) -> Self {
        Self {
            id,
            data: Some(layer),
            cascade: (!members.is_empty()).then(|| MoveToLayer::new(members, Some(id))),
            is_removal: false,
        }
    }
    pub fn removal(id: Id<Layer>) -> Self {
        Self {
            id,
            data: None,
            cascade: None,
            is_removal: true,
        }
    }

    pub const fn id(&self) -> Id<Layer> {
        self.id
    }
    pub const fn is_removal(&self) -> bool {
        self.is_removal
    }

    /// Puts the layer back into the map. Returns `false` if there was nothing to put back,
    /// which only happens after trying to remove a layer that didn't exist.
    fn insert(&mut self, map: &mut WorkingMap) -> bool {
        match self.data.take() {
            Some(layer) => {
                map.layers.insert(self.id, layer);
                true
            }
            None => false,
        }
    }

    fn empty_and_remove(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if !map.layers.has(self.id) {
            warn!("tried to remove nonexistent layer {:?}", self.id);
            self.cascade = None;
            return;
        }
        let mut cascade = MoveToLayer::new(map.hit_objects_in_layer(Some(self.id)), None);
        cascade.execute(map, events);
        self.cascade = Some(cascade);
        self.data = Some(map.layers.take(self.id));
    }

    fn event(&self) -> ActionEvent {
        if self.is_removal {
            ActionEvent::LayerRemoved(self.id)
        } else {
            ActionEvent::LayerCreated(self.id)
        }
    }
}

impl MapCommand for LayerAddOrRemove {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            self.empty_and_remove(map, events);
        } else {
            assert!(self.insert(map), "execute() called on empty LayerAddOrRemove");
            if let Some(cascade) = &mut self.cascade {
                cascade.execute(map, events);
            }
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.is_removal {
            if self.insert(map) {
                if let Some(cascade) = &mut self.cascade {
                    cascade.rollback(map, events);
                }
            }
        } else {
            if let Some(cascade) = &mut self.cascade {
                cascade.rollback(map, events);
            }
            self.data = Some(map.layers.take(self.id));
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        if self.is_removal {
            ActionKind::RemoveLayer
        } else {
            ActionKind::CreateLayer
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum LayerProperty {
    Name(String),
    Color(Color),
    Hidden(bool),
}

impl LayerProperty {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Name(_) => ActionKind::RenameLayer,
            Self::Color(_) => ActionKind::ChangeLayerColor,
            Self::Hidden(_) => ActionKind::ToggleLayerVisibility,
        }
    }

    fn swap(&mut self, layer: &mut Layer) {
        match self {
            Self::Name(name) => std::mem::swap(name, &mut layer.name),
            Self::Color(color) => std::mem::swap(color, &mut layer.color),
            Self::Hidden(hidden) => std::mem::swap(hidden, &mut layer.hidden),
        }
    }

    /// The same property, read from `layer`.
    fn read(&self, layer: &Layer) -> Self {
        match self {
            Self::Name(_) => Self::Name(layer.name.clone()),
            Self::Color(_) => Self::Color(layer.color),
            Self::Hidden(_) => Self::Hidden(layer.hidden),
        }
    }
}

/// Changes one property of a layer. The action holds whichever value isn't in the map, so
/// execute and rollback are the same swap.
#[derive(Clone, Debug)]
pub struct LayerChange {
    id: Id<Layer>,
    value: LayerProperty,
}

impl LayerChange {
    pub fn new(id: Id<Layer>, value: LayerProperty) -> Self {
        Self { id, value }
    }
    pub fn rename(id: Id<Layer>, name: impl Into<String>) -> Self {
        Self::new(id, LayerProperty::Name(name.into()))
    }
    pub fn recolor(id: Id<Layer>, color: Color) -> Self {
        Self::new(id, LayerProperty::Color(color))
    }
    pub fn set_hidden(id: Id<Layer>, hidden: bool) -> Self {
        Self::new(id, LayerProperty::Hidden(hidden))
    }

    /// Returns the value the layer has after swapping.
    fn swap(&mut self, map: &mut WorkingMap) -> Option<LayerProperty> {
        let Some(layer) = map.layers.get_mut(self.id) else {
            warn!("tried to change nonexistent layer {:?}", self.id);
            return None;
        };
        self.value.swap(layer);
        Some(self.value.read(layer))
    }
}

impl MapCommand for LayerChange {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let new = self.swap(map).unwrap_or_else(|| self.value.clone());
        events.push(ActionEvent::LayerChanged {
            id: self.id,
            old: self.value.clone(),
            new,
        });
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        let old = self.swap(map).unwrap_or_else(|| self.value.clone());
        events.push(ActionEvent::LayerChanged {
            id: self.id,
            old,
            new: self.value.clone(),
        });
    }

    fn kind(&self) -> ActionKind {
        self.value.kind()
    }
}

/// Moves everything on `source` onto `destination`, then removes `source`.
#[derive(Clone, Debug)]
pub struct LayerMerge {
    source: Id<Layer>,
    destination: Id<Layer>,
    steps: Option<Composite>,
}

impl LayerMerge {
    pub fn new(source: Id<Layer>, destination: Id<Layer>) -> Self {
        Self {
            source,
            destination,
            steps: None,
        }
    }

    fn plan(&self, map: &WorkingMap) -> Option<Composite> {
        if self.source == self.destination {
            warn!("tried to merge layer {:?} into itself", self.source);
            return None;
        }
        for id in [self.source, self.destination] {
            if !map.layers.has(id) {
                warn!("tried to merge nonexistent layer {id:?}");
                return None;
            }
        }

        let members = map.hit_objects_in_layer(Some(self.source));
        Some(Composite::new(vec![
            MoveToLayer::new(members, Some(self.destination)).into(),
            LayerAddOrRemove::removal(self.source).into(),
        ]))
    }

    fn event(&self) -> ActionEvent {
        ActionEvent::LayersMerged {
            source: self.source,
            destination: self.destination,
        }
    }
}

impl MapCommand for LayerMerge {
    fn execute(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if self.steps.is_none() {
            self.steps = self.plan(map);
        }
        if let Some(steps) = &mut self.steps {
            steps.execute_steps(map, events);
        }
        events.push(self.event());
    }
    fn rollback(&mut self, map: &mut WorkingMap, events: &mut EventSink) {
        if let Some(steps) = &mut self.steps {
            steps.rollback_steps(map, events);
        }
        events.push(self.event());
    }

    fn kind(&self) -> ActionKind {
        ActionKind::MergeLayers
    }
}
