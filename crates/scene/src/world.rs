use crate::components::{Annotation, Marker, PlacedModel, Visibility};
use crate::entity::EntityId;
use foundation::handles::Handle;

/// Which column an entity's primary component lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Marker,
    Preview,
    Annotation,
    Model,
}

/// Scene-object collection of the viewer host.
///
/// Components are stored column-wise and indexed by `EntityId::index()`.
/// Freed slots are reused with a bumped generation, so a despawned id stays
/// dead even after its slot is taken again.
#[derive(Debug, Default)]
pub struct World {
    alive: Vec<bool>,
    generations: Vec<u32>,
    free: Vec<u32>,
    markers: Vec<Option<Marker>>,
    previews: Vec<Option<Annotation>>,
    annotations: Vec<Option<Annotation>>,
    models: Vec<Option<PlacedModel>>,
    visibility: Vec<Option<Visibility>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let idx = match self.free.pop() {
            Some(idx) => idx as usize,
            None => {
                let idx = self.alive.len();
                self.ensure_capacity(idx);
                idx
            }
        };
        self.alive[idx] = true;
        self.handle(idx)
    }

    pub fn spawn_marker(&mut self, marker: Marker) -> EntityId {
        let e = self.spawn();
        self.markers[e.index() as usize] = Some(marker);
        e
    }

    pub fn spawn_preview(&mut self, preview: Annotation) -> EntityId {
        let e = self.spawn();
        self.previews[e.index() as usize] = Some(preview);
        e
    }

    pub fn spawn_annotation(&mut self, annotation: Annotation) -> EntityId {
        let e = self.spawn();
        self.annotations[e.index() as usize] = Some(annotation);
        e
    }

    pub fn spawn_model(&mut self, model: PlacedModel, visibility: Visibility) -> EntityId {
        let e = self.spawn();
        self.models[e.index() as usize] = Some(model);
        self.visibility[e.index() as usize] = Some(visibility);
        e
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Removes an entity and all of its components.
    ///
    /// Returns `false` if the entity was already gone.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let idx = entity.index() as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free.push(idx as u32);
        self.markers[idx] = None;
        self.previews[idx] = None;
        self.annotations[idx] = None;
        self.models[idx] = None;
        self.visibility[idx] = None;
        true
    }

    /// Removes every entity whose primary component is of `kind`.
    ///
    /// Returns the number of entities removed.
    pub fn despawn_kind(&mut self, kind: ObjectKind) -> usize {
        let doomed: Vec<EntityId> = self
            .entities()
            .filter(|e| self.kind_of(*e) == Some(kind))
            .collect();
        for e in &doomed {
            self.despawn(*e);
        }
        doomed.len()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        for e in self.entities().collect::<Vec<_>>() {
            self.despawn(e);
        }
    }

    pub fn len(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| self.handle(idx))
    }

    pub fn kind_of(&self, entity: EntityId) -> Option<ObjectKind> {
        let idx = self.slot(entity)?;
        if self.markers[idx].is_some() {
            Some(ObjectKind::Marker)
        } else if self.previews[idx].is_some() {
            Some(ObjectKind::Preview)
        } else if self.annotations[idx].is_some() {
            Some(ObjectKind::Annotation)
        } else if self.models[idx].is_some() {
            Some(ObjectKind::Model)
        } else {
            None
        }
    }

    pub fn marker(&self, entity: EntityId) -> Option<&Marker> {
        self.markers[self.slot(entity)?].as_ref()
    }

    pub fn marker_mut(&mut self, entity: EntityId) -> Option<&mut Marker> {
        let idx = self.slot(entity)?;
        self.markers[idx].as_mut()
    }

    pub fn preview(&self, entity: EntityId) -> Option<&Annotation> {
        self.previews[self.slot(entity)?].as_ref()
    }

    /// Replaces (or clears, with `None`) the preview geometry of `entity`.
    pub fn set_preview(&mut self, entity: EntityId, preview: Option<Annotation>) {
        if let Some(idx) = self.slot(entity) {
            self.previews[idx] = preview;
        }
    }

    pub fn annotation(&self, entity: EntityId) -> Option<&Annotation> {
        self.annotations[self.slot(entity)?].as_ref()
    }

    pub fn model(&self, entity: EntityId) -> Option<&PlacedModel> {
        self.models[self.slot(entity)?].as_ref()
    }

    pub fn visibility(&self, entity: EntityId) -> Visibility {
        self.slot(entity)
            .and_then(|idx| self.visibility[idx])
            .unwrap_or(Visibility::visible())
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        if let Some(idx) = self.slot(entity) {
            self.visibility[idx] = Some(visibility);
        }
    }

    pub fn markers(&self) -> Vec<(EntityId, &Marker)> {
        self.collect(&self.markers)
    }

    pub fn previews(&self) -> Vec<(EntityId, &Annotation)> {
        self.collect(&self.previews)
    }

    pub fn annotations(&self) -> Vec<(EntityId, &Annotation)> {
        self.collect(&self.annotations)
    }

    pub fn models(&self) -> Vec<(EntityId, &PlacedModel)> {
        self.collect(&self.models)
    }

    /// Number of slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.alive.len()
    }

    /// Column index of `entity` if it is alive and of the current generation.
    fn slot(&self, entity: EntityId) -> Option<usize> {
        let idx = entity.index() as usize;
        let current = self.alive.get(idx).copied().unwrap_or(false)
            && self.generations[idx] == entity.generation();
        current.then_some(idx)
    }

    fn handle(&self, idx: usize) -> EntityId {
        EntityId(Handle::new(idx as u32, self.generations[idx]))
    }

    fn collect<'a, T>(&self, column: &'a [Option<T>]) -> Vec<(EntityId, &'a T)> {
        column
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| c.as_ref().map(|c| (self.handle(idx), c)))
            .collect()
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.alive.len() <= idx {
            let new_len = idx + 1;
            self.alive.resize(new_len, false);
            self.generations.resize(new_len, 0);
            self.markers.resize(new_len, None);
            self.previews.resize(new_len, None);
            self.annotations.resize(new_len, None);
            self.models.resize(new_len, None);
            self.visibility.resize(new_len, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectKind, World};
    use crate::components::{
        Annotation, AnnotationGeometry, AnnotationKind, Marker, PlacedModel, Visibility,
    };
    use foundation::Color;
    use foundation::math::{Ecef, Geodetic};

    fn point_annotation() -> Annotation {
        let p = Ecef::new(1.0, 0.0, 0.0);
        Annotation {
            kind: AnnotationKind::Point,
            anchors: vec![p],
            geometry: AnnotationGeometry::Point { position: p },
            color: Color::WHITE,
        }
    }

    #[test]
    fn spawn_and_query_by_kind() {
        let mut world = World::new();
        let m = world.spawn_marker(Marker::new(Ecef::new(0.0, 0.0, 0.0), Color::RED));
        let a = world.spawn_annotation(point_annotation());

        assert_eq!(world.kind_of(m), Some(ObjectKind::Marker));
        assert_eq!(world.kind_of(a), Some(ObjectKind::Annotation));
        assert_eq!(world.annotations().len(), 1);
        assert_eq!(world.markers()[0].0, m);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn despawn_is_idempotent_and_stale_ids_stay_dead() {
        let mut world = World::new();
        let a = world.spawn_annotation(point_annotation());
        assert!(world.despawn(a));
        assert!(!world.despawn(a));
        assert!(world.annotation(a).is_none());

        let b = world.spawn_marker(Marker::new(Ecef::new(0.0, 0.0, 0.0), Color::RED));
        assert_eq!(b.index(), a.index());
        assert_ne!(a, b);
        assert!(!world.is_alive(a));
        assert!(world.marker(a).is_none());
        assert_eq!(world.kind_of(a), None);
        assert!(!world.despawn(a));
        assert!(world.is_alive(b));
    }

    #[test]
    fn spawn_despawn_cycles_reuse_slots() {
        let mut world = World::new();
        for _ in 0..1_000 {
            let marker = world.spawn_marker(Marker::new(Ecef::new(1.0, 0.0, 0.0), Color::WHITE));
            let preview = world.spawn();
            world.despawn(marker);
            world.despawn(preview);
        }
        assert!(world.is_empty());
        assert_eq!(world.capacity(), 2);
    }

    #[test]
    fn despawn_kind_only_touches_that_kind() {
        let mut world = World::new();
        world.spawn_annotation(point_annotation());
        world.spawn_annotation(point_annotation());
        let model = world.spawn_model(
            PlacedModel::new("m", 1, "https://assets/1", Geodetic::from_degrees(0.0, 0.0, 0.0)),
            Visibility::visible(),
        );

        assert_eq!(world.despawn_kind(ObjectKind::Annotation), 2);
        assert!(world.annotations().is_empty());
        assert!(world.is_alive(model));

        world.clear();
        assert!(world.is_empty());
    }

    #[test]
    fn unset_visibility_defaults_to_visible() {
        let mut world = World::new();
        let a = world.spawn_annotation(point_annotation());
        assert!(world.visibility(a).visible);
        world.set_visibility(a, Visibility::hidden());
        assert!(!world.visibility(a).visible);
    }
}
