use foundation::Color;
use foundation::math::Ecef;
use scene::ObjectKind;
use scene::components::{AnnotationKind, Marker};
use scene::entity::EntityId;
use scene::picking::{ScreenPoint, SurfacePicker};
use viewer::SharedViewer;

use crate::shapes::{SHAPE_ALPHA, finalize};

/// Pointer input as delivered by the canvas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    PrimaryPress(ScreenPoint),
    SecondaryPress(ScreenPoint),
    Move(ScreenPoint),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a color: {0:?}")]
pub struct InvalidColor(pub String);

/// Kind and color in force when a sketch started. Later configuration
/// changes do not reach a running sketch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SketchSnapshot {
    pub kind: AnnotationKind,
    pub color: Color,
}

/// The last anchor doubles as the floating point: a click appends a new
/// one and a move overwrites it.
#[derive(Debug)]
struct Sketch {
    snapshot: SketchSnapshot,
    anchors: Vec<Ecef>,
    floating_marker: EntityId,
    markers: Vec<EntityId>,
    preview: EntityId,
}

impl Sketch {
    fn refresh_preview(&self, world: &mut scene::World) {
        let preview = finalize(self.snapshot.kind, &self.anchors, self.snapshot.color);
        world.set_preview(self.preview, preview);
    }

    fn place_floating_marker(&self, world: &mut scene::World, position: Ecef) {
        if let Some(marker) = world.marker_mut(self.floating_marker) {
            marker.position = position;
        }
    }
}

#[derive(Debug, Default)]
enum SketchState {
    #[default]
    Idle,
    Sketching(Sketch),
}

/// Turns pointer events into annotations.
///
/// Idle until a primary press hits the surface, then Sketching until a
/// secondary press finalizes the shape. Presses and moves that miss the
/// surface are ignored in every state.
#[derive(Debug)]
pub struct DrawingController {
    viewer: SharedViewer,
    kind: AnnotationKind,
    color: Color,
    state: SketchState,
}

impl DrawingController {
    pub fn new(viewer: SharedViewer) -> Self {
        Self {
            viewer,
            kind: AnnotationKind::default(),
            color: Color::WHITE,
            state: SketchState::Idle,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Applies from the next sketch on.
    pub fn set_kind(&mut self, kind: AnnotationKind) {
        self.kind = kind;
    }

    /// Applies from the next sketch on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_color_css(&mut self, css: &str) -> Result<(), InvalidColor> {
        let color = Color::from_css(css).ok_or_else(|| InvalidColor(css.to_string()))?;
        self.set_color(color);
        Ok(())
    }

    pub fn is_sketching(&self) -> bool {
        matches!(self.state, SketchState::Sketching(_))
    }

    pub fn snapshot(&self) -> Option<SketchSnapshot> {
        match &self.state {
            SketchState::Sketching(sketch) => Some(sketch.snapshot),
            SketchState::Idle => None,
        }
    }

    /// Anchors of the running sketch; empty while idle.
    pub fn anchors(&self) -> &[Ecef] {
        match &self.state {
            SketchState::Sketching(sketch) => &sketch.anchors,
            SketchState::Idle => &[],
        }
    }

    /// Routes one pointer event. Returns the annotation created, if the
    /// event finished a sketch with a valid shape.
    pub fn handle(&mut self, event: PointerEvent) -> Option<EntityId> {
        match event {
            PointerEvent::PrimaryPress(screen) => {
                self.primary_press(screen);
                None
            }
            PointerEvent::Move(screen) => {
                self.pointer_move(screen);
                None
            }
            PointerEvent::SecondaryPress(_) => self.terminate(),
        }
    }

    pub fn primary_press(&mut self, screen: ScreenPoint) {
        let Some(hit) = self.pick(screen) else {
            return;
        };
        match std::mem::take(&mut self.state) {
            SketchState::Idle => self.state = SketchState::Sketching(self.begin(hit)),
            SketchState::Sketching(mut sketch) => {
                self.commit(&mut sketch, hit);
                self.state = SketchState::Sketching(sketch);
            }
        }
    }

    /// Moves the floating point: on a hit the last anchor is replaced.
    pub fn pointer_move(&mut self, screen: ScreenPoint) {
        let SketchState::Sketching(sketch) = &mut self.state else {
            return;
        };
        let Some(hit) = self.viewer.borrow().pick_surface(screen) else {
            return;
        };
        if let Some(last) = sketch.anchors.last_mut() {
            *last = hit;
        }
        let mut viewer = self.viewer.borrow_mut();
        sketch.place_floating_marker(&mut viewer.world, hit);
        sketch.refresh_preview(&mut viewer.world);
    }

    /// Finishes the sketch from its anchors. Returns the new annotation, or
    /// `None` when idle or when the anchors do not form a shape of the
    /// snapshotted kind.
    pub fn terminate(&mut self) -> Option<EntityId> {
        let SketchState::Sketching(sketch) = std::mem::take(&mut self.state) else {
            return None;
        };
        let shape = finalize(sketch.snapshot.kind, &sketch.anchors, sketch.snapshot.color);
        let mut viewer = self.viewer.borrow_mut();
        remove_transients(&mut viewer.world, &sketch);

        let Some(shape) = shape else {
            tracing::debug!(
                kind = %sketch.snapshot.kind,
                anchors = sketch.anchors.len(),
                "sketch discarded"
            );
            return None;
        };
        let entity = viewer.world.spawn_annotation(shape);
        tracing::debug!(
            kind = %sketch.snapshot.kind,
            anchors = sketch.anchors.len(),
            entity = entity.index(),
            "annotation committed"
        );
        Some(entity)
    }

    /// Removes every annotation and abandons any sketch in progress.
    pub fn clear_drawings(&mut self) -> usize {
        let mut viewer = self.viewer.borrow_mut();
        if let SketchState::Sketching(sketch) = std::mem::take(&mut self.state) {
            remove_transients(&mut viewer.world, &sketch);
        }
        let removed = viewer.world.despawn_kind(ObjectKind::Annotation);
        tracing::debug!(removed, "drawings cleared");
        removed
    }

    fn pick(&self, screen: ScreenPoint) -> Option<Ecef> {
        self.viewer.borrow().pick_surface(screen)
    }

    fn begin(&self, hit: Ecef) -> Sketch {
        let snapshot = SketchSnapshot {
            kind: self.kind,
            color: self.color,
        };
        let marker_color = snapshot.color.with_alpha(SHAPE_ALPHA);
        let mut viewer = self.viewer.borrow_mut();
        let floating_marker = viewer.world.spawn_marker(Marker::new(hit, marker_color));
        let first_marker = viewer.world.spawn_marker(Marker::new(hit, marker_color));
        let preview = viewer.world.spawn();

        let sketch = Sketch {
            snapshot,
            anchors: vec![hit],
            floating_marker,
            markers: vec![first_marker],
            preview,
        };
        sketch.refresh_preview(&mut viewer.world);
        tracing::debug!(kind = %snapshot.kind, "sketch started");
        sketch
    }

    fn commit(&self, sketch: &mut Sketch, hit: Ecef) {
        let marker_color = sketch.snapshot.color.with_alpha(SHAPE_ALPHA);
        sketch.anchors.push(hit);
        let mut viewer = self.viewer.borrow_mut();
        sketch
            .markers
            .push(viewer.world.spawn_marker(Marker::new(hit, marker_color)));
        sketch.place_floating_marker(&mut viewer.world, hit);
        sketch.refresh_preview(&mut viewer.world);
    }
}

fn remove_transients(world: &mut scene::World, sketch: &Sketch) {
    world.despawn(sketch.floating_marker);
    world.despawn(sketch.preview);
    for marker in &sketch.markers {
        world.despawn(*marker);
    }
}
