use drawing::{DrawingController, PointerEvent};
use foundation::math::Ecef;
use proptest::prelude::*;
use scene::components::{AnnotationGeometry, AnnotationKind};
use scene::picking::{ScreenPoint, SurfacePicker};
use viewer::{SharedViewer, Viewer, ViewerOptions};

// Every point in this box hits the globe from the home view.
fn arb_screen() -> impl Strategy<Value = ScreenPoint> {
    (550.0f64..730.0, 270.0f64..450.0).prop_map(|(x, y)| ScreenPoint::new(x, y))
}

fn arb_kind() -> impl Strategy<Value = AnnotationKind> {
    prop::sample::select(AnnotationKind::ALL.to_vec())
}

/// A click, optionally preceded by a hover somewhere else.
fn arb_click() -> impl Strategy<Value = (Option<ScreenPoint>, ScreenPoint)> {
    (prop::option::of(arb_screen()), arb_screen())
}

fn setup(kind: AnnotationKind) -> (SharedViewer, DrawingController) {
    let viewer = Viewer::shared(ViewerOptions::default());
    let mut controller = DrawingController::new(viewer.clone());
    controller.set_kind(kind);
    (viewer, controller)
}

fn hit(viewer: &SharedViewer, screen: ScreenPoint) -> Ecef {
    viewer.borrow().pick_surface(screen).expect("box hits the globe")
}

/// Replays clicks (with hovers) and a trailing hover, then terminates.
///
/// The returned anchors follow the sketch rules: a click appends, a hover
/// after the first click overwrites the last anchor.
fn run(
    viewer: &SharedViewer,
    controller: &mut DrawingController,
    clicks: &[(Option<ScreenPoint>, ScreenPoint)],
    trailing: ScreenPoint,
) -> (Vec<Ecef>, Option<scene::entity::EntityId>) {
    let mut anchors = Vec::new();
    for (hover, click) in clicks {
        if let Some(hover) = hover {
            controller.handle(PointerEvent::Move(*hover));
            if let Some(last) = anchors.last_mut() {
                *last = hit(viewer, *hover);
            }
        }
        controller.handle(PointerEvent::PrimaryPress(*click));
        anchors.push(hit(viewer, *click));
    }
    controller.handle(PointerEvent::Move(trailing));
    if let Some(last) = anchors.last_mut() {
        *last = hit(viewer, trailing);
    }
    let created = controller.handle(PointerEvent::SecondaryPress(trailing));
    (anchors, created)
}

proptest! {
    #[test]
    fn line_and_polygon_keep_one_anchor_per_click(
        polygon in any::<bool>(),
        clicks in prop::collection::vec(arb_click(), 1..8),
        trailing in arb_screen(),
    ) {
        let kind = if polygon { AnnotationKind::Polygon } else { AnnotationKind::Line };
        let (viewer, mut controller) = setup(kind);
        let (anchors, created) = run(&viewer, &mut controller, &clicks, trailing);

        let entity = created.expect("annotation");
        let v = viewer.borrow();
        let shape = v.world.annotation(entity).expect("stored");
        prop_assert_eq!(&shape.anchors, &anchors);
        prop_assert_eq!(v.world.len(), 1);
    }

    #[test]
    fn hover_between_clicks_overwrites_the_previous_anchor(
        a in arb_screen(),
        b in arb_screen(),
        hover in arb_screen(),
        c in arb_screen(),
    ) {
        let (viewer, mut controller) = setup(AnnotationKind::Line);
        controller.handle(PointerEvent::PrimaryPress(a));
        controller.handle(PointerEvent::PrimaryPress(b));
        controller.handle(PointerEvent::Move(hover));
        controller.handle(PointerEvent::PrimaryPress(c));
        let entity = controller.terminate().expect("line");

        let v = viewer.borrow();
        let expected = vec![hit(&viewer, a), hit(&viewer, hover), hit(&viewer, c)];
        prop_assert_eq!(v.world.annotation(entity).map(|s| s.anchors.clone()), Some(expected));
    }

    #[test]
    fn point_lands_on_last_anchor(
        clicks in prop::collection::vec(arb_click(), 1..6),
        trailing in arb_screen(),
    ) {
        let (viewer, mut controller) = setup(AnnotationKind::Point);
        let (anchors, created) = run(&viewer, &mut controller, &clicks, trailing);

        let entity = created.expect("point");
        let v = viewer.borrow();
        let last = *anchors.last().expect("at least one click");
        prop_assert_eq!(
            v.world.annotation(entity).map(|s| s.geometry.clone()),
            Some(AnnotationGeometry::Point { position: last })
        );
    }

    #[test]
    fn two_point_kinds_need_exactly_two_clicks(
        kind in prop::sample::select(vec![
            AnnotationKind::Rectangle,
            AnnotationKind::Circle,
            AnnotationKind::Ellipse,
        ]),
        clicks in prop::collection::vec(arb_click(), 1..6),
        trailing in arb_screen(),
    ) {
        let (viewer, mut controller) = setup(kind);
        let (_, created) = run(&viewer, &mut controller, &clicks, trailing);

        prop_assert_eq!(created.is_some(), clicks.len() == 2);
        prop_assert_eq!(viewer.borrow().world.len(), usize::from(clicks.len() == 2));
    }

    #[test]
    fn terminate_always_returns_to_idle_without_transients(
        kind in arb_kind(),
        clicks in prop::collection::vec(arb_click(), 1..6),
        trailing in arb_screen(),
    ) {
        let (viewer, mut controller) = setup(kind);
        run(&viewer, &mut controller, &clicks, trailing);

        prop_assert!(!controller.is_sketching());
        let v = viewer.borrow();
        prop_assert!(v.world.markers().is_empty());
        prop_assert!(v.world.previews().is_empty());
    }

    #[test]
    fn rectangle_ignores_click_order(a in arb_screen(), b in arb_screen()) {
        let draw = |first: ScreenPoint, second: ScreenPoint| {
            let (viewer, mut controller) = setup(AnnotationKind::Rectangle);
            controller.primary_press(first);
            controller.primary_press(second);
            let entity = controller.terminate().expect("rectangle");
            let geometry = viewer.borrow().world.annotation(entity).map(|s| s.geometry.clone());
            geometry
        };
        prop_assert_eq!(draw(a, b), draw(b, a));
    }
}
