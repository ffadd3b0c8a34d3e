//! Course compiler: SVG drawing to physics scene
//!
//! Authoring conventions:
//! - any `opacity` attribute marks guide geometry, which is left out
//! - the `#00ff00` circle is the tee and the `#ff0000` circle the hole
//! - `class="spin"` or `"dynamic"` makes a body movable, `"water"` makes a
//!   rectangle a liquid, and any class on a `#000000` element is a sprite
//! - polylines with a `connector` attribute join two elements by id

use glam::Vec2;
use log::{debug, warn};

use super::drawing::{Drawing, Element, Primitive, parse_leading_float};
use super::{Course, CourseError};
use crate::consts::{GRAVITY, WATER_PERMEABILITY};
use crate::material::{self, DECORATION_FILL, GOAL_MARKER, MaterialType, START_MARKER};
use crate::physics::{BodyId, World};

const FRICTION: f32 = 1.0;
const RESTITUTION: f32 = 0.5;
/// Mass of movable course props
const DYNAMIC_MASS: f32 = 1.0;
/// Largest par a course title may declare
pub const MAX_PAR: u32 = 99;

/// Compile one course drawing into an immutable template
pub fn compile_course(svg: &str) -> Result<Course, CourseError> {
    let drawing = Drawing::parse(svg)?;
    let title = drawing.title.as_deref().ok_or(CourseError::MissingTitle)?;
    let (name, par) = parse_title(title);

    let mut world = World::new(GRAVITY);
    let mut start = None;
    let mut goal = None;

    for element in drawing.circles.iter().filter(|e| !e.has_opacity) {
        let fill = element.fill.as_deref();
        if material::is_fill(fill, START_MARKER) {
            set_marker(&mut start, element, "start", &name);
        } else if material::is_fill(fill, GOAL_MARKER) {
            set_marker(&mut goal, element, "goal", &name);
        } else {
            add_element(&mut world, element);
        }
    }

    for element in drawing.rects.iter().filter(|e| !e.has_opacity) {
        add_element(&mut world, element);
    }

    for connector in &drawing.connectors {
        match (find_svg_id(&world, &connector.from), find_svg_id(&world, &connector.to)) {
            (Some(a), Some(b)) => {
                if !world.create_joint(a, b, None, 0.0) {
                    warn!(
                        "{}: connector {} -> {} joins an element to itself, skipped",
                        name, connector.from, connector.to
                    );
                }
            }
            _ => debug!(
                "{}: skipping connector {} -> {}, unknown element",
                name, connector.from, connector.to
            ),
        }
    }

    if start.is_none() {
        warn!("{}: no start marker, balls spawn at the origin", name);
    }
    if goal.is_none() {
        warn!("{}: no goal marker, hole sits at the origin", name);
    }

    debug!(
        "Compiled {} (par {}): {} bodies, {} joints",
        name,
        par,
        world.all_bodies().len(),
        world.joints().len()
    );

    Ok(Course {
        start: start.unwrap_or(Vec2::ZERO),
        goal: goal.unwrap_or(Vec2::ZERO),
        world,
        name,
        par,
    })
}

/// `"<name>,<par>"`; a missing or unreadable par is 0, a huge one is
/// capped at `MAX_PAR`
fn parse_title(title: &str) -> (String, u32) {
    let mut parts = title.split(',');
    let name = parts.next().unwrap_or_default().trim().to_string();
    let Some(raw) = parts.next().and_then(parse_leading_float) else {
        warn!("{}: title has no par, using 0", name);
        return (name, 0);
    };
    if raw > MAX_PAR as f32 {
        warn!("{}: par {} is out of range, using {}", name, raw, MAX_PAR);
        return (name, MAX_PAR);
    }
    (name, raw.max(0.0) as u32)
}

fn set_marker(slot: &mut Option<Vec2>, element: &Element, what: &str, course: &str) {
    if slot.is_some() {
        warn!("{}: more than one {} marker, the last one wins", course, what);
    }
    *slot = Some(element_center(element));
}

fn element_center(element: &Element) -> Vec2 {
    match element.primitive {
        Primitive::Circle { cx, cy, .. } => Vec2::new(cx, cy),
        Primitive::Rect { x, y, width, height } => {
            Vec2::new((x + width / 2.0).floor(), (y + height / 2.0).floor())
        }
    }
}

fn add_element(world: &mut World, element: &Element) -> BodyId {
    let movable = element.class_is("spin") || element.class_is("dynamic");
    let mass = if movable { DYNAMIC_MASS } else { 0.0 };
    let center = element_center(element);

    let mut body = match element.primitive {
        Primitive::Circle { radius, .. } => world.create_circle(center, radius, mass, FRICTION, RESTITUTION),
        Primitive::Rect { width, height, .. } => {
            world.create_rectangle(center, width, height, mass, FRICTION, RESTITUTION)
        }
    };

    let mut material = MaterialType::from_fill(element.fill.as_deref());
    if matches!(element.primitive, Primitive::Rect { .. }) && element.class_is("water") {
        body.permeability = WATER_PERMEABILITY;
        material = MaterialType::Water;
    }
    body.data.material = Some(material);
    body.data.svg_id = element.id.clone();

    if material.is_bouncer() {
        body.data.original_bounds = Some(body.bounds());
    }

    let decoration = element.class.is_some() && material::is_fill(element.fill.as_deref(), DECORATION_FILL);
    if decoration {
        body.data.sprite = element.class.clone();
    }

    let pinned = element.class_is("spin");
    body.data.pinned = pinned;

    let id = world.add_body(body);
    if let Some(angle) = element.transform.rotation_radians() {
        world.rotate_body(id, angle);
    }
    if decoration {
        world.disable_body(id);
    }

    if pinned {
        let anchor = world.create_circle(center, 0.0, 0.0, FRICTION, RESTITUTION);
        let anchor = world.add_body(anchor);
        world.disable_body(anchor);
        world.create_joint(anchor, id, None, 0.0);
    }

    id
}

fn find_svg_id(world: &World, svg_id: &str) -> Option<BodyId> {
    world
        .all_bodies()
        .iter()
        .find(|b| b.data.svg_id.as_deref() == Some(svg_id))
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Shape;

    fn svg(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:se="http://svg-edit.googlecode.com"><g><title>Test,3</title>{body}</g></svg>"#
        )
    }

    fn body_by_svg_id<'a>(course: &'a Course, id: &str) -> &'a crate::physics::Body {
        let found = find_svg_id(&course.world, id).expect("body exists");
        course.world.body(found).expect("body exists")
    }

    #[test]
    fn test_markers_produce_coordinates_only() {
        let course = compile_course(&svg(
            r##"<circle cx="10" cy="20" r="5" fill="#00ff00"/><circle cx="30" cy="40" r="5" fill="#ff0000"/>"##,
        ))
        .expect("compiles");
        assert_eq!(course.start, Vec2::new(10.0, 20.0));
        assert_eq!(course.goal, Vec2::new(30.0, 40.0));
        assert!(course.world.all_bodies().is_empty());
        assert_eq!(course.name, "Test");
        assert_eq!(course.par, 3);
    }

    #[test]
    fn test_opacity_excludes_elements() {
        let course = compile_course(&svg(
            r##"<rect id="guide" x="0" y="0" width="10" height="10" opacity="0.3"/>
                <circle cx="5" cy="5" r="5" fill="#00ff00" opacity="0"/>"##,
        ))
        .expect("compiles");
        assert!(course.world.all_bodies().is_empty());
        assert_eq!(course.start, Vec2::ZERO);
    }

    #[test]
    fn test_static_rectangle_centered_and_rotated() {
        let course = compile_course(&svg(
            r##"<rect id="floor" x="0.5" y="100" width="201" height="21" fill="#a8cbcc" transform="rotate(90)"/>"##,
        ))
        .expect("compiles");
        let floor = body_by_svg_id(&course, "floor");
        assert!(floor.is_static());
        assert_eq!(floor.center, Vec2::new(101.0, 110.0));
        assert_eq!(floor.shape, Shape::Rectangle { width: 201.0, height: 21.0 });
        assert_eq!(floor.data.material, Some(MaterialType::Stone0));
        assert!((floor.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(floor.friction, 1.0);
        assert_eq!(floor.restitution, 0.5);
    }

    #[test]
    fn test_unknown_fill_is_grass() {
        let course = compile_course(&svg(r##"<circle id="c" cx="0" cy="0" r="3" fill="#123456"/>"##))
            .expect("compiles");
        assert_eq!(body_by_svg_id(&course, "c").data.material, Some(MaterialType::Grass));
    }

    #[test]
    fn test_water_rectangle() {
        let course = compile_course(&svg(
            r##"<rect id="pond" x="0" y="0" width="40" height="10" fill="#a5e306" class="water"/>"##,
        ))
        .expect("compiles");
        let pond = body_by_svg_id(&course, "pond");
        assert_eq!(pond.permeability, WATER_PERMEABILITY);
        assert_eq!(pond.data.material, Some(MaterialType::Water));
    }

    #[test]
    fn test_bouncer_records_original_bounds() {
        let course = compile_course(&svg(r##"<ellipse id="b" cx="0" cy="0" rx="12" ry="12" fill="#ffff00"/>"##))
            .expect("compiles");
        assert_eq!(body_by_svg_id(&course, "b").data.original_bounds, Some(12.0));
    }

    #[test]
    fn test_decoration_is_disabled_sprite() {
        let course = compile_course(&svg(r##"<circle id="tree" cx="0" cy="0" r="10" fill="#000000" class="tree"/>"##))
            .expect("compiles");
        let tree = body_by_svg_id(&course, "tree");
        assert!(!tree.enabled);
        assert_eq!(tree.data.sprite.as_deref(), Some("tree"));
        assert_eq!(course.world.enabled_bodies().count(), 0);
    }

    #[test]
    fn test_spin_creates_pinned_anchor() {
        let course = compile_course(&svg(
            r##"<rect id="mill" x="0" y="0" width="100" height="10" fill="#ff00ff" class="spin"/>"##,
        ))
        .expect("compiles");
        let mill = body_by_svg_id(&course, "mill");
        assert!(mill.is_dynamic());
        assert!(mill.data.pinned);

        assert_eq!(course.world.all_bodies().len(), 2);
        let anchor = course.world.all_bodies().iter().find(|b| b.id != mill.id).expect("anchor");
        assert!(!anchor.enabled);
        assert!(anchor.is_static());
        assert_eq!(anchor.center, mill.center);
        assert_eq!(anchor.bounds(), 0.0);

        let joint = &course.world.joints()[0];
        assert_eq!((joint.body_a, joint.body_b), (anchor.id, mill.id));
        assert_eq!(joint.rest_length, 0.0);
        assert_eq!(joint.strength, 0.0);
    }

    #[test]
    fn test_dynamic_class_is_movable() {
        let course = compile_course(&svg(r##"<circle id="rock" cx="0" cy="0" r="5" class="dynamic"/>"##))
            .expect("compiles");
        let rock = body_by_svg_id(&course, "rock");
        assert!(rock.is_dynamic());
        assert!(!rock.data.pinned);
        assert!(course.world.joints().is_empty());
    }

    #[test]
    fn test_connectors_join_after_all_elements_exist() {
        // The connector comes before the rectangle it names
        let course = compile_course(&svg(
            r##"<circle id="a" cx="0" cy="0" r="5" class="dynamic"/>
                <polyline se:connector="a plank" points="0,0 10,0"/>
                <polyline se:connector="a missing" points="0,0 10,0"/>
                <rect id="plank" x="20" y="0" width="20" height="4" class="dynamic"/>"##,
        ))
        .expect("compiles");
        assert_eq!(course.world.joints().len(), 1);
        let joint = &course.world.joints()[0];
        assert_eq!(joint.body_a, find_svg_id(&course.world, "a").expect("a"));
        assert_eq!(joint.body_b, find_svg_id(&course.world, "plank").expect("plank"));
    }

    #[test]
    fn test_connector_to_itself_is_skipped() {
        let course = compile_course(&svg(
            r##"<circle id="a" cx="0" cy="0" r="5" class="dynamic"/>
                <polyline se:connector="a a" points="0,0 10,0"/>"##,
        ))
        .expect("compiles");
        assert!(course.world.joints().is_empty());
        let mut world = course.world.clone();
        world.step(1000.0 / 60.0);

        // Both ends resolve to the first element carrying the id
        let course = compile_course(&svg(
            r##"<circle id="dup" cx="0" cy="0" r="5" class="dynamic"/>
                <rect id="dup" x="20" y="0" width="20" height="4" class="dynamic"/>
                <polyline se:connector="dup dup" points="0,0 10,0"/>"##,
        ))
        .expect("compiles");
        assert!(course.world.joints().is_empty());
        course.world.clone().step(1000.0 / 60.0);
    }

    #[test]
    fn test_malformed_numbers_degrade_to_zero() {
        let course = compile_course(&svg(r##"<circle id="c" cx="oops" cy="7.9" r=""/>"##)).expect("compiles");
        let c = body_by_svg_id(&course, "c");
        assert_eq!(c.center, Vec2::new(0.0, 7.0));
        assert_eq!(c.bounds(), 0.0);
    }

    #[test]
    fn test_title_parsing() {
        assert_eq!(parse_title("Windmill,4"), ("Windmill".to_string(), 4));
        assert_eq!(parse_title(" Long Drive , 5 "), ("Long Drive".to_string(), 5));
        assert_eq!(parse_title("No Par"), ("No Par".to_string(), 0));
        assert_eq!(parse_title("Huge,3000000000"), ("Huge".to_string(), MAX_PAR));
        assert_eq!(parse_title("Sunk,-2"), ("Sunk".to_string(), 0));
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let result = compile_course(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#);
        assert!(matches!(result, Err(CourseError::MissingTitle)));
        assert!(matches!(compile_course("not xml"), Err(CourseError::Xml(_))));
    }
}
