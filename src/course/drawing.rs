//! Reading course drawings
//!
//! Turns an SVG document into the handful of primitives the compiler cares
//! about. Geometry is read leniently: a numeric attribute uses its longest
//! numeric prefix (`"12px"` is 12) floored to a whole unit, and anything
//! unreadable is 0.

use super::CourseError;
use super::transform::Transform;

/// Geometry of a drawing element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Circle { cx: f32, cy: f32, radius: f32 },
    Rect { x: f32, y: f32, width: f32, height: f32 },
}

/// A circle or rectangle with its authoring attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub primitive: Primitive,
    pub fill: Option<String>,
    pub class: Option<String>,
    pub transform: Transform,
    /// Any `opacity` attribute marks guide geometry
    pub has_opacity: bool,
}

impl Element {
    pub fn class_is(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }
}

/// Element ids joined by a connector polyline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub from: String,
    pub to: String,
}

/// Everything the compiler reads from one course asset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawing {
    pub title: Option<String>,
    pub circles: Vec<Element>,
    pub rects: Vec<Element>,
    pub connectors: Vec<Connector>,
}

impl Drawing {
    pub fn parse(svg: &str) -> Result<Self, CourseError> {
        let document = roxmltree::Document::parse(svg)?;
        let mut drawing = Drawing::default();

        for node in document.descendants().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "title" if drawing.title.is_none() => {
                    drawing.title = node.text().map(|t| t.trim().to_string());
                }
                "circle" | "ellipse" => {
                    let radius = node.attribute("r").or_else(|| node.attribute("rx"));
                    let primitive = Primitive::Circle {
                        cx: parse_number(node.attribute("cx")),
                        cy: parse_number(node.attribute("cy")),
                        radius: parse_number(radius),
                    };
                    drawing.circles.push(element(&node, primitive));
                }
                "rect" => {
                    // The compiler floors the center, not the corner
                    let primitive = Primitive::Rect {
                        x: parse_raw(node.attribute("x")),
                        y: parse_raw(node.attribute("y")),
                        width: parse_number(node.attribute("width")),
                        height: parse_number(node.attribute("height")),
                    };
                    drawing.rects.push(element(&node, primitive));
                }
                "polyline" | "line" | "path" => {
                    // svg-edit writes `se:connector`; match on the local name
                    let connector = node
                        .attributes()
                        .find(|a| a.name() == "connector")
                        .map(|a| a.value());
                    if let Some(connector) = connector {
                        let mut ids = connector.split_whitespace();
                        if let (Some(from), Some(to)) = (ids.next(), ids.next()) {
                            drawing.connectors.push(Connector {
                                from: from.to_string(),
                                to: to.to_string(),
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(drawing)
    }
}

fn element(node: &roxmltree::Node, primitive: Primitive) -> Element {
    let text = |name: &str| {
        node.attribute(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    Element {
        id: text("id"),
        primitive,
        fill: text("fill"),
        class: text("class"),
        transform: node.attribute("transform").map(Transform::parse).unwrap_or_default(),
        has_opacity: node.attribute("opacity").is_some(),
    }
}

/// Float from the longest numeric prefix of `text`, like a lenient parseFloat
pub fn parse_leading_float(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    let candidate = &text[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate[..len].parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

fn parse_raw(value: Option<&str>) -> f32 {
    value.and_then(parse_leading_float).unwrap_or(0.0)
}

/// Lenient, floored geometry value; missing or unreadable values are 0
pub fn parse_number(value: Option<&str>) -> f32 {
    parse_raw(value).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:se="http://svg-edit.googlecode.com">
  <g>
    <title>Test Hole,3</title>
    <ellipse id="a" cx="10.7" cy="20" rx="5" ry="5" fill="#ffff00" class="spin" transform="rotate(90)"/>
    <circle id="b" cx="40" cy="20" r="5px" fill="#00ffff" opacity="0.5"/>
    <rect id="c" x="0.5" y="100" width="300.9" height="oops" fill="#a5e306"/>
    <polyline se:connector="a c" points="0,0 1,1"/>
    <polyline points="0,0 1,1"/>
  </g>
</svg>"##;

    #[test]
    fn reads_primitives_and_attributes() {
        let drawing = Drawing::parse(SVG).expect("valid svg");
        assert_eq!(drawing.title.as_deref(), Some("Test Hole,3"));
        assert_eq!(drawing.circles.len(), 2);
        assert_eq!(drawing.rects.len(), 1);

        let a = &drawing.circles[0];
        assert_eq!(a.primitive, Primitive::Circle { cx: 10.0, cy: 20.0, radius: 5.0 });
        assert!(a.class_is("spin"));
        assert_eq!(a.transform.get("rotate"), Some(&[90.0][..]));
        assert!(!a.has_opacity);

        let b = &drawing.circles[1];
        assert!(b.has_opacity);
        assert_eq!(b.primitive, Primitive::Circle { cx: 40.0, cy: 20.0, radius: 5.0 });

        let c = &drawing.rects[0];
        assert_eq!(c.primitive, Primitive::Rect { x: 0.5, y: 100.0, width: 300.0, height: 0.0 });
    }

    #[test]
    fn connectors_need_two_ids() {
        let drawing = Drawing::parse(SVG).expect("valid svg");
        assert_eq!(
            drawing.connectors,
            vec![Connector {
                from: "a".into(),
                to: "c".into()
            }]
        );
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_number(Some("12.9px")), 12.0);
        assert_eq!(parse_number(Some("-3.2")), -4.0);
        assert_eq!(parse_number(Some("1e2")), 100.0);
        assert_eq!(parse_number(Some("abc")), 0.0);
        assert_eq!(parse_number(Some("")), 0.0);
        assert_eq!(parse_number(None), 0.0);
        assert_eq!(parse_leading_float("5e"), Some(5.0));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(Drawing::parse("<svg><g></svg>").is_err());
    }
}
