//! SVG `transform` attribute parsing
//!
//! `rotate(30 10 10) translate(5,5)` becomes `{rotate: [30, 10, 10],
//! translate: [5, 5]}`. Later entries of the same kind replace earlier ones.

use std::collections::BTreeMap;

use super::drawing::parse_leading_float;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    entries: BTreeMap<String, Vec<f32>>,
}

impl Transform {
    /// Parse a transform list. Unparseable arguments are dropped and an
    /// unterminated group stops parsing.
    pub fn parse(source: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut rest = source;

        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            let name_len = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            if name_len == 0 {
                break;
            }
            let name = &rest[..name_len];
            let after_name = rest[name_len..].trim_start();
            let Some(args_start) = after_name.strip_prefix('(') else {
                break;
            };
            let Some(close) = args_start.find(')') else {
                break;
            };

            let args = args_start[..close]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|a| !a.is_empty())
                .filter_map(|a| a.parse::<f32>().ok().or_else(|| parse_leading_float(a)))
                .collect();
            entries.insert(name.to_string(), args);
            rest = &args_start[close + 1..];
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rotation in radians, if a `rotate` with at least an angle is present
    pub fn rotation_radians(&self) -> Option<f32> {
        self.get("rotate")
            .and_then(|args| args.first())
            .map(|deg| deg.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rotate_with_center() {
        let t = Transform::parse("rotate(45 100 200)");
        assert_eq!(t.get("rotate"), Some(&[45.0, 100.0, 200.0][..]));
        let rad = t.rotation_radians().expect("rotation");
        assert!((rad - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn negative_and_exponent_angles() {
        assert_eq!(Transform::parse("rotate(-12.5)").get("rotate"), Some(&[-12.5][..]));
        assert_eq!(Transform::parse("rotate(1e1)").get("rotate"), Some(&[10.0][..]));
    }

    #[test]
    fn translate_with_commas() {
        let t = Transform::parse("translate(10,-20)");
        assert_eq!(t.get("translate"), Some(&[10.0, -20.0][..]));
        assert_eq!(t.rotation_radians(), None);
    }

    #[test]
    fn scale_single_argument() {
        assert_eq!(Transform::parse("scale(2)").get("scale"), Some(&[2.0][..]));
    }

    #[test]
    fn matrix_six_arguments() {
        let t = Transform::parse("matrix(1 0 0 1 30 40)");
        assert_eq!(t.get("matrix").map(<[f32]>::len), Some(6));
    }

    #[test]
    fn skew_kinds_keep_their_case() {
        let t = Transform::parse("skewX(10) skewY(-5)");
        assert_eq!(t.get("skewX"), Some(&[10.0][..]));
        assert_eq!(t.get("skewY"), Some(&[-5.0][..]));
    }

    #[test]
    fn chained_transforms() {
        let t = Transform::parse(" translate(5 5), rotate(90)  scale(0.5, 2)");
        assert_eq!(t.get("translate"), Some(&[5.0, 5.0][..]));
        assert_eq!(t.get("rotate"), Some(&[90.0][..]));
        assert_eq!(t.get("scale"), Some(&[0.5, 2.0][..]));
    }

    #[test]
    fn malformed_input_is_tolerated() {
        assert!(Transform::parse("").is_empty());
        assert!(Transform::parse("rotate(30").is_empty());
        assert!(Transform::parse("(30)").is_empty());
        let t = Transform::parse("rotate(abc 15)");
        assert_eq!(t.get("rotate"), Some(&[15.0][..]));
        assert_eq!(t.rotation_radians(), Some(15.0_f32.to_radians()));
    }

    proptest! {
        #[test]
        fn rotate_round_trips_integer_degrees(deg in -360i32..=360) {
            let t = Transform::parse(&format!("rotate({deg})"));
            prop_assert_eq!(t.get("rotate"), Some(&[deg as f32][..]));
        }

        #[test]
        fn never_panics(source in ".{0,40}") {
            let _ = Transform::parse(&source);
        }
    }
}
