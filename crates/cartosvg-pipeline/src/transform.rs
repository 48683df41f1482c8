//! `transform` attribute parsing.
//!
//! Only two forms are recognized, each on its own:
//!
//! - `translate(ox, oy)` or `translate(ox oy)`: the positional offset
//!   of a layer or image layer;
//! - `rotate(deg)`: the tilt of an ellipse.
//!
//! Transform lists are not composed.  Anything that does not match
//! resolves to zero.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Offset;

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static TRANSLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"translate\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)(?:\s*,\s*|\s+)([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)",
    )
    .expect("valid translate pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static ROTATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rotate\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)")
        .expect("valid rotate pattern")
});

/// Extract the offset of a `translate(ox, oy)` transform.
///
/// Returns `(0, 0)` when the text holds no two-argument translate.
///
/// # Examples
///
/// ```
/// use cartosvg_pipeline::{Offset, transform::parse_translate};
///
/// assert_eq!(parse_translate("translate(0,1052.36)"), Offset::new(0.0, 1052.36));
/// assert_eq!(parse_translate("scale(2)"), Offset::default());
/// ```
#[must_use]
pub fn parse_translate(text: &str) -> Offset {
    TRANSLATE
        .captures(text)
        .and_then(|caps| {
            let ox = caps.get(1)?.as_str().parse().ok()?;
            let oy = caps.get(2)?.as_str().parse().ok()?;
            Some(Offset::new(ox, oy))
        })
        .unwrap_or_default()
}

/// Extract the angle of a single-argument `rotate(deg)` transform.
///
/// Returns `0.0` when the text holds no such rotation.
#[must_use]
pub fn parse_rotate(text: &str) -> f64 {
    ROTATE
        .captures(text)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_with_comma() {
        assert_eq!(
            parse_translate("translate(-12.5,30)"),
            Offset::new(-12.5, 30.0)
        );
    }

    #[test]
    fn translate_with_space_and_padding() {
        assert_eq!(
            parse_translate("translate( 4 -7.25 )"),
            Offset::new(4.0, -7.25)
        );
    }

    #[test]
    fn translate_with_exponent() {
        assert_eq!(
            parse_translate("translate(1e2,-2.5E-1)"),
            Offset::new(100.0, -0.25)
        );
    }

    #[test]
    fn translate_inside_transform_list() {
        assert_eq!(
            parse_translate("scale(2) translate(3,4)"),
            Offset::new(3.0, 4.0)
        );
    }

    #[test]
    fn single_argument_translate_is_not_recognized() {
        assert_eq!(parse_translate("translate(5)"), Offset::default());
    }

    #[test]
    fn non_translate_resolves_to_zero() {
        assert_eq!(parse_translate(""), Offset::default());
        assert_eq!(
            parse_translate("matrix(1,0,0,1,5,5)"),
            Offset::default()
        );
        assert_eq!(parse_translate("rotate(30)"), Offset::default());
    }

    #[test]
    fn rotate_degrees() {
        assert!((parse_rotate("rotate(-30.5)") + 30.5).abs() < f64::EPSILON);
        assert!((parse_rotate("rotate( 45 )") - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rotate_with_center_is_not_recognized() {
        assert!(parse_rotate("rotate(45, 10, 10)").abs() < f64::EPSILON);
    }

    #[test]
    fn non_rotate_resolves_to_zero() {
        assert!(parse_rotate("").abs() < f64::EPSILON);
        assert!(parse_rotate("translate(1,2)").abs() < f64::EPSILON);
    }
}
