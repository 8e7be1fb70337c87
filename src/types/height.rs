//! Height values accepted by `set_height` / `set_max_height`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured table height: bare pixels or any CSS length (`50%`, `calc(...)`, `20em`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeightValue {
    Pixels(f64),
    Css(String),
}

impl HeightValue {
    /// Pixel value, if this height is expressed in pixels
    pub fn as_pixels(&self) -> Option<f64> {
        match self {
            Self::Pixels(px) => Some(*px),
            Self::Css(_) => None,
        }
    }

    /// Value written to the element's style property
    pub fn to_css(&self) -> String {
        match self {
            Self::Pixels(px) => format!("{px}px"),
            Self::Css(s) => s.clone(),
        }
    }
}

impl From<f64> for HeightValue {
    fn from(px: f64) -> Self {
        Self::Pixels(px)
    }
}

impl From<&str> for HeightValue {
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for HeightValue {
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

/// Style property a height is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightProperty {
    #[default]
    Height,
    MaxHeight,
}

impl HeightProperty {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::MaxHeight => "max-height",
        }
    }
}

impl fmt::Display for HeightProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Normalize a height.
///
/// Plain integer strings with an optional `px` suffix become pixels, other
/// non-empty strings pass through as CSS, and an empty string is no height.
pub fn parse_height(value: &HeightValue) -> Option<HeightValue> {
    match value {
        HeightValue::Pixels(px) => Some(HeightValue::Pixels(*px)),
        HeightValue::Css(s) => {
            if s.is_empty() {
                return None;
            }
            let digits = s.strip_suffix("px").unwrap_or(s);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(px) = digits.parse::<f64>() {
                    return Some(HeightValue::Pixels(px));
                }
            }
            Some(HeightValue::Css(s.clone()))
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(HeightValue::Pixels(300.0), Some(HeightValue::Pixels(300.0)); "number")]
    #[test_case("250".into(), Some(HeightValue::Pixels(250.0)); "bare digits")]
    #[test_case("250px".into(), Some(HeightValue::Pixels(250.0)); "px suffix")]
    #[test_case("50%".into(), Some(HeightValue::Css("50%".into())); "percentage")]
    #[test_case("calc(100vh - 20px)".into(), Some(HeightValue::Css("calc(100vh - 20px)".into())); "calc")]
    #[test_case("px".into(), Some(HeightValue::Css("px".into())); "suffix only")]
    #[test_case("".into(), None; "empty")]
    fn test_parse_height(input: HeightValue, expected: Option<HeightValue>) {
        assert_eq!(parse_height(&input), expected);
    }

    #[test]
    fn test_to_css() {
        assert_eq!(HeightValue::Pixels(120.0).to_css(), "120px");
        assert_eq!(HeightValue::Css("40vh".into()).to_css(), "40vh");
        assert_eq!(HeightProperty::MaxHeight.to_string(), "max-height");
    }

    #[test]
    fn test_deserialize_untagged() {
        let px: HeightValue = serde_json::from_str("200").unwrap();
        assert_eq!(px, HeightValue::Pixels(200.0));
        let css: HeightValue = serde_json::from_str("\"60%\"").unwrap();
        assert_eq!(css, HeightValue::Css("60%".into()));
    }
}
