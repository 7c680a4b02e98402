//! The symbolic attributes printed on a SET card
//!
//! Every attribute carries an `Unknown` sentinel used when no shape on a card
//! could be resolved. Labels serialize lowercase, matching the model outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a label does not name any attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized attribute label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

/// Symbol color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Purple,
    Unknown,
}

/// Symbol shading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Empty,
    Full,
    Striped,
    Unknown,
}

/// Symbol outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Diamond,
    Oval,
    Squiggle,
    Unknown,
}

impl Color {
    /// The three playable colors
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Purple];

    pub fn label(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Color::Unknown)
    }
}

impl Fill {
    /// Class order of the fill classifier output vector
    pub const CLASSES: [Fill; 3] = [Fill::Empty, Fill::Full, Fill::Striped];

    /// Map an arg-max index of the fill classifier to its label
    pub fn from_class_index(index: usize) -> Option<Fill> {
        Self::CLASSES.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Fill::Empty => "empty",
            Fill::Full => "full",
            Fill::Striped => "striped",
            Fill::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Fill::Unknown)
    }
}

impl Shape {
    /// Class order of the shape classifier output vector
    pub const CLASSES: [Shape; 3] = [Shape::Diamond, Shape::Oval, Shape::Squiggle];

    /// Map an arg-max index of the shape classifier to its label
    pub fn from_class_index(index: usize) -> Option<Shape> {
        Self::CLASSES.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Diamond => "diamond",
            Shape::Oval => "oval",
            Shape::Squiggle => "squiggle",
            Shape::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Shape::Unknown)
    }
}

macro_rules! label_traits {
    ($ty:ident { $($label:literal => $variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok($ty::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }
    };
}

label_traits!(Color { "red" => Red, "green" => Green, "purple" => Purple, "unknown" => Unknown });
label_traits!(Fill { "empty" => Empty, "full" => Full, "striped" => Striped, "unknown" => Unknown });
label_traits!(Shape { "diamond" => Diamond, "oval" => Oval, "squiggle" => Squiggle, "unknown" => Unknown });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_order() {
        assert_eq!(Fill::from_class_index(0), Some(Fill::Empty));
        assert_eq!(Fill::from_class_index(2), Some(Fill::Striped));
        assert_eq!(Shape::from_class_index(1), Some(Shape::Oval));
        assert_eq!(Shape::from_class_index(3), None);
    }

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("Purple".parse::<Color>(), Ok(Color::Purple));
        assert_eq!(" squiggle ".parse::<Shape>(), Ok(Shape::Squiggle));
        assert!("solid".parse::<Fill>().is_err());
        assert_eq!(Fill::Striped.to_string(), "striped");
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Color::Green).unwrap();
        assert_eq!(json, "\"green\"");
        let shape: Shape = serde_json::from_str("\"diamond\"").unwrap();
        assert_eq!(shape, Shape::Diamond);
    }
}
