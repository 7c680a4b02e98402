use super::attributes::{Color, Fill, Shape};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error for a card record that is neither fully resolved nor the unknown
/// sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartiallyUnknown(pub CardFeatures);

impl fmt::Display for PartiallyUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = &self.0;
        write!(
            f,
            "card at {} is partially unknown (count {}, {} {} {})",
            card.bbox, card.count, card.color, card.fill, card.shape
        )
    }
}

impl std::error::Error for PartiallyUnknown {}

/// The four SET attributes resolved for one card, plus where it sits.
///
/// A card is either fully resolved or the [`CardFeatures::unknown`]
/// sentinel; deserialization rejects anything in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct CardFeatures {
    /// Number of symbols; 0 when no shape survived filtering
    pub count: u8,
    pub color: Color,
    pub fill: Fill,
    pub shape: Shape,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Wire form of a card, validated into [`CardFeatures`]
#[derive(Deserialize)]
struct CardRecord {
    count: u8,
    color: Color,
    fill: Fill,
    shape: Shape,
    #[serde(rename = "box")]
    bbox: BoundingBox,
}

impl TryFrom<CardRecord> for CardFeatures {
    type Error = PartiallyUnknown;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        CardFeatures::new(record.count, record.color, record.fill, record.shape, record.bbox).validated()
    }
}

impl CardFeatures {
    /// Resolved card; see [`Self::validated`] for records of uncertain origin
    pub fn new(count: u8, color: Color, fill: Fill, shape: Shape, bbox: BoundingBox) -> Self {
        Self {
            count,
            color,
            fill,
            shape,
            bbox,
        }
    }

    /// Sentinel record for a card on which no shape could be resolved.
    ///
    /// All attributes are unknown together; such a card never joins a SET.
    pub fn unknown(bbox: BoundingBox) -> Self {
        Self {
            count: 0,
            color: Color::Unknown,
            fill: Fill::Unknown,
            shape: Shape::Unknown,
            bbox,
        }
    }

    /// True when any attribute carries the unknown sentinel
    pub fn is_unknown(&self) -> bool {
        self.count == 0
            || self.color.is_unknown()
            || self.fill.is_unknown()
            || self.shape.is_unknown()
    }

    /// True when every attribute is unknown and the count is zero
    pub fn is_sentinel(&self) -> bool {
        self.count == 0
            && self.color.is_unknown()
            && self.fill.is_unknown()
            && self.shape.is_unknown()
    }

    /// The card itself when it is fully resolved or the sentinel
    pub fn validated(self) -> Result<Self, PartiallyUnknown> {
        if self.is_unknown() && !self.is_sentinel() {
            return Err(PartiallyUnknown(self));
        }
        Ok(self)
    }

    /// Same attributes, different location
    pub fn with_bbox(self, bbox: BoundingBox) -> Self {
        Self { bbox, ..self }
    }
}

impl fmt::Display for CardFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.count, self.color, self.fill, self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_card_is_fully_unknown() {
        let card = CardFeatures::unknown(BoundingBox::new(0, 0, 10, 20));
        assert!(card.is_unknown());
        assert_eq!(card.count, 0);
        assert_eq!(card.color, Color::Unknown);
        assert_eq!(card.fill, Fill::Unknown);
        assert_eq!(card.shape, Shape::Unknown);
    }

    #[test]
    fn test_display_and_json_shape() {
        let card = CardFeatures::new(
            2,
            Color::Green,
            Fill::Striped,
            Shape::Squiggle,
            BoundingBox::new(1, 2, 3, 4),
        );
        assert_eq!(card.to_string(), "2 green striped squiggle");
        assert!(!card.is_unknown());

        let json = serde_json::to_value(card).unwrap();
        assert_eq!(json["box"]["x2"], 3);
        assert_eq!(json["fill"], "striped");

        let back: CardFeatures = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_partially_unknown_cards_are_rejected() {
        let bbox = BoundingBox::new(0, 0, 10, 20);
        let mixed = CardFeatures::new(2, Color::Unknown, Fill::Full, Shape::Oval, bbox);
        assert_eq!(mixed.validated(), Err(PartiallyUnknown(mixed)));

        let no_symbols = CardFeatures::new(0, Color::Red, Fill::Full, Shape::Oval, bbox);
        assert!(no_symbols.validated().is_err());

        let sentinel = CardFeatures::unknown(bbox);
        assert_eq!(sentinel.validated(), Ok(sentinel));

        let json = r#"{"count": 2, "color": "unknown", "fill": "full", "shape": "oval",
                       "box": {"x1": 0, "y1": 0, "x2": 10, "y2": 20}}"#;
        let err = serde_json::from_str::<CardFeatures>(json).unwrap_err();
        assert!(err.to_string().contains("partially unknown"));

        let json = r#"{"count": 0, "color": "unknown", "fill": "unknown", "shape": "unknown",
                       "box": {"x1": 0, "y1": 0, "x2": 10, "y2": 20}}"#;
        assert_eq!(serde_json::from_str::<CardFeatures>(json).unwrap(), sentinel);
    }
}
