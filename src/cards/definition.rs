//! Card definitions - static card data.
//!
//! A `Card` holds the immutable properties of a card as supplied by the
//! collection store: four directional strengths, an optional element and a
//! rarity tier. Placement-specific data (owners, board position) lives in
//! `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::board::Direction;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Ashen Knight"), not a copy
/// of it in a hand or on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Elemental affinity of a card or a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Wind,
    Holy,
    Dark,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Wind,
        Element::Holy,
        Element::Dark,
    ];
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Wind => "wind",
            Element::Holy => "holy",
            Element::Dark => "dark",
        };
        f.write_str(name)
    }
}

/// Rarity tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Multiplier applied to the stat total when deriving a power rating.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

/// The four directional strengths of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardValues {
    pub top: u8,
    pub right: u8,
    pub bottom: u8,
    pub left: u8,
}

impl CardValues {
    /// Create values in top, right, bottom, left order.
    #[must_use]
    pub const fn new(top: u8, right: u8, bottom: u8, left: u8) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same value on every side.
    #[must_use]
    pub const fn uniform(value: u8) -> Self {
        Self::new(value, value, value, value)
    }

    /// The value on the side that faces `direction`.
    ///
    /// ```
    /// use grid_duel::board::Direction;
    /// use grid_duel::cards::CardValues;
    ///
    /// let values = CardValues::new(5, 1, 3, 2);
    /// assert_eq!(values.facing(Direction::North), 5);
    /// assert_eq!(values.facing(Direction::South), 3);
    /// ```
    #[must_use]
    pub const fn facing(&self, direction: Direction) -> u8 {
        match direction {
            Direction::North => self.top,
            Direction::East => self.right,
            Direction::South => self.bottom,
            Direction::West => self.left,
        }
    }

    /// Sum of all four sides.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.top) + u32::from(self.right) + u32::from(self.bottom) + u32::from(self.left)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use grid_duel::cards::{Card, CardId, CardValues, Element, Rarity};
///
/// let knight = Card::new(CardId::new(1), "Ashen Knight", CardValues::new(5, 3, 2, 4))
///     .with_element(Element::Dark)
///     .with_rarity(Rarity::Rare);
///
/// // (5 + 3 + 2 + 4) * 2
/// assert_eq!(knight.power_rating(), 28);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Directional strengths.
    pub values: CardValues,

    /// Elemental affinity, if any.
    pub element: Option<Element>,

    /// Rarity tier.
    pub rarity: Rarity,

    /// Rating supplied by the collection store. Overrides the derived one.
    power_override: Option<u32>,
}

impl Card {
    /// Create a common, element-less card.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, values: CardValues) -> Self {
        Self {
            id,
            name: name.into(),
            values,
            element: None,
            rarity: Rarity::Common,
            power_override: None,
        }
    }

    /// Set the element (builder pattern).
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Use an explicit power rating instead of the derived one.
    #[must_use]
    pub fn with_power_rating(mut self, rating: u32) -> Self {
        self.power_override = Some(rating);
        self
    }

    /// Power rating used by deck legality checks.
    ///
    /// Stat total times the rarity weight unless the record carried
    /// its own rating.
    #[must_use]
    pub fn power_rating(&self) -> u32 {
        self.power_override
            .unwrap_or_else(|| self.values.total() * self.rarity.weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_card_values_facing() {
        let values = CardValues::new(1, 2, 3, 4);
        assert_eq!(values.facing(Direction::North), 1);
        assert_eq!(values.facing(Direction::East), 2);
        assert_eq!(values.facing(Direction::South), 3);
        assert_eq!(values.facing(Direction::West), 4);
        assert_eq!(values.total(), 10);
    }

    #[test]
    fn test_card_builder() {
        let card = Card::new(CardId::new(3), "Ember Wisp", CardValues::uniform(2))
            .with_element(Element::Fire)
            .with_rarity(Rarity::Epic);

        assert_eq!(card.name, "Ember Wisp");
        assert_eq!(card.element, Some(Element::Fire));
        assert_eq!(card.rarity, Rarity::Epic);
        assert_eq!(card.power_rating(), 8 * 3);
    }

    #[test]
    fn test_power_rating_override() {
        let card = Card::new(CardId::new(1), "Relic", CardValues::uniform(9)).with_power_rating(150);
        assert_eq!(card.power_rating(), 150);
    }

    #[test]
    fn test_element_serde_names() {
        let json = serde_json::to_string(&Element::Holy).unwrap();
        assert_eq!(json, "\"holy\"");
        let rarity: Rarity = serde_json::from_str("\"legendary\"").unwrap();
        assert_eq!(rarity, Rarity::Legendary);
        assert_eq!(format!("{}", Element::Wind), "wind");
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::new(CardId::new(1), "Test", CardValues::new(1, 2, 3, 4))
            .with_element(Element::Water)
            .with_power_rating(12);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
        assert_eq!(deserialized.power_rating(), 12);
    }
}
