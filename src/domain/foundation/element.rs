//! Five elements, polarity, and the roles an element plays for a Day Master.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// All elements in generating order.
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

impl Element {
    /// Zero-based index in generating order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Element at an index, wrapping modulo 5.
    pub const fn from_index(index: usize) -> Self {
        ALL_ELEMENTS[index % 5]
    }

    /// The element this one produces (Wood → Fire → Earth → Metal → Water → Wood).
    pub const fn generates(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The element that produces this one.
    pub const fn generated_by(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// The element this one controls (Wood → Earth → Water → Fire → Metal → Wood).
    pub const fn controls(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The element that controls this one.
    pub const fn controlled_by(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Role of `other` as seen from `self` taken as the Day Master element.
    pub const fn role_of(self, other: Element) -> ElementRole {
        match (other.index() + 5 - self.index()) % 5 {
            0 => ElementRole::Companion,
            1 => ElementRole::Output,
            2 => ElementRole::Wealth,
            3 => ElementRole::Officer,
            _ => ElementRole::Resource,
        }
    }

    /// Element that plays `role` for `self` as Day Master.
    pub const fn with_role(self, role: ElementRole) -> Element {
        let offset = match role {
            ElementRole::Companion => 0,
            ElementRole::Output => 1,
            ElementRole::Wealth => 2,
            ElementRole::Officer => 3,
            ElementRole::Resource => 4,
        };
        Self::from_index(self.index() + offset)
    }

    /// Lowercase key used in factor strings.
    pub fn as_key(&self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }

    /// Hanja display glyph.
    pub fn hanja(&self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// Yin/yang polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    /// Polarity of an index in a cycle: even is yang.
    pub const fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

/// The relation an element has to the Day Master element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    /// Same element (peers).
    Companion,
    /// Produced by the Day Master.
    Output,
    /// Controlled by the Day Master.
    Wealth,
    /// Controls the Day Master.
    Officer,
    /// Produces the Day Master.
    Resource,
}

impl ElementRole {
    pub fn as_key(&self) -> &'static str {
        match self {
            ElementRole::Companion => "companion",
            ElementRole::Output => "output",
            ElementRole::Wealth => "wealth",
            ElementRole::Officer => "officer",
            ElementRole::Resource => "resource",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generating_cycle_closes() {
        let mut e = Element::Wood;
        for _ in 0..5 {
            e = e.generates();
        }
        assert_eq!(e, Element::Wood);
        assert_eq!(Element::Metal.generates(), Element::Water);
        assert_eq!(Element::Wood.generated_by(), Element::Water);
    }

    #[test]
    fn controlling_cycle_matches_tradition() {
        assert_eq!(Element::Wood.controls(), Element::Earth);
        assert_eq!(Element::Earth.controls(), Element::Water);
        assert_eq!(Element::Water.controls(), Element::Fire);
        assert_eq!(Element::Fire.controls(), Element::Metal);
        assert_eq!(Element::Metal.controls(), Element::Wood);
        assert_eq!(Element::Wood.controlled_by(), Element::Metal);
    }

    #[test]
    fn roles_relative_to_day_master() {
        let dm = Element::Wood;
        assert_eq!(dm.role_of(Element::Wood), ElementRole::Companion);
        assert_eq!(dm.role_of(Element::Fire), ElementRole::Output);
        assert_eq!(dm.role_of(Element::Earth), ElementRole::Wealth);
        assert_eq!(dm.role_of(Element::Metal), ElementRole::Officer);
        assert_eq!(dm.role_of(Element::Water), ElementRole::Resource);
    }

    #[test]
    fn with_role_inverts_role_of() {
        for dm in ALL_ELEMENTS {
            for other in ALL_ELEMENTS {
                assert_eq!(dm.with_role(dm.role_of(other)), other);
            }
        }
    }

    #[test]
    fn polarity_from_index_alternates() {
        assert_eq!(Polarity::from_index(0), Polarity::Yang);
        assert_eq!(Polarity::from_index(1), Polarity::Yin);
        assert_eq!(Polarity::from_index(10), Polarity::Yang);
    }
}
