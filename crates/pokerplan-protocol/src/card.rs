//! The estimation card deck.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A planning-poker card.
///
/// The deck is fixed: the numbers 1, 2, 3, 5, 8, 13, 21 plus the
/// "don't know" card. On the wire a numbered card is a JSON number and
/// [`CardValue::Unknown`] is the string `"?"`, matching the deck the
/// client renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardValue {
    One,
    Two,
    Three,
    Five,
    Eight,
    Thirteen,
    TwentyOne,
    Unknown,
}

impl CardValue {
    /// Every card in the deck, in display order.
    pub const ALL: [CardValue; 8] = [
        CardValue::One,
        CardValue::Two,
        CardValue::Three,
        CardValue::Five,
        CardValue::Eight,
        CardValue::Thirteen,
        CardValue::TwentyOne,
        CardValue::Unknown,
    ];

    /// The numeric value of the card, or `None` for [`CardValue::Unknown`].
    pub fn points(self) -> Option<u8> {
        match self {
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Five => Some(5),
            Self::Eight => Some(8),
            Self::Thirteen => Some(13),
            Self::TwentyOne => Some(21),
            Self::Unknown => None,
        }
    }

    /// Looks up the card for a numeric value.
    pub fn from_points(points: u64) -> Option<Self> {
        match points {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            5 => Some(Self::Five),
            8 => Some(Self::Eight),
            13 => Some(Self::Thirteen),
            21 => Some(Self::TwentyOne),
            _ => None,
        }
    }
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.points() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "?"),
        }
    }
}

impl Serialize for CardValue {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self.points() {
            Some(n) => serializer.serialize_u8(n),
            None => serializer.serialize_str("?"),
        }
    }
}

impl<'de> Deserialize<'de> for CardValue {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct CardVisitor;

        impl Visitor<'_> for CardVisitor {
            type Value = CardValue;

            fn expecting(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                write!(f, "one of 1, 2, 3, 5, 8, 13, 21 or \"?\"")
            }

            fn visit_u64<E: de::Error>(
                self,
                value: u64,
            ) -> Result<CardValue, E> {
                CardValue::from_points(value).ok_or_else(|| {
                    E::custom(format!("{value} is not in the deck"))
                })
            }

            fn visit_i64<E: de::Error>(
                self,
                value: i64,
            ) -> Result<CardValue, E> {
                u64::try_from(value)
                    .ok()
                    .and_then(CardValue::from_points)
                    .ok_or_else(|| {
                        E::custom(format!("{value} is not in the deck"))
                    })
            }

            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<CardValue, E> {
                if value == "?" {
                    Ok(CardValue::Unknown)
                } else {
                    Err(E::custom(format!(
                        "{value:?} is not in the deck"
                    )))
                }
            }
        }

        deserializer.deserialize_any(CardVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_card_serializes_as_number() {
        let json = serde_json::to_string(&CardValue::Five).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_unknown_serializes_as_question_mark() {
        let json = serde_json::to_string(&CardValue::Unknown).unwrap();
        assert_eq!(json, "\"?\"");
    }

    #[test]
    fn test_deserialize_number() {
        let card: CardValue = serde_json::from_str("13").unwrap();
        assert_eq!(card, CardValue::Thirteen);
    }

    #[test]
    fn test_deserialize_question_mark() {
        let card: CardValue = serde_json::from_str("\"?\"").unwrap();
        assert_eq!(card, CardValue::Unknown);
    }

    #[test]
    fn test_deserialize_value_outside_deck_fails() {
        assert!(serde_json::from_str::<CardValue>("4").is_err());
        assert!(serde_json::from_str::<CardValue>("-1").is_err());
        assert!(serde_json::from_str::<CardValue>("\"8\"").is_err());
    }

    #[test]
    fn test_round_trip_whole_deck() {
        for card in CardValue::ALL {
            let json = serde_json::to_string(&card).unwrap();
            let back: CardValue = serde_json::from_str(&json).unwrap();
            assert_eq!(card, back);
        }
    }

    #[test]
    fn test_points_matches_from_points() {
        for card in CardValue::ALL {
            if let Some(n) = card.points() {
                assert_eq!(CardValue::from_points(n as u64), Some(card));
            }
        }
        assert_eq!(CardValue::Unknown.points(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CardValue::TwentyOne.to_string(), "21");
        assert_eq!(CardValue::Unknown.to_string(), "?");
    }
}
