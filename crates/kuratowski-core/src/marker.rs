use crate::error::{Error, Result};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

pub const MARKER_COUNT: usize = 4;

/// One of the four markers on the circle. `Black` is the reference every delta
/// is measured from; the others are comparison markers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[strum(to_string = "black", serialize = "b", serialize = "0")]
    Black,
    #[strum(to_string = "green", serialize = "g", serialize = "1")]
    Green,
    #[strum(to_string = "blue", serialize = "u", serialize = "2")]
    Blue,
    #[strum(to_string = "purple", serialize = "p", serialize = "3")]
    Purple,
}

impl Marker {
    pub const REFERENCE: Marker = Marker::Black;
    pub const COMPARISONS: [Marker; 3] = [Marker::Green, Marker::Blue, Marker::Purple];
    pub const ALL: [Marker; MARKER_COUNT] =
        [Marker::Black, Marker::Green, Marker::Blue, Marker::Purple];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Result<Self> {
        (idx < MARKER_COUNT)
            .then(|| Self::iter().nth(idx))
            .flatten()
            .ok_or(Error::InvalidIndex(idx))
    }

    pub fn is_reference(self) -> bool {
        self == Self::REFERENCE
    }

    /// Position of a comparison marker within a delta triple.
    pub fn delta_slot(self) -> Option<usize> {
        self.index().checked_sub(1)
    }

    /// Starting angle of the original slider layout: a quarter turn per index.
    pub fn default_angle(self) -> f64 {
        self.index() as f64 * std::f64::consts::FRAC_PI_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_deserialization() {
        let cases = vec![
            ("\"black\"", Marker::Black),
            ("\"Black\"", Marker::Black),
            ("\"BLACK\"", Marker::Black),
            ("\"b\"", Marker::Black),
            ("\"0\"", Marker::Black),
            ("\"green\"", Marker::Green),
            ("\"u\"", Marker::Blue),
            ("\"Purple\"", Marker::Purple),
            ("\"3\"", Marker::Purple),
        ];

        for (json, expected) in cases {
            let deserialized: Marker = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_marker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Marker::Purple).unwrap(), "\"purple\"");
        assert_eq!(Marker::Green.to_string(), "green");
    }

    #[test]
    fn test_from_index() {
        for marker in Marker::iter() {
            assert_eq!(Marker::from_index(marker.index()), Ok(marker));
        }
        assert_eq!(Marker::from_index(4), Err(Error::InvalidIndex(4)));
        assert_eq!(Marker::from_index(usize::MAX), Err(Error::InvalidIndex(usize::MAX)));
    }

    #[test]
    fn test_all_is_in_index_order() {
        for (idx, marker) in Marker::ALL.iter().enumerate() {
            assert_eq!(marker.index(), idx);
        }
        assert_eq!(Marker::ALL.to_vec(), Marker::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_delta_slots() {
        assert_eq!(Marker::Black.delta_slot(), None);
        let slots: Vec<_> = Marker::COMPARISONS
            .iter()
            .filter_map(|m| m.delta_slot())
            .collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }
}
