//! Transport categories and the request bitmask built from them.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown transport category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport type: {0}")]
pub struct UnknownTransportType(pub String);

/// A named category of service, each owning one bit of the board filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportType {
    /// ICE, TGV, Railjet
    HighSpeed,
    /// EuroCity, InterCity
    Intercity,
    InterRegio,
    /// RegioExpress and similar
    Regional,
    Ship,
    /// S-Bahn and night S-Bahn
    Suburban,
    Bus,
    /// Cable cars, funiculars, chair lifts
    Cableway,
    /// Car-carrying and other special trains
    Special,
    /// Tram and underground
    Tram,
}

impl TransportType {
    /// Every category, in bit order.
    pub const ALL: [TransportType; 10] = [
        TransportType::HighSpeed,
        TransportType::Intercity,
        TransportType::InterRegio,
        TransportType::Regional,
        TransportType::Ship,
        TransportType::Suburban,
        TransportType::Bus,
        TransportType::Cableway,
        TransportType::Special,
        TransportType::Tram,
    ];

    /// The single bit this category sets in a [`TransportMask`].
    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Category name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            TransportType::HighSpeed => "high_speed",
            TransportType::Intercity => "intercity",
            TransportType::InterRegio => "interregio",
            TransportType::Regional => "regional",
            TransportType::Ship => "ship",
            TransportType::Suburban => "suburban",
            TransportType::Bus => "bus",
            TransportType::Cableway => "cableway",
            TransportType::Special => "special",
            TransportType::Tram => "tram",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportType {
    type Err = UnknownTransportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTransportType(s.to_string()))
    }
}

/// Bitmask of transport categories passed to the board query.
///
/// The board layer only computes this value; filtering happens upstream.
///
/// # Examples
///
/// ```
/// use train_timetable::board::{TransportMask, TransportType};
///
/// let mask = TransportMask::from_filter(None, &[TransportType::Bus, TransportType::Ship]);
/// assert!(mask.contains(TransportType::Intercity));
/// assert!(!mask.contains(TransportType::Bus));
///
/// let trains_only = TransportMask::from_filter(
///     Some(&[TransportType::HighSpeed, TransportType::Intercity]),
///     &[],
/// );
/// assert_eq!(trains_only.to_string(), "1100000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportMask(u16);

impl TransportMask {
    /// Every category selected.
    pub const ALL: TransportMask = TransportMask((1 << TransportType::ALL.len()) - 1);

    /// No category selected.
    pub const NONE: TransportMask = TransportMask(0);

    /// Combine include and exclude lists with set-difference semantics.
    ///
    /// `include` of `None` means every category.
    pub fn from_filter(include: Option<&[TransportType]>, exclude: &[TransportType]) -> Self {
        let included = match include {
            Some(types) => types.iter().fold(0, |mask, t| mask | t.bit()),
            None => Self::ALL.0,
        };
        let excluded = exclude.iter().fold(0, |mask, t| mask | t.bit());
        TransportMask(included & !excluded)
    }

    /// Raw bit value.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether a category is selected.
    pub fn contains(self, transport: TransportType) -> bool {
        self.0 & transport.bit() != 0
    }

    /// Selected categories, in bit order.
    pub fn types(self) -> impl Iterator<Item = TransportType> {
        TransportType::ALL
            .into_iter()
            .filter(move |t| self.contains(*t))
    }
}

impl Default for TransportMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// One `0`/`1` character per category, in bit order.
impl fmt::Display for TransportMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in TransportType::ALL {
            f.write_str(if self.contains(t) { "1" } else { "0" })?;
        }
        Ok(())
    }
}
