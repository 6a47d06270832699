//! Departure board query configuration.

use super::{TransportMask, TransportType};

/// Which hourly windows to fetch and which transport categories to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Hourly windows to fetch, in the order their rows are returned.
    /// Each must be 0-23.
    pub hours: Vec<u8>,

    /// Categories passed to the source with every window.
    pub transport: TransportMask,
}

impl BoardConfig {
    /// All 24 hourly windows, every transport category.
    pub fn new() -> Self {
        Self {
            hours: (0..24).collect(),
            transport: TransportMask::ALL,
        }
    }

    /// Fetch only these windows.
    pub fn with_hours(mut self, hours: impl IntoIterator<Item = u8>) -> Self {
        self.hours = hours.into_iter().collect();
        self
    }

    /// Restrict categories with include and exclude lists.
    ///
    /// See [`TransportMask::from_filter`].
    pub fn with_transport(mut self, include: Option<&[TransportType]>, exclude: &[TransportType]) -> Self {
        self.transport = TransportMask::from_filter(include, exclude);
        self
    }

    pub fn with_transport_mask(mut self, transport: TransportMask) -> Self {
        self.transport = transport;
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new()
    }
}
