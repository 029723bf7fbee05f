//! Two-asset commit barrier
//!
//! A tag update consists of two images, price and description, arriving as
//! independent messages in either order. The panel is only refreshed once
//! both have been drawn; drawing one and refreshing immediately would show a
//! half-updated label.

use crate::layout::{Rect, DESC_RECT, PRICE_RECT};

/// The two image assets that make up one tag update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Asset {
    Price,
    Description,
}

impl Asset {
    /// Route a message topic to an asset
    ///
    /// Matched by substring, so both `esl/price` and `tag42/price/update`
    /// route the same way. Price is checked first.
    pub fn from_topic(topic: &str) -> Option<Self> {
        if topic.contains("price") {
            Some(Asset::Price)
        } else if topic.contains("description") {
            Some(Asset::Description)
        } else {
            None
        }
    }

    /// Fixed placement of this asset on the canvas
    pub const fn rect(self) -> Rect {
        match self {
            Asset::Price => PRICE_RECT,
            Asset::Description => DESC_RECT,
        }
    }
}

/// Tracks which assets of the current update have been drawn
#[derive(Debug, Default)]
pub struct CommitBarrier {
    price: bool,
    description: bool,
}

impl CommitBarrier {
    pub const fn new() -> Self {
        Self {
            price: false,
            description: false,
        }
    }

    /// Record an asset as drawn; returns true when both are now ready
    ///
    /// Marking an already-ready asset is idempotent - a re-sent price image
    /// alone never triggers a refresh.
    pub fn mark_ready(&mut self, asset: Asset) -> bool {
        match asset {
            Asset::Price => self.price = true,
            Asset::Description => self.description = true,
        }
        self.price && self.description
    }

    /// Whether both assets are ready
    pub fn is_complete(&self) -> bool {
        self.price && self.description
    }

    /// Forget both assets, starting a new update cycle
    pub fn reset(&mut self) {
        self.price = false;
        self.description = false;
    }
}
