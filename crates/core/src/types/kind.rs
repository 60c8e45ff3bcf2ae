//! Product kinds sold by the storefront.
//!
//! A cart item is exactly one of a song, an album, or a merchandising
//! article. The shop service identifies the kind on the wire with a
//! positional numeric code (`0` = song, `1` = album, `2` = merch); that
//! encoding is part of the backend contract and must not change.

use serde::{Deserialize, Serialize};

/// The mutually exclusive kind tag of a cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Song,
    Album,
    Merch,
}

impl ProductKind {
    /// Numeric wire code used by the shop service (`DELETE /cart/{id}?type=`).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Song => 0,
            Self::Album => 1,
            Self::Merch => 2,
        }
    }

    /// Parse a numeric wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Song),
            1 => Some(Self::Album),
            2 => Some(Self::Merch),
            _ => None,
        }
    }

    /// Localized label shown on the cart page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Song => "Canción",
            Self::Album => "Álbum",
            Self::Merch => "Merchandising",
        }
    }

    /// Placeholder cover asset used when an item has no cover of its own.
    #[must_use]
    pub const fn default_cover(self) -> &'static str {
        match self {
            Self::Song => "/static/img/utils/default-song.svg",
            Self::Album => "/static/img/utils/default-album.svg",
            Self::Merch => "/static/img/utils/default-merch.svg",
        }
    }
}
