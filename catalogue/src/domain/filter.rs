//! Product search filter and its selection types.
//!
//! Every criterion is optional. The UI layer may hand selections over as
//! typed values or as the labels it displays; the `FromStr` impls accept the
//! labels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::records::{CategoryId, ManufacturerId, ModelId};

/// Errors raised when parsing a filter selection label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    /// The period label does not start with a whole number of hours.
    #[error("invalid period '{label}': expected a leading hour count")]
    InvalidPeriod {
        /// Label as received.
        label: String,
    },
    /// The bargain label names neither a sale nor a rent listing.
    #[error("invalid bargain type '{label}'")]
    InvalidBargain {
        /// Label as received.
        label: String,
    },
    /// The rent type label is not a known rent sub-type.
    #[error("invalid rent type '{label}'")]
    InvalidRentType {
        /// Label as received.
        label: String,
    },
}

/// Listing age window, measured in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(u32);

impl Period {
    /// Listings from the last hour.
    pub const LAST_HOUR: Self = Self(1);
    /// Listings from the last two hours.
    pub const LAST_TWO_HOURS: Self = Self(2);
    /// Listings from the last three hours.
    pub const LAST_THREE_HOURS: Self = Self(3);
    /// Listings from the last day.
    pub const LAST_DAY: Self = Self(24);
    /// Listings from the last two days.
    pub const LAST_TWO_DAYS: Self = Self(48);
    /// Listings from the last three days.
    pub const LAST_THREE_DAYS: Self = Self(72);
    /// Listings from the last week.
    pub const LAST_WEEK: Self = Self(168);

    /// Build a window of `hours` hours.
    #[must_use]
    pub const fn hours(hours: u32) -> Self {
        Self(hours)
    }

    /// Window length in hours.
    #[must_use]
    pub const fn as_hours(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 hour")
        } else {
            write!(f, "{} hours", self.0)
        }
    }
}

impl FromStr for Period {
    type Err = FilterParseError;

    /// Parse labels such as `"24 hours"`; only the leading number is read.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        label
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| FilterParseError::InvalidPeriod {
                label: label.to_owned(),
            })
    }
}

/// Whether a search targets listings for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BargainType {
    /// Vehicles offered for sale.
    ForSale,
    /// Vehicles offered for rent.
    ForRent,
}

impl BargainType {
    /// Whether this is a sale listing.
    #[must_use]
    pub const fn is_sale(self) -> bool {
        matches!(self, Self::ForSale)
    }
}

impl fmt::Display for BargainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForSale => f.write_str("for sale"),
            Self::ForRent => f.write_str("for rent"),
        }
    }
}

impl FromStr for BargainType {
    type Err = FilterParseError;

    /// Labels ending in "sale" are sale listings, labels ending in "rent"
    /// are rent listings.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalised = label.trim().to_ascii_lowercase();
        if normalised.ends_with("sale") {
            Ok(Self::ForSale)
        } else if normalised.ends_with("rent") {
            Ok(Self::ForRent)
        } else {
            Err(FilterParseError::InvalidBargain {
                label: label.to_owned(),
            })
        }
    }
}

/// Rent listing sub-types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RentType {
    /// Daily rent.
    Daily,
    /// Rent with a driver.
    Driver,
    /// Rent with the option to buy.
    Purchase,
    /// Insured rent.
    Insured,
}

impl RentType {
    /// Every rent sub-type, in declaration order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Driver, Self::Purchase, Self::Insured];

    /// Name used in the `Rent<Name>` query parameter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Driver => "Driver",
            Self::Purchase => "Purchase",
            Self::Insured => "Insured",
        }
    }
}

impl fmt::Display for RentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RentType {
    type Err = FilterParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|rent_type| rent_type.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FilterParseError::InvalidRentType {
                label: label.to_owned(),
            })
    }
}

/// Search criteria for a product listing request.
///
/// # Examples
///
/// ```
/// use catalogue::domain::{ManufacturerId, ProductFilter};
///
/// let filter = ProductFilter {
///     manufacturers: vec![ManufacturerId::new(10)],
///     page: Some(2),
///     ..ProductFilter::default()
/// };
/// assert_eq!(filter.page(), 2);
/// assert_eq!(ProductFilter::default().page(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Manufacturers to include.
    pub manufacturers: Vec<ManufacturerId>,
    /// Models to include; each must belong to a requested manufacturer.
    pub models: Vec<ModelId>,
    /// Categories to include.
    pub categories: Vec<CategoryId>,
    /// Lower price bound.
    pub price_from: Option<u64>,
    /// Upper price bound.
    pub price_to: Option<u64>,
    /// Currency the price bounds are expressed in.
    pub currency_id: Option<u32>,
    /// Listing age window.
    pub period: Option<Period>,
    /// Sale or rent listings.
    pub bargain: Option<BargainType>,
    /// Rent sub-types to include.
    pub rent_types: Vec<RentType>,
    /// Service-defined sort code.
    pub sort_order: Option<u32>,
    /// Requested page, starting at 1.
    pub page: Option<u32>,
}

impl ProductFilter {
    /// Requested page, defaulting to the first.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}
