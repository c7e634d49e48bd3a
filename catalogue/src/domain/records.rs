//! Catalogue records and identifiers.
//!
//! Reference records (categories, manufacturers, models) are immutable once
//! fetched. Products are an opaque listing payload that the catalogue passes
//! through to the sink untouched.

use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

macro_rules! catalogue_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the raw identifier.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalogue_id! {
    /// Identifier of a vehicle category.
    CategoryId
}

catalogue_id! {
    /// Identifier of a manufacturer.
    ManufacturerId
}

catalogue_id! {
    /// Identifier of a model.
    ModelId
}

/// Coarse vehicle grouping shared by manufacturers and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VehicleClass {
    /// Passenger cars.
    Car,
    /// Special equipment: trucks, tractors, buses and the like.
    Special,
    /// Motorbikes and scooters.
    Motorbike,
}

impl VehicleClass {
    /// Category type code the service uses for this class.
    #[must_use]
    pub const fn category_type(self) -> CategoryType {
        match self {
            Self::Car => CategoryType(0),
            Self::Special => CategoryType(1),
            Self::Motorbike => CategoryType(2),
        }
    }
}

/// Numeric category classification as reported by the service.
///
/// Codes `0`, `1` and `2` correspond to [`VehicleClass`]; any other code is a
/// finer subtype the catalogue stores without interpreting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CategoryType(pub u32);

impl CategoryType {
    /// Return the vehicle class for the three top-level codes.
    #[must_use]
    pub const fn vehicle_class(self) -> Option<VehicleClass> {
        match self.0 {
            0 => Some(VehicleClass::Car),
            1 => Some(VehicleClass::Special),
            2 => Some(VehicleClass::Motorbike),
            _ => None,
        }
    }
}

impl From<VehicleClass> for CategoryType {
    fn from(class: VehicleClass) -> Self {
        class.category_type()
    }
}

/// A vehicle category such as "Sedan" or "Tractor".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category identity.
    pub id: CategoryId,
    /// Classification code.
    pub category_type: CategoryType,
    /// Display title.
    pub title: String,
}

/// A vehicle manufacturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    /// Manufacturer identity.
    pub id: ManufacturerId,
    /// Display name.
    pub name: String,
    /// Produces passenger cars.
    pub is_car: bool,
    /// Produces special equipment.
    pub is_spec: bool,
    /// Produces motorbikes.
    pub is_moto: bool,
}

impl Manufacturer {
    /// Derive the manufacturer's vehicle class.
    ///
    /// `is_car` wins over `is_spec`; a manufacturer with neither flag is a
    /// motorbike maker regardless of `is_moto`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalogue::domain::{Manufacturer, ManufacturerId, VehicleClass};
    ///
    /// let man = Manufacturer {
    ///     id: ManufacturerId::new(41),
    ///     name: "MAN".to_owned(),
    ///     is_car: true,
    ///     is_spec: true,
    ///     is_moto: false,
    /// };
    /// assert_eq!(man.vehicle_class(), VehicleClass::Car);
    /// ```
    #[must_use]
    pub const fn vehicle_class(&self) -> VehicleClass {
        if self.is_car {
            VehicleClass::Car
        } else if self.is_spec {
            VehicleClass::Special
        } else {
            VehicleClass::Motorbike
        }
    }
}

/// A model belonging to one manufacturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Model identity.
    pub id: ModelId,
    /// Owning manufacturer.
    pub manufacturer_id: ManufacturerId,
    /// Display name.
    pub name: String,
}

/// One product listing.
///
/// Every field falls back to its default when absent, null or of an
/// unexpected type, so one odd listing never fails a whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[expect(missing_docs, reason = "field names mirror the listing payload")]
pub struct Product {
    #[serde(deserialize_with = "lenient")]
    pub car_id: u64,
    #[serde(deserialize_with = "lenient")]
    pub status_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub photo: String,
    #[serde(deserialize_with = "lenient")]
    pub pic_number: u32,
    #[serde(deserialize_with = "lenient")]
    pub prod_year: u32,
    #[serde(deserialize_with = "lenient")]
    pub man_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub car_model: String,
    #[serde(deserialize_with = "lenient")]
    pub price: f64,
    #[serde(deserialize_with = "lenient")]
    pub price_usd: f64,
    #[serde(deserialize_with = "lenient")]
    pub price_value: f64,
    #[serde(deserialize_with = "lenient")]
    pub fuel_type_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub gear_type_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub drive_type_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub car_run: u64,
    #[serde(deserialize_with = "lenient")]
    pub car_run_km: u64,
    #[serde(deserialize_with = "lenient")]
    pub engine_volume: u32,
    #[serde(deserialize_with = "lenient")]
    pub right_wheel: bool,
    #[serde(deserialize_with = "lenient")]
    pub customs_passed: bool,
    #[serde(deserialize_with = "lenient")]
    pub model_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub location_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub order_number: u64,
    #[serde(deserialize_with = "lenient")]
    pub vehicle_type: u32,
    #[serde(deserialize_with = "lenient")]
    pub category_id: u32,
    #[serde(deserialize_with = "lenient")]
    pub car_desc: String,
    #[serde(deserialize_with = "lenient")]
    pub order_date: String,
    #[serde(deserialize_with = "lenient")]
    pub photo_ver: u32,
    #[serde(deserialize_with = "lenient")]
    pub views: u64,
    #[serde(deserialize_with = "lenient")]
    pub has_predicted_price: bool,
    #[serde(deserialize_with = "lenient")]
    pub pred_first_breakpoint: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub pred_second_breakpoint: Option<f64>,
}

/// Decode a listing field, falling back to the default when the value is
/// null or of the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// One page of product listings with paging metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    /// Listings on this page.
    pub items: Vec<Product>,
    /// Total number of matching listings.
    pub total: u64,
    /// Number of the last available page.
    pub last_page: u32,
}
