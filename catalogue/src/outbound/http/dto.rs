//! DTOs for decoding marketplace JSON responses.
//!
//! The service is loose with scalar types: ids and flags arrive as numbers in
//! some payloads and as strings in others (`"man_id": "3"`, `"is_car": "1"`).
//! Wire scalars are decoded into the untagged enums below and normalised when
//! mapping into domain records.

use serde::Deserialize;

use crate::domain::records::{
    Category, CategoryId, CategoryType, Manufacturer, ManufacturerId, Model, ModelId, Product,
    ProductPage,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireNumber {
    Number(u64),
    Text(String),
}

impl WireNumber {
    fn to_u32(&self, field: &str) -> Result<u32, String> {
        match self {
            Self::Number(value) => u32::try_from(*value)
                .map_err(|_| format!("{field} {value} is out of range")),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| format!("{field} {text:?} is not a number")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum WireFlag {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl WireFlag {
    fn is_set(flag: Option<&Self>) -> bool {
        match flag {
            Some(Self::Bool(value)) => *value,
            Some(Self::Number(value)) => *value == 1,
            Some(Self::Text(text)) => text.trim() == "1",
            None => false,
        }
    }
}

/// `{ "data": [...] }` wrapper used by the models and categories endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct DataEnvelopeDto<T> {
    pub(super) data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ManufacturerDto {
    pub(super) man_id: WireNumber,
    #[serde(default)]
    pub(super) man_name: String,
    pub(super) is_car: Option<WireFlag>,
    pub(super) is_spec: Option<WireFlag>,
    pub(super) is_moto: Option<WireFlag>,
}

impl ManufacturerDto {
    pub(super) fn into_domain(self) -> Result<Manufacturer, String> {
        Ok(Manufacturer {
            id: ManufacturerId::new(self.man_id.to_u32("man_id")?),
            name: self.man_name,
            is_car: WireFlag::is_set(self.is_car.as_ref()),
            is_spec: WireFlag::is_set(self.is_spec.as_ref()),
            is_moto: WireFlag::is_set(self.is_moto.as_ref()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ModelDto {
    pub(super) model_id: WireNumber,
    pub(super) man_id: Option<WireNumber>,
    #[serde(default)]
    pub(super) model_name: String,
}

impl ModelDto {
    /// Map into a domain model, attributing it to `requested` when the
    /// payload omits its manufacturer.
    pub(super) fn into_domain(self, requested: ManufacturerId) -> Result<Model, String> {
        let manufacturer_id = match &self.man_id {
            Some(man_id) => ManufacturerId::new(man_id.to_u32("man_id")?),
            None => requested,
        };
        Ok(Model {
            id: ModelId::new(self.model_id.to_u32("model_id")?),
            manufacturer_id,
            name: self.model_name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoryDto {
    pub(super) category_id: WireNumber,
    pub(super) category_type: WireNumber,
    #[serde(default)]
    pub(super) title: String,
}

impl CategoryDto {
    pub(super) fn into_domain(self) -> Result<Category, String> {
        Ok(Category {
            id: CategoryId::new(self.category_id.to_u32("category_id")?),
            category_type: CategoryType(self.category_type.to_u32("category_type")?),
            title: self.title,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductsResponseDto {
    pub(super) data: ProductsDataDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductsDataDto {
    #[serde(default)]
    pub(super) items: Vec<Product>,
    pub(super) meta: ProductsMetaDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductsMetaDto {
    pub(super) total: u64,
    pub(super) last_page: u32,
}

impl ProductsResponseDto {
    pub(super) fn into_domain_page(self) -> ProductPage {
        let ProductsDataDto { items, meta } = self.data;
        ProductPage {
            items,
            total: meta.total,
            last_page: meta.last_page,
        }
    }
}
