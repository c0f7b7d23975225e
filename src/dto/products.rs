use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::product::Product;

/// Wire representation of a product. The price serializes as an exact
/// decimal string, never as binary floating point.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub stock: i32,
    pub is_active: bool,
    pub images: Option<Vec<String>>,
    pub attributes: Option<Map<String, Value>>,
    pub category_id: i32,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            title: value.title.into_inner(),
            slug: value.slug.into_inner(),
            description: value.description.map(Into::into),
            price: value.price.get(),
            currency: value.currency.into_inner(),
            stock: value.stock.get(),
            is_active: value.is_active,
            images: value.images,
            attributes: value.attributes,
            category_id: value.category_id.get(),
        }
    }
}
