use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::types::{
    CategoryId, CurrencyCode, Price, ProductDescription, ProductId, ProductTitle, Slug, StockCount,
};

/// A catalog product. Always belongs to an existing category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: ProductTitle,
    pub slug: Slug,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub currency: CurrencyCode,
    pub stock: StockCount,
    pub is_active: bool,
    /// Ordered image references, e.g. URLs.
    pub images: Option<Vec<String>>,
    /// Open attribute map used by client-side filters.
    pub attributes: Option<Map<String, Value>>,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub title: ProductTitle,
    pub slug: Slug,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub currency: CurrencyCode,
    pub stock: StockCount,
    pub is_active: bool,
    pub images: Option<Vec<String>>,
    pub attributes: Option<Map<String, Value>>,
    pub category_id: CategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-by-field patch for an existing [`Product`]. Outer `None` leaves the
/// field untouched; for nullable fields the inner `None` clears the value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub title: Option<ProductTitle>,
    pub slug: Option<Slug>,
    pub description: Option<Option<ProductDescription>>,
    pub price: Option<Price>,
    pub currency: Option<CurrencyCode>,
    pub stock: Option<StockCount>,
    pub is_active: Option<bool>,
    pub images: Option<Option<Vec<String>>>,
    pub attributes: Option<Option<Map<String, Value>>>,
    pub category_id: Option<CategoryId>,
    pub updated_at: NaiveDateTime,
}
