use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::{Map, Value};

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    ProductChanges as DomainProductChanges,
};
use crate::domain::types::{
    CurrencyCode, Price, ProductDescription, ProductTitle, Slug, TypeConstraintError,
};

/// Diesel model representing the `products` table. Image lists and the
/// attribute map are stored as JSON text.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub stock: i32,
    pub is_active: bool,
    pub images: Option<String>,
    pub attributes: Option<String>,
    pub category_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub stock: i32,
    pub is_active: bool,
    pub images: Option<String>,
    pub attributes: Option<String>,
    pub category_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial-update changeset; nullable columns use the nested option so an
/// inner `None` writes SQL NULL while an outer `None` skips the column.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
    pub images: Option<Option<String>>,
    pub attributes: Option<Option<String>>,
    pub category_id: Option<i32>,
    pub updated_at: Option<NaiveDateTime>,
}

fn json_text<T: serde::Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

fn parse_json_column<T: serde::de::DeserializeOwned>(
    column: &'static str,
    text: Option<String>,
) -> Result<Option<T>, TypeConstraintError> {
    text.map(|raw| {
        serde_json::from_str(&raw)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("{column}: {e}")))
    })
    .transpose()
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            title: ProductTitle::new(product.title)?,
            slug: Slug::new(product.slug)?,
            description: product
                .description
                .map(ProductDescription::new)
                .transpose()?,
            price: Price::from_minor_units(product.price_cents),
            currency: CurrencyCode::new(product.currency)?,
            stock: product.stock.try_into()?,
            is_active: product.is_active,
            images: parse_json_column::<Vec<String>>("images", product.images)?,
            attributes: parse_json_column::<Map<String, Value>>("attributes", product.attributes)?,
            category_id: product.category_id.try_into()?,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            title: product.title.into_inner(),
            slug: product.slug.into_inner(),
            description: product.description.map(ProductDescription::into_inner),
            price_cents: product.price.minor_units(),
            currency: product.currency.into_inner(),
            stock: product.stock.get(),
            is_active: product.is_active,
            images: product.images.as_ref().and_then(json_text),
            attributes: product.attributes.as_ref().and_then(json_text),
            category_id: product.category_id.get(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<&DomainProductChanges> for ProductChangeset {
    fn from(changes: &DomainProductChanges) -> Self {
        Self {
            title: changes.title.clone().map(ProductTitle::into_inner),
            slug: changes.slug.clone().map(Slug::into_inner),
            description: changes
                .description
                .clone()
                .map(|d| d.map(ProductDescription::into_inner)),
            price_cents: changes.price.map(Price::minor_units),
            currency: changes.currency.clone().map(CurrencyCode::into_inner),
            stock: changes.stock.map(|s| s.get()),
            is_active: changes.is_active,
            images: changes
                .images
                .as_ref()
                .map(|images| images.as_ref().and_then(json_text)),
            attributes: changes
                .attributes
                .as_ref()
                .map(|attributes| attributes.as_ref().and_then(json_text)),
            category_id: changes.category_id.map(|id| id.get()),
            updated_at: Some(changes.updated_at),
        }
    }
}
