use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::product::{NewProduct, ProductChanges};
use crate::domain::types::{
    CategoryId, CurrencyCode, Price, ProductDescription, ProductTitle, Slug, StockCount,
};
use crate::forms::{
    FieldMap, FormError, SlugPatch, coerce_bool, coerce_int, coerce_object, coerce_price,
    coerce_string, coerce_string_list,
};
use crate::repository::ProductListQuery;

/// Allow-listed fields accepted by the product create/update endpoints.
pub const PRODUCT_FIELDS: [&str; 10] = [
    "title",
    "slug",
    "description",
    "price",
    "currency",
    "stock",
    "is_active",
    "images",
    "attributes",
    "category_id",
];

fn positive_id(value: i64, field: &'static str) -> Result<CategoryId, FormError> {
    let id = i32::try_from(value)
        .map_err(|_| FormError::Validation(format!("{field} is out of range")))?;
    CategoryId::new(id).map_err(Into::into)
}

/// Validated payload for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductPayload {
    pub title: ProductTitle,
    pub slug: Option<Slug>,
    pub description: Option<ProductDescription>,
    pub price: Price,
    pub currency: CurrencyCode,
    pub stock: StockCount,
    pub is_active: bool,
    pub images: Option<Vec<String>>,
    pub attributes: Option<Map<String, Value>>,
    pub category_id: CategoryId,
}

impl TryFrom<&FieldMap> for NewProductPayload {
    type Error = FormError;

    fn try_from(map: &FieldMap) -> Result<Self, Self::Error> {
        let title = ProductTitle::new(coerce_string(map.get("title")).unwrap_or_default())?;

        let slug = coerce_string(map.get("slug"))
            .filter(|s| !s.is_empty())
            .map(|s| Slug::slugify(&s));

        let description = coerce_string(map.get("description"))
            .filter(|s| !s.is_empty())
            .map(ProductDescription::new)
            .transpose()?;

        let price = Price::new(coerce_price(map.get("price"))?.unwrap_or(Decimal::ZERO))?;

        let currency = match coerce_string(map.get("currency")).filter(|s| !s.is_empty()) {
            Some(code) => CurrencyCode::new(code)?,
            None => CurrencyCode::default(),
        };

        let stock = i32::try_from(coerce_int(map.get("stock")).unwrap_or(0))
            .map_err(|_| FormError::Validation("stock is out of range".to_string()))?;
        let stock = StockCount::new(stock)?;

        let is_active = if map.contains_key("is_active") {
            coerce_bool(map.get("is_active"))
        } else {
            true
        };

        let category_id = coerce_int(map.get("category_id"))
            .ok_or_else(|| FormError::Validation("category_id is required".to_string()))?;
        let category_id = positive_id(category_id, "category_id")?;

        Ok(Self {
            title,
            slug,
            description,
            price,
            currency,
            stock,
            is_active,
            images: coerce_string_list(map.get("images")),
            attributes: coerce_object(map.get("attributes")),
            category_id,
        })
    }
}

impl NewProductPayload {
    /// Finalize defaults and produce the insertable record. A missing slug
    /// is derived from the title.
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        let slug = self
            .slug
            .unwrap_or_else(|| Slug::slugify(self.title.as_str()));
        NewProduct {
            title: self.title,
            slug,
            description: self.description,
            price: self.price,
            currency: self.currency,
            stock: self.stock,
            is_active: self.is_active,
            images: self.images,
            attributes: self.attributes,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial-update payload; only fields present in the normalized
/// map are populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProductPayload {
    pub title: Option<ProductTitle>,
    pub slug: Option<SlugPatch>,
    pub description: Option<Option<ProductDescription>>,
    pub price: Option<Price>,
    pub currency: Option<CurrencyCode>,
    pub stock: Option<StockCount>,
    pub is_active: Option<bool>,
    pub images: Option<Option<Vec<String>>>,
    pub attributes: Option<Option<Map<String, Value>>>,
    pub category_id: Option<CategoryId>,
}

impl TryFrom<&FieldMap> for UpdateProductPayload {
    type Error = FormError;

    fn try_from(map: &FieldMap) -> Result<Self, Self::Error> {
        let mut payload = Self::default();

        if map.contains_key("title") {
            payload.title =
                Some(ProductTitle::new(coerce_string(map.get("title")).unwrap_or_default())?);
        }

        if map.contains_key("slug") {
            payload.slug = Some(
                match coerce_string(map.get("slug")).filter(|s| !s.is_empty()) {
                    Some(slug) => SlugPatch::Set(Slug::slugify(&slug)),
                    None => SlugPatch::Regenerate,
                },
            );
        }

        if map.contains_key("description") {
            payload.description = Some(
                coerce_string(map.get("description"))
                    .filter(|s| !s.is_empty())
                    .map(ProductDescription::new)
                    .transpose()?,
            );
        }

        if map.contains_key("price") {
            payload.price = coerce_price(map.get("price"))?
                .map(Price::new)
                .transpose()?;
        }

        if map.contains_key("currency") {
            // A blank currency keeps the stored value, mirroring the
            // create-side default behaviour.
            payload.currency = coerce_string(map.get("currency"))
                .filter(|s| !s.is_empty())
                .map(CurrencyCode::new)
                .transpose()?;
        }

        if map.contains_key("stock") {
            let stock = i32::try_from(coerce_int(map.get("stock")).unwrap_or(0))
                .map_err(|_| FormError::Validation("stock is out of range".to_string()))?;
            payload.stock = Some(StockCount::new(stock)?);
        }

        if map.contains_key("is_active") {
            payload.is_active = Some(coerce_bool(map.get("is_active")));
        }

        if map.contains_key("images") {
            payload.images = Some(coerce_string_list(map.get("images")));
        }

        if map.contains_key("attributes") {
            payload.attributes = Some(coerce_object(map.get("attributes")));
        }

        if map.contains_key("category_id") {
            let raw = coerce_int(map.get("category_id")).ok_or_else(|| {
                FormError::Validation("category_id must be an integer".to_string())
            })?;
            payload.category_id = Some(positive_id(raw, "category_id")?);
        }

        Ok(payload)
    }
}

impl UpdateProductPayload {
    /// Turn the payload into a repository changeset, resolving the slug
    /// patch against the effective title.
    pub fn into_changes(self, current_title: &ProductTitle) -> ProductChanges {
        let title = self.title;
        let effective_title = title.as_ref().unwrap_or(current_title).as_str().to_string();
        ProductChanges {
            slug: self.slug.map(|patch| patch.resolve(&effective_title)),
            title,
            description: self.description,
            price: self.price,
            currency: self.currency,
            stock: self.stock,
            is_active: self.is_active,
            images: self.images,
            attributes: self.attributes,
            category_id: self.category_id,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

fn default_limit() -> i64 {
    50
}

fn default_active_filter() -> Option<bool> {
    Some(true)
}

/// Query parameters accepted by the product listing endpoint. Pagination
/// bounds are rejected, never clamped.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductListParams {
    /// Substring searched in titles and descriptions.
    pub q: Option<String>,
    pub category_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Active-flag filter; listing defaults to active products only.
    #[serde(default = "default_active_filter")]
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must be zero or greater"))]
    pub offset: i64,
}

impl Default for ProductListParams {
    fn default() -> Self {
        Self {
            q: None,
            category_id: None,
            min_price: None,
            max_price: None,
            is_active: default_active_filter(),
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl TryFrom<ProductListParams> for ProductListQuery {
    type Error = FormError;

    fn try_from(params: ProductListParams) -> Result<Self, Self::Error> {
        params.validate()?;

        let mut query = ProductListQuery::default().paginate(params.limit, params.offset);
        query.is_active = params.is_active;

        if let Some(category_id) = params.category_id {
            query = query.category(
                CategoryId::new(category_id)
                    .map_err(|e| FormError::Validation(e.to_string()))?,
            );
        }
        if let Some(min_price) = params.min_price {
            query = query.min_price(Price::new(min_price)?);
        }
        if let Some(max_price) = params.max_price {
            query = query.max_price(Price::new(max_price)?);
        }
        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.search(q);
        }

        Ok(query)
    }
}
