use crate::domain::types::{CategoryId, ProductId, TelegramId};
use crate::dto::products::ProductDto;
use crate::forms::products::{
    NewProductPayload, PRODUCT_FIELDS, ProductListParams, UpdateProductPayload,
};
use crate::forms::{RawBody, normalize};
use crate::models::config::AdminAllowList;
use crate::repository::{CategoryReader, ProductListQuery, ProductReader, ProductWriter};

use super::{ServiceError, ServiceResult, classify_storage, ensure_admin};

/// List products matching the given filters, newest first. Open endpoint;
/// out-of-range pagination is rejected before the store is touched.
pub fn list_products<R>(params: ProductListParams, repo: &R) -> ServiceResult<Vec<ProductDto>>
where
    R: ProductReader,
{
    let query = ProductListQuery::try_from(params)?;

    match repo.list_products(query) {
        Ok((_total, products)) => Ok(products.into_iter().map(ProductDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single product by id.
pub fn get_product<R>(id: ProductId, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader,
{
    match repo.get_product_by_id(id) {
        Ok(Some(product)) => Ok(ProductDto::from(product)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a product. The category existence check is advisory; a category
/// deleted between the check and the insert is still caught by the store's
/// foreign key at commit time.
pub fn create_product<R>(
    body: RawBody,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<ProductDto>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    ensure_admin(identity, admins)?;

    let map = normalize(body, &PRODUCT_FIELDS)?;
    let payload = NewProductPayload::try_from(&map)?;

    ensure_category_exists(repo, payload.category_id)?;

    let product = payload.into_new_product();
    repo.create_product(&product)
        .map(ProductDto::from)
        .map_err(|e| classify_storage("create product", e))
}

/// Apply a partial update to a product. Only fields present in the body are
/// touched; a supplied-but-blank slug regenerates from the effective title.
pub fn update_product<R>(
    id: ProductId,
    body: RawBody,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<ProductDto>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    ensure_admin(identity, admins)?;

    let existing = match repo.get_product_by_id(id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let map = normalize(body, &PRODUCT_FIELDS)?;
    let payload = UpdateProductPayload::try_from(&map)?;

    if let Some(category_id) = payload.category_id
        && category_id != existing.category_id
    {
        ensure_category_exists(repo, category_id)?;
    }

    let changes = payload.into_changes(&existing.title);
    repo.update_product(id, &changes)
        .map(ProductDto::from)
        .map_err(|e| classify_storage("update product", e))
}

/// Delete a product. Deleting an absent product is a no-op, mirroring the
/// idempotent DELETE semantics of the HTTP surface.
pub fn delete_product<R>(
    id: ProductId,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<()>
where
    R: ProductWriter,
{
    ensure_admin(identity, admins)?;

    repo.delete_product(id)
        .map(|_| ())
        .map_err(|e| classify_storage("delete product", e))
}

fn ensure_category_exists<R: CategoryReader>(
    repo: &R,
    category_id: CategoryId,
) -> ServiceResult<()> {
    match repo.category_exists(category_id) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::Validation(format!(
            "category {category_id} does not exist"
        ))),
        Err(e) => {
            log::error!("Failed to check category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::product::Product;
    use crate::domain::types::{
        CategoryName, CurrencyCode, Price, ProductDescription, ProductTitle, Slug, StockCount,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn admins() -> AdminAllowList {
        AdminAllowList::parse("100")
    }

    fn admin_identity() -> Option<TelegramId> {
        TelegramId::new(100).ok()
    }

    fn sample_category(id: i32) -> Category {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(format!("Category {id}")).unwrap(),
            slug: Slug::slugify(&format!("category-{id}")),
            parent_id: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn sample_product(id: i32, title: &str, price: &str, active: bool) -> Product {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Product {
            id: ProductId::new(id).unwrap(),
            title: ProductTitle::new(title).unwrap(),
            slug: Slug::slugify(title),
            description: None,
            price: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
            currency: CurrencyCode::default(),
            stock: StockCount::new(1).unwrap(),
            is_active: active,
            images: None,
            attributes: None,
            category_id: CategoryId::new(1).unwrap(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn create_defaults_slug_from_title() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1)]);
        let body = RawBody::Json(json!({"title": "Nice Shoes", "category_id": 1}));

        let dto = create_product(body, admin_identity(), &admins(), &repo).unwrap();
        assert_eq!(dto.slug, "nice-shoes");
        assert!(dto.is_active);
        assert_eq!(dto.currency, "RUB");
        assert_eq!(dto.price, Decimal::from_str("0.00").unwrap());
    }

    #[test]
    fn create_rejects_missing_category_before_persisting() {
        let repo = TestRepository::new();
        let body = RawBody::Json(json!({"title": "Shoes", "category_id": 9}));

        let err = create_product(body, admin_identity(), &admins(), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let (total, _) = repo
            .list_products(ProductListQuery::default())
            .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn duplicate_slug_is_a_conflict() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1)]);
        let body = RawBody::Json(json!({"title": "Shoes", "slug": "shoes", "category_id": 1}));

        create_product(body.clone(), admin_identity(), &admins(), &repo).unwrap();
        let err = create_product(body, admin_identity(), &admins(), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Conflict("products.slug".to_string()));
    }

    #[test]
    fn mutation_requires_admin_identity() {
        let repo = TestRepository::new().with_categories(vec![sample_category(1)]);
        let body = RawBody::Json(json!({"title": "Shoes", "category_id": 1}));

        let err = create_product(body.clone(), None, &admins(), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Unauthenticated);

        let err = create_product(body, TelegramId::new(7).ok(), &admins(), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Forbidden);
    }

    #[test]
    fn update_touches_only_present_fields() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![sample_product(10, "Old Boots", "20", true)]);
        let body = RawBody::Json(json!({"price": "25,50"}));

        let dto = update_product(
            ProductId::new(10).unwrap(),
            body,
            admin_identity(),
            &admins(),
            &repo,
        )
        .unwrap();
        assert_eq!(dto.title, "Old Boots");
        assert_eq!(dto.price, Decimal::from_str("25.50").unwrap());
        assert_eq!(dto.slug, "old-boots");
    }

    #[test]
    fn update_blank_slug_regenerates_from_new_title() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![sample_product(10, "Old Boots", "20", true)]);
        let body = RawBody::Json(json!({"title": "Fresh Boots", "slug": ""}));

        let dto = update_product(
            ProductId::new(10).unwrap(),
            body,
            admin_identity(),
            &admins(),
            &repo,
        )
        .unwrap();
        assert_eq!(dto.slug, "fresh-boots");
    }

    #[test]
    fn update_rejects_dangling_category() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![sample_product(10, "Boots", "20", true)]);
        let body = RawBody::Json(json!({"category_id": 99}));

        let err = update_product(
            ProductId::new(10).unwrap(),
            body,
            admin_identity(),
            &admins(),
            &repo,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn update_missing_product_is_not_found() {
        let repo = TestRepository::new();
        let body = RawBody::Json(json!({"title": "X"}));

        let err = update_product(
            ProductId::new(1).unwrap(),
            body,
            admin_identity(),
            &admins(),
            &repo,
        )
        .unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn listing_filters_compose_conjunctively() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![
                sample_product(1, "Cheap shoe", "5", true),
                sample_product(2, "Nice shoe", "30", true),
                sample_product(3, "Luxury shoe", "300", true),
                sample_product(4, "Nice hat", "30", true),
                sample_product(5, "Hidden shoe", "30", false),
            ]);

        let params = ProductListParams {
            q: Some("shoe".to_string()),
            min_price: Some("10".parse().unwrap()),
            max_price: Some("50".parse().unwrap()),
            ..ProductListParams::default()
        };
        let result = list_products(params, &repo).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Nice shoe");
    }

    #[test]
    fn listing_orders_newest_first() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![
                sample_product(1, "First", "5", true),
                sample_product(2, "Second", "5", true),
            ]);

        let result = list_products(ProductListParams::default(), &repo).unwrap();
        assert_eq!(result[0].id, 2);
        assert_eq!(result[1].id, 1);
    }

    #[test]
    fn listing_rejects_oversized_limit_without_touching_store() {
        let repo = TestRepository::new();
        let params = ProductListParams {
            limit: 1000,
            ..ProductListParams::default()
        };
        let err = list_products(params, &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn inactive_products_can_be_listed_explicitly() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![
                sample_product(1, "Visible", "5", true),
                sample_product(2, "Hidden", "5", false),
            ]);

        let params = ProductListParams {
            is_active: Some(false),
            ..ProductListParams::default()
        };
        let result = list_products(params, &repo).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Hidden");
    }

    #[test]
    fn get_product_maps_missing_to_not_found() {
        let repo = TestRepository::new();
        let err = get_product(ProductId::new(3).unwrap(), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = TestRepository::new()
            .with_categories(vec![sample_category(1)])
            .with_products(vec![sample_product(1, "Boots", "5", true)]);

        delete_product(ProductId::new(1).unwrap(), admin_identity(), &admins(), &repo).unwrap();
        delete_product(ProductId::new(1).unwrap(), admin_identity(), &admins(), &repo).unwrap();
    }
}
