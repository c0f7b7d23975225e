//! End-to-end scenarios exercised through the service layer against a real
//! SQLite database.

use serde_json::json;
use tg_shop_backend::domain::types::{CategoryId, TelegramId};
use tg_shop_backend::forms::RawBody;
use tg_shop_backend::forms::products::ProductListParams;
use tg_shop_backend::models::config::AdminAllowList;
use tg_shop_backend::repository::DieselRepository;
use tg_shop_backend::services::categories::{
    create_category, delete_category, list_categories, update_category,
};
use tg_shop_backend::services::products::{create_product, list_products};
use tg_shop_backend::services::users::ensure_user;
use tg_shop_backend::forms::users::EnsureUserForm;
use tg_shop_backend::services::ServiceError;

mod common;

const ADMIN_TG_ID: i64 = 100;

fn admins() -> AdminAllowList {
    AdminAllowList::parse(&ADMIN_TG_ID.to_string())
}

fn admin() -> Option<TelegramId> {
    TelegramId::new(ADMIN_TG_ID).ok()
}

fn repo() -> (common::TestDb, DieselRepository) {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    (test_db, repo)
}

#[test]
fn creating_the_same_category_twice_conflicts() {
    let (_db, repo) = repo();
    let body = RawBody::Json(json!({"name": "Shoes", "slug": "shoes"}));

    let created = create_category(body.clone(), admin(), &admins(), &repo).unwrap();
    assert!(created.id >= 1);
    assert_eq!(created.slug, "shoes");

    let err = create_category(body, admin(), &admins(), &repo).unwrap_err();
    assert_eq!(err, ServiceError::Conflict("categories.slug".to_string()));
}

#[test]
fn product_slug_defaults_to_slugified_title() {
    let (_db, repo) = repo();
    let shoes = create_category(
        RawBody::Json(json!({"name": "Shoes"})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();

    let product = create_product(
        RawBody::Json(json!({"title": "Nice Shoes", "category_id": shoes.id})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();

    assert_eq!(product.slug, "nice-shoes");
    assert_eq!(product.category_id, shoes.id);
}

#[test]
fn listing_applies_price_band_and_search() {
    let (_db, repo) = repo();
    let shoes = create_category(
        RawBody::Json(json!({"name": "Shoes"})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();

    for (title, price, active) in [
        ("Cheap shoe", "5", true),
        ("Nice shoe", "30", true),
        ("Luxury shoe", "300", true),
        ("Nice hat", "30", true),
        ("Hidden shoe", "30", false),
    ] {
        create_product(
            RawBody::Json(json!({
                "title": title,
                "price": price,
                "is_active": active,
                "category_id": shoes.id
            })),
            admin(),
            &admins(),
            &repo,
        )
        .unwrap();
    }

    let params = ProductListParams {
        q: Some("shoe".to_string()),
        min_price: Some("10".parse().unwrap()),
        max_price: Some("50".parse().unwrap()),
        ..ProductListParams::default()
    };
    let listed = list_products(params, &repo).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Nice shoe");
    assert!(listed[0].is_active);
}

#[test]
fn self_parenting_a_category_is_rejected() {
    let (_db, repo) = repo();
    let category = create_category(
        RawBody::Json(json!({"name": "Shoes"})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();

    let err = update_category(
        CategoryId::new(category.id).unwrap(),
        RawBody::Json(json!({"parent_id": category.id})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Validation("a category cannot be its own parent".to_string())
    );
}

#[test]
fn deleting_the_root_of_a_chain_removes_the_whole_chain() {
    let (_db, repo) = repo();
    let a = create_category(
        RawBody::Json(json!({"name": "A"})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();
    let b = create_category(
        RawBody::Json(json!({"name": "B", "parent_id": a.id})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();
    create_category(
        RawBody::Json(json!({"name": "C", "parent_id": b.id})),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();

    delete_category(CategoryId::new(a.id).unwrap(), admin(), &admins(), &repo).unwrap();

    assert!(list_categories(&repo).unwrap().is_empty());
}

#[test]
fn oversized_limit_is_rejected_with_validation() {
    let (_db, repo) = repo();

    let params = ProductListParams {
        limit: 1000,
        ..ProductListParams::default()
    };
    let err = list_products(params, &repo).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn form_encoded_bodies_normalize_like_json() {
    let (_db, repo) = repo();
    let shoes = create_category(
        RawBody::Form(vec![("name".to_string(), "Shoes".to_string())]),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();
    assert_eq!(shoes.slug, "shoes");

    let product = create_product(
        RawBody::Form(vec![
            ("title".to_string(), "Nice Shoes".to_string()),
            ("price".to_string(), "99,90".to_string()),
            ("category_id".to_string(), shoes.id.to_string()),
            ("images".to_string(), "[\"a.jpg\"]".to_string()),
        ]),
        admin(),
        &admins(),
        &repo,
    )
    .unwrap();
    assert_eq!(product.price, "99.90".parse().unwrap());
    assert_eq!(product.images.as_deref(), Some(&["a.jpg".to_string()][..]));
}

#[test]
fn ensure_user_is_idempotent_and_stamps_admin_flag() {
    let (_db, repo) = repo();

    let first = ensure_user(EnsureUserForm { tg_id: ADMIN_TG_ID }, &admins(), &repo).unwrap();
    let second = ensure_user(EnsureUserForm { tg_id: ADMIN_TG_ID }, &admins(), &repo).unwrap();
    assert_eq!(first.id, second.id);
    assert!(first.is_admin);

    let visitor = ensure_user(EnsureUserForm { tg_id: 555 }, &admins(), &repo).unwrap();
    assert!(!visitor.is_admin);
    assert!(visitor.is_active);
}

#[test]
fn concurrent_style_duplicate_slugs_resolve_to_one_winner() {
    // Two creates racing past the advisory check: the commit-time unique
    // index decides, one wins and the other surfaces Conflict.
    let (_db, repo) = repo();

    let body = RawBody::Json(json!({"name": "Shoes", "slug": "shoes"}));
    let results: Vec<_> = (0..2)
        .map(|_| create_category(body.clone(), admin(), &admins(), &repo))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::Conflict(_))))
        .count();
    assert_eq!((winners, conflicts), (1, 1));
}
