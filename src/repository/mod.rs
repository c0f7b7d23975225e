use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::{CategoryId, Price, ProductId, TelegramId};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod category;
pub mod errors;
pub mod product;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Validated limit/offset window. Bounds are enforced at the form boundary;
/// the repository applies the values verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

/// Query parameters used when listing products. Every predicate is optional
/// and they compose conjunctively.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Filter on the active flag.
    pub is_active: Option<bool>,
    /// Restrict to a single category.
    pub category_id: Option<CategoryId>,
    /// Inclusive price lower bound.
    pub min_price: Option<Price>,
    /// Inclusive price upper bound.
    pub max_price: Option<Price>,
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    /// Pagination window.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn min_price(mut self, price: Price) -> Self {
        self.min_price = Some(price);
        self
    }
    pub fn max_price(mut self, price: Price) -> Self {
        self.max_price = Some(price);
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.pagination = Some(Pagination { limit, offset });
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by identifier.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Advisory existence lookup used before referencing a category.
    fn category_exists(&self, id: CategoryId) -> RepositoryResult<bool>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored record.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Apply a partial update and return the stored record.
    fn update_category(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<Category>;
    /// Delete a category together with its descendant subtree and every
    /// product referencing a removed category, all in one transaction.
    /// Returns the number of categories removed.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters, newest first.
    /// Returns the total match count alongside the requested page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product and return the stored record.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Apply a partial update and return the stored record.
    fn update_product(&self, id: ProductId, changes: &ProductChanges)
    -> RepositoryResult<Product>;
    /// Delete a product. Returns the number of rows removed.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// Retrieve a user by their Telegram identity.
    fn get_user_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    /// Persist a new user and return the stored record.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}
