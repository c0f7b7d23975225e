use diesel::prelude::*;

use crate::domain::product::{NewProduct, Product, ProductChanges};
use crate::domain::types::ProductId;
use crate::models::product::{Product as DbProduct, NewProduct as DbNewProduct, ProductChangeset};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(is_active) = query.is_active {
                items = items.filter(products::is_active.eq(is_active));
            }
            if let Some(category_id) = query.category_id {
                items = items.filter(products::category_id.eq(category_id.get()));
            }
            if let Some(min_price) = query.min_price {
                items = items.filter(products::price_cents.ge(min_price.minor_units()));
            }
            if let Some(max_price) = query.max_price {
                items = items.filter(products::price_cents.le(max_price.minor_units()));
            }
            if let Some(search) = &query.search {
                // SQLite LIKE is case-insensitive for ASCII.
                let pattern = format!("%{search}%");
                items = items.filter(
                    products::title
                        .nullable()
                        .like(pattern.clone())
                        .or(products::description.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(products::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset).limit(pagination.limit);
        }

        let items = items
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let row: DbProduct = diesel::insert_into(products::table)
            .values(db_product)
            .get_result(&mut conn)?;

        Ok(row.try_into()?)
    }

    fn update_product(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> RepositoryResult<Product> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let changeset = ProductChangeset::from(changes);

        let row: DbProduct = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(changeset)
            .get_result(&mut conn)?;

        Ok(row.try_into()?)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
