use diesel::prelude::*;

use crate::domain::category::{Category, CategoryChanges, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{
    Category as DbCategory, CategoryChangeset, NewCategory as DbNewCategory,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn category_exists(&self, id: CategoryId) -> RepositoryResult<bool> {
        use crate::schema::categories;
        use diesel::dsl::{exists, select};

        let mut conn = self.conn()?;

        Ok(
            select(exists(
                categories::table.filter(categories::id.eq(id.get())),
            ))
            .get_result(&mut conn)?,
        )
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let row: DbCategory = diesel::insert_into(categories::table)
            .values(db_category)
            .get_result(&mut conn)?;

        Ok(row.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let changeset = CategoryChangeset::from(changes);

        let row: DbCategory =
            diesel::update(categories::table.filter(categories::id.eq(id.get())))
                .set(changeset)
                .get_result(&mut conn)?;

        Ok(row.try_into()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            // Collect the subtree by walking the adjacency list. The visited
            // set keeps the walk finite even on a corrupted parent chain.
            let mut subtree = vec![id.get()];
            let mut frontier = vec![id.get()];
            while !frontier.is_empty() {
                let parents: Vec<Option<i32>> = frontier.iter().copied().map(Some).collect();
                let children: Vec<i32> = categories::table
                    .filter(categories::parent_id.eq_any(parents))
                    .select(categories::id)
                    .load(conn)?;
                frontier = children
                    .into_iter()
                    .filter(|child| !subtree.contains(child))
                    .collect();
                subtree.extend(frontier.iter().copied());
            }

            // Detach the subtree before deleting so that row ordering inside
            // the DELETE cannot trip the self-referential foreign key.
            diesel::update(categories::table.filter(categories::id.eq_any(&subtree)))
                .set(categories::parent_id.eq(None::<i32>))
                .execute(conn)?;

            // Products of a removed category go with it.
            diesel::delete(products::table.filter(products::category_id.eq_any(&subtree)))
                .execute(conn)?;

            diesel::delete(categories::table.filter(categories::id.eq_any(&subtree)))
                .execute(conn)
        })?;

        Ok(affected)
    }
}
