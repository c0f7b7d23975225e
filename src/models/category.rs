use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, CategoryChanges as DomainCategoryChanges,
    NewCategory as DomainNewCategory,
};
use crate::domain::types::{CategoryName, Slug, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Category`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial-update changeset; `parent_id` uses the nested option so an inner
/// `None` writes SQL NULL while an outer `None` skips the column.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChangeset {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<i32>>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            slug: Slug::new(category.slug)?,
            parent_id: category.parent_id.map(TryInto::try_into).transpose()?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl From<DomainNewCategory> for NewCategory {
    fn from(category: DomainNewCategory) -> Self {
        Self {
            name: category.name.into_inner(),
            slug: category.slug.into_inner(),
            parent_id: category.parent_id.map(|id| id.get()),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<&DomainCategoryChanges> for CategoryChangeset {
    fn from(changes: &DomainCategoryChanges) -> Self {
        Self {
            name: changes.name.clone().map(CategoryName::into_inner),
            slug: changes.slug.clone().map(Slug::into_inner),
            parent_id: changes
                .parent_id
                .map(|parent| parent.map(|id| id.get())),
            updated_at: Some(changes.updated_at),
        }
    }
}
