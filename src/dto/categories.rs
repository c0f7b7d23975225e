use serde::Serialize;

use crate::domain::category::Category;

/// Wire representation of a category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i32>,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
            parent_id: value.parent_id.map(|id| id.get()),
        }
    }
}
