use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, Slug};

/// Canonical category record. Categories form a forest through `parent_id`;
/// children are always derived by reverse lookup, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub slug: Slug,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-by-field patch for an existing [`Category`]. `None` leaves the
/// field untouched; `parent_id: Some(None)` detaches the category from its
/// parent.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<CategoryName>,
    pub slug: Option<Slug>,
    pub parent_id: Option<Option<CategoryId>>,
    pub updated_at: NaiveDateTime,
}
