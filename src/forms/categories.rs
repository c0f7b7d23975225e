use chrono::Utc;

use crate::domain::category::{CategoryChanges, NewCategory};
use crate::domain::types::{CategoryId, CategoryName, Slug};
use crate::forms::{FieldMap, FormError, SlugPatch, coerce_string};

/// Allow-listed fields accepted by the category create/update endpoints.
pub const CATEGORY_FIELDS: [&str; 3] = ["name", "slug", "parent_id"];

/// A present `parent_id` field: blank or null detaches the category, a
/// non-blank value must be a positive integer.
fn parent_field(map: &FieldMap, key: &str) -> Result<Option<Option<CategoryId>>, FormError> {
    if !map.contains_key(key) {
        return Ok(None);
    }
    let Some(text) = coerce_string(map.get(key)).filter(|s| !s.is_empty()) else {
        return Ok(Some(None));
    };
    let id = text
        .parse::<i32>()
        .map_err(|_| FormError::Validation("parent_id must be an integer".to_string()))?;
    Ok(Some(Some(CategoryId::new(id)?)))
}

/// Validated payload for creating a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategoryPayload {
    pub name: CategoryName,
    pub slug: Option<Slug>,
    pub parent_id: Option<CategoryId>,
}

impl TryFrom<&FieldMap> for NewCategoryPayload {
    type Error = FormError;

    fn try_from(map: &FieldMap) -> Result<Self, Self::Error> {
        let name = CategoryName::new(coerce_string(map.get("name")).unwrap_or_default())?;

        let slug = coerce_string(map.get("slug"))
            .filter(|s| !s.is_empty())
            .map(|s| Slug::slugify(&s));

        let parent_id = parent_field(map, "parent_id")?.flatten();

        Ok(Self {
            name,
            slug,
            parent_id,
        })
    }
}

impl NewCategoryPayload {
    /// Finalize defaults and produce the insertable record. A missing slug
    /// is derived from the name.
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        let slug = self
            .slug
            .unwrap_or_else(|| Slug::slugify(self.name.as_str()));
        NewCategory {
            name: self.name,
            slug,
            parent_id: self.parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial-update payload; only fields present in the normalized
/// map are populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCategoryPayload {
    pub name: Option<CategoryName>,
    pub slug: Option<SlugPatch>,
    pub parent_id: Option<Option<CategoryId>>,
}

impl TryFrom<&FieldMap> for UpdateCategoryPayload {
    type Error = FormError;

    fn try_from(map: &FieldMap) -> Result<Self, Self::Error> {
        let mut payload = Self::default();

        if map.contains_key("name") {
            payload.name =
                Some(CategoryName::new(coerce_string(map.get("name")).unwrap_or_default())?);
        }

        if map.contains_key("slug") {
            payload.slug = Some(
                match coerce_string(map.get("slug")).filter(|s| !s.is_empty()) {
                    Some(slug) => SlugPatch::Set(Slug::slugify(&slug)),
                    None => SlugPatch::Regenerate,
                },
            );
        }

        payload.parent_id = parent_field(map, "parent_id")?;

        Ok(payload)
    }
}

impl UpdateCategoryPayload {
    /// Turn the payload into a repository changeset, resolving the slug
    /// patch against the effective name.
    pub fn into_changes(self, current_name: &CategoryName) -> CategoryChanges {
        let name = self.name;
        let effective_name = name.as_ref().unwrap_or(current_name).as_str().to_string();
        CategoryChanges {
            slug: self.slug.map(|patch| patch.resolve(&effective_name)),
            name,
            parent_id: self.parent_id,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
