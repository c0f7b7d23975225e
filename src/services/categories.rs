use crate::domain::types::{CategoryId, TelegramId};
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{CATEGORY_FIELDS, NewCategoryPayload, UpdateCategoryPayload};
use crate::forms::{RawBody, normalize};
use crate::models::config::AdminAllowList;
use crate::repository::{CategoryReader, CategoryWriter};

use super::{ServiceError, ServiceResult, classify_storage, ensure_admin};

/// List every category, ordered by identifier.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a category. The parent existence check here is advisory; the
/// store's foreign key is the authoritative enforcement at commit time.
pub fn create_category<R>(
    body: RawBody,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(identity, admins)?;

    let map = normalize(body, &CATEGORY_FIELDS)?;
    let payload = NewCategoryPayload::try_from(&map)?;

    if let Some(parent_id) = payload.parent_id {
        ensure_parent_exists(repo, parent_id)?;
    }

    let category = payload.into_new_category();
    repo.create_category(&category)
        .map(CategoryDto::from)
        .map_err(|e| classify_storage("create category", e))
}

/// Apply a partial update to a category. Rejects self-parenting and any
/// parent assignment that would close a cycle in the tree.
pub fn update_category<R>(
    id: CategoryId,
    body: RawBody,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(identity, admins)?;

    let existing = match repo.get_category_by_id(id) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let map = normalize(body, &CATEGORY_FIELDS)?;
    let payload = UpdateCategoryPayload::try_from(&map)?;

    if let Some(Some(parent_id)) = payload.parent_id {
        if parent_id == id {
            return Err(ServiceError::Validation(
                "a category cannot be its own parent".to_string(),
            ));
        }
        ensure_parent_exists(repo, parent_id)?;
        ensure_no_cycle(repo, id, parent_id)?;
    }

    let changes = payload.into_changes(&existing.name);
    repo.update_category(id, &changes)
        .map(CategoryDto::from)
        .map_err(|e| classify_storage("update category", e))
}

/// Delete a category together with its descendant subtree. Deleting an
/// absent category is a no-op, mirroring the idempotent DELETE semantics of
/// the HTTP surface.
pub fn delete_category<R>(
    id: CategoryId,
    identity: Option<TelegramId>,
    admins: &AdminAllowList,
    repo: &R,
) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter,
{
    ensure_admin(identity, admins)?;

    repo.delete_category(id)
        .map(|_| ())
        .map_err(|e| classify_storage("delete category", e))
}

fn ensure_parent_exists<R: CategoryReader>(repo: &R, parent_id: CategoryId) -> ServiceResult<()> {
    match repo.category_exists(parent_id) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ServiceError::Validation(format!(
            "parent category {parent_id} does not exist"
        ))),
        Err(e) => {
            log::error!("Failed to check parent category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Walk the proposed parent's ancestor chain; finding the category itself
/// means the assignment would close a cycle. The visited list keeps the
/// walk finite even if the stored chain is already corrupted.
fn ensure_no_cycle<R: CategoryReader>(
    repo: &R,
    id: CategoryId,
    new_parent: CategoryId,
) -> ServiceResult<()> {
    let mut cursor = Some(new_parent);
    let mut visited: Vec<CategoryId> = Vec::new();
    while let Some(current) = cursor {
        if current == id {
            return Err(ServiceError::Validation(
                "category parent chain must not form a cycle".to_string(),
            ));
        }
        if visited.contains(&current) {
            break;
        }
        visited.push(current);
        cursor = match repo.get_category_by_id(current) {
            Ok(Some(category)) => category.parent_id,
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to walk category ancestors: {e}");
                return Err(ServiceError::Internal);
            }
        };
    }
    Ok(())
}
