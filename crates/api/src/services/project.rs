//! Project service: visibility, CRUD, and the cascade delete.

use taskboard_core::error::CoreError;
use taskboard_core::policy::{self, Caller, ProjectScope};
use taskboard_core::roles::Role;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, ProjectResponse, UpdateProject};
use taskboard_db::repositories::{ProjectRepo, TaskRepo};
use taskboard_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::Page;

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

pub struct ProjectService;

impl ProjectService {
    /// List projects visible to the caller, id ascending, paginated.
    /// ADMIN sees everything; everyone else sees only projects they own
    /// (for a USER that is always the empty page).
    pub async fn get_all(
        pool: &DbPool,
        caller: &Caller,
        page: &PageParams,
    ) -> AppResult<Page<ProjectResponse>> {
        let (rows, total) = match policy::project_list_scope(caller) {
            ProjectScope::All => (
                ProjectRepo::list_all(pool, page.limit(), page.offset()).await?,
                ProjectRepo::count_all(pool).await?,
            ),
            ProjectScope::OwnedBy(owner_id) => (
                ProjectRepo::list_by_owner(pool, owner_id, page.limit(), page.offset()).await?,
                ProjectRepo::count_by_owner(pool, owner_id).await?,
            ),
        };

        let content = rows.into_iter().map(ProjectResponse::from).collect();
        Ok(Page::new(content, page.page(), page.size(), total))
    }

    /// Fetch a single project the caller may see.
    pub async fn get_by_id(pool: &DbPool, caller: &Caller, id: DbId) -> AppResult<ProjectResponse> {
        let detail = ProjectRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        // The assignment bit is only consulted for USER callers.
        let has_assigned_task = caller.role == Role::User
            && TaskRepo::exists_assigned_in_project(pool, caller.id, id).await?;

        if !policy::has_project_access(caller, detail.owner_id, has_assigned_task) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have access to this project".into(),
            )));
        }

        Ok(detail.into())
    }

    /// Create a project. The caller always becomes the owner.
    pub async fn create(
        pool: &DbPool,
        caller: &Caller,
        input: CreateProject,
    ) -> AppResult<ProjectResponse> {
        if !policy::can_create_project(caller) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only managers and admins can create projects".into(),
            )));
        }

        let project = ProjectRepo::create(pool, caller.id, &input).await?;
        tracing::info!(project_id = project.id, owner_id = caller.id, "Project created");

        let detail = ProjectRepo::find_detail_by_id(pool, project.id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Created project {} vanished", project.id))
            })?;
        Ok(detail.into())
    }

    /// Update a project's name/description. Owner, id and create_date are
    /// never touched.
    pub async fn update(
        pool: &DbPool,
        caller: &Caller,
        id: DbId,
        input: UpdateProject,
    ) -> AppResult<ProjectResponse> {
        let project = ProjectRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        if !policy::can_modify_project(caller, project.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have permission to update this project".into(),
            )));
        }

        ProjectRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        let detail = ProjectRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| project_not_found(id))?;
        Ok(detail.into())
    }

    /// Delete a project and all its tasks inside one transaction.
    pub async fn delete(pool: &DbPool, caller: &Caller, id: DbId) -> AppResult<()> {
        let project = ProjectRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        if !policy::can_modify_project(caller, project.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have permission to delete this project".into(),
            )));
        }

        let mut tx = pool.begin().await?;
        let removed_tasks = TaskRepo::delete_by_project(&mut tx, id).await?;
        ProjectRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(project_id = id, removed_tasks, "Project deleted");
        Ok(())
    }
}
