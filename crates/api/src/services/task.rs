//! Task service: scoped listing, CRUD, status transitions.

use taskboard_core::error::CoreError;
use taskboard_core::policy::{self, Caller};
use taskboard_core::roles::Role;
use taskboard_core::tasks::TaskStatus;
use taskboard_core::types::DbId;
use taskboard_db::models::task::{CreateTask, TaskResponse, UpdateTask};
use taskboard_db::repositories::{ProjectRepo, TaskFilter, TaskRepo, UserRepo};
use taskboard_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::query::{PageParams, TaskFilterParams};
use crate::response::Page;

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Denial for update/status-update. The reason string depends on which
/// rule the caller failed: an unassigned USER is told about the task, a
/// non-owner MANAGER about the project.
fn update_denied(caller: &Caller) -> AppError {
    let msg = match caller.role {
        Role::User => "You don't have permission to update this task",
        _ => "You don't have permission to update tasks in this project",
    };
    AppError::Core(CoreError::Forbidden(msg.into()))
}

/// Resolve an optional assignee id: the user must exist and must have the
/// USER role.
async fn resolve_assignee(pool: &DbPool, assignee_id: Option<DbId>) -> AppResult<Option<DbId>> {
    let Some(id) = assignee_id else {
        return Ok(None);
    };
    let user = UserRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    if user.role != Role::User {
        return Err(AppError::Core(CoreError::Validation(
            "Only users can be assigned to a task".into(),
        )));
    }
    Ok(Some(user.id))
}

/// Fetch the joined row for a task that is known to exist.
async fn detail_of(pool: &DbPool, id: DbId) -> AppResult<TaskResponse> {
    let detail = TaskRepo::find_detail_by_id(pool, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;
    Ok(detail.into())
}

pub struct TaskService;

impl TaskService {
    /// Fetch a single task the caller may see.
    pub async fn get_by_id(pool: &DbPool, caller: &Caller, id: DbId) -> AppResult<TaskResponse> {
        let detail = TaskRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| task_not_found(id))?;

        if !policy::has_task_access(caller, detail.owner_id, detail.assignee_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have access to this task".into(),
            )));
        }

        Ok(detail.into())
    }

    /// List tasks visible to the caller, optionally filtered by status
    /// and/or priority, id ascending, paginated.
    ///
    /// ADMIN sees everything, MANAGER sees tasks in owned projects, USER
    /// sees tasks assigned to them. A manager who owns no projects gets an
    /// empty page without a backing query.
    pub async fn get_all(
        pool: &DbPool,
        caller: &Caller,
        filters: &TaskFilterParams,
        page: &PageParams,
    ) -> AppResult<Page<TaskResponse>> {
        let owned_ids = if caller.role == Role::Manager {
            ProjectRepo::owned_ids(pool, caller.id).await?
        } else {
            Vec::new()
        };

        let filter = TaskFilter {
            status: filters.status,
            priority: filters.priority,
            scope: policy::task_list_scope(caller, owned_ids),
        };

        if filter.scope.is_empty() {
            return Ok(Page::empty(page.page(), page.size()));
        }

        let rows = TaskRepo::list_scoped(pool, &filter, page.limit(), page.offset()).await?;
        let total = TaskRepo::count_scoped(pool, &filter).await?;

        let content = rows.into_iter().map(TaskResponse::from).collect();
        Ok(Page::new(content, page.page(), page.size(), total))
    }

    /// List every task of a project the caller has access to. Within an
    /// accessible project there is no further per-role filtering.
    pub async fn by_project(
        pool: &DbPool,
        caller: &Caller,
        project_id: DbId,
        page: &PageParams,
    ) -> AppResult<Page<TaskResponse>> {
        let project = ProjectRepo::find_by_id(pool, project_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }))?;

        let has_assigned_task = caller.role == Role::User
            && TaskRepo::exists_assigned_in_project(pool, caller.id, project_id).await?;

        if !policy::has_project_access(caller, project.owner_id, has_assigned_task) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have access to this project".into(),
            )));
        }

        let rows = TaskRepo::list_by_project(pool, project_id, page.limit(), page.offset()).await?;
        let total = TaskRepo::count_by_project(pool, project_id).await?;

        let content = rows.into_iter().map(TaskResponse::from).collect();
        Ok(Page::new(content, page.page(), page.size(), total))
    }

    /// List tasks assigned to a user.
    ///
    /// A USER may only query themselves. A MANAGER querying someone else
    /// sees only the subset inside projects they own. ADMIN, or anyone
    /// querying themselves, sees the full set.
    pub async fn by_assigned_user(
        pool: &DbPool,
        caller: &Caller,
        user_id: DbId,
        page: &PageParams,
    ) -> AppResult<Page<TaskResponse>> {
        UserRepo::find_by_id(pool, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }))?;

        if caller.role == Role::User && caller.id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only view your own tasks".into(),
            )));
        }

        let (rows, total) = if caller.is_admin() || caller.id == user_id {
            (
                TaskRepo::list_by_assignee(pool, user_id, page.limit(), page.offset()).await?,
                TaskRepo::count_by_assignee(pool, user_id).await?,
            )
        } else {
            // MANAGER viewing someone else's tasks.
            let owned_ids = ProjectRepo::owned_ids(pool, caller.id).await?;
            if owned_ids.is_empty() {
                return Ok(Page::empty(page.page(), page.size()));
            }
            (
                TaskRepo::list_by_assignee_in_projects(
                    pool,
                    user_id,
                    &owned_ids,
                    page.limit(),
                    page.offset(),
                )
                .await?,
                TaskRepo::count_by_assignee_in_projects(pool, user_id, &owned_ids).await?,
            )
        };

        let content = rows.into_iter().map(TaskResponse::from).collect();
        Ok(Page::new(content, page.page(), page.size(), total))
    }

    /// Create a task in a project. The project is resolved first; the
    /// optional assignee must exist and have the USER role.
    pub async fn create(
        pool: &DbPool,
        caller: &Caller,
        mut input: CreateTask,
    ) -> AppResult<TaskResponse> {
        let project = ProjectRepo::find_by_id(pool, input.project_id).await?.ok_or(
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            }),
        )?;

        if !policy::can_create_task(caller, project.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You don't have permission to create tasks in this project".into(),
            )));
        }

        input.assigned_user_id = resolve_assignee(pool, input.assigned_user_id).await?;

        let task = TaskRepo::create(pool, &input).await?;
        tracing::info!(task_id = task.id, project_id = task.project_id, "Task created");
        detail_of(pool, task.id).await
    }

    /// Full update of a task. The project reference is immutable: a
    /// request naming a different project fails Validation regardless of
    /// role.
    pub async fn update(
        pool: &DbPool,
        caller: &Caller,
        id: DbId,
        requested_project_id: DbId,
        mut input: UpdateTask,
    ) -> AppResult<TaskResponse> {
        let detail = TaskRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| task_not_found(id))?;

        if !policy::can_update_task(caller, detail.owner_id, detail.assignee_id) {
            return Err(update_denied(caller));
        }

        if requested_project_id != detail.project_id {
            return Err(AppError::Core(CoreError::Validation(
                "Cannot change the project of an existing task".into(),
            )));
        }

        input.assigned_user_id = resolve_assignee(pool, input.assigned_user_id).await?;

        TaskRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| task_not_found(id))?;
        detail_of(pool, id).await
    }

    /// Narrow update: status only, same permission matrix as the full
    /// update.
    pub async fn update_status(
        pool: &DbPool,
        caller: &Caller,
        id: DbId,
        status: TaskStatus,
    ) -> AppResult<TaskResponse> {
        let detail = TaskRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| task_not_found(id))?;

        if !policy::can_update_task(caller, detail.owner_id, detail.assignee_id) {
            return Err(update_denied(caller));
        }

        TaskRepo::update_status(pool, id, status)
            .await?
            .ok_or_else(|| task_not_found(id))?;
        detail_of(pool, id).await
    }

    /// Delete a task. Assignees may update their tasks but never delete
    /// them.
    pub async fn delete(pool: &DbPool, caller: &Caller, id: DbId) -> AppResult<()> {
        let detail = TaskRepo::find_detail_by_id(pool, id)
            .await?
            .ok_or_else(|| task_not_found(id))?;

        if !policy::can_delete_task(caller, detail.owner_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only project owners and admins can delete tasks".into(),
            )));
        }

        TaskRepo::delete(pool, id).await?;
        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }
}
