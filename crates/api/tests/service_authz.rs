//! Service-level authorization tests against a real database.
//!
//! Exercises the service layer (the policy call-sites) directly:
//! - NotFound-before-permission ordering
//! - The role matrix for project and task mutations
//! - List scoping per role
//! - Project immutability on task update
//! - Assignee role restriction
//! - User deletion rules (detach, owner block)

use assert_matches::assert_matches;
use sqlx::PgPool;
use taskboard_api::error::AppError;
use taskboard_api::query::{PageParams, TaskFilterParams};
use taskboard_api::services::{ProjectService, TaskService, UserService};
use taskboard_core::error::CoreError;
use taskboard_core::policy::Caller;
use taskboard_core::roles::Role;
use taskboard_core::tasks::{Priority, TaskStatus};
use taskboard_core::types::DbId;
use taskboard_db::models::project::CreateProject;
use taskboard_db::models::task::{CreateTask, UpdateTask};
use taskboard_db::models::user::CreateUser;
use taskboard_db::repositories::{ProjectRepo, TaskRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAAAAAAAAAAAAA";

async fn seed_user(pool: &PgPool, email: &str, role: Role) -> Caller {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: DUMMY_HASH.to_string(),
            role,
        },
    )
    .await
    .unwrap();
    Caller::new(user.id, role)
}

async fn seed_project(pool: &PgPool, owner: &Caller, name: &str) -> DbId {
    ProjectRepo::create(
        pool,
        owner.id,
        &CreateProject {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_task(pool: &PgPool, project_id: DbId, assignee: Option<DbId>) -> DbId {
    TaskRepo::create(
        pool,
        &CreateTask {
            title: "Seeded task".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            priority: Priority::Medium,
            project_id,
            assigned_user_id: assignee,
        },
    )
    .await
    .unwrap()
    .id
}

fn update_input(assignee: Option<DbId>) -> UpdateTask {
    UpdateTask {
        title: "Updated title".to_string(),
        description: Some("Updated".to_string()),
        status: TaskStatus::InProgress,
        due_date: None,
        priority: Priority::High,
        assigned_user_id: assignee,
    }
}

fn page() -> PageParams {
    PageParams::default()
}

// ---------------------------------------------------------------------------
// Test: NotFound is checked before permissions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_not_found_before_permission(pool: PgPool) {
    let user = seed_user(&pool, "u@test.com", Role::User).await;

    // A USER probing a nonexistent task gets 404, never 403.
    let err = TaskService::get_by_id(&pool, &user, 999_999)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::NotFound { entity: "Task", .. })
    );

    let err = ProjectService::get_by_id(&pool, &user, 999_999)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Test: Assigned user can read and move their task, nothing more
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_assignee_task_rights(pool: PgPool) {
    let manager = seed_user(&pool, "m@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    let project = seed_project(&pool, &manager, "P").await;
    let task = seed_task(&pool, project, Some(user.id)).await;

    // Read and status update work.
    let fetched = TaskService::get_by_id(&pool, &user, task).await.unwrap();
    assert_eq!(fetched.id, task);

    let moved = TaskService::update_status(&pool, &user, task, TaskStatus::Done)
        .await
        .unwrap();
    assert_eq!(moved.status, TaskStatus::Done);

    // Full update works too, assigned users share the update matrix.
    let updated = TaskService::update(&pool, &user, task, project, update_input(Some(user.id)))
        .await
        .unwrap();
    assert_eq!(updated.title, "Updated title");

    // Delete never.
    let err = TaskService::delete(&pool, &user, task).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "Only project owners and admins can delete tasks");

    // The project the task lives in is readable through the assignment.
    let p = ProjectService::get_by_id(&pool, &user, project).await.unwrap();
    assert_eq!(p.id, project);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unassigned_user_is_denied(pool: PgPool) {
    let manager = seed_user(&pool, "m@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    let project = seed_project(&pool, &manager, "P").await;
    let task = seed_task(&pool, project, None).await;

    let err = TaskService::get_by_id(&pool, &user, task).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have access to this task");

    let err = TaskService::update_status(&pool, &user, task, TaskStatus::Done)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have permission to update this task");

    let err = ProjectService::get_by_id(&pool, &user, project)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have access to this project");
}

// ---------------------------------------------------------------------------
// Test: Manager rights stop at their own projects; admin has no limits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_scope_and_admin_override(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let m1 = seed_user(&pool, "m1@test.com", Role::Manager).await;
    let m2 = seed_user(&pool, "m2@test.com", Role::Manager).await;
    let project = seed_project(&pool, &m1, "P1").await;
    let task = seed_task(&pool, project, None).await;

    // Foreign manager: denied across the board.
    let err = TaskService::update(&pool, &m2, task, project, update_input(None))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have permission to update tasks in this project");

    let err = ProjectService::update(
        &pool,
        &m2,
        project,
        taskboard_db::models::project::UpdateProject {
            name: "Hijack".to_string(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have permission to update this project");

    let err = ProjectService::delete(&pool, &m2, project).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have permission to delete this project");

    // Admin: everything allowed.
    TaskService::update(&pool, &admin, task, project, update_input(None))
        .await
        .unwrap();
    ProjectService::delete(&pool, &admin, project).await.unwrap();

    // The cascade removed the task.
    assert!(TaskRepo::find_by_id(&pool, task).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: Task creation rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_task_rules(pool: PgPool) {
    let m1 = seed_user(&pool, "m1@test.com", Role::Manager).await;
    let m2 = seed_user(&pool, "m2@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    let project = seed_project(&pool, &m1, "P1").await;

    let input = |assignee: Option<DbId>| CreateTask {
        title: "New task".to_string(),
        description: None,
        status: TaskStatus::Todo,
        due_date: None,
        priority: Priority::Low,
        project_id: project,
        assigned_user_id: assignee,
    };

    // Foreign manager cannot create tasks in m1's project.
    let err = TaskService::create(&pool, &m2, input(None)).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You don't have permission to create tasks in this project");

    // Assignee must exist.
    let err = TaskService::create(&pool, &m1, input(Some(999_999)))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::NotFound { entity: "User", .. })
    );

    // Assignee must have the USER role.
    let err = TaskService::create(&pool, &m1, input(Some(m2.id)))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == "Only users can be assigned to a task");

    // Owner with a proper assignee succeeds; the response nests the
    // project and assignee projections.
    let created = TaskService::create(&pool, &m1, input(Some(user.id)))
        .await
        .unwrap();
    assert_eq!(created.project.id, project);
    assert_eq!(created.project.owner.id, m1.id);
    assert_eq!(created.assigned_user.as_ref().map(|u| u.id), Some(user.id));
}

// ---------------------------------------------------------------------------
// Test: A task's project is immutable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_project_is_immutable(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let manager = seed_user(&pool, "m@test.com", Role::Manager).await;
    let p1 = seed_project(&pool, &manager, "P1").await;
    let p2 = seed_project(&pool, &manager, "P2").await;
    let task = seed_task(&pool, p1, None).await;

    // Even an admin cannot move a task between projects.
    let err = TaskService::update(&pool, &admin, task, p2, update_input(None))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == "Cannot change the project of an existing task");

    // Naming the current project is fine.
    TaskService::update(&pool, &admin, task, p1, update_input(None))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: List scoping per role
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_list_scoping(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let m1 = seed_user(&pool, "m1@test.com", Role::Manager).await;
    let m2 = seed_user(&pool, "m2@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    seed_project(&pool, &m1, "P1").await;
    seed_project(&pool, &m1, "P2").await;
    seed_project(&pool, &m2, "P3").await;

    let all = ProjectService::get_all(&pool, &admin, &page()).await.unwrap();
    assert_eq!(all.total_elements, 3);

    let mine = ProjectService::get_all(&pool, &m1, &page()).await.unwrap();
    assert_eq!(mine.total_elements, 2);
    assert!(mine.content.iter().all(|p| p.owner.id == m1.id));

    // A USER owns nothing, so the page is empty even with assignments.
    let none = ProjectService::get_all(&pool, &user, &page()).await.unwrap();
    assert_eq!(none.total_elements, 0);
    assert!(none.content.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_list_scoping_and_filters(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let m1 = seed_user(&pool, "m1@test.com", Role::Manager).await;
    let m2 = seed_user(&pool, "m2@test.com", Role::Manager).await;
    let idle_manager = seed_user(&pool, "m3@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    let p1 = seed_project(&pool, &m1, "P1").await;
    let p2 = seed_project(&pool, &m2, "P2").await;

    seed_task(&pool, p1, Some(user.id)).await;
    seed_task(&pool, p1, None).await;
    seed_task(&pool, p2, Some(user.id)).await;

    let no_filter = TaskFilterParams::default();

    let all = TaskService::get_all(&pool, &admin, &no_filter, &page())
        .await
        .unwrap();
    assert_eq!(all.total_elements, 3);

    let m1_tasks = TaskService::get_all(&pool, &m1, &no_filter, &page())
        .await
        .unwrap();
    assert_eq!(m1_tasks.total_elements, 2);

    let user_tasks = TaskService::get_all(&pool, &user, &no_filter, &page())
        .await
        .unwrap();
    assert_eq!(user_tasks.total_elements, 2);
    assert!(user_tasks
        .content
        .iter()
        .all(|t| t.assigned_user.as_ref().map(|u| u.id) == Some(user.id)));

    // A manager with no projects gets an empty page.
    let empty = TaskService::get_all(&pool, &idle_manager, &no_filter, &page())
        .await
        .unwrap();
    assert_eq!(empty.total_elements, 0);

    // Status filter combines with the scope.
    let done_only = TaskFilterParams {
        status: Some(TaskStatus::Done),
        priority: None,
    };
    let none_done = TaskService::get_all(&pool, &admin, &done_only, &page())
        .await
        .unwrap();
    assert_eq!(none_done.total_elements, 0);
}

// ---------------------------------------------------------------------------
// Test: Tasks by assigned user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tasks_by_assigned_user(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let m1 = seed_user(&pool, "m1@test.com", Role::Manager).await;
    let m2 = seed_user(&pool, "m2@test.com", Role::Manager).await;
    let u1 = seed_user(&pool, "u1@test.com", Role::User).await;
    let u2 = seed_user(&pool, "u2@test.com", Role::User).await;
    let p1 = seed_project(&pool, &m1, "P1").await;
    let p2 = seed_project(&pool, &m2, "P2").await;

    seed_task(&pool, p1, Some(u1.id)).await;
    seed_task(&pool, p2, Some(u1.id)).await;

    // A USER may only query themselves.
    let err = TaskService::by_assigned_user(&pool, &u2, u1.id, &page())
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "You can only view your own tasks");

    let own = TaskService::by_assigned_user(&pool, &u1, u1.id, &page())
        .await
        .unwrap();
    assert_eq!(own.total_elements, 2);

    // A MANAGER sees only the subset inside their own projects.
    let subset = TaskService::by_assigned_user(&pool, &m1, u1.id, &page())
        .await
        .unwrap();
    assert_eq!(subset.total_elements, 1);
    assert_eq!(subset.content[0].project.id, p1);

    // ADMIN is unfiltered.
    let full = TaskService::by_assigned_user(&pool, &admin, u1.id, &page())
        .await
        .unwrap();
    assert_eq!(full.total_elements, 2);

    // Unknown target user is a 404.
    let err = TaskService::by_assigned_user(&pool, &admin, 999_999, &page())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::NotFound { entity: "User", .. })
    );
}

// ---------------------------------------------------------------------------
// Test: User lifecycle rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_deletion_rules(pool: PgPool) {
    let admin = seed_user(&pool, "a@test.com", Role::Admin).await;
    let manager = seed_user(&pool, "m@test.com", Role::Manager).await;
    let user = seed_user(&pool, "u@test.com", Role::User).await;
    let project = seed_project(&pool, &manager, "P").await;
    let task = seed_task(&pool, project, Some(user.id)).await;

    // Only admins delete users.
    let err = UserService::delete(&pool, &manager, user.id).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(msg)) if msg == "Only administrators can delete users");

    // A project owner cannot be deleted.
    let err = UserService::delete(&pool, &admin, manager.id).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == "Cannot delete a user who owns projects");

    // Deleting the assignee detaches, never deletes, their tasks.
    UserService::delete(&pool, &admin, user.id).await.unwrap();
    let survivor = TaskRepo::find_by_id(&pool, task).await.unwrap().unwrap();
    assert_eq!(survivor.assigned_user_id, None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_email_is_rejected(pool: PgPool) {
    UserService::create(&pool, "dup@test.com", "password123", Role::User)
        .await
        .unwrap();

    let err = UserService::create(&pool, "dup@test.com", "password123", Role::Manager)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == "Email already in use: dup@test.com");
}

// ---------------------------------------------------------------------------
// Test: Project update preserves owner and id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_update_preserves_owner(pool: PgPool) {
    let manager = seed_user(&pool, "m@test.com", Role::Manager).await;
    let project = seed_project(&pool, &manager, "Before").await;

    let updated = ProjectService::update(
        &pool,
        &manager,
        project,
        taskboard_db::models::project::UpdateProject {
            name: "After".to_string(),
            description: Some("desc".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.id, project);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.owner.id, manager.id);
}
