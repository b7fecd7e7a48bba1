//! Authorization policy engine.
//!
//! Every visibility and mutation rule for projects and tasks lives in this
//! module so call-sites in the service layer consult one source of truth
//! instead of re-deriving role logic. All functions are pure: they take the
//! request's [`Caller`] plus facts the caller has already fetched from the
//! store (a project's owner id, a task's assignee, an existence bit) and
//! return a decision. Resolving those facts is the service layer's job,
//! and so is failing with NotFound *before* any permission is considered.
//!
//! The rules, by role:
//!
//! | Operation            | ADMIN | MANAGER            | USER             |
//! |----------------------|-------|--------------------|------------------|
//! | Create project       | yes   | yes (becomes owner)| no               |
//! | Update/delete project| yes   | iff owner          | no               |
//! | Create task          | yes   | iff project owner  | no               |
//! | Update task / status | yes   | iff project owner  | iff assigned     |
//! | Delete task          | yes   | iff project owner  | no               |
//! | Delete user          | yes   | no                 | no               |

use crate::roles::Role;
use crate::types::DbId;

/// The identity resolved for the current request: id plus role.
///
/// Resolved once per request by the authentication layer and threaded
/// explicitly into every service call; nothing in this crate reads
/// ambient/thread-local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: DbId,
    pub role: Role,
}

impl Caller {
    pub fn new(id: DbId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Which projects a caller may see in list endpoints, applied before
/// pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    /// No restriction (ADMIN).
    All,
    /// Only projects owned by this user. A USER never owns a project, so
    /// this scope yields the empty list for them.
    OwnedBy(DbId),
}

/// Which tasks a caller may see in list endpoints, applied before
/// pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskScope {
    /// No restriction (ADMIN).
    All,
    /// Tasks whose project id is in this set (MANAGER: their owned
    /// projects). An empty set must produce an empty page without a
    /// backing query.
    ProjectsIn(Vec<DbId>),
    /// Tasks assigned to this user (USER).
    AssignedTo(DbId),
}

impl TaskScope {
    /// True when the scope can never match a row, so the store should not
    /// be queried at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, TaskScope::ProjectsIn(ids) if ids.is_empty())
    }
}

/// True iff the caller is the owner of a project with the given owner id.
pub fn is_project_owner(caller: &Caller, project_owner_id: DbId) -> bool {
    project_owner_id == caller.id
}

/// Read access to a single project.
///
/// `has_assigned_task` is the pre-fetched answer to "does the caller have
/// at least one task assigned to them in this project"; it is only
/// consulted for the USER role.
pub fn has_project_access(caller: &Caller, project_owner_id: DbId, has_assigned_task: bool) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => has_assigned_task,
    }
}

/// True iff the task is assigned to the caller.
pub fn is_assigned_to_task(caller: &Caller, assigned_user_id: Option<DbId>) -> bool {
    assigned_user_id == Some(caller.id)
}

/// Read access to a single task.
pub fn has_task_access(
    caller: &Caller,
    project_owner_id: DbId,
    assigned_user_id: Option<DbId>,
) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => is_assigned_to_task(caller, assigned_user_id),
    }
}

/// Create a project. The creator always becomes the owner; a caller can
/// never set an arbitrary owner.
pub fn can_create_project(caller: &Caller) -> bool {
    matches!(caller.role, Role::Admin | Role::Manager)
}

/// Update or delete a project.
pub fn can_modify_project(caller: &Caller, project_owner_id: DbId) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => false,
    }
}

/// Create a task in a project. Checked against the *project* because the
/// task does not exist yet.
pub fn can_create_task(caller: &Caller, project_owner_id: DbId) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => false,
    }
}

/// Update a task, fully or status-only (same matrix for both).
pub fn can_update_task(
    caller: &Caller,
    project_owner_id: DbId,
    assigned_user_id: Option<DbId>,
) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => is_assigned_to_task(caller, assigned_user_id),
    }
}

/// Delete a task. An assignee may update their task but never delete it.
pub fn can_delete_task(caller: &Caller, project_owner_id: DbId) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => is_project_owner(caller, project_owner_id),
        Role::User => false,
    }
}

/// Delete a user account.
pub fn can_delete_user(caller: &Caller) -> bool {
    caller.is_admin()
}

/// Visibility scope for the project list endpoint.
pub fn project_list_scope(caller: &Caller) -> ProjectScope {
    match caller.role {
        Role::Admin => ProjectScope::All,
        // MANAGER and USER are treated uniformly as "owned projects";
        // a USER owns none, so their list is empty.
        Role::Manager | Role::User => ProjectScope::OwnedBy(caller.id),
    }
}

/// Visibility scope for task list endpoints.
///
/// `owned_project_ids` must be the caller's owned-project id set; it is
/// only consulted for the MANAGER role, so callers may pass an empty vec
/// for other roles without fetching anything.
pub fn task_list_scope(caller: &Caller, owned_project_ids: Vec<DbId>) -> TaskScope {
    match caller.role {
        Role::Admin => TaskScope::All,
        Role::Manager => TaskScope::ProjectsIn(owned_project_ids),
        Role::User => TaskScope::AssignedTo(caller.id),
    }
}
