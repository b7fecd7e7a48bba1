//! Demo data loader.
//!
//! Populates an empty database with a small cast of users, two projects,
//! and a handful of tasks so the API is explorable out of the box. No-op
//! when any user already exists. The password hash is supplied by the
//! caller (hashing lives in the API crate with the rest of the credential
//! handling).

use chrono::NaiveDate;
use taskboard_core::roles::Role;
use taskboard_core::tasks::{Priority, TaskStatus};

use crate::models::project::CreateProject;
use crate::models::task::CreateTask;
use crate::models::user::CreateUser;
use crate::repositories::{ProjectRepo, TaskRepo, UserRepo};
use crate::DbPool;

/// Seed demo data. Every seeded account shares `password_hash`.
pub async fn run(pool: &DbPool, password_hash: &str) -> Result<(), sqlx::Error> {
    if UserRepo::count(pool).await? > 0 {
        tracing::debug!("Users already present, skipping demo seed");
        return Ok(());
    }

    let user = |email: &str, role: Role| CreateUser {
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
    };

    let _admin = UserRepo::create(pool, &user("admin@example.com", Role::Admin)).await?;
    let manager1 = UserRepo::create(pool, &user("manager@example.com", Role::Manager)).await?;
    let manager2 = UserRepo::create(pool, &user("manager2@example.com", Role::Manager)).await?;
    let user1 = UserRepo::create(pool, &user("user@example.com", Role::User)).await?;
    let user2 = UserRepo::create(pool, &user("user2@example.com", Role::User)).await?;

    let project1 = ProjectRepo::create(
        pool,
        manager1.id,
        &CreateProject {
            name: "Website Redesign".to_string(),
            description: Some("Redesign the company website".to_string()),
        },
    )
    .await?;

    let project2 = ProjectRepo::create(
        pool,
        manager2.id,
        &CreateProject {
            name: "Mobile App Development".to_string(),
            description: Some("Develop the companion mobile app".to_string()),
        },
    )
    .await?;

    let tasks = [
        CreateTask {
            title: "Design homepage mockup".to_string(),
            description: Some("Create mockups for the new homepage".to_string()),
            status: TaskStatus::Todo,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            priority: Priority::High,
            project_id: project1.id,
            assigned_user_id: Some(user1.id),
        },
        CreateTask {
            title: "Implement navigation".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 30),
            priority: Priority::Medium,
            project_id: project1.id,
            assigned_user_id: Some(user2.id),
        },
        CreateTask {
            title: "Audit legacy styles".to_string(),
            description: Some("Catalogue CSS that can be dropped".to_string()),
            status: TaskStatus::Done,
            due_date: None,
            priority: Priority::Low,
            project_id: project1.id,
            assigned_user_id: None,
        },
        CreateTask {
            title: "Set up CI pipeline".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 1),
            priority: Priority::High,
            project_id: project2.id,
            assigned_user_id: Some(user1.id),
        },
        CreateTask {
            title: "Prototype onboarding flow".to_string(),
            description: Some("First-run experience for the app".to_string()),
            status: TaskStatus::Todo,
            due_date: None,
            priority: Priority::Medium,
            project_id: project2.id,
            assigned_user_id: None,
        },
    ];

    for task in &tasks {
        TaskRepo::create(pool, task).await?;
    }

    tracing::info!("Seeded demo data (5 users, 2 projects, {} tasks)", tasks.len());
    Ok(())
}
