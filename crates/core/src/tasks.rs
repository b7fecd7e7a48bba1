//! Task status and priority enums.
//!
//! Stored as TEXT with CHECK constraints, serialized in their wire form
//! (`"TODO"`, `"IN_PROGRESS"`, ...) in request and response bodies.

use serde::{Deserialize, Serialize};

use crate::error::InvalidEnumValue;

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(InvalidEnumValue(format!("Unknown task status: {other}"))),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = InvalidEnumValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Scheduling priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(InvalidEnumValue(format!("Unknown priority: {other}"))),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = InvalidEnumValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
