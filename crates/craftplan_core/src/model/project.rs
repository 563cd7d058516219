//! Project aggregate model.
//!
//! # Responsibility
//! - Define the project record plus its material/step/category children.
//! - Provide the write-path validation gate (`Project::validate`).
//!
//! # Invariants
//! - `project_name` must be non-blank before any SQL mutation.
//! - Collections are empty (never absent) until a full fetch hydrates them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier shared by all project-domain entities.
pub type ProjectId = i64;

/// Validation failure raised before a project reaches persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectValidationError {
    BlankName,
    NegativeHours { field: &'static str, value: f64 },
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "project_name must not be blank"),
            Self::NegativeHours { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl Error for ProjectValidationError {}

/// Canonical project record.
///
/// A freshly built project has `project_id = None`; the repository assigns
/// the identifier on insert and returns the same value with the id set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier. `None` until the row is inserted.
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    /// Planned effort in hours. Nullable in the schema.
    pub estimated_hours: Option<f64>,
    /// Actual effort in hours. Nullable in the schema.
    pub actual_hours: Option<f64>,
    /// Difficulty rating. Nullable; range policy belongs to callers.
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    /// Populated only by a full fetch; empty in summary views.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Populated only by a full fetch; empty in summary views.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Populated only by a full fetch; empty in summary views.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Project {
    /// Creates a project with the given name and every optional field unset.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours: None,
            actual_hours: None,
            difficulty: None,
            notes: None,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Checks invariants that must hold before the record is persisted.
    ///
    /// # Errors
    /// - `BlankName` when `project_name` is empty or whitespace-only.
    /// - `NegativeHours` when either hours field is set below zero.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.project_name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        for (field, value) in [
            ("estimated_hours", self.estimated_hours),
            ("actual_hours", self.actual_hours),
        ] {
            if let Some(value) = value {
                if value < 0.0 {
                    return Err(ProjectValidationError::NegativeHours { field, value });
                }
            }
        }
        Ok(())
    }
}

/// One material row belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: Option<ProjectId>,
    pub project_id: Option<ProjectId>,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<f64>,
}

/// One ordered instruction row belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: Option<ProjectId>,
    pub project_id: Option<ProjectId>,
    pub step_text: String,
    pub step_order: i32,
}

/// A category label, associated to projects through the join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: Option<ProjectId>,
    pub category_name: String,
}
