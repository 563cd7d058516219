//! Project use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for external callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - The service never bypasses repository validation/persistence contracts.
//! - Absence stays a value until the by-id path escalates it to `NotFound`.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure surface of the project service.
#[derive(Debug)]
pub enum ServiceError {
    /// No project exists for the requested identifier.
    NotFound(ProjectId),
    /// Persistence or validation failure, propagated unchanged.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(project_id) => {
                write!(f, "project with project_id={project_id} does not exist")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case facade over a project repository.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one project and returns it with its store-assigned id.
    pub fn add_project(&mut self, project: Project) -> ServiceResult<Project> {
        Ok(self.repo.insert_project(project)?)
    }

    /// Lists all projects as summaries (child collections stay empty).
    pub fn fetch_all_projects(&mut self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Fetches one fully hydrated project by id.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` when no row matches `project_id`; callers
    ///   of the by-id path treat existence as a precondition.
    pub fn fetch_project_by_id(&mut self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ServiceError::NotFound(project_id))
    }
}
