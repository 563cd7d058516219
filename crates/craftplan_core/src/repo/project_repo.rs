//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/fetch APIs over the project aggregate tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Project::validate()` before SQL mutations.
//! - A full fetch hydrates all three child collections or none: any error
//!   rolls back the whole transaction and no partial aggregate escapes.
//! - Listing-all returns summary rows only; child collections stay empty
//!   by contract.

use crate::db::DbError;
use crate::model::project::{Category, Material, Project, ProjectId, ProjectValidationError, Step};
use crate::repo::with_transaction;
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence and query operations.
///
/// `Db` is the only failure kind a store error can surface as; the raw
/// `rusqlite` error stays reachable through `Error::source` for diagnostics.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "project persistence failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project aggregate operations.
pub trait ProjectRepository {
    /// Inserts one project row and returns the input with its id assigned.
    fn insert_project(&mut self, project: Project) -> RepoResult<Project>;
    /// Lists all projects as summaries, ordered by name ascending.
    fn fetch_all_projects(&mut self) -> RepoResult<Vec<Project>>;
    /// Fetches one fully hydrated project, or `None` when the id is unknown.
    fn fetch_project_by_id(&mut self, project_id: ProjectId) -> RepoResult<Option<Project>>;
}

/// SQLite-backed project repository.
///
/// Holds one connection for its lifetime; every public operation runs as a
/// single transaction on that connection.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn insert_project(&mut self, mut project: Project) -> RepoResult<Project> {
        let started_at = Instant::now();
        project.validate()?;

        let result = with_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO project (
                    project_name,
                    estimated_hours,
                    actual_hours,
                    difficulty,
                    notes
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    project.project_name.as_str(),
                    project.estimated_hours,
                    project.actual_hours,
                    project.difficulty,
                    project.notes.as_deref(),
                ],
            )?;

            // Same connection, same transaction: the rowid cannot belong to
            // a concurrent insert.
            Ok(tx.last_insert_rowid())
        });

        match result {
            Ok(project_id) => {
                info!(
                    "event=project_insert module=repo status=ok duration_ms={} project_id={}",
                    started_at.elapsed().as_millis(),
                    project_id
                );
                project.project_id = Some(project_id);
                Ok(project)
            }
            Err(err) => {
                error!(
                    "event=project_insert module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn fetch_all_projects(&mut self) -> RepoResult<Vec<Project>> {
        let started_at = Instant::now();

        let result = with_transaction(self.conn, |tx| {
            let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_name;"))?;
            let mut rows = stmt.query([])?;
            let mut projects = Vec::new();

            while let Some(row) = rows.next()? {
                projects.push(parse_project_row(row)?);
            }

            Ok(projects)
        });

        match &result {
            Ok(projects) => info!(
                "event=project_list module=repo status=ok duration_ms={} count={}",
                started_at.elapsed().as_millis(),
                projects.len()
            ),
            Err(err) => error!(
                "event=project_list module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }

    fn fetch_project_by_id(&mut self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        let started_at = Instant::now();

        let result = with_transaction(self.conn, |tx| {
            let mut project = {
                let mut stmt = tx.prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
                let mut rows = stmt.query([project_id])?;
                match rows.next()? {
                    Some(row) => parse_project_row(row)?,
                    // Commit the no-op transaction; a miss is a value here.
                    None => return Ok(None),
                }
            };

            project.materials = fetch_materials_for_project(tx, project_id)?;
            project.steps = fetch_steps_for_project(tx, project_id)?;
            project.categories = fetch_categories_for_project(tx, project_id)?;
            Ok(Some(project))
        });

        match &result {
            Ok(found) => info!(
                "event=project_fetch module=repo status=ok duration_ms={} project_id={} found={}",
                started_at.elapsed().as_millis(),
                project_id,
                found.is_some()
            ),
            Err(err) => error!(
                "event=project_fetch module=repo status=error duration_ms={} project_id={} error={}",
                started_at.elapsed().as_millis(),
                project_id,
                err
            ),
        }

        result
    }
}

fn fetch_materials_for_project(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> RepoResult<Vec<Material>> {
    let mut stmt = tx.prepare(
        "SELECT
            material_id,
            project_id,
            material_name,
            num_required,
            cost
         FROM material
         WHERE project_id = ?1;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut materials = Vec::new();

    while let Some(row) = rows.next()? {
        materials.push(parse_material_row(row)?);
    }

    Ok(materials)
}

fn fetch_steps_for_project(tx: &Transaction<'_>, project_id: ProjectId) -> RepoResult<Vec<Step>> {
    let mut stmt = tx.prepare(
        "SELECT
            step_id,
            project_id,
            step_text,
            step_order
         FROM step
         WHERE project_id = ?1;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut steps = Vec::new();

    while let Some(row) = rows.next()? {
        steps.push(parse_step_row(row)?);
    }

    Ok(steps)
}

// Join multiplicity is preserved: duplicate project_category rows yield
// duplicate categories.
fn fetch_categories_for_project(
    tx: &Transaction<'_>,
    project_id: ProjectId,
) -> RepoResult<Vec<Category>> {
    let mut stmt = tx.prepare(
        "SELECT
            c.category_id,
            c.category_name
         FROM category c
         INNER JOIN project_category pc ON pc.category_id = c.category_id
         WHERE pc.project_id = ?1;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut categories = Vec::new();

    while let Some(row) = rows.next()? {
        categories.push(parse_category_row(row)?);
    }

    Ok(categories)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        project_id: Some(row.get("project_id")?),
        project_name: row.get("project_name")?,
        estimated_hours: row.get("estimated_hours")?,
        actual_hours: row.get("actual_hours")?,
        difficulty: row.get("difficulty")?,
        notes: row.get("notes")?,
        materials: Vec::new(),
        steps: Vec::new(),
        categories: Vec::new(),
    })
}

fn parse_material_row(row: &Row<'_>) -> RepoResult<Material> {
    Ok(Material {
        material_id: Some(row.get("material_id")?),
        project_id: Some(row.get("project_id")?),
        material_name: row.get("material_name")?,
        num_required: row.get("num_required")?,
        cost: row.get("cost")?,
    })
}

fn parse_step_row(row: &Row<'_>) -> RepoResult<Step> {
    Ok(Step {
        step_id: Some(row.get("step_id")?),
        project_id: Some(row.get("project_id")?),
        step_text: row.get("step_text")?,
        step_order: row.get("step_order")?,
    })
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        category_id: Some(row.get("category_id")?),
        category_name: row.get("category_name")?,
    })
}
