use craftplan_core::db::open_db_in_memory;
use craftplan_core::{
    Project, ProjectRepository, ProjectService, RepoError, ServiceError, SqliteProjectRepository,
};
use rusqlite::{params, Connection};

fn sample_project(name: &str) -> Project {
    let mut project = Project::new(name);
    project.estimated_hours = Some(12.5);
    project.actual_hours = Some(14.0);
    project.difficulty = Some(3);
    project.notes = Some("sand before painting".to_string());
    project
}

fn seed_material(conn: &Connection, project_id: i64, name: &str, num_required: i32, cost: f64) {
    conn.execute(
        "INSERT INTO material (project_id, material_name, num_required, cost)
         VALUES (?1, ?2, ?3, ?4);",
        params![project_id, name, num_required, cost],
    )
    .unwrap();
}

fn seed_step(conn: &Connection, project_id: i64, text: &str, order: i32) {
    conn.execute(
        "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, ?2, ?3);",
        params![project_id, text, order],
    )
    .unwrap();
}

fn seed_category(conn: &Connection, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO category (category_name) VALUES (?1);",
        [name],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn link_category(conn: &Connection, project_id: i64, category_id: i64) {
    conn.execute(
        "INSERT INTO project_category (project_id, category_id) VALUES (?1, ?2);",
        params![project_id, category_id],
    )
    .unwrap();
}

#[test]
fn insert_then_fetch_preserves_scalar_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);

    let inserted = repo.insert_project(sample_project("Bird house")).unwrap();
    let project_id = inserted.project_id.expect("insert must assign an id");

    let fetched = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(fetched.project_name, "Bird house");
    assert_eq!(fetched.estimated_hours, Some(12.5));
    assert_eq!(fetched.actual_hours, Some(14.0));
    assert_eq!(fetched.difficulty, Some(3));
    assert_eq!(fetched.notes.as_deref(), Some("sand before painting"));
    assert!(fetched.materials.is_empty());
    assert!(fetched.steps.is_empty());
    assert!(fetched.categories.is_empty());
}

#[test]
fn insert_accepts_nullable_fields_unset() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);

    let inserted = repo.insert_project(Project::new("Minimal")).unwrap();
    let fetched = repo
        .fetch_project_by_id(inserted.project_id.unwrap())
        .unwrap()
        .unwrap();

    assert_eq!(fetched.estimated_hours, None);
    assert_eq!(fetched.actual_hours, None);
    assert_eq!(fetched.difficulty, None);
    assert_eq!(fetched.notes, None);
}

#[test]
fn insert_rejects_blank_name_without_writing_a_row() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let err = repo.insert_project(Project::new("   ")).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM project;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn fetch_all_orders_by_name_and_returns_summaries_only() {
    let mut conn = open_db_in_memory().unwrap();

    let zebra_id = {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let zebra = repo.insert_project(Project::new("Zebra bench")).unwrap();
        repo.insert_project(Project::new("Arbor gate")).unwrap();
        repo.insert_project(Project::new("Mailbox post")).unwrap();
        zebra.project_id.unwrap()
    };

    // Child rows must never leak into the listing.
    seed_material(&conn, zebra_id, "oak plank", 4, 18.75);
    seed_step(&conn, zebra_id, "cut planks to length", 1);

    let mut repo = SqliteProjectRepository::new(&mut conn);
    let projects = repo.fetch_all_projects().unwrap();

    let names: Vec<&str> = projects
        .iter()
        .map(|project| project.project_name.as_str())
        .collect();
    assert_eq!(names, vec!["Arbor gate", "Mailbox post", "Zebra bench"]);
    for project in &projects {
        assert!(project.materials.is_empty());
        assert!(project.steps.is_empty());
        assert!(project.categories.is_empty());
    }
}

#[test]
fn fetch_all_on_empty_store_returns_empty_vec() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    assert!(repo.fetch_all_projects().unwrap().is_empty());
}

#[test]
fn repeated_listing_without_writes_is_identical() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    repo.insert_project(sample_project("Bird house")).unwrap();
    repo.insert_project(sample_project("Arbor gate")).unwrap();

    let first = repo.fetch_all_projects().unwrap();
    let second = repo.fetch_all_projects().unwrap();
    assert_eq!(first, second);
}

#[test]
fn fetch_by_id_hydrates_all_child_collections() {
    let mut conn = open_db_in_memory().unwrap();

    let project_id = {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let inserted = repo.insert_project(sample_project("Bird house")).unwrap();
        inserted.project_id.unwrap()
    };

    seed_material(&conn, project_id, "cedar board", 2, 9.5);
    seed_material(&conn, project_id, "wood glue", 1, 4.25);
    seed_step(&conn, project_id, "cut panels", 1);
    seed_step(&conn, project_id, "assemble box", 2);
    seed_step(&conn, project_id, "mount roof", 3);
    let outdoors = seed_category(&conn, "Outdoors");
    let woodworking = seed_category(&conn, "Woodworking");
    link_category(&conn, project_id, outdoors);
    link_category(&conn, project_id, woodworking);

    let mut repo = SqliteProjectRepository::new(&mut conn);
    let project = repo.fetch_project_by_id(project_id).unwrap().unwrap();

    assert_eq!(project.materials.len(), 2);
    assert_eq!(project.materials[0].material_name, "cedar board");
    assert_eq!(project.materials[0].num_required, Some(2));
    assert_eq!(project.materials[0].cost, Some(9.5));
    assert_eq!(project.materials[1].material_name, "wood glue");

    assert_eq!(project.steps.len(), 3);
    assert_eq!(project.steps[0].step_text, "cut panels");
    assert_eq!(project.steps[0].step_order, 1);
    assert_eq!(project.steps[2].step_text, "mount roof");

    assert_eq!(project.categories.len(), 2);
    let category_names: Vec<&str> = project
        .categories
        .iter()
        .map(|category| category.category_name.as_str())
        .collect();
    assert!(category_names.contains(&"Outdoors"));
    assert!(category_names.contains(&"Woodworking"));

    for material in &project.materials {
        assert_eq!(material.project_id, Some(project_id));
    }
    for step in &project.steps {
        assert_eq!(step.project_id, Some(project_id));
    }
}

#[test]
fn duplicate_join_rows_yield_duplicate_categories() {
    let mut conn = open_db_in_memory().unwrap();

    let project_id = {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let inserted = repo.insert_project(Project::new("Planter box")).unwrap();
        inserted.project_id.unwrap()
    };

    let gardening = seed_category(&conn, "Gardening");
    link_category(&conn, project_id, gardening);
    link_category(&conn, project_id, gardening);

    let mut repo = SqliteProjectRepository::new(&mut conn);
    let project = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(project.categories.len(), 2);
    assert_eq!(project.categories[0], project.categories[1]);
}

#[test]
fn repo_fetch_unknown_id_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    assert!(repo.fetch_project_by_id(9999).unwrap().is_none());
}

#[test]
fn hydration_fault_is_atomic_and_retry_succeeds() {
    let mut conn = open_db_in_memory().unwrap();

    let project_id = {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let inserted = repo.insert_project(sample_project("Bird house")).unwrap();
        inserted.project_id.unwrap()
    };
    seed_material(&conn, project_id, "cedar board", 2, 9.5);
    seed_step(&conn, project_id, "cut panels", 1);

    // Simulate a store fault after materials become readable: the step
    // query fails, so the whole fetch must fail with no partial aggregate.
    conn.execute_batch("ALTER TABLE step RENAME TO step_offline;")
        .unwrap();
    {
        let mut repo = SqliteProjectRepository::new(&mut conn);
        let err = repo.fetch_project_by_id(project_id).unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
    }

    conn.execute_batch("ALTER TABLE step_offline RENAME TO step;")
        .unwrap();
    let mut repo = SqliteProjectRepository::new(&mut conn);
    let project = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(project.materials.len(), 1);
    assert_eq!(project.steps.len(), 1);
}

#[test]
fn service_delegates_add_and_fetch() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&mut conn);
    let mut service = ProjectService::new(repo);

    let added = service.add_project(sample_project("Bird house")).unwrap();
    let project_id = added.project_id.unwrap();

    let fetched = service.fetch_project_by_id(project_id).unwrap();
    assert_eq!(fetched.project_name, "Bird house");

    let listed = service.fetch_all_projects().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].project_id, Some(project_id));
}

#[test]
fn service_fetch_unknown_id_fails_with_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::new(&mut conn);
    let mut service = ProjectService::new(repo);

    let err = service.fetch_project_by_id(4242).unwrap_err();
    assert!(err.to_string().contains("4242"));
    match err {
        ServiceError::NotFound(project_id) => assert_eq!(project_id, 4242),
        other => panic!("unexpected error: {other}"),
    }
}
