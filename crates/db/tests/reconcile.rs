//! Integration tests for the orphan file reconciliation pass.

use sqlx::PgPool;

use bureau_db::models::customer::CreateCustomer;
use bureau_db::models::project::CreateProject;
use bureau_db::models::project_file::CreateProjectFile;
use bureau_db::repositories::{CustomerRepo, ProjectFileRepo, ProjectRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_customer(pool: &PgPool, email: &str) -> i64 {
    CustomerRepo::create(
        pool,
        &CreateCustomer {
            first_name: "Noor".to_string(),
            last_name: "Haddad".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
            company: None,
            phone: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_project(pool: &PgPool, customer_id: i64, name: &str) -> bureau_db::models::project::Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            customer_id,
            quote_id: None,
            name: name.to_string(),
            client: "Noor Haddad".to_string(),
            status_id: None,
            budget: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_orphan(pool: &PgPool, customer_id: i64, name: &str) -> i64 {
    ProjectFileRepo::create(
        pool,
        &CreateProjectFile {
            customer_id,
            project_id: None,
            name: name.to_string(),
            original_name: name.to_string(),
            file_path: format!("/uploads/lost+found/{name}"),
            size_bytes: 1024,
            mime_type: Some("application/pdf".to_string()),
            uploaded_by_admin: false,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: orphans land in the customer's first project, paths rewritten
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn orphans_map_to_first_project_with_rewritten_paths(pool: PgPool) {
    let customer_id = seed_customer(&pool, "orphans@example.com").await;
    let first = seed_project(&pool, customer_id, "First engagement").await;
    let _second = seed_project(&pool, customer_id, "Second engagement").await;

    let file_a = seed_orphan(&pool, customer_id, "brief.pdf").await;
    let file_b = seed_orphan(&pool, customer_id, "wireframes.fig").await;

    let outcome = ProjectFileRepo::reconcile_orphans(&pool).await.unwrap();
    assert_eq!(outcome.associated, 2);
    assert!(outcome.unmatched.is_empty());

    let prefix = format!("/uploads/projects/{}/", first.folder_number);
    for id in [file_a, file_b] {
        let file = ProjectFileRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(file.project_id, Some(first.id));
        assert!(
            file.file_path.starts_with(&prefix),
            "path {} should start with {prefix}",
            file.file_path
        );
    }

    // The files now show up in the project listing.
    let files = ProjectFileRepo::list_for_project(&pool, first.id).await.unwrap();
    assert_eq!(files.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: reconciliation is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_run_associates_nothing(pool: PgPool) {
    let customer_id = seed_customer(&pool, "idempotent@example.com").await;
    let project = seed_project(&pool, customer_id, "Only project").await;
    seed_orphan(&pool, customer_id, "scope.docx").await;

    let first_run = ProjectFileRepo::reconcile_orphans(&pool).await.unwrap();
    assert_eq!(first_run.associated, 1);

    let second_run = ProjectFileRepo::reconcile_orphans(&pool).await.unwrap();
    assert_eq!(second_run.associated, 0, "repeat run must be a no-op");
    assert!(second_run.mappings.is_empty());

    // The association from the first run is untouched.
    let files = ProjectFileRepo::list_for_project(&pool, project.id).await.unwrap();
    assert_eq!(files.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: files without a project for their customer stay orphaned
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn customers_without_projects_keep_orphans(pool: PgPool) {
    let with_project = seed_customer(&pool, "has-project@example.com").await;
    let without_project = seed_customer(&pool, "no-project@example.com").await;

    seed_project(&pool, with_project, "Live engagement").await;
    seed_orphan(&pool, with_project, "notes.md").await;
    let stranded = seed_orphan(&pool, without_project, "stranded.zip").await;

    let outcome = ProjectFileRepo::reconcile_orphans(&pool).await.unwrap();
    assert_eq!(outcome.associated, 1);
    assert_eq!(outcome.unmatched, vec![stranded]);

    let file = ProjectFileRepo::find_by_id(&pool, stranded).await.unwrap().unwrap();
    assert_eq!(file.project_id, None);
    assert!(file.file_path.starts_with("/uploads/lost+found/"));
}

// ---------------------------------------------------------------------------
// Test: earliest-created project wins
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn earliest_project_wins(pool: PgPool) {
    let customer_id = seed_customer(&pool, "ordering@example.com").await;
    let earliest = seed_project(&pool, customer_id, "Earliest").await;
    seed_project(&pool, customer_id, "Middle").await;
    seed_project(&pool, customer_id, "Latest").await;

    seed_orphan(&pool, customer_id, "asset.png").await;

    let outcome = ProjectFileRepo::reconcile_orphans(&pool).await.unwrap();
    assert_eq!(outcome.associated, 1);
    assert_eq!(outcome.mappings[0].project_id, earliest.id);
}
