use portfolio_backend::{
    RepoError,
    models::{
        ContentFilter, ContentSectionInput, ContentSectionPatch, ProjectFilter, ProjectInput,
        ProjectPatch, Section,
    },
    repository::{PostgresRepository, Repository},
};
use serial_test::serial;
use sqlx::PgPool;

// --- Test Context and Setup ---

/// Pool over `DATABASE_URL` with migrations applied and every content table
/// emptied. These tests need a live Postgres; without `DATABASE_URL` they
/// return early.
struct DbTestContext {
    pool: PgPool,
}

impl DbTestContext {
    async fn setup() -> Option<Self> {
        dotenv::dotenv().ok();

        let Ok(db_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping postgres repository test");
            return None;
        };

        let pool = PgPool::connect(&db_url)
            .await
            .expect("Failed to connect to database for integration tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        sqlx::query(
            "TRUNCATE projects, testimonials, services, home_stats, content_sections, \
             contact_info RESTART IDENTITY",
        )
        .execute(&pool)
        .await
        .expect("Failed to reset content tables.");

        Some(DbTestContext { pool })
    }

    fn repository(&self) -> PostgresRepository {
        PostgresRepository::new(self.pool.clone())
    }
}

// --- Test Data Helpers ---

fn project(title: &str, featured: bool, order: i32) -> ProjectInput {
    ProjectInput {
        title: title.to_string(),
        description: "Integration fixture".to_string(),
        image: None,
        image_url_fallback: Some("https://cdn.example.com/cover.png".to_string()),
        tags: vec!["rust".to_string(), "sql".to_string()],
        link: Some("https://example.com".to_string()),
        featured,
        order,
    }
}

fn section(section: Section, title: &str) -> ContentSectionInput {
    ContentSectionInput {
        section,
        title: title.to_string(),
        subtitle: None,
        content: "Body".to_string(),
        image: None,
        image_url_fallback: None,
    }
}

fn titles<T>(items: &[T], title: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| title(i).to_string()).collect()
}

// --- Tests ---

#[tokio::test]
#[serial]
async fn test_list_projects_orders_filters_and_limits() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();

    repo.create_project(project("B", true, 1)).await.unwrap();
    repo.create_project(project("A", false, 0)).await.unwrap();
    repo.create_project(project("D", true, 1)).await.unwrap();
    repo.create_project(project("C", true, 2)).await.unwrap();

    // Equal `order` falls back to insertion (id) order.
    let all = repo.list_projects(ProjectFilter::default()).await.unwrap();
    assert_eq!(titles(&all, |p| &p.title), ["A", "B", "D", "C"]);

    let featured = repo
        .list_projects(ProjectFilter {
            featured_only: true,
            limit: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(titles(&featured, |p| &p.title), ["B", "D"]);

    let none = repo
        .list_projects(ProjectFilter {
            featured_only: false,
            limit: Some(0),
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn test_partial_update_keeps_omitted_columns() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();

    let created = repo.create_project(project("Original", true, 3)).await.unwrap();
    let updated = repo
        .update_project(
            &created.id,
            ProjectPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("project exists");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.tags, created.tags);
    assert_eq!(updated.link, created.link);
    assert_eq!(updated.image_url_fallback, created.image_url_fallback);
    assert!(updated.featured);
    assert_eq!(updated.order, 3);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
#[serial]
async fn test_duplicate_section_is_a_conflict() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();

    repo.create_content_section(section(Section::Hero, "Welcome"))
        .await
        .unwrap();
    let err = repo
        .create_content_section(section(Section::Hero, "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "{err:?}");

    let about = repo
        .create_content_section(section(Section::About, "About"))
        .await
        .unwrap();
    let err = repo
        .update_content_section(
            &about.id,
            ContentSectionPatch {
                section: Some(Section::Hero),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "{err:?}");

    let heroes = repo
        .list_content_sections(ContentFilter {
            section: Some(Section::Hero),
        })
        .await
        .unwrap();
    assert_eq!(titles(&heroes, |c| &c.title), ["Welcome"]);
}

#[tokio::test]
#[serial]
async fn test_unknown_and_non_numeric_ids_are_not_found() {
    let Some(ctx) = DbTestContext::setup().await else {
        return;
    };
    let repo = ctx.repository();

    assert!(repo.get_project("abc").await.unwrap().is_none());
    assert!(repo.get_project("999999").await.unwrap().is_none());
    assert!(
        repo.update_project("abc", ProjectPatch::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(!repo.delete_project("abc").await.unwrap());

    let missing = repo
        .update_content_section(
            "999999",
            ContentSectionPatch {
                section: Some(Section::Hero),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}
