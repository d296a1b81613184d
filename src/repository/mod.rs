use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

use crate::{
    config::{AppConfig, DataBackend},
    error::{RepoError, RepoResult},
    models::{
        ContactInfo, ContactInfoInput, ContactInfoPatch, ContentFilter, ContentSection,
        ContentSectionInput, ContentSectionPatch, HomeStats, HomeStatsInput, HomeStatsPatch,
        Project, ProjectFilter, ProjectInput, ProjectPatch, Service, ServiceInput, ServicePatch,
        Testimonial, TestimonialFilter, TestimonialInput, TestimonialPatch,
    },
};

pub mod firestore;
pub mod memory;
pub mod postgres;

pub use firestore::FirestoreRepository;
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// Abstract contract for every persistence operation on the six content
/// entities. Handlers and the seeder talk only to this trait, so the
/// relational store, the document store and the in-memory store are
/// interchangeable.
///
/// Conventions shared by all implementations:
/// - Lists are sorted by `order` ascending, ties in identifier order.
/// - `get_*`, `update_*` return `Ok(None)` and `delete_*` returns `Ok(false)`
///   for an unknown id, including ids the backend cannot even parse.
/// - `update_*` writes only the fields that are `Some` in the patch and
///   refreshes `updated_at`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Projects ---
    async fn list_projects(&self, filter: ProjectFilter) -> RepoResult<Vec<Project>>;
    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>>;
    async fn create_project(&self, input: ProjectInput) -> RepoResult<Project>;
    async fn update_project(&self, id: &str, patch: ProjectPatch) -> RepoResult<Option<Project>>;
    async fn delete_project(&self, id: &str) -> RepoResult<bool>;

    // --- Testimonials ---
    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>>;
    async fn get_testimonial(&self, id: &str) -> RepoResult<Option<Testimonial>>;
    async fn create_testimonial(&self, input: TestimonialInput) -> RepoResult<Testimonial>;
    async fn update_testimonial(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> RepoResult<Option<Testimonial>>;
    async fn delete_testimonial(&self, id: &str) -> RepoResult<bool>;

    // --- Services ---
    async fn list_services(&self) -> RepoResult<Vec<Service>>;
    async fn get_service(&self, id: &str) -> RepoResult<Option<Service>>;
    async fn create_service(&self, input: ServiceInput) -> RepoResult<Service>;
    async fn update_service(&self, id: &str, patch: ServicePatch) -> RepoResult<Option<Service>>;
    async fn delete_service(&self, id: &str) -> RepoResult<bool>;

    // --- Home Stats ---
    async fn list_home_stats(&self) -> RepoResult<Vec<HomeStats>>;
    async fn get_home_stat(&self, id: &str) -> RepoResult<Option<HomeStats>>;
    async fn create_home_stat(&self, input: HomeStatsInput) -> RepoResult<HomeStats>;
    async fn update_home_stat(
        &self,
        id: &str,
        patch: HomeStatsPatch,
    ) -> RepoResult<Option<HomeStats>>;
    async fn delete_home_stat(&self, id: &str) -> RepoResult<bool>;

    // --- Content Sections ---
    async fn list_content_sections(&self, filter: ContentFilter)
    -> RepoResult<Vec<ContentSection>>;
    async fn get_content_section(&self, id: &str) -> RepoResult<Option<ContentSection>>;
    /// The relational store rejects a second record for the same section with
    /// `RepoError::Conflict`; the document store accepts it.
    async fn create_content_section(
        &self,
        input: ContentSectionInput,
    ) -> RepoResult<ContentSection>;
    async fn update_content_section(
        &self,
        id: &str,
        patch: ContentSectionPatch,
    ) -> RepoResult<Option<ContentSection>>;
    async fn delete_content_section(&self, id: &str) -> RepoResult<bool>;

    // --- Contact Info ---
    async fn list_contact_info(&self) -> RepoResult<Vec<ContactInfo>>;
    async fn get_contact_info(&self, id: &str) -> RepoResult<Option<ContactInfo>>;
    async fn create_contact_info(&self, input: ContactInfoInput) -> RepoResult<ContactInfo>;
    async fn update_contact_info(
        &self,
        id: &str,
        patch: ContactInfoPatch,
    ) -> RepoResult<Option<ContactInfo>>;
    async fn delete_contact_info(&self, id: &str) -> RepoResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// connect
///
/// Builds the content store selected by `config.backend`. The relational store
/// gets its schema migrations applied before it is handed out.
pub async fn connect(config: &AppConfig) -> RepoResult<RepositoryState> {
    match config.backend {
        DataBackend::Postgres => {
            let db_url = config
                .db_url
                .as_deref()
                .ok_or(RepoError::NotConfigured("DATABASE_URL"))?;
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("postgres content store ready");
            Ok(Arc::new(PostgresRepository::new(pool)))
        }
        DataBackend::Firestore => {
            let firestore = config
                .firestore
                .as_ref()
                .ok_or(RepoError::NotConfigured("FIREBASE_SERVICE_ACCOUNT_PATH"))?;
            let repo = FirestoreRepository::from_config(firestore).await?;
            tracing::info!(project = %repo.project_id(), "firestore content store ready");
            Ok(Arc::new(repo))
        }
        DataBackend::Memory => {
            tracing::warn!("using the in-memory content store; data is lost on exit");
            Ok(Arc::new(InMemoryRepository::new()))
        }
    }
}

// --- Shared list post-processing for stores that filter in process ---

pub(crate) fn filter_projects(mut items: Vec<Project>, filter: ProjectFilter) -> Vec<Project> {
    if filter.featured_only {
        items.retain(|p| p.featured);
    }
    // Stable: equal `order` keeps the store's identifier order.
    items.sort_by_key(|p| p.order);
    if let Some(limit) = filter.limit {
        items.truncate(limit);
    }
    items
}

pub(crate) fn filter_testimonials(
    mut items: Vec<Testimonial>,
    filter: TestimonialFilter,
) -> Vec<Testimonial> {
    if filter.featured_only {
        items.retain(|t| t.featured);
    }
    items.sort_by_key(|t| t.order);
    items
}

pub(crate) fn filter_content(
    mut items: Vec<ContentSection>,
    filter: ContentFilter,
) -> Vec<ContentSection> {
    if let Some(section) = filter.section {
        items.retain(|c| c.section == section);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(id: &str, order: i32, featured: bool) -> Project {
        let now = Utc::now();
        Project {
            id: id.into(),
            title: format!("p{id}"),
            description: String::new(),
            image: None,
            image_url_fallback: None,
            tags: vec![],
            link: None,
            featured,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn limit_applies_after_ordering() {
        let items = vec![
            project("1", 4, true),
            project("2", 0, false),
            project("3", 2, true),
            project("4", 1, true),
            project("5", 3, false),
        ];
        let out = filter_projects(
            items,
            ProjectFilter {
                featured_only: false,
                limit: Some(2),
            },
        );
        let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "4"]);
    }

    #[test]
    fn featured_then_limit() {
        let items = vec![
            project("1", 4, true),
            project("2", 0, false),
            project("3", 2, true),
            project("4", 1, true),
        ];
        let out = filter_projects(
            items,
            ProjectFilter {
                featured_only: true,
                limit: Some(2),
            },
        );
        let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["4", "3"]);
    }

    #[test]
    fn equal_order_keeps_identifier_order() {
        let items = vec![project("1", 0, false), project("2", 0, false)];
        let out = filter_projects(items, ProjectFilter::default());
        assert_eq!(out[0].id, "1");
        assert_eq!(out[1].id, "2");
    }
}
