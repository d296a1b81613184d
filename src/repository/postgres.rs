use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, query_builder::QueryBuilder, types::Json};

use super::Repository;
use crate::{
    error::{RepoError, RepoResult},
    models::{
        ContactInfo, ContactInfoInput, ContactInfoPatch, ContentFilter, ContentSection,
        ContentSectionInput, ContentSectionPatch, HomeStats, HomeStatsInput, HomeStatsPatch,
        Project, ProjectFilter, ProjectInput, ProjectPatch, Section, Service, ServiceInput,
        ServicePatch, Testimonial, TestimonialFilter, TestimonialInput, TestimonialPatch,
    },
};

// --- Column lists (kept in one place so every RETURNING matches its row type) ---

const PROJECT_COLUMNS: &str = r#"id, title, description, image, image_url_fallback, tags, link,
    featured, "order", created_at, updated_at"#;
const TESTIMONIAL_COLUMNS: &str = r#"id, name, role, company, content, image,
    image_url_fallback, rating, featured, "order", created_at, updated_at"#;
const SERVICE_COLUMNS: &str = r#"id, title, description, icon, "order", created_at, updated_at"#;
const HOME_STATS_COLUMNS: &str = r#"id, label, value, "order""#;
const CONTENT_COLUMNS: &str =
    "id, section, title, subtitle, content, image, image_url_fallback, updated_at";
const CONTACT_COLUMNS: &str = "id, email, phone, address, social_links, updated_at";

// --- Row types ---
//
// Rows mirror the table layout (BIGSERIAL ids, JSONB columns) and are turned
// into the backend-neutral records before leaving this module.

#[derive(FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    description: String,
    image: Option<String>,
    image_url_fallback: Option<String>,
    tags: Json<Vec<String>>,
    link: Option<String>,
    featured: bool,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            image: row.image,
            image_url_fallback: row.image_url_fallback,
            tags: row.tags.0,
            link: row.link,
            featured: row.featured,
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct TestimonialRow {
    id: i64,
    name: String,
    role: String,
    company: String,
    content: String,
    image: Option<String>,
    image_url_fallback: Option<String>,
    rating: i32,
    featured: bool,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TestimonialRow> for Testimonial {
    fn from(row: TestimonialRow) -> Self {
        Testimonial {
            id: row.id.to_string(),
            name: row.name,
            role: row.role,
            company: row.company,
            content: row.content,
            image: row.image,
            image_url_fallback: row.image_url_fallback,
            rating: row.rating,
            featured: row.featured,
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ServiceRow {
    id: i64,
    title: String,
    description: String,
    icon: String,
    order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            icon: row.icon,
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct HomeStatsRow {
    id: i64,
    label: String,
    value: String,
    order: i32,
}

impl From<HomeStatsRow> for HomeStats {
    fn from(row: HomeStatsRow) -> Self {
        HomeStats {
            id: row.id.to_string(),
            label: row.label,
            value: row.value,
            order: row.order,
        }
    }
}

#[derive(FromRow)]
struct ContentSectionRow {
    id: i64,
    section: String,
    title: String,
    subtitle: Option<String>,
    content: String,
    image: Option<String>,
    image_url_fallback: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContentSectionRow> for ContentSection {
    type Error = RepoError;

    fn try_from(row: ContentSectionRow) -> Result<Self, Self::Error> {
        let section: Section = row
            .section
            .parse()
            .map_err(|e| RepoError::Database(sqlx::Error::Decode(Box::new(e))))?;
        Ok(ContentSection {
            id: row.id.to_string(),
            section,
            title: row.title,
            subtitle: row.subtitle,
            content: row.content,
            image: row.image,
            image_url_fallback: row.image_url_fallback,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ContactInfoRow {
    id: i64,
    email: String,
    phone: String,
    address: String,
    social_links: Json<BTreeMap<String, String>>,
    updated_at: DateTime<Utc>,
}

impl From<ContactInfoRow> for ContactInfo {
    fn from(row: ContactInfoRow) -> Self {
        ContactInfo {
            id: row.id.to_string(),
            email: row.email,
            phone: row.phone,
            address: row.address,
            social_links: row.social_links.0,
            updated_at: row.updated_at,
        }
    }
}

/// Ids on this store are BIGSERIAL values. Anything else cannot name a row.
fn row_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

/// Maps unique-constraint violations (SQLSTATE 23505) to `RepoError::Conflict`.
fn map_write_error(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return RepoError::Conflict(db_err.message().to_string());
        }
    }
    RepoError::Database(err)
}

/// PostgresRepository
///
/// The relational implementation of the `Repository` trait. Ordering, the
/// featured filter and the limit are pushed down into SQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_row(&self, table: &str, id: &str) -> RepoResult<bool> {
        let Some(id) = row_id(id) else {
            return Ok(false);
        };
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("DELETE FROM {table} WHERE id = "));
        builder.push_bind(id);
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Projects ---

    /// list_projects
    ///
    /// Builds the filter with QueryBuilder so user-supplied values are always bound.
    async fn list_projects(&self, filter: ProjectFilter) -> RepoResult<Vec<Project>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));
        if filter.featured_only {
            builder.push(" WHERE featured = true");
        }
        builder.push(r#" ORDER BY "order" ASC, id ASC"#);
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Project::from))
    }

    async fn create_project(&self, input: ProjectInput) -> RepoResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"INSERT INTO projects
                (title, description, image, image_url_fallback, tags, link, featured, "order")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(input.image)
        .bind(input.image_url_fallback)
        .bind(Json(input.tags))
        .bind(input.link)
        .bind(input.featured)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    /// update_project
    ///
    /// `COALESCE` keeps the stored column whenever the patch field is `None`.
    async fn update_project(&self, id: &str, patch: ProjectPatch) -> RepoResult<Option<Project>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"UPDATE projects
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   image = COALESCE($4, image),
                   image_url_fallback = COALESCE($5, image_url_fallback),
                   tags = COALESCE($6, tags),
                   link = COALESCE($7, link),
                   featured = COALESCE($8, featured),
                   "order" = COALESCE($9, "order"),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {PROJECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.image)
        .bind(patch.image_url_fallback)
        .bind(patch.tags.map(Json))
        .bind(patch.link)
        .bind(patch.featured)
        .bind(patch.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.map(Project::from))
    }

    async fn delete_project(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("projects", id).await
    }

    // --- Testimonials ---

    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TESTIMONIAL_COLUMNS} FROM testimonials"));
        if filter.featured_only {
            builder.push(" WHERE featured = true");
        }
        builder.push(r#" ORDER BY "order" ASC, id ASC"#);

        let rows = builder
            .build_query_as::<TestimonialRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Testimonial::from).collect())
    }

    async fn get_testimonial(&self, id: &str) -> RepoResult<Option<Testimonial>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Testimonial::from))
    }

    async fn create_testimonial(&self, input: TestimonialInput) -> RepoResult<Testimonial> {
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            r#"INSERT INTO testimonials
                (name, role, company, content, image, image_url_fallback, rating, featured, "order")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING {TESTIMONIAL_COLUMNS}"#
        ))
        .bind(input.name)
        .bind(input.role)
        .bind(input.company)
        .bind(input.content)
        .bind(input.image)
        .bind(input.image_url_fallback)
        .bind(input.rating)
        .bind(input.featured)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    async fn update_testimonial(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> RepoResult<Option<Testimonial>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, TestimonialRow>(&format!(
            r#"UPDATE testimonials
               SET name = COALESCE($2, name),
                   role = COALESCE($3, role),
                   company = COALESCE($4, company),
                   content = COALESCE($5, content),
                   image = COALESCE($6, image),
                   image_url_fallback = COALESCE($7, image_url_fallback),
                   rating = COALESCE($8, rating),
                   featured = COALESCE($9, featured),
                   "order" = COALESCE($10, "order"),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {TESTIMONIAL_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.role)
        .bind(patch.company)
        .bind(patch.content)
        .bind(patch.image)
        .bind(patch.image_url_fallback)
        .bind(patch.rating)
        .bind(patch.featured)
        .bind(patch.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.map(Testimonial::from))
    }

    async fn delete_testimonial(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("testimonials", id).await
    }

    // --- Services ---

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"SELECT {SERVICE_COLUMNS} FROM services ORDER BY "order" ASC, id ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_service(&self, id: &str) -> RepoResult<Option<Service>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Service::from))
    }

    async fn create_service(&self, input: ServiceInput) -> RepoResult<Service> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"INSERT INTO services (title, description, icon, "order")
               VALUES ($1, $2, $3, $4)
               RETURNING {SERVICE_COLUMNS}"#
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(input.icon)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    async fn update_service(&self, id: &str, patch: ServicePatch) -> RepoResult<Option<Service>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"UPDATE services
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   icon = COALESCE($4, icon),
                   "order" = COALESCE($5, "order"),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {SERVICE_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.icon)
        .bind(patch.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.map(Service::from))
    }

    async fn delete_service(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("services", id).await
    }

    // --- Home Stats ---

    async fn list_home_stats(&self) -> RepoResult<Vec<HomeStats>> {
        let rows = sqlx::query_as::<_, HomeStatsRow>(&format!(
            r#"SELECT {HOME_STATS_COLUMNS} FROM home_stats ORDER BY "order" ASC, id ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(HomeStats::from).collect())
    }

    async fn get_home_stat(&self, id: &str) -> RepoResult<Option<HomeStats>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, HomeStatsRow>(&format!(
            "SELECT {HOME_STATS_COLUMNS} FROM home_stats WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(HomeStats::from))
    }

    async fn create_home_stat(&self, input: HomeStatsInput) -> RepoResult<HomeStats> {
        let row = sqlx::query_as::<_, HomeStatsRow>(&format!(
            r#"INSERT INTO home_stats (label, value, "order")
               VALUES ($1, $2, $3)
               RETURNING {HOME_STATS_COLUMNS}"#
        ))
        .bind(input.label)
        .bind(input.value)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    async fn update_home_stat(
        &self,
        id: &str,
        patch: HomeStatsPatch,
    ) -> RepoResult<Option<HomeStats>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        // No timestamps on this table.
        let row = sqlx::query_as::<_, HomeStatsRow>(&format!(
            r#"UPDATE home_stats
               SET label = COALESCE($2, label),
                   value = COALESCE($3, value),
                   "order" = COALESCE($4, "order")
               WHERE id = $1
               RETURNING {HOME_STATS_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.label)
        .bind(patch.value)
        .bind(patch.order)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.map(HomeStats::from))
    }

    async fn delete_home_stat(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("home_stats", id).await
    }

    // --- Content Sections ---

    async fn list_content_sections(
        &self,
        filter: ContentFilter,
    ) -> RepoResult<Vec<ContentSection>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {CONTENT_COLUMNS} FROM content_sections"));
        if let Some(section) = filter.section {
            builder.push(" WHERE section = ");
            builder.push_bind(section.as_str());
        }
        builder.push(" ORDER BY id ASC");

        let rows = builder
            .build_query_as::<ContentSectionRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(ContentSection::try_from).collect()
    }

    async fn get_content_section(&self, id: &str) -> RepoResult<Option<ContentSection>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ContentSectionRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content_sections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContentSection::try_from).transpose()
    }

    async fn create_content_section(
        &self,
        input: ContentSectionInput,
    ) -> RepoResult<ContentSection> {
        let row = sqlx::query_as::<_, ContentSectionRow>(&format!(
            r#"INSERT INTO content_sections
                (section, title, subtitle, content, image, image_url_fallback)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {CONTENT_COLUMNS}"#
        ))
        .bind(input.section.as_str())
        .bind(input.title)
        .bind(input.subtitle)
        .bind(input.content)
        .bind(input.image)
        .bind(input.image_url_fallback)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        row.try_into()
    }

    async fn update_content_section(
        &self,
        id: &str,
        patch: ContentSectionPatch,
    ) -> RepoResult<Option<ContentSection>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ContentSectionRow>(&format!(
            r#"UPDATE content_sections
               SET section = COALESCE($2, section),
                   title = COALESCE($3, title),
                   subtitle = COALESCE($4, subtitle),
                   content = COALESCE($5, content),
                   image = COALESCE($6, image),
                   image_url_fallback = COALESCE($7, image_url_fallback),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {CONTENT_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.section.map(|s| s.as_str()))
        .bind(patch.title)
        .bind(patch.subtitle)
        .bind(patch.content)
        .bind(patch.image)
        .bind(patch.image_url_fallback)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        row.map(ContentSection::try_from).transpose()
    }

    async fn delete_content_section(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("content_sections", id).await
    }

    // --- Contact Info ---

    async fn list_contact_info(&self) -> RepoResult<Vec<ContactInfo>> {
        let rows = sqlx::query_as::<_, ContactInfoRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_info ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ContactInfo::from).collect())
    }

    async fn get_contact_info(&self, id: &str) -> RepoResult<Option<ContactInfo>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ContactInfoRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_info WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ContactInfo::from))
    }

    async fn create_contact_info(&self, input: ContactInfoInput) -> RepoResult<ContactInfo> {
        let row = sqlx::query_as::<_, ContactInfoRow>(&format!(
            r#"INSERT INTO contact_info (email, phone, address, social_links)
               VALUES ($1, $2, $3, $4)
               RETURNING {CONTACT_COLUMNS}"#
        ))
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .bind(Json(input.social_links))
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.into())
    }

    async fn update_contact_info(
        &self,
        id: &str,
        patch: ContactInfoPatch,
    ) -> RepoResult<Option<ContactInfo>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, ContactInfoRow>(&format!(
            r#"UPDATE contact_info
               SET email = COALESCE($2, email),
                   phone = COALESCE($3, phone),
                   address = COALESCE($4, address),
                   social_links = COALESCE($5, social_links),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {CONTACT_COLUMNS}"#
        ))
        .bind(id)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.address)
        .bind(patch.social_links.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(row.map(ContactInfo::from))
    }

    async fn delete_contact_info(&self, id: &str) -> RepoResult<bool> {
        self.delete_row("contact_info", id).await
    }
}
