use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{Repository, filter_content, filter_projects, filter_testimonials};
use crate::{
    error::{RepoError, RepoResult},
    models::{
        ContactInfo, ContactInfoInput, ContactInfoPatch, ContentFilter, ContentSection,
        ContentSectionInput, ContentSectionPatch, HomeStats, HomeStatsInput, HomeStatsPatch,
        Project, ProjectFilter, ProjectInput, ProjectPatch, Section, Service, ServiceInput,
        ServicePatch, Testimonial, TestimonialFilter, TestimonialInput, TestimonialPatch,
    },
};

#[derive(Default)]
struct Tables {
    next_id: u64,
    projects: Vec<Project>,
    testimonials: Vec<Testimonial>,
    services: Vec<Service>,
    home_stats: Vec<HomeStats>,
    content_sections: Vec<ContentSection>,
    contact_info: Vec<ContactInfo>,
}

impl Tables {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn section_taken(&self, section: Section, except: Option<&str>) -> bool {
        self.content_sections
            .iter()
            .any(|c| c.section == section && Some(c.id.as_str()) != except)
    }
}

/// InMemoryRepository
///
/// Process-local content store for development and tests. Rows are kept in
/// insertion order (which is also ascending id order) and, like the relational
/// store, a section may hold at most one `ContentSection`.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written row behind:
    // every mutation below is a single push, assignment or removal.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find<T: Clone>(rows: &[T], id: &str, id_of: impl Fn(&T) -> &str) -> Option<T> {
    rows.iter().find(|row| id_of(row) == id).cloned()
}

fn remove<T>(rows: &mut Vec<T>, id: &str, id_of: impl Fn(&T) -> &str) -> bool {
    let before = rows.len();
    rows.retain(|row| id_of(row) != id);
    rows.len() != before
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- Projects ---

    async fn list_projects(&self, filter: ProjectFilter) -> RepoResult<Vec<Project>> {
        Ok(filter_projects(self.read().projects.clone(), filter))
    }

    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>> {
        Ok(find(&self.read().projects, id, |p| &p.id))
    }

    async fn create_project(&self, input: ProjectInput) -> RepoResult<Project> {
        let mut tables = self.write();
        let now = Utc::now();
        let project = Project {
            id: tables.allocate_id(),
            title: input.title,
            description: input.description,
            image: input.image,
            image_url_fallback: input.image_url_fallback,
            tags: input.tags,
            link: input.link,
            featured: input.featured,
            order: input.order,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &str, patch: ProjectPatch) -> RepoResult<Option<Project>> {
        let mut tables = self.write();
        Ok(tables.projects.iter_mut().find(|p| p.id == id).map(|p| {
            patch.apply(p);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete_project(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().projects, id, |p| &p.id))
    }

    // --- Testimonials ---

    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>> {
        Ok(filter_testimonials(self.read().testimonials.clone(), filter))
    }

    async fn get_testimonial(&self, id: &str) -> RepoResult<Option<Testimonial>> {
        Ok(find(&self.read().testimonials, id, |t| &t.id))
    }

    async fn create_testimonial(&self, input: TestimonialInput) -> RepoResult<Testimonial> {
        let mut tables = self.write();
        let now = Utc::now();
        let testimonial = Testimonial {
            id: tables.allocate_id(),
            name: input.name,
            role: input.role,
            company: input.company,
            content: input.content,
            image: input.image,
            image_url_fallback: input.image_url_fallback,
            rating: input.rating,
            featured: input.featured,
            order: input.order,
            created_at: now,
            updated_at: now,
        };
        tables.testimonials.push(testimonial.clone());
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> RepoResult<Option<Testimonial>> {
        let mut tables = self.write();
        Ok(tables.testimonials.iter_mut().find(|t| t.id == id).map(|t| {
            patch.apply(t);
            t.updated_at = Utc::now();
            t.clone()
        }))
    }

    async fn delete_testimonial(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().testimonials, id, |t| &t.id))
    }

    // --- Services ---

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let mut services = self.read().services.clone();
        services.sort_by_key(|s| s.order);
        Ok(services)
    }

    async fn get_service(&self, id: &str) -> RepoResult<Option<Service>> {
        Ok(find(&self.read().services, id, |s| &s.id))
    }

    async fn create_service(&self, input: ServiceInput) -> RepoResult<Service> {
        let mut tables = self.write();
        let now = Utc::now();
        let service = Service {
            id: tables.allocate_id(),
            title: input.title,
            description: input.description,
            icon: input.icon,
            order: input.order,
            created_at: now,
            updated_at: now,
        };
        tables.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: &str, patch: ServicePatch) -> RepoResult<Option<Service>> {
        let mut tables = self.write();
        Ok(tables.services.iter_mut().find(|s| s.id == id).map(|s| {
            patch.apply(s);
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn delete_service(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().services, id, |s| &s.id))
    }

    // --- Home Stats ---

    async fn list_home_stats(&self) -> RepoResult<Vec<HomeStats>> {
        let mut stats = self.read().home_stats.clone();
        stats.sort_by_key(|s| s.order);
        Ok(stats)
    }

    async fn get_home_stat(&self, id: &str) -> RepoResult<Option<HomeStats>> {
        Ok(find(&self.read().home_stats, id, |s| &s.id))
    }

    async fn create_home_stat(&self, input: HomeStatsInput) -> RepoResult<HomeStats> {
        let mut tables = self.write();
        let stat = HomeStats {
            id: tables.allocate_id(),
            label: input.label,
            value: input.value,
            order: input.order,
        };
        tables.home_stats.push(stat.clone());
        Ok(stat)
    }

    async fn update_home_stat(
        &self,
        id: &str,
        patch: HomeStatsPatch,
    ) -> RepoResult<Option<HomeStats>> {
        let mut tables = self.write();
        Ok(tables.home_stats.iter_mut().find(|s| s.id == id).map(|s| {
            patch.apply(s);
            s.clone()
        }))
    }

    async fn delete_home_stat(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().home_stats, id, |s| &s.id))
    }

    // --- Content Sections ---

    async fn list_content_sections(
        &self,
        filter: ContentFilter,
    ) -> RepoResult<Vec<ContentSection>> {
        Ok(filter_content(self.read().content_sections.clone(), filter))
    }

    async fn get_content_section(&self, id: &str) -> RepoResult<Option<ContentSection>> {
        Ok(find(&self.read().content_sections, id, |c| &c.id))
    }

    async fn create_content_section(
        &self,
        input: ContentSectionInput,
    ) -> RepoResult<ContentSection> {
        let mut tables = self.write();
        if tables.section_taken(input.section, None) {
            return Err(RepoError::Conflict(format!(
                "content section with this section already exists: {}",
                input.section
            )));
        }
        let section = ContentSection {
            id: tables.allocate_id(),
            section: input.section,
            title: input.title,
            subtitle: input.subtitle,
            content: input.content,
            image: input.image,
            image_url_fallback: input.image_url_fallback,
            updated_at: Utc::now(),
        };
        tables.content_sections.push(section.clone());
        Ok(section)
    }

    async fn update_content_section(
        &self,
        id: &str,
        patch: ContentSectionPatch,
    ) -> RepoResult<Option<ContentSection>> {
        let mut tables = self.write();
        let Some(index) = tables.content_sections.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(section) = patch.section {
            if tables.section_taken(section, Some(id)) {
                return Err(RepoError::Conflict(format!(
                    "content section with this section already exists: {section}"
                )));
            }
        }
        let row = &mut tables.content_sections[index];
        patch.apply(row);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_content_section(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().content_sections, id, |c| &c.id))
    }

    // --- Contact Info ---

    async fn list_contact_info(&self) -> RepoResult<Vec<ContactInfo>> {
        Ok(self.read().contact_info.clone())
    }

    async fn get_contact_info(&self, id: &str) -> RepoResult<Option<ContactInfo>> {
        Ok(find(&self.read().contact_info, id, |c| &c.id))
    }

    async fn create_contact_info(&self, input: ContactInfoInput) -> RepoResult<ContactInfo> {
        let mut tables = self.write();
        let info = ContactInfo {
            id: tables.allocate_id(),
            email: input.email,
            phone: input.phone,
            address: input.address,
            social_links: input.social_links,
            updated_at: Utc::now(),
        };
        tables.contact_info.push(info.clone());
        Ok(info)
    }

    async fn update_contact_info(
        &self,
        id: &str,
        patch: ContactInfoPatch,
    ) -> RepoResult<Option<ContactInfo>> {
        let mut tables = self.write();
        Ok(tables.contact_info.iter_mut().find(|c| c.id == id).map(|c| {
            patch.apply(c);
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete_contact_info(&self, id: &str) -> RepoResult<bool> {
        Ok(remove(&mut self.write().contact_info, id, |c| &c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_input(section: Section) -> ContentSectionInput {
        ContentSectionInput {
            section,
            title: "T".into(),
            subtitle: None,
            content: "C".into(),
            image: None,
            image_url_fallback: None,
        }
    }

    #[tokio::test]
    async fn ids_are_unique_across_tables() {
        let repo = InMemoryRepository::new();
        let stat = repo
            .create_home_stat(HomeStatsInput {
                label: "a".into(),
                value: "1".into(),
                order: 0,
            })
            .await
            .unwrap();
        let service = repo
            .create_service(ServiceInput {
                title: "s".into(),
                description: "d".into(),
                icon: "code".into(),
                order: 0,
            })
            .await
            .unwrap();
        assert_ne!(stat.id, service.id);
    }

    #[tokio::test]
    async fn duplicate_section_is_a_conflict() {
        let repo = InMemoryRepository::new();
        repo.create_content_section(section_input(Section::Hero))
            .await
            .unwrap();
        let err = repo
            .create_content_section(section_input(Section::Hero))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn moving_a_section_onto_a_taken_value_is_a_conflict() {
        let repo = InMemoryRepository::new();
        repo.create_content_section(section_input(Section::Hero))
            .await
            .unwrap();
        let about = repo
            .create_content_section(section_input(Section::About))
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
        assert!(matches!(err, RepoError::Conflict(_)));

        // Re-asserting its own section is fine.
        let same = repo
            .update_content_section(
                &about.id,
                ContentSectionPatch {
                    section: Some(Section::About),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn missing_section_id_is_not_found_even_when_section_is_taken() {
        let repo = InMemoryRepository::new();
        repo.create_content_section(section_input(Section::Hero))
            .await
            .unwrap();
        let result = repo
            .update_content_section(
                "999",
                ContentSectionPatch {
                    section: Some(Section::Hero),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_touches_updated_at_only_for_existing_rows() {
        let repo = InMemoryRepository::new();
        let created = repo
            .create_service(ServiceInput {
                title: "s".into(),
                description: "d".into(),
                icon: "code".into(),
                order: 0,
            })
            .await
            .unwrap();
        let updated = repo
            .update_service(
                &created.id,
                ServicePatch {
                    icon: Some("palette".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.icon, "palette");
        assert_eq!(updated.title, "s");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        assert!(
            repo.update_service("missing", ServicePatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!repo.delete_service("missing").await.unwrap());
    }
}
