use std::{fmt, str::FromStr};

use crate::{
    config::DataBackend,
    error::RepoResult,
    models::{ContentFilter, ProjectFilter, TestimonialFilter},
    repository::Repository,
};

pub mod defaults;

pub use defaults::SeedData;

/// SeedProfile
///
/// Which set of default payloads to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedProfile {
    /// Placeholder texts, two projects. Default for Postgres and in-memory stores.
    Starter,
    /// Demo studio content. Default for Firestore.
    Showcase,
}

impl SeedProfile {
    pub fn default_for(backend: DataBackend) -> Self {
        match backend {
            DataBackend::Firestore => SeedProfile::Showcase,
            DataBackend::Postgres | DataBackend::Memory => SeedProfile::Starter,
        }
    }

    pub fn data(self) -> SeedData {
        match self {
            SeedProfile::Starter => defaults::starter(),
            SeedProfile::Showcase => defaults::showcase(),
        }
    }
}

impl fmt::Display for SeedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedProfile::Starter => "starter",
            SeedProfile::Showcase => "showcase",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown seed profile \"{0}\" (expected starter or showcase)")]
pub struct UnknownProfile(String);

impl FromStr for SeedProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "starter" => Ok(SeedProfile::Starter),
            "showcase" => Ok(SeedProfile::Showcase),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

/// SeedReport
///
/// Human-readable labels of what one run inserted and what it left alone.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

impl SeedReport {
    fn created(&mut self, label: String) {
        tracing::info!(item = %label, "seeded");
        self.created.push(label);
    }

    fn skipped(&mut self, label: String) {
        tracing::info!(item = %label, "already exists");
        self.skipped.push(label);
    }
}

/// seed
///
/// Idempotent bootstrap. Content sections are keyed by their section value;
/// every other entity is seeded only when its collection is empty. Running it
/// twice leaves the store exactly as after the first run.
pub async fn seed(repo: &dyn Repository, profile: SeedProfile) -> RepoResult<SeedReport> {
    let data = profile.data();
    let mut report = SeedReport::default();
    tracing::info!(%profile, "seeding default content");

    for input in data.content_sections {
        let label = format!("content section {}", input.section);
        let existing = repo
            .list_content_sections(ContentFilter {
                section: Some(input.section),
            })
            .await?;
        if existing.is_empty() {
            repo.create_content_section(input).await?;
            report.created(label);
        } else {
            report.skipped(label);
        }
    }

    if repo.list_contact_info().await?.is_empty() {
        repo.create_contact_info(data.contact_info).await?;
        report.created("contact info".to_string());
    } else {
        report.skipped("contact info".to_string());
    }

    if repo.list_testimonials(TestimonialFilter::default()).await?.is_empty() {
        for input in data.testimonials {
            repo.create_testimonial(input).await?;
        }
        report.created("testimonials".to_string());
    } else {
        report.skipped("testimonials".to_string());
    }

    if repo.list_services().await?.is_empty() {
        for input in data.services {
            repo.create_service(input).await?;
        }
        report.created("services".to_string());
    } else {
        report.skipped("services".to_string());
    }

    if repo.list_home_stats().await?.is_empty() {
        for input in data.home_stats {
            repo.create_home_stat(input).await?;
        }
        report.created("home stats".to_string());
    } else {
        report.skipped("home stats".to_string());
    }

    if repo.list_projects(ProjectFilter::default()).await?.is_empty() {
        for input in data.projects {
            repo.create_project(input).await?;
        }
        report.created("projects".to_string());
    } else {
        report.skipped("projects".to_string());
    }

    Ok(report)
}
