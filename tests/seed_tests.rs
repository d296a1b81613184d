use portfolio_backend::{
    InMemoryRepository, Repository,
    models::{ContentFilter, ContentSectionInput, ProjectFilter, Section, TestimonialFilter},
    seed::{self, SeedProfile},
};

async fn counts(repo: &InMemoryRepository) -> [usize; 6] {
    [
        repo.list_content_sections(ContentFilter::default())
            .await
            .unwrap()
            .len(),
        repo.list_contact_info().await.unwrap().len(),
        repo.list_testimonials(TestimonialFilter::default())
            .await
            .unwrap()
            .len(),
        repo.list_services().await.unwrap().len(),
        repo.list_home_stats().await.unwrap().len(),
        repo.list_projects(ProjectFilter::default())
            .await
            .unwrap()
            .len(),
    ]
}

#[tokio::test]
async fn test_seeding_twice_changes_nothing() {
    let repo = InMemoryRepository::new();

    let first = seed::seed(&repo, SeedProfile::Starter).await.unwrap();
    assert!(first.skipped.is_empty());
    let after_first = counts(&repo).await;

    let second = seed::seed(&repo, SeedProfile::Starter).await.unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), first.created.len());
    assert_eq!(counts(&repo).await, after_first);
}

#[tokio::test]
async fn test_starter_profile_contents() {
    let repo = InMemoryRepository::new();
    seed::seed(&repo, SeedProfile::Starter).await.unwrap();

    assert_eq!(counts(&repo).await, [4, 1, 2, 2, 3, 2]);

    let contact = repo.list_contact_info().await.unwrap();
    assert_eq!(contact[0].email, "ignitetechnologies3@gmail.com");

    for section in Section::ALL {
        let found = repo
            .list_content_sections(ContentFilter {
                section: Some(section),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "{section}");
    }
}

#[tokio::test]
async fn test_showcase_profile_contents() {
    let repo = InMemoryRepository::new();
    seed::seed(&repo, SeedProfile::Showcase).await.unwrap();

    assert_eq!(counts(&repo).await, [4, 1, 3, 4, 4, 4]);

    let projects = repo.list_projects(ProjectFilter::default()).await.unwrap();
    assert!(projects.iter().all(|p| {
        p.image_url_fallback
            .as_deref()
            .is_some_and(|url| url.starts_with("/placeholder.svg"))
    }));
}

#[tokio::test]
async fn test_existing_section_is_left_alone() {
    let repo = InMemoryRepository::new();
    repo.create_content_section(ContentSectionInput {
        section: Section::Hero,
        title: "Custom hero".to_string(),
        subtitle: None,
        content: "Edited by hand".to_string(),
        image: None,
        image_url_fallback: None,
    })
    .await
    .unwrap();

    let report = seed::seed(&repo, SeedProfile::Starter).await.unwrap();
    assert!(report.skipped.contains(&"content section hero".to_string()));

    let hero = repo
        .list_content_sections(ContentFilter {
            section: Some(Section::Hero),
        })
        .await
        .unwrap();
    assert_eq!(hero.len(), 1);
    assert_eq!(hero[0].title, "Custom hero");
    assert_eq!(counts(&repo).await[0], 4);
}

#[tokio::test]
async fn test_non_empty_collection_is_not_topped_up() {
    let repo = InMemoryRepository::new();
    seed::seed(&repo, SeedProfile::Starter).await.unwrap();

    let services = repo.list_services().await.unwrap();
    repo.delete_service(&services[0].id).await.unwrap();

    let report = seed::seed(&repo, SeedProfile::Starter).await.unwrap();
    assert!(report.skipped.contains(&"services".to_string()));
    assert_eq!(repo.list_services().await.unwrap().len(), 1);
}

#[test]
fn test_profile_names_and_defaults() {
    use portfolio_backend::DataBackend;

    assert_eq!("showcase".parse::<SeedProfile>().unwrap(), SeedProfile::Showcase);
    assert_eq!("Starter".parse::<SeedProfile>().unwrap(), SeedProfile::Starter);
    assert!("demo".parse::<SeedProfile>().is_err());
    assert_eq!(
        SeedProfile::default_for(DataBackend::Firestore),
        SeedProfile::Showcase
    );
    assert_eq!(
        SeedProfile::default_for(DataBackend::Postgres),
        SeedProfile::Starter
    );
}
