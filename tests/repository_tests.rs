use chrono::NaiveDate;
use portfolio_api::{
    AppError, MemoryRepository,
    models::{
        AchievementFilter, AchievementType, CreateAchievementRequest, CreateMessageRequest,
        CreateProjectRequest, CreateSkillRequest, MessageFilter, ProjectCategory, ProjectFilter,
        ProjectLinks, SkillCategory, SkillFilter, UpdateAchievementRequest, UpdateProjectRequest,
        UpdateSkillRequest,
    },
    repository::Repository,
};
use uuid::Uuid;

fn project(title: &str, category: ProjectCategory) -> CreateProjectRequest {
    CreateProjectRequest {
        title: title.to_string(),
        description: "desc".to_string(),
        tech_stack: vec!["Rust".to_string()],
        links: Some(ProjectLinks {
            demo: None,
            repo: "https://github.com/me/repo".to_string(),
        }),
        images: vec![],
        category: Some(category),
        featured: false,
    }
}

fn skill(name: &str, category: SkillCategory, proficiency: i32) -> CreateSkillRequest {
    CreateSkillRequest {
        name: name.to_string(),
        category: Some(category),
        proficiency: Some(proficiency),
    }
}

fn achievement(title: &str, date: &str, kind: AchievementType) -> CreateAchievementRequest {
    CreateAchievementRequest {
        title: title.to_string(),
        issuer: "Issuer".to_string(),
        date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        description: None,
        certificate_url: None,
        kind: Some(kind),
    }
}

fn message(name: &str) -> CreateMessageRequest {
    CreateMessageRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        message: "hi".to_string(),
    }
}

// --- Projects ---

#[tokio::test]
async fn test_create_then_get_returns_same_project() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_project(project("Site", ProjectCategory::Web))
        .await
        .unwrap();

    let fetched = repo.get_project(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(!created.featured);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn test_create_project_without_links_is_validation_error() {
    let repo = MemoryRepository::new();
    let mut req = project("Site", ProjectCategory::Web);
    req.links = None;

    match repo.create_project(req).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields, vec!["links"]),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(repo.list_projects(&ProjectFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_projects_newest_first_and_idempotent() {
    let repo = MemoryRepository::new();
    for title in ["one", "two", "three"] {
        repo.create_project(project(title, ProjectCategory::Web))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let first = repo.list_projects(&ProjectFilter::default()).await.unwrap();
    let second = repo.list_projects(&ProjectFilter::default()).await.unwrap();

    let titles: Vec<&str> = first.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["three", "two", "one"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_projects_filters() {
    let repo = MemoryRepository::new();
    let mut featured = project("Dash", ProjectCategory::PowerBI);
    featured.featured = true;
    repo.create_project(featured).await.unwrap();
    repo.create_project(project("App", ProjectCategory::Mobile))
        .await
        .unwrap();

    let by_category = repo
        .list_projects(&ProjectFilter {
            category: Some(ProjectCategory::Mobile),
            featured: None,
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].title, "App");

    let by_featured = repo
        .list_projects(&ProjectFilter {
            category: None,
            featured: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(by_featured.len(), 1);
    assert_eq!(by_featured[0].title, "Dash");
}

#[tokio::test]
async fn test_update_project_merges_only_provided_fields() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_project(project("Site", ProjectCategory::Web))
        .await
        .unwrap();

    let updated = repo
        .update_project(
            created.id,
            UpdateProjectRequest {
                description: Some("new description".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "new description");
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.links, created.links);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_project_rejects_blank_repo_link() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_project(project("Site", ProjectCategory::Web))
        .await
        .unwrap();

    let result = repo
        .update_project(
            created.id,
            UpdateProjectRequest {
                links: Some(ProjectLinks {
                    demo: None,
                    repo: String::new(),
                }),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let stored = repo.get_project(created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_update_missing_project_is_not_found() {
    let repo = MemoryRepository::new();
    let result = repo
        .update_project(Uuid::new_v4(), UpdateProjectRequest::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound("Project"))));
}

#[tokio::test]
async fn test_delete_missing_leaves_collection_unchanged() {
    let repo = MemoryRepository::new();
    repo.create_project(project("Site", ProjectCategory::Web))
        .await
        .unwrap();
    let before = repo.list_projects(&ProjectFilter::default()).await.unwrap();

    let result = repo.delete_project(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound("Project"))));
    let after = repo.list_projects(&ProjectFilter::default()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_delete_returns_prior_state() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_project(project("Site", ProjectCategory::Web))
        .await
        .unwrap();

    let deleted = repo.delete_project(created.id).await.unwrap();

    assert_eq!(deleted, created);
    assert!(repo.get_project(created.id).await.unwrap().is_none());
}

// --- Skills ---

#[tokio::test]
async fn test_duplicate_skill_name_is_rejected() {
    let repo = MemoryRepository::new();
    repo.create_skill(skill("Rust", SkillCategory::Backend, 90))
        .await
        .unwrap();

    let result = repo
        .create_skill(skill("Rust", SkillCategory::Tools, 10))
        .await;

    match result {
        Err(AppError::DuplicateName(name)) => assert_eq!(name, "Rust"),
        other => panic!("expected duplicate name, got {other:?}"),
    }
    assert_eq!(repo.list_skills(&SkillFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_skill_onto_existing_name_is_rejected() {
    let repo = MemoryRepository::new();
    repo.create_skill(skill("Rust", SkillCategory::Backend, 90))
        .await
        .unwrap();
    let go = repo
        .create_skill(skill("Go", SkillCategory::Backend, 60))
        .await
        .unwrap();

    let result = repo
        .update_skill(
            go.id,
            UpdateSkillRequest {
                name: Some("Rust".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::DuplicateName(_))));

    // Keeping its own name is not a collision.
    let same = repo
        .update_skill(
            go.id,
            UpdateSkillRequest {
                name: Some("Go".to_string()),
                proficiency: Some(65),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.proficiency, 65);
}

#[tokio::test]
async fn test_skill_proficiency_bounds() {
    let repo = MemoryRepository::new();

    for bad in [0, 101] {
        let result = repo
            .create_skill(skill("Edge", SkillCategory::Tools, bad))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{bad} accepted");
    }
    for good in [1, 100] {
        let name = format!("Edge{good}");
        repo.create_skill(skill(&name, SkillCategory::Tools, good))
            .await
            .unwrap();
    }

    let created = repo
        .create_skill(skill("Docker", SkillCategory::Tools, 50))
        .await
        .unwrap();
    let result = repo
        .update_skill(
            created.id,
            UpdateSkillRequest {
                proficiency: Some(101),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_list_skills_ordering() {
    let repo = MemoryRepository::new();
    repo.create_skill(skill("React", SkillCategory::Frontend, 70))
        .await
        .unwrap();
    repo.create_skill(skill("Rust", SkillCategory::Backend, 80))
        .await
        .unwrap();
    repo.create_skill(skill("Axum", SkillCategory::Backend, 80))
        .await
        .unwrap();
    repo.create_skill(skill("Go", SkillCategory::Backend, 95))
        .await
        .unwrap();

    let skills = repo.list_skills(&SkillFilter::default()).await.unwrap();
    let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Go", "Axum", "Rust", "React"]);

    let frontend = repo
        .list_skills(&SkillFilter {
            category: Some(SkillCategory::Frontend),
        })
        .await
        .unwrap();
    assert_eq!(frontend.len(), 1);
}

// --- Achievements ---

#[tokio::test]
async fn test_list_achievements_most_recent_first() {
    let repo = MemoryRepository::new();
    repo.create_achievement(achievement("Old", "2020-01-01", AchievementType::Award))
        .await
        .unwrap();
    repo.create_achievement(achievement("New", "2024-06-30", AchievementType::Academic))
        .await
        .unwrap();

    let all = repo
        .list_achievements(&AchievementFilter::default())
        .await
        .unwrap();
    assert_eq!(all[0].title, "New");
    assert_eq!(all[1].title, "Old");

    let awards = repo
        .list_achievements(&AchievementFilter {
            kind: Some(AchievementType::Award),
        })
        .await
        .unwrap();
    assert_eq!(awards.len(), 1);
}

#[tokio::test]
async fn test_achievement_certificate_url_must_be_url() {
    let repo = MemoryRepository::new();
    let mut req = achievement("Cert", "2024-01-01", AchievementType::Certificate);
    req.certificate_url = Some("not a url".to_string());

    match repo.create_achievement(req).await {
        Err(AppError::Validation(fields)) => {
            assert_eq!(fields.len(), 1);
            assert!(fields[0].starts_with("certificate"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_achievement_type() {
    let repo = MemoryRepository::new();
    let created = repo
        .create_achievement(achievement("Cup", "2024-01-01", AchievementType::Award))
        .await
        .unwrap();

    let updated = repo
        .update_achievement(
            created.id,
            UpdateAchievementRequest {
                kind: Some(AchievementType::Competition),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.kind, AchievementType::Competition);
    assert_eq!(updated.date, created.date);
}

// --- Messages ---

#[tokio::test]
async fn test_mark_read_only_changes_flag() {
    let repo = MemoryRepository::new();
    let created = repo.create_message(message("Ada")).await.unwrap();
    assert!(!created.is_read);

    let read = repo.mark_message_read(created.id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(read.message, created.message);
    assert_eq!(read.created_at, created.created_at);

    // Idempotent.
    let again = repo.mark_message_read(created.id).await.unwrap();
    assert_eq!(again, read);
}

#[tokio::test]
async fn test_list_messages_filter_by_read_state() {
    let repo = MemoryRepository::new();
    let first = repo.create_message(message("Ada")).await.unwrap();
    repo.create_message(message("Grace")).await.unwrap();
    repo.mark_message_read(first.id).await.unwrap();

    let unread = repo
        .list_messages(&MessageFilter {
            is_read: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].name, "Grace");

    let all = repo.list_messages(&MessageFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_delete_message() {
    let repo = MemoryRepository::new();
    let created = repo.create_message(message("Ada")).await.unwrap();

    repo.delete_message(created.id).await.unwrap();

    assert!(matches!(
        repo.delete_message(created.id).await,
        Err(AppError::NotFound("Message"))
    ));
}

// --- Credential Store ---

#[tokio::test]
async fn test_admin_lookup_ignores_case() {
    let repo = MemoryRepository::new();
    repo.insert_admin(portfolio_api::models::AdminIdentity {
        id: Uuid::new_v4(),
        email: "Owner@Example.com".to_string(),
        password_hash: "x".to_string(),
    })
    .await
    .unwrap();

    let found = repo.find_admin_by_email("OWNER@example.COM").await.unwrap();
    assert_eq!(found.map(|a| a.email).as_deref(), Some("owner@example.com"));
    assert!(repo.find_admin_by_email("other@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_whitespace_only_fields_are_rejected() {
    let repo = MemoryRepository::new();

    let mut blank_title = project("   ", ProjectCategory::Web);
    blank_title.links = Some(ProjectLinks {
        demo: None,
        repo: "  ".to_string(),
    });
    match repo.create_project(blank_title).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields, vec!["links", "title"]),
        other => panic!("expected validation error, got {:?}", other.map(|p| p.id)),
    }

    assert!(matches!(
        repo.create_skill(skill("   ", SkillCategory::Backend, 50)).await,
        Err(AppError::Validation(fields)) if fields == vec!["name"]
    ));

    let mut blank_message = message("Ada");
    blank_message.name = "  ".to_string();
    blank_message.message = "\n\t".to_string();
    assert!(matches!(
        repo.create_message(blank_message).await,
        Err(AppError::Validation(fields)) if fields == vec!["message", "name"]
    ));

    assert!(repo.list_projects(&ProjectFilter::default()).await.unwrap().is_empty());
    assert!(repo.list_skills(&SkillFilter::default()).await.unwrap().is_empty());
    assert!(repo.list_messages(&MessageFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stored_names_are_trimmed() {
    let repo = MemoryRepository::new();

    let created = repo
        .create_skill(skill("  Rust ", SkillCategory::Backend, 80))
        .await
        .unwrap();
    assert_eq!(created.name, "Rust");

    let mut req = project(" Portfolio ", ProjectCategory::Web);
    req.links = Some(ProjectLinks {
        demo: Some("  ".to_string()),
        repo: " https://github.com/me/site ".to_string(),
    });
    let project = repo.create_project(req).await.unwrap();
    assert_eq!(project.title, "Portfolio");
    assert_eq!(project.links.repo, "https://github.com/me/site");
    assert_eq!(project.links.demo, None);
}

#[tokio::test]
async fn test_skill_names_collide_ignoring_case_and_padding() {
    let repo = MemoryRepository::new();
    let rust = repo
        .create_skill(skill("Rust", SkillCategory::Backend, 80))
        .await
        .unwrap();

    assert!(matches!(
        repo.create_skill(skill("rust ", SkillCategory::Tools, 40)).await,
        Err(AppError::DuplicateName(name)) if name == "rust"
    ));

    let go = repo
        .create_skill(skill("Go", SkillCategory::Backend, 60))
        .await
        .unwrap();
    assert!(matches!(
        repo.update_skill(
            go.id,
            UpdateSkillRequest {
                name: Some("RUST".to_string()),
                ..Default::default()
            }
        )
        .await,
        Err(AppError::DuplicateName(_))
    ));

    // Renaming a skill to a different casing of its own name is allowed.
    let renamed = repo
        .update_skill(
            rust.id,
            UpdateSkillRequest {
                name: Some("RUST".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "RUST");
    assert_eq!(repo.list_skills(&SkillFilter::default()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_skill_names_sort_by_byte_order_within_rank() {
    let repo = MemoryRepository::new();
    for name in ["axum", "Tokio", "Rust"] {
        repo.create_skill(skill(name, SkillCategory::Backend, 80))
            .await
            .unwrap();
    }

    let skills = repo.list_skills(&SkillFilter::default()).await.unwrap();
    let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Rust", "Tokio", "axum"]);
}

#[tokio::test]
async fn test_achievement_update_clears_optional_fields() {
    let repo = MemoryRepository::new();
    let mut req = achievement("Cert", "2024-05-01", AchievementType::Certificate);
    req.description = Some("Cloud practitioner".to_string());
    req.certificate_url = Some("https://cert.example.com/1".to_string());
    let created = repo.create_achievement(req).await.unwrap();

    let untouched: UpdateAchievementRequest =
        serde_json::from_value(serde_json::json!({ "title": "Cert v2" })).unwrap();
    let updated = repo.update_achievement(created.id, untouched).await.unwrap();
    assert_eq!(updated.description.as_deref(), Some("Cloud practitioner"));

    let cleared: UpdateAchievementRequest = serde_json::from_value(
        serde_json::json!({ "description": null, "certificateUrl": null }),
    )
    .unwrap();
    let updated = repo.update_achievement(created.id, cleared).await.unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.certificate_url, None);
    assert_eq!(updated.title, "Cert v2");
}

#[tokio::test]
async fn test_admin_lookup_folds_non_ascii_case() {
    let repo = MemoryRepository::new();
    repo.insert_admin(portfolio_api::models::AdminIdentity {
        id: Uuid::new_v4(),
        email: "Élodie@Example.com".to_string(),
        password_hash: "x".to_string(),
    })
    .await
    .unwrap();

    let found = repo.find_admin_by_email("ÉLODIE@example.com").await.unwrap();
    assert_eq!(found.map(|a| a.email).as_deref(), Some("élodie@example.com"));
}
