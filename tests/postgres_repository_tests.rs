//! Runs against a real database. Needs `DATABASE_URL` pointing at a disposable
//! Postgres; run with `cargo test -- --ignored`.

use portfolio_api::{
    AppError, PostgresRepository,
    models::{
        CreateMessageRequest, CreateProjectRequest, CreateSkillRequest, ProjectCategory,
        ProjectLinks, SkillCategory, UpdateProjectRequest, UpdateSkillRequest,
    },
    repository::{self, Repository},
};
use uuid::Uuid;

async fn setup() -> PostgresRepository {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let pool = repository::connect(&url).await.expect("connect");
    repository::run_migrations(&pool).await.expect("migrate");
    PostgresRepository::new(pool)
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn test_project_round_trip_and_partial_update() {
    let repo = setup().await;
    let created = repo
        .create_project(CreateProjectRequest {
            title: unique("project"),
            description: "desc".into(),
            tech_stack: vec!["Rust".into(), "Postgres".into()],
            links: Some(ProjectLinks {
                demo: Some("https://demo.example.com".into()),
                repo: "https://github.com/me/repo".into(),
            }),
            images: vec!["https://img.example.com/1.png".into()],
            category: Some(ProjectCategory::Data),
            featured: true,
        })
        .await
        .unwrap();

    let fetched = repo.get_project(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = repo
        .update_project(
            created.id,
            UpdateProjectRequest {
                featured: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.featured);
    assert_eq!(updated.tech_stack, created.tech_stack);
    assert_eq!(updated.links, created.links);

    let deleted = repo.delete_project(created.id).await.unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(matches!(
        repo.delete_project(created.id).await,
        Err(AppError::NotFound("Project"))
    ));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_skill_name() {
    let repo = setup().await;
    let name = unique("skill");
    let req = CreateSkillRequest {
        name: name.clone(),
        category: Some(SkillCategory::Backend),
        proficiency: Some(75),
    };

    let first = repo.create_skill(req.clone()).await.unwrap();
    assert!(matches!(
        repo.create_skill(req.clone()).await,
        Err(AppError::DuplicateName(n)) if n == name
    ));
    assert!(matches!(
        repo.create_skill(CreateSkillRequest {
            name: format!(" {} ", name.to_uppercase()),
            ..req
        })
        .await,
        Err(AppError::DuplicateName(_))
    ));

    let other = repo
        .create_skill(CreateSkillRequest {
            name: unique("skill"),
            category: Some(SkillCategory::Tools),
            proficiency: Some(40),
        })
        .await
        .unwrap();
    assert!(matches!(
        repo.update_skill(
            other.id,
            UpdateSkillRequest {
                name: Some(name),
                ..Default::default()
            }
        )
        .await,
        Err(AppError::DuplicateName(_))
    ));

    repo.delete_skill(first.id).await.unwrap();
    repo.delete_skill(other.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_message_mark_read() {
    let repo = setup().await;
    let created = repo
        .create_message(CreateMessageRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "hello".into(),
        })
        .await
        .unwrap();
    assert!(!created.is_read);

    let read = repo.mark_message_read(created.id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(read.created_at, created.created_at);

    repo.delete_message(created.id).await.unwrap();
}
