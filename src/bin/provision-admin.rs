use portfolio_api::{
    auth,
    models::AdminIdentity,
    repository::{self, PostgresRepository, Repository},
};
use std::{env, process};
use uuid::Uuid;

/// provision-admin
///
/// Creates an administrator identity out of band. There is no HTTP route for this.
///
/// Usage: `provision-admin <EMAIL>` with the password in `ADMIN_PASSWORD`
/// (kept out of shell history). Needs `DATABASE_URL`; applies migrations first.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let email = env::args().nth(1).map(|e| e.trim().to_lowercase()).unwrap_or_else(|| {
        eprintln!("Usage: ADMIN_PASSWORD=... cargo run --bin provision-admin <EMAIL>");
        process::exit(1);
    });
    if !email.contains('@') {
        eprintln!("Error: {email:?} is not an email address");
        process::exit(1);
    }

    let password = match env::var("ADMIN_PASSWORD") {
        Ok(p) if p.len() >= 8 => p,
        _ => {
            eprintln!("Error: ADMIN_PASSWORD must be set to at least 8 characters");
            process::exit(1);
        }
    };

    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("Error: DATABASE_URL must be set");
        process::exit(1);
    };

    if let Err(e) = provision(&database_url, email, &password).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn provision(
    database_url: &str,
    email: String,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = repository::connect(database_url).await?;
    repository::run_migrations(&pool).await?;
    let repo = PostgresRepository::new(pool);

    if repo.find_admin_by_email(&email).await?.is_some() {
        return Err(format!("an admin with email {email} already exists").into());
    }

    let password_hash = auth::hash_password(password, bcrypt::DEFAULT_COST)?;
    let admin = repo
        .insert_admin(AdminIdentity {
            id: Uuid::new_v4(),
            email,
            password_hash,
        })
        .await?;

    println!("Created admin {} ({})", admin.email, admin.id);
    Ok(())
}
