use std::sync::Arc;

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, postgres::PgPoolOptions, PgPool, Postgres};

use repositories::{
    AccountRepository, ApplicationRepository, CommentRepository, DepartmentRepository,
    PersonBasedataRepository, PersonRepository, PgAccountRepository, PgApplicationRepository,
    PgCommentRepository, PgDepartmentRepository, PgPersonBasedataRepository, PgPersonRepository,
    PgSettingsRepository, PgSickNoteRepository, PgVacationTypeRepository, PgWorkingTimeRepository,
    SettingsRepository, SickNoteRepository, VacationTypeRepository, WorkingTimeRepository,
};

pub mod memory;
pub mod models;
pub mod repositories;
pub mod utils;

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    // Create database if it doesn't exist
    if !Postgres::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database {}", database_url);
        Postgres::create_database(database_url).await?;
        log::info!("Database created successfully");
    } else {
        log::debug!("Database already exists");
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}

/// Storage handles of all aggregates, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub persons: Arc<dyn PersonRepository>,
    pub basedata: Arc<dyn PersonBasedataRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
    pub working_times: Arc<dyn WorkingTimeRepository>,
    pub sick_notes: Arc<dyn SickNoteRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub vacation_types: Arc<dyn VacationTypeRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            persons: Arc::new(PgPersonRepository::new(pool.clone())),
            basedata: Arc::new(PgPersonBasedataRepository::new(pool.clone())),
            departments: Arc::new(PgDepartmentRepository::new(pool.clone())),
            working_times: Arc::new(PgWorkingTimeRepository::new(pool.clone())),
            sick_notes: Arc::new(PgSickNoteRepository::new(pool.clone())),
            applications: Arc::new(PgApplicationRepository::new(pool.clone())),
            vacation_types: Arc::new(PgVacationTypeRepository::new(pool.clone())),
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            settings: Arc::new(PgSettingsRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
        }
    }
}
