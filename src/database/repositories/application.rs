use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::{
    models::{Account, Application, ApplicationRow, PersonId, VacationType},
    utils::sql,
};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Applications of the person overlapping `[from, to]`, any status.
    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Application>>;

    async fn save(&self, application: &Application) -> Result<Application>;
}

#[async_trait]
pub trait VacationTypeRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<VacationType>>;

    async fn find_active(&self) -> Result<Vec<VacationType>>;

    async fn save(&self, vacation_type: &VacationType) -> Result<VacationType>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_person_and_year(&self, person_id: PersonId, year: i32) -> Result<Option<Account>>;

    async fn save(&self, account: &Account) -> Result<Account>;
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn find_by_person_and_period(
        &self,
        person_id: PersonId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql(r#"
            SELECT
                a.id,
                a.person_id,
                a.start_date,
                a.end_date,
                a.day_length,
                a.status,
                vt.id AS vacation_type_id,
                vt.active AS vacation_type_active,
                vt.category AS vacation_type_category,
                vt.message_key AS vacation_type_message_key,
                vt.requires_approval AS vacation_type_requires_approval
            FROM
                applications a
                INNER JOIN vacation_types vt ON a.vacation_type_id = vt.id
            WHERE
                a.person_id = ?
                AND a.start_date <= ?
                AND a.end_date >= ?
            ORDER BY
                a.start_date
        "#))
        .bind(person_id)
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Application::try_from(row).map_err(anyhow::Error::from))
            .collect()
    }

    async fn save(&self, application: &Application) -> Result<Application> {
        sqlx::query(&sql(r#"
            INSERT INTO
                applications (id, person_id, vacation_type_id, start_date, end_date, day_length, status)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                person_id = EXCLUDED.person_id,
                vacation_type_id = EXCLUDED.vacation_type_id,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                day_length = EXCLUDED.day_length,
                status = EXCLUDED.status
        "#))
        .bind(application.id)
        .bind(application.person_id)
        .bind(application.vacation_type.id)
        .bind(application.period.start_date())
        .bind(application.period.end_date())
        .bind(application.period.day_length())
        .bind(application.status)
        .execute(&self.pool)
        .await?;

        Ok(application.clone())
    }
}

const VACATION_TYPE_COLUMNS: &str = "id, active, category, message_key, requires_approval";

#[derive(Clone)]
pub struct PgVacationTypeRepository {
    pool: PgPool,
}

impl PgVacationTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacationTypeRepository for PgVacationTypeRepository {
    async fn find_all(&self) -> Result<Vec<VacationType>> {
        let vacation_types = sqlx::query_as::<_, VacationType>(&format!(
            "SELECT {} FROM vacation_types ORDER BY id",
            VACATION_TYPE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vacation_types)
    }

    async fn find_active(&self) -> Result<Vec<VacationType>> {
        let vacation_types = sqlx::query_as::<_, VacationType>(&format!(
            "SELECT {} FROM vacation_types WHERE active = TRUE ORDER BY id",
            VACATION_TYPE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vacation_types)
    }

    async fn save(&self, vacation_type: &VacationType) -> Result<VacationType> {
        let saved = sqlx::query_as::<_, VacationType>(&sql(&format!(
            r#"
            INSERT INTO
                vacation_types ({columns})
            VALUES
                (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                active = EXCLUDED.active,
                category = EXCLUDED.category,
                message_key = EXCLUDED.message_key,
                requires_approval = EXCLUDED.requires_approval
            RETURNING
                {columns}
            "#,
            columns = VACATION_TYPE_COLUMNS
        )))
        .bind(vacation_type.id)
        .bind(vacation_type.active)
        .bind(vacation_type.category)
        .bind(&vacation_type.message_key)
        .bind(vacation_type.requires_approval)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_person_and_year(&self, person_id: PersonId, year: i32) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&sql(r#"
            SELECT
                person_id,
                year,
                annual_vacation_days,
                remaining_vacation_days
            FROM
                accounts
            WHERE
                person_id = ?
                AND year = ?
        "#))
        .bind(person_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn save(&self, account: &Account) -> Result<Account> {
        let saved = sqlx::query_as::<_, Account>(&sql(r#"
            INSERT INTO
                accounts (person_id, year, annual_vacation_days, remaining_vacation_days)
            VALUES
                (?, ?, ?, ?)
            ON CONFLICT (person_id, year) DO UPDATE SET
                annual_vacation_days = EXCLUDED.annual_vacation_days,
                remaining_vacation_days = EXCLUDED.remaining_vacation_days
            RETURNING
                person_id,
                year,
                annual_vacation_days,
                remaining_vacation_days
        "#))
        .bind(account.person_id)
        .bind(account.year)
        .bind(&account.annual_vacation_days)
        .bind(&account.remaining_vacation_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
