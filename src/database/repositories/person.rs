use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{
    models::{Department, DepartmentRow, Person, PersonBasedata, PersonId, PersonRow, Role},
    utils::sql,
};

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>>;

    /// All persons not carrying the INACTIVE role, ordered by name.
    async fn find_active(&self) -> Result<Vec<Person>>;

    async fn save(&self, person: &Person) -> Result<Person>;
}

#[async_trait]
pub trait PersonBasedataRepository: Send + Sync {
    async fn find_by_person_id(&self, person_id: PersonId) -> Result<Option<PersonBasedata>>;

    async fn save(&self, basedata: &PersonBasedata) -> Result<PersonBasedata>;
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_member(&self, person_id: PersonId) -> Result<Vec<Department>>;

    async fn find_by_department_head(&self, person_id: PersonId) -> Result<Vec<Department>>;

    async fn find_by_second_stage_authority(&self, person_id: PersonId) -> Result<Vec<Department>>;

    async fn save(&self, department: &Department) -> Result<Department>;
}

const PERSON_COLUMNS: &str = "id, username, first_name, last_name, email, roles";

#[derive(Clone)]
pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {} FROM persons WHERE id = $1",
            PERSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Person::from))
    }

    async fn find_active(&self) -> Result<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {} FROM persons WHERE NOT ($1 = ANY(roles)) ORDER BY first_name, last_name",
            PERSON_COLUMNS
        ))
        .bind(Role::Inactive.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn save(&self, person: &Person) -> Result<Person> {
        let roles: Vec<String> = person.roles.iter().map(|role| role.to_string()).collect();

        let row = sqlx::query_as::<_, PersonRow>(&sql(&format!(
            r#"
            INSERT INTO
                persons (id, username, first_name, last_name, email, roles)
            VALUES
                (?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                roles = EXCLUDED.roles
            RETURNING
                {}
            "#,
            PERSON_COLUMNS
        )))
        .bind(person.id)
        .bind(&person.username)
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(roles)
        .fetch_one(&self.pool)
        .await?;

        Ok(Person::from(row))
    }
}

#[derive(Clone)]
pub struct PgPersonBasedataRepository {
    pool: PgPool,
}

impl PgPersonBasedataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonBasedataRepository for PgPersonBasedataRepository {
    async fn find_by_person_id(&self, person_id: PersonId) -> Result<Option<PersonBasedata>> {
        let basedata = sqlx::query_as::<_, PersonBasedata>(
            r#"
            SELECT
                person_id,
                personnel_number,
                additional_information
            FROM
                person_basedata
            WHERE
                person_id = $1
            "#,
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(basedata)
    }

    async fn save(&self, basedata: &PersonBasedata) -> Result<PersonBasedata> {
        let saved = sqlx::query_as::<_, PersonBasedata>(&sql(r#"
            INSERT INTO
                person_basedata (person_id, personnel_number, additional_information)
            VALUES
                (?, ?, ?)
            ON CONFLICT (person_id) DO UPDATE SET
                personnel_number = EXCLUDED.personnel_number,
                additional_information = EXCLUDED.additional_information
            RETURNING
                person_id,
                personnel_number,
                additional_information
        "#))
        .bind(basedata.person_id)
        .bind(&basedata.personnel_number)
        .bind(&basedata.additional_information)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}

const DEPARTMENT_COLUMNS: &str =
    "id, name, member_ids, department_head_ids, second_stage_authority_ids";

#[derive(Clone)]
pub struct PgDepartmentRepository {
    pool: PgPool,
}

impl PgDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where_array_contains(&self, column: &str, person_id: PersonId) -> Result<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {} FROM departments WHERE $1 = ANY({}) ORDER BY name",
            DEPARTMENT_COLUMNS, column
        ))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Department::from).collect())
    }
}

#[async_trait]
impl DepartmentRepository for PgDepartmentRepository {
    async fn find_by_member(&self, person_id: PersonId) -> Result<Vec<Department>> {
        self.find_where_array_contains("member_ids", person_id).await
    }

    async fn find_by_department_head(&self, person_id: PersonId) -> Result<Vec<Department>> {
        self.find_where_array_contains("department_head_ids", person_id)
            .await
    }

    async fn find_by_second_stage_authority(&self, person_id: PersonId) -> Result<Vec<Department>> {
        self.find_where_array_contains("second_stage_authority_ids", person_id)
            .await
    }

    async fn save(&self, department: &Department) -> Result<Department> {
        let row = sqlx::query_as::<_, DepartmentRow>(&sql(&format!(
            r#"
            INSERT INTO
                departments (id, name, member_ids, department_head_ids, second_stage_authority_ids)
            VALUES
                (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                member_ids = EXCLUDED.member_ids,
                department_head_ids = EXCLUDED.department_head_ids,
                second_stage_authority_ids = EXCLUDED.second_stage_authority_ids
            RETURNING
                {}
            "#,
            DEPARTMENT_COLUMNS
        )))
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.member_ids)
        .bind(&department.department_head_ids)
        .bind(&department.second_stage_authority_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(Department::from(row))
    }
}
