#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use jsonwebtoken::{encode, EncodingKey, Header};

use urlaubsverwaltung::auth::Claims;
use urlaubsverwaltung::config::WorkingTimeProperties;
use urlaubsverwaltung::database::memory::InMemoryRepositories;
use urlaubsverwaltung::database::models::*;
use urlaubsverwaltung::database::repositories::{
    DepartmentRepository, PersonRepository, SickNoteRepository, VacationTypeRepository,
};
use urlaubsverwaltung::i18n::BundleMessageSource;
use urlaubsverwaltung::services::LoggingNotifier;
use urlaubsverwaltung::{AppState, Config, FixedClock};

pub const OFFICE_ID: PersonId = 1;
pub const DEPARTMENT_HEAD_ID: PersonId = 2;
pub const PERSON_ONE_ID: PersonId = 3;
pub const PERSON_TWO_ID: PersonId = 4;
pub const INACTIVE_ID: PersonId = 5;

pub fn setup_test_env() {
    // Tests run with the environment they set up themselves
    unsafe {
        env::set_var("JWT_SECRET", "test-jwt-secret-key-that-is-long-enough");
        env::set_var("ENVIRONMENT", "test");
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/urlaubsverwaltung_test".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        locale: "en".to_string(),
        working_time: WorkingTimeProperties::default(),
        settings_cache_ttl_seconds: 300,
    }
}

/// Signs a token the way the login service does. A negative `valid_for`
/// yields an already expired token.
pub fn bearer_token(person_id: PersonId, secret: &str, valid_for: Duration) -> String {
    let claims = Claims {
        sub: person_id,
        email: format!("user{}@example.org", person_id),
        exp: (Utc::now() + valid_for).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sick_note_type() -> SickNoteType {
    SickNoteType {
        id: 1,
        category: SickNoteCategory::SickNote,
        message_key: "application.data.sicknotetype.sicknote".to_string(),
    }
}

pub fn child_sick_note_type() -> SickNoteType {
    SickNoteType {
        id: 2,
        category: SickNoteCategory::SickNoteChild,
        message_key: "application.data.sicknotetype.sicknotechild".to_string(),
    }
}

pub fn vacation_type(id: i64, category: VacationCategory, active: bool) -> VacationType {
    VacationType {
        id,
        active,
        category,
        message_key: format!("application.data.vacationType.{}", category),
        requires_approval: true,
    }
}

fn fake_person(id: PersonId, roles: Vec<Role>) -> Person {
    Person {
        id,
        username: format!("user{}", id),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: SafeEmail().fake(),
        roles,
    }
}

fn department(id: i64, name: &str, members: Vec<PersonId>, heads: Vec<PersonId>) -> Department {
    Department {
        id,
        name: name.to_string(),
        member_ids: members,
        department_head_ids: heads,
        second_stage_authority_ids: vec![],
    }
}

/// In-memory application with an office clerk, a department head, two
/// employees, and an inactive person. Today is 2022-06-15.
pub struct TestContext {
    pub config: Config,
    pub repositories: InMemoryRepositories,
    pub today: NaiveDate,
}

impl TestContext {
    pub async fn new() -> Self {
        setup_test_env();

        let repositories = InMemoryRepositories::new();
        let mut person_one = fake_person(PERSON_ONE_ID, vec![Role::User]);
        person_one.first_name = "personOneFirstName".to_string();
        person_one.last_name = "personOneLastName".to_string();

        for person in [
            fake_person(OFFICE_ID, vec![Role::User, Role::Office]),
            fake_person(DEPARTMENT_HEAD_ID, vec![Role::User, Role::DepartmentHead]),
            person_one,
            fake_person(PERSON_TWO_ID, vec![Role::User]),
            fake_person(INACTIVE_ID, vec![Role::Inactive]),
        ] {
            repositories.persons.save(&person).await.unwrap();
        }

        for department in [
            department(1, "Here", vec![PERSON_ONE_ID, PERSON_TWO_ID, INACTIVE_ID], vec![DEPARTMENT_HEAD_ID]),
            department(2, "There", vec![PERSON_ONE_ID], vec![]),
        ] {
            repositories.departments.save(&department).await.unwrap();
        }

        for vacation_type in [
            vacation_type(1000, VacationCategory::Holiday, true),
            vacation_type(2000, VacationCategory::SpecialLeave, true),
            vacation_type(3000, VacationCategory::UnpaidLeave, false),
        ] {
            repositories.vacation_types.save(&vacation_type).await.unwrap();
        }

        Self {
            config: test_config(),
            repositories,
            today: date(2022, 6, 15),
        }
    }

    pub fn state(&self) -> web::Data<AppState> {
        let messages = BundleMessageSource::for_locale(&self.config.locale).unwrap();
        web::Data::new(AppState::new(
            self.repositories.repositories(),
            &self.config,
            Arc::new(FixedClock(self.today)),
            Arc::new(messages),
            Arc::new(LoggingNotifier),
        ))
    }

    pub fn config_data(&self) -> web::Data<Config> {
        web::Data::new(self.config.clone())
    }

    pub fn bearer(&self, person_id: PersonId) -> (&'static str, String) {
        let token = bearer_token(person_id, &self.config.jwt_secret, Duration::days(1));
        ("Authorization", format!("Bearer {}", token))
    }

    pub async fn add_sick_note(
        &self,
        person_id: PersonId,
        sick_note_type: SickNoteType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SickNote {
        let sick_note = SickNote::builder()
            .person_id(person_id)
            .sick_note_type(sick_note_type)
            .start_date(start)
            .end_date(end)
            .day_length(DayLength::Full)
            .build()
            .unwrap();
        self.repositories.sick_notes.save(&sick_note).await.unwrap()
    }
}
