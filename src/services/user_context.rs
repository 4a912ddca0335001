use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::auth::Claims;
use crate::database::models::{Person, PersonId, Role};
use crate::error::{AppError, AppResult};
use crate::services::person::PersonService;

/// The signed-in person, loaded from the bearer token of the request.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub person: Person,
}

impl UserContext {
    pub fn person_id(&self) -> PersonId {
        self.person.id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.person.has_role(role)
    }

    pub fn is_office(&self) -> bool {
        self.has_role(Role::Office)
    }

    pub fn is_boss_or_office(&self) -> bool {
        self.person.has_any_role(&[Role::Boss, Role::Office])
    }

    /// Fails with permission denied unless the person has the OFFICE role.
    pub fn require_office(&self) -> AppResult<()> {
        if self.is_office() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Only the office may perform this action".to_string(),
            ))
        }
    }

    /// Own data is always visible, other persons' data only to BOSS and OFFICE.
    pub fn require_access_to(&self, person_id: PersonId) -> AppResult<()> {
        if self.person_id() == person_id || self.is_boss_or_office() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "Not allowed to access data of person {}",
                person_id
            )))
        }
    }
}

/// Resolves the [`UserContext`] of a request. Use it in handlers that need
/// the signed-in person.
#[derive(Clone)]
pub struct UserContextService {
    person_service: PersonService,
}

impl UserContextService {
    pub fn new(person_service: PersonService) -> Self {
        Self { person_service }
    }

    pub async fn extract_context(&self, req: &HttpRequest) -> AppResult<UserContext> {
        let mut payload = Payload::None;
        let claims = Claims::from_request(req, &mut payload)
            .into_inner()
            .map_err(|_| AppError::Unauthorized)?;

        self.from_claims(&claims).await
    }

    pub async fn from_claims(&self, claims: &Claims) -> AppResult<UserContext> {
        let person = self
            .person_service
            .get_by_id(claims.person_id())
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !person.is_active() {
            log::debug!("Rejecting request of inactive person {}", person.id);
            return Err(AppError::Unauthorized);
        }

        Ok(UserContext { person })
    }
}
