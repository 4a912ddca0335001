pub mod application;
pub mod comment;
pub mod person;
pub mod settings;
pub mod sick_note;
pub mod working_time;

// Re-export all repositories for easy importing
pub use application::{
    AccountRepository, ApplicationRepository, PgAccountRepository, PgApplicationRepository,
    PgVacationTypeRepository, VacationTypeRepository,
};
pub use comment::{CommentRepository, PgCommentRepository};
pub use person::{
    DepartmentRepository, PersonBasedataRepository, PersonRepository, PgDepartmentRepository,
    PgPersonBasedataRepository, PgPersonRepository,
};
pub use settings::{PgSettingsRepository, SettingsRepository};
pub use sick_note::{PgSickNoteRepository, SickNoteRepository};
pub use working_time::{PgWorkingTimeRepository, WorkingTimeRepository};
