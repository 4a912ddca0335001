use std::sync::Arc;

pub mod auth;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use database::Repositories;
pub use error::{AppError, AppResult};

use i18n::MessageSource;
use services::{
    ApplicationForLeaveStatisticsCsvExportService, ApplicationForLeaveStatisticsService,
    CommentService, DepartmentService, EndOfSickPayNotificationService, PersonBasedataService,
    PersonService, SettingsService, SickDaysDetailedStatisticsCsvExportService,
    SickDaysStatisticsService, SickNoteService, SickPayNotifier, UserContextService,
    WorkingTimeService,
};

/// Services shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub user_context_service: UserContextService,
    pub person_service: PersonService,
    pub basedata_service: PersonBasedataService,
    pub settings_service: SettingsService,
    pub working_time_service: WorkingTimeService,
    pub sick_note_service: SickNoteService,
    pub end_of_sick_pay_notification_service: EndOfSickPayNotificationService,
    pub application_statistics_service: ApplicationForLeaveStatisticsService,
    pub sick_days_statistics_service: SickDaysStatisticsService,
    pub application_statistics_csv_export: ApplicationForLeaveStatisticsCsvExportService,
    pub sick_days_statistics_csv_export: SickDaysDetailedStatisticsCsvExportService,
    pub comment_service: CommentService,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        config: &Config,
        clock: Arc<dyn Clock>,
        messages: Arc<dyn MessageSource>,
        notifier: Arc<dyn SickPayNotifier>,
    ) -> Self {
        let settings_service = SettingsService::new(
            repositories.settings.clone(),
            config.settings_cache_ttl_seconds,
        );
        let department_service = DepartmentService::new(
            repositories.departments.clone(),
            repositories.persons.clone(),
        );
        let person_service =
            PersonService::new(repositories.persons.clone(), department_service.clone());
        let basedata_service = PersonBasedataService::new(repositories.basedata.clone());
        let working_time_service = WorkingTimeService::new(
            repositories.working_times.clone(),
            settings_service.clone(),
            config.working_time.clone(),
            clock.clone(),
        );
        let sick_note_service = SickNoteService::new(
            repositories.sick_notes.clone(),
            settings_service.clone(),
            clock.clone(),
        );

        Self {
            user_context_service: UserContextService::new(person_service.clone()),
            end_of_sick_pay_notification_service: EndOfSickPayNotificationService::new(
                sick_note_service.clone(),
                person_service.clone(),
                settings_service.clone(),
                notifier,
            ),
            application_statistics_service: ApplicationForLeaveStatisticsService::new(
                person_service.clone(),
                basedata_service.clone(),
                sick_note_service.clone(),
                repositories.vacation_types.clone(),
                repositories.applications.clone(),
                repositories.accounts.clone(),
            ),
            sick_days_statistics_service: SickDaysStatisticsService::new(
                person_service.clone(),
                basedata_service.clone(),
                department_service,
                sick_note_service.clone(),
            ),
            application_statistics_csv_export: ApplicationForLeaveStatisticsCsvExportService::new(
                messages.clone(),
            ),
            sick_days_statistics_csv_export: SickDaysDetailedStatisticsCsvExportService::new(
                messages,
            ),
            comment_service: CommentService::new(repositories.comments.clone(), clock.clone()),
            clock,
            person_service,
            basedata_service,
            settings_service,
            working_time_service,
            sick_note_service,
        }
    }
}
