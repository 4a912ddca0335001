pub mod comment;
pub mod csv_export;
pub mod person;
pub mod settings;
pub mod sick_note;
pub mod sick_pay_notification;
pub mod statistics;
pub mod user_context;
pub mod working_time;

pub use comment::CommentService;
pub use csv_export::{
    ApplicationForLeaveStatisticsCsvExportService, RowWriter,
    SickDaysDetailedStatisticsCsvExportService,
};
pub use person::{DepartmentService, PersonBasedataService, PersonService};
pub use settings::SettingsService;
pub use sick_note::SickNoteService;
pub use sick_pay_notification::{EndOfSickPayNotificationService, LoggingNotifier, SickPayNotifier};
pub use statistics::{ApplicationForLeaveStatisticsService, SickDaysStatisticsService};
pub use user_context::{UserContext, UserContextService};
pub use working_time::WorkingTimeService;
