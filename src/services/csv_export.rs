use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::database::models::{
    format_date, ApplicationForLeaveStatistics, FilterPeriod, SickDaysDetailedStatistics,
    VacationType, DATE_FORMAT_COMPACT,
};
use crate::i18n::MessageSource;

pub const CSV_DELIMITER: u8 = b';';

/// Destination of exported rows. `None` fields are written as empty cells.
pub trait RowWriter {
    fn write_next(&mut self, row: &[Option<String>]) -> Result<()>;
}

impl<W: Write> RowWriter for csv::Writer<W> {
    fn write_next(&mut self, row: &[Option<String>]) -> Result<()> {
        self.write_record(row.iter().map(|field| field.as_deref().unwrap_or("")))?;
        Ok(())
    }
}

/// Writer for exports: `;` delimited, rows of different length allowed.
pub fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .flexible(true)
        .from_writer(inner)
}

/// Runs `write` against an in-memory CSV writer and returns the encoded bytes.
pub fn to_csv_bytes(write: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> Result<()>) -> Result<Vec<u8>> {
    let mut writer = csv_writer(Vec::new());
    write(&mut writer)?;
    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to flush csv export: {}", err))
}

fn file_name(label: &str, period: &FilterPeriod) -> String {
    format!(
        "{}_{}_{}.csv",
        label,
        period.start_date().format(DATE_FORMAT_COMPACT),
        period.end_date().format(DATE_FORMAT_COMPACT)
    )
}

fn period_header(messages: &dyn MessageSource, period: &FilterPeriod) -> Vec<Option<String>> {
    vec![Some(format!(
        "{}: {} - {}",
        messages.get_message("absence.period"),
        period.start_date_formatted(),
        period.end_date_formatted()
    ))]
}

#[derive(Clone)]
pub struct SickDaysDetailedStatisticsCsvExportService {
    messages: Arc<dyn MessageSource>,
}

impl SickDaysDetailedStatisticsCsvExportService {
    const COLUMN_KEYS: [&'static str; 10] = [
        "person.account.basedata.personnelNumber",
        "person.data.firstName",
        "person.data.lastName",
        "sicknotes.statistics.departments",
        "sicknotes.statistics.from",
        "sicknotes.statistics.to",
        "sicknotes.statistics.length",
        "sicknotes.statistics.type",
        "sicknotes.statistics.certificate.from",
        "sicknotes.statistics.certificate.to",
    ];

    pub fn new(messages: Arc<dyn MessageSource>) -> Self {
        Self { messages }
    }

    pub fn file_name(&self, period: &FilterPeriod) -> String {
        file_name(&self.messages.get_message("sicknotes.statistics"), period)
    }

    /// Period header, column labels, then one row per sick note.
    pub fn write(
        &self,
        period: &FilterPeriod,
        statistics: &[SickDaysDetailedStatistics],
        sink: &mut dyn RowWriter,
    ) -> Result<()> {
        sink.write_next(&period_header(self.messages.as_ref(), period))?;

        let labels: Vec<_> = Self::COLUMN_KEYS
            .iter()
            .map(|key| Some(self.messages.get_message(key)))
            .collect();
        sink.write_next(&labels)?;

        for entry in statistics {
            let departments = entry.departments.join(", ");
            for sick_note in &entry.sick_notes {
                sink.write_next(&[
                    Some(entry.personnel_number.clone()),
                    Some(entry.person.first_name.clone()),
                    Some(entry.person.last_name.clone()),
                    Some(departments.clone()),
                    Some(format_date(sick_note.start_date())),
                    Some(format_date(sick_note.end_date())),
                    Some(self.messages.get_message(sick_note.day_length().message_key())),
                    Some(self.messages.get_message(&sick_note.sick_note_type().message_key)),
                    sick_note.aub_start_date().map(format_date),
                    sick_note.aub_end_date().map(format_date),
                ])?;
            }
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct ApplicationForLeaveStatisticsCsvExportService {
    messages: Arc<dyn MessageSource>,
}

impl ApplicationForLeaveStatisticsCsvExportService {
    pub fn new(messages: Arc<dyn MessageSource>) -> Self {
        Self { messages }
    }

    pub fn file_name(&self, period: &FilterPeriod) -> String {
        file_name(&self.messages.get_message("applications.statistics"), period)
    }

    /// Period header, column labels, then one row per person. Each vacation
    /// type gets an allowed and a waiting column, in the order given.
    pub fn write(
        &self,
        period: &FilterPeriod,
        statistics: &[ApplicationForLeaveStatistics],
        vacation_types: &[VacationType],
        sink: &mut dyn RowWriter,
    ) -> Result<()> {
        sink.write_next(&period_header(self.messages.as_ref(), period))?;

        let allowed = self.messages.get_message("applications.statistics.allowed");
        let waiting = self.messages.get_message("applications.statistics.waiting");

        let mut labels = vec![
            Some(self.messages.get_message("person.account.basedata.personnelNumber")),
            Some(self.messages.get_message("person.data.firstName")),
            Some(self.messages.get_message("person.data.lastName")),
        ];
        for vacation_type in vacation_types {
            let type_label = self.messages.get_message(&vacation_type.message_key);
            labels.push(Some(format!("{} ({})", type_label, allowed)));
            labels.push(Some(format!("{} ({})", type_label, waiting)));
        }
        labels.push(Some(self.messages.get_message("applications.statistics.left")));
        labels.push(Some(self.messages.get_message("applications.statistics.sickDays")));
        labels.push(Some(self.messages.get_message("applications.statistics.childSickDays")));
        sink.write_next(&labels)?;

        for entry in statistics {
            let mut row = vec![
                entry.personnel_number().map(str::to_string),
                Some(entry.person.first_name.clone()),
                Some(entry.person.last_name.clone()),
            ];
            for vacation_type in vacation_types {
                let days = entry.days_for(vacation_type);
                row.push(days.map(|days| days.allowed_days.to_string()));
                row.push(days.map(|days| days.waiting_days.to_string()));
            }
            row.push(entry.left_vacation_days.as_ref().map(ToString::to_string));
            row.push(Some(entry.sick_days.to_string()));
            row.push(Some(entry.child_sick_days.to_string()));
            sink.write_next(&row)?;
        }

        Ok(())
    }
}
