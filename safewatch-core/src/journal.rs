use std::sync::Arc;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use safewatch_api::models::Alert;
use time::format_description::well_known::Rfc3339;

use crate::errors::ExportError;
use crate::storage::{record, RecordKind, Storage};

/// Maximum number of alerts kept; older entries are dropped first.
pub const JOURNAL_CAPACITY: usize = 200;

/// Capped, newest-first list of alerts.
pub struct Journal {
    storage: Arc<dyn Storage>,
    entries: Vec<Alert>,
}

impl Journal {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = record::load::<Vec<Alert>>(storage.as_ref(), RecordKind::Journal)
            .unwrap_or_default();

        Self::new(storage, entries)
    }

    pub fn new(storage: Arc<dyn Storage>, mut entries: Vec<Alert>) -> Self {
        entries.truncate(JOURNAL_CAPACITY);
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[Alert] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.entries.first()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.entries.iter().find(|alert| alert.id == id)
    }

    /// Alerts nobody has acknowledged yet.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|alert| !alert.acknowledged).count()
    }

    pub fn append(&mut self, alert: Alert) {
        self.append_batch(vec![alert]);
    }

    /// Prepend alerts raised together, keeping their relative order.
    pub fn append_batch(&mut self, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            return;
        }

        tracing::debug!(count = alerts.len(), "journal append");

        self.entries.splice(0..0, alerts);
        self.entries.truncate(JOURNAL_CAPACITY);
        self.flush();
    }

    /// Mark an alert as acknowledged. Returns `false` when the id is unknown.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        let Some(alert) = self.entries.iter_mut().find(|alert| alert.id == id) else {
            return false;
        };

        if !alert.acknowledged {
            alert.acknowledged = true;
            self.flush();
        }

        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        record::discard(self.storage.as_ref(), RecordKind::Journal);
    }

    /// CSV with one line per alert: timestamp, severity, message.
    ///
    /// Every field is quoted; quotes inside messages are doubled.
    pub fn export_as_text(&self) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for alert in &self.entries {
            let timestamp = alert
                .timestamp
                .format(&Rfc3339)
                .unwrap_or_else(|_| alert.timestamp.unix_timestamp().to_string());

            writer.write_record([
                timestamp.as_str(),
                alert.severity.as_str(),
                alert.message.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.error().to_string()))?;

        Ok(String::from_utf8(bytes)?)
    }

    fn flush(&self) {
        record::persist(self.storage.as_ref(), RecordKind::Journal, &self.entries);
    }
}
