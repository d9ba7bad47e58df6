use futures::{stream, StreamExt};
use serde_json::Value;
use std::collections::hash_map::{Entry, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

use super::validation;
use crate::http::Error;
use crate::types::{BatchEntryError, BatchReport, ConsentRecord, Error as ErrorType};
use crate::App;

/// Stores many consent records at once.
///
/// Every record is validated and written on its own, a bad record is
/// reported in the batch report instead of failing the whole request.
/// Records are always written as new ones: a phone number that is
/// already stored gets replaced along with its identity.
#[derive(Debug)]
pub struct UpsertMany<'a> {
    pub body: &'a Value,
}

#[derive(Debug, Error)]
#[error("Batch request body was rejected")]
struct BatchRejected;

impl UpsertMany<'_> {
    #[tracing::instrument(skip_all, name = "services.consent.upsert_many")]
    pub async fn perform(self, app: &App) -> Result<BatchReport, Error> {
        let Some(entries) = self.body.as_array() else {
            return Err(Error::from_context(ErrorType::NotAnArray, BatchRejected));
        };

        if entries.is_empty() {
            return Err(Error::from_context(ErrorType::EmptyBatch, BatchRejected));
        }

        let mut error_details = Vec::new();
        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match validation::validate(entry) {
                Ok(employee) => records.push((index, ConsentRecord::new(employee))),
                Err(error) => error_details.push(BatchEntryError::invalid(index, error)),
            }
        }

        // Every write is awaited before the report is built so the
        // count only includes records that actually landed. Records
        // sharing a phone number are written in order, the last one wins.
        let concurrency = app.config.store.batch_concurrency.get();
        let outcomes = stream::iter(group_by_phone_no(records))
            .map(|group| async move {
                let mut outcomes = Vec::with_capacity(group.len());
                for (index, record) in group {
                    outcomes.push((index, app.store.put(&record).await));
                }
                outcomes
            })
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut count_added = 0;
        for (index, outcome) in outcomes.into_iter().flatten() {
            match outcome {
                Ok(()) => count_added += 1,
                Err(report) => {
                    warn!(error = ?report, index, "Could not store batch record");
                    let cause = report.current_context().to_string();
                    error_details.push(BatchEntryError::write_failed(index, cause));
                }
            }
        }
        error_details.sort_by_key(|entry| entry.index);

        debug!(
            count_added,
            failed = error_details.len(),
            "Finished batch upsert"
        );

        Ok(BatchReport {
            error_details,
            count_added,
        })
    }
}

fn group_by_phone_no(records: Vec<(usize, ConsentRecord)>) -> Vec<Vec<(usize, ConsentRecord)>> {
    let mut groups: Vec<Vec<(usize, ConsentRecord)>> = Vec::new();
    let mut slots: HashMap<_, usize> = HashMap::new();
    for (index, record) in records {
        match slots.entry(record.employee.phone_no.clone()) {
            Entry::Occupied(slot) => {
                if let Some(group) = groups.get_mut(*slot.get()) {
                    group.push((index, record));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(vec![(index, record)]);
            }
        }
    }
    groups
}
