//! Duplicate / validity validator, run against the in-memory list before
//! every create or update.

use serde::Serialize;
use stork_inventory_backend::{FieldValue, InventoryRecord, RecordDraft, RecordField, RecordId, RecordKind};
use thiserror::Error;

use crate::utils::ip::is_valid_ipv4;

/// A locally detected problem with a candidate record. Never sent to the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("Required field is empty: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid IP format (e.g. 192.168.1.1): {value}")]
    InvalidIp { value: String },

    #[error("IP address {ip} already exists{}", conflict_suffix(.conflicting_name))]
    DuplicateIp {
        ip: String,
        conflicting_id: RecordId,
        conflicting_name: String,
    },

    #[error("An identical record already exists (#{conflicting_id})")]
    DuplicateRecord {
        kind: RecordKind,
        conflicting_id: RecordId,
    },
}

fn conflict_suffix(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" (conflicts with \"{name}\")")
    }
}

/// Validate `candidate` against `existing` (the full unfiltered list,
/// hidden records included). Pass `current_id` when updating so the record
/// does not collide with itself.
///
/// Rules, first failure wins:
/// 1. required fields are non-blank
/// 2. the IP, when present, is dotted IPv4
/// 3. no other record has the same IP
/// 4. no other record matches on every identity field
pub fn validate<R: InventoryRecord>(
    candidate: &R::Draft,
    existing: &[R],
    current_id: Option<RecordId>,
) -> Result<(), ValidationError> {
    let descriptor = R::descriptor();

    for &field in descriptor.required_fields {
        let blank = match candidate.field(field) {
            FieldValue::Text(v) => v.is_none_or(|s| s.trim().is_empty()),
            other => other.is_empty(),
        };
        if blank {
            return Err(ValidationError::MissingField {
                field: field.name(),
            });
        }
    }

    let ip = candidate.field(descriptor.ip_field).as_text();
    if let Some(ip) = ip
        && !is_valid_ipv4(ip)
    {
        return Err(ValidationError::InvalidIp {
            value: ip.to_string(),
        });
    }

    let others = || existing.iter().filter(move |r| Some(r.id()) != current_id);

    if let Some(ip) = ip
        && let Some(conflict) = others().find(|r| r.field(descriptor.ip_field).as_text() == Some(ip))
    {
        return Err(ValidationError::DuplicateIp {
            ip: ip.to_string(),
            conflicting_id: conflict.id(),
            conflicting_name: conflict.display_name(),
        });
    }

    if let Some(conflict) = others().find(|r| {
        descriptor
            .identity_fields
            .iter()
            .all(|&f| r.field(f) == candidate.field(f))
    }) {
        return Err(ValidationError::DuplicateRecord {
            kind: descriptor.kind,
            conflicting_id: conflict.id(),
        });
    }

    Ok(())
}
