//! PostgREST filter builders.

use crate::types::RecordId;

/// `eq.{id}`
pub(crate) fn id_eq(id: RecordId) -> String {
    format!("eq.{id}")
}

/// `in.(1,2,3)`
pub(crate) fn id_in(ids: &[RecordId]) -> String {
    let list = ids
        .iter()
        .map(RecordId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({list})")
}

/// URL-encoded `(f1.ilike."*q*",f2.ilike."*q*")` for an `or=` parameter.
///
/// The value is double-quoted so `,`, `.`, `(` and `)` in user input don't
/// break the filter grammar.
pub(crate) fn ilike_any(fields: &[&str], query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    let clauses = fields
        .iter()
        .map(|f| format!("{f}.ilike.\"*{escaped}*\""))
        .collect::<Vec<_>>()
        .join(",");
    urlencoding::encode(&format!("({clauses})")).into_owned()
}
