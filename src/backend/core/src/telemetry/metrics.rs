//! Counter names and descriptions.

use metrics::describe_counter;

/// Every constructed `ContactsError`, labelled by code, category and severity.
pub const ERRORS_TOTAL: &str = "contacts_errors_total";

/// Authorization pipeline outcomes, labelled by operation and result.
pub const AUTHORIZATION_DECISIONS_TOTAL: &str = "contacts_authorization_decisions_total";

/// Records created by the seeding routine, labelled by kind (user, role, contact).
pub const SEED_RECORDS_TOTAL: &str = "contacts_seed_records_total";

/// Describe every counter the core records.
///
/// Descriptions are attached to whichever recorder is installed, so the host
/// should install its exporter before calling this.
pub fn register_metrics() {
    describe_counter!(ERRORS_TOTAL, "Total number of errors by code");
    describe_counter!(
        AUTHORIZATION_DECISIONS_TOTAL,
        "Total number of authorization decisions by operation and outcome"
    );
    describe_counter!(
        SEED_RECORDS_TOTAL,
        "Total number of records created while seeding"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_without_recorder() {
        // No recorder installed: describing is a no-op
        register_metrics();
        register_metrics();
    }

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [ERRORS_TOTAL, AUTHORIZATION_DECISIONS_TOTAL, SEED_RECORDS_TOTAL] {
            assert!(name.starts_with("contacts_"));
            assert!(name.ends_with("_total"));
        }
    }
}
