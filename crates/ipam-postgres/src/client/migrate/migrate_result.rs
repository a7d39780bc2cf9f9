use std::time::Duration;

/// Applied and pending migration versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Versions recorded in `__diesel_schema_migrations`, oldest first.
    pub applied_versions: Vec<String>,
    /// Embedded versions not yet recorded, oldest first.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Derives the status from the embedded and the recorded version lists.
    pub fn from_versions(embedded: Vec<String>, applied: Vec<String>) -> Self {
        let pending_versions = embedded
            .into_iter()
            .filter(|version| !applied.contains(version))
            .collect();

        Self {
            applied_versions: applied,
            pending_versions,
        }
    }

    /// Returns the most recently applied version.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }

    /// Returns the next version that would be applied.
    pub fn next_pending_version(&self) -> Option<&str> {
        self.pending_versions.first().map(String::as_str)
    }

    #[inline]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }
}

/// Outcome of [`run_pending_migrations`].
///
/// [`run_pending_migrations`]: super::run_pending_migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall time spent, including the status check.
    pub duration: Duration,
    /// Versions applied by this run, oldest first.
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    pub fn new(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
        }
    }

    /// Returns whether the schema was already current.
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }

    pub fn last_processed_version(&self) -> Option<&str> {
        self.processed_versions.last().map(String::as_str)
    }
}
