/// Snapshot of the connection pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolStatus {
    /// Upper bound on open connections.
    pub max_size: usize,
    /// Connections currently open.
    pub size: usize,
    /// Open connections that are idle.
    pub available: usize,
    /// Callers waiting for a connection.
    pub waiting: usize,
}

impl PgPoolStatus {
    /// Number of connections currently checked out.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.size.saturating_sub(self.available)
    }

    /// Fraction of the pool that is checked out, from 0.0 to 1.0.
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            return 0.0;
        }

        self.in_use() as f64 / self.max_size as f64
    }

    /// Returns whether callers are queueing or the pool is nearly exhausted.
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}
