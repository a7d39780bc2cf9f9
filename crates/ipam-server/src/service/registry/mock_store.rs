use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ipam_postgres::model::{NewPrefix, Prefix};
use tokio::sync::Mutex;

use super::{PrefixStore, StoreError, StoreResult};

const NEVER: usize = usize::MAX;

/// In-memory [`PrefixStore`] with failure injection.
///
/// Clones share the same rows. Ids start at 1 and increase by one per
/// insert, like a `SERIAL` column.
#[derive(Debug, Clone, Default)]
pub struct MockPrefixStore {
    inner: Arc<MockInner>,
}

#[derive(Debug)]
struct MockInner {
    rows: Mutex<Vec<(Prefix, String)>>,
    fail_inserts: AtomicBool,
    fail_lists_after: AtomicUsize,
    open_cursors: AtomicUsize,
}

impl Default for MockInner {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_inserts: AtomicBool::new(false),
            fail_lists_after: AtomicUsize::new(NEVER),
            open_cursors: AtomicUsize::new(0),
        }
    }
}

/// Counts as one open cursor until dropped.
struct CursorGuard<'a>(&'a AtomicUsize);

impl<'a> CursorGuard<'a> {
    fn open(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockPrefixStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following insert fail.
    pub fn fail_inserts(&self, fail: bool) {
        self.inner.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every following list fail.
    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists_after(if fail { 0 } else { NEVER });
    }

    /// Makes following lists fail after yielding `rows` rows.
    pub fn fail_lists_after(&self, rows: usize) {
        self.inner.fail_lists_after.store(rows, Ordering::SeqCst);
    }

    /// Number of list cursors currently open.
    pub fn open_cursors(&self) -> usize {
        self.inner.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.inner.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stored `status` values in insertion order.
    pub async fn statuses(&self) -> Vec<String> {
        let rows = self.inner.rows.lock().await;
        rows.iter().map(|(_, status)| status.clone()).collect()
    }
}

#[async_trait::async_trait]
impl PrefixStore for MockPrefixStore {
    async fn insert_prefix(&self, prefix: NewPrefix) -> StoreResult<()> {
        if self.inner.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("insert rejected by mock store"));
        }

        let mut rows = self.inner.rows.lock().await;
        let id = i32::try_from(rows.len() + 1)
            .map_err(|_| StoreError::unavailable("mock store id space exhausted"))?;

        let status = prefix.status().to_owned();
        let row = Prefix {
            id,
            cidr: prefix.cidr,
            tags: prefix.tags,
        };

        rows.push((row, status));
        Ok(())
    }

    async fn list_prefixes(&self) -> StoreResult<Vec<Prefix>> {
        let _cursor = CursorGuard::open(&self.inner.open_cursors);
        let fail_after = self.inner.fail_lists_after.load(Ordering::SeqCst);

        let rows = self.inner.rows.lock().await;
        let mut prefixes = Vec::with_capacity(rows.len());
        for (index, (row, _)) in rows.iter().enumerate() {
            if index >= fail_after {
                return Err(StoreError::unavailable("cursor failed mid-iteration"));
            }
            prefixes.push(row.clone());
        }

        if fail_after == 0 {
            return Err(StoreError::unavailable("list rejected by mock store"));
        }

        Ok(prefixes)
    }
}
