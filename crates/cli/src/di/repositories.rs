use gridrank_application::ports::RecordStore;
use gridrank_infrastructure::repositories::SqliteRecordStore;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub records: Arc<dyn RecordStore>,
}

impl Repositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            records: Arc::new(SqliteRecordStore::new(pool)),
        }
    }
}
