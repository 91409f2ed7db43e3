use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use rusqlite::Connection;

use super::NotificationSink;
use crate::db::queries;
use crate::models::NotificationEvent;

/// Writes events to the notifications table, where recipients poll them.
pub struct StoreSink {
    db: Arc<Mutex<Connection>>,
}

impl StoreSink {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for StoreSink {
    async fn deliver(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        let db = self.db.lock().unwrap();
        queries::insert_notification(&db, event).context("failed to store notification")?;
        Ok(())
    }
}
