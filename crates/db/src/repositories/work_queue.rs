use chrono::{Duration, Utc};
use sqlx::Row;
use uuid::Uuid;

use dinebot_core::domain::work_item::{
    MessageAttributes, MessageId, ReceiptHandle, ReceivedMessage, WorkItem, WORK_ITEM_BODY,
};

use super::memory::visibility_window;
use super::{RepositoryError, WorkQueue};
use crate::DbPool;

#[derive(Clone)]
pub struct SqlWorkQueue {
    pool: DbPool,
    queue_name: String,
    visibility_timeout: Duration,
}

impl SqlWorkQueue {
    pub fn new(pool: DbPool, queue_name: impl Into<String>, visibility_timeout_secs: u64) -> Self {
        Self {
            pool,
            queue_name: queue_name.into(),
            visibility_timeout: visibility_window(visibility_timeout_secs),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Messages not yet deleted, visible or not.
    pub async fn depth(&self) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM work_queue_message WHERE queue_name = ?")
                .bind(&self.queue_name)
                .fetch_one(&self.pool)
                .await?;
        u64::try_from(count)
            .map_err(|_| RepositoryError::Decode(format!("negative queue depth: {count}")))
    }
}

#[async_trait::async_trait]
impl WorkQueue for SqlWorkQueue {
    async fn send(&self, item: &WorkItem) -> Result<MessageId, RepositoryError> {
        let message_id = MessageId(Uuid::new_v4().to_string());
        let now = Utc::now();
        let attributes_json = serde_json::to_string(&item.to_attributes())
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        sqlx::query(
            "INSERT INTO work_queue_message (
                message_id,
                queue_name,
                body,
                attributes_json,
                receipt_handle,
                receive_count,
                visible_after_ms,
                enqueued_at
             ) VALUES (?, ?, ?, ?, NULL, 0, ?, ?)",
        )
        .bind(&message_id.0)
        .bind(&self.queue_name)
        .bind(WORK_ITEM_BODY)
        .bind(attributes_json)
        .bind(now.timestamp_millis())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(message_id)
    }

    async fn receive(&self, max_messages: u32) -> Result<Vec<ReceivedMessage>, RepositoryError> {
        let now = Utc::now();
        let hidden_until = (now + self.visibility_timeout).timestamp_millis();
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT seq, message_id, body, attributes_json, receive_count
             FROM work_queue_message
             WHERE queue_name = ? AND visible_after_ms <= ?
             ORDER BY seq ASC
             LIMIT ?",
        )
        .bind(&self.queue_name)
        .bind(now.timestamp_millis())
        .bind(i64::from(max_messages))
        .fetch_all(&mut *tx)
        .await?;

        let mut received = Vec::with_capacity(rows.len());
        for row in rows {
            let seq: i64 = row.try_get("seq")?;
            let receive_count = parse_u32("receive_count", row.try_get("receive_count")?)? + 1;
            let receipt_handle = ReceiptHandle(Uuid::new_v4().to_string());

            sqlx::query(
                "UPDATE work_queue_message
                 SET receipt_handle = ?, receive_count = ?, visible_after_ms = ?
                 WHERE seq = ?",
            )
            .bind(&receipt_handle.0)
            .bind(i64::from(receive_count))
            .bind(hidden_until)
            .bind(seq)
            .execute(&mut *tx)
            .await?;

            received.push(ReceivedMessage {
                message_id: MessageId(row.try_get("message_id")?),
                receipt_handle,
                body: row.try_get("body")?,
                attributes: parse_attributes(row.try_get("attributes_json")?)?,
                receive_count,
            });
        }

        tx.commit().await?;
        Ok(received)
    }

    async fn delete(&self, receipt: &ReceiptHandle) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM work_queue_message WHERE queue_name = ? AND receipt_handle = ?",
        )
        .bind(&self.queue_name)
        .bind(&receipt.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn parse_attributes(value: String) -> Result<MessageAttributes, RepositoryError> {
    serde_json::from_str(&value).map_err(|error| {
        RepositoryError::Decode(format!("invalid message attributes `{value}` ({error})"))
    })
}

fn parse_u32(column: &str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value).map_err(|_| {
        RepositoryError::Decode(format!(
            "invalid value for `{column}` (expected non-negative u32): {value}"
        ))
    })
}
