//! Homeworks repository
//!
//! Fetches raw homework status answers from the grading API.

use async_trait::async_trait;
use homework_client::{PracticumClient, Result};
use serde_json::Value;

/// Repository trait for reading homework statuses
#[async_trait]
pub trait HomeworkRepository: Send + Sync {
    /// Fetches the statuses changed since `from_date`
    ///
    /// Returns the decoded JSON answer as is; a transport failure or a
    /// non-success status is an error.
    ///
    /// # Arguments
    /// * `from_date` - Unix timestamp, lower bound of the updates
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value>;
}

/// HTTP implementation of HomeworkRepository
pub struct PracticumHomeworkRepository {
    client: PracticumClient,
}

impl PracticumHomeworkRepository {
    /// Creates a new repository backed by the grading API client
    pub fn new(client: PracticumClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HomeworkRepository for PracticumHomeworkRepository {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value> {
        self.client.homework_statuses(from_date).await
    }
}
