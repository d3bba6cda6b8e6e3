use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use voxgate_core::AppResult;
use voxgate_domain::ContactMessage;

/// Port for persisting contact-form submissions.
#[async_trait]
pub trait ContactSubmissionRepository: Send + Sync {
    /// Stores one validated submission.
    async fn save_submission(&self, message: ContactMessage) -> AppResult<()>;
}

/// Application service for the public contact form.
#[derive(Clone)]
pub struct ContactService {
    repository: Arc<dyn ContactSubmissionRepository>,
}

impl ContactService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn ContactSubmissionRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores a contact-form submission.
    pub async fn submit(&self, email: &str, message: &str) -> AppResult<()> {
        let message = ContactMessage::new(email, message)?;
        self.repository.save_submission(message).await?;
        info!("contact submission stored");
        Ok(())
    }
}
