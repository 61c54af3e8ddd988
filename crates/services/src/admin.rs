//! Whole-store status and reset.

use std::sync::Arc;

use domains::{AdminRepository, DomainResult, StoreStatus};

pub struct AdminService {
    admin: Arc<dyn AdminRepository>,
}

impl AdminService {
    pub fn new(admin: Arc<dyn AdminRepository>) -> Self {
        Self { admin }
    }

    pub async fn status(&self) -> DomainResult<StoreStatus> {
        self.admin.status().await
    }

    pub async fn clear(&self) -> DomainResult<()> {
        self.admin.clear().await?;
        tracing::warn!("all forum data cleared");
        Ok(())
    }
}
