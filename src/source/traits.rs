use crate::model::{PageRequest, SourceError};

#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, req: &PageRequest) -> Result<String, SourceError>;
}
