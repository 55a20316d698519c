use crate::model::{PageRequest, SourceError};
use crate::source::PageSource;

pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageSource for FileSource {
    async fn fetch(&self, req: &PageRequest) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&req.input)
            .await
            .map_err(|source| SourceError::Io {
                path: req.input.clone(),
                source,
            })
    }
}
