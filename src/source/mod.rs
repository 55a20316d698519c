// Page sources: local files and HTTP

pub mod fetcher;
pub mod file;
pub mod traits;

pub use fetcher::HttpSource;
pub use file::FileSource;
pub use traits::PageSource;

use crate::model::{PageRequest, SourceError};

/// Dispatches each request to the file or HTTP source by its input.
pub struct AnySource {
    file: FileSource,
    http: HttpSource,
}

impl AnySource {
    pub fn new(file: FileSource, http: HttpSource) -> Self {
        Self { file, http }
    }
}

#[async_trait::async_trait]
impl PageSource for AnySource {
    async fn fetch(&self, req: &PageRequest) -> Result<String, SourceError> {
        if req.is_remote() {
            self.http.fetch(req).await
        } else {
            self.file.fetch(req).await
        }
    }
}
