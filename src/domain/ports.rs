use crate::domain::model::MovieDetails;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Weekday;

/// Document store the coordinator mirrors state into after each mutation.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn delete_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn command_prefix(&self) -> &str;
    fn poll_document(&self) -> &str;
    fn movie_document(&self) -> &str;
    fn movie_night(&self) -> (Weekday, u32);
}

/// Best-effort enrichment of a title for display. Never consulted for poll or
/// list state.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn describe(&self, title: &str) -> Result<MovieDetails>;
}
