use crate::config::profile::SiteProfile;
use crate::domain::model::{Page, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Relative paths (with `/` separators) of every file ending in `extension`, sorted.
    fn list_files(
        &self,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn base_url(&self) -> Option<&Url>;
    fn profile(&self) -> &SiteProfile;
    fn stamp_year(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Page>>;
    async fn transform(&self, pages: Vec<Page>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
