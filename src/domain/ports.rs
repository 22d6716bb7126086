use crate::domain::model::FortuneText;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端文字生成服務
#[async_trait]
pub trait FortuneTeller: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<FortuneText>;
}

pub trait ConfigProvider: Send + Sync {
    fn service_endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout_seconds(&self) -> Option<u64>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
