use crate::domain::model::{RenderResult, YieldTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// `None` means the earliest year in the table.
    fn selected_year(&self) -> Option<i32>;
    fn render_all_years(&self) -> bool;
    fn threshold(&self) -> f64;
    fn color_theme(&self) -> &str;
    fn donut_colors(&self) -> [&str; 2];
    fn bundle(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<YieldTable>;
    async fn transform(&self, table: YieldTable) -> Result<RenderResult>;
    async fn load(&self, result: RenderResult) -> Result<String>;
}
