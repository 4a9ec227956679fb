use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RenderMonitor;

/// Runs a dashboard pipeline once: load the table, lay out the page(s), write them.
pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: RenderMonitor,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RenderMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚜 Starting dashboard render");

        let table = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Loaded {} yield records ({} countries, {} years)",
            table.len(),
            table.countries().len(),
            table.years().len()
        );
        self.monitor.log_phase("Load");

        let result = self.pipeline.transform(table).await?;
        tracing::info!("🧮 Laid out {} page(s)", result.pages.len());
        self.monitor.log_phase("Layout");

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_phase("Write");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
