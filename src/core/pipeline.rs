use crate::core::layout::{build_view, DashboardView, LayoutOptions};
use crate::core::loader::parse_yield_csv;
use crate::core::metrics::{default_year, year_options};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{Artifact, RenderResult, RenderedPage, YieldTable};
use crate::render::{page_file_name, render_to_string, PageContext, YearLinks};
use crate::utils::error::{DashboardError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const BUNDLE_FILE_NAME: &str = "dashboard_bundle.zip";

/// Static dashboard: CSV from storage in, one HTML page per requested year out.
pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn years_to_render(&self, table: &YieldTable) -> Result<Vec<i32>> {
        if self.config.render_all_years() {
            return Ok(table.years());
        }
        let year = match self.config.selected_year() {
            Some(year) => year,
            None => default_year(&year_options(table)).ok_or(DashboardError::EmptyTable)?,
        };
        Ok(vec![year])
    }
}

/// Chart specs and the ranked table for one page, keyed by bundle path.
fn view_artifacts(view: &DashboardView) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();
    for (name, chart) in view.charts() {
        artifacts.push(Artifact {
            path: format!("charts/{}/{}.json", view.selected_year, name),
            contents: chart.to_json_pretty()?,
        });
    }
    artifacts.push(Artifact {
        path: format!("top_countries_{}.csv", view.selected_year),
        contents: view.top_countries.to_csv()?,
    });
    Ok(artifacts)
}

fn build_bundle(result: &RenderResult) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for page in &result.pages {
        zip.start_file(page.file_name.as_str(), options)?;
        zip.write_all(page.html.as_bytes())?;
    }
    for artifact in &result.artifacts {
        zip.start_file(artifact.path.as_str(), options)?;
        zip.write_all(artifact.contents.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<YieldTable> {
        tracing::debug!("Reading yield data from: {}", self.config.data_path());
        let data = self.storage.read_file(self.config.data_path()).await?;
        let table = parse_yield_csv(&data)?;

        if table.is_empty() {
            return Err(DashboardError::EmptyTable);
        }
        Ok(table)
    }

    async fn transform(&self, table: YieldTable) -> Result<RenderResult> {
        let options = LayoutOptions::from_config(&self.config);
        let years = self.years_to_render(&table)?;
        // 選單只連到實際輸出的頁面
        let ctx = PageContext::new(YearLinks::Files(years.clone()));
        let mut result = RenderResult::default();

        for year in years {
            let view = build_view(&table, Some(year), &options)?;
            tracing::debug!(
                "Built view for {}: {} ranked countries",
                view.selected_year,
                view.top_countries.rows.len()
            );

            if self.config.bundle() {
                result.artifacts.extend(view_artifacts(&view)?);
            }
            result.pages.push(RenderedPage {
                year: view.selected_year,
                file_name: page_file_name(view.selected_year),
                html: render_to_string(&view, &ctx)?,
            });
        }

        Ok(result)
    }

    async fn load(&self, result: RenderResult) -> Result<String> {
        for page in &result.pages {
            tracing::debug!("Writing {} ({} bytes)", page.file_name, page.html.len());
            self.storage
                .write_file(&self.output_file(&page.file_name), page.html.as_bytes())
                .await?;
        }

        if self.config.bundle() {
            let zip_data = build_bundle(&result)?;
            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            let bundle_path = self.output_file(BUNDLE_FILE_NAME);
            self.storage.write_file(&bundle_path, &zip_data).await?;
            return Ok(bundle_path);
        }

        result
            .pages
            .first()
            .map(|page| self.output_file(&page.file_name))
            .ok_or_else(|| DashboardError::RenderError {
                message: "no pages were rendered".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const CSV: &str = "Country Name,Year,Cereal_Yield\n\
                       Austria,2010,6300\n\
                       Bulgaria,2010,4000\n\
                       Austria,2011,6600\n\
                       Bulgaria,2011,3700\n";

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_data(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DashboardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_path: String,
        year: Option<i32>,
        all_years: bool,
        bundle: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                output_path: "out".to_string(),
                year: None,
                all_years: false,
                bundle: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn data_path(&self) -> &str {
            "yield.csv"
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn selected_year(&self) -> Option<i32> {
            self.year
        }

        fn render_all_years(&self) -> bool {
            self.all_years
        }

        fn threshold(&self) -> f64 {
            5000.0
        }

        fn color_theme(&self) -> &str {
            "viridis"
        }

        fn donut_colors(&self) -> [&str; 2] {
            ["#29b5e8", "#155F7A"]
        }

        fn bundle(&self) -> bool {
            self.bundle
        }
    }

    #[tokio::test]
    async fn test_extract_reads_table() {
        let pipeline = DashboardPipeline::new(MockStorage::with_data("yield.csv", CSV), MockConfig::new());
        let table = pipeline.extract().await.unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.years(), vec![2010, 2011]);
    }

    #[tokio::test]
    async fn test_extract_header_only_is_empty_table() {
        let storage = MockStorage::with_data("yield.csv", "Country Name,Year,Cereal_Yield\n");
        let pipeline = DashboardPipeline::new(storage, MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, DashboardError::EmptyTable));
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_data("other.csv", CSV);
        let pipeline = DashboardPipeline::new(storage, MockConfig::new());
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, DashboardError::IoError(_)));
    }

    #[tokio::test]
    async fn test_default_run_renders_earliest_year() {
        let storage = MockStorage::with_data("yield.csv", CSV);
        let pipeline = DashboardPipeline::new(storage.clone(), MockConfig::new());

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].year, 2010);
        assert!(result.artifacts.is_empty());

        let path = pipeline.load(result).await.unwrap();
        assert_eq!(path, Path::new("out").join("dashboard-2010.html").to_string_lossy());
        let html = String::from_utf8(storage.get_file(&path).await.unwrap()).unwrap();
        assert!(html.contains("Austria"));
        assert!(html.contains("<option value=\"dashboard-2010.html\" selected>2010</option>"));
        assert!(html.contains("<option disabled>2011</option>"));
    }

    #[tokio::test]
    async fn test_all_years_with_bundle() {
        let storage = MockStorage::with_data("yield.csv", CSV);
        let config = MockConfig {
            all_years: true,
            bundle: true,
            ..MockConfig::new()
        };
        let pipeline = DashboardPipeline::new(storage.clone(), config);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        assert_eq!(result.pages.len(), 2);
        // 4 charts + ranked table per year
        assert_eq!(result.artifacts.len(), 10);

        let path = pipeline.load(result).await.unwrap();
        assert!(path.ends_with(BUNDLE_FILE_NAME));

        let zip_data = storage.get_file(&path).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"dashboard-2010.html"));
        assert!(names.contains(&"dashboard-2011.html"));
        assert!(names.contains(&"charts/2011/heatmap.json"));
        assert!(names.contains(&"top_countries_2010.csv"));
    }

    #[tokio::test]
    async fn test_unknown_year_fails_transform() {
        let storage = MockStorage::with_data("yield.csv", CSV);
        let config = MockConfig {
            year: Some(1990),
            ..MockConfig::new()
        };
        let pipeline = DashboardPipeline::new(storage, config);
        let table = pipeline.extract().await.unwrap();
        let err = pipeline.transform(table).await.unwrap_err();
        assert!(matches!(err, DashboardError::NoDataForYear { year: 1990 }));
    }
}
