use crate::core::charts::{
    make_choropleth, make_donut_chart, make_heatmap, ChartSpec, DEFAULT_DONUT_COLORS,
};
use crate::core::metrics::{
    complement, default_year, format_number, highest_yield, lowest_yield, percentage_above,
    sorted_by_yield_desc, year_options, DEFAULT_THRESHOLD,
};
use crate::domain::model::{YieldRecord, YieldTable, COUNTRY_FIELD, YEAR_FIELD, YIELD_FIELD};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use serde::Serialize;

pub const PAGE_TITLE: &str = "Agricultural Data Dashboard";
pub const PAGE_ICON: &str = "🚜";
pub const SIDEBAR_TITLE: &str = "🚜 EU Agriculture Dashboard";
pub const DATA_SOURCE_URL: &str =
    "https://databank.worldbank.org/source/world-development-indicators/Type/TABLE/preview/on";

/// Shown wherever a yield was not reported.
pub const MISSING_YIELD: &str = "n/a";

/// Relative widths of the three page columns.
pub const COLUMN_WIDTHS: [f64; 3] = [1.5, 4.5, 2.0];

/// Knobs for one page build, usually taken from a [`ConfigProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub threshold: f64,
    pub color_theme: String,
    pub donut_colors: [String; 2],
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            color_theme: "viridis".to_string(),
            donut_colors: DEFAULT_DONUT_COLORS.map(str::to_string),
        }
    }
}

impl LayoutOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            threshold: config.threshold(),
            color_theme: config.color_theme().to_string(),
            donut_colors: config.donut_colors().map(str::to_string),
        }
    }

    fn donut_colors(&self) -> [&str; 2] {
        [self.donut_colors[0].as_str(), self.donut_colors[1].as_str()]
    }

    fn threshold_label(&self) -> String {
        format!("{}kg/ha", self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCallout {
    pub label: String,
    pub value: String,
    pub delta: String,
}

impl MetricCallout {
    fn for_record(record: &YieldRecord, delta: &str) -> Self {
        Self {
            label: record.country_name.clone(),
            value: format!(
                "{} kg/ha",
                record
                    .cereal_yield
                    .map(format_number)
                    .unwrap_or_else(|| MISSING_YIELD.to_string())
            ),
            delta: delta.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutPanel {
    pub caption: String,
    pub percentage: f64,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub country: String,
    pub cereal_yield: Option<f64>,
}

/// Column 3 table: selected-year rows, best yield first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCountries {
    pub rows: Vec<RankedRow>,
    /// Upper bound for the progress bars.
    pub max_yield: f64,
}

impl TopCountries {
    fn from_rows(rows: &[&YieldRecord]) -> Self {
        let rows: Vec<RankedRow> = sorted_by_yield_desc(rows)
            .into_iter()
            .map(|r| RankedRow {
                country: r.country_name.clone(),
                cereal_yield: r.cereal_yield,
            })
            .collect();
        let max_yield = rows.iter().find_map(|r| r.cereal_yield).unwrap_or(0.0);
        Self { rows, max_yield }
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Country", "Cereal Yield (kg/ha)"])?;
        for row in &self.rows {
            let value = row.cereal_yield.map(|v| v.to_string()).unwrap_or_default();
            writer.write_record([row.country.clone(), value])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DashboardError::RenderError {
                message: format!("could not flush ranked table: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| DashboardError::RenderError {
            message: format!("ranked table is not UTF-8: {}", e),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutItem {
    pub heading: String,
    pub text: String,
}

/// Everything one page shows for one selected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub sidebar_title: String,
    pub year_options: Vec<i32>,
    pub selected_year: i32,
    pub gains_losses: Vec<MetricCallout>,
    pub migrations: Vec<DonutPanel>,
    pub choropleth: ChartSpec,
    pub heatmap: ChartSpec,
    pub top_countries: TopCountries,
    pub about: Vec<AboutItem>,
    pub data_source_url: String,
}

impl DashboardView {
    /// Every chart on the page with a stable file-friendly name.
    pub fn charts(&self) -> Vec<(String, &ChartSpec)> {
        let mut charts = vec![
            ("choropleth".to_string(), &self.choropleth),
            ("heatmap".to_string(), &self.heatmap),
        ];
        for (i, panel) in self.migrations.iter().enumerate() {
            charts.push((format!("donut_{}", i), &panel.chart));
        }
        charts
    }
}

/// Runs the page top to bottom for `selected_year` (earliest year when `None`).
pub fn build_view(
    table: &YieldTable,
    selected_year: Option<i32>,
    options: &LayoutOptions,
) -> Result<DashboardView> {
    let years = year_options(table);
    let selected_year = match selected_year {
        Some(year) => year,
        None => default_year(&years).ok_or(DashboardError::EmptyTable)?,
    };

    let selected_rows = table.for_year(selected_year);
    let (Some(highest), Some(lowest)) = (highest_yield(&selected_rows), lowest_yield(&selected_rows))
    else {
        return Err(DashboardError::NoDataForYear {
            year: selected_year,
        });
    };
    tracing::debug!(
        "📅 Year {}: {} rows, highest {} ({:?}), lowest {} ({:?})",
        selected_year,
        selected_rows.len(),
        highest.country_name,
        highest.cereal_yield,
        lowest.country_name,
        lowest.cereal_yield
    );

    let gains_losses = vec![
        MetricCallout::for_record(highest, "Highest Cereal Yield"),
        MetricCallout::for_record(lowest, "Lowest Cereal Yield"),
    ];

    let above = percentage_above(&selected_rows, options.threshold).ok_or(
        DashboardError::NoDataForYear {
            year: selected_year,
        },
    )?;
    let below = complement(above);
    let threshold_label = options.threshold_label();
    let migrations = vec![
        DonutPanel {
            caption: format!("Above {}", threshold_label),
            percentage: above,
            chart: make_donut_chart(
                above,
                &format!("Cereal Yield > {}", threshold_label),
                options.donut_colors(),
            ),
        },
        DonutPanel {
            caption: format!("Below {}", threshold_label),
            percentage: below,
            chart: make_donut_chart(
                below,
                &format!("Cereal Yield < {}", threshold_label),
                options.donut_colors(),
            ),
        },
    ];

    let choropleth = make_choropleth(table, COUNTRY_FIELD, YIELD_FIELD, &options.color_theme)?;
    let heatmap = make_heatmap(
        table,
        YEAR_FIELD,
        COUNTRY_FIELD,
        YIELD_FIELD,
        &options.color_theme,
    )?;

    Ok(DashboardView {
        title: PAGE_TITLE.to_string(),
        sidebar_title: SIDEBAR_TITLE.to_string(),
        year_options: years,
        selected_year,
        gains_losses,
        migrations,
        choropleth,
        heatmap,
        top_countries: TopCountries::from_rows(&selected_rows),
        about: about_items(&threshold_label),
        data_source_url: DATA_SOURCE_URL.to_string(),
    })
}

fn about_items(threshold_label: &str) -> Vec<AboutItem> {
    vec![
        AboutItem {
            heading: "Highest/Lowest Yield".to_string(),
            text: "countries with high/low cereal yield for selected year".to_string(),
        },
        AboutItem {
            heading: format!("Countries with Yield above/below {}", threshold_label),
            text: format!(
                "percentage of countries with yield above/below {}",
                threshold_label
            ),
        },
    ]
}
