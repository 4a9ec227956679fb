pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::DashboardSettings;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "agri-dashboard")]
#[command(about = "EU cereal yield dashboard: choropleth, heatmap, donuts and rankings")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a dashboard.toml; flags given here override it
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU/memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write static dashboard page(s)
    Render(RenderArgs),
    /// Serve the dashboard over HTTP, rebuilding the page on every request
    Serve(ServeArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct ChartArgs {
    /// Yield CSV with 'Country Name', 'Year' and 'Cereal_Yield' columns
    #[arg(short, long)]
    pub data: Option<String>,

    /// Yield (kg/ha) the donut charts split on
    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long)]
    pub color_theme: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    #[arg(short, long)]
    pub output: Option<String>,

    /// Selected year (defaults to the earliest year in the data)
    #[arg(short, long, conflicts_with = "all_years")]
    pub year: Option<i32>,

    /// One page per year, linked through the year selector
    #[arg(long)]
    pub all_years: bool,

    /// Also write dashboard_bundle.zip with pages, chart specs and rankings
    #[arg(long)]
    pub bundle: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    #[arg(long)]
    pub bind: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// JSON log lines instead of the compact format
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn log_json(&self) -> bool {
        matches!(&self.command, Command::Serve(args) if args.log_json)
    }

    /// 合併 TOML 與命令列參數
    pub fn resolve(&self) -> Result<DashboardSettings> {
        let mut settings = match &self.config {
            Some(path) => DashboardSettings::from_toml(&TomlConfig::from_file(path)?)?,
            None => DashboardSettings::default(),
        };

        let chart = match &self.command {
            Command::Render(args) => {
                if let Some(output) = &args.output {
                    settings.output_path = output.clone();
                }
                if args.year.is_some() {
                    settings.selected_year = args.year;
                    settings.all_years = false;
                }
                settings.all_years |= args.all_years;
                settings.bundle |= args.bundle;
                &args.chart
            }
            Command::Serve(args) => {
                if let Some(bind) = &args.bind {
                    settings.bind = bind.clone();
                }
                settings.port = args.port.unwrap_or(settings.port);
                &args.chart
            }
        };

        if let Some(data) = &chart.data {
            settings.data_path = data.clone();
        }
        settings.threshold = chart.threshold.unwrap_or(settings.threshold);
        if let Some(theme) = &chart.color_theme {
            settings.color_theme = theme.clone();
        }
        settings.monitor |= self.monitor;

        Ok(settings)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_flags_resolve() {
        let cli = CliConfig::parse_from([
            "agri-dashboard",
            "render",
            "--data",
            "eu.csv",
            "--year",
            "2014",
            "--bundle",
            "--threshold",
            "4500",
        ]);
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.data_path, "eu.csv");
        assert_eq!(settings.selected_year, Some(2014));
        assert!(settings.bundle);
        assert_eq!(settings.threshold, 4500.0);
        assert!(!cli.log_json());
    }

    #[test]
    fn test_year_conflicts_with_all_years() {
        let result = CliConfig::try_parse_from([
            "agri-dashboard",
            "render",
            "--year",
            "2014",
            "--all-years",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[data]
path = "from-toml.csv"

[charts]
color_theme = "magma"

[server]
port = 9000
"#,
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "agri-dashboard",
            "serve",
            "--config",
            path.as_str(),
            "--port",
            "9100",
            "--log-json",
        ]);
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.data_path, "from-toml.csv");
        assert_eq!(settings.color_theme, "magma");
        assert_eq!(settings.port, 9100);
        assert!(cli.log_json());
    }
}
