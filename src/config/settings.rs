use crate::config::toml_config::TomlConfig;
use crate::core::charts::DEFAULT_DONUT_COLORS;
use crate::core::metrics::DEFAULT_THRESHOLD;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_color_theme, validate_file_extension, validate_hex_color, validate_non_empty_string,
    validate_path, validate_range, validate_threshold, Validate,
};
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_DATA_PATH: &str = "combined_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

/// Fully resolved settings: defaults, then `dashboard.toml`, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub data_path: String,
    pub output_path: String,
    pub selected_year: Option<i32>,
    pub all_years: bool,
    pub threshold: f64,
    pub color_theme: String,
    pub donut_colors: [String; 2],
    pub bundle: bool,
    pub bind: String,
    pub port: u16,
    pub monitor: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            selected_year: None,
            all_years: false,
            threshold: DEFAULT_THRESHOLD,
            color_theme: "viridis".to_string(),
            donut_colors: DEFAULT_DONUT_COLORS.map(str::to_string),
            bundle: false,
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            monitor: false,
        }
    }
}

impl DashboardSettings {
    /// 以 TOML 覆蓋預設值
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(data) = &config.data {
            settings.data_path = data.path.clone();
        }

        if let Some(charts) = &config.charts {
            if let Some(threshold) = charts.threshold {
                settings.threshold = threshold;
            }
            if let Some(theme) = &charts.color_theme {
                settings.color_theme = theme.clone();
            }
            if let Some(colors) = &charts.donut_colors {
                settings.donut_colors = match colors.as_slice() {
                    [track, fill] => [track.clone(), fill.clone()],
                    _ => {
                        return Err(DashboardError::ConfigValidationError {
                            field: "charts.donut_colors".to_string(),
                            message: format!("expected exactly 2 colors, got {}", colors.len()),
                        })
                    }
                };
            }
        }

        if let Some(output) = &config.output {
            if let Some(path) = &output.path {
                settings.output_path = path.clone();
            }
            settings.bundle = output.bundle.unwrap_or(settings.bundle);
            settings.all_years = output.all_years.unwrap_or(settings.all_years);
            settings.selected_year = output.year.or(settings.selected_year);
        }

        if let Some(server) = &config.server {
            if let Some(bind) = &server.bind {
                settings.bind = bind.clone();
            }
            settings.port = server.port.unwrap_or(settings.port);
        }

        settings.monitor = config.monitoring_enabled();
        Ok(settings)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|e| DashboardError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.bind.clone(),
                reason: format!("not an IP address: {}", e),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl ConfigProvider for DashboardSettings {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    fn render_all_years(&self) -> bool {
        self.all_years
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn color_theme(&self) -> &str {
        &self.color_theme
    }

    fn donut_colors(&self) -> [&str; 2] {
        [self.donut_colors[0].as_str(), self.donut_colors[1].as_str()]
    }

    fn bundle(&self) -> bool {
        self.bundle
    }
}

impl Validate for DashboardSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("data.path", &self.data_path)?;
        validate_path("data.path", &self.data_path)?;
        validate_file_extension("data.path", &self.data_path, &["csv"])?;
        validate_path("output.path", &self.output_path)?;
        validate_threshold("charts.threshold", self.threshold)?;
        validate_color_theme("charts.color_theme", &self.color_theme)?;
        for color in &self.donut_colors {
            validate_hex_color("charts.donut_colors", color)?;
        }
        validate_range("server.port", self.port, 1, u16::MAX)?;
        self.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = DashboardSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.threshold(), 5000.0);
        assert_eq!(settings.donut_colors(), ["#29b5e8", "#155F7A"]);
        assert_eq!(settings.socket_addr().unwrap().to_string(), "127.0.0.1:8501");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_theme = DashboardSettings {
            color_theme: "sparkly".to_string(),
            ..Default::default()
        };
        assert!(bad_theme.validate().is_err());

        let bad_data = DashboardSettings {
            data_path: "combined_data.json".to_string(),
            ..Default::default()
        };
        assert!(bad_data.validate().is_err());

        let bad_bind = DashboardSettings {
            bind: "localhost:80".to_string(),
            ..Default::default()
        };
        assert!(bad_bind.validate().is_err());

        let bad_threshold = DashboardSettings {
            threshold: -10.0,
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());
    }

    #[test]
    fn test_from_toml_overrides_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[data]
path = "data/eu_cereal.csv"

[charts]
threshold = 4000
color_theme = "cividis"

[output]
bundle = true
year = 2012

[server]
port = 9000
"#,
        )
        .unwrap();

        let settings = DashboardSettings::from_toml(&config).unwrap();
        assert_eq!(settings.data_path, "data/eu_cereal.csv");
        assert_eq!(settings.threshold, 4000.0);
        assert_eq!(settings.color_theme, "cividis");
        assert!(settings.bundle);
        assert_eq!(settings.selected_year, Some(2012));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.output_path, DEFAULT_OUTPUT_PATH);
    }

    #[test]
    fn test_from_toml_requires_two_donut_colors() {
        let config = TomlConfig::from_toml_str(
            r##"
[charts]
donut_colors = ["#29b5e8"]
"##,
        )
        .unwrap();
        assert!(DashboardSettings::from_toml(&config).is_err());
    }
}
