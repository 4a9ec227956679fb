use crate::utils::error::{DashboardError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Vega / Plotly 都認得的連續色階
pub const KNOWN_COLOR_THEMES: &[&str] = &[
    "blues", "cividis", "greens", "greys", "inferno", "magma", "plasma", "reds", "turbo", "viridis",
];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension.to_ascii_lowercase().as_str()) => {
            Ok(())
        }
        Some(extension) => Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_threshold(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Threshold must be a finite, non-negative number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_color_theme(field_name: &str, theme: &str) -> Result<()> {
    if !KNOWN_COLOR_THEMES.contains(&theme) {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: theme.to_string(),
            reason: format!(
                "Unknown color theme. Valid themes: {}",
                KNOWN_COLOR_THEMES.join(", ")
            ),
        });
    }
    Ok(())
}

pub fn validate_hex_color(field_name: &str, color: &str) -> Result<()> {
    let digits = color.strip_prefix('#').unwrap_or("");
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: color.to_string(),
            reason: "Expected a #rrggbb color".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data.path", "combined_data.csv").is_ok());
        assert!(validate_path("data.path", "").is_err());
        assert!(validate_path("data.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("data.path", "combined_data.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("data.path", "COMBINED.CSV", &["csv"]).is_ok());
        assert!(validate_file_extension("data.path", "combined_data.xlsx", &["csv"]).is_err());
        assert!(validate_file_extension("data.path", "combined_data", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold("charts.threshold", 5000.0).is_ok());
        assert!(validate_threshold("charts.threshold", 0.0).is_ok());
        assert!(validate_threshold("charts.threshold", -1.0).is_err());
        assert!(validate_threshold("charts.threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_color_theme_and_hex() {
        assert!(validate_color_theme("charts.color_theme", "viridis").is_ok());
        assert!(validate_color_theme("charts.color_theme", "rainbow-ish").is_err());
        assert!(validate_hex_color("charts.donut_colors", "#29b5e8").is_ok());
        assert!(validate_hex_color("charts.donut_colors", "#155F7A").is_ok());
        assert!(validate_hex_color("charts.donut_colors", "29b5e8").is_err());
        assert!(validate_hex_color("charts.donut_colors", "#29b5e").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("server.port", 8501u16, 1, u16::MAX).is_ok());
        assert!(validate_range("server.port", 0u16, 1, u16::MAX).is_err());
    }
}
