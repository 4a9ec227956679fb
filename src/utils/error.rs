use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing CSV column: {column}")]
    MissingColumnError { column: String },

    #[error("No yield records for year {year}")]
    NoDataForYear { year: i32 },

    #[error("Yield table is empty")]
    EmptyTable,

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Rendering,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::IoError(_) | DashboardError::ZipError(_) => ErrorCategory::Io,
            DashboardError::CsvError(_)
            | DashboardError::MissingColumnError { .. }
            | DashboardError::NoDataForYear { .. }
            | DashboardError::EmptyTable => ErrorCategory::Data,
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DashboardError::SerializationError(_) | DashboardError::RenderError { .. } => {
                ErrorCategory::Rendering
            }
            DashboardError::ServerError { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者選了沒有資料的年份，頁面仍可顯示
            DashboardError::NoDataForYear { .. } => ErrorSeverity::Low,
            DashboardError::ServerError { .. } => ErrorSeverity::Medium,
            DashboardError::CsvError(_)
            | DashboardError::MissingColumnError { .. }
            | DashboardError::EmptyTable
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::RenderError { .. }
            | DashboardError::SerializationError(_) => ErrorSeverity::High,
            DashboardError::IoError(_) | DashboardError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::IoError(_) => {
                "Check that the data file exists and the output directory is writable"
            }
            DashboardError::ZipError(_) => "Retry without --bundle or free up disk space",
            DashboardError::CsvError(_) | DashboardError::MissingColumnError { .. } => {
                "Make sure the CSV has 'Country Name', 'Year' and 'Cereal_Yield' columns"
            }
            DashboardError::SerializationError(_) | DashboardError::RenderError { .. } => {
                "Re-run with --verbose and report the failing chart"
            }
            DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. } => {
                "Review the command line flags and dashboard.toml"
            }
            DashboardError::NoDataForYear { .. } => "Pick one of the years listed in the sidebar",
            DashboardError::EmptyTable => "Point --data at a CSV that contains yield rows",
            DashboardError::ServerError { .. } => "Check that the bind address and port are free",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::IoError(e) => format!("Could not read or write a file: {}", e),
            DashboardError::CsvError(e) => format!("The yield data could not be parsed: {}", e),
            DashboardError::NoDataForYear { year } => {
                format!("There is no cereal yield data for {}", year)
            }
            DashboardError::EmptyTable => "The data file has no cereal yield rows".to_string(),
            other => other.to_string(),
        }
    }

    /// CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
