use crate::domain::model::{YieldRecord, YieldTable, COUNTRY_FIELD, YEAR_FIELD, YIELD_FIELD};
use crate::utils::error::{DashboardError, Result};

/// 解析 CSV 為 YieldTable，保留檔案順序
///
/// Columns other than `Country Name`, `Year` and `Cereal_Yield` are ignored.
/// Blank or `NaN` yields are kept as missing values.
pub fn parse_yield_csv(data: &[u8]) -> Result<YieldTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in [COUNTRY_FIELD, YEAR_FIELD, YIELD_FIELD] {
        if !headers.iter().any(|h| h == column) {
            return Err(DashboardError::MissingColumnError {
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<YieldRecord>() {
        let mut record = row?;
        // NaN 與空白同樣視為缺值
        record.cereal_yield = record.cereal_yield.filter(|v| !v.is_nan());
        records.push(record);
    }

    let table = YieldTable::new(records);
    let missing = table.missing_yields();
    if missing > 0 {
        tracing::warn!("⚠️ {} rows have no Cereal_Yield value", missing);
    }
    for (country, year) in table.duplicate_keys() {
        tracing::warn!("⚠️ Duplicate record for {} in {}", country, year);
    }

    tracing::debug!(
        "Parsed {} yield records covering {} years",
        table.len(),
        table.years().len()
    );
    Ok(table)
}
