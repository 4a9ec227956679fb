//! Declarative chart builders.
//!
//! Heatmap and donut charts are emitted as Vega-Lite specs, the animated
//! choropleth as a Plotly figure. Builders only borrow the table.

use crate::domain::model::{YieldTable, YEAR_FIELD};
use crate::utils::error::{DashboardError, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub const DEFAULT_DONUT_COLORS: [&str; 2] = ["#29b5e8", "#155F7A"];
const DONUT_SIZE: u32 = 130;
const DONUT_INNER_RADIUS: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    VegaLite,
    Plotly,
}

/// A chart ready to hand to the page: which renderer plus its JSON spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub spec: Value,
}

impl ChartSpec {
    fn vega_lite(spec: Value) -> Self {
        Self {
            kind: ChartKind::VegaLite,
            spec,
        }
    }

    fn plotly(spec: Value) -> Self {
        Self {
            kind: ChartKind::Plotly,
            spec,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.spec)?)
    }
}

/// Rows of the table as JSON objects keyed by the CSV column names.
fn table_values(table: &YieldTable) -> Result<Vec<Map<String, Value>>> {
    table
        .records()
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            other => Err(DashboardError::RenderError {
                message: format!("record did not serialize to an object: {}", other),
            }),
        })
        .collect()
}

fn require_field(rows: &[Map<String, Value>], field: &str) -> Result<()> {
    match rows.first() {
        Some(row) if !row.contains_key(field) => Err(DashboardError::RenderError {
            message: format!("unknown field '{}'", field),
        }),
        _ => Ok(()),
    }
}

/// Year × country grid coloured by the maximum of `color_field`.
pub fn make_heatmap(
    table: &YieldTable,
    y_field: &str,
    x_field: &str,
    color_field: &str,
    color_theme: &str,
) -> Result<ChartSpec> {
    let values = table_values(table)?;
    for field in [y_field, x_field, color_field] {
        require_field(&values, field)?;
    }

    Ok(ChartSpec::vega_lite(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": { "values": values },
        "mark": "rect",
        "width": 900,
        "encoding": {
            "y": {
                "field": y_field,
                "type": "ordinal",
                "axis": {
                    "title": "Year",
                    "titleFontSize": 18,
                    "titlePadding": 15,
                    "titleFontWeight": 900,
                    "labelAngle": 0
                }
            },
            "x": {
                "field": x_field,
                "type": "ordinal",
                "axis": {
                    "title": "",
                    "titleFontSize": 18,
                    "titlePadding": 15,
                    "titleFontWeight": 900
                }
            },
            "color": {
                "aggregate": "max",
                "field": color_field,
                "type": "quantitative",
                "legend": null,
                "scale": { "scheme": color_theme }
            },
            "stroke": { "value": "black" },
            "strokeWidth": { "value": 0.25 }
        },
        "config": {
            "axis": { "labelFontSize": 12, "titleFontSize": 12 }
        }
    })))
}

/// Animated map of Europe, one frame per year in order of first appearance.
///
/// `zmin`/`zmax` span the whole table so colours stay comparable between
/// frames.
pub fn make_choropleth(
    table: &YieldTable,
    id_field: &str,
    value_field: &str,
    color_theme: &str,
) -> Result<ChartSpec> {
    let values = table_values(table)?;
    for field in [id_field, value_field, YEAR_FIELD] {
        require_field(&values, field)?;
    }

    let (zmin, zmax) = table.yield_bounds().unwrap_or((0.0, 0.0));
    let value_label = value_field.replace('_', " ");
    let colorscale = plotly_colorscale(color_theme);

    let trace_for = |year: i32| -> Value {
        let rows: Vec<&Map<String, Value>> = values
            .iter()
            .filter(|row| row.get(YEAR_FIELD).and_then(Value::as_i64) == Some(i64::from(year)))
            .collect();
        let locations: Vec<&Value> = rows.iter().filter_map(|row| row.get(id_field)).collect();
        let z: Vec<&Value> = rows.iter().filter_map(|row| row.get(value_field)).collect();
        json!({
            "type": "choropleth",
            "locationmode": "country names",
            "locations": locations,
            "z": z,
            "zmin": zmin,
            "zmax": zmax,
            "colorscale": colorscale,
            "colorbar": { "title": { "text": value_label } },
            "hovertemplate": format!(
                "<b>%{{location}}</b><br>{}: %{{z}}<extra>{}</extra>",
                value_label, year
            )
        })
    };

    let years = table.years_by_appearance();
    let frames: Vec<Value> = years
        .iter()
        .map(|year| json!({ "name": year.to_string(), "data": [trace_for(*year)] }))
        .collect();
    let initial = years.first().map(|year| trace_for(*year));

    let slider_steps: Vec<Value> = years
        .iter()
        .map(|year| {
            json!({
                "label": year.to_string(),
                "method": "animate",
                "args": [[year.to_string()], {
                    "mode": "immediate",
                    "frame": { "duration": 300, "redraw": true },
                    "transition": { "duration": 0 }
                }]
            })
        })
        .collect();

    Ok(ChartSpec::plotly(json!({
        "data": initial.into_iter().collect::<Vec<_>>(),
        "frames": frames,
        "layout": {
            "font": { "color": "#fafafa" },
            "geo": {
                "scope": "europe",
                "bgcolor": "rgba(0, 0, 0, 0)",
                "showframe": false
            },
            "plot_bgcolor": "rgba(0, 0, 0, 0)",
            "paper_bgcolor": "rgba(0, 0, 0, 0)",
            "margin": { "l": 0, "r": 0, "t": 0, "b": 0 },
            "height": 600,
            "sliders": [{
                "active": 0,
                "currentvalue": { "prefix": format!("{}=", YEAR_FIELD) },
                "steps": slider_steps
            }],
            "updatemenus": [{
                "type": "buttons",
                "showactive": false,
                "x": 0.1,
                "y": 0,
                "xanchor": "right",
                "yanchor": "top",
                "buttons": [
                    {
                        "label": "▶",
                        "method": "animate",
                        "args": [null, {
                            "fromcurrent": true,
                            "frame": { "duration": 500, "redraw": true },
                            "transition": { "duration": 300 }
                        }]
                    },
                    {
                        "label": "◼",
                        "method": "animate",
                        "args": [[null], {
                            "mode": "immediate",
                            "frame": { "duration": 0, "redraw": false }
                        }]
                    }
                ]
            }]
        },
        "config": { "responsive": true, "displayModeBar": false }
    })))
}

/// Plotly accepts a handful of named scales; anything else falls back to Viridis.
fn plotly_colorscale(theme: &str) -> &'static str {
    match theme {
        "cividis" => "Cividis",
        "blues" => "Blues",
        "greens" => "Greens",
        "greys" => "Greys",
        "reds" => "Reds",
        "inferno" | "magma" | "plasma" => "Hot",
        "turbo" => "Jet",
        _ => "Viridis",
    }
}

/// Ring chart with a centre label: background track, value arc, text.
///
/// Percentages outside 0-100 are clamped so the two slices always add up to 100.
pub fn make_donut_chart(percentage: f64, input_text: &str, chart_colors: [&str; 2]) -> ChartSpec {
    let percentage = percentage.clamp(0.0, 100.0);
    let color = json!({
        "field": "Topic",
        "type": "nominal",
        "scale": { "domain": [input_text, ""], "range": chart_colors },
        "legend": null
    });
    let source = json!([
        { "Topic": input_text, "% value": percentage },
        { "Topic": "", "% value": 100.0 - percentage }
    ]);
    let source_bg = json!([
        { "Topic": input_text, "% value": 100.0 },
        { "Topic": "", "% value": 0.0 }
    ]);
    let theta = json!({ "field": "% value", "type": "quantitative" });

    ChartSpec::vega_lite(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": DONUT_SIZE,
        "height": DONUT_SIZE,
        "background": null,
        "layer": [
            {
                "data": { "values": source_bg },
                "mark": { "type": "arc", "innerRadius": DONUT_INNER_RADIUS, "cornerRadius": 20 },
                "encoding": { "theta": theta, "color": color }
            },
            {
                "data": { "values": source },
                "mark": { "type": "arc", "innerRadius": DONUT_INNER_RADIUS, "cornerRadius": 25 },
                "encoding": { "theta": theta, "color": color }
            },
            {
                "data": { "values": source },
                "mark": {
                    "type": "text",
                    "align": "center",
                    "color": "#29b5e8",
                    "font": "Lato",
                    "fontSize": 32,
                    "fontWeight": 700,
                    "fontStyle": "italic"
                },
                "encoding": { "text": { "value": format!("{:.1} %", percentage) } }
            }
        ]
    }))
}

/// The two slice values of a donut spec's value arc.
pub fn donut_slices(chart: &ChartSpec) -> Option<(f64, f64)> {
    let values = chart.spec.pointer("/layer/1/data/values")?.as_array()?;
    let value_at = |i: usize| values.get(i)?.get("% value")?.as_f64();
    Some((value_at(0)?, value_at(1)?))
}
