//! HTML page for one [`DashboardView`], charts drawn client side with
//! vega-embed and plotly.js.

use crate::core::layout::{DashboardView, COLUMN_WIDTHS, MISSING_YIELD, PAGE_ICON};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::io::Write;

/// How the year selector reaches another year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearLinks {
    /// Served pages: `?year=2010` against the current path.
    Query,
    /// Static export: sibling files named by [`page_file_name`], only for
    /// the years that were written.
    Files(Vec<i32>),
}

impl YearLinks {
    fn href(&self, year: i32) -> Option<String> {
        match self {
            YearLinks::Query => Some(format!("?year={}", year)),
            YearLinks::Files(written) if written.contains(&year) => Some(page_file_name(year)),
            YearLinks::Files(_) => None,
        }
    }
}

pub fn page_file_name(year: i32) -> String {
    format!("dashboard-{}.html", year)
}

#[derive(Debug, Clone)]
pub struct PageContext {
    pub links: YearLinks,
    pub generated_at: DateTime<Utc>,
}

impl PageContext {
    pub fn new(links: YearLinks) -> Self {
        Self {
            links,
            generated_at: Utc::now(),
        }
    }
}

pub fn render_to_string(view: &DashboardView, ctx: &PageContext) -> Result<String> {
    let mut buf = Vec::new();
    write_page(&mut buf, view, ctx)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_page<W: Write>(writer: &mut W, view: &DashboardView, ctx: &PageContext) -> Result<()> {
    let options = year_options_html(view, &ctx.links);
    let callouts = callouts_html(view);
    let donuts = donuts_html(view);
    let table = table_html(view);
    let about = about_html(view);
    let charts = charts_script(view)?;
    let [w1, w2, w3] = COLUMN_WIDTHS;

    write!(
        writer,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>{icon}</text></svg>">
    <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
    <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
    <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        :root {{
            --bg: #0e1117;
            --card: #262730;
            --border: #31333f;
            --text: #fafafa;
            --dim: #a3a8b8;
            --accent: #29b5e8;
            --up: #09ab3b;
            --orange: #ffa421;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: "Source Sans Pro", -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
            display: flex;
            min-height: 100vh;
        }}
        aside {{
            width: 18rem;
            flex-shrink: 0;
            background: var(--card);
            padding: 2rem 1.5rem;
        }}
        aside h1 {{ font-size: 1.6rem; margin-bottom: 1.5rem; }}
        aside label {{ display: block; color: var(--dim); font-size: 0.875rem; margin-bottom: 0.4rem; }}
        aside select {{
            width: 100%;
            padding: 0.5rem;
            background: var(--bg);
            color: var(--text);
            border: 1px solid var(--border);
            border-radius: 6px;
        }}
        main {{
            flex: 1;
            display: grid;
            grid-template-columns: {w1}fr {w2}fr {w3}fr;
            gap: 2rem;
            padding: 2rem;
            min-width: 0;
        }}
        section {{ min-width: 0; }}
        h4 {{ font-size: 1.25rem; margin: 0 0 1rem; }}
        .metric {{ margin-bottom: 1.5rem; }}
        .metric-label {{ color: var(--dim); font-size: 0.875rem; }}
        .metric-value {{ font-size: 2rem; }}
        .metric-delta {{
            font-size: 0.875rem;
            display: inline-block;
            padding: 0 0.4rem;
            border-radius: 1rem;
            color: var(--up);
            background: rgba(9, 171, 59, 0.15);
        }}
        .donut {{ margin: 0 auto 1rem; width: 130px; }}
        .donut p {{ text-align: center; margin-bottom: 0.25rem; }}
        table {{ width: 100%; border-collapse: collapse; font-size: 0.9rem; margin-bottom: 1.5rem; }}
        th {{ text-align: left; color: var(--dim); font-weight: 400; border-bottom: 1px solid var(--border); padding: 0.4rem; }}
        td {{ padding: 0.4rem; border-bottom: 1px solid var(--border); }}
        .bar {{ background: var(--border); border-radius: 4px; height: 6px; margin-top: 0.2rem; }}
        .bar span {{ display: block; height: 100%; background: var(--accent); border-radius: 4px; }}
        details {{ border: 1px solid var(--border); border-radius: 8px; padding: 0.75rem 1rem; }}
        summary {{ cursor: pointer; margin-bottom: 0.5rem; }}
        details li {{ margin-left: 1rem; margin-bottom: 0.4rem; }}
        details strong {{ color: var(--orange); }}
        a {{ color: var(--accent); }}
        footer {{ color: var(--dim); font-size: 0.75rem; margin-top: 2rem; }}
    </style>
</head>
<body>
<aside>
    <h1>{sidebar_title}</h1>
    <label for="year">Select a year</label>
    <select id="year" onchange="window.location.href = this.value;">
{options}    </select>
    <footer>Generated {generated_at}</footer>
</aside>
<main>
    <section id="gains-losses">
        <h4>Gains/Losses</h4>
{callouts}        <h4>States Migration</h4>
{donuts}    </section>
    <section id="cereal-yield">
        <h4>Cereal Yield</h4>
        <div id="choropleth"></div>
        <div id="heatmap"></div>
    </section>
    <section id="top-countries">
        <h4>Top Countries</h4>
{table}{about}    </section>
</main>
<script>
{charts}
</script>
</body>
</html>
"#,
        title = html_escape(&view.title),
        icon = PAGE_ICON,
        sidebar_title = html_escape(&view.sidebar_title),
        generated_at = ctx.generated_at.format("%Y-%m-%d %H:%M UTC"),
    )?;

    Ok(())
}

fn year_options_html(view: &DashboardView, links: &YearLinks) -> String {
    view.year_options
        .iter()
        .map(|year| {
            let selected = if *year == view.selected_year {
                " selected"
            } else {
                ""
            };
            match links.href(*year) {
                Some(href) => format!(
                    "        <option value=\"{}\"{}>{}</option>\n",
                    html_escape(&href),
                    selected,
                    year
                ),
                // 沒有輸出該年份的頁面
                None => format!("        <option disabled>{}</option>\n", year),
            }
        })
        .collect()
}

fn callouts_html(view: &DashboardView) -> String {
    view.gains_losses
        .iter()
        .map(|callout| {
            format!(
                r#"        <div class="metric">
            <div class="metric-label">{}</div>
            <div class="metric-value">{}</div>
            <div class="metric-delta">↑ {}</div>
        </div>
"#,
                html_escape(&callout.label),
                html_escape(&callout.value),
                html_escape(&callout.delta)
            )
        })
        .collect()
}

fn donuts_html(view: &DashboardView) -> String {
    view.migrations
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            format!(
                "        <div class=\"donut\"><p>{}</p><div id=\"donut_{}\"></div></div>\n",
                html_escape(&panel.caption),
                i
            )
        })
        .collect()
}

fn table_html(view: &DashboardView) -> String {
    let max = view.top_countries.max_yield;
    let rows: String = view
        .top_countries
        .rows
        .iter()
        .map(|row| {
            let width = match row.cereal_yield {
                Some(v) if max > 0.0 => (v / max * 100.0).clamp(0.0, 100.0),
                _ => 0.0,
            };
            let value = row
                .cereal_yield
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| MISSING_YIELD.to_string());
            format!(
                "            <tr><td>{}</td><td>{}<div class=\"bar\"><span style=\"width: {:.1}%\"></span></div></td></tr>\n",
                html_escape(&row.country),
                value,
                width
            )
        })
        .collect();

    format!(
        r#"        <table>
            <thead><tr><th>Country</th><th>Cereal Yield (kg/ha)</th></tr></thead>
            <tbody>
{}            </tbody>
        </table>
"#,
        rows
    )
}

fn about_html(view: &DashboardView) -> String {
    let items: String = view
        .about
        .iter()
        .map(|item| {
            format!(
                "                <li><strong>{}</strong>: {}</li>\n",
                html_escape(&item.heading),
                html_escape(&item.text)
            )
        })
        .collect();

    format!(
        r#"        <details open>
            <summary>About</summary>
            <ul>
                <li>Data: <a href="{}">World Bank</a>.</li>
{}            </ul>
        </details>
"#,
        html_escape(&view.data_source_url),
        items
    )
}

fn charts_script(view: &DashboardView) -> Result<String> {
    let mut script = String::from(
        "const embedOpts = { actions: false, renderer: \"svg\", theme: \"dark\" };\n",
    );
    script.push_str(&format!(
        "Plotly.newPlot(\"choropleth\", {}).then(gd => Plotly.addFrames(gd, {}));\n",
        script_json(&serde_json::json!({
            "data": view.choropleth.spec["data"],
            "layout": view.choropleth.spec["layout"],
            "config": view.choropleth.spec["config"],
        }))?,
        script_json(&view.choropleth.spec["frames"])?,
    ));
    script.push_str(&format!(
        "vegaEmbed(\"#heatmap\", {}, embedOpts);\n",
        script_json(&view.heatmap.spec)?
    ));
    for (i, panel) in view.migrations.iter().enumerate() {
        script.push_str(&format!(
            "vegaEmbed(\"#donut_{}\", {}, embedOpts);\n",
            i,
            script_json(&panel.chart.spec)?
        ));
    }
    Ok(script)
}

/// JSON safe to drop inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
