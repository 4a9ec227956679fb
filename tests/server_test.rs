use agri_dashboard::core::layout::LayoutOptions;
use agri_dashboard::core::YieldRecord;
use agri_dashboard::server::{router, AppState};
use reqwest::StatusCode;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let table = vec![
        YieldRecord::new("Ireland", 2016, 7842.0),
        YieldRecord::new("Latvia", 2016, 3530.0),
        YieldRecord::new("Ireland", 2017, 8600.0),
        YieldRecord::new("Latvia", 2017, 3410.0),
        YieldRecord::new("Lithuania", 2017, 4420.0),
    ]
    .into_iter()
    .collect();
    let state = AppState::new(table, LayoutOptions::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_healthz() {
    let base = spawn_server().await;
    let body = reqwest::get(format!("{}/healthz", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_page_defaults_to_earliest_year() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("<option value=\"?year=2016\" selected>2016</option>"));
    assert!(html.contains("<option value=\"?year=2017\">2017</option>"));
    assert!(html.contains("<div class=\"metric-label\">Ireland</div>"));
}

#[tokio::test]
async fn test_page_reruns_for_selected_year() {
    let base = spawn_server().await;
    let html = reqwest::get(format!("{}/?year=2017", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("<option value=\"?year=2017\" selected>2017</option>"));
    assert!(html.contains("<td>Lithuania</td>"));
    assert!(html.contains("33.3 %"));
}

#[tokio::test]
async fn test_unknown_year_is_not_found() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{}/?year=1950", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("1950"));

    let response = reqwest::get(format!("{}/api/view?year=1950", base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No yield records for year 1950");
}

#[tokio::test]
async fn test_api_years_and_view() {
    let base = spawn_server().await;

    let years: Vec<i32> = reqwest::get(format!("{}/api/years", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(years, vec![2017, 2016]);

    let view: serde_json::Value = reqwest::get(format!("{}/api/view?year=2017", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["selected_year"], 2017);
    assert_eq!(view["gains_losses"][0]["label"], "Ireland");
    assert_eq!(view["gains_losses"][1]["label"], "Latvia");
    assert_eq!(view["top_countries"]["rows"][1]["country"], "Lithuania");
    assert_eq!(view["choropleth"]["kind"], "plotly");
    assert_eq!(view["heatmap"]["kind"], "vega-lite");
}
