use agri_dashboard::core::charts::{donut_slices, make_donut_chart, DEFAULT_DONUT_COLORS};
use agri_dashboard::core::loader::parse_yield_csv;
use agri_dashboard::core::metrics::{
    calculate_percentage, complement, format_number, highest_yield, lowest_yield,
    sorted_by_yield_desc, year_options, DEFAULT_THRESHOLD,
};
use agri_dashboard::core::YieldTable;

fn fixture() -> YieldTable {
    let data = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/eu_cereal_yield.csv"
    ))
    .unwrap();
    parse_yield_csv(&data).unwrap()
}

#[test]
fn test_format_number_examples() {
    assert_eq!(format_number(1_000_000.0), "1 M");
    assert_eq!(format_number(1_500_000.0), "1.5 M");
    assert_eq!(format_number(500_000.0), "500 K");
}

#[test]
fn test_percentages_are_bounded_and_complementary() {
    let table = fixture();
    for year in table.years() {
        let above = calculate_percentage(&table, year, DEFAULT_THRESHOLD).unwrap();
        assert!((0.0..=100.0).contains(&above), "year {}", year);
        let below = complement(above);
        assert!((above + below - 100.0).abs() < 1e-9, "year {}", year);
    }
}

#[test]
fn test_extreme_thresholds() {
    let table = fixture();
    assert_eq!(calculate_percentage(&table, 2019, 0.0).unwrap(), 100.0);
    assert_eq!(calculate_percentage(&table, 2019, 1e9).unwrap(), 0.0);
}

#[test]
fn test_max_and_min_per_year() {
    let table = fixture();
    let expected = [
        (2018, "Belgium", "Cyprus"),
        (2019, "Belgium", "Cyprus"),
        (2020, "Belgium", "Finland"),
    ];
    for (year, top, bottom) in expected {
        let rows = table.for_year(year);
        assert_eq!(highest_yield(&rows).unwrap().country_name, top);
        assert_eq!(lowest_yield(&rows).unwrap().country_name, bottom);
    }
}

#[test]
fn test_donut_pairs_sum_to_hundred() {
    for step in 0..=200 {
        let pct = step as f64 / 2.0;
        let (value, rest) = donut_slices(&make_donut_chart(pct, "label", DEFAULT_DONUT_COLORS)).unwrap();
        assert!((value + rest - 100.0).abs() < 1e-9, "pct {}", pct);
    }
}

#[test]
fn test_descending_sort_is_repeatable() {
    let table = fixture();
    let rows = table.for_year(2018);
    let first: Vec<String> = sorted_by_yield_desc(&rows)
        .iter()
        .map(|r| r.country_name.clone())
        .collect();
    for _ in 0..5 {
        let again: Vec<String> = sorted_by_yield_desc(&rows)
            .iter()
            .map(|r| r.country_name.clone())
            .collect();
        assert_eq!(first, again);
    }
    assert_eq!(first.first().map(String::as_str), Some("Belgium"));
    assert_eq!(first.last().map(String::as_str), Some("Cyprus"));
}

#[test]
fn test_year_options_newest_first() {
    assert_eq!(year_options(&fixture()), vec![2020, 2019, 2018]);
}
