use crate::helpers::{seed_dataset, seed_with_schema, MeasurementRow, TestDataset};
use climate::{
    build_app_state, ClimateAccess, ClimateData, ClimateService, DataError, Database,
    TemperatureStats,
};
use std::sync::Arc;
use time::macros::date;

const HAWAII_STATIONS: &[(&str, &str)] = &[
    ("USC00519397", "WAIKIKI 717.2, HI US"),
    ("USC00513117", "KANEOHE 838.1, HI US"),
    ("USC00519281", "WAIHEE 837.5, HI US"),
];

async fn open(dataset: &TestDataset) -> (Database, ClimateAccess) {
    let database = Database::new(&dataset.path, 2)
        .await
        .expect("failed to open seeded dataset");
    let access = ClimateAccess::new(database.pool().clone());
    (database, access)
}

#[tokio::test]
async fn latest_date_is_the_maximum_date() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2016-12-31", Some(0.0), 71.0),
        ("USC00513117", "2017-08-23", Some(0.1), 82.0),
        ("USC00519281", "2017-01-01", None, 66.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;

    assert_eq!(access.latest_date().await.unwrap(), date!(2017 - 08 - 23));
}

#[tokio::test]
async fn empty_dataset_is_an_error_not_a_panic() {
    let dataset = seed_dataset(&[], HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;

    assert!(matches!(
        access.latest_date().await,
        Err(DataError::EmptyDataset)
    ));
    assert!(matches!(
        access.temperature_for_last_year().await,
        Err(DataError::EmptyDataset)
    ));
}

#[tokio::test]
async fn precipitation_averages_per_day_and_skips_null_days() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2017-08-21", Some(0.0), 81.0),
        ("USC00513117", "2017-08-21", Some(0.56), 76.0),
        ("USC00519397", "2017-08-22", None, 82.0),
        ("USC00513117", "2017-08-22", None, 80.0),
        ("USC00519397", "2017-08-23", Some(0.0), 81.0),
        ("USC00513117", "2017-08-23", None, 82.0),
        ("USC00519281", "2017-08-23", Some(0.45), 82.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;

    let precipitation = access.precipitation_by_date().await.unwrap();
    let dates: Vec<_> = precipitation.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date!(2017 - 08 - 23), date!(2017 - 08 - 21)]);

    // nulls do not count towards the average
    assert!((precipitation[0].prcp - 0.225).abs() < 1e-9);
    assert!((precipitation[1].prcp - 0.28).abs() < 1e-9);
}

#[tokio::test]
async fn stations_are_distinct_and_ordered() {
    let stations = &[
        ("USC00519397", "WAIKIKI 717.2, HI US"),
        ("USC00513117", "KANEOHE 838.1, HI US"),
        ("USC00519397", "WAIKIKI 717.2, HI US"),
    ];
    let dataset = seed_dataset(&[("USC00519397", "2017-08-23", None, 80.0)], stations).await;
    let (_database, access) = open(&dataset).await;

    let stations = access.all_stations().await.unwrap();
    let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["USC00513117", "USC00519397"]);
    assert_eq!(stations[1].name, "WAIKIKI 717.2, HI US");
}

#[tokio::test]
async fn trailing_year_excludes_the_anchor_day() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2016-08-22", Some(0.0), 70.0),
        ("USC00519397", "2016-08-23", Some(0.0), 71.0),
        ("USC00519397", "2016-08-24", Some(0.0), 72.0),
        ("USC00513117", "2016-08-24", Some(0.0), 76.0),
        ("USC00519397", "2017-03-01", Some(0.0), 68.0),
        ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;

    let temps = access.temperature_for_last_year().await.unwrap();
    let dates: Vec<_> = temps.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![
            date!(2017 - 08 - 23),
            date!(2017 - 03 - 01),
            date!(2016 - 08 - 24)
        ]
    );
    assert!(temps
        .iter()
        .all(|t| t.date > date!(2016 - 08 - 23) && t.date <= date!(2017 - 08 - 23)));
    assert_eq!(temps[2].temp, 74.0);
}

#[tokio::test]
async fn trailing_year_from_leap_day_starts_after_feb_28() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2015-02-28", Some(0.0), 60.0),
        ("USC00519397", "2015-03-01", Some(0.0), 61.0),
        ("USC00519397", "2016-02-29", Some(0.0), 65.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;

    let dates: Vec<_> = access
        .temperature_for_last_year()
        .await
        .unwrap()
        .iter()
        .map(|t| t.date)
        .collect();
    assert_eq!(dates, vec![date!(2016 - 02 - 29), date!(2015 - 03 - 01)]);
}

#[tokio::test]
async fn stats_over_sparse_range() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2016-01-01", Some(0.0), 10.0),
        ("USC00519397", "2016-01-03", Some(0.0), 20.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;
    let service = ClimateService::new(Arc::new(access));

    let stats = service
        .stats_from_range("2016-01-01", "2016-01-03")
        .await
        .unwrap();
    assert_eq!(
        stats,
        vec![TemperatureStats {
            min_temp: Some(10.0),
            avg_temp: Some(15.0),
            max_temp: Some(20.0),
        }]
    );
}

#[tokio::test]
async fn stats_are_ordered_and_symmetric() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2017-01-01", Some(0.0), 62.0),
        ("USC00513117", "2017-01-02", Some(0.0), 75.0),
        ("USC00519281", "2017-01-04", Some(0.0), 68.0),
        ("USC00519397", "2017-01-07", Some(0.0), 71.0),
        ("USC00519397", "2017-02-01", Some(0.0), 64.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;
    let service = ClimateService::new(Arc::new(access));

    for (a, b) in [
        ("2017-01-01", "2017-01-07"),
        ("2017-01-02", "2017-02-01"),
        ("2017-01-04", "2017-01-04"),
    ] {
        let forward = service.stats_from_range(a, b).await.unwrap();
        let backward = service.stats_from_range(b, a).await.unwrap();
        assert_eq!(forward, backward);

        let stats = &forward[0];
        let (min, avg, max) = (
            stats.min_temp.unwrap(),
            stats.avg_temp.unwrap(),
            stats.max_temp.unwrap(),
        );
        assert!(min <= avg && avg <= max, "{a}..{b}: {min} {avg} {max}");
    }
}

#[tokio::test]
async fn end_past_coverage_matches_latest_date() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2017-08-20", Some(0.0), 78.0),
        ("USC00519397", "2017-08-23", Some(0.0), 82.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;
    let service = ClimateService::new(Arc::new(access));

    let clamped = service
        .stats_from_range("2017-08-01", "2050-01-01")
        .await
        .unwrap();
    let explicit = service
        .stats_from_range("2017-08-01", "2017-08-23")
        .await
        .unwrap();
    let open_ended = service.stats_from_start("2017-08-01").await.unwrap();

    assert_eq!(clamped, explicit);
    assert_eq!(clamped, open_ended);
    assert_eq!(clamped[0].avg_temp, Some(80.0));
}

#[tokio::test]
async fn start_past_coverage_reports_final_day() {
    let rows: &[MeasurementRow] = &[
        ("USC00519397", "2017-08-22", Some(0.0), 70.0),
        ("USC00519397", "2017-08-23", Some(0.0), 82.0),
    ];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;
    let service = ClimateService::new(Arc::new(access));

    let stats = service.stats_from_start("2050-01-01").await.unwrap();
    assert_eq!(
        stats,
        vec![TemperatureStats {
            min_temp: Some(82.0),
            avg_temp: Some(82.0),
            max_temp: Some(82.0),
        }]
    );
}

#[tokio::test]
async fn range_without_observations_is_all_null() {
    let rows: &[MeasurementRow] = &[("USC00519397", "2017-08-23", Some(0.0), 82.0)];
    let dataset = seed_dataset(rows, HAWAII_STATIONS).await;
    let (_database, access) = open(&dataset).await;
    let service = ClimateService::new(Arc::new(access));

    let stats = service
        .stats_from_range("2050-01-01", "2060-01-01")
        .await
        .unwrap();
    assert_eq!(stats, vec![TemperatureStats::default()]);

    let stats = service
        .stats_from_range("2010-01-01", "2010-12-31")
        .await
        .unwrap();
    assert!(stats[0].is_empty());
}

#[tokio::test]
async fn dataset_is_opened_read_only() {
    let dataset = seed_dataset(&[("USC00519397", "2017-08-23", None, 80.0)], HAWAII_STATIONS).await;
    let (database, _access) = open(&dataset).await;

    let insert = sqlx::query("INSERT INTO station (station, name) VALUES ('X', 'Y')")
        .execute(database.pool())
        .await;
    assert!(insert.is_err());
}

#[tokio::test]
async fn schema_mismatch_fails_fast() {
    let dataset = seed_with_schema(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY,
            station TEXT,
            date TEXT,
            prcp FLOAT
        );",
        &[],
        HAWAII_STATIONS,
    )
    .await;

    let err = Database::new(&dataset.path, 1)
        .await
        .err()
        .expect("schema without tobs should be rejected");
    assert!(format!("{:#}", err).contains("tobs"));
}

#[tokio::test]
async fn missing_dataset_fails_fast() {
    let err = Database::new("/nonexistent/hawaii.sqlite", 1)
        .await
        .err()
        .expect("missing file should be rejected");
    assert!(err.to_string().contains("/nonexistent/hawaii.sqlite"));
}

#[tokio::test]
async fn app_state_builds_over_a_healthy_dataset() {
    let dataset = seed_dataset(&[("USC00519397", "2017-08-23", None, 80.0)], HAWAII_STATIONS).await;

    let (state, database) = build_app_state(dataset.path.clone(), 2)
        .await
        .expect("healthy dataset should build");
    assert_eq!(state.climate.stations().await.unwrap().len(), 3);
    database.close().await;
}
