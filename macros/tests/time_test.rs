//! Tests for timestamp and duration fields

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::{Asia, Europe};
use formbind_core::{BindConfig, Binder, ErrorKind, bind_form};
use formbind_macros::Bind;
use formbind_testing::{BindTest, assertions::assert_bind_error, fixtures, source};
use std::time::Duration;

fn berlin() -> BindConfig {
    BindConfig::default().with_default_zone(Europe::Berlin)
}

#[derive(Bind, Debug, Default)]
struct Times {
    pub time: DateTime<FixedOffset>,
    #[bind(time_format = "%Y-%m-%d")]
    pub local_time: DateTime<FixedOffset>,
    pub zero_value: DateTime<FixedOffset>,
    #[bind(time_format = "%Y-%m-%d", time_location = "Asia/Shanghai")]
    pub cst_time: DateTime<FixedOffset>,
    #[bind(time_format = "%Y-%m-%d", time_utc = "1")]
    pub utc_time: DateTime<FixedOffset>,
    #[bind(time_format = "%Y-%m-%d", time_location = "Asia/Shanghai", time_utc)]
    pub cst_as_utc: DateTime<Utc>,
}

#[test]
fn test_time_directives() {
    BindTest::<Times>::form()
        .with_config(berlin())
        .when_source(source! {
            "time" => ["2019-01-20T16:02:58Z"],
            "local_time" => ["2019-01-20"],
            "cst_time" => ["2019-01-20"],
            "utc_time" => ["2019-01-20"],
            "cst_as_utc" => ["2019-01-20"],
        })
        .then_record(|record| {
            assert_eq!(record.time, fixtures::fixed_time());

            assert_eq!(
                record.local_time,
                Europe::Berlin.with_ymd_and_hms(2019, 1, 20, 0, 0, 0).unwrap()
            );
            assert_eq!(record.local_time.offset().local_minus_utc(), 3600);

            assert_eq!(
                record.cst_time,
                Asia::Shanghai.with_ymd_and_hms(2019, 1, 20, 0, 0, 0).unwrap()
            );
            assert_eq!(record.cst_time.offset().local_minus_utc(), 8 * 3600);

            assert_eq!(record.utc_time, Utc.with_ymd_and_hms(2019, 1, 20, 0, 0, 0).unwrap());
            assert_eq!(record.utc_time.offset().local_minus_utc(), 0);

            assert_eq!(record.cst_as_utc, Utc.with_ymd_and_hms(2019, 1, 19, 16, 0, 0).unwrap());

            assert_eq!(record.zero_value, DateTime::<FixedOffset>::default());
        })
        .run();
}

#[test]
fn test_default_zone_comes_from_config() {
    let mut record = Times::default();
    let source = source! { "local_time" => ["2019-07-01"] };

    bind_form(&mut record, &source).unwrap();
    assert_eq!(record.local_time.offset().local_minus_utc(), 0);

    let config = BindConfig::from_lookup(|_| Some("Asia/Tokyo".to_string())).unwrap();
    Binder::new(config).bind_form(&mut record, &source).unwrap();
    assert_eq!(record.local_time.offset().local_minus_utc(), 9 * 3600);
}

#[test]
fn test_explicit_offset_is_kept() {
    BindTest::<Times>::form()
        .with_config(berlin())
        .when_source(source! { "time" => ["2019-01-20T18:02:58+02:00"] })
        .then_record(|record| {
            assert_eq!(record.time, fixtures::fixed_time());
            assert_eq!(record.time.offset().local_minus_utc(), 7200);
        })
        .run();
}

#[test]
fn test_empty_list_resets_to_epoch() {
    BindTest::<Times>::form()
        .given_record(Times {
            time: fixtures::fixed_time(),
            ..Times::default()
        })
        .when_source(source! { "time" => [] })
        .then_record(|record| assert_eq!(record.time.timestamp(), 0))
        .run();
}

#[test]
fn test_malformed_times() {
    for (key, value) in [
        ("time", "2019-01-20"),
        ("time", ""),
        ("local_time", "20/01/2019"),
        ("zero_value", "yesterday"),
    ] {
        let mut record = Times::default();
        let err = bind_form(&mut record, &source! { key => [value] }).unwrap_err();
        assert_bind_error(&err, ErrorKind::Conversion, key);
    }
}

#[derive(Bind, Debug, Default)]
struct ClockChange {
    #[bind(time_format = "%Y-%m-%d %H:%M")]
    pub at: DateTime<FixedOffset>,
}

#[test]
fn test_repeated_local_time_takes_earlier_instant() {
    BindTest::<ClockChange>::form()
        .with_config(berlin())
        .when_source(source! { "at" => ["2019-10-27 02:30"] })
        .then_record(|record| {
            assert_eq!(record.at, Utc.with_ymd_and_hms(2019, 10, 27, 0, 30, 0).unwrap());
            assert_eq!(record.at.offset().local_minus_utc(), 2 * 3600);
        })
        .run();
}

#[test]
fn test_skipped_local_time_is_rejected() {
    BindTest::<ClockChange>::form()
        .with_config(berlin())
        .when_source(source! { "at" => ["2019-03-31 02:30"] })
        .then_error(|err| assert_bind_error(err, ErrorKind::Conversion, "at"))
        .run();
}

#[derive(Bind, Debug, Default)]
struct BadLocation {
    #[bind(form = "when", time_format = "%Y-%m-%d", time_location = "Mars/Olympus")]
    pub when: DateTime<FixedOffset>,
}

#[test]
fn test_unknown_location_is_a_configuration_error() {
    BindTest::<BadLocation>::form()
        .when_source(source! { "when" => ["2019-01-20"] })
        .then_error(|err| {
            assert_bind_error(err, ErrorKind::Configuration, "when");
            assert!(err.to_string().contains("Mars/Olympus"));
        })
        .run();
}

#[derive(Bind, Debug, Default)]
struct Epochs {
    #[bind(time_format = "unix")]
    pub seconds: DateTime<Utc>,
    #[bind(time_format = "unixmilli")]
    pub millis: DateTime<Utc>,
    #[bind(time_format = "unixmicro")]
    pub micros: DateTime<Utc>,
    #[bind(time_format = "unixnano")]
    pub nanos: DateTime<Utc>,
    #[bind(time_format = "unix", time_location = "Asia/Shanghai")]
    pub shanghai: DateTime<FixedOffset>,
    #[bind(time_format = "unix")]
    pub optional: Option<DateTime<Utc>>,
    #[bind(time_format = "unix", collection_format = "csv")]
    pub history: Vec<DateTime<Utc>>,
}

#[test]
fn test_epoch_formats() {
    let expected = fixtures::fixed_time();

    BindTest::<Epochs>::form()
        .when_source(source! {
            "seconds" => ["1548000178"],
            "millis" => ["1548000178000"],
            "micros" => ["1548000178000000"],
            "nanos" => ["1548000178000000000"],
            "shanghai" => ["1548000178"],
            "optional" => ["1548000178"],
            "history" => ["0,1548000178"],
        })
        .then_record(move |record| {
            assert_eq!(record.seconds, expected);
            assert_eq!(record.millis, expected);
            assert_eq!(record.micros, expected);
            assert_eq!(record.nanos, expected);
            assert_eq!(record.shanghai, expected);
            assert_eq!(record.shanghai.offset().local_minus_utc(), 8 * 3600);
            assert_eq!(record.optional, Some(expected.with_timezone(&Utc)));
            assert_eq!(record.history.len(), 2);
            assert_eq!(record.history[0].timestamp(), 0);
            assert_eq!(record.history[1], expected);
        })
        .run();
}

#[test]
fn test_epoch_rejects_non_integers() {
    BindTest::<Epochs>::form()
        .when_source(source! { "seconds" => ["1548000178.5"] })
        .then_error(|err| assert_bind_error(err, ErrorKind::Conversion, "seconds"))
        .run();
}

#[derive(Bind, Debug, Default)]
struct Timeouts {
    #[bind(form = "timeout")]
    pub timeout: Duration,
    #[bind(form = "retry,default=1.5s")]
    pub retry: Duration,
    #[bind(form = "backoff", collection_format = "csv")]
    pub backoff: Vec<Duration>,
    #[bind(form = "deadline")]
    pub deadline: Option<Duration>,
}

#[test]
fn test_durations() {
    BindTest::<Timeouts>::form()
        .when_source(source! {
            "timeout" => ["1h30m"],
            "backoff" => ["100ms,2s,1m"],
            "deadline" => ["0"],
        })
        .then_record(|record| {
            assert_eq!(record.timeout, Duration::from_secs(90 * 60));
            assert_eq!(record.retry, Duration::from_millis(1500));
            assert_eq!(
                record.backoff,
                [Duration::from_millis(100), Duration::from_secs(2), Duration::from_secs(60)]
            );
            assert_eq!(record.deadline, Some(Duration::ZERO));
        })
        .run();
}

#[test]
fn test_duration_empty_list_resets_to_zero() {
    BindTest::<Timeouts>::form()
        .given_record(Timeouts {
            timeout: Duration::from_secs(5),
            ..Timeouts::default()
        })
        .when_source(source! { "timeout" => [] })
        .then_record(|record| assert_eq!(record.timeout, Duration::ZERO))
        .run();
}

#[test]
fn test_malformed_durations() {
    for value in ["", "5", "5 seconds", "-1s", "1x"] {
        let mut record = Timeouts::default();
        let err = bind_form(&mut record, &source! { "timeout" => [value] }).unwrap_err();
        assert_bind_error(&err, ErrorKind::Conversion, "timeout");
    }
}
