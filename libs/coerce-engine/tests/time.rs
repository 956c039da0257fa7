use coerce_api::chrono::{DateTime, Datelike, TimeZone, Timelike};
use coerce_api::chrono_tz::Tz;
use coerce_api::layout::{is_zero_time, zero_time};
use coerce_api::{Dynamic, ErrorKind, Layout, Value};
use coerce_engine::{Caster, Hooks, StaticDefaults, pure, try_parse_time};

fn utc() -> StaticDefaults {
    StaticDefaults::default()
}

#[test]
fn zero_sentinels_skip_layouts() {
    // An empty layout list would be fatal if the sentinels reached it.
    let no_layouts = StaticDefaults::default().with_layouts(vec![]);
    for s in ["", "0000-00-00 00:00:00", "0000-00-00 00:00:00.000", "0000-00-00 00:00:00.000000"] {
        let t = try_parse_time(s, Some(Tz::Asia__Tokyo), &[], &no_layouts).unwrap();
        assert!(is_zero_time(&t), "{s:?}");
        assert_eq!(t.timezone(), Tz::Asia__Tokyo);
    }
}

#[test]
fn integer_text_is_unix_seconds() {
    let t = try_parse_time("1234567890", Some(Tz::Asia__Shanghai), &[], &utc()).unwrap();
    assert_eq!(t.timestamp(), 1_234_567_890);
    assert_eq!(t.hour(), 7);

    let t = try_parse_time("-86400", None, &[], &utc()).unwrap();
    assert_eq!(t.year(), 1969);
}

#[test]
fn malformed_integer_text_does_not_try_layouts() {
    let always = [Layout::Pattern("%s".into())];
    let err = try_parse_time("99999999999999999999", None, &always, &utc()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn default_layouts_cover_common_forms() {
    let d = utc();
    let cases = [
        ("2009-02-13T23:31:30Z", 1_234_567_890),
        ("2009-02-14T07:31:30+08:00", 1_234_567_890),
        ("2009-02-13 23:31:30 +0000", 1_234_567_890),
        ("2009-02-13 23:31:30", 1_234_567_890),
        ("2009-02-13 23:31:30.250", 1_234_567_890),
        ("2009-02-13T23:31:30", 1_234_567_890),
        ("2009-02-13", 1_234_483_200),
    ];
    for (text, secs) in cases {
        let t = try_parse_time(text, None, &[], &d).unwrap();
        assert_eq!(t.timestamp(), secs, "{text}");
    }
}

#[test]
fn wall_time_is_read_in_requested_location() {
    let ny = Some(Tz::America__New_York);
    let t = try_parse_time("2022-07-23 08:00:00", ny, &[], &utc()).unwrap();
    assert_eq!(t.hour(), 8);
    assert_eq!(t.with_timezone(&Tz::UTC).hour(), 12);
}

#[test]
fn first_matching_layout_wins() {
    let layouts = [Layout::from("%d/%m/%Y"), Layout::from("%m/%d/%Y")];
    let t = try_parse_time("03/04/2021", None, &layouts, &utc()).unwrap();
    assert_eq!((t.day(), t.month()), (3, 4));
}

#[test]
fn exhausted_layouts_name_the_text() {
    let err = try_parse_time("next tuesday", None, &[], &utc()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Time);
    assert_eq!(err.to_string(), "unable to parse time 'next tuesday'");
}

#[test]
fn empty_default_layouts_are_fatal() {
    let caster = Caster::new(Hooks::new(), StaticDefaults::default().with_layouts(vec![]));
    let err = caster.parse_time("next tuesday", None, &[]).unwrap_err();
    assert!(err.is_fatal());

    // explicit layouts do not need the defaults
    let t = caster.parse_time("2021-01-02", None, &[Layout::from("%Y-%m-%d")]).unwrap();
    assert_eq!(t.day(), 2);
}

#[test]
fn text_rendering_round_trips() {
    let caster = Caster::default();
    let ts = Tz::Asia__Kolkata.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
    let text = caster.to_text(&Value::Timestamp(ts)).unwrap();
    assert_eq!(text, "2023-11-15T03:43:20.123456789+05:30");
    assert_eq!(caster.to_time(&Value::from(text)).unwrap(), ts);
}

#[test]
fn zero_time_round_trips_through_text_in_lmt_zones() {
    let shanghai = StaticDefaults::default().with_location(Tz::Asia__Shanghai);
    let caster = Caster::new(Hooks::new(), shanghai);
    let ts = caster.to_time(&Value::Null).unwrap();
    let text = caster.to_text(&Value::Timestamp(ts)).unwrap();
    assert_eq!(text, "0001-01-01T00:00:00Z");
    let back = caster.to_time(&Value::from(text)).unwrap();
    assert_eq!(back, ts);
    assert_eq!(back.timezone(), Tz::Asia__Shanghai);
}

#[test]
fn wall_time_in_dst_gap_is_shifted_forward() {
    let t = pure::to_time_in(
        &Value::from("2022-03-13 02:30:00"),
        Some(Tz::America__New_York),
        &[],
        &utc(),
    )
    .unwrap();
    assert_eq!((t.hour(), t.minute()), (3, 30));
    assert_eq!(t.with_timezone(&Tz::UTC).hour(), 7);
}

#[test]
fn results_are_normalized_into_location() {
    let utc_time = Tz::UTC.timestamp_opt(0, 0).unwrap();
    let tokyo = Some(Tz::Asia__Tokyo);
    let t = pure::to_time_in(&Value::Timestamp(utc_time), tokyo, &[], &utc()).unwrap();
    assert_eq!(t.timezone(), Tz::Asia__Tokyo);
    assert_eq!(t, utc_time);

    let t = pure::to_time_in(&Value::Float64(1.9), Some(Tz::Europe__London), &[], &utc()).unwrap();
    assert_eq!(t.timestamp(), 1);
    assert_eq!(t.timezone(), Tz::Europe__London);

    let text = Value::from("2020-01-01T00:00:00Z");
    let parsed = pure::to_time_in(&text, tokyo, &[], &utc()).unwrap();
    assert_eq!(parsed.hour(), 9);
}

#[test]
fn nil_time_is_zero_in_location() {
    let t = pure::to_time_in(&Value::Null, Some(Tz::Asia__Tokyo), &[], &utc()).unwrap();
    assert_eq!(t, zero_time(Tz::UTC));
    assert_eq!(t.timezone(), Tz::Asia__Tokyo);
}

struct Deadline(DateTime<Tz>);

impl Dynamic for Deadline {
    fn type_name(&self) -> &str {
        "Deadline"
    }

    fn as_time(&self) -> Option<DateTime<Tz>> {
        Some(self.0)
    }
}

#[test]
fn time_accessor_is_used_unchanged() {
    let d = Deadline(Tz::Australia__Sydney.timestamp_opt(1_000, 0).unwrap());
    let t = pure::to_time_in(&Value::dynamic(&d), Some(Tz::UTC), &[], &utc()).unwrap();
    assert_eq!(t.timezone(), Tz::Australia__Sydney);
}

#[test]
fn epoch_overflow_is_range_error() {
    let err = pure::to_time(&Value::Int64(i64::MAX), &utc()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn must_parse_time_returns_value() {
    let caster = Caster::default();
    let t = caster.must_parse_time("2000-01-01", None, &[]);
    assert_eq!(t.year(), 2000);
}

#[test]
#[should_panic(expected = "unable to parse time 'garbage'")]
fn must_parse_time_panics_on_error() {
    Caster::default().must_parse_time("garbage", None, &[]);
}

#[test]
#[should_panic(expected = "unsupport to convert bool")]
fn must_to_time_in_panics_on_unsupported() {
    Caster::default().must_to_time_in(&Value::Bool(true), None, &[]);
}
