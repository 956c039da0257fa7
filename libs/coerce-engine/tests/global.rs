//! Process-wide caster. Kept to a single test: installation is once per process.

use coerce_api::chrono_tz::Tz;
use coerce_api::chrono::Timelike;
use coerce_api::{CastError, Slot, Value};
use coerce_engine::{Caster, EngineError, Hooks, StaticDefaults};

#[test]
fn install_once_then_free_functions_use_it() {
    let hooks = Hooks::new().with_text(|v| match v {
        Value::Null => Ok("<null>".to_string()),
        other => coerce_engine::pure::to_text(other),
    });
    let defaults = StaticDefaults::default().with_location(Tz::Asia__Shanghai);
    coerce_engine::install(Caster::new(hooks, defaults)).unwrap();

    assert_eq!(coerce_engine::to_text(&Value::Null).unwrap(), "<null>");
    assert_eq!(coerce_engine::to_i64(&Value::from("0b11")).unwrap(), 3);
    assert!(coerce_engine::to_bool(&Value::from("t")).unwrap());
    assert_eq!(coerce_engine::to_u64(&Value::UInt8(9)).unwrap(), 9);
    assert_eq!(coerce_engine::to_f64(&Value::from("1.5")).unwrap(), 1.5);
    assert_eq!(coerce_engine::to_duration(&Value::from("1m")).unwrap().num_seconds(), 60);

    let t = coerce_engine::to_time(&Value::from("2009-02-13 23:31:30")).unwrap();
    assert_eq!(t.timezone(), Tz::Asia__Shanghai);
    assert_eq!(t.timestamp(), 1_234_567_890 - 8 * 3600);

    let t = coerce_engine::parse_time("0", None, &[]).unwrap();
    assert_eq!(t.hour(), 8);
    let t = coerce_engine::must_parse_time("1", Some(Tz::UTC), &[]);
    assert_eq!(t.timestamp(), 1);
    let t = coerce_engine::must_to_time_in(&Value::Int32(2), Some(Tz::UTC), &[]);
    assert_eq!(t.timestamp(), 2);
    assert!(coerce_engine::to_time_in(&Value::Bool(true), None, &[]).is_err());

    let mut label = String::new();
    coerce_engine::set(Some(Slot::from(&mut label)), &Value::Null).unwrap();
    assert_eq!(label, "<null>");
    let mut n = 0u16;
    coerce_engine::set_into(&mut n, &Value::from("12")).unwrap();
    assert_eq!(n, 12);

    let second = coerce_engine::install(Caster::default());
    assert!(matches!(second, Err(EngineError::Config(_))));
    assert!(coerce_engine::global().hooks().is_set(coerce_api::Target::Text));

    let ok: Result<u8, CastError> = Ok(5);
    assert_eq!(coerce_engine::must(ok), 5);
}
