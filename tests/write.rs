mod common;

use common::{Harness, COLLECTOR};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use sumo_log_sink::LoggerOptions;

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("no JSON form"))
    }
}

impl fmt::Debug for Unserializable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object Unserializable]")
    }
}

struct Hopeless;

impl Serialize for Hopeless {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("no JSON form"))
    }
}

impl fmt::Debug for Hopeless {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    level: u64,
    msg: &'a str,
    status: u16,
}

async fn ship_one(harness: &mut Harness) -> String {
    let call = harness.next_call().await;
    let body = call.request.body.clone();
    call.respond(200);
    body
}

#[tokio::test(start_paused = true)]
async fn handles_all_kinds_of_input() {
    let mut harness = Harness::plain();

    harness.logger.write("msg 1");
    assert_eq!(ship_one(&mut harness).await, r#""msg 1""#);

    harness.logger.write(&json!({}));
    assert_eq!(ship_one(&mut harness).await, "{}");

    harness.logger.write(&Unserializable);
    assert_eq!(ship_one(&mut harness).await, r#""[object Unserializable]""#);

    harness.logger.write(&Hopeless);
    assert_eq!(ship_one(&mut harness).await, r#""error serializing log line""#);
}

#[tokio::test(start_paused = true)]
async fn rewrites_level_names() {
    let mut harness = Harness::new(LoggerOptions::new(COLLECTOR));

    for (code, name) in [
        (10, "TRACE"),
        (20, "DEBUG"),
        (30, "INFO"),
        (40, "WARN"),
        (50, "ERROR"),
        (60, "FATAL"),
    ] {
        harness.logger.write(&json!({ "level": code, "msg": "log message" }));
        assert_eq!(
            ship_one(&mut harness).await,
            format!(r#"{{"level":"{name}","msg":"log message"}}"#)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn keeps_numeric_levels_when_rewriting_is_off() {
    let mut harness = Harness::plain();

    for code in [10, 20, 30, 40, 50, 60] {
        harness.logger.write(&json!({ "level": code, "msg": "log message" }));
        assert_eq!(
            ship_one(&mut harness).await,
            format!(r#"{{"level":{code},"msg":"log message"}}"#)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn keeps_unknown_level_codes() {
    let mut harness = Harness::new(LoggerOptions::new(COLLECTOR));

    harness.logger.write(&json!({ "level": 35, "msg": "odd" }));
    assert_eq!(ship_one(&mut harness).await, r#"{"level":35,"msg":"odd"}"#);
}

#[tokio::test(start_paused = true)]
async fn rewrites_typed_records() {
    let mut harness = Harness::new(LoggerOptions::new(COLLECTOR));

    harness.logger.write(&Request { level: 40, msg: "slow request", status: 504 });
    assert_eq!(
        ship_one(&mut harness).await,
        r#"{"level":"WARN","msg":"slow request","status":504}"#
    );
}

#[tokio::test(start_paused = true)]
async fn only_outputs_valid_json() {
    let mut harness = Harness::plain();

    let mut map = BTreeMap::new();
    map.insert("some", "values");
    map.insert("and", "keys");

    let inputs = [json!("msg 1"), json!(map), json!([1, 2, 3, 4])];
    for input in inputs {
        harness.logger.write(&input);
        let parsed: Value = serde_json::from_str(&ship_one(&mut harness).await).unwrap();
        assert_eq!(parsed, input);
    }
}

#[tokio::test(start_paused = true)]
async fn encodes_at_write_time() {
    let mut harness = Harness::plain();

    let mut record = json!({ "msg": "before" });
    harness.logger.write(&record);
    record["msg"] = json!("after");

    assert_eq!(ship_one(&mut harness).await, r#"{"msg":"before"}"#);
}
