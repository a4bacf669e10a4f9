use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde_json::json;
use sqlbind_core::{
    default_converters, CrudRequest, Custom, Executor, Field, FieldType, FieldValue,
    RowSerializer, SqlType, SqliteExecutor,
};

#[derive(Debug, Clone, PartialEq)]
struct Record {
    count: i64,
    ratio: f64,
    name: String,
    payload: Vec<u8>,
    active: bool,
    born: NaiveDate,
    seen: DateTime<Utc>,
    timeout: TimeDelta,
    tags: serde_json::Value,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            count: 0,
            ratio: 0.0,
            name: String::new(),
            payload: Vec::new(),
            active: false,
            born: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            seen: DateTime::<Utc>::UNIX_EPOCH,
            timeout: TimeDelta::zero(),
            tags: serde_json::Value::Null,
        }
    }
}

fn record_fields() -> Vec<Field<Record>> {
    vec![
        Field::new(
            "count",
            FieldType::Integer,
            |r: &Record| FieldValue::from(r.count),
            |r, v| r.count = v.as_integer().unwrap_or_default(),
        ),
        Field::new(
            "ratio",
            FieldType::Real,
            |r: &Record| FieldValue::from(r.ratio),
            |r, v| r.ratio = v.as_real().unwrap_or_default(),
        ),
        Field::new(
            "name",
            FieldType::Text,
            |r: &Record| FieldValue::from(r.name.clone()),
            |r, v| r.name = v.into_text().unwrap_or_default(),
        ),
        Field::new(
            "payload",
            FieldType::Blob,
            |r: &Record| FieldValue::from(r.payload.clone()),
            |r, v| r.payload = v.into_blob().unwrap_or_default(),
        ),
        Field::new(
            "active",
            FieldType::Bool,
            |r: &Record| FieldValue::from(r.active),
            |r, v| r.active = v.as_bool().unwrap_or_default(),
        ),
        Field::new(
            "born",
            FieldType::Date,
            |r: &Record| FieldValue::from(r.born),
            |r, v| r.born = v.as_date().expect("validated date"),
        ),
        Field::new(
            "seen",
            FieldType::DateTime,
            |r: &Record| FieldValue::from(r.seen),
            |r, v| r.seen = v.as_date_time().expect("validated timestamp"),
        ),
        Field::new(
            "timeout",
            FieldType::Duration,
            |r: &Record| FieldValue::from(r.timeout),
            |r, v| r.timeout = v.as_duration().expect("validated duration"),
        ),
        Field::new(
            "tags",
            FieldType::Json,
            |r: &Record| FieldValue::from(r.tags.clone()),
            |r, v| r.tags = v.into_json().unwrap_or_default(),
        ),
    ]
}

fn sample() -> Record {
    Record {
        count: 42,
        ratio: 0.75,
        name: "full house".to_string(),
        payload: vec![0xde, 0xad, 0xbe, 0xef],
        active: true,
        born: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        seen: DateTime::from_timestamp_micros(1_700_000_000_250_000).unwrap(),
        timeout: TimeDelta::try_seconds(90).unwrap(),
        tags: json!({"roles": ["writer", "admin"], "level": 3}),
    }
}

fn serializer() -> RowSerializer<Record> {
    RowSerializer::new(
        record_fields(),
        vec![SqlType::Integer, SqlType::Real, SqlType::Text, SqlType::Blob],
        default_converters(),
    )
}

#[test]
fn every_field_type_survives_a_serialization_round_trip() {
    let original = sample();
    let ser = serializer();
    let (params, values) = ser.params_and_values(&original).unwrap();
    assert_eq!(params.len(), values.len());

    let mut restored = Record::default();
    serializer().apply_row(&mut restored, &values).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn converted_values_are_storage_native() {
    let (_, values) = serializer().params_and_values(&sample()).unwrap();
    for value in &values {
        assert!(value.sql_type().is_some(), "no null expected for {value:?}");
    }
}

#[test]
fn every_field_type_survives_a_database_round_trip() {
    let executor = SqliteExecutor::in_memory().unwrap();
    executor
        .run(
            &Custom::new(
                "CREATE TABLE records (
                    count INTEGER PRIMARY KEY,
                    ratio REAL,
                    name TEXT,
                    payload BLOB,
                    active INTEGER,
                    born INTEGER,
                    seen REAL,
                    timeout INTEGER,
                    tags TEXT
                );",
            )
            .unwrap()
            .statement(),
        )
        .unwrap();
    let request =
        CrudRequest::try_new("records", record_fields(), &["count"], Box::new(executor)).unwrap();

    let original = sample();
    request.save(&original).unwrap();

    let mut loaded = Record {
        count: 42,
        ..Record::default()
    };
    assert!(request.load(&mut loaded).unwrap());
    assert_eq!(loaded, original);
}
