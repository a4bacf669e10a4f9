use sqlbind_core::{
    Columns, ConvertError, CrudRequest, Custom, Executor, Field, FieldType, FieldValue, ListQuery,
    Select, SqlType, SqlValue, SqliteExecutor, TypeConverter,
};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, PartialEq)]
struct Setting {
    name: Option<String>,
    enabled: bool,
}

fn setting_fields() -> Vec<Field<Setting>> {
    vec![
        Field::nullable(
            "name",
            FieldType::Text,
            |s: &Setting| FieldValue::from(s.name.clone()),
            |s, v| s.name = v.into_text(),
        ),
        Field::new(
            "enabled",
            FieldType::Bool,
            |s: &Setting| FieldValue::from(s.enabled),
            |s, v| s.enabled = v.as_bool().unwrap_or_default(),
        ),
    ]
}

/// Booleans as `t`/`f` text, overriding the default integer encoding.
struct TextBoolConverter;

impl TypeConverter for TextBoolConverter {
    fn source_type(&self) -> FieldType {
        FieldType::Bool
    }

    fn db_type(&self) -> SqlType {
        SqlType::Text
    }

    fn to_db(&self, value: FieldValue) -> Result<SqlValue, ConvertError> {
        match value {
            FieldValue::Bool(flag) => Ok(SqlValue::Text(
                if flag { "t" } else { "f" }.to_string(),
            )),
            other => Err(ConvertError::SourceType {
                converter: "text_bool",
                expected: FieldType::Bool,
                actual: other.field_type(),
            }),
        }
    }

    fn from_db(&self, value: SqlValue) -> Result<FieldValue, ConvertError> {
        match value {
            SqlValue::Text(text) if text == "t" => Ok(FieldValue::Bool(true)),
            SqlValue::Text(text) if text == "f" => Ok(FieldValue::Bool(false)),
            SqlValue::Text(text) => Err(ConvertError::Malformed {
                converter: "text_bool",
                message: format!("expected `t` or `f`, got `{text}`"),
            }),
            other => Err(ConvertError::DbType {
                converter: "text_bool",
                expected: SqlType::Text,
                actual: other.sql_type(),
            }),
        }
    }
}

fn settings_db(dir: &TempDir) -> PathBuf {
    let db_path = dir.path().join("settings.db");
    let executor = SqliteExecutor::open(&db_path);
    executor
        .run(
            &Custom::new("CREATE TABLE settings (name TEXT, enabled TEXT NOT NULL);")
                .unwrap()
                .statement(),
        )
        .unwrap();
    db_path
}

fn stored_enabled_values(db_path: &PathBuf) -> Vec<Vec<SqlValue>> {
    SqliteExecutor::open(db_path)
        .run(
            &Select::new("settings", Columns::named(&["enabled"]).unwrap())
                .unwrap()
                .statement(),
        )
        .unwrap()
}

#[test]
fn caller_converters_take_precedence_over_defaults() {
    let dir = TempDir::new().unwrap();
    let db_path = settings_db(&dir);

    let request = CrudRequest::try_with_converters(
        "settings",
        setting_fields(),
        &["name"],
        Box::new(SqliteExecutor::open(&db_path)),
        vec![Box::new(TextBoolConverter)],
        false,
    )
    .unwrap();

    let setting = Setting {
        name: Some("beta".to_string()),
        enabled: true,
    };
    request.save(&setting).unwrap();

    assert_eq!(
        stored_enabled_values(&db_path),
        vec![vec![SqlValue::Text("t".to_string())]]
    );

    let mut loaded = Setting {
        name: Some("beta".to_string()),
        ..Setting::default()
    };
    assert!(request.load(&mut loaded).unwrap());
    assert!(loaded.enabled);
}

#[test]
fn replacing_converters_drops_the_default_set() {
    let dir = TempDir::new().unwrap();
    let db_path = settings_db(&dir);

    let request = CrudRequest::try_with_converters(
        "settings",
        setting_fields(),
        &["name"],
        Box::new(SqliteExecutor::open(&db_path)),
        vec![Box::new(TextBoolConverter)],
        true,
    )
    .unwrap();

    request
        .save(&Setting {
            name: Some("gamma".to_string()),
            enabled: false,
        })
        .unwrap();

    let all = request.load_all(&ListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].enabled);
    assert_eq!(
        stored_enabled_values(&db_path),
        vec![vec![SqlValue::Text("f".to_string())]]
    );
}
