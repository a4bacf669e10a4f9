//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the full core path (schema, statements, executor) against an
//!   in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use serde::Serialize;
use sqlbind_core::{
    CrudRequest, Custom, Executor, Field, FieldType, FieldValue, ListQuery, SqliteExecutor,
};

#[derive(Debug, Clone, Default, Serialize)]
struct User {
    id: Option<i64>,
    username: Option<String>,
    last_message: Option<String>,
}

fn user_fields() -> Vec<Field<User>> {
    vec![
        Field::nullable(
            "id",
            FieldType::Integer,
            |u: &User| FieldValue::from(u.id),
            |u, v| u.id = v.as_integer(),
        ),
        Field::nullable(
            "username",
            FieldType::Text,
            |u: &User| FieldValue::from(u.username.clone()),
            |u, v| u.username = v.into_text(),
        ),
        Field::nullable(
            "last_message",
            FieldType::Text,
            |u: &User| FieldValue::from(u.last_message.clone()),
            |u, v| u.last_message = v.into_text(),
        ),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("sqlbind_core version={}", sqlbind_core::core_version());

    let executor = SqliteExecutor::in_memory()?;
    executor.run(
        &Custom::new("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT, last_message TEXT);")?
            .statement(),
    )?;

    let request = CrudRequest::try_new("users", user_fields(), &["id", "username"], Box::new(executor))?;

    let mut user = User {
        username: Some("simple_user".to_string()),
        ..User::default()
    };
    request.save(&user)?;

    // The database assigned the id; read it back through the username key.
    request.load(&mut user)?;
    user.last_message = Some("Hello world!".to_string());
    request.update(&user)?;

    request.save(&User {
        username: Some("admin".to_string()),
        last_message: Some("Do you want to be banned?".to_string()),
        ..User::default()
    })?;

    for user in request.load_all(&ListQuery::default())? {
        println!("{}", serde_json::to_string(&user)?);
        request.delete(&user)?;
    }

    let remaining = request.load_all(&ListQuery::default())?;
    println!("remaining={}", remaining.len());

    Ok(())
}
