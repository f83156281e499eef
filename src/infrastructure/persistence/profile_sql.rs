//! Parametrized INSERT/UPDATE statements built from [`ProfileChanges`].
//!
//! Column names come from the closed [`ProfileField`] set and every value is
//! bound as a placeholder, so no caller input is ever spliced into SQL text.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::entities::{ProfileChanges, ProfileField};

pub const PROFILE_TABLE: &str = "profiles";

fn bind_field(builder: &mut QueryBuilder<'static, Postgres>, field: &ProfileField) {
    match field {
        ProfileField::Id(v) | ProfileField::UserId(v) => builder.push_bind(*v),
        ProfileField::Username(v) | ProfileField::Email(v) | ProfileField::AvatarUrl(v) => {
            builder.push_bind(v.clone())
        }
        ProfileField::Birthday(v) => builder.push_bind(*v),
    };
}

/// `INSERT INTO profiles (<present columns>) VALUES ($1, ..)`
pub fn insert_statement(changes: &ProfileChanges) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {PROFILE_TABLE} ("));
    builder.push(changes.columns().join(", "));
    builder.push(") VALUES (");
    for (i, field) in changes.fields().iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        bind_field(&mut builder, field);
    }
    builder.push(")");
    builder
}

/// `UPDATE profiles SET <col> = $n, .. WHERE user_id = $last`
///
/// Callers must not pass an empty change set.
pub fn update_statement(user_id: i64, changes: &ProfileChanges) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {PROFILE_TABLE} SET "));
    for (i, field) in changes.fields().iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(field.column()).push(" = ");
        bind_field(&mut builder, field);
    }
    builder.push(" WHERE user_id = ").push_bind(user_id);
    builder
}
