#![allow(dead_code)]

use sqlweave::prelude::*;
use sqlweave::{FieldDescriptor, Model};

#[derive(Model)]
#[orm(rename_all = "camelCase")]
struct BaseModel {
    created_at: i64,
    updated_at: i64,
    id: i64,
}

#[derive(Model)]
#[orm(rename_all = "camelCase")]
struct Person {
    #[orm(flatten)]
    base: BaseModel,
    full_name: String,
    #[orm(column = "NickName")]
    nick_name: Option<String>,
    #[orm(skip)]
    age: i32,
}

#[derive(Model)]
#[orm(table = "audit_logs")]
struct AuditLog {
    #[orm(id)]
    log_id: i64,
    operation_type: String,
    r#type: String,
}

#[derive(Model)]
#[orm(rename_all = "camelCase")]
struct Keyed {
    #[orm(id)]
    person_id: i64,
    created_at: i64,
}

#[derive(Model)]
#[orm(table = "Member", rename_all = "camelCase")]
struct Member {
    #[orm(flatten)]
    base: Keyed,
    full_name: String,
}

#[derive(Model)]
#[orm(table = "Clash", rename_all = "camelCase")]
struct Clash {
    #[orm(flatten)]
    base: Keyed,
    #[orm(id)]
    clash_id: i64,
}

#[test]
fn derived_table_name_and_fields() {
    assert_eq!(Person::table_name(), "Person");
    assert_eq!(AuditLog::table_name(), "audit_logs");

    let fields = Person::fields();
    assert_eq!(fields.len(), 3);
    assert!(matches!(fields[0], FieldDescriptor::Flatten(_)));
    assert!(matches!(fields[1], FieldDescriptor::Column("fullName")));
    assert!(matches!(fields[2], FieldDescriptor::Column("NickName")));
    assert!(matches!(AuditLog::fields()[0], FieldDescriptor::Id("log_id")));

    assert_eq!(Person::primary_key(), None);
    assert_eq!(AuditLog::primary_key(), Some("log_id"));
}

#[test]
fn derived_schema_matches_manual_schema() {
    let derived = Schema::from_model::<Person>().unwrap();
    let manual = Schema::builder()
        .table_name("Person")
        .columns(["createdAt", "updatedAt", "id", "fullName", "NickName"])
        .build()
        .unwrap();

    assert_eq!(derived.columns(), manual.columns());
    assert_eq!(derived, manual);
    assert!(!derived.same_instance(&manual));
}

#[test]
fn raw_identifiers_are_unprefixed() {
    let schema = Schema::from_model::<AuditLog>().unwrap();
    assert_eq!(schema.columns(), ["log_id", "operation_type", "type"]);
    assert_eq!(schema.primary_key(), "log_id");
}

#[test]
fn explicit_primary_key_wins_over_model() {
    let schema = Schema::builder()
        .model::<AuditLog>()
        .primary_key("operation_type")
        .build()
        .unwrap();
    assert_eq!(schema.primary_key(), "operation_type");
}

#[test]
fn statements_from_derived_schema() {
    let person = Schema::from_model::<Person>().unwrap();

    let sql = select([col("id"), col("fullName")])
        .from(&person)
        .filter(Predicate::eq(col("fullName")))
        .build()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT "Person"."id", "Person"."fullName" FROM "Person" WHERE "Person"."fullName" = ?"#
    );

    assert_eq!(
        insert(&person).build().unwrap(),
        r#"INSERT INTO "Person"("createdAt", "updatedAt", "fullName", "NickName") VALUES (:createdAt, :updatedAt, :fullName, :NickName)"#
    );

    let logs = SchemaQueries::new(&Schema::from_model::<AuditLog>().unwrap());
    assert_eq!(
        logs.delete().unwrap(),
        r#"DELETE FROM "audit_logs" WHERE "log_id" = ?"#
    );
}

#[test]
fn primary_key_comes_through_flatten() {
    assert_eq!(Member::primary_key(), Some("personId"));

    let member = Schema::from_model::<Member>().unwrap();
    assert_eq!(member.primary_key(), "personId");
    assert_eq!(member.columns(), ["personId", "createdAt", "fullName"]);
    assert_eq!(
        delete(&member).build().unwrap(),
        r#"DELETE FROM "Member" WHERE "personId" = ?"#
    );
}

#[test]
fn primary_key_marked_twice_through_flatten_fails() {
    let err = Schema::from_model::<Clash>().unwrap_err();
    assert!(matches!(err, BuildError::MultiplePrimaryKeys { .. }));
}
