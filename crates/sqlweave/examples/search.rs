//! Request-driven search example
//!
//! Run with: cargo run --example search -p sqlweave
//!
//! Builds the statements a list endpoint would run for a query string such as
//! `?name=ann&minAge=18&ids=1,2,3&sort=createdAt`.

use std::collections::HashMap;

use sqlweave::filter::{self, FilterParsers, LikeMatch, QueryFilter};
use sqlweave::prelude::*;

#[derive(Model)]
#[orm(rename_all = "camelCase")]
#[allow(dead_code)]
struct Person {
    id: i64,
    full_name: String,
    age: i32,
    created_at: i64,
}

#[derive(Model)]
#[orm(rename_all = "camelCase")]
#[allow(dead_code)]
struct Address {
    id: i64,
    person_id: i64,
    city: String,
}

fn main() -> Result<(), BuildError> {
    let person = Schema::from_model::<Person>()?;
    let address = Schema::from_model::<Address>()?;

    let query: HashMap<String, String> = [
        ("name", "ann"),
        ("minAge", "18"),
        ("ids", "1,2,3"),
        ("sort", "createdAt"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let parsers = FilterParsers::new()
        .add("name", filter::ilike_filter(col("fullName"), LikeMatch::Contains))
        .add("minAge", filter::int_gte(col("age")))
        .add("ids", filter::in_int_filter(col("id")));
    let search = QueryFilter::new(&query, &parsers);

    // Unknown sort columns are dropped, so the raw value is passed through.
    let sort = query.get("sort").map(String::as_str).unwrap_or("id");

    let list = select_from(&person)
        .filter(search.conditions())
        .order_by(col(sort).of(&person), SortDir::Desc)
        .limit(20);
    println!("list:  {}", list.build()?);
    println!("args:  {:?}", search.args());

    let total = SchemaQueries::new(&person).count(Some(search.conditions()))?;
    println!("total: {total}");

    let with_city = select([col("id"), col("fullName"), col("city").of(&address)])
        .from(&person)
        .left_join(&address, Predicate::eq(col("id")).var(on("personId")))
        .filter(search.conditions());
    println!("join:  {}", with_city.build()?);

    let mysql = QueryConfig::new().with_dialect(DialectKind::Mysql);
    let queries = SchemaQueries::new(&person).with_config(mysql);
    println!("mysql: {}", queries.update()?);

    Ok(())
}
