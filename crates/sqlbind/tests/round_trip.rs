mod common;

use common::MemoryTable;
use sqlbind::{params, Predicate, QueryBuilder, Scalar, Selected};

#[test]
fn insert_then_select_by_generated_id() {
    let db = MemoryTable::new();

    let id = QueryBuilder::new("pairs")
        .insert(&db, &params! { "a" => 1, "b" => 2 })
        .unwrap()
        .expect("row inserted");

    let mut qb = QueryBuilder::new("pairs");
    qb.where_id(id);
    let rows = qb.select(&db).unwrap().into_rows();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].try_get::<i64>("a").unwrap(), 1);
    assert_eq!(rows[0].try_get::<i64>("b").unwrap(), 2);
    assert_eq!(
        db.log(),
        vec![
            "INSERT INTO pairs\nSET a = :a,b = :b;",
            "SELECT *\nFROM pairs\nWHERE id = :id;",
        ]
    );
}

#[test]
fn limit_one_returns_a_single_row() {
    let db = MemoryTable::new();
    for name in ["ann", "bob"] {
        QueryBuilder::new("users")
            .insert(&db, &params! { "name" => name })
            .unwrap();
    }

    let mut qb = QueryBuilder::new("users");
    qb.column("name").order_by_desc("id").limit(1);

    let Selected::One(Some(row)) = qb.select(&db).unwrap() else {
        panic!("expected a single row");
    };
    assert_eq!(row.get("name"), Some(&Scalar::from("bob")));
    assert!(!row.contains("id"));

    let mut missing = QueryBuilder::new("users");
    missing.eq("name", "zed").limit(1);
    assert_eq!(missing.select(&db).unwrap(), Selected::One(None));
}

#[test]
fn update_and_delete_respect_where() {
    let db = MemoryTable::new();
    for (name, team) in [("ann", "red"), ("bob", "blue"), ("cid", "red")] {
        QueryBuilder::new("users")
            .insert(&db, &params! { "name" => name, "team" => team })
            .unwrap();
    }

    let mut reds = QueryBuilder::new("users");
    reds.eq("team", "red");
    assert_eq!(reds.update(&db, &params! { "active" => 0 }).unwrap(), 2);

    let mut inactive = QueryBuilder::new("users");
    inactive.eq("active", 0).order_by_asc("name");
    let names = inactive.select(&db).unwrap().as_all().unwrap().pluck("name");
    assert_eq!(names, vec![Scalar::from("ann"), Scalar::from("cid")]);

    let mut doomed = QueryBuilder::new("users");
    doomed.in_list("id", [1, 2]);
    assert_eq!(doomed.delete(&db).unwrap(), 2);
    assert_eq!(db.len(), 1);

    assert_eq!(QueryBuilder::new("users").delete(&db).unwrap(), 1);
    assert_eq!(db.len(), 0);
}

#[test]
fn update_value_replaces_where_binding() {
    let db = MemoryTable::new();
    QueryBuilder::new("users")
        .insert(&db, &params! { "status" => "new" })
        .unwrap();

    // `:status` is shared by the filter and the SET list.
    let mut qb = QueryBuilder::new("users");
    qb.eq("status", "new");
    let affected = qb.update(&db, &params! { "status" => "seen" }).unwrap();
    assert_eq!(affected, 0);
    assert_eq!(qb.bound_params().get("status"), Some(&Scalar::from("seen")));
}

#[test]
fn comparison_predicates() {
    let db = MemoryTable::new();
    for n in 1..=6 {
        QueryBuilder::new("numbers")
            .insert(&db, &params! { "n" => n })
            .unwrap();
    }

    let mut qb = QueryBuilder::new("numbers");
    qb.compare("n", ">", 2)
        .and_where(Predicate::compare("id", "<=", 5))
        .order_by_desc("n");

    assert_eq!(
        qb.select_query(),
        "SELECT *\nFROM numbers\nWHERE n > :n AND id <= :id\nORDER BY n DESC;"
    );
    let values = qb.select(&db).unwrap().as_all().unwrap().pluck("n");
    assert_eq!(values, vec![Scalar::Int(5), Scalar::Int(4), Scalar::Int(3)]);
}

#[test]
fn malformed_where_fails_before_reaching_the_connection() {
    let db = MemoryTable::new();
    let mut qb = QueryBuilder::new("users");
    qb.in_list("id", Vec::<i64>::new());

    let err = qb.select(&db).unwrap_err();
    assert!(err.is_validation());
    assert!(db.log().is_empty());
}
