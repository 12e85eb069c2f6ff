//! Bound arguments of UPDATE statements and their placeholder order.

mod common;
use common::*;

use sqlweave_core::{
    BoundArgument, ColumnType, DialectContext, DialectKind, H2Mode, SqlValue, Update,
    UpdateStatement,
};

fn varchar(value: &str) -> BoundArgument {
    BoundArgument::new(ColumnType::Varchar, SqlValue::Text(value.to_string()))
}

fn integer(value: i64) -> BoundArgument {
    BoundArgument::new(ColumnType::Integer, SqlValue::Int(value))
}

fn join_update(s: &Schema) -> UpdateStatement {
    Update::join(s.users_with_data())
        .set(&s.data_comment, "x")
        .set(&s.data_value, 42)
        .where_clause(s.user_name.eq("Alice"))
        .build()
}

#[test]
fn table_arguments_follow_assignment_then_predicate_order() {
    let s = Schema::new();
    let update = Update::table(&s.users)
        .set(&s.user_flags, 1)
        .set(&s.user_name, "Alice")
        .where_clause(s.user_id.eq("alice").and(s.user_city.gt(3)))
        .build();

    for kind in [DialectKind::Generic, DialectKind::Postgres, DialectKind::Oracle] {
        assert_eq!(
            update.arguments(&DialectContext::new(kind)),
            vec![vec![
                integer(1),
                varchar("Alice"),
                varchar("alice"),
                integer(3),
            ]]
        );
    }
}

#[test]
fn oracle_join_puts_predicate_arguments_first() {
    let s = Schema::new();
    let update = join_update(&s);
    assert_eq!(
        update.arguments(&DialectContext::new(DialectKind::Oracle)),
        vec![vec![varchar("Alice"), varchar("x"), integer(42)]]
    );
}

#[test]
fn single_table_without_predicate_binds_assignments_in_insertion_order() {
    let s = Schema::new();
    let update = Update::table(&s.users)
        .set(&s.user_flags, 3)
        .set(&s.user_name, "n")
        .set(&s.user_city, 7)
        .set(&s.user_id, "i")
        .build();
    let expected = vec![vec![integer(3), varchar("n"), integer(7), varchar("i")]];
    for ctx in [
        DialectContext::new(DialectKind::Generic),
        DialectContext::new(DialectKind::Oracle),
        DialectContext::new(DialectKind::SqlServer),
        DialectContext::h2(H2Mode::MySql),
    ] {
        let arguments = update.arguments(&ctx);
        assert_eq!(arguments[0].len(), update.first_data_set().len(), "{ctx}");
        assert_eq!(arguments, expected, "{ctx}");
    }
}

#[test]
fn oracle_join_with_column_value_keeps_predicate_then_bound_values() {
    let s = Schema::new();
    let update = Update::join(s.users_with_data())
        .set(&s.data_comment, "x")
        .set_expr(&s.data_value, &s.user_flags)
        .set(&s.data_user, "u2")
        .where_clause(s.user_name.eq("Alice").and(s.user_flags.gt(1)))
        .build();
    let ctx = DialectContext::new(DialectKind::Oracle);

    let sql = update.compile(&ctx).unwrap();
    assert_eq!(
        sql,
        "UPDATE (SELECT user_data.comment c0, user_data.\"value\" c1, users.flags c2, \
         user_data.user_id c3 FROM users INNER JOIN user_data ON users.id = user_data.user_id \
         WHERE users.name = ? AND users.flags > ?) x SET x.c0 = ?, x.c1 = x.c2, x.c3 = ?"
    );
    let arguments = update.arguments(&ctx);
    assert_eq!(
        arguments,
        vec![vec![
            varchar("Alice"),
            integer(1),
            varchar("x"),
            varchar("u2"),
        ]]
    );
    assert_eq!(placeholder_count(&sql), arguments[0].len());
    assert_eq!(update.prepare(&ctx).unwrap().arguments(), arguments.as_slice());
}

#[test]
fn other_joins_put_assignment_arguments_first() {
    let s = Schema::new();
    let update = join_update(&s);
    let expected = vec![vec![varchar("x"), integer(42), varchar("Alice")]];
    for ctx in [
        DialectContext::new(DialectKind::MySql),
        DialectContext::new(DialectKind::MariaDb),
        DialectContext::new(DialectKind::Postgres),
        DialectContext::new(DialectKind::Sqlite),
        DialectContext::new(DialectKind::SqlServer),
        DialectContext::new(DialectKind::H2),
        DialectContext::h2(H2Mode::PostgreSql),
        DialectContext::h2(H2Mode::SqlServer),
    ] {
        assert_eq!(update.arguments(&ctx), expected, "{ctx}");
    }
}

#[test]
fn h2_in_oracle_mode_keeps_assignment_order() {
    let s = Schema::new();
    let update = join_update(&s);
    let ctx = DialectContext::h2(H2Mode::Oracle);
    assert!(update.compile(&ctx).unwrap().starts_with("MERGE INTO"));
    assert_eq!(
        update.arguments(&ctx),
        vec![vec![varchar("x"), integer(42), varchar("Alice")]]
    );
}

#[test]
fn arguments_match_placeholders_for_every_dialect() {
    let s = Schema::new();
    let statements = [
        join_update(&s),
        Update::table(&s.users)
            .set(&s.user_name, "a")
            .set_expr(&s.user_flags, s.user_flags.plus(1))
            .where_clause(s.user_id.in_list(vec!["a", "b", "c"]))
            .build(),
        Update::join(s.users_with_data())
            .set(&s.user_name, "a")
            .where_clause(s.data_value.between(1, 9).or(s.data_comment.is_null()))
            .build(),
    ];
    let contexts = [
        DialectContext::new(DialectKind::Generic),
        DialectContext::new(DialectKind::MySql),
        DialectContext::new(DialectKind::Postgres),
        DialectContext::new(DialectKind::Oracle),
        DialectContext::new(DialectKind::SqlServer),
        DialectContext::new(DialectKind::Sqlite),
        DialectContext::h2(H2Mode::Regular),
        DialectContext::h2(H2Mode::Oracle),
    ];

    for update in &statements {
        for ctx in &contexts {
            let Ok(sql) = update.compile(ctx) else {
                continue;
            };
            let arguments = update.arguments(ctx);
            let bound = arguments.first().map_or(0, Vec::len);
            assert_eq!(placeholder_count(&sql), bound, "{ctx}: {sql}");

            let prepared = update.prepare(ctx).unwrap();
            assert_eq!(prepared.sql(), sql);
            assert_eq!(prepared.arguments(), arguments.as_slice());
        }
    }
}

#[test]
fn arguments_are_typed_after_the_column() {
    let mut events = sqlweave_core::Table::new("events");
    let seq = events.long("seq");
    let score = events.double("score");
    let update = Update::table(&events)
        .set(&seq, 7)
        .set(&score, 1.5)
        .where_clause(seq.gt(3))
        .build();
    let args = update.arguments(&DialectContext::default());
    assert_eq!(
        args,
        vec![vec![
            BoundArgument::new(ColumnType::BigInt, SqlValue::Int(7)),
            BoundArgument::new(ColumnType::Double, SqlValue::Float(1.5)),
            BoundArgument::new(ColumnType::BigInt, SqlValue::Int(3)),
        ]]
    );
}

#[test]
fn nothing_to_bind_gives_no_batch() {
    let s = Schema::new();
    let update = Update::table(&s.users)
        .set_expr(&s.user_flags, &s.user_city)
        .where_clause(s.user_name.is_not_null())
        .build();
    let ctx = DialectContext::new(DialectKind::Postgres);
    assert_eq!(
        update.compile(&ctx).unwrap(),
        "UPDATE users SET flags = users.city_id WHERE users.name IS NOT NULL"
    );
    assert!(update.arguments(&ctx).is_empty());

    let empty = Update::table(&s.users).build();
    assert!(empty.arguments(&ctx).is_empty());
}

#[test]
fn join_additional_constraints_are_never_bound() {
    let s = Schema::new();
    let join = s.users.join().join(
        &s.user_data,
        sqlweave_core::JoinType::Inner,
        vec![(s.user_id.clone(), s.data_user.clone())],
        Some(s.data_value.gt(0)),
    );
    let update = Update::join(join).set(&s.data_comment, "x").build();
    let ctx = DialectContext::new(DialectKind::Postgres);
    assert_eq!(
        update.compile(&ctx).unwrap(),
        "UPDATE user_data SET comment = ? FROM users \
         WHERE users.id = user_data.user_id AND (user_data.\"value\" > 0)"
    );
    assert_eq!(update.arguments(&ctx), vec![vec![varchar("x")]]);
}

#[test]
fn arguments_are_idempotent() {
    let s = Schema::new();
    let update = join_update(&s);
    let ctx = DialectContext::new(DialectKind::Oracle);
    let first = update.arguments(&ctx);
    assert_eq!(update.arguments(&ctx), first);
    assert_eq!(update.arguments(&ctx), first);
}
