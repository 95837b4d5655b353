//! End-to-end compilation scenarios across dialects.

use std::borrow::Cow;

use sqlforge::{
    AnsiDialect, Argument, Combinator, Delete, ExprArg, Expression, ExpressionNode, Fragment,
    JoinType, Literal, LogAnalyticsDialect, MysqlDialect, OrderDirection, PairValue, Predicate,
    PredicateSource, Projection, Select, SqlStatement, SqlValue, Update, ValueKind,
};

#[test]
fn nested_range_or_status_with_mysql_quoting() {
    let query = Select::new().from("users").where_clause(|w| {
        w.nest()
            .greater_than_or_equal_to("age", 18)
            .less_than_or_equal_to("age", 65)
            .unnest()
            .unwrap()
            .or()
            .equal_to("status", ExprArg::value("vip"));
    });
    let sql = query.sql_string(&MysqlDialect::new()).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE (`age` >= 18 AND `age` <= 65) OR `status` = 'vip'"
    );
}

#[test]
fn subquery_membership_is_parenthesized() {
    let active = Select::new()
        .from("subscriptions")
        .column("user_id")
        .where_clause(|w| {
            w.equal_to("state", ExprArg::value("active"));
        });
    let query = Select::new().from("users").where_clause(|w| {
        w.in_select("id", active);
    });
    let sql = query.sql_string(&MysqlDialect::new()).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `users` WHERE `id` IN (SELECT `user_id` FROM `subscriptions` WHERE `state` = 'active')"
    );
}

#[test]
fn update_with_join_uses_combined_join_groups() {
    let update = Update::new("users")
        .join(JoinType::Inner, "orders", "orders.user_id = users.id")
        .join(JoinType::Left, "payments", "payments.order_id = orders.id")
        .set("flagged", true);
    let sql = update.sql_string(&MysqlDialect::new()).unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` INNER JOIN `orders` ON `orders`.`user_id` = `users`.`id` \
         LEFT JOIN `payments` ON `payments`.`order_id` = `orders`.`id` SET `flagged` = TRUE"
    );
}

#[test]
fn log_analytics_disables_fragment_and_table_quoting() {
    let query = Select::new()
        .from("app_logs")
        .column(Projection::aliased(
            ExprArg::node(Expression::raw("count(*)")),
            "hits",
        ))
        .where_clause(|w| {
            w.equal_to("level", ExprArg::value("error"));
        });
    let sql = query.sql_string(&LogAnalyticsDialect::new()).unwrap();
    assert_eq!(
        sql,
        "SELECT count(*) AS \"hits\" FROM app_logs WHERE level = 'error'"
    );
}

#[test]
fn text_values_are_escaped_against_breakout() {
    let query = Select::new().from("users").where_clause(|w| {
        w.equal_to("name", ExprArg::value("O'Brien"));
    });
    let sql = query.sql_string(&AnsiDialect::new()).unwrap();
    assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"name\" = 'O\\'Brien'");
}

#[test]
fn repeated_indexed_position_substitutes_each_occurrence() {
    #[derive(Debug)]
    struct SelfJoinCondition(Argument);

    impl ExpressionNode for SelfJoinCondition {
        fn expression_data(&self) -> sqlforge::Result<Vec<Fragment<'_>>> {
            Ok(vec![Fragment::Template {
                template: Cow::Borrowed("COALESCE(%1$s, UPPER(%1$s))"),
                args: vec![&self.0],
            }])
        }
    }

    let node = SelfJoinCondition(
        sqlforge::normalize_argument(
            ExprArg::identifier("nickname"),
            ValueKind::Identifier,
            &ValueKind::ALL,
        )
        .unwrap(),
    );
    let sql = sqlforge::compile_expression(
        &node,
        &AnsiDialect::new(),
        &mut sqlforge::CompileContext::new(),
        None,
    )
    .unwrap();
    assert_eq!(sql, "COALESCE(\"nickname\", UPPER(\"nickname\"))");
}

#[test]
fn statements_compile_repeatedly_without_shared_state() {
    let query = Select::new().from("users").where_clause(|w| {
        w.in_select(
            "id",
            Select::new().from("banned").column("user_id"),
        );
    });
    let dialect = AnsiDialect::new();
    let first = query.sql_string(&dialect).unwrap();
    let second = query.sql_string(&dialect).unwrap();
    assert_eq!(first, second);
}

#[test]
fn loose_predicates_and_delete_sections() {
    let delete = Delete::new("sessions").where_clause(|w| {
        w.add_predicates(
            [
                PredicateSource::pair("user_id", PairValue::value(7)),
                PredicateSource::pair("revoked_at", PairValue::Value(SqlValue::Null)),
            ],
            Combinator::And,
        );
    });
    let sql = delete.sql_string(&AnsiDialect::new()).unwrap();
    assert_eq!(
        sql,
        "DELETE FROM \"sessions\" WHERE \"user_id\" = 7 AND \"revoked_at\" IS NULL"
    );
}

#[test]
fn order_limit_offset_clause_order() {
    let query = Select::new()
        .from("events")
        .columns(["id", "kind"])
        .order_by("created_at", OrderDirection::Descending)
        .limit(50)
        .offset(100);
    let sql = query.sql_string(&AnsiDialect::new()).unwrap();
    assert_eq!(
        sql,
        "SELECT \"id\", \"kind\" FROM \"events\" ORDER BY \"created_at\" DESC LIMIT 50 OFFSET 100"
    );
}

#[test]
fn literal_members_pass_through_untouched() {
    let mut predicate = Predicate::new();
    predicate
        .literal("1 = 1")
        .and()
        .add(Literal::new("2 = 2"), Combinator::And);
    let sql = sqlforge::compile_expression(
        &predicate,
        &AnsiDialect::new(),
        &mut sqlforge::CompileContext::new(),
        None,
    )
    .unwrap();
    assert_eq!(sql, "1 = 1 AND 2 = 2");
}
