//! Integration tests for the Create chains.
//!
//! These tests author whole migrations through the public API and inspect
//! the queued expressions, the way an execution engine would receive them.

use oxide_fluent_core::prelude::*;

fn only<E: Clone>(queue: &ExpressionQueue, pick: impl Fn(&Expression) -> Option<&E>) -> Vec<E> {
    queue.iter().filter_map(pick).cloned().collect()
}

// =============================================================================
// Type mixin
// =============================================================================

#[test]
fn test_last_type_call_wins() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context
        .create()
        .table("Foo")
        .with_column("Name")
        .as_int32()
        .as_string_sized(50);

    let Some(Expression::CreateTable(foo)) = context.expressions().last() else {
        panic!("expected a table");
    };
    let name = foo.column("Name").unwrap();
    assert_eq!(name.db_type, Some(DbType::String));
    assert_eq!(name.size, Some(50));
    assert_eq!(name.precision, None);
}

#[test]
fn test_every_semantic_type() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context
        .create()
        .table("all_types")
        .with_column("a").as_ansi_string()
        .with_column("b").as_ansi_string_sized(10)
        .with_column("c").as_binary_sized(16)
        .with_column("d").as_byte()
        .with_column("e").as_currency()
        .with_column("f").as_date()
        .with_column("g").as_decimal()
        .with_column("h").as_decimal_sized(18, 4)
        .with_column("i").as_double()
        .with_column("j").as_fixed_length_string(3)
        .with_column("k").as_fixed_length_ansi_string(2)
        .with_column("l").as_float()
        .with_column("m").as_guid()
        .with_column("n").as_int16()
        .with_column("o").as_int64()
        .with_column("p").as_time()
        .with_column("q").as_xml()
        .with_column("r").as_xml_sized(4000)
        .with_column("s").as_custom("GEOGRAPHY");

    let Some(Expression::CreateTable(table)) = context.expressions().last() else {
        panic!("expected a table");
    };
    let types: Vec<_> = table
        .columns
        .iter()
        .map(|c| (c.db_type, c.size, c.precision))
        .collect();
    assert_eq!(
        types,
        [
            (Some(DbType::AnsiString), None, None),
            (Some(DbType::AnsiString), Some(10), None),
            (Some(DbType::Binary), Some(16), None),
            (Some(DbType::Byte), None, None),
            (Some(DbType::Currency), None, None),
            (Some(DbType::Date), None, None),
            (Some(DbType::Decimal), None, None),
            (Some(DbType::Decimal), Some(18), Some(4)),
            (Some(DbType::Double), None, None),
            (Some(DbType::StringFixedLength), Some(3), None),
            (Some(DbType::AnsiStringFixedLength), Some(2), None),
            (Some(DbType::Single), None, None),
            (Some(DbType::Guid), None, None),
            (Some(DbType::Int16), None, None),
            (Some(DbType::Int64), None, None),
            (Some(DbType::Time), None, None),
            (Some(DbType::Xml), None, None),
            (Some(DbType::Xml), Some(4000), None),
            (None, None, None),
        ]
    );
    assert_eq!(table.columns[18].custom_type.as_deref(), Some("GEOGRAPHY"));
}

// =============================================================================
// Call order
// =============================================================================

#[test]
fn test_option_order_does_not_change_the_column() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context
        .create()
        .column("Counter")
        .on_table("Foo")
        .as_int32()
        .nullable()
        .identity()
        .with_default_value(1);
    context
        .create()
        .column("Counter")
        .on_table("Foo")
        .as_int32()
        .identity()
        .with_default_value(1)
        .nullable();

    let columns = only(context.expressions(), |e| match e {
        Expression::CreateColumn(column) => Some(column),
        _ => None,
    });
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0], columns[1]);
    assert!(columns[0].column.nullable);
    assert!(columns[0].column.identity);
    assert_eq!(columns[0].column.default, Some(DefaultValue::Integer(1)));
}

#[test]
fn test_cascade_rules_set_separately_or_together() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    let separate = context
        .create()
        .foreign_key()
        .from_table("Foo")
        .foreign_column("BarId")
        .to_table("Bar")
        .primary_column("BarId")
        .on_delete(Rule::SetNull)
        .on_update(Rule::SetNull);
    let together = context
        .create()
        .foreign_key()
        .from_table("Foo")
        .foreign_column("BarId")
        .to_table("Bar")
        .primary_column("BarId")
        .on_delete_or_update(Rule::SetNull);

    let separate = context.expressions().get(separate).unwrap();
    let together = context.expressions().get(together).unwrap();
    assert_eq!(separate, together);
    assert_eq!(separate.on_delete, Some(Rule::SetNull));
    assert_eq!(separate.on_update, Some(Rule::SetNull));
}

// =============================================================================
// Queue
// =============================================================================

#[test]
fn test_table_appends_exactly_one_expression() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context.create().table("Bar");
    let before = context.expressions().len();

    context.create().table("Foo");

    assert_eq!(context.expressions().len(), before + 1);
    let Some(Expression::CreateTable(foo)) = context.expressions().last() else {
        panic!("expected a table");
    };
    assert_eq!(foo.table_name, "Foo");
    assert!(foo.columns.is_empty());
}

#[test]
fn test_not_nullable_column() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context.create().column("Age").as_int32().not_nullable();

    let Some(Expression::CreateColumn(age)) = context.expressions().last() else {
        panic!("expected a column");
    };
    assert_eq!(age.column.name, "Age");
    assert_eq!(age.column.db_type, Some(DbType::Int32));
    assert!(!age.column.nullable);
}

#[test]
fn test_declaration_order_is_execution_order() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context
        .create()
        .table("cmsTags")
        .with_column("id").as_int32().identity().primary_key_named("PK_cmsTags")
        .with_column("tag").as_string_sized(200).indexed()
        .with_column("parentId").as_int32().nullable()
        .foreign_key_named("FK_cmsTags_cmsTags", "cmsTags", "id");
    context
        .create()
        .index_named("IX_cmsTags_tag_parent")
        .on_table("cmsTags")
        .on_columns(["tag", "parentId"])
        .unique();
    context
        .create()
        .unique_constraint_named("UQ_cmsTags")
        .on_table("cmsTags")
        .column("tag");

    let kinds: Vec<_> = context.expressions().iter().map(Expression::kind).collect();
    assert_eq!(
        kinds,
        [
            "create_table",
            "create_index",
            "create_foreign_key",
            "create_index",
            "create_constraint",
        ]
    );

    let indexes = only(context.expressions(), |e| match e {
        Expression::CreateIndex(index) => Some(index),
        _ => None,
    });
    assert_eq!(indexes[0].effective_name(), "IX_cmsTags_tag");
    assert_eq!(indexes[1].columns.len(), 2);
}

#[test]
fn test_defaults() {
    let mut context = MigrationContext::new(DatabaseProvider::SqlServer);
    context
        .create()
        .table("umbracoServer")
        .with_column("uniqueId").as_guid().with_default(SystemMethod::NewGuid)
        .with_column("registeredDate").as_date_time().with_default(SystemMethod::CurrentDateTime)
        .with_column("isActive").as_boolean().with_default_value(true)
        .with_column("weight").as_int32().with_default_value(10)
        .with_column("note").as_string().nullable().with_default_value(None::<&str>);

    let Some(Expression::CreateTable(table)) = context.expressions().last() else {
        panic!("expected a table");
    };
    let defaults: Vec<_> = table.columns.iter().map(|c| c.default.clone()).collect();
    assert_eq!(
        defaults,
        [
            Some(DefaultValue::Method(SystemMethod::NewGuid)),
            Some(DefaultValue::Method(SystemMethod::CurrentDateTime)),
            Some(DefaultValue::Boolean(true)),
            Some(DefaultValue::Integer(10)),
            Some(DefaultValue::Null),
        ]
    );
}

// =============================================================================
// Hand-off
// =============================================================================

#[test]
fn test_queue_serializes_for_an_engine() {
    let mut context = MigrationContext::new(DatabaseProvider::Sqlite);
    context
        .if_database([DatabaseProvider::Sqlite, DatabaseProvider::Postgres])
        .create()
        .foreign_key()
        .from_table("Foo")
        .foreign_column("BarId")
        .to_table("Bar")
        .primary_column("BarId")
        .on_delete_or_update(Rule::Cascade);

    let json = serde_json::to_value(context.into_expressions()).unwrap();
    let entry = &json[0];
    assert_eq!(entry["expression"]["kind"], "create_foreign_key");
    assert_eq!(entry["expression"]["foreign_table"], "Foo");
    assert_eq!(entry["expression"]["on_delete"], "Cascade");
    assert_eq!(entry["providers"], serde_json::json!(["Sqlite", "Postgres"]));
}
