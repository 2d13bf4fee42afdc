use setld_link::merge_sections;
use setld_model::{ColumnDef, Platform, Row, Section, TableSchema, Value};
use setld_result::{Error, Report};

fn widget_schema() -> TableSchema {
    TableSchema::new(
        "Widget",
        vec![ColumnDef::text("Name"), ColumnDef::int("Size")],
    )
}

fn widget_row(id: &str) -> Row {
    Row::new("Widget", id, vec![Value::from("widget"), Value::Int(1)])
}

#[test]
fn merges_disjoint_sections() {
    let a = Section::new("ext.a")
        .with_schema(widget_schema())
        .with_row(widget_row("WidgetA"));
    let b = Section::new("ext.b").with_row(widget_row("WidgetB"));

    let mut report = Report::new();
    let merged = merge_sections(&[a, b], &mut report);

    assert!(report.is_empty(), "unexpected errors: {report}");
    assert_eq!(merged.rows.len(), 2);
    assert!(merged.schemas.contains_key("Widget"));
}

#[test]
fn canonical_order_ignores_supply_order() {
    let a = Section::new("ext.a").with_schema(widget_schema()).with_row(widget_row("WidgetA"));
    let b = Section::new("ext.b").with_row(widget_row("WidgetB"));

    let mut report = Report::new();
    let forward = merge_sections(&[a.clone(), b.clone()], &mut report);
    let mut report = Report::new();
    let backward = merge_sections(&[b, a], &mut report);

    let ids = |model: &setld_link::MergedModel| -> Vec<String> {
        model.rows.iter().map(|m| m.row.id.clone()).collect()
    };
    assert_eq!(ids(&forward), ids(&backward));
}

#[test]
fn duplicate_identifier_names_both_modules() {
    let a = Section::new("ext.a")
        .with_schema(widget_schema())
        .with_row(widget_row("SameWidget"));
    let b = Section::new("ext.b").with_row(widget_row("SameWidget"));

    let mut report = Report::new();
    merge_sections(&[a, b], &mut report);

    assert!(report.contains(|e| matches!(
        e,
        Error::DuplicateIdentifier { table, id, first, second }
            if table == "Widget" && id == "SameWidget" && first == "ext.a" && second == "ext.b"
    )));
}

#[test]
fn architecture_variants_may_share_an_identifier() {
    let section = Section::new("ext.a")
        .with_row(
            Row::new("Binary", "Payload", vec![Value::from("[Binary data]")])
                .with_arch(Platform::X86),
        )
        .with_row(
            Row::new("Binary", "Payload", vec![Value::from("[Binary data]")])
                .with_arch(Platform::X64),
        );

    let mut report = Report::new();
    merge_sections(&[section], &mut report);
    assert!(report.is_empty(), "unexpected errors: {report}");
}

#[test]
fn plain_row_blocks_variants_of_the_same_identifier() {
    let section = Section::new("ext.a")
        .with_row(Row::new("Binary", "Payload", vec![Value::from("x")]))
        .with_row(
            Row::new("Binary", "Payload", vec![Value::from("x")]).with_arch(Platform::X86),
        );

    let mut report = Report::new();
    merge_sections(&[section], &mut report);
    assert!(report.contains(|e| matches!(e, Error::DuplicateIdentifier { .. })));
}

#[test]
fn repeated_variant_is_a_duplicate() {
    let section = Section::new("ext.a")
        .with_row(Row::new("Binary", "Payload", vec![Value::from("x")]).with_arch(Platform::X86))
        .with_row(Row::new("Binary", "Payload", vec![Value::from("x")]).with_arch(Platform::X86));

    let mut report = Report::new();
    merge_sections(&[section], &mut report);
    assert!(report.contains(|e| matches!(e, Error::DuplicateIdentifier { .. })));
}

#[test]
fn at_most_one_variant_may_be_default() {
    let section = Section::new("ext.a")
        .with_row(
            Row::new("Binary", "Payload", vec![Value::from("x")])
                .with_arch(Platform::X86)
                .as_default_variant(),
        )
        .with_row(
            Row::new("Binary", "Payload", vec![Value::from("x")])
                .with_arch(Platform::X64)
                .as_default_variant(),
        );

    let mut report = Report::new();
    merge_sections(&[section], &mut report);
    assert!(report.contains(|e| matches!(e, Error::SchemaViolation(_))));
}

#[test]
fn rows_in_reserved_tables_are_rejected() {
    let section = Section::new("ext.a").with_row(Row::new(
        "CustomAction",
        "Sneaky",
        vec![Value::Int(0)],
    ));

    let mut report = Report::new();
    merge_sections(&[section], &mut report);
    assert!(report.contains(|e| matches!(e, Error::SchemaViolation(_))));
}

#[test]
fn conflicting_schema_redefinition_is_rejected() {
    let a = Section::new("ext.a").with_schema(widget_schema());
    let b = Section::new("ext.b").with_schema(TableSchema::new(
        "Widget",
        vec![ColumnDef::text("Name")],
    ));

    let mut report = Report::new();
    merge_sections(&[a, b], &mut report);
    assert!(report.contains(|e| matches!(e, Error::SchemaViolation(_))));
}

#[test]
fn identical_schema_redefinition_is_allowed() {
    let a = Section::new("ext.a").with_schema(widget_schema());
    let b = Section::new("ext.b").with_schema(widget_schema());

    let mut report = Report::new();
    merge_sections(&[a, b], &mut report);
    assert!(report.is_empty(), "unexpected errors: {report}");
}

#[test]
fn rows_of_undeclared_tables_are_rejected_but_kept() {
    let section = Section::new("ext.a").with_row(Row::new("Mystery", "m1", vec![]));

    let mut report = Report::new();
    let merged = merge_sections(&[section], &mut report);

    assert!(report.contains(|e| matches!(e, Error::SchemaViolation(_))));
    assert_eq!(merged.rows.len(), 1, "rows are never silently dropped");
}

#[test]
fn collects_every_error_before_returning() {
    let a = Section::new("ext.a")
        .with_schema(widget_schema())
        .with_row(widget_row("SameWidget"))
        .with_row(Row::new("Mystery", "m1", vec![]));
    let b = Section::new("ext.b").with_row(widget_row("SameWidget"));

    let mut report = Report::new();
    merge_sections(&[a, b], &mut report);
    assert!(report.len() >= 2, "expected batched diagnostics, got {report}");
}
