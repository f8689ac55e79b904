//! Unit tests for relationship resolution.

use schema2script::diagnostics::{Diagnostics, Severity};
use schema2script::pipeline::schema_from_bytes;
use schema2script::schema::{ForeignKey, RelationKind, Schema};
use test_data_gen::{CellId, DiagramBuilder, Format, MANY_TO_ONE_STYLE, ONE_TO_MANY_STYLE};

/// users(id PK) and orders(id PK, user_id), without edges
fn users_and_orders() -> (DiagramBuilder, CellId, CellId) {
    let mut diagram = DiagramBuilder::new();
    let users = diagram.table("users");
    let user_pk = diagram.pk_field(users, "id:Integer");
    let orders = diagram.table("orders");
    diagram.pk_field(orders, "id:Integer");
    let user_fk = diagram.field(orders, "user_id:Integer");
    (diagram, user_pk, user_fk)
}

fn build(diagram: &DiagramBuilder) -> (Schema, Diagnostics) {
    schema_from_bytes(diagram.render(Format::Plain).as_bytes(), "er.xml").unwrap()
}

fn only_fk(schema: &Schema) -> &ForeignKey {
    let all: Vec<&ForeignKey> = schema.iter().flat_map(|t| t.foreign_keys.iter()).collect();
    assert_eq!(all.len(), 1, "expected exactly one foreign key");
    all[0]
}

fn assert_orders_reference_users(schema: &Schema, fk: &ForeignKey) {
    assert_eq!(schema.qualified_name(fk.child), "orders.user_id");
    assert_eq!(schema.qualified_name(fk.master), "users.id");
    assert_eq!(schema.get_table("orders").unwrap().foreign_keys.len(), 1);
}

mod direction_tests {
    use super::*;

    #[test]
    fn test_edge_from_master_to_child() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.relation(pk, fk);

        let (schema, diags) = build(&diagram);
        let constraint = only_fk(&schema);
        assert_orders_reference_users(&schema, constraint);
        assert_eq!(constraint.kind, RelationKind::MandatoryOne);
        assert_eq!(constraint.name, "users");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_edge_from_many_side_is_reversed() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(fk, pk, MANY_TO_ONE_STYLE, "", &[]);

        let (schema, diags) = build(&diagram);
        let constraint = only_fk(&schema);
        assert_orders_reference_users(&schema, constraint);
        assert_eq!(constraint.kind, RelationKind::MandatoryOne);

        let reversed: Vec<_> = diags.with_code("relation-auto-reversed").collect();
        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0].severity, Severity::Warning);
    }

    #[test]
    fn test_edge_from_optional_many_side_is_reversed() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(fk, pk, "startArrow=ERzeroToMany;endArrow=ERone;", "", &[]);

        let (schema, diags) = build(&diagram);
        let constraint = only_fk(&schema);
        assert_orders_reference_users(&schema, constraint);
        assert_eq!(constraint.kind, RelationKind::One);
        assert_eq!(diags.with_code("relation-auto-reversed").count(), 1);
    }

    #[test]
    fn test_reverse_relation_flag() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(fk, pk, ONE_TO_MANY_STYLE, "", &[("reverseRelation", "yes")]);

        let (schema, diags) = build(&diagram);
        let constraint = only_fk(&schema);
        assert_orders_reference_users(&schema, constraint);
        assert_eq!(constraint.kind, RelationKind::Many);

        let reversed: Vec<_> = diags.with_code("relation-reversed").collect();
        assert_eq!(reversed.len(), 1);
        assert_eq!(reversed[0].severity, Severity::Info);
        assert!(!diags.has_warnings());
    }

    #[test]
    fn test_many_arrow_wins_over_flag() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(fk, pk, MANY_TO_ONE_STYLE, "", &[("reverseRelation", "yes")]);

        let (schema, diags) = build(&diagram);
        assert_orders_reference_users(&schema, only_fk(&schema));
        assert_eq!(diags.with_code("relation-auto-reversed").count(), 1);
        assert_eq!(diags.with_code("relation-reversed").count(), 0);
    }

    #[test]
    fn test_false_flag_keeps_direction() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(pk, fk, ONE_TO_MANY_STYLE, "", &[("reverseRelation", "no")]);

        let (schema, diags) = build(&diagram);
        assert_orders_reference_users(&schema, only_fk(&schema));
        assert!(diags.is_empty());
    }
}

mod naming_tests {
    use super::*;

    #[test]
    fn test_edge_label_names_constraint() {
        let (mut diagram, pk, fk) = users_and_orders();
        diagram.edge(pk, fk, ONE_TO_MANY_STYLE, " order owner ", &[]);

        let (schema, _) = build(&diagram);
        assert_eq!(only_fk(&schema).name, "order_owner");
    }

    #[test]
    fn test_arrow_kinds() {
        let cases = [
            ("endArrow=ERzeroToMany;", RelationKind::ZeroToMany),
            ("endArrow=ERzeroToOne;", RelationKind::ZeroToOne),
            ("startArrow=none;", RelationKind::One),
            ("html=1;", RelationKind::Unspecified),
        ];

        for (style, expected) in cases {
            let (mut diagram, pk, fk) = users_and_orders();
            diagram.edge(pk, fk, style, "", &[]);
            let (schema, _) = build(&diagram);
            assert_eq!(only_fk(&schema).kind, expected, "style {}", style);
        }
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn test_unknown_target_is_an_error() {
        let (mut diagram, pk, _) = users_and_orders();
        diagram.edge_to(pk, "missing", ONE_TO_MANY_STYLE, "", &[]);

        let (schema, diags) = build(&diagram);
        assert!(schema.iter().all(|t| t.foreign_keys.is_empty()));

        let errors: Vec<_> = diags.with_code("unresolved-relation-target").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Error);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let xml = r#"<mxGraphModel><root>
            <mxCell id="0"/>
            <mxCell id="1" parent="0"/>
            <mxCell id="t1" value="users" parent="1" vertex="1"/>
            <mxCell id="f1" value="id:Integer" parent="t1" vertex="1"/>
            <mxCell id="t2" value="orders" parent="1" vertex="1"/>
            <mxCell value="user_id:Integer" parent="t2" vertex="1"/>
            <mxCell id="e1" style="endArrow=ERmany;" parent="1" source="f1" edge="1"/>
        </root></mxGraphModel>"#;

        let (schema, diags) = schema_from_bytes(xml.as_bytes(), "er.xml").unwrap();
        assert_eq!(schema.get_table("orders").unwrap().fields.len(), 1);
        assert!(schema.iter().all(|t| t.foreign_keys.is_empty()));

        let errors: Vec<_> = diags.with_code("unresolved-relation-target").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Error);
    }

    #[test]
    fn test_self_reference_is_skipped() {
        let mut diagram = DiagramBuilder::new();
        let staff = diagram.table("staff");
        let id = diagram.pk_field(staff, "id:Integer");
        let boss = diagram.field(staff, "boss_id:Integer");
        diagram.relation(id, boss);

        let (schema, diags) = build(&diagram);
        assert!(schema.tables[0].foreign_keys.is_empty());
        assert_eq!(diags.with_code("self-reference").count(), 1);
    }

    #[test]
    fn test_table_to_table_edge_is_ignored() {
        let mut diagram = DiagramBuilder::new();
        let a = diagram.table("a");
        let b = diagram.table("b");
        diagram.relation(a, b);

        let (schema, diags) = build(&diagram);
        assert!(schema.iter().all(|t| t.foreign_keys.is_empty()));
        assert!(diags.is_empty());
    }
}
