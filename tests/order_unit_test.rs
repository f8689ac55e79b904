//! Unit tests for dependency ordering.

use schema2script::diagnostics::Diagnostics;
use schema2script::pipeline::schema_from_bytes;
use schema2script::schema::{Schema, SchemaGraph};
use test_data_gen::{CellId, DiagramBuilder, Format, Generator};

/// Diagram builder keeping track of each table's key field
struct Tables {
    diagram: DiagramBuilder,
    keys: Vec<(String, CellId, CellId)>,
}

impl Tables {
    fn new() -> Self {
        Self {
            diagram: DiagramBuilder::new(),
            keys: Vec::new(),
        }
    }

    fn add(&mut self, name: &str) -> &mut Self {
        let table = self.diagram.table(name);
        let id = self.diagram.pk_field(table, "id:Integer");
        self.keys.push((name.to_string(), table, id));
        self
    }

    fn lookup(&self, name: &str) -> (CellId, CellId) {
        let (_, table, id) = self
            .keys
            .iter()
            .find(|(n, _, _)| n == name)
            .expect("unknown table");
        (*table, *id)
    }

    /// `child` gets a `<master>_id` field referencing `master.id`
    fn reference(&mut self, child: &str, master: &str) -> &mut Self {
        let (child_table, _) = self.lookup(child);
        let (_, master_id) = self.lookup(master);
        let fk = self.diagram.field(child_table, &format!("{}_id:Integer", master));
        self.diagram.relation(master_id, fk);
        self
    }

    fn schema(&self) -> Schema {
        let xml = self.diagram.render(Format::Plain);
        schema_from_bytes(xml.as_bytes(), "er.xml").unwrap().0
    }
}

fn ordered_names(schema: &Schema) -> (Vec<String>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let names = schema
        .ordered(&mut diags)
        .iter()
        .map(|t| t.name.clone())
        .collect();
    (names, diags)
}

mod order_tests {
    use super::*;

    #[test]
    fn test_chain_orders_masters_first() {
        let schema = Tables::new()
            .add("c")
            .add("b")
            .add("a")
            .reference("c", "b")
            .reference("b", "a")
            .schema();

        let (names, diags) = ordered_names(&schema);
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_no_edges_orders_alphabetically() {
        let schema = Tables::new().add("zeta").add("alpha").add("mid").schema();
        let (names, _) = ordered_names(&schema);
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_equal_fk_counts_tie_break_by_name() {
        let schema = Tables::new()
            .add("orders")
            .add("users")
            .add("items")
            .add("products")
            .reference("orders", "users")
            .reference("items", "products")
            .schema();

        let (names, _) = ordered_names(&schema);
        assert_eq!(names, vec!["products", "users", "items", "orders"]);
    }

    #[test]
    fn test_fewer_foreign_keys_first() {
        let schema = Tables::new()
            .add("base")
            .add("other")
            .add("aa_two_refs")
            .add("zz_one_ref")
            .reference("aa_two_refs", "base")
            .reference("aa_two_refs", "other")
            .reference("zz_one_ref", "base")
            .schema();

        let (names, _) = ordered_names(&schema);
        assert_eq!(names, vec!["base", "other", "zz_one_ref", "aa_two_refs"]);
    }

    #[test]
    fn test_every_table_after_its_masters() {
        let xml = Generator::new(99).generate(40).render(Format::Plain);
        let (schema, _) = schema_from_bytes(xml.as_bytes(), "er.xml").unwrap();
        let (names, diags) = ordered_names(&schema);

        assert_eq!(names.len(), 40);
        assert_eq!(diags.with_code("dependency-cycle").count(), 0);
        for table in schema.iter() {
            let position = names.iter().position(|n| n == &table.name).unwrap();
            for fk in &table.foreign_keys {
                let master = &schema.table(fk.master.table).unwrap().name;
                let master_position = names.iter().position(|n| n == master).unwrap();
                assert!(master_position < position, "{} before {}", master, table.name);
            }
        }
    }
}

mod cycle_tests {
    use super::*;

    #[test]
    fn test_cycle_is_placed_and_reported() {
        let schema = Tables::new()
            .add("b")
            .add("a")
            .add("c")
            .reference("a", "b")
            .reference("b", "a")
            .schema();

        let (names, diags) = ordered_names(&schema);
        assert_eq!(names, vec!["c", "a", "b"]);

        let cycles: Vec<_> = diags.with_code("dependency-cycle").collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].message.contains('a'));
    }

    #[test]
    fn test_dependent_of_cycle_waits_for_its_master() {
        let schema = Tables::new()
            .add("x")
            .add("y")
            .add("a_child")
            .reference("x", "y")
            .reference("y", "x")
            .reference("a_child", "x")
            .schema();

        let (names, diags) = ordered_names(&schema);
        assert_eq!(names, vec!["x", "a_child", "y"]);

        let cycles: Vec<_> = diags.with_code("dependency-cycle").collect();
        assert_eq!(cycles.len(), 1);
        assert!(!cycles[0].message.contains("a_child"));
    }

    #[test]
    fn test_topo_sort_reports_forced_tables() {
        let schema = Tables::new()
            .add("a")
            .add("b")
            .add("child")
            .reference("a", "b")
            .reference("b", "a")
            .reference("child", "a")
            .schema();

        let graph = SchemaGraph::from_schema(&schema);
        let result = graph.topo_sort();
        let cyclic: Vec<_> = result
            .cyclic_tables
            .iter()
            .filter_map(|&id| graph.table_name(id))
            .collect();

        assert_eq!(cyclic, vec!["a"]);
        assert_eq!(result.order.len(), 3);
        assert_eq!(graph.table_name(result.order[2]), Some("child"));
    }
}
