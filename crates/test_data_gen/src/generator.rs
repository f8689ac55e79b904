//! Seeded random ER diagrams.
//!
//! Every generated table references only tables created before it, so the
//! dependency order is always acyclic. The same seed yields the same diagram.

use crate::builder::{CellId, DiagramBuilder, MANY_TO_ONE_STYLE, ONE_TO_MANY_STYLE};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ENTITY_NAMES: &[&str] = &[
    "customer", "invoice", "product", "category", "supplier", "warehouse", "shipment", "employee",
    "department", "project", "task", "contract", "payment", "address", "region", "currency",
];

const FIELD_TYPES: &[&str] = &[
    "Varchar(80)",
    "Varchar2(255)",
    "Char(3)",
    "Integer",
    "Number(10,2)",
    "Date",
    "Timestamp",
    "Text",
    "",
];

const FIELD_NAMES: &[&str] = &[
    "code", "name", "description", "amount", "quantity", "created_at", "status", "note",
    "valid_from", "email",
];

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// 5 tables
    Small,
    /// 50 tables
    Medium,
    /// 500 tables
    Large,
}

impl Scale {
    pub fn tables(&self) -> usize {
        match self {
            Scale::Small => 5,
            Scale::Medium => 50,
            Scale::Large => 500,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Scale::Small),
            "medium" => Ok(Scale::Medium),
            "large" => Ok(Scale::Large),
            _ => Err(format!(
                "Unknown scale: {}. Valid options: small, medium, large",
                s
            )),
        }
    }
}

/// Random diagram generator
pub struct Generator {
    rng: ChaCha8Rng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a diagram with `table_count` tables
    pub fn generate(&mut self, table_count: usize) -> DiagramBuilder {
        let mut diagram = DiagramBuilder::new();
        let mut keys: Vec<(String, CellId)> = Vec::with_capacity(table_count);

        for i in 0..table_count {
            let name = format!("{}_{:03}", ENTITY_NAMES[i % ENTITY_NAMES.len()], i);
            let comment = format!("Generated table {}", i);
            let table = diagram.table_with(&name, &[("comment", comment.as_str())]);
            let id = diagram.pk_field(table, "id:Integer");

            let field_count = self.rng.gen_range(2..6);
            for _ in 0..field_count {
                let field_name = FIELD_NAMES.choose(&mut self.rng).copied().unwrap_or("name");
                let field_type = FIELD_TYPES.choose(&mut self.rng).copied().unwrap_or("");
                let label = if field_type.is_empty() {
                    format!("{}_{}", field_name, diagram.len())
                } else {
                    format!("{}_{}:{}", field_name, diagram.len(), field_type)
                };
                if self.rng.gen_bool(0.2) {
                    diagram.field_with(table, &label, &[("notNull", "yes")]);
                } else {
                    diagram.field(table, &label);
                }
            }

            if !keys.is_empty() {
                let reference_count = self.rng.gen_range(1..=keys.len().min(3));
                let masters: Vec<(String, CellId)> = keys
                    .choose_multiple(&mut self.rng, reference_count)
                    .cloned()
                    .collect();
                for (master_name, master_id) in masters {
                    let fk = diagram.field(table, &format!("{}_id:Integer", master_name));
                    self.link(&mut diagram, master_id, fk);
                }
            }

            keys.push((name, id));
        }

        diagram
    }

    /// Connect a master key to a referencing field, drawn in a random direction
    fn link(&mut self, diagram: &mut DiagramBuilder, master: CellId, child: CellId) {
        match self.rng.gen_range(0..3) {
            0 => diagram.edge(child, master, MANY_TO_ONE_STYLE, "", &[]),
            1 => diagram.edge(
                child,
                master,
                ONE_TO_MANY_STYLE,
                "",
                &[("reverseRelation", "yes")],
            ),
            _ => diagram.relation(master, child),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_diagram() {
        let a = Generator::new(7).generate(10).to_model_xml();
        let b = Generator::new(7).generate(10).to_model_xml();
        assert_eq!(a, b);
    }

    #[test]
    fn test_table_count() {
        let xml = Generator::new(1).generate(Scale::Small.tables()).to_model_xml();
        assert_eq!(xml.matches("shape=table;").count(), 5);
    }
}
