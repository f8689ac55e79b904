//! Schema dependency graph for ordered DDL output.
//!
//! Provides:
//! - Dependency graph construction from schema FK relationships
//! - Topological sorting with deterministic tie-breaks
//! - Best-effort placement of tables caught in reference cycles

use super::{Schema, Table, TableId};
use crate::diagnostics::{Diagnostics, Location};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Schema dependency graph built from foreign key relationships.
///
/// A parent (master) table is referenced by a child table's FK; parents are
/// ordered before their children.
#[derive(Debug)]
pub struct SchemaGraph<'a> {
    schema: &'a Schema,
    /// For each table, list of parent tables (tables this table references via FK)
    pub parents: Vec<Vec<TableId>>,
    /// For each table, list of child tables (tables that reference this table via FK)
    pub children: Vec<Vec<TableId>>,
}

/// Result of topological sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoSortResult {
    /// Every table, masters before children where possible
    pub order: Vec<TableId>,
    /// Tables placed before all of their parents because of a cycle
    pub cyclic_tables: Vec<TableId>,
}

impl TopoSortResult {
    /// Report cyclic placements as a single `dependency-cycle` warning
    pub fn report_cycles(&self, schema: &Schema, diagnostics: &mut Diagnostics) {
        if self.cyclic_tables.is_empty() {
            return;
        }

        let names: Vec<&str> = self
            .cyclic_tables
            .iter()
            .filter_map(|&id| schema.table(id).map(|t| t.name.as_str()))
            .collect();

        let mut location = Location::new();
        if let Some(first) = names.first() {
            location = location.with_table(*first);
        }

        diagnostics.warning(
            "dependency-cycle",
            format!(
                "circular foreign key dependencies, order is best effort for: {}",
                names.join(", ")
            ),
            location,
        );
    }
}

/// Priority of a table among those ready to be placed: tables without
/// foreign keys first, then fewer foreign keys, then by name.
type ReadyKey<'a> = (bool, usize, &'a str, TableId);

fn ready_key(table: &Table) -> ReadyKey<'_> {
    (
        table.has_foreign_keys(),
        table.foreign_keys.len(),
        table.name.as_str(),
        table.id,
    )
}

impl<'a> SchemaGraph<'a> {
    /// Build a dependency graph from a schema
    pub fn from_schema(schema: &'a Schema) -> Self {
        let n = schema.len();
        let mut parents: Vec<Vec<TableId>> = vec![Vec::new(); n];
        let mut children: Vec<Vec<TableId>> = vec![Vec::new(); n];

        for table in schema.iter() {
            let child_id = table.id;

            for fk in &table.foreign_keys {
                let parent_id = fk.master.table;
                if parent_id == child_id || parent_id.0 as usize >= n {
                    continue;
                }
                if !parents[child_id.0 as usize].contains(&parent_id) {
                    parents[child_id.0 as usize].push(parent_id);
                }
                if !children[parent_id.0 as usize].contains(&child_id) {
                    children[parent_id.0 as usize].push(child_id);
                }
            }
        }

        Self {
            schema,
            parents,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }

    /// Get the table name for a table ID
    pub fn table_name(&self, id: TableId) -> Option<&'a str> {
        self.schema.table(id).map(|t| t.name.as_str())
    }

    /// Get root tables (tables with no parents/dependencies)
    pub fn root_tables(&self) -> Vec<TableId> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parents)| parents.is_empty())
            .map(|(i, _)| TableId(i as u32))
            .collect()
    }

    /// Perform topological sort using Kahn's algorithm.
    ///
    /// Among tables whose parents are all placed, the next one is picked by
    /// [`ReadyKey`] order. When nothing is ready, the lowest-keyed table that
    /// lies on a reference cycle is placed anyway and recorded in
    /// `cyclic_tables`.
    pub fn topo_sort(&self) -> TopoSortResult {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.parents.iter().map(Vec::len).collect();
        let mut placed = vec![false; n];
        let mut ready: BinaryHeap<Reverse<ReadyKey<'a>>> = BinaryHeap::new();

        for table in self.schema.iter() {
            if in_degree[table.id.0 as usize] == 0 {
                ready.push(Reverse(ready_key(table)));
            }
        }

        let mut order = Vec::with_capacity(n);
        let mut cyclic_tables = Vec::new();

        while order.len() < n {
            let next = match ready.pop() {
                Some(Reverse((_, _, _, id))) => id,
                None => {
                    // Only tables in (or behind) a cycle are left; force a cycle member
                    let Some(forced) = self
                        .schema
                        .iter()
                        .filter(|t| !placed[t.id.0 as usize] && self.on_cycle(t.id, &placed))
                        .min_by_key(|&t| ready_key(t))
                    else {
                        break;
                    };
                    cyclic_tables.push(forced.id);
                    forced.id
                }
            };

            if placed[next.0 as usize] {
                continue;
            }
            placed[next.0 as usize] = true;
            order.push(next);

            for &child_id in &self.children[next.0 as usize] {
                let degree = &mut in_degree[child_id.0 as usize];
                if *degree == 0 {
                    continue;
                }
                *degree -= 1;
                if *degree == 0 && !placed[child_id.0 as usize] {
                    if let Some(child) = self.schema.table(child_id) {
                        ready.push(Reverse(ready_key(child)));
                    }
                }
            }
        }

        TopoSortResult {
            order,
            cyclic_tables,
        }
    }

    /// Whether `id` can reach itself through parents that are not placed yet
    fn on_cycle(&self, id: TableId, placed: &[bool]) -> bool {
        let mut visited = vec![false; self.len()];
        let mut stack: Vec<TableId> = self.parents[id.0 as usize].clone();

        while let Some(current) = stack.pop() {
            if current == id {
                return true;
            }
            let idx = current.0 as usize;
            if placed[idx] || visited[idx] {
                continue;
            }
            visited[idx] = true;
            stack.extend(self.parents[idx].iter().copied());
        }

        false
    }
}
