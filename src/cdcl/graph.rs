use crate::common::{Lit, Var};
use std::collections::HashMap;

/// One vertex of the implication graph, mirroring a trail entry.
#[derive(Clone, Debug)]
struct Vertex {
    lit: Lit,
    level: i32,
    is_decision: bool,
    /// Variables whose assignments falsified the rest of the forcing clause.
    parents: Vec<Var>,
}

/// The synthetic vertex standing for a falsified clause.
#[derive(Clone, Debug)]
struct ConflictVertex {
    level: i32,
    parents: Vec<Var>,
}

/// Identifier of a vertex in a [`GraphSnapshot`].
///
/// Variable identity is vertex identity: the graph holds at most one vertex
/// per variable at any time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VertexId {
    /// Vertex of an assigned variable.
    Var(Var),
    /// The synthetic conflict vertex.
    Conflict,
}

/// The implication graph.
///
/// Vertices mirror trail entries; an edge `u -> v` records that `u`'s
/// assignment is part of why `v`'s was forced (the clause that forced `v`
/// contains the negation of `u`'s literal). Edges are stored as parent
/// lists on the forced vertex. Keying vertices by variable makes the
/// one-vertex-per-variable invariant structural; a second insertion for the
/// same variable is a solver bug and aborts.
pub struct ImplicationGraph {
    vertices: HashMap<Var, Vertex>,
    conflict: Option<ConflictVertex>,
}

impl ImplicationGraph {
    pub fn new() -> Self {
        ImplicationGraph {
            vertices: HashMap::new(),
            conflict: None,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn contains(&self, var: Var) -> bool {
        self.vertices.contains_key(&var)
    }

    /// Record a freely decided assignment. Decision vertices have no
    /// incoming edges.
    pub fn add_decision(&mut self, lit: Lit, level: i32) {
        self.insert(lit, level, true, vec![]);
    }

    /// Record a propagated assignment with in-edges from the other
    /// variables of the forcing clause.
    pub fn add_implied(&mut self, lit: Lit, level: i32, parents: Vec<Var>) {
        self.insert(lit, level, false, parents);
    }

    fn insert(&mut self, lit: Lit, level: i32, is_decision: bool, parents: Vec<Var>) {
        let var = lit.var();
        let prev = self.vertices.insert(
            var,
            Vertex {
                lit,
                level,
                is_decision,
                parents,
            },
        );
        assert!(
            prev.is_none(),
            "implication graph invariant broken: second live vertex for {:?}",
            var
        );
    }

    /// Record the synthetic conflict vertex for a falsified clause, with
    /// in-edges from every variable of that clause.
    pub fn add_conflict(&mut self, level: i32, parents: Vec<Var>) {
        assert!(
            self.conflict.is_none(),
            "implication graph invariant broken: second conflict vertex"
        );
        self.conflict = Some(ConflictVertex { level, parents });
    }

    pub fn clear_conflict(&mut self) {
        self.conflict = None;
    }

    /// Drop the vertex of a variable that is being unassigned.
    pub fn remove(&mut self, var: Var) {
        let removed = self.vertices.remove(&var);
        assert!(
            removed.is_some(),
            "implication graph invariant broken: no vertex for assigned {:?}",
            var
        );
    }

    /// Variables with an edge into `var`'s vertex.
    pub fn parent_vars(&self, var: Var) -> &[Var] {
        &self.vertices[&var].parents
    }

    /// Assigned literals of the vertices with an edge into `id`. For a
    /// propagated vertex these are the assignments that falsified the rest
    /// of its forcing clause; for the conflict vertex, the assignments that
    /// falsified the conflicting clause.
    pub fn parent_lits(&self, id: VertexId) -> Vec<Lit> {
        let parents = match id {
            VertexId::Conflict => {
                let conflict = self
                    .conflict
                    .as_ref()
                    .expect("no conflict vertex on record");
                &conflict.parents
            }
            VertexId::Var(var) => &self.vertices[&var].parents,
        };
        parents.iter().map(|p| self.vertices[p].lit).collect()
    }

    /// Read-only copy of the graph, deterministically ordered: vertices by
    /// variable index, the conflict vertex (if any) last.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut vars: Vec<Var> = self.vertices.keys().copied().collect();
        vars.sort_by_key(|v| v.index());

        let mut vertices = vec![];
        let mut edges = vec![];
        for &var in &vars {
            let vertex = &self.vertices[&var];
            vertices.push(VertexSnapshot {
                var: Some(var),
                positive: Some(!vertex.lit.sign()),
                level: vertex.level,
                is_decision: vertex.is_decision,
                is_conflict: false,
            });
            for &p in &vertex.parents {
                edges.push((VertexId::Var(p), VertexId::Var(var)));
            }
        }
        if let Some(conflict) = &self.conflict {
            vertices.push(VertexSnapshot {
                var: None,
                positive: None,
                level: conflict.level,
                is_decision: false,
                is_conflict: true,
            });
            for &p in &conflict.parents {
                edges.push((VertexId::Var(p), VertexId::Conflict));
            }
        }
        GraphSnapshot { vertices, edges }
    }
}

/// One vertex of a [`GraphSnapshot`].
#[derive(Clone, Debug)]
pub struct VertexSnapshot {
    /// The assigned variable, or `None` for the conflict vertex.
    pub var: Option<Var>,
    /// Polarity of the assignment (`true` = positive), `None` for the
    /// conflict vertex.
    pub positive: Option<bool>,
    /// Decision level the vertex was created at.
    pub level: i32,
    /// Whether the assignment was a free decision.
    pub is_decision: bool,
    /// Whether this is the synthetic conflict vertex.
    pub is_conflict: bool,
}

/// A read-only copy of the implication graph, for inspection or rendering.
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    /// Vertices, ordered by variable index, conflict vertex last.
    pub vertices: Vec<VertexSnapshot>,
    /// Directed edges as (from, to) pairs.
    pub edges: Vec<(VertexId, VertexId)>,
}

impl GraphSnapshot {
    /// Render the snapshot as a Graphviz dot digraph. Decisions and the
    /// conflict vertex come out as ellipses, propagated assignments as
    /// boxes.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph implications {\n");
        for v in &self.vertices {
            let (id, label) = match v.var {
                Some(var) => (
                    dot_id(VertexId::Var(var)),
                    format!(
                        "{}x{} @ {}",
                        if v.positive == Some(true) { "" } else { "¬" },
                        var.index(),
                        v.level
                    ),
                ),
                None => (dot_id(VertexId::Conflict), format!("conflict @ {}", v.level)),
            };
            let shape = if v.is_decision || v.is_conflict {
                "ellipse"
            } else {
                "box"
            };
            out.push_str(&format!(
                "    {} [label=\"{}\", shape={}];\n",
                id, label, shape
            ));
        }
        for &(from, to) in &self.edges {
            out.push_str(&format!("    {} -> {};\n", dot_id(from), dot_id(to)));
        }
        out.push_str("}\n");
        out
    }
}

fn dot_id(id: VertexId) -> String {
    match id {
        VertexId::Var(var) => format!("x{}", var.index()),
        VertexId::Conflict => "conflict".to_string(),
    }
}
