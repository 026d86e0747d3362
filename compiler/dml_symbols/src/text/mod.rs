//! Text output.
//!
//! [`IndentedWriter`] builds indented text line by line; [`render_summary`]
//! uses it with the visitor to print a symbol graph as an outline:
//!
//! ```text
//! namespace Shop
//!     entity Order identity guid
//!         event Placed
//!             total: Shop.Money
//!     value Money : decimal
//!     api Orders -> void
//!         query Recent -> Shop.Money*
//! ```

use std::fmt;

use dml_ir::Cardinality;

use crate::visitor::{
    walk_complex_value, walk_entity, walk_event, walk_namespace, walk_path, walk_query, Node,
    SymbolVisitor,
};
use crate::{
    AtomSymbol, Compilation, ComplexValueSymbol, EntitySymbol, EventSymbol, ExternalValueSymbol,
    NamespaceSymbol, OperationSymbol, PathSymbol, QuerySymbol, TypeLookup, TypeReference,
};

/// Spaces per indentation level.
const INDENT_WIDTH: usize = 4;

/// In-memory writer that prefixes every line with the current indentation.
#[derive(Debug, Default)]
pub struct IndentedWriter {
    buffer: String,
    level: usize,
    at_line_start: bool,
}

impl IndentedWriter {
    pub fn new() -> Self {
        IndentedWriter {
            buffer: String::new(),
            level: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Saturates at zero.
    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Run `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent();
        body(self);
        self.outdent();
    }

    /// Emit text; embedded newlines start new indented lines.
    pub fn emit(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.buffer.push('\n');
                self.at_line_start = true;
            }
            if line.is_empty() {
                continue;
            }
            if self.at_line_start {
                self.buffer
                    .extend(std::iter::repeat(' ').take(self.level * INDENT_WIDTH));
                self.at_line_start = false;
            }
            self.buffer.push_str(line);
        }
    }

    pub fn emit_line(&mut self, text: &str) {
        self.emit(text);
        self.emit_newline();
    }

    pub fn emit_newline(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn output(self) -> String {
        self.buffer
    }
}

impl fmt::Write for IndentedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.emit(s);
        Ok(())
    }
}

/// Render `graph` as an indented outline.
pub fn render_summary(graph: &Compilation) -> String {
    let mut printer = SummaryPrinter {
        graph,
        out: IndentedWriter::new(),
    };
    graph.accept(&mut printer);
    printer.out.output()
}

fn cardinality_suffix(cardinality: Cardinality) -> String {
    match (cardinality.minimum(), cardinality.maximum()) {
        (1, Some(1)) => String::new(),
        (0, Some(1)) => "?".to_owned(),
        (0, None) => "*".to_owned(),
        (1, None) => "+".to_owned(),
        _ => format!("[{cardinality}]"),
    }
}

struct SummaryPrinter<'g> {
    graph: &'g Compilation,
    out: IndentedWriter,
}

impl SummaryPrinter<'_> {
    fn lookup(&self, lookup: &TypeLookup) -> String {
        lookup
            .get()
            .map_or_else(|| "?".to_owned(), |ty| self.graph.describe(ty))
    }

    fn reference(&self, reference: &TypeReference) -> String {
        format!(
            "{}{}",
            self.lookup(&reference.lookup),
            cardinality_suffix(reference.cardinality)
        )
    }

    fn base(&self, base: Option<&TypeLookup>) -> String {
        base.map(|base| format!(" : {}", self.lookup(base)))
            .unwrap_or_default()
    }

    fn operation(&mut self, keyword: &str, name: &str, operation: &OperationSymbol) {
        let argument = operation
            .argument
            .as_ref()
            .map(|argument| format!("({}: {})", argument.name, self.reference(&argument.reference)))
            .unwrap_or_default();
        let result = self.reference(&operation.result);
        self.out
            .emit_line(&format!("{keyword} {name}{argument} -> {result}"));
    }

    fn abstract_prefix(is_abstract: bool) -> &'static str {
        if is_abstract {
            "abstract "
        } else {
            ""
        }
    }
}

impl<'g> SymbolVisitor<'g> for SummaryPrinter<'g> {
    fn visit_namespace(&mut self, node: Node<'g, NamespaceSymbol>) {
        self.out.emit_line(&format!("namespace {}", node.full_name()));
        self.out.indent();
        walk_namespace(self, node);
        self.out.outdent();
    }

    fn visit_entity(&mut self, node: Node<'g, EntitySymbol>) {
        let entity = node.data;
        let shape = match &entity.identity {
            Some(identity) => format!(" identity {}", self.reference(identity)),
            None => self.base(entity.base.as_ref()),
        };
        self.out.emit_line(&format!(
            "{}entity {}{shape}",
            Self::abstract_prefix(entity.is_abstract),
            node.name()
        ));
        self.out.indent();
        walk_entity(self, node);
        self.out.outdent();
    }

    fn visit_event(&mut self, node: Node<'g, EventSymbol>) {
        let base = self.base(node.data.base.as_ref());
        self.out.emit_line(&format!(
            "{}event {}{base}",
            Self::abstract_prefix(node.data.is_abstract),
            node.name()
        ));
        self.out.indent();
        walk_event(self, node);
        self.out.outdent();
    }

    fn visit_complex_value(&mut self, node: Node<'g, ComplexValueSymbol>) {
        let value = node.data;
        let base = self.base(value.base.as_ref());
        self.out.emit(&format!(
            "{}value {}{base}",
            Self::abstract_prefix(value.is_abstract),
            node.name()
        ));
        if !value.equal_by.is_empty() {
            let keys: Vec<&str> = value.equal_by.iter().map(dml_ir::Identifier::as_str).collect();
            self.out.emit(&format!(" equal by ({})", keys.join(", ")));
        }
        self.out.emit_newline();
        self.out.indent();
        walk_complex_value(self, node);
        self.out.outdent();
    }

    fn visit_external_value(&mut self, node: Node<'g, ExternalValueSymbol>) {
        let base = self.base(node.data.base.as_ref());
        self.out
            .emit_line(&format!("external value {}{base}", node.name()));
    }

    fn visit_external_enum(&mut self, node: Node<'g, ()>) {
        self.out.emit_line(&format!("external enum {}", node.name()));
    }

    fn visit_web_api(&mut self, node: Node<'g, PathSymbol>) {
        self.operation("api", node.name().as_str(), &node.data.operation);
        self.out.indent();
        walk_path(self, node);
        self.out.outdent();
    }

    fn visit_path(&mut self, node: Node<'g, PathSymbol>) {
        self.operation("path", node.name().as_str(), &node.data.operation);
        self.out.indent();
        walk_path(self, node);
        self.out.outdent();
    }

    fn visit_query(&mut self, node: Node<'g, QuerySymbol>) {
        self.operation("query", node.name().as_str(), &node.data.operation);
        self.out.indent();
        walk_query(self, node);
        self.out.outdent();
    }

    fn visit_command(&mut self, node: Node<'g, OperationSymbol>) {
        self.operation("command", node.name().as_str(), node.data);
    }

    fn visit_atom(&mut self, _graph: &'g Compilation, atom: &'g AtomSymbol) {
        let alias = atom
            .alias
            .as_ref()
            .map(|alias| format!(" as {alias}"))
            .unwrap_or_default();
        self.out.emit_line(&format!(
            "{}: {}{alias}",
            atom.name,
            self.reference(&atom.reference)
        ));
    }
}
