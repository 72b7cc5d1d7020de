use std::fmt;

use derive_more::Display;

use super::NodeId;

const HEADER: [&str; 2] = ["```mermaid", "graph TD"];
const FOOTER: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DiagramLine {
    #[display("    {id}[{label}]")]
    Node { id: NodeId, label: String },
    #[display("    {from} --> {to}")]
    Edge { from: NodeId, to: NodeId },
}

/// A complete flowchart: header, node and edge lines in emission order, footer.
///
/// Rendered with `\n` separators and no trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramDocument {
    lines: Vec<DiagramLine>,
}

impl DiagramDocument {
    pub fn new(lines: Vec<DiagramLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[DiagramLine] {
        &self.lines
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.lines.iter().filter_map(|line| match line {
            DiagramLine::Node { id, label } => Some((id, label.as_str())),
            DiagramLine::Edge { .. } => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.lines.iter().filter_map(|line| match line {
            DiagramLine::Edge { from, to } => Some((from, to)),
            DiagramLine::Node { .. } => None,
        })
    }
}

impl fmt::Display for DiagramDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in HEADER {
            writeln!(f, "{header}")?;
        }
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        f.write_str(FOOTER)
    }
}
