use std::collections::BTreeMap;
use std::fmt::Write;

const INDENT: &str = "  ";

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Node>,
    is_dir: bool,
}

/// Indented tree of root-relative, `/`-separated paths.
///
/// Siblings are listed in byte order and directories carry a trailing `/`.
/// A node is a directory if it was added as one or if anything sits below it.
#[derive(Debug, Default)]
pub(crate) struct PathTree {
    root: Node,
}

impl PathTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts one relative path. Empty paths are ignored.
    pub(crate) fn insert(&mut self, rel: &str, is_dir: bool) {
        if rel.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for part in rel.split('/').filter(|p| !p.is_empty()) {
            node = node.children.entry(part.to_string()).or_default();
        }
        node.is_dir |= is_dir;
    }

    /// Renders the tree inside a fenced block.
    pub(crate) fn render(&self) -> String {
        let mut out = String::from("```\n");
        Self::render_node(&self.root, 0, &mut out);
        out.push_str("```");
        out
    }

    fn render_node(node: &Node, depth: usize, out: &mut String) {
        for (name, child) in &node.children {
            let suffix = if child.is_dir || !child.children.is_empty() {
                "/"
            } else {
                ""
            };
            let _ = writeln!(out, "{}{name}{suffix}", INDENT.repeat(depth));
            Self::render_node(child, depth + 1, out);
        }
    }
}
