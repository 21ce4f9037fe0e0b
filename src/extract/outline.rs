//! Outline tree construction.

use crate::engine::{EngineDocument, RawOutline};
use crate::model::{Outline, OutlineNode};

use super::links::LinkResolver;

/// Mirror the engine's outline chain into an owned tree.
///
/// Returns `None` when the document has no outline, so callers can tell a
/// missing table of contents from one whose entries are all empty.
/// Entries whose target does not resolve keep their children.
pub fn build_outline(doc: &dyn EngineDocument) -> Option<Outline> {
    let head = doc.outline()?;
    let mut resolver = LinkResolver::new(doc);

    let outline = Outline {
        children: build_siblings(&mut resolver, Some(&head)),
    };

    if outline.is_empty() {
        None
    } else {
        log::debug!("Built outline with {} entries", outline.total_items());
        Some(outline)
    }
}

/// Walk a sibling chain; each entry's children are built before moving on.
fn build_siblings(resolver: &mut LinkResolver<'_>, first: Option<&RawOutline>) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current = first;

    while let Some(raw) = current {
        let mut node = OutlineNode::new(raw.title.clone());
        node.open = raw.is_open;
        node.destination = resolver.destination(&raw.uri);
        node.children = build_siblings(resolver, raw.down.as_deref());
        nodes.push(node);
        current = raw.next.as_deref();
    }

    nodes
}
