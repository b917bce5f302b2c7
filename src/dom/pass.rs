//! Tree traversal utilities for rewriting passes.

use super::arena::{ArenaDom, ArenaNodeId};

/// Walk the subtree under `root` bottom-up and call visitor at each parent.
///
/// Children are processed before parents, so removals cascade: a paragraph
/// emptied by removing its only superscript is itself seen as empty.
pub fn walk_bottom_up<F>(dom: &mut ArenaDom, root: ArenaNodeId, mut visitor: F)
where
    F: FnMut(&mut ArenaDom, ArenaNodeId),
{
    walk_children(dom, root, &mut visitor);
}

fn walk_children<F>(dom: &mut ArenaDom, parent_id: ArenaNodeId, visitor: &mut F)
where
    F: FnMut(&mut ArenaDom, ArenaNodeId),
{
    let children: Vec<_> = dom.children(parent_id).collect();
    for child_id in children {
        walk_children(dom, child_id, visitor);
    }
    visitor(dom, parent_id);
}

/// Remove every child of `parent_id` for which `should_remove` returns true.
pub fn remove_children_where<F>(dom: &mut ArenaDom, parent_id: ArenaNodeId, should_remove: F)
where
    F: Fn(&ArenaDom, ArenaNodeId) -> bool,
{
    let doomed: Vec<_> = dom
        .children(parent_id)
        .filter(|&child| should_remove(dom, child))
        .collect();
    for child in doomed {
        dom.detach(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_cascades() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[]);
        let p = dom.create_html_element("p", &[]);
        let sup = dom.create_html_element("sup", &[]);
        dom.append(dom.document(), div);
        dom.append(div, p);
        dom.append(p, sup);

        let root = dom.document();
        walk_bottom_up(&mut dom, root, |dom, parent| {
            remove_children_where(dom, parent, |dom, child| {
                dom.is_element(child) && dom.children(child).count() == 0
            });
        });

        assert_eq!(dom.children(div).count(), 0);
        // div itself became empty after its child was removed
        assert_eq!(dom.children(dom.document()).count(), 0);
    }
}
