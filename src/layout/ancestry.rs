//! Ancestor visibility check for the header row.

/// Returns true if `start` is hidden by itself or an ancestor below the
/// nearest block container.
///
/// Walks from `start` through `parent` until `is_block` matches, reporting
/// true as soon as a visited node has `display: none`. A missing start node
/// counts as hidden; running out of parents before a block container does not.
pub fn hidden_by_ancestor<N, P, B, D>(start: Option<N>, parent: P, is_block: B, display_none: D) -> bool
where
    P: Fn(&N) -> Option<N>,
    B: Fn(&N) -> bool,
    D: Fn(&N) -> bool,
{
    let Some(mut node) = start else {
        return true;
    };
    while !is_block(&node) {
        if display_none(&node) {
            return true;
        }
        match parent(&node) {
            Some(next) => node = next,
            None => return false,
        }
    }
    false
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    /// Arena tree node: (tag, display none, parent index)
    type Node = (&'static str, bool, Option<usize>);

    fn check(tree: &[Node], start: Option<usize>) -> bool {
        hidden_by_ancestor(
            start,
            |&i| tree[i].2,
            |&i| tree[i].0 == "DIV",
            |&i| tree[i].1,
        )
    }

    #[test]
    fn test_visible_header() {
        let tree = [("DIV", false, None), ("TABLE", false, Some(0)), ("THEAD", false, Some(1))];
        assert!(!check(&tree, Some(2)));
    }

    #[test]
    fn test_hidden_ancestor_below_block() {
        let tree = [("DIV", false, None), ("TABLE", true, Some(0)), ("THEAD", false, Some(1))];
        assert!(check(&tree, Some(2)));
    }

    #[test]
    fn test_hidden_above_block_is_ignored() {
        let tree = [("DIV", true, None), ("DIV", false, Some(0)), ("THEAD", false, Some(1))];
        assert!(!check(&tree, Some(2)));
    }

    #[test]
    fn test_missing_header_counts_as_hidden() {
        let tree: [Node; 0] = [];
        assert!(check(&tree, None));
    }

    #[test]
    fn test_detached_chain_is_visible() {
        let tree = [("TABLE", false, None), ("THEAD", false, Some(0))];
        assert!(!check(&tree, Some(1)));
    }
}
