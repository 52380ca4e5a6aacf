use crate::expr::node::{Expr, MemberExpr};

#[derive(Clone, Debug)]
/// Member-access nodes from a leaf up to its outermost member access.
///
/// Collected leaf-to-root by following `inner` while it is itself a member access.
/// Values must be re-derived root-to-leaf: each read applies to the result of its
/// receiver. Never empty.
pub struct DependencyChain<'e> {
    links: Vec<&'e MemberExpr>,
}

impl<'e> DependencyChain<'e> {
    /// Walk from `expr` through successive member-access receivers.
    pub fn collect(expr: &'e MemberExpr) -> Self {
        let mut links = Vec::new();
        let mut cursor = Some(expr);
        while let Some(node) = cursor {
            links.push(node);
            cursor = node.inner().and_then(Expr::as_member);
        }
        Self { links }
    }

    /// Number of member accesses.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always `false`: a chain holds at least the node it was collected from.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The node the chain was collected from.
    pub fn leaf(&self) -> &'e MemberExpr {
        self.links[0]
    }

    /// Member access closest to the root.
    pub fn outermost(&self) -> &'e MemberExpr {
        self.links[self.links.len() - 1]
    }

    /// Receiver of the outermost member access; a constant for resolvable chains.
    pub fn root(&self) -> Option<&'e Expr> {
        self.outermost().inner()
    }

    /// Collection order.
    pub fn leaf_to_root(&self) -> impl Iterator<Item = &'e MemberExpr> + '_ {
        self.links.iter().copied()
    }

    /// Application order.
    pub fn root_to_leaf(&self) -> impl Iterator<Item = &'e MemberExpr> + '_ {
        self.links.iter().rev().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/chain.rs"]
mod tests;
