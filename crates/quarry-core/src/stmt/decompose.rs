use super::{Binary, BinaryOp, Condition};
use crate::{Error, Result};
use std::collections::VecDeque;

impl Condition {
    /// Rewrites the condition into a list of OR-free conjunctions whose
    /// disjunction is equivalent to the original.
    ///
    /// Trees are expanded breadth first: the shallowest `or` is located,
    /// one new tree is produced per operand with the `or` replaced by that
    /// operand, and the new trees are queued. Trees with no `or` left are
    /// emitted in the order they are completed.
    ///
    /// Fails with a too complex query error if `xor` appears anywhere in the
    /// tree.
    pub fn decompose(&self) -> Result<Vec<Binary>> {
        let root = match self {
            Self::Comparison(_) => return Ok(vec![Binary::wrap(self.clone())]),
            Self::Binary(binary) => binary.simplify(),
        };

        if root.contains_op(BinaryOp::Xor) {
            return Err(Error::too_complex_query(
                "`xor` cannot be rewritten into OR-free branches",
            ));
        }

        if root.is_leaf() {
            return Ok(match root.op {
                BinaryOp::Or => root.operands.into_iter().map(Binary::wrap).collect(),
                _ => vec![root],
            });
        }

        let mut queue = VecDeque::from([root]);
        let mut branches = vec![];

        while let Some(tree) = queue.pop_front() {
            match split_first_or(&tree) {
                Some(split) => queue.extend(split),
                None => branches.push(tree),
            }
        }

        Ok(branches)
    }
}

/// Splits `tree` on its shallowest `or` node. Returns `None` when the tree
/// contains no `or`.
fn split_first_or(tree: &Binary) -> Option<Vec<Binary>> {
    let path = find_first_or(tree)?;
    let target = node_at(tree, &path);

    Some(
        target
            .operands
            .iter()
            .map(|operand| replace_at(tree, &path, operand).simplify())
            .collect(),
    )
}

/// Breadth-first search for the first `or` node, returning the operand
/// indices leading to it from the root.
fn find_first_or(tree: &Binary) -> Option<Vec<usize>> {
    let mut queue = VecDeque::from([(tree, vec![])]);

    while let Some((node, path)) = queue.pop_front() {
        if node.op.is_or() {
            return Some(path);
        }

        for (i, operand) in node.operands.iter().enumerate() {
            if let Condition::Binary(child) = operand {
                let mut child_path = path.clone();
                child_path.push(i);
                queue.push_back((child, child_path));
            }
        }
    }

    None
}

fn node_at<'a>(tree: &'a Binary, path: &[usize]) -> &'a Binary {
    path.iter().fold(tree, |node, &i| match &node.operands[i] {
        Condition::Binary(child) => child,
        Condition::Comparison(_) => unreachable!("path leads through binary nodes only"),
    })
}

/// Returns a copy of `tree` with the node at `path` replaced by
/// `replacement`.
fn replace_at(tree: &Binary, path: &[usize], replacement: &Condition) -> Binary {
    let Some((&first, rest)) = path.split_first() else {
        return Binary::wrap(replacement.clone());
    };

    let mut operands = tree.operands.clone();
    operands[first] = match rest {
        [] => replacement.clone(),
        _ => {
            let Condition::Binary(child) = &tree.operands[first] else {
                unreachable!("path leads through binary nodes only")
            };
            Condition::Binary(replace_at(child, rest, replacement))
        }
    };

    Binary {
        op: tree.op,
        operands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{and, eq, gt, lt, ne, or, xor};
    use pretty_assertions::assert_eq;

    fn conj(conditions: Vec<Condition>) -> Binary {
        Binary::new(BinaryOp::And, conditions).unwrap()
    }

    #[test]
    fn or_inside_and_splits_into_two_branches() {
        let cond = and(or(eq("foo", "bar"), gt("age", 21)), eq("gender", "male"));

        let branches = cond.decompose().unwrap();

        assert_eq!(
            branches,
            vec![
                conj(vec![eq("foo", "bar"), eq("gender", "male")]),
                conj(vec![gt("age", 21), eq("gender", "male")]),
            ]
        );
    }

    #[test]
    fn single_comparison_is_wrapped() {
        let branches = eq("id", 1).decompose().unwrap();
        assert_eq!(branches, vec![conj(vec![eq("id", 1)])]);
    }

    #[test]
    fn flat_or_gives_one_branch_per_operand() {
        let cond = or(eq("a", 1), or(eq("b", 2), eq("c", 3)));
        let branches = cond.decompose().unwrap();

        assert_eq!(
            branches,
            vec![
                conj(vec![eq("a", 1)]),
                conj(vec![eq("b", 2)]),
                conj(vec![eq("c", 3)]),
            ]
        );
    }

    #[test]
    fn flat_and_is_returned_as_is() {
        let cond = and(eq("a", 1), ne("b", 2));
        let branches = cond.decompose().unwrap();
        assert_eq!(branches, vec![conj(vec![eq("a", 1), ne("b", 2)])]);
    }

    #[test]
    fn two_ors_multiply() {
        let cond = and(or(eq("a", 1), eq("b", 2)), or(eq("c", 3), eq("d", 4)));
        let branches = cond.decompose().unwrap();

        assert_eq!(
            branches,
            vec![
                conj(vec![eq("a", 1), eq("c", 3)]),
                conj(vec![eq("a", 1), eq("d", 4)]),
                conj(vec![eq("b", 2), eq("c", 3)]),
                conj(vec![eq("b", 2), eq("d", 4)]),
            ]
        );
    }

    #[test]
    fn or_of_ands_keeps_each_conjunction() {
        let cond = or(and(eq("a", 1), eq("b", 2)), lt("c", 3));
        let branches = cond.decompose().unwrap();

        assert_eq!(
            branches,
            vec![conj(vec![eq("a", 1), eq("b", 2)]), conj(vec![lt("c", 3)])]
        );
    }

    #[test]
    fn xor_anywhere_is_too_complex() {
        let leaf = xor(eq("a", 1), eq("b", 2));
        assert!(leaf.decompose().unwrap_err().is_too_complex_query());

        let nested = and(eq("c", 3), or(xor(eq("a", 1), eq("b", 2)), eq("d", 4)));
        assert!(nested.decompose().unwrap_err().is_too_complex_query());
    }
}
