use super::{Binary, Condition};

impl Binary {
    /// Flattens nested operands that share this node's operator into this
    /// node, recursing through the whole tree.
    ///
    /// `and(a, and(b, c))` becomes `and(a, b, c)`. Operand order is kept and
    /// the operation is idempotent.
    pub fn simplify(&self) -> Binary {
        let mut operands = Vec::with_capacity(self.operands.len());

        for operand in &self.operands {
            match operand {
                Condition::Binary(child) if child.op == self.op => {
                    operands.extend(child.simplify().operands);
                }
                Condition::Binary(child) => {
                    operands.push(Condition::Binary(child.simplify()));
                }
                Condition::Comparison(_) => operands.push(operand.clone()),
            }
        }

        Binary {
            op: self.op,
            operands,
        }
    }
}

impl Condition {
    pub fn simplify(&self) -> Condition {
        match self {
            Self::Binary(binary) => Self::Binary(binary.simplify()),
            Self::Comparison(_) => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{and, eq, gt, lt, or, BinaryOp};

    #[test]
    fn flattens_same_operator_children() {
        let cond = and(eq("a", 1), and(eq("b", 2), and(eq("c", 3), eq("d", 4))));
        let Condition::Binary(simplified) = cond.simplify() else {
            panic!()
        };

        assert_eq!(simplified.op, BinaryOp::And);
        assert_eq!(
            simplified.operands,
            vec![eq("a", 1), eq("b", 2), eq("c", 3), eq("d", 4)]
        );
    }

    #[test]
    fn keeps_differing_operator_children() {
        let cond = and(eq("a", 1), or(gt("b", 2), or(lt("c", 3), eq("d", 4))));
        let simplified = cond.simplify();

        assert_eq!(
            simplified,
            and(
                eq("a", 1),
                Condition::any([gt("b", 2), lt("c", 3), eq("d", 4)]).unwrap()
            )
        );
    }

    #[test]
    fn comparison_is_unchanged() {
        assert_eq!(eq("a", 1).simplify(), eq("a", 1));
    }
}
