use crate::ast::Annotation;

/// Syntax tree node of one calculation.
///
/// `OperatorChain` only exists between parsing and precedence resolution;
/// a resolved tree is made of the other variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number or variable reference
    ///
    /// # Example
    /// ```text
    /// 42
    /// width
    /// ```
    Literal(String),

    /// Value with an explicit unit
    ///
    /// The unit `None` removes the unit of its child.
    ///
    /// # Example
    /// ```text
    /// 5 m
    /// ```
    UnitOverride { unit: String, child: Box<Expr> },

    /// Result that is shown as its own step line
    Comment {
        annotation: Annotation,
        child: Box<Expr>,
    },

    /// Assignment to a variable, evaluating to the assigned value
    ///
    /// # Example
    /// ```text
    /// x = 5
    /// ```
    VarSetter { name: String, child: Box<Expr> },

    /// Binary operation
    Operator {
        symbol: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Flat run of operands and operators before precedence is known
    ///
    /// Always holds exactly one more value than operators.
    OperatorChain {
        operators: Vec<String>,
        values: Vec<Expr>,
    },

    /// Function call; the implementation is chosen by name and arity
    ///
    /// # Example
    /// ```text
    /// max(a, b)
    /// ```
    Function { name: String, params: Vec<Expr> },
}

impl Expr {
    pub fn literal(value: &str) -> Self {
        Expr::Literal(value.to_string())
    }

    pub fn operator(symbol: &str, left: Expr, right: Expr) -> Self {
        Expr::Operator {
            symbol: symbol.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True if the tree still holds an unresolved operator chain.
    #[cfg(test)]
    pub(crate) fn has_chain(&self) -> bool {
        match self {
            Expr::Literal(_) => false,
            Expr::OperatorChain { .. } => true,
            Expr::UnitOverride { child, .. }
            | Expr::Comment { child, .. }
            | Expr::VarSetter { child, .. } => child.has_chain(),
            Expr::Operator { left, right, .. } => left.has_chain() || right.has_chain(),
            Expr::Function { params, .. } => params.iter().any(Expr::has_chain),
        }
    }

    /// Moves a trailing comment outside of a root assignment and makes sure
    /// the root is a comment, so every calculation ends in a result line.
    pub fn into_root(self) -> Self {
        match self {
            Expr::VarSetter { name, child } => match *child {
                Expr::Comment { annotation, child } => Expr::Comment {
                    annotation,
                    child: Box::new(Expr::VarSetter { name, child }),
                },
                child => Expr::Comment {
                    annotation: Annotation::default(),
                    child: Box::new(Expr::VarSetter {
                        name,
                        child: Box::new(child),
                    }),
                },
            },
            root @ Expr::Comment { .. } => root,
            other => Expr::Comment {
                annotation: Annotation::default(),
                child: Box::new(other),
            },
        }
    }
}
