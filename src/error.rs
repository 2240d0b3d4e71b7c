use thiserror::Error;

use crate::ast::{Expr, TmVar, TyVar, Type};

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("unbound variable: {name}")]
    UnboundVariable { name: TmVar },

    #[error("occurs check failed: cannot construct infinite type {var} = {ty}")]
    OccursCheckFailure { var: TyVar, ty: Type },

    #[error("cannot unify {expected} with {actual}")]
    UnificationMismatch { expected: Type, actual: Type },

    /// Reserved for expression forms without an inference rule.
    #[error("unsupported expression: {expr}")]
    UnsupportedExpression { expr: Expr },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = InferenceError::UnboundVariable {
            name: "x".to_string(),
        };
        assert_eq!(err.to_string(), "unbound variable: x");

        let err = InferenceError::OccursCheckFailure {
            var: "t0".to_string(),
            ty: Type::arrow(Type::var("t0"), Type::Int),
        };
        assert_eq!(
            err.to_string(),
            "occurs check failed: cannot construct infinite type t0 = t0 -> Int"
        );

        let err = InferenceError::UnificationMismatch {
            expected: Type::Int,
            actual: Type::Bool,
        };
        assert_eq!(err.to_string(), "cannot unify Int with Bool");
    }
}
