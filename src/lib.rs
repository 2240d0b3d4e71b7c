pub mod ast;
pub mod env;
pub mod error;
pub mod fresh;
pub mod infer;
pub mod subst;

mod polymorphism;
mod unify;

pub use ast::{Expr, Lit, Scheme, Type};
pub use env::Env;
pub use error::{InferenceError, Result};
pub use fresh::FreshVars;
pub use infer::{infer, infer_type_only, run_inference, InferenceTree, TypeInference};
pub use subst::Subst;
pub use unify::{bind_var, unify};
