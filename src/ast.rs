use std::collections::{HashMap, HashSet};

use itertools::Itertools;

pub type TyVar = String;
pub type TmVar = String;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(TmVar),
    Abs(TmVar, Box<Expr>),
    App(Box<Expr>, Box<Expr>),
    Let(TmVar, Box<Expr>, Box<Expr>),
    Lit(Lit),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_string())
    }

    pub fn int(value: i64) -> Self {
        Expr::Lit(Lit::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Lit(Lit::Bool(value))
    }

    pub fn abs(param: &str, body: Expr) -> Self {
        Expr::Abs(param.to_string(), Box::new(body))
    }

    pub fn app(func: Expr, arg: Expr) -> Self {
        Expr::App(Box::new(func), Box::new(arg))
    }

    pub fn let_in(name: &str, value: Expr, body: Expr) -> Self {
        Expr::Let(name.to_string(), Box::new(value), Box::new(body))
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Lit(Lit::Int(n)) => write!(f, "{}", n),
            Expr::Lit(Lit::Bool(b)) => write!(f, "{}", b),
            Expr::Abs(param, body) => write!(f, "λ{}.{}", param, body),
            Expr::App(func, arg) => match (func.as_ref(), arg.as_ref()) {
                (Expr::Abs(_, _) | Expr::Let(_, _, _), _) => write!(f, "({}) {}", func, arg),
                (_, Expr::App(_, _) | Expr::Abs(_, _) | Expr::Let(_, _, _)) => {
                    write!(f, "{} ({})", func, arg)
                }
                _ => write!(f, "{} {}", func, arg),
            },
            Expr::Let(var, value, body) => write!(f, "let {} = {} in {}", var, value, body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Bool(bool),
}

/// A monotype. Structural equality is variant plus field equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Var(TyVar),
    Arrow(Box<Type>, Box<Type>),
    Int,
    Bool,
}

impl Type {
    pub fn var(name: &str) -> Self {
        Type::Var(name.to_string())
    }

    pub fn arrow(from: Type, to: Type) -> Self {
        Type::Arrow(Box::new(from), Box::new(to))
    }

    pub fn free_type_vars(&self) -> HashSet<TyVar> {
        match self {
            Type::Var(name) => HashSet::from([name.clone()]),
            Type::Arrow(t1, t2) => {
                let mut set = t1.free_type_vars();
                set.extend(t2.free_type_vars());
                set
            }
            Type::Int | Type::Bool => HashSet::new(),
        }
    }

    /// Whether `var` appears anywhere in this type.
    pub fn occurs(&self, var: &str) -> bool {
        match self {
            Type::Var(name) => name == var,
            Type::Arrow(t1, t2) => t1.occurs(var) || t2.occurs(var),
            Type::Int | Type::Bool => false,
        }
    }

    /// Equality up to a consistent, one-to-one renaming of type variables.
    pub fn alpha_eq(&self, other: &Type) -> bool {
        fn go<'a>(
            t1: &'a Type,
            t2: &'a Type,
            left: &mut HashMap<&'a str, &'a str>,
            right: &mut HashMap<&'a str, &'a str>,
        ) -> bool {
            match (t1, t2) {
                (Type::Int, Type::Int) | (Type::Bool, Type::Bool) => true,
                (Type::Var(a), Type::Var(b)) => {
                    let forward = *left.entry(a.as_str()).or_insert(b.as_str());
                    let backward = *right.entry(b.as_str()).or_insert(a.as_str());
                    forward == b.as_str() && backward == a.as_str()
                }
                (Type::Arrow(a1, a2), Type::Arrow(b1, b2)) => {
                    go(a1, b1, left, right) && go(a2, b2, left, right)
                }
                _ => false,
            }
        }

        go(self, other, &mut HashMap::new(), &mut HashMap::new())
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Var(name) => write!(f, "{}", name),
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::Arrow(t1, t2) => match t1.as_ref() {
                Type::Arrow(_, _) => write!(f, "({}) -> {}", t1, t2),
                _ => write!(f, "{} -> {}", t1, t2),
            },
        }
    }
}

/// A polytype: `vars` are universally quantified over `ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    pub vars: Vec<TyVar>,
    pub ty: Type,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.vars.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "forall {}. {}", self.vars.iter().format(" "), self.ty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod display {
        use super::*;

        #[test]
        fn arrow_is_right_associative() {
            let ty = Type::arrow(
                Type::arrow(Type::var("a"), Type::var("b")),
                Type::arrow(Type::var("a"), Type::Int),
            );
            assert_eq!(ty.to_string(), "(a -> b) -> a -> Int");
        }

        #[test]
        fn scheme_with_quantifiers() {
            let scheme = Scheme {
                vars: vec!["a".to_string(), "b".to_string()],
                ty: Type::arrow(Type::var("a"), Type::var("b")),
            };
            assert_eq!(scheme.to_string(), "forall a b. a -> b");
        }

        #[test]
        fn expressions() {
            let id = Expr::abs("x", Expr::var("x"));
            assert_eq!(id.to_string(), "λx.x");
            assert_eq!(Expr::app(id.clone(), Expr::int(3)).to_string(), "(λx.x) 3");
            assert_eq!(
                Expr::app(Expr::var("f"), Expr::app(Expr::var("g"), Expr::bool(true)))
                    .to_string(),
                "f (g true)"
            );
            assert_eq!(
                Expr::let_in("id", id, Expr::var("id")).to_string(),
                "let id = λx.x in id"
            );
        }
    }

    mod equality {
        use super::*;

        #[test]
        fn different_variants_never_equal() {
            assert_ne!(Type::Int, Type::Bool);
            assert_ne!(Type::var("a"), Type::Int);
            assert_ne!(Type::arrow(Type::Int, Type::Int), Type::Int);
        }

        #[test]
        fn variables_compare_by_name() {
            assert_eq!(Type::var("a"), Type::var("a"));
            assert_ne!(Type::var("a"), Type::var("b"));
        }
    }

    mod free_type_vars {
        use super::*;

        #[test]
        fn base_types_have_none() {
            assert!(Type::Int.free_type_vars().is_empty());
            assert!(Type::Bool.free_type_vars().is_empty());
        }

        #[test]
        fn arrow_unions_both_sides() {
            let ty = Type::arrow(Type::var("a"), Type::arrow(Type::var("b"), Type::var("a")));
            let expected = HashSet::from(["a".to_string(), "b".to_string()]);
            assert_eq!(ty.free_type_vars(), expected);
        }
    }

    mod alpha_eq {
        use super::*;

        #[test]
        fn consistent_renaming() {
            let t1 = Type::arrow(Type::var("t3"), Type::var("t3"));
            let t2 = Type::arrow(Type::var("a"), Type::var("a"));
            assert!(t1.alpha_eq(&t2));
        }

        #[test]
        fn renaming_must_be_injective() {
            let t1 = Type::arrow(Type::var("a"), Type::var("b"));
            let t2 = Type::arrow(Type::var("c"), Type::var("c"));
            assert!(!t1.alpha_eq(&t2));
            assert!(!t2.alpha_eq(&t1));
        }

        #[test]
        fn base_types_must_match() {
            assert!(!Type::arrow(Type::Int, Type::var("a"))
                .alpha_eq(&Type::arrow(Type::Bool, Type::var("a"))));
        }
    }
}
