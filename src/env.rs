use std::collections::HashSet;

use itertools::Itertools;
use rpds::RedBlackTreeMap;

use crate::{
    ast::{Scheme, TmVar, TyVar},
    subst::Subst,
};

/// A persistent typing environment mapping program variables to schemes.
///
/// Every update returns a new environment sharing structure with the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env(RedBlackTreeMap<TmVar, Scheme>);

impl Env {
    pub fn empty() -> Self {
        Env(RedBlackTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, name: &str) -> Option<&Scheme> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TmVar, &Scheme)> {
        self.0.iter()
    }

    /// Bind `name`, replacing any previous binding.
    pub fn extend(&self, name: &str, scheme: Scheme) -> Env {
        Env(self.0.insert(name.to_string(), scheme))
    }

    pub fn remove(&self, name: &str) -> Env {
        Env(self.0.remove(name))
    }

    pub fn free_type_vars(&self) -> HashSet<TyVar> {
        self.0
            .values()
            .flat_map(|scheme| scheme.free_type_vars())
            .collect()
    }

    pub fn apply_subst(&self, subst: &Subst) -> Env {
        if subst.is_empty() {
            return self.clone();
        }
        Env(self
            .0
            .iter()
            .map(|(name, scheme)| (name.clone(), scheme.apply_subst(subst)))
            .collect())
    }

    /// Union of both environments; on a shared name, `self` wins.
    pub fn merge(&self, other: &Env) -> Env {
        let mut map = self.0.clone();
        for (name, scheme) in other.iter() {
            if !map.contains_key(name) {
                map.insert_mut(name.clone(), scheme.clone());
            }
        }
        Env(map)
    }
}

impl FromIterator<(TmVar, Scheme)> for Env {
    fn from_iter<I: IntoIterator<Item = (TmVar, Scheme)>>(iter: I) -> Self {
        Env(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(name, scheme)| format!("{}: {}", name, scheme))
                .format(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Type;

    fn tyvar(name: &str) -> Type {
        Type::Var(name.to_string())
    }

    fn poly(vars: &[&str], ty: Type) -> Scheme {
        Scheme {
            vars: vars.iter().map(|v| v.to_string()).collect(),
            ty,
        }
    }

    mod bindings {
        use super::*;

        #[test]
        fn extend_overwrites() {
            let env = Env::empty()
                .extend("x", Scheme::monomorphic(Type::Int))
                .extend("x", Scheme::monomorphic(Type::Bool));
            assert_eq!(env.get("x"), Some(&Scheme::monomorphic(Type::Bool)));
            assert_eq!(env.len(), 1);
        }

        #[test]
        fn extend_leaves_original_untouched() {
            let base = Env::empty().extend("x", Scheme::monomorphic(Type::Int));
            let _derived = base.extend("y", Scheme::monomorphic(Type::Bool));
            assert_eq!(base.get("y"), None);
        }

        #[test]
        fn remove_present_and_absent() {
            let env = Env::empty().extend("x", Scheme::monomorphic(Type::Int));
            assert!(env.remove("x").is_empty());
            assert_eq!(env.remove("y"), env);
        }
    }

    mod free_type_vars {
        use super::*;

        #[test]
        fn union_over_schemes() {
            let env = Env::empty()
                .extend("f", poly(&["a"], Type::arrow(tyvar("a"), tyvar("b"))))
                .extend("x", Scheme::monomorphic(tyvar("c")));
            let expected = HashSet::from(["b".to_string(), "c".to_string()]);
            assert_eq!(env.free_type_vars(), expected);
        }
    }

    mod apply_subst {
        use super::*;

        #[test]
        fn rewrites_every_scheme() {
            let env = Env::empty()
                .extend("f", poly(&["a"], Type::arrow(tyvar("a"), tyvar("b"))))
                .extend("x", Scheme::monomorphic(tyvar("a")));
            let subst: Subst = [("a".to_string(), Type::Int), ("b".to_string(), Type::Bool)]
                .into_iter()
                .collect();
            let actual = env.apply_subst(&subst);
            assert_eq!(
                actual.get("f"),
                Some(&poly(&["a"], Type::arrow(tyvar("a"), Type::Bool)))
            );
            assert_eq!(actual.get("x"), Some(&Scheme::monomorphic(Type::Int)));
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn receiver_wins_on_collision() {
            let left = Env::empty().extend("x", Scheme::monomorphic(Type::Int));
            let right = Env::empty()
                .extend("x", Scheme::monomorphic(Type::Bool))
                .extend("y", Scheme::monomorphic(Type::Bool));
            let merged = left.merge(&right);
            assert_eq!(merged.get("x"), Some(&Scheme::monomorphic(Type::Int)));
            assert_eq!(merged.get("y"), Some(&Scheme::monomorphic(Type::Bool)));
        }
    }

    #[test]
    fn display() {
        let env = Env::empty()
            .extend("y", Scheme::monomorphic(Type::Bool))
            .extend("id", poly(&["a"], Type::arrow(tyvar("a"), tyvar("a"))));
        assert_eq!(env.to_string(), "{id: forall a. a -> a, y: Bool}");
        assert_eq!(Env::empty().to_string(), "{}");
    }
}
