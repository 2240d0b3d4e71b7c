use itertools::Itertools;
use rpds::RedBlackTreeMap;

use crate::ast::{TyVar, Type};

/// A persistent mapping from type variables to the monotypes replacing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst(RedBlackTreeMap<TyVar, Type>);

impl Subst {
    pub fn empty() -> Self {
        Subst(RedBlackTreeMap::new())
    }

    pub fn singleton(var: TyVar, ty: Type) -> Self {
        Subst(RedBlackTreeMap::new().insert(var, ty))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.size()
    }

    pub fn lookup(&self, var: &str) -> Option<&Type> {
        self.0.get(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TyVar, &Type)> {
        self.0.iter()
    }

    /// The same substitution with no entries for `excluded`.
    pub fn restrict(&self, excluded: &[TyVar]) -> Subst {
        let mut map = self.0.clone();
        for var in excluded {
            map.remove_mut(var);
        }
        Subst(map)
    }

    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(name) => self.lookup(name).cloned().unwrap_or_else(|| ty.clone()),
            Type::Arrow(t1, t2) => Type::Arrow(Box::new(self.apply(t1)), Box::new(self.apply(t2))),
            Type::Int | Type::Bool => ty.clone(),
        }
    }

    /// `self ∘ right`: apply `right` first, then `self`.
    ///
    /// Every type in `right` is rewritten through `self` before merging, and
    /// on a shared key the rewritten entry from `right` wins.
    pub fn compose(&self, right: &Subst) -> Subst {
        let mut map = self.0.clone();
        for (var, ty) in right.iter() {
            map.insert_mut(var.clone(), self.apply(ty));
        }
        Subst(map)
    }
}

impl FromIterator<(TyVar, Type)> for Subst {
    fn from_iter<I: IntoIterator<Item = (TyVar, Type)>>(iter: I) -> Self {
        Subst(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Subst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter().map(|(var, ty)| format!("{}/{}", ty, var)).format(", ")
        )
    }
}
