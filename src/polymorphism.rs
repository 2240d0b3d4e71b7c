use std::collections::HashSet;

use tracing::trace;

use crate::{
    ast::{Scheme, TyVar, Type},
    env::Env,
    fresh::FreshVars,
    subst::Subst,
};

impl Scheme {
    /// A scheme quantifying over nothing.
    pub fn monomorphic(ty: Type) -> Self {
        Scheme { vars: vec![], ty }
    }

    pub fn free_type_vars(&self) -> HashSet<TyVar> {
        let mut set = self.ty.free_type_vars();
        for var in &self.vars {
            set.remove(var);
        }
        set
    }

    /// Quantified variables are shielded from `subst`.
    pub fn apply_subst(&self, subst: &Subst) -> Scheme {
        Scheme {
            vars: self.vars.clone(),
            ty: subst.restrict(&self.vars).apply(&self.ty),
        }
    }

    pub fn instantiate(&self, fresh: &mut FreshVars) -> Type {
        if self.vars.is_empty() {
            return self.ty.clone();
        }

        let subst: Subst = self
            .vars
            .iter()
            .map(|var| (var.clone(), fresh.fresh()))
            .collect();
        trace!(scheme = %self, %subst, "instantiate");

        subst.apply(&self.ty)
    }
}

impl Env {
    /// Quantify over the variables free in `ty` but not in this environment.
    pub fn generalize(&self, ty: &Type) -> Scheme {
        let env_vars = self.free_type_vars();
        let mut vars: Vec<_> = ty
            .free_type_vars()
            .into_iter()
            .filter(|var| !env_vars.contains(var))
            .collect();
        // For deterministic behavior
        vars.sort();

        Scheme {
            vars,
            ty: ty.clone(),
        }
    }
}
