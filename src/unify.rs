use tracing::trace;

use crate::{
    ast::{TyVar, Type},
    error::{InferenceError, Result},
    infer::InferenceTree,
    subst::Subst,
};

/// Most general unifier of `t1` and `t2`.
pub fn unify(t1: &Type, t2: &Type) -> Result<Subst> {
    unify_traced(t1, t2).map(|(subst, _)| subst)
}

/// Bind `var` to `ty`, refusing bindings that would create an infinite type.
pub fn bind_var(var: &str, ty: &Type) -> Result<Subst> {
    bind_var_traced(var, ty, &format!("{} ~ {} ⇒", var, ty)).map(|(subst, _)| subst)
}

pub(crate) fn unify_traced(t1: &Type, t2: &Type) -> Result<(Subst, InferenceTree)> {
    let input = format!("{} ~ {} ⇒", t1, t2);

    match (t1, t2) {
        (Type::Int, Type::Int) | (Type::Bool, Type::Bool) => unify_base(&input),
        (Type::Var(v), ty) | (ty, Type::Var(v)) => bind_var_traced(v, ty, &input),
        (Type::Arrow(a1, a2), Type::Arrow(b1, b2)) => unify_arrow(a1, a2, b1, b2, &input),
        _ => Err(InferenceError::UnificationMismatch {
            expected: t1.clone(),
            actual: t2.clone(),
        }),
    }
}

// ───────────────────── (U-Int, U-Bool)
// unify(τ, τ) = ∅
fn unify_base(input: &str) -> Result<(Subst, InferenceTree)> {
    let tree = InferenceTree::new("Unify-Base", input, "{}", vec![]);
    Ok((Subst::empty(), tree))
}

// α ∉ ftv(τ)
// ────────────────────── (U-VarL, U-VarR)
// unify(α, τ) = [α ↦ τ]
fn bind_var_traced(v: &str, ty: &Type, input: &str) -> Result<(Subst, InferenceTree)> {
    if matches!(ty, Type::Var(name) if name == v) {
        let tree = InferenceTree::new("Unify-Var-Same", input, "{}", vec![]);
        Ok((Subst::empty(), tree))
    } else if ty.occurs(v) {
        Err(InferenceError::OccursCheckFailure {
            var: TyVar::from(v),
            ty: ty.clone(),
        })
    } else {
        trace!(var = v, %ty, "bind");
        let subst = Subst::singleton(TyVar::from(v), ty.clone());
        let tree = InferenceTree::new("Unify-Var", input, &subst.to_string(), vec![]);
        Ok((subst, tree))
    }
}

// S₁ = unify(τ₁, τ₃)    S₂ = unify(S₁(τ₂), S₁(τ₄))
// ───────────────────────────────────────────────── (U-Arrow)
// unify(τ₁ → τ₂, τ₃ → τ₄) = S₂ ∘ S₁
fn unify_arrow(
    a1: &Type,
    a2: &Type,
    b1: &Type,
    b2: &Type,
    input: &str,
) -> Result<(Subst, InferenceTree)> {
    let (s1, tree1) = unify_traced(a1, b1)?;
    let (s2, tree2) = unify_traced(&s1.apply(a2), &s1.apply(b2))?;
    let final_subst = s2.compose(&s1);
    let tree = InferenceTree::new(
        "Unify-Arrow",
        input,
        &final_subst.to_string(),
        vec![tree1, tree2],
    );
    Ok((final_subst, tree))
}
