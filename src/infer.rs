use tracing::{debug, trace};

use crate::{
    ast::{Expr, Lit, Scheme, Type},
    env::Env,
    error::{InferenceError, Result},
    fresh::FreshVars,
    subst::Subst,
    unify::unify_traced,
};

/// Derivation of an inference run: one node per rule applied.
#[derive(Debug)]
pub struct InferenceTree {
    pub rule: String,
    pub input: String,
    pub output: String,
    pub children: Vec<InferenceTree>,
}

impl InferenceTree {
    pub(crate) fn new(rule: &str, input: &str, output: &str, children: Vec<InferenceTree>) -> Self {
        Self {
            rule: rule.to_string(),
            input: input.to_string(),
            output: output.to_string(),
            children,
        }
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        write!(
            f,
            "{:indent$}{}: {} {}",
            "",
            self.rule,
            self.input,
            self.output,
            indent = depth * 2
        )?;
        for child in &self.children {
            writeln!(f)?;
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for InferenceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Algorithm W. Owns the fresh-variable generator for one or more runs.
#[derive(Debug, Default)]
pub struct TypeInference {
    fresh: FreshVars,
}

impl TypeInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fresh(fresh: FreshVars) -> Self {
        Self { fresh }
    }

    /// Infer the type of `expr` under `env`, with the substitution that justifies it.
    pub fn infer(&mut self, env: &Env, expr: &Expr) -> Result<(Type, Subst)> {
        self.infer_traced(env, expr).map(|(ty, subst, _)| (ty, subst))
    }

    pub fn infer_traced(&mut self, env: &Env, expr: &Expr) -> Result<(Type, Subst, InferenceTree)> {
        // Fresh names must not capture variables the caller already uses.
        let in_scope = env.iter().flat_map(|(_, scheme)| {
            scheme
                .ty
                .free_type_vars()
                .into_iter()
                .chain(scheme.vars.iter().cloned())
        });
        self.fresh.reserve(in_scope);
        self.infer_expr(env, expr)
    }

    fn infer_expr(&mut self, env: &Env, expr: &Expr) -> Result<(Type, Subst, InferenceTree)> {
        match expr {
            Expr::Lit(Lit::Int(_)) => Self::infer_lit_int(env, expr),
            Expr::Lit(Lit::Bool(_)) => Self::infer_lit_bool(env, expr),
            Expr::Var(name) => self.infer_var(env, expr, name),
            Expr::Abs(param, body) => self.infer_abs(env, expr, param, body),
            Expr::App(func, arg) => self.infer_app(env, expr, func, arg),
            Expr::Let(var, value, body) => self.infer_let(env, expr, var, value, body),
        }
    }

    // x : σ ∈ Γ    τ = inst(σ)
    // ───────────────────────── (T-Var)
    //        Γ ⊢ x : τ
    fn infer_var(
        &mut self,
        env: &Env,
        expr: &Expr,
        name: &str,
    ) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);

        let scheme = env.get(name).ok_or_else(|| InferenceError::UnboundVariable {
            name: name.to_string(),
        })?;
        let instantiated = scheme.instantiate(&mut self.fresh);
        trace!(rule = "T-Var", %expr, ty = %instantiated);

        let tree = InferenceTree::new("T-Var", &input, &instantiated.to_string(), vec![]);
        Ok((instantiated, Subst::empty(), tree))
    }

    // Γ, x : α ⊢ e : τ    α fresh
    // ───────────────────────────── (T-Abs)
    //    Γ ⊢ λx. e : α → τ
    fn infer_abs(
        &mut self,
        env: &Env,
        expr: &Expr,
        param: &str,
        body: &Expr,
    ) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);

        let param_type = self.fresh.fresh();
        let new_env = env
            .remove(param)
            .extend(param, Scheme::monomorphic(param_type.clone()));

        let (body_type, s1, tree1) = self.infer_expr(&new_env, body)?;
        let result_type = Type::arrow(s1.apply(&param_type), body_type);
        trace!(rule = "T-Abs", %expr, ty = %result_type);

        let tree = InferenceTree::new("T-Abs", &input, &result_type.to_string(), vec![tree1]);
        Ok((result_type, s1, tree))
    }

    // Γ ⊢ e₁ : τ₁    Γ ⊢ e₂ : τ₂    α fresh    S = unify(τ₁, τ₂ → α)
    // ────────────────────────────────────────────────────────────── (T-App)
    //                     Γ ⊢ e₁ e₂ : S(α)
    fn infer_app(
        &mut self,
        env: &Env,
        expr: &Expr,
        func: &Expr,
        arg: &Expr,
    ) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);

        let (func_type, s1, tree1) = self.infer_expr(env, func)?;
        let (arg_type, s2, tree2) = self.infer_expr(&env.apply_subst(&s1), arg)?;
        let result_type = self.fresh.fresh();

        let expected_func_type = Type::arrow(arg_type, result_type.clone());
        let (s3, tree3) = unify_traced(&s2.apply(&func_type), &expected_func_type)?;

        let final_subst = s3.compose(&s2.compose(&s1));
        let final_type = s3.apply(&result_type);
        trace!(rule = "T-App", %expr, ty = %final_type);

        let tree = InferenceTree::new(
            "T-App",
            &input,
            &final_type.to_string(),
            vec![tree1, tree2, tree3],
        );
        Ok((final_type, final_subst, tree))
    }

    // Γ ⊢ e₁ : τ₁    σ = gen(Γ, τ₁)    Γ, x : σ ⊢ e₂ : τ₂
    // ────────────────────────────────────────────────────── (T-Let)
    //          Γ ⊢ let x = e₁ in e₂ : τ₂
    fn infer_let(
        &mut self,
        env: &Env,
        expr: &Expr,
        var: &str,
        value: &Expr,
        body: &Expr,
    ) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);

        let (value_type, s1, tree1) = self.infer_expr(env, value)?;
        let generalized = env.apply_subst(&s1).generalize(&value_type);
        trace!(rule = "T-Let", var, scheme = %generalized);

        let new_env = env.remove(var).extend(var, generalized).apply_subst(&s1);
        let (body_type, s2, tree2) = self.infer_expr(&new_env, body)?;

        let final_subst = s2.compose(&s1);
        let tree = InferenceTree::new("T-Let", &input, &body_type.to_string(), vec![tree1, tree2]);
        Ok((body_type, final_subst, tree))
    }

    // ───────────────── (T-Int)
    //    Γ ⊢ n : Int
    fn infer_lit_int(env: &Env, expr: &Expr) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);
        let tree = InferenceTree::new("T-Int", &input, "Int", vec![]);
        Ok((Type::Int, Subst::empty(), tree))
    }

    // ────────────────── (T-Bool)
    //    Γ ⊢ b : Bool
    fn infer_lit_bool(env: &Env, expr: &Expr) -> Result<(Type, Subst, InferenceTree)> {
        let input = format!("{} ⊢ {} ⇒", env, expr);
        let tree = InferenceTree::new("T-Bool", &input, "Bool", vec![]);
        Ok((Type::Bool, Subst::empty(), tree))
    }
}

/// Infer `expr` in the empty environment.
pub fn infer(expr: &Expr) -> Result<(Type, Subst)> {
    TypeInference::new()
        .infer(&Env::empty(), expr)
        .inspect_err(|err| debug!(%expr, %err, "type inference failed"))
}

/// Infer `expr` in the empty environment and return only its type.
pub fn infer_type_only(expr: &Expr) -> Result<Type> {
    let (ty, subst) = infer(expr)?;
    Ok(subst.apply(&ty))
}

/// Infer `expr` in the empty environment and return the derivation.
pub fn run_inference(expr: &Expr) -> Result<InferenceTree> {
    TypeInference::new()
        .infer_traced(&Env::empty(), expr)
        .map(|(_, _, tree)| tree)
        .inspect_err(|err| debug!(%expr, %err, "type inference failed"))
}
