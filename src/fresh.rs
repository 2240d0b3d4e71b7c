use std::collections::HashSet;

use crate::ast::{TyVar, Type};

/// Generator of type variable names, unique for the lifetime of the value.
///
/// Each inference run owns its own generator, so independent runs never
/// share a counter.
#[derive(Debug, Clone)]
pub struct FreshVars {
    prefix: String,
    counter: usize,
    reserved: HashSet<TyVar>,
}

impl FreshVars {
    pub fn new() -> Self {
        Self::with_prefix("t")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: 0,
            reserved: HashSet::new(),
        }
    }

    /// Generator whose first name is `t{start}`.
    pub fn starting_at(start: usize) -> Self {
        Self {
            counter: start,
            ..Self::new()
        }
    }

    /// Never hand out any of `names`.
    pub fn reserve(&mut self, names: impl IntoIterator<Item = TyVar>) {
        self.reserved.extend(names);
    }

    pub fn fresh_tyvar(&mut self) -> TyVar {
        loop {
            let var = format!("{}{}", self.prefix, self.counter);
            self.counter += 1;
            if !self.reserved.contains(&var) {
                return var;
            }
        }
    }

    pub fn fresh(&mut self) -> Type {
        Type::Var(self.fresh_tyvar())
    }

    /// Number of candidate names consumed so far, reserved ones included.
    pub fn issued(&self) -> usize {
        self.counter
    }
}

impl Default for FreshVars {
    fn default() -> Self {
        Self::new()
    }
}
