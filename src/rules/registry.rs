use super::{
    DockerRule, GoRule, NodeRule, PythonRule, RailsRule, Rule, RuleId, RubyRule, RustRule,
    SwiftRule,
};
use crate::error::GenerateError;
use std::sync::Arc;

/// Ordered list of rules handed to the builder.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every built-in rule in [`RuleId::all_variants`] order.
    pub fn with_defaults() -> Self {
        let mut set = Self::new();
        for id in RuleId::all_variants() {
            if let Some(rule) = Self::builtin(id) {
                set.rules.push(rule);
            }
        }
        set
    }

    /// Built-in rules in the order given. Unknown names are an error.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, GenerateError> {
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref();
            let rule = RuleId::from_name(name)
                .and_then(|id| Self::builtin(&id))
                .ok_or_else(|| GenerateError::UnknownRule(name.to_string()))?;
            set.rules.push(rule);
        }
        Ok(set)
    }

    pub fn builtin(id: &RuleId) -> Option<Arc<dyn Rule>> {
        let rule: Arc<dyn Rule> = match id {
            RuleId::Go => Arc::new(GoRule),
            RuleId::Node => Arc::new(NodeRule),
            RuleId::Python => Arc::new(PythonRule),
            RuleId::Rails => Arc::new(RailsRule),
            RuleId::Ruby => Arc::new(RubyRule),
            RuleId::Rust => Arc::new(RustRule),
            RuleId::Swift => Arc::new(SwiftRule),
            RuleId::Docker => Arc::new(DockerRule),
            RuleId::Custom(_) => return None,
        };
        Some(rule)
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn push(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
