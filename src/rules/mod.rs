//! Detection rules.
//!
//! A rule recognizes one ecosystem's marker files and answers with the steps
//! that ecosystem needs. Rules are pure over the workspace: they read through
//! [`RuleContext`] and return a [`Flow`], and the [`crate::Builder`] is the only
//! thing that touches the pipeline.
//!
//! # Example
//!
//! ```no_run
//! use autopipe::rules::{Flow, Rule, RuleContext, RuleId, RuleResult};
//! use autopipe::pipeline::Step;
//!
//! struct MakeRule;
//!
//! impl Rule for MakeRule {
//!     fn id(&self) -> RuleId {
//!         RuleId::Custom("make".to_string())
//!     }
//!
//!     fn apply(&self, ctx: &RuleContext) -> RuleResult {
//!         if !ctx.exists("Makefile") {
//!             return Ok(Flow::skip());
//!         }
//!         Ok(Flow::Continue(vec![Step::run("make", "make", ctx.image("gcc"))]))
//!     }
//! }
//! ```

#[macro_use]
pub mod id_enum_macro;

pub mod context;
pub mod docker;
pub mod go;
pub mod node;
pub mod python;
pub mod rails;
pub mod registry;
pub mod ruby;
pub mod rule_id;
pub mod rust;
pub mod swift;

pub use context::{ExecutionRuntime, RuleContext};
pub use docker::DockerRule;
pub use go::GoRule;
pub use node::NodeRule;
pub use python::PythonRule;
pub use rails::RailsRule;
pub use registry::RuleSet;
pub use ruby::RubyRule;
pub use rule_id::RuleId;
pub use rust::RustRule;
pub use swift::SwiftRule;

use crate::pipeline::Step;

/// What a rule asks the builder to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Append these steps and run the next rule.
    Continue(Vec<Step>),
    /// Append these steps and stop the chain.
    Stop(Vec<Step>),
}

impl Flow {
    /// Nothing recognized; move on.
    pub fn skip() -> Self {
        Flow::Continue(Vec::new())
    }

    pub fn steps(&self) -> &[Step] {
        match self {
            Flow::Continue(steps) | Flow::Stop(steps) => steps,
        }
    }

    pub fn into_steps(self) -> Vec<Step> {
        match self {
            Flow::Continue(steps) | Flow::Stop(steps) => steps,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Flow::Stop(_))
    }
}

/// `Err` is reserved for unexpected failures; the builder logs and drops it.
pub type RuleResult = anyhow::Result<Flow>;

pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn apply(&self, ctx: &RuleContext) -> RuleResult;
}
