//! Cargo packages and workspaces

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;

const IMAGE: &str = "rust:1";

pub struct RustRule;

impl RustRule {
    /// A malformed manifest is treated as a single package.
    fn is_workspace(ctx: &RuleContext) -> bool {
        ctx.read_toml::<toml::Value>("Cargo.toml")
            .map(|manifest| manifest.get("workspace").is_some())
            .unwrap_or(false)
    }
}

impl Rule for RustRule {
    fn id(&self) -> RuleId {
        RuleId::Rust
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !ctx.exists("Cargo.toml") {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);
        let scope = if Self::is_workspace(ctx) {
            " --workspace"
        } else {
            ""
        };

        let mut steps = vec![
            Step::run("cargo_build", format!("cargo build{}", scope), image),
            Step::run("cargo_test", format!("cargo test{}", scope), image),
        ];

        if ctx.exists("clippy.toml") || ctx.exists(".clippy.toml") {
            steps.push(Step::run(
                "cargo_clippy",
                format!("cargo clippy{} -- -D warnings", scope),
                image,
            ));
        }

        Ok(Flow::Continue(steps))
    }
}
