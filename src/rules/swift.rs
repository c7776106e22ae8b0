//! Swift packages

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;

const IMAGE: &str = "swift:5";

pub struct SwiftRule;

impl Rule for SwiftRule {
    fn id(&self) -> RuleId {
        RuleId::Swift
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !ctx.exists("Package.swift") {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);
        let mut steps = vec![Step::run("swift_build", "swift build", image)];

        if ctx.is_dir("Tests") {
            steps.push(Step::run("swift_test", "swift test", image));
        }

        Ok(Flow::Continue(steps))
    }
}
