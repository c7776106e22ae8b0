//! Go modules

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;

const IMAGE: &str = "golang:1";

pub struct GoRule;

impl Rule for GoRule {
    fn id(&self) -> RuleId {
        RuleId::Go
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !ctx.exists("go.mod") {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);

        // a root main package builds a binary; anything else is a set of packages
        let build = if ctx.exists("main.go") {
            "go build"
        } else {
            "go install ./..."
        };

        Ok(Flow::Continue(vec![
            Step::run("go_build", build, image),
            Step::run("go_test", "go test -v ./...", image),
        ]))
    }
}
