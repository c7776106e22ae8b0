//! Ruby on Rails applications

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;
use regex::Regex;
use std::sync::OnceLock;

const IMAGE: &str = "ruby";

fn rails_gem_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*gem\s+['"]rails['"]"#).unwrap())
}

/// True when the Gemfile declares the `rails` gem.
pub(super) fn declares_rails(ctx: &RuleContext) -> bool {
    ctx.read("Gemfile")
        .map(|gemfile| rails_gem_pattern().is_match(&gemfile))
        .unwrap_or(false)
}

pub struct RailsRule;

impl Rule for RailsRule {
    fn id(&self) -> RuleId {
        RuleId::Rails
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !declares_rails(ctx) {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);

        Ok(Flow::Continue(vec![
            Step::run("bundle_install", "bundle install --jobs=3 --retry=3", image),
            Step::run("bundle_db_create", "bundle exec rake db:create", image),
            Step::run("bundle_db_migrate", "bundle exec rake db:migrate", image),
            Step::run("bundle_rspec", "bundle exec rspec", image),
        ]))
    }
}
