//! Plain Ruby projects driven by Rake

use super::rails::declares_rails;
use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;

const IMAGE: &str = "ruby";

pub struct RubyRule;

impl Rule for RubyRule {
    fn id(&self) -> RuleId {
        RuleId::Ruby
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !ctx.exists("Rakefile") {
            return Ok(Flow::skip());
        }

        // rails apps have Rakefiles too; the rails rule owns them
        if declares_rails(ctx) {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);
        let rakefile = ctx.read("Rakefile").unwrap_or_default();

        let mut steps = vec![Step::run(
            "bundle_install",
            "bundle install --local || bundle install",
            image,
        )];

        if rakefile.contains(":compile") {
            steps.push(Step::run("rake_compile", "bundle exec rake compile", image));
        }
        if rakefile.contains(":test") {
            steps.push(Step::run("rake_test", "bundle exec rake test", image));
        }
        if steps.len() == 1 {
            steps.push(Step::run("rake", "bundle exec rake", image));
        }

        Ok(Flow::Continue(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::rules::test_support::{apply, commands, names};
    use crate::rules::ExecutionRuntime;

    #[test]
    fn test_compile_and_test_tasks() {
        let fs = MockFileSystem::new()
            .with_file("Gemfile", "gem 'rake-compiler'\n")
            .with_file(
                "Rakefile",
                "require 'rake/extensiontask'\nRake::ExtensionTask.new('ext')\ntask :compile\ntask default: :test\n",
            );

        let flow = apply(&RubyRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["bundle_install", "rake_compile", "rake_test"]);
        assert_eq!(
            commands(&flow),
            vec![
                "bundle install --local || bundle install",
                "bundle exec rake compile",
                "bundle exec rake test"
            ]
        );
    }

    #[test]
    fn test_default_rake_task() {
        let fs = MockFileSystem::new().with_file("Rakefile", "task default: [:spec]\n");

        let flow = apply(&RubyRule, &fs, ExecutionRuntime::Host);
        assert_eq!(names(&flow), vec!["bundle_install", "rake"]);
        assert!(flow.steps().iter().all(|s| s.image().is_none()));
    }

    #[test]
    fn test_rails_gemfile_defers_to_rails_rule() {
        let fs = MockFileSystem::new()
            .with_file("Gemfile", "gem 'rails', '7.1.0'\n")
            .with_file("Rakefile", "Rails.application.load_tasks\ntask :test\n");

        assert_eq!(apply(&RubyRule, &fs, ExecutionRuntime::Docker), Flow::skip());
    }

    #[test]
    fn test_gemfile_without_rakefile() {
        let fs = MockFileSystem::new().with_file("Gemfile", "gem 'sinatra'\n");
        assert_eq!(apply(&RubyRule, &fs, ExecutionRuntime::Docker), Flow::skip());
    }
}
