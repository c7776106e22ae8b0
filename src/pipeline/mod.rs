//! In-memory pipeline document and its YAML form

pub mod schema;

pub use schema::{
    Arch, Os, Pipeline, Platform, PluginStep, RunStep, Schema, Stage, Step, StepKind,
    DEFAULT_STAGE_NAME, SCHEMA_KIND, SCHEMA_VERSION,
};
