crate::define_id_enum! {
    /// Identifier of a detection rule, in default chain order
    RuleId {
        Go => "go" : "Go" | "golang",
        Node => "node" : "Node.js" | "npm" | "nodejs",
        Python => "python" : "Python" | "pip",
        Rails => "rails" : "Ruby on Rails",
        Ruby => "ruby" : "Ruby" | "rake",
        Rust => "rust" : "Rust" | "cargo",
        Swift => "swift" : "Swift",
        Docker => "docker" : "Docker" | "dockerfile",
    }
}
