crate::define_id_enum! {
    /// Ecosystem a plan was built for
    Language {
        Node => "node" | "nodejs" | "javascript",
        Python => "python",
        Go => "go" | "golang",
        Rust => "rust",
        Static => "static",
    }
}
