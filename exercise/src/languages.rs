use serde::{Deserialize, Serialize};

/// Languages the exercise runtime understands, with cleaner Rust-y names.
/// Serialized/deserialized in `lowercase` for policy and wire JSON.
/// Common aliases are accepted (e.g., "c++", "js", "c#").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    #[serde(alias = "golang")]
    Go,
    C,
    #[serde(alias = "cc", alias = "c++")]
    Cpp,
    Java,
    Python,
    #[serde(alias = "js", alias = "node")]
    JavaScript,
    #[serde(alias = "ts")]
    TypeScript,
    #[serde(alias = "c#")]
    CSharp,
    Kotlin,
    Ruby,
    Php,
}

impl Language {
    /// Canonical lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Go => "go",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::CSharp => "csharp",
            Language::Kotlin => "kotlin",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    /// e.g., "main.rs", "Main.java", ...
    pub fn main_filename(self) -> &'static str {
        match self {
            Language::Rust => "main.rs",
            Language::Go => "main.go",
            Language::C => "main.c",
            Language::Cpp => "Main.cpp",
            Language::Java => "Main.java",
            Language::Python => "main.py",
            Language::JavaScript => "main.js",
            Language::TypeScript => "main.ts",
            Language::CSharp => "Program.cs",
            Language::Kotlin => "Main.kt",
            Language::Ruby => "main.rb",
            Language::Php => "main.php",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
