//! Mapping from internal [`Language`] identifiers to the execution service's
//! language/version pairs.
//!
//! Languages the service has no runtime for fail closed with
//! [`UnsupportedLanguage`] rather than silently defaulting to some runtime
//! that would produce confusing output.

use exercise::Language;

/// The exact language/version pair the execution service expects, plus the
/// filename the source is submitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionTarget {
    pub language: &'static str,
    pub version: &'static str,
    pub filename: &'static str,
}

/// Raised when no service mapping exists for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub Language);

impl std::fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No execution target for language '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedLanguage {}

/// Resolve the service-side target for `language`.
///
/// Kotlin and PHP are accepted by the authoring UI but have no runtime on the
/// execution service yet, so they map to an error here.
pub fn execution_target(language: Language) -> Result<ExecutionTarget, UnsupportedLanguage> {
    let (name, version) = match language {
        Language::Rust => ("rust", "1.68.2"),
        Language::Go => ("go", "1.16.2"),
        Language::C => ("c", "10.2.0"),
        Language::Cpp => ("c++", "10.2.0"),
        Language::Java => ("java", "15.0.2"),
        Language::Python => ("python", "3.10.0"),
        Language::JavaScript => ("javascript", "18.15.0"),
        Language::TypeScript => ("typescript", "5.0.3"),
        Language::CSharp => ("csharp", "6.12.0"),
        Language::Ruby => ("ruby", "3.0.1"),
        Language::Kotlin | Language::Php => return Err(UnsupportedLanguage(language)),
    };

    Ok(ExecutionTarget {
        language: name,
        version,
        filename: language.main_filename(),
    })
}
