//! @ai:module:intent Language identities declared by analysis callers
//! @ai:module:layer domain
//! @ai:module:public_api Language
//! @ai:module:stateless true

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// @ai:intent A declared source language, keyed by its case-sensitive display name
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    C,
    Cpp,
    CSharp,
    Java,
    JavaScript,
    TypeScript,
    CloudFormation,
    Terraform,
    Docker,
    Kubernetes,
    HelmCharts,
    Kotlin,
    Ruby,
    Go,
    Scala,
    Flex,
    Php,
    Html,
    Css,
    Xml,
    VbNet,
    Fortran,
    Ada,
    Assembly,
    Perl,
    Dafny,
    /// Any display name outside the recognized set; no analyzer applies
    Other(String),
}

impl Language {
    /// Every recognized variant, in declaration order.
    pub const KNOWN: [Language; 27] = [
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Java,
        Language::JavaScript,
        Language::TypeScript,
        Language::CloudFormation,
        Language::Terraform,
        Language::Docker,
        Language::Kubernetes,
        Language::HelmCharts,
        Language::Kotlin,
        Language::Ruby,
        Language::Go,
        Language::Scala,
        Language::Flex,
        Language::Php,
        Language::Html,
        Language::Css,
        Language::Xml,
        Language::VbNet,
        Language::Fortran,
        Language::Ada,
        Language::Assembly,
        Language::Perl,
        Language::Dafny,
    ];

    /// @ai:intent Parse a display name exactly as the caller declared it
    /// @ai:post unknown or differently-cased names yield Language::Other
    /// @ai:effects pure
    pub fn from_display_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|lang| lang.as_str() == name)
            .cloned()
            .unwrap_or_else(|| Language::Other(name.to_string()))
    }

    /// @ai:intent Canonical display name
    /// @ai:effects pure
    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "Python",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::CloudFormation => "CloudFormation",
            Language::Terraform => "Terraform",
            Language::Docker => "Docker",
            Language::Kubernetes => "Kubernetes",
            Language::HelmCharts => "Helm Charts",
            Language::Kotlin => "Kotlin",
            Language::Ruby => "Ruby",
            Language::Go => "Go",
            Language::Scala => "Scala",
            Language::Flex => "Flex",
            Language::Php => "PHP",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Xml => "XML",
            Language::VbNet => "VB.NET",
            Language::Fortran => "Fortran",
            Language::Ada => "Ada",
            Language::Assembly => "Assembly",
            Language::Perl => "Perl",
            Language::Dafny => "Dafny",
            Language::Other(name) => name,
        }
    }

    /// @ai:intent File extension used when materializing code of this language
    /// @ai:effects pure
    fn known_extension(&self) -> Option<&'static str> {
        let ext = match self {
            Language::Python => "py",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "cs",
            Language::Java => "java",
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::CloudFormation | Language::Kubernetes | Language::HelmCharts => "yaml",
            Language::Terraform => "tf",
            Language::Docker => "dockerfile",
            Language::Kotlin => "kotlin",
            Language::Ruby => "rb",
            Language::Go => "go",
            Language::Scala => "scala",
            Language::Flex => "mxml",
            Language::Php => "php",
            Language::Html => "html",
            Language::Css => "css",
            Language::Xml => "xml",
            Language::VbNet => "vb",
            Language::Fortran => "f90",
            Language::Ada => "adb",
            Language::Assembly => "asm",
            Language::Perl => "pl",
            Language::Dafny => "dfy",
            Language::Other(_) => return None,
        };

        Some(ext)
    }

    /// @ai:intent File extension for temp artifacts of this language
    /// @ai:post unmapped names fall back to the lowercased name, restricted to filename-safe characters
    /// @ai:effects pure
    pub fn extension(&self) -> String {
        if let Some(ext) = self.known_extension() {
            return ext.to_string();
        }

        let lowered = self.as_str().to_lowercase();

        // The extension table itself is case-insensitive ("python" -> "py").
        if let Some(ext) = Self::KNOWN
            .iter()
            .find(|lang| lang.as_str().to_lowercase() == lowered)
            .and_then(Language::known_extension)
        {
            return ext.to_string();
        }

        let sanitized: String = lowered
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
            .collect();

        if sanitized.is_empty() {
            "txt".to_string()
        } else {
            sanitized
        }
    }

    /// @ai:intent Whether the display name is in the recognized set
    /// @ai:effects pure
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Other(_))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Language::from_display_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_round_trip() {
        for lang in Language::KNOWN.iter() {
            assert_eq!(&Language::from_display_name(lang.as_str()), lang);
        }
    }

    #[test]
    fn test_parsing_is_case_sensitive() {
        assert_eq!(Language::from_display_name("C++"), Language::Cpp);
        assert_eq!(
            Language::from_display_name("python"),
            Language::Other("python".to_string())
        );
        assert!(!Language::from_display_name("Haskell").is_known());
    }

    #[test]
    fn test_language_extension() {
        assert_eq!(Language::Python.extension(), "py");
        assert_eq!(Language::Cpp.extension(), "cpp");
        assert_eq!(Language::C.extension(), "c");
        assert_eq!(Language::HelmCharts.extension(), "yaml");
        assert_eq!(Language::Kotlin.extension(), "kotlin");
    }

    #[test]
    fn test_unmapped_extension_falls_back_to_lowercased_name() {
        assert_eq!(Language::from_display_name("Haskell").extension(), "haskell");
        assert_eq!(Language::from_display_name("python").extension(), "py");
        assert_eq!(Language::from_display_name("../etc/x").extension(), "etcx");
        assert_eq!(Language::from_display_name("/").extension(), "txt");
    }
}
