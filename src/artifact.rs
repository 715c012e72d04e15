use serde::{Deserialize, Serialize};

/// Extension of every generated component file.
pub const ARTIFACT_EXTENSION: &str = "tsx";

/// Used when a node has no catalogue name, or its name has no usable characters.
pub const FALLBACK_COMPONENT_NAME: &str = "Component";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// File name, e.g. `PrimaryButton.tsx`
    pub name: String,
    pub code: String,
}

/// `"primary cta - large"` becomes `"PrimaryCtaLarge"`.
///
/// Runs of non-alphanumeric characters separate words; each word is
/// capitalized and the rest lowercased.
pub fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = first.to_ascii_uppercase().to_string();
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// File name for a component: PascalCase name plus [`ARTIFACT_EXTENSION`].
pub fn component_file_name(component_name: &str) -> String {
    let stem = pascal_case(component_name);
    let stem = if stem.is_empty() {
        FALLBACK_COMPONENT_NAME.to_string()
    } else {
        stem
    };
    format!("{stem}.{ARTIFACT_EXTENSION}")
}

/// `file_name` if no artifact in `taken` uses it yet, otherwise the first free
/// `<stem>_<n>.tsx` counting from 2.
pub fn unique_file_name(file_name: String, taken: &[GeneratedArtifact]) -> String {
    let in_use = |candidate: &str| taken.iter().any(|artifact| artifact.name == candidate);
    if !in_use(&file_name) {
        return file_name;
    }
    let suffix = format!(".{ARTIFACT_EXTENSION}");
    let stem = file_name.strip_suffix(&suffix).unwrap_or(file_name.as_str());
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}{suffix}");
        if !in_use(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_spaced_and_dashed_names() {
        assert_eq!(component_file_name("primary cta - large"), "PrimaryCtaLarge.tsx");
    }

    #[test]
    fn lowercases_word_tails() {
        assert_eq!(pascal_case("NAV_BAR/Mobile"), "NavBarMobile");
        assert_eq!(pascal_case("iPhone 15 frame"), "Iphone15Frame");
    }

    #[test]
    fn symbol_only_names_fall_back() {
        assert_eq!(component_file_name("✨ --- ✨"), "Component.tsx");
        assert_eq!(component_file_name(""), "Component.tsx");
    }

    #[test]
    fn repeated_names_get_numbered_suffixes() {
        let taken = vec![
            GeneratedArtifact {
                name: "Frame1.tsx".into(),
                code: String::new(),
            },
            GeneratedArtifact {
                name: "Frame1_2.tsx".into(),
                code: String::new(),
            },
        ];
        assert_eq!(unique_file_name("Card.tsx".into(), &taken), "Card.tsx");
        assert_eq!(unique_file_name("Frame1.tsx".into(), &taken[..1]), "Frame1_2.tsx");
        assert_eq!(unique_file_name("Frame1.tsx".into(), &taken), "Frame1_3.tsx");
    }

    #[test]
    fn non_ascii_letters_split_words() {
        assert_eq!(pascal_case("café menu"), "CafMenu");
    }
}
