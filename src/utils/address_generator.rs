//! Disposable address generation.

use std::path::Path;

use anyhow::Context;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of the random local part used when no name lists are loaded.
const RANDOM_LOCAL_PART_LENGTH: usize = 12;

/// Generates fresh addresses under the configured mail domain.
///
/// With both name lists loaded the local part reads like a person's name,
/// `<first><surname><0..999>`. Otherwise a random lowercase alphanumeric
/// local part is used.
#[derive(Debug, Clone, Default)]
pub struct AddressGenerator {
    first_names: Vec<String>,
    surnames: Vec<String>,
}

impl AddressGenerator {
    pub fn new(first_names: Vec<String>, surnames: Vec<String>) -> Self {
        Self {
            first_names: normalize_names(first_names),
            surnames: normalize_names(surnames),
        }
    }

    /// Loads one-name-per-line lists from disk.
    pub fn from_files(first_names: &Path, surnames: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(load_names(first_names)?, load_names(surnames)?))
    }

    pub fn uses_names(&self) -> bool {
        !self.first_names.is_empty() && !self.surnames.is_empty()
    }

    pub fn generate(&self, domain: &str) -> String {
        let mut rng = rand::rng();

        let local = if self.uses_names() {
            let first = &self.first_names[rng.random_range(0..self.first_names.len())];
            let last = &self.surnames[rng.random_range(0..self.surnames.len())];
            format!("{first}{last}{}", rng.random_range(0..1000))
        } else {
            (&mut rng)
                .sample_iter(Alphanumeric)
                .take(RANDOM_LOCAL_PART_LENGTH)
                .map(|b| (b as char).to_ascii_lowercase())
                .collect()
        };

        format!("{local}@{domain}")
    }
}

fn normalize_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

fn load_names(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read name list {}", path.display()))?;
    Ok(contents.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_local_part() {
        let generator = AddressGenerator::default();
        let email = generator.generate("mail.example.org");

        let (local, domain) = email.split_once('@').unwrap();
        assert_eq!(domain, "mail.example.org");
        assert_eq!(local.len(), RANDOM_LOCAL_PART_LENGTH);
        assert!(
            local
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_name_based_local_part() {
        let generator = AddressGenerator::new(
            vec!["  Mary ".to_string(), String::new()],
            vec!["SMITH".to_string()],
        );
        assert!(generator.uses_names());

        let email = generator.generate("m.test");
        let local = email.strip_suffix("@m.test").unwrap();
        let number = local.strip_prefix("marysmith").unwrap();
        let n: u32 = number.parse().unwrap();
        assert!(n < 1000);
    }

    #[test]
    fn test_one_empty_list_falls_back_to_random() {
        let generator = AddressGenerator::new(vec!["mary".to_string()], vec![]);
        assert!(!generator.uses_names());
    }

    #[test]
    fn test_generated_addresses_differ() {
        let generator = AddressGenerator::default();
        assert_ne!(generator.generate("d"), generator.generate("d"));
    }
}
