//! Known technology names and their aliases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One canonical technology name with its alternate spellings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Technology {
    /// Canonical display name (e.g. "Node.js")
    pub name: String,

    /// Alternate spellings that resolve to `name`
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Technology {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Canonical name followed by every alias.
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// The configured tech-name vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vocabulary {
    #[serde(default = "defaults::technologies")]
    pub technologies: Vec<Technology>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            technologies: defaults::technologies(),
        }
    }
}

impl Vocabulary {
    pub fn new(technologies: Vec<Technology>) -> Self {
        Self { technologies }
    }

    /// Case-fold, trim and collapse inner whitespace.
    pub fn normalize(name: &str) -> String {
        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Every normalized surface form mapped to its normalized canonical name.
    pub fn alias_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for tech in &self.technologies {
            let canonical = Self::normalize(&tech.name);
            for form in tech.surface_forms() {
                map.entry(Self::normalize(form))
                    .or_insert_with(|| canonical.clone());
            }
        }
        map
    }

    /// Resolve a name or alias to its normalized canonical name.
    pub fn canonical(&self, name: &str) -> Option<String> {
        let needle = Self::normalize(name);
        self.technologies
            .iter()
            .find(|tech| tech.surface_forms().any(|f| Self::normalize(f) == needle))
            .map(|tech| Self::normalize(&tech.name))
    }

    /// Surface forms that span several words, split into normalized words.
    pub fn multi_word_forms(&self) -> Vec<Vec<String>> {
        self.technologies
            .iter()
            .flat_map(|tech| tech.surface_forms())
            .map(Self::normalize)
            .filter(|form| form.contains(' '))
            .map(|form| form.split(' ').map(String::from).collect())
            .collect()
    }

    /// Validate names for emptiness and collisions.
    pub fn validate(&self) -> Result<()> {
        if self.technologies.is_empty() {
            return Err(AppError::validation("vocabulary.technologies is empty"));
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for tech in &self.technologies {
            for form in tech.surface_forms() {
                let normalized = Self::normalize(form);
                if normalized.is_empty() {
                    return Err(AppError::validation(format!(
                        "technology '{}' has an empty name or alias",
                        tech.name
                    )));
                }
                if let Some(owner) = seen.insert(normalized, &tech.name) {
                    return Err(AppError::validation(format!(
                        "'{}' is declared by both '{}' and '{}'",
                        form, owner, tech.name
                    )));
                }
            }
        }
        Ok(())
    }
}

mod defaults {
    use super::Technology;

    pub fn technologies() -> Vec<Technology> {
        vec![
            // Languages
            Technology::new("Python", &[]),
            Technology::new("JavaScript", &["JS", "ECMAScript"]),
            Technology::new("TypeScript", &["TS"]),
            Technology::new("Java", &[]),
            Technology::new("Kotlin", &[]),
            Technology::new("Scala", &[]),
            Technology::new("Go", &["Golang"]),
            Technology::new("Rust", &[]),
            Technology::new("C", &[]),
            Technology::new("C++", &["CPP"]),
            Technology::new("C#", &["CSharp"]),
            Technology::new(".NET", &["dotnet"]),
            Technology::new("Ruby", &[]),
            Technology::new("PHP", &[]),
            Technology::new("Elixir", &[]),
            Technology::new("Erlang", &[]),
            Technology::new("Haskell", &[]),
            Technology::new("OCaml", &[]),
            Technology::new("Clojure", &[]),
            Technology::new("Swift", &[]),
            Technology::new("Objective-C", &["ObjC"]),
            Technology::new("Dart", &[]),
            Technology::new("SQL", &[]),
            // Frameworks and runtimes
            Technology::new("Node.js", &["Node", "NodeJS"]),
            Technology::new("React", &["React.js", "ReactJS"]),
            Technology::new("React Native", &[]),
            Technology::new("Angular", &["AngularJS"]),
            Technology::new("Vue", &["Vue.js", "VueJS"]),
            Technology::new("Svelte", &[]),
            Technology::new("Next.js", &["NextJS"]),
            Technology::new("Ruby on Rails", &["Rails", "RoR"]),
            Technology::new("Django", &[]),
            Technology::new("Flask", &[]),
            Technology::new("FastAPI", &[]),
            Technology::new("Spring", &["Spring Boot"]),
            Technology::new("Flutter", &[]),
            Technology::new("GraphQL", &[]),
            // Data and infrastructure
            Technology::new("PostgreSQL", &["Postgres"]),
            Technology::new("MySQL", &[]),
            Technology::new("MongoDB", &["Mongo"]),
            Technology::new("Redis", &[]),
            Technology::new("Kafka", &[]),
            Technology::new("Elasticsearch", &[]),
            Technology::new("Spark", &[]),
            Technology::new("Snowflake", &[]),
            Technology::new("Kubernetes", &["K8s"]),
            Technology::new("Docker", &[]),
            Technology::new("Terraform", &[]),
            Technology::new("AWS", &[]),
            Technology::new("GCP", &["Google Cloud"]),
            Technology::new("Azure", &[]),
            // Machine learning
            Technology::new("Machine Learning", &["ML"]),
            Technology::new("PyTorch", &[]),
            Technology::new("TensorFlow", &[]),
        ]
    }
}
