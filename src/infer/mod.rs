//! Module inference
//!
//! Folds page sections into a two-level hierarchy:
//! - level 1–2 sections become modules, keyed by exact title
//! - level 3–4 sections become submodules of the closest preceding level 1–2
//!   section on the same page, or of the `General` module
//! - deeper levels are ignored
//!
//! Repeat sightings never shorten a description and never lower a confidence.

mod summarize;

pub use summarize::{score_description, summarize, SHORT_CONFIDENCE, SUMMARY_BUDGET};

use crate::extract::{PageContent, Section};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Name of the catch-all module for orphaned submodules
pub const GENERAL_MODULE: &str = "General";

const GENERAL_DESCRIPTION: &str = "General documentation topics";
const GENERAL_CONFIDENCE: f64 = 0.5;

/// Confidence of a module whose body yields no summary
const BARE_MODULE_CONFIDENCE: f64 = 0.45;

/// Confidence of a submodule whose body yields no summary
const BARE_SUBMODULE_CONFIDENCE: f64 = 0.4;

/// An inferred module with its submodules
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub description: String,
    pub confidence: f64,
    /// Submodule name → description, in first-seen order
    pub submodules: IndexMap<String, String>,
}

impl Module {
    fn new(name: &str, description: String, confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            description,
            confidence,
            submodules: IndexMap::new(),
        }
    }
}

/// Summary of `body` and its confidence, with the fallback when nothing survives
fn describe(body: &str, bare_confidence: f64) -> (String, f64) {
    let summary = summarize(body);
    if summary.is_empty() {
        (summary, bare_confidence)
    } else {
        let confidence = score_description(&summary);
        (summary, confidence)
    }
}

/// Accumulates modules across pages in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Folds one page's sections into the set
    pub fn observe_page(&mut self, sections: &[Section]) {
        // Index of the most recent level 1-2 section's module on this page
        let mut current: Option<usize> = None;

        for section in sections {
            let title = section.title.trim();
            let body = section.body.trim();

            match section.level {
                0..=2 => {
                    current = if title.is_empty() {
                        None
                    } else {
                        Some(self.observe_module(title, body))
                    };
                }
                3..=4 if !title.is_empty() => {
                    let parent = match current {
                        Some(parent) => parent,
                        None => self.general(),
                    };
                    self.observe_submodule(parent, title, body);
                }
                _ => {}
            }
        }
    }

    fn observe_module(&mut self, title: &str, body: &str) -> usize {
        let (summary, confidence) = describe(body, BARE_MODULE_CONFIDENCE);

        match self.index.get(title) {
            Some(&i) => {
                let module = &mut self.modules[i];
                if summary.chars().count() > module.description.chars().count() {
                    module.description = summary;
                }
                module.confidence = module.confidence.max(confidence);
                i
            }
            None => {
                let description = if summary.is_empty() {
                    title.to_string()
                } else {
                    summary
                };
                self.insert(Module::new(title, description, confidence))
            }
        }
    }

    fn observe_submodule(&mut self, parent: usize, title: &str, body: &str) {
        let (summary, confidence) = describe(body, BARE_SUBMODULE_CONFIDENCE);
        let module = &mut self.modules[parent];

        match module.submodules.get_mut(title) {
            Some(existing) => {
                if summary.chars().count() > existing.chars().count() {
                    *existing = summary;
                }
            }
            None => {
                let description = if summary.is_empty() {
                    title.to_string()
                } else {
                    summary
                };
                module.submodules.insert(title.to_string(), description);
            }
        }
        module.confidence = module.confidence.max(confidence);
    }

    fn general(&mut self) -> usize {
        match self.index.get(GENERAL_MODULE) {
            Some(&i) => i,
            None => self.insert(Module::new(
                GENERAL_MODULE,
                GENERAL_DESCRIPTION.to_string(),
                GENERAL_CONFIDENCE,
            )),
        }
    }

    fn insert(&mut self, module: Module) -> usize {
        let i = self.modules.len();
        self.index.insert(module.name.clone(), i);
        self.modules.push(module);
        i
    }

    /// Finishes the set, filling any empty description with the module name
    pub fn into_modules(self) -> Vec<Module> {
        self.modules
            .into_iter()
            .map(|mut module| {
                if module.description.is_empty() {
                    module.description = module.name.clone();
                }
                module
            })
            .collect()
    }
}

/// Infers the module hierarchy from extracted pages, in page order
pub fn infer_structure(pages: &[PageContent]) -> Vec<Module> {
    let mut set = ModuleSet::new();
    for page in pages {
        set.observe_page(&page.sections);
    }
    tracing::debug!("Inferred {} modules from {} pages", set.len(), pages.len());
    set.into_modules()
}
