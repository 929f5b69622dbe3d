use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Reasoner, ReasoningError, ReasoningResult};
use crate::model::memory::{Axiom, MemoryDocument};
use crate::model::{EntityKind, OntologyDocument};

/// Which inferences are materialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerOptions {
    /// Transitive sub-class edges
    pub sub_classes: bool,
    /// Class assertions propagated to every superclass
    pub class_assertions: bool,
    /// Asserted property values carried through
    pub property_assertions: bool,
}

impl Default for ReasonerOptions {
    fn default() -> Self {
        Self {
            sub_classes: true,
            class_assertions: true,
            property_assertions: true,
        }
    }
}

impl ReasonerOptions {
    pub fn load(path: &Path) -> ReasoningResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReasoningError::Configuration(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| ReasoningError::Configuration(format!("{}: {e}", path.display())))
    }
}

/// Class-hierarchy reasoner over [`MemoryDocument`]s.
///
/// Computes the transitive closure of sub-class axioms and propagates class
/// membership upwards. The output holds only declarations and derived axioms.
#[derive(Debug, Default)]
pub struct HierarchyReasoner {
    options_path: Option<PathBuf>,
    options: Option<ReasonerOptions>,
    superclasses: BTreeMap<String, BTreeSet<String>>,
}

impl HierarchyReasoner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a JSON file during [`Reasoner::prepare`].
    #[must_use]
    pub fn with_options_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ReasonerOptions) -> Self {
        self.options = Some(options);
        self
    }

    fn ancestors(&self, class: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending = vec![class.to_string()];

        while let Some(current) = pending.pop() {
            let Some(direct) = self.superclasses.get(&current) else {
                continue;
            };
            for sup in direct {
                if sup != class && found.insert(sup.clone()) {
                    pending.push(sup.clone());
                }
            }
        }

        found
    }
}

impl Reasoner<MemoryDocument> for HierarchyReasoner {
    fn prepare(&mut self, document: &MemoryDocument) -> ReasoningResult<()> {
        if let Some(path) = &self.options_path {
            self.options = Some(ReasonerOptions::load(path)?);
        }

        self.superclasses.clear();
        for axiom in &document.axioms {
            if let Axiom::SubClassOf { sub, sup } = axiom {
                self.superclasses
                    .entry(sub.clone())
                    .or_default()
                    .insert(sup.clone());
            }
        }

        tracing::debug!(
            ontology = %document.id(),
            classes = self.superclasses.len(),
            "Prepared class hierarchy"
        );
        Ok(())
    }

    fn infer(&mut self, document: &MemoryDocument) -> ReasoningResult<MemoryDocument> {
        let options = self.options.clone().unwrap_or_default();
        let mut inferred = MemoryDocument::create(document.id().clone());

        for kind in [EntityKind::Class, EntityKind::NamedIndividual] {
            for entity in document.entities(kind) {
                inferred.add_axiom(Axiom::declaration(entity));
            }
        }

        if options.sub_classes {
            for class in document.entities(EntityKind::Class) {
                for sup in self.ancestors(&class.iri) {
                    inferred.add_axiom(Axiom::sub_class_of(class.iri.clone(), sup));
                }
            }
        }

        for axiom in &document.axioms {
            match axiom {
                Axiom::ClassAssertion { class, individual } if options.class_assertions => {
                    inferred.add_axiom(axiom.clone());
                    for sup in self.ancestors(class) {
                        inferred.add_axiom(Axiom::ClassAssertion {
                            class: sup,
                            individual: individual.clone(),
                        });
                    }
                }
                Axiom::ObjectPropertyAssertion { .. } | Axiom::DataPropertyAssertion { .. }
                    if options.property_assertions =>
                {
                    inferred.add_axiom(axiom.clone());
                }
                _ => {}
            }
        }

        Ok(inferred)
    }
}
