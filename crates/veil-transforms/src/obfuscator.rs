//! Run driver.
//!
//! An [`Obfuscator`] owns the options, the compiled reserved names and the
//! run's random source. [`Obfuscator::obfuscate`] does one run:
//!
//! 1. seed the support artifacts the options ask for, each under a freshly
//!    generated identifier;
//! 2. walk the tree once, pre-order, handing every node to each strategy
//!    that applies to its kind, in registration order;
//! 3. return the populated registry for the printer.
//!
//! Strategies never create artifacts themselves, so an artifact missing at
//! step 2 is a wiring bug and aborts the run.

use crate::error::{ObfuscationError, Result};
use crate::random::RandomSource;
use crate::registry::{ArtifactKey, ArtifactRegistry, CallsWrapper, Snippet, StringTable, SupportArtifact};
use crate::renaming::ReservedNames;
use crate::templates::{self, CONSOLE_OUTPUT_DISABLE_FUNCTION_NAME, DEBUG_PROTECTION_FUNCTION_NAME};
use crate::transform::{NodeTransform, TransformContext};
use crate::transforms::default_transforms;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::cell::RefCell;
use std::ops::Range;
use veil_ast::{ParentRef, SyntaxNode, VisitMut, walk_mut};
use veil_common::ObfuscatorOptions;

/// Rotation applied to the emitted string table.
const TABLE_ROTATION_RANGE: Range<u64> = 100..500;

#[derive(Debug)]
pub struct Obfuscator {
    options: ObfuscatorOptions,
    reserved: ReservedNames,
    random: RefCell<RandomSource>,
}

impl Obfuscator {
    /// Options are used as given; call [`ObfuscatorOptions::normalize`] first
    /// to apply the usual consistency rules.
    pub fn new(options: ObfuscatorOptions) -> Result<Self> {
        let reserved = ReservedNames::new(options.reserved_names.as_slice())?;
        Ok(Obfuscator {
            options,
            reserved,
            random: RefCell::new(RandomSource::from_entropy()),
        })
    }

    /// Make every run of this obfuscator reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_random(RandomSource::seeded(seed))
    }

    pub fn with_random(mut self, random: RandomSource) -> Self {
        self.random = RefCell::new(random);
        self
    }

    pub fn options(&self) -> &ObfuscatorOptions {
        &self.options
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn obfuscate(&self, program: &mut SyntaxNode) -> Result<ObfuscationOutput> {
        let registry = RefCell::new(self.seed_artifacts());

        let stats = {
            let ctx = TransformContext::new(&self.options, &registry, &self.random, &self.reserved);
            let transforms = default_transforms(ctx);
            let mut dispatcher = Dispatcher {
                transforms: &transforms,
                stats: RunStats::default(),
            };
            walk_mut(program, None, &mut dispatcher)?;
            dispatcher.stats
        };

        let registry = registry.into_inner();
        tracing::info!(
            visited = stats.visited,
            transformed = stats.transformed,
            artifacts = registry.len(),
            "obfuscation finished"
        );
        Ok(ObfuscationOutput::new(registry, stats))
    }

    fn seed_artifacts(&self) -> ArtifactRegistry {
        let options = &self.options;
        let mut guard = self.random.borrow_mut();
        let random: &mut RandomSource = &mut guard;
        let mut taken = FxHashSet::default();
        let mut registry = ArtifactRegistry::new();

        if options.unicode_array {
            let table_name = fresh_name(random, &mut taken);
            let mut table = StringTable::new(table_name.clone());
            if options.rotate_unicode_array {
                table = table.with_rotation(random.range(TABLE_ROTATION_RANGE));
            }
            seed(&mut registry, ArtifactKey::UnicodeArray, SupportArtifact::StringTable(table));

            if options.wrap_unicode_array_calls {
                let wrapper = CallsWrapper::new(
                    fresh_name(random, &mut taken),
                    table_name,
                    options.encode_unicode_literals,
                );
                seed(
                    &mut registry,
                    ArtifactKey::UnicodeArrayCallsWrapper,
                    SupportArtifact::CallsWrapper(wrapper),
                );
            }
        }

        if options.disable_console_output {
            let name = fresh_name(random, &mut taken);
            let code = templates::fill_template(
                &templates::console_output_disable_template(),
                &[(CONSOLE_OUTPUT_DISABLE_FUNCTION_NAME, name.as_str())],
            );
            seed(
                &mut registry,
                ArtifactKey::ConsoleOutputDisable,
                SupportArtifact::Snippet(Snippet::new(name, code)),
            );
        }

        if options.debug_protection {
            let name = fresh_name(random, &mut taken);
            let fill = |template: String| {
                templates::fill_template(&template, &[(DEBUG_PROTECTION_FUNCTION_NAME, name.as_str())])
            };
            let function = fill(templates::debug_protection_function_template());
            let call = fill(templates::debug_protection_function_call_template());
            let interval = options
                .debug_protection_interval
                .then(|| fill(templates::debug_protection_function_interval_template()));

            seed(
                &mut registry,
                ArtifactKey::DebugProtectionFunction,
                SupportArtifact::Snippet(Snippet::new(name.clone(), function)),
            );
            seed(
                &mut registry,
                ArtifactKey::DebugProtectionFunctionCall,
                SupportArtifact::Snippet(Snippet::new(name.clone(), call)),
            );
            if let Some(interval) = interval {
                seed(
                    &mut registry,
                    ArtifactKey::DebugProtectionFunctionInterval,
                    SupportArtifact::Snippet(Snippet::new(name, interval)),
                );
            }
        }

        registry
    }
}

/// A generated identifier no other artifact of this run uses.
fn fresh_name(random: &mut RandomSource, taken: &mut FxHashSet<String>) -> String {
    loop {
        let name = random.identifier_name();
        if taken.insert(name.clone()) {
            return name;
        }
    }
}

fn seed(registry: &mut ArtifactRegistry, key: ArtifactKey, artifact: SupportArtifact) {
    tracing::debug!(%key, identifier = artifact.identifier(), "seeded support artifact");
    registry.insert(key, artifact);
}

// =============================================================================
// Dispatch
// =============================================================================

/// Counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Nodes the walker entered.
    pub visited: usize,
    /// Strategy invocations.
    pub transformed: usize,
}

struct Dispatcher<'t, 'a> {
    transforms: &'t [Box<dyn NodeTransform + 'a>],
    stats: RunStats,
}

impl VisitMut for Dispatcher<'_, '_> {
    type Error = ObfuscationError;

    fn enter(&mut self, node: &mut SyntaxNode, parent: Option<ParentRef>) -> Result<()> {
        self.stats.visited += 1;
        let kind = node.kind();
        for transform in self.transforms.iter().filter(|t| t.applies_to(kind)) {
            tracing::trace!(transform = transform.name(), %kind, "dispatch");
            transform.transform(node, parent)?;
            self.stats.transformed += 1;
        }
        Ok(())
    }
}

// =============================================================================
// Output
// =============================================================================

/// Result of one run: the populated registry and what the printer needs
/// from it.
#[derive(Debug, Clone, Serialize)]
pub struct ObfuscationOutput {
    artifacts: Vec<RenderedArtifact>,
    stats: RunStats,
    #[serde(skip)]
    registry: ArtifactRegistry,
}

/// One support artifact as handed to the printer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedArtifact {
    pub key: ArtifactKey,
    pub identifier: String,
    /// String table entries in index order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<String>>,
    /// Declaration code to emit ahead of the program.
    pub code: String,
}

impl ObfuscationOutput {
    fn new(registry: ArtifactRegistry, stats: RunStats) -> Self {
        let artifacts = registry
            .iter()
            .map(|(key, artifact)| RenderedArtifact {
                key,
                identifier: artifact.identifier().to_string(),
                entries: match artifact {
                    SupportArtifact::StringTable(table) => Some(table.entries().to_vec()),
                    _ => None,
                },
                code: artifact.render(),
            })
            .collect();

        ObfuscationOutput {
            artifacts,
            stats,
            registry,
        }
    }

    pub fn artifacts(&self) -> &[RenderedArtifact] {
        &self.artifacts
    }

    pub fn artifact(&self, key: ArtifactKey) -> Option<&RenderedArtifact> {
        self.artifacts.iter().find(|artifact| artifact.key == key)
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// All artifact declarations, in registration order, as one block.
    pub fn preamble(&self) -> String {
        self.artifacts
            .iter()
            .map(|artifact| artifact.code.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
