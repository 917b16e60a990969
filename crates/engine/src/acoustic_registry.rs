//! Named acoustic definitions and the compiler that resolves composite
//! references into playable arrays.

use crate::acoustics::{Acoustic, AcousticArray, AcousticSpec, Attenuation, BasicAcoustic};
use crate::error::AcousticError;
use crate::state::StepSound;
use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Reserved composite token meaning "resolved, but silent".
pub const NOT_EMITTER_NAME: &str = "NOT_EMITTER";

/// An explicitly configured primitive variant keyed by sound name and
/// volume/pitch signature.
#[derive(Debug, Clone, Deserialize)]
pub struct PrimitiveVariantSpec {
    /// Step-sound name the variant applies to.
    pub sound: String,
    /// Volume/pitch signature (see [`StepSound::signature`]) or a
    /// `break_<sound>` substrate.
    pub signature: String,
    /// The acoustic to play.
    pub spec: AcousticSpec,
}

#[derive(Debug, Deserialize)]
struct AcousticFile {
    #[serde(default)]
    acoustics: BTreeMap<String, AcousticSpec>,
    #[serde(default)]
    primitives: Vec<PrimitiveVariantSpec>,
}

/// Holds named acoustic definitions, compiles composite references, and
/// memoises primitive acoustics derived from host step sounds.
#[derive(Debug, Default)]
pub struct AcousticRegistry {
    definitions: BTreeMap<String, AcousticSpec>,
    compiled: HashMap<String, Arc<Acoustic>>,
    primitives: HashMap<String, AcousticArray>,
    primitive_variants: HashMap<(String, String), AcousticArray>,
}

impl AcousticRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace a named definition.
    ///
    /// Redefinition invalidates previously compiled results.
    pub fn define(&mut self, name: impl Into<String>, spec: AcousticSpec) {
        let name = name.into();
        if self.definitions.insert(name, spec).is_some() {
            self.compiled.clear();
        }
    }

    /// Install an explicitly configured primitive variant.
    pub fn define_primitive_variant(
        &mut self,
        variant: PrimitiveVariantSpec,
    ) -> Result<(), AcousticError> {
        let mut visited = BTreeSet::new();
        let owner = format!("{}#{}", variant.sound, variant.signature);
        let acoustic = self.compile_spec(&owner, &variant.spec, &mut visited)?;
        self.primitive_variants.insert(
            (variant.sound, variant.signature),
            AcousticArray::from_vec(vec![acoustic]),
        );
        Ok(())
    }

    /// Load a parsed-JSON definition document.
    ///
    /// Individual primitive variants that fail to compile are logged and
    /// skipped; the document itself must be well formed.
    pub fn load_definitions(&mut self, json: &str) -> anyhow::Result<usize> {
        let file: AcousticFile =
            serde_json::from_str(json).context("parsing acoustic definitions")?;
        let mut count = 0;
        for (name, spec) in file.acoustics {
            self.define(name, spec);
            count += 1;
        }
        for variant in file.primitives {
            let label = format!("{}#{}", variant.sound, variant.signature);
            match self.define_primitive_variant(variant) {
                Ok(()) => count += 1,
                Err(err) => tracing::warn!("skipping primitive variant {label}: {err}"),
            }
        }
        Ok(count)
    }

    /// Number of named definitions currently installed.
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Compile a comma-separated composite reference.
    ///
    /// Each token is a bare definition name or `parent.child` selecting a
    /// chain of an event acoustic. The reserved token `NOT_EMITTER`
    /// contributes silence.
    pub fn compile(&mut self, reference: &str) -> Result<AcousticArray, AcousticError> {
        let mut visited = BTreeSet::new();
        let mut acoustics = Vec::new();
        for token in reference.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token == NOT_EMITTER_NAME {
                continue;
            }
            if let Some((parent, child)) = token.split_once('.') {
                let parent_acoustic = self.compile_named(parent, &mut visited)?;
                let Acoustic::Event(chains) = parent_acoustic.as_ref() else {
                    return Err(AcousticError::UnknownAcoustic(token.to_string()));
                };
                let chain = chains
                    .get(child)
                    .ok_or_else(|| AcousticError::UnknownAcoustic(token.to_string()))?;
                acoustics.extend(chain.iter().cloned());
            } else {
                acoustics.push(self.compile_named(token, &mut visited)?);
            }
        }
        Ok(AcousticArray::from_vec(acoustics))
    }

    fn compile_named(
        &mut self,
        name: &str,
        visited: &mut BTreeSet<String>,
    ) -> Result<Arc<Acoustic>, AcousticError> {
        if let Some(done) = self.compiled.get(name) {
            return Ok(done.clone());
        }
        if !visited.insert(name.to_string()) {
            return Err(AcousticError::CyclicAcoustic(name.to_string()));
        }
        let spec = self
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| AcousticError::UnknownAcoustic(name.to_string()))?;
        let acoustic = self.compile_spec(name, &spec, visited)?;
        visited.remove(name);
        self.compiled.insert(name.to_string(), acoustic.clone());
        Ok(acoustic)
    }

    fn compile_spec(
        &mut self,
        owner: &str,
        spec: &AcousticSpec,
        visited: &mut BTreeSet<String>,
    ) -> Result<Arc<Acoustic>, AcousticError> {
        match spec {
            AcousticSpec::Basic {
                name,
                vol_min,
                vol_max,
                pitch_min,
                pitch_max,
                attenuation,
            } => Ok(Arc::new(Acoustic::Basic(BasicAcoustic {
                name: name.clone(),
                vol_min: *vol_min,
                vol_max: *vol_max,
                pitch_min: *pitch_min,
                pitch_max: *pitch_max,
                attenuation: *attenuation,
            }))),
            AcousticSpec::Event { chains } => {
                let mut compiled = BTreeMap::new();
                for (chain, chain_spec) in chains {
                    let acoustic = self.compile_spec(owner, chain_spec, visited)?;
                    compiled.insert(chain.clone(), AcousticArray::from_vec(vec![acoustic]));
                }
                Ok(Arc::new(Acoustic::Event(compiled)))
            }
            AcousticSpec::Simultaneous { parts } => {
                let mut compiled = Vec::with_capacity(parts.len());
                for part in parts {
                    compiled.push(self.compile_spec(owner, part, visited)?);
                }
                Ok(Arc::new(Acoustic::Simultaneous(compiled)))
            }
            AcousticSpec::Probability { entries } => {
                if entries.is_empty() {
                    return Err(AcousticError::InvalidWeight(owner.to_string()));
                }
                let mut total = 0.0;
                let mut compiled = Vec::with_capacity(entries.len());
                for entry in entries {
                    if entry.weight <= 0.0 {
                        return Err(AcousticError::InvalidWeight(owner.to_string()));
                    }
                    total += entry.weight;
                    compiled.push((entry.weight, self.compile_spec(owner, &entry.spec, visited)?));
                }
                Ok(Arc::new(Acoustic::Probability {
                    total,
                    entries: compiled,
                }))
            }
            AcousticSpec::Delayed { delay, inner } => Ok(Arc::new(Acoustic::Delayed {
                delay: *delay,
                inner: self.compile_spec(owner, inner, visited)?,
            })),
            AcousticSpec::RainSplash { inner } => {
                let acoustic = self.compile_spec(owner, inner, visited)?;
                Ok(Arc::new(Acoustic::RainSplash(AcousticArray::from_vec(
                    vec![acoustic],
                ))))
            }
            AcousticSpec::Ref { name } => self.compile_named(name, visited),
        }
    }

    /// The lazily built primitive acoustic for a host step sound.
    ///
    /// Memoised by sound name; the first call for a name fixes its
    /// volume/pitch.
    pub fn primitive(&mut self, step: &StepSound) -> AcousticArray {
        if let Some(done) = self.primitives.get(&step.name) {
            return done.clone();
        }
        debug!("building primitive acoustic for {}", step.name);
        let acoustic = Arc::new(Acoustic::Basic(BasicAcoustic {
            name: step.name.clone(),
            vol_min: step.volume,
            vol_max: step.volume,
            pitch_min: step.pitch,
            pitch_max: step.pitch,
            attenuation: Attenuation::Linear,
        }));
        let array = AcousticArray::from_vec(vec![acoustic]);
        self.primitives.insert(step.name.clone(), array.clone());
        array
    }

    /// An explicitly configured primitive variant, if present.
    pub fn primitive_variant(&self, sound: &str, signature: &str) -> Option<AcousticArray> {
        self.primitive_variants
            .get(&(sound.to_string(), signature.to_string()))
            .cloned()
    }
}
