//! Genome → [`AgentProfile`] assembly.
//!
//! Chromosome position decides record kind through [`RECORD_SLOTS`], an
//! ordered table of `(kind, requirement, decoder)`. Each chromosome's codons
//! are decoded to bytes by the injected [`CodonCodec`], then to a typed
//! record by the slot's decoder. Chromosomes past the end of the table are
//! framed and dropped. Any failure aborts assembly; no partial profile is
//! returned.

use crate::genetics::{CodonCodec, GenomeFramer};
use crate::records::{
    AgentProfile, Capabilities, CognitiveProcess, ConfigRecord, Identity, RecordKind,
};
use crate::utilities::errors::{BifrostError, DecodeError, Result};

// ---------------------------------------------------------------------------
// Slot table
// ---------------------------------------------------------------------------

/// Whether a genome must carry a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    /// Absent records default to empty.
    Optional,
}

/// One decoded record, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePart {
    Identity(Identity),
    CognitiveProcess(CognitiveProcess),
    Capabilities(Capabilities),
}

/// Decoder signature shared by every slot.
pub type SlotDecoder = fn(&[u8]) -> std::result::Result<ProfilePart, DecodeError>;

/// A positional record slot.
#[derive(Debug, Clone, Copy)]
pub struct RecordSlot {
    pub kind: RecordKind,
    pub requirement: Requirement,
    pub decode: SlotDecoder,
}

fn decode_identity(bytes: &[u8]) -> std::result::Result<ProfilePart, DecodeError> {
    Identity::from_bytes(bytes).map(ProfilePart::Identity)
}

fn decode_cognitive_process(bytes: &[u8]) -> std::result::Result<ProfilePart, DecodeError> {
    CognitiveProcess::from_bytes(bytes).map(ProfilePart::CognitiveProcess)
}

fn decode_capabilities(bytes: &[u8]) -> std::result::Result<ProfilePart, DecodeError> {
    Capabilities::from_bytes(bytes).map(ProfilePart::Capabilities)
}

/// Chromosome index → record slot.
pub const RECORD_SLOTS: &[RecordSlot] = &[
    RecordSlot {
        kind: RecordKind::Identity,
        requirement: Requirement::Required,
        decode: decode_identity,
    },
    RecordSlot {
        kind: RecordKind::CognitiveProcess,
        requirement: Requirement::Required,
        decode: decode_cognitive_process,
    },
    RecordSlot {
        kind: RecordKind::Capabilities,
        requirement: Requirement::Optional,
        decode: decode_capabilities,
    },
];

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PartialProfile {
    identity: Option<Identity>,
    cognitive_process: Option<CognitiveProcess>,
    capabilities: Option<Capabilities>,
}

impl PartialProfile {
    fn insert(&mut self, part: ProfilePart) {
        match part {
            ProfilePart::Identity(v) => self.identity = Some(v),
            ProfilePart::CognitiveProcess(v) => self.cognitive_process = Some(v),
            ProfilePart::Capabilities(v) => self.capabilities = Some(v),
        }
    }

    fn has(&self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Identity => self.identity.is_some(),
            RecordKind::CognitiveProcess => self.cognitive_process.is_some(),
            RecordKind::Capabilities => self.capabilities.is_some(),
        }
    }

    fn finish(self) -> Result<AgentProfile> {
        for slot in RECORD_SLOTS {
            if slot.requirement == Requirement::Required && !self.has(slot.kind) {
                return Err(BifrostError::RequiredFieldMissing(slot.kind));
            }
        }
        match (self.identity, self.cognitive_process) {
            (Some(identity), Some(cognitive_process)) => Ok(AgentProfile {
                identity,
                cognitive_process,
                capabilities: self.capabilities.unwrap_or_default(),
            }),
            (None, _) => Err(BifrostError::RequiredFieldMissing(RecordKind::Identity)),
            (_, None) => Err(BifrostError::RequiredFieldMissing(RecordKind::CognitiveProcess)),
        }
    }
}

/// Decode a genome into an [`AgentProfile`].
///
/// # Errors
///
/// - [`BifrostError::Config`] for empty or malformed genome text.
/// - [`BifrostError::Decode`] when a chromosome's bytes are not a valid record.
/// - [`BifrostError::RequiredFieldMissing`] when the genome is too short.
pub fn assemble(genome: &str, codec: &dyn CodonCodec) -> Result<AgentProfile> {
    if genome.is_empty() {
        return Err(BifrostError::Config("genome cannot be empty".into()));
    }

    let mut partial = PartialProfile::default();
    let mut framed = 0usize;

    for (index, chromosome) in GenomeFramer::new(genome).enumerate() {
        let chromosome = chromosome?;
        framed += 1;

        let Some(slot) = RECORD_SLOTS.get(index) else {
            log::debug!("discarding chromosome {} ({} codons)", index, chromosome.codon_count());
            continue;
        };

        let bytes = codec.decode(&chromosome.codon_text())?;
        let part = (slot.decode)(&bytes).map_err(|source| BifrostError::Decode {
            kind: slot.kind,
            source,
        })?;
        log::debug!("decoded {} record from chromosome {}", slot.kind, index);
        partial.insert(part);
    }

    if framed == 0 {
        return Err(BifrostError::Config("genome contains no chromosomes".into()));
    }

    let profile = partial.finish()?;
    log::info!("Identity: {}", profile.identity.name);
    log::debug!("Cognitive: {}", profile.cognitive_process.chain_of_thought);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::{GenomeBuilder, NibbleCodec};
    use crate::records::{Gender, Persona};

    fn eva() -> Identity {
        Identity {
            name: "Eva".into(),
            persona: Persona {
                gender: Gender::Female,
                profession: "Assistant".into(),
                personality_descriptors: vec![
                    "expert".into(),
                    "analytical".into(),
                    "creative".into(),
                ],
            },
        }
    }

    fn thought() -> CognitiveProcess {
        CognitiveProcess { chain_of_thought: "Step 1...".into() }
    }

    #[test]
    fn test_two_segments_default_capabilities() {
        let genome = GenomeBuilder::new(&NibbleCodec)
            .record(&eva())
            .record(&thought())
            .build();
        let profile = assemble(&genome, &NibbleCodec).unwrap();
        assert_eq!(profile.identity.name, "Eva");
        assert_eq!(profile.identity, eva());
        assert_eq!(profile.cognitive_process, thought());
        assert!(profile.capabilities.skills.is_empty());
    }

    #[test]
    fn test_three_segments_map_by_position() {
        let caps = Capabilities { skills: vec!["TemporalAwareness".into()] };
        let genome = GenomeBuilder::new(&NibbleCodec)
            .record(&eva())
            .record(&thought())
            .record(&caps)
            .build();
        let profile = assemble(&genome, &NibbleCodec).unwrap();
        assert_eq!(profile.identity, eva());
        assert_eq!(profile.cognitive_process, thought());
        assert_eq!(profile.capabilities, caps);
    }

    #[test]
    fn test_extra_segments_discarded() {
        let genome = GenomeBuilder::new(&NibbleCodec)
            .record(&eva())
            .record(&thought())
            .record(&Capabilities::default())
            .raw_chromosome("GGGCCC")
            .build();
        let profile = assemble(&genome, &NibbleCodec).unwrap();
        assert_eq!(profile.identity.name, "Eva");
    }

    #[test]
    fn test_empty_genome_is_config_error() {
        assert!(matches!(
            assemble("", &NibbleCodec),
            Err(BifrostError::Config(_))
        ));
    }

    #[test]
    fn test_single_segment_missing_cognitive_process() {
        let genome = GenomeBuilder::new(&NibbleCodec).record(&eva()).build();
        assert!(matches!(
            assemble(&genome, &NibbleCodec),
            Err(BifrostError::RequiredFieldMissing(RecordKind::CognitiveProcess))
        ));
    }

    #[test]
    fn test_corrupt_identity_fails_fast() {
        let genome = GenomeBuilder::new(&NibbleCodec)
            .raw_chromosome(NibbleCodec.encode(&[9, b'E']))
            .record(&thought())
            .build();
        match assemble(&genome, &NibbleCodec) {
            Err(BifrostError::Decode { kind, source }) => {
                assert_eq!(kind, RecordKind::Identity);
                assert!(matches!(source, DecodeError::Truncated { .. }));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_codon_text_is_config_error() {
        let genome = GenomeBuilder::new(&NibbleCodec)
            .raw_chromosome("GGG")
            .record(&thought())
            .build();
        assert!(matches!(
            assemble(&genome, &NibbleCodec),
            Err(BifrostError::Config(_))
        ));
    }

    #[test]
    fn test_slot_table_order() {
        let kinds: Vec<RecordKind> = RECORD_SLOTS.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![RecordKind::Identity, RecordKind::CognitiveProcess, RecordKind::Capabilities]
        );
        assert_eq!(RECORD_SLOTS[2].requirement, Requirement::Optional);
    }
}
