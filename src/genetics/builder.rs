//! Builds genome text from records.

use super::codec::CodonCodec;
use super::terminator_run;
use crate::records::{AgentProfile, ConfigRecord};

/// Accumulates encoded records in positional order and joins them with
/// terminator runs.
///
/// ```ignore
/// let genome = GenomeBuilder::new(&NibbleCodec)
///     .record(&identity)
///     .record(&cognitive_process)
///     .build();
/// ```
pub struct GenomeBuilder<'c> {
    codec: &'c dyn CodonCodec,
    chromosomes: Vec<String>,
}

impl<'c> GenomeBuilder<'c> {
    pub fn new(codec: &'c dyn CodonCodec) -> Self {
        Self {
            codec,
            chromosomes: Vec::new(),
        }
    }

    /// Append the next record. Call order decides the record's slot.
    pub fn record<R: ConfigRecord>(mut self, record: &R) -> Self {
        self.chromosomes.push(self.codec.encode(&record.to_bytes()));
        self
    }

    /// Append an already-encoded chromosome verbatim.
    pub fn raw_chromosome(mut self, codon_text: impl Into<String>) -> Self {
        self.chromosomes.push(codon_text.into());
        self
    }

    pub fn build(self) -> String {
        self.chromosomes.join(&terminator_run())
    }

    /// Encode a whole profile. Capabilities are written only when non-empty.
    pub fn from_profile(codec: &'c dyn CodonCodec, profile: &AgentProfile) -> String {
        let builder = Self::new(codec)
            .record(&profile.identity)
            .record(&profile.cognitive_process);
        if profile.capabilities.skills.is_empty() {
            builder.build()
        } else {
            builder.record(&profile.capabilities).build()
        }
    }
}
