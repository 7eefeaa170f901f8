//! Agent configuration records and their flat byte encoding.
//!
//! A genome carries three records in fixed order: [`Identity`] (which embeds
//! a [`Persona`]), [`CognitiveProcess`], and optionally [`Capabilities`].
//! Each implements [`ConfigRecord`], whose `to_bytes`/`from_bytes` pair is
//! byte-exact in both directions.
//!
//! ```text
//! Persona           u8 gender · str profession · i32 n · n × str descriptor
//! Identity          str name · Persona
//! CognitiveProcess  str chain_of_thought
//! Capabilities      i32 n · n × str skill
//! ```

pub mod wire;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::DecodeError;

pub use wire::{RecordReader, RecordWriter};

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// The top-level record kinds a genome can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Identity,
    CognitiveProcess,
    Capabilities,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "Identity"),
            Self::CognitiveProcess => write!(f, "CognitiveProcess"),
            Self::Capabilities => write!(f, "Capabilities"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigRecord trait
// ---------------------------------------------------------------------------

/// A record with a deterministic flat byte encoding.
pub trait ConfigRecord: Sized {
    /// Append this record's fields to `writer`.
    fn write_to(&self, writer: &mut RecordWriter);

    /// Read one record from the front of `reader`.
    fn read_from(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError>;

    /// Encode the record into a fresh byte vector.
    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = RecordWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Decode a record that must span `bytes` exactly.
    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = RecordReader::new(bytes);
        let record = Self::read_from(&mut reader)?;
        reader.finish()?;
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Grammatical gender of the agent; drives pronoun choice in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Gender {
    Male = 0,
    Female = 1,
    #[default]
    None = 2,
}

impl Gender {
    /// Lower-case subject pronoun.
    pub fn pronoun(self) -> &'static str {
        match self {
            Self::Male => "he",
            Self::Female => "she",
            Self::None => "it",
        }
    }

    /// Subject pronoun for the start of a sentence.
    pub fn pronoun_capitalized(self) -> &'static str {
        match self {
            Self::Male => "He",
            Self::Female => "She",
            Self::None => "It",
        }
    }
}

impl TryFrom<u8> for Gender {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Male),
            1 => Ok(Self::Female),
            2 => Ok(Self::None),
            other => Err(DecodeError::UnknownGender(other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::None => write!(f, "None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Gender, profession and personality descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Persona {
    pub gender: Gender,
    pub profession: String,
    pub personality_descriptors: Vec<String>,
}

impl ConfigRecord for Persona {
    fn write_to(&self, writer: &mut RecordWriter) {
        writer.write_u8(self.gender as u8);
        writer.write_str(&self.profession);
        writer.write_strs(&self.personality_descriptors);
    }

    fn read_from(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        let gender = Gender::try_from(reader.read_u8()?)?;
        let profession = reader.read_string()?;
        let personality_descriptors = reader.read_strings()?;
        Ok(Self {
            gender,
            profession,
            personality_descriptors,
        })
    }
}

/// The agent's name and persona.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub persona: Persona,
}

impl ConfigRecord for Identity {
    fn write_to(&self, writer: &mut RecordWriter) {
        writer.write_str(&self.name);
        self.persona.write_to(writer);
    }

    fn read_from(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        let name = reader.read_string()?;
        let persona = Persona::read_from(reader)?;
        Ok(Self { name, persona })
    }
}

/// Free-form reasoning instructions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CognitiveProcess {
    pub chain_of_thought: String,
}

impl ConfigRecord for CognitiveProcess {
    fn write_to(&self, writer: &mut RecordWriter) {
        writer.write_str(&self.chain_of_thought);
    }

    fn read_from(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            chain_of_thought: reader.read_string()?,
        })
    }
}

/// Named skills; empty when the genome omits the record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub skills: Vec<String>,
}

impl ConfigRecord for Capabilities {
    fn write_to(&self, writer: &mut RecordWriter) {
        writer.write_strs(&self.skills);
    }

    fn read_from(reader: &mut RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            skills: reader.read_strings()?,
        })
    }
}

// ---------------------------------------------------------------------------
// AgentProfile
// ---------------------------------------------------------------------------

/// Fully assembled agent configuration.
///
/// Built once by [`crate::bootstrap::assemble`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub identity: Identity,
    pub cognitive_process: CognitiveProcess,
    #[serde(default)]
    pub capabilities: Capabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_identity_roundtrip() {
        let identity = eva();
        let back = Identity::from_bytes(&identity.to_bytes()).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn test_empty_records_roundtrip() {
        assert_eq!(
            Identity::from_bytes(&Identity::default().to_bytes()).unwrap(),
            Identity::default()
        );
        assert_eq!(
            Capabilities::from_bytes(&Capabilities::default().to_bytes()).unwrap(),
            Capabilities::default()
        );
    }

    #[test]
    fn test_cognitive_process_and_capabilities_roundtrip() {
        let cog = CognitiveProcess {
            chain_of_thought: "Step 1: listen. Step 2: think — then answer ✓".into(),
        };
        assert_eq!(CognitiveProcess::from_bytes(&cog.to_bytes()).unwrap(), cog);

        let caps = Capabilities {
            skills: vec!["TemporalAwareness".into(), "".into(), "Diagnosis".into()],
        };
        assert_eq!(Capabilities::from_bytes(&caps.to_bytes()).unwrap(), caps);
    }

    #[test]
    fn test_identity_byte_layout() {
        let identity = Identity {
            name: "Al".into(),
            persona: Persona {
                gender: Gender::Male,
                profession: "X".into(),
                personality_descriptors: vec!["k".into()],
            },
        };
        assert_eq!(
            identity.to_bytes(),
            vec![2, b'A', b'l', 0, 1, b'X', 1, 0, 0, 0, 1, b'k']
        );
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let mut bytes = eva().to_bytes();
        // name "Eva" occupies 4 bytes, gender follows.
        bytes[4] = 7;
        assert_eq!(
            Identity::from_bytes(&bytes),
            Err(DecodeError::UnknownGender(7))
        );
    }

    #[test]
    fn test_truncated_identity() {
        let bytes = eva().to_bytes();
        let err = Identity::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn test_pronouns() {
        assert_eq!(Gender::Male.pronoun(), "he");
        assert_eq!(Gender::Female.pronoun_capitalized(), "She");
        assert_eq!(Gender::None.pronoun(), "it");
    }
}
