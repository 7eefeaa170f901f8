//! Genome text: codons, molecules, chromosomes.
//!
//! A genome is a string over the nucleotide alphabet `A C G T`, read three
//! symbols at a time. Each three-symbol group is a [`Codon`]. One serialized
//! record becomes one [`Chromosome`]; chromosomes are joined by the
//! terminator codon repeated three times.
//!
//! ```text
//! genome     = chromosome *( TTT TTT TTT chromosome )
//! chromosome = *molecule
//! molecule   = 1*4 codon
//! ```

pub mod builder;
pub mod codec;
pub mod framer;

use std::fmt;

pub use builder::GenomeBuilder;
pub use codec::{CodonCodec, NibbleCodec};
pub use framer::GenomeFramer;

// ---------------------------------------------------------------------------
// Alphabet constants
// ---------------------------------------------------------------------------

/// The closed nucleotide alphabet.
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Symbols per codon.
pub const CODON_WIDTH: usize = 3;

/// Codons per molecule; the last molecule of a chromosome may be shorter.
pub const MOLECULE_WIDTH: usize = 4;

/// Reserved boundary codon. Never produced by the data encoding.
pub const TERMINATOR_CODON: Codon = Codon(*b"TTT");

/// How many consecutive terminator codons form a chromosome boundary.
pub const TERMINATOR_RUN: usize = 3;

/// The boundary text placed between chromosomes.
pub fn terminator_run() -> String {
    TERMINATOR_CODON.as_str().repeat(TERMINATOR_RUN)
}

// ---------------------------------------------------------------------------
// Codon
// ---------------------------------------------------------------------------

/// One fixed-width symbol of genome text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon([u8; CODON_WIDTH]);

impl Codon {
    /// Build a codon from raw symbols, rejecting anything outside `ACGT`.
    pub fn from_symbols(symbols: &[u8]) -> Option<Self> {
        if symbols.len() != CODON_WIDTH || !symbols.iter().all(|s| NUCLEOTIDES.contains(s)) {
            return None;
        }
        let mut raw = [0u8; CODON_WIDTH];
        raw.copy_from_slice(symbols);
        Some(Self(raw))
    }

    /// The codon at `index` in lexicographic order (`AAA` = 0, `TTT` = 63).
    pub fn from_index(index: u8) -> Self {
        let i = index as usize;
        Self([
            NUCLEOTIDES[(i >> 4) & 3],
            NUCLEOTIDES[(i >> 2) & 3],
            NUCLEOTIDES[i & 3],
        ])
    }

    /// Position of this codon in lexicographic order.
    pub fn index(&self) -> u8 {
        self.0.iter().fold(0u8, |acc, s| {
            let digit = NUCLEOTIDES.iter().position(|n| n == s).unwrap_or(0) as u8;
            (acc << 2) | digit
        })
    }

    pub fn is_terminator(&self) -> bool {
        *self == TERMINATOR_CODON
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII nucleotides.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Molecule / Chromosome
// ---------------------------------------------------------------------------

/// A short run of codons; the framer's unit of iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Molecule(Vec<Codon>);

impl Molecule {
    pub fn codons(&self) -> &[Codon] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_full(&self) -> bool {
        self.0.len() == MOLECULE_WIDTH
    }
}

/// The complete codon stream of one serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chromosome {
    molecules: Vec<Molecule>,
}

impl Chromosome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a codon, opening a new molecule when the current one is full.
    pub fn push(&mut self, codon: Codon) {
        match self.molecules.last_mut() {
            Some(molecule) if !molecule.is_full() => molecule.0.push(codon),
            _ => self.molecules.push(Molecule(vec![codon])),
        }
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn codons(&self) -> impl Iterator<Item = &Codon> {
        self.molecules.iter().flat_map(|m| m.codons())
    }

    pub fn codon_count(&self) -> usize {
        self.molecules.iter().map(Molecule::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Concatenate every codon back into genome text.
    pub fn codon_text(&self) -> String {
        let mut text = String::with_capacity(self.codon_count() * CODON_WIDTH);
        for codon in self.codons() {
            text.push_str(codon.as_str());
        }
        text
    }
}
