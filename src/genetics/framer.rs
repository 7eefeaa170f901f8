//! Splits genome text into chromosomes at terminator runs.
//!
//! The framer makes a single forward pass. Each run of three terminator
//! codons closes the current chromosome; the run itself belongs to neither
//! neighbour. Whatever follows the last run is emitted as the final
//! chromosome, so `N` chromosomes need at most `N - 1` runs. Empty text
//! yields nothing, and a run at the very end of the text does not open an
//! extra empty chromosome.

use std::iter::FusedIterator;

use super::{Chromosome, Codon, CODON_WIDTH, TERMINATOR_RUN};
use crate::utilities::errors::BifrostError;

/// Forward-only iterator over the chromosomes of a genome.
#[derive(Debug)]
pub struct GenomeFramer<'a> {
    text: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> GenomeFramer<'a> {
    pub fn new(genome: &'a str) -> Self {
        Self {
            text: genome.as_bytes(),
            pos: 0,
            done: false,
        }
    }

    fn codon_at(&self, pos: usize) -> Result<Option<Codon>, BifrostError> {
        if pos >= self.text.len() {
            return Ok(None);
        }
        let end = pos + CODON_WIDTH;
        if end > self.text.len() {
            return Err(BifrostError::Config(format!(
                "genome text ends mid-codon at offset {}",
                pos
            )));
        }
        Codon::from_symbols(&self.text[pos..end])
            .map(Some)
            .ok_or_else(|| {
                BifrostError::Config(format!(
                    "invalid codon '{}' at offset {}",
                    String::from_utf8_lossy(&self.text[pos..end]),
                    pos
                ))
            })
    }

    /// True when a full terminator run starts at `pos`.
    fn terminator_run_at(&self, pos: usize) -> Result<bool, BifrostError> {
        for i in 0..TERMINATOR_RUN {
            match self.codon_at(pos + i * CODON_WIDTH)? {
                Some(codon) if codon.is_terminator() => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn next_chromosome(&mut self) -> Result<Chromosome, BifrostError> {
        let mut chromosome = Chromosome::new();
        while let Some(codon) = self.codon_at(self.pos)? {
            if codon.is_terminator() && self.terminator_run_at(self.pos)? {
                self.pos += TERMINATOR_RUN * CODON_WIDTH;
                return Ok(chromosome);
            }
            chromosome.push(codon);
            self.pos += CODON_WIDTH;
        }
        Ok(chromosome)
    }
}

impl Iterator for GenomeFramer<'_> {
    type Item = Result<Chromosome, BifrostError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.text.len() {
            self.done = true;
            return None;
        }
        let result = self.next_chromosome();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

impl FusedIterator for GenomeFramer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::terminator_run;

    fn frame(text: &str) -> Vec<String> {
        GenomeFramer::new(text)
            .map(|c| c.unwrap().codon_text())
            .collect()
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(frame("").is_empty());
    }

    #[test]
    fn test_single_segment_without_terminator() {
        assert_eq!(frame("AAACCCGGG"), vec!["AAACCCGGG"]);
    }

    #[test]
    fn test_two_segments() {
        let text = format!("AAAACA{}CCCGGG", terminator_run());
        assert_eq!(frame(&text), vec!["AAAACA", "CCCGGG"]);
    }

    #[test]
    fn test_trailing_run_adds_no_empty_segment() {
        let text = format!("AAA{}", terminator_run());
        assert_eq!(frame(&text), vec!["AAA"]);
    }

    #[test]
    fn test_adjacent_runs_give_empty_segment() {
        let run = terminator_run();
        let text = format!("AAA{run}{run}CCC");
        assert_eq!(frame(&text), vec!["AAA", "", "CCC"]);
    }

    #[test]
    fn test_short_terminator_sequence_is_data() {
        assert_eq!(frame("AAATTTTTTCCC"), vec!["AAATTTTTTCCC"]);
    }

    #[test]
    fn test_unaligned_terminator_symbols_ignored() {
        // "ATT TTT TTT TTA" has only two aligned terminator codons.
        assert_eq!(frame("ATTTTTTTTTTA"), vec!["ATTTTTTTTTTA"]);
    }

    #[test]
    fn test_molecules_preserve_order() {
        let chromosome = GenomeFramer::new("AAAAACAAGAATACA").next().unwrap().unwrap();
        assert_eq!(chromosome.molecules().len(), 2);
        assert_eq!(chromosome.molecules()[1].codons()[0].as_str(), "ACA");
    }

    #[test]
    fn test_invalid_symbol_is_config_error() {
        let mut framer = GenomeFramer::new("AAAXYZ");
        assert!(matches!(framer.next(), Some(Err(BifrostError::Config(_)))));
        assert!(framer.next().is_none());
    }

    #[test]
    fn test_partial_codon_is_config_error() {
        let mut framer = GenomeFramer::new("AAAAC");
        assert!(matches!(framer.next(), Some(Err(BifrostError::Config(_)))));
    }
}
