//! The genome bank (`spec.md §4.L`, §6): one fixed-length, quotation-free
//! bytecode program per NPC slot.
//!
//! `spec.md §6` notes the scheduler's convention is program-only code (no
//! quotation header) "because of the 64-byte budget per genome" — the VM
//! itself doesn't require this, but the bank enforces it so a genome always
//! fits the configured width.

use psil_asm::consts::PUSH_QUOT_MAX;

use crate::lfsr::Lfsr;

/// The highest byte value of the "valid-opcode alphabet" `spec.md §4.L` step
/// 3 draws mutated/seeded bytes from: the one-byte command class
/// (`0x00..=CMD_MAX`) and the three one-byte push classes (push-small,
/// push-slot, push-quotation), i.e. everything up to and including
/// `PUSH_QUOT_MAX`. Restricting to this range keeps every byte of a genome
/// independently a complete, self-contained instruction — no byte ever
/// depends on an immediate that a neighboring mutation could desynchronize.
const OPCODE_ALPHABET_MAX: u8 = PUSH_QUOT_MAX;

/// Draw one byte uniformly from the valid-opcode alphabet. Shared with
/// [`crate::ga`]'s point mutation, which draws replacement bytes from the
/// same alphabet (`spec.md §4.L` step 3).
pub(crate) fn random_opcode_byte(lfsr: &mut Lfsr) -> u8 {
    lfsr.next_below(OPCODE_ALPHABET_MAX as u32 + 1) as u8
}

/// A bank of `capacity` fixed-length genomes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenomeBank {
    genome_len: usize,
    genomes: Vec<Vec<u8>>,
}

impl GenomeBank {
    pub fn new(capacity: usize, genome_len: usize) -> Self {
        Self { genome_len, genomes: vec![vec![0u8; genome_len]; capacity] }
    }

    pub fn genome_len(&self) -> usize {
        self.genome_len
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn get(&self, index: usize) -> &[u8] {
        &self.genomes[index]
    }

    pub fn set(&mut self, index: usize, genome: Vec<u8>) {
        debug_assert_eq!(genome.len(), self.genome_len);
        self.genomes[index] = genome;
    }

    /// Fill every genome in the bank with fresh random bytes, drawn from
    /// the valid-opcode alphabet (`0x00..=PUSH_QUOT_MAX`, see
    /// [`OPCODE_ALPHABET_MAX`]), used both at initial seeding and when
    /// re-seeding a bank whose entire population died (`spec.md §4.L` step
    /// "If all NPCs are dead...").
    pub fn reseed_all(&mut self, lfsr: &mut Lfsr) {
        for genome in &mut self.genomes {
            for byte in genome.iter_mut() {
                *byte = random_opcode_byte(lfsr);
            }
        }
    }

    pub fn replace_all(&mut self, generation: Vec<Vec<u8>>) {
        debug_assert_eq!(generation.len(), self.genomes.len());
        self.genomes = generation;
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.genomes.iter().map(Vec::as_slice)
    }
}
