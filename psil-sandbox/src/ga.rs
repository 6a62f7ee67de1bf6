//! The genetic algorithm (`spec.md §4.L`): generational tournament
//! selection with elitism, point mutation, and optional one-point
//! crossover.

use crate::config::{CrossoverMode, GaConfig};
use crate::genome::{random_opcode_byte, GenomeBank};
use crate::lfsr::Lfsr;
use crate::npc::NpcRow;

/// What happened during one call to [`evolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaStats {
    /// True if the whole population was dead and the bank was re-seeded
    /// with fresh random genomes instead of evolving.
    pub reseeded: bool,
    /// Row index of the genome carried over verbatim by elitism. Meaningless
    /// when `reseeded`.
    pub elite_row: usize,
    /// That genome's fitness.
    pub elite_fitness: i64,
}

/// Run one generation. `npcs` supplies fitness per row (`spec.md §4.K` step
/// 1.f is expected to have already run this tick); the caller is
/// responsible for resetting NPC bookkeeping fields and bumping the
/// generation counter afterward (`spec.md §4.L` steps 4-5), since those
/// touch the NPC table and tile world this module doesn't own.
pub fn evolve(bank: &mut GenomeBank, npcs: &[NpcRow], config: &GaConfig, lfsr: &mut Lfsr) -> GaStats {
    let live: Vec<usize> = npcs.iter().enumerate().filter(|(_, n)| !n.is_empty()).map(|(i, _)| i).collect();

    if live.is_empty() {
        bank.reseed_all(lfsr);
        return GaStats { reseeded: true, elite_row: 0, elite_fitness: 0 };
    }

    let elite_row = *live.iter().max_by_key(|&&i| npcs[i].fitness).unwrap();
    let elite_fitness = npcs[elite_row].fitness;

    let mut next_generation = Vec::with_capacity(bank.len());
    next_generation.push(bank.get(elite_row).to_vec());

    while next_generation.len() < bank.len() {
        let winner_a = tournament(&live, npcs, lfsr);
        let base = match config.crossover {
            CrossoverMode::None => bank.get(winner_a).to_vec(),
            CrossoverMode::OnePoint => {
                let winner_b = tournament(&live, npcs, lfsr);
                crossover_one_point(bank.get(winner_a), bank.get(winner_b), lfsr)
            }
        };
        next_generation.push(mutate(base, config.p_mut, lfsr));
    }

    bank.replace_all(next_generation);
    GaStats { reseeded: false, elite_row, elite_fitness }
}

/// Draw two candidates uniformly from the live population, keep the
/// higher-fitness one (`spec.md §4.L` step 3).
fn tournament(live: &[usize], npcs: &[NpcRow], lfsr: &mut Lfsr) -> usize {
    let a = live[lfsr.next_below(live.len() as u32) as usize];
    let b = live[lfsr.next_below(live.len() as u32) as usize];
    if npcs[a].fitness >= npcs[b].fitness {
        a
    } else {
        b
    }
}

/// Prefix from `a`, suffix from `b`, split at a random byte boundary.
fn crossover_one_point(a: &[u8], b: &[u8], lfsr: &mut Lfsr) -> Vec<u8> {
    let len = a.len().min(b.len());
    let split = lfsr.next_below(len.max(1) as u32) as usize;
    let mut child = a[..split].to_vec();
    child.extend_from_slice(&b[split..len]);
    child
}

/// Point mutation: with probability `p_mut` per byte, replace it with a
/// uniformly random byte drawn from the valid-opcode alphabet (`spec.md
/// §4.L` step 3), the same alphabet [`crate::genome::GenomeBank::reseed_all`]
/// draws from.
fn mutate(mut genome: Vec<u8>, p_mut: f64, lfsr: &mut Lfsr) -> Vec<u8> {
    let threshold = (p_mut.clamp(0.0, 1.0) * 65536.0) as u32;
    for byte in genome.iter_mut() {
        if lfsr.next_below(65536) < threshold {
            *byte = random_opcode_byte(lfsr);
        }
    }
    genome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc_with_fitness(id: u32, fitness: i64) -> NpcRow {
        let mut row = NpcRow { id, ..zero_row() };
        row.fitness = fitness;
        row
    }

    fn zero_row() -> NpcRow {
        NpcRow { id: 0, x: 0, y: 0, health: 0, energy: 0, hunger: 0, age: 0, food_eaten: 0, fitness: 0 }
    }

    #[test]
    fn bank_size_is_unchanged_after_evolution() {
        let mut bank = GenomeBank::new(4, 8);
        bank.reseed_all(&mut Lfsr::new(1));
        let npcs = vec![
            npc_with_fitness(1, 5),
            npc_with_fitness(2, 50),
            npc_with_fitness(3, 1),
            npc_with_fitness(4, 20),
        ];
        let before_len = bank.len();
        let stats = evolve(&mut bank, &npcs, &GaConfig::default(), &mut Lfsr::new(2));
        assert_eq!(bank.len(), before_len);
        assert!(!stats.reseeded);
    }

    #[test]
    fn elitism_carries_the_fittest_genome_verbatim() {
        let mut bank = GenomeBank::new(3, 6);
        bank.set(1, vec![9, 9, 9, 9, 9, 9]);
        let npcs = vec![npc_with_fitness(1, 1), npc_with_fitness(2, 100), npc_with_fitness(3, 2)];
        evolve(&mut bank, &npcs, &GaConfig::default(), &mut Lfsr::new(3));
        assert_eq!(bank.get(0), &[9u8, 9, 9, 9, 9, 9][..]);
    }

    #[test]
    fn all_dead_triggers_reseed_instead_of_evolution() {
        let mut bank = GenomeBank::new(2, 4);
        let npcs = vec![zero_row(), zero_row()];
        let stats = evolve(&mut bank, &npcs, &GaConfig::default(), &mut Lfsr::new(4));
        assert!(stats.reseeded);
    }
}
