// Display names for bred plant variants.
//
// A finalized candidate gets a deterministic two-word name: the noun comes
// from the potency gene's popcount (hotter peppers earn scarier nouns), the
// adjective from the chromosome's total popcount (denser chromosomes earn
// grander adjectives). Both lists are ordered mild-to-wild; the popcount
// fraction of the relevant bit width is scaled into a list index, rounded,
// and clamped to the last entry.
//
// Names are identity in the catalog: a variant whose derived name collides
// with an existing entry is discarded (first discovered wins — see
// `state.rs`).

use crate::genetics::{CHROMOSOME_BITS, Chromosome, GENE_BITS};

/// Nouns by potency, mild to wild.
pub const NOUNS: [&str; 6] = [
    "Pepper", "Tingler", "Wiggler", "Scorcher", "Inferno", "Dragon",
];

/// Adjectives by overall chromosome density, plain to grand.
pub const ADJECTIVES: [&str; 7] = [
    "Pale", "Spotted", "Striped", "Warm", "Fiery", "Volcanic", "Celestial",
];

fn bucket(count: u32, width: u32, len: usize) -> usize {
    let idx = (count as f32 / width as f32 * len as f32).round() as usize;
    idx.min(len - 1)
}

/// Derive the display name for a bred chromosome.
pub fn name_cross(chromosome: &Chromosome) -> String {
    let noun = NOUNS[bucket(chromosome.potency.popcount(), GENE_BITS, NOUNS.len())];
    let adjective = ADJECTIVES[bucket(
        chromosome.total_popcount(),
        CHROMOSOME_BITS,
        ADJECTIVES.len(),
    )];
    format!("{adjective} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::Gene;
    use capsica_prng::GameRng;

    fn potency_chromosome(bits: u32, rng: &mut GameRng) -> Chromosome {
        Chromosome {
            potency: Gene::with_one_bits(bits, rng),
            ..Chromosome::EMPTY
        }
    }

    #[test]
    fn potency_selects_the_noun() {
        let mut rng = GameRng::new(5);
        let mild = name_cross(&potency_chromosome(0, &mut rng));
        assert!(mild.ends_with("Pepper"), "got {mild}");

        let wild = name_cross(&potency_chromosome(128, &mut rng));
        assert!(wild.ends_with("Dragon"), "got {wild}");
    }

    #[test]
    fn density_selects_the_adjective() {
        let mut rng = GameRng::new(5);
        let sparse = name_cross(&potency_chromosome(2, &mut rng));
        assert!(sparse.starts_with("Pale"), "got {sparse}");

        let dense = Chromosome {
            yield_gene: Gene::with_one_bits(128, &mut rng),
            size: Gene::with_one_bits(128, &mut rng),
            potency: Gene::with_one_bits(64, &mut rng),
            growth: Gene::with_one_bits(128, &mut rng),
        };
        let name = name_cross(&dense);
        assert!(name.starts_with("Celestial"), "got {name}");
    }

    #[test]
    fn names_are_deterministic_in_popcount_only() {
        let mut rng = GameRng::new(1);
        // Two different scatterings with equal popcounts name identically.
        let a = potency_chromosome(40, &mut rng);
        let b = potency_chromosome(40, &mut rng);
        assert_eq!(name_cross(&a), name_cross(&b));
    }
}
