use crate::fate_table::FateFractions;
use crate::species::Species;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// What happens to a hadron at an interaction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fate {
    ChargeExchange,
    Elastic,
    Inelastic,
    Absorption,
    PionProduction,
    Undefined,
}

impl Fate {
    pub fn name(self) -> &'static str {
        match self {
            Fate::ChargeExchange => "charge_exchange",
            Fate::Elastic => "elastic",
            Fate::Inelastic => "inelastic",
            Fate::Absorption => "absorption",
            Fate::PionProduction => "pion_production",
            Fate::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Fate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Draw a fate for `species` at `kinetic_energy` (MeV).
///
/// The fractions of the species' applicable fates are summed in their fixed
/// order; a uniform draw scaled by that sum picks the first fate whose
/// cumulative fraction exceeds it. If no fate is picked within
/// `max_iterations` draws (for instance when every fraction is zero), or the
/// species has no fates at all, [`Fate::Undefined`] is returned.
pub fn select_fate<F, R>(
    species: Species,
    kinetic_energy: f64,
    fractions: &F,
    max_iterations: u32,
    rng: &mut R,
) -> Fate
where
    F: FateFractions + ?Sized,
    R: Rng + ?Sized,
{
    let fates = species.family().applicable_fates();
    if fates.is_empty() {
        return Fate::Undefined;
    }

    let weighted: Vec<(Fate, f64)> = fates
        .iter()
        .map(|&fate| (fate, fractions.fraction(species, fate, kinetic_energy)))
        .collect();
    let total: f64 = weighted.iter().map(|&(_, w)| w).sum();

    for _ in 0..max_iterations {
        let r = total * rng.gen::<f64>();
        let mut cumulative = 0.0;
        for &(fate, w) in &weighted {
            cumulative += w;
            if r < cumulative {
                return fate;
            }
        }
    }

    warn!(
        %species,
        kinetic_energy,
        total,
        max_iterations,
        "no fate selected"
    );
    Fate::Undefined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fate_table::FateTable;
    use crate::test_support::ScriptedRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed() -> FateTable {
        let mut table = FateTable::new();
        for species in Species::ALL {
            for (fate, f) in [
                (Fate::ChargeExchange, 0.1),
                (Fate::Elastic, 0.3),
                (Fate::Inelastic, 0.2),
                (Fate::Absorption, 0.1),
                (Fate::PionProduction, 0.1),
            ] {
                table.insert_constant(species, fate, f).unwrap();
            }
        }
        table
    }

    #[test]
    fn test_cumulative_walk_picks_elastic() {
        // total 0.8, r = 0.8 * 0.4375 = 0.35: past cex (0.1), inside elastic (0.4)
        let mut rng = ScriptedRng::new(&[0.4375]);
        assert_eq!(select_fate(Species::PiPlus, 100.0, &fixed(), 10, &mut rng), Fate::Elastic);
    }

    #[test]
    fn test_cumulative_walk_boundaries() {
        let mut rng = ScriptedRng::new(&[0.0, 0.99]);
        assert_eq!(
            select_fate(Species::Proton, 100.0, &fixed(), 10, &mut rng),
            Fate::ChargeExchange
        );
        assert_eq!(
            select_fate(Species::Proton, 100.0, &fixed(), 10, &mut rng),
            Fate::PionProduction
        );
    }

    #[test]
    fn test_kaon_only_sees_its_fates() {
        // kaon total is 0.3; r = 0.3 * 0.5 = 0.15 is inside inelastic (0.2)
        let mut rng = ScriptedRng::new(&[0.5]);
        assert_eq!(select_fate(Species::KPlus, 100.0, &fixed(), 10, &mut rng), Fate::Inelastic);
    }

    #[test]
    fn test_undefined_when_nothing_can_be_chosen() {
        let zero = FateTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_fate(Species::PiZero, 50.0, &zero, 1000, &mut rng), Fate::Undefined);
        assert_eq!(select_fate(Species::Photon, 50.0, &fixed(), 1000, &mut rng), Fate::Undefined);
    }

    #[test]
    fn test_same_seed_same_fates() {
        let table = fixed();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(
                select_fate(Species::Neutron, 250.0, &table, 1000, &mut a),
                select_fate(Species::Neutron, 250.0, &table, 1000, &mut b)
            );
        }
    }
}
