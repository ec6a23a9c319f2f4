use crate::data::{
    CHARGED_KAON_MASS, CHARGED_PION_MASS, NEUTRAL_PION_MASS, NEUTRON_MASS, PROTON_MASS,
    SPECIES_BY_PDG,
};
use crate::fate::Fate;
use std::fmt;

/// Hadron species the transport engine knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    PiPlus,
    PiMinus,
    PiZero,
    Proton,
    Neutron,
    KPlus,
    KMinus,
    Photon,
}

/// Families share fate sets and final-state channel rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Pion,
    Nucleon,
    Kaon,
    Photon,
}

const NUCLEON_AND_PION_FATES: [Fate; 5] = [
    Fate::ChargeExchange,
    Fate::Elastic,
    Fate::Inelastic,
    Fate::Absorption,
    Fate::PionProduction,
];
const KAON_FATES: [Fate; 2] = [Fate::Inelastic, Fate::Absorption];

impl Family {
    /// Fates a hadron of this family can undergo, in selection order.
    ///
    /// The order is significant: fate selection walks the cumulative sum of
    /// fractions in exactly this sequence.
    pub fn applicable_fates(self) -> &'static [Fate] {
        match self {
            Family::Pion | Family::Nucleon => &NUCLEON_AND_PION_FATES,
            Family::Kaon => &KAON_FATES,
            Family::Photon => &[],
        }
    }
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::PiPlus,
        Species::PiMinus,
        Species::PiZero,
        Species::Proton,
        Species::Neutron,
        Species::KPlus,
        Species::KMinus,
        Species::Photon,
    ];

    pub fn pdg(self) -> i32 {
        match self {
            Species::PiPlus => 211,
            Species::PiMinus => -211,
            Species::PiZero => 111,
            Species::Proton => 2212,
            Species::Neutron => 2112,
            Species::KPlus => 321,
            Species::KMinus => -321,
            Species::Photon => 22,
        }
    }

    pub fn from_pdg(code: i32) -> Option<Species> {
        SPECIES_BY_PDG.get(&code).copied()
    }

    pub fn family(self) -> Family {
        match self {
            Species::PiPlus | Species::PiMinus | Species::PiZero => Family::Pion,
            Species::Proton | Species::Neutron => Family::Nucleon,
            Species::KPlus | Species::KMinus => Family::Kaon,
            Species::Photon => Family::Photon,
        }
    }

    /// Rest mass in GeV.
    pub fn mass(self) -> f64 {
        match self {
            Species::PiPlus | Species::PiMinus => CHARGED_PION_MASS,
            Species::PiZero => NEUTRAL_PION_MASS,
            Species::Proton => PROTON_MASS,
            Species::Neutron => NEUTRON_MASS,
            Species::KPlus | Species::KMinus => CHARGED_KAON_MASS,
            Species::Photon => 0.0,
        }
    }

    /// Electric charge in units of e.
    pub fn charge(self) -> i32 {
        match self {
            Species::PiPlus | Species::Proton | Species::KPlus => 1,
            Species::PiMinus | Species::KMinus => -1,
            Species::PiZero | Species::Neutron | Species::Photon => 0,
        }
    }

    pub fn baryon_number(self) -> i32 {
        match self.family() {
            Family::Nucleon => 1,
            _ => 0,
        }
    }

    pub fn is_nucleon(self) -> bool {
        self.family() == Family::Nucleon
    }

    pub fn is_pion(self) -> bool {
        self.family() == Family::Pion
    }

    pub fn nucleon_with_charge(charge: i32) -> Option<Species> {
        match charge {
            1 => Some(Species::Proton),
            0 => Some(Species::Neutron),
            _ => None,
        }
    }

    pub fn pion_with_charge(charge: i32) -> Option<Species> {
        match charge {
            1 => Some(Species::PiPlus),
            0 => Some(Species::PiZero),
            -1 => Some(Species::PiMinus),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::PiPlus => "pi+",
            Species::PiMinus => "pi-",
            Species::PiZero => "pi0",
            Species::Proton => "p",
            Species::Neutron => "n",
            Species::KPlus => "K+",
            Species::KMinus => "K-",
            Species::Photon => "gamma",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdg_codes_resolve_back_to_species() {
        for species in Species::ALL {
            assert_eq!(Species::from_pdg(species.pdg()), Some(species));
        }
        assert_eq!(Species::from_pdg(3122), None);
    }

    #[test]
    fn fate_sets_per_family() {
        assert_eq!(Species::PiPlus.family().applicable_fates().len(), 5);
        assert_eq!(Species::Neutron.family().applicable_fates()[0], Fate::ChargeExchange);
        assert_eq!(
            Species::KMinus.family().applicable_fates(),
            &[Fate::Inelastic, Fate::Absorption]
        );
        assert!(Species::Photon.family().applicable_fates().is_empty());
    }

    #[test]
    fn charge_lookups() {
        assert_eq!(Species::pion_with_charge(-1), Some(Species::PiMinus));
        assert_eq!(Species::nucleon_with_charge(1), Some(Species::Proton));
        assert_eq!(Species::nucleon_with_charge(-1), None);
        assert_eq!(Species::Proton.baryon_number(), 1);
        assert_eq!(Species::KPlus.baryon_number(), 0);
    }
}
