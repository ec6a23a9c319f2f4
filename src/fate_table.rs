use crate::error::DataError;
use crate::fate::Fate;
use crate::species::Species;
use crate::utilities::interpolate_linear;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Source of fate fractions: the relative weight of `fate` for `species` at
/// `kinetic_energy` (MeV). Missing entries should report zero.
pub trait FateFractions {
    fn fraction(&self, species: Species, fate: Fate, kinetic_energy: f64) -> f64;
}

impl<T: FateFractions + ?Sized> FateFractions for &T {
    fn fraction(&self, species: Species, fate: Fate, kinetic_energy: f64) -> f64 {
        (**self).fraction(species, fate, kinetic_energy)
    }
}

/// One tabulated fraction curve as it appears in a JSON table file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionCurve {
    pub pdg: i32,
    pub fate: Fate,
    /// Kinetic energy grid, MeV, ascending.
    pub kinetic_energy: Vec<f64>,
    pub fraction: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FateTableFile {
    fractions: Vec<FractionCurve>,
}

/// Fate fractions tabulated against kinetic energy and linearly interpolated.
///
/// Tables are read from JSON of the form
///
/// ```json
/// { "fractions": [
///     { "pdg": 211, "fate": "elastic",
///       "kinetic_energy": [0.0, 200.0, 1000.0], "fraction": [0.1, 0.3, 0.2] }
/// ] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FateTable {
    curves: HashMap<(Species, Fate), FractionCurve>,
}

impl FateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, curve: FractionCurve) -> Result<(), DataError> {
        let species = Species::from_pdg(curve.pdg).ok_or(DataError::UnknownPdg(curve.pdg))?;
        let invalid = |reason| DataError::InvalidTable {
            species: species.to_string(),
            fate: curve.fate.to_string(),
            reason,
        };
        if curve.kinetic_energy.is_empty() {
            return Err(invalid("empty energy grid"));
        }
        if curve.kinetic_energy.len() != curve.fraction.len() {
            return Err(invalid("energy grid and fractions differ in length"));
        }
        if curve.kinetic_energy.windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid("energy grid is not ascending"));
        }
        if curve.fraction.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(invalid("fractions must be finite and non-negative"));
        }
        self.curves.insert((species, curve.fate), curve);
        Ok(())
    }

    /// Energy-independent fraction.
    pub fn insert_constant(
        &mut self,
        species: Species,
        fate: Fate,
        fraction: f64,
    ) -> Result<(), DataError> {
        self.insert(FractionCurve {
            pdg: species.pdg(),
            fate,
            kinetic_energy: vec![0.0],
            fraction: vec![fraction],
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let file: FateTableFile = serde_json::from_str(json)?;
        let mut table = Self::new();
        for curve in file.fractions {
            table.insert(curve)?;
        }
        Ok(table)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl FateFractions for FateTable {
    fn fraction(&self, species: Species, fate: Fate, kinetic_energy: f64) -> f64 {
        self.curves
            .get(&(species, fate))
            .map(|c| interpolate_linear(&c.kinetic_energy, &c.fraction, kinetic_energy))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "fractions": [
            { "pdg": 211, "fate": "elastic",
              "kinetic_energy": [0.0, 200.0], "fraction": [0.2, 0.4] },
            { "pdg": 211, "fate": "absorption",
              "kinetic_energy": [0.0], "fraction": [0.3] }
        ]
    }"#;

    #[test]
    fn test_json_table_interpolates() {
        let table = FateTable::from_json_str(TABLE).unwrap();
        assert_eq!(table.len(), 2);
        let f = table.fraction(Species::PiPlus, Fate::Elastic, 100.0);
        assert!((f - 0.3).abs() < 1e-12);
        assert_eq!(table.fraction(Species::PiPlus, Fate::Absorption, 900.0), 0.3);
    }

    #[test]
    fn test_missing_curve_is_zero() {
        let table = FateTable::from_json_str(TABLE).unwrap();
        assert_eq!(table.fraction(Species::PiMinus, Fate::Elastic, 100.0), 0.0);
        assert_eq!(table.fraction(Species::PiPlus, Fate::Inelastic, 100.0), 0.0);
    }

    #[test]
    fn test_rejects_malformed_curves() {
        let mut table = FateTable::new();
        let bad = FractionCurve {
            pdg: 2212,
            fate: Fate::Elastic,
            kinetic_energy: vec![0.0, 100.0],
            fraction: vec![0.5],
        };
        assert!(matches!(table.insert(bad), Err(DataError::InvalidTable { .. })));
        assert!(matches!(
            table.insert_constant(Species::Proton, Fate::Elastic, -0.1),
            Err(DataError::InvalidTable { .. })
        ));
        let unknown = r#"{"fractions":[
            {"pdg":3122,"fate":"elastic","kinetic_energy":[0.0],"fraction":[1.0]}
        ]}"#;
        assert!(matches!(FateTable::from_json_str(unknown), Err(DataError::UnknownPdg(3122))));
        assert!(matches!(FateTable::from_json_str("{"), Err(DataError::Json(_))));
    }
}
