//! Deterministic random sources for unit tests.

use rand::RngCore;

/// Replays a fixed list of uniforms through `Rng::gen::<f64>()`, then repeats the last one.
pub struct ScriptedRng {
    words: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(uniforms: &[f64]) -> Self {
        // rand's f64 sampler keeps the top 53 bits of next_u64
        let words = uniforms
            .iter()
            .map(|&u| ((u * (1u64 << 53) as f64) as u64) << 11)
            .collect();
        Self { words, next: 0 }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let i = self.next.min(self.words.len().saturating_sub(1));
        self.next += 1;
        self.words.get(i).copied().unwrap_or(0)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_replays_then_repeats_last() {
        let mut rng = ScriptedRng::new(&[0.25, 0.5]);
        assert_eq!(rng.gen::<f64>(), 0.25);
        assert_eq!(rng.gen::<f64>(), 0.5);
        assert_eq!(rng.gen::<f64>(), 0.5);
    }

    #[test]
    fn test_empty_script_yields_zero() {
        let mut rng = ScriptedRng::new(&[]);
        assert_eq!(rng.next_u64(), 0);
        assert_eq!(rng.gen::<f64>(), 0.0);
    }
}
