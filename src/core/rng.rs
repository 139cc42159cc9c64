//! PCG32 pseudo-random numbers for sample generation.
use hexf::*;
use super::types::Float;

#[cfg(feature = "float_as_double")]
pub const ONE_MINUS_EPSILON: f64 = hexf64!("0x1.fffffffffffffp-1");
#[cfg(not(feature = "float_as_double"))]
pub const ONE_MINUS_EPSILON: f32 = hexf32!("0x1.fffffep-1");

pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

/// PCG pseudo-random number generator.
///
/// Each sampling thread owns its own generator; there is no shared state.
#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64
}

impl Rng {
    pub fn new(seed: u64) -> Rng {
        let mut rng = Rng::default();
        rng.set_sequence(seed);
        rng
    }

    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }

    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = (oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27) as u32;
        let rot: u32 = oldstate.wrapping_shr(59) as u32;
        // bitwise not in Rust is ! (not the ~ operator like in C)
        xorshifted.wrapping_shr(rot) | xorshifted.wrapping_shl((!rot).wrapping_add(1_u32) & 31)
    }

    /// A uniform value in `[0, 1)`.
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float)
            .min(ONE_MINUS_EPSILON)
    }

    /// A uniform value in `[low, high)`.
    pub fn uniform_range(&mut self, low: Float, high: Float) -> Float {
        low + (high - low) * self.uniform_float()
    }
}

impl Default for Rng {
    fn default() -> Rng {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_should_stay_in_unit_interval() {
        let mut rng = Rng::new(7);
        for _ in 0..10_000 {
            let u = rng.uniform_float();
            assert!(u >= 0.0 && u < 1.0);
        }
    }

    #[test]
    fn rng_should_be_deterministic_per_seed() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        let mut c = Rng::new(43);
        let sa: Vec<u32> = (0..8).map(|_| a.uniform_uint32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.uniform_uint32()).collect();
        let sc: Vec<u32> = (0..8).map(|_| c.uniform_uint32()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }
}
