use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::Fractal;

/// One seeded noise source plus the octave settings and world offset it is
/// sampled with. Samples are normalized into `[0, 1]`.
pub(crate) struct NoiseField {
    noise: FastNoiseLite,
    fractal: Fractal,
    offset_x: i32,
    offset_z: i32,
}

impl NoiseField {
    pub(crate) fn new(
        seed: i32,
        salt: i32,
        fractal: &Fractal,
        offset_x: i32,
        offset_z: i32,
    ) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed ^ salt);
        noise.set_noise_type(Some(NoiseType::Value));
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            fractal: fractal.clone(),
            offset_x,
            offset_z,
        }
    }

    /// Octave sum over a 2D plane, normalized by the total amplitude.
    pub(crate) fn octave2(&self, x: f32, y: f32) -> f32 {
        let mut amp = 1.0_f32;
        let mut freq = 1.0_f32;
        let mut sum = 0.0_f32;
        let mut max_amp = 0.0_f32;
        for _ in 0..self.fractal.octaves.max(1) {
            let n = self.noise.get_noise_2d(x * freq, y * freq) * 0.5 + 0.5;
            sum += n * amp;
            max_amp += amp;
            amp *= self.fractal.persistence;
            freq *= self.fractal.lacunarity;
        }
        let v = if max_amp > 0.0 { sum / max_amp } else { sum };
        v.clamp(0.0, 1.0)
    }

    /// Column sample at world `(wx, wz)`.
    pub(crate) fn sample2(&self, wx: i32, wz: i32) -> f32 {
        let s = self.fractal.scale;
        self.octave2(
            shifted(wx, self.offset_x) * s,
            shifted(wz, self.offset_z) * s,
        )
    }

    /// Volumetric approximation: mean of three orthogonal 2D planes.
    pub(crate) fn sample3(&self, wx: i32, wy: i32, wz: i32) -> f32 {
        let s = self.fractal.scale;
        let x = shifted(wx, self.offset_x) * s;
        let y = wy as f32 * s;
        let z = shifted(wz, self.offset_z) * s;
        let xy = self.octave2(x, y);
        let xz = self.octave2(x + 100.0, z + 100.0);
        let yz = self.octave2(y + 200.0, z + 200.0);
        (xy + xz + yz) / 3.0
    }
}

#[inline]
fn shifted(w: i32, offset: i32) -> f32 {
    (i64::from(w) + i64::from(offset)) as f32
}
