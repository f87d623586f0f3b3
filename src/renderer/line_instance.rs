use glam::Vec3;

/// Packs an RGB color with components in [0, 1] into 8 bits per channel, red in the low byte.
#[inline]
pub fn pack_color(color: Vec3) -> u32 {
    let scaled = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    (scaled.x as u32) | ((scaled.y as u32) << 8) | ((scaled.z as u32) << 16)
}

/// Inverse of [`pack_color`], up to quantization.
#[inline]
pub fn unpack_color(packed: u32) -> Vec3 {
    Vec3::new(
        (packed & 0xFF) as f32,
        ((packed >> 8) & 0xFF) as f32,
        ((packed >> 16) & 0xFF) as f32,
    ) / 255.0
}

/// GPU-side layout of a debug line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInstance {
    pub start: Vec3,
    pub packed_color: u32,
    pub end: Vec3,
    pub packed_background_color: u32,
}

impl LineInstance {
    #[inline]
    pub fn new(start: Vec3, end: Vec3, color: Vec3, background_color: Vec3) -> Self {
        Self {
            start,
            packed_color: pack_color(color),
            end,
            packed_background_color: pack_color(background_color),
        }
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        unpack_color(self.packed_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_pack_per_channel() {
        assert_eq!(pack_color(Vec3::new(1.0, 0.0, 0.0)), 0x0000FF);
        assert_eq!(pack_color(Vec3::new(0.0, 1.0, 0.0)), 0x00FF00);
        assert_eq!(pack_color(Vec3::new(2.0, -1.0, 1.0)), 0xFF00FF);
        let color = Vec3::new(0.2, 0.4, 0.8);
        assert!(unpack_color(pack_color(color)).abs_diff_eq(color, 1.0 / 255.0));
    }

    #[test]
    fn layout_is_two_vec4s() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 32);
    }
}
