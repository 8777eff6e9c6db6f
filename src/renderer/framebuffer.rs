//! Fixed-size RGBA software framebuffer
//!
//! Every frame is composed here on the CPU, then uploaded as a texture and
//! scaled with nearest-neighbor sampling.

/// One RGBA8 pixel
pub type Rgba = [u8; 4];

/// CPU-side RGBA8 surface
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes for texture upload, row-major, 4 bytes per pixel
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at (x, y), `None` outside the surface
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Opaque rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.width as usize;
        for row in y0..y1 {
            let start = row as usize * stride;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// Source-over blend of a translucent color (alpha 0-255)
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let alpha = u32::from(color[3]);
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.fill_rect(x, y, w, h, color);
            return;
        }

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        let inv = 255 - alpha;

        for row in y0..y1 {
            for col in x0..x1 {
                if let Some(i) = self.index(col, row) {
                    let dst = &mut self.pixels[i];
                    for c in 0..3 {
                        let mixed = u32::from(color[c]) * alpha + u32::from(dst[c]) * inv;
                        dst[c] = ((mixed + 127) / 255) as u8;
                    }
                }
            }
        }
    }

    /// Solid triangle, pixel centers tested against the three edges
    pub fn fill_triangle(&mut self, v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), color: Rgba) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min((self.width - 1) as f32) as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min((self.height - 1) as f32) as i32;
        if min_x > max_x || min_y > max_y {
            return;
        }

        let area = edge_function(v0, v1, v2);
        if area == 0.0 {
            return;
        }

        for y in min_y..=max_y {
            let py = y as f32 + 0.5;
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, py);
                let w0 = edge_function(v1, v2, p) / area;
                let w1 = edge_function(v2, v0, p) / area;
                let w2 = 1.0 - w0 - w1;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Scale an RGBA image into the destination box with nearest sampling
    ///
    /// Texels with alpha below 128 are skipped.
    pub fn blit_nearest(
        &mut self,
        src: &[Rgba],
        src_w: u32,
        src_h: u32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) {
        if src_w == 0 || src_h == 0 || w <= 0 || h <= 0 {
            return;
        }
        if src.len() < (src_w * src_h) as usize {
            return;
        }

        for dy in 0..h {
            let sy = (dy as u32 * src_h / h as u32).min(src_h - 1);
            for dx in 0..w {
                let sx = (dx as u32 * src_w / w as u32).min(src_w - 1);
                let texel = src[(sy * src_w + sx) as usize];
                if texel[3] >= 128 {
                    self.set(x + dx, y + dy, [texel[0], texel[1], texel[2], 255]);
                }
            }
        }
    }
}

#[inline(always)]
fn edge_function(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (p.0 - a.0).mul_add(b.1 - a.1, -((p.1 - a.1) * (b.0 - a.0)))
}
