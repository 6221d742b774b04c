//! Sprite loading.
//!
//! Artwork is optional. Whether each actor draws from a PNG or from
//! flat-color shapes is resolved once at startup, so the render loop never
//! checks the filesystem.

use std::path::Path;

/// Decoded RGBA image, row-major.
#[derive(Debug, Clone)]
pub struct Sprite {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Sprite {
    fn from_file(path: &Path) -> Option<Sprite> {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                Some(Sprite {
                    width: width as usize,
                    height: height as usize,
                    rgba: rgba.into_raw(),
                })
            }
            Err(e) => {
                eprintln!("flapjack: failed to load {:?}: {e}", path);
                None
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA at (x, y). Out-of-range reads are transparent black.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = (y * self.width + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

/// How one actor gets drawn: real artwork, or a flat-color stand-in.
#[derive(Debug, Clone)]
pub enum Art {
    Sprite(Sprite),
    Procedural,
}

impl Art {
    /// A missing file is the normal no-artwork case and stays quiet; a file
    /// that exists but will not decode is reported.
    fn load(path: &Path) -> Art {
        if !path.exists() {
            return Art::Procedural;
        }
        match Sprite::from_file(path) {
            Some(sprite) => Art::Sprite(sprite),
            None => Art::Procedural,
        }
    }
}

/// Artwork for the whole scene.
#[derive(Debug, Clone)]
pub struct Assets {
    pub bird: Art,
    pub pipe: Art,
}

impl Assets {
    pub fn load(dir: &Path) -> Assets {
        Assets {
            bird: Art::load(&dir.join("bird.png")),
            pipe: Art::load(&dir.join("pipe-green.png")),
        }
    }

    /// Flat-color fallback for everything.
    pub fn procedural() -> Assets {
        Assets {
            bird: Art::Procedural,
            pipe: Art::Procedural,
        }
    }
}
