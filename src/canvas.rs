use std::io;

use crate::entities::{Rect, Rgb, SpriteKey};

/// Drawing surface the driver renders into, in logical 800×400 pixels.
pub trait Canvas {
    fn fill(&mut self, color: Rgb) -> io::Result<()>;
    fn blit(&mut self, sprite: SpriteKey, dest: Rect) -> io::Result<()>;
    /// Draw `text` centred on `center`.  Surfaces that cannot smooth glyphs
    /// ignore `antialias`.
    fn text(&mut self, text: &str, color: Rgb, antialias: bool, center: (i32, i32))
        -> io::Result<()>;
    /// Show the finished frame.
    fn present(&mut self) -> io::Result<()>;
}
