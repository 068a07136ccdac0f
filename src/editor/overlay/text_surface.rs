//! The editable text surface hosted by the overlay.

use bevy::math::Vec2;

use crate::constants::TEXT_CONTAINER_INSET;

/// What the overlay needs from a text surface.
///
/// Real hosts back this with their text widget; [`ApproxTextSurface`] is a
/// measurement-only stand-in good enough for bounds fitting.
pub trait TextSurface: Send + Sync {
    fn text(&self) -> &str;

    fn set_text(&mut self, text: &str);

    fn set_font_size(&mut self, font_size: f32);

    /// Size the surface wants when wrapped to at most `max_width`
    fn size_that_fits(&self, max_width: f32) -> Vec2;

    /// True while an input method is composing; the text must not be reset
    /// under it.
    fn has_marked_text(&self) -> bool {
        false
    }
}

/// Greedy word-wrapping measurer with a fixed advance per character.
///
/// ASCII glyphs take half the font size, everything else (emoji, CJK) a full
/// em. Lines are 1.2 em tall. Surrounded by the text container inset.
#[derive(Debug, Clone)]
pub struct ApproxTextSurface {
    text: String,
    font_size: f32,
    inset: f32,
}

impl Default for ApproxTextSurface {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            inset: TEXT_CONTAINER_INSET,
        }
    }
}

impl ApproxTextSurface {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            ..Default::default()
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    fn advance(&self, c: char) -> f32 {
        if c.is_ascii() {
            self.font_size * 0.5
        } else {
            self.font_size
        }
    }

    fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    fn word_width(&self, word: &str) -> f32 {
        word.chars().map(|c| self.advance(c)).sum()
    }

    /// Widths of the wrapped lines for one paragraph
    fn wrap_paragraph(&self, paragraph: &str, available: f32, lines: &mut Vec<f32>) {
        let space = self.advance(' ');
        let mut current = 0.0_f32;
        let mut line_has_content = false;

        for word in paragraph.split(' ') {
            let width = self.word_width(word);
            let needed = if line_has_content { space + width } else { width };

            if line_has_content && current + needed > available {
                lines.push(current);
                current = 0.0;
                line_has_content = false;
            }

            if !line_has_content && width > available {
                // Break an overlong word across lines, one glyph at a time
                for c in word.chars() {
                    let advance = self.advance(c);
                    if current > 0.0 && current + advance > available {
                        lines.push(current);
                        current = 0.0;
                    }
                    current += advance;
                }
                line_has_content = true;
                continue;
            }

            current += if line_has_content { space + width } else { width };
            line_has_content = true;
        }
        lines.push(current);
    }
}

impl TextSurface for ApproxTextSurface {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
    }

    fn size_that_fits(&self, max_width: f32) -> Vec2 {
        let available = (max_width - self.inset * 2.0).max(0.0);
        let mut lines = Vec::new();
        for paragraph in self.text.split('\n') {
            self.wrap_paragraph(paragraph, available, &mut lines);
        }

        let widest = lines.iter().copied().fold(0.0_f32, f32::max);
        Vec2::new(
            widest + self.inset * 2.0,
            lines.len() as f32 * self.line_height() + self.inset * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(text: &str) -> ApproxTextSurface {
        let mut surface = ApproxTextSurface::new(20.0);
        surface.set_text(text);
        surface
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let size = surface("").size_that_fits(300.0);
        assert_eq!(size, Vec2::new(10.0, 24.0 + 10.0));
    }

    #[test]
    fn test_short_text_fits_on_one_line() {
        // 5 glyphs at 10 each, plus the inset on both sides
        let size = surface("hello").size_that_fits(300.0);
        assert_eq!(size, Vec2::new(60.0, 34.0));
    }

    #[test]
    fn test_wraps_at_max_width() {
        // "hello world" is 110 wide; 80 leaves 70 for glyphs
        let size = surface("hello world").size_that_fits(80.0);
        assert_eq!(size.y, 2.0 * 24.0 + 10.0);
        assert_eq!(size.x, 60.0);
    }

    #[test]
    fn test_newlines_start_paragraphs() {
        let size = surface("a\nb\nc").size_that_fits(300.0);
        assert_eq!(size.y, 3.0 * 24.0 + 10.0);
    }

    #[test]
    fn test_emoji_are_full_width() {
        let size = surface("🎉🎉").size_that_fits(300.0);
        assert_eq!(size.x, 40.0 + 10.0);
    }

    #[test]
    fn test_long_word_breaks() {
        let size = surface("abcdefghij").size_that_fits(60.0);
        assert_eq!(size.y, 2.0 * 24.0 + 10.0);
        assert!(size.x <= 60.0);
    }
}
