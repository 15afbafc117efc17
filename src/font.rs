//! Bitmap fonts for [`Canvas::draw_char`](crate::graphics::Canvas::draw_char).
//!
//! Glyphs are stored column by column, one byte per column. Within a column
//! byte, bit `height - 1` is the top row and bit 0 the bottom row.

/// A fixed cell size bitmap font covering a contiguous range of character
/// codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font<'a> {
    width: usize,
    height: usize,
    first: u8,
    glyphs: &'a [u8],
}

impl<'a> Font<'a> {
    /// `glyphs` holds `width` column bytes per character, starting at
    /// character code `first`. `height` must not exceed 8.
    pub const fn new(width: usize, height: usize, first: u8, glyphs: &'a [u8]) -> Self {
        assert!(height > 0 && height <= 8);
        assert!(width > 0);
        Self {
            width,
            height,
            first,
            glyphs,
        }
    }

    /// Glyph cell width, also the cursor advance per character.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Glyph cell height, also the line advance.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Column bytes for `c`, `None` if the font has no glyph for it.
    pub fn glyph(&self, c: char) -> Option<&'a [u8]> {
        let index = (c as u32).checked_sub(self.first as u32)? as usize;
        let start = index.checked_mul(self.width)?;
        self.glyphs.get(start..start + self.width)
    }

    /// Whether the pixel at `row` (0 is the top) of a glyph column is set.
    pub const fn is_set(&self, column: u8, row: usize) -> bool {
        row < self.height && column & (1 << (self.height - 1 - row)) != 0
    }
}

/// 4x6 font for printable ASCII (`' '..='~'`). Glyphs are 3x5 with one blank
/// column and row for spacing.
pub const FONT_4X6: Font<'static> = Font::new(4, 6, b' ', &FONT_4X6_GLYPHS);

#[rustfmt::skip]
const FONT_4X6_GLYPHS: [u8; 95 * 4] = [
    0x00, 0x00, 0x00, 0x00, // ' '
    0x00, 0x3a, 0x00, 0x00, // '!'
    0x30, 0x00, 0x30, 0x00, // '"'
    0x3e, 0x14, 0x3e, 0x00, // '#'
    0x12, 0x3e, 0x24, 0x00, // '$'
    0x26, 0x08, 0x32, 0x00, // '%'
    0x14, 0x2a, 0x16, 0x00, // '&'
    0x00, 0x30, 0x00, 0x00, // '\''
    0x00, 0x1c, 0x22, 0x00, // '('
    0x22, 0x1c, 0x00, 0x00, // ')'
    0x28, 0x10, 0x28, 0x00, // '*'
    0x08, 0x1c, 0x08, 0x00, // '+'
    0x02, 0x04, 0x00, 0x00, // ','
    0x08, 0x08, 0x08, 0x00, // '-'
    0x00, 0x02, 0x00, 0x00, // '.'
    0x06, 0x08, 0x30, 0x00, // '/'
    0x3e, 0x22, 0x3e, 0x00, // '0'
    0x12, 0x3e, 0x02, 0x00, // '1'
    0x2e, 0x2a, 0x3a, 0x00, // '2'
    0x22, 0x2a, 0x3e, 0x00, // '3'
    0x38, 0x08, 0x3e, 0x00, // '4'
    0x3a, 0x2a, 0x2e, 0x00, // '5'
    0x3e, 0x2a, 0x2e, 0x00, // '6'
    0x20, 0x2e, 0x30, 0x00, // '7'
    0x3e, 0x2a, 0x3e, 0x00, // '8'
    0x3a, 0x2a, 0x3e, 0x00, // '9'
    0x00, 0x14, 0x00, 0x00, // ':'
    0x02, 0x14, 0x00, 0x00, // ';'
    0x08, 0x14, 0x22, 0x00, // '<'
    0x14, 0x14, 0x14, 0x00, // '='
    0x22, 0x14, 0x08, 0x00, // '>'
    0x20, 0x2a, 0x30, 0x00, // '?'
    0x3e, 0x2a, 0x3a, 0x00, // '@'
    0x1e, 0x28, 0x1e, 0x00, // 'A'
    0x3e, 0x2a, 0x14, 0x00, // 'B'
    0x1c, 0x22, 0x22, 0x00, // 'C'
    0x3e, 0x22, 0x1c, 0x00, // 'D'
    0x3e, 0x2a, 0x2a, 0x00, // 'E'
    0x3e, 0x28, 0x28, 0x00, // 'F'
    0x1c, 0x22, 0x2e, 0x00, // 'G'
    0x3e, 0x08, 0x3e, 0x00, // 'H'
    0x22, 0x3e, 0x22, 0x00, // 'I'
    0x04, 0x02, 0x3c, 0x00, // 'J'
    0x3e, 0x08, 0x36, 0x00, // 'K'
    0x3e, 0x02, 0x02, 0x00, // 'L'
    0x3e, 0x18, 0x3e, 0x00, // 'M'
    0x3e, 0x1c, 0x3e, 0x00, // 'N'
    0x1c, 0x22, 0x1c, 0x00, // 'O'
    0x3e, 0x28, 0x10, 0x00, // 'P'
    0x1c, 0x26, 0x1e, 0x00, // 'Q'
    0x3e, 0x28, 0x16, 0x00, // 'R'
    0x12, 0x2a, 0x24, 0x00, // 'S'
    0x20, 0x3e, 0x20, 0x00, // 'T'
    0x3c, 0x02, 0x3e, 0x00, // 'U'
    0x38, 0x06, 0x38, 0x00, // 'V'
    0x3e, 0x0c, 0x3e, 0x00, // 'W'
    0x36, 0x08, 0x36, 0x00, // 'X'
    0x30, 0x0e, 0x30, 0x00, // 'Y'
    0x26, 0x2a, 0x32, 0x00, // 'Z'
    0x3e, 0x22, 0x22, 0x00, // '['
    0x30, 0x08, 0x06, 0x00, // '\\'
    0x22, 0x22, 0x3e, 0x00, // ']'
    0x10, 0x20, 0x10, 0x00, // '^'
    0x02, 0x02, 0x02, 0x00, // '_'
    0x20, 0x10, 0x00, 0x00, // '`'
    0x16, 0x1a, 0x0e, 0x00, // 'a'
    0x3e, 0x12, 0x0c, 0x00, // 'b'
    0x0c, 0x12, 0x12, 0x00, // 'c'
    0x0c, 0x12, 0x3e, 0x00, // 'd'
    0x0c, 0x16, 0x1a, 0x00, // 'e'
    0x08, 0x1e, 0x28, 0x00, // 'f'
    0x0a, 0x16, 0x1c, 0x00, // 'g'
    0x3e, 0x10, 0x0e, 0x00, // 'h'
    0x00, 0x2e, 0x00, 0x00, // 'i'
    0x04, 0x02, 0x2c, 0x00, // 'j'
    0x3e, 0x0c, 0x12, 0x00, // 'k'
    0x22, 0x3e, 0x02, 0x00, // 'l'
    0x1e, 0x1c, 0x1e, 0x00, // 'm'
    0x1e, 0x10, 0x0e, 0x00, // 'n'
    0x0c, 0x12, 0x0c, 0x00, // 'o'
    0x1e, 0x14, 0x08, 0x00, // 'p'
    0x08, 0x14, 0x1e, 0x00, // 'q'
    0x0e, 0x10, 0x10, 0x00, // 'r'
    0x0a, 0x1e, 0x14, 0x00, // 's'
    0x10, 0x3e, 0x12, 0x00, // 't'
    0x1c, 0x02, 0x1e, 0x00, // 'u'
    0x18, 0x06, 0x18, 0x00, // 'v'
    0x1e, 0x0e, 0x1e, 0x00, // 'w'
    0x12, 0x0c, 0x12, 0x00, // 'x'
    0x1a, 0x06, 0x1c, 0x00, // 'y'
    0x16, 0x1e, 0x1a, 0x00, // 'z'
    0x08, 0x3e, 0x22, 0x00, // '{'
    0x00, 0x3e, 0x00, 0x00, // '|'
    0x22, 0x3e, 0x08, 0x00, // '}'
    0x10, 0x18, 0x08, 0x00, // '~'
];
