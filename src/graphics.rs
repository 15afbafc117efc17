//! Drawing primitives on top of single pixel access.
//!
//! Every primitive goes through [`Canvas::draw_pixel`], which silently drops
//! pixels outside the canvas. Shapes may therefore extend past the edges or
//! start at negative coordinates, which is handy for scrolling effects.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::font::Font;
use crate::font::FONT_4X6;
use crate::Color;

/// A monochrome surface with clipped pixel access.
pub trait Canvas {
    /// Width in pixels.
    fn width(&self) -> i32;

    /// Height in pixels.
    fn height(&self) -> i32;

    /// Set the pixel at `(x, y)` to `color`. Out of range coordinates are
    /// ignored.
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Read the pixel at `(x, y)`. Out of range coordinates read as off.
    fn get_pixel(&self, x: i32, y: i32) -> Color;

    fn set_pixel(&mut self, x: i32, y: i32) {
        self.draw_pixel(x, y, BinaryColor::On);
    }

    fn clear_pixel(&mut self, x: i32, y: i32) {
        self.draw_pixel(x, y, BinaryColor::Off);
    }

    /// Draw a line from `(x1, y1)` to `(x2, y2)`, both end points included.
    ///
    /// Integer Bresenham with a separate loop for each of the four slope
    /// ranges, plus fast paths for vertical and horizontal lines.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        line(self, x1.into(), y1.into(), x2.into(), y2.into(), color);
    }

    /// Outline of the `w` x `h` rectangle with its top left corner at `(x, y)`.
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let right = x + i64::from(w) - 1;
        let bottom = y + i64::from(h) - 1;
        line(self, x, y, right, y, color);
        line(self, x, bottom, right, bottom, color);
        line(self, x, y, x, bottom, color);
        line(self, right, y, right, bottom, color);
    }

    /// Every pixel in `[x, x + w) x [y, y + h)`.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x, y) = (i64::from(x), i64::from(y));
        let x_end = (x + i64::from(w)).min(self.width().into());
        let y_end = (y + i64::from(h)).min(self.height().into());
        for i in x.max(0)..x_end {
            for j in y.max(0)..y_end {
                plot(self, i, j, color);
            }
        }
    }

    /// Midpoint circle outline of radius `r` around `(x0, y0)`.
    fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        if r < 0 || !circle_visible(self, x0, y0, r) {
            return;
        }
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        // past this, every point of the remaining octants lies off the canvas
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        let reach = x0.max(w - 1 - x0).max(y0).max(h - 1 - y0);

        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        plot(self, x0, y0 + r, color);
        plot(self, x0, y0 - r, color);
        plot(self, x0 + r, y0, color);
        plot(self, x0 - r, y0, color);

        while x < y && x <= reach {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            plot(self, x0 + x, y0 + y, color);
            plot(self, x0 - x, y0 + y, color);
            plot(self, x0 + x, y0 - y, color);
            plot(self, x0 - x, y0 - y, color);
            plot(self, x0 + y, y0 + x, color);
            plot(self, x0 - y, y0 + x, color);
            plot(self, x0 + y, y0 - x, color);
            plot(self, x0 - y, y0 - x, color);
        }
    }

    /// Filled disc of radius `r` around `(x0, y0)`.
    ///
    /// Runs the same decision variable as [`Canvas::draw_circle`] but emits a
    /// vertical span per symmetric column instead of single points.
    fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) {
        if r < 0 || !circle_visible(self, x0, y0, r) {
            return;
        }
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        line(self, x0, y0 - r, x0, y0 + r, color);

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            line(self, x0 + x, y0 - y, x0 + x, y0 + y, color);
            line(self, x0 - x, y0 - y, x0 - x, y0 + y, color);
            line(self, x0 + y, y0 - x, x0 + y, y0 + x, color);
            line(self, x0 - y, y0 - x, x0 - y, y0 + x, color);
        }
    }

    /// Draw `c` with its top left corner at `(x, y)` using [`FONT_4X6`].
    fn draw_char(&mut self, x: i32, y: i32, c: char, color: Color) {
        self.draw_char_with(x, y, c, color, &FONT_4X6);
    }

    /// Draw `c` with `font`. Characters the font has no glyph for draw
    /// nothing. Only set glyph pixels are written.
    fn draw_char_with(&mut self, x: i32, y: i32, c: char, color: Color, font: &Font<'_>) {
        glyph(self, x.into(), y.into(), c, color, font);
    }

    /// Draw `text` starting at `(x, y)` using [`FONT_4X6`].
    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
        self.draw_string_with(x, y, text, color, &FONT_4X6);
    }

    /// Draw `text` with `font`, advancing one glyph width per character. A
    /// `'\n'` moves back to `x` and down one glyph height. There is no
    /// wrapping at the canvas edge.
    fn draw_string_with(&mut self, x: i32, y: i32, text: &str, color: Color, font: &Font<'_>) {
        let advance = font.width() as i64;
        let line_height = font.height() as i64;
        let (x, y) = (i64::from(x), i64::from(y));
        let (mut cursor_x, mut cursor_y) = (x, y);
        for c in text.chars() {
            if c == '\n' {
                cursor_x = x;
                cursor_y += line_height;
                continue;
            }
            glyph(self, cursor_x, cursor_y, c, color, font);
            cursor_x += advance;
        }
    }

    /// Scroll the whole canvas down by one pixel. The top row is cleared.
    fn animate_down(&mut self) {
        // bottom up, so every source row is read before it is overwritten
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                let pixel = self.get_pixel(x, y - 1);
                self.draw_pixel(x, y, pixel);
            }
        }
    }
}

// The primitives below work in i64 so corner and span arithmetic on any pair
// of i32 inputs cannot overflow. Only on-canvas pixels reach `draw_pixel`.

fn plot<C: Canvas + ?Sized>(canvas: &mut C, x: i64, y: i64, color: Color) {
    let on_canvas = (0..i64::from(canvas.width())).contains(&x)
        && (0..i64::from(canvas.height())).contains(&y);
    if on_canvas {
        canvas.draw_pixel(x as i32, y as i32, color);
    }
}

/// Whether the bounding box of a circle overlaps the canvas.
fn circle_visible<C: Canvas + ?Sized>(canvas: &C, x0: i32, y0: i32, r: i32) -> bool {
    let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
    x0 + r >= 0
        && y0 + r >= 0
        && x0 - r < i64::from(canvas.width())
        && y0 - r < i64::from(canvas.height())
}

fn line<C: Canvas + ?Sized>(
    canvas: &mut C,
    mut x1: i64,
    mut y1: i64,
    mut x2: i64,
    mut y2: i64,
    color: Color,
) {
    // always walk left to right
    if x1 > x2 {
        core::mem::swap(&mut x1, &mut x2);
        core::mem::swap(&mut y1, &mut y2);
    }

    let right = i64::from(canvas.width()) - 1;
    let bottom = i64::from(canvas.height()) - 1;
    if x2 < 0 || x1 > right || y1.max(y2) < 0 || y1.min(y2) > bottom {
        return;
    }

    if x1 == x2 {
        for y in y1.min(y2).max(0)..=y1.max(y2).min(bottom) {
            plot(canvas, x1, y, color);
        }
        return;
    }
    if y1 == y2 {
        for x in x1.max(0)..=x2.min(right) {
            plot(canvas, x, y1, color);
        }
        return;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let dx2 = dx << 1;
    let dy2 = dy << 1;
    let dy2_minus_dx2 = dy2 - dx2;
    let dy2_plus_dx2 = dy2 + dx2;

    // the walk stops where it leaves the canvas for good
    let (mut x, mut y) = (x1, y1);
    if dy >= 0 {
        if dy <= dx {
            // 0 <= m <= 1
            let mut f = dy2 - dx;
            while x <= x2.min(right) {
                plot(canvas, x, y, color);
                if f <= 0 {
                    f += dy2;
                } else {
                    y += 1;
                    f += dy2_minus_dx2;
                }
                x += 1;
            }
        } else {
            // 1 < m, x and y trade places
            let mut f = dx2 - dy;
            while y <= y2.min(bottom) {
                plot(canvas, x, y, color);
                if f <= 0 {
                    f += dx2;
                } else {
                    x += 1;
                    f -= dy2_minus_dx2;
                }
                y += 1;
            }
        }
    } else if dx >= -dy {
        // -1 <= m < 0
        let mut f = -dy2 - dx;
        while x <= x2.min(right) {
            plot(canvas, x, y, color);
            if f <= 0 {
                f -= dy2;
            } else {
                y -= 1;
                f -= dy2_plus_dx2;
            }
            x += 1;
        }
    } else {
        // m < -1
        let mut f = dx2 + dy;
        while y >= y2.max(0) {
            plot(canvas, x, y, color);
            if f <= 0 {
                f += dx2;
            } else {
                x += 1;
                f += dy2_plus_dx2;
            }
            y -= 1;
        }
    }
}

fn glyph<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i64,
    y: i64,
    c: char,
    color: Color,
    font: &Font<'_>,
) {
    let Some(columns) = font.glyph(c) else {
        return;
    };
    for (dx, column) in columns.iter().enumerate() {
        for dy in 0..font.height() {
            if font.is_set(*column, dy) {
                plot(canvas, x + dx as i64, y + dy as i64, color);
            }
        }
    }
}
