//! Terminal output for rendered frames.
//!
//! Each frame is compared glyph by glyph with the one on screen. Changed glyphs
//! are grouped into [`Span`]s, one per run of a single style, so a token cell
//! such as `" let"` goes out as one cursor move and one print.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Attributes, Color, Colors, Print, ResetColor, SetAttribute, SetAttributes,
    SetColors,
};
use crossterm::terminal::{
    self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::fb::{CellStyle, FrameBuffer};
use crate::types::Rgb;

/// A horizontal run of changed glyphs sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub style: CellStyle,
    pub text: String,
}

/// Spans of `next` that differ from `shown`.
///
/// Without a previous frame of the same size every glyph counts as changed.
pub fn changed_spans(shown: Option<&FrameBuffer>, next: &FrameBuffer) -> Vec<Span> {
    let shown = shown.filter(|fb| same_size(fb, next));
    let mut spans = Vec::new();

    for y in 0..next.height() {
        let mut open: Option<Span> = None;
        for x in 0..next.width() {
            let glyph = next.get(x, y).unwrap_or_default();
            if shown.is_some_and(|fb| fb.get(x, y) == Some(glyph)) {
                spans.extend(open.take());
                continue;
            }
            match open.as_mut() {
                Some(span) if span.style == glyph.style => span.text.push(glyph.ch),
                _ => {
                    let span = Span {
                        x,
                        y,
                        style: glyph.style,
                        text: glyph.ch.to_string(),
                    };
                    spans.extend(open.replace(span));
                }
            }
        }
        spans.extend(open);
    }
    spans
}

/// Queue the commands that turn the `shown` screen into `next`.
///
/// A missing or differently sized `shown` frame clears the screen first.
pub fn encode_frame(
    shown: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut impl Write,
) -> Result<()> {
    if !shown.is_some_and(|fb| same_size(fb, next)) {
        queue!(out, Clear(ClearType::All))?;
    }

    let mut style = None;
    for span in changed_spans(shown, next) {
        queue!(out, MoveTo(span.x, span.y))?;
        if style != Some(span.style) {
            queue_style(out, span.style)?;
            style = Some(span.style);
        }
        queue!(out, Print(&span.text))?;
    }

    if style.is_some() {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    Ok(())
}

fn queue_style(out: &mut impl Write, style: CellStyle) -> Result<()> {
    let mut attributes = Attributes::default();
    if style.bold {
        attributes.set(Attribute::Bold);
    }
    if style.dim {
        attributes.set(Attribute::Dim);
    }
    // SGR reset clears colors as well, so it has to come first.
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetColors(Colors::new(term_color(style.fg), term_color(style.bg))),
        SetAttributes(attributes),
    )?;
    Ok(())
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Owns the terminal while a game is on screen.
///
/// [`TerminalRenderer::enter`] switches to raw mode and the alternate screen;
/// dropping the renderer switches back.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: Option<FrameBuffer>,
    scratch: Vec<u8>,
}

impl TerminalRenderer {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, DisableLineWrap)?;
        Ok(Self {
            stdout,
            shown: None,
            scratch: Vec::with_capacity(16 * 1024),
        })
    }

    /// Repaint everything on the next draw (after a resize, for instance).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Bring the screen up to date with `fb`.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.scratch.clear();
        encode_frame(self.shown.as_ref(), fb, &mut self.scratch)?;
        if !self.scratch.is_empty() {
            self.stdout.write_all(&self.scratch)?;
            self.stdout.flush()?;
        }

        match self.shown.as_mut() {
            Some(shown) => shown.clone_from(fb),
            None => self.shown = Some(fb.clone()),
        }
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            ResetColor,
            EnableLineWrap,
            Show,
            LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(0xf0, 0, 0);
    const CYAN: Rgb = Rgb::new(0, 0xf0, 0xf0);

    fn token_style(bg: Rgb) -> CellStyle {
        CellStyle::new(Rgb::new(0, 0, 0), bg).bold()
    }

    #[test]
    fn first_frame_covers_every_glyph() {
        let mut fb = FrameBuffer::new(8, 2);
        fb.put_str(0, 0, " use", token_style(RED));

        let spans = changed_spans(None, &fb);
        let total: usize = spans.iter().map(|span| span.text.chars().count()).sum();
        assert_eq!(total, 16);
        assert_eq!(spans[0].text, " use");
        assert_eq!(spans[0].style, token_style(RED));
        assert_eq!((spans[1].x, spans[1].y, spans[1].text.as_str()), (4, 0, "    "));
    }

    #[test]
    fn token_cell_is_one_span() {
        let before = FrameBuffer::new(12, 1);
        let mut after = before.clone();
        after.put_str(4, 0, " fn ", token_style(CYAN));

        assert_eq!(
            changed_spans(Some(&before), &after),
            vec![Span {
                x: 4,
                y: 0,
                style: token_style(CYAN),
                text: " fn ".to_string(),
            }]
        );
    }

    #[test]
    fn style_change_splits_a_run() {
        let before = FrameBuffer::new(8, 1);
        let mut after = before.clone();
        after.put_str(0, 0, " use", token_style(RED));
        after.put_str(4, 0, " fn ", token_style(CYAN));

        let spans = changed_spans(Some(&before), &after);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[1].x, spans[1].text.as_str()), (4, " fn "));
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut fb = FrameBuffer::new(6, 3);
        fb.put_str(1, 1, "let", token_style(RED));

        let mut out = Vec::new();
        encode_frame(Some(&fb), &fb.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn resized_frame_clears_and_repaints() {
        let small = FrameBuffer::new(4, 1);
        let mut big = FrameBuffer::new(6, 1);
        big.put_str(0, 0, "impl", token_style(RED));

        let mut out = Vec::new();
        encode_frame(Some(&small), &big, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("\x1b[2J"));
        assert!(text.contains("impl"));
        assert!(text.contains("38;2;0;0;0"));
        assert!(text.contains("48;2;240;0;0"));
    }
}
