//! Frame rendering.
//!
//! [`render`] is a pure function of a [`PromptView`] and the terminal size.
//! It produces styled lines that never exceed the terminal width, inside a
//! rounded box whose title is the prompt label:
//!
//! ```text
//!  ╭ Which user should receive the email? ─────────────────────╮
//!  │ abcde                                                      │
//!  │ › ◼ User 5                                               ┃ │
//!  │   ◻ User 6                                               │ │
//!  │   ◻ User 7                                               │ │
//!  ╰────────────────────────────────────────────────────────────╯
//! ```

use std::borrow::Cow;

use ratatui::style::Style;
use ratatui::symbols::border;
use ratatui::text::{Line, Span, Text};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::prompt::{PromptPhase, PromptView};
use crate::scroll::ScrollState;
use crate::theme::Theme;

/// Columns taken by the box around label and body lines.
const BOX_DECORATION: usize = 6;
/// Columns taken by the box and the row marker around an option label.
const OPTION_DECORATION: usize = 10;
/// Extra columns taken by the scrollbar on option rows.
const SCROLLBAR_WIDTH: usize = 2;
/// Lines of the terminal kept free of the scroll window.
const RESERVED_LINES: u16 = 7;
/// Preferred minimum width of the box body.
const MIN_BOX_WIDTH: usize = 60;

const ELLIPSIS: &str = "…";
const WARNING_GLYPH: &str = "⚠";

/// Terminal dimensions supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub lines: u16,
}

impl Viewport {
    pub fn new(cols: u16, lines: u16) -> Self {
        Self { cols, lines }
    }

    /// Rows of the scroll window for a configured size: bounded by the
    /// terminal height minus the reserved lines, never below one.
    pub fn scroll_rows(&self, configured: usize) -> usize {
        configured
            .min(self.lines.saturating_sub(RESERVED_LINES) as usize)
            .max(1)
    }

    /// Max width of label and body lines.
    fn body_width(&self) -> usize {
        (self.cols as usize).saturating_sub(BOX_DECORATION)
    }
}

/// Renders prompt views with a theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    theme: Theme,
}

/// Render with the default theme.
pub fn render(view: &PromptView<'_>, viewport: Viewport) -> Text<'static> {
    Renderer::default().render(view, viewport)
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, view: &PromptView<'_>, viewport: Viewport) -> Text<'static> {
        assert!(
            view.highlight.is_within(view.matches.len()),
            "highlight {:?} outside match set of {}",
            view.highlight.index(),
            view.matches.len()
        );

        let max_width = viewport.body_width();
        let t = &self.theme;

        let lines = match view.phase {
            PromptPhase::Submit => {
                let title = styled(truncate(view.label, max_width), t.muted());
                self.boxed(title, self.selected_options(view, max_width), t.muted(), max_width)
            }
            PromptPhase::Cancel => {
                let title = styled(truncate(view.label, max_width), t.muted());
                let text = if view.input.is_empty() {
                    view.placeholder
                } else {
                    view.input.value()
                };
                let body = vec![styled(truncate(text, max_width), t.cancelled())];
                let mut lines = self.boxed(title, body, t.error(), max_width);
                lines.push(self.footer("Cancelled.", t.error(), viewport));
                lines
            }
            PromptPhase::Error => {
                let title = styled(truncate(view.label, max_width), t.text());
                let mut body = vec![self.value_with_cursor(view, max_width)];
                body.extend(self.options(view, viewport));
                let mut lines = self.boxed(title, body, t.warning(), max_width);
                lines.push(self.footer(view.error.unwrap_or_default(), t.warning(), viewport));
                lines
            }
            PromptPhase::Searching => {
                let title = styled(truncate(view.label, max_width), t.accent());
                let mut body = vec![self.value_with_search_glyph(view, max_width)];
                let options = self.options(view, viewport);
                let visible = options.len();
                body.extend(options);
                let mut lines = self.boxed(title, body, t.muted(), max_width);
                lines.extend(self.dropdown_spacer(view, viewport, visible));
                lines
            }
            PromptPhase::Active => {
                let title = styled(truncate(view.label, max_width), t.accent());
                let mut body = vec![self.value_with_cursor(view, max_width)];
                let options = self.options(view, viewport);
                let visible = options.len();
                body.extend(options);
                let mut lines = self.boxed(title, body, t.muted(), max_width);
                lines.extend(self.dropdown_spacer(view, viewport, visible));
                // Room for a validation message
                lines.push(Line::default());
                lines
            }
        };

        Text::from(lines)
    }

    /// Query line: text with a virtual cursor, or the muted placeholder.
    ///
    /// While a candidate is highlighted the cursor is hidden.
    fn value_with_cursor(&self, view: &PromptView<'_>, max_width: usize) -> Line<'static> {
        let t = &self.theme;

        if !view.highlight.is_none() {
            return if view.input.is_empty() {
                styled(truncate(view.placeholder, max_width), t.muted())
            } else {
                styled(truncate(view.input.value(), max_width), t.text())
            };
        }

        if view.input.is_empty() {
            let mut graphemes = view.placeholder.graphemes(true);
            let first = graphemes.next().unwrap_or(" ");
            let rest = truncate(
                graphemes.as_str(),
                max_width.saturating_sub(first.width().max(1)),
            );
            return Line::from(vec![
                Span::styled(first.to_string(), t.cursor(t.muted())),
                Span::styled(rest, t.muted()),
            ]);
        }

        let (before, under, after) = view.input.split_at_cursor();
        cursor_line(before, under.unwrap_or(" "), after, max_width, t)
    }

    /// Query line while searching: padded towards the widest known match and
    /// ended with an accented ellipsis.
    fn value_with_search_glyph(&self, view: &PromptView<'_>, max_width: usize) -> Line<'static> {
        let mut line = self.value_with_cursor(view, max_width.saturating_sub(1));
        let current = line.width();
        let target = longest(view.matches.iter().map(|c| c.label.as_str()), 2)
            .max(current + 2)
            .min(max_width);
        pad(&mut line, target.saturating_sub(1));
        line.push_span(Span::styled(ELLIPSIS, self.theme.accent()));
        line
    }

    /// The option list: a status line, or the scroll window of matches.
    fn options(&self, view: &PromptView<'_>, viewport: Viewport) -> Vec<Line<'static>> {
        let t = &self.theme;

        if view.matches.is_empty() {
            if view.input.is_empty() {
                return Vec::new();
            }
            let status = if view.phase == PromptPhase::Searching {
                "Searching..."
            } else {
                "No results."
            };
            return vec![styled(format!("  {status}"), t.muted())];
        }

        let total = view.matches.len();
        let mut scroll = ScrollState::new(total, viewport.scroll_rows(view.scroll_rows));
        scroll.set_offset(view.scroll_offset);
        if let Some(index) = view.highlight.index() {
            scroll.ensure_visible(index);
        }

        let scrollbar = scroll.needs_scrollbar();
        let label_width = (viewport.cols as usize)
            .saturating_sub(OPTION_DECORATION + if scrollbar { SCROLLBAR_WIDTH } else { 0 });
        // Thumb column sits on the right edge of a minimum-width box
        let row_width = longest(view.matches.iter().map(|c| c.label.as_str()), 4)
            .max(MIN_BOX_WIDTH)
            .min(viewport.body_width());
        let thumb = scroll.thumb_row();

        scroll
            .visible_range()
            .enumerate()
            .filter_map(|(row, index)| {
                let candidate = view.matches.get(index)?;
                let label = truncate(&candidate.label, label_width);
                let active = view.highlight.index() == Some(index);
                let selected = view.selection.contains(&candidate.id);

                let mut line = match (active, selected) {
                    (true, true) => Line::from(vec![
                        Span::styled("› ◼", t.accent()),
                        Span::raw(" "),
                        Span::styled(label, t.text()),
                    ]),
                    (true, false) => Line::from(vec![
                        Span::styled("›", t.accent()),
                        Span::raw(" ◻ "),
                        Span::styled(label, t.text()),
                    ]),
                    (false, true) => Line::from(vec![
                        Span::raw("  "),
                        Span::styled("◼", t.muted()),
                        Span::raw(" "),
                        Span::styled(label, t.muted()),
                    ]),
                    (false, false) => Line::from(vec![
                        Span::raw("  "),
                        Span::styled("◻", t.muted()),
                        Span::raw(" "),
                        Span::styled(label, t.muted()),
                    ]),
                };

                if scrollbar {
                    pad(&mut line, row_width.saturating_sub(1));
                    let glyph = if thumb == Some(row) {
                        Span::styled("┃", t.accent())
                    } else {
                        Span::styled("│", t.muted())
                    };
                    line.push_span(glyph);
                }
                Some(line)
            })
            .collect()
    }

    /// Blank lines keeping the frame height constant while the query is empty
    /// and no dropdown is shown.
    fn dropdown_spacer(
        &self,
        view: &PromptView<'_>,
        viewport: Viewport,
        visible: usize,
    ) -> Vec<Line<'static>> {
        if !view.input.is_empty() {
            return Vec::new();
        }
        let rows = viewport.scroll_rows(view.scroll_rows).saturating_sub(visible);
        vec![Line::default(); rows]
    }

    /// Body of the submitted frame.
    fn selected_options(&self, view: &PromptView<'_>, max_width: usize) -> Vec<Line<'static>> {
        let labels = view.selection.display_labels(view.matches);
        if labels.is_empty() {
            return vec![styled("None", self.theme.muted())];
        }
        labels
            .into_iter()
            .map(|label| styled(truncate(label, max_width), self.theme.text()))
            .collect()
    }

    /// Warning or error line below the box.
    fn footer(&self, message: &str, style: Style, viewport: Viewport) -> Line<'static> {
        let max = (viewport.cols as usize).saturating_sub(BOX_DECORATION - 1);
        styled(truncate(&format!("  {WARNING_GLYPH} {message}"), max), style)
    }

    /// Draw a rounded box around `body` with `title` embedded in the top
    /// border.
    fn boxed(
        &self,
        title: Line<'static>,
        body: Vec<Line<'static>>,
        border_style: Style,
        max_width: usize,
    ) -> Vec<Line<'static>> {
        let set = border::ROUNDED;
        let title_width = title.width();
        let width = body
            .iter()
            .map(Line::width)
            .chain([title_width, MIN_BOX_WIDTH.min(max_width)])
            .max()
            .unwrap_or_default();

        let mut lines = Vec::with_capacity(body.len() + 2);

        let mut top = vec![Span::styled(format!(" {}", set.top_left), border_style)];
        let rule = if title_width > 0 {
            top.push(Span::raw(" "));
            top.extend(title.spans);
            top.push(Span::raw(" "));
            width - title_width
        } else {
            width + 2
        };
        top.push(Span::styled(
            format!("{}{}", set.horizontal_top.repeat(rule), set.top_right),
            border_style,
        ));
        lines.push(Line::from(top));

        for mut line in body {
            pad(&mut line, width);
            let mut spans = vec![Span::styled(format!(" {}", set.vertical_left), border_style)];
            spans.push(Span::raw(" "));
            spans.extend(line.spans);
            spans.push(Span::raw(" "));
            spans.push(Span::styled(set.vertical_right, border_style));
            lines.push(Line::from(spans));
        }

        lines.push(styled(
            format!(
                " {}{}{}",
                set.bottom_left,
                set.horizontal_bottom.repeat(width + 2),
                set.bottom_right
            ),
            border_style,
        ));
        lines
    }
}

/// Query text with a reversed cursor cell, clipped around the cursor so it
/// stays visible.
fn cursor_line(
    before: &str,
    under: &str,
    after: &str,
    max_width: usize,
    theme: &Theme,
) -> Line<'static> {
    let style = theme.text();
    let cursor_width = under.width().max(1);
    let total = before.width() + cursor_width + after.width();

    let (before, after) = if total <= max_width {
        (before.to_string(), after.to_string())
    } else if before.width() + cursor_width < max_width {
        // Cursor near the start: clip the tail
        let room = max_width - before.width() - cursor_width;
        (before.to_string(), truncate(after, room))
    } else {
        // Cursor far right: drop the head, keep what fits before the cursor
        let room = max_width.saturating_sub(cursor_width + ELLIPSIS.width());
        (format!("{ELLIPSIS}{}", take_last_width(before, room)), String::new())
    };

    Line::from(vec![
        Span::styled(before, style),
        Span::styled(under.to_string(), theme.cursor(style)),
        Span::styled(after, style),
    ])
}

/// Clip `text` to `max_width` columns, ending in an ellipsis when clipped.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width();
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.push_str(ELLIPSIS);
    out
}

/// The longest suffix of `text` that fits in `max_width` columns.
fn take_last_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, grapheme) in text.grapheme_indices(true).rev() {
        let w = grapheme.width();
        if used + w > max_width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

/// Widest of `items` plus `padding`.
fn longest<'a>(items: impl Iterator<Item = &'a str>, padding: usize) -> usize {
    items.map(|s| s.width() + padding).max().unwrap_or(0)
}

fn styled(content: impl Into<Cow<'static, str>>, style: Style) -> Line<'static> {
    Line::from(Span::styled(content, style))
}

/// Append spaces until `line` is `width` columns wide.
fn pad(line: &mut Line<'static>, width: usize) {
    let current = line.width();
    if current < width {
        line.push_span(Span::raw(" ".repeat(width - current)));
    }
}

/// Flatten a frame into plain strings, one per line, dropping all styling.
pub fn to_plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}
