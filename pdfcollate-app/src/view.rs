use image::RgbaImage;
use pdfcollate::{EntryId, PageEntry};
use ratatui::{
    Frame,
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Mode, PromptKind};

/// Half-block rendering of the last previewed thumbnail.
#[derive(Default)]
pub struct PreviewCache {
    key: Option<(EntryId, u16, u16)>,
    lines: Vec<Line<'static>>,
}

impl PreviewCache {
    fn lines(&mut self, entry: &PageEntry, width: u16, height: u16) -> &[Line<'static>] {
        let key = (entry.id(), width, height);
        if self.key != Some(key) {
            self.lines = entry
                .thumbnail()
                .map(|thumbnail| {
                    half_blocks(&thumbnail.fit(u32::from(width), u32::from(height) * 2))
                })
                .unwrap_or_default();
            self.key = Some(key);
        }
        &self.lines
    }
}

pub fn view(app: &App, frame: &mut Frame, preview: &mut PreviewCache) {
    let importing = app.session().import_progress();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(if importing.is_some() { 3 } else { 0 }),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[0]);

    let (entries, selected, title) = match app.mode() {
        Mode::Trash { selected } => (app.session().trash().list(), *selected, "Trash"),
        _ => (app.session().list().entries(), app.selected(), "Pages"),
    };

    page_list(app, entries, selected, title, frame, main[0]);
    page_preview(entries.get(selected), preview, frame, main[1]);

    if let Some(progress) = importing {
        let label = match &progress.current_file {
            Some(path) => format!(
                "{} ({}/{} pages), file {}/{}",
                path.file_name().unwrap_or_default().to_string_lossy(),
                progress.current_page,
                progress.current_page_count,
                progress.files_done + 1,
                progress.files_total
            ),
            None => format!("{} file(s) queued", progress.files_total),
        };
        let gauge = Gauge::default()
            .block(Block::bordered().title("Importing, Esc cancels"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(progress.ratio().clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, layout[1]);
    }

    statusline(app, frame, layout[2]);
    commandline(app, frame, layout[3]);

    if let Mode::Message { title, body } = app.mode() {
        message_box(title, body, frame);
    }
}

fn page_list(
    app: &App,
    entries: &[PageEntry],
    selected: usize,
    title: &str,
    frame: &mut Frame,
    rect: Rect,
) {
    let grabbed = matches!(app.mode(), Mode::Grab { .. });
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let text = match app.mode() {
                Mode::Trash { .. } => entry.describe(),
                _ => entry.label().to_string(),
            };
            ListItem::new(text)
        })
        .collect();

    let highlight = if grabbed {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(Block::bordered().title(format!("{title} ({})", entries.len())))
        .highlight_style(highlight);

    let mut state = ListState::default().with_selected((!entries.is_empty()).then_some(selected));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn page_preview(entry: Option<&PageEntry>, cache: &mut PreviewCache, frame: &mut Frame, rect: Rect) {
    let block = Block::bordered().title("Preview");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let Some(entry) = entry else {
        return;
    };

    let lines = cache.lines(entry, inner.width, inner.height);
    if lines.is_empty() {
        let text = Paragraph::new(vec![
            Line::from(entry.describe()),
            Line::styled("No preview available", Style::default().fg(Color::DarkGray)),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(text, inner);
    } else {
        frame.render_widget(Paragraph::new(lines.to_vec()), inner);
    }
}

fn statusline(app: &App, frame: &mut Frame, rect: Rect) {
    let list = app.session().list();
    let position = if list.is_empty() {
        String::from("0/0")
    } else {
        format!("{}/{}", app.selected() + 1, list.len())
    };
    let right = format!(" {position}  trash {} ", app.session().trash().len());

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right.len() as u16)])
        .split(rect);

    let style = Style::default().fg(Color::Gray).bg(Color::Black);
    frame.render_widget(Block::default().style(style), rect);
    frame.render_widget(Paragraph::new(Span::styled(app.status(), style)), layout[0]);
    frame.render_widget(Paragraph::new(Span::styled(right, style)), layout[1]);
}

fn commandline(app: &App, frame: &mut Frame, rect: Rect) {
    let help = Style::default().fg(Color::DarkGray);
    let line = match app.mode() {
        Mode::Normal | Mode::Message { .. } => Line::styled(
            "a add  s save  d delete  u undo  t trash  J/K move  m grab  q quit",
            help,
        ),
        Mode::Grab { .. } => Line::styled("j/k move  Enter drop  Esc undo", help),
        Mode::Trash { .. } => Line::styled("j/k select  Enter restore  Esc back", help),
        Mode::ConfirmOverwrite { destination } => Line::from(format!(
            "{} exists. Overwrite? (y/n)",
            destination.display()
        )),
        Mode::Prompt(prompt) => {
            let label = match prompt.kind {
                PromptKind::Add => "Add",
                PromptKind::Save => "Save as",
            };
            let prefix = format!("{label} [{}]: ", prompt.base.display());
            let x = rect.x + (prefix.chars().count() + prompt.input.chars().count()) as u16;
            frame.set_cursor_position((x.min(rect.right().saturating_sub(1)), rect.y));
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Cyan)),
                Span::raw(prompt.input.as_str()),
            ])
        }
    };

    frame.render_widget(Paragraph::new(line), rect);
}

fn message_box(title: &str, body: &str, frame: &mut Frame) {
    let area = centered(frame.area(), 60, 30);
    let text = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(
            Block::bordered()
                .title(title)
                .title_bottom("Enter to close")
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(text, area);
}

fn centered(rect: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// One terminal cell per two vertical pixels: the upper pixel colors the
/// glyph, the lower one the background.
fn half_blocks(image: &RgbaImage) -> Vec<Line<'static>> {
    let (width, height) = image.dimensions();
    (0..height)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span> = (0..width)
                .map(|x| {
                    let top = color(image, x, y);
                    let bottom = if y + 1 < height {
                        color(image, x, y + 1)
                    } else {
                        Color::Reset
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

// Transparent pixels are blended onto white paper.
fn color(image: &RgbaImage, x: u32, y: u32) -> Color {
    let [r, g, b, a] = image.get_pixel(x, y).0;
    let alpha = u32::from(a);
    let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
    Color::Rgb(blend(r), blend(g), blend(b))
}
