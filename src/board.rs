use std::collections::VecDeque;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::filter::{filter_indices, Filter, RangeBand};
use crate::fmt::{money, percent};
use crate::milestones::Celebration;
use crate::models::ProgressSnapshot;
use crate::plans::{Plan, PlanBook};
use crate::store::Store;
use crate::tui::{
    centered_rect, View, ViewAction, FOOTER_STYLE, GAUGE_STYLE, HEADER_STYLE, MARKED_STYLE,
    PENDING_STYLE, SELECTED_STYLE,
};

const CELL_WIDTH: u16 = 16;

/// Interactive grid of a plan's boxes.
pub struct Board<'a, S: Store> {
    book: &'a PlanBook<S>,
    plan: Plan,
    currency: String,
    progress: ProgressSnapshot,
    filter: Filter,
    band: RangeBand,
    visible: Vec<usize>,
    cursor: usize,
    columns: usize,
    scroll: usize,
    popups: VecDeque<Celebration>,
    status_message: Option<String>,
}

impl<'a, S: Store> Board<'a, S> {
    pub fn new(book: &'a PlanBook<S>, plan: Plan, currency: &str) -> Self {
        let progress = plan.progress();
        let mut board = Self {
            book,
            plan,
            currency: currency.to_string(),
            progress,
            filter: Filter::All,
            band: RangeBand::default(),
            visible: Vec::new(),
            cursor: 0,
            columns: 1,
            scroll: 0,
            popups: VecDeque::new(),
            status_message: None,
        };
        board.refilter();
        board
    }

    #[cfg(test)]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    #[cfg(test)]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    #[cfg(test)]
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn selected_box(&self) -> Option<usize> {
        self.visible.get(self.cursor).copied()
    }

    #[cfg(test)]
    pub fn pending_popups(&self) -> usize {
        self.popups.len()
    }

    fn refilter(&mut self) {
        let keep = self.selected_box();
        self.visible = filter_indices(&self.plan.amounts, &self.plan.completed, self.filter);
        self.cursor = keep
            .and_then(|b| self.visible.iter().position(|v| *v == b))
            .unwrap_or(0);
        self.scroll = 0;
    }

    fn mark_selected(&mut self) {
        let Some(index) = self.selected_box() else {
            return;
        };
        match self.book.mark(&mut self.plan, index) {
            Ok(outcome) => {
                self.progress = outcome.progress;
                self.popups.extend(outcome.celebrations);
                self.status_message = if outcome.newly_marked {
                    Some(format!(
                        "Box #{} marked: {}",
                        index + 1,
                        money(self.plan.amounts[index], &self.currency)
                    ))
                } else {
                    Some(format!("Box #{} is already deposited", index + 1))
                };
                // a marked box may drop out of the pending view
                if self.filter == Filter::Pending {
                    let cursor = self.cursor;
                    self.refilter();
                    self.cursor = cursor.min(self.visible.len().saturating_sub(1));
                }
            }
            Err(e) => {
                log::error!("failed to mark box {index}: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let max = self.visible.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }

    fn cell(&self, pos: usize, index: usize) -> Span<'static> {
        let marked = self.plan.completed.contains(index);
        let check = if marked { "\u{2713}" } else { " " };
        let text = format!(
            "{check} {:<width$}",
            money(self.plan.amounts[index], &self.currency),
            width = CELL_WIDTH as usize - 3
        );
        let style = if pos == self.cursor {
            SELECTED_STYLE
        } else if marked {
            MARKED_STYLE
        } else {
            PENDING_STYLE
        };
        Span::styled(text, style)
    }

    fn draw_popup(&self, frame: &mut Frame, celebration: &Celebration) {
        let area = centered_rect(frame.area(), 52, 7);
        let lines = vec![
            Line::from(format!("{}  {}", celebration.icon, celebration.title)).style(HEADER_STYLE),
            Line::from(""),
            Line::from(celebration.message),
            Line::from(""),
            Line::from("press any key").style(FOOTER_STYLE),
        ];
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::bordered()),
            area,
        );
    }
}

impl<S: Store> View for Board<'_, S> {
    fn draw(&mut self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // gauge
            Constraint::Length(1), // stats
            Constraint::Length(1), // filter
            Constraint::Fill(1),   // grid
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(frame.area());

        frame.render_widget(
            Paragraph::new(format!(
                "Cent box: {} ({})",
                money(self.plan.objective, &self.currency),
                self.plan.id
            ))
            .style(HEADER_STYLE),
            areas[0],
        );

        let shown = self.progress.display_percentage();
        frame.render_widget(
            Gauge::default()
                .gauge_style(GAUGE_STYLE)
                .ratio(shown / 100.0)
                .label(percent(shown)),
            areas[1],
        );

        frame.render_widget(
            Paragraph::new(format!(
                "Saved {} of {}  |  {} left  |  {}/{} boxes",
                money(self.progress.completed, &self.currency),
                money(self.progress.total, &self.currency),
                money(self.progress.remaining(), &self.currency),
                self.progress.completed_boxes,
                self.progress.total_boxes,
            )),
            areas[2],
        );

        frame.render_widget(
            Paragraph::new(format!(
                "Filter: {}  ({} shown, range band {})",
                self.filter,
                self.visible.len(),
                self.band
            ))
            .style(FOOTER_STYLE),
            areas[3],
        );

        let grid = areas[4];
        self.columns = (grid.width / CELL_WIDTH).max(1) as usize;
        let rows_visible = grid.height.max(1) as usize;
        let cursor_row = self.cursor / self.columns;
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + rows_visible {
            self.scroll = cursor_row + 1 - rows_visible;
        }

        let lines: Vec<Line> = if self.visible.is_empty() {
            vec![Line::from("No boxes match this filter.").style(FOOTER_STYLE)]
        } else {
            self.visible
                .chunks(self.columns)
                .enumerate()
                .skip(self.scroll)
                .take(rows_visible)
                .map(|(row, chunk)| {
                    let spans: Vec<Span> = chunk
                        .iter()
                        .enumerate()
                        .map(|(col, index)| self.cell(row * self.columns + col, *index))
                        .collect();
                    Line::from(spans)
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines), grid);

        let status = match (&self.status_message, self.selected_box()) {
            (Some(msg), _) => msg.clone(),
            (None, Some(index)) => format!(
                "Box #{} of {}",
                index + 1,
                self.plan.amounts.len()
            ),
            (None, None) => String::new(),
        };
        frame.render_widget(Paragraph::new(status), areas[5]);

        frame.render_widget(
            Paragraph::new(
                "\u{2190}\u{2191}\u{2192}\u{2193} move  enter mark  f filter  r range  q quit",
            )
            .style(FOOTER_STYLE),
            areas[6],
        );

        if let Some(celebration) = self.popups.front() {
            self.draw_popup(frame, celebration);
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if self.popups.pop_front().is_some() {
            return ViewAction::Continue;
        }
        self.status_message = None;
        let columns = self.columns as isize;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-columns),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(columns),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.mark_selected(),
            KeyCode::Char('f') => {
                self.filter = self.filter.next(self.band);
                self.refilter();
            }
            KeyCode::Char('r') => {
                self.band = self.band.next();
                if let Filter::Range(_) = self.filter {
                    self.filter = Filter::Range(self.band);
                    self.refilter();
                }
            }
            _ => {}
        }
        ViewAction::Continue
    }
}
