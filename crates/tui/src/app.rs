use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info};
use wmt_core::{
    config::AppConfig,
    dataset::{DatasetLoader, DatasetSync, LoadEvent, Snapshot, SnapshotSlot},
    detail::{build_unit_detail, build_warband_detail, UnitDetail, WarbandDetail},
    export::ExportManager,
    models::{Unit, Warband},
    query::{self, UnitQuery, UnitSort, WarbandQuery, WarbandSort},
};

const TICK_RATE: Duration = Duration::from_millis(250);

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Units,
    Warbands,
}

impl Tab {
    fn title(self) -> &'static str {
        match self {
            Tab::Units => "Units",
            Tab::Warbands => "Warbands",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

enum DetailView {
    Unit(UnitDetail),
    Warband(WarbandDetail),
}

struct UiState {
    tab: Tab,
    mode: Mode,
    unit_rows: Vec<Unit>,
    warband_rows: Vec<Warband>,
    unit_cursor: usize,
    unit_offset: usize,
    warband_cursor: usize,
    warband_offset: usize,
    list_height: usize,
    unit_search: String,
    warband_search: String,
    unit_sort: UnitSort,
    warband_sort: WarbandSort,
    warband_filter: Option<String>,
    type_filter: Option<String>,
    status: String,
    should_quit: bool,
    detail: Option<DetailView>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: Tab::Units,
            mode: Mode::Browse,
            unit_rows: Vec::new(),
            warband_rows: Vec::new(),
            unit_cursor: 0,
            unit_offset: 0,
            warband_cursor: 0,
            warband_offset: 0,
            list_height: 1,
            unit_search: String::new(),
            warband_search: String::new(),
            unit_sort: UnitSort::default(),
            warband_sort: WarbandSort::default(),
            warband_filter: None,
            type_filter: None,
            status: "Loading data…".to_string(),
            should_quit: false,
            detail: None,
        }
    }
}

impl UiState {
    fn row_count(&self) -> usize {
        match self.tab {
            Tab::Units => self.unit_rows.len(),
            Tab::Warbands => self.warband_rows.len(),
        }
    }

    fn cursors(&mut self) -> (&mut usize, &mut usize) {
        match self.tab {
            Tab::Units => (&mut self.unit_cursor, &mut self.unit_offset),
            Tab::Warbands => (&mut self.warband_cursor, &mut self.warband_offset),
        }
    }

    fn search(&self) -> &str {
        match self.tab {
            Tab::Units => &self.unit_search,
            Tab::Warbands => &self.warband_search,
        }
    }

    fn search_mut(&mut self) -> &mut String {
        match self.tab {
            Tab::Units => &mut self.unit_search,
            Tab::Warbands => &mut self.warband_search,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let (cursor, _) = self.cursors();
        let mut idx = *cursor as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len as isize {
            idx = len as isize - 1;
        }
        *cursor = idx as usize;
        self.ensure_cursor_visible();
    }

    fn move_to(&mut self, index: usize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let (cursor, _) = self.cursors();
        *cursor = index.min(len - 1);
        self.ensure_cursor_visible();
    }

    fn move_to_end(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        self.move_to(len - 1);
    }

    fn page_down(&mut self) {
        self.move_cursor(self.list_height.max(1) as isize);
    }

    fn page_up(&mut self) {
        self.move_cursor(-(self.list_height.max(1) as isize));
    }

    fn clamp_cursors(&mut self) {
        if self.unit_cursor >= self.unit_rows.len() {
            self.unit_cursor = self.unit_rows.len().saturating_sub(1);
        }
        if self.warband_cursor >= self.warband_rows.len() {
            self.warband_cursor = self.warband_rows.len().saturating_sub(1);
        }
    }

    fn ensure_cursor_visible(&mut self) {
        let len = self.row_count();
        let height = self.list_height.max(1);
        let (cursor, offset) = self.cursors();
        if len == 0 {
            *offset = 0;
            return;
        }
        let max_offset = len.saturating_sub(height);
        if *cursor < *offset {
            *offset = *cursor;
        } else if *cursor >= *offset + height {
            *offset = *cursor + 1 - height;
        }
        if *offset > max_offset {
            *offset = max_offset;
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}

/// Tabbed terminal browser over the loaded compendium snapshot.
pub struct CompendiumApp {
    loader: DatasetLoader,
    slot: SnapshotSlot,
    exporter: ExportManager,
    state: UiState,
    load_tx: mpsc::Sender<LoadEvent>,
    load_rx: Option<mpsc::Receiver<LoadEvent>>,
}

impl CompendiumApp {
    pub fn new(
        config: AppConfig,
        loader: DatasetLoader,
        slot: SnapshotSlot,
        load_tx: mpsc::Sender<LoadEvent>,
    ) -> Self {
        Self {
            loader,
            slot,
            exporter: ExportManager::new(config.export_dir),
            state: UiState::default(),
            load_tx,
            load_rx: None,
        }
    }

    pub fn attach_loads(&mut self, receiver: mpsc::Receiver<LoadEvent>) {
        self.load_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut load_rx = self
            .load_rx
            .take()
            .context("load channel not attached")?;

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = event_rx.recv() => {
                    match maybe_event {
                        Some(AppEvent::Input(event)) => {
                            if let Err(err) = self.handle_input(event) {
                                self.state.set_status(format!("Error: {err}"));
                            }
                        }
                        Some(AppEvent::Tick) => self.handle_tick(),
                        None => break,
                    }
                }
                maybe_load = load_rx.recv() => {
                    if let Some(load_event) = maybe_load {
                        self.handle_load_event(load_event);
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn handle_tick(&mut self) {
        if self.state.mode == Mode::Filter {
            self.state
                .set_status(format!("Filter: {}", self.state.search()));
        }
    }

    fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Success {
                snapshot,
                generation,
                installed,
            } => {
                if installed {
                    info!(generation, "snapshot ready");
                    self.refresh_rows();
                    self.state.set_status(snapshot.status_line());
                } else {
                    info!(generation, "discarded superseded load result");
                }
            }
            LoadEvent::Error { error, generation } => {
                error!(generation, "load failed: {error}");
                self.state.set_status(format!("Error: {error}"));
            }
        }
    }

    fn refresh_rows(&mut self) {
        let Some(snapshot) = self.slot.current() else {
            self.state.unit_rows.clear();
            self.state.warband_rows.clear();
            return;
        };
        let unit_query = UnitQuery {
            text: self.state.unit_search.clone(),
            warband_id: self.state.warband_filter.clone(),
            unit_type: self.state.type_filter.clone(),
            sort: self.state.unit_sort,
        };
        self.state.unit_rows = query::query_units(&snapshot.units, &unit_query);
        let warband_query = WarbandQuery {
            text: self.state.warband_search.clone(),
            sort: self.state.warband_sort,
        };
        self.state.warband_rows = query::query_warbands(&snapshot.warbands, &warband_query);
        self.state.clamp_cursors();
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => Ok(()),
            Event::Mouse(_) => Ok(()),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.detail.is_some() {
            return self.handle_detail_key(key);
        }
        match self.state.mode {
            Mode::Filter => self.handle_filter_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.state.detail = None;
            }
            KeyCode::Char('y') => self.export_detail()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.set_status("Filter cancelled".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state
                    .set_status(format!("Filter applied: {}", self.state.search()));
            }
            KeyCode::Backspace => {
                self.state.search_mut().pop();
                self.refresh_rows();
                self.state
                    .set_status(format!("Filter: {}", self.state.search()));
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.search_mut().push(c);
                    self.refresh_rows();
                    self.state
                        .set_status(format!("Filter: {}", self.state.search()));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Tab => {
                self.state.tab = match self.state.tab {
                    Tab::Units => Tab::Warbands,
                    Tab::Warbands => Tab::Units,
                };
                self.state
                    .set_status(format!("Viewing {}", self.state.tab.title()));
            }
            KeyCode::Char('1') => {
                self.state.tab = Tab::Units;
                self.state.set_status("Viewing Units".to_string());
            }
            KeyCode::Char('2') => {
                self.state.tab = Tab::Warbands;
                self.state.set_status("Viewing Warbands".to_string());
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Char('g') if key.modifiers.is_empty() => self.state.move_to(0),
            KeyCode::Char('G') => self.state.move_to_end(),
            KeyCode::Home => self.state.move_to(0),
            KeyCode::End => self.state.move_to_end(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.state.set_status("Enter filter text".to_string());
            }
            KeyCode::Char('s') if key.modifiers.is_empty() => {
                match self.state.tab {
                    Tab::Units => self.state.unit_sort.key = self.state.unit_sort.key.cycled(),
                    Tab::Warbands => {
                        self.state.warband_sort.key = self.state.warband_sort.key.cycled()
                    }
                }
                self.refresh_rows();
                self.state
                    .set_status(format!("Sort: {}", self.active_sort_selector()));
            }
            KeyCode::Char('d') if key.modifiers.is_empty() => {
                match self.state.tab {
                    Tab::Units => self.state.unit_sort.dir = self.state.unit_sort.dir.toggled(),
                    Tab::Warbands => {
                        self.state.warband_sort.dir = self.state.warband_sort.dir.toggled()
                    }
                }
                self.refresh_rows();
                self.state
                    .set_status(format!("Sort: {}", self.active_sort_selector()));
            }
            KeyCode::Char('w') if self.state.tab == Tab::Units => self.cycle_warband_filter(),
            KeyCode::Char('t') if self.state.tab == Tab::Units => self.cycle_type_filter(),
            KeyCode::Char('x') if key.modifiers.is_empty() => self.reset_filters(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_reload();
            }
            KeyCode::Enter => self.open_detail(),
            _ => {}
        }
        Ok(())
    }

    fn active_sort_selector(&self) -> String {
        match self.state.tab {
            Tab::Units => self.state.unit_sort.selector(),
            Tab::Warbands => self.state.warband_sort.selector(),
        }
    }

    fn reset_filters(&mut self) {
        self.state.unit_search.clear();
        self.state.warband_search.clear();
        self.state.warband_filter = None;
        self.state.type_filter = None;
        self.state.unit_sort = UnitSort::default();
        self.state.warband_sort = WarbandSort::default();
        self.refresh_rows();
        self.state.set_status("Filters reset".to_string());
    }

    fn cycle_warband_filter(&mut self) {
        let Some(snapshot) = self.slot.current() else {
            self.state.set_status("No data loaded yet".to_string());
            return;
        };
        let mut options: Vec<(String, String)> = snapshot
            .warbands
            .iter()
            .map(|warband| (warband.id.clone(), warband.display_name().to_string()))
            .collect();
        options.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
        if options.is_empty() {
            return;
        }

        let next = match self.state.warband_filter.as_deref() {
            None => Some(0),
            Some(current) => match options.iter().position(|(id, _)| id == current) {
                Some(position) if position + 1 < options.len() => Some(position + 1),
                _ => None,
            },
        };
        let label = match next {
            Some(index) => {
                let (id, name) = options[index].clone();
                self.state.warband_filter = Some(id);
                name
            }
            None => {
                self.state.warband_filter = None;
                "All".to_string()
            }
        };
        self.refresh_rows();
        self.state.set_status(format!("Warband filter: {label}"));
    }

    fn cycle_type_filter(&mut self) {
        let Some(snapshot) = self.slot.current() else {
            self.state.set_status("No data loaded yet".to_string());
            return;
        };
        let mut types: Vec<String> = snapshot
            .units
            .iter()
            .filter_map(|unit| unit.unit_type.clone())
            .collect();
        types.sort();
        types.dedup();
        if types.is_empty() {
            return;
        }

        let next = match self.state.type_filter.as_deref() {
            None => Some(0),
            Some(current) => match types.iter().position(|label| label == current) {
                Some(position) if position + 1 < types.len() => Some(position + 1),
                _ => None,
            },
        };
        let label = match next {
            Some(index) => {
                let label = types[index].clone();
                self.state.type_filter = Some(label.clone());
                label
            }
            None => {
                self.state.type_filter = None;
                "All".to_string()
            }
        };
        self.refresh_rows();
        self.state.set_status(format!("Type filter: {label}"));
    }

    fn start_reload(&mut self) {
        self.state.set_status("Loading data…".to_string());
        let sync = DatasetSync::new(self.loader.clone(), self.slot.clone());
        let sender = self.load_tx.clone();
        spawn(async move {
            if let Err(err) = sync.run(sender).await {
                error!("Reload task error: {err}");
            }
        });
    }

    fn open_detail(&mut self) {
        let Some(snapshot) = self.slot.current() else {
            self.state.set_status("No data loaded yet".to_string());
            return;
        };
        match self.state.tab {
            Tab::Units => {
                let Some(unit) = self.state.unit_rows.get(self.state.unit_cursor) else {
                    return;
                };
                self.state.detail = Some(DetailView::Unit(build_unit_detail(
                    unit,
                    &snapshot.index,
                )));
            }
            Tab::Warbands => {
                let Some(warband) = self.state.warband_rows.get(self.state.warband_cursor)
                else {
                    return;
                };
                self.state.detail = Some(DetailView::Warband(build_warband_detail(
                    warband,
                    &snapshot.index,
                )));
            }
        }
    }

    fn export_detail(&mut self) -> Result<()> {
        let (kind, id, value) = match self.state.detail.as_ref() {
            Some(DetailView::Unit(detail)) => {
                ("unit", detail.id.clone(), serde_json::to_value(detail)?)
            }
            Some(DetailView::Warband(detail)) => {
                ("warband", detail.id.clone(), serde_json::to_value(detail)?)
            }
            None => return Ok(()),
        };
        let path = self.exporter.export(kind, &id, &value)?;
        info!(kind, id = %id, path = %path.display(), "detail exported");
        self.state.set_status(format!("Exported {}", path.display()));
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_tabs(frame, chunks[0]);
        match self.state.tab {
            Tab::Units => self.render_units(frame, chunks[1]),
            Tab::Warbands => self.render_warbands(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);

        if self.state.detail.is_some() {
            self.render_detail(frame);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let active = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().fg(Color::DarkGray);

        let filters = match self.state.tab {
            Tab::Units => {
                let warband = self
                    .state
                    .warband_filter
                    .as_deref()
                    .map(|id| {
                        self.slot
                            .current()
                            .map(|snapshot| snapshot.index.warband_label(id))
                            .unwrap_or_else(|| id.to_string())
                    })
                    .unwrap_or_else(|| "All".to_string());
                let unit_type = self.state.type_filter.as_deref().unwrap_or("All");
                format!(
                    "sort {} · warband {} · type {}",
                    self.state.unit_sort.selector(),
                    warband,
                    unit_type
                )
            }
            Tab::Warbands => format!("sort {}", self.state.warband_sort.selector()),
        };

        let line = Line::from(vec![
            Span::styled(
                " [1] Units ",
                if self.state.tab == Tab::Units {
                    active
                } else {
                    inactive
                },
            ),
            Span::styled(
                " [2] Warbands ",
                if self.state.tab == Tab::Warbands {
                    active
                } else {
                    inactive
                },
            ),
            Span::raw("  "),
            Span::styled(filters, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_units(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(3) as usize;
        self.state.clamp_cursors();
        self.state.ensure_cursor_visible();

        let snapshot = self.slot.current();
        let total = snapshot
            .as_ref()
            .map(|snapshot| snapshot.units.len())
            .unwrap_or(0);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Units {}/{}", self.state.unit_rows.len(), total));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let header = format!(
            "{:<22} {:<12} {:>5}  {}",
            "Name", "Type", "Gold", "Warbands"
        );
        frame.render_widget(
            Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let height = rows[1].height as usize;
        let offset = self.state.unit_offset;
        let items: Vec<ListItem> = self
            .state
            .unit_rows
            .iter()
            .skip(offset)
            .take(height.max(1))
            .map(|unit| ListItem::new(unit_row(unit, snapshot.as_deref())))
            .collect();

        let mut list_state = ListState::default();
        if !self.state.unit_rows.is_empty() {
            list_state.select(Some(self.state.unit_cursor.saturating_sub(offset)));
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    fn render_warbands(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(3) as usize;
        self.state.clamp_cursors();
        self.state.ensure_cursor_visible();

        let total = self
            .slot
            .current()
            .map(|snapshot| snapshot.warbands.len())
            .unwrap_or(0);
        let block = Block::default().borders(Borders::ALL).title(format!(
            "Warbands {}/{}",
            self.state.warband_rows.len(),
            total
        ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let header = format!(
            "{:<22} {:>5}  {:<24} {}",
            "Name", "Units", "Tags", "Source"
        );
        frame.render_widget(
            Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let height = rows[1].height as usize;
        let offset = self.state.warband_offset;
        let items: Vec<ListItem> = self
            .state
            .warband_rows
            .iter()
            .skip(offset)
            .take(height.max(1))
            .map(|warband| ListItem::new(warband_row(warband)))
            .collect();

        let mut list_state = ListState::default();
        if !self.state.warband_rows.is_empty() {
            list_state.select(Some(self.state.warband_cursor.saturating_sub(offset)));
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Filter {
            format!("Filter: {}", self.state.search())
        } else {
            self.state.status.clone()
        };
        let secondary = "Tab switch · / filter · s sort · d direction · w warband · t type · \
                         x reset · Enter detail · Ctrl-R reload · q quit";
        let paragraph = Paragraph::new(vec![Line::from(primary), Line::from(secondary)])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_detail(&self, frame: &mut Frame) {
        let Some(view) = self.state.detail.as_ref() else {
            return;
        };
        let (title, lines) = match view {
            DetailView::Unit(detail) => (
                format!("Unit: {} ({})", detail.name, detail.id),
                detail.text_lines(),
            ),
            DetailView::Warband(detail) => (
                format!("Warband: {} ({})", detail.name, detail.id),
                detail.text_lines(),
            ),
        };

        let frame_area = frame.size();
        let width = cmp::min(76, frame_area.width.saturating_sub(4)).max(30);
        let height = cmp::min(lines.len() as u16 + 4, frame_area.height.saturating_sub(2));
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let mut content: Vec<Line> = lines.into_iter().map(Line::from).collect();
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" close  "),
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" export JSON"),
        ]));
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

fn unit_row(unit: &Unit, snapshot: Option<&Snapshot>) -> String {
    let gold = unit
        .cost
        .as_ref()
        .and_then(|cost| cost.gold)
        .map(|gold| gold.to_string())
        .unwrap_or_default();
    let warbands = unit
        .warband_ids
        .iter()
        .map(|id| match snapshot {
            Some(snapshot) => snapshot.index.warband_label(id),
            None => id.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{:<22.22} {:<12.12} {:>5}  {}",
        unit.display_name(),
        unit.unit_type.as_deref().unwrap_or_default(),
        gold,
        warbands
    )
}

fn warband_row(warband: &Warband) -> String {
    let source = warband
        .source
        .as_ref()
        .map(|source| source.citation())
        .unwrap_or_default();
    format!(
        "{:<22.22} {:>5}  {:<24.24} {}",
        warband.display_name(),
        warband.unit_count(),
        warband.tags.join(", "),
        source
    )
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
