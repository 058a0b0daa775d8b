use anyhow::{Context, Result};
use annotext_config::Config;
use annotext_engine::{
    Annotation, AnnotationSession, DocumentFile, Run, io,
    labels::{build_label_tree, contrast_color, flatten_label_tree, parse_hex_color},
    render, stats,
    text::format_file_size,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use relative_path::RelativePathBuf;
use std::{
    collections::HashSet,
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

struct App {
    documents_path: PathBuf,
    context_length: usize,
    files: Vec<DocumentFile>,
    file_list_state: ListState,
    session: Option<AnnotationSession>,
    status: Option<String>,
    unannotated: HashSet<String>,
}

impl App {
    fn new(documents_path: PathBuf, document_glob: &str, context_length: usize) -> Result<Self> {
        let files = io::scan_documents(&documents_path, document_glob)?;

        let mut app = Self {
            documents_path,
            context_length,
            files,
            file_list_state: ListState::default(),
            session: None,
            status: None,
            unannotated: HashSet::new(),
        };
        app.refresh_unannotated();

        // Select first document if available
        if !app.files.is_empty() {
            app.file_list_state.select(Some(0));
            app.load_selected_document();
        }

        Ok(app)
    }

    fn next_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.load_selected_document();
    }

    fn previous_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.file_list_state.select(Some(i));
        self.load_selected_document();
    }

    fn selected_file(&self) -> Option<&DocumentFile> {
        self.file_list_state
            .selected()
            .and_then(|index| self.files.get(index))
    }

    fn load_selected_document(&mut self) {
        let Some(file) = self.selected_file().cloned() else {
            return;
        };

        self.status = None;
        self.session = match open_session(&file, &self.documents_path, self.context_length) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Failed to open {}: {e:#}", file.relative_path());
                self.status = Some(format!("Error opening document: {e:#}"));
                None
            }
        };
    }

    fn cycle_annotation(&mut self, forward: bool) {
        if let Some(session) = self.session.as_mut() {
            session.select_next(forward);
        }
    }

    fn delete_selected_annotation(&mut self) -> Result<()> {
        let Some(file) = self.selected_file().cloned() else {
            return Ok(());
        };
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let Some(id) = session.selected_annotation().map(|a| a.id.clone()) else {
            return Ok(());
        };

        // Write the sidecar first so a failed save leaves the session untouched.
        let mut set = session.annotation_set();
        set.annotations.retain(|a| a.id != id);
        io::save_annotation_set(&file, &self.documents_path, &set)?;

        let removed = session.remove_annotation(&id)?;
        self.status = Some(format!(
            "Deleted '{}' ({})",
            removed.selected_text, removed.label_name
        ));
        self.refresh_unannotated();
        Ok(())
    }

    /// Re-reads every sidecar to find documents nobody has annotated yet.
    fn refresh_unannotated(&mut self) {
        let sets: Vec<(String, Vec<Annotation>)> = self
            .files
            .iter()
            .map(|file| {
                let annotations = io::load_annotation_set(file, &self.documents_path)
                    .map(|set| set.annotations)
                    .unwrap_or_else(|e| {
                        log::warn!("Failed to read annotations for {}: {e}", file.relative_path());
                        Vec::new()
                    });
                (file.relative_path().to_string(), annotations)
            })
            .collect();
        let documents: Vec<stats::DocumentAnnotations> = sets
            .iter()
            .map(|(id, annotations)| stats::DocumentAnnotations {
                document_id: id,
                annotations,
            })
            .collect();

        self.unannotated = stats::documents_without_annotations(&documents)
            .into_iter()
            .map(str::to_string)
            .collect();
    }
}

fn open_session(
    file: &DocumentFile,
    documents_path: &Path,
    context_length: usize,
) -> Result<AnnotationSession> {
    let document = io::read_document(file.relative_path(), documents_path)?;
    let set = io::load_annotation_set(file, documents_path)?;
    Ok(AnnotationSession::new(document, set).with_context_length(context_length))
}

/// Styled lines for highlighted runs; run text may span several lines.
fn runs_to_lines<'a>(runs: &[Run<'a>], selected: Option<&str>) -> Vec<Line<'a>> {
    let mut lines = vec![Line::default()];

    for run in runs {
        let style = match run.color {
            Some(color) => {
                let mut style = Style::default();
                if let Some((r, g, b)) = parse_hex_color(color) {
                    let fg = parse_hex_color(contrast_color(color))
                        .map_or(Color::Black, |(r, g, b)| Color::Rgb(r, g, b));
                    style = style.bg(Color::Rgb(r, g, b)).fg(fg);
                } else {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if run.span_id.is_some() && run.span_id == selected {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                style
            }
            None => Style::default(),
        };

        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !piece.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.spans.push(Span::styled(piece, style));
            }
        }
    }

    lines
}

fn color_of(hex: &str) -> Color {
    parse_hex_color(hex).map_or(Color::Gray, |(r, g, b)| Color::Rgb(r, g, b))
}

fn export_html(document_path: &Path) -> Result<String> {
    let documents_path = document_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = document_path
        .file_name()
        .context("document path has no file name")?;
    let file = DocumentFile::new(RelativePathBuf::from(file_name.to_string_lossy().as_ref()));

    let session = open_session(&file, documents_path, annotext_config::DEFAULT_CONTEXT_LENGTH)?;
    let runs = session
        .runs()
        .with_context(|| format!("Cannot highlight {}", document_path.display()))?;
    log::info!(
        "Rendering {} runs for {}",
        runs.len(),
        document_path.display()
    );
    Ok(render::render_html_page(&session.document().name, &runs))
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Determine documents path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    if args.len() == 3 && args[1] == "--html" {
        match export_html(Path::new(&args[2])) {
            Ok(html) => {
                print!("{html}");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
        }
    }

    let config;
    let from_config;

    if args.len() == 2 {
        // CLI argument provided - use it, other settings from config if present
        let base = Config::load().ok().flatten();
        let mut cli_config = Config::new(PathBuf::from(&args[1]));
        if let Some(base) = base {
            cli_config.document_glob = base.document_glob;
            cli_config.context_length = base.context_length;
        }
        config = cli_config;
        from_config = false;
    } else if args.len() == 1 {
        // No CLI argument - try config file
        match Config::load() {
            Ok(Some(loaded)) => {
                config = loaded;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No documents path provided and no config file found");
                eprintln!("Usage: {} <documents-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <documents-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [documents-folder-path]", args[0]);
        eprintln!("       {} --html <document.txt>", args[0]);
        process::exit(1);
    };

    // Validate documents directory using engine
    if let Err(e) = io::validate_documents_dir(&config.documents_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Documents path '{}'{} is invalid: {e}",
            config.documents_path.display(),
            source
        );
        process::exit(1);
    }
    log::info!("Opening documents in {}", config.documents_path.display());

    let mut app = App::new(
        config.documents_path,
        &config.document_glob,
        config.context_length,
    )?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Tab | KeyCode::Char('n') => app.cycle_annotation(true),
                KeyCode::BackTab | KeyCode::Char('p') => app.cycle_annotation(false),
                KeyCode::Esc => {
                    if let Some(session) = app.session.as_mut() {
                        session.clear_selection();
                    }
                }
                KeyCode::Char('d') => {
                    if let Err(e) = app.delete_selected_annotation() {
                        app.status = Some(format!("Delete failed: {e:#}"));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)].as_ref())
        .split(outer[0]);

    // Document list panel
    let file_items: Vec<ListItem> = app
        .files
        .iter()
        .map(|file| {
            let icon = if app.unannotated.contains(file.relative_path().as_str()) {
                "○"
            } else {
                "📋"
            };
            ListItem::new(Line::from(format!("{icon} {}", file.display_name())))
        })
        .collect();

    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[1]);
    let details = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(right[1]);

    let Some(session) = app.session.as_ref() else {
        let message = app
            .status
            .clone()
            .unwrap_or_else(|| "Select a document to view it".to_string());
        f.render_widget(
            Paragraph::new(message).block(Block::default().borders(Borders::ALL).title("Content")),
            right[0],
        );
        return;
    };

    // Content panel
    let selected_id = session.selected_annotation().map(|a| a.id.as_str());
    let content_lines = match session.runs() {
        Ok(runs) => runs_to_lines(&runs, selected_id),
        Err(e) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Cannot highlight annotations: {e}"),
                    Style::default().fg(Color::Red),
                )),
                Line::default(),
            ];
            lines.extend(session.document().content.lines().map(Line::from));
            lines
        }
    };
    let content = Paragraph::new(content_lines)
        .block(
            Block::default().borders(Borders::ALL).title(format!(
                "{} ({})",
                session.document().name,
                format_file_size(session.document().content.len() as u64)
            )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(content, right[0]);

    // Annotation details panel
    let mut detail_lines: Vec<Line> = match session.selected_annotation() {
        Some(a) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    a.label_name.as_str(),
                    Style::default()
                        .fg(color_of(&a.label_color))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("[{}, {})", a.start_position, a.end_position)),
                Line::from(format!(
                    "…{}[{}]{}…",
                    a.context_before, a.selected_text, a.context_after
                )),
            ];
            if let Some(comment) = &a.comment {
                lines.push(Line::from(format!("💬 {comment}")));
            }
            lines
        }
        None => vec![Line::from(format!(
            "{} annotations. Tab/n: next | Shift-Tab/p: previous",
            session.annotations().len()
        ))],
    };
    if let Some(status) = &app.status {
        detail_lines.push(Line::default());
        detail_lines.push(Line::from(status.as_str()));
    }
    f.render_widget(
        Paragraph::new(detail_lines)
            .block(Block::default().borders(Borders::ALL).title("Annotation"))
            .wrap(Wrap { trim: true }),
        details[0],
    );

    // Label tree panel with usage counts
    let usage = stats::label_usage(session.labels(), session.annotations());
    let tree = build_label_tree(session.labels());
    let label_lines: Vec<Line> = flatten_label_tree(&tree)
        .iter()
        .map(|flat| {
            let count = usage
                .iter()
                .find(|u| u.label.id == flat.label.id)
                .map_or(0, |u| u.count);
            Line::from(vec![
                Span::raw("  ".repeat(flat.depth)),
                Span::styled("■ ", Style::default().fg(color_of(&flat.label.color))),
                Span::raw(format!("{} ({count})", flat.label.name)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(label_lines).block(Block::default().borders(Borders::ALL).title("Labels")),
        details[1],
    );

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Document | "),
        Span::raw("Tab/Shift-Tab: Annotation | "),
        Span::raw("Esc: Deselect | d: Delete"),
    ]);
    f.render_widget(Paragraph::new(help_text), outer[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotext_engine::Span as TextSpan;
    use annotext_engine::highlight;

    #[test]
    fn runs_split_into_lines() {
        let spans = [TextSpan::new("a", 2, 7, "Person", "#FF6B6B")];
        let runs = highlight("a\nbc\nde\nf", &spans).unwrap();
        let lines = runs_to_lines(&runs, None);

        let texts: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(texts, vec!["a", "bc", "de", "f"]);
        assert_eq!(lines[1].spans[0].style.bg, Some(Color::Rgb(255, 107, 107)));
    }

    #[test]
    fn selected_run_is_emphasised() {
        let spans = [TextSpan::new("a", 0, 3, "Person", "#FF6B6B")];
        let runs = highlight("Ada wrote", &spans).unwrap();
        let lines = runs_to_lines(&runs, Some("a"));

        let style = lines[0].spans[0].style;
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(lines[0].spans[1].style, Style::default());
    }

    #[test]
    fn export_renders_sidecar_annotations() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("memo.txt"), "Call Ada today").unwrap();
        std::fs::write(
            dir.join("memo.annotations.toml"),
            "[[annotations]]\nid = \"a1\"\ndocumentId = \"memo.txt\"\nlabelId = \"p\"\nlabelName = \"Person\"\nlabelColor = \"#FF6B6B\"\nstartPosition = 5\nendPosition = 8\n",
        )
        .unwrap();

        let html = export_html(&dir.join("memo.txt")).unwrap();
        assert!(html.contains(r#"<mark data-span-id="a1""#));
        assert!(html.contains(">Ada</mark>"));
    }

    const MEMO_SIDECAR: &str = "[[annotations]]\nid = \"a1\"\ndocumentId = \"memo.txt\"\nlabelId = \"p\"\nlabelName = \"Person\"\nlabelColor = \"#FF6B6B\"\nstartPosition = 5\nendPosition = 8\n";

    #[test]
    fn failed_delete_keeps_annotation_in_session() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("memo.txt"), "Call Ada today").unwrap();
        std::fs::write(dir.join("memo.annotations.toml"), MEMO_SIDECAR).unwrap();

        let mut app = App::new(dir.to_path_buf(), "*.txt", 50).unwrap();
        app.session.as_mut().unwrap().select_annotation("a1").unwrap();

        // A directory where the sidecar should be makes the save fail.
        std::fs::remove_file(dir.join("memo.annotations.toml")).unwrap();
        std::fs::create_dir(dir.join("memo.annotations.toml")).unwrap();

        assert!(app.delete_selected_annotation().is_err());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.annotations().len(), 1);
        assert_eq!(session.selected_annotation().map(|a| a.id.as_str()), Some("a1"));
    }

    #[test]
    fn delete_saves_then_marks_document_unannotated() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("memo.txt"), "Call Ada today").unwrap();
        std::fs::write(dir.join("notes.txt"), "nothing here").unwrap();
        std::fs::write(dir.join("memo.annotations.toml"), MEMO_SIDECAR).unwrap();

        let mut app = App::new(dir.to_path_buf(), "*.txt", 50).unwrap();
        assert_eq!(app.unannotated, HashSet::from(["notes.txt".to_string()]));

        app.session.as_mut().unwrap().select_annotation("a1").unwrap();
        app.delete_selected_annotation().unwrap();

        assert!(app.session.as_ref().unwrap().annotations().is_empty());
        let saved = std::fs::read_to_string(dir.join("memo.annotations.toml")).unwrap();
        assert!(!saved.contains("a1"));
        assert!(app.unannotated.contains("memo.txt"));
    }
}
