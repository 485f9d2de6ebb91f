use std::{io, time::Duration};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ironlog_domain::{Action, Field, Session, SessionResult, format_elapsed};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
};

/// Redraw interval while no key is pressed, so the elapsed time keeps running.
const TICK: Duration = Duration::from_secs(1);

const HELP: &str =
    " Enter commit  Tab weight/reps  ↑↓ sets  ←→ exercises  n new set  f finish  Esc cancel";

/// Raw mode on the alternate screen, left again when dropped.
struct RawMode;

impl RawMode {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = RawMode;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Drive the session by key events until it is finished or cancelled.
pub fn run(mut session: Session) -> Result<SessionResult> {
    {
        let _raw_mode = RawMode::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        event_loop(&mut terminal, &mut session)?;
    }
    Ok(session.into_result(Local::now().fixed_offset()))
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> Result<()> {
    while session.is_active() {
        terminal.draw(|frame| draw(frame, session, Local::now().fixed_offset()))?;
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = action(key) {
                    session.handle(action);
                }
            }
        }
    }
    Ok(())
}

#[must_use]
pub fn action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::Cancel)
        }
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::ToggleField),
        KeyCode::Enter => Some(Action::CommitAndAdvance),
        KeyCode::Up => Some(Action::MoveSet(-1)),
        KeyCode::Down => Some(Action::MoveSet(1)),
        KeyCode::Left | KeyCode::BackTab => Some(Action::MoveExercise(-1)),
        KeyCode::Right => Some(Action::MoveExercise(1)),
        KeyCode::Char('n') => Some(Action::AppendSet),
        KeyCode::Char('f') => Some(Action::Finish),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => Some(Action::Input(c)),
        KeyCode::Backspace => Some(Action::DeleteChar),
        _ => None,
    }
}

fn draw(frame: &mut Frame, session: &Session, now: DateTime<FixedOffset>) {
    let [header, body, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [list, detail] =
        Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(body);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                session.title(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "    Duration: {}",
                format_elapsed(session.elapsed(now))
            )),
            Span::raw(format!(
                "    {}/{} exercises",
                session.num_done_exercises(),
                session.exercises().len()
            )),
        ]))
        .block(Block::default().borders(Borders::ALL)),
        header,
    );
    frame.render_widget(exercise_list(session), list);
    draw_exercise(frame, session, detail);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help,
    );
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn exercise_list(session: &Session) -> List<'_> {
    let items = session
        .exercises()
        .iter()
        .enumerate()
        .map(|(i, exercise)| {
            let current = i == session.exercise_idx();
            let style = if current {
                highlight()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(if current { "> " } else { "  " }, style),
                Span::styled(
                    if exercise.done { "✓" } else { "○" },
                    Style::default().fg(if exercise.done {
                        Color::Green
                    } else {
                        Color::DarkGray
                    }),
                ),
                Span::styled(format!(" {}", exercise.template.title), style),
            ]))
        })
        .collect::<Vec<_>>();

    List::new(items).block(Block::default().title(" Exercises ").borders(Borders::ALL))
}

fn draw_exercise(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let Some(exercise) = session.current_exercise() else {
        frame.render_widget(Paragraph::new("No exercises").block(block), area);
        return;
    };

    let notes_height = u16::from(!exercise.notes.is_empty());
    let [notes, sets, inputs] = Layout::vertical([
        Constraint::Length(notes_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(block.inner(area));
    frame.render_widget(
        block.title(format!(" {} ", exercise.template.title)),
        area,
    );

    frame.render_widget(
        Paragraph::new(exercise.notes.as_str()).style(Style::default().fg(Color::DarkGray)),
        notes,
    );

    let rows = exercise.sets.iter().enumerate().map(|(i, set)| {
        let (weight, reps) = if set.complete {
            (format!("{:.1} kg", f64::from(set.weight)), set.reps.to_string())
        } else {
            (String::from("-"), String::from("-"))
        };
        let row = Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(set.set_type.to_string()),
            Cell::from(weight),
            Cell::from(reps),
            Cell::from(if set.complete { "✓" } else { "" }),
        ]);
        if i == session.set_idx() {
            row.style(highlight())
        } else {
            row
        }
    });
    frame.render_widget(
        Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(9),
                Constraint::Length(12),
                Constraint::Length(6),
                Constraint::Length(2),
            ],
        )
        .header(
            Row::new(vec!["Set", "Type", "Weight", "Reps", ""])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        ),
        sets,
    );

    let mut spans = input(
        "Weight (kg)",
        session.weight_input(),
        session.field() == Field::Weight,
    );
    spans.push(Span::raw("   "));
    spans.extend(input(
        "Reps",
        session.reps_input(),
        session.field() == Field::Reps,
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), inputs);
}

fn input(label: &str, value: &str, focused: bool) -> Vec<Span<'static>> {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    vec![
        Span::raw(format!("{label}: ")),
        Span::styled(
            format!("[{value}{}]", if focused { "_" } else { "" }),
            style,
        ),
    ]
}
