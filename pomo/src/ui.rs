use crate::app::{App, AppMode, FormField, SettingsForm};
use crate::config::Config;
use pomo_core::{format_clock, AccentColor, Font, Mode, Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Tabs},
    Frame,
};
use std::time::Instant;
use tachyonfx::Duration as TachyonDuration;

/// Where the last frame put things, so effects can target them.
#[derive(Default, Clone, Copy)]
pub struct UiLayout {
    pub tabs: Rect,
    pub clock: Rect,
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_mode_tabs(f, chunks[1], app);
    draw_timer(f, chunks[2], app);
    draw_announcement(f, chunks[3], app);
    draw_status_bar(f, chunks[4], app);

    match &app.mode {
        AppMode::Settings(form) => draw_settings_overlay(f, form, &app.config),
        AppMode::ConfirmSwitch => draw_confirm_overlay(f, app),
        AppMode::Normal => {}
    }

    app.layout = UiLayout {
        tabs: chunks[1],
        clock: chunks[2],
    };

    let elapsed = app.last_frame.elapsed();
    app.last_frame = Instant::now();
    let delta: TachyonDuration = elapsed.into();
    app.effect_manager.process_effects(delta, f.buffer_mut(), area);
}

fn accent(app: &App) -> Color {
    app.config.theme.accent(app.settings.get().color)
}

fn clock_style(font: Font) -> Modifier {
    match font {
        Font::Sans => Modifier::BOLD,
        Font::Serif => Modifier::BOLD | Modifier::ITALIC,
        Font::Mono => Modifier::empty(),
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let sound = app.sound.get();
    let sound_icon = if sound.enabled {
        &icons.sound_on
    } else {
        &icons.sound_off
    };
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "POMO",
            Style::default().fg(accent(app)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
        Span::styled(format!("  {}", sound_icon), Style::default().fg(theme.gray)),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.surface)),
        ),
        area,
    );
}

fn draw_mode_tabs(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let titles: Vec<Line> = Mode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| Line::from(format!(" {} {} ", i + 1, mode)))
        .collect();
    f.render_widget(
        Tabs::new(titles)
            .select(app.selector.active().index())
            .style(Style::default().fg(theme.gray))
            .highlight_style(
                Style::default()
                    .fg(theme.background)
                    .bg(accent(app))
                    .add_modifier(Modifier::BOLD),
            )
            .divider(app.config.icons.separator.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.surface)),
            ),
        area,
    );
}

fn draw_timer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let engine = &app.engine;
    let (state_icon, action) = match engine.phase() {
        Phase::Idle => (&icons.idle, "START"),
        Phase::Running => (&icons.play, "PAUSE"),
        Phase::Paused => (&icons.pause, "RESUME"),
        Phase::Finished => (&icons.finished, "RESTART"),
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", state_icon, app.selector.active()),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent(app)));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(format_clock(engine.remaining()))
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(clock_style(app.settings.get().font)),
            )
            .alignment(Alignment::Center),
        v_chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("space ", Style::default().fg(theme.gray)),
            Span::styled(action, Style::default().fg(accent(app))),
        ]))
        .alignment(Alignment::Center),
        v_chunks[2],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(accent(app)).bg(theme.surface))
            .percent(engine.progress_ratio().round() as u16)
            .label(""),
        v_chunks[4],
    );
}

fn draw_announcement(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(
        Paragraph::new(app.announcement.as_str())
            .style(Style::default().fg(app.config.theme.foreground))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let mode_color = match app.mode {
        AppMode::Normal => accent(app),
        AppMode::Settings(_) => theme.teal,
        AppMode::ConfirmSwitch => theme.yellow,
    };
    let help = match app.mode {
        AppMode::Normal => {
            "space:start/pause │ 1/2/3 tab:mode │ s:settings │ m:sound │ q:quit"
        }
        AppMode::Settings(_) => "↑↓:field │ ←→ -/+:change │ 0-9:type │ enter:apply │ esc:cancel",
        AppMode::ConfirmSwitch => "y:switch │ n:keep session",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", app.mode.label()),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .block(Block::default().style(Style::default().bg(theme.surface).fg(theme.gray))),
        area,
    );
}

fn draw_settings_overlay(f: &mut Frame, form: &SettingsForm, config: &Config) {
    let theme = &config.theme;
    let icons = &config.icons;
    let draft = form.editor.draft();
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.accent(draft.color)))
        .style(Style::default().bg(theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        "TIME (MINUTES)",
        Style::default().fg(theme.gray).add_modifier(Modifier::BOLD),
    ))];
    for field in FormField::ALL {
        let focused = field == form.focus;
        let marker = if focused {
            Span::styled(format!("{} ", icons.select), Style::default().fg(theme.accent(draft.color)))
        } else {
            Span::raw("  ")
        };
        let value_style = if focused {
            Style::default().fg(theme.background).bg(theme.foreground)
        } else {
            Style::default().fg(theme.foreground)
        };
        let mut spans = vec![marker];
        match field {
            FormField::Duration(mode) => {
                spans.push(Span::styled(format!("{:<14}", mode.label()), Style::default().fg(theme.gray)));
                spans.push(Span::styled(
                    format!(" {:>2} ", draft.timer.minutes_for(mode)),
                    value_style,
                ));
                if focused && !form.input_buffer.is_empty() {
                    spans.push(Span::styled(
                        icons.input_cursor.clone(),
                        Style::default().fg(theme.foreground).add_modifier(Modifier::SLOW_BLINK),
                    ));
                }
            }
            FormField::Font => {
                lines.push(Line::raw(""));
                spans.push(Span::styled(format!("{:<14}", "font"), Style::default().fg(theme.gray)));
                for font in Font::ALL {
                    let style = if font == draft.font { value_style } else { Style::default().fg(theme.gray) };
                    spans.push(Span::styled(
                        format!(" {} ", font),
                        style.add_modifier(clock_style(font)),
                    ));
                }
            }
            FormField::Color => {
                spans.push(Span::styled(format!("{:<14}", "color"), Style::default().fg(theme.gray)));
                for color in AccentColor::ALL {
                    let swatch = if color == draft.color {
                        format!("[{}]", icons.swatch)
                    } else {
                        format!(" {} ", icons.swatch)
                    };
                    spans.push(Span::styled(swatch, Style::default().fg(theme.accent(color))));
                }
            }
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), inner_area);
}

fn draw_confirm_overlay(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);
    let target = app
        .selector
        .pending()
        .map(|mode| mode.label())
        .unwrap_or("another mode");
    let text = vec![
        Line::from(format!("Switch to {}?", target)),
        Line::from(Span::styled(
            format!(
                "{} of {} will be discarded.",
                format_clock(app.engine.remaining()),
                app.selector.active()
            ),
            Style::default().fg(theme.gray),
        )),
        Line::raw(""),
        Line::from(Span::styled("[y] switch   [n] keep", Style::default().fg(theme.yellow))),
    ];
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .title(" Discard session? ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.yellow))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
