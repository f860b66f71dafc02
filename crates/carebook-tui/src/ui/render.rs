use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use carebook_core::models::{ChildField, DayKey};
use carebook_core::{iban, Step, Translator};

use crate::app::{App, AppState, BankLine};

use super::fields::{FieldKind, FormField};
use super::styles;

/// Width of the label column.
const LABEL_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Steps
            Constraint::Min(10),   // Form
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_steps(frame, app, chunks[1]);
    render_form(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame, app),
        AppState::Submitted => render_submitted_overlay(frame, app),
        AppState::Editing | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {}", app.t("app.title"));
    let help_hint = format!("[F1] {}  [F2] {}", app.t("ui.help"), app.translations.language().label());

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.chars().count() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_steps(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.steps.current();
    let mut spans = vec![Span::raw(" ")];

    for step in Step::ALL {
        if step.index() > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let complete = step.index() < current.index() && app.form.step_complete(step);
        let marker = if complete { " ✓" } else { "" };
        spans.push(Span::styled(
            format!("[{}] {}{}", step.index() + 1, app.t(step.title_key()), marker),
            styles::step_style(step == current, complete),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let fields = app.fields();
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0;

    if app.steps.current() == Step::Offerings {
        render_offering_intro(app, &mut lines);
    }

    for (index, field) in fields.iter().enumerate() {
        let focused = index == app.focus;

        if let FormField::Offering(row) = field {
            if *row > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!(" {} {}", app.t("offer.row"), row + 1),
                styles::highlight_style(),
            )));
        }

        if focused {
            focused_line = lines.len();
        }
        lines.push(field_line(app, field, focused));

        if *field == FormField::Iban {
            iban_lines(app, &mut lines);
        }
    }

    let height = area.height.saturating_sub(2) as usize;
    let scroll = (focused_line + 2).saturating_sub(height) as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(Span::styled(
            format!(" {} ", app.t(app.steps.current().title_key())),
            styles::title_style(),
        ));

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_offering_intro(app: &App, lines: &mut Vec<Line>) {
    let view = app.form.view();
    let text = if view.school().is_none() {
        app.t("offer.noSchool").to_string()
    } else {
        format!(
            "{} ({}/{})",
            app.t("offer.selectInstruction"),
            app.form.selections().len(),
            view.max_selections()
        )
    };
    lines.push(Line::from(Span::styled(format!(" {}", text), styles::muted_style())));
    lines.push(Line::from(""));
}

fn field_line<'a>(app: &'a App, field: &FormField, focused: bool) -> Line<'a> {
    let value_style = if focused {
        styles::selected_style()
    } else {
        styles::label_style()
    };

    if let FormField::Day(row, key) = field {
        return day_line(app, *row, key, value_style);
    }

    let marker = if field.is_required() {
        Span::styled(" *", styles::required_style(is_filled(app, field)))
    } else {
        Span::raw("  ")
    };
    let label = format!(" {:<width$}", app.t(field.label_key()), width = LABEL_WIDTH - 2);

    Line::from(vec![
        Span::styled(label, styles::label_style()),
        marker,
        Span::raw(" "),
        Span::styled(value_text(app, field, focused), value_style),
    ])
}

fn day_line<'a>(app: &'a App, row: usize, key: &DayKey, style: Style) -> Line<'a> {
    let Some(selection) = app.form.selections().get(row) else {
        return Line::from("");
    };
    let checked = checkbox(selection.has_day(key));
    let variant = app
        .form
        .view()
        .day_options(&selection.offering)
        .into_iter()
        .flat_map(|option| option.variants)
        .find(|variant| &variant.key == key);

    let mut spans = vec![
        Span::raw("   "),
        Span::styled(format!("{} {}", checked, app.t(key.weekday().label_key())), style),
    ];
    if let Some(variant) = variant {
        if let Some(label) = variant.label.filter(|l| Some(l) != variant.time_range.as_ref()) {
            spans.push(Span::styled(format!("  {}", label), styles::label_style()));
        }
        if let Some(range) = variant.time_range {
            spans.push(Span::styled(format!("  {}", range), styles::muted_style()));
        }
        if variant.deviates {
            spans.push(Span::styled(format!("  ⓘ {}", app.t("offer.deviating")), styles::highlight_style()));
        }
    }
    Line::from(spans)
}

fn iban_lines(app: &App, lines: &mut Vec<Line>) {
    let indent = " ".repeat(LABEL_WIDTH + 2);
    if let Some(error) = app.form.payment().iban_error() {
        lines.push(Line::from(Span::styled(
            format!("{}{}", indent, app.t(error.message_key())),
            styles::error_style(),
        )));
    }

    let bank = match &app.bank_line {
        BankLine::Empty => return,
        BankLine::Pending => app.t("sepa.lookupPending").to_string(),
        BankLine::Found(info) => info.describe(app.t("sepa.noBankName")),
    };
    lines.push(Line::from(vec![
        Span::raw(indent),
        Span::styled(format!("{}: ", app.t("sepa.bank")), styles::muted_style()),
        Span::styled(bank, styles::success_style()),
    ]));
}

fn checkbox(checked: bool) -> String {
    let mark = if checked { "[x]" } else { "[ ]" };
    mark.to_string()
}

fn value_text(app: &App, field: &FormField, focused: bool) -> String {
    let form = &app.form;
    let choice = |value: Option<&str>| -> String {
        let shown = match value {
            Some(value) => value.to_string(),
            None => app.t("ui.choose").to_string(),
        };
        if focused {
            format!("‹ {} ›", shown)
        } else {
            shown
        }
    };

    match field.kind() {
        FieldKind::Text => {
            let text = app.text_of(field).unwrap_or_default();
            let cursor = if focused { "▌" } else { "" };
            if text.is_empty() && !focused && *field == FormField::ChildText(ChildField::BirthDate) {
                return app.t("child.birthDateFormat").to_string();
            }
            format!("{}{}", text, cursor)
        }
        FieldKind::Choice => match field {
            FormField::Salutation => choice(form.person().salutation.map(|s| app.t(s.label_key()))),
            FormField::Gender => choice(form.child().gender.map(|g| app.t(g.label_key()))),
            FormField::School => choice(Some(form.child().school.as_str()).filter(|s| !s.is_empty())),
            FormField::Class => choice(Some(form.child().class.as_str()).filter(|s| !s.is_empty())),
            FormField::Departure => choice(form.notes().departure.map(|m| app.t(m.label_key()))),
            FormField::Offering(row) => {
                let offering = form
                    .selections()
                    .get(*row)
                    .and_then(|s| form.view().offering(&s.offering));
                match offering {
                    Some(o) => match o.time_range() {
                        Some(range) => choice(Some(format!("{} ({})", o.name, range).as_str())),
                        None => choice(Some(o.name.as_str())),
                    },
                    None => choice(None),
                }
            }
            _ => String::new(),
        },
        FieldKind::Toggle => match field {
            FormField::TakesMedication => checkbox(form.notes().takes_medication),
            FormField::HasIntolerances => checkbox(form.notes().has_intolerances),
            FormField::Consent(consent) => checkbox(form.payment().consent(*consent)),
            FormField::Sibling(row) => checkbox(form.selections().get(*row).is_some_and(|s| s.sibling)),
            _ => String::new(),
        },
        FieldKind::Action => format!("[ + {} ]  (Ctrl+A)", app.t("offer.addRow")),
    }
}

/// Whether a required field currently holds an acceptable value.
fn is_filled(app: &App, field: &FormField) -> bool {
    let form = &app.form;
    match field {
        FormField::Salutation => form.person().salutation.is_some(),
        FormField::Gender => form.child().gender.is_some(),
        FormField::School => form.view().school().is_some(),
        FormField::Class => form.view().has_class(&form.child().class),
        FormField::Departure => form.notes().departure.is_some(),
        FormField::Consent(consent) => form.payment().consent(*consent),
        FormField::Iban => iban::validate(&form.payment().iban).is_ok(),
        FormField::ChildText(ChildField::BirthDate) => form.child().birth_date().is_some(),
        FormField::Offering(row) => form
            .selections()
            .get(*row)
            .is_some_and(|s| form.view().offering(&s.offering).is_some()),
        _ => app.text_of(field).is_some_and(|t| !t.trim().is_empty()),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None if app.form.step_complete(app.steps.current()) => format!(" {} ", app.t("ui.stepComplete")),
        None => format!(" {} ", app.t("ui.stepIncomplete")),
    };

    let next_key = if app.steps.current().is_last() {
        app.t("ui.submit")
    } else {
        app.t("ui.next")
    };
    let right_text = format!(
        " [Enter] {} | [PgUp] {} | [Esc] {} ",
        next_key,
        app.t("ui.back"),
        app.t("ui.quit")
    );

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let left_style = if app.status_message.is_some() {
        styles::highlight_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

fn help_line<'a>(key: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), styles::help_key_style()),
        Span::styled(description, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 21, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let help_text = vec![
        Line::from(Span::styled(format!("  {}", app.t("app.title")), styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", app.t("help.navigation")), styles::highlight_style())),
        help_line("Tab / ↓", app.t("help.nextField")),
        help_line("⇧Tab / ↑", app.t("help.prevField")),
        help_line("Enter", app.t("help.nextStep")),
        help_line("PgUp", app.t("help.prevStep")),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", app.t("help.editing")), styles::highlight_style())),
        help_line("← / →", app.t("help.choose")),
        help_line("Space", app.t("help.toggle")),
        help_line("Ctrl+A", app.t("help.addRow")),
        help_line("Ctrl+D", app.t("help.removeRow")),
        Line::from(""),
        help_line("F2", app.t("help.language")),
        help_line("Esc", app.t("help.quit")),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", app.t("help.close")), styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", app.t("quit.prompt")), styles::highlight_style())),
        Line::from(Span::styled(format!("  {}", app.t("quit.lost")), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Y]", styles::help_key_style()),
            Span::styled(format!(" {}, ", app.t("ui.quit")), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(format!(" {}", app.t("ui.cancel")), styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_submitted_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", app.t("submitted.title")), styles::success_style())),
        Line::from(""),
    ];
    if let Some(ref confirmation) = app.confirmation {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}: ", app.t("submitted.reference")), styles::muted_style()),
            Span::styled(confirmation.reference.clone(), styles::help_key_style()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("  {}: ", app.t("submitted.registrant")), styles::muted_style()),
            Span::styled(app.form.person().full_name(), styles::label_style()),
        ]));
        if let Some(ref path) = confirmation.location {
            lines.push(Line::from(Span::styled(
                format!("  {}", path.display()),
                styles::muted_style(),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!("  {}", app.t("submitted.close")), styles::muted_style())));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
