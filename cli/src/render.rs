use owo_colors::OwoColorize;
use pager_core::PageView;

/// Render the whole page as terminal text.
pub fn render(view: &PageView) -> String {
    let mut out = String::new();
    if view.loading {
        out.push_str("Loading...\n");
    } else if view.rows.is_empty() {
        out.push_str(&format!("{}\n", "(no items)".dimmed()));
    }
    if !view.loading {
        for (n, row) in view.rows.iter().enumerate() {
            let mark = if row.completed {
                format!("{}", "[x]".green())
            } else {
                "[ ]".to_string()
            };
            let text = if row.editing {
                format!("{} {}", "edit>".yellow(), row.text)
            } else if row.completed {
                format!("{}", row.text.dimmed().strikethrough())
            } else {
                row.text.clone()
            };
            out.push_str(&format!("{:>2}. {mark} {text}\n", n + 1));
        }
    }

    let prev = control("< prev", view.prev_enabled);
    let next = control("next >", view.next_enabled);
    out.push_str(&format!("{prev}   {}   {next}\n", view.page_label.bold()));

    if let Some(error) = &view.error {
        out.push_str(&format!("{} {error}\n", "last request failed:".red()));
    }
    out
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        label.cyan().to_string()
    } else {
        label.dimmed().to_string()
    }
}
