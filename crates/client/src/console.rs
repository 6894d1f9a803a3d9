//! Line-oriented terminal front end.

use std::io::{BufRead, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use thiserror::Error;

use stockmesh_inventory::{ItemDraft, ItemId, PageResult, format_code_input};

use crate::render::{Notice, NoticeKind, Renderer};
use crate::view::{NoticeSlot, PaginationControls, format_timestamp, item_count_label};

pub const HELP: &str = "\
commands:
  add <CODE> <QTY> <NAME...>   add an item
  search <TERM...>             filter by code or name
  refresh                      clear the filter and reload
  next | prev                  change page
  delete <ID> <CODE>           delete an item (asks first)
  edit <ID>                    edit an item
  help                         show this text
  quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(ItemDraft),
    Search(String),
    Refresh,
    Next,
    Prev,
    Delete { id: ItemId, code: String },
    Edit(ItemId),
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let cmd = match verb.to_lowercase().as_str() {
        "add" => match rest.as_slice() {
            [code, qty, name @ ..] if !name.is_empty() => Command::Add(ItemDraft::from_form(
                &format_code_input(code),
                &name.join(" "),
                qty,
            )),
            _ => return Err(CommandError::Usage("add <CODE> <QTY> <NAME...>")),
        },
        "search" => Command::Search(rest.join(" ")),
        "refresh" => Command::Refresh,
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "delete" => match rest.as_slice() {
            [id, code] => Command::Delete {
                id: ItemId::new(*id),
                code: code.to_uppercase(),
            },
            _ => return Err(CommandError::Usage("delete <ID> <CODE>")),
        },
        "edit" => match rest.as_slice() {
            [id] => Command::Edit(ItemId::new(*id)),
            _ => return Err(CommandError::Usage("edit <ID>")),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

/// [`Renderer`] that writes to a terminal and reads confirmations from it.
pub struct TerminalRenderer {
    out: Mutex<Box<dyn Write + Send>>,
    input: Mutex<Box<dyn BufRead + Send>>,
    notice: Mutex<NoticeSlot>,
}

fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TerminalRenderer {
    pub fn new(out: Box<dyn Write + Send>, input: Box<dyn BufRead + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            input: Mutex::new(input),
            notice: Mutex::new(NoticeSlot::default()),
        }
    }

    pub fn stdio() -> Self {
        Self::new(
            Box::new(std::io::stdout()),
            Box::new(std::io::BufReader::new(std::io::stdin())),
        )
    }

    /// Print `text` as-is.
    pub fn print(&self, text: &str) {
        let mut out = lock(&self.out);
        // A closed terminal is not worth failing a cycle over.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    /// Print the input prompt, prefixed by the notice if it is still live.
    pub fn prompt(&self) {
        let status = lock(&self.notice)
            .current(Instant::now())
            .map(|n| format!("[{}] ", n.message))
            .unwrap_or_default();
        let mut out = lock(&self.out);
        let _ = write!(out, "{status}> ");
        let _ = out.flush();
    }

    /// Read one line of user input. `None` at end of input.
    pub fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match lock(&self.input).read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

fn notice_tag(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "ok",
        NoticeKind::Error => "error",
        NoticeKind::Warning => "warn",
    }
}

/// The item table for a page, with count and pagination footer.
pub fn format_page(page: &PageResult) -> String {
    let mut text = format!(
        "{:<6}  {:<6}  {:<24}  {:>8}  {}\n",
        "ID", "CODE", "NAME", "QTY", "CREATED"
    );
    for item in &page.items {
        text.push_str(&format!(
            "{:<6}  {:<6}  {:<24}  {:>8}  {}\n",
            item.id,
            item.code,
            item.name,
            item.quantity,
            format_timestamp(&item.created_at)
        ));
    }
    text.push_str(&item_count_label(page));

    let controls = PaginationControls::for_page(page);
    if controls.visible {
        let prev = if controls.prev_enabled { "prev" } else { "----" };
        let next = if controls.next_enabled { "next" } else { "----" };
        text.push_str(&format!("  |  {prev}  {}  {next}", controls.label));
    }
    text
}

impl Renderer for TerminalRenderer {
    fn render_page(&self, page: &PageResult) {
        self.print(&format_page(page));
    }

    fn render_empty(&self) {
        self.print("No items found. Add one with `add <CODE> <QTY> <NAME...>`.");
    }

    fn render_error(&self, message: &str) {
        self.print(&format!("{message}\nCheck the service mesh configuration and try again."));
    }

    fn show_loading(&self) {
        self.print("Loading inventory...");
    }

    fn show_notice(&self, notice: &Notice) {
        self.print(&format!("[{}] {}", notice_tag(notice.kind), notice.message));
        lock(&self.notice).show(notice.clone(), Instant::now());
    }

    fn reset_form(&self) {}

    fn confirm(&self, prompt: &str) -> bool {
        {
            let mut out = lock(&self.out);
            let _ = write!(out, "{prompt} [y/N] ");
            let _ = out.flush();
        }
        self.read_line()
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    use stockmesh_inventory::Item;

    /// Writer that keeps what was written, readable after the renderer is moved.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn renderer(input: &str) -> (TerminalRenderer, Captured) {
        let out = Captured::default();
        let r = TerminalRenderer::new(
            Box::new(out.clone()),
            Box::new(Cursor::new(input.as_bytes().to_vec())),
        );
        (r, out)
    }

    #[test]
    fn parse_add_formats_code_and_joins_name() {
        let cmd = parse_command("add ab-1234 7 Blue   widget").unwrap().unwrap();
        assert_eq!(cmd, Command::Add(ItemDraft::from_form("AB1234", "Blue widget", "7")));
    }

    #[test]
    fn parse_reports_usage_and_unknown() {
        assert_eq!(
            parse_command("add AB1234 7"),
            Err(CommandError::Usage("add <CODE> <QTY> <NAME...>"))
        );
        assert_eq!(parse_command("delete 4"), Err(CommandError::Usage("delete <ID> <CODE>")));
        assert_eq!(parse_command("frobnicate"), Err(CommandError::Unknown("frobnicate".into())));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn parse_simple_verbs() {
        assert_eq!(parse_command("NEXT").unwrap(), Some(Command::Next));
        assert_eq!(parse_command("previous").unwrap(), Some(Command::Prev));
        assert_eq!(
            parse_command("search blue widget").unwrap(),
            Some(Command::Search("blue widget".into()))
        );
        assert_eq!(parse_command("search").unwrap(), Some(Command::Search(String::new())));
        assert_eq!(
            parse_command("delete 4 ab1234").unwrap(),
            Some(Command::Delete {
                id: ItemId::new("4"),
                code: "AB1234".into()
            })
        );
    }

    #[test]
    fn format_page_shows_rows_count_and_pagination() {
        let page = PageResult {
            items: vec![Item {
                id: ItemId::new("7"),
                code: "AB1234".into(),
                name: "Widget".into(),
                quantity: 3,
                created_at: Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap(),
            }],
            page: 1,
            total_pages: 2,
            total_count: 21,
        };

        let text = format_page(&page);
        assert!(text.contains("AB1234"));
        assert!(text.contains("Jan 5, 2024, 02:30 PM"));
        assert!(text.contains("21 items"));
        assert!(text.contains("----  Page 1 of 2  next"));
    }

    #[test]
    fn format_page_hides_pagination_for_single_page() {
        let page = PageResult {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_count: 0,
        };
        assert!(!format_page(&page).contains("Page"));
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let (r, out) = renderer("y\nno\n");
        assert!(r.confirm("Delete?"));
        assert!(!r.confirm("Delete?"));
        // End of input counts as "no".
        assert!(!r.confirm("Delete?"));
        assert!(out.text().contains("Delete? [y/N] "));
    }

    #[test]
    fn notices_are_printed_and_shown_in_prompt_while_live() {
        let (r, out) = renderer("");
        r.show_notice(&Notice {
            kind: NoticeKind::Error,
            message: "locked".into(),
            ttl: Duration::from_secs(60),
        });
        r.prompt();

        let text = out.text();
        assert!(text.contains("[error] locked\n"));
        assert!(text.ends_with("[locked] > "));
    }
}
