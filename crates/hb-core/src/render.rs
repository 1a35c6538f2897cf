//! List renderer
//!
//! Turns the visible part of a catalog into positioned, coloured text lines.
//! Cost and failure are recomputed for every row on every call, so the list
//! always reflects the player's current mana and status.

use crate::catalog::{PowerCatalog, PowerDescriptor, PowerSource, Resource};
use crate::chance::{ChanceResult, evaluate};
use crate::io::Color;
use crate::options::MAX_PAGE_ROWS;
use crate::player::PlayerState;
use crate::selection::{NavigationMode, SelectionCursor};
use crate::tags::index_to_label;

/// Screen row of the list header (row 0 is the prompt line)
pub const LIST_ROW: u16 = 1;
/// Screen column of the list
pub const LIST_COL: u16 = 1;
/// Column of the right-hand block when a typed list is split
pub const RIGHT_BLOCK_COL: u16 = 41;

const NAME_WIDTH: usize = 28;
const SHORT_NAME_WIDTH: usize = 26;

/// One positioned line of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub color: Color,
}

impl ListLine {
    fn new(row: u16, col: u16, text: String, color: Color) -> Self {
        Self {
            row,
            col,
            text,
            color,
        }
    }
}

/// Number of pages a view of `len` entries needs
pub fn page_count(len: usize, page_rows: usize) -> usize {
    len.div_ceil(page_rows.max(1)).max(1)
}

/// Rows per block when a typed list of `len` entries is split in two
pub fn split_rows(len: usize, page_rows: usize) -> usize {
    page_rows.max(len.div_ceil(2)).clamp(1, MAX_PAGE_ROWS)
}

/// Rows the list may occupy below the prompt, header and footer included
pub fn list_height(page_rows: usize) -> u16 {
    u16::try_from(page_rows + 2).unwrap_or(u16::MAX)
}

fn truncate(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

fn row_color(power: &PowerDescriptor, chance: &ChanceResult, player: &PlayerState) -> Color {
    if !power.is_ready() {
        Color::Slate
    } else if power.resource != Resource::Nothing
        && chance.effective_cost > player.available(power.resource)
    {
        Color::Orange
    } else {
        Color::White
    }
}

fn info_column<S: PowerSource + ?Sized>(
    source: &S,
    power: &PowerDescriptor,
    player: &PlayerState,
) -> String {
    if power.is_ready() {
        source.describe_row(power, player)
    } else {
        power.availability.to_string()
    }
}

fn marker(mode: NavigationMode, selected: bool) -> &'static str {
    match (mode, selected) {
        (NavigationMode::Menu, true) => "> ",
        (NavigationMode::Menu, false) => "  ",
        (NavigationMode::Typed, _) => "",
    }
}

fn label_of(index: usize) -> String {
    index_to_label(index)
        .map(|c| format!("{})", c))
        .unwrap_or_else(|| "  ".to_string())
}

fn full_row<S: PowerSource + ?Sized>(
    source: &S,
    power: &PowerDescriptor,
    player: &PlayerState,
    prefix: &str,
    details: bool,
) -> (String, Color) {
    let chance = evaluate(power, player);
    let name = truncate(&power.name, NAME_WIDTH);
    let text = if details {
        format!("{} {:<w$} {}", prefix, name, source.description(power), w = NAME_WIDTH)
    } else {
        format!(
            "{} {:<w$} {:>3} {:>4} {:>3}% {}",
            prefix,
            name,
            power.min_level,
            chance.effective_cost,
            chance.fail_percent,
            info_column(source, power, player),
            w = NAME_WIDTH
        )
    };
    (text.trim_end().to_string(), row_color(power, &chance, player))
}

fn header(mode: NavigationMode, details: bool) -> String {
    let pad = match mode {
        NavigationMode::Menu => "     ",
        NavigationMode::Typed => "   ",
    };
    if details {
        format!("{}{:<w$} Description", pad, "Name", w = NAME_WIDTH)
    } else {
        format!(
            "{}{:<w$} {:>3} {:>4} {:>4} Info",
            pad,
            "Name",
            "Lv",
            "Cost",
            "Fail",
            w = NAME_WIDTH
        )
    }
}

/// Render the visible view of `catalog` for the cursor state
pub fn render<S: PowerSource + ?Sized>(
    source: &S,
    catalog: &PowerCatalog,
    cursor: &SelectionCursor,
    player: &PlayerState,
    page_rows: usize,
) -> Vec<ListLine> {
    let page_rows = page_rows.clamp(1, MAX_PAGE_ROWS);
    let view = catalog.view(cursor.category);
    let entries = catalog.entries().get(view).unwrap_or(&[]);

    match cursor.input_mode {
        NavigationMode::Typed if entries.len() > page_rows && !cursor.show_details => {
            render_split(entries, player, split_rows(entries.len(), page_rows))
        }
        NavigationMode::Typed => render_rows(source, entries, cursor, player, 0..entries.len()),
        NavigationMode::Menu => {
            let start = (cursor.current_page * page_rows).min(entries.len());
            let end = (start + page_rows).min(entries.len());
            let mut lines = render_rows(source, entries, cursor, player, start..end);
            let pages = page_count(entries.len(), page_rows);
            if pages > 1 {
                let row = LIST_ROW + 1 + u16::try_from(page_rows).unwrap_or(u16::MAX - 2);
                lines.push(ListLine::new(
                    row,
                    LIST_COL,
                    format!("-- page {} of {} --", cursor.current_page + 1, pages),
                    Color::LightBlue,
                ));
            }
            lines
        }
    }
}

fn render_rows<S: PowerSource + ?Sized>(
    source: &S,
    entries: &[PowerDescriptor],
    cursor: &SelectionCursor,
    player: &PlayerState,
    range: std::ops::Range<usize>,
) -> Vec<ListLine> {
    let mut lines = vec![ListLine::new(
        LIST_ROW,
        LIST_COL,
        header(cursor.input_mode, cursor.show_details),
        Color::White,
    )];
    for (row, index) in range.enumerate() {
        let Some(power) = entries.get(index) else {
            break;
        };
        let prefix = format!(
            "{}{}",
            marker(cursor.input_mode, index == cursor.current_index),
            label_of(index)
        );
        let (text, color) = full_row(source, power, player, &prefix, cursor.show_details);
        let row = LIST_ROW + 1 + u16::try_from(row).unwrap_or(u16::MAX - 2);
        lines.push(ListLine::new(row, LIST_COL, text, color));
    }
    lines
}

/// Two column blocks of label, name and failure
fn render_split(entries: &[PowerDescriptor], player: &PlayerState, block_rows: usize) -> Vec<ListLine> {
    let block_header = format!("   {:<w$} Fail", "Name", w = SHORT_NAME_WIDTH);
    let mut lines = vec![
        ListLine::new(LIST_ROW, LIST_COL, block_header.clone(), Color::White),
        ListLine::new(LIST_ROW, RIGHT_BLOCK_COL, block_header, Color::White),
    ];
    for (index, power) in entries.iter().enumerate() {
        let (block, row) = (index / block_rows, index % block_rows);
        if block > 1 {
            break;
        }
        let chance = evaluate(power, player);
        let text = format!(
            "{} {:<w$} {:>3}%",
            label_of(index),
            truncate(&power.name, SHORT_NAME_WIDTH),
            chance.fail_percent,
            w = SHORT_NAME_WIDTH
        );
        let col = if block == 0 { LIST_COL } else { RIGHT_BLOCK_COL };
        let row = LIST_ROW + 1 + u16::try_from(row).unwrap_or(u16::MAX - 2);
        lines.push(ListLine::new(row, col, text, row_color(power, &chance, player)));
    }
    lines
}
