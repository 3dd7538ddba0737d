//! Layout helpers for human-readable output.
//!
//! Everything goes through [`print`], which emits on the raw print target so
//! the log formatter writes it without a status symbol.

use std::cell::Cell;

use crate::terminal::colors;
use crate::terminal::format::Detail;
use crate::terminal::logging::PRINT_TARGET;
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;

thread_local! {
    static KEY_WIDTH: Cell<usize> = const { Cell::new(0) }
}

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

/// A full-width line of `fill` with `label` in the middle.
fn rule(label: ColoredString, label_width: usize, fill: &str) {
    let pad = TOTAL_WIDTH.saturating_sub(label_width);
    let left = fill.repeat(pad / 2).color(colors::SEPARATOR);
    let right = fill.repeat(pad - pad / 2).color(colors::SEPARATOR);
    print(&format!("{left}{label}{right}"));
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }
    let text = format!("⟦ AUTHBENCH v{} ⟧", env!("CARGO_PKG_VERSION"));
    rule(text.bright_green().bold(), text.width(), "═");
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let text = format!("⟦ {} ⟧", msg.to_uppercase());
    rule(text.color(colors::PRIMARY), text.width(), "─");
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn end_of_program(q_level: u8) {
    if q_level == 0 {
        fat_separator();
    }
}

/// Sets the column `aligned_line` pads keys to.
pub fn set_key_width(keys: &[&str]) {
    KEY_WIDTH.set(keys.iter().map(|k| k.width()).max().unwrap_or(0));
}

/// `> Key.....: value`, with keys padded to the width from [`set_key_width`].
pub fn aligned_line(key: &str, value: ColoredString) {
    let dots = ".".repeat((KEY_WIDTH.get() + 1).saturating_sub(key.width()));
    print(&format!(
        "{} {}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        format!("{dots}:").color(colors::SEPARATOR),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(details: Vec<Detail>) {
    let count = details.len();
    for (i, (key, value)) in details.into_iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let dots = format!("{}:", ".".repeat(8usize.saturating_sub(key.len())));
        print(&format!(
            " {} {}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}"));
}
