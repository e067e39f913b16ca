//! Styled terminal output helpers.

use console::Style;

use handlebox_types::primitives::{Address, Amount};

pub fn style_bold() -> Style {
    Style::new().bold()
}

pub fn style_dim() -> Style {
    Style::new().dim()
}

pub fn style_info() -> Style {
    Style::new().cyan()
}

pub fn print_divider() {
    println!("  {}", Style::new().dim().apply_to("─".repeat(48)));
}

pub fn print_success(msg: &str) {
    println!("  {} {}", Style::new().green().apply_to("✓"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("  {} {}", Style::new().red().apply_to("✗"), msg);
}

/// Shortened hex form of an address for display.
pub fn format_address(addr: &Address) -> String {
    let h = hex::encode(addr);
    format!("{}..{}", &h[..8], &h[h.len() - 6..])
}

/// Render a microunit amount as whole units with six decimals.
pub fn format_amount(amount: Amount) -> String {
    format!("{}.{:06}", amount / 1_000_000, amount % 1_000_000)
}
