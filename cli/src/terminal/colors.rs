use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Yellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const PRIVATE_ADDR: Color = Color::Cyan;
pub const PUBLIC_ADDR: Color = Color::BrightMagenta;
