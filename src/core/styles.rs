//! Style roles expressed as an enum + macro mapping logical names to `colored::Color`.
//!
//! Coloring is applied only when the `enabled` flag passed to `paint()` is
//! true, so there is no global colour state.
//!
//! ```
//! use zapscan::core::styles::StyleRole;
//! assert_eq!(StyleRole::Heading.paint("Found 2 alerts:", false), "Found 2 alerts:");
//! assert!(StyleRole::Heading.paint("Found 2 alerts:", true).starts_with("\x1b["));
//! ```

use clap::builder::styling::AnsiColor;
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }

            pub fn ansi_code(self) -> Option<String> {
                map_color_code(self.color()?)
            }

            pub fn paint(self, text: &str, enabled: bool) -> String {
                if !enabled { return text.to_string(); }
                if let Some(code) = self.ansi_code() { return format!("\x1b[{}m{}\x1b[0m", code, text); }
                text.to_string()
            }
        }
    }
}

style! {
    Heading     => Some(Color::Yellow),
    Literal     => Some(Color::Cyan),
    Placeholder => Some(Color::Green),
    Valid       => Some(Color::Green),
    Invalid     => Some(Color::Red),
    Error       => Some(Color::BrightRed),
    Url         => Some(Color::Cyan),
    Progress    => Some(Color::Blue),
    Success     => Some(Color::BrightGreen),
    RiskHigh    => Some(Color::BrightRed),
    RiskMedium  => Some(Color::Yellow),
    RiskLow     => Some(Color::Blue),
    Value       => None,
    Dim         => Some(Color::BrightBlack)
}

impl StyleRole {
    /// Pick a role from a scanner risk description such as "High (Medium)"
    pub fn for_risk(risk_desc: &str) -> StyleRole {
        let risk = risk_desc.split_whitespace().next().unwrap_or_default();
        match risk.to_ascii_lowercase().as_str() {
            "high" => StyleRole::RiskHigh,
            "medium" => StyleRole::RiskMedium,
            "low" => StyleRole::RiskLow,
            "informational" => StyleRole::Dim,
            _ => StyleRole::Value,
        }
    }
}

fn map_color_code(c: Color) -> Option<String> {
    use Color::*;
    match c {
        Black => Some("30".to_string()),
        Red => Some("31".to_string()),
        Green => Some("32".to_string()),
        Yellow => Some("33".to_string()),
        Blue => Some("34".to_string()),
        Magenta => Some("35".to_string()),
        Cyan => Some("36".to_string()),
        White => Some("37".to_string()),
        BrightBlack => Some("90".to_string()),
        BrightRed => Some("91".to_string()),
        BrightGreen => Some("92".to_string()),
        BrightYellow => Some("93".to_string()),
        BrightBlue => Some("94".to_string()),
        BrightMagenta => Some("95".to_string()),
        BrightCyan => Some("96".to_string()),
        BrightWhite => Some("97".to_string()),
        TrueColor { r, g, b } => Some(format!("38;2;{};{};{}", r, g, b)),
    }
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use AnsiColor as A;
    use Color::*;
    Some(match c {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        _ => return None,
    })
}

/// Build clap Styles for help output from the same roles
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Heading, true))
        .literal(style(StyleRole::Literal, false))
        .placeholder(style(StyleRole::Placeholder, false))
        .valid(style(StyleRole::Valid, false))
        .invalid(style(StyleRole::Invalid, false))
        .error(style(StyleRole::Error, false))
}
