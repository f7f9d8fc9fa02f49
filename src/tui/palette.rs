//! Widget color palettes for the six selectable themes.

use ratatui::style::Color;

use crate::theme::Theme;

/// Colors applied across the interface for one theme.
pub struct Palette {
    /// Window background.
    pub background: Color,
    /// Regular text on the window background.
    pub text: Color,
    /// Background of list and input widgets.
    pub panel: Color,
    /// Status bar and button accents.
    pub bar: Color,
    /// Text on the bar color.
    pub bar_text: Color,
}

const BLACK: Color = Color::Rgb(0x00, 0x00, 0x00);
const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

/// Resolve the palette for a theme.
pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::Rgb(0xf0, 0xf0, 0xf0),
            text: BLACK,
            panel: WHITE,
            bar: Color::Rgb(0xdc, 0xdc, 0xdc),
            bar_text: BLACK,
        },
        Theme::Dark => Palette {
            background: Color::Rgb(0x2b, 0x2b, 0x2b),
            text: WHITE,
            panel: Color::Rgb(0x3c, 0x3c, 0x3c),
            bar: Color::Rgb(0x55, 0x55, 0x55),
            bar_text: WHITE,
        },
        Theme::Gray => Palette {
            background: Color::Rgb(0x80, 0x80, 0x80),
            text: WHITE,
            panel: Color::Rgb(0xa9, 0xa9, 0xa9),
            bar: Color::Rgb(0x69, 0x69, 0x69),
            bar_text: WHITE,
        },
        Theme::Blue => Palette {
            background: Color::Rgb(0x87, 0xce, 0xeb),
            text: BLACK,
            panel: Color::Rgb(0xb0, 0xe0, 0xe6),
            bar: Color::Rgb(0x1e, 0x90, 0xff),
            bar_text: WHITE,
        },
        Theme::Green => Palette {
            background: Color::Rgb(0x8f, 0xbc, 0x8f),
            text: BLACK,
            panel: Color::Rgb(0x98, 0xfb, 0x98),
            bar: Color::Rgb(0x3c, 0xb3, 0x71),
            bar_text: WHITE,
        },
        Theme::Red => Palette {
            background: Color::Rgb(0xcd, 0x5c, 0x5c),
            text: BLACK,
            panel: Color::Rgb(0xfa, 0x80, 0x72),
            bar: Color::Rgb(0xb2, 0x22, 0x22),
            bar_text: WHITE,
        },
    }
}
