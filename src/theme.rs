use ratatui::style::Color;
use std::sync::atomic::{AtomicUsize, Ordering};

// Color palette structure
#[derive(Clone)]
pub struct Base16Palette {
    pub base_00: Color, // Background
    pub base_01: Color, // Lighter background
    pub base_02: Color, // Selection background
    pub base_03: Color, // Comments, invisibles
    pub base_04: Color, // Dark foreground
    pub base_05: Color, // Default foreground
    pub base_06: Color, // Light foreground
    pub base_07: Color, // Light background
    pub base_08: Color, // Red
    pub base_09: Color, // Orange
    pub base_0a: Color, // Yellow
    pub base_0b: Color, // Green
    pub base_0c: Color, // Cyan
    pub base_0d: Color, // Blue
    pub base_0e: Color, // Purple
    pub base_0f: Color, // Brown
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThemeId {
    OceanicNext = 0,
    CatppuccinMocha = 1,
}

impl ThemeId {
    pub fn name(&self) -> &'static str {
        match self {
            ThemeId::OceanicNext => "Oceanic Next",
            ThemeId::CatppuccinMocha => "Catppuccin Mocha",
        }
    }

    pub fn all() -> &'static [ThemeId] {
        &[ThemeId::OceanicNext, ThemeId::CatppuccinMocha]
    }

    pub fn from_name(name: &str) -> Self {
        ThemeId::all()
            .iter()
            .copied()
            .find(|id| id.name() == name)
            .unwrap_or(ThemeId::OceanicNext)
    }

    pub fn next(&self) -> Self {
        let all = ThemeId::all();
        all[(*self as usize + 1) % all.len()]
    }

    fn from_index(idx: usize) -> Self {
        match idx {
            0 => ThemeId::OceanicNext,
            1 => ThemeId::CatppuccinMocha,
            _ => ThemeId::OceanicNext,
        }
    }
}

static CURRENT_THEME_INDEX: AtomicUsize = AtomicUsize::new(0);

pub fn current_theme_id() -> ThemeId {
    ThemeId::from_index(CURRENT_THEME_INDEX.load(Ordering::Relaxed))
}

pub fn set_theme(theme: ThemeId) {
    CURRENT_THEME_INDEX.store(theme as usize, Ordering::Relaxed);
}

pub fn current_theme() -> &'static Base16Palette {
    match current_theme_id() {
        ThemeId::OceanicNext => &OCEANIC_NEXT_PALETTE,
        ThemeId::CatppuccinMocha => &CATPPUCCIN_MOCHA_PALETTE,
    }
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

// Oceanic Next theme
static OCEANIC_NEXT_PALETTE: Base16Palette = Base16Palette {
    base_00: rgb(0x1B2B34),
    base_01: rgb(0x343D46),
    base_02: rgb(0x4F5B66),
    base_03: rgb(0x65737E),
    base_04: rgb(0xA7ADBA),
    base_05: rgb(0xC0C5CE),
    base_06: rgb(0xCDD3DE),
    base_07: rgb(0xF0F4F8),
    base_08: rgb(0xEC5F67),
    base_09: rgb(0xF99157),
    base_0a: rgb(0xFAC863),
    base_0b: rgb(0x99C794),
    base_0c: rgb(0x5FB3B3),
    base_0d: rgb(0x6699CC),
    base_0e: rgb(0xC594C5),
    base_0f: rgb(0xAB7967),
};

// Catppuccin Mocha theme
// Mapped from: base=#1E1E2E, surface0=#313244, surface1=#45475A, overlay0=#6C7086
// overlay1=#7F849C, subtext0=#A6ADC8, text=#CDD6F4, rosewater=#F5E0DC
// red=#F38BA8, peach=#FAB387, yellow=#F9E2AF, green=#A6E3A1
// teal=#94E2D5, blue=#89B4FA, mauve=#CBA6F7, maroon=#EBA0AC
static CATPPUCCIN_MOCHA_PALETTE: Base16Palette = Base16Palette {
    base_00: rgb(0x1E1E2E), // base - Background
    base_01: rgb(0x313244), // surface0 - Lighter background
    base_02: rgb(0x45475A), // surface1 - Selection background
    base_03: rgb(0x6C7086), // overlay0 - Comments, invisibles
    base_04: rgb(0x7F849C), // overlay1 - Dark foreground
    base_05: rgb(0xA6ADC8), // subtext0 - Default foreground
    base_06: rgb(0xCDD6F4), // text - Light foreground
    base_07: rgb(0xF5E0DC), // rosewater - Light background
    base_08: rgb(0xF38BA8), // red - Red
    base_09: rgb(0xFAB387), // peach - Orange
    base_0a: rgb(0xF9E2AF), // yellow - Yellow
    base_0b: rgb(0xA6E3A1), // green - Green
    base_0c: rgb(0x94E2D5), // teal - Cyan
    base_0d: rgb(0x89B4FA), // blue - Blue
    base_0e: rgb(0xCBA6F7), // mauve - Purple
    base_0f: rgb(0xEBA0AC), // maroon - Brown
};

impl Base16Palette {
    /// Color for the pressure gauge as the accumulator fills: green while
    /// far from the threshold, orange when close, red at/over it.
    pub fn pressure_color(&self, ratio: f64) -> Color {
        if ratio >= 1.0 {
            self.base_08
        } else if ratio >= 0.7 {
            self.base_09
        } else {
            self.base_0b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_roundtrips_through_name() {
        for id in ThemeId::all() {
            assert_eq!(ThemeId::from_name(id.name()), *id);
        }
        assert_eq!(ThemeId::from_name("nonsense"), ThemeId::OceanicNext);
    }

    #[test]
    fn next_cycles_through_all_themes() {
        let mut id = ThemeId::OceanicNext;
        for _ in 0..ThemeId::all().len() {
            id = id.next();
        }
        assert_eq!(id, ThemeId::OceanicNext);
    }

    #[test]
    fn pressure_color_escalates() {
        let palette = &OCEANIC_NEXT_PALETTE;
        assert_eq!(palette.pressure_color(0.0), palette.base_0b);
        assert_eq!(palette.pressure_color(0.8), palette.base_09);
        assert_eq!(palette.pressure_color(1.0), palette.base_08);
    }
}
