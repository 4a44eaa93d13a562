use crossterm::style::Color;
use opsdeck_core::catalog::{ColorDefinition, ThemeDefinition};
use opsdeck_core::error::{Error, Result};

/// Trait for converting color definitions to terminal colors
pub trait AsTermColor {
    fn as_crossterm_color(&self) -> Result<Option<Color>>;
}

impl AsTermColor for ColorDefinition {
    fn as_crossterm_color(&self) -> Result<Option<Color>> {
        match (self.rgb, self.ansi, &self.name) {
            (Some((r, g, b)), None, None) => Ok(Some(Color::Rgb { r, g, b })),
            (None, Some(ansi), None) => Ok(Some(Color::AnsiValue(ansi))),
            (None, None, Some(name)) => named_color(name).map(Some),
            (None, None, None) => Ok(None),
            _ => Err(Error::MultipleColorTypes),
        }
    }
}

fn named_color(name: &str) -> Result<Color> {
    Ok(match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "darkgrey" => Color::DarkGrey,
        "red" => Color::Red,
        "darkred" => Color::DarkRed,
        "green" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "darkyellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "darkblue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "darkmagenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "darkcyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" => Color::Grey,
        _ => return Err(Error::UnknownColorName(name.to_string())),
    })
}

/// Colors used by the console views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub item: Color,
    pub selected_background: Color,
    pub description: Color,
    pub script: Color,
    pub help: Color,
    pub category: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::AnsiValue(205),
            item: Color::Reset,
            selected_background: Color::AnsiValue(236),
            description: Color::AnsiValue(245),
            script: Color::AnsiValue(241),
            help: Color::AnsiValue(241),
            category: Color::AnsiValue(99),
            error: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

impl Theme {
    /// Overlays the colors a catalog defines onto the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a color defines more than one of `rgb`, `ansi`
    /// and `name`, or uses an unknown name.
    pub fn from_definition(definition: &ThemeDefinition) -> Result<Self> {
        let defaults = Self::default();
        let pick = |color: &Option<ColorDefinition>, fallback: Color| -> Result<Color> {
            match color {
                None => Ok(fallback),
                Some(color) => Ok(color.as_crossterm_color()?.unwrap_or(fallback)),
            }
        };

        Ok(Self {
            accent: pick(&definition.accent, defaults.accent)?,
            item: pick(&definition.item, defaults.item)?,
            selected_background: pick(
                &definition.selected_background,
                defaults.selected_background,
            )?,
            description: pick(&definition.description, defaults.description)?,
            script: pick(&definition.script, defaults.script)?,
            help: pick(&definition.help, defaults.help)?,
            category: pick(&definition.category, defaults.category)?,
            error: pick(&definition.error, defaults.error)?,
            success: pick(&definition.success, defaults.success)?,
            warning: pick(&definition.warning, defaults.warning)?,
        })
    }
}
