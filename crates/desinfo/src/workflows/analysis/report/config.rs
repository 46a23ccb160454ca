use super::super::domain::{Category, CategoryTable};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without a leading `#`, as used by WordprocessingML.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0` for PDF colour operators.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Static texts and colours used by every report target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    pub title: String,
    pub detail_title: String,
    pub descriptions: CategoryTable<String>,
    pub palette: CategoryTable<Rgb>,
    /// Colour for anything without a category, e.g. unrecognized labels.
    pub neutral: Rgb,
}

impl ReportConfig {
    pub fn standard() -> Self {
        Self {
            title: "Vollständige Auswertung".to_string(),
            detail_title: "Vollständige Auswertung des Textes".to_string(),
            descriptions: CategoryTable::from_fn(|category| standard_description(category).to_string()),
            palette: CategoryTable {
                falsch: Rgb::new(220, 53, 69),
                delegitimierung: Rgb::new(253, 126, 20),
                verzerrung: Rgb::new(255, 193, 7),
                frame: Rgb::new(40, 167, 69),
                wahr: Rgb::new(0, 123, 255),
            },
            neutral: Rgb::new(108, 117, 125),
        }
    }

    pub fn color(&self, category: Category) -> Rgb {
        *self.palette.get(category)
    }

    pub fn description(&self, category: Category) -> &str {
        self.descriptions.get(category)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_description(category: Category) -> &'static str {
    match category {
        Category::Falsch => "Objektiv widerlegte Behauptungen. Es liegen belastbare Daten oder Ereignisprotokolle vor, die das Gegenteil zeigen.",
        Category::Delegitimierung => "Abwertung oder Untergrabung von Personen, Gruppen oder Institutionen. Sprachliche Diskreditierungen, Kampfbegriffe oder systematische Diffamierungen.",
        Category::Verzerrung => "Formal richtige Kernaussagen, die durch Übertreibung, Verkürzung oder Kontextausblendung ein schiefes Bild erzeugen.",
        Category::Frame => "Sprachliche Deutungsrahmen, die neutrale Sachverhalte emotional oder normativ aufladen.",
        Category::Wahr => "Sachlich zutreffende Aussagen, die überprüfbar sind und keinen überzogenen Frame, keine Verzerrung oder Delegitimierung enthalten.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_format_for_each_target() {
        let red = ReportConfig::standard().color(Category::Falsch);
        assert_eq!(red.hex(), "DC3545");
        assert_eq!(red.css(), "#dc3545");
        let (r, _, b) = red.unit();
        assert!((r - 220.0 / 255.0).abs() < f32::EPSILON);
        assert!((b - 69.0 / 255.0).abs() < f32::EPSILON);
    }
}
