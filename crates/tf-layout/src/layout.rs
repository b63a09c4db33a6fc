//! Ticket layout description

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tf_core::{Ticket, TicketSet};

use crate::color::Rgb;
use crate::fit::{FittedText, TextMeasure, fit_font_size};
use crate::{LayoutError, LayoutResult};

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point, used as origin for centred text
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Text appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// HTML colour string
    pub color: String,
    /// Font size in points
    pub size: u32,
    /// Font family name
    pub font: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl TextStyle {
    pub fn rgb(&self) -> LayoutResult<Rgb> {
        Rgb::from_html(&self.color)
    }
}

/// Where everything goes on one ticket image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketLayout {
    /// Background image every ticket is drawn onto
    pub base_image: String,
    pub serial_number_position: Rect,
    pub barcode_position: Rect,
    pub serial_number_style: TextStyle,
    /// One rectangle per ticket field, in field order
    pub fields: Vec<Rect>,
    pub field_style: TextStyle,
}

impl TicketLayout {
    /// Load from a JSON file and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> LayoutResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if self.base_image.trim().is_empty() {
            return Err(LayoutError::InvalidLayout("base image is not set".into()));
        }
        if self.fields.is_empty() {
            return Err(LayoutError::InvalidLayout("no field positions defined".into()));
        }

        let named = [
            ("serial number position", &self.serial_number_position),
            ("barcode position", &self.barcode_position),
        ];
        for (name, rect) in named {
            if rect.is_empty() {
                return Err(LayoutError::InvalidLayout(format!("{} has zero size", name)));
            }
        }
        for (index, rect) in self.fields.iter().enumerate() {
            if rect.is_empty() {
                return Err(LayoutError::InvalidLayout(format!(
                    "field #{} has zero size",
                    index + 1
                )));
            }
        }

        for (name, style) in [
            ("serial number style", &self.serial_number_style),
            ("field style", &self.field_style),
        ] {
            if style.size == 0 {
                return Err(LayoutError::InvalidLayout(format!("{} has zero font size", name)));
            }
            style.rgb()?;
        }

        Ok(())
    }

    /// Check that this layout has a position for every field of the tickets
    pub fn check_compatible(&self, tickets: &TicketSet) -> LayoutResult<()> {
        let ticket_fields = tickets.field_count().ok_or_else(|| {
            LayoutError::InvalidLayout("ticket data has no uniform field count".into())
        })?;
        if ticket_fields != self.fields.len() {
            return Err(LayoutError::FieldCountMismatch {
                layout: self.fields.len(),
                tickets: ticket_fields,
            });
        }
        Ok(())
    }

    /// Fit every field of `ticket` into its box, shrinking the field font
    /// where needed. The serial number is drawn at its configured size.
    pub fn fit_fields<M: TextMeasure + ?Sized>(
        &self,
        ticket: &Ticket,
        measurer: &M,
    ) -> LayoutResult<Vec<FittedText>> {
        if ticket.fields.len() != self.fields.len() {
            return Err(LayoutError::FieldCountMismatch {
                layout: self.fields.len(),
                tickets: ticket.fields.len(),
            });
        }

        ticket
            .fields
            .iter()
            .zip(&self.fields)
            .map(|(text, rect)| {
                Ok(FittedText {
                    text: text.clone(),
                    origin: rect.center(),
                    size: fit_font_size(measurer, text, &self.field_style, rect)?,
                })
            })
            .collect()
    }

    /// Output file name for a ticket: serial number plus the base image extension
    pub fn output_file_name(&self, serial_number: &str) -> String {
        match Path::new(&self.base_image).extension() {
            Some(ext) => format!("{}.{}", serial_number, ext.to_string_lossy()),
            None => serial_number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::ApproximateMeasure;
    use tf_core::Strategy;

    const LAYOUT_JSON: &str = r##"{
        "baseImage": "assets/ticket.png",
        "serialNumberPosition": { "x": 10, "y": 10, "width": 300, "height": 40 },
        "barcodePosition": { "x": 10, "y": 60, "width": 300, "height": 80 },
        "serialNumberStyle": { "color": "#000000", "size": 24, "font": "Arial", "bold": true, "italic": false },
        "fields": [
            { "x": 10, "y": 200, "width": 100, "height": 100 },
            { "x": 120, "y": 200, "width": 100, "height": 100 },
            { "x": 230, "y": 200, "width": 100, "height": 100 }
        ],
        "fieldStyle": { "color": "#c00000", "size": 36, "font": "Arial" }
    }"##;

    fn tickets(field_count: usize) -> TicketSet {
        TicketSet::new(
            Strategy::Multi,
            None,
            vec![Ticket::new("ABCDE".into(), None, vec!["x".into(); field_count])],
        )
    }

    #[test]
    fn test_parse_layout() {
        let layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        assert_eq!(layout.field_count(), 3);
        assert!(layout.serial_number_style.bold);
        assert!(!layout.field_style.italic);
        assert_eq!(layout.field_style.rgb().unwrap(), Rgb::new(0xc0, 0, 0));
        assert_eq!(layout.fields[1].center(), (170, 250));
    }

    #[test]
    fn test_invalid_layouts() {
        let mut layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        layout.fields.clear();
        assert!(matches!(layout.validate(), Err(LayoutError::InvalidLayout(_))));

        let mut layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        layout.fields[2].height = 0;
        assert!(matches!(layout.validate(), Err(LayoutError::InvalidLayout(_))));

        let mut layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        layout.field_style.color = "blue".into();
        assert!(matches!(layout.validate(), Err(LayoutError::InvalidColor { .. })));

        let mut layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        layout.serial_number_style.size = 0;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_compatibility_with_tickets() {
        let layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        assert!(layout.check_compatible(&tickets(3)).is_ok());
        assert!(matches!(
            layout.check_compatible(&tickets(4)),
            Err(LayoutError::FieldCountMismatch {
                layout: 3,
                tickets: 4
            })
        ));
    }

    #[test]
    fn test_fit_fields() {
        let layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        // 72 DPI: points equal pixels
        let measurer = ApproximateMeasure::default().with_dpi(72);
        let ticket = Ticket::new(
            "ABCDE".into(),
            None,
            vec!["Car".into(), "Motorbike".into(), "Grand\nPrize".into()],
        );

        let fitted = layout.fit_fields(&ticket, &measurer).unwrap();
        assert_eq!(fitted.len(), 3);
        assert_eq!(fitted[0].size, 36);
        assert_eq!(fitted[0].origin, (60, 250));
        // Nine glyphs wrap onto two lines at 32pt
        assert_eq!(fitted[1].size, 32);
        assert!(fitted[2].size < 36);
    }

    #[test]
    fn test_fit_fields_reports_unfit_text() {
        let layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        let measurer = ApproximateMeasure::default().with_dpi(72);
        let long = "W".repeat(5000);
        let ticket = Ticket::new("ABCDE".into(), None, vec![long.clone(), "a".into(), "b".into()]);

        assert!(matches!(
            layout.fit_fields(&ticket, &measurer),
            Err(LayoutError::TextDoesNotFit { text, .. }) if text == long
        ));

        let short = Ticket::new("ABCDE".into(), None, vec!["a".into()]);
        assert!(matches!(
            layout.fit_fields(&short, &measurer),
            Err(LayoutError::FieldCountMismatch { layout: 3, tickets: 1 })
        ));
    }

    #[test]
    fn test_output_file_name() {
        let layout = TicketLayout::from_json(LAYOUT_JSON).unwrap();
        assert_eq!(layout.output_file_name("X12345"), "X12345.png");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, LAYOUT_JSON).unwrap();

        let layout = TicketLayout::from_file(&path).unwrap();
        assert_eq!(layout.base_image, "assets/ticket.png");
    }
}
