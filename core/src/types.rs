//! Enumerated rendering options and their wire strings.
//!
//! # Design
//! Every option enum serializes to a fixed lowercase/hyphenated string. The
//! `wire_enum!` macro keeps the serde name and `as_str()` in one place so the
//! two can never disagree. Enum names follow the service's vocabulary, not
//! the wire strings (`Palette::BlackWhite` is sent as `"bw"`).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire representation sent to the server.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Output format of the rendered content.
    #[derive(Default)]
    pub enum OutputFormat {
        #[default]
        Pdf => "pdf",
        Png => "png",
        Jpeg => "jpeg",
        Bmp => "bmp",
        Tga => "tga",
        Qoi => "qoi",
        Svg => "svg",
    }
}

wire_enum! {
    /// Page orientation.
    pub enum Orientation {
        Portrait => "portrait",
        Landscape => "landscape",
    }
}

wire_enum! {
    /// Document flow mode.
    pub enum Flow {
        Auto => "auto",
        Paginate => "paginate",
        Continuous => "continuous",
    }
}

wire_enum! {
    /// Dithering algorithm applied during color quantization.
    pub enum DitherMethod {
        None => "none",
        FloydSteinberg => "floyd-steinberg",
        Atkinson => "atkinson",
        Ordered => "ordered",
    }
}

wire_enum! {
    /// Built-in quantization palettes.
    pub enum Palette {
        Auto => "auto",
        BlackWhite => "bw",
        Grayscale => "grayscale",
        Eink => "eink",
    }
}

wire_enum! {
    /// Whether the watermark is drawn above or below page content.
    pub enum WatermarkLayer {
        Over => "over",
        Under => "under",
    }
}

wire_enum! {
    /// PDF archival standard the output should conform to.
    pub enum PdfStandard {
        None => "none",
        PdfA2b => "pdf/a-2b",
        PdfA3b => "pdf/a-3b",
    }
}

wire_enum! {
    /// Accessibility tagging level of the output PDF.
    pub enum AccessibilityLevel {
        None => "none",
        Basic => "basic",
        PdfUa1 => "pdf/ua-1",
    }
}

wire_enum! {
    /// Relationship of an embedded file to the PDF (the `AFRelationship` key).
    pub enum EmbedRelationship {
        Alternative => "alternative",
        Supplement => "supplement",
        Data => "data",
        Source => "source",
        Unspecified => "unspecified",
    }
}

wire_enum! {
    /// Barcode symbology.
    pub enum BarcodeType {
        Qr => "qr",
        Code128 => "code128",
        Ean13 => "ean13",
        Upca => "upca",
        Code39 => "code39",
    }
}

wire_enum! {
    /// Page corner a barcode is anchored to.
    pub enum BarcodeAnchor {
        TopLeft => "top-left",
        TopRight => "top-right",
        BottomLeft => "bottom-left",
        BottomRight => "bottom-right",
    }
}

/// Quantization palette: a built-in preset or an ordered list of hex colors.
///
/// Serialized untagged, so a preset goes out as `"eink"` and a custom
/// palette as `["#000000", "#ffffff"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Preset(Palette),
    Custom(Vec<String>),
}

impl From<Palette> for PaletteSpec {
    fn from(preset: Palette) -> Self {
        PaletteSpec::Preset(preset)
    }
}

impl From<Vec<String>> for PaletteSpec {
    fn from(colors: Vec<String>) -> Self {
        PaletteSpec::Custom(colors)
    }
}

impl From<&[&str]> for PaletteSpec {
    fn from(colors: &[&str]) -> Self {
        PaletteSpec::Custom(colors.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PaletteSpec {
    fn from(colors: [&str; N]) -> Self {
        PaletteSpec::Custom(colors.iter().map(|c| c.to_string()).collect())
    }
}
