use std::str::FromStr;

use bevy::prelude::*;
use constants::product::{
    NAPKIN_REAL_CM, NAPKIN_SCENE_SIZE, TABLE_BASE_REAL_CM, TABLE_BASE_SCENE_SIZE,
    TABLECLOTH_REAL_CM, TABLECLOTH_SCENE_SIZE,
};
use serde::{Deserialize, Serialize};

use crate::engine::core::error::ViewerError;

/// Products the viewer can display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    #[default]
    #[serde(rename = "guardanapo")]
    NapkinSquare,
    #[serde(rename = "base-mesa")]
    TableBaseRect,
    #[serde(rename = "toalha-retangular")]
    TableclothRect,
}

impl ProductKind {
    pub const ALL: [ProductKind; 3] = [
        ProductKind::NapkinSquare,
        ProductKind::TableBaseRect,
        ProductKind::TableclothRect,
    ];

    /// Identifier shared with the host page and used for texture file names.
    pub fn id(&self) -> &'static str {
        match self {
            Self::NapkinSquare => "guardanapo",
            Self::TableBaseRect => "base-mesa",
            Self::TableclothRect => "toalha-retangular",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Unknown ids resolve to the napkin rather than failing.
    pub fn from_id_or_default(id: &str) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            debug!("Unknown product id '{}', falling back to napkin", id);
            Self::default()
        })
    }
}

impl FromStr for ProductKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| ViewerError::UnknownProduct(s.to_string()))
    }
}

/// Physical and scene dimensions of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub scene_width: f32,
    pub scene_height: f32,
    pub real_width_cm: u32,
    pub real_height_cm: u32,
    pub shape_label: &'static str,
    pub places_label: &'static str,
}

impl Measurement {
    pub fn display_width(&self) -> String {
        format!("{} cm", self.real_width_cm)
    }

    pub fn display_height(&self) -> String {
        format!("{} cm", self.real_height_cm)
    }

    pub fn width_label(&self) -> String {
        format!("Comprimento: {}", self.display_width())
    }

    pub fn height_label(&self) -> String {
        format!("Largura: {}", self.display_height())
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.scene_width, self.scene_height) * 0.5
    }
}

/// Marketing copy shown next to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub name: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
}

static NAPKIN: Measurement = Measurement {
    scene_width: NAPKIN_SCENE_SIZE.0,
    scene_height: NAPKIN_SCENE_SIZE.1,
    real_width_cm: NAPKIN_REAL_CM.0,
    real_height_cm: NAPKIN_REAL_CM.1,
    shape_label: "Quadrado",
    places_label: "1 lugar",
};

static TABLE_BASE: Measurement = Measurement {
    scene_width: TABLE_BASE_SCENE_SIZE.0,
    scene_height: TABLE_BASE_SCENE_SIZE.1,
    real_width_cm: TABLE_BASE_REAL_CM.0,
    real_height_cm: TABLE_BASE_REAL_CM.1,
    shape_label: "Retangular",
    places_label: "1 lugar",
};

static TABLECLOTH: Measurement = Measurement {
    scene_width: TABLECLOTH_SCENE_SIZE.0,
    scene_height: TABLECLOTH_SCENE_SIZE.1,
    real_width_cm: TABLECLOTH_REAL_CM.0,
    real_height_cm: TABLECLOTH_REAL_CM.1,
    shape_label: "Retangular",
    places_label: "8 lugares",
};

pub fn lookup(kind: ProductKind) -> &'static Measurement {
    match kind {
        ProductKind::NapkinSquare => &NAPKIN,
        ProductKind::TableBaseRect => &TABLE_BASE,
        ProductKind::TableclothRect => &TABLECLOTH,
    }
}

/// String-keyed lookup for host input; unknown ids get the napkin record.
pub fn lookup_by_id(id: &str) -> &'static Measurement {
    lookup(ProductKind::from_id_or_default(id))
}

pub fn product_info(kind: ProductKind) -> &'static ProductInfo {
    static NAPKIN_INFO: ProductInfo = ProductInfo {
        name: "Guardanapo",
        summary: "40x40 cm - 1 lugar",
        description: "Guardanapo de alta qualidade em algodão, perfeito para complementar seu jogo americano.",
    };
    static TABLE_BASE_INFO: ProductInfo = ProductInfo {
        name: "Base de Mesa",
        summary: "47x37 cm - 1 lugar",
        description: "Base de mesa resistente e elegante, disponível em diversas cores e padrões.",
    };
    static TABLECLOTH_INFO: ProductInfo = ProductInfo {
        name: "Toalha Retangular",
        summary: "310x190 cm - 8 lugares",
        description: "Toalha de mesa rectangular premium, ideal para jantares formais e ocasiões especiais.",
    };

    match kind {
        ProductKind::NapkinSquare => &NAPKIN_INFO,
        ProductKind::TableBaseRect => &TABLE_BASE_INFO,
        ProductKind::TableclothRect => &TABLECLOTH_INFO,
    }
}
