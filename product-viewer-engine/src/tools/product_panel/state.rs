use bevy::prelude::*;

use crate::engine::assets::catalog::{ProductKind, lookup, product_info};

pub const BUTTON_IDLE: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_HOVERED: Color = Color::srgb(0.26, 0.28, 0.32);
pub const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);
pub const BUTTON_ACTIVE: Color = Color::srgb(0.17, 0.35, 0.63);

// Resources
#[derive(Resource)]
pub struct LoadingOverlayTimer(pub Timer);

// Components
#[derive(Component)]
pub struct ProductPanelRoot;
#[derive(Component)]
pub struct ProductButton(pub ProductKind);
#[derive(Component)]
pub struct ResetViewButton;
#[derive(Component)]
pub struct AutoRotateButton;
#[derive(Component)]
pub struct MeasuresButton;
#[derive(Component)]
pub struct DimensionOverlay;
#[derive(Component)]
pub struct LoadingOverlay;

/// Text nodes refreshed whenever the product changes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelText {
    Name,
    Summary,
    Description,
    Width,
    Height,
    Shape,
    Places,
}

impl PanelText {
    pub const ALL: [PanelText; 7] = [
        PanelText::Name,
        PanelText::Summary,
        PanelText::Description,
        PanelText::Width,
        PanelText::Height,
        PanelText::Shape,
        PanelText::Places,
    ];

    pub fn content(&self, kind: ProductKind) -> String {
        let measurement = lookup(kind);
        let info = product_info(kind);
        match self {
            Self::Name => info.name.to_string(),
            Self::Summary => info.summary.to_string(),
            Self::Description => info.description.to_string(),
            Self::Width => measurement.width_label(),
            Self::Height => measurement.height_label(),
            Self::Shape => measurement.shape_label.to_string(),
            Self::Places => measurement.places_label.to_string(),
        }
    }
}

pub fn product_label(kind: ProductKind) -> &'static str {
    product_info(kind).name
}

/// Hover and press feedback wins over the active highlight.
pub fn button_colour(interaction: Interaction, active: bool) -> Color {
    match interaction {
        Interaction::Pressed => BUTTON_PRESSED,
        Interaction::Hovered => BUTTON_HOVERED,
        Interaction::None if active => BUTTON_ACTIVE,
        Interaction::None => BUTTON_IDLE,
    }
}
