use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::texture::{
    LOADED_TEXTURE_REPEAT, NAPKIN_BASE_RGB, PLACEHOLDER_DOT_ALPHA, PLACEHOLDER_DOT_PERIOD,
    PLACEHOLDER_DOT_SIZE, PLACEHOLDER_DOT_SPACING, PLACEHOLDER_SIZE, TABLE_BASE_BASE_RGB,
    TABLECLOTH_BASE_RGB, TEXTURE_EXTENSION,
};

use crate::engine::assets::catalog::ProductKind;
use crate::engine::core::error::ViewerError;
use crate::engine::core::settings::ViewerSettings;
use crate::engine::scene::scene_manager::ProductScene;

/// Identifies the product instance a texture was requested for.
/// A new generation is issued on every product switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureToken {
    pub kind: ProductKind,
    pub generation: u64,
}

#[derive(Debug)]
pub struct PendingTexture {
    pub token: TextureToken,
    pub path: String,
    pub handle: Handle<Image>,
    reported_progress: bool,
}

#[derive(Debug, Clone)]
pub enum TextureOutcome {
    Loaded(Handle<Image>),
    Failed(ViewerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureResolution {
    Applied,
    Stale,
    Failed,
}

/// Queue of real-texture fetches. Requests are recorded synchronously and
/// handed to the asset server by `start_texture_loads`.
#[derive(Resource, Default)]
pub struct TextureProvider {
    queued: Vec<TextureToken>,
    pending: Vec<PendingTexture>,
}

impl TextureProvider {
    pub fn request(&mut self, token: TextureToken) {
        self.queued.push(token);
    }

    pub fn queued(&self) -> &[TextureToken] {
        &self.queued
    }

    pub fn pending(&self) -> &[PendingTexture] {
        &self.pending
    }

    /// Drop every outstanding request; their completions will never be applied.
    pub fn cancel_all(&mut self) {
        self.queued.clear();
        self.pending.clear();
    }
}

pub fn base_colour(kind: ProductKind) -> [u8; 3] {
    match kind {
        ProductKind::NapkinSquare => NAPKIN_BASE_RGB,
        ProductKind::TableBaseRect => TABLE_BASE_BASE_RGB,
        ProductKind::TableclothRect => TABLECLOTH_BASE_RGB,
    }
}

/// RGBA8 pixels: solid base colour with a faint white dot lattice.
pub fn paint_placeholder(base: [u8; 3], size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for _ in 0..size * size {
        pixels.extend_from_slice(&[base[0], base[1], base[2], 255]);
    }

    let dot = base.map(|channel| {
        let blended =
            channel as f32 * (1.0 - PLACEHOLDER_DOT_ALPHA) + 255.0 * PLACEHOLDER_DOT_ALPHA;
        blended.round() as u8
    });

    for i in (0..size).step_by(PLACEHOLDER_DOT_SPACING as usize) {
        for j in (0..size).step_by(PLACEHOLDER_DOT_SPACING as usize) {
            if (i + j) % PLACEHOLDER_DOT_PERIOD != 0 {
                continue;
            }
            for x in i..(i + PLACEHOLDER_DOT_SIZE).min(size) {
                for y in j..(j + PLACEHOLDER_DOT_SIZE).min(size) {
                    let offset = ((y * size + x) * 4) as usize;
                    pixels[offset..offset + 3].copy_from_slice(&dot);
                }
            }
        }
    }

    pixels
}

fn repeat_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    })
}

/// Immediately usable stand-in shown until (or instead of) the real image.
pub fn placeholder_image(kind: ProductKind) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        paint_placeholder(base_colour(kind), PLACEHOLDER_SIZE),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = repeat_sampler();
    image
}

pub fn texture_path(settings: &ViewerSettings, kind: ProductKind) -> String {
    format!(
        "{}/{}.{}",
        settings.texture_base_path.trim_end_matches('/'),
        kind.id(),
        TEXTURE_EXTENSION
    )
}

/// Apply a finished load to the displayed material, unless the product it
/// was requested for is no longer the one on screen.
pub fn resolve_texture(
    token: TextureToken,
    outcome: TextureOutcome,
    scene: &ProductScene,
    materials: &mut Assets<StandardMaterial>,
) -> TextureResolution {
    let handle = match outcome {
        TextureOutcome::Loaded(handle) => handle,
        TextureOutcome::Failed(err) => {
            warn!("{}; keeping generated texture for {}", err, token.kind.id());
            return TextureResolution::Failed;
        }
    };

    let Some(displayed) = scene.displayed() else {
        debug!("Texture for {} arrived with no product on screen", token.kind.id());
        return TextureResolution::Stale;
    };
    if displayed.token() != token {
        debug!(
            "Dropping stale texture for {} (generation {}), showing {} (generation {})",
            token.kind.id(),
            token.generation,
            displayed.kind.id(),
            displayed.generation
        );
        return TextureResolution::Stale;
    }

    let Some(material) = materials.get_mut(&displayed.material) else {
        return TextureResolution::Stale;
    };
    material.base_color_texture = Some(handle);
    material.uv_transform = Affine2::from_scale(Vec2::splat(LOADED_TEXTURE_REPEAT));
    info!("Texture for {} loaded", token.kind.id());
    TextureResolution::Applied
}

/// Hand queued requests to the asset server.
pub fn start_texture_loads(
    mut provider: ResMut<TextureProvider>,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    if provider.queued.is_empty() {
        return;
    }

    let queued = std::mem::take(&mut provider.queued);
    for token in queued {
        let path = texture_path(&settings, token.kind);
        let handle: Handle<Image> = asset_server.load_with_settings(
            path.clone(),
            |s: &mut ImageLoaderSettings| {
                s.sampler = repeat_sampler();
            },
        );
        debug!("Requested texture {}", path);
        provider.pending.push(PendingTexture {
            token,
            path,
            handle,
            reported_progress: false,
        });
    }
}

/// Resolve finished loads. Completions are checked against the displayed
/// product at the moment they are observed.
pub fn poll_texture_loads(
    mut provider: ResMut<TextureProvider>,
    asset_server: Res<AssetServer>,
    scene: Res<ProductScene>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if provider.pending.is_empty() {
        return;
    }

    let pending = std::mem::take(&mut provider.pending);
    for mut request in pending {
        let outcome = match asset_server.get_load_state(&request.handle) {
            Some(LoadState::Loaded) => TextureOutcome::Loaded(request.handle.clone()),
            Some(LoadState::Failed(err)) => TextureOutcome::Failed(ViewerError::TextureLoad {
                path: request.path.clone(),
                reason: err.to_string(),
            }),
            _ => {
                if !request.reported_progress {
                    debug!("Texture {} still loading", request.path);
                    request.reported_progress = true;
                }
                provider.pending.push(request);
                continue;
            }
        };

        resolve_texture(request.token, outcome, &scene, &mut materials);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::scene_manager::DisplayedProduct;

    fn pixel(pixels: &[u8], size: u32, x: u32, y: u32) -> [u8; 3] {
        let offset = ((y * size + x) * 4) as usize;
        [pixels[offset], pixels[offset + 1], pixels[offset + 2]]
    }

    #[test]
    fn placeholder_has_faint_dots() {
        let base = base_colour(ProductKind::TableBaseRect);
        let pixels = paint_placeholder(base, 32);
        assert_eq!(pixels.len(), 32 * 32 * 4);

        // (0, 0) and (8, 8) are on the dot diagonal, (8, 0) is not.
        let dot = pixel(&pixels, 32, 0, 0);
        assert_ne!(dot, base);
        assert!(dot.iter().zip(base).all(|(d, b)| *d >= b));
        assert_eq!(pixel(&pixels, 32, 9, 9), dot);
        assert_eq!(pixel(&pixels, 32, 8, 0), base);
        assert_eq!(pixel(&pixels, 32, 2, 0), base);
    }

    #[test]
    fn placeholder_image_repeats() {
        let image = placeholder_image(ProductKind::NapkinSquare);
        assert_eq!(image.width(), PLACEHOLDER_SIZE);
        assert!(matches!(
            image.sampler,
            ImageSampler::Descriptor(ImageSamplerDescriptor {
                address_mode_u: ImageAddressMode::Repeat,
                address_mode_v: ImageAddressMode::Repeat,
                ..
            })
        ));
    }

    #[test]
    fn texture_paths_use_product_ids() {
        let settings = ViewerSettings::default();
        assert_eq!(
            texture_path(&settings, ProductKind::TableclothRect),
            "img/toalha-retangular.jpg"
        );
    }

    fn displayed(
        kind: ProductKind,
        generation: u64,
        materials: &mut Assets<StandardMaterial>,
        placeholder: &Handle<Image>,
    ) -> DisplayedProduct {
        DisplayedProduct {
            kind,
            entity: Entity::from_raw(generation as u32 + 10),
            material: materials.add(StandardMaterial {
                base_color_texture: Some(placeholder.clone()),
                ..default()
            }),
            generation,
        }
    }

    #[test]
    fn stale_completion_does_not_touch_current_material() {
        let mut images = Assets::<Image>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let placeholder_a = images.add(Image::default());
        let placeholder_b = images.add(Image::default());
        let real_a = images.add(Image::default());

        let a = displayed(ProductKind::NapkinSquare, 1, &mut materials, &placeholder_a);
        let token_a = a.token();
        let b = displayed(ProductKind::TableBaseRect, 2, &mut materials, &placeholder_b);
        let material_b = b.material.clone();

        let mut scene = ProductScene::default();
        scene.set_displayed(a);
        scene.set_displayed(b);

        let result = resolve_texture(
            token_a,
            TextureOutcome::Loaded(real_a),
            &scene,
            &mut materials,
        );
        assert_eq!(result, TextureResolution::Stale);
        let material = materials.get(&material_b).unwrap();
        assert_eq!(material.base_color_texture, Some(placeholder_b));
    }

    #[test]
    fn same_kind_from_an_older_generation_is_stale() {
        let mut images = Assets::<Image>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let placeholder = images.add(Image::default());

        let old = displayed(ProductKind::TableclothRect, 1, &mut materials, &placeholder);
        let old_token = old.token();
        let mut scene = ProductScene::default();
        scene.set_displayed(old);
        scene.set_displayed(displayed(
            ProductKind::TableclothRect,
            3,
            &mut materials,
            &placeholder,
        ));

        let result = resolve_texture(
            old_token,
            TextureOutcome::Loaded(images.add(Image::default())),
            &scene,
            &mut materials,
        );
        assert_eq!(result, TextureResolution::Stale);
    }

    #[test]
    fn current_completion_replaces_placeholder() {
        let mut images = Assets::<Image>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let placeholder = images.add(Image::default());
        let real = images.add(Image::default());

        let current = displayed(ProductKind::TableclothRect, 4, &mut materials, &placeholder);
        let token = current.token();
        let material = current.material.clone();
        let mut scene = ProductScene::default();
        scene.set_displayed(current);

        let result = resolve_texture(
            token,
            TextureOutcome::Loaded(real.clone()),
            &scene,
            &mut materials,
        );
        assert_eq!(result, TextureResolution::Applied);
        let material = materials.get(&material).unwrap();
        assert_eq!(material.base_color_texture, Some(real));
        assert_eq!(
            material.uv_transform,
            Affine2::from_scale(Vec2::splat(LOADED_TEXTURE_REPEAT))
        );
    }

    #[test]
    fn failure_keeps_placeholder() {
        let mut images = Assets::<Image>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let placeholder = images.add(Image::default());
        let current = displayed(ProductKind::NapkinSquare, 1, &mut materials, &placeholder);
        let token = current.token();
        let material = current.material.clone();
        let mut scene = ProductScene::default();
        scene.set_displayed(current);

        let result = resolve_texture(
            token,
            TextureOutcome::Failed(ViewerError::TextureLoad {
                path: "img/guardanapo.jpg".into(),
                reason: "not found".into(),
            }),
            &scene,
            &mut materials,
        );
        assert_eq!(result, TextureResolution::Failed);
        assert_eq!(
            materials.get(&material).unwrap().base_color_texture,
            Some(placeholder)
        );
    }

    #[test]
    fn cancel_all_drops_requests() {
        let mut provider = TextureProvider::default();
        provider.request(TextureToken {
            kind: ProductKind::NapkinSquare,
            generation: 1,
        });
        assert_eq!(provider.queued().len(), 1);
        provider.cancel_all();
        assert!(provider.queued().is_empty());
        assert!(provider.pending().is_empty());
    }
}
