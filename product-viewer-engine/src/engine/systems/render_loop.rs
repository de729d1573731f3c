use bevy::prelude::*;

use crate::engine::core::settings::ViewerSettings;
use crate::engine::scene::scene_manager::{ProductModel, ProductScene};

/// Spin the product about world Y by a fixed step each frame while enabled.
pub fn auto_rotate_system(
    scene: Res<ProductScene>,
    settings: Res<ViewerSettings>,
    mut models: Query<&mut Transform, With<ProductModel>>,
) {
    if !scene.auto_rotate {
        return;
    }
    for mut transform in &mut models {
        transform.rotate_y(settings.auto_rotate_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::catalog::ProductKind;
    use crate::engine::mesh::product_mesh::product_base_rotation;
    use approx::assert_relative_eq;

    fn rotate_app(auto_rotate: bool) -> (App, Entity) {
        let mut scene = ProductScene::default();
        scene.auto_rotate = auto_rotate;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ViewerSettings>()
            .insert_resource(scene)
            .add_systems(Update, auto_rotate_system);
        let model = app
            .world_mut()
            .spawn((
                Transform::from_rotation(product_base_rotation()),
                ProductModel {
                    kind: ProductKind::NapkinSquare,
                },
            ))
            .id();
        (app, model)
    }

    fn world_yaw(app: &App, model: Entity) -> f32 {
        let transform = app.world().get::<Transform>(model).unwrap();
        let forward = transform.rotation * Vec3::X;
        (-forward.z).atan2(forward.x)
    }

    #[test]
    fn yaw_advances_by_step_per_frame() {
        let (mut app, model) = rotate_app(true);
        for _ in 0..10 {
            app.update();
        }
        assert_relative_eq!(world_yaw(&app, model), 0.05, epsilon = 1e-5);
    }

    #[test]
    fn disabled_rotation_leaves_model_alone() {
        let (mut app, model) = rotate_app(false);
        app.update();
        let transform = app.world().get::<Transform>(model).unwrap();
        assert!(transform.rotation.abs_diff_eq(product_base_rotation(), 1e-6));
    }
}
