use product_viewer_engine::engine::core::app_setup::create_app;
use product_viewer_engine::engine::core::window_config::locate_viewer_canvas;

fn main() {
    if let Err(err) = locate_viewer_canvas() {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!("Viewer not started: {err}").into());

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("Viewer not started: {err}");

        return;
    }

    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}
