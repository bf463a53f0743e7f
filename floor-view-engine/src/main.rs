mod dashboard;
mod engine;
mod rpc;
mod tools;

#[cfg(test)]
mod test_support;

use engine::core::app_setup::create_app;

fn main() {
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
