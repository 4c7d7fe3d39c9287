//! Browser timers

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;

/// Resolve after `ms` milliseconds via `setTimeout`
pub async fn sleep_ms(ms: u32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let Some(window) = web_sys::window() else {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            return;
        };
        let callback = Closure::once_into_js(move || {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
        });
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                ms as i32,
            )
            .is_err()
        {
            log::warn!("setTimeout failed");
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Wall-clock milliseconds, used as a session seed
pub fn now_seed() -> u64 {
    js_sys::Date::now() as u64
}
