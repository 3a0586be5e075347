pub mod runner;
pub mod scheduler;
pub mod target;

pub use runner::ViewRunner;
pub use scheduler::{IssuedRequests, RafScheduler};
pub use target::SharedBufferTarget;

/// Runner used by the browser exports.
pub type WebRunner<V> = ViewRunner<V, RafScheduler, SharedBufferTarget>;

/// Convert a setup error into the value thrown to JavaScript.
pub fn to_js_error(err: &orrery_engine::EngineError) -> wasm_bindgen::JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Generate all `#[wasm_bindgen]` exports for a view.
///
/// Generates:
/// - `thread_local!` storage for the runner
/// - `with_runner()` helper that logs and skips calls made before init
/// - All wasm-bindgen exports (lifecycle, input, selection, buffer accessors)
///
/// The view type must provide `new() -> Self` and
/// `from_json(&str) -> Result<Self, orrery_engine::EngineError>`.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod view;
/// use view::MyView;
///
/// orrery_web::export_view!(MyView, "my-view");
/// ```
///
/// # Arguments
///
/// - `$view_type`: The view struct type that implements `orrery_engine::View`
/// - `$view_name`: A string literal used as the log prefix
#[macro_export]
macro_rules! export_view {
    ($view_type:ty, $view_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::WebRunner<$view_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::WebRunner<$view_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call view_init() first", $view_name);
                        None
                    }
                }
            })
        }

        fn install(view: $view_type, width: f32, height: f32) -> Result<(), JsValue> {
            view_destroy_quiet();

            let scheduler = $crate::RafScheduler::new(|request, timestamp| {
                with_runner(|r| r.on_frame(request, timestamp));
            })
            .map_err(|e| {
                log::error!("{}: init failed: {}", $view_name, e);
                $crate::to_js_error(&e)
            })?;

            let config = orrery_engine::View::config(&view);
            let target = $crate::SharedBufferTarget::from_config(&config);
            let viewport = orrery_engine::Viewport::new(width, height);
            let mut runner = $crate::ViewRunner::new(view, scheduler, target, viewport);

            if let Err(e) = runner.init() {
                log::error!("{}: init failed: {}", $view_name, e);
                return Err($crate::to_js_error(&e));
            }

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $view_name);
            Ok(())
        }

        fn view_destroy_quiet() {
            let previous = RUNNER.with(|cell| cell.borrow_mut().take());
            if let Some(mut runner) = previous {
                runner.destroy();
            }
        }

        fn init_logging() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        // ---- Lifecycle ----

        #[wasm_bindgen]
        pub fn view_init(width: f32, height: f32) -> Result<(), JsValue> {
            init_logging();
            install(<$view_type>::new(), width, height)
        }

        #[wasm_bindgen]
        pub fn view_init_with_config(json: &str, width: f32, height: f32) -> Result<(), JsValue> {
            init_logging();
            let view = <$view_type>::from_json(json).map_err(|e| {
                log::error!("{}: init failed: {}", $view_name, e);
                $crate::to_js_error(&e)
            })?;
            install(view, width, height)
        }

        #[wasm_bindgen]
        pub fn view_start() -> Result<bool, JsValue> {
            match with_runner(|r| r.start()) {
                Some(Ok(started)) => Ok(started),
                Some(Err(e)) => {
                    log::error!("{}: start failed: {}", $view_name, e);
                    Err($crate::to_js_error(&e))
                }
                None => Ok(false),
            }
        }

        #[wasm_bindgen]
        pub fn view_stop() -> bool {
            with_runner(|r| r.stop()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn view_destroy() {
            view_destroy_quiet();
        }

        #[wasm_bindgen]
        pub fn view_is_running() -> bool {
            RUNNER.with(|cell| cell.borrow().as_ref().map_or(false, |r| r.is_running()))
        }

        #[wasm_bindgen]
        pub fn view_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        /// Canvas rect in page pixels. Pointer and select coordinates use
        /// the same page space; without this call they are canvas-relative.
        #[wasm_bindgen]
        pub fn view_set_viewport(left: f32, top: f32, width: f32, height: f32) {
            with_runner(|r| r.set_viewport(left, top, width, height));
        }

        #[wasm_bindgen]
        pub fn view_context_lost() {
            with_runner(|r| r.context_lost());
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn view_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.input(orrery_engine::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn view_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.input(orrery_engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn view_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.input(orrery_engine::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn view_wheel(delta_y: f32) {
            with_runner(|r| r.input(orrery_engine::InputEvent::Wheel { delta_y }));
        }

        #[wasm_bindgen]
        pub fn view_reset_camera() {
            with_runner(|r| r.input(orrery_engine::InputEvent::ResetView));
        }

        // ---- Selection ----

        #[wasm_bindgen]
        pub fn view_select(x: f32, y: f32) -> bool {
            with_runner(|r| r.select(x, y)).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn view_inspector_json() -> Option<String> {
            with_runner(|r| r.selection_json()).flatten()
        }

        #[wasm_bindgen]
        pub fn view_close_inspector() {
            with_runner(|r| r.clear_selection());
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            with_runner(|r| r.target().frame_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_frame_len() -> u32 {
            with_runner(|r| r.target().frame_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(|r| r.target().camera_ptr()).unwrap_or(std::ptr::null())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.target().layout().max_instances as u32).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_points() -> u32 {
            with_runner(|r| r.target().layout().max_points as u32).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.target().layout().buffer_total_floats as u32).unwrap_or(0)
        }
    };
}
