// flow_core: data-flow presentation engine (Rust/WASM).
// Scene timeline, layout resolution, anchor geometry and edge plans live here.
// The page only draws what a frame says and reports navigation back.

mod config;
mod edges;
mod error;
mod geometry;
mod presentation;
mod presets;
mod resolve;
mod scene;
mod timeline;
mod types;

use wasm_bindgen::prelude::*;

pub use config::{
    AnchorConfig, AnchorConfigRef, EdgeRuleConfig, PresentationConfig, PresentationParts,
    RuleKindConfig, SceneConfig,
};
pub use edges::{AnchorSelector, Edge, EdgePlan, EdgeRule, MemberSelection, ObjectAnchor};
pub use error::{FlowError, FlowResult};
pub use geometry::{AnchorEngine, AnchorSpec, GridMember, GridSpec};
pub use presentation::{Frame, NavDot, Presentation};
pub use presets::{anchor_spec, data_flow, Flavor};
pub use resolve::{paint_order, resolve};
pub use scene::{Scene, SceneRegistry};
pub use timeline::{NavigationEvent, Timeline};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: FlowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Presentation engine exposed to JavaScript.
/// Frames cross the boundary as JSON to keep the JS side to plain objects.
#[wasm_bindgen]
pub struct FlowEngine {
    inner: Presentation,
}

#[wasm_bindgen]
impl FlowEngine {
    /// Build from a JSON presentation config. Unknown object names and
    /// malformed rules are rejected here, before the first frame.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<FlowEngine, JsValue> {
        let inner = Presentation::from_json(config_json).map_err(to_js)?;
        Ok(FlowEngine { inner })
    }

    /// Built-in data-flow presentation. `flavor` is "showcase" or "standard".
    pub fn preset(flavor: &str, tasks: usize, skills: usize) -> Result<FlowEngine, JsValue> {
        let flavor = Flavor::from_name(flavor)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown flavor: {}", flavor)))?;
        let inner = Presentation::preset(flavor, tasks, skills).map_err(to_js)?;
        Ok(FlowEngine { inner })
    }

    /// Returns `true` if the step changed.
    pub fn next(&mut self) -> bool {
        self.inner.advance()
    }

    /// Returns `true` if the step changed.
    pub fn previous(&mut self) -> bool {
        self.inner.retreat()
    }

    /// Jump to any step (navigation dots). Out-of-range steps are rejected.
    pub fn go_to(&mut self, step: usize) -> Result<bool, JsValue> {
        self.inner.jump_to(step).map_err(to_js)
    }

    /// Feed a `KeyboardEvent.key`. Returns `true` if the step changed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key)
    }

    /// Viewport resize. Moves the origin, keeps the step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(Viewport::new(width, height));
    }

    pub fn step(&self) -> usize {
        self.inner.step()
    }

    pub fn total_steps(&self) -> usize {
        self.inner.total_steps()
    }

    /// Current frame as JSON: `{ step, total_steps, label, origin, layouts, paint_order, edges }`.
    pub fn frame_json(&self) -> Result<String, JsValue> {
        let frame = self.inner.frame().map_err(to_js)?;
        serde_json::to_string(&frame)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Navigation dots as JSON.
    pub fn dots_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.dots())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
