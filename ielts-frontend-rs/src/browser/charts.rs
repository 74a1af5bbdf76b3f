use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::HtmlCanvasElement;

use crate::charts::ChartSurface;

#[wasm_bindgen]
extern "C" {
    /// Chart.js, loaded by the page as a global.
    type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(context: &JsValue, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method, setter)]
    fn set_data(this: &Chart, data: &JsValue);

    #[wasm_bindgen(method)]
    fn update(this: &Chart);
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// Keeps one Chart.js instance per canvas and feeds it new data on later draws.
#[derive(Default)]
pub struct BrowserCharts {
    charts: RefCell<HashMap<String, Chart>>,
}

impl BrowserCharts {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&self, canvas_id: &str, config: &serde_json::Value) -> Result<Chart, JsValue> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .ok_or_else(|| JsValue::from_str(&format!("missing canvas #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?;
        Chart::new(&context, &to_js(config)?)
    }
}

impl ChartSurface for BrowserCharts {
    fn draw(&self, canvas_id: &str, config: &serde_json::Value) {
        if let Some(chart) = self.charts.borrow().get(canvas_id) {
            match to_js(&config["data"]) {
                Ok(data) => {
                    chart.set_data(&data);
                    chart.update();
                }
                Err(e) => log::error!("Could not convert chart data: {e:?}"),
            }
            return;
        }

        match self.create(canvas_id, config) {
            Ok(chart) => {
                self.charts
                    .borrow_mut()
                    .insert(canvas_id.to_string(), chart);
            }
            Err(e) => log::error!("Could not create chart #{canvas_id}: {e:?}"),
        }
    }
}
