use scriptcard_editor::{
    Anchor, CardId, ClipboardError, ClipboardSink, EditorConfig, ErrandCopy, Millis, NodeId, Page,
    ScriptCardApp,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
extern "C" {
    /// Provided by the host page. Returns `false` when the browser refuses
    /// the copy command; throws when no clipboard is reachable.
    #[wasm_bindgen(js_name = scriptcardCopyText, catch)]
    fn host_copy_text(text: &str) -> Result<bool, JsValue>;
}

/// Clipboard backed by the host page's copy function
struct HostClipboard;

impl ClipboardSink for HostClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match host_copy_text(text) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ClipboardError::Rejected("copy command returned false".into())),
            Err(e) => Err(ClipboardError::Unavailable(
                e.as_string().unwrap_or_else(|| "host clipboard threw".into()),
            )),
        }
    }
}

/// JSON-in/JSON-out facade over the app, independent of any JS types
struct Bridge<C: ClipboardSink> {
    app: ScriptCardApp<C>,
}

impl<C: ClipboardSink> Bridge<C> {
    fn new(markup_json: &str, config_json: Option<&str>, sink: C) -> Result<Self, String> {
        let page = Page::from_json(markup_json).map_err(|e| format!("Markup error: {}", e))?;
        let config = match config_json {
            Some(json) => EditorConfig::from_json(json).map_err(|e| e.to_string())?,
            None => EditorConfig::default(),
        };
        let app = ScriptCardApp::new(page, config, sink).map_err(|e| e.to_string())?;
        Ok(Self { app })
    }

    fn click_node(&mut self, node: usize, anchor_json: &str, now: f64) -> Result<String, String> {
        let anchor = parse_anchor(anchor_json)?;
        let outcome = self
            .app
            .click_node(NodeId(node), &anchor, millis(now))
            .map_err(|e| e.to_string())?;
        to_json(&outcome)
    }

    fn copy_card(&mut self, card: usize, anchor_json: &str, now: f64) -> Result<String, String> {
        let anchor = parse_anchor(anchor_json)?;
        let attempt = self
            .app
            .validate_and_copy(CardId(card), &anchor, millis(now))
            .map_err(|e| e.to_string())?;
        to_json(&attempt)
    }

    fn copy_errand(&mut self, form: usize, now: f64) -> Result<String, String> {
        let outcome = self
            .app
            .copy_errand(form, millis(now))
            .map_err(|e| e.to_string())?;
        let value = match outcome {
            ErrandCopy::Copied(text) => json!({ "result": "copied", "text": text }),
            ErrandCopy::NothingToCopy => json!({ "result": "nothingToCopy" }),
            ErrandCopy::Failed => json!({ "result": "failed" }),
        };
        Ok(value.to_string())
    }

    fn binding_issues(&self) -> Result<String, String> {
        to_json(&self.app.page().binding_issues())
    }

    fn snapshot(&self) -> Result<String, String> {
        to_json(&self.app.snapshot())
    }
}

/// Host timestamps come from `performance.now()`
fn millis(now: f64) -> Millis {
    now.max(0.0) as Millis
}

fn parse_anchor(json: &str) -> Result<Anchor, String> {
    if json.trim().is_empty() {
        return Ok(Anchor::default());
    }
    serde_json::from_str(json).map_err(|e| format!("Anchor error: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct ScriptCardHandle {
    bridge: Bridge<HostClipboard>,
}

#[wasm_bindgen]
impl ScriptCardHandle {
    /// Build the page from serialized markup and wire up every binding
    #[wasm_bindgen(constructor)]
    pub fn new(markup_json: &str, config_json: Option<String>) -> Result<ScriptCardHandle, JsValue> {
        let bridge = Bridge::new(markup_json, config_json.as_deref(), HostClipboard)
            .map_err(JsValue::from)?;
        Ok(ScriptCardHandle { bridge })
    }

    /// `input` event on a form field
    pub fn input(&mut self, name: &str, value: &str) -> bool {
        self.bridge.app.input_field(name, value)
    }

    #[wasm_bindgen(js_name = clickNode)]
    pub fn click_node(&mut self, node: usize, anchor_json: &str, now: f64) -> Result<String, JsValue> {
        self.bridge
            .click_node(node, anchor_json, now)
            .map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = copyCard)]
    pub fn copy_card(&mut self, card: usize, anchor_json: &str, now: f64) -> Result<String, JsValue> {
        self.bridge
            .copy_card(card, anchor_json, now)
            .map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, node: usize) -> Result<(), JsValue> {
        self.bridge.app.begin_edit(NodeId(node)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = editInput)]
    pub fn edit_input(&mut self, value: &str) -> Result<(), JsValue> {
        self.bridge.app.edit_input(value).map_err(js_error)
    }

    /// Returns the committed text when `key` ends the edit
    #[wasm_bindgen(js_name = editKey)]
    pub fn edit_key(&mut self, key: &str) -> Result<Option<String>, JsValue> {
        self.bridge.app.edit_key(key).map_err(js_error)
    }

    pub fn blur(&mut self) -> Option<String> {
        self.bridge.app.blur()
    }

    #[wasm_bindgen(js_name = resetCard)]
    pub fn reset_card(&mut self, card: usize) -> Result<(), JsValue> {
        self.bridge.app.reset_card(CardId(card)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = clearForm)]
    pub fn clear_form(&mut self) {
        self.bridge.app.clear_form();
    }

    #[wasm_bindgen(js_name = openPanel)]
    pub fn open_panel(&mut self) {
        self.bridge.app.panel_mut().open();
    }

    #[wasm_bindgen(js_name = closePanel)]
    pub fn close_panel(&mut self) {
        self.bridge.app.panel_mut().close();
    }

    #[wasm_bindgen(js_name = toggleErrand)]
    pub fn toggle_errand(&mut self, form: usize) -> Result<bool, JsValue> {
        self.bridge.app.toggle_errand(form).map_err(js_error)
    }

    #[wasm_bindgen(js_name = errandInput)]
    pub fn errand_input(&mut self, form: usize, id: &str, value: &str) -> Result<(), JsValue> {
        self.bridge
            .app
            .errand_input(form, id, value)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = copyErrand)]
    pub fn copy_errand(&mut self, form: usize, now: f64) -> Result<String, JsValue> {
        self.bridge.copy_errand(form, now).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = clearErrand)]
    pub fn clear_errand(&mut self, form: usize, now: f64) -> Result<(), JsValue> {
        self.bridge
            .app
            .clear_errand(form, millis(now))
            .map_err(js_error)
    }

    /// Run deferred tasks; call from a timer or animation frame
    pub fn tick(&mut self, now: f64) -> usize {
        self.bridge.app.tick(millis(now))
    }

    #[wasm_bindgen(js_name = bindingIssues)]
    pub fn binding_issues(&self) -> Result<String, JsValue> {
        self.bridge.binding_issues().map_err(JsValue::from)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.bridge.snapshot().map_err(JsValue::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcard_editor::MemoryClipboard;

    const PAGE: &str = r#"[
        { "type": "Element", "tag": "input", "attributes": { "class": "form-input", "id": "customerName" } },
        {
            "type": "Element",
            "tag": "div",
            "attributes": { "class": "script-card" },
            "children": [
                { "type": "Text", "content": "Hello " },
                { "type": "Element", "tag": "span", "attributes": { "class": "customer_name" } }
            ]
        }
    ]"#;

    fn bridge() -> Bridge<MemoryClipboard> {
        Bridge::new(PAGE, None, MemoryClipboard::new()).unwrap()
    }

    #[test]
    fn test_copy_card_returns_tagged_json() {
        let mut bridge = bridge();
        bridge.app.input_field("customerName", "Alex");

        let result = bridge.copy_card(0, "", 0.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(value["result"], "copied");
        assert_eq!(value["text"], "Hello Alex");
        assert_eq!(bridge.app.clipboard().contents(), Some("Hello Alex"));
    }

    #[test]
    fn test_anchor_json_positions_notice() {
        let mut bridge = bridge();
        let anchor = r#"{ "rect": { "left": 100, "top": 300, "width": 80, "height": 20 } }"#;

        bridge.copy_card(0, anchor, 0.0).unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&bridge.snapshot().unwrap()).unwrap();

        assert_eq!(snapshot["notice"]["kind"], "warning");
        assert_eq!(snapshot["notice"]["position"]["top"], 258.0);
        assert_eq!(snapshot["panelOpen"], true);
    }

    #[test]
    fn test_invalid_markup_is_reported() {
        assert!(Bridge::new("not json", None, MemoryClipboard::new()).is_err());
    }

    #[test]
    fn test_config_json_overrides_placeholder() {
        let config = r#"{ "placeholders": { "customerName": "[customer]" } }"#;
        let bridge = Bridge::new(PAGE, Some(config), MemoryClipboard::new()).unwrap();

        assert_eq!(bridge.app.page().text(NodeId(0)), Some("[customer]"));
    }

    #[test]
    fn test_negative_timestamps_clamp_to_zero() {
        assert_eq!(millis(-5.0), 0);
        assert_eq!(millis(1_234.9), 1_234);
    }
}
