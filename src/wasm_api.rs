//! WASM API: `#[wasm_bindgen]` exports for the block editor.
//!
//! This module is only compiled when targeting `wasm32`. It provides:
//! - `init_workspace` / `destroy_workspace`: lifecycle
//! - `add_block` / `remove_block` / `set_field` / `connect_*`: graph edits
//! - `set_imports` / `configure`: run settings
//! - `generate` / `validate`: output and problem list
//! - `save_workspace` / `load_workspace` / `get_block_kinds`: persistence and discovery
//!
//! Every call answers with JSON; failures come back as `{"error": "..."}`.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::codegen::{Generator, ImportDescriptor, RunConfig};
use crate::core::{BlockId, FieldValue};
use crate::workspace::{Workspace, WorkspaceError, WorkspaceValidator};

// ── Global state ────────────────────────────────────────────────────────────

struct EditorState {
    generator: Generator,
    workspace: Workspace,
    config: RunConfig,
    listener: Option<js_sys::Function>,
}

thread_local! {
    static EDITOR: RefCell<Option<EditorState>> = RefCell::new(None);
}

fn with_editor<R>(f: impl FnOnce(&mut EditorState) -> R) -> Result<R, String> {
    EDITOR.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(state) => Ok(f(state)),
            None => Err("Workspace not initialized. Call init_workspace() first.".into()),
        }
    })
}

// ── JSON interchange types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct ConfigJson {
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    indent: Option<String>,
}

#[derive(Serialize)]
struct OkResponse {
    id: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    code: String,
}

#[derive(Serialize)]
struct ChangeEvent<'a> {
    event: &'a str,
    #[serde(rename = "blockId")]
    block_id: Option<String>,
}

#[derive(Serialize)]
struct BlockKindInfo {
    #[serde(rename = "type")]
    kind: String,
    category: String,
    display: String,
    tooltip: String,
    colour: u16,
    sockets: Vec<crate::core::Socket>,
    output: Option<crate::core::OutputType>,
    #[serde(rename = "previousStatement")]
    previous_statement: bool,
    #[serde(rename = "nextStatement")]
    next_statement: bool,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn json_ok(id: &str) -> String {
    serde_json::to_string(&OkResponse { id: id.into() }).unwrap_or_default()
}

fn json_err(msg: impl Into<String>) -> String {
    serde_json::to_string(&ErrorResponse {
        error: msg.into(),
    })
    .unwrap_or_default()
}

fn parse_id(raw: &str) -> Result<BlockId, String> {
    BlockId::parse(raw).ok_or_else(|| format!("Invalid block id: '{}'", raw))
}

fn notify(state: &EditorState, event: &str, block_id: Option<BlockId>) {
    let Some(callback) = state.listener.as_ref() else {
        return;
    };
    let change = ChangeEvent {
        event,
        block_id: block_id.map(|id| id.to_string()),
    };
    if let Ok(json) = serde_json::to_string(&change) {
        let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
    }
}

/// Run a graph edit and report it as `{"id": ...}` or `{"error": ...}`
fn edit(
    event: &str,
    id: Option<BlockId>,
    f: impl FnOnce(&mut Workspace) -> Result<(), WorkspaceError>,
) -> String {
    match with_editor(|state| {
        f(&mut state.workspace)?;
        notify(state, event, id);
        Ok::<(), WorkspaceError>(())
    }) {
        Ok(Ok(())) => json_ok(&id.map(|i| i.to_string()).unwrap_or_default()),
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

// ── Exported functions ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn init_workspace() {
    console_error_panic_hook::set_once();

    let generator = Generator::solidity();
    let workspace = Workspace::new(generator.registry().clone());
    EDITOR.with(|cell| {
        *cell.borrow_mut() = Some(EditorState {
            generator,
            workspace,
            config: RunConfig::new(),
            listener: None,
        });
    });
}

#[wasm_bindgen]
pub fn destroy_workspace() {
    EDITOR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Callback receiving `{"event", "blockId"}` after each successful edit
#[wasm_bindgen]
pub fn set_change_listener(callback: js_sys::Function) -> String {
    match with_editor(|state| state.listener = Some(callback)) {
        Ok(()) => json_ok(""),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn add_block(kind: &str) -> String {
    match with_editor(|state| {
        let id = state.workspace.add_instance(kind)?;
        notify(state, "add", Some(id));
        Ok::<BlockId, WorkspaceError>(id)
    }) {
        Ok(Ok(id)) => json_ok(&id.to_string()),
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn remove_block(id: &str) -> String {
    let id = match parse_id(id) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    edit("remove", Some(id), |ws| ws.remove_instance(id).map(|_| ()))
}

/// `value_json` is a JSON scalar: string, number or `{"tag": ...}`
#[wasm_bindgen]
pub fn set_field(id: &str, name: &str, value_json: &str) -> String {
    let id = match parse_id(id) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    let value: FieldValue = match serde_json::from_str(value_json) {
        Ok(v) => v,
        Err(e) => return json_err(format!("Invalid field value JSON: {}", e)),
    };
    edit("field", Some(id), |ws| ws.set_field(id, name, value))
}

#[wasm_bindgen]
pub fn set_enabled(id: &str, enabled: bool) -> String {
    let id = match parse_id(id) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    edit("enabled", Some(id), |ws| ws.set_enabled(id, enabled))
}

#[wasm_bindgen]
pub fn connect_value(parent: &str, socket: &str, child: &str) -> String {
    let (parent, child) = match (parse_id(parent), parse_id(child)) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => return json_err(e),
    };
    edit("connect", Some(child), |ws| ws.connect_value(parent, socket, child))
}

#[wasm_bindgen]
pub fn connect_statement(parent: &str, socket: &str, child: &str) -> String {
    let (parent, child) = match (parse_id(parent), parse_id(child)) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => return json_err(e),
    };
    edit("connect", Some(child), |ws| ws.connect_statement(parent, socket, child))
}

#[wasm_bindgen]
pub fn connect_next(previous: &str, child: &str) -> String {
    let (previous, child) = match (parse_id(previous), parse_id(child)) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => return json_err(e),
    };
    edit("connect", Some(child), |ws| ws.link_next(previous, child))
}

#[wasm_bindgen]
pub fn disconnect_value(parent: &str, socket: &str) -> String {
    let parent = match parse_id(parent) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    edit("disconnect", Some(parent), |ws| {
        ws.disconnect_value(parent, socket).map(|_| ())
    })
}

#[wasm_bindgen]
pub fn disconnect_statement(parent: &str, socket: &str) -> String {
    let parent = match parse_id(parent) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    edit("disconnect", Some(parent), |ws| {
        ws.disconnect_statement(parent, socket).map(|_| ())
    })
}

#[wasm_bindgen]
pub fn disconnect_next(previous: &str) -> String {
    let previous = match parse_id(previous) {
        Ok(id) => id,
        Err(e) => return json_err(e),
    };
    edit("disconnect", Some(previous), |ws| ws.unlink_next(previous).map(|_| ()))
}

/// Imports for the next `generate` call only
#[wasm_bindgen]
pub fn set_imports(imports_json: &str) -> String {
    let imports: Vec<ImportDescriptor> = match serde_json::from_str(imports_json) {
        Ok(i) => i,
        Err(e) => return json_err(format!("Invalid imports JSON: {}", e)),
    };
    match with_editor(|state| state.config.set_imports(imports)) {
        Ok(()) => json_ok(""),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn configure(config_json: &str) -> String {
    let cj: ConfigJson = match serde_json::from_str(config_json) {
        Ok(c) => c,
        Err(e) => return json_err(format!("Invalid config JSON: {}", e)),
    };
    match with_editor(|state| {
        if let Some(license) = cj.license {
            state.config.set_license(license);
        }
        if let Some(version) = cj.version {
            state.config.set_version(version);
        }
        if let Some(indent) = cj.indent {
            state.config.set_indent(indent);
        }
    }) {
        Ok(()) => json_ok(""),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn generate() -> String {
    match with_editor(|state| state.generator.generate_with(&state.workspace, &mut state.config)) {
        Ok(code) => serde_json::to_string(&GenerateResponse { code }).unwrap_or_default(),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn validate() -> String {
    match with_editor(|state| {
        WorkspaceValidator::validate(&state.workspace, state.generator.registry())
    }) {
        Ok(report) => serde_json::to_string(&report).unwrap_or_default(),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn save_workspace() -> String {
    match with_editor(|state| state.workspace.to_json()) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn load_workspace(json: &str) -> String {
    match with_editor(|state| {
        let restored = Workspace::from_json(json, state.generator.registry().clone())?;
        let report = WorkspaceValidator::validate(&restored, state.generator.registry());
        if !report.valid {
            log::warn!(
                "restored workspace has {} error(s); generation will skip the affected blocks",
                report.errors.len()
            );
        }
        state.workspace = restored;
        notify(state, "load", None);
        Ok::<(), WorkspaceError>(())
    }) {
        Ok(Ok(())) => json_ok(""),
        Ok(Err(e)) => json_err(e.to_string()),
        Err(e) => json_err(e),
    }
}

#[wasm_bindgen]
pub fn get_block_kinds() -> String {
    let generator = match with_editor(|state| state.generator.clone()) {
        Ok(g) => g,
        Err(_) => Generator::solidity(),
    };
    let kinds: Vec<BlockKindInfo> = generator
        .registry()
        .kinds()
        .iter()
        .map(|kind| BlockKindInfo {
            kind: kind.id.clone(),
            category: kind.category.display_name().to_string(),
            display: kind.display.clone(),
            tooltip: kind.tooltip.clone(),
            colour: kind.colour,
            sockets: kind.sockets.clone(),
            output: kind.output,
            previous_statement: kind.previous_statement,
            next_statement: kind.next_statement,
        })
        .collect();
    serde_json::to_string(&kinds).unwrap_or_default()
}
