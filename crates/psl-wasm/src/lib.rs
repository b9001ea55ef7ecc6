//! WebAssembly bindings for the public suffix matcher.

use std::cell::RefCell;

use psl_core::List;
use wasm_bindgen::prelude::*;

thread_local! {
    static LIST: RefCell<Option<List>> = const { RefCell::new(None) };
}

fn with_list<R>(f: impl FnOnce(&mut List) -> R) -> Result<R, JsValue> {
    LIST.with(|cell| {
        let mut list = cell.borrow_mut();
        match list.as_mut() {
            Some(list) => Ok(f(list)),
            None => Err(JsValue::from_str("not initialized; call init() or init_selfie() first")),
        }
    })
}

/// Parses raw PSL text (the same format published at publicsuffix.org)
/// into the matcher used by all subsequent queries.
#[wasm_bindgen]
pub fn init(psl_text: &str) {
    LIST.with(|cell| {
        *cell.borrow_mut() = Some(List::parse(psl_text));
    });
}

/// Restores a previously-built matcher from a structured selfie, skipping
/// the PSL text parse entirely.
#[wasm_bindgen]
pub fn init_selfie(selfie: &[u8]) -> Result<(), JsValue> {
    let list = List::from_selfie(selfie).map_err(|e| JsValue::from_str(&e.to_string()))?;
    LIST.with(|cell| {
        *cell.borrow_mut() = Some(list);
    });
    Ok(())
}

#[wasm_bindgen]
pub fn public_suffix(hostname: &str) -> Result<String, JsValue> {
    with_list(|list| list.public_suffix(hostname))
}

#[wasm_bindgen]
pub fn registrable_domain(hostname: &str) -> Result<String, JsValue> {
    with_list(|list| list.registrable_domain(hostname))
}

#[wasm_bindgen]
pub fn is_public_suffix(hostname: &str) -> Result<bool, JsValue> {
    with_list(|list| list.is_public_suffix(hostname))
}

/// Serializes the current matcher to a selfie, so the host can cache it
/// and skip re-parsing PSL text on the next page load.
#[wasm_bindgen]
pub fn selfie() -> Result<Vec<u8>, JsValue> {
    with_list(|list| list.to_selfie())
}
