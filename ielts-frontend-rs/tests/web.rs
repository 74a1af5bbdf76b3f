#![cfg(target_arch = "wasm32")]

use ielts_frontend_rs::browser::LocalStorage;
use ielts_frontend_rs::{KeyValueStore, Skill};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let store = LocalStorage::new().expect("localStorage should exist in a browser");
    store.set("ielts-web-test", "{\"Reading\":7}").unwrap();
    assert_eq!(
        store.get("ielts-web-test").unwrap().as_deref(),
        Some("{\"Reading\":7}")
    );
    assert_eq!(store.get("ielts-missing-key").unwrap(), None);
}

#[wasm_bindgen_test]
fn diagnostic_order_starts_with_listening() {
    assert_eq!(Skill::ORDER[0], Skill::Listening);
    assert_eq!(Skill::ORDER[3], Skill::Speaking);
}
