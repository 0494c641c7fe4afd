use shader_preview::{
    assets::{AssetState, AssetStore, default_normal_texture, texture_names},
    error::PreviewError,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn should_request_each_name_once() {
    let mut requested = Vec::new();
    let store: AssetStore<u32> =
        AssetStore::begin_load_all(["a", "b", "a", "c"], |name| requested.push(name.to_string()));
    assert_eq!(requested, names(&["a", "b", "c"]));
    assert_eq!(store.names(), names(&["a", "b", "c"]).as_slice());
    assert_eq!(store.pending(), 3);
}

#[test]
fn should_not_be_ready_while_loading() {
    let store: AssetStore<u32> = AssetStore::begin_load_all(["a"], |_| {});
    assert_eq!(store.state("a"), Some(&AssetState::Loading));
    assert_eq!(store.lookup("a"), None);
}

#[test]
fn should_be_ready_after_successful_load() {
    let mut store = AssetStore::begin_load_all(["a", "b"], |_| {});
    store.on_load_result("a", Ok(7));
    assert_eq!(store.lookup("a"), Some(&7));
    assert_eq!(store.lookup("b"), None);
    assert_eq!(store.pending(), 1);
}

#[test]
fn should_never_become_ready_after_failure() {
    let mut store = AssetStore::begin_load_all(["a"], |_| {});
    store.on_load_result("a", Err("404".to_string()));
    store.on_load_result("a", Ok(1));
    assert_eq!(store.lookup("a"), None);
    assert_eq!(
        store.state("a"),
        Some(&AssetState::Failed(PreviewError::TextureLoadFailed {
            name: "a".to_string(),
            reason: "404".to_string(),
        }))
    );
}

#[test]
fn should_keep_first_successful_handle() {
    let mut store = AssetStore::begin_load_all(["a"], |_| {});
    store.on_load_result("a", Ok(1));
    store.on_load_result("a", Ok(2));
    assert_eq!(store.lookup("a"), Some(&1));
}

#[test]
fn should_ignore_unknown_names() {
    let mut store = AssetStore::begin_load_all(["a"], |_| {});
    store.on_load_result("zzz", Ok(1));
    assert!(!store.contains("zzz"));
    assert_eq!(store.state("zzz"), None);
    assert_eq!(store.lookup("zzz"), None);
}

#[test]
fn should_list_default_texture_first_without_duplicates() {
    assert_eq!(
        texture_names("wood", &names(&["wood_n", "wood", "wood_n", "metal"])),
        names(&["wood", "wood_n", "metal"])
    );
}

#[test]
fn should_pick_first_normal_like_name() {
    let extras = names(&["wood_diff", "wood_NORMAL", "wood_spec"]);
    assert_eq!(default_normal_texture("wood_diff", &extras), "wood_NORMAL");

    let extras = names(&["a_norm", "b_normal"]);
    assert_eq!(default_normal_texture("x", &extras), "a_norm");
}

#[test]
fn should_fall_back_to_default_texture_as_normal() {
    let extras = names(&["wood_diff", "wood_spec"]);
    assert_eq!(default_normal_texture("wood_diff", &extras), "wood_diff");
    assert_eq!(default_normal_texture("wood_diff", &[]), "wood_diff");
}
