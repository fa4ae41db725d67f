//! Fetches glTF models and adds them to the shared scene as they arrive.

use clickzoom_core::{
    place_model, BufferSource, GltfAsset, ImportError, Scene, SceneNode, MODEL_ITEMS,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Resolve `url` against `base`, or against the document when `base` is `None`.
pub fn resolve_url(url: &str, base: Option<&str>) -> anyhow::Result<String> {
    let base = match base {
        Some(b) => b.to_string(),
        None => crate::dom::window_document()
            .and_then(|d| d.base_uri().ok().flatten())
            .ok_or_else(|| anyhow::anyhow!("no document base URI"))?,
    };
    let resolved = web::Url::new_with_base(url, &base).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(resolved.href())
}

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    if !resp.ok() {
        anyhow::bail!("GET {} failed with status {}", url, resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Fetch a `.gltf`/`.glb` document and its buffers and convert it to a node tree.
pub async fn load_model(url: &str) -> anyhow::Result<SceneNode> {
    let url = resolve_url(url, None)?;
    let bytes = fetch_bytes(&url).await?;
    let asset = GltfAsset::parse(&bytes)?;

    let mut buffers = Vec::new();
    for req in asset.buffer_requests() {
        let data = match &req.source {
            BufferSource::Blob => asset
                .blob()
                .map(<[u8]>::to_vec)
                .ok_or(ImportError::MissingBlob)?,
            BufferSource::Uri(uri) => fetch_bytes(&resolve_url(uri, Some(&url))?).await?,
        };
        log::debug!("[loader] buffer {} ({} bytes)", req.index, data.len());
        buffers.push(data);
    }
    Ok(asset.to_scene_node(&buffers)?)
}

/// Start one load per configured model; each is placed on the stage row and
/// added to `scene` when it finishes. Failures are logged and skipped.
pub fn spawn_model_loads(scene: Rc<RefCell<Scene>>) {
    let count = MODEL_ITEMS.len();
    for (index, item) in MODEL_ITEMS.iter().copied().enumerate() {
        let scene = scene.clone();
        spawn_local(async move {
            match load_model(item.url).await {
                Ok(root) => {
                    let node = place_model(root, &item, index, count);
                    for line in node.dump_tree() {
                        log::debug!("{}", line);
                    }
                    let path = scene.borrow_mut().add(node);
                    log::info!("[loader] {} ready at {:?}", item.url, path.indices());
                }
                Err(e) => log::error!("[loader] {}: {:?}", item.url, e),
            }
        });
    }
}
