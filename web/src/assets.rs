use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context as _, anyhow, bail};
use futures_channel::oneshot;
use futures_util::future::join_all;
use gloo::events::EventListener;
use minion_match_core::{ImageId, ImageSource};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Response};

fn js_error(err: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!("{:?}", err)
}

async fn fetch_text(url: &str) -> anyhow::Result<String> {
    let window = gloo::utils::window();
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)
        .context("fetch did not return a Response")?;

    if !response.ok() {
        bail!("{} answered with status {}", url, response.status());
    }

    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    body.as_string().context("response body is not text")
}

/// Resolves the session's image pool, falling back to the built-in list on any failure.
pub(crate) async fn load_image_pool(source: ImageSource, offline: bool) -> Vec<ImageId> {
    if offline {
        log::info!("Offline, using fallback images");
        return source.fallback_pool();
    }

    let url = source.listing_url(js_sys::Date::now() as u64);
    log::debug!("fetching image listing: {}", url);
    let listing = fetch_text(&url)
        .await
        .inspect_err(|err| log::warn!("Could not fetch image listing: {:#}", err))
        .ok();
    source.resolve_pool(listing.as_deref())
}

/// Loads and decodes one image, `false` if the browser could not load it.
async fn preload_image(src: ImageId) -> bool {
    let Ok(image) = HtmlImageElement::new() else {
        return false;
    };

    let (sender, receiver) = oneshot::channel();
    let sender = Rc::new(RefCell::new(Some(sender)));
    let on_load = {
        let sender = sender.clone();
        EventListener::once(&image, "load", move |_| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(true);
            }
        })
    };
    let on_error = EventListener::once(&image, "error", move |_| {
        if let Some(sender) = sender.borrow_mut().take() {
            let _ = sender.send(false);
        }
    });

    image.set_src(&src);
    let loaded = receiver.await.unwrap_or(false);
    drop((on_load, on_error));

    if !loaded {
        log::warn!("Failed to preload: {}", src);
        return false;
    }

    // a decode failure still leaves a usable image
    if let Err(err) = JsFuture::from(image.decode()).await {
        log::debug!("decode of {} failed: {:?}", src, err);
    }
    true
}

/// Preloads every image concurrently and returns the ones that failed.
pub(crate) async fn preload_images(images: Vec<ImageId>) -> Vec<ImageId> {
    let results = join_all(images.iter().cloned().map(preload_image)).await;
    images
        .into_iter()
        .zip(results)
        .filter_map(|(image, loaded)| (!loaded).then_some(image))
        .collect()
}
