//! Static fallback for devices below the capability threshold.

use crate::constants::{FALLBACK_CLASS, SR_ONLY_CLASS};
use crate::dom::create_element;
use app_core::FallbackImage;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Append the fallback image and its visually hidden description to
/// `container`. Returns the inserted nodes so they can be removed on unmount.
pub fn render(
    document: &web::Document,
    container: &web::Element,
    image: &FallbackImage,
) -> Result<Vec<web::Element>, JsValue> {
    let img: web::HtmlImageElement = create_element(document, "img")?;
    img.set_src(image.src);
    img.set_width(image.width);
    img.set_height(image.height);
    img.set_alt(image.alt);
    img.set_class_name(FALLBACK_CLASS);

    let description: web::HtmlElement = create_element(document, "span")?;
    description.set_class_name(SR_ONLY_CLASS);
    description.set_text_content(Some(image.description));

    container.append_child(&img)?;
    container.append_child(&description)?;
    log::info!("[host] fallback image {}", image.src);
    Ok(vec![img.into(), description.into()])
}
