//! Export files (PNG, JSON, CSV) and their delivery: a browser download on
//! the web, a file under the app's data directory on desktop.

use serde::Serialize;
use thiserror::Error;

use crate::core::DataError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("{0}")]
    Data(#[from] DataError),
    #[error("{what} has nothing to export")]
    Unsupported { what: &'static str },
    #[error("Couldn't encode {filename}: {message}")]
    Encode { filename: String, message: String },
    #[error("Couldn't save {filename}: {message}")]
    Delivery { filename: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Pretty-printed `<name>.json`.
    pub fn json<T: Serialize>(name: &str, value: &T) -> Result<Self, ExportError> {
        let filename = format!("{name}.json");
        let text = serde_json::to_string_pretty(value).map_err(|err| ExportError::Encode {
            filename: filename.clone(),
            message: err.to_string(),
        })?;
        Ok(Self {
            filename,
            mime: "application/json",
            bytes: text.into_bytes(),
        })
    }

    pub fn csv(name: &str, text: String) -> Self {
        Self {
            filename: format!("{name}.csv"),
            mime: "text/csv",
            bytes: text.into_bytes(),
        }
    }

    pub fn png(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{name}.png"),
            mime: "image/png",
            bytes,
        }
    }
}

/// Hand the file to the user. Returns the saved path on desktop, `None`
/// when the browser took over the download.
pub async fn deliver(file: &ExportFile) -> Result<Option<String>, ExportError> {
    let result = download_bytes(&file.filename, file.mime, &file.bytes).await;
    result.map_err(|message| ExportError::Delivery {
        filename: file.filename.clone(),
        message,
    })
}

async fn download_bytes(filename: &str, mime: &str, bytes: &[u8]) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = mime;
        let dir = desktop_export_dir()?;
        write_export(&dir, filename, bytes).map(Some)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "Tunelog", "Tunelog")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(not(target_arch = "wasm32"))]
fn write_export(dir: &std::path::Path, filename: &str, bytes: &[u8]) -> Result<String, String> {
    std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(|err| err.to_string())?;
    Ok(path.to_string_lossy().to_string())
}

/// Rasterise an SVG drawing into PNG bytes.
pub async fn png_from_svg(name: &str, svg: &str, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    #[cfg(target_arch = "wasm32")]
    let result = png_from_svg_web(svg, width, height).await;

    #[cfg(not(target_arch = "wasm32"))]
    let result = {
        let _ = (width, height);
        png_from_svg_native(svg)
    };

    result.map_err(|message| ExportError::Encode {
        filename: format!("{name}.png"),
        message,
    })
}

#[cfg(target_arch = "wasm32")]
async fn png_from_svg_web(svg: &str, width: u32, height: u32) -> Result<Vec<u8>, String> {
    use base64::Engine as _;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
    };

    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(svg));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| "Unable to build SVG blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create SVG URL".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| "Unable to create canvas")?
        .dyn_into()
        .map_err(|_| "Canvas cast failed")?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| "Canvas context unavailable")?
        .ok_or("Canvas context missing")?
        .dyn_into()
        .map_err(|_| "Context cast failed")?;

    let image = HtmlImageElement::new().map_err(|_| "Unable to create image")?;
    image.set_src(&url);
    JsFuture::from(image.decode())
        .await
        .map_err(|_| "Image decode failed")?;

    context
        .draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|_| "Unable to draw image")?;

    let data_url = canvas
        .to_data_url_with_type("image/png")
        .map_err(|_| "Unable to serialise canvas")?;
    Url::revoke_object_url(&url).ok();

    let payload = data_url.split(',').nth(1).ok_or("Malformed data URL")?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| "PNG decode failed".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn png_from_svg_native(svg: &str) -> Result<Vec<u8>, String> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| err.to_string())?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or("Snapshot has zero size")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, size.width(), size.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .write_header()
            .map_err(|err| err.to_string())?
            .write_image_data(&rgba)
            .map_err(|err| err.to_string())?;
    }

    Ok(buffer)
}
