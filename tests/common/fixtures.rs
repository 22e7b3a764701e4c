//! Report payloads and photo fixtures for integration tests

use serde_json::{Value, json};

/// Order number used across the integration tests
pub const TEST_ORDER_ID: &str = "63424231";

/// Appraiser name used across the integration tests
pub const TEST_APPRAISER: &str = "李明远";

/// Build a full report record in the server's wire format
///
/// `photo_urls` become `imageList` entries in the given order.
pub fn report_json(order_id: &str, status: &str, photo_urls: &[&str]) -> Value {
    let image_list: Vec<Value> = photo_urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "id": format!("img-{i}"),
                "image": url,
                "modelId": "model-77",
                "modelName": "Air Runner 2024",
                "orderId": order_id,
                "rangeId": format!("range-{i}"),
                "gmtCreate": 1_700_000_000_000_i64,
                "gmtModified": 1_700_000_000_000_i64,
            })
        })
        .collect();

    json!({
        "id": order_id,
        "status": status,
        "appraiserName": TEST_APPRAISER,
        "imageList": image_list,
        "gmtCreate": 1_700_000_000_000_i64,
    })
}

/// Wrap a record in the server's success envelope
pub fn success_envelope(data: Value) -> Value {
    json!({
        "success": true,
        "msg": null,
        "data": data,
    })
}

/// Build the server's logical-failure envelope
pub fn failure_envelope(msg: &str) -> Value {
    json!({
        "success": false,
        "msg": msg,
        "data": null,
    })
}

/// Encode a solid-color PNG for photo mocks
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .expect("PNG encoding of a test fixture cannot fail");
    bytes
}
