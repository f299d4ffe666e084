//! Placeholder asset generation. Real asset retrieval lives in an external
//! asset-storage service; these endpoints only ever serve placeholders.

/// Minimal valid 1x1 32-bpp ICO buffer.
pub fn placeholder_favicon() -> Vec<u8> {
    let mut ico = Vec::with_capacity(70);
    // ICONDIR: reserved, type = icon, one image
    ico.extend_from_slice(&[0, 0, 1, 0, 1, 0]);
    // ICONDIRENTRY: 1x1, no palette, 1 plane, 32 bpp
    ico.extend_from_slice(&[1, 1, 0, 0, 1, 0, 32, 0]);
    ico.extend_from_slice(&48u32.to_le_bytes()); // image data size
    ico.extend_from_slice(&22u32.to_le_bytes()); // image data offset
    // BITMAPINFOHEADER, height doubled to cover the AND mask
    ico.extend_from_slice(&40u32.to_le_bytes());
    ico.extend_from_slice(&1i32.to_le_bytes());
    ico.extend_from_slice(&2i32.to_le_bytes());
    ico.extend_from_slice(&[1, 0, 32, 0]); // planes, bpp
    ico.extend_from_slice(&0u32.to_le_bytes()); // no compression
    ico.extend_from_slice(&8u32.to_le_bytes()); // pixel + mask bytes
    ico.extend_from_slice(&[0u8; 16]); // resolution, palette counts
    ico.extend_from_slice(&[0x2c, 0x3e, 0x50, 0xff]); // single BGRA pixel
    ico.extend_from_slice(&0u32.to_le_bytes()); // AND mask row
    ico
}

/// SVG badge carrying the site's first alphanumeric initial.
pub fn placeholder_logo(name: &str) -> Vec<u8> {
    let initial = name
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());

    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96" viewBox="0 0 96 96">"##,
            r##"<rect width="96" height="96" rx="12" fill="#2c3e50"/>"##,
            r##"<text x="48" y="62" font-family="sans-serif" font-size="48" "##,
            r##"fill="#ffffff" text-anchor="middle">{}</text>"##,
            "</svg>"
        ),
        initial
    )
    .into_bytes()
}
