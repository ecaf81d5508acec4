//! Synthetic upload fixtures shared by the unit tests. Everything is
//! generated in-process so the test suite carries no binary assets.

use lopdf::{dictionary, Document, Object, Stream};

/// Deterministic pseudo-random bytes (LCG). Noise resists lossless
/// compression, which lets fixtures control how compressible they are.
pub fn noise_bytes(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

/// RGBA PNG filled with per-pixel noise. The alpha channel is noisy too,
/// so flattening to RGB is observable. PNG stores noise near raw size,
/// which makes the fixture as large as the pixel count demands.
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let noise = noise_bytes((width * height * 4) as usize);
    let img = image::RgbaImage::from_raw(width, height, noise).unwrap();
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Single-page PDF whose content stream is saved uncompressed: a noise
/// block (incompressible, controls the floor size) followed by repeated
/// text operations (highly compressible, guarantees the rewrite chain has
/// something to gain).
pub fn sample_pdf(noise_len: usize, text_repeats: usize) -> Vec<u8> {
    let mut content = noise_bytes(noise_len);
    content.extend_from_slice(
        "BT /F1 24 Tf 100 700 Td (stored in the vault) Tj ET\n"
            .repeat(text_repeats)
            .as_bytes(),
    );

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        assert_eq!(noise_bytes(64), noise_bytes(64));
    }

    #[test]
    fn test_sample_pdf_size_tracks_noise_floor() {
        let pdf = sample_pdf(150 * 1024, 1000);
        assert!(pdf.len() > 150 * 1024);
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }
}
