// SPDX-License-Identifier: GPL-3.0-or-later
use bytes::{BufMut, Bytes, BytesMut};
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::RgbImage;
use tracing::trace;

#[cfg(feature = "mozjpeg")]
use mozjpeg::{ColorSpace, Compress};

#[cfg(feature = "mozjpeg")]
fn encode_jpeg_mozjpeg(image: &RgbImage) -> Bytes {
    trace!("using mozjpeg to encode JPEG image");
    // A fresh encoder per frame is a little less efficient, but much easier
    // to hold on to across threads.
    let mut jpeg_encoder = Compress::new(ColorSpace::JCS_RGB);
    jpeg_encoder.set_color_space(ColorSpace::JCS_RGB);
    jpeg_encoder.set_fastest_defaults();
    jpeg_encoder.set_quality(75.0);
    jpeg_encoder.set_mem_dest();
    jpeg_encoder.set_size(image.width() as usize, image.height() as usize);
    jpeg_encoder.start_compress();
    // Hope write_scanlines can process everything in one go.
    if !jpeg_encoder.write_scanlines(image) {
        panic!("There was an error of some kind when encoding an image to JPEG");
    }
    jpeg_encoder.finish_compress();
    Bytes::from(jpeg_encoder.data_to_vec().unwrap())
}

fn encode_jpeg_image(image: &RgbImage) -> Bytes {
    trace!("using image crate to encode JPEG image");
    let mut jpeg_buf = BytesMut::new().writer();
    let mut encoder = ImageJpegEncoder::new(&mut jpeg_buf);
    encoder.encode_image(image).unwrap();
    jpeg_buf.into_inner().freeze()
}

#[cfg(not(feature = "mozjpeg"))]
pub(crate) fn encode_jpeg(image: &RgbImage) -> Bytes {
    encode_jpeg_image(image)
}

#[cfg(feature = "mozjpeg")]
pub(crate) fn encode_jpeg(image: &RgbImage) -> Bytes {
    if cfg!(feature = "mozjpeg") {
        encode_jpeg_mozjpeg(image)
    } else {
        encode_jpeg_image(image)
    }
}

#[cfg(test)]
mod test {
    use super::encode_jpeg;
    use image::RgbImage;

    #[test]
    fn output_is_a_jpeg() {
        let image = RgbImage::from_pixel(160, 120, image::Rgb([0x20, 0x40, 0x80]));
        let jpeg = encode_jpeg(&image);
        // JPEG start-of-image and end-of-image markers.
        assert_eq!(&jpeg[..2], b"\xFF\xD8");
        assert_eq!(&jpeg[jpeg.len() - 2..], b"\xFF\xD9");
    }
}
