use pkgtex_tex::{
    decode_texture, error::Error, ContainerVersion, DecodedTexture, ErrorClass, ImageFormat,
    Texture, TextureContent, TextureFlags, TextureFormat,
};
use pretty_assertions::assert_eq;
use tracing::info;
use tracing_test::traced_test;

/// Fields of a single-image, single-mip texture.
struct TexBuilder {
    length_prefixed: bool,
    format: i32,
    flags: i32,
    texture_size: (i32, i32),
    container: String,
    image_count: i32,
    version_fields: Vec<i32>,
    mip_count: i32,
    mip_size: (i32, i32),
    compression: Option<(i32, i32)>,
    data: Vec<u8>,
}

impl TexBuilder {
    fn v1(format: i32, width: i32, height: i32, data: Vec<u8>) -> Self {
        TexBuilder {
            length_prefixed: false,
            format,
            flags: 0,
            texture_size: (width, height),
            container: "TEXB0001".into(),
            image_count: 1,
            version_fields: Vec::new(),
            mip_count: 1,
            mip_size: (width, height),
            compression: None,
            data,
        }
    }

    fn version(mut self, container: &str, fields: &[i32], compression: (i32, i32)) -> Self {
        self.container = container.into();
        self.version_fields = fields.to_vec();
        self.compression = Some(compression);
        self
    }

    fn magic(&self, out: &mut Vec<u8>, magic: &str) {
        if self.length_prefixed {
            out.extend_from_slice(&(magic.len() as i32).to_le_bytes());
            out.extend_from_slice(magic.as_bytes());
        } else {
            out.extend_from_slice(magic.as_bytes());
            out.push(0);
        }
    }

    fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.magic(&mut out, "TEXV0005");
        self.magic(&mut out, "TEXI0001");

        let (width, height) = self.texture_size;
        for field in [self.format, self.flags, width, height, width, height, 0] {
            out.extend_from_slice(&field.to_le_bytes());
        }

        self.magic(&mut out, &self.container);
        out.extend_from_slice(&self.image_count.to_le_bytes());
        for field in &self.version_fields {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.extend_from_slice(&self.mip_count.to_le_bytes());

        out.extend_from_slice(&self.mip_size.0.to_le_bytes());
        out.extend_from_slice(&self.mip_size.1.to_le_bytes());
        if let Some((compressed, size)) = self.compression {
            out.extend_from_slice(&compressed.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(&(self.data.len() as i32).to_le_bytes());
        out.extend_from_slice(&self.data);
        out
    }
}

#[rustfmt::skip]
const RED_BLOCK: [u8; 8] = [
    0x00, 0xF8,
    0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

fn rgba_gradient(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| [i as u8, (i * 3) as u8, (i * 7) as u8, 0xFF])
        .collect()
}

#[traced_test]
#[test]
fn bc1_red_texture() -> Result<(), Error> {
    let input = TexBuilder::v1(7, 4, 4, RED_BLOCK.to_vec()).build();

    let texture = Texture::parse(&input)?;
    assert_eq!(texture.header().format, TextureFormat::Dxt1);
    assert_eq!(texture.version(), ContainerVersion::V1);
    assert_eq!(texture.image_count(), 1);
    assert_eq!(texture.mip_count(), 1);
    assert!(!texture.mip().is_compressed());

    let image = texture.decode()?;
    assert_eq!(image.width(), 4);
    assert_eq!(image.height(), 4);
    assert!(image.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));

    Ok(())
}

#[traced_test]
#[test]
fn length_prefixed_magics() -> Result<(), Error> {
    let mut builder = TexBuilder::v1(7, 4, 4, RED_BLOCK.to_vec());
    builder.length_prefixed = true;
    let input = builder.build();

    let DecodedTexture::Image(image) = decode_texture(&input)? else {
        panic!("expected pixels");
    };
    assert_eq!(image.pixel(3, 3), Some([255, 0, 0, 255]));

    Ok(())
}

#[traced_test]
#[test]
fn header_flags() -> Result<(), Error> {
    let mut builder = TexBuilder::v1(9, 2, 2, vec![0; 4]);
    builder.flags = 6;
    let input = builder.build();

    let texture = Texture::parse(&input)?;
    assert!(texture.header().flags.contains(TextureFlags::CLAMP_UVS));
    assert!(texture.header().flags.contains(TextureFlags::IS_GIF));
    assert!(!texture.header().flags.contains(TextureFlags::NO_INTERPOLATION));

    Ok(())
}

#[traced_test]
#[test]
fn lz4_compressed_rgba() -> Result<(), Error> {
    let pixels = rgba_gradient(8, 8);
    let compressed = lz4_flex::block::compress(&pixels);

    for (container, fields) in [
        ("TEXB0002", vec![]),
        ("TEXB0003", vec![-1]),
        ("TEXB0004", vec![-1, 0]),
    ] {
        info!("container {container}");
        let input = TexBuilder::v1(0, 8, 8, compressed.clone())
            .version(container, &fields, (1, pixels.len() as i32))
            .build();

        let texture = Texture::parse(&input)?;
        assert!(texture.mip().is_compressed());
        assert_eq!(texture.mip().data(), pixels.as_slice());
        assert_eq!(texture.decode()?.into_raw(), pixels);
    }

    Ok(())
}

#[traced_test]
#[test]
fn compression_flag_other_than_one_is_stored() -> Result<(), Error> {
    let pixels = rgba_gradient(2, 2);
    let input = TexBuilder::v1(0, 2, 2, pixels.clone())
        .version("TEXB0002", &[], (2, 999))
        .build();

    let texture = Texture::parse(&input)?;
    assert!(!texture.mip().is_compressed());
    assert_eq!(texture.decode()?.into_raw(), pixels);

    Ok(())
}

#[traced_test]
#[test]
fn corrupt_lz4_payload() {
    let input = TexBuilder::v1(0, 8, 8, vec![0xFF; 32])
        .version("TEXB0002", &[], (1, 256))
        .build();

    let err = Texture::parse(&input).unwrap_err();
    assert!(matches!(err, Error::DecompressionFailed { expected: 256 }));
    assert_eq!(err.class(), ErrorClass::Structural);
}

#[traced_test]
#[test]
fn embedded_png_passthrough() -> Result<(), Error> {
    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    let input = TexBuilder::v1(0, 16, 16, png.clone())
        .version("TEXB0003", &[13], (0, 0))
        .build();

    let texture = Texture::parse(&input)?;
    assert_eq!(
        texture.content(),
        TextureContent::Embedded(ImageFormat::Png, png.as_slice())
    );

    let err = texture.decode().unwrap_err();
    assert!(matches!(err, Error::EmbeddedImage(ImageFormat::Png)));
    assert!(err.is_unsupported());

    assert_eq!(
        decode_texture(&input)?,
        DecodedTexture::Embedded {
            format: ImageFormat::Png,
            data: png,
        }
    );

    Ok(())
}

#[traced_test]
#[test]
fn v4_video_without_format_is_mp4() -> Result<(), Error> {
    let input = TexBuilder::v1(0, 4, 4, b"not really a movie".to_vec())
        .version("TEXB0004", &[-1, 1], (0, 0))
        .build();

    let texture = Texture::parse(&input)?;
    assert_eq!(
        texture.version(),
        ContainerVersion::V4 {
            image_format: ImageFormat::Mp4,
            is_video: true,
        }
    );
    assert!(matches!(texture.content(), TextureContent::Video(_)));
    assert!(matches!(texture.decode(), Err(Error::Video)));

    Ok(())
}

#[traced_test]
#[test]
fn v4_declared_image_with_video_flag_is_embedded() -> Result<(), Error> {
    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    let input = TexBuilder::v1(0, 16, 16, png.clone())
        .version("TEXB0004", &[13, 1], (0, 0))
        .build();

    let texture = Texture::parse(&input)?;
    assert_eq!(
        texture.version(),
        ContainerVersion::V4 {
            image_format: ImageFormat::Png,
            is_video: true,
        }
    );
    assert_eq!(
        texture.content(),
        TextureContent::Embedded(ImageFormat::Png, png.as_slice())
    );
    assert_eq!(
        decode_texture(&input)?,
        DecodedTexture::Embedded {
            format: ImageFormat::Png,
            data: png,
        }
    );

    Ok(())
}

#[traced_test]
#[test]
fn ftyp_sniffed_as_video() -> Result<(), Error> {
    let movie = b"\0\0\0\x18ftypmp42\0\0\0\0mp42isom".to_vec();
    let input = TexBuilder::v1(0, 4, 4, movie.clone()).build();

    assert_eq!(decode_texture(&input)?, DecodedTexture::Video(movie));

    Ok(())
}

#[traced_test]
#[test]
fn not_a_texture() {
    for input in [
        b"".as_slice(),
        b"TEXV0004\0TEXI0001\0".as_slice(),
        b"TEXV0005\0TEXI0002\0".as_slice(),
        b"\x89PNG\r\n\x1a\n".as_slice(),
        b"{\"scene\": 1}".as_slice(),
    ] {
        let err = Texture::parse(input).unwrap_err();
        assert!(matches!(err, Error::NotATexture), "{input:?}: {err}");
        assert_eq!(err.class(), ErrorClass::Unsupported);
    }
}

#[traced_test]
#[test]
fn unknown_pixel_format() -> Result<(), Error> {
    let input = TexBuilder::v1(3, 4, 4, vec![0; 64]).build();

    let texture = Texture::parse(&input)?;
    assert!(matches!(
        texture.decode(),
        Err(Error::UnsupportedFormat(TextureFormat::Unknown(3)))
    ));

    Ok(())
}

#[traced_test]
#[test]
fn unknown_container_version_reads_like_v1() -> Result<(), Error> {
    for container in ["TEXB0009", "TEXBabcd"] {
        let mut builder = TexBuilder::v1(9, 2, 1, vec![0x40, 0x80]);
        builder.container = container.into();
        let input = builder.build();

        let texture = Texture::parse(&input)?;
        assert!(matches!(texture.version(), ContainerVersion::Unknown(_)));
        assert_eq!(texture.decode()?.pixel(1, 0), Some([0x80, 0x80, 0x80, 0xFF]));
    }

    Ok(())
}

#[traced_test]
#[test]
fn out_of_range_fields() {
    let base = || TexBuilder::v1(0, 1, 1, vec![0; 4]);

    let cases: Vec<(&str, TexBuilder)> = vec![
        ("texture width", TexBuilder { texture_size: (0, 1), ..base() }),
        ("texture height", TexBuilder { texture_size: (1, -4), ..base() }),
        ("no images", TexBuilder { image_count: 0, ..base() }),
        ("too many images", TexBuilder { image_count: 4096, ..base() }),
        ("no mips", TexBuilder { mip_count: 0, ..base() }),
        ("too many mips", TexBuilder { mip_count: 64, ..base() }),
        ("mip width", TexBuilder { mip_size: (16385, 1), ..base() }),
        ("mip height", TexBuilder { mip_size: (1, 0), ..base() }),
        ("zero decompressed size", base().version("TEXB0002", &[], (1, 0))),
        ("negative decompressed size", base().version("TEXB0002", &[], (1, -1))),
    ];

    for (name, builder) in cases {
        let input = builder.build();
        let result = Texture::parse(&input);
        assert!(matches!(result, Err(Error::InvalidFormat(_))), "{name}");
    }
}

#[traced_test]
#[test]
fn mip_length_past_end() {
    let mut input = TexBuilder::v1(0, 1, 1, vec![0; 4]).build();
    let at = input.len() - 8;
    input[at..at + 4].copy_from_slice(&5i32.to_le_bytes());

    assert!(matches!(Texture::parse(&input), Err(Error::InvalidFormat(_))));

    input[at..at + 4].copy_from_slice(&(-1i32).to_le_bytes());
    assert!(matches!(Texture::parse(&input), Err(Error::InvalidFormat(_))));
}

#[traced_test]
#[test]
fn short_pixel_payload() -> Result<(), Error> {
    let input = TexBuilder::v1(7, 8, 8, RED_BLOCK.to_vec()).build();

    let texture = Texture::parse(&input)?;
    assert!(matches!(
        texture.decode(),
        Err(Error::InsufficientData {
            needed: 32,
            actual: 8
        })
    ));

    Ok(())
}

#[traced_test]
#[test]
fn truncated_header_reports_wire_size() {
    let input = TexBuilder::v1(7, 4, 4, RED_BLOCK.to_vec()).build();
    let magics = b"TEXV0005\0TEXI0001\0".len();

    let err = Texture::parse(&input[..magics + 20]).unwrap_err();
    assert!(matches!(
        err,
        Error::Cursor(pkgtex_io::Error::Truncated {
            needed: 28,
            remaining: 20
        })
    ));
    assert_eq!(err.class(), ErrorClass::Structural);
}

#[traced_test]
#[test]
fn largest_mip_dimensions() -> Result<(), Error> {
    for (width, height) in [(16384, 1), (1, 16384)] {
        info!("{width}x{height}");
        let input = TexBuilder::v1(9, width, height, vec![0x42; 16384]).build();

        let texture = Texture::parse(&input)?;
        assert_eq!(texture.mip().width(), width as u32);
        assert_eq!(texture.mip().height(), height as u32);

        let DecodedTexture::Image(image) = decode_texture(&input)? else {
            panic!("expected pixels");
        };
        assert_eq!((image.width(), image.height()), (width as u32, height as u32));
        assert_eq!(
            image.pixel(width as u32 - 1, height as u32 - 1),
            Some([0x42, 0x42, 0x42, 255])
        );
    }

    Ok(())
}

#[traced_test]
#[test]
fn every_truncation_fails() {
    let input = TexBuilder::v1(7, 4, 4, RED_BLOCK.to_vec())
        .version("TEXB0004", &[-1, 0], (0, 0))
        .build();
    assert!(Texture::parse(&input).is_ok());

    for len in 0..input.len() {
        assert!(Texture::parse(&input[..len]).is_err(), "prefix of {len} bytes");
    }
}
