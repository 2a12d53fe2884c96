use super::*;
use image::{GenericImageView, Rgba, RgbaImage};

fn write_source(dir: &Path, w: u32, h: u32) -> PathBuf {
    let path = dir.join("source.png");
    RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255]))
        .save(&path)
        .unwrap();
    path
}

#[tokio::test]
async fn local_file_is_shrunk_to_fit() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), 800, 400);
    let dest = dir.path().join("out").join("cover.png");

    ImageSaver::new()
        .unwrap()
        .save(&Artwork::LocalFile(source), &dest, 400, 400)
        .await
        .unwrap();

    let saved = image::open(&dest).unwrap();
    assert_eq!(saved.dimensions(), (400, 200));
}

#[tokio::test]
async fn small_images_are_not_enlarged() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), 64, 32);
    let dest = dir.path().join("cover.jpg");

    ImageSaver::new()
        .unwrap()
        .save(&Artwork::LocalFile(source), &dest, 400, 400)
        .await
        .unwrap();

    assert_eq!(image::open(&dest).unwrap().dimensions(), (64, 32));
}

#[tokio::test]
async fn no_artwork_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = ImageSaver::new()
        .unwrap()
        .save(&Artwork::None, &dir.path().join("x.png"), 400, 400)
        .await
        .unwrap_err();
    assert!(matches!(err, ArtworkError::Unavailable));
}

#[tokio::test]
async fn missing_local_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ImageSaver::new()
        .unwrap()
        .save(
            &Artwork::LocalFile(dir.path().join("nope.png")),
            &dir.path().join("x.png"),
            400,
            400,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ArtworkError::Io(_)));
}

#[test]
fn undecodable_bytes_are_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_resized(b"not an image", &dir.path().join("x.png"), 400, 400).unwrap_err();
    assert!(matches!(err, ArtworkError::Decode(_)));
}
