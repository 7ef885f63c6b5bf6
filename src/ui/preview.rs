use std::io::Cursor;
use std::path::PathBuf;

use ::image::ImageReader;
use iced::widget::image::Handle;
use thiserror::Error;

use crate::state::clip::{ClipSource, ClipState, Edge, Edges};
use crate::state::data::{FileEntry, ImageSize};

/// Failures while turning downloaded bytes into a preview
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not read image: {0}")]
    Image(#[from] ::image::ImageError),
}

/// One preview session: the downloaded texture and its clip rectangle.
///
/// Pixel values are edited through text fields, so the raw text of each
/// field is kept separately from the parsed clip state. That lets the user
/// type intermediate values like `12.` without the field being rewritten.
#[derive(Debug, Clone)]
pub struct Preview {
    pub entry: FileEntry,
    pub handle: Handle,
    pub clip: ClipState,
    /// Text of the pixel fields, indexed by [`Edge::index`]
    pub pixel_text: [String; 4],
    /// Last conversion failure, shown under the fields
    pub error: Option<String>,
    bytes: Vec<u8>,
}

impl Preview {
    /// Read the natural size of the image and start a full-image clip
    pub fn load(entry: FileEntry, bytes: Vec<u8>) -> Result<Self, PreviewError> {
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;

        let clip = ClipState::new(ImageSize::new(width, height));
        log::info!("🖼️  Previewing {} ({}x{})", entry.path, width, height);

        let mut preview = Self {
            handle: Handle::from_bytes(bytes.clone()),
            entry,
            clip,
            pixel_text: Default::default(),
            error: None,
            bytes,
        };
        preview.refresh_pixel_text();
        Ok(preview)
    }

    pub fn size(&self) -> ImageSize {
        self.clip.size
    }

    /// Coordinate slider moved
    pub fn edit_coord(&mut self, edge: Edge, value: f64) {
        self.clip.set_coord_edge(edge, value);
        self.check_order();
        self.refresh_pixel_text();
    }

    /// Rectangle drawn on the overlay
    pub fn set_coord(&mut self, coord: Edges) {
        self.clip.set_coord(coord);
        self.check_order();
        self.refresh_pixel_text();
    }

    /// Pixel field edited. Text that is not a number is kept but ignored.
    pub fn edit_pixel(&mut self, edge: Edge, text: String) {
        let parsed = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        self.pixel_text[edge.index()] = text;

        let Some(value) = parsed else {
            return;
        };

        match self.clip.edit(ClipSource::Pixel, edge, value) {
            Ok(()) => self.check_order(),
            Err(e) => {
                log::warn!("Clip edit rejected: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// The texture exactly as downloaded
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Flag a rectangle whose edges crossed over
    fn check_order(&mut self) {
        self.error = (!self.clip.coord.is_ordered())
            .then(|| "Top must not be below bottom, nor left right of right".to_string());
    }

    fn refresh_pixel_text(&mut self) {
        for edge in Edge::ALL {
            self.pixel_text[edge.index()] = self.clip.pixel.get(edge).to_string();
        }
    }
}

/// Ask for a destination and write the texture there.
///
/// Returns `Ok(None)` when the user cancels the dialog.
pub async fn save_texture(file_name: String, bytes: Vec<u8>) -> Result<Option<PathBuf>, String> {
    let target = rfd::AsyncFileDialog::new()
        .set_title("Save Texture")
        .set_file_name(file_name)
        .add_filter("PNG image", &["png"])
        .save_file()
        .await;

    let Some(handle) = target else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ImageFormat, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_load_reads_size() {
        let preview = Preview::load(FileEntry::new("a.png"), png_bytes(64, 32)).unwrap();

        assert_eq!(preview.size(), ImageSize::new(64, 32));
        assert_eq!(preview.clip.pixel, Edges::new(0.0, 0.0, 32.0, 64.0));
        assert_eq!(preview.pixel_text, ["0", "0", "32", "64"].map(String::from));
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(Preview::load(FileEntry::new("a.png"), b"not an image".to_vec()).is_err());
    }

    #[test]
    fn test_edit_pixel_keeps_partial_text() {
        let mut preview = Preview::load(FileEntry::new("a.png"), png_bytes(64, 32)).unwrap();

        preview.edit_pixel(Edge::Left, "16.".to_string());
        assert_eq!(preview.pixel_text[Edge::Left.index()], "16.");
        assert_eq!(preview.clip.coord.left, 0.25);

        preview.edit_pixel(Edge::Left, "abc".to_string());
        assert_eq!(preview.pixel_text[Edge::Left.index()], "abc");
        assert_eq!(preview.clip.coord.left, 0.25);
    }

    #[test]
    fn test_edit_coord_refreshes_pixel_text() {
        let mut preview = Preview::load(FileEntry::new("a.png"), png_bytes(64, 32)).unwrap();

        preview.edit_coord(Edge::Bottom, 0.5);
        assert_eq!(preview.pixel_text[Edge::Bottom.index()], "16");

        preview.set_coord(Edges::new(0.25, 0.25, 0.75, 0.75));
        assert_eq!(preview.clip.to_clip_path(), "rect(8px, 48px, 24px, 16px)");
        assert!(preview.error.is_none());
    }

    #[test]
    fn test_slider_value_is_rounded() {
        let mut preview = Preview::load(FileEntry::new("a.png"), png_bytes(64, 32)).unwrap();

        preview.edit_coord(Edge::Left, 6.0 * 0.0001);
        assert_eq!(preview.clip.coord.left, 0.0006);
        assert_eq!(preview.clip.to_tex_coords(), "SetTexCoord(0.0006, 1, 0, 1)");
    }

    #[test]
    fn test_crossed_edges_are_flagged() {
        let mut preview = Preview::load(FileEntry::new("a.png"), png_bytes(64, 32)).unwrap();

        preview.edit_coord(Edge::Top, 0.9);
        preview.edit_coord(Edge::Bottom, 0.1);
        assert!(preview.error.is_some());

        preview.edit_pixel(Edge::Bottom, "32".to_string());
        assert!(preview.error.is_none());
    }

    #[test]
    fn test_keeps_original_bytes() {
        let bytes = png_bytes(4, 4);
        let preview = Preview::load(FileEntry::new("a.png"), bytes.clone()).unwrap();

        assert_eq!(preview.bytes(), bytes.as_slice());
    }
}
