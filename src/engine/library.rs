//! Bitmap Library
//!
//! Append-only store of every bitmap in a session, loaded from disk or
//! produced by cropping. Ids are assigned sequentially from 0 and are never
//! reused; bitmaps are never mutated or removed once inserted.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::engine::image::Image;
use crate::error::{Result, StrataError};

/// Index of a bitmap in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitmapId(pub usize);

impl fmt::Display for BitmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bitmap owned by the library
#[derive(Debug, Clone)]
pub struct Bitmap {
    id: BitmapId,
    image: Image,
    /// Source file, or `None` for crops
    origin: Option<PathBuf>,
}

impl Bitmap {
    pub fn id(&self) -> BitmapId {
        self.id
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// Id-indexed collection of bitmaps
#[derive(Debug, Default)]
pub struct BitmapLibrary {
    bitmaps: Vec<Bitmap>,
}

impl BitmapLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image and return its newly assigned id.
    ///
    /// Space is reserved before anything is stored, so an allocation
    /// failure leaves the library as it was.
    pub fn insert(&mut self, image: Image, origin: Option<PathBuf>) -> Result<BitmapId> {
        self.bitmaps
            .try_reserve(1)
            .map_err(|e| StrataError::out_of_memory("bitmap library", e))?;

        let id = self.next_id();
        debug!(
            "Library: bitmap {} ({}x{}) from {}",
            id,
            image.width(),
            image.height(),
            origin
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "crop".to_string())
        );
        self.bitmaps.push(Bitmap { id, image, origin });

        Ok(id)
    }

    /// Look up a bitmap by id
    pub fn get(&self, id: BitmapId) -> Result<&Bitmap> {
        self.bitmaps
            .get(id.0)
            .ok_or_else(|| StrataError::BitmapNotFound {
                id: id.to_string(),
            })
    }

    /// Id the next inserted bitmap will receive
    pub fn next_id(&self) -> BitmapId {
        BitmapId(self.bitmaps.len())
    }

    /// Bitmaps in id order
    pub fn iter(&self) -> impl Iterator<Item = &Bitmap> {
        self.bitmaps.iter()
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> Image {
        Image::filled(width, height, [10, 20, 30, 255]).unwrap()
    }

    #[test]
    fn test_ids_are_sequential_from_zero() {
        let mut library = BitmapLibrary::new();
        assert!(library.is_empty());

        let a = library.insert(solid(1, 1), Some(PathBuf::from("a.bmp"))).unwrap();
        let b = library.insert(solid(2, 3), None).unwrap();

        assert_eq!(a, BitmapId(0));
        assert_eq!(b, BitmapId(1));
        assert_eq!(library.next_id(), BitmapId(2));
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_get_returns_stored_bitmap() {
        let mut library = BitmapLibrary::new();
        let id = library.insert(solid(2, 3), Some(PathBuf::from("x.bmp"))).unwrap();

        let bitmap = library.get(id).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (2, 3));
        assert_eq!(bitmap.origin(), Some(Path::new("x.bmp")));
    }

    #[test]
    fn test_get_unknown_id() {
        let library = BitmapLibrary::new();
        match library.get(BitmapId(4)) {
            Err(StrataError::BitmapNotFound { id }) => assert_eq!(id, "4"),
            other => panic!("Expected BitmapNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut library = BitmapLibrary::new();
        for w in 1..=3 {
            library.insert(solid(w, 1), None).unwrap();
        }
        let widths: Vec<u32> = library.iter().map(|b| b.width()).collect();
        assert_eq!(widths, vec![1, 2, 3]);
    }
}
