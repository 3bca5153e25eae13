//! Padding puissance de deux et découpage en sous-images carrées.

use gc_core::error::CoreError;
use gc_core::frame::{PixelGrid, Rgb};

/// Facteur appliqué par `ResolutionBounds::double` / `halve`.
pub const RESOLUTION_STEP: u32 = 2;

/// Dimensions après padding : puissance de deux ≥ chaque côté.
///
/// # Example
/// ```
/// use gc_ascii::partition::padded_size;
/// assert_eq!(padded_size(300, 128), (512, 128));
/// ```
#[inline]
#[must_use]
pub fn padded_size(width: u32, height: u32) -> (u32, u32) {
    (width.next_power_of_two(), height.next_power_of_two())
}

/// Pad `image` to power-of-two dimensions with `fill`, source image centered.
///
/// Odd padding puts the extra pixel on the right / bottom.
///
/// # Example
/// ```
/// use gc_core::frame::{PixelGrid, WHITE};
/// use gc_ascii::partition::pad;
///
/// let image = PixelGrid::new(3, 2);
/// let padded = pad(&image, WHITE);
/// assert_eq!((padded.width, padded.height), (4, 2));
/// assert_eq!(padded.pixel(0, 0), (0, 0, 0));
/// assert_eq!(padded.pixel(3, 0), WHITE);
/// ```
#[must_use]
pub fn pad(image: &PixelGrid, fill: Rgb) -> PixelGrid {
    let (width, height) = padded_size(image.width, image.height);
    if (width, height) == (image.width, image.height) {
        return image.clone();
    }
    let left = (width - image.width) / 2;
    let top = (height - image.height) / 2;

    let mut padded = PixelGrid::filled(width, height, fill);
    let row_len = image.width as usize * 3;
    for y in 0..image.height {
        let src = y as usize * row_len;
        let dst = ((y + top) as usize * width as usize + left as usize) * 3;
        if let Some(row) = image.data.get(src..src + row_len) {
            padded.data[dst..dst + row_len].copy_from_slice(row);
        }
    }
    padded
}

/// Côté des cellules pour `resolution` colonnes.
///
/// # Errors
/// `CoreError::InvalidResolution` si `resolution` vaut 0, ne divise pas
/// `width`, ou donne des cellules qui ne pavent pas exactement `height`.
pub fn cell_size(width: u32, height: u32, resolution: u32) -> Result<u32, CoreError> {
    let invalid = CoreError::InvalidResolution {
        resolution,
        padded_width: width,
    };
    if resolution == 0 || width % resolution != 0 {
        return Err(invalid);
    }
    let cell = width / resolution;
    if cell == 0 || cell > height || height % cell != 0 {
        return Err(invalid);
    }
    Ok(cell)
}

/// Split `padded` into `rows × resolution` square cells.
///
/// # Errors
/// See [`cell_size`].
///
/// # Example
/// ```
/// use gc_core::frame::PixelGrid;
/// use gc_ascii::partition::divide;
///
/// let division = divide(PixelGrid::new(16, 8), 4).unwrap();
/// assert_eq!((division.rows(), division.cols(), division.cell_size()), (2, 4, 4));
/// ```
pub fn divide(padded: PixelGrid, resolution: u32) -> Result<Division, CoreError> {
    let cell = cell_size(padded.width, padded.height, resolution)?;
    Ok(Division {
        rows: padded.height / cell,
        cols: resolution,
        cell,
        padded,
    })
}

/// Image paddée découpée en grille de sous-images.
#[derive(Clone, Debug)]
pub struct Division {
    padded: PixelGrid,
    cell: u32,
    rows: u32,
    cols: u32,
}

impl Division {
    /// Number of cell rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cell columns (the resolution).
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Side of each square cell, in pixels.
    #[must_use]
    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    /// The padded image the cells are cut from.
    #[must_use]
    pub fn padded(&self) -> &PixelGrid {
        &self.padded
    }

    /// Cell at (`row`, `col`).
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> SubImage<'_> {
        SubImage {
            grid: &self.padded,
            row,
            col,
            size: self.cell,
        }
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = SubImage<'_>> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| self.cell(row, col)))
    }
}

/// Vue carrée sur une cellule de l'image paddée.
#[derive(Clone, Copy, Debug)]
pub struct SubImage<'a> {
    grid: &'a PixelGrid,
    row: u32,
    col: u32,
    size: u32,
}

impl SubImage<'_> {
    /// Side in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Cell row in the division.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Cell column in the division.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Pixel (x, y) relatif au coin haut-gauche de la cellule.
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.grid
            .pixel(self.col * self.size + x, self.row * self.size + y)
    }

    /// Tous les pixels, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| self.pixel(x, y)))
    }
}

/// Plage de résolutions acceptables pour une image.
///
/// `max` = largeur paddée (cellules d'un pixel), `min` = nombre de colonnes
/// pour lequel une cellule occupe toute la hauteur paddée (au moins 1).
///
/// # Example
/// ```
/// use gc_ascii::partition::ResolutionBounds;
/// let bounds = ResolutionBounds::for_image(300, 100);
/// assert_eq!((bounds.min, bounds.max), (4, 512));
/// assert_eq!(bounds.double(256).unwrap(), 512);
/// assert!(bounds.double(512).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionBounds {
    /// Plus petite résolution valide.
    pub min: u32,
    /// Plus grande résolution valide.
    pub max: u32,
}

impl ResolutionBounds {
    /// Bounds for an image of `width × height` before padding.
    #[must_use]
    pub fn for_image(width: u32, height: u32) -> Self {
        let (padded_width, padded_height) = padded_size(width, height);
        Self {
            min: (padded_width / padded_height).max(1),
            max: padded_width,
        }
    }

    /// `true` if `resolution` lies within the bounds.
    #[must_use]
    pub fn contains(&self, resolution: u32) -> bool {
        (self.min..=self.max).contains(&resolution)
    }

    /// Résolution doublée.
    ///
    /// # Errors
    /// `CoreError::InvalidResolution` si le résultat dépasse `max`.
    pub fn double(&self, resolution: u32) -> Result<u32, CoreError> {
        match resolution.checked_mul(RESOLUTION_STEP) {
            Some(next) if next <= self.max => Ok(next),
            _ => Err(self.invalid(resolution)),
        }
    }

    /// Résolution divisée par deux.
    ///
    /// # Errors
    /// `CoreError::InvalidResolution` si le résultat passe sous `min`.
    pub fn halve(&self, resolution: u32) -> Result<u32, CoreError> {
        let next = resolution / RESOLUTION_STEP;
        if next < self.min {
            return Err(self.invalid(resolution));
        }
        Ok(next)
    }

    fn invalid(&self, resolution: u32) -> CoreError {
        CoreError::InvalidResolution {
            resolution,
            padded_width: self.max,
        }
    }
}
